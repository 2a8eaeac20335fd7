/**
 * Query, Permission and ID Builders
 *
 * Helpers that produce the string forms the document API expects:
 *
 * - Queries are JSON objects, one per `queries[]` parameter:
 *   `{"method":"equal","attribute":"spaceId","values":["abc"]}`
 * - Permissions are `action("role")` strings: `read("user:abc")`
 * - Document ids are generated client-side before the create call
 */

use serde_json::{json, Value};
use std::fmt;
use uuid::Uuid;

/// A single list-documents query
#[derive(Debug, Clone, PartialEq)]
pub enum Query {
    Equal { attribute: String, value: Value },
    OrderDesc(String),
    Limit(u32),
    /// Resume after the document with this id
    CursorAfter(String),
}

impl Query {
    pub fn equal(attribute: impl Into<String>, value: impl Into<Value>) -> Self {
        Query::Equal {
            attribute: attribute.into(),
            value: value.into(),
        }
    }

    pub fn order_desc(attribute: impl Into<String>) -> Self {
        Query::OrderDesc(attribute.into())
    }

    pub fn limit(limit: u32) -> Self {
        Query::Limit(limit)
    }

    pub fn cursor_after(document_id: impl Into<String>) -> Self {
        Query::CursorAfter(document_id.into())
    }

    /// JSON value sent as one `queries[]` entry
    pub fn to_json(&self) -> Value {
        match self {
            Query::Equal { attribute, value } => json!({
                "method": "equal",
                "attribute": attribute,
                "values": [value],
            }),
            Query::OrderDesc(attribute) => json!({
                "method": "orderDesc",
                "attribute": attribute,
            }),
            Query::Limit(limit) => json!({
                "method": "limit",
                "values": [limit],
            }),
            Query::CursorAfter(document_id) => json!({
                "method": "cursorAfter",
                "values": [document_id],
            }),
        }
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_json())
    }
}

/// Role a permission is granted to
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Role {
    User(String),
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::User(id) => write!(f, "user:{}", id),
        }
    }
}

/// Document-level permission
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Permission {
    Read(Role),
    Update(Role),
    Delete(Role),
}

impl Permission {
    /// Read, update and delete restricted to a single user
    pub fn owner_only(user_id: &str) -> Vec<Permission> {
        let role = Role::User(user_id.to_string());
        vec![
            Permission::Read(role.clone()),
            Permission::Update(role.clone()),
            Permission::Delete(role),
        ]
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Permission::Read(role) => write!(f, "read(\"{}\")", role),
            Permission::Update(role) => write!(f, "update(\"{}\")", role),
            Permission::Delete(role) => write!(f, "delete(\"{}\")", role),
        }
    }
}

/// Fresh identifier for a document or a space
///
/// 32 lowercase hex characters, inside the 36-character id limit.
pub fn unique_id() -> String {
    Uuid::new_v4().simple().to_string()
}
