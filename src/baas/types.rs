//! Wire types for the BaaS account and document APIs.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// How a request authenticates against the BaaS
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Credential {
    /// No credential, guest access only
    #[default]
    Anonymous,
    /// Short-lived JWT minted by the account API
    Jwt(String),
    /// Session secret taken from the `a_session_<projectId>` cookie
    Session(String),
}

impl Credential {
    pub fn is_anonymous(&self) -> bool {
        matches!(self, Credential::Anonymous)
    }
}

/// Minimal user identity
///
/// Only the fields the application reads are kept. Everything else the
/// account API returns is dropped on decode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthUser {
    #[serde(rename = "$id")]
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

impl AuthUser {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: None,
            email: None,
        }
    }
}

/// A document in a collection
///
/// System attributes are typed, user attributes stay as raw JSON in `data`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    #[serde(rename = "$id")]
    pub id: String,
    #[serde(rename = "$createdAt", default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(rename = "$updatedAt", default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
    #[serde(rename = "$permissions", default)]
    pub permissions: Vec<String>,
    #[serde(flatten)]
    pub data: Map<String, Value>,
}

impl Document {
    /// Full JSON object, system attributes included
    pub fn to_json(&self) -> Value {
        let mut object = self.data.clone();
        object.insert("$id".to_string(), Value::String(self.id.clone()));
        if let Some(created_at) = &self.created_at {
            object.insert("$createdAt".to_string(), Value::String(created_at.clone()));
        }
        if let Some(updated_at) = &self.updated_at {
            object.insert("$updatedAt".to_string(), Value::String(updated_at.clone()));
        }
        object.insert(
            "$permissions".to_string(),
            Value::Array(self.permissions.iter().cloned().map(Value::String).collect()),
        );
        Value::Object(object)
    }

    /// Value of a user attribute or a typed system attribute
    pub fn attribute(&self, name: &str) -> Option<Value> {
        match name {
            "$id" => Some(Value::String(self.id.clone())),
            "$createdAt" => self.created_at.clone().map(Value::String),
            "$updatedAt" => self.updated_at.clone().map(Value::String),
            _ => self.data.get(name).cloned(),
        }
    }
}

/// Page of documents returned by a list call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentList {
    pub total: u64,
    pub documents: Vec<Document>,
}

/// Session created by email/password sign-in
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionToken {
    pub session_id: String,
    pub user_id: String,
    /// Secret usable as [`Credential::Session`]
    pub secret: String,
}

/// Error body returned by the BaaS on non-success statuses
#[derive(Debug, Deserialize)]
pub(crate) struct ApiErrorBody {
    pub message: String,
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
}
