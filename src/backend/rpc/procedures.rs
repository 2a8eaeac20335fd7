/**
 * RPC Procedures
 *
 * The procedure table and the code behind each procedure.
 *
 * | Procedure            | Kind     | Access    |
 * |----------------------|----------|-----------|
 * | `healthCheck`        | query    | public    |
 * | `privateData`        | query    | protected |
 * | `spaces.list`        | query    | protected |
 * | `spaces.snapshot`    | query    | protected |
 * | `spaces.create`      | mutation | protected |
 * | `spaces.update`      | mutation | protected |
 * | `spaces.delete`      | mutation | protected |
 * | `spaces.saveSnapshot`| mutation | protected |
 *
 * Protected procedures check the caller before decoding their input, so an
 * anonymous caller always gets `UNAUTHORIZED`. Space procedures run the
 * repository with the caller's own credential, which lets the BaaS enforce
 * per-document permissions on top of the repository's owner filter.
 */

use crate::backend::error::RpcError;
use crate::backend::middleware::RpcContext;
use crate::backend::server::state::AppState;
use crate::shared::rpc::{
    procedures, CreateSpaceInput, CreateSpaceOutput, PrivateData, SaveSnapshotInput,
    SpaceIdInput, UpdateSpaceInput,
};
use crate::shared::{MetadataPatch, SpaceColor};
use crate::spaces::SpaceRepository;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

/// How a procedure is called over HTTP
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcedureKind {
    /// `GET /trpc/<name>?input=...`
    Query,
    /// `POST /trpc/<name>`
    Mutation,
}

/// Every procedure the server exposes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Procedure {
    HealthCheck,
    PrivateData,
    SpacesList,
    SpacesSnapshot,
    SpacesCreate,
    SpacesUpdate,
    SpacesDelete,
    SpacesSaveSnapshot,
}

impl Procedure {
    pub const ALL: [Procedure; 8] = [
        Procedure::HealthCheck,
        Procedure::PrivateData,
        Procedure::SpacesList,
        Procedure::SpacesSnapshot,
        Procedure::SpacesCreate,
        Procedure::SpacesUpdate,
        Procedure::SpacesDelete,
        Procedure::SpacesSaveSnapshot,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::HealthCheck => procedures::HEALTH_CHECK,
            Self::PrivateData => procedures::PRIVATE_DATA,
            Self::SpacesList => procedures::SPACES_LIST,
            Self::SpacesSnapshot => procedures::SPACES_SNAPSHOT,
            Self::SpacesCreate => procedures::SPACES_CREATE,
            Self::SpacesUpdate => procedures::SPACES_UPDATE,
            Self::SpacesDelete => procedures::SPACES_DELETE,
            Self::SpacesSaveSnapshot => procedures::SPACES_SAVE_SNAPSHOT,
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|procedure| procedure.name() == name)
    }

    pub fn kind(self) -> ProcedureKind {
        match self {
            Self::HealthCheck | Self::PrivateData | Self::SpacesList | Self::SpacesSnapshot => {
                ProcedureKind::Query
            }
            _ => ProcedureKind::Mutation,
        }
    }

    pub fn is_protected(self) -> bool {
        !matches!(self, Self::HealthCheck)
    }
}

/// Run a procedure for a caller
///
/// # Arguments
///
/// * `state` - Application state
/// * `context` - Resolved caller
/// * `procedure` - Procedure to run
/// * `input` - Decoded JSON input, `None` when the call carried none
///
/// # Returns
///
/// The procedure output as JSON, ready for the success envelope.
pub async fn dispatch(
    state: &AppState,
    context: &RpcContext,
    procedure: Procedure,
    input: Option<Value>,
) -> Result<Value, RpcError> {
    if procedure == Procedure::HealthCheck {
        return output("OK");
    }

    let user = context.require_user()?;
    if procedure == Procedure::PrivateData {
        return output(PrivateData {
            message: "This is private".to_string(),
            user: user.clone(),
        });
    }

    let repository = state
        .repository_for(&user.id, &context.credential)
        .ok_or_else(RpcError::unauthorized)?;
    run_space_procedure(&repository, procedure, input).await
}

async fn run_space_procedure(
    repository: &SpaceRepository,
    procedure: Procedure,
    input: Option<Value>,
) -> Result<Value, RpcError> {
    match procedure {
        Procedure::SpacesList => output(repository.list_for_user().await?),
        Procedure::SpacesSnapshot => {
            let SpaceIdInput { space_id } = decode(input)?;
            output(repository.get_latest_snapshot(&space_id).await?)
        }
        Procedure::SpacesCreate => {
            let CreateSpaceInput {
                title,
                color,
                snapshot,
            } = decode(input)?;
            let color = SpaceColor::normalize(color.as_deref());
            let space_id = repository.create(&title, color, snapshot.as_ref()).await?;
            output(CreateSpaceOutput { space_id })
        }
        Procedure::SpacesUpdate => {
            let UpdateSpaceInput {
                space_id,
                title,
                color,
            } = decode(input)?;
            let patch = MetadataPatch {
                title,
                color: color.map(|hex| SpaceColor::normalize(Some(&hex))),
            };
            repository.update_metadata(&space_id, &patch).await?;
            output(())
        }
        Procedure::SpacesDelete => {
            let SpaceIdInput { space_id } = decode(input)?;
            repository.delete(&space_id).await?;
            output(())
        }
        Procedure::SpacesSaveSnapshot => {
            let SaveSnapshotInput { space_id, snapshot } = decode(input)?;
            repository.upsert_snapshot(&space_id, &snapshot).await?;
            output(())
        }
        Procedure::HealthCheck | Procedure::PrivateData => {
            Err(RpcError::internal("not a space procedure"))
        }
    }
}

fn decode<T: DeserializeOwned>(input: Option<Value>) -> Result<T, RpcError> {
    serde_json::from_value(input.unwrap_or(Value::Null))
        .map_err(|e| RpcError::bad_request(format!("Invalid input: {}", e)))
}

fn output<T: Serialize>(value: T) -> Result<Value, RpcError> {
    serde_json::to_value(value).map_err(|e| RpcError::internal(e.to_string()))
}
