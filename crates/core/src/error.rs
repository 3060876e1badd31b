use crate::roles::Role;
use crate::types::Identity;

/// Every way a ledger operation can be rejected.
///
/// Each variant is a distinct kind so callers can branch on the cause. A
/// rejected operation never leaves partial state behind.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CoreError {
    #[error("Unauthorized: identity {caller} lacks role {role}")]
    Unauthorized { role: Role, caller: Identity },

    #[error("Already exists: {entity} with id {id}")]
    AlreadyExists { entity: &'static str, id: u64 },

    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: u64 },

    #[error("Invalid state: {0}")]
    InvalidState(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}
