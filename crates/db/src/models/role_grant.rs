//! Row model for the `role_grants` table.

use sqlx::FromRow;
use tracker_core::roles::Role;
use tracker_core::types::{Identity, Timestamp};

use crate::{decode_error, from_db};

/// A row from the `role_grants` table.
#[derive(Debug, Clone, FromRow)]
pub struct RoleGrantRow {
    pub role: String,
    pub identity: i64,
    pub created_at: Timestamp,
}

impl RoleGrantRow {
    pub fn into_grant(self) -> Result<(Role, Identity), sqlx::Error> {
        let role = self.role.parse::<Role>().map_err(decode_error)?;
        Ok((role, from_db(self.identity)))
    }
}
