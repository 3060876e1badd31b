//! Repository for the `role_grants` table.

use sqlx::{PgConnection, PgPool};
use tracker_core::roles::Role;
use tracker_core::types::Identity;

use crate::models::role_grant::RoleGrantRow;
use crate::to_db;

pub struct RoleGrantRepo;

impl RoleGrantRepo {
    /// Record a grant. Granting an existing pair is a no-op.
    pub async fn grant(
        conn: &mut PgConnection,
        role: Role,
        identity: Identity,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO role_grants (role, identity) VALUES ($1, $2) \
             ON CONFLICT ON CONSTRAINT uq_role_grants_role_identity DO NOTHING",
        )
        .bind(role.as_str())
        .bind(to_db(identity))
        .execute(conn)
        .await?;
        Ok(())
    }

    pub async fn list(pool: &PgPool) -> Result<Vec<(Role, Identity)>, sqlx::Error> {
        sqlx::query_as::<_, RoleGrantRow>(
            "SELECT role, identity, created_at FROM role_grants ORDER BY role, identity",
        )
        .fetch_all(pool)
        .await?
        .into_iter()
        .map(RoleGrantRow::into_grant)
        .collect()
    }
}
