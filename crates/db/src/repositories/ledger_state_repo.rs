//! Whole-state load and write-through for the ledger.

use sqlx::PgPool;
use tracker_core::state::{ChangeSet, LedgerState};

use super::{LedgerMetaRepo, MilestoneRepo, ProjectRepo, RoleGrantRepo};

pub struct LedgerStateRepo;

impl LedgerStateRepo {
    /// Load the persisted state. `None` when nothing was ever written.
    pub async fn load(pool: &PgPool) -> Result<Option<LedgerState>, sqlx::Error> {
        let Some(meta) = LedgerMetaRepo::get(pool).await? else {
            return Ok(None);
        };
        let mut state = meta.into_state()?;
        state.roles = RoleGrantRepo::list(pool).await?.into_iter().collect();
        state.projects = ProjectRepo::list(pool).await?.into_iter().collect();
        state.milestones = MilestoneRepo::list(pool).await?.into_iter().collect();

        tracing::info!(
            projects = state.projects.len(),
            milestones = state.milestones.len(),
            revision = state.revision.number,
            "Loaded ledger state",
        );
        Ok(Some(state))
    }

    /// Write every key named in `changes` from `state` in one transaction.
    pub async fn apply(
        pool: &PgPool,
        state: &LedgerState,
        changes: &ChangeSet,
    ) -> Result<(), sqlx::Error> {
        if changes.is_empty() {
            return Ok(());
        }

        let mut tx = pool.begin().await?;

        if changes.meta {
            LedgerMetaRepo::save(&mut *tx, state).await?;
        }
        if changes.roles {
            for (role, identity) in state.roles.grants() {
                RoleGrantRepo::grant(&mut *tx, role, identity).await?;
            }
        }
        for &slot in &changes.projects {
            if let Some(project) = state.projects.get(slot) {
                ProjectRepo::upsert(&mut *tx, slot, project).await?;
            }
        }
        for &id in &changes.milestones {
            match state.milestones.get(id) {
                Some(milestone) => MilestoneRepo::upsert(&mut *tx, milestone).await?,
                None => {
                    MilestoneRepo::delete(&mut *tx, id).await?;
                }
            }
        }

        tx.commit().await?;

        tracing::debug!(
            projects = changes.projects.len(),
            milestones = changes.milestones.len(),
            roles = changes.roles,
            meta = changes.meta,
            "Persisted ledger changes",
        );
        Ok(())
    }
}
