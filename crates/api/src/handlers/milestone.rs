//! Handlers for the `/milestones` resource.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use tracker_core::error::CoreError;
use tracker_core::milestone::Milestone;
use tracker_core::types::{MilestoneId, ProjectId};

use crate::error::{AppError, AppResult};
use crate::middleware::caller::Caller;
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateMilestone {
    pub id: MilestoneId,
    pub project_id: ProjectId,
}

/// Completion names the project explicitly; the milestone's snapshot is
/// not used to find it.
#[derive(Debug, Deserialize)]
pub struct CompleteMilestone {
    pub project_id: ProjectId,
}

/// POST /api/v1/milestones
pub async fn create(
    State(state): State<AppState>,
    Caller(caller): Caller,
    Json(input): Json<CreateMilestone>,
) -> AppResult<(StatusCode, Json<DataResponse<Milestone>>)> {
    let milestone = state
        .ledger
        .execute(caller, move |ledger| {
            ledger.create_milestone(caller, input.id, input.project_id)
        })
        .await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: milestone })))
}

/// GET /api/v1/milestones/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<MilestoneId>,
) -> AppResult<Json<DataResponse<Milestone>>> {
    let milestone = state
        .ledger
        .read(|ledger| ledger.milestone(id).cloned())
        .await
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Milestone",
            id,
        }))?;
    Ok(Json(DataResponse { data: milestone }))
}

/// POST /api/v1/milestones/{id}/complete
pub async fn complete(
    State(state): State<AppState>,
    Caller(caller): Caller,
    Path(id): Path<MilestoneId>,
    Json(input): Json<CompleteMilestone>,
) -> AppResult<Json<DataResponse<Milestone>>> {
    let milestone = state
        .ledger
        .execute(caller, move |ledger| {
            ledger.complete_milestone(caller, id, input.project_id)
        })
        .await?;
    Ok(Json(DataResponse { data: milestone }))
}

/// DELETE /api/v1/milestones/{id}
pub async fn delete(
    State(state): State<AppState>,
    Caller(caller): Caller,
    Path(id): Path<MilestoneId>,
) -> AppResult<StatusCode> {
    state
        .ledger
        .execute(caller, move |ledger| ledger.delete_milestone(caller, id))
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
