//! Handlers for the `/projects` resource.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use tracker_core::error::CoreError;
use tracker_core::project::{NewProject, Project};
use tracker_core::types::{Identity, ProjectId};

use crate::error::{AppError, AppResult};
use crate::middleware::caller::Caller;
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct ProjectProgress {
    pub completed: u64,
    pub total: u64,
}

#[derive(Debug, Deserialize)]
pub struct UpdateClient {
    pub client_id: Identity,
}

#[derive(Debug, Deserialize)]
pub struct UpdateDeveloper {
    pub developer_id: Identity,
}

/// POST /api/v1/projects
pub async fn create(
    State(state): State<AppState>,
    Caller(caller): Caller,
    Json(input): Json<NewProject>,
) -> AppResult<(StatusCode, Json<DataResponse<Project>>)> {
    let project = state
        .ledger
        .execute(caller, move |ledger| ledger.create_project(caller, input))
        .await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: project })))
}

/// GET /api/v1/projects/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<ProjectId>,
) -> AppResult<Json<DataResponse<Project>>> {
    let project = state
        .ledger
        .read(|ledger| ledger.project(id).cloned())
        .await
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Project",
            id,
        }))?;
    Ok(Json(DataResponse { data: project }))
}

/// GET /api/v1/projects/{id}/progress
///
/// Unknown projects report `0 / 0` rather than 404.
pub async fn progress(
    State(state): State<AppState>,
    Path(id): Path<ProjectId>,
) -> Json<DataResponse<ProjectProgress>> {
    let (completed, total) = state.ledger.read(|ledger| ledger.project_progress(id)).await;
    Json(DataResponse {
        data: ProjectProgress { completed, total },
    })
}

/// PUT /api/v1/projects/{id}/client
pub async fn update_client(
    State(state): State<AppState>,
    Caller(caller): Caller,
    Path(id): Path<ProjectId>,
    Json(input): Json<UpdateClient>,
) -> AppResult<Json<DataResponse<Project>>> {
    let project = state
        .ledger
        .execute(caller, move |ledger| {
            ledger.update_project_client(caller, id, input.client_id)?;
            Ok(ledger.project(id).cloned().unwrap_or_default())
        })
        .await?;
    Ok(Json(DataResponse { data: project }))
}

/// PUT /api/v1/projects/{id}/developer
pub async fn update_developer(
    State(state): State<AppState>,
    Caller(caller): Caller,
    Path(id): Path<ProjectId>,
    Json(input): Json<UpdateDeveloper>,
) -> AppResult<Json<DataResponse<Project>>> {
    let project = state
        .ledger
        .execute(caller, move |ledger| {
            ledger.update_project_developer(caller, id, input.developer_id)?;
            Ok(ledger.project(id).cloned().unwrap_or_default())
        })
        .await?;
    Ok(Json(DataResponse { data: project }))
}
