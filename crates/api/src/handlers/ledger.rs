//! Handlers for ledger administration: initialization, roles, pause and
//! logic upgrades.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use tracker_core::revision::LogicRevision;
use tracker_core::roles::Role;
use tracker_core::types::Identity;

use crate::error::{AppError, AppResult};
use crate::middleware::caller::Caller;
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct LedgerStatus {
    pub initialized: bool,
    pub initialized_version: u8,
    pub paused: bool,
    pub revision: LogicRevision,
    pub projects: usize,
    pub milestones: usize,
}

#[derive(Debug, Deserialize)]
pub struct GrantRoleRequest {
    pub role: Role,
    pub account: Identity,
}

#[derive(Debug, Serialize)]
pub struct GrantRoleResponse {
    /// `false` when the account already held the role.
    pub granted: bool,
}

#[derive(Debug, Serialize)]
pub struct HasRoleResponse {
    pub role: Role,
    pub identity: Identity,
    pub has_role: bool,
}

#[derive(Debug, Deserialize)]
pub struct UpgradeRequest {
    pub revision: u32,
}

/// POST /api/v1/ledger/initialize
pub async fn initialize(
    State(state): State<AppState>,
    Caller(caller): Caller,
) -> AppResult<StatusCode> {
    state
        .ledger
        .execute(caller, move |ledger| ledger.initialize(caller))
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/ledger/pause
pub async fn pause(State(state): State<AppState>, Caller(caller): Caller) -> AppResult<StatusCode> {
    state
        .ledger
        .execute(caller, move |ledger| ledger.pause(caller))
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/ledger/unpause
pub async fn unpause(
    State(state): State<AppState>,
    Caller(caller): Caller,
) -> AppResult<StatusCode> {
    state
        .ledger
        .execute(caller, move |ledger| ledger.unpause(caller))
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/ledger/status
pub async fn status(State(state): State<AppState>) -> Json<DataResponse<LedgerStatus>> {
    let status = state
        .ledger
        .read(|ledger| {
            let current = ledger.state();
            LedgerStatus {
                initialized: current.is_initialized(),
                initialized_version: current.initialized_version,
                paused: ledger.is_paused(),
                revision: ledger.revision(),
                projects: current.projects.len(),
                milestones: current.milestones.len(),
            }
        })
        .await;
    Json(DataResponse { data: status })
}

/// POST /api/v1/ledger/roles
pub async fn grant_role(
    State(state): State<AppState>,
    Caller(caller): Caller,
    Json(input): Json<GrantRoleRequest>,
) -> AppResult<Json<DataResponse<GrantRoleResponse>>> {
    let granted = state
        .ledger
        .execute(caller, move |ledger| ledger.grant_role(caller, input.role, input.account))
        .await?;
    Ok(Json(DataResponse {
        data: GrantRoleResponse { granted },
    }))
}

/// GET /api/v1/ledger/roles/{role}/{identity}
pub async fn has_role(
    State(state): State<AppState>,
    Path((role, identity)): Path<(String, Identity)>,
) -> AppResult<Json<DataResponse<HasRoleResponse>>> {
    let role: Role = role.parse().map_err(AppError::BadRequest)?;
    let has_role = state
        .ledger
        .read(|ledger| ledger.has_role(role, identity))
        .await;
    Ok(Json(DataResponse {
        data: HasRoleResponse {
            role,
            identity,
            has_role,
        },
    }))
}

/// POST /api/v1/ledger/upgrade
pub async fn upgrade(
    State(state): State<AppState>,
    Caller(caller): Caller,
    Json(input): Json<UpgradeRequest>,
) -> AppResult<Json<DataResponse<LogicRevision>>> {
    let revision = LogicRevision::by_number(input.revision).ok_or_else(|| {
        AppError::BadRequest(format!("Unknown logic revision {}", input.revision))
    })?;
    state
        .ledger
        .execute(caller, move |ledger| ledger.upgrade_logic(caller, revision))
        .await?;
    Ok(Json(DataResponse { data: revision }))
}
