//! Caller identity extractor for Axum handlers.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use tracker_core::types::Identity;

use crate::error::AppError;

/// Header carrying the caller's numeric identity.
pub const CALLER_HEADER: &str = "x-caller-id";

/// The identity a request acts as, read from the `x-caller-id` header.
///
/// The value is opaque: any `u64` is accepted and authorization is left to
/// the ledger's role checks.
///
/// ```ignore
/// async fn my_handler(Caller(caller): Caller) -> AppResult<Json<()>> {
///     tracing::info!(caller, "handling request");
///     Ok(Json(()))
/// }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Caller(pub Identity);

impl<S: Send + Sync> FromRequestParts<S> for Caller {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let raw = parts
            .headers
            .get(CALLER_HEADER)
            .ok_or_else(|| AppError::Unauthenticated(format!("Missing {CALLER_HEADER} header")))?;

        raw.to_str()
            .ok()
            .and_then(|value| value.trim().parse::<Identity>().ok())
            .map(Caller)
            .ok_or_else(|| {
                AppError::Unauthenticated(format!(
                    "Invalid {CALLER_HEADER} header. Expected an unsigned integer"
                ))
            })
    }
}
