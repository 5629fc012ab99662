use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use domainshop_registrar::RegistrarError;

use super::models::{CheckRequest, CheckResponse, DebugLookupResponse};
use super::normalize::{is_plausible, normalize};
use crate::context::AppContext;

/// Failures of the availability check and their client-facing shapes.
#[derive(Error, Debug)]
pub enum CheckError {
    #[error("request body could not be read: {0}")]
    MalformedBody(String),

    #[error("domain is missing")]
    MissingDomain,

    #[error("'{0}' is not a valid domain")]
    InvalidFormat(String),

    /// Only reachable from the debug passthrough.
    #[error("debug lookup failed: {0}")]
    DebugLookup(#[from] RegistrarError),

    #[error("internal fault: {0}")]
    Internal(String),
}

impl IntoResponse for CheckError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            CheckError::MalformedBody(_) => (
                StatusCode::BAD_REQUEST,
                json!({ "error": "Invalid request body" }),
            ),
            CheckError::MissingDomain => (
                StatusCode::BAD_REQUEST,
                json!({ "error": "Domain name required" }),
            ),
            CheckError::InvalidFormat(_) => (
                StatusCode::BAD_REQUEST,
                json!({ "available": false, "error": "Invalid domain format" }),
            ),
            CheckError::DebugLookup(err) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({ "error": err.to_string() }),
            ),
            CheckError::Internal(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({ "error": "Unable to check domain availability" }),
            ),
        };

        if status.is_server_error() {
            tracing::error!(error = %self, "domain check failed");
        } else {
            tracing::debug!(error = %self, "domain check rejected");
        }

        (status, Json(body)).into_response()
    }
}

/// POST /api/domain/check
pub async fn check_domain(
    State(ctx): State<AppContext>,
    payload: Result<Json<CheckRequest>, JsonRejection>,
) -> Result<Response, CheckError> {
    let Json(request) = payload.map_err(|rejection| CheckError::MalformedBody(rejection.body_text()))?;

    let raw = request.domain.as_deref().map(str::trim).unwrap_or_default();
    if raw.is_empty() {
        return Err(CheckError::MissingDomain);
    }

    let domain = normalize(raw);
    if !is_plausible(&domain) {
        return Err(CheckError::InvalidFormat(domain));
    }

    if request.debug_requested() {
        if ctx.settings.server.debug {
            return debug_lookup(&ctx, domain).await;
        }
        tracing::warn!(domain = %domain, "debug lookup requested while debug mode is off");
    }

    let available = ctx.registrar.is_available(&domain).await;
    tracing::info!(
        provider = ctx.registrar.provider(),
        domain = %domain,
        available,
        "domain availability checked"
    );

    Ok(Json(CheckResponse::new(domain, available)).into_response())
}

/// Raw registrar passthrough; never goes through the boolean parsing.
async fn debug_lookup(ctx: &AppContext, domain: String) -> Result<Response, CheckError> {
    let raw = ctx.registrar.raw_lookup(&domain).await?;
    tracing::info!(domain = %domain, status_code = raw.status_code, "debug registrar lookup");

    Ok(Json(DebugLookupResponse {
        domain,
        status_code: raw.status_code,
        raw_response: raw.body,
    })
    .into_response())
}

/// Panic handler for the check routes: generic message, cause in the log.
pub(super) fn panic_response(err: Box<dyn std::any::Any + Send + 'static>) -> Response {
    let detail = err
        .downcast_ref::<String>()
        .cloned()
        .or_else(|| err.downcast_ref::<&str>().map(|s| s.to_string()))
        .unwrap_or_else(|| "unknown panic payload".to_string());

    CheckError::Internal(detail).into_response()
}
