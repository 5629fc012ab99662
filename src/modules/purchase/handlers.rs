use std::collections::HashMap;

use axum::{
    extract::{FromRequest, Request, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Form, Json,
};
use serde_json::{json, Value};
use thiserror::Error;

use super::forward;
use super::models::{LeadPayload, PurchaseLead, PurchaseResponse};
use crate::{context::AppContext, utils};

/// Failures of the purchase flow. Messages sent to the client are fixed.
#[derive(Error, Debug)]
pub enum PurchaseError {
    #[error("request body could not be read: {0}")]
    MalformedBody(String),

    #[error("missing required field: {0}")]
    MissingField(&'static str),

    #[error("back office responded with status {0}")]
    BackOfficeRejected(u16),

    #[error("back office unreachable: {0}")]
    BackOfficeUnreachable(#[source] reqwest::Error),

    #[error("internal fault: {0}")]
    Internal(String),
}

impl PurchaseError {
    fn status(&self) -> StatusCode {
        match self {
            PurchaseError::MalformedBody(_) | PurchaseError::MissingField(_) => {
                StatusCode::BAD_REQUEST
            }
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn client_message(&self) -> String {
        match self {
            PurchaseError::MalformedBody(_) => "Invalid request body".to_string(),
            PurchaseError::MissingField(field) => format!("Missing required field: {}", field),
            PurchaseError::BackOfficeRejected(_) => "Failed to process domain purchase".to_string(),
            PurchaseError::BackOfficeUnreachable(_) => {
                "Unable to connect to back office system".to_string()
            }
            PurchaseError::Internal(_) => "An unexpected error occurred".to_string(),
        }
    }
}

impl IntoResponse for PurchaseError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "domain purchase failed");
        } else {
            tracing::debug!(error = %self, "domain purchase rejected");
        }

        let body = json!({
            "status": "error",
            "message": self.client_message(),
        });
        (status, Json(body)).into_response()
    }
}

/// Submitted fields from either a JSON object or a urlencoded form.
#[derive(Debug, Clone, Default)]
pub struct LeadFields(pub HashMap<String, String>);

impl<S> FromRequest<S> for LeadFields
where
    S: Send + Sync,
{
    type Rejection = PurchaseError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_json = req
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .is_some_and(|value| value.trim_start().starts_with("application/json"));

        if is_json {
            let Json(object) = Json::<serde_json::Map<String, Value>>::from_request(req, state)
                .await
                .map_err(|rejection| PurchaseError::MalformedBody(rejection.body_text()))?;

            let fields = object
                .into_iter()
                .filter_map(|(name, value)| scalar_text(value).map(|text| (name, text)))
                .collect();
            Ok(Self(fields))
        } else {
            let Form(fields) = Form::<HashMap<String, String>>::from_request(req, state)
                .await
                .map_err(|rejection| PurchaseError::MalformedBody(rejection.body_text()))?;
            Ok(Self(fields))
        }
    }
}

/// JSON values as form-style text; falsy values are treated as absent.
fn scalar_text(value: Value) -> Option<String> {
    if !utils::is_truthy(&value) {
        return None;
    }
    match value {
        Value::String(text) => Some(text),
        other => Some(other.to_string()),
    }
}

/// POST /domain-purchase
pub async fn submit_purchase(
    State(ctx): State<AppContext>,
    LeadFields(fields): LeadFields,
) -> Result<Json<PurchaseResponse>, PurchaseError> {
    let lead = PurchaseLead::from_fields(&fields)?;
    let mut payload = LeadPayload::enrich(lead, utils::timestamp());

    forward::notify_automation(&ctx, &mut payload).await;
    forward::deliver_to_back_office(&ctx, &payload).await?;

    tracing::info!(
        domain = %payload.domain_preference,
        automation = ?payload.zapier_status,
        "domain purchase forwarded to back office"
    );

    Ok(Json(PurchaseResponse::success(
        ctx.settings.back_office.base_url.clone(),
        ctx.settings.automation.is_configured(),
    )))
}

/// Panic handler for the purchase routes.
pub(super) fn panic_response(err: Box<dyn std::any::Any + Send + 'static>) -> Response {
    let detail = err
        .downcast_ref::<String>()
        .cloned()
        .or_else(|| err.downcast_ref::<&str>().map(|s| s.to_string()))
        .unwrap_or_else(|| "unknown panic payload".to_string());

    PurchaseError::Internal(detail).into_response()
}
