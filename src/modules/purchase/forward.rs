//! Outbound delivery of a lead: automation webhook first, back office second.

use std::time::Duration;

use reqwest::StatusCode;

use super::handlers::PurchaseError;
use super::models::{IntegrationStatus, LeadPayload};
use crate::context::AppContext;

/// Post the lead to the automation webhook, if one is configured, and record
/// the outcome on the payload. Never fails the purchase.
pub async fn notify_automation(ctx: &AppContext, payload: &mut LeadPayload) {
    let automation = &ctx.settings.automation;
    let Some(url) = automation.webhook_url() else {
        payload.zapier_status = Some(IntegrationStatus::NotConfigured);
        return;
    };

    let result = ctx
        .http
        .post(url)
        .json(&*payload)
        .timeout(Duration::from_secs(automation.timeout_secs))
        .send()
        .await;

    let status = match result {
        Ok(response) if response.status() == StatusCode::OK => IntegrationStatus::Success,
        Ok(response) => {
            tracing::warn!(
                status = response.status().as_u16(),
                "automation webhook rejected lead"
            );
            IntegrationStatus::Failed
        }
        Err(err) => {
            let err = err.without_url();
            tracing::warn!(error = %err, "automation webhook unreachable");
            payload.zapier_error = Some(err.to_string());
            IntegrationStatus::Failed
        }
    };
    payload.zapier_status = Some(status);
}

/// Post the lead to the back office. Anything but a 200 is terminal.
pub async fn deliver_to_back_office(
    ctx: &AppContext,
    payload: &LeadPayload,
) -> Result<(), PurchaseError> {
    let back_office = &ctx.settings.back_office;

    let response = ctx
        .http
        .post(back_office.webhook_url())
        .json(payload)
        .timeout(Duration::from_secs(back_office.timeout_secs))
        .send()
        .await
        .map_err(|err| PurchaseError::BackOfficeUnreachable(err.without_url()))?;

    if response.status() != StatusCode::OK {
        return Err(PurchaseError::BackOfficeRejected(response.status().as_u16()));
    }

    Ok(())
}
