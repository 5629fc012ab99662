//! Live reachability probes, one per integration.

use std::time::Duration;

use reqwest::StatusCode;
use serde::Serialize;
use serde_json::json;

use crate::{context::AppContext, utils};

/// Looked up to exercise the registrar without touching a real name.
pub const PROBE_DOMAIN: &str = "test-domain-that-should-not-exist-12345.com";

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ProbeStatus {
    Connected,
    Error,
    Unreachable,
    NotConfigured,
}

impl ProbeStatus {
    fn from_response(result: Result<reqwest::Response, reqwest::Error>) -> Self {
        match result {
            Ok(response) if response.status() == StatusCode::OK => Self::Connected,
            Ok(response) => {
                tracing::warn!(status = response.status().as_u16(), "probe got non-200");
                Self::Error
            }
            Err(err) => {
                tracing::warn!(error = %err.without_url(), "probe could not connect");
                Self::Unreachable
            }
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ProbeResults {
    pub back_office: ProbeStatus,
    pub zapier: ProbeStatus,
    pub namecheap: ProbeStatus,
}

/// Run every probe in turn. One failing integration never affects another.
pub async fn run_all(ctx: &AppContext) -> ProbeResults {
    ProbeResults {
        back_office: probe_back_office(ctx).await,
        zapier: probe_automation(ctx).await,
        namecheap: probe_registrar(ctx).await,
    }
}

pub async fn probe_back_office(ctx: &AppContext) -> ProbeStatus {
    let back_office = &ctx.settings.back_office;
    if !back_office.is_configured() {
        return ProbeStatus::NotConfigured;
    }

    let result = ctx
        .http
        .get(back_office.health_url())
        .timeout(Duration::from_secs(back_office.probe_timeout_secs))
        .send()
        .await;
    ProbeStatus::from_response(result)
}

pub async fn probe_automation(ctx: &AppContext) -> ProbeStatus {
    let Some(url) = ctx.settings.automation.webhook_url() else {
        return ProbeStatus::NotConfigured;
    };

    let result = ctx
        .http
        .post(url)
        .json(&json!({ "test": true, "timestamp": utils::timestamp() }))
        .timeout(Duration::from_secs(ctx.settings.back_office.probe_timeout_secs))
        .send()
        .await;
    ProbeStatus::from_response(result)
}

pub async fn probe_registrar(ctx: &AppContext) -> ProbeStatus {
    if !ctx.settings.registrar.is_configured() {
        return ProbeStatus::NotConfigured;
    }

    match ctx.registrar.lookup(PROBE_DOMAIN).await {
        Ok(_) => ProbeStatus::Connected,
        Err(err) if err.is_transport() => {
            tracing::warn!(error = %err, "registrar probe could not connect");
            ProbeStatus::Unreachable
        }
        Err(err) => {
            tracing::warn!(error = %err, "registrar probe failed");
            ProbeStatus::Error
        }
    }
}
