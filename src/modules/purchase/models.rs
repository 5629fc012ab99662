use std::collections::HashMap;

use serde::Serialize;

use super::handlers::PurchaseError;

/// Checked in this order; the first missing one is reported.
pub const REQUIRED_FIELDS: [&str; 3] = ["email", "first_name", "domain_preference"];

pub const SELECTED_PLAN: &str = "domain_rental";
pub const PLAN_AMOUNT: u32 = 20;
pub const LEAD_SOURCE: &str = "sales_website_zapier";
pub const REFERRAL_SYSTEM: &str = "5_referral_system";
pub const SUCCESS_REDIRECT: &str = "/success";

/// Contact and domain preference submitted by a prospective customer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PurchaseLead {
    pub email: String,
    pub first_name: String,
    pub last_name: Option<String>,
    pub domain_preference: String,
    pub phone: Option<String>,
}

impl PurchaseLead {
    /// Validate a submitted field map. Empty values count as missing.
    pub fn from_fields(fields: &HashMap<String, String>) -> Result<Self, PurchaseError> {
        let present = |name: &str| fields.get(name).filter(|v| !v.is_empty()).cloned();

        for field in REQUIRED_FIELDS {
            if present(field).is_none() {
                return Err(PurchaseError::MissingField(field));
            }
        }

        Ok(Self {
            email: present("email").unwrap_or_default(),
            first_name: present("first_name").unwrap_or_default(),
            last_name: present("last_name"),
            domain_preference: present("domain_preference").unwrap_or_default(),
            phone: present("phone"),
        })
    }
}

/// Outcome of the automation call, attached to the forwarded lead.
///
/// Transport errors are reported as `Failed` with the error text alongside.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum IntegrationStatus {
    Success,
    Failed,
    NotConfigured,
}

/// What the automation webhook and the back office receive.
#[derive(Debug, Clone, Serialize)]
pub struct LeadPayload {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub domain_preference: String,
    pub phone: String,
    pub selected_plan: &'static str,
    pub amount: u32,
    pub source: &'static str,
    pub timestamp: String,
    pub referral_system: &'static str,
    pub namecheap_check: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zapier_status: Option<IntegrationStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zapier_error: Option<String>,
}

impl LeadPayload {
    pub fn enrich(lead: PurchaseLead, timestamp: String) -> Self {
        Self {
            email: lead.email,
            first_name: lead.first_name,
            last_name: lead.last_name.unwrap_or_default(),
            domain_preference: lead.domain_preference,
            phone: lead.phone.unwrap_or_default(),
            selected_plan: SELECTED_PLAN,
            amount: PLAN_AMOUNT,
            source: LEAD_SOURCE,
            timestamp,
            referral_system: REFERRAL_SYSTEM,
            namecheap_check: true,
            zapier_status: None,
            zapier_error: None,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PurchaseResponse {
    pub status: &'static str,
    pub message: &'static str,
    pub redirect_url: &'static str,
    pub back_office_url: String,
    pub zapier_integrated: bool,
}

impl PurchaseResponse {
    pub fn success(back_office_url: String, zapier_integrated: bool) -> Self {
        Self {
            status: "success",
            message: "Domain purchase processed successfully",
            redirect_url: SUCCESS_REDIRECT,
            back_office_url,
            zapier_integrated,
        }
    }
}
