//! Namecheap `namecheap.domains.check` client.

use std::time::Duration;

use async_trait::async_trait;
use domainshop_kernel::settings::RegistrarSettings;
use quick_xml::{events::Event, Reader};
use reqwest::StatusCode;

use crate::{RawLookup, RegistrarError, RegistrarLookup};

pub const SANDBOX_ENDPOINT: &str = "https://api.sandbox.namecheap.com/xml.response";
pub const PRODUCTION_ENDPOINT: &str = "https://api.namecheap.com/xml.response";
const CHECK_COMMAND: &str = "namecheap.domains.check";

#[derive(Clone)]
pub struct NamecheapClient {
    http: reqwest::Client,
    endpoint: String,
    api_user: String,
    api_key: String,
    username: String,
    client_ip: String,
    timeout: Duration,
}

impl NamecheapClient {
    pub fn new(settings: &RegistrarSettings, http: reqwest::Client) -> Self {
        let endpoint = settings.endpoint.clone().unwrap_or_else(|| {
            if settings.sandbox {
                SANDBOX_ENDPOINT.to_string()
            } else {
                PRODUCTION_ENDPOINT.to_string()
            }
        });

        Self {
            http,
            endpoint,
            api_user: settings.api_user.clone(),
            api_key: settings.api_key.clone(),
            username: settings.username.clone(),
            client_ip: settings.client_ip.clone(),
            timeout: Duration::from_secs(settings.timeout_secs),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn send(&self, domain: &str) -> Result<reqwest::Response, RegistrarError> {
        self.http
            .get(&self.endpoint)
            .query(&[
                ("ApiUser", self.api_user.as_str()),
                ("ApiKey", self.api_key.as_str()),
                ("UserName", self.username.as_str()),
                ("Command", CHECK_COMMAND),
                ("ClientIp", self.client_ip.as_str()),
                ("DomainList", domain),
            ])
            .timeout(self.timeout)
            .send()
            .await
            .map_err(RegistrarError::transport)
    }
}

#[async_trait]
impl RegistrarLookup for NamecheapClient {
    fn provider(&self) -> &'static str {
        "namecheap"
    }

    async fn lookup(&self, domain: &str) -> Result<bool, RegistrarError> {
        let response = self.send(domain).await?;
        if response.status() != StatusCode::OK {
            return Err(RegistrarError::UnexpectedStatus(response.status().as_u16()));
        }

        let body = response.text().await.map_err(RegistrarError::transport)?;
        let available = parse_check_response(&body, domain)?;
        tracing::debug!(domain = %domain, available, "namecheap lookup complete");
        Ok(available)
    }

    async fn raw_lookup(&self, domain: &str) -> Result<RawLookup, RegistrarError> {
        let response = self.send(domain).await?;
        let status_code = response.status().as_u16();
        let body = response.text().await.map_err(RegistrarError::transport)?;
        Ok(RawLookup { status_code, body })
    }
}

/// Find the `DomainCheckResult` entry for `domain` and read its `Available`
/// attribute.
///
/// Domain comparison ignores case. A response with `<Error>` entries and no
/// matching result is reported as [`RegistrarError::Api`].
pub fn parse_check_response(body: &str, domain: &str) -> Result<bool, RegistrarError> {
    let mut reader = Reader::from_str(body);
    reader.config_mut().trim_text(true);

    let mut in_error = false;
    let mut api_error: Option<String> = None;

    loop {
        match reader.read_event().map_err(RegistrarError::malformed)? {
            Event::Start(e) | Event::Empty(e) => match e.local_name().as_ref() {
                b"DomainCheckResult" => {
                    let mut entry_domain = None;
                    let mut entry_available = None;
                    for attr in e.attributes() {
                        let attr = attr.map_err(RegistrarError::malformed)?;
                        let value = attr.unescape_value().map_err(RegistrarError::malformed)?;
                        match attr.key.local_name().as_ref() {
                            b"Domain" => entry_domain = Some(value.into_owned()),
                            b"Available" => entry_available = Some(value.into_owned()),
                            _ => {}
                        }
                    }

                    let matches = entry_domain
                        .as_deref()
                        .is_some_and(|d| d.eq_ignore_ascii_case(domain));
                    if matches {
                        return entry_available
                            .map(|v| v.eq_ignore_ascii_case("true"))
                            .ok_or_else(|| {
                                RegistrarError::Malformed(format!(
                                    "result for '{}' has no Available attribute",
                                    domain
                                ))
                            });
                    }
                }
                b"Error" => in_error = true,
                _ => {}
            },
            Event::Text(text) if in_error => {
                if api_error.is_none() {
                    let message = text.unescape().map_err(RegistrarError::malformed)?;
                    api_error = Some(message.into_owned());
                }
            }
            Event::End(e) if e.local_name().as_ref() == b"Error" => in_error = false,
            Event::Eof => break,
            _ => {}
        }
    }

    match api_error {
        Some(message) => Err(RegistrarError::Api(message)),
        None => Err(RegistrarError::NotReported {
            domain: domain.to_string(),
        }),
    }
}
