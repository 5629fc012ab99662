//! OpenSRS XCP `lookup` client.

use std::time::Duration;

use async_trait::async_trait;
use domainshop_kernel::settings::RegistrarSettings;
use hmac::{Hmac, Mac};
use quick_xml::{escape::escape, events::Event, Reader};
use reqwest::StatusCode;
use sha1::Sha1;

use crate::{RawLookup, RegistrarError, RegistrarLookup};

pub const DEFAULT_ENDPOINT: &str = "https://rr-n1-tor.opensrs.net:55443/";

type HmacSha1 = Hmac<Sha1>;

#[derive(Clone)]
pub struct OpenSrsClient {
    http: reqwest::Client,
    endpoint: String,
    username: String,
    api_key: String,
    timeout: Duration,
}

impl OpenSrsClient {
    pub fn new(settings: &RegistrarSettings, http: reqwest::Client) -> Self {
        Self {
            http,
            endpoint: settings
                .endpoint
                .clone()
                .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string()),
            username: settings.username.clone(),
            api_key: settings.api_key.clone(),
            timeout: Duration::from_secs(settings.timeout_secs),
        }
    }

    async fn send(&self, domain: &str) -> Result<reqwest::Response, RegistrarError> {
        if self.api_key.is_empty() {
            return Err(RegistrarError::NotConfigured("OpenSRS API key is missing"));
        }

        let envelope = lookup_envelope(&self.username, &self.api_key, domain);
        let signature = sign(&self.api_key, &envelope)?;

        self.http
            .post(&self.endpoint)
            .header(reqwest::header::CONTENT_TYPE, "text/xml")
            .header("X-Username", &self.username)
            .header("X-Signature", signature)
            .body(envelope)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(RegistrarError::transport)
    }
}

#[async_trait]
impl RegistrarLookup for OpenSrsClient {
    fn provider(&self) -> &'static str {
        "opensrs"
    }

    async fn lookup(&self, domain: &str) -> Result<bool, RegistrarError> {
        let response = self.send(domain).await?;
        if response.status() != StatusCode::OK {
            return Err(RegistrarError::UnexpectedStatus(response.status().as_u16()));
        }

        let body = response.text().await.map_err(RegistrarError::transport)?;
        match parse_lookup_status(&body)? {
            Some(status) => {
                tracing::debug!(domain = %domain, status = %status, "opensrs lookup complete");
                Ok(status == "available")
            }
            None => Err(RegistrarError::NotReported {
                domain: domain.to_string(),
            }),
        }
    }

    async fn raw_lookup(&self, domain: &str) -> Result<RawLookup, RegistrarError> {
        let response = self.send(domain).await?;
        let status_code = response.status().as_u16();
        let body = response.text().await.map_err(RegistrarError::transport)?;
        Ok(RawLookup { status_code, body })
    }
}

/// Hex HMAC-SHA1 of the request body keyed with the API key.
fn sign(api_key: &str, body: &str) -> Result<String, RegistrarError> {
    let mut mac = HmacSha1::new_from_slice(api_key.as_bytes())
        .map_err(|_| RegistrarError::NotConfigured("OpenSRS API key cannot be used for signing"))?;
    mac.update(body.as_bytes());
    Ok(hex::encode(mac.finalize().into_bytes()))
}

fn lookup_envelope(username: &str, api_key: &str, domain: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<OPS_envelope>
  <header>
    <version>0.9</version>
    <msg_id>123456</msg_id>
    <sender>{username}</sender>
    <recipient>OpenSRS</recipient>
    <security_key>{api_key}</security_key>
  </header>
  <body>
    <data_block>
      <dt_assoc>
        <item key="protocol">XCP</item>
        <item key="action">lookup</item>
        <item key="object">domain</item>
        <item key="attributes">
          <dt_assoc>
            <item key="domain">{domain}</item>
          </dt_assoc>
        </item>
      </dt_assoc>
    </data_block>
  </body>
</OPS_envelope>"#,
        username = escape(username),
        api_key = escape(api_key),
        domain = escape(domain),
    )
}

/// Text of the first `<item key="status">` element, if any.
pub fn parse_lookup_status(body: &str) -> Result<Option<String>, RegistrarError> {
    let mut reader = Reader::from_str(body);
    reader.config_mut().trim_text(true);

    let mut in_status = false;
    loop {
        match reader.read_event().map_err(RegistrarError::malformed)? {
            Event::Start(e) if e.local_name().as_ref() == b"item" => {
                in_status = false;
                for attr in e.attributes() {
                    let attr = attr.map_err(RegistrarError::malformed)?;
                    if attr.key.local_name().as_ref() == b"key"
                        && attr.unescape_value().map_err(RegistrarError::malformed)? == "status"
                    {
                        in_status = true;
                    }
                }
            }
            Event::Text(text) if in_status => {
                let status = text.unescape().map_err(RegistrarError::malformed)?;
                return Ok(Some(status.trim().to_string()));
            }
            Event::End(_) => in_status = false,
            Event::Eof => return Ok(None),
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lookup_response(status: &str) -> String {
        format!(
            r#"<?xml version='1.0' encoding='UTF-8' standalone='no' ?>
<OPS_envelope>
 <body>
  <data_block>
   <dt_assoc>
    <item key="protocol">XCP</item>
    <item key="object">DOMAIN</item>
    <item key="response_text">Domain available</item>
    <item key="action">REPLY</item>
    <item key="attributes">
     <dt_assoc>
      <item key="status">{status}</item>
     </dt_assoc>
    </item>
    <item key="response_code">210</item>
    <item key="is_success">1</item>
   </dt_assoc>
  </data_block>
 </body>
</OPS_envelope>"#
        )
    }

    #[test]
    fn reads_status_item() {
        assert_eq!(
            parse_lookup_status(&lookup_response("available")).unwrap(),
            Some("available".to_string())
        );
        assert_eq!(
            parse_lookup_status(&lookup_response("taken")).unwrap(),
            Some("taken".to_string())
        );
    }

    #[test]
    fn missing_status_item_is_none() {
        let body = r#"<OPS_envelope><body><item key="is_success">0</item></body></OPS_envelope>"#;
        assert_eq!(parse_lookup_status(body).unwrap(), None);
    }

    #[test]
    fn envelope_escapes_domain() {
        let envelope = lookup_envelope("reseller", "key", "a<b>.com");
        assert!(envelope.contains("<item key=\"domain\">a&lt;b&gt;.com</item>"));
        assert!(envelope.contains("<sender>reseller</sender>"));
    }

    #[test]
    fn signature_is_hex_hmac_sha1() {
        let signature = sign("key", "The quick brown fox jumps over the lazy dog").unwrap();
        assert_eq!(signature, "de7c9b85b8b78aa6bc8a7a36f70a90701c9db4d9");
    }

    #[tokio::test]
    async fn missing_key_is_not_configured() {
        let client = OpenSrsClient::new(&RegistrarSettings::default(), reqwest::Client::new());
        let err = client.lookup("example.com").await.unwrap_err();
        assert!(matches!(err, RegistrarError::NotConfigured(_)));
        assert!(!client.is_available("example.com").await);
    }
}
