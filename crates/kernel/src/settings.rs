use std::path::PathBuf;

use anyhow::{anyhow, Context};
use serde::Deserialize;

const DEFAULT_ENV: &str = "local";
const ENV_VAR_NAME: &str = "DOMAINSHOP_ENV";
const CONFIG_DIR_ENV: &str = "DOMAINSHOP_CONFIG_DIR";
const ENV_PREFIX: &str = "DOMAINSHOP";

/// Legacy deployment variables mapped onto their configuration keys.
///
/// The site was deployed with these names before the layered configuration
/// existed, so they are still honoured and win over file values.
const LEGACY_STRING_VARS: &[(&str, &str)] = &[
    ("NAMECHEAP_API_USER", "registrar.api_user"),
    ("NAMECHEAP_API_KEY", "registrar.api_key"),
    ("NAMECHEAP_USERNAME", "registrar.username"),
    ("NAMECHEAP_CLIENT_IP", "registrar.client_ip"),
    ("ZAPIER_WEBHOOK_URL", "automation.webhook_url"),
];
const LEGACY_FLAG_VARS: &[(&str, &str)] = &[
    ("NAMECHEAP_SANDBOX", "registrar.sandbox"),
    ("DEBUG", "server.debug"),
];

/// Deployment environment the application is running in.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Local,
    Staging,
    Production,
}

/// Top-level configuration structure loaded from layered sources.
///
/// Built once at startup and shared read-only afterwards.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Settings {
    #[serde(default)]
    pub environment: Environment,
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub telemetry: TelemetrySettings,
    #[serde(default)]
    pub registrar: RegistrarSettings,
    #[serde(default)]
    pub automation: AutomationSettings,
    #[serde(default)]
    pub back_office: BackOfficeSettings,
}

impl Settings {
    /// Load configuration by layering `.env`, base file, environment overlay,
    /// prefixed environment variables and finally legacy variables.
    pub fn load() -> anyhow::Result<Self> {
        // Allow missing `.env` files without failing.
        let _ = dotenvy::dotenv();

        let environment = std::env::var(ENV_VAR_NAME).unwrap_or_else(|_| DEFAULT_ENV.to_string());
        let config_dir = match std::env::var(CONFIG_DIR_ENV) {
            Ok(dir) => PathBuf::from(dir),
            // Default to repo root `config` directory.
            Err(_) => std::env::current_dir()
                .map(|cwd| cwd.join("config"))
                .context("unable to resolve current directory")?,
        };

        let base_path = config_dir.join("base.toml");
        let environment_path = config_dir.join(format!("{}.toml", environment));

        let mut builder = config::Config::builder()
            .add_source(config::File::from(base_path).required(false))
            .add_source(config::File::from(environment_path).required(false))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__"),
            );

        for (var, key) in LEGACY_STRING_VARS {
            builder = builder
                .set_override_option(*key, std::env::var(var).ok())
                .with_context(|| format!("failed to apply {}", var))?;
        }
        for (var, key) in LEGACY_FLAG_VARS {
            let flag = std::env::var(var).ok().map(|v| parse_flag(&v));
            builder = builder
                .set_override_option(*key, flag)
                .with_context(|| format!("failed to apply {}", var))?;
        }
        if let Some(port) = std::env::var("PORT").ok().filter(|p| !p.is_empty()) {
            let port: u16 = port
                .parse()
                .with_context(|| format!("PORT is not a valid port number: '{}'", port))?;
            builder = builder
                .set_override("server.port", i64::from(port))
                .context("failed to apply PORT")?;
        }

        let cfg = builder
            .build()
            .with_context(|| "failed to build configuration")?;

        let mut settings: Settings = cfg
            .try_deserialize()
            .with_context(|| "failed to deserialize configuration")?;

        // Override environment field with parsed enum variant.
        settings.environment = match environment.as_str() {
            "local" => Environment::Local,
            "staging" => Environment::Staging,
            "production" => Environment::Production,
            other => {
                return Err(anyhow!(
                    "unsupported environment '{}'; expected local/staging/production",
                    other
                ));
            }
        };

        Ok(settings)
    }
}

/// Legacy flags are only on when literally `true`, matching the old deployment.
fn parse_flag(value: &str) -> bool {
    value.trim().eq_ignore_ascii_case("true")
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "ServerSettings::default_host")]
    pub host: String,
    #[serde(default = "ServerSettings::default_port")]
    pub port: u16,
    /// Must stay above the longest outbound chain (automation + back office).
    #[serde(default = "ServerSettings::default_request_timeout_ms")]
    pub request_timeout_ms: u64,
    /// Enables diagnostic passthroughs such as the raw registrar response.
    #[serde(default)]
    pub debug: bool,
    #[serde(default = "ServerSettings::default_service_name")]
    pub service_name: String,
}

impl ServerSettings {
    fn default_host() -> String {
        "0.0.0.0".to_string()
    }

    fn default_port() -> u16 {
        5000
    }

    fn default_request_timeout_ms() -> u64 {
        45000
    }

    fn default_service_name() -> String {
        "Domain Sales Website".to_string()
    }
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: Self::default_host(),
            port: Self::default_port(),
            request_timeout_ms: Self::default_request_timeout_ms(),
            debug: false,
            service_name: Self::default_service_name(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct TelemetrySettings {
    #[serde(default)]
    pub log_format: LogFormat,
    /// Fallback filter directive when `RUST_LOG` is unset.
    #[serde(default)]
    pub filter: Option<String>,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Which registrar answers availability lookups.
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum RegistrarProvider {
    #[default]
    Namecheap,
    Opensrs,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RegistrarSettings {
    #[serde(default)]
    pub provider: RegistrarProvider,
    #[serde(default)]
    pub api_user: String,
    #[serde(default)]
    pub api_key: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub client_ip: String,
    #[serde(default = "RegistrarSettings::default_sandbox")]
    pub sandbox: bool,
    /// Replaces the provider's built-in endpoint when set.
    #[serde(default)]
    pub endpoint: Option<String>,
    #[serde(default = "RegistrarSettings::default_timeout_secs")]
    pub timeout_secs: u64,
}

impl RegistrarSettings {
    fn default_sandbox() -> bool {
        true
    }

    fn default_timeout_secs() -> u64 {
        10
    }

    /// Whether credentials were supplied at all.
    pub fn is_configured(&self) -> bool {
        !self.api_key.trim().is_empty()
    }
}

impl Default for RegistrarSettings {
    fn default() -> Self {
        Self {
            provider: RegistrarProvider::default(),
            api_user: String::new(),
            api_key: String::new(),
            username: String::new(),
            client_ip: String::new(),
            sandbox: Self::default_sandbox(),
            endpoint: None,
            timeout_secs: Self::default_timeout_secs(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AutomationSettings {
    #[serde(default)]
    pub webhook_url: Option<String>,
    #[serde(default = "AutomationSettings::default_timeout_secs")]
    pub timeout_secs: u64,
}

impl AutomationSettings {
    fn default_timeout_secs() -> u64 {
        10
    }

    /// The webhook URL, or `None` when unset or blank.
    pub fn webhook_url(&self) -> Option<&str> {
        self.webhook_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }

    pub fn is_configured(&self) -> bool {
        self.webhook_url().is_some()
    }
}

impl Default for AutomationSettings {
    fn default() -> Self {
        Self {
            webhook_url: None,
            timeout_secs: Self::default_timeout_secs(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct BackOfficeSettings {
    #[serde(default = "BackOfficeSettings::default_base_url")]
    pub base_url: String,
    #[serde(default = "BackOfficeSettings::default_webhook_path")]
    pub webhook_path: String,
    #[serde(default = "BackOfficeSettings::default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "BackOfficeSettings::default_probe_timeout_secs")]
    pub probe_timeout_secs: u64,
}

impl BackOfficeSettings {
    fn default_base_url() -> String {
        "https://rizzosai-backend.onrender.com".to_string()
    }

    fn default_webhook_path() -> String {
        "/webhook/domain-purchase".to_string()
    }

    fn default_timeout_secs() -> u64 {
        30
    }

    fn default_probe_timeout_secs() -> u64 {
        5
    }

    pub fn is_configured(&self) -> bool {
        !self.base_url.trim().is_empty()
    }

    /// Full URL of the lead webhook.
    pub fn webhook_url(&self) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), self.webhook_path)
    }

    pub fn health_url(&self) -> String {
        format!("{}/health", self.base_url.trim_end_matches('/'))
    }
}

impl Default for BackOfficeSettings {
    fn default() -> Self {
        Self {
            base_url: Self::default_base_url(),
            webhook_path: Self::default_webhook_path(),
            timeout_secs: Self::default_timeout_secs(),
            probe_timeout_secs: Self::default_probe_timeout_secs(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_environment_is_local() {
        let settings = Settings::default();
        assert_eq!(settings.environment, Environment::Local);
    }

    #[test]
    fn default_back_office_webhook_url() {
        let settings = Settings::default();
        assert_eq!(
            settings.back_office.webhook_url(),
            "https://rizzosai-backend.onrender.com/webhook/domain-purchase"
        );
        assert_eq!(
            settings.back_office.health_url(),
            "https://rizzosai-backend.onrender.com/health"
        );
    }

    #[test]
    fn blank_automation_url_is_not_configured() {
        let mut automation = AutomationSettings::default();
        assert!(!automation.is_configured());

        automation.webhook_url = Some("   ".to_string());
        assert!(!automation.is_configured());

        automation.webhook_url = Some("https://hooks.example.com/catch/1".to_string());
        assert_eq!(
            automation.webhook_url(),
            Some("https://hooks.example.com/catch/1")
        );
    }

    #[test]
    fn registrar_defaults_to_sandbox_without_credentials() {
        let registrar = RegistrarSettings::default();
        assert!(registrar.sandbox);
        assert!(!registrar.is_configured());
        assert_eq!(registrar.timeout_secs, 10);
        assert_eq!(registrar.provider, RegistrarProvider::Namecheap);
    }

    #[test]
    fn request_timeout_exceeds_outbound_chain() {
        let settings = Settings::default();
        let chain_secs = settings.automation.timeout_secs + settings.back_office.timeout_secs;
        assert!(settings.server.request_timeout_ms > chain_secs * 1000);
    }

    #[test]
    fn legacy_flags_require_literal_true() {
        assert!(parse_flag("true"));
        assert!(parse_flag(" TRUE "));
        assert!(!parse_flag("1"));
        assert!(!parse_flag("false"));
    }
}
