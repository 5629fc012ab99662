//! Errors raised by registrar lookups.

use thiserror::Error;

/// Everything that can go wrong between asking a registrar and getting a
/// trustworthy answer.
#[derive(Error, Debug)]
pub enum RegistrarError {
    /// Connection failure or timeout. The request URL is stripped because it
    /// carries credentials.
    #[error("registrar request failed: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("registrar responded with status {0}")]
    UnexpectedStatus(u16),

    #[error("registrar response could not be parsed: {0}")]
    Malformed(String),

    /// The registrar answered but reported an error of its own.
    #[error("registrar reported an error: {0}")]
    Api(String),

    #[error("registrar response has no result for '{domain}'")]
    NotReported { domain: String },

    #[error("registrar is not configured: {0}")]
    NotConfigured(&'static str),
}

impl RegistrarError {
    pub(crate) fn transport(err: reqwest::Error) -> Self {
        Self::Transport(err.without_url())
    }

    pub(crate) fn malformed(err: impl std::fmt::Display) -> Self {
        Self::Malformed(err.to_string())
    }

    /// Whether the registrar could not be reached at all.
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Transport(e) if e.is_timeout())
    }
}
