use std::io;

use thiserror::Error;

/// Failure reported by the host browser for a single capability call.
#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum BrowserError {
    #[error("Browser rejected the call: {reason}")]
    Rejected { reason: String },
    #[error("Browser API unavailable: {api}")]
    Unavailable { api: String },
    #[error("Invalid cookie record: {reason}")]
    InvalidCookie { reason: String },
    #[error("Invalid removal URL: {url}")]
    InvalidUrl { url: String },
}

impl BrowserError {
    pub fn rejected(reason: impl Into<String>) -> Self {
        Self::Rejected {
            reason: reason.into(),
        }
    }

    pub fn unavailable(api: impl Into<String>) -> Self {
        Self::Unavailable { api: api.into() }
    }

    pub fn invalid_cookie(reason: impl Into<String>) -> Self {
        Self::InvalidCookie {
            reason: reason.into(),
        }
    }

    pub fn invalid_url(url: impl Into<String>) -> Self {
        Self::InvalidUrl { url: url.into() }
    }
}

/// Hard failure of a cleanup run.
///
/// Per-item failures never surface here; they are logged and left out of
/// the counts. Only a failed enumeration aborts the run, so callers can tell
/// "nothing matched" apart from "the operation failed".
#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum CleanupError {
    #[error("Failed to enumerate cookies: {0}")]
    Read(#[source] BrowserError),
}

/// Failure of the injected settings/list/log store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Store I/O failed for {key}: {source}")]
    Io {
        key: String,
        #[source]
        source: io::Error,
    },
    #[error("Store record {key} is malformed: {source}")]
    Serde {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

impl StoreError {
    pub fn io(key: impl Into<String>, source: io::Error) -> Self {
        Self::Io {
            key: key.into(),
            source,
        }
    }

    pub fn serde(key: impl Into<String>, source: serde_json::Error) -> Self {
        Self::Serde {
            key: key.into(),
            source,
        }
    }

    /// Key of the record that failed.
    pub fn key(&self) -> &str {
        match self {
            Self::Io { key, .. } | Self::Serde { key, .. } => key,
        }
    }
}

/// Rejection of a domain typed into a whitelist or blacklist.
#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum DomainError {
    #[error("Domain is empty")]
    Empty,
    #[error("Invalid domain: {domain}")]
    Invalid { domain: String },
    #[error("Domain is a public suffix: {domain}")]
    PublicSuffix { domain: String },
    #[error("Domain already in list: {domain}")]
    Duplicate { domain: String },
}

impl DomainError {
    pub fn invalid(domain: impl Into<String>) -> Self {
        Self::Invalid {
            domain: domain.into(),
        }
    }
}

/// Failure of a request handled by the background coordinator.
#[derive(Debug, Error)]
pub enum CoordinatorError {
    #[error("Coordinator has shut down")]
    Closed,
    #[error(transparent)]
    Cleanup(#[from] CleanupError),
    #[error(transparent)]
    Store(#[from] StoreError),
}
