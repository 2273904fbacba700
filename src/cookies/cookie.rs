use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use url::Url;

use crate::base::error::BrowserError;
use crate::cookies::domain;

/// One browser-held cookie, as seen by the cleanup core.
///
/// Instances are only produced by the validation in [`crate::cookies::raw`]
/// or by trusted in-process code, so every field is well-formed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cookie {
    pub name: String,
    pub value: String,
    /// Domain as reported by the browser; a leading dot marks a domain cookie.
    pub domain: String,
    pub path: String,
    pub secure: bool,
    pub http_only: bool,
    pub same_site: SameSite,
    /// `None` for session cookies.
    pub expiration_time: Option<OffsetDateTime>,
    /// Cookie store / partition the cookie lives in.
    pub store_id: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SameSite {
    #[default]
    Unspecified,
    #[serde(alias = "none")]
    NoRestriction,
    Lax,
    Strict,
}

impl SameSite {
    /// Lenient parse of the browser's string form. Unknown values map to
    /// `Unspecified`.
    pub fn parse(value: &str) -> Self {
        match value.to_ascii_lowercase().as_str() {
            "strict" => SameSite::Strict,
            "lax" => SameSite::Lax,
            "none" | "no_restriction" => SameSite::NoRestriction,
            _ => SameSite::Unspecified,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SameSite::Unspecified => "unspecified",
            SameSite::NoRestriction => "no_restriction",
            SameSite::Lax => "lax",
            SameSite::Strict => "strict",
        }
    }
}

/// Selection identity of a cookie: `(name, domain)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CookieIdentity {
    pub name: String,
    pub domain: String,
}

impl Cookie {
    pub fn new(name: impl Into<String>, value: impl Into<String>, domain: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            domain: domain.into(),
            path: "/".to_string(),
            secure: false,
            http_only: false,
            same_site: SameSite::Unspecified,
            expiration_time: None,
            store_id: None,
        }
    }

    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = path.into();
        self
    }

    pub fn with_secure(mut self, secure: bool) -> Self {
        self.secure = secure;
        self
    }

    pub fn with_http_only(mut self, http_only: bool) -> Self {
        self.http_only = http_only;
        self
    }

    pub fn with_same_site(mut self, same_site: SameSite) -> Self {
        self.same_site = same_site;
        self
    }

    pub fn with_expiration(mut self, expiration_time: OffsetDateTime) -> Self {
        self.expiration_time = Some(expiration_time);
        self
    }

    pub fn with_store_id(mut self, store_id: impl Into<String>) -> Self {
        self.store_id = Some(store_id.into());
        self
    }

    pub fn is_session(&self) -> bool {
        self.expiration_time.is_none()
    }

    pub fn is_persistent(&self) -> bool {
        self.expiration_time.is_some()
    }

    /// Session cookies never expire by time.
    pub fn is_expired(&self, current_time: OffsetDateTime) -> bool {
        self.expiration_time
            .is_some_and(|expiry| expiry < current_time)
    }

    /// Domain with the host-only marker stripped and lower-cased.
    pub fn normalized_domain(&self) -> String {
        domain::normalize(&self.domain)
    }

    pub fn identity(&self) -> CookieIdentity {
        CookieIdentity {
            name: self.name.clone(),
            domain: self.domain.clone(),
        }
    }

    /// Reconstruct the URL that owns this cookie, as removal requires.
    ///
    /// The scheme follows the `Secure` flag and the host is the cookie domain
    /// without its leading dot.
    pub fn owner_url(&self) -> Result<Url, BrowserError> {
        let scheme = if self.secure { "https" } else { "http" };
        let host = self.domain.strip_prefix('.').unwrap_or(&self.domain);
        let path = if self.path.starts_with('/') {
            self.path.clone()
        } else {
            format!("/{}", self.path)
        };
        let raw = format!("{scheme}://{host}{path}");

        match Url::parse(&raw) {
            Ok(url) if url.host_str().is_some_and(|h| !h.is_empty()) => Ok(url),
            _ => Err(BrowserError::invalid_url(raw)),
        }
    }
}
