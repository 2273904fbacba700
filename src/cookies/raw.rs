//! Loosely-typed cookie records as a browser extension API hands them out.
//!
//! Every field is optional here. [`Cookie::try_from`] validates a record
//! once, so the rest of the crate only ever sees well-formed cookies.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::base::error::BrowserError;
use crate::cookies::cookie::{Cookie, SameSite};

/// Wire shape of a cookie (camelCase, like the extension API).
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RawCookie {
    pub name: Option<String>,
    pub value: Option<String>,
    pub domain: Option<String>,
    pub path: Option<String>,
    pub secure: Option<bool>,
    pub http_only: Option<bool>,
    pub same_site: Option<String>,
    /// Seconds since the epoch, possibly fractional.
    pub expiration_date: Option<f64>,
    pub store_id: Option<String>,
}

impl TryFrom<RawCookie> for Cookie {
    type Error = BrowserError;

    fn try_from(raw: RawCookie) -> Result<Self, Self::Error> {
        let name = raw
            .name
            .ok_or_else(|| BrowserError::invalid_cookie("missing name"))?;

        let domain = match raw.domain {
            Some(d) if !d.trim().is_empty() && d != "." => d,
            _ => {
                return Err(BrowserError::invalid_cookie(format!(
                    "cookie {name} has no domain"
                )))
            }
        };

        let expiration_time = match raw.expiration_date {
            None => None,
            Some(secs) if secs.is_finite() => {
                Some(OffsetDateTime::from_unix_timestamp(secs.trunc() as i64).map_err(|_| {
                    BrowserError::invalid_cookie(format!(
                        "cookie {name} has out-of-range expiration {secs}"
                    ))
                })?)
            }
            Some(secs) => {
                return Err(BrowserError::invalid_cookie(format!(
                    "cookie {name} has non-finite expiration {secs}"
                )))
            }
        };

        let path = match raw.path {
            Some(p) if !p.is_empty() => p,
            _ => "/".to_string(),
        };

        Ok(Cookie {
            name,
            value: raw.value.unwrap_or_default(),
            domain,
            path,
            secure: raw.secure.unwrap_or(false),
            http_only: raw.http_only.unwrap_or(false),
            same_site: raw
                .same_site
                .as_deref()
                .map(SameSite::parse)
                .unwrap_or_default(),
            expiration_time,
            store_id: raw.store_id.filter(|s| !s.is_empty()),
        })
    }
}

impl From<&Cookie> for RawCookie {
    fn from(cookie: &Cookie) -> Self {
        Self {
            name: Some(cookie.name.clone()),
            value: Some(cookie.value.clone()),
            domain: Some(cookie.domain.clone()),
            path: Some(cookie.path.clone()),
            secure: Some(cookie.secure),
            http_only: Some(cookie.http_only),
            same_site: Some(cookie.same_site.as_str().to_string()),
            expiration_date: cookie.expiration_time.map(|t| t.unix_timestamp() as f64),
            store_id: cookie.store_id.clone(),
        }
    }
}

/// Validate a batch of records, dropping (and logging) the malformed ones.
pub fn validate_all(raws: Vec<RawCookie>) -> Vec<Cookie> {
    let total = raws.len();
    let cookies: Vec<Cookie> = raws
        .into_iter()
        .filter_map(|raw| match Cookie::try_from(raw) {
            Ok(cookie) => Some(cookie),
            Err(e) => {
                tracing::warn!(error = %e, "dropping malformed cookie record");
                None
            }
        })
        .collect();

    if cookies.len() != total {
        tracing::debug!(
            accepted = cookies.len(),
            dropped = total - cookies.len(),
            "validated cookie records"
        );
    }
    cookies
}

/// Parse a JSON array of cookie records (for example a `cookies.getAll`
/// dump) into validated cookies.
pub fn parse_json(json: &str) -> Result<Vec<Cookie>, serde_json::Error> {
    let raws: Vec<RawCookie> = serde_json::from_str(json)?;
    Ok(validate_all(raws))
}
