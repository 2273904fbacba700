//! Per-cookie privacy risk classification.
//!
//! The assessment is a pure function of the cookie, the active site and the
//! configured [`CookiePatterns`]: no clock, no randomness.
//!
//! | Factor | Weight |
//! |--------|--------|
//! | Third-party (domain does not match the active site) | 2 |
//! | Name matches a tracking pattern | 2 |
//! | Not `Secure` | 1 |
//! | Not `HttpOnly` | 1 |
//!
//! Total weight 0 is `low`, 1-2 is `medium`, 3 and above is `high`.

use std::fmt;
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

use crate::cookies::cookie::Cookie;
use crate::cookies::domain;

/// How a cookie name is compared against a pattern. Comparison is
/// case-insensitive; patterns are stored lower-cased.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
#[serde(from = "PatternRecord")]
pub enum NamePattern {
    Exact(String),
    Prefix(String),
    Contains(String),
}

// Stored form; lower-cased on the way in.
#[derive(Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
enum PatternRecord {
    Exact(String),
    Prefix(String),
    Contains(String),
}

impl From<PatternRecord> for NamePattern {
    fn from(record: PatternRecord) -> Self {
        match record {
            PatternRecord::Exact(p) => Self::exact(&p),
            PatternRecord::Prefix(p) => Self::prefix(&p),
            PatternRecord::Contains(p) => Self::contains(&p),
        }
    }
}

impl NamePattern {
    pub fn exact(s: &str) -> Self {
        Self::Exact(s.to_lowercase())
    }

    pub fn prefix(s: &str) -> Self {
        Self::Prefix(s.to_lowercase())
    }

    pub fn contains(s: &str) -> Self {
        Self::Contains(s.to_lowercase())
    }

    /// `name` must already be lower-cased.
    fn matches_lower(&self, name: &str) -> bool {
        match self {
            Self::Exact(p) => name == p,
            Self::Prefix(p) => name.starts_with(p.as_str()),
            Self::Contains(p) => name.contains(p.as_str()),
        }
    }

    pub fn matches(&self, name: &str) -> bool {
        self.matches_lower(&name.to_lowercase())
    }
}

/// Name heuristics for tracking and session/auth cookies.
///
/// These are small fixed lists, not an authoritative catalogue; embedders
/// can replace or extend them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CookiePatterns {
    pub tracking: Vec<NamePattern>,
    pub sensitive: Vec<NamePattern>,
}

impl Default for CookiePatterns {
    fn default() -> Self {
        let tracking = [
            "_ga", "_gid", "_gat", "__utm", "_gcl", "_fbp", "_fbc", "_hj", "_uet", "_pin_",
            "_scid", "_ttp", "_clck", "_clsk", "__hs", "_pk_", "ajs_", "mp_",
        ]
        .into_iter()
        .map(NamePattern::prefix)
        .chain(
            [
                "ide",
                "fr",
                "muid",
                "test_cookie",
                "hubspotutk",
                "uuid2",
                "anj",
                "personalization_id",
            ]
            .into_iter()
            .map(NamePattern::exact),
        )
        .chain(std::iter::once(NamePattern::contains("track")))
        .collect();

        let sensitive = [
            "session", "token", "auth", "sid", "csrf", "xsrf", "jwt", "login", "sso",
        ]
        .into_iter()
        .map(NamePattern::contains)
        .collect();

        Self {
            tracking,
            sensitive,
        }
    }
}

impl CookiePatterns {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pattern lists with nothing in them.
    pub fn empty() -> Self {
        Self {
            tracking: Vec::new(),
            sensitive: Vec::new(),
        }
    }

    /// Add a tracking pattern.
    pub fn tracking(mut self, pattern: NamePattern) -> Self {
        self.tracking.push(pattern);
        self
    }

    /// Add a sensitive (session/auth) pattern.
    pub fn sensitive(mut self, pattern: NamePattern) -> Self {
        self.sensitive.push(pattern);
        self
    }

    pub fn is_tracking(&self, cookie: &Cookie) -> bool {
        let name = cookie.name.to_lowercase();
        self.tracking.iter().any(|p| p.matches_lower(&name))
    }

    pub fn is_sensitive(&self, cookie: &Cookie) -> bool {
        let name = cookie.name.to_lowercase();
        self.sensitive.iter().any(|p| p.matches_lower(&name))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }

    fn from_weight(weight: u32) -> Self {
        match weight {
            0 => Self::Low,
            1 | 2 => Self::Medium,
            _ => Self::High,
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One triggered rule, in evaluation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskFactor {
    ThirdParty,
    Tracking,
    NotSecure,
    NotHttpOnly,
}

impl RiskFactor {
    pub fn weight(&self) -> u32 {
        match self {
            Self::ThirdParty | Self::Tracking => 2,
            Self::NotSecure | Self::NotHttpOnly => 1,
        }
    }

    pub fn describe(&self) -> &'static str {
        match self {
            Self::ThirdParty => "third-party cookie",
            Self::Tracking => "name matches a known tracking pattern",
            Self::NotSecure => "sent over unencrypted connections (not Secure)",
            Self::NotHttpOnly => "readable by page scripts (not HttpOnly)",
        }
    }
}

pub const NO_RISK_REASON: &str = "no risk factors";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskAssessment {
    pub level: RiskLevel,
    pub reason: String,
    pub factors: Vec<RiskFactor>,
}

/// Classifies cookies against a fixed set of patterns.
#[derive(Debug, Clone, Default)]
pub struct RiskAssessor {
    patterns: CookiePatterns,
}

impl RiskAssessor {
    pub fn new(patterns: CookiePatterns) -> Self {
        Self { patterns }
    }

    pub fn patterns(&self) -> &CookiePatterns {
        &self.patterns
    }

    /// Assess `cookie` relative to `active_site`, which may be a URL, a bare
    /// host, or garbage; anything that does not yield a host counts as
    /// "no active site" and disables the third-party rule.
    pub fn assess(&self, cookie: &Cookie, active_site: Option<&str>) -> RiskAssessment {
        let site = active_site.and_then(domain::active_site);
        let mut factors = Vec::with_capacity(4);

        if let Some(site) = site.as_deref() {
            if !domain::is_match(&cookie.domain, site) {
                factors.push(RiskFactor::ThirdParty);
            }
        }
        if self.patterns.is_tracking(cookie) {
            factors.push(RiskFactor::Tracking);
        }
        if !cookie.secure {
            factors.push(RiskFactor::NotSecure);
        }
        if !cookie.http_only {
            factors.push(RiskFactor::NotHttpOnly);
        }

        let weight = factors.iter().map(RiskFactor::weight).sum();
        let reason = if factors.is_empty() {
            NO_RISK_REASON.to_string()
        } else {
            factors
                .iter()
                .map(RiskFactor::describe)
                .collect::<Vec<_>>()
                .join("; ")
        };

        RiskAssessment {
            level: RiskLevel::from_weight(weight),
            reason,
            factors,
        }
    }

    pub fn is_sensitive(&self, cookie: &Cookie) -> bool {
        self.patterns.is_sensitive(cookie)
    }

    pub fn is_tracking(&self, cookie: &Cookie) -> bool {
        self.patterns.is_tracking(cookie)
    }

    /// Third-party relative to a known active site. Unknown site: `false`.
    pub fn is_third_party(&self, cookie: &Cookie, active_site: Option<&str>) -> bool {
        active_site
            .and_then(domain::active_site)
            .is_some_and(|site| !domain::is_match(&cookie.domain, &site))
    }
}

fn default_assessor() -> &'static RiskAssessor {
    static ASSESSOR: OnceLock<RiskAssessor> = OnceLock::new();
    ASSESSOR.get_or_init(RiskAssessor::default)
}

/// [`RiskAssessor::assess`] with the default patterns.
pub fn evaluate_risk(cookie: &Cookie, active_site: Option<&str>) -> RiskAssessment {
    default_assessor().assess(cookie, active_site)
}

/// Whether the cookie name looks like a session or auth token, using the
/// default patterns. Gates confirmation severity; not part of the risk level.
pub fn is_sensitive(cookie: &Cookie) -> bool {
    default_assessor().is_sensitive(cookie)
}
