use serde::{Deserialize, Serialize};

use crate::base::error::DomainError;
use crate::cookies::{domain, psl};

/// Longest DNS label.
const MAX_LABEL_LEN: usize = 63;

/// Which of the two stored lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListKind {
    Whitelist,
    Blacklist,
}

impl ListKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ListKind::Whitelist => "whitelist",
            ListKind::Blacklist => "blacklist",
        }
    }
}

/// Ordered, duplicate-free list of domains.
///
/// Order is insertion order. Membership ([`DomainList::contains`]) is
/// hierarchical; duplicate detection on insert is exact.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct DomainList {
    entries: Vec<String>,
}

impl DomainList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate and append a domain typed by the user.
    ///
    /// Returns the stored (normalized) form.
    pub fn add(&mut self, input: &str) -> Result<String, DomainError> {
        let domain = validate_domain(input)?;
        if self.entries.iter().any(|d| *d == domain) {
            return Err(DomainError::Duplicate { domain });
        }
        self.entries.push(domain.clone());
        Ok(domain)
    }

    /// Remove an entry by exact string. Returns whether it was present.
    pub fn remove(&mut self, domain: &str) -> bool {
        let before = self.entries.len();
        self.entries.retain(|d| d != domain);
        self.entries.len() != before
    }

    /// Hierarchical membership.
    pub fn contains(&self, domain: &str) -> bool {
        domain::is_in_list(domain, &self.entries)
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(String::as_str)
    }
}

/// Stored lists may predate validation; they are only de-duplicated here.
impl From<Vec<String>> for DomainList {
    fn from(raw: Vec<String>) -> Self {
        let mut entries: Vec<String> = Vec::with_capacity(raw.len());
        for d in raw {
            if !entries.contains(&d) {
                entries.push(d);
            }
        }
        Self { entries }
    }
}

impl From<DomainList> for Vec<String> {
    fn from(list: DomainList) -> Self {
        list.entries
    }
}

impl<'a> FromIterator<&'a str> for DomainList {
    fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
        iter.into_iter()
            .map(str::to_string)
            .collect::<Vec<_>>()
            .into()
    }
}

/// Check a user-entered domain and return its normalized form.
///
/// Accepts bare host names only: no scheme, port, path or whitespace, LDH
/// labels of at most 63 characters, and not a public suffix.
pub fn validate_domain(input: &str) -> Result<String, DomainError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(DomainError::Empty);
    }

    let domain = domain::normalize(trimmed);
    let valid_chars = domain
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '.' || c == '-');
    if !valid_chars {
        return Err(DomainError::invalid(trimmed));
    }

    let labels_ok = domain.split('.').all(|label| {
        !label.is_empty()
            && label.len() <= MAX_LABEL_LEN
            && !label.starts_with('-')
            && !label.ends_with('-')
    });
    if !labels_ok {
        return Err(DomainError::invalid(trimmed));
    }

    if psl::is_public_suffix(&domain) {
        return Err(DomainError::PublicSuffix { domain });
    }

    Ok(domain)
}
