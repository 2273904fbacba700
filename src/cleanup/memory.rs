//! In-process [`Browser`] host.
//!
//! Keeps cookies in a `DashMap` keyed by normalized domain and answers the
//! capability calls from that map. Failures can be injected per call kind,
//! and site-data purges are recorded, so the orchestrator can be driven
//! end to end without a real browser.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use dashmap::{DashMap, DashSet};
use time::OffsetDateTime;
use url::Url;

use crate::base::error::BrowserError;
use crate::cleanup::browser::{
    Browser, Enumerating, Purging, RemovedCookie, Removing, SiteDataKind,
};
use crate::cookies::cookie::{Cookie, SameSite};
use crate::cookies::{domain, psl, raw};

/// Cookie jar standing in for the host browser.
#[derive(Default)]
pub struct MemoryBrowser {
    // Map<normalized domain, cookies>
    store: DashMap<String, Vec<Cookie>>,
    fail_enumeration: AtomicBool,
    rejected_names: DashSet<String>,
    absent_names: DashSet<String>,
    failing_kinds: DashSet<SiteDataKind>,
    purges: DashMap<SiteDataKind, Vec<Vec<String>>>,
    reads: AtomicUsize,
}

impl MemoryBrowser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a jar from a JSON array of extension-style cookie records.
    ///
    /// Malformed records are dropped with a warning.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let browser = Self::new();
        for cookie in raw::parse_json(json)? {
            browser.insert(cookie);
        }
        Ok(browser)
    }

    /// Add a cookie, replacing one with the same name, domain, path and store.
    ///
    /// A host-only `example.com` cookie and a `.example.com` domain cookie
    /// share a map entry but stay distinct.
    pub fn insert(&self, cookie: Cookie) {
        let mut entry = self.store.entry(cookie.normalized_domain()).or_default();
        entry.retain(|c| {
            c.name != cookie.name
                || c.domain != cookie.domain
                || c.path != cookie.path
                || c.store_id != cookie.store_id
        });
        entry.push(cookie);
    }

    /// Builder form of [`MemoryBrowser::insert`].
    pub fn with_cookie(self, cookie: Cookie) -> Self {
        self.insert(cookie);
        self
    }

    /// Parse a `Set-Cookie` line received from `url` and store the result.
    ///
    /// Returns whether a cookie was stored. Lines that do not parse, and
    /// `Domain` attributes naming a public suffix or a foreign domain, are
    /// rejected.
    pub fn parse_and_set(&self, url: &Url, cookie_line: &str) -> bool {
        let parsed = match cookie::Cookie::parse(cookie_line) {
            Ok(parsed) => parsed,
            Err(e) => {
                tracing::debug!(line = %cookie_line, error = %e, "Failed to parse cookie");
                return false;
            }
        };

        let host = url.host_str().unwrap_or("").to_ascii_lowercase();
        if host.is_empty() {
            return false;
        }

        let domain = match parsed.domain() {
            Some(d) => {
                let d = d.trim_start_matches('.').to_ascii_lowercase();
                if !psl::is_valid_cookie_domain(&d, &host) {
                    tracing::debug!(domain = %d, host = %host, "Rejected cookie domain");
                    return false;
                }
                format!(".{d}")
            }
            None => host,
        };

        let same_site = match parsed.same_site() {
            Some(cookie::SameSite::Lax) => SameSite::Lax,
            Some(cookie::SameSite::Strict) => SameSite::Strict,
            Some(cookie::SameSite::None) => SameSite::NoRestriction,
            None => SameSite::Unspecified,
        };

        let mut c = Cookie::new(parsed.name(), parsed.value(), domain)
            .with_path(parsed.path().unwrap_or("/"))
            .with_secure(parsed.secure().unwrap_or(false))
            .with_http_only(parsed.http_only().unwrap_or(false))
            .with_same_site(same_site);

        // Max-Age wins over Expires.
        if let Some(max_age) = parsed.max_age() {
            c = c.with_expiration(OffsetDateTime::now_utc() + max_age);
        } else if let Some(expires) = parsed.expires().and_then(|e| e.datetime()) {
            c = c.with_expiration(expires);
        }

        self.insert(c);
        true
    }

    /// Snapshot of every cookie.
    pub fn cookies(&self) -> Vec<Cookie> {
        self.store
            .iter()
            .flat_map(|entry| entry.value().clone())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.store.iter().map(|e| e.value().len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.store.clear();
    }

    /// Make every subsequent enumeration fail (or succeed again).
    pub fn fail_enumeration(&self, fail: bool) {
        self.fail_enumeration.store(fail, Ordering::SeqCst);
    }

    /// Make removals of cookies called `name` return an error.
    pub fn reject_removal(&self, name: impl Into<String>) {
        self.rejected_names.insert(name.into());
    }

    /// Make removals of cookies called `name` complete without a result.
    pub fn absent_removal(&self, name: impl Into<String>) {
        self.absent_names.insert(name.into());
    }

    /// Make purges of `kind` fail.
    pub fn fail_site_data(&self, kind: SiteDataKind) {
        self.failing_kinds.insert(kind);
    }

    /// Origin lists passed to successful or failed purges of `kind`, oldest first.
    pub fn purge_requests(&self, kind: SiteDataKind) -> Vec<Vec<String>> {
        self.purges
            .get(&kind)
            .map(|r| r.value().clone())
            .unwrap_or_default()
    }

    /// Total number of purge calls across all kinds.
    pub fn purge_count(&self) -> usize {
        self.purges.iter().map(|e| e.value().len()).sum()
    }

    /// How many times the full cookie set has been enumerated.
    pub fn read_count(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    fn remove_now(
        &self,
        url: Url,
        name: String,
        store_id: Option<String>,
    ) -> Result<Option<RemovedCookie>, BrowserError> {
        if self.rejected_names.contains(&name) {
            return Err(BrowserError::rejected(format!("removal of {name} refused")));
        }
        if self.absent_names.contains(&name) {
            return Ok(None);
        }

        let host = domain::normalize(url.host_str().unwrap_or(""));
        let Some(mut entry) = self.store.get_mut(&host) else {
            return Ok(None);
        };

        // One cookie per call, host-only first.
        let matching = |c: &Cookie| c.name == name && c.path == url.path() && c.store_id == store_id;
        let Some(index) = entry
            .iter()
            .position(|c| matching(c) && !c.domain.starts_with('.'))
            .or_else(|| entry.iter().position(|c| matching(c)))
        else {
            return Ok(None);
        };
        entry.remove(index);

        Ok(Some(RemovedCookie {
            url,
            name,
            store_id,
        }))
    }
}

impl Browser for MemoryBrowser {
    fn get_all_cookies(&self) -> Enumerating {
        self.reads.fetch_add(1, Ordering::SeqCst);
        let result = if self.fail_enumeration.load(Ordering::SeqCst) {
            Err(BrowserError::unavailable("cookies.getAll"))
        } else {
            Ok(self.cookies())
        };
        Box::pin(std::future::ready(result))
    }

    fn remove_cookie(&self, url: Url, name: String, store_id: Option<String>) -> Removing {
        Box::pin(std::future::ready(self.remove_now(url, name, store_id)))
    }

    fn remove_site_data(&self, origins: Vec<String>, kind: SiteDataKind) -> Purging {
        self.purges.entry(kind).or_default().push(origins);
        let result = if self.failing_kinds.contains(&kind) {
            Err(BrowserError::rejected(format!("{kind} purge refused")))
        } else {
            Ok(())
        };
        Box::pin(std::future::ready(result))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn url(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    #[test]
    fn test_insert_replaces_same_identity() {
        let jar = MemoryBrowser::new();
        jar.insert(Cookie::new("a", "1", "example.com"));
        jar.insert(Cookie::new("a", "2", "example.com"));
        jar.insert(Cookie::new("a", "3", "example.com").with_path("/x"));

        assert_eq!(jar.len(), 2);
    }

    #[test]
    fn test_host_only_and_domain_cookie_are_distinct() {
        let jar = MemoryBrowser::from_json(
            r#"[{"name":"sid","value":"1","domain":"example.com","path":"/"},
                {"name":"sid","value":"2","domain":".example.com","path":"/"}]"#,
        )
        .unwrap();
        assert_eq!(jar.len(), 2);

        jar.insert(Cookie::new("sid", "3", ".example.com"));
        assert_eq!(jar.len(), 2);
        assert!(jar.cookies().iter().any(|c| c.domain == "example.com" && c.value == "1"));
    }

    #[tokio::test]
    async fn test_remove_takes_one_cookie_per_call() {
        let jar = MemoryBrowser::new()
            .with_cookie(Cookie::new("sid", "1", "example.com"))
            .with_cookie(Cookie::new("sid", "2", ".example.com"));
        let target = url("http://example.com/");

        let first = jar.remove_cookie(target.clone(), "sid".into(), None).await.unwrap();
        assert!(first.is_some());
        let left = jar.cookies();
        assert_eq!(left.len(), 1);
        assert_eq!(left[0].domain, ".example.com");

        let second = jar.remove_cookie(target.clone(), "sid".into(), None).await.unwrap();
        assert!(second.is_some());
        assert!(jar.is_empty());
        assert!(jar.remove_cookie(target, "sid".into(), None).await.unwrap().is_none());
    }

    #[test]
    fn test_parse_and_set() {
        let jar = MemoryBrowser::new();
        let origin = url("https://www.example.com/");

        assert!(jar.parse_and_set(&origin, "sid=abc; Secure; HttpOnly; SameSite=Strict"));
        assert!(jar.parse_and_set(&origin, "_ga=1; Domain=example.com; Max-Age=3600"));

        let cookies = jar.cookies();
        let sid = cookies.iter().find(|c| c.name == "sid").unwrap();
        assert_eq!(sid.domain, "www.example.com");
        assert!(sid.secure && sid.http_only);
        assert_eq!(sid.same_site, SameSite::Strict);
        assert!(sid.is_session());

        let ga = cookies.iter().find(|c| c.name == "_ga").unwrap();
        assert_eq!(ga.domain, ".example.com");
        assert!(ga.is_persistent());
    }

    #[test]
    fn test_parse_and_set_rejects_bad_domains() {
        let jar = MemoryBrowser::new();
        let origin = url("https://www.example.com/");

        assert!(!jar.parse_and_set(&origin, "a=1; Domain=com"));
        assert!(!jar.parse_and_set(&origin, "a=1; Domain=other.org"));
        assert!(!jar.parse_and_set(&origin, "no-equals-sign"));
        assert!(jar.is_empty());
    }

    #[tokio::test]
    async fn test_remove_cookie_matches_owner_url() {
        let jar = MemoryBrowser::new();
        let cookie = Cookie::new("a", "1", ".example.com")
            .with_secure(true)
            .with_store_id("0");
        jar.insert(cookie.clone());

        let removed = jar
            .remove_cookie(cookie.owner_url().unwrap(), "a".into(), Some("0".into()))
            .await
            .unwrap();
        assert_eq!(removed.map(|r| r.name), Some("a".to_string()));
        assert!(jar.is_empty());

        let again = jar
            .remove_cookie(url("https://example.com/"), "a".into(), Some("0".into()))
            .await
            .unwrap();
        assert!(again.is_none());
    }

    #[tokio::test]
    async fn test_injected_failures() {
        let jar = MemoryBrowser::new().with_cookie(Cookie::new("a", "1", "example.com"));
        jar.fail_enumeration(true);
        assert!(jar.get_all_cookies().await.is_err());
        jar.fail_enumeration(false);
        assert_eq!(jar.get_all_cookies().await.unwrap().len(), 1);
        assert_eq!(jar.read_count(), 2);

        jar.reject_removal("a");
        let err = jar
            .remove_cookie(url("http://example.com/"), "a".into(), None)
            .await;
        assert!(matches!(err, Err(BrowserError::Rejected { .. })));

        jar.fail_site_data(SiteDataKind::Cache);
        let origins = vec!["http://example.com".to_string()];
        assert!(jar.remove_site_data(origins.clone(), SiteDataKind::Cache).await.is_err());
        assert!(jar.remove_site_data(origins.clone(), SiteDataKind::LocalStorage).await.is_ok());
        assert_eq!(jar.purge_requests(SiteDataKind::Cache), vec![origins]);
        assert_eq!(jar.purge_count(), 2);
    }

    #[test]
    fn test_from_json_skips_invalid() {
        let jar = MemoryBrowser::from_json(
            r#"[{"name":"a","value":"1","domain":"example.com","path":"/"},
                {"value":"orphan","domain":"example.com"}]"#,
        )
        .unwrap();
        assert_eq!(jar.len(), 1);
    }
}
