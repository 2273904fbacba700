//! Best-effort cleanup runs.
//!
//! One run reads the full cookie set once, selects cookies by domain
//! predicate and cookie class, removes the survivors concurrently, and
//! optionally purges site data for the domains that actually lost a cookie.
//! Per-cookie and per-kind failures are logged and left out of the result;
//! only a failed enumeration fails the run.

use std::collections::BTreeSet;

use futures::future::join_all;
use time::OffsetDateTime;

use crate::base::error::{BrowserError, CleanupError};
use crate::cleanup::browser::{origins_for, Browser, SiteDataKind};
use crate::cookies::cookie::Cookie;
use crate::cookies::domain;
use crate::policy::domainlist::DomainList;
use crate::policy::filter::PolicyFilter;
use crate::policy::settings::{ClearType, Policy};

/// Per-run options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CleanupOptions {
    pub clear_type: ClearType,
    pub clear_cache: bool,
    pub clear_local_storage: bool,
    pub clear_indexed_db: bool,
}

impl CleanupOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cookie class and auxiliary toggles taken from `policy`.
    pub fn from_policy(policy: &Policy) -> Self {
        Self {
            clear_type: policy.clear_type,
            clear_cache: policy.clear_cache,
            clear_local_storage: policy.clear_local_storage,
            clear_indexed_db: policy.clear_indexed_db,
        }
    }

    pub fn clear_type(mut self, clear_type: ClearType) -> Self {
        self.clear_type = clear_type;
        self
    }

    pub fn clear_cache(mut self, enable: bool) -> Self {
        self.clear_cache = enable;
        self
    }

    pub fn clear_local_storage(mut self, enable: bool) -> Self {
        self.clear_local_storage = enable;
        self
    }

    pub fn clear_indexed_db(mut self, enable: bool) -> Self {
        self.clear_indexed_db = enable;
        self
    }

    /// Site-data kinds switched on, in a fixed order.
    pub fn site_data_kinds(&self) -> Vec<SiteDataKind> {
        SiteDataKind::ALL
            .into_iter()
            .filter(|kind| match kind {
                SiteDataKind::Cache => self.clear_cache,
                SiteDataKind::LocalStorage => self.clear_local_storage,
                SiteDataKind::IndexedDb => self.clear_indexed_db,
            })
            .collect()
    }
}

/// Outcome of one run.
///
/// `count == 0` implies `cleared_domains` is empty, and otherwise
/// `count >= cleared_domains.len()`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CleanupResult {
    /// Cookies confirmed removed.
    pub count: usize,
    /// Normalized domains with at least one confirmed removal.
    pub cleared_domains: BTreeSet<String>,
    /// Site-data kinds whose purge succeeded.
    pub site_data_purged: Vec<SiteDataKind>,
}

impl CleanupResult {
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }
}

/// Runs cleanups against one [`Browser`].
pub struct CleanupOrchestrator<B> {
    browser: B,
}

impl<B: Browser> CleanupOrchestrator<B> {
    pub fn new(browser: B) -> Self {
        Self { browser }
    }

    pub fn browser(&self) -> &B {
        &self.browser
    }

    /// Remove every cookie whose normalized domain satisfies `predicate` and
    /// whose class passes `options.clear_type`.
    pub async fn run<F>(
        &self,
        predicate: F,
        options: &CleanupOptions,
    ) -> Result<CleanupResult, CleanupError>
    where
        F: Fn(&str) -> bool,
    {
        let clear_type = options.clear_type;
        self.sweep(
            |cookie| clear_type.admits(cookie) && predicate(&cookie.normalized_domain()),
            &options.site_data_kinds(),
        )
        .await
    }

    /// [`run`](Self::run) with every domain targeted.
    pub async fn run_all(&self, options: &CleanupOptions) -> Result<CleanupResult, CleanupError> {
        self.run(|_| true, options).await
    }

    /// Clear one site and its subdomains (and parents, as matching is
    /// hierarchical in both directions).
    pub async fn clear_site(
        &self,
        site: &str,
        options: &CleanupOptions,
    ) -> Result<CleanupResult, CleanupError> {
        let site = domain::normalize(site);
        self.run(|d| domain::is_match(d, &site), options).await
    }

    /// Clear whatever `policy` targets given its domain list.
    pub async fn clear_by_policy(
        &self,
        policy: &Policy,
        list: &DomainList,
    ) -> Result<CleanupResult, CleanupError> {
        let filter = PolicyFilter::new(policy, list.clone());
        self.run(|d| filter.is_target(d), &CleanupOptions::from_policy(policy))
            .await
    }

    /// Remove cookies that expired before `now`. No site data is purged.
    pub async fn cleanup_expired(&self, now: OffsetDateTime) -> Result<CleanupResult, CleanupError> {
        self.sweep(|cookie| cookie.is_expired(now), &[]).await
    }

    async fn sweep<S>(
        &self,
        select: S,
        kinds: &[SiteDataKind],
    ) -> Result<CleanupResult, CleanupError>
    where
        S: Fn(&Cookie) -> bool,
    {
        let cookies = self
            .browser
            .get_all_cookies()
            .await
            .map_err(CleanupError::Read)?;
        let total = cookies.len();

        let targets: Vec<Cookie> = cookies.into_iter().filter(|c| select(c)).collect();
        tracing::debug!(total, targets = targets.len(), "Selected cookies for cleanup");

        let removals = targets.into_iter().map(|cookie| self.remove_one(cookie));
        let mut result = CleanupResult::default();
        for removed in join_all(removals).await.into_iter().flatten() {
            result.count += 1;
            result.cleared_domains.insert(removed);
        }

        if !result.cleared_domains.is_empty() && !kinds.is_empty() {
            result.site_data_purged = self.purge_site_data(&result.cleared_domains, kinds).await;
        }

        tracing::info!(
            count = result.count,
            domains = result.cleared_domains.len(),
            "Cleanup finished"
        );
        Ok(result)
    }

    /// Returns the cookie's normalized domain when the removal is confirmed.
    async fn remove_one(&self, cookie: Cookie) -> Option<String> {
        let url = match cookie.owner_url() {
            Ok(url) => url,
            Err(e) => {
                tracing::warn!(name = %cookie.name, domain = %cookie.domain, error = %e, "Cannot build removal URL");
                return None;
            }
        };

        let outcome = self
            .browser
            .remove_cookie(url, cookie.name.clone(), cookie.store_id.clone())
            .await;

        match outcome {
            Ok(Some(_)) => Some(cookie.normalized_domain()),
            Ok(None) => {
                tracing::warn!(name = %cookie.name, domain = %cookie.domain, "Cookie removal returned no result");
                None
            }
            Err(e) => {
                tracing::warn!(name = %cookie.name, domain = %cookie.domain, error = %e, "Cookie removal failed");
                None
            }
        }
    }

    async fn purge_site_data(
        &self,
        domains: &BTreeSet<String>,
        kinds: &[SiteDataKind],
    ) -> Vec<SiteDataKind> {
        let origins = origins_for(domains);
        let purges = kinds.iter().map(|&kind| {
            let origins = origins.clone();
            async move {
                let outcome: Result<(), BrowserError> =
                    self.browser.remove_site_data(origins, kind).await;
                (kind, outcome)
            }
        });

        let mut purged = Vec::new();
        for (kind, outcome) in join_all(purges).await {
            match outcome {
                Ok(()) => purged.push(kind),
                Err(e) => tracing::warn!(kind = %kind, error = %e, "Site data purge failed"),
            }
        }
        purged
    }
}

/// One-shot form of [`CleanupOrchestrator::run`].
pub async fn run_cleanup<B, F>(
    browser: &B,
    predicate: F,
    options: &CleanupOptions,
) -> Result<CleanupResult, CleanupError>
where
    B: Browser + ?Sized,
    F: Fn(&str) -> bool,
{
    CleanupOrchestrator::new(browser).run(predicate, options).await
}
