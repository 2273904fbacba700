//! Single-task coordinator for background triggers.
//!
//! Every trigger goes through one bounded queue and is handled by one tokio
//! task, so cleanup runs never overlap. `CookiesChanged` bursts are
//! debounced into a single stats refresh, and the scheduled path is gated
//! by the policy's last-run timestamp.

use std::time::Duration;

use time::OffsetDateTime;
use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tokio::time::Instant;

use crate::background::trigger::{ManualAction, Trigger};
use crate::base::error::{CoordinatorError, StoreError};
use crate::cleanup::browser::Browser;
use crate::cleanup::orchestrator::{CleanupOptions, CleanupOrchestrator, CleanupResult};
use crate::clearlog::ClearLogEntry;
use crate::cookies::domain;
use crate::cookies::risk::CookiePatterns;
use crate::cookies::stats::CookieStats;
use crate::policy::domainlist::{DomainList, ListKind};
use crate::policy::schedule::should_run_scheduled;
use crate::policy::settings::{ClearType, Mode, Policy};
use crate::store::Store;

/// Coordinator configuration.
#[derive(Debug, Clone)]
pub struct CoordinatorConfig {
    /// Quiet period after the last `CookiesChanged` before stats refresh.
    pub debounce: Duration,
    /// Capacity of the trigger queue.
    pub queue_capacity: usize,
    /// Patterns used for the tracking counter in stats.
    pub patterns: CookiePatterns,
}

impl Default for CoordinatorConfig {
    fn default() -> Self {
        Self {
            debounce: Duration::from_millis(300),
            queue_capacity: 64,
            patterns: CookiePatterns::default(),
        }
    }
}

impl CoordinatorConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn debounce(mut self, debounce: Duration) -> Self {
        self.debounce = debounce;
        self
    }

    pub fn queue_capacity(mut self, capacity: usize) -> Self {
        self.queue_capacity = capacity.max(1);
        self
    }

    pub fn patterns(mut self, patterns: CookiePatterns) -> Self {
        self.patterns = patterns;
        self
    }
}

/// Sending side of a running coordinator.
///
/// The coordinator stops once every handle is dropped.
#[derive(Debug, Clone)]
pub struct CoordinatorHandle {
    tx: mpsc::Sender<Trigger>,
    stats: watch::Receiver<CookieStats>,
}

impl CoordinatorHandle {
    pub async fn send(&self, trigger: Trigger) -> Result<(), CoordinatorError> {
        self.tx
            .send(trigger)
            .await
            .map_err(|_| CoordinatorError::Closed)
    }

    pub async fn cookies_changed(&self) -> Result<(), CoordinatorError> {
        self.send(Trigger::CookiesChanged).await
    }

    pub async fn alarm(&self) -> Result<(), CoordinatorError> {
        self.send(Trigger::Alarm).await
    }

    /// Run a manual action and wait for its result.
    pub async fn manual(&self, action: ManualAction) -> Result<CleanupResult, CoordinatorError> {
        let (reply, rx) = oneshot::channel();
        self.send(Trigger::Manual { action, reply }).await?;
        rx.await.map_err(|_| CoordinatorError::Closed)?
    }

    /// Latest published stats.
    pub fn stats(&self) -> CookieStats {
        *self.stats.borrow()
    }

    /// Receiver notified on every stats refresh.
    pub fn subscribe(&self) -> watch::Receiver<CookieStats> {
        self.stats.clone()
    }
}

/// Start a coordinator on the current tokio runtime.
pub fn spawn<B, S>(
    browser: B,
    store: S,
    config: CoordinatorConfig,
) -> (CoordinatorHandle, JoinHandle<()>)
where
    B: Browser + 'static,
    S: Store + 'static,
{
    let (tx, rx) = mpsc::channel(config.queue_capacity.max(1));
    let (stats_tx, stats_rx) = watch::channel(CookieStats::default());

    let coordinator = Coordinator {
        orchestrator: CleanupOrchestrator::new(browser),
        store,
        config,
        active_site: None,
        refresh_at: None,
        stats: stats_tx,
    };
    let task = tokio::spawn(coordinator.run(rx));

    (
        CoordinatorHandle {
            tx,
            stats: stats_rx,
        },
        task,
    )
}

struct Coordinator<B, S> {
    orchestrator: CleanupOrchestrator<B>,
    store: S,
    config: CoordinatorConfig,
    active_site: Option<String>,
    refresh_at: Option<Instant>,
    stats: watch::Sender<CookieStats>,
}

impl<B: Browser, S: Store> Coordinator<B, S> {
    async fn run(mut self, mut rx: mpsc::Receiver<Trigger>) {
        tracing::debug!("Coordinator started");
        loop {
            tokio::select! {
                trigger = rx.recv() => match trigger {
                    Some(trigger) => self.handle(trigger).await,
                    None => break,
                },
                _ = refresh_due(self.refresh_at) => {
                    self.refresh_at = None;
                    self.refresh_stats().await;
                }
            }
        }
        tracing::debug!("Coordinator stopped");
    }

    async fn handle(&mut self, trigger: Trigger) {
        let name = trigger.name();
        tracing::debug!(trigger = name, "Handling trigger");

        let outcome = match trigger {
            Trigger::Installed => self.on_installed().await,
            Trigger::Startup {
                active_tab,
                open_tabs,
            } => self.on_startup(active_tab, open_tabs).await,
            Trigger::TabDiscarded { url } => self.on_tab_discarded(&url).await,
            Trigger::Alarm => self.check_schedule(OffsetDateTime::now_utc()).await,
            Trigger::ActiveSiteChanged(url) => {
                self.active_site = url.as_deref().and_then(domain::active_site);
                self.schedule_refresh();
                Ok(())
            }
            Trigger::CookiesChanged => {
                self.schedule_refresh();
                Ok(())
            }
            Trigger::Manual { action, reply } => {
                let result = self.on_manual(action).await;
                if reply.send(result).is_err() {
                    tracing::debug!("Manual requester went away before the reply");
                }
                Ok(())
            }
        };

        if let Err(e) = outcome {
            tracing::warn!(trigger = name, error = %e, "Trigger failed");
        }
    }

    async fn on_installed(&mut self) -> Result<(), CoordinatorError> {
        if self.store.load_policy().await?.is_none() {
            self.store.save_policy(&Policy::default()).await?;
            tracing::info!("Seeded default policy");
        }
        for kind in [ListKind::Whitelist, ListKind::Blacklist] {
            if self.store.load_list(kind).await?.is_none() {
                self.store.save_list(kind, &DomainList::new()).await?;
            }
        }
        self.check_schedule(OffsetDateTime::now_utc()).await
    }

    async fn on_startup(
        &mut self,
        active_tab: Option<String>,
        open_tabs: Vec<String>,
    ) -> Result<(), CoordinatorError> {
        let policy = self.policy().await?;

        if policy.enable_auto_cleanup && policy.cleanup_on_startup {
            let sites: Vec<String> = match active_tab {
                Some(tab) => domain::active_site(&tab).into_iter().collect(),
                None => {
                    let mut sites: Vec<String> =
                        open_tabs.iter().filter_map(|t| domain::active_site(t)).collect();
                    sites.sort();
                    sites.dedup();
                    sites
                }
            };

            let options = CleanupOptions::from_policy(&policy);
            for site in sites {
                match self.orchestrator.clear_site(&site, &options).await {
                    Ok(result) => self.finish(&result, policy.clear_type, "startup", &policy).await,
                    Err(e) => tracing::warn!(site = %site, error = %e, "Startup cleanup failed"),
                }
            }
        }

        if policy.cleanup_expired_cookies {
            let result = self
                .orchestrator
                .cleanup_expired(OffsetDateTime::now_utc())
                .await?;
            self.finish(&result, ClearType::All, "expired", &policy).await;
        }
        Ok(())
    }

    async fn on_tab_discarded(&mut self, url: &str) -> Result<(), CoordinatorError> {
        let policy = self.policy().await?;
        if !(policy.enable_auto_cleanup && policy.cleanup_on_tab_discard) {
            return Ok(());
        }
        let Some(site) = domain::active_site(url) else {
            tracing::debug!(url = %url, "Discarded tab has no site");
            return Ok(());
        };

        let result = self
            .orchestrator
            .clear_site(&site, &CleanupOptions::from_policy(&policy))
            .await?;
        self.finish(&result, policy.clear_type, "tab_discard", &policy).await;
        Ok(())
    }

    async fn check_schedule(&mut self, now: OffsetDateTime) -> Result<(), CoordinatorError> {
        let policy = self.policy().await?;
        if !should_run_scheduled(&policy, policy.last_scheduled_cleanup, now) {
            return Ok(());
        }

        let options = CleanupOptions::from_policy(&policy).clear_type(ClearType::All);
        let result = self.orchestrator.run_all(&options).await?;
        self.finish(&result, ClearType::All, "scheduled", &policy).await;

        self.store
            .save_policy(&policy.clone().last_scheduled_cleanup(now))
            .await?;
        tracing::info!(count = result.count, "Scheduled cleanup finished");
        Ok(())
    }

    async fn on_manual(&mut self, action: ManualAction) -> Result<CleanupResult, CoordinatorError> {
        let policy = self.policy().await?;
        let options = CleanupOptions::from_policy(&policy);

        let (result, cookie_type) = match &action {
            ManualAction::ClearSite(site) => {
                let site = domain::active_site(site).unwrap_or_else(|| domain::normalize(site));
                let result = self.orchestrator.clear_site(&site, &options).await?;
                (result, policy.clear_type)
            }
            ManualAction::ClearAll => (self.orchestrator.run_all(&options).await?, policy.clear_type),
            ManualAction::ClearByPolicy => {
                let kind = match policy.mode {
                    Mode::Whitelist => ListKind::Whitelist,
                    Mode::Blacklist => ListKind::Blacklist,
                };
                let list = self.store.load_list(kind).await?.unwrap_or_default();
                let result = self.orchestrator.clear_by_policy(&policy, &list).await?;
                (result, policy.clear_type)
            }
            ManualAction::CleanupExpired => {
                let result = self
                    .orchestrator
                    .cleanup_expired(OffsetDateTime::now_utc())
                    .await?;
                (result, ClearType::All)
            }
        };

        self.finish(&result, cookie_type, action.as_str(), &policy).await;
        Ok(result)
    }

    /// Stored policy, or defaults when none was saved yet.
    async fn policy(&self) -> Result<Policy, StoreError> {
        Ok(self.store.load_policy().await?.unwrap_or_default())
    }

    /// Log a run that removed something and queue a stats refresh.
    async fn finish(
        &mut self,
        result: &CleanupResult,
        cookie_type: ClearType,
        source: &str,
        policy: &Policy,
    ) {
        let now = OffsetDateTime::now_utc();
        let Some(entry) = ClearLogEntry::for_result(result, cookie_type, source, now) else {
            return;
        };

        if let Err(e) = self.append_log(entry.with_details(source), policy, now).await {
            tracing::warn!(error = %e, "Failed to record clear log entry");
        }
        self.schedule_refresh();
    }

    async fn append_log(
        &self,
        entry: ClearLogEntry,
        policy: &Policy,
        now: OffsetDateTime,
    ) -> Result<(), StoreError> {
        let mut log = self.store.load_log().await?;
        log.record(entry, policy.log_retention, now);
        self.store.save_log(&log).await
    }

    fn schedule_refresh(&mut self) {
        self.refresh_at = Some(Instant::now() + self.config.debounce);
    }

    async fn refresh_stats(&self) {
        match self.orchestrator.browser().get_all_cookies().await {
            Ok(cookies) => {
                let stats = CookieStats::collect(
                    &cookies,
                    self.active_site.as_deref(),
                    &self.config.patterns,
                );
                tracing::debug!(total = stats.total, current = stats.current, "Refreshed cookie stats");
                self.stats.send_replace(stats);
            }
            Err(e) => tracing::warn!(error = %e, "Stats refresh failed; keeping previous stats"),
        }
    }
}

async fn refresh_due(at: Option<Instant>) {
    match at {
        Some(at) => tokio::time::sleep_until(at).await,
        None => std::future::pending().await,
    }
}
