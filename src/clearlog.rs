//! Audit log of completed cleanups.
//!
//! Entries are appended newest-first after a run that removed something,
//! and dropped once they fall outside the configured retention window.

use std::collections::BTreeSet;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::cleanup::orchestrator::CleanupResult;
use crate::policy::settings::{ClearType, LogRetention};

static NEXT_SEQ: AtomicU64 = AtomicU64::new(0);

/// What produced a log entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogAction {
    #[default]
    Clear,
    Edit,
    Delete,
    Import,
    Export,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClearLogEntry {
    /// `{unix_millis}-{sequence}`, unique within the process.
    pub id: String,
    /// Human-readable target, see [`summarize_domains`].
    pub domain: String,
    pub cookie_type: ClearType,
    pub count: usize,
    #[serde(with = "time::serde::timestamp")]
    pub timestamp: OffsetDateTime,
    #[serde(default)]
    pub action: LogAction,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ClearLogEntry {
    pub fn new(
        domain: impl Into<String>,
        cookie_type: ClearType,
        count: usize,
        action: LogAction,
        now: OffsetDateTime,
    ) -> Self {
        Self {
            id: next_id(now),
            domain: domain.into(),
            cookie_type,
            count,
            timestamp: now,
            action,
            details: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Entry for a cleanup run, or `None` when the run removed nothing.
    pub fn for_result(
        result: &CleanupResult,
        cookie_type: ClearType,
        fallback: &str,
        now: OffsetDateTime,
    ) -> Option<Self> {
        if result.count == 0 {
            return None;
        }
        let domain = summarize_domains(&result.cleared_domains, fallback);
        Some(Self::new(domain, cookie_type, result.count, LogAction::Clear, now))
    }
}

/// Newest-first list of entries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClearLog {
    entries: Vec<ClearLogEntry>,
}

impl ClearLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Prune by `retention`, then prepend `entry`.
    pub fn record(&mut self, entry: ClearLogEntry, retention: LogRetention, now: OffsetDateTime) {
        self.prune(retention, now);
        self.entries.insert(0, entry);
    }

    /// Drop entries older than the retention window. Returns how many went.
    pub fn prune(&mut self, retention: LogRetention, now: OffsetDateTime) -> usize {
        let Some(window) = retention.window() else {
            return 0;
        };
        let before = self.entries.len();
        self.entries.retain(|e| now - e.timestamp <= window);
        before - self.entries.len()
    }

    pub fn entries(&self) -> &[ClearLogEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

/// One domain as-is, several as `"{first} and {n-1} more"`, none as `fallback`.
pub fn summarize_domains(cleared: &BTreeSet<String>, fallback: &str) -> String {
    let mut iter = cleared.iter();
    match (iter.next(), cleared.len()) {
        (Some(only), 1) => only.clone(),
        (Some(first), n) => format!("{first} and {} more", n - 1),
        (None, _) => fallback.to_string(),
    }
}

fn next_id(now: OffsetDateTime) -> String {
    let millis = now.unix_timestamp_nanos() / 1_000_000;
    let seq = NEXT_SEQ.fetch_add(1, Ordering::Relaxed);
    format!("{millis}-{seq}")
}
