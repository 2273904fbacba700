//! The active cleanup policy.

use serde::{Deserialize, Serialize};
use time::{Duration, OffsetDateTime};

use crate::cookies::cookie::Cookie;

/// How the domain list is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Listed domains are protected; everything else is a target.
    #[default]
    Whitelist,
    /// Only listed domains are targets.
    Blacklist,
}

/// Which cookie class a run removes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClearType {
    Session,
    Persistent,
    #[default]
    All,
}

impl ClearType {
    /// Whether the class filter lets `cookie` through.
    pub fn admits(&self, cookie: &Cookie) -> bool {
        match self {
            ClearType::Session => cookie.is_session(),
            ClearType::Persistent => cookie.is_persistent(),
            ClearType::All => true,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ClearType::Session => "session",
            ClearType::Persistent => "persistent",
            ClearType::All => "all",
        }
    }
}

/// Period of the scheduled cleanup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScheduleInterval {
    #[default]
    Disabled,
    Hourly,
    Daily,
    Weekly,
}

impl ScheduleInterval {
    /// `None` when disabled.
    pub fn period(&self) -> Option<Duration> {
        match self {
            ScheduleInterval::Disabled => None,
            ScheduleInterval::Hourly => Some(Duration::hours(1)),
            ScheduleInterval::Daily => Some(Duration::days(1)),
            ScheduleInterval::Weekly => Some(Duration::weeks(1)),
        }
    }
}

/// How long clear-log entries are kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogRetention {
    OneHour,
    SixHours,
    TwelveHours,
    OneDay,
    ThreeDays,
    #[default]
    SevenDays,
    TenDays,
    ThirtyDays,
    Forever,
}

impl LogRetention {
    /// `None` for [`LogRetention::Forever`].
    pub fn window(&self) -> Option<Duration> {
        match self {
            LogRetention::OneHour => Some(Duration::hours(1)),
            LogRetention::SixHours => Some(Duration::hours(6)),
            LogRetention::TwelveHours => Some(Duration::hours(12)),
            LogRetention::OneDay => Some(Duration::days(1)),
            LogRetention::ThreeDays => Some(Duration::days(3)),
            LogRetention::SevenDays => Some(Duration::days(7)),
            LogRetention::TenDays => Some(Duration::days(10)),
            LogRetention::ThirtyDays => Some(Duration::days(30)),
            LogRetention::Forever => None,
        }
    }
}

/// Cleanup policy.
///
/// Missing fields in a stored record take their defaults on load, so the
/// core always works with a fully-populated value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Policy {
    pub mode: Mode,
    pub clear_type: ClearType,
    /// Purge cache storage, file systems and service workers of cleared sites.
    pub clear_cache: bool,
    pub clear_local_storage: bool,
    pub clear_indexed_db: bool,
    /// Master switch for startup and tab-discard cleanup.
    pub enable_auto_cleanup: bool,
    pub cleanup_on_startup: bool,
    pub cleanup_on_tab_discard: bool,
    pub cleanup_expired_cookies: bool,
    pub schedule_interval: ScheduleInterval,
    pub log_retention: LogRetention,
    /// When the last scheduled run completed.
    #[serde(with = "time::serde::timestamp::option")]
    pub last_scheduled_cleanup: Option<OffsetDateTime>,
}

impl Default for Policy {
    fn default() -> Self {
        Self {
            mode: Mode::Whitelist,
            clear_type: ClearType::All,
            clear_cache: false,
            clear_local_storage: false,
            clear_indexed_db: false,
            enable_auto_cleanup: false,
            cleanup_on_startup: false,
            cleanup_on_tab_discard: false,
            cleanup_expired_cookies: false,
            schedule_interval: ScheduleInterval::Disabled,
            log_retention: LogRetention::SevenDays,
            last_scheduled_cleanup: None,
        }
    }
}

impl Policy {
    /// Create a new policy with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(mut self, mode: Mode) -> Self {
        self.mode = mode;
        self
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

    /// Enable automatic cleanup together with its startup and tab-discard
    /// triggers.
    pub fn auto_cleanup(mut self, on_startup: bool, on_tab_discard: bool) -> Self {
        self.enable_auto_cleanup = true;
        self.cleanup_on_startup = on_startup;
        self.cleanup_on_tab_discard = on_tab_discard;
        self
    }

    pub fn cleanup_expired_cookies(mut self, enable: bool) -> Self {
        self.cleanup_expired_cookies = enable;
        self
    }

    pub fn schedule_interval(mut self, interval: ScheduleInterval) -> Self {
        self.schedule_interval = interval;
        self
    }

    pub fn log_retention(mut self, retention: LogRetention) -> Self {
        self.log_retention = retention;
        self
    }

    pub fn last_scheduled_cleanup(mut self, at: OffsetDateTime) -> Self {
        self.last_scheduled_cleanup = Some(at);
        self
    }

    /// Whether any auxiliary site-data purge is enabled.
    pub fn purges_site_data(&self) -> bool {
        self.clear_cache || self.clear_local_storage || self.clear_indexed_db
    }
}
