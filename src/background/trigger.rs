use tokio::sync::oneshot;

use crate::base::error::CoordinatorError;
use crate::cleanup::orchestrator::CleanupResult;

/// Reply channel of a [`Trigger::Manual`] request.
pub type Reply = oneshot::Sender<Result<CleanupResult, CoordinatorError>>;

/// User-initiated cleanups.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ManualAction {
    /// Clear one site (hierarchically) with the policy's options.
    ClearSite(String),
    /// Clear every domain with the policy's options.
    ClearAll,
    /// Clear what the policy's mode and list target.
    ClearByPolicy,
    /// Remove expired cookies.
    CleanupExpired,
}

impl ManualAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            ManualAction::ClearSite(_) => "clear_site",
            ManualAction::ClearAll => "clear_all",
            ManualAction::ClearByPolicy => "clear_by_policy",
            ManualAction::CleanupExpired => "cleanup_expired",
        }
    }
}

/// Events fed to the coordinator.
#[derive(Debug)]
pub enum Trigger {
    /// First install or update: seed missing records, then check the schedule.
    Installed,
    /// Browser start. `active_tab` and `open_tabs` are tab URLs.
    Startup {
        active_tab: Option<String>,
        open_tabs: Vec<String>,
    },
    /// A tab holding `url` was discarded.
    TabDiscarded { url: String },
    /// Periodic alarm: run the scheduled cleanup if it is due.
    Alarm,
    /// The user switched to a tab showing `url` (`None` for no page).
    ActiveSiteChanged(Option<String>),
    /// Some cookie changed. Coalesced into one stats refresh.
    CookiesChanged,
    Manual { action: ManualAction, reply: Reply },
}

impl Trigger {
    pub fn name(&self) -> &'static str {
        match self {
            Trigger::Installed => "installed",
            Trigger::Startup { .. } => "startup",
            Trigger::TabDiscarded { .. } => "tab_discarded",
            Trigger::Alarm => "alarm",
            Trigger::ActiveSiteChanged(_) => "active_site_changed",
            Trigger::CookiesChanged => "cookies_changed",
            Trigger::Manual { .. } => "manual",
        }
    }
}
