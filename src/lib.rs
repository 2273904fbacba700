//! # cookiesweep
//!
//! Policy evaluation and best-effort cleanup for browser-held cookies and
//! site data.
//!
//! `cookiesweep` decides which sites a whitelist or blacklist targets,
//! scores individual cookies for privacy risk, and purges cookies (plus
//! optional cache, local storage and IndexedDB) through an injected host
//! [`Browser`](cleanup::browser::Browser). Every removal is independent:
//! failures are logged and left out of the counts, so results are exact
//! even when the host refuses some calls.
//!
//! ## Features
//!
//! - **Domain matching**: normalization and hierarchical suffix matching
//! - **Risk scoring**: third-party, tracking-name and flag checks with reasons
//! - **Policies**: whitelist/blacklist targeting, cookie classes, schedules
//! - **Cleanup**: concurrent removals, per-origin site-data purges
//! - **Background**: a single-task coordinator with debounced stats
//! - **Persistence**: in-memory and JSON-file stores, retention-pruned clear log
//!
//! ## Quick Start
//!
//! ```rust
//! use cookiesweep::cleanup::memory::MemoryBrowser;
//! use cookiesweep::cleanup::orchestrator::CleanupOptions;
//! use cookiesweep::cookies::cookie::Cookie;
//! use cookiesweep::cookies::domain;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let browser = MemoryBrowser::new()
//!     .with_cookie(Cookie::new("sid", "1", "example.com"))
//!     .with_cookie(Cookie::new("_ga", "2", ".other.com"));
//!
//! let result = cookiesweep::run_cleanup(
//!     &browser,
//!     |d| domain::is_match(d, "example.com"),
//!     &CleanupOptions::new(),
//! )
//! .await
//! .unwrap();
//!
//! assert_eq!(result.count, 1);
//! # }
//! ```
//!
//! ## Modules
//!
//! - [`base`] - Error types and context helpers
//! - [`cookies`] - Cookie model, domain matching, risk and stats
//! - [`policy`] - Settings, domain lists, targeting and scheduling
//! - [`cleanup`] - Browser capabilities and the cleanup orchestrator
//! - [`clearlog`] - Audit log with retention
//! - [`store`] - Persistence of policy, lists and log
//! - [`background`] - Trigger queue and coordinator

pub mod background;
pub mod base;
pub mod cleanup;
pub mod clearlog;
pub mod cookies;
pub mod policy;
pub mod store;

pub use cleanup::orchestrator::run_cleanup;
pub use cookies::risk::{evaluate_risk, is_sensitive};
pub use policy::filter::is_target;
pub use policy::schedule::should_run_scheduled;
