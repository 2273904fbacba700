//! Cookie model, domain matching and per-cookie classification.
//!
//! - **Model**: [`Cookie`](cookie::Cookie), validated once at the browser
//!   boundary from [`RawCookie`](raw::RawCookie)
//! - **Matching**: [`domain`] normalization and hierarchical suffix matching
//! - **Classification**: [`risk`] scoring and sensitivity, [`stats`] counters
//! - **PSL**: [`psl`] public-suffix checks
//!
//! # Example
//!
//! ```rust
//! use cookiesweep::cookies::cookie::Cookie;
//! use cookiesweep::cookies::domain;
//! use cookiesweep::cookies::risk::{evaluate_risk, RiskLevel};
//!
//! assert!(domain::is_match("sub.example.com", ".example.com"));
//!
//! let cookie = Cookie::new("_ga", "GA1.2", "ads.example.net");
//! let risk = evaluate_risk(&cookie, Some("https://example.com/"));
//! assert_eq!(risk.level, RiskLevel::High);
//! ```

pub mod cookie;
pub mod domain;
pub mod psl;
pub mod raw;
pub mod risk;
pub mod stats;
