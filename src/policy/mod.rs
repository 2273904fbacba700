//! Cleanup policy: settings, domain lists, targeting and scheduling.
//!
//! | Piece | Responsibility |
//! |-------|----------------|
//! | [`Policy`](settings::Policy) | Mode, cookie class, auxiliary purges, automatic triggers |
//! | [`DomainList`](domainlist::DomainList) | Ordered whitelist/blacklist with validation |
//! | [`is_target`](filter::is_target) | Whitelist/blacklist decision for one domain |
//! | [`should_run_scheduled`](schedule::should_run_scheduled) | Whether a scheduled run is due |

pub mod domainlist;
pub mod filter;
pub mod schedule;
pub mod settings;
