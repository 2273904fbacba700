//! Cleanup orchestration against the host browser.
//!
//! - [`browser`]: the [`Browser`](browser::Browser) capability trait
//! - [`memory`]: an in-process host backed by a concurrent map
//! - [`orchestrator`]: best-effort runs and their results

pub mod browser;
pub mod memory;
pub mod orchestrator;
