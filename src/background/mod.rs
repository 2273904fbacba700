//! Background triggers and the coordinator that serializes them.

pub mod coordinator;
pub mod trigger;

pub use coordinator::{spawn, CoordinatorConfig, CoordinatorHandle};
pub use trigger::{ManualAction, Trigger};
