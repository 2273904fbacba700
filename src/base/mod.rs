//! Base types and error handling.
//!
//! - [`error`]: error enums for browser calls, cleanup runs, the store and
//!   domain list input
//! - [`context`]: `Result` extension traits attaching store keys to errors

pub mod context;
pub mod error;
