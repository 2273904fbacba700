//! Ergonomic error context helpers.
//!
//! Provides extension traits for attaching the store key to IO and
//! serialization failures, converting them into `StoreError` variants.

use crate::base::error::StoreError;
use std::io;

/// Extension trait for adding a store key to IO Results.
pub trait IoResultExt<T> {
    /// Add store-record context to an IO error.
    ///
    /// # Example
    /// ```ignore
    /// use cookiesweep::base::context::IoResultExt;
    ///
    /// let text = tokio::fs::read_to_string(&path).await.store_context("settings")?;
    /// // Error: "Store I/O failed for settings: permission denied"
    /// ```
    fn store_context(self, key: &str) -> Result<T, StoreError>;
}

impl<T> IoResultExt<T> for Result<T, io::Error> {
    fn store_context(self, key: &str) -> Result<T, StoreError> {
        self.map_err(|e| StoreError::io(key, e))
    }
}

/// Extension trait for adding a store key to serde_json Results.
pub trait SerdeResultExt<T> {
    /// Add store-record context to a (de)serialization error.
    fn record_context(self, key: &str) -> Result<T, StoreError>;
}

impl<T> SerdeResultExt<T> for Result<T, serde_json::Error> {
    fn record_context(self, key: &str) -> Result<T, StoreError> {
        self.map_err(|e| StoreError::serde(key, e))
    }
}
