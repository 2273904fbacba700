//! Persistence of policy, domain lists and the clear log.
//!
//! The [`Store`] trait is a key-value surface over JSON records. Typed
//! accessors are provided on top of the two raw operations, so an
//! implementation only has to move strings.
//!
//! | Key | Record |
//! |-----|--------|
//! | `settings` | [`Policy`] |
//! | `whitelist`, `blacklist` | [`DomainList`] |
//! | `clear_log` | [`ClearLog`] |

use std::{future::Future, pin::Pin, sync::Arc};

use serde::{de::DeserializeOwned, Serialize};

use crate::base::context::SerdeResultExt;
use crate::base::error::StoreError;
use crate::clearlog::ClearLog;
use crate::policy::domainlist::{DomainList, ListKind};
use crate::policy::settings::Policy;

pub mod json;
pub mod memory;

pub use json::JsonFileStore;
pub use memory::MemoryStore;

pub const POLICY_KEY: &str = "settings";
pub const CLEAR_LOG_KEY: &str = "clear_log";

/// Key of the record holding `kind`.
pub fn list_key(kind: ListKind) -> &'static str {
    kind.as_str()
}

/// Future returned by store operations.
pub type StoreFuture<T> = Pin<Box<dyn Future<Output = Result<T, StoreError>> + Send>>;

/// Injected record store.
pub trait Store: Send + Sync {
    /// Raw record under `key`, `None` when absent.
    fn read(&self, key: &str) -> StoreFuture<Option<String>>;

    /// Replace the record under `key`.
    fn write(&self, key: &str, record: String) -> StoreFuture<()>;

    /// Stored policy, `None` when never saved.
    fn load_policy(&self) -> StoreFuture<Option<Policy>> {
        load(self, POLICY_KEY)
    }

    fn save_policy(&self, policy: &Policy) -> StoreFuture<()> {
        save(self, POLICY_KEY, policy)
    }

    fn load_list(&self, kind: ListKind) -> StoreFuture<Option<DomainList>> {
        load(self, list_key(kind))
    }

    fn save_list(&self, kind: ListKind, list: &DomainList) -> StoreFuture<()> {
        save(self, list_key(kind), list)
    }

    /// Stored clear log, empty when never saved.
    fn load_log(&self) -> StoreFuture<ClearLog> {
        let loading = load::<ClearLog, _>(self, CLEAR_LOG_KEY);
        Box::pin(async move { Ok(loading.await?.unwrap_or_default()) })
    }

    fn save_log(&self, log: &ClearLog) -> StoreFuture<()> {
        save(self, CLEAR_LOG_KEY, log)
    }
}

impl<S: Store + ?Sized> Store for Arc<S> {
    fn read(&self, key: &str) -> StoreFuture<Option<String>> {
        (**self).read(key)
    }

    fn write(&self, key: &str, record: String) -> StoreFuture<()> {
        (**self).write(key, record)
    }
}

fn load<T, S>(store: &S, key: &'static str) -> StoreFuture<Option<T>>
where
    T: DeserializeOwned + 'static,
    S: Store + ?Sized,
{
    let reading = store.read(key);
    Box::pin(async move {
        match reading.await? {
            Some(record) => serde_json::from_str(&record).record_context(key).map(Some),
            None => Ok(None),
        }
    })
}

fn save<T, S>(store: &S, key: &'static str, value: &T) -> StoreFuture<()>
where
    T: Serialize + ?Sized,
    S: Store + ?Sized,
{
    match serde_json::to_string(value).record_context(key) {
        Ok(record) => store.write(key, record),
        Err(e) => Box::pin(std::future::ready(Err(e))),
    }
}
