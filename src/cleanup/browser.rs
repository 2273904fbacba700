//! Host browser capabilities consumed by the cleanup core.
//!
//! The core never talks to a real browser directly. Everything it needs
//! (enumerating cookies, removing one cookie, purging per-origin site data)
//! goes through the [`Browser`] trait, so hosts and tests can plug in their
//! own implementation.

use std::{fmt, future::Future, pin::Pin, sync::Arc};

use serde::{Deserialize, Serialize};
use url::Url;

use crate::base::error::BrowserError;
use crate::cookies::cookie::Cookie;

/// Kind of per-origin site data that can be purged next to cookies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SiteDataKind {
    /// Cache storage, file systems and service workers.
    Cache,
    LocalStorage,
    IndexedDb,
}

impl SiteDataKind {
    pub const ALL: [SiteDataKind; 3] = [
        SiteDataKind::Cache,
        SiteDataKind::LocalStorage,
        SiteDataKind::IndexedDb,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SiteDataKind::Cache => "cache",
            SiteDataKind::LocalStorage => "local_storage",
            SiteDataKind::IndexedDb => "indexed_db",
        }
    }
}

impl fmt::Display for SiteDataKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What the host reports back after a successful removal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemovedCookie {
    pub url: Url,
    pub name: String,
    pub store_id: Option<String>,
}

/// Future returned by [`Browser::get_all_cookies`].
pub type Enumerating = Pin<Box<dyn Future<Output = Result<Vec<Cookie>, BrowserError>> + Send>>;

/// Future returned by [`Browser::remove_cookie`].
///
/// `Ok(None)` means the host completed the call without removing anything.
pub type Removing =
    Pin<Box<dyn Future<Output = Result<Option<RemovedCookie>, BrowserError>> + Send>>;

/// Future returned by [`Browser::remove_site_data`].
pub type Purging = Pin<Box<dyn Future<Output = Result<(), BrowserError>> + Send>>;

/// Cookie and site-data capabilities of the host browser.
///
/// Implementations must be thread-safe; the orchestrator issues removals
/// concurrently from one `&self`.
pub trait Browser: Send + Sync {
    /// Every cookie across every store, in one call.
    fn get_all_cookies(&self) -> Enumerating;

    /// Remove the cookie `name` owned by `url` in `store_id`.
    fn remove_cookie(&self, url: Url, name: String, store_id: Option<String>) -> Removing;

    /// Purge one kind of site data for the given origins.
    fn remove_site_data(&self, origins: Vec<String>, kind: SiteDataKind) -> Purging;
}

impl<B: Browser + ?Sized> Browser for Arc<B> {
    fn get_all_cookies(&self) -> Enumerating {
        (**self).get_all_cookies()
    }

    fn remove_cookie(&self, url: Url, name: String, store_id: Option<String>) -> Removing {
        (**self).remove_cookie(url, name, store_id)
    }

    fn remove_site_data(&self, origins: Vec<String>, kind: SiteDataKind) -> Purging {
        (**self).remove_site_data(origins, kind)
    }
}

impl<B: Browser + ?Sized> Browser for &B {
    fn get_all_cookies(&self) -> Enumerating {
        (**self).get_all_cookies()
    }

    fn remove_cookie(&self, url: Url, name: String, store_id: Option<String>) -> Removing {
        (**self).remove_cookie(url, name, store_id)
    }

    fn remove_site_data(&self, origins: Vec<String>, kind: SiteDataKind) -> Purging {
        (**self).remove_site_data(origins, kind)
    }
}

/// `http://` and `https://` origins for every domain, in that order.
pub fn origins_for<'a, I>(domains: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a String>,
{
    domains
        .into_iter()
        .flat_map(|d| [format!("http://{d}"), format!("https://{d}")])
        .collect()
}
