//! JSON files on disk, one per record.
//!
//! A record `key` lives at `{dir}/{key}.json`. Writes go to a sibling
//! temporary file first and are renamed into place, so a crash mid-write
//! leaves the previous record intact.

use std::io;
use std::path::{Path, PathBuf};

use crate::base::context::IoResultExt;
use crate::store::{Store, StoreFuture};

#[derive(Debug, Clone)]
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    /// Store rooted at `dir`. The directory is created on first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the file backing `key`.
    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl Store for JsonFileStore {
    fn read(&self, key: &str) -> StoreFuture<Option<String>> {
        let path = self.path_for(key);
        let key = key.to_string();
        Box::pin(async move {
            match tokio::fs::read_to_string(&path).await {
                Ok(record) => Ok(Some(record)),
                Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
                Err(e) => Err(e).store_context(&key),
            }
        })
    }

    fn write(&self, key: &str, record: String) -> StoreFuture<()> {
        let dir = self.dir.clone();
        let path = self.path_for(key);
        let tmp = self.dir.join(format!("{key}.json.tmp"));
        let key = key.to_string();
        Box::pin(async move {
            tokio::fs::create_dir_all(&dir).await.store_context(&key)?;
            tokio::fs::write(&tmp, record).await.store_context(&key)?;
            tokio::fs::rename(&tmp, &path).await.store_context(&key)?;
            tracing::debug!(key = %key, path = %path.display(), "Saved store record");
            Ok(())
        })
    }
}
