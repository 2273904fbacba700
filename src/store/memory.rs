use dashmap::DashMap;

use crate::store::{Store, StoreFuture};

/// Records held in a concurrent map. Nothing survives the process.
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: DashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl Store for MemoryStore {
    fn read(&self, key: &str) -> StoreFuture<Option<String>> {
        let record = self.records.get(key).map(|r| r.value().clone());
        Box::pin(std::future::ready(Ok(record)))
    }

    fn write(&self, key: &str, record: String) -> StoreFuture<()> {
        self.records.insert(key.to_string(), record);
        Box::pin(std::future::ready(Ok(())))
    }
}
