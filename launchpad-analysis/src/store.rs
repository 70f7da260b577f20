//! Analysis storage backends
//!
//! Handlers only see the [`AnalysisStore`] trait so the in-memory map can be
//! replaced by a durable backend without touching them.

use async_trait::async_trait;
use launchpad_core::{AnalysisRecord, LaunchpadResult};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

/// Keyed storage for analysis records
#[async_trait]
pub trait AnalysisStore: Send + Sync {
    async fn get(&self, repo_id: &str) -> LaunchpadResult<Option<AnalysisRecord>>;

    /// Insert or replace; the last writer wins
    async fn set(&self, repo_id: &str, record: AnalysisRecord) -> LaunchpadResult<()>;

    /// Returns whether a record was removed
    async fn delete(&self, repo_id: &str) -> LaunchpadResult<bool>;

    async fn len(&self) -> LaunchpadResult<usize>;
}

/// Process-local store.
///
/// Unbounded and without expiry: records live until the process exits.
#[derive(Clone, Default)]
pub struct MemoryAnalysisStore {
    records: Arc<RwLock<HashMap<String, AnalysisRecord>>>,
}

impl MemoryAnalysisStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AnalysisStore for MemoryAnalysisStore {
    async fn get(&self, repo_id: &str) -> LaunchpadResult<Option<AnalysisRecord>> {
        let records = self.records.read().await;
        Ok(records.get(repo_id).cloned())
    }

    async fn set(&self, repo_id: &str, record: AnalysisRecord) -> LaunchpadResult<()> {
        let mut records = self.records.write().await;
        let replaced = records.insert(repo_id.to_string(), record).is_some();
        debug!(repo_id, replaced, total = records.len(), "Stored analysis");
        Ok(())
    }

    async fn delete(&self, repo_id: &str) -> LaunchpadResult<bool> {
        let mut records = self.records.write().await;
        Ok(records.remove(repo_id).is_some())
    }

    async fn len(&self) -> LaunchpadResult<usize> {
        Ok(self.records.read().await.len())
    }
}
