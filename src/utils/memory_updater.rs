//! In-memory status updater for testing and development

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, RwLock};

use crate::traits::StatusUpdater;
use crate::types::{ReconError, ReconResult};

/// In-memory [`StatusUpdater`] implementation.
///
/// Records every applied status in a shared map and can be told to fail for
/// specific identifiers, which is how the best-effort apply phase is
/// exercised in tests.
#[derive(Debug, Clone, Default)]
pub struct MemoryUpdater {
    statuses: Arc<RwLock<HashMap<i64, String>>>,
    failing_ids: Arc<RwLock<HashSet<i64>>>,
}

impl MemoryUpdater {
    /// Create an empty updater
    pub fn new() -> Self {
        Self::default()
    }

    /// Make updates for `id` fail from now on
    pub fn fail_for(&self, id: i64) {
        self.failing_ids.write().unwrap().insert(id);
    }

    /// Status currently stored for `id`, if any
    pub fn status_of(&self, id: i64) -> Option<String> {
        self.statuses.read().unwrap().get(&id).cloned()
    }

    /// Number of identifiers with a stored status
    pub fn len(&self) -> usize {
        self.statuses.read().unwrap().len()
    }

    /// True if no update has been applied
    pub fn is_empty(&self) -> bool {
        self.statuses.read().unwrap().is_empty()
    }

    /// Clear all state (useful for testing)
    pub fn clear(&self) {
        self.statuses.write().unwrap().clear();
        self.failing_ids.write().unwrap().clear();
    }
}

#[async_trait]
impl StatusUpdater for MemoryUpdater {
    async fn update_status(&mut self, id: i64, status: &str) -> ReconResult<()> {
        if self.failing_ids.read().unwrap().contains(&id) {
            return Err(ReconError::Update(format!(
                "injected failure for identifier {id}"
            )));
        }
        self.statuses
            .write()
            .unwrap()
            .insert(id, status.to_string());
        Ok(())
    }
}
