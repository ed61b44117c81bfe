//! Configuration store test utilities.

pub mod fixtures;

use parapet_db::{ConfigStore, SqliteStore, StoreResult};
use std::sync::Arc;
use tempfile::TempDir;

/// A test store wrapper that cleans up its database file on drop.
#[allow(dead_code)]
pub struct TestStore {
    pub store: Arc<dyn ConfigStore>,
    _temp_dir: TempDir,
}

impl TestStore {
    /// Create a fresh store with an empty catalog.
    pub async fn new() -> StoreResult<Self> {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp directory");
        let db_path = temp_dir.path().join("test.db");
        let store = SqliteStore::new(&db_path, None).await?;

        Ok(Self {
            store: Arc::new(store),
            _temp_dir: temp_dir,
        })
    }

    /// Create a store with the base plugin catalog registered.
    #[allow(dead_code)]
    pub async fn with_catalog() -> StoreResult<Self> {
        let test = Self::new().await?;
        test.store
            .sync_plugins(&fixtures::base_manifests(), false)
            .await?;
        Ok(test)
    }

    /// Get a reference to the store.
    pub fn store(&self) -> Arc<dyn ConfigStore> {
        self.store.clone()
    }
}
