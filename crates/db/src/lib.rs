//! Configuration store abstraction and SQLite implementation for Parapet.
//!
//! This crate provides the configuration control plane:
//! - Setting catalog and enumerated values
//! - Service registry with method ownership
//! - Global and per-service value reconciliation
//! - Custom config fragments
//! - Plugin, job and page metadata sync
//!
//! The store handle returned by [`from_config`] is the single mutation path
//! into these relations; callers hold it explicitly instead of reaching for
//! process-wide state.

pub mod error;
pub mod models;
pub mod repos;
pub mod store;

pub use error::{StoreError, StoreResult};
pub use repos::{
    CustomConfigRepo, CustomConfigUpload, PluginRepo, ServiceRepo, SettingRepo, UpsertOutcome,
    ValueRepo,
};
pub use store::{ConfigStore, SqliteStore};

use parapet_core::StoreConfig;
use std::sync::Arc;

/// Open a configuration store from configuration.
pub async fn from_config(config: &StoreConfig) -> StoreResult<Arc<dyn ConfigStore>> {
    match config {
        StoreConfig::Sqlite {
            path,
            query_timeout_secs,
        } => {
            let store = SqliteStore::new(path, *query_timeout_secs).await?;
            Ok(Arc::new(store) as Arc<dyn ConfigStore>)
        }
    }
}
