//! Store configuration types.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Backend configuration for the configuration store.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum StoreConfig {
    /// SQLite database file.
    Sqlite {
        /// Path to the database file; created if missing.
        path: PathBuf,
        /// Advisory query timeout in seconds.
        query_timeout_secs: Option<u64>,
    },
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self::Sqlite {
            path: PathBuf::from("./data/parapet.db"),
            query_timeout_secs: None,
        }
    }
}
