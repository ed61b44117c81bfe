//! Custom config repository trait.

use crate::error::StoreResult;
use crate::models::CustomConfigRow;
use async_trait::async_trait;
use parapet_core::Method;

/// Result of an upsert, so callers can tell a fresh insert from a content
/// update from a checksum-identical no-op.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UpsertOutcome {
    Created,
    Updated,
    /// Stored checksum already matches; no write was performed.
    Unchanged,
}

/// One fragment in a bulk [`CustomConfigRepo::replace_custom_configs`] call.
#[derive(Clone, Debug)]
pub struct CustomConfigUpload {
    pub service_id: Option<String>,
    pub config_type: String,
    pub name: String,
    pub data: Vec<u8>,
}

/// Repository for opaque configuration fragments.
#[async_trait]
pub trait CustomConfigRepo: Send + Sync {
    /// Insert or update one fragment identified by `(service_id, type, name)`.
    ///
    /// The checksum is computed from `data` unless supplied. An existing
    /// fragment is only rewritten when the checksum differs and `method`
    /// has authority over the stored owner; `method` becomes the new owner.
    async fn upsert_custom_config(
        &self,
        service_id: Option<&str>,
        config_type: &str,
        name: &str,
        data: &[u8],
        method: Method,
        checksum: Option<&str>,
    ) -> StoreResult<UpsertOutcome>;

    /// Delete one fragment. `NotFound` and `MethodConflict` are distinct
    /// failures.
    async fn delete_custom_config(
        &self,
        service_id: Option<&str>,
        config_type: &str,
        name: &str,
        method: Method,
    ) -> StoreResult<()>;

    /// Full-replace-by-method: wipe every fragment owned by `method`, then
    /// upsert the given list under it. A fragment naming an unknown
    /// service is skipped with a warning.
    async fn replace_custom_configs(
        &self,
        configs: &[CustomConfigUpload],
        method: Method,
    ) -> StoreResult<()>;

    /// List all fragments.
    async fn get_custom_configs(&self) -> StoreResult<Vec<CustomConfigRow>>;

    /// Get one fragment by identity.
    async fn get_custom_config(
        &self,
        service_id: Option<&str>,
        config_type: &str,
        name: &str,
    ) -> StoreResult<Option<CustomConfigRow>>;
}
