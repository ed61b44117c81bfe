//! Value store and reconciliation repository trait.

use crate::error::StoreResult;
use crate::models::SourcedValue;
use async_trait::async_trait;
use parapet_core::Method;
use std::collections::BTreeMap;

/// The reconciliation surface over global and per-service values.
///
/// Every write runs inside one transaction: either the whole incoming map
/// is reconciled or nothing is. Unknown keys are skipped with a warning,
/// never fatal to the batch.
#[async_trait]
pub trait ValueRepo: Send + Sync {
    /// Reconcile a full configuration snapshot written by `method`.
    ///
    /// This is authoritative for everything `method` previously wrote:
    /// value rows owned by `method` that the snapshot no longer contains
    /// are retracted, and in multisite mode services owned by `method`
    /// absent from `SERVER_NAME` are deleted.
    async fn save_config(
        &self,
        config: &BTreeMap<String, String>,
        method: Method,
    ) -> StoreResult<()>;

    /// Like [`save_config`](Self::save_config) restricted to global keys:
    /// no service creation, pruning, or prefix resolution.
    async fn save_global_config(
        &self,
        config: &BTreeMap<String, String>,
        method: Method,
    ) -> StoreResult<()>;

    /// Patch one service's values with bare setting keys.
    ///
    /// Fails with `NotFound` for an unknown service and `MethodConflict`
    /// when `method` lacks authority over the service itself; individual
    /// rows still apply the per-row authority rules.
    async fn save_service_config(
        &self,
        service_id: &str,
        config: &BTreeMap<String, String>,
        method: Method,
    ) -> StoreResult<()>;

    /// The fully merged configuration view, values only.
    async fn get_config(&self) -> StoreResult<BTreeMap<String, String>>;

    /// The fully merged configuration view with per-key provenance.
    async fn get_config_with_methods(&self) -> StoreResult<BTreeMap<String, SourcedValue>>;

    /// Only the values that diverge from catalog defaults (stored rows and
    /// their multisite fan-out), with provenance.
    async fn get_non_default_settings(&self) -> StoreResult<BTreeMap<String, SourcedValue>>;
}
