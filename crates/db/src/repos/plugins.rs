//! Plugin and job metadata repository trait.

use crate::error::StoreResult;
use crate::models::{JobCacheRow, JobRow, PluginRow};
use async_trait::async_trait;
use parapet_core::PluginManifest;
use time::OffsetDateTime;

/// Repository for plugin metadata, jobs and their cached artifacts.
#[async_trait]
pub trait PluginRepo: Send + Sync {
    /// Reconcile the store against a set of plugin manifests.
    ///
    /// Applies field-by-field diffs to plugins, their settings (including
    /// enumerated values), jobs and UI page. A job whose schedule or
    /// reload flag changed has its `last_run` cleared and its cache purged
    /// so the scheduler re-executes it. When `delete_missing` is set,
    /// plugins absent from `manifests` are removed with full cascade.
    async fn sync_plugins(
        &self,
        manifests: &[PluginManifest],
        delete_missing: bool,
    ) -> StoreResult<()>;

    /// List plugins in display order.
    async fn get_plugins(&self) -> StoreResult<Vec<PluginRow>>;

    /// List all declared jobs.
    async fn get_jobs(&self) -> StoreResult<Vec<JobRow>>;

    /// Get a plugin's UI page content, if it ships one.
    async fn get_plugin_page(&self, plugin_id: &str) -> StoreResult<Option<Vec<u8>>>;

    /// Record a successful job run.
    async fn set_job_last_run(
        &self,
        plugin_id: &str,
        job_name: &str,
        at: OffsetDateTime,
    ) -> StoreResult<()>;

    /// Insert or refresh a cached job artifact.
    async fn upsert_job_cache(
        &self,
        job_name: &str,
        service_id: Option<&str>,
        file_name: &str,
        data: &[u8],
        checksum: Option<&str>,
    ) -> StoreResult<()>;

    /// Drop a cached job artifact. `NotFound` when no such entry exists.
    async fn delete_job_cache(
        &self,
        job_name: &str,
        service_id: Option<&str>,
        file_name: &str,
    ) -> StoreResult<()>;

    /// Read a cached job artifact.
    async fn get_job_cache_file(
        &self,
        job_name: &str,
        service_id: Option<&str>,
        file_name: &str,
    ) -> StoreResult<Option<JobCacheRow>>;
}
