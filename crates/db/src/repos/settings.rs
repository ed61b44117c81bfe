//! Setting catalog repository trait.

use crate::error::StoreResult;
use crate::models::SettingRow;
use async_trait::async_trait;

/// Read access to the setting catalog.
///
/// The catalog is populated and reconciled through
/// [`PluginRepo::sync_plugins`](crate::repos::PluginRepo::sync_plugins);
/// configuration writes never mutate it.
#[async_trait]
pub trait SettingRepo: Send + Sync {
    /// Get a setting by id.
    async fn get_setting(&self, id: &str) -> StoreResult<Option<SettingRow>>;

    /// List the whole catalog in display order.
    async fn list_settings(&self) -> StoreResult<Vec<SettingRow>>;

    /// Enumerated values of a `select` setting, in declaration order.
    async fn get_setting_selects(&self, id: &str) -> StoreResult<Vec<String>>;
}
