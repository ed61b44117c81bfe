//! Database models mapping to the configuration schema.

use sqlx::FromRow;
use time::OffsetDateTime;

// =============================================================================
// Setting catalog
// =============================================================================

/// Setting catalog record: metadata and default for one configuration key.
#[derive(Debug, Clone, FromRow)]
pub struct SettingRow {
    pub id: String,
    pub plugin_id: String,
    pub name: String,
    pub context: String,
    pub default_value: String,
    pub help: String,
    pub label: Option<String>,
    pub regex: String,
    #[sqlx(rename = "type")]
    pub kind: String,
    pub multiple: bool,
    pub display_order: i64,
}

/// Enumerated value of a `select` setting.
#[derive(Debug, Clone, FromRow)]
pub struct SelectRow {
    pub setting_id: String,
    pub value: String,
}

// =============================================================================
// Service registry
// =============================================================================

/// A managed service, tagged with the method that created it.
#[derive(Debug, Clone, FromRow)]
pub struct ServiceRow {
    pub id: String,
    pub method: String,
}

// =============================================================================
// Value store
// =============================================================================

/// Global value row. Only exists when the value diverges from the setting
/// default (default suppression).
#[derive(Debug, Clone, FromRow)]
pub struct GlobalValueRow {
    pub setting_id: String,
    pub suffix: i64,
    pub value: String,
    pub method: String,
}

/// Per-service value row; legal only for `multisite`-context settings.
#[derive(Debug, Clone, FromRow)]
pub struct ServiceValueRow {
    pub service_id: String,
    pub setting_id: String,
    pub suffix: i64,
    pub value: String,
    pub method: String,
}

/// A merged configuration value with its provenance.
///
/// `method` is `"default"` when the value comes straight from the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourcedValue {
    pub value: String,
    pub method: String,
}

// =============================================================================
// Custom configs
// =============================================================================

/// An opaque configuration fragment outside the typed setting system.
/// `service_id = NULL` denotes a global-scope fragment.
#[derive(Debug, Clone, FromRow)]
pub struct CustomConfigRow {
    pub service_id: Option<String>,
    #[sqlx(rename = "type")]
    pub config_type: String,
    pub name: String,
    pub data: Vec<u8>,
    pub checksum: String,
    pub method: String,
}

// =============================================================================
// Plugins, jobs and pages
// =============================================================================

/// Plugin record.
#[derive(Debug, Clone, FromRow)]
pub struct PluginRow {
    pub id: String,
    pub name: String,
    pub description: String,
    pub version: String,
    pub stream: String,
    pub method: String,
    pub data: Option<Vec<u8>>,
    pub checksum: Option<String>,
    pub display_order: i64,
}

/// Scheduled job declared by a plugin.
#[derive(Debug, Clone, FromRow)]
pub struct JobRow {
    pub plugin_id: String,
    pub name: String,
    pub file: String,
    pub every: String,
    pub reload: bool,
    pub last_run: Option<OffsetDateTime>,
}

/// Cached artifact produced by a job run, optionally scoped to a service.
#[derive(Debug, Clone, FromRow)]
pub struct JobCacheRow {
    pub job_name: String,
    pub service_id: Option<String>,
    pub file_name: String,
    pub data: Option<Vec<u8>>,
    pub checksum: Option<String>,
    pub last_update: Option<OffsetDateTime>,
}

/// UI page shipped with a plugin, tracked by checksum.
#[derive(Debug, Clone, FromRow)]
pub struct PluginPageRow {
    pub plugin_id: String,
    pub data: Vec<u8>,
    pub checksum: String,
}
