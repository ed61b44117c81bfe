//! Configuration store trait and SQLite implementation.

use crate::error::{StoreError, StoreResult};
use crate::repos::{CustomConfigRepo, PluginRepo, ServiceRepo, SettingRepo, ValueRepo};
use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Pool, Sqlite};
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

/// Combined configuration store trait.
///
/// The store is the only component that mutates the value relations, the
/// service registry and the setting catalog; every multi-row algorithm it
/// exposes runs inside a single transaction.
#[async_trait]
pub trait ConfigStore:
    SettingRepo + ServiceRepo + ValueRepo + CustomConfigRepo + PluginRepo + Send + Sync
{
    /// Apply the embedded schema.
    async fn migrate(&self) -> StoreResult<()>;

    /// Check database connectivity and health.
    async fn health_check(&self) -> StoreResult<()>;
}

/// SQLite-based configuration store.
pub struct SqliteStore {
    pool: Pool<Sqlite>,
    #[allow(dead_code)] // Reserved for a future statement timeout wrapper
    query_timeout_secs: u64,
}

impl SqliteStore {
    /// Open (and migrate) a SQLite store.
    pub async fn new(
        path: impl AsRef<Path>,
        query_timeout_secs: Option<u64>,
    ) -> StoreResult<Self> {
        let path = path.as_ref();
        let query_timeout_secs = query_timeout_secs.unwrap_or(600);

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| StoreError::Config(format!("cannot create {parent:?}: {e}")))?;
        }

        let opts = SqliteConnectOptions::from_str(&format!("sqlite:{}?mode=rwc", path.display()))
            .map_err(StoreError::Database)?
            .create_if_missing(true)
            .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal)
            .synchronous(sqlx::sqlite::SqliteSynchronous::Normal)
            .foreign_keys(true)
            // Concurrent writers (UI, scheduler, autoconf) contend on the
            // same file; back off instead of failing with "database is locked".
            .busy_timeout(Duration::from_secs(5));

        let pool = SqlitePoolOptions::new()
            // A single connection serializes the check-then-act sequences in
            // save/sync against concurrent callers within this process.
            .max_connections(1)
            .connect_with(opts)
            .await?;

        let store = Self {
            pool,
            query_timeout_secs,
        };
        store.migrate().await?;

        Ok(store)
    }

    /// Get a reference to the connection pool.
    pub fn pool(&self) -> &Pool<Sqlite> {
        &self.pool
    }

    /// Close the underlying pool. Pending operations fail afterwards.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

#[async_trait]
impl ConfigStore for SqliteStore {
    async fn migrate(&self) -> StoreResult<()> {
        sqlx::query(SCHEMA_SQL).execute(&self.pool).await?;
        Ok(())
    }

    async fn health_check(&self) -> StoreResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

// Implement all the repository traits for SqliteStore
mod sqlite_impl {
    use super::*;
    use crate::models::*;
    use crate::repos::custom_configs::{CustomConfigUpload, UpsertOutcome};
    use parapet_core::{
        ContentHash, JobSpec, MULTISITE_KEY, Method, PluginManifest, ResolvedKey, SERVER_NAME_KEY,
        SettingContext, SettingSpec, ValueScope, resolve_key,
    };
    use sqlx::SqliteConnection;
    use std::collections::{BTreeMap, HashMap, HashSet};
    use time::OffsetDateTime;

    /// A value row's stored method, decoded; a tag sqlx hands back that no
    /// longer parses means the store was edited by hand.
    fn parse_method(tag: &str) -> StoreResult<Method> {
        tag.parse::<Method>()
            .map_err(|_| StoreError::Internal(format!("corrupt method tag '{tag}' in store")))
    }

    fn require_writer(method: Method) -> StoreResult<()> {
        if method.is_writer() {
            Ok(())
        } else {
            Err(StoreError::Validation(format!(
                "'{method}' is not a valid writer method"
            )))
        }
    }

    fn display_key(setting_id: &str, suffix: i64) -> String {
        if suffix > 0 {
            format!("{setting_id}_{suffix}")
        } else {
            setting_id.to_string()
        }
    }

    /// Load the catalog once per transaction: id -> row, plus the
    /// id -> multiple index the key resolver wants.
    async fn load_catalog(
        conn: &mut SqliteConnection,
    ) -> StoreResult<(HashMap<String, SettingRow>, HashMap<String, bool>)> {
        let rows = sqlx::query_as::<_, SettingRow>("SELECT * FROM settings")
            .fetch_all(&mut *conn)
            .await?;
        let multiple = rows
            .iter()
            .map(|row| (row.id.clone(), row.multiple))
            .collect();
        let by_id = rows.into_iter().map(|row| (row.id.clone(), row)).collect();
        Ok((by_id, multiple))
    }

    /// Register a service on first reference.
    async fn ensure_service(
        conn: &mut SqliteConnection,
        id: &str,
        method: Method,
    ) -> StoreResult<()> {
        let inserted = sqlx::query("INSERT OR IGNORE INTO services (id, method) VALUES (?, ?)")
            .bind(id)
            .bind(method.as_str())
            .execute(&mut *conn)
            .await?;
        if inserted.rows_affected() > 0 {
            tracing::debug!(service = id, method = %method, "registered service");
        }
        Ok(())
    }

    /// Reconcile one global value against the incoming `(suffix, value)`.
    ///
    /// Default suppression: a value equal to the catalog default is never
    /// stored, and an authorized revert to default deletes the row instead
    /// of writing it.
    async fn reconcile_global(
        conn: &mut SqliteConnection,
        meta: &SettingRow,
        suffix: i64,
        value: &str,
        method: Method,
    ) -> StoreResult<()> {
        let existing = sqlx::query_as::<_, GlobalValueRow>(
            "SELECT * FROM global_values WHERE setting_id = ? AND suffix = ?",
        )
        .bind(&meta.id)
        .bind(suffix)
        .fetch_optional(&mut *conn)
        .await?;

        let is_default = value == meta.default_value;

        match existing {
            None => {
                if !is_default {
                    tracing::debug!(setting = %meta.id, suffix, "adding global value");
                    sqlx::query(
                        "INSERT INTO global_values (setting_id, suffix, value, method) VALUES (?, ?, ?, ?)",
                    )
                    .bind(&meta.id)
                    .bind(suffix)
                    .bind(value)
                    .bind(method.as_str())
                    .execute(&mut *conn)
                    .await?;
                }
            }
            Some(row) => {
                let owner = parse_method(&row.method)?;
                if !method.can_overwrite(owner, ValueScope::Global) {
                    tracing::debug!(
                        setting = %meta.id,
                        suffix,
                        owner = %owner,
                        "global value owned by another method, leaving untouched"
                    );
                    return Ok(());
                }
                if is_default {
                    tracing::debug!(setting = %meta.id, suffix, "removing global value reverted to default");
                    sqlx::query("DELETE FROM global_values WHERE setting_id = ? AND suffix = ?")
                        .bind(&meta.id)
                        .bind(suffix)
                        .execute(&mut *conn)
                        .await?;
                } else if row.value != value {
                    tracing::debug!(setting = %meta.id, suffix, "updating global value");
                    sqlx::query(
                        "UPDATE global_values SET value = ?, method = ? WHERE setting_id = ? AND suffix = ?",
                    )
                    .bind(value)
                    .bind(method.as_str())
                    .bind(&meta.id)
                    .bind(suffix)
                    .execute(&mut *conn)
                    .await?;
                }
            }
        }
        Ok(())
    }

    /// Reconcile one per-service value. Same shape as [`reconcile_global`]
    /// with the wider service-scope overwrite authority.
    async fn reconcile_service(
        conn: &mut SqliteConnection,
        meta: &SettingRow,
        service_id: &str,
        suffix: i64,
        value: &str,
        method: Method,
    ) -> StoreResult<()> {
        if meta.context != SettingContext::Multisite.as_str() {
            tracing::warn!(
                setting = %meta.id,
                service = service_id,
                "setting is not multisite-context, skipping service value"
            );
            return Ok(());
        }

        let existing = sqlx::query_as::<_, ServiceValueRow>(
            "SELECT * FROM service_values WHERE service_id = ? AND setting_id = ? AND suffix = ?",
        )
        .bind(service_id)
        .bind(&meta.id)
        .bind(suffix)
        .fetch_optional(&mut *conn)
        .await?;

        // A service's SERVER_NAME is its identity and always persists, even
        // when it happens to equal the catalog default.
        let is_default = value == meta.default_value && meta.id != SERVER_NAME_KEY;

        match existing {
            None => {
                if !is_default {
                    tracing::debug!(setting = %meta.id, service = service_id, suffix, "adding service value");
                    sqlx::query(
                        "INSERT INTO service_values (service_id, setting_id, suffix, value, method) VALUES (?, ?, ?, ?, ?)",
                    )
                    .bind(service_id)
                    .bind(&meta.id)
                    .bind(suffix)
                    .bind(value)
                    .bind(method.as_str())
                    .execute(&mut *conn)
                    .await?;
                }
            }
            Some(row) => {
                let owner = parse_method(&row.method)?;
                if !method.can_overwrite(owner, ValueScope::Service) {
                    tracing::debug!(
                        setting = %meta.id,
                        service = service_id,
                        suffix,
                        owner = %owner,
                        "service value owned by another method, leaving untouched"
                    );
                    return Ok(());
                }
                if is_default {
                    tracing::debug!(setting = %meta.id, service = service_id, suffix, "removing service value reverted to default");
                    sqlx::query(
                        "DELETE FROM service_values WHERE service_id = ? AND setting_id = ? AND suffix = ?",
                    )
                    .bind(service_id)
                    .bind(&meta.id)
                    .bind(suffix)
                    .execute(&mut *conn)
                    .await?;
                } else if row.value != value {
                    tracing::debug!(setting = %meta.id, service = service_id, suffix, "updating service value");
                    sqlx::query(
                        "UPDATE service_values SET value = ?, method = ? WHERE service_id = ? AND setting_id = ? AND suffix = ?",
                    )
                    .bind(value)
                    .bind(method.as_str())
                    .bind(service_id)
                    .bind(&meta.id)
                    .bind(suffix)
                    .execute(&mut *conn)
                    .await?;
                }
            }
        }
        Ok(())
    }

    #[async_trait]
    impl SettingRepo for SqliteStore {
        async fn get_setting(&self, id: &str) -> StoreResult<Option<SettingRow>> {
            let row = sqlx::query_as::<_, SettingRow>("SELECT * FROM settings WHERE id = ?")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
            Ok(row)
        }

        async fn list_settings(&self) -> StoreResult<Vec<SettingRow>> {
            let rows = sqlx::query_as::<_, SettingRow>(
                "SELECT * FROM settings ORDER BY display_order, id",
            )
            .fetch_all(&self.pool)
            .await?;
            Ok(rows)
        }

        async fn get_setting_selects(&self, id: &str) -> StoreResult<Vec<String>> {
            let rows: Vec<(String,)> =
                sqlx::query_as("SELECT value FROM selects WHERE setting_id = ? ORDER BY value")
                    .bind(id)
                    .fetch_all(&self.pool)
                    .await?;
            Ok(rows.into_iter().map(|(v,)| v).collect())
        }
    }

    #[async_trait]
    impl ServiceRepo for SqliteStore {
        async fn list_services(&self) -> StoreResult<Vec<ServiceRow>> {
            let rows = sqlx::query_as::<_, ServiceRow>("SELECT * FROM services ORDER BY id")
                .fetch_all(&self.pool)
                .await?;
            Ok(rows)
        }

        async fn get_service(&self, id: &str) -> StoreResult<Option<ServiceRow>> {
            let row = sqlx::query_as::<_, ServiceRow>("SELECT * FROM services WHERE id = ?")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
            Ok(row)
        }

        async fn remove_service(&self, id: &str, method: Method) -> StoreResult<()> {
            require_writer(method)?;
            let mut tx = self.pool.begin().await?;

            let service = sqlx::query_as::<_, ServiceRow>("SELECT * FROM services WHERE id = ?")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?
                .ok_or_else(|| StoreError::NotFound(format!("service '{id}'")))?;

            let owner = parse_method(&service.method)?;
            if !method.can_overwrite(owner, ValueScope::Service) {
                return Err(StoreError::conflict(format!("service '{id}'"), owner));
            }

            // Values, custom configs and job cache rows cascade with the row.
            sqlx::query("DELETE FROM services WHERE id = ?")
                .bind(id)
                .execute(&mut *tx)
                .await?;

            tx.commit().await?;
            tracing::debug!(service = id, method = %method, "removed service");
            Ok(())
        }
    }

    #[async_trait]
    impl ValueRepo for SqliteStore {
        async fn save_config(
            &self,
            config: &BTreeMap<String, String>,
            method: Method,
        ) -> StoreResult<()> {
            require_writer(method)?;
            let mut tx = self.pool.begin().await?;

            // This call is authoritative for everything `method` previously
            // wrote: anything it no longer states is retracted.
            sqlx::query("DELETE FROM global_values WHERE method = ?")
                .bind(method.as_str())
                .execute(&mut *tx)
                .await?;
            sqlx::query("DELETE FROM service_values WHERE method = ?")
                .bind(method.as_str())
                .execute(&mut *tx)
                .await?;

            let (catalog, known) = load_catalog(&mut *tx).await?;

            let multisite = config
                .get(MULTISITE_KEY)
                .map(|v| v == "yes")
                .unwrap_or(false);

            let mut services: Vec<String> = Vec::new();
            if multisite {
                services = config
                    .get(SERVER_NAME_KEY)
                    .map(|names| names.split_whitespace().map(str::to_string).collect())
                    .unwrap_or_default();

                // Prune services this method owns that fell out of the set;
                // services owned by other methods survive.
                let registered = sqlx::query_as::<_, ServiceRow>("SELECT * FROM services")
                    .fetch_all(&mut *tx)
                    .await?;
                for service in &registered {
                    if service.method == method.as_str()
                        && !services.iter().any(|id| id == &service.id)
                    {
                        tracing::debug!(service = %service.id, "pruning service absent from SERVER_NAME");
                        sqlx::query("DELETE FROM services WHERE id = ?")
                            .bind(&service.id)
                            .execute(&mut *tx)
                            .await?;
                    }
                }

                for id in &services {
                    ensure_service(&mut *tx, id, method).await?;
                }
            } else if let Some(server_name) = config.get(SERVER_NAME_KEY) {
                if let Some(first) = server_name.split_whitespace().next() {
                    ensure_service(&mut *tx, first, method).await?;
                }
            }

            for (key, value) in config {
                match resolve_key(key, &known, &services) {
                    Some(ResolvedKey::Global { setting_id, suffix }) => {
                        let meta = &catalog[setting_id];
                        reconcile_global(&mut *tx, meta, suffix, value, method).await?;
                    }
                    Some(ResolvedKey::Service {
                        service_id,
                        setting_id,
                        suffix,
                    }) => {
                        let meta = &catalog[setting_id];
                        reconcile_service(&mut *tx, meta, service_id, suffix, value, method).await?;
                    }
                    None => {
                        tracing::warn!(key = %key, "unknown setting, skipping");
                    }
                }
            }

            tx.commit().await?;
            Ok(())
        }

        async fn save_global_config(
            &self,
            config: &BTreeMap<String, String>,
            method: Method,
        ) -> StoreResult<()> {
            require_writer(method)?;
            let mut tx = self.pool.begin().await?;

            sqlx::query("DELETE FROM global_values WHERE method = ?")
                .bind(method.as_str())
                .execute(&mut *tx)
                .await?;

            let (catalog, known) = load_catalog(&mut *tx).await?;

            for (key, value) in config {
                match resolve_key(key, &known, &[]) {
                    Some(ResolvedKey::Global { setting_id, suffix }) => {
                        let meta = &catalog[setting_id];
                        reconcile_global(&mut *tx, meta, suffix, value, method).await?;
                    }
                    _ => {
                        tracing::warn!(key = %key, "unknown setting, skipping");
                    }
                }
            }

            tx.commit().await?;
            Ok(())
        }

        async fn save_service_config(
            &self,
            service_id: &str,
            config: &BTreeMap<String, String>,
            method: Method,
        ) -> StoreResult<()> {
            require_writer(method)?;
            let mut tx = self.pool.begin().await?;

            let service = sqlx::query_as::<_, ServiceRow>("SELECT * FROM services WHERE id = ?")
                .bind(service_id)
                .fetch_optional(&mut *tx)
                .await?
                .ok_or_else(|| StoreError::NotFound(format!("service '{service_id}'")))?;

            let owner = parse_method(&service.method)?;
            if !method.can_overwrite(owner, ValueScope::Service) {
                return Err(StoreError::conflict(format!("service '{service_id}'"), owner));
            }

            let (catalog, known) = load_catalog(&mut *tx).await?;

            for (key, value) in config {
                match resolve_key(key, &known, &[]) {
                    Some(ResolvedKey::Global { setting_id, suffix }) => {
                        let meta = &catalog[setting_id];
                        reconcile_service(&mut *tx, meta, service_id, suffix, value, method).await?;
                    }
                    _ => {
                        tracing::warn!(key = %key, service = service_id, "unknown setting, skipping");
                    }
                }
            }

            tx.commit().await?;
            Ok(())
        }

        async fn get_config(&self) -> StoreResult<BTreeMap<String, String>> {
            let view = self.get_config_with_methods().await?;
            Ok(view
                .into_iter()
                .map(|(key, sourced)| (key, sourced.value))
                .collect())
        }

        async fn get_config_with_methods(&self) -> StoreResult<BTreeMap<String, SourcedValue>> {
            let settings = self.list_settings().await?;

            // Catalog defaults seed the base view with synthetic provenance.
            let mut view: BTreeMap<String, SourcedValue> = settings
                .iter()
                .map(|s| {
                    (
                        s.id.clone(),
                        SourcedValue {
                            value: s.default_value.clone(),
                            method: Method::Default.as_str().to_string(),
                        },
                    )
                })
                .collect();

            overlay_globals(&self.pool, &mut view).await?;
            fan_out_services(&self.pool, &settings, &mut view).await?;
            Ok(view)
        }

        async fn get_non_default_settings(&self) -> StoreResult<BTreeMap<String, SourcedValue>> {
            let settings = self.list_settings().await?;
            let mut view = BTreeMap::new();
            overlay_globals(&self.pool, &mut view).await?;

            // Without the defaults base, the multisite flag may only exist
            // as a stored row; fall back to the catalog default.
            let multisite_default = settings
                .iter()
                .find(|s| s.id == MULTISITE_KEY)
                .map(|s| s.default_value.clone())
                .unwrap_or_default();
            let multisite = view
                .get(MULTISITE_KEY)
                .map(|v| v.value.as_str())
                .unwrap_or(&multisite_default)
                == "yes";
            if multisite {
                fan_out_into(&self.pool, &settings, &mut view).await?;
            }
            Ok(view)
        }
    }

    /// Overlay every stored global row onto `view`, any suffix, holes
    /// preserved.
    async fn overlay_globals(
        pool: &Pool<Sqlite>,
        view: &mut BTreeMap<String, SourcedValue>,
    ) -> StoreResult<()> {
        let globals = sqlx::query_as::<_, GlobalValueRow>(
            "SELECT * FROM global_values ORDER BY setting_id, suffix",
        )
        .fetch_all(pool)
        .await?;
        for row in globals {
            view.insert(
                display_key(&row.setting_id, row.suffix),
                SourcedValue {
                    value: row.value,
                    method: row.method,
                },
            );
        }
        Ok(())
    }

    /// Fan out multisite settings to every registered service when the
    /// merged `MULTISITE` flag says so.
    async fn fan_out_services(
        pool: &Pool<Sqlite>,
        settings: &[SettingRow],
        view: &mut BTreeMap<String, SourcedValue>,
    ) -> StoreResult<()> {
        let multisite = view
            .get(MULTISITE_KEY)
            .map(|v| v.value == "yes")
            .unwrap_or(false);
        if multisite {
            fan_out_into(pool, settings, view).await?;
        }
        Ok(())
    }

    async fn fan_out_into(
        pool: &Pool<Sqlite>,
        settings: &[SettingRow],
        view: &mut BTreeMap<String, SourcedValue>,
    ) -> StoreResult<()> {
        let services = sqlx::query_as::<_, ServiceRow>("SELECT * FROM services ORDER BY id")
            .fetch_all(pool)
            .await?;
        if services.is_empty() {
            return Ok(());
        }

        let overrides: HashMap<(String, String, i64), ServiceValueRow> =
            sqlx::query_as::<_, ServiceValueRow>("SELECT * FROM service_values")
                .fetch_all(pool)
                .await?
                .into_iter()
                .map(|row| {
                    (
                        (row.service_id.clone(), row.setting_id.clone(), row.suffix),
                        row,
                    )
                })
                .collect();

        // Fan-out reads the global-level view as it stood before any
        // service keys were added.
        let global_view = view.clone();

        for service in &services {
            for setting in settings {
                if setting.context != SettingContext::Multisite.as_str() {
                    continue;
                }
                // Consecutive suffix probing; the probe ends at the first
                // suffix with neither a global value nor a service override.
                // Gaps are not compacted. TODO(product): confirm whether a
                // gap in a multi-instance family should really cut the
                // fan-out short, or is just residue of non-contiguous
                // deletes (see get_config docs).
                let mut suffix: i64 = 0;
                loop {
                    let global_key = display_key(&setting.id, suffix);
                    let fanned_key = format!("{}_{}", service.id, global_key);
                    let service_override =
                        overrides.get(&(service.id.clone(), setting.id.clone(), suffix));

                    match service_override {
                        Some(row) => {
                            view.insert(
                                fanned_key,
                                SourcedValue {
                                    value: row.value.clone(),
                                    method: row.method.clone(),
                                },
                            );
                        }
                        None => match global_view.get(&global_key) {
                            Some(sourced) => {
                                view.insert(fanned_key, sourced.clone());
                            }
                            None => break,
                        },
                    }
                    suffix += 1;
                }
            }
        }
        Ok(())
    }

    #[async_trait]
    impl CustomConfigRepo for SqliteStore {
        async fn upsert_custom_config(
            &self,
            service_id: Option<&str>,
            config_type: &str,
            name: &str,
            data: &[u8],
            method: Method,
            checksum: Option<&str>,
        ) -> StoreResult<UpsertOutcome> {
            require_writer(method)?;
            let mut tx = self.pool.begin().await?;

            if let Some(service) = service_id {
                let known: Option<(String,)> =
                    sqlx::query_as("SELECT id FROM services WHERE id = ?")
                        .bind(service)
                        .fetch_optional(&mut *tx)
                        .await?;
                if known.is_none() {
                    return Err(StoreError::NotFound(format!("service '{service}'")));
                }
            }

            let checksum = checksum
                .map(str::to_string)
                .unwrap_or_else(|| ContentHash::compute(data).to_hex());

            let existing = sqlx::query_as::<_, CustomConfigRow>(
                "SELECT * FROM custom_configs WHERE service_id IS ? AND type = ? AND name = ?",
            )
            .bind(service_id)
            .bind(config_type)
            .bind(name)
            .fetch_optional(&mut *tx)
            .await?;

            let outcome = match existing {
                None => {
                    sqlx::query(
                        "INSERT INTO custom_configs (service_id, type, name, data, checksum, method) VALUES (?, ?, ?, ?, ?, ?)",
                    )
                    .bind(service_id)
                    .bind(config_type)
                    .bind(name)
                    .bind(data)
                    .bind(&checksum)
                    .bind(method.as_str())
                    .execute(&mut *tx)
                    .await?;
                    UpsertOutcome::Created
                }
                Some(row) => {
                    if row.checksum == checksum {
                        // Identical content: no write, whoever owns it.
                        UpsertOutcome::Unchanged
                    } else {
                        let owner = parse_method(&row.method)?;
                        if !method.can_replace(owner) {
                            return Err(StoreError::conflict(
                                format!("custom config '{config_type}/{name}'"),
                                owner,
                            ));
                        }
                        sqlx::query(
                            "UPDATE custom_configs SET data = ?, checksum = ?, method = ? WHERE service_id IS ? AND type = ? AND name = ?",
                        )
                        .bind(data)
                        .bind(&checksum)
                        .bind(method.as_str())
                        .bind(service_id)
                        .bind(config_type)
                        .bind(name)
                        .execute(&mut *tx)
                        .await?;
                        UpsertOutcome::Updated
                    }
                }
            };

            tx.commit().await?;
            Ok(outcome)
        }

        async fn delete_custom_config(
            &self,
            service_id: Option<&str>,
            config_type: &str,
            name: &str,
            method: Method,
        ) -> StoreResult<()> {
            require_writer(method)?;
            let mut tx = self.pool.begin().await?;

            let existing = sqlx::query_as::<_, CustomConfigRow>(
                "SELECT * FROM custom_configs WHERE service_id IS ? AND type = ? AND name = ?",
            )
            .bind(service_id)
            .bind(config_type)
            .bind(name)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| {
                StoreError::NotFound(format!("custom config '{config_type}/{name}'"))
            })?;

            let owner = parse_method(&existing.method)?;
            if !method.can_replace(owner) {
                return Err(StoreError::conflict(
                    format!("custom config '{config_type}/{name}'"),
                    owner,
                ));
            }

            sqlx::query(
                "DELETE FROM custom_configs WHERE service_id IS ? AND type = ? AND name = ?",
            )
            .bind(service_id)
            .bind(config_type)
            .bind(name)
            .execute(&mut *tx)
            .await?;

            tx.commit().await?;
            Ok(())
        }

        async fn replace_custom_configs(
            &self,
            configs: &[CustomConfigUpload],
            method: Method,
        ) -> StoreResult<()> {
            require_writer(method)?;
            let mut tx = self.pool.begin().await?;

            // Full-replace-by-method: fragments this method no longer ships
            // are retracted before the new set goes in.
            sqlx::query("DELETE FROM custom_configs WHERE method = ?")
                .bind(method.as_str())
                .execute(&mut *tx)
                .await?;

            for config in configs {
                if let Some(service) = config.service_id.as_deref() {
                    let known: Option<(String,)> =
                        sqlx::query_as("SELECT id FROM services WHERE id = ?")
                            .bind(service)
                            .fetch_optional(&mut *tx)
                            .await?;
                    if known.is_none() {
                        tracing::warn!(
                            service,
                            config = %config.name,
                            "custom config names an unknown service, skipping"
                        );
                        continue;
                    }
                }

                let checksum = ContentHash::compute(&config.data).to_hex();
                let existing = sqlx::query_as::<_, CustomConfigRow>(
                    "SELECT * FROM custom_configs WHERE service_id IS ? AND type = ? AND name = ?",
                )
                .bind(config.service_id.as_deref())
                .bind(&config.config_type)
                .bind(&config.name)
                .fetch_optional(&mut *tx)
                .await?;

                match existing {
                    None => {
                        sqlx::query(
                            "INSERT INTO custom_configs (service_id, type, name, data, checksum, method) VALUES (?, ?, ?, ?, ?, ?)",
                        )
                        .bind(config.service_id.as_deref())
                        .bind(&config.config_type)
                        .bind(&config.name)
                        .bind(&config.data)
                        .bind(&checksum)
                        .bind(method.as_str())
                        .execute(&mut *tx)
                        .await?;
                    }
                    Some(row) => {
                        if row.checksum == checksum {
                            continue;
                        }
                        let owner = parse_method(&row.method)?;
                        if !method.can_replace(owner) {
                            tracing::warn!(
                                config = %config.name,
                                owner = %owner,
                                "custom config owned by another method, skipping"
                            );
                            continue;
                        }
                        sqlx::query(
                            "UPDATE custom_configs SET data = ?, checksum = ?, method = ? WHERE service_id IS ? AND type = ? AND name = ?",
                        )
                        .bind(&config.data)
                        .bind(&checksum)
                        .bind(method.as_str())
                        .bind(config.service_id.as_deref())
                        .bind(&config.config_type)
                        .bind(&config.name)
                        .execute(&mut *tx)
                        .await?;
                    }
                }
            }

            tx.commit().await?;
            Ok(())
        }

        async fn get_custom_configs(&self) -> StoreResult<Vec<CustomConfigRow>> {
            let rows = sqlx::query_as::<_, CustomConfigRow>(
                "SELECT * FROM custom_configs ORDER BY service_id, type, name",
            )
            .fetch_all(&self.pool)
            .await?;
            Ok(rows)
        }

        async fn get_custom_config(
            &self,
            service_id: Option<&str>,
            config_type: &str,
            name: &str,
        ) -> StoreResult<Option<CustomConfigRow>> {
            let row = sqlx::query_as::<_, CustomConfigRow>(
                "SELECT * FROM custom_configs WHERE service_id IS ? AND type = ? AND name = ?",
            )
            .bind(service_id)
            .bind(config_type)
            .bind(name)
            .fetch_optional(&self.pool)
            .await?;
            Ok(row)
        }
    }

    /// Field-by-field settings diff within a plugin sync.
    async fn sync_setting(
        conn: &mut SqliteConnection,
        plugin_id: &str,
        spec: &SettingSpec,
        order: i64,
    ) -> StoreResult<()> {
        let existing = sqlx::query_as::<_, SettingRow>("SELECT * FROM settings WHERE id = ?")
            .bind(&spec.id)
            .fetch_optional(&mut *conn)
            .await?;

        match existing {
            Some(row) if row.plugin_id != plugin_id => {
                // Setting ids are unique across the whole catalog.
                tracing::warn!(
                    setting = %spec.id,
                    plugin = plugin_id,
                    owner = %row.plugin_id,
                    "setting already owned by another plugin, skipping"
                );
                return Ok(());
            }
            Some(row) => {
                let changed = row.name != spec.name
                    || row.context != spec.context.as_str()
                    || row.default_value != spec.default
                    || row.help != spec.help
                    || row.label != spec.label
                    || row.regex != spec.regex
                    || row.kind != spec.kind.as_str()
                    || row.multiple != spec.multiple
                    || row.display_order != order;
                if changed {
                    sqlx::query(
                        "UPDATE settings SET name = ?, context = ?, default_value = ?, help = ?, label = ?, regex = ?, type = ?, multiple = ?, display_order = ? WHERE id = ?",
                    )
                    .bind(&spec.name)
                    .bind(spec.context.as_str())
                    .bind(&spec.default)
                    .bind(&spec.help)
                    .bind(&spec.label)
                    .bind(&spec.regex)
                    .bind(spec.kind.as_str())
                    .bind(spec.multiple)
                    .bind(order)
                    .bind(&spec.id)
                    .execute(&mut *conn)
                    .await?;
                }
            }
            None => {
                sqlx::query(
                    "INSERT INTO settings (id, plugin_id, name, context, default_value, help, label, regex, type, multiple, display_order) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
                )
                .bind(&spec.id)
                .bind(plugin_id)
                .bind(&spec.name)
                .bind(spec.context.as_str())
                .bind(&spec.default)
                .bind(&spec.help)
                .bind(&spec.label)
                .bind(&spec.regex)
                .bind(spec.kind.as_str())
                .bind(spec.multiple)
                .bind(order)
                .execute(&mut *conn)
                .await?;
            }
        }

        // Enumerated values reconcile as a set difference.
        let current: HashSet<String> =
            sqlx::query_as::<_, (String,)>("SELECT value FROM selects WHERE setting_id = ?")
                .bind(&spec.id)
                .fetch_all(&mut *conn)
                .await?
                .into_iter()
                .map(|(v,)| v)
                .collect();
        let wanted: HashSet<String> = spec.select.iter().cloned().collect();

        for extra in current.difference(&wanted) {
            sqlx::query("DELETE FROM selects WHERE setting_id = ? AND value = ?")
                .bind(&spec.id)
                .bind(extra)
                .execute(&mut *conn)
                .await?;
        }
        for missing in wanted.difference(&current) {
            sqlx::query("INSERT INTO selects (setting_id, value) VALUES (?, ?)")
                .bind(&spec.id)
                .bind(missing)
                .execute(&mut *conn)
                .await?;
        }
        Ok(())
    }

    /// Jobs diff within a plugin sync. A schedule or reload change clears
    /// `last_run` and purges the cache so the scheduler re-executes the job.
    async fn sync_job(
        conn: &mut SqliteConnection,
        plugin_id: &str,
        job: &JobSpec,
        existing: Option<&JobRow>,
    ) -> StoreResult<()> {
        match existing {
            None => {
                sqlx::query(
                    "INSERT INTO jobs (plugin_id, name, file, every, reload, last_run) VALUES (?, ?, ?, ?, ?, NULL)",
                )
                .bind(plugin_id)
                .bind(&job.name)
                .bind(&job.file)
                .bind(job.every.as_str())
                .bind(job.reload)
                .execute(&mut *conn)
                .await?;
            }
            Some(row) => {
                let schedule_changed =
                    row.every != job.every.as_str() || row.reload != job.reload;
                if schedule_changed {
                    tracing::debug!(job = %job.name, "job schedule changed, forcing re-execution");
                    sqlx::query(
                        "UPDATE jobs SET file = ?, every = ?, reload = ?, last_run = NULL WHERE plugin_id = ? AND name = ?",
                    )
                    .bind(&job.file)
                    .bind(job.every.as_str())
                    .bind(job.reload)
                    .bind(plugin_id)
                    .bind(&job.name)
                    .execute(&mut *conn)
                    .await?;
                    sqlx::query("DELETE FROM jobs_cache WHERE job_name = ?")
                        .bind(&job.name)
                        .execute(&mut *conn)
                        .await?;
                } else if row.file != job.file {
                    sqlx::query(
                        "UPDATE jobs SET file = ? WHERE plugin_id = ? AND name = ?",
                    )
                    .bind(&job.file)
                    .bind(plugin_id)
                    .bind(&job.name)
                    .execute(&mut *conn)
                    .await?;
                }
            }
        }
        Ok(())
    }

    #[async_trait]
    impl PluginRepo for SqliteStore {
        async fn sync_plugins(
            &self,
            manifests: &[PluginManifest],
            delete_missing: bool,
        ) -> StoreResult<()> {
            let mut tx = self.pool.begin().await?;

            if delete_missing {
                let db_ids: Vec<(String,)> = sqlx::query_as("SELECT id FROM plugins")
                    .fetch_all(&mut *tx)
                    .await?;
                let keep: HashSet<&str> = manifests.iter().map(|m| m.id.as_str()).collect();
                for (id,) in &db_ids {
                    if keep.contains(id.as_str()) {
                        continue;
                    }
                    tracing::debug!(plugin = %id, "removing plugin absent from manifest set");
                    let jobs: Vec<(String,)> =
                        sqlx::query_as("SELECT name FROM jobs WHERE plugin_id = ?")
                            .bind(id)
                            .fetch_all(&mut *tx)
                            .await?;
                    for (job_name,) in jobs {
                        sqlx::query("DELETE FROM jobs_cache WHERE job_name = ?")
                            .bind(&job_name)
                            .execute(&mut *tx)
                            .await?;
                    }
                    // Settings, their selects and value rows, jobs and the
                    // page cascade with the plugin row.
                    sqlx::query("DELETE FROM plugins WHERE id = ?")
                        .bind(id)
                        .execute(&mut *tx)
                        .await?;
                }
            }

            for (position, manifest) in manifests.iter().enumerate() {
                require_writer(manifest.method)?;
                let order = position as i64;

                let db_plugin =
                    sqlx::query_as::<_, PluginRow>("SELECT * FROM plugins WHERE id = ?")
                        .bind(&manifest.id)
                        .fetch_optional(&mut *tx)
                        .await?;

                match db_plugin {
                    Some(row) => {
                        let owner = parse_method(&row.method)?;
                        if !manifest.method.can_replace(owner) {
                            tracing::warn!(
                                plugin = %manifest.id,
                                owner = %owner,
                                "plugin already registered by another method, skipping update"
                            );
                            continue;
                        }
                        let changed = row.name != manifest.name
                            || row.description != manifest.description
                            || row.version != manifest.version
                            || row.stream != manifest.stream
                            || row.method != manifest.method.as_str()
                            || row.checksum != manifest.checksum
                            || row.display_order != order;
                        if changed {
                            sqlx::query(
                                "UPDATE plugins SET name = ?, description = ?, version = ?, stream = ?, method = ?, data = ?, checksum = ?, display_order = ? WHERE id = ?",
                            )
                            .bind(&manifest.name)
                            .bind(&manifest.description)
                            .bind(&manifest.version)
                            .bind(&manifest.stream)
                            .bind(manifest.method.as_str())
                            .bind(&manifest.data)
                            .bind(&manifest.checksum)
                            .bind(order)
                            .bind(&manifest.id)
                            .execute(&mut *tx)
                            .await?;
                        }
                    }
                    None => {
                        sqlx::query(
                            "INSERT INTO plugins (id, name, description, version, stream, method, data, checksum, display_order) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
                        )
                        .bind(&manifest.id)
                        .bind(&manifest.name)
                        .bind(&manifest.description)
                        .bind(&manifest.version)
                        .bind(&manifest.stream)
                        .bind(manifest.method.as_str())
                        .bind(&manifest.data)
                        .bind(&manifest.checksum)
                        .bind(order)
                        .execute(&mut *tx)
                        .await?;
                    }
                }

                // Orphaned settings cascade to selects and value rows.
                let db_setting_ids: Vec<(String,)> =
                    sqlx::query_as("SELECT id FROM settings WHERE plugin_id = ?")
                        .bind(&manifest.id)
                        .fetch_all(&mut *tx)
                        .await?;
                let declared: HashSet<&str> =
                    manifest.settings.iter().map(|s| s.id.as_str()).collect();
                for (setting_id,) in &db_setting_ids {
                    if !declared.contains(setting_id.as_str()) {
                        tracing::debug!(setting = %setting_id, "removing setting absent from manifest");
                        sqlx::query("DELETE FROM settings WHERE id = ?")
                            .bind(setting_id)
                            .execute(&mut *tx)
                            .await?;
                    }
                }
                for (order, spec) in manifest.settings.iter().enumerate() {
                    sync_setting(&mut *tx, &manifest.id, spec, order as i64).await?;
                }

                // Jobs.
                let db_jobs = sqlx::query_as::<_, JobRow>("SELECT * FROM jobs WHERE plugin_id = ?")
                    .bind(&manifest.id)
                    .fetch_all(&mut *tx)
                    .await?;
                let declared: HashSet<&str> = manifest.jobs.iter().map(|j| j.name.as_str()).collect();
                for row in &db_jobs {
                    if !declared.contains(row.name.as_str()) {
                        tracing::debug!(job = %row.name, "removing job absent from manifest");
                        sqlx::query("DELETE FROM jobs_cache WHERE job_name = ?")
                            .bind(&row.name)
                            .execute(&mut *tx)
                            .await?;
                        sqlx::query("DELETE FROM jobs WHERE plugin_id = ? AND name = ?")
                            .bind(&manifest.id)
                            .bind(&row.name)
                            .execute(&mut *tx)
                            .await?;
                    }
                }
                for job in &manifest.jobs {
                    let existing = db_jobs.iter().find(|row| row.name == job.name);
                    sync_job(&mut *tx, &manifest.id, job, existing).await?;
                }

                // UI page, tracked by checksum so unchanged content is a no-op.
                let db_page: Option<(String,)> =
                    sqlx::query_as("SELECT checksum FROM plugin_pages WHERE plugin_id = ?")
                        .bind(&manifest.id)
                        .fetch_optional(&mut *tx)
                        .await?;
                match (&manifest.page, db_page) {
                    (None, Some(_)) => {
                        sqlx::query("DELETE FROM plugin_pages WHERE plugin_id = ?")
                            .bind(&manifest.id)
                            .execute(&mut *tx)
                            .await?;
                    }
                    (Some(page), None) => {
                        sqlx::query(
                            "INSERT INTO plugin_pages (plugin_id, data, checksum) VALUES (?, ?, ?)",
                        )
                        .bind(&manifest.id)
                        .bind(&page.data)
                        .bind(page.checksum().to_hex())
                        .execute(&mut *tx)
                        .await?;
                    }
                    (Some(page), Some((stored,))) => {
                        let checksum = page.checksum().to_hex();
                        if checksum != stored {
                            sqlx::query(
                                "UPDATE plugin_pages SET data = ?, checksum = ? WHERE plugin_id = ?",
                            )
                            .bind(&page.data)
                            .bind(&checksum)
                            .bind(&manifest.id)
                            .execute(&mut *tx)
                            .await?;
                        }
                    }
                    (None, None) => {}
                }
            }

            tx.commit().await?;
            Ok(())
        }

        async fn get_plugins(&self) -> StoreResult<Vec<PluginRow>> {
            let rows = sqlx::query_as::<_, PluginRow>(
                "SELECT * FROM plugins ORDER BY display_order, id",
            )
            .fetch_all(&self.pool)
            .await?;
            Ok(rows)
        }

        async fn get_jobs(&self) -> StoreResult<Vec<JobRow>> {
            let rows =
                sqlx::query_as::<_, JobRow>("SELECT * FROM jobs ORDER BY plugin_id, name")
                    .fetch_all(&self.pool)
                    .await?;
            Ok(rows)
        }

        async fn get_plugin_page(&self, plugin_id: &str) -> StoreResult<Option<Vec<u8>>> {
            let row: Option<(Vec<u8>,)> =
                sqlx::query_as("SELECT data FROM plugin_pages WHERE plugin_id = ?")
                    .bind(plugin_id)
                    .fetch_optional(&self.pool)
                    .await?;
            Ok(row.map(|(data,)| data))
        }

        async fn set_job_last_run(
            &self,
            plugin_id: &str,
            job_name: &str,
            at: OffsetDateTime,
        ) -> StoreResult<()> {
            let result =
                sqlx::query("UPDATE jobs SET last_run = ? WHERE plugin_id = ? AND name = ?")
                    .bind(at)
                    .bind(plugin_id)
                    .bind(job_name)
                    .execute(&self.pool)
                    .await?;
            if result.rows_affected() == 0 {
                return Err(StoreError::NotFound(format!(
                    "job '{job_name}' of plugin '{plugin_id}'"
                )));
            }
            Ok(())
        }

        async fn upsert_job_cache(
            &self,
            job_name: &str,
            service_id: Option<&str>,
            file_name: &str,
            data: &[u8],
            checksum: Option<&str>,
        ) -> StoreResult<()> {
            let mut tx = self.pool.begin().await?;
            let now = OffsetDateTime::now_utc();

            let existing: Option<(i64,)> = sqlx::query_as(
                "SELECT 1 FROM jobs_cache WHERE job_name = ? AND service_id IS ? AND file_name = ?",
            )
            .bind(job_name)
            .bind(service_id)
            .bind(file_name)
            .fetch_optional(&mut *tx)
            .await?;

            if existing.is_some() {
                sqlx::query(
                    "UPDATE jobs_cache SET data = ?, checksum = ?, last_update = ? WHERE job_name = ? AND service_id IS ? AND file_name = ?",
                )
                .bind(data)
                .bind(checksum)
                .bind(now)
                .bind(job_name)
                .bind(service_id)
                .bind(file_name)
                .execute(&mut *tx)
                .await?;
            } else {
                sqlx::query(
                    "INSERT INTO jobs_cache (job_name, service_id, file_name, data, checksum, last_update) VALUES (?, ?, ?, ?, ?, ?)",
                )
                .bind(job_name)
                .bind(service_id)
                .bind(file_name)
                .bind(data)
                .bind(checksum)
                .bind(now)
                .execute(&mut *tx)
                .await?;
            }

            tx.commit().await?;
            Ok(())
        }

        async fn delete_job_cache(
            &self,
            job_name: &str,
            service_id: Option<&str>,
            file_name: &str,
        ) -> StoreResult<()> {
            let result = sqlx::query(
                "DELETE FROM jobs_cache WHERE job_name = ? AND service_id IS ? AND file_name = ?",
            )
            .bind(job_name)
            .bind(service_id)
            .bind(file_name)
            .execute(&self.pool)
            .await?;
            if result.rows_affected() == 0 {
                return Err(StoreError::NotFound(format!(
                    "cache file '{file_name}' of job '{job_name}'"
                )));
            }
            Ok(())
        }

        async fn get_job_cache_file(
            &self,
            job_name: &str,
            service_id: Option<&str>,
            file_name: &str,
        ) -> StoreResult<Option<JobCacheRow>> {
            let row = sqlx::query_as::<_, JobCacheRow>(
                "SELECT * FROM jobs_cache WHERE job_name = ? AND service_id IS ? AND file_name = ?",
            )
            .bind(job_name)
            .bind(service_id)
            .bind(file_name)
            .fetch_optional(&self.pool)
            .await?;
            Ok(row)
        }
    }
}

const SCHEMA_SQL: &str = r#"
-- Plugins own the setting catalog and the job table.
CREATE TABLE IF NOT EXISTS plugins (
    id TEXT PRIMARY KEY,
    name TEXT NOT NULL,
    description TEXT NOT NULL DEFAULT '',
    version TEXT NOT NULL,
    stream TEXT NOT NULL DEFAULT 'no',
    method TEXT NOT NULL,
    data BLOB,
    checksum TEXT,
    display_order INTEGER NOT NULL DEFAULT 0
);

-- Setting catalog. Ids are unique across the whole catalog regardless of
-- the owning plugin.
CREATE TABLE IF NOT EXISTS settings (
    id TEXT PRIMARY KEY,
    plugin_id TEXT NOT NULL REFERENCES plugins(id) ON DELETE CASCADE,
    name TEXT NOT NULL,
    context TEXT NOT NULL,
    default_value TEXT NOT NULL DEFAULT '',
    help TEXT NOT NULL DEFAULT '',
    label TEXT,
    regex TEXT NOT NULL DEFAULT '.*',
    type TEXT NOT NULL DEFAULT 'text',
    multiple INTEGER NOT NULL DEFAULT 0,
    display_order INTEGER NOT NULL DEFAULT 0
);
CREATE INDEX IF NOT EXISTS idx_settings_plugin ON settings(plugin_id);

-- Enumerated values for select settings.
CREATE TABLE IF NOT EXISTS selects (
    setting_id TEXT NOT NULL REFERENCES settings(id) ON DELETE CASCADE,
    value TEXT NOT NULL,
    PRIMARY KEY (setting_id, value)
);

-- Service registry. The method records which subsystem created the service
-- and gates pruning and removal.
CREATE TABLE IF NOT EXISTS services (
    id TEXT PRIMARY KEY,
    method TEXT NOT NULL
);

-- Global values. A row only exists when the value diverges from the
-- catalog default; suffix 0 is the base instance of a multiple setting.
CREATE TABLE IF NOT EXISTS global_values (
    setting_id TEXT NOT NULL REFERENCES settings(id) ON DELETE CASCADE,
    suffix INTEGER NOT NULL DEFAULT 0,
    value TEXT NOT NULL,
    method TEXT NOT NULL,
    PRIMARY KEY (setting_id, suffix)
);
CREATE INDEX IF NOT EXISTS idx_global_values_method ON global_values(method);

-- Per-service values; legal only for multisite-context settings.
CREATE TABLE IF NOT EXISTS service_values (
    service_id TEXT NOT NULL REFERENCES services(id) ON DELETE CASCADE,
    setting_id TEXT NOT NULL REFERENCES settings(id) ON DELETE CASCADE,
    suffix INTEGER NOT NULL DEFAULT 0,
    value TEXT NOT NULL,
    method TEXT NOT NULL,
    PRIMARY KEY (service_id, setting_id, suffix)
);
CREATE INDEX IF NOT EXISTS idx_service_values_method ON service_values(method);
CREATE INDEX IF NOT EXISTS idx_service_values_setting ON service_values(setting_id);

-- Opaque config fragments. service_id NULL = global scope; COALESCE makes
-- the scope part of the uniqueness key despite the NULL.
CREATE TABLE IF NOT EXISTS custom_configs (
    service_id TEXT REFERENCES services(id) ON DELETE CASCADE,
    type TEXT NOT NULL,
    name TEXT NOT NULL,
    data BLOB NOT NULL,
    checksum TEXT NOT NULL,
    method TEXT NOT NULL
);
CREATE UNIQUE INDEX IF NOT EXISTS idx_custom_configs_scope
    ON custom_configs(COALESCE(service_id, ''), type, name);
CREATE INDEX IF NOT EXISTS idx_custom_configs_method ON custom_configs(method);

-- Jobs declared by plugins. Names are unique fleet-wide so the cache can
-- reference them without the plugin id.
CREATE TABLE IF NOT EXISTS jobs (
    plugin_id TEXT NOT NULL REFERENCES plugins(id) ON DELETE CASCADE,
    name TEXT NOT NULL,
    file TEXT NOT NULL,
    every TEXT NOT NULL,
    reload INTEGER NOT NULL DEFAULT 0,
    last_run TEXT,
    PRIMARY KEY (plugin_id, name)
);
CREATE UNIQUE INDEX IF NOT EXISTS idx_jobs_name ON jobs(name);

-- Cached job artifacts, optionally scoped to a service.
CREATE TABLE IF NOT EXISTS jobs_cache (
    job_name TEXT NOT NULL,
    service_id TEXT REFERENCES services(id) ON DELETE CASCADE,
    file_name TEXT NOT NULL,
    data BLOB,
    checksum TEXT,
    last_update TEXT
);
CREATE UNIQUE INDEX IF NOT EXISTS idx_jobs_cache_scope
    ON jobs_cache(job_name, COALESCE(service_id, ''), file_name);

-- Plugin UI pages, tracked by checksum.
CREATE TABLE IF NOT EXISTS plugin_pages (
    plugin_id TEXT PRIMARY KEY REFERENCES plugins(id) ON DELETE CASCADE,
    data BLOB NOT NULL,
    checksum TEXT NOT NULL
);
"#;
