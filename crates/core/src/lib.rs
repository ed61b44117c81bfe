//! Core domain types and shared logic for the Parapet configuration plane.
//!
//! This crate defines the canonical data model used across all other crates:
//! - Writer methods and overwrite-authority rules
//! - Setting metadata (context, input type, multiplicity, defaults)
//! - Plugin manifests (declared settings, jobs, UI page)
//! - Display-key parsing (suffix splitting, service-prefix resolution)
//! - Content hashing for custom configs and plugin pages

pub mod config;
pub mod error;
pub mod hash;
pub mod key;
pub mod manifest;
pub mod method;
pub mod setting;

pub use config::StoreConfig;
pub use error::{Error, Result};
pub use hash::ContentHash;
pub use key::{ResolvedKey, resolve_key, split_suffix};
pub use manifest::{JobSchedule, JobSpec, PageSpec, PluginManifest};
pub use method::{Method, ValueScope};
pub use setting::{SettingContext, SettingSpec, SettingType};

/// Setting key that switches per-service fan-out on when set to `"yes"`.
pub const MULTISITE_KEY: &str = "MULTISITE";

/// Setting key holding the space-separated list of managed service names.
pub const SERVER_NAME_KEY: &str = "SERVER_NAME";
