//! Catalog fixtures shared across integration tests.

use parapet_core::{
    JobSchedule, JobSpec, Method, PluginManifest, SettingContext, SettingSpec, SettingType,
};
use std::collections::BTreeMap;

/// Build a plain text setting declaration.
pub fn setting(id: &str, context: SettingContext, default: &str) -> SettingSpec {
    SettingSpec {
        id: id.to_string(),
        name: id.to_lowercase().replace('_', " "),
        context,
        default: default.to_string(),
        help: String::new(),
        label: None,
        regex: ".*".to_string(),
        kind: SettingType::Text,
        multiple: false,
        select: Vec::new(),
    }
}

/// Build a flat config map from pairs.
pub fn cfg(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

/// Core settings every deployment carries.
pub fn general_plugin() -> PluginManifest {
    PluginManifest {
        id: "general".to_string(),
        name: "General".to_string(),
        description: "Core settings".to_string(),
        version: "1.0".to_string(),
        stream: "no".to_string(),
        method: Method::Manual,
        data: None,
        checksum: None,
        settings: vec![
            setting("MULTISITE", SettingContext::Global, "no"),
            setting("SERVER_NAME", SettingContext::Multisite, "www.example.com"),
            setting("HTTP_PORT", SettingContext::Global, "8080"),
        ],
        jobs: Vec::new(),
        page: None,
    }
}

pub fn gzip_plugin() -> PluginManifest {
    let mut level = setting("GZIP_LEVEL", SettingContext::Multisite, "6");
    level.kind = SettingType::Select;
    level.select = vec!["4".to_string(), "6".to_string(), "9".to_string()];

    PluginManifest {
        id: "gzip".to_string(),
        name: "Gzip".to_string(),
        description: "Compress responses".to_string(),
        version: "1.0".to_string(),
        stream: "no".to_string(),
        method: Method::Manual,
        data: None,
        checksum: None,
        settings: vec![setting("USE_GZIP", SettingContext::Global, "no"), level],
        jobs: vec![JobSpec {
            name: "gzip-metrics".to_string(),
            file: "metrics.py".to_string(),
            every: JobSchedule::Day,
            reload: false,
        }],
        page: None,
    }
}

pub fn proxy_plugin() -> PluginManifest {
    let mut url = setting("REVERSE_PROXY_URL", SettingContext::Multisite, "");
    url.multiple = true;
    let mut host = setting("REVERSE_PROXY_HOST", SettingContext::Multisite, "");
    host.multiple = true;

    PluginManifest {
        id: "reverseproxy".to_string(),
        name: "Reverse proxy".to_string(),
        description: "Upstream routing".to_string(),
        version: "1.0".to_string(),
        stream: "yes".to_string(),
        method: Method::Manual,
        data: None,
        checksum: None,
        settings: vec![url, host],
        jobs: Vec::new(),
        page: None,
    }
}

/// The full base catalog.
pub fn base_manifests() -> Vec<PluginManifest> {
    vec![general_plugin(), gzip_plugin(), proxy_plugin()]
}
