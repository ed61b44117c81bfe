//! Plugin manifests: the declared settings, jobs and UI page that the
//! metadata sync reconciles against the store.

use crate::error::Error;
use crate::hash::ContentHash;
use crate::method::Method;
use crate::setting::SettingSpec;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How often a plugin job runs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobSchedule {
    Once,
    Minute,
    Hour,
    Day,
    Week,
}

impl JobSchedule {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobSchedule::Once => "once",
            JobSchedule::Minute => "minute",
            JobSchedule::Hour => "hour",
            JobSchedule::Day => "day",
            JobSchedule::Week => "week",
        }
    }
}

impl fmt::Display for JobSchedule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for JobSchedule {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "once" => Ok(JobSchedule::Once),
            "minute" => Ok(JobSchedule::Minute),
            "hour" => Ok(JobSchedule::Hour),
            "day" => Ok(JobSchedule::Day),
            "week" => Ok(JobSchedule::Week),
            other => Err(Error::InvalidSchedule(other.to_string())),
        }
    }
}

/// A scheduled job declared by a plugin.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct JobSpec {
    pub name: String,
    /// Script file within the plugin, relative to its root.
    pub file: String,
    pub every: JobSchedule,
    /// Whether a run of this job requires the managed services to reload.
    #[serde(default)]
    pub reload: bool,
}

/// An optional UI page shipped with a plugin, tracked by checksum so
/// unchanged content performs no write.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PageSpec {
    pub data: Vec<u8>,
}

impl PageSpec {
    /// Content checksum used to detect changed pages.
    pub fn checksum(&self) -> ContentHash {
        ContentHash::compute(&self.data)
    }
}

/// A plugin manifest as handed to the metadata sync.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PluginManifest {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub version: String,
    /// Stream support flag (`yes`, `no` or `partial`).
    #[serde(default = "default_stream")]
    pub stream: String,
    /// The subsystem registering this plugin; governs update authority.
    pub method: Method,
    /// Packaged plugin archive, when distributed through the store.
    #[serde(default)]
    pub data: Option<Vec<u8>>,
    #[serde(default)]
    pub checksum: Option<String>,
    #[serde(default)]
    pub settings: Vec<SettingSpec>,
    #[serde(default)]
    pub jobs: Vec<JobSpec>,
    #[serde(default)]
    pub page: Option<PageSpec>,
}

fn default_stream() -> String {
    "no".to_string()
}

impl PluginManifest {
    /// Serialize to JSON.
    pub fn to_json(&self) -> crate::Result<String> {
        serde_json::to_string(self).map_err(|e| Error::Serialization(e.to_string()))
    }

    /// Deserialize from JSON.
    pub fn from_json(json: &str) -> crate::Result<Self> {
        serde_json::from_str(json).map_err(|e| Error::Serialization(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manifest_json_roundtrip() {
        let manifest = PluginManifest {
            id: "gzip".to_string(),
            name: "Gzip".to_string(),
            description: "Compress responses".to_string(),
            version: "1.0".to_string(),
            stream: "yes".to_string(),
            method: Method::Manual,
            data: None,
            checksum: None,
            settings: Vec::new(),
            jobs: vec![JobSpec {
                name: "gzip-cleanup".to_string(),
                file: "cleanup.py".to_string(),
                every: JobSchedule::Day,
                reload: false,
            }],
            page: None,
        };
        let parsed = PluginManifest::from_json(&manifest.to_json().unwrap()).unwrap();
        assert_eq!(parsed.id, "gzip");
        assert_eq!(parsed.jobs[0].every, JobSchedule::Day);
    }

    #[test]
    fn test_page_checksum_tracks_content() {
        let a = PageSpec { data: b"<html>".to_vec() };
        let b = PageSpec { data: b"<html>".to_vec() };
        let c = PageSpec { data: b"<body>".to_vec() };
        assert_eq!(a.checksum(), b.checksum());
        assert_ne!(a.checksum(), c.checksum());
    }
}
