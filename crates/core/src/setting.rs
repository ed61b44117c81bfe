//! Setting metadata as declared by plugin manifests.

use crate::error::Error;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Scope of a setting: global-only, or fanned out per service when
/// multisite mode is active.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SettingContext {
    Global,
    Multisite,
}

impl SettingContext {
    pub fn as_str(&self) -> &'static str {
        match self {
            SettingContext::Global => "global",
            SettingContext::Multisite => "multisite",
        }
    }
}

impl fmt::Display for SettingContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SettingContext {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "global" => Ok(SettingContext::Global),
            "multisite" => Ok(SettingContext::Multisite),
            other => Err(Error::InvalidContext(other.to_string())),
        }
    }
}

/// Input widget family for a setting; `select` settings carry an enumerated
/// value list.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SettingType {
    #[default]
    Text,
    Check,
    Select,
}

impl SettingType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SettingType::Text => "text",
            SettingType::Check => "check",
            SettingType::Select => "select",
        }
    }
}

impl fmt::Display for SettingType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SettingType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "text" => Ok(SettingType::Text),
            "check" => Ok(SettingType::Check),
            "select" => Ok(SettingType::Select),
            other => Err(Error::InvalidSettingType(other.to_string())),
        }
    }
}

/// A setting declaration inside a plugin manifest.
///
/// The catalog reconciles these field by field against its stored rows, so
/// every field here maps 1:1 onto a `settings` column.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SettingSpec {
    /// Unique key across the whole catalog (e.g. `GZIP_LEVEL`).
    pub id: String,
    /// Human-readable name shown by the UI.
    pub name: String,
    pub context: SettingContext,
    /// Default value; never persisted as a row (default suppression).
    #[serde(default)]
    pub default: String,
    #[serde(default)]
    pub help: String,
    #[serde(default)]
    pub label: Option<String>,
    /// Validation pattern applied by callers before writes.
    #[serde(default = "default_regex")]
    pub regex: String,
    #[serde(rename = "type", default)]
    pub kind: SettingType,
    /// Whether the setting accepts numbered instances (`KEY`, `KEY_1`, ...).
    #[serde(default)]
    pub multiple: bool,
    /// Enumerated values for `select` settings.
    #[serde(default)]
    pub select: Vec<String>,
}

fn default_regex() -> String {
    ".*".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spec_from_manifest_json() {
        let spec: SettingSpec = serde_json::from_str(
            r#"{
                "id": "GZIP_COMP_LEVEL",
                "name": "Compression level",
                "context": "multisite",
                "default": "5",
                "type": "select",
                "select": ["1", "5", "9"]
            }"#,
        )
        .unwrap();
        assert_eq!(spec.context, SettingContext::Multisite);
        assert_eq!(spec.kind, SettingType::Select);
        assert_eq!(spec.regex, ".*");
        assert!(!spec.multiple);
        assert_eq!(spec.select.len(), 3);
    }
}
