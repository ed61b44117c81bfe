//! Display-key parsing.
//!
//! Callers hand the reconciliation engine flat maps whose keys are display
//! keys: a bare setting id (`USE_GZIP`), a numbered instance of a multiple
//! setting (`REVERSE_PROXY_URL_2`), or either of those prefixed with a
//! service id in multisite form (`app1.example.com_USE_GZIP`). These
//! functions turn a display key back into its parts without touching the
//! store; the caller supplies the known-setting index and the target
//! service set.

use std::collections::HashMap;

/// A display key resolved against the setting catalog.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ResolvedKey<'a> {
    /// A global value write: `(setting_id, suffix)`.
    Global { setting_id: &'a str, suffix: i64 },
    /// A per-service value write: `(service_id, setting_id, suffix)`.
    Service {
        service_id: &'a str,
        setting_id: &'a str,
        suffix: i64,
    },
}

/// Split a trailing `_<digits>` suffix off a display key.
///
/// Returns the remaining prefix and the parsed suffix, or `None` when the
/// key carries no all-digits tail. A tail that overflows `i64` is treated
/// as no suffix; such a key can only ever match a literally-named setting.
pub fn split_suffix(key: &str) -> (&str, Option<i64>) {
    let Some(pos) = key.rfind('_') else {
        return (key, None);
    };
    let tail = &key[pos + 1..];
    if tail.is_empty() || !tail.bytes().all(|b| b.is_ascii_digit()) {
        return (key, None);
    }
    match tail.parse::<i64>() {
        Ok(suffix) => (&key[..pos], Some(suffix)),
        Err(_) => (key, None),
    }
}

/// Resolve a key that carries no service prefix.
///
/// The catalog index maps setting id to its `multiple` flag. A key that is
/// itself a known setting id wins over suffix splitting, so a setting
/// literally named `KEY_2` is not mistaken for instance 2 of `KEY`; suffixed
/// instances only resolve when the base setting is `multiple`.
fn resolve_bare<'a>(key: &'a str, settings: &HashMap<String, bool>) -> Option<(&'a str, i64)> {
    if settings.contains_key(key) {
        return Some((key, 0));
    }
    let (base, Some(suffix)) = split_suffix(key) else {
        return None;
    };
    match settings.get(base) {
        Some(true) => Some((base, suffix)),
        _ => None,
    }
}

/// Resolve a display key against the known settings and the target services.
///
/// Keys that match neither a setting nor a `<service>_<setting>` form are
/// unknown and return `None`; the engine skips them with a warning rather
/// than failing the batch.
pub fn resolve_key<'a>(
    key: &'a str,
    settings: &HashMap<String, bool>,
    services: &'a [String],
) -> Option<ResolvedKey<'a>> {
    if let Some((setting_id, suffix)) = resolve_bare(key, settings) {
        return Some(ResolvedKey::Global { setting_id, suffix });
    }
    for service in services {
        let Some(rest) = key.strip_prefix(service.as_str()) else {
            continue;
        };
        let Some(rest) = rest.strip_prefix('_') else {
            continue;
        };
        if let Some((setting_id, suffix)) = resolve_bare(rest, settings) {
            return Some(ResolvedKey::Service {
                service_id: service.as_str(),
                setting_id,
                suffix,
            });
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog(entries: &[(&str, bool)]) -> HashMap<String, bool> {
        entries
            .iter()
            .map(|(id, multiple)| (id.to_string(), *multiple))
            .collect()
    }

    #[test]
    fn test_split_suffix() {
        assert_eq!(split_suffix("USE_GZIP"), ("USE_GZIP", None));
        assert_eq!(split_suffix("REVERSE_PROXY_URL_2"), ("REVERSE_PROXY_URL", Some(2)));
        assert_eq!(split_suffix("KEY_0"), ("KEY", Some(0)));
        assert_eq!(split_suffix("KEY_"), ("KEY_", None));
        assert_eq!(split_suffix("KEY_1a"), ("KEY_1a", None));
        assert_eq!(split_suffix("42"), ("42", None));
    }

    #[test]
    fn test_bare_setting_resolves_to_suffix_zero() {
        let settings = catalog(&[("USE_GZIP", false)]);
        assert_eq!(
            resolve_key("USE_GZIP", &settings, &[]),
            Some(ResolvedKey::Global { setting_id: "USE_GZIP", suffix: 0 })
        );
    }

    #[test]
    fn test_literal_id_wins_over_suffix_split() {
        // HTTP_2 is a real setting; it must not resolve as instance 2 of HTTP.
        let settings = catalog(&[("HTTP_2", false), ("HTTP", true)]);
        assert_eq!(
            resolve_key("HTTP_2", &settings, &[]),
            Some(ResolvedKey::Global { setting_id: "HTTP_2", suffix: 0 })
        );
    }

    #[test]
    fn test_suffix_requires_multiple() {
        let settings = catalog(&[("USE_GZIP", false), ("REVERSE_PROXY_URL", true)]);
        assert_eq!(resolve_key("USE_GZIP_1", &settings, &[]), None);
        assert_eq!(
            resolve_key("REVERSE_PROXY_URL_3", &settings, &[]),
            Some(ResolvedKey::Global { setting_id: "REVERSE_PROXY_URL", suffix: 3 })
        );
    }

    #[test]
    fn test_service_prefix_resolution() {
        let settings = catalog(&[("USE_GZIP", false), ("REVERSE_PROXY_URL", true)]);
        let services = vec!["app1.example.com".to_string(), "app2.example.com".to_string()];
        assert_eq!(
            resolve_key("app1.example.com_USE_GZIP", &settings, &services),
            Some(ResolvedKey::Service {
                service_id: "app1.example.com",
                setting_id: "USE_GZIP",
                suffix: 0,
            })
        );
        assert_eq!(
            resolve_key("app2.example.com_REVERSE_PROXY_URL_1", &settings, &services),
            Some(ResolvedKey::Service {
                service_id: "app2.example.com",
                setting_id: "REVERSE_PROXY_URL",
                suffix: 1,
            })
        );
    }

    #[test]
    fn test_unknown_keys_do_not_resolve() {
        let settings = catalog(&[("USE_GZIP", false)]);
        let services = vec!["app1".to_string()];
        assert_eq!(resolve_key("NO_SUCH_SETTING", &settings, &services), None);
        assert_eq!(resolve_key("app1_NO_SUCH_SETTING", &settings, &services), None);
        // Service prefix must be followed by an underscore.
        assert_eq!(resolve_key("app1USE_GZIP", &settings, &services), None);
    }

    #[test]
    fn test_service_with_underscore_in_name() {
        let settings = catalog(&[("USE_GZIP", false)]);
        let services = vec!["my_app".to_string()];
        assert_eq!(
            resolve_key("my_app_USE_GZIP", &settings, &services),
            Some(ResolvedKey::Service {
                service_id: "my_app",
                setting_id: "USE_GZIP",
                suffix: 0,
            })
        );
    }
}
