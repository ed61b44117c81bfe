//! Writer methods and overwrite authority.
//!
//! Every persisted configuration row is tagged with the [`Method`] that last
//! wrote it. A later write may only replace a row when its method has
//! authority over the stored one; the rules are asymmetric on purpose:
//! `autoconf` reflects live orchestration truth and may correct UI-entered
//! service values, while the UI may never silently override `autoconf`.

use crate::error::Error;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Identity tag of the subsystem that authored a configuration row.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Method {
    /// Web UI edits.
    Ui,
    /// The scheduler process.
    Scheduler,
    /// The autoconf/orchestrator agent.
    Autoconf,
    /// Operator-supplied core overrides. Universal overwrite authority.
    Core,
    /// Hand-edited bootstrap configuration.
    Manual,
    /// Synthetic provenance for catalog defaults. Never a valid writer.
    Default,
}

/// Which relation a value row lives in; service rows accept a wider set of
/// overwriting methods than global rows.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ValueScope {
    Global,
    Service,
}

impl Method {
    /// Canonical lowercase tag as persisted in the store.
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Ui => "ui",
            Method::Scheduler => "scheduler",
            Method::Autoconf => "autoconf",
            Method::Core => "core",
            Method::Manual => "manual",
            Method::Default => "default",
        }
    }

    /// Whether this tag is accepted on write operations.
    ///
    /// `default` only appears in read-back provenance.
    pub fn is_writer(&self) -> bool {
        !matches!(self, Method::Default)
    }

    /// Whether this method may replace a value row owned by `owner`.
    ///
    /// A method always owns its previous writes; `core` overrides anything;
    /// `autoconf` additionally overrides service-scoped rows.
    pub fn can_overwrite(&self, owner: Method, scope: ValueScope) -> bool {
        if *self == owner || *self == Method::Core {
            return true;
        }
        scope == ValueScope::Service && *self == Method::Autoconf
    }

    /// Whether this method may replace a custom config or plugin record
    /// owned by `owner`. Both `core` and `autoconf` have authority here.
    pub fn can_replace(&self, owner: Method) -> bool {
        *self == owner || matches!(self, Method::Core | Method::Autoconf)
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Method {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ui" => Ok(Method::Ui),
            "scheduler" => Ok(Method::Scheduler),
            "autoconf" => Ok(Method::Autoconf),
            "core" => Ok(Method::Core),
            "manual" => Ok(Method::Manual),
            "default" => Ok(Method::Default),
            other => Err(Error::InvalidMethod(other.to_string())),
        }
    }
}
