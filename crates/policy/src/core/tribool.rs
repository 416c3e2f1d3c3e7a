//! Three-valued manifest attribute type.
//!
//! Every manifest boolean with a version-dependent platform default
//! (`allowBackup`, `usesCleartextTraffic`, `debuggable`) is modelled as a
//! `TriBool` so that "explicitly false", "explicitly true", and "absent,
//! defer to the platform default" stay distinct. Collapsing `Unspecified`
//! into `False` before the owning rule resolves the default is a
//! correctness bug (spec §9).

use std::fmt;

use serde::{Deserialize, Serialize};

/// A manifest boolean that may be unset. Serialises as `true` / `false` /
/// `null` via an `Option<bool>` representation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Option<bool>", into = "Option<bool>")]
pub enum TriBool {
    True,
    False,
    Unspecified,
}

impl Default for TriBool {
    fn default() -> Self {
        TriBool::Unspecified
    }
}

impl TriBool {
    /// Resolve the tri-state against the platform default that applies when
    /// the attribute is absent. `True`/`False` are returned verbatim;
    /// `Unspecified` yields `default`.
    pub fn effective(self, default: bool) -> bool {
        match self {
            TriBool::True => true,
            TriBool::False => false,
            TriBool::Unspecified => default,
        }
    }
}

impl From<Option<bool>> for TriBool {
    fn from(value: Option<bool>) -> Self {
        match value {
            Some(true) => TriBool::True,
            Some(false) => TriBool::False,
            None => TriBool::Unspecified,
        }
    }
}

impl From<TriBool> for Option<bool> {
    fn from(value: TriBool) -> Self {
        match value {
            TriBool::True => Some(true),
            TriBool::False => Some(false),
            TriBool::Unspecified => None,
        }
    }
}

impl fmt::Display for TriBool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            TriBool::True => "true",
            TriBool::False => "false",
            TriBool::Unspecified => "unspecified",
        };
        f.write_str(label)
    }
}
