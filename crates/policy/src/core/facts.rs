//! Read-only snapshot of everything the engine needs from a manifest.
//!
//! Decoding the manifest (binary XML, archive extraction, resource
//! resolution) happens in an external extractor; the engine only ever sees
//! this bundle. The bundle is complete or it does not exist: an extractor
//! failure is a typed error, never partial facts, because the
//! version-dependent defaults would otherwise be computed from silence.

use crate::core::sdk::DeclaredSdk;
use crate::core::TriBool;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FactError {
    #[error("input not found: {0}")]
    MissingInput(PathBuf),

    #[error("malformed input: {0}")]
    MalformedInput(String),
}

/// Produces one complete [`ManifestFacts`] per invocation. Implementations
/// must fail with [`FactError::MissingInput`] when the backing source does
/// not exist and [`FactError::MalformedInput`] when it cannot be decoded.
pub trait FactSource {
    fn load(&self) -> Result<ManifestFacts, FactError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ComponentKind {
    Activity,
    ActivityAlias,
    Receiver,
    Provider,
    Service,
}

impl ComponentKind {
    pub const ALL: [ComponentKind; 5] = [
        ComponentKind::Activity,
        ComponentKind::ActivityAlias,
        ComponentKind::Receiver,
        ComponentKind::Provider,
        ComponentKind::Service,
    ];
}

impl fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Activity => write!(f, "activity"),
            Self::ActivityAlias => write!(f, "activity-alias"),
            Self::Receiver => write!(f, "receiver"),
            Self::Provider => write!(f, "provider"),
            Self::Service => write!(f, "service"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageId {
    pub name: String,
    #[serde(default)]
    pub version_code: Option<String>,
    #[serde(default)]
    pub version_name: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentCount {
    pub total: usize,
    pub exported: usize,
}

/// Per-kind component tally for the whole manifest.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComponentCensus {
    pub activities: ComponentCount,
    pub activity_aliases: ComponentCount,
    pub receivers: ComponentCount,
    pub providers: ComponentCount,
    pub services: ComponentCount,
}

impl ComponentCensus {
    pub fn get(&self, kind: ComponentKind) -> ComponentCount {
        match kind {
            ComponentKind::Activity => self.activities,
            ComponentKind::ActivityAlias => self.activity_aliases,
            ComponentKind::Receiver => self.receivers,
            ComponentKind::Provider => self.providers,
            ComponentKind::Service => self.services,
        }
    }
}

/// A `uses-library` / `uses-native-library` / `uses-feature` entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeclaredDependency {
    pub name: String,
    pub required: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeclaredPermission {
    pub name: String,
    pub protection_level: String,
}

/// Permission attributes of one exported component.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportedComponent {
    pub name: String,
    pub kind: ComponentKind,
    #[serde(default)]
    pub permission: Option<String>,
    #[serde(default)]
    pub read_permission: Option<String>,
    #[serde(default)]
    pub write_permission: Option<String>,
}

impl ExportedComponent {
    /// A provider is reachable without any of its three permission gates;
    /// anything else only has the single `permission` gate.
    pub fn is_unprotected(&self) -> bool {
        match self.kind {
            ComponentKind::Provider => {
                self.permission.is_none()
                    && self.read_permission.is_none()
                    && self.write_permission.is_none()
            }
            _ => self.permission.is_none(),
        }
    }

    /// Trailing segment of the component's class name, for display.
    pub fn short_name(&self) -> &str {
        short_class_name(&self.name)
    }
}

/// An intent-filter declaration with action VIEW, category BROWSABLE and at
/// least one URI, as collected by the extractor. `auto_verify` marks the
/// app-link variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkDeclaration {
    pub component: String,
    pub kind: ComponentKind,
    #[serde(default)]
    pub auto_verify: bool,
    #[serde(default)]
    pub hosts: Vec<String>,
    #[serde(default)]
    pub uris: Vec<String>,
}

pub fn short_class_name(name: &str) -> &str {
    name.rsplit('.').next().unwrap_or(name)
}

/// Immutable fact bundle consumed by every rule. Constructed once per
/// analysis run; nothing mutates it afterwards.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ManifestFacts {
    pub package: PackageId,

    /// The manifest's own `uses-sdk` declaration, if any.
    pub declared_sdk: DeclaredSdk,

    pub components: ComponentCensus,

    pub shared_libraries: Vec<DeclaredDependency>,
    pub native_libraries: Vec<DeclaredDependency>,
    pub features: Vec<DeclaredDependency>,

    /// Permissions this application itself declares.
    pub declared_permissions: Vec<DeclaredPermission>,
    /// Permissions this application requires from the platform.
    pub required_permissions: Vec<String>,

    pub allow_backup: TriBool,
    pub backup_agent: Option<String>,
    pub full_backup_content: Option<String>,
    pub data_extraction_rules: Option<String>,

    pub network_security_config: Option<String>,
    /// Opaque structural summary of the config file, produced by an
    /// external collaborator and re-emitted as-is when present.
    pub network_security_config_summary: Option<String>,

    pub uses_cleartext_traffic: TriBool,
    pub debuggable: TriBool,

    /// Launcher component; always exported without a permission, so the
    /// exported-component rule skips it.
    pub entry_point: Option<String>,

    pub exported_components: Vec<ExportedComponent>,

    /// Providers with `exported="false"` but `grantUriPermissions="true"`.
    pub unexported_grant_uri_providers: Vec<String>,

    pub links: Vec<LinkDeclaration>,

    /// Paths bundled in the package, when the extractor has access to them.
    pub bundled_assets: Vec<String>,
}

impl ManifestFacts {
    /// Component names that carry at least one link declaration. Link
    /// targets are meant to be invoked by other applications and can never
    /// require a permission, so several rules exclude them.
    pub fn link_bearing_components(&self) -> std::collections::BTreeSet<&str> {
        self.links.iter().map(|l| l.component.as_str()).collect()
    }
}
