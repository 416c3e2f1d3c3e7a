//! One module per security concern. Every rule is a pure function of
//! `(ManifestFacts, SdkRange)` behind the [`PolicyRule`](crate::core::PolicyRule)
//! trait; the link rule additionally consults the optional
//! [`LinkVerifier`](links::LinkVerifier) collaborator.

pub mod backup;
pub mod debuggable;
pub mod exported;
pub mod links;
pub mod network;
pub mod package_info;
pub mod permissions;

pub use backup::BackupRule;
pub use debuggable::DebuggableRule;
pub use exported::{ExportedComponentsRule, UnexportedProvidersRule};
pub use links::{LinkClassificationRule, LinkVerifier, StaticLinkVerifier, VerificationStatus};
pub use network::{CleartextTrafficRule, CleartextVerdict, NetworkSecurityConfigRule};
pub use package_info::PackageInfoRule;
pub use permissions::{CustomPermissionsRule, RequiredPermissionsRule, DANGEROUS_PERMISSIONS};
