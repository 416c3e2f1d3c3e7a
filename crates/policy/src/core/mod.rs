//! Core abstractions of the policy engine.
//!
//! The data model keeps version-sensitive information explicit: manifest
//! booleans stay three-valued until the owning rule resolves them, and SDK
//! windows are evaluated against behavioural thresholds through the
//! straddle primitive so a range spanning a platform change reports both
//! possible behaviours instead of guessing one.

pub mod facts;
pub mod finding;
pub mod rule;
pub mod sdk;
pub mod severity;
pub mod straddle;
pub mod tribool;

pub use facts::{
    ComponentCensus, ComponentCount, ComponentKind, DeclaredDependency, DeclaredPermission,
    ExportedComponent, FactError, FactSource, LinkDeclaration, ManifestFacts, PackageId,
};
pub use finding::{Evidence, Finding};
pub use rule::{AuditContext, PolicyRule, RuleOutcome};
pub use sdk::{ApiLevel, DeclaredSdk, SdkRange, SdkRangeError, ANDROID_MAX_SDK};
pub use severity::Severity;
pub use straddle::{straddle, Outcomes};
pub use tribool::TriBool;
