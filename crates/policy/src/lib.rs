//! Tenken Policy - Version-Aware Manifest Audit Engine
//!
//! This crate evaluates security policy rules against structured Android
//! manifest facts, accounting for platform defaults that changed across
//! API levels. A declared SDK range that spans a behavioural threshold
//! reports both possible behaviours instead of collapsing to one.

pub mod core;
pub mod rules;
pub mod runner;

pub use crate::core::{
    AuditContext, Evidence, FactError, FactSource, Finding, ManifestFacts, PolicyRule,
    RuleOutcome, SdkRange, SdkRangeError, Severity, TriBool, ANDROID_MAX_SDK,
};

pub use crate::rules::{LinkVerifier, StaticLinkVerifier, VerificationStatus};

pub use crate::runner::{AuditReport, PolicyEngine, RuleRegistry, SeverityCount};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
