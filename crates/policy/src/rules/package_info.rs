//! General manifest information and SDK declaration cross-check.
//!
//! Mostly informational: package identity, component census, library and
//! feature requirements. The one policy decision here is the comparison of
//! the manifest's own `uses-sdk` declaration against the caller-declared
//! range — the caller's range drives every other rule, so a disagreement
//! means the rest of the report may be computed for the wrong window.

use crate::core::{AuditContext, ComponentKind, Finding, PolicyRule, RuleOutcome};
use anyhow::Result;

/// Result-code bits for this rule group.
pub mod bits {
    /// Manifest `uses-sdk` min disagrees with the caller-declared min.
    pub const MIN_SDK_MISMATCH: u32 = 1 << 0;
    /// Manifest `uses-sdk` max disagrees with the caller-declared max.
    pub const MAX_SDK_MISMATCH: u32 = 1 << 1;
}

pub struct PackageInfoRule;

impl PackageInfoRule {
    pub fn new() -> Self {
        Self
    }
}

impl Default for PackageInfoRule {
    fn default() -> Self {
        Self::new()
    }
}

impl PolicyRule for PackageInfoRule {
    fn id(&self) -> &'static str {
        "package-info"
    }

    fn name(&self) -> &'static str {
        "Package information"
    }

    fn description(&self) -> &'static str {
        "Package identity, component census and SDK declaration consistency"
    }

    fn evaluate(&self, context: &AuditContext) -> Result<RuleOutcome> {
        let facts = context.facts;
        let mut findings = Vec::new();
        let mut code = 0u32;

        findings.push(Finding::info(
            self.id(),
            format!("Package name: {}", facts.package.name),
        ));
        if let Some(ref version_code) = facts.package.version_code {
            findings.push(Finding::info(
                self.id(),
                format!("Version code: {version_code}"),
            ));
        }
        if let Some(ref version_name) = facts.package.version_name {
            findings.push(Finding::info(
                self.id(),
                format!("Version name: {version_name}"),
            ));
        }

        let declared = facts.declared_sdk;
        match declared.min {
            Some(declared_min) if declared_min != context.range.min() => {
                code |= bits::MIN_SDK_MISMATCH;
                findings.push(Finding::warning(
                    self.id(),
                    format!(
                        "Minimal SDK version: {} (mismatch between caller-declared value \
                         and uses-sdk tag: {declared_min})",
                        context.range.min()
                    ),
                ));
            }
            _ => findings.push(Finding::info(
                self.id(),
                format!("Minimal SDK version: {}", context.range.min()),
            )),
        }
        match declared.max {
            Some(declared_max) if declared_max != context.range.max() => {
                code |= bits::MAX_SDK_MISMATCH;
                findings.push(Finding::warning(
                    self.id(),
                    format!(
                        "Maximal SDK version: {} (mismatch between caller-declared value \
                         and uses-sdk tag: {declared_max})",
                        context.range.max()
                    ),
                ));
            }
            _ => findings.push(Finding::info(
                self.id(),
                format!("Maximal SDK version: {}", context.range.max()),
            )),
        }
        if declared.max.is_some() {
            findings.push(Finding::warning(
                self.id(),
                "Declaring the android:maxSdkVersion attribute is not recommended. \
                 Please check the official documentation",
            ));
        }

        for kind in ComponentKind::ALL {
            let count = facts.components.get(kind);
            findings.push(Finding::info(
                self.id(),
                format!(
                    "Number of {kind} components: {} ({} exported)",
                    count.total, count.exported
                ),
            ));
        }

        for library in &facts.shared_libraries {
            findings.push(Finding::info(
                self.id(),
                format!(
                    "Shared library \"{}\" can be used by the application \
                     (mandatory for runtime: {})",
                    library.name, library.required
                ),
            ));
        }
        for library in &facts.native_libraries {
            findings.push(Finding::info(
                self.id(),
                format!(
                    "Vendor-provided native library \"{}\" can be used by the application \
                     (mandatory for runtime: {})",
                    library.name, library.required
                ),
            ));
        }
        for feature in &facts.features {
            findings.push(Finding::info(
                self.id(),
                format!(
                    "Hardware or software feature \"{}\" can be used by the application \
                     (mandatory for runtime: {})",
                    feature.name, feature.required
                ),
            ));
        }

        Ok(RuleOutcome::new(findings).with_code(code))
    }
}
