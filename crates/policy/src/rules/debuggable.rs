//! Compilation-mode check. `android:debuggable` defaults to `false` on
//! every API level; only an explicit `true` is reportable.

use crate::core::{AuditContext, Finding, PolicyRule, RuleOutcome};
use anyhow::Result;

const FLUTTER_KERNEL_BLOB: &str = "assets/flutter_assets/kernel_blob.bin";

pub struct DebuggableRule;

impl DebuggableRule {
    pub fn new() -> Self {
        Self
    }
}

impl Default for DebuggableRule {
    fn default() -> Self {
        Self::new()
    }
}

impl PolicyRule for DebuggableRule {
    fn id(&self) -> &'static str {
        "debuggable"
    }

    fn name(&self) -> &'static str {
        "Compilation mode"
    }

    fn description(&self) -> &'static str {
        "Checks if the application is compiled in debug mode"
    }

    fn evaluate(&self, context: &AuditContext) -> Result<RuleOutcome> {
        let facts = context.facts;
        let mut findings = Vec::new();

        if facts.debuggable.effective(false) {
            findings.push(Finding::warning(
                self.id(),
                "Debuggable flag found. Application can be debugged on a device \
                 running in user mode",
            ));
            // Debug-built Flutter apps ship their Dart sources in the kernel blob
            if facts.bundled_assets.iter().any(|p| p == FLUTTER_KERNEL_BLOB) {
                findings.push(Finding::critical(
                    self.id(),
                    format!(
                        "Flutter app is debuggable and source code can be found \
                         in the strings of {FLUTTER_KERNEL_BLOB}"
                    ),
                ));
            }
        } else {
            findings.push(Finding::info(
                self.id(),
                "Application is not compiled in debug mode",
            ));
        }

        Ok(RuleOutcome::new(findings))
    }
}
