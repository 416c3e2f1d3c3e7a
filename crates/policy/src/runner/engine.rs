use crate::core::{AuditContext, Finding, ManifestFacts, PolicyRule, SdkRange};
use crate::rules::links::LinkVerifier;
use crate::runner::registry::RuleRegistry;
use crate::runner::report::AuditReport;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, warn};

/// Runs every registered rule against one `(ManifestFacts, SdkRange)` pair
/// and aggregates the outcome into an [`AuditReport`].
///
/// The engine holds no per-run state: each `run` call owns its own report
/// and concurrent analyses of different manifests can share one engine.
/// No rule short-circuits the run; a rule that cannot produce a verdict
/// degrades to an info-level finding and the remaining rules still
/// execute.
pub struct PolicyEngine {
    rules: Vec<Arc<dyn PolicyRule>>,
    verifier: Option<Arc<dyn LinkVerifier>>,
}

impl PolicyEngine {
    pub fn new() -> Self {
        Self {
            rules: Vec::new(),
            verifier: None,
        }
    }

    /// Engine with the full default rule set in audit order.
    pub fn with_default_rules() -> Self {
        Self {
            rules: RuleRegistry::with_defaults().into_rules(),
            verifier: None,
        }
    }

    pub fn add_rule<R: PolicyRule + 'static>(mut self, rule: R) -> Self {
        self.rules.push(Arc::new(rule));
        self
    }

    /// Enables app-link host probing through the given collaborator.
    /// Without one the run stays fully offline.
    pub fn with_verifier(mut self, verifier: Arc<dyn LinkVerifier>) -> Self {
        self.verifier = Some(verifier);
        self
    }

    pub fn rules(&self) -> &[Arc<dyn PolicyRule>] {
        &self.rules
    }

    pub fn run(&self, facts: &ManifestFacts, range: SdkRange) -> AuditReport {
        let mut context = AuditContext::new(facts, range);
        if let Some(ref verifier) = self.verifier {
            context = context.with_verifier(verifier.as_ref());
        }

        let mut findings = Vec::new();
        let mut result_codes = BTreeMap::new();

        for rule in &self.rules {
            debug!(rule = rule.id(), "evaluating");
            match rule.evaluate(&context) {
                Ok(outcome) => {
                    findings.extend(outcome.findings);
                    if let Some(code) = outcome.code {
                        result_codes.insert(rule.id().to_string(), code);
                    }
                }
                Err(error) => {
                    warn!(rule = rule.id(), %error, "rule degraded");
                    findings.push(Finding::info(
                        rule.id(),
                        format!("Insufficient data to evaluate {}: {error}", rule.name()),
                    ));
                }
            }
        }

        AuditReport::new(findings, result_codes)
    }
}

impl Default for PolicyEngine {
    fn default() -> Self {
        Self::with_default_rules()
    }
}
