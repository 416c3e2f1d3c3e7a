//! Rule trait and evaluation context.
//!
//! Each security concern is one rule: a pure function of the fact bundle
//! and the SDK range, registered in a fixed ordered list inside the engine.
//! Rules share no mutable state and never see each other's output, which
//! keeps them individually testable and trivially reorderable.

use crate::core::{Finding, ManifestFacts, SdkRange};
use crate::rules::links::LinkVerifier;
use anyhow::Result;

/// Everything a rule may look at during one evaluation.
pub struct AuditContext<'a> {
    pub facts: &'a ManifestFacts,
    pub range: SdkRange,
    /// Host reachability collaborator for the link rule. `None` keeps the
    /// run fully offline.
    pub verifier: Option<&'a dyn LinkVerifier>,
}

impl<'a> AuditContext<'a> {
    pub fn new(facts: &'a ManifestFacts, range: SdkRange) -> Self {
        Self {
            facts,
            range,
            verifier: None,
        }
    }

    pub fn with_verifier(mut self, verifier: &'a dyn LinkVerifier) -> Self {
        self.verifier = Some(verifier);
        self
    }
}

/// Findings plus the machine-readable summary for one rule evaluation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleOutcome {
    pub findings: Vec<Finding>,
    /// Rule-group specific result code; bitmask or count semantics are
    /// documented per rule. `None` for rules that define no code.
    pub code: Option<u32>,
}

impl RuleOutcome {
    pub fn new(findings: Vec<Finding>) -> Self {
        Self {
            findings,
            code: None,
        }
    }

    pub fn with_code(mut self, code: u32) -> Self {
        self.code = Some(code);
        self
    }
}

pub trait PolicyRule: Send + Sync {
    fn id(&self) -> &'static str;

    fn name(&self) -> &'static str;

    fn description(&self) -> &'static str {
        "No description provided"
    }

    fn evaluate(&self, context: &AuditContext) -> Result<RuleOutcome>;
}
