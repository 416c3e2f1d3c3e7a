//! Deep link and app link classification.
//!
//! Every entry in the fact bundle's link list is a deep link by
//! construction (action VIEW, category BROWSABLE, at least one URI). The
//! auto-verify flag promotes a deep link to an app link, keyed by host.
//! App links come with a publicly hosted Digital Asset Links file; probing
//! it is the only network interaction in the whole engine and goes through
//! the [`LinkVerifier`] collaborator so the core stays offline.

use crate::core::facts::short_class_name;
use crate::core::{AuditContext, Evidence, Finding, LinkDeclaration, PolicyRule, RuleOutcome};
use anyhow::Result;
use rayon::prelude::*;
use std::collections::{BTreeMap, BTreeSet};

/// Outcome of probing one host's assetlinks.json.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerificationStatus {
    Verified,
    NotFound,
    /// Timeout, DNS failure, connection refused. Never fatal for the run.
    Unreachable,
}

/// Host reachability collaborator. Implementations must bound their wait
/// and map every failure to [`VerificationStatus::Unreachable`] instead of
/// returning an error.
pub trait LinkVerifier: Send + Sync {
    fn verify(&self, host: &str) -> VerificationStatus;
}

/// Canned-response verifier for tests and offline runs.
pub struct StaticLinkVerifier {
    default: VerificationStatus,
    per_host: BTreeMap<String, VerificationStatus>,
}

impl StaticLinkVerifier {
    pub fn always(status: VerificationStatus) -> Self {
        Self {
            default: status,
            per_host: BTreeMap::new(),
        }
    }

    pub fn with_host(mut self, host: impl Into<String>, status: VerificationStatus) -> Self {
        self.per_host.insert(host.into(), status);
        self
    }
}

impl LinkVerifier for StaticLinkVerifier {
    fn verify(&self, host: &str) -> VerificationStatus {
        self.per_host.get(host).copied().unwrap_or(self.default)
    }
}

pub struct LinkClassificationRule;

impl LinkClassificationRule {
    pub fn new() -> Self {
        Self
    }

    fn uri_evidence(declarations: &[&LinkDeclaration]) -> Evidence {
        let mut evidence = Evidence::new(&["URI"]);
        for declaration in declarations {
            for uri in &declaration.uris {
                evidence.push_row(vec![Some(uri.clone())]);
            }
        }
        evidence
    }

    fn deep_link_findings(
        &self,
        links: &[LinkDeclaration],
        app_link_components: &BTreeSet<&str>,
    ) -> Vec<Finding> {
        let mut findings = Vec::new();
        let names: BTreeSet<&str> = links
            .iter()
            .map(|l| l.component.as_str())
            .filter(|name| !app_link_components.contains(name))
            .collect();

        for name in names {
            let declarations: Vec<&LinkDeclaration> =
                links.iter().filter(|l| l.component == name).collect();
            findings.push(
                Finding::warning(
                    self.id(),
                    format!(
                        "Found a deeplink in {} {} with the following URI:",
                        declarations[0].kind,
                        short_class_name(name)
                    ),
                )
                .with_evidence(Self::uri_evidence(&declarations)),
            );
        }
        findings
    }

    fn app_link_findings(
        &self,
        links: &[LinkDeclaration],
        hosts: &BTreeSet<&str>,
        verifier: Option<&dyn LinkVerifier>,
    ) -> Vec<Finding> {
        // One probe per unique host; independent, so fan out. Results keyed
        // back into a sorted map to keep the report deterministic.
        let statuses: BTreeMap<&str, VerificationStatus> = match verifier {
            Some(verifier) => hosts
                .par_iter()
                .map(|host| (*host, verifier.verify(host)))
                .collect(),
            None => BTreeMap::new(),
        };

        let mut findings = Vec::new();
        for host in hosts {
            findings.push(Finding::warning(
                self.id(),
                format!("Found an applink with host \"{host}\""),
            ));
            if let Some(status) = statuses.get(host) {
                findings.push(match status {
                    VerificationStatus::Verified => Finding::info(
                        self.id(),
                        format!(
                            "Digital Asset Link JSON file found at \
                             https://{host}/.well-known/assetlinks.json"
                        ),
                    ),
                    VerificationStatus::NotFound => Finding::warning(
                        self.id(),
                        format!("Digital Asset Link JSON file not found for host \"{host}\""),
                    ),
                    VerificationStatus::Unreachable => Finding::warning(
                        self.id(),
                        format!("Digital Asset Link JSON file could not be retrieved for host \"{host}\""),
                    ),
                });
            }

            let bound: Vec<&LinkDeclaration> = links
                .iter()
                .filter(|l| l.hosts.iter().any(|h| h == host))
                .collect();
            let names: BTreeSet<&str> = bound.iter().map(|l| l.component.as_str()).collect();
            for name in names {
                let declarations: Vec<&LinkDeclaration> = bound
                    .iter()
                    .filter(|l| l.component == name)
                    .copied()
                    .collect();
                findings.push(
                    Finding::warning(
                        self.id(),
                        format!(
                            "Declared in {} {} with the following URI:",
                            declarations[0].kind,
                            short_class_name(name)
                        ),
                    )
                    .with_evidence(Self::uri_evidence(&declarations)),
                );
            }
        }
        findings
    }
}

impl Default for LinkClassificationRule {
    fn default() -> Self {
        Self::new()
    }
}

impl PolicyRule for LinkClassificationRule {
    fn id(&self) -> &'static str {
        "links"
    }

    fn name(&self) -> &'static str {
        "Deep links and app links"
    }

    fn description(&self) -> &'static str {
        "Classifies externally reachable URI intent filters and probes app-link hosts"
    }

    fn evaluate(&self, context: &AuditContext) -> Result<RuleOutcome> {
        let links = &context.facts.links;

        // Deep-link detection gates everything else in this rule.
        if links.is_empty() {
            return Ok(RuleOutcome::new(Vec::new()).with_code(0));
        }

        let app_link_components: BTreeSet<&str> = links
            .iter()
            .filter(|l| l.auto_verify)
            .map(|l| l.component.as_str())
            .collect();
        let verified_hosts: BTreeSet<&str> = links
            .iter()
            .filter(|l| l.auto_verify)
            .flat_map(|l| l.hosts.iter().map(String::as_str))
            .collect();

        let mut findings = self.deep_link_findings(links, &app_link_components);
        findings.extend(self.app_link_findings(links, &verified_hosts, context.verifier));

        Ok(RuleOutcome::new(findings).with_code(verified_hosts.len() as u32))
    }
}
