//! Network security configuration and cleartext traffic rules.

use crate::core::sdk::{API_CLEARTEXT_DEFAULT_OFF, API_NSC_OVERRIDES_CLEARTEXT};
use crate::core::{AuditContext, Finding, PolicyRule, RuleOutcome, SdkRange, TriBool};
use anyhow::Result;

/// Structural presence of a `networkSecurityConfig` declaration. The
/// referenced file's content is summarized by an external collaborator;
/// when a summary is supplied it is re-emitted untouched.
pub struct NetworkSecurityConfigRule;

impl NetworkSecurityConfigRule {
    pub fn new() -> Self {
        Self
    }
}

impl Default for NetworkSecurityConfigRule {
    fn default() -> Self {
        Self::new()
    }
}

impl PolicyRule for NetworkSecurityConfigRule {
    fn id(&self) -> &'static str {
        "network-security-config"
    }

    fn name(&self) -> &'static str {
        "Network security configuration"
    }

    fn description(&self) -> &'static str {
        "Checks the existence of a network security configuration declaration"
    }

    fn evaluate(&self, context: &AuditContext) -> Result<RuleOutcome> {
        let facts = context.facts;
        let mut findings = Vec::new();

        match facts.network_security_config {
            Some(ref file) => {
                findings.push(Finding::info(
                    self.id(),
                    format!("Application network security configuration is defined in {file} file"),
                ));
                if let Some(ref summary) = facts.network_security_config_summary {
                    findings.push(Finding::info(self.id(), summary.clone()));
                }
            }
            None => findings.push(Finding::warning(
                self.id(),
                "networkSecurityConfig property not found",
            )),
        }

        Ok(RuleOutcome::new(findings))
    }
}

/// How the cleartext question resolved for a given manifest and range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CleartextVerdict {
    Allowed,
    Disallowed,
    /// A network security config is present and applies to the whole
    /// range; the flag is superseded and carries no verdict of its own.
    DeferredToConfig,
}

pub struct CleartextTrafficRule;

impl CleartextTrafficRule {
    pub fn new() -> Self {
        Self
    }

    /// Resolves the effective cleartext permission.
    ///
    /// A present network security config supersedes the flag only from
    /// API 24 onward. When the range dips below 24 the suppression cannot
    /// be relied on for the whole window, so the flag is evaluated as if
    /// no config were present. The historical default (`true` up to API
    /// 27) flips to `false` when the minimum supported level reaches 28.
    pub fn resolve(
        uses_cleartext_traffic: TriBool,
        has_network_security_config: bool,
        range: SdkRange,
    ) -> CleartextVerdict {
        if has_network_security_config && range.min() >= API_NSC_OVERRIDES_CLEARTEXT {
            return CleartextVerdict::DeferredToConfig;
        }

        let default_allowed = range.min() < API_CLEARTEXT_DEFAULT_OFF;
        if uses_cleartext_traffic.effective(default_allowed) {
            CleartextVerdict::Allowed
        } else {
            CleartextVerdict::Disallowed
        }
    }
}

impl Default for CleartextTrafficRule {
    fn default() -> Self {
        Self::new()
    }
}

impl PolicyRule for CleartextTrafficRule {
    fn id(&self) -> &'static str {
        "cleartext-traffic"
    }

    fn name(&self) -> &'static str {
        "Cleartext traffic"
    }

    fn description(&self) -> &'static str {
        "Checks if http traffic can be used, accounting for version-dependent defaults"
    }

    fn evaluate(&self, context: &AuditContext) -> Result<RuleOutcome> {
        let verdict = Self::resolve(
            context.facts.uses_cleartext_traffic,
            context.facts.network_security_config.is_some(),
            context.range,
        );

        let finding = match verdict {
            CleartextVerdict::DeferredToConfig => Finding::info(
                self.id(),
                "Application network security configuration is defined. \
                 Please refer to this test instead",
            ),
            CleartextVerdict::Allowed => Finding::warning(
                self.id(),
                "This app may intend to use cleartext network traffic such as HTTP \
                 to communicate with remote hosts",
            ),
            CleartextVerdict::Disallowed => Finding::info(
                self.id(),
                "Usage of cleartext traffic is not allowed (this flag is honored on a \
                 best effort basis, please refer to the documentation)",
            ),
        };

        Ok(RuleOutcome::new(vec![finding])
            .with_code(u32::from(verdict == CleartextVerdict::Allowed)))
    }
}
