//! Permissions set on exported components.
//!
//! An exported component without a permission gate can be invoked by any
//! application on the device. Link-bearing components are excluded: they
//! exist to be called from the outside and cannot carry a permission. The
//! entry-point component is excluded for the same reason.

use crate::core::{AuditContext, Evidence, Finding, PolicyRule, RuleOutcome};
use anyhow::Result;

const TABLE_HEADERS: [&str; 5] = [
    "Name",
    "Type",
    "Permission",
    "readPermission",
    "writePermission",
];

pub struct ExportedComponentsRule;

impl ExportedComponentsRule {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ExportedComponentsRule {
    fn default() -> Self {
        Self::new()
    }
}

impl PolicyRule for ExportedComponentsRule {
    fn id(&self) -> &'static str {
        "exported-components"
    }

    fn name(&self) -> &'static str {
        "Exported component permissions"
    }

    fn description(&self) -> &'static str {
        "Flags exported components reachable without any permission"
    }

    fn evaluate(&self, context: &AuditContext) -> Result<RuleOutcome> {
        let facts = context.facts;
        let link_components = facts.link_bearing_components();
        let entry_point = facts.entry_point.as_deref();

        let mut unprotected = Evidence::new(&TABLE_HEADERS);
        let mut protected = Evidence::new(&TABLE_HEADERS);

        for component in &facts.exported_components {
            if link_components.contains(component.name.as_str()) {
                continue;
            }
            if entry_point == Some(component.name.as_str()) {
                continue;
            }

            let row = vec![
                Some(component.short_name().to_string()),
                Some(component.kind.to_string()),
                component.permission.clone(),
                component.read_permission.clone(),
                component.write_permission.clone(),
            ];
            if component.is_unprotected() {
                unprotected.push_row(row);
            } else {
                protected.push_row(row);
            }
        }

        // Column pruning is decided over every collected tuple, then
        // applied to both tables, so the two renderings stay aligned.
        let mut prune: Vec<&str> = Vec::new();
        for (idx, header) in [(3, "readPermission"), (4, "writePermission")] {
            let globally_absent = unprotected
                .rows
                .iter()
                .chain(protected.rows.iter())
                .all(|row| row[idx].is_none());
            if globally_absent {
                prune.push(header);
            }
        }
        unprotected.prune_empty_columns(&prune);
        protected.prune_empty_columns(&prune);

        let mut findings = Vec::new();
        if !unprotected.is_empty() || !protected.is_empty() {
            findings.push(Finding::info(
                self.id(),
                "Deeplinks are not shown in the tables below because they never \
                 have permissions",
            ));
        }

        let count = unprotected.len() as u32;
        if count > 0 {
            findings.push(
                Finding::warning(
                    self.id(),
                    format!(
                        "There are {count} exported components which can be called \
                         without any permission. Check it out!"
                    ),
                )
                .with_evidence(unprotected),
            );
        }
        if !protected.is_empty() {
            findings.push(
                Finding::info(self.id(), "Exported components protected by a permission")
                    .with_evidence(protected),
            );
        }

        Ok(RuleOutcome::new(findings).with_code(count))
    }
}

/// Providers that are not exported but still grant URI permissions. In
/// combination with another vulnerability (for instance an exported
/// component forwarding arbitrary intents) these become reachable.
pub struct UnexportedProvidersRule;

impl UnexportedProvidersRule {
    pub fn new() -> Self {
        Self
    }
}

impl Default for UnexportedProvidersRule {
    fn default() -> Self {
        Self::new()
    }
}

impl PolicyRule for UnexportedProvidersRule {
    fn id(&self) -> &'static str {
        "unexported-providers"
    }

    fn name(&self) -> &'static str {
        "Unexported providers"
    }

    fn description(&self) -> &'static str {
        "Lists unexported providers with grantUriPermissions enabled"
    }

    fn evaluate(&self, context: &AuditContext) -> Result<RuleOutcome> {
        let providers = &context.facts.unexported_grant_uri_providers;
        if providers.is_empty() {
            return Ok(RuleOutcome::new(Vec::new()).with_code(0));
        }

        let noun = if providers.len() == 1 {
            "provider"
        } else {
            "providers"
        };
        let mut evidence = Evidence::new(&["Name"]);
        for provider in providers {
            evidence.push_row(vec![Some(provider.clone())]);
        }

        let finding = Finding::warning(
            self.id(),
            format!(
                "Found {} unexported {noun} with grantUriPermissions set to True. \
                 Please make deeper checks!",
                providers.len()
            ),
        )
        .with_evidence(evidence);

        Ok(RuleOutcome::new(vec![finding]).with_code(providers.len() as u32))
    }
}
