//! Permission risk analysis.
//!
//! Two independent rules: required platform permissions are partitioned
//! against the dangerous reference set, and permissions the application
//! declares itself are inspected for protection levels another app could
//! satisfy simply by requesting them.

use crate::core::{AuditContext, Evidence, Finding, PolicyRule, RuleOutcome};
use anyhow::Result;
use once_cell::sync::Lazy;
use std::collections::BTreeSet;

/// Platform permissions with `protectionLevel=dangerous`, i.e. the ones a
/// user must grant at runtime.
pub static DANGEROUS_PERMISSIONS: Lazy<BTreeSet<&'static str>> = Lazy::new(|| {
    [
        "android.permission.ACCEPT_HANDOVER",
        "android.permission.ACCESS_BACKGROUND_LOCATION",
        "android.permission.ACCESS_COARSE_LOCATION",
        "android.permission.ACCESS_FINE_LOCATION",
        "android.permission.ACCESS_MEDIA_LOCATION",
        "android.permission.ACTIVITY_RECOGNITION",
        "android.permission.ADD_VOICEMAIL",
        "android.permission.ANSWER_PHONE_CALLS",
        "android.permission.BLUETOOTH_ADVERTISE",
        "android.permission.BLUETOOTH_CONNECT",
        "android.permission.BLUETOOTH_SCAN",
        "android.permission.BODY_SENSORS",
        "android.permission.BODY_SENSORS_BACKGROUND",
        "android.permission.CALL_PHONE",
        "android.permission.CAMERA",
        "android.permission.GET_ACCOUNTS",
        "android.permission.NEARBY_WIFI_DEVICES",
        "android.permission.POST_NOTIFICATIONS",
        "android.permission.PROCESS_OUTGOING_CALLS",
        "android.permission.READ_CALENDAR",
        "android.permission.READ_CALL_LOG",
        "android.permission.READ_CONTACTS",
        "android.permission.READ_EXTERNAL_STORAGE",
        "android.permission.READ_MEDIA_AUDIO",
        "android.permission.READ_MEDIA_IMAGES",
        "android.permission.READ_MEDIA_VIDEO",
        "android.permission.READ_MEDIA_VISUAL_USER_SELECTED",
        "android.permission.READ_PHONE_NUMBERS",
        "android.permission.READ_PHONE_STATE",
        "android.permission.READ_SMS",
        "android.permission.RECEIVE_MMS",
        "android.permission.RECEIVE_SMS",
        "android.permission.RECEIVE_WAP_PUSH",
        "android.permission.RECORD_AUDIO",
        "android.permission.SEND_SMS",
        "android.permission.USE_SIP",
        "android.permission.UWB_RANGING",
        "android.permission.WRITE_CALENDAR",
        "android.permission.WRITE_CALL_LOG",
        "android.permission.WRITE_CONTACTS",
        "android.permission.WRITE_EXTERNAL_STORAGE",
    ]
    .into_iter()
    .collect()
});

/// Required permissions checked against [`DANGEROUS_PERMISSIONS`].
/// Result code: number of dangerous permissions required.
pub struct RequiredPermissionsRule;

impl RequiredPermissionsRule {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RequiredPermissionsRule {
    fn default() -> Self {
        Self::new()
    }
}

impl PolicyRule for RequiredPermissionsRule {
    fn id(&self) -> &'static str {
        "required-permissions"
    }

    fn name(&self) -> &'static str {
        "Required permissions"
    }

    fn description(&self) -> &'static str {
        "Flags required platform permissions with a dangerous protection level"
    }

    fn evaluate(&self, context: &AuditContext) -> Result<RuleOutcome> {
        let mut findings = Vec::new();
        let mut dangerous = 0u32;

        for permission in &context.facts.required_permissions {
            if DANGEROUS_PERMISSIONS.contains(permission.as_str()) {
                dangerous += 1;
                findings.push(Finding::warning(self.id(), permission.clone()));
            } else {
                findings.push(Finding::info(self.id(), permission.clone()));
            }
        }

        if dangerous > 0 {
            let noun = if dangerous == 1 {
                "permission"
            } else {
                "permissions"
            };
            findings.push(Finding::warning(
                self.id(),
                format!(
                    "Application requires {dangerous} dangerous builtin {noun} to work properly. \
                     Check it out!"
                ),
            ));
        }

        Ok(RuleOutcome::new(findings).with_code(dangerous))
    }
}

/// Application-declared permissions whose protection level is `normal` or
/// `dangerous`: any other app can request and obtain those, so whatever
/// they guard is reachable. Result code: number of such permissions.
pub struct CustomPermissionsRule;

impl CustomPermissionsRule {
    pub fn new() -> Self {
        Self
    }

    fn is_obtainable(protection_level: &str) -> bool {
        protection_level == "normal" || protection_level == "dangerous"
    }
}

impl Default for CustomPermissionsRule {
    fn default() -> Self {
        Self::new()
    }
}

impl PolicyRule for CustomPermissionsRule {
    fn id(&self) -> &'static str {
        "custom-permissions"
    }

    fn name(&self) -> &'static str {
        "Custom permissions"
    }

    fn description(&self) -> &'static str {
        "Flags declared permissions obtainable by any other application"
    }

    fn evaluate(&self, context: &AuditContext) -> Result<RuleOutcome> {
        let mut findings = Vec::new();
        let mut evidence = Evidence::new(&["name", "protectionLevel"]);
        let mut obtainable = 0u32;

        for permission in &context.facts.declared_permissions {
            evidence.push_row(vec![
                Some(permission.name.clone()),
                Some(permission.protection_level.clone()),
            ]);
            if Self::is_obtainable(&permission.protection_level) {
                obtainable += 1;
            }
        }

        if obtainable > 0 {
            let noun = if obtainable == 1 {
                "permission"
            } else {
                "permissions"
            };
            findings.push(
                Finding::critical(
                    self.id(),
                    format!(
                        "Application declared {obtainable} custom {noun} with a \
                         protectionLevel <= dangerous. Check it out!"
                    ),
                )
                .with_evidence(evidence),
            );
        } else if !evidence.is_empty() {
            findings.push(
                Finding::info(self.id(), "Custom permissions definition").with_evidence(evidence),
            );
        }

        Ok(RuleOutcome::new(findings).with_code(obtainable))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{DeclaredPermission, ManifestFacts, SdkRange, Severity};

    fn context_range() -> SdkRange {
        SdkRange::new(21, 34).unwrap()
    }

    #[test]
    fn test_required_permissions_partition() {
        let facts = ManifestFacts {
            required_permissions: vec![
                "android.permission.CAMERA".to_string(),
                "android.permission.INTERNET".to_string(),
                "android.permission.READ_SMS".to_string(),
            ],
            ..Default::default()
        };
        let context = AuditContext::new(&facts, context_range());
        let outcome = RequiredPermissionsRule::new().evaluate(&context).unwrap();
        assert_eq!(outcome.code, Some(2));
        // two dangerous entries plus the summary warning
        let warnings = outcome
            .findings
            .iter()
            .filter(|f| f.severity == Severity::Warning)
            .count();
        assert_eq!(warnings, 3);
    }

    #[test]
    fn test_no_required_permissions_is_neutral() {
        let facts = ManifestFacts::default();
        let context = AuditContext::new(&facts, context_range());
        let outcome = RequiredPermissionsRule::new().evaluate(&context).unwrap();
        assert_eq!(outcome.code, Some(0));
        assert!(outcome.findings.is_empty());
    }

    #[test]
    fn test_custom_permission_protection_levels() {
        let facts = ManifestFacts {
            declared_permissions: vec![
                DeclaredPermission {
                    name: "com.example.OPEN_DOOR".to_string(),
                    protection_level: "normal".to_string(),
                },
                DeclaredPermission {
                    name: "com.example.SIGNED_ONLY".to_string(),
                    protection_level: "signature".to_string(),
                },
            ],
            ..Default::default()
        };
        let context = AuditContext::new(&facts, context_range());
        let outcome = CustomPermissionsRule::new().evaluate(&context).unwrap();
        assert_eq!(outcome.code, Some(1));
        assert_eq!(outcome.findings[0].severity, Severity::Critical);
        let evidence = outcome.findings[0].evidence.as_ref().unwrap();
        assert_eq!(evidence.len(), 2);
    }

    #[test]
    fn test_signature_only_custom_permissions_are_informational() {
        let facts = ManifestFacts {
            declared_permissions: vec![DeclaredPermission {
                name: "com.example.SIGNED_ONLY".to_string(),
                protection_level: "signature".to_string(),
            }],
            ..Default::default()
        };
        let context = AuditContext::new(&facts, context_range());
        let outcome = CustomPermissionsRule::new().evaluate(&context).unwrap();
        assert_eq!(outcome.code, Some(0));
        assert_eq!(outcome.findings[0].severity, Severity::Info);
    }
}
