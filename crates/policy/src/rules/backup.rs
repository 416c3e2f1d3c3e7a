//! Backup reachability analysis.
//!
//! `android:allowBackup` defaults to `true` on every API level, but what a
//! `true` (or absent) value exposes depends on the OS version: ADB backup
//! exists everywhere, Auto Backup only from API 23, its end-to-end
//! encryption only from API 28, and the exclusion-rules file that governs
//! what gets copied switched attributes at API 31. Each of those cut-offs
//! is evaluated through the straddle primitive so a range spanning one of
//! them reports both behaviours.

use crate::core::sdk::{API_AUTO_BACKUP, API_BACKUP_E2E_ENCRYPTION, API_DATA_EXTRACTION_RULES};
use crate::core::{
    straddle, AuditContext, Finding, ManifestFacts, Outcomes, PolicyRule, RuleOutcome, SdkRange,
    TriBool,
};
use anyhow::Result;

/// Result-code bits for this rule group.
pub mod bits {
    /// A legacy `fullBackupContent` rules file covers the pre-31 window.
    pub const FULL_BACKUP_CONTENT: u32 = 1 << 0;
    /// A `dataExtractionRules` file covers the 31+ window.
    pub const DATA_EXTRACTION_RULES: u32 = 1 << 1;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Encryption {
    Available,
    NotAvailable,
    Ambiguous,
}

pub struct BackupRule;

impl BackupRule {
    pub fn new() -> Self {
        Self
    }

    /// ADB backup honors `allowBackup` alone; the platform default is
    /// `true` for every API level.
    pub fn adb_backup_allowed(allow_backup: TriBool) -> bool {
        allow_backup.effective(true)
    }

    /// Auto Backup additionally requires the range to reach API 23.
    pub fn auto_backup_allowed(allow_backup: TriBool, range: SdkRange) -> bool {
        Self::adb_backup_allowed(allow_backup) && range.max() >= API_AUTO_BACKUP
    }

    fn auto_backup_findings(&self, allow_backup: TriBool, range: SdkRange) -> Vec<Finding> {
        if !Self::adb_backup_allowed(allow_backup) {
            return vec![Finding::info(
                self.id(),
                "Application cannot be backed up with Auto Backup",
            )];
        }

        straddle(
            range,
            API_AUTO_BACKUP,
            |ambiguous| {
                let message = if ambiguous {
                    "Auto Backup is unavailable on the lower part of the supported range \
                     (feature requires Android 6 / API level 23)"
                } else {
                    "Application cannot be backed up with Auto Backup \
                     (feature requires Android 6 / API level 23)"
                };
                Finding::info(self.id(), message)
            },
            |_| {
                let encryption = straddle(
                    range,
                    API_BACKUP_E2E_ENCRYPTION,
                    |ambiguous| {
                        if ambiguous {
                            Encryption::Ambiguous
                        } else {
                            Encryption::NotAvailable
                        }
                    },
                    |ambiguous| {
                        if ambiguous {
                            Encryption::Ambiguous
                        } else {
                            Encryption::Available
                        }
                    },
                );
                let suffix = match encryption {
                    Outcomes::Single(Encryption::Available) => "(E2E encrypted)",
                    Outcomes::Single(Encryption::NotAvailable) => "(E2E encryption not available)",
                    _ => "(E2E encryption is only available from Android 9 (API level 28))",
                };
                Finding::info(
                    self.id(),
                    format!("Google Drive Auto Backup functionality is activated {suffix}"),
                )
            },
        )
        .into_vec()
    }

    /// Evaluates the exclusion-rules files against both halves of the
    /// API 31 attribute switch. Returns the findings and the satisfied
    /// bits, OR-combined across halves when the range straddles.
    fn rules_file_findings(&self, facts: &ManifestFacts, range: SdkRange) -> (Vec<Finding>, u32) {
        let legacy_half = |_: bool| match facts.full_backup_content {
            Some(ref file) => (
                Finding::info(
                    self.id(),
                    format!(
                        "For Android versions <= 11 (API 30), custom rules have been defined \
                         to control what gets backed up in {file}"
                    ),
                ),
                bits::FULL_BACKUP_CONTENT,
            ),
            None => (
                Finding::warning(
                    self.id(),
                    format!(
                        "Minimal supported SDK version ({}) allows Android versions <= 11 \
                         (API 30) and no exclusion custom rules file has been specified in \
                         the fullBackupContent attribute",
                        range.min()
                    ),
                ),
                0,
            ),
        };
        let modern_half = |_: bool| match facts.data_extraction_rules {
            Some(ref file) => (
                Finding::info(
                    self.id(),
                    format!(
                        "For Android versions >= 12 (API 31), custom rules have been defined \
                         to control what gets backed up in {file}"
                    ),
                ),
                bits::DATA_EXTRACTION_RULES,
            ),
            None => (
                Finding::warning(
                    self.id(),
                    format!(
                        "Maximal supported SDK version ({}) allows Android versions >= 12 \
                         (API 31) and no exclusion custom rules file has been specified in \
                         the dataExtractionRules attribute",
                        range.max()
                    ),
                ),
                0,
            ),
        };

        let mut findings = Vec::new();
        let mut code = 0u32;
        for (finding, bit) in straddle(range, API_DATA_EXTRACTION_RULES, legacy_half, modern_half)
            .into_vec()
        {
            findings.push(finding);
            code |= bit;
        }
        (findings, code)
    }

    fn agent_finding(&self, facts: &ManifestFacts) -> Finding {
        match facts.backup_agent.as_deref() {
            Some(agent) if !agent.is_empty() => Finding::warning(
                self.id(),
                format!(
                    "Application implements its own backup agent in {}. \
                     Please make deeper checks",
                    crate::core::facts::short_class_name(agent)
                ),
            ),
            _ => Finding::info(self.id(), "No backup agent implementation has been found"),
        }
    }
}

impl Default for BackupRule {
    fn default() -> Self {
        Self::new()
    }
}

impl PolicyRule for BackupRule {
    fn id(&self) -> &'static str {
        "backup"
    }

    fn name(&self) -> &'static str {
        "Backup functionality"
    }

    fn description(&self) -> &'static str {
        "ADB/Auto backup reachability and exclusion-rules coverage across the SDK range"
    }

    fn evaluate(&self, context: &AuditContext) -> Result<RuleOutcome> {
        let facts = context.facts;
        let range = context.range;
        let mut findings = Vec::new();

        let adb_allowed = Self::adb_backup_allowed(facts.allow_backup);
        findings.push(Finding::info(
            self.id(),
            if adb_allowed {
                "ADB backup can be performed"
            } else {
                "Application cannot be backed up with adb"
            },
        ));

        findings.extend(self.auto_backup_findings(facts.allow_backup, range));

        let auto_allowed = Self::auto_backup_allowed(facts.allow_backup, range);
        let mut code = 0u32;
        if adb_allowed || auto_allowed {
            let (rule_findings, rule_code) = self.rules_file_findings(facts, range);
            findings.extend(rule_findings);
            code = rule_code;
        }

        findings.push(self.agent_finding(facts));

        Ok(RuleOutcome::new(findings).with_code(code))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Severity;

    fn range(min: u32, max: u32) -> SdkRange {
        SdkRange::new(min, max).unwrap()
    }

    #[test]
    fn test_adb_backup_tristate() {
        assert!(BackupRule::adb_backup_allowed(TriBool::True));
        assert!(BackupRule::adb_backup_allowed(TriBool::Unspecified));
        assert!(!BackupRule::adb_backup_allowed(TriBool::False));
    }

    #[test]
    fn test_auto_backup_matrix() {
        // (allowBackup, max SDK, expected)
        let cases = [
            (TriBool::True, 12, false),
            (TriBool::True, 25, true),
            (TriBool::True, 23, true),
            (TriBool::Unspecified, 23, true),
            (TriBool::Unspecified, 25, true),
            (TriBool::Unspecified, 13, false),
            (TriBool::False, 13, false),
            (TriBool::False, 23, false),
            (TriBool::False, 26, false),
        ];
        for (allow, max, expected) in cases {
            assert_eq!(
                BackupRule::auto_backup_allowed(allow, range(8, max)),
                expected,
                "allowBackup={allow} max={max}"
            );
        }
    }

    #[test]
    fn test_encryption_classification() {
        let rule = BackupRule::new();

        let findings = rule.auto_backup_findings(TriBool::True, range(28, 34));
        assert!(findings[0].message.contains("(E2E encrypted)"));

        let findings = rule.auto_backup_findings(TriBool::True, range(23, 27));
        assert!(findings[0].message.contains("E2E encryption not available"));

        let findings = rule.auto_backup_findings(TriBool::True, range(23, 34));
        assert!(findings[0]
            .message
            .contains("only available from Android 9 (API level 28)"));
    }

    #[test]
    fn test_auto_backup_straddling_23_reports_both_halves() {
        let rule = BackupRule::new();
        let findings = rule.auto_backup_findings(TriBool::Unspecified, range(21, 34));
        assert_eq!(findings.len(), 2);
        assert!(findings[0].message.contains("unavailable on the lower part"));
        assert!(findings[1].message.contains("Auto Backup functionality is activated"));
    }

    fn evaluate(facts: ManifestFacts, min: u32, max: u32) -> RuleOutcome {
        let context = AuditContext::new(&facts, range(min, max));
        BackupRule::new().evaluate(&context).unwrap()
    }

    #[test]
    fn test_rules_file_bits_across_full_window() {
        // (fullBackupContent, dataExtractionRules, expected bits)
        let cases = [
            (Some("test.xml"), Some("test.xml"), 3),
            (None, Some("test.xml"), 2),
            (Some("test.xml"), None, 1),
            (None, None, 0),
        ];
        for (full, extraction, expected) in cases {
            let facts = ManifestFacts {
                full_backup_content: full.map(String::from),
                data_extraction_rules: extraction.map(String::from),
                ..Default::default()
            };
            let outcome = evaluate(facts, 1, 32);
            assert_eq!(outcome.code, Some(expected), "{full:?}/{extraction:?}");
        }
    }

    #[test]
    fn test_rules_file_below_31_only_checks_legacy_attribute() {
        let facts = ManifestFacts {
            data_extraction_rules: Some("rules.xml".to_string()),
            ..Default::default()
        };
        // range entirely below 31: the dataExtractionRules file is inert
        let outcome = evaluate(facts, 21, 30);
        assert_eq!(outcome.code, Some(0));
        assert!(outcome
            .findings
            .iter()
            .any(|f| f.message.contains("fullBackupContent") && f.severity == Severity::Warning));
    }

    #[test]
    fn test_rules_file_at_or_above_31_only_checks_modern_attribute() {
        let facts = ManifestFacts {
            full_backup_content: Some("legacy.xml".to_string()),
            ..Default::default()
        };
        let outcome = evaluate(facts, 31, 34);
        assert_eq!(outcome.code, Some(0));
        assert!(outcome
            .findings
            .iter()
            .any(|f| f.message.contains("dataExtractionRules") && f.severity == Severity::Warning));
    }

    #[test]
    fn test_rules_file_skipped_when_backup_disallowed() {
        let facts = ManifestFacts {
            allow_backup: TriBool::False,
            ..Default::default()
        };
        let outcome = evaluate(facts, 1, 32);
        assert_eq!(outcome.code, Some(0));
        assert!(!outcome
            .findings
            .iter()
            .any(|f| f.message.contains("fullBackupContent")));
    }

    #[test]
    fn test_backup_agent_detection() {
        let rule = BackupRule::new();

        let facts = ManifestFacts {
            backup_agent: Some("com.example.MyBackupAgent".to_string()),
            ..Default::default()
        };
        let finding = rule.agent_finding(&facts);
        assert_eq!(finding.severity, Severity::Warning);
        assert!(finding.message.contains("MyBackupAgent"));

        for agent in [None, Some(String::new())] {
            let facts = ManifestFacts {
                backup_agent: agent,
                ..Default::default()
            };
            assert_eq!(rule.agent_finding(&facts).severity, Severity::Info);
        }
    }
}
