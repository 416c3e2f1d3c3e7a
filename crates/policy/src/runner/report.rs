use crate::core::{Finding, Severity};
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Ordered findings of one engine run plus the per-rule-group result
/// codes. Serialization is deterministic (sorted code map, findings in
/// rule order) so identical inputs produce byte-identical reports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditReport {
    findings: Vec<Finding>,
    result_codes: BTreeMap<String, u32>,
}

impl AuditReport {
    pub fn new(findings: Vec<Finding>, result_codes: BTreeMap<String, u32>) -> Self {
        Self {
            findings,
            result_codes,
        }
    }

    pub fn findings(&self) -> &[Finding] {
        &self.findings
    }

    pub fn is_empty(&self) -> bool {
        self.findings.is_empty()
    }

    pub fn result_code(&self, rule_id: &str) -> Option<u32> {
        self.result_codes.get(rule_id).copied()
    }

    pub fn result_codes(&self) -> &BTreeMap<String, u32> {
        &self.result_codes
    }

    pub fn count_by_severity(&self) -> SeverityCount {
        let mut count = SeverityCount::default();
        for finding in &self.findings {
            match finding.severity {
                Severity::Critical => count.critical += 1,
                Severity::Warning => count.warning += 1,
                Severity::Info => count.info += 1,
            }
        }
        count
    }

    /// Highest severity present, for exit-status mapping in callers.
    pub fn max_severity(&self) -> Option<Severity> {
        self.findings.iter().map(|f| f.severity).max()
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn to_markdown(&self) -> String {
        let mut md = String::from("# Manifest Audit Report\n\n");

        let count = self.count_by_severity();
        md.push_str("## Summary\n\n");
        md.push_str(&format!("- Critical: {}\n", count.critical));
        md.push_str(&format!("- Warning: {}\n", count.warning));
        md.push_str(&format!("- Info: {}\n\n", count.info));

        if !self.result_codes.is_empty() {
            md.push_str("## Result codes\n\n");
            md.push_str("| Rule | Code |\n");
            md.push_str("|------|------|\n");
            for (rule_id, code) in &self.result_codes {
                md.push_str(&format!("| {rule_id} | {code} |\n"));
            }
            md.push('\n');
        }

        if !self.findings.is_empty() {
            md.push_str("## Findings\n\n");
            for finding in &self.findings {
                md.push_str(&format!(
                    "- **{}** `{}`: {}\n",
                    finding.severity, finding.rule_id, finding.message
                ));
                if let Some(ref evidence) = finding.evidence {
                    md.push('\n');
                    md.push_str(&format!("  | {} |\n", evidence.headers.join(" | ")));
                    md.push_str(&format!(
                        "  |{}\n",
                        evidence.headers.iter().map(|_| "------|").collect::<String>()
                    ));
                    for row in &evidence.rows {
                        let cells: Vec<&str> =
                            row.iter().map(|c| c.as_deref().unwrap_or("")).collect();
                        md.push_str(&format!("  | {} |\n", cells.join(" | ")));
                    }
                    md.push('\n');
                }
            }
        }

        md
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeverityCount {
    pub critical: usize,
    pub warning: usize,
    pub info: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report() -> AuditReport {
        let findings = vec![
            Finding::info("package-info", "Package name: com.example"),
            Finding::warning("backup", "ADB backup can be performed"),
            Finding::critical("custom-permissions", "Check it out!"),
        ];
        let mut codes = BTreeMap::new();
        codes.insert("backup".to_string(), 3);
        AuditReport::new(findings, codes)
    }

    #[test]
    fn test_count_by_severity() {
        let count = report().count_by_severity();
        assert_eq!(count.info, 1);
        assert_eq!(count.warning, 1);
        assert_eq!(count.critical, 1);
    }

    #[test]
    fn test_max_severity() {
        assert_eq!(report().max_severity(), Some(Severity::Critical));
        let empty = AuditReport::new(Vec::new(), BTreeMap::new());
        assert_eq!(empty.max_severity(), None);
    }

    #[test]
    fn test_result_code_lookup() {
        assert_eq!(report().result_code("backup"), Some(3));
        assert_eq!(report().result_code("unknown"), None);
    }

    #[test]
    fn test_json_round_trip() {
        let original = report();
        let json = original.to_json().unwrap();
        let parsed: AuditReport = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, original);
    }

    #[test]
    fn test_markdown_contains_codes_and_findings() {
        let md = report().to_markdown();
        assert!(md.contains("| backup | 3 |"));
        assert!(md.contains("**Critical** `custom-permissions`"));
    }
}
