use crate::core::Severity;
use serde::{Deserialize, Serialize};

/// One unit of analysis output. Findings are built once and never mutated
/// afterwards; a rule emits zero, one, or several of them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finding {
    pub rule_id: String,

    pub severity: Severity,

    pub message: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub evidence: Option<Evidence>,
}

impl Finding {
    pub fn new(rule_id: impl Into<String>, severity: Severity, message: impl Into<String>) -> Self {
        Self {
            rule_id: rule_id.into(),
            severity,
            message: message.into(),
            evidence: None,
        }
    }

    pub fn info(rule_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(rule_id, Severity::Info, message)
    }

    pub fn warning(rule_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(rule_id, Severity::Warning, message)
    }

    pub fn critical(rule_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(rule_id, Severity::Critical, message)
    }

    pub fn with_evidence(mut self, evidence: Evidence) -> Self {
        self.evidence = Some(evidence);
        self
    }
}

/// Tabular material attached to a finding, handed to the reporter as-is.
/// Cells are optional so a column can be dropped when no row fills it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Evidence {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Option<String>>>,
}

impl Evidence {
    pub fn new(headers: &[&str]) -> Self {
        Self {
            headers: headers.iter().map(|h| h.to_string()).collect(),
            rows: Vec::new(),
        }
    }

    pub fn push_row(&mut self, row: Vec<Option<String>>) {
        debug_assert_eq!(row.len(), self.headers.len());
        self.rows.push(row);
    }

    pub fn with_row(mut self, row: Vec<Option<String>>) -> Self {
        self.push_row(row);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Removes every named column whose cells are all absent. Purely
    /// cosmetic: the rendered table shrinks, nothing the rows represent
    /// changes. Columns are removed right-to-left so indices stay valid.
    pub fn prune_empty_columns(&mut self, candidates: &[&str]) {
        let mut to_remove: Vec<usize> = self
            .headers
            .iter()
            .enumerate()
            .filter(|(idx, header)| {
                candidates.contains(&header.as_str())
                    && self.rows.iter().all(|row| row[*idx].is_none())
            })
            .map(|(idx, _)| idx)
            .collect();

        to_remove.sort_unstable_by(|a, b| b.cmp(a));
        for idx in to_remove {
            self.headers.remove(idx);
            for row in &mut self.rows {
                row.remove(idx);
            }
        }
    }
}
