//! Validation report model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckOutcome {
    Passed,
    Warning,
    Failed,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ValidationCheck {
    pub name: String,
    pub outcome: CheckOutcome,
    pub confidence: f64,
    pub detail: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ValidationReport {
    pub ticket_key: String,
    pub checks: Vec<ValidationCheck>,
    pub created_at: DateTime<Utc>,
}

impl ValidationCheck {
    pub fn passed(name: impl Into<String>, confidence: f64, detail: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            outcome: CheckOutcome::Passed,
            confidence,
            detail: detail.into(),
        }
    }

    pub fn warning(name: impl Into<String>, confidence: f64, detail: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            outcome: CheckOutcome::Warning,
            confidence,
            detail: detail.into(),
        }
    }

    pub fn failed(name: impl Into<String>, confidence: f64, detail: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            outcome: CheckOutcome::Failed,
            confidence,
            detail: detail.into(),
        }
    }
}

impl ValidationReport {
    pub fn new(ticket_key: String, checks: Vec<ValidationCheck>) -> Self {
        Self {
            ticket_key,
            checks,
            created_at: Utc::now(),
        }
    }

    /// Checks that produced warnings
    pub fn warnings(&self) -> Vec<&ValidationCheck> {
        self.checks
            .iter()
            .filter(|c| c.outcome == CheckOutcome::Warning)
            .collect()
    }

    /// Checks that failed outright
    pub fn failures(&self) -> Vec<&ValidationCheck> {
        self.checks
            .iter()
            .filter(|c| c.outcome == CheckOutcome::Failed)
            .collect()
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings().is_empty()
    }

    pub fn has_failures(&self) -> bool {
        !self.failures().is_empty()
    }

    /// One-line summary of the report
    pub fn summary(&self) -> String {
        let passed = self
            .checks
            .iter()
            .filter(|c| c.outcome == CheckOutcome::Passed)
            .count();
        format!(
            "{} passed, {} warnings, {} failed",
            passed,
            self.warnings().len(),
            self.failures().len()
        )
    }

    /// Lines written to the `.validation-warnings` file
    pub fn warning_lines(&self) -> Vec<String> {
        self.warnings()
            .iter()
            .map(|c| format!("{}: {}", c.name, c.detail))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_report() -> ValidationReport {
        ValidationReport::new(
            "ACM-1234".to_string(),
            vec![
                ValidationCheck::passed("cluster_access", 0.9, "oc whoami succeeded"),
                ValidationCheck::warning("jenkins", 0.5, "console endpoint unreachable"),
                ValidationCheck::failed("artifact", 0.95, "test plan is empty"),
            ],
        )
    }

    #[test]
    fn test_summary_counts() {
        let report = sample_report();
        assert_eq!(report.summary(), "1 passed, 1 warnings, 1 failed");
        assert!(report.has_warnings());
        assert!(report.has_failures());
    }

    #[test]
    fn test_warning_lines() {
        let report = sample_report();
        let lines = report.warning_lines();
        assert_eq!(lines.len(), 1);
        assert!(lines[0].starts_with("jenkins:"));
    }

    #[test]
    fn test_clean_report() {
        let report = ValidationReport::new(
            "ACM-1234".to_string(),
            vec![ValidationCheck::passed("artifact", 0.95, "ok")],
        );
        assert!(!report.has_warnings());
        assert!(!report.has_failures());
    }
}
