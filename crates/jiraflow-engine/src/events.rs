use chrono::{DateTime, Utc};
use jiraflow_core::models::{ReviewVerdict, StageId, ValidationReport};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "category", rename_all = "snake_case")]
pub enum EngineEvent {
    Stage(StageEvent),
    Validation(ValidationEvent),
    Feedback(FeedbackEvent),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StageEvent {
    pub event_type: StageEventType,
    pub ticket_key: String,
    pub stage: StageId,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StageEventType {
    Started,
    Completed {
        #[serde(skip_serializing_if = "Option::is_none")]
        detail: Option<String>,
    },
    Failed {
        detail: String,
    },
    Skipped {
        reason: String,
    },
}

impl StageEvent {
    pub fn started(ticket_key: String, stage: StageId) -> Self {
        Self {
            event_type: StageEventType::Started,
            ticket_key,
            stage,
            timestamp: Utc::now(),
        }
    }

    pub fn completed(ticket_key: String, stage: StageId, detail: Option<String>) -> Self {
        Self {
            event_type: StageEventType::Completed { detail },
            ticket_key,
            stage,
            timestamp: Utc::now(),
        }
    }

    pub fn failed(ticket_key: String, stage: StageId, detail: String) -> Self {
        Self {
            event_type: StageEventType::Failed { detail },
            ticket_key,
            stage,
            timestamp: Utc::now(),
        }
    }

    pub fn skipped(ticket_key: String, stage: StageId, reason: String) -> Self {
        Self {
            event_type: StageEventType::Skipped { reason },
            ticket_key,
            stage,
            timestamp: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationEvent {
    pub ticket_key: String,
    pub summary: String,
    pub warnings: usize,
    pub failures: usize,
    pub timestamp: DateTime<Utc>,
}

impl ValidationEvent {
    pub fn from_report(report: &ValidationReport) -> Self {
        Self {
            ticket_key: report.ticket_key.clone(),
            summary: report.summary(),
            warnings: report.warnings().len(),
            failures: report.failures().len(),
            timestamp: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedbackEvent {
    pub ticket_key: String,
    pub stage: StageId,
    pub verdict: ReviewVerdict,
    pub timestamp: DateTime<Utc>,
}

impl FeedbackEvent {
    pub fn recorded(ticket_key: String, stage: StageId, verdict: ReviewVerdict) -> Self {
        Self {
            ticket_key,
            stage,
            verdict,
            timestamp: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jiraflow_core::models::ValidationCheck;

    #[test]
    fn test_stage_event_serialization() {
        let event = StageEvent::completed("ACM-1".to_string(), StageId::Analysis, None);
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("\"type\":\"completed\""));
        assert!(json.contains("\"stage\":\"analysis\""));
        assert!(!json.contains("detail"));
    }

    #[test]
    fn test_validation_event_from_report() {
        let report = ValidationReport::new(
            "ACM-1".to_string(),
            vec![
                ValidationCheck::passed("a", 0.9, "ok"),
                ValidationCheck::warning("b", 0.5, "meh"),
            ],
        );
        let event = ValidationEvent::from_report(&report);
        assert_eq!(event.warnings, 1);
        assert_eq!(event.failures, 0);
    }
}
