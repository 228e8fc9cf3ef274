//! Per-run feedback records

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::workflow::StageId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReviewVerdict {
    Approved,
    Rejected,
    Modified,
}

/// One feedback entry in the append-only feedback database.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FeedbackRecord {
    pub id: String,
    pub run_id: String,
    pub ticket_key: String,
    pub stage: StageId,
    pub verdict: ReviewVerdict,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl FeedbackRecord {
    pub fn new(
        run_id: String,
        ticket_key: String,
        stage: StageId,
        verdict: ReviewVerdict,
        notes: Option<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            run_id,
            ticket_key,
            stage,
            verdict,
            notes,
            created_at: Utc::now(),
        }
    }
}

impl ReviewVerdict {
    /// Human-readable verdict name
    pub fn as_str(&self) -> &'static str {
        match self {
            ReviewVerdict::Approved => "Approved",
            ReviewVerdict::Rejected => "Rejected",
            ReviewVerdict::Modified => "Modified",
        }
    }
}
