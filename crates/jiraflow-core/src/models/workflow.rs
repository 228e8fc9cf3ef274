//! Workflow run state

use crate::{Error, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The fixed, ordered pipeline stages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StageId {
    EnvironmentSetup,
    RepoAccess,
    Analysis,
    TestPlan,
    Review,
    Implementation,
    Quality,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StageStatus {
    Pending,
    InProgress,
    Completed,
    Failed,
    Skipped,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StageRecord {
    pub stage: StageId,
    pub status: StageStatus,
    pub started_at: Option<DateTime<Utc>>,
    pub finished_at: Option<DateTime<Utc>>,
    pub detail: Option<String>,
}

/// Per-run workflow state, persisted as `workflow-state.json`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WorkflowState {
    pub run_id: String,
    pub ticket_key: String,
    pub stages: Vec<StageRecord>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl StageId {
    /// All stages in pipeline order
    pub fn all() -> [StageId; 7] {
        [
            StageId::EnvironmentSetup,
            StageId::RepoAccess,
            StageId::Analysis,
            StageId::TestPlan,
            StageId::Review,
            StageId::Implementation,
            StageId::Quality,
        ]
    }

    /// Stable wire name used in state files and report file names
    pub fn as_str(&self) -> &'static str {
        match self {
            StageId::EnvironmentSetup => "environment_setup",
            StageId::RepoAccess => "repo_access",
            StageId::Analysis => "analysis",
            StageId::TestPlan => "test_plan",
            StageId::Review => "review",
            StageId::Implementation => "implementation",
            StageId::Quality => "quality",
        }
    }

    /// Human-readable stage name
    pub fn display_name(&self) -> &'static str {
        match self {
            StageId::EnvironmentSetup => "Environment Setup",
            StageId::RepoAccess => "Repository Access",
            StageId::Analysis => "Analysis",
            StageId::TestPlan => "Test Plan",
            StageId::Review => "Review",
            StageId::Implementation => "Implementation",
            StageId::Quality => "Quality Validation",
        }
    }

    /// The stage after this one, if any
    pub fn next(&self) -> Option<StageId> {
        let all = StageId::all();
        let index = all.iter().position(|s| s == self)?;
        all.get(index + 1).copied()
    }

    /// Zero-based position in the pipeline
    pub fn position(&self) -> usize {
        StageId::all().iter().position(|s| s == self).unwrap_or(0)
    }
}

impl std::fmt::Display for StageId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl StageStatus {
    /// Whether the stage no longer blocks later stages
    pub fn is_cleared(&self) -> bool {
        matches!(self, StageStatus::Completed | StageStatus::Skipped)
    }

    /// Whether the stage reached a terminal state
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            StageStatus::Completed | StageStatus::Failed | StageStatus::Skipped
        )
    }
}

impl WorkflowState {
    /// Create a fresh run with every stage pending
    pub fn new(ticket_key: String) -> Result<Self> {
        crate::models::ticket::validate_key(&ticket_key)?;

        let now = Utc::now();
        let stages = StageId::all()
            .iter()
            .map(|stage| StageRecord {
                stage: *stage,
                status: StageStatus::Pending,
                started_at: None,
                finished_at: None,
                detail: None,
            })
            .collect();

        Ok(Self {
            run_id: Uuid::new_v4().to_string(),
            ticket_key,
            stages,
            created_at: now,
            updated_at: now,
        })
    }

    /// Look up the record for a stage
    pub fn record(&self, stage: StageId) -> Option<&StageRecord> {
        self.stages.iter().find(|r| r.stage == stage)
    }

    fn record_mut(&mut self, stage: StageId) -> Result<&mut StageRecord> {
        self.stages
            .iter_mut()
            .find(|r| r.stage == stage)
            .ok_or_else(|| Error::NotFound(format!("Stage not in state: {}", stage)))
    }

    /// Current status of a stage
    pub fn status(&self, stage: StageId) -> StageStatus {
        self.record(stage)
            .map(|r| r.status)
            .unwrap_or(StageStatus::Pending)
    }

    /// Mark a stage in progress. Every earlier stage must already be
    /// completed or skipped.
    pub fn start_stage(&mut self, stage: StageId) -> Result<()> {
        for earlier in StageId::all().iter().take(stage.position()) {
            if !self.status(*earlier).is_cleared() {
                return Err(Error::Validation(format!(
                    "Cannot start stage '{}' before '{}' is complete",
                    stage, earlier
                )));
            }
        }

        let record = self.record_mut(stage)?;
        if record.status == StageStatus::Completed {
            return Err(Error::Validation(format!(
                "Stage '{}' is already completed",
                stage
            )));
        }

        record.status = StageStatus::InProgress;
        record.started_at = Some(Utc::now());
        record.finished_at = None;
        record.detail = None;
        self.touch();
        Ok(())
    }

    /// Mark a stage completed
    pub fn complete_stage(&mut self, stage: StageId, detail: Option<String>) -> Result<()> {
        let record = self.record_mut(stage)?;
        if record.status != StageStatus::InProgress {
            return Err(Error::Validation(format!(
                "Stage '{}' is not in progress",
                stage
            )));
        }
        record.status = StageStatus::Completed;
        record.finished_at = Some(Utc::now());
        record.detail = detail;
        self.touch();
        Ok(())
    }

    /// Mark a stage failed with a reason
    pub fn fail_stage(&mut self, stage: StageId, detail: String) -> Result<()> {
        let record = self.record_mut(stage)?;
        record.status = StageStatus::Failed;
        record.finished_at = Some(Utc::now());
        record.detail = Some(detail);
        self.touch();
        Ok(())
    }

    /// Mark a stage skipped with a reason
    pub fn skip_stage(&mut self, stage: StageId, detail: String) -> Result<()> {
        let record = self.record_mut(stage)?;
        if record.status == StageStatus::Completed {
            return Err(Error::Validation(format!(
                "Cannot skip completed stage '{}'",
                stage
            )));
        }
        record.status = StageStatus::Skipped;
        record.finished_at = Some(Utc::now());
        record.detail = Some(detail);
        self.touch();
        Ok(())
    }

    /// Reset a failed stage back to pending so it can be retried
    pub fn reset_stage(&mut self, stage: StageId) -> Result<()> {
        let record = self.record_mut(stage)?;
        record.status = StageStatus::Pending;
        record.started_at = None;
        record.finished_at = None;
        record.detail = None;
        self.touch();
        Ok(())
    }

    /// Whether every stage reached a terminal state
    pub fn is_finished(&self) -> bool {
        self.stages.iter().all(|r| r.status.is_terminal())
    }

    /// Whether any stage failed
    pub fn has_failures(&self) -> bool {
        self.stages.iter().any(|r| r.status == StageStatus::Failed)
    }

    /// Stages that completed, in order
    pub fn completed_stages(&self) -> Vec<StageId> {
        self.stages
            .iter()
            .filter(|r| r.status == StageStatus::Completed)
            .map(|r| r.stage)
            .collect()
    }

    /// Validate the state structure
    pub fn validate(&self) -> Result<()> {
        if self.run_id.trim().is_empty() {
            return Err(Error::Validation("Run ID cannot be empty".to_string()));
        }
        crate::models::ticket::validate_key(&self.ticket_key)?;

        if self.stages.len() != StageId::all().len() {
            return Err(Error::Validation(format!(
                "Expected {} stage records, found {}",
                StageId::all().len(),
                self.stages.len()
            )));
        }

        for (expected, record) in StageId::all().iter().zip(self.stages.iter()) {
            if record.stage != *expected {
                return Err(Error::Validation(format!(
                    "Stage records out of order: expected '{}', found '{}'",
                    expected, record.stage
                )));
            }
        }

        Ok(())
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}
