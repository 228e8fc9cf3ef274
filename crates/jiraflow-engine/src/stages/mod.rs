//! Pipeline stage implementations

pub mod analysis;
pub mod environment;
pub mod implementation;
pub mod quality;
pub mod repo;
pub mod review;
pub mod test_plan;

pub use analysis::Analysis;
pub use environment::EnvironmentSetup;
pub use implementation::Implementation;
pub use quality::Quality;
pub use repo::RepoAccess;
pub use review::Review;
pub use test_plan::TestPlan;

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use jiraflow_assistant::{AssistantBackend, RetryPolicy};
use jiraflow_core::{
    models::{AnalysisArtifact, StageId, TeamConfig, Ticket},
    storage::ReportStorage,
};

use crate::event_manager::EventManager;
use crate::feedback::FeedbackManager;
use crate::review::ReviewGate;

#[derive(Debug, thiserror::Error)]
pub enum StageError {
    #[error("Core error: {0}")]
    Core(#[from] jiraflow_core::Error),

    #[error("Assistant error: {0}")]
    Assistant(#[from] jiraflow_assistant::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Environment error: {0}")]
    Environment(String),

    #[error("Test plan rejected: {0}")]
    Rejected(String),

    #[error("Quality validation failed: {0}")]
    ValidationFailed(String),
}

pub type Result<T> = std::result::Result<T, StageError>;

/// What a completed stage reports back for the state file.
#[derive(Debug, Clone)]
pub struct StageOutcome {
    pub detail: String,
}

impl StageOutcome {
    pub fn new(detail: impl Into<String>) -> Self {
        Self {
            detail: detail.into(),
        }
    }
}

/// Everything a stage needs: the ticket, configuration, run paths, the
/// assistant, and artifacts produced by earlier stages.
pub struct StageContext {
    pub ticket: Ticket,
    pub config: TeamConfig,
    pub data_dir: PathBuf,
    pub run_id: String,
    pub backend: Arc<dyn AssistantBackend>,
    pub gate: Arc<dyn ReviewGate>,
    pub events: Arc<EventManager>,
    pub feedback: Arc<FeedbackManager>,
    pub reports: ReportStorage,
    pub retry: RetryPolicy,
    pub artifacts: HashMap<StageId, String>,
    pub review_notes: Option<String>,
    pub warnings: Vec<String>,
}

impl StageContext {
    /// Directory holding this run's artifacts
    pub fn run_dir(&self) -> PathBuf {
        jiraflow_core::storage::run_dir(&self.data_dir, &self.ticket.key)
    }

    /// Artifact body from an earlier stage, consulting saved reports when
    /// the stage ran in a previous invocation.
    pub fn artifact(&self, stage: StageId) -> Result<String> {
        if let Some(body) = self.artifacts.get(&stage) {
            return Ok(body.clone());
        }

        match self.reports.load(&self.ticket.key, stage)? {
            Some(body) => Ok(body),
            None => Err(StageError::Environment(format!(
                "Missing artifact from stage '{}'",
                stage
            ))),
        }
    }

    /// Store a generated artifact: saved to the reports directory and kept
    /// in memory for later stages.
    pub fn store_artifact(&mut self, stage: StageId, title: &str, body: String) -> Result<PathBuf> {
        let artifact = AnalysisArtifact::new(stage, title.to_string(), body)?;
        let path = self.reports.save(&artifact, &self.ticket.key)?;
        self.artifacts.insert(stage, artifact.render());
        Ok(path)
    }

    pub fn warn(&mut self, message: impl Into<String>) {
        let message = message.into();
        tracing::warn!("{}", message);
        self.warnings.push(message);
    }
}

/// One step of the pipeline.
#[async_trait]
pub trait Stage: Send + Sync {
    fn id(&self) -> StageId;

    async fn run(&self, ctx: &mut StageContext) -> Result<StageOutcome>;
}

/// The stage implementation for a pipeline position
pub fn stage_for(stage: StageId) -> Box<dyn Stage> {
    match stage {
        StageId::EnvironmentSetup => Box::new(EnvironmentSetup),
        StageId::RepoAccess => Box::new(RepoAccess),
        StageId::Analysis => Box::new(Analysis),
        StageId::TestPlan => Box::new(TestPlan),
        StageId::Review => Box::new(Review),
        StageId::Implementation => Box::new(Implementation),
        StageId::Quality => Box::new(Quality),
    }
}
