//! Workflow state manager

use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::event_manager::EventManager;
use crate::events::StageEvent;
use jiraflow_core::{
    models::{StageId, StageStatus, WorkflowState},
    storage::WorkflowStorage,
};

#[derive(Debug, thiserror::Error)]
pub enum WorkflowManagerError {
    #[error("Storage error: {0}")]
    Storage(#[from] jiraflow_core::Error),

    #[error("Invalid transition: {0}")]
    InvalidTransition(String),

    #[error("Run already completed for '{0}' (use --force to start over)")]
    AlreadyCompleted(String),
}

pub type Result<T> = std::result::Result<T, WorkflowManagerError>;

/// Owns the run's workflow state, persisting every transition and
/// broadcasting stage events.
pub struct WorkflowManager {
    storage: WorkflowStorage,
    state: Arc<RwLock<WorkflowState>>,
    event_manager: Arc<EventManager>,
}

impl WorkflowManager {
    /// Open or create the workflow state for a ticket.
    ///
    /// An existing run resumes: failed or interrupted stages reset to
    /// pending, completed stages keep their records. A finished run
    /// refuses to restart unless `force` is set, which discards the old
    /// state entirely.
    pub fn new(
        event_manager: Arc<EventManager>,
        data_dir: PathBuf,
        ticket_key: &str,
        force: bool,
    ) -> Result<Self> {
        let storage = WorkflowStorage::new(data_dir);

        let state = match storage.load(ticket_key)? {
            Some(existing) if force => {
                tracing::info!(ticket = ticket_key, "discarding previous run state");
                drop(existing);
                WorkflowState::new(ticket_key.to_string())?
            }
            Some(mut existing) => {
                if existing.is_finished() && !existing.has_failures() {
                    return Err(WorkflowManagerError::AlreadyCompleted(
                        ticket_key.to_string(),
                    ));
                }
                for stage in StageId::all() {
                    let status = existing.status(stage);
                    if status == StageStatus::Failed || status == StageStatus::InProgress {
                        existing.reset_stage(stage)?;
                    }
                }
                tracing::info!(ticket = ticket_key, "resuming previous run");
                existing
            }
            None => WorkflowState::new(ticket_key.to_string())?,
        };

        storage.save(&state)?;

        Ok(Self {
            storage,
            state: Arc::new(RwLock::new(state)),
            event_manager,
        })
    }

    pub async fn run_id(&self) -> String {
        self.state.read().await.run_id.clone()
    }

    pub async fn state(&self) -> WorkflowState {
        self.state.read().await.clone()
    }

    pub async fn status(&self, stage: StageId) -> StageStatus {
        self.state.read().await.status(stage)
    }

    pub async fn start_stage(&self, stage: StageId) -> Result<()> {
        let mut state = self.state.write().await;
        state
            .start_stage(stage)
            .map_err(|e| WorkflowManagerError::InvalidTransition(e.to_string()))?;
        self.storage.save(&state)?;

        self.event_manager
            .emit_stage(StageEvent::started(state.ticket_key.clone(), stage));
        Ok(())
    }

    pub async fn complete_stage(&self, stage: StageId, detail: Option<String>) -> Result<()> {
        let mut state = self.state.write().await;
        state
            .complete_stage(stage, detail.clone())
            .map_err(|e| WorkflowManagerError::InvalidTransition(e.to_string()))?;
        self.storage.save(&state)?;

        self.event_manager.emit_stage(StageEvent::completed(
            state.ticket_key.clone(),
            stage,
            detail,
        ));
        Ok(())
    }

    pub async fn fail_stage(&self, stage: StageId, detail: String) -> Result<()> {
        let mut state = self.state.write().await;
        state
            .fail_stage(stage, detail.clone())
            .map_err(|e| WorkflowManagerError::InvalidTransition(e.to_string()))?;
        self.storage.save(&state)?;

        self.event_manager
            .emit_stage(StageEvent::failed(state.ticket_key.clone(), stage, detail));
        Ok(())
    }

    pub async fn skip_stage(&self, stage: StageId, reason: String) -> Result<()> {
        let mut state = self.state.write().await;
        state
            .skip_stage(stage, reason.clone())
            .map_err(|e| WorkflowManagerError::InvalidTransition(e.to_string()))?;
        self.storage.save(&state)?;

        self.event_manager.emit_stage(StageEvent::skipped(
            state.ticket_key.clone(),
            stage,
            reason,
        ));
        Ok(())
    }
}
