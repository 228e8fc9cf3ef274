//! Pipeline sequencing

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use jiraflow_assistant::{AssistantBackend, RetryPolicy};
use jiraflow_core::{
    models::{StageId, StageStatus, TeamConfig, Ticket},
    storage::ReportStorage,
};

use crate::event_manager::EventManager;
use crate::feedback::FeedbackManager;
use crate::review::ReviewGate;
use crate::stages::{stage_for, StageContext, StageError};
use crate::workflow::{WorkflowManager, WorkflowManagerError};

#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("Core error: {0}")]
    Core(#[from] jiraflow_core::Error),

    #[error("Workflow error: {0}")]
    Workflow(#[from] WorkflowManagerError),

    #[error("Stage '{stage}' failed: {source}")]
    Stage {
        stage: StageId,
        #[source]
        source: StageError,
    },
}

pub type Result<T> = std::result::Result<T, PipelineError>;

#[derive(Debug, Clone)]
pub struct PipelineOptions {
    pub data_dir: PathBuf,
    pub test_plan_only: bool,
    pub force: bool,
    pub retry: RetryPolicy,
}

/// What a finished run looks like to the caller.
#[derive(Debug)]
pub struct PipelineSummary {
    pub ticket_key: String,
    pub run_id: String,
    pub completed: Vec<StageId>,
    pub skipped: Vec<StageId>,
    pub warnings: Vec<String>,
    pub reports: Vec<PathBuf>,
}

/// Sequences the pipeline stages for one ticket run.
pub struct Pipeline {
    workflow: WorkflowManager,
    ctx: StageContext,
    test_plan_only: bool,
}

impl Pipeline {
    pub fn new(
        ticket: Ticket,
        config: TeamConfig,
        backend: Arc<dyn AssistantBackend>,
        gate: Arc<dyn ReviewGate>,
        event_manager: Arc<EventManager>,
        options: PipelineOptions,
    ) -> Result<Self> {
        ticket.validate()?;
        config.validate()?;

        let workflow = WorkflowManager::new(
            event_manager.clone(),
            options.data_dir.clone(),
            &ticket.key,
            options.force,
        )?;

        let feedback = Arc::new(FeedbackManager::new(
            event_manager.clone(),
            options.data_dir.clone(),
        ));

        let ctx = StageContext {
            ticket,
            config,
            data_dir: options.data_dir.clone(),
            run_id: String::new(), // filled in before the first stage runs
            backend,
            gate,
            events: event_manager,
            feedback,
            reports: ReportStorage::new(options.data_dir),
            retry: options.retry,
            artifacts: HashMap::new(),
            review_notes: None,
            warnings: Vec::new(),
        };

        Ok(Self {
            workflow,
            ctx,
            test_plan_only: options.test_plan_only,
        })
    }

    /// Run the pipeline to completion. Already-completed stages from a
    /// resumed run are left untouched; under `--test-plan-only` the
    /// stages after Review are skipped.
    pub async fn run(mut self) -> Result<PipelineSummary> {
        self.ctx.run_id = self.workflow.run_id().await;

        for stage in StageId::all() {
            if self.workflow.status(stage).await == StageStatus::Completed {
                tracing::info!(stage = %stage, "stage already completed, skipping");
                continue;
            }

            if self.test_plan_only && stage > StageId::Review {
                self.workflow
                    .skip_stage(stage, "test-plan-only run".to_string())
                    .await?;
                continue;
            }

            self.workflow.start_stage(stage).await?;

            let implementation = stage_for(stage);
            match implementation.run(&mut self.ctx).await {
                Ok(outcome) => {
                    self.workflow
                        .complete_stage(stage, Some(outcome.detail))
                        .await?;
                }
                Err(e) => {
                    self.workflow.fail_stage(stage, e.to_string()).await?;
                    return Err(PipelineError::Stage { stage, source: e });
                }
            }
        }

        self.summary().await
    }

    async fn summary(self) -> Result<PipelineSummary> {
        let state = self.workflow.state().await;

        let skipped = state
            .stages
            .iter()
            .filter(|r| r.status == StageStatus::Skipped)
            .map(|r| r.stage)
            .collect();

        let reports = self.ctx.reports.list(&state.ticket_key)?;

        Ok(PipelineSummary {
            ticket_key: state.ticket_key.clone(),
            run_id: state.run_id.clone(),
            completed: state.completed_stages(),
            skipped,
            warnings: self.ctx.warnings,
            reports,
        })
    }
}
