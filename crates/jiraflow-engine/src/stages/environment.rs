//! Environment setup stage

use async_trait::async_trait;
use jiraflow_core::models::StageId;

use super::{Result, Stage, StageContext, StageError, StageOutcome};

/// Prepares the run directory and verifies the assistant is reachable.
pub struct EnvironmentSetup;

#[async_trait]
impl Stage for EnvironmentSetup {
    fn id(&self) -> StageId {
        StageId::EnvironmentSetup
    }

    async fn run(&self, ctx: &mut StageContext) -> Result<StageOutcome> {
        let run_dir = ctx.run_dir();
        std::fs::create_dir_all(run_dir.join("reports"))?;
        std::fs::create_dir_all(run_dir.join("repos"))?;

        if !ctx.backend.is_available().await {
            return Err(StageError::Environment(format!(
                "Assistant is not available: {}",
                ctx.backend.describe()
            )));
        }

        tracing::info!(run_dir = %run_dir.display(), "run directory prepared");

        Ok(StageOutcome::new(format!(
            "run directory prepared; assistant: {}",
            ctx.backend.describe()
        )))
    }
}
