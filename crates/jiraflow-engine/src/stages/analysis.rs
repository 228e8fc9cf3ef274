//! Ticket analysis stage

use async_trait::async_trait;
use jiraflow_assistant::{prompt, run_with_retry};
use jiraflow_core::models::StageId;

use super::{Result, Stage, StageContext, StageError, StageOutcome};

/// Generates the ticket analysis document.
pub struct Analysis;

#[async_trait]
impl Stage for Analysis {
    fn id(&self) -> StageId {
        StageId::Analysis
    }

    async fn run(&self, ctx: &mut StageContext) -> Result<StageOutcome> {
        let prompt = prompt::analysis_prompt(&ctx.ticket);
        let outcome = run_with_retry(ctx.backend.as_ref(), &prompt, &ctx.retry).await;

        match outcome.output {
            Some(body) => {
                let path = ctx.store_artifact(StageId::Analysis, "Ticket Analysis", body)?;
                Ok(StageOutcome::new(format!(
                    "analysis saved to {}",
                    path.display()
                )))
            }
            None => Err(StageError::Environment(
                outcome
                    .warning
                    .unwrap_or_else(|| "analysis generation failed".to_string()),
            )),
        }
    }
}
