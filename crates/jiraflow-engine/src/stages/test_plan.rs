//! Test plan generation stage

use async_trait::async_trait;
use jiraflow_assistant::{prompt, run_with_retry};
use jiraflow_core::models::StageId;

use super::{Result, Stage, StageContext, StageError, StageOutcome};

/// Generates the test plan from the ticket and its analysis.
pub struct TestPlan;

#[async_trait]
impl Stage for TestPlan {
    fn id(&self) -> StageId {
        StageId::TestPlan
    }

    async fn run(&self, ctx: &mut StageContext) -> Result<StageOutcome> {
        let analysis = ctx.artifact(StageId::Analysis)?;
        let prompt = prompt::test_plan_prompt(&ctx.ticket, &analysis);
        let outcome = run_with_retry(ctx.backend.as_ref(), &prompt, &ctx.retry).await;

        match outcome.output {
            Some(body) => {
                let path = ctx.store_artifact(StageId::TestPlan, "Test Plan", body)?;
                Ok(StageOutcome::new(format!(
                    "test plan saved to {}",
                    path.display()
                )))
            }
            None => Err(StageError::Environment(
                outcome
                    .warning
                    .unwrap_or_else(|| "test plan generation failed".to_string()),
            )),
        }
    }
}
