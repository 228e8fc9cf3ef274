//! Test implementation stage

use async_trait::async_trait;
use jiraflow_assistant::{prompt, run_with_retry};
use jiraflow_core::models::{ReviewVerdict, StageId};

use super::{Result, Stage, StageContext, StageError, StageOutcome};

/// Generates the test implementation from the approved plan.
pub struct Implementation;

/// Reviewer notes for the implementation prompt. On a resumed run the
/// in-memory notes are gone; the latest Modified verdict in the feedback
/// database still carries them.
fn review_notes(ctx: &StageContext) -> Result<Option<String>> {
    if let Some(ref notes) = ctx.review_notes {
        return Ok(Some(notes.clone()));
    }

    let notes = ctx
        .feedback
        .history(&ctx.ticket.key)?
        .into_iter()
        .rev()
        .find(|r| r.verdict == ReviewVerdict::Modified)
        .and_then(|r| r.notes);
    Ok(notes)
}

#[async_trait]
impl Stage for Implementation {
    fn id(&self) -> StageId {
        StageId::Implementation
    }

    async fn run(&self, ctx: &mut StageContext) -> Result<StageOutcome> {
        let test_plan = ctx.artifact(StageId::TestPlan)?;
        let notes = review_notes(ctx)?;
        let prompt = prompt::implementation_prompt(&ctx.ticket, &test_plan, notes.as_deref());
        let outcome = run_with_retry(ctx.backend.as_ref(), &prompt, &ctx.retry).await;

        match outcome.output {
            Some(body) => {
                let path =
                    ctx.store_artifact(StageId::Implementation, "Test Implementation", body)?;
                Ok(StageOutcome::new(format!(
                    "implementation saved to {}",
                    path.display()
                )))
            }
            None => Err(StageError::Environment(
                outcome
                    .warning
                    .unwrap_or_else(|| "implementation generation failed".to_string()),
            )),
        }
    }
}
