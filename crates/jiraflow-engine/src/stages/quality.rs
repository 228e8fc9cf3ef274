//! Quality validation stage

use async_trait::async_trait;
use jiraflow_assistant::{prompt, run_with_retry};
use jiraflow_core::models::StageId;

use super::{Result, Stage, StageContext, StageError, StageOutcome};
use crate::events::ValidationEvent;
use crate::validation::ValidationEngine;

/// Runs the validation checks over the generated artifacts and the
/// configured environment, then asks the assistant for a quality review.
/// Validation failures stop the run; the assistant review degrades to a
/// warning when unavailable.
pub struct Quality;

#[async_trait]
impl Stage for Quality {
    fn id(&self) -> StageId {
        StageId::Quality
    }

    async fn run(&self, ctx: &mut StageContext) -> Result<StageOutcome> {
        let report = ValidationEngine::new().run(ctx).await;

        ctx.reports.save_validation(&report)?;
        ctx.reports
            .save_warnings(&ctx.ticket.key, &report.warning_lines())?;
        ctx.events.emit_validation(ValidationEvent::from_report(&report));

        for line in report.warning_lines() {
            ctx.warn(line);
        }

        if report.has_failures() {
            return Err(StageError::ValidationFailed(report.summary()));
        }

        let test_plan = ctx.artifact(StageId::TestPlan)?;
        let implementation = ctx.artifact(StageId::Implementation)?;
        let prompt = prompt::quality_prompt(&ctx.ticket, &test_plan, &implementation);
        let outcome = run_with_retry(ctx.backend.as_ref(), &prompt, &ctx.retry).await;

        match outcome.output {
            Some(body) => {
                ctx.store_artifact(StageId::Quality, "Quality Review", body)?;
                Ok(StageOutcome::new(format!(
                    "validation: {}; quality review saved",
                    report.summary()
                )))
            }
            None => {
                if let Some(warning) = outcome.warning {
                    ctx.warn(warning);
                }
                Ok(StageOutcome::new(format!(
                    "validation: {}; quality review unavailable",
                    report.summary()
                )))
            }
        }
    }
}
