//! Human review gate stage

use async_trait::async_trait;
use jiraflow_core::models::{ReviewVerdict, StageId};

use super::{Result, Stage, StageContext, StageError, StageOutcome};
use crate::review::ReviewDecision;

/// Presents the test plan through the configured review gate and records
/// the verdict in the feedback database. A rejection fails the run.
pub struct Review;

#[async_trait]
impl Stage for Review {
    fn id(&self) -> StageId {
        StageId::Review
    }

    async fn run(&self, ctx: &mut StageContext) -> Result<StageOutcome> {
        let test_plan = ctx.artifact(StageId::TestPlan)?;
        let decision = ctx.gate.review(&ctx.ticket, &test_plan).await?;

        let (verdict, notes) = match &decision {
            ReviewDecision::Approved => (ReviewVerdict::Approved, None),
            ReviewDecision::Rejected { reason } => {
                (ReviewVerdict::Rejected, Some(reason.clone()))
            }
            ReviewDecision::Modified { notes } => (ReviewVerdict::Modified, Some(notes.clone())),
        };

        ctx.feedback.record(
            ctx.run_id.clone(),
            ctx.ticket.key.clone(),
            StageId::Review,
            verdict,
            notes,
        )?;

        match decision {
            ReviewDecision::Approved => Ok(StageOutcome::new("test plan approved")),
            ReviewDecision::Modified { notes } => {
                ctx.review_notes = Some(notes);
                Ok(StageOutcome::new("test plan approved with modifications"))
            }
            ReviewDecision::Rejected { reason } => Err(StageError::Rejected(reason)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::testing;
    use super::*;
    use crate::review::ReviewGate;
    use jiraflow_core::models::Ticket;
    use std::sync::Arc;
    use tempfile::TempDir;

    struct FixedGate {
        decision: ReviewDecision,
    }

    #[async_trait]
    impl ReviewGate for FixedGate {
        async fn review(
            &self,
            _ticket: &Ticket,
            _test_plan: &str,
        ) -> std::io::Result<ReviewDecision> {
            Ok(self.decision.clone())
        }
    }

    fn context_with_plan(temp_dir: &TempDir, decision: ReviewDecision) -> super::super::StageContext {
        let mut ctx = testing::context(temp_dir.path());
        ctx.gate = Arc::new(FixedGate { decision });
        ctx.artifacts
            .insert(StageId::TestPlan, "# Test Plan\n\nCases".to_string());
        ctx
    }

    #[tokio::test]
    async fn test_approval_records_feedback() {
        let temp_dir = TempDir::new().unwrap();
        let mut ctx = context_with_plan(&temp_dir, ReviewDecision::Approved);

        let outcome = Review.run(&mut ctx).await.unwrap();
        assert_eq!(outcome.detail, "test plan approved");

        let history = ctx.feedback.history("ACM-1234").unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].verdict, ReviewVerdict::Approved);
    }

    #[tokio::test]
    async fn test_modification_sets_review_notes() {
        let temp_dir = TempDir::new().unwrap();
        let mut ctx = context_with_plan(
            &temp_dir,
            ReviewDecision::Modified {
                notes: "add a negative case".to_string(),
            },
        );

        Review.run(&mut ctx).await.unwrap();
        assert_eq!(ctx.review_notes.as_deref(), Some("add a negative case"));

        let history = ctx.feedback.history("ACM-1234").unwrap();
        assert_eq!(history[0].verdict, ReviewVerdict::Modified);
        assert_eq!(history[0].notes.as_deref(), Some("add a negative case"));
    }

    #[tokio::test]
    async fn test_rejection_fails_stage() {
        let temp_dir = TempDir::new().unwrap();
        let mut ctx = context_with_plan(
            &temp_dir,
            ReviewDecision::Rejected {
                reason: "wrong component".to_string(),
            },
        );

        let result = Review.run(&mut ctx).await;
        assert!(matches!(result, Err(StageError::Rejected(_))));

        // Rejection is still recorded
        let history = ctx.feedback.history("ACM-1234").unwrap();
        assert_eq!(history[0].verdict, ReviewVerdict::Rejected);
    }
}
