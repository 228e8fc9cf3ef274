//! Review gate seam
//!
//! The Review stage presents the generated test plan to a human. The CLI
//! supplies an interactive gate; unattended contexts use auto-approval.

use async_trait::async_trait;
use jiraflow_core::models::Ticket;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReviewDecision {
    Approved,
    Rejected { reason: String },
    Modified { notes: String },
}

#[async_trait]
pub trait ReviewGate: Send + Sync {
    async fn review(&self, ticket: &Ticket, test_plan: &str)
        -> std::io::Result<ReviewDecision>;
}

/// Gate that approves every plan. Used for unattended runs and tests.
pub struct AutoApproveGate;

#[async_trait]
impl ReviewGate for AutoApproveGate {
    async fn review(
        &self,
        _ticket: &Ticket,
        _test_plan: &str,
    ) -> std::io::Result<ReviewDecision> {
        Ok(ReviewDecision::Approved)
    }
}
