use std::sync::Arc;

use async_trait::async_trait;
use jiraflow_assistant::{AssistantBackend, RetryPolicy};
use jiraflow_core::models::{
    ReviewVerdict, StageId, StageStatus, TeamConfig, Ticket,
};
use jiraflow_core::storage::{FeedbackStorage, WorkflowStorage};
use jiraflow_engine::{
    AutoApproveGate, EventManager, Pipeline, PipelineError, PipelineOptions, ReviewDecision,
    ReviewGate,
};
use tempfile::TempDir;

struct StubBackend;

#[async_trait]
impl AssistantBackend for StubBackend {
    async fn generate(&self, prompt: &str) -> jiraflow_assistant::Result<String> {
        // Echo a recognizable document per stage
        let header = if prompt.starts_with("You are writing a test plan") {
            "# Test Plan"
        } else if prompt.starts_with("You are implementing") {
            "# Test Implementation"
        } else if prompt.starts_with("You are reviewing") {
            "# Quality Review"
        } else {
            "# Ticket Analysis"
        };
        Ok(format!("{}\n\nGenerated content", header))
    }

    fn describe(&self) -> String {
        "stub".to_string()
    }
}

struct RejectingGate;

#[async_trait]
impl ReviewGate for RejectingGate {
    async fn review(
        &self,
        _ticket: &Ticket,
        _test_plan: &str,
    ) -> std::io::Result<ReviewDecision> {
        Ok(ReviewDecision::Rejected {
            reason: "wrong component".to_string(),
        })
    }
}

fn sample_ticket() -> Ticket {
    Ticket::new(
        "ACM-2290".to_string(),
        "Digest-based upgrades in ClusterCurator".to_string(),
    )
    .unwrap()
}

fn options(temp_dir: &TempDir) -> PipelineOptions {
    PipelineOptions {
        data_dir: temp_dir.path().to_path_buf(),
        test_plan_only: false,
        force: false,
        retry: RetryPolicy {
            max_attempts: 2,
            delay: std::time::Duration::from_millis(1),
        },
    }
}

fn pipeline(
    temp_dir: &TempDir,
    gate: Arc<dyn ReviewGate>,
    opts: PipelineOptions,
) -> Pipeline {
    Pipeline::new(
        sample_ticket(),
        TeamConfig::default(),
        Arc::new(StubBackend),
        gate,
        Arc::new(EventManager::new()),
        opts,
    )
    .unwrap()
}

#[tokio::test]
async fn test_full_run_completes_every_stage() {
    let temp_dir = TempDir::new().unwrap();

    let summary = pipeline(&temp_dir, Arc::new(AutoApproveGate), options(&temp_dir))
        .run()
        .await
        .unwrap();

    assert_eq!(summary.ticket_key, "ACM-2290");
    assert_eq!(summary.completed.len(), 7);
    assert!(summary.skipped.is_empty());

    // Reports on disk: analysis, test plan, implementation, quality, validation.json
    assert_eq!(summary.reports.len(), 5);

    // State file reflects completion
    let storage = WorkflowStorage::new(temp_dir.path().to_path_buf());
    let state = storage.load("ACM-2290").unwrap().unwrap();
    assert!(state.is_finished());
    assert!(!state.has_failures());

    // Review verdict recorded in the feedback database
    let feedback = FeedbackStorage::new(temp_dir.path().to_path_buf());
    let records = feedback.for_ticket("ACM-2290").unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].verdict, ReviewVerdict::Approved);
    assert_eq!(records[0].run_id, summary.run_id);
}

#[tokio::test]
async fn test_test_plan_only_skips_later_stages() {
    let temp_dir = TempDir::new().unwrap();
    let opts = PipelineOptions {
        test_plan_only: true,
        ..options(&temp_dir)
    };

    let summary = pipeline(&temp_dir, Arc::new(AutoApproveGate), opts)
        .run()
        .await
        .unwrap();

    assert_eq!(summary.completed.len(), 5);
    assert_eq!(
        summary.skipped,
        vec![StageId::Implementation, StageId::Quality]
    );

    let storage = WorkflowStorage::new(temp_dir.path().to_path_buf());
    let state = storage.load("ACM-2290").unwrap().unwrap();
    assert_eq!(state.status(StageId::Implementation), StageStatus::Skipped);
    assert_eq!(state.status(StageId::Quality), StageStatus::Skipped);
}

#[tokio::test]
async fn test_rejection_fails_review_stage() {
    let temp_dir = TempDir::new().unwrap();

    let result = pipeline(&temp_dir, Arc::new(RejectingGate), options(&temp_dir))
        .run()
        .await;

    match result {
        Err(PipelineError::Stage { stage, .. }) => assert_eq!(stage, StageId::Review),
        other => panic!("expected review stage failure, got {:?}", other.map(|_| ())),
    }

    let storage = WorkflowStorage::new(temp_dir.path().to_path_buf());
    let state = storage.load("ACM-2290").unwrap().unwrap();
    assert_eq!(state.status(StageId::Review), StageStatus::Failed);
    assert_eq!(state.status(StageId::Implementation), StageStatus::Pending);

    let feedback = FeedbackStorage::new(temp_dir.path().to_path_buf());
    let records = feedback.for_ticket("ACM-2290").unwrap();
    assert_eq!(records[0].verdict, ReviewVerdict::Rejected);
}

#[tokio::test]
async fn test_resume_after_rejection_reuses_artifacts() {
    let temp_dir = TempDir::new().unwrap();

    // First run: rejected at review
    let result = pipeline(&temp_dir, Arc::new(RejectingGate), options(&temp_dir))
        .run()
        .await;
    assert!(result.is_err());

    // Second run resumes: completed stages stay completed, review passes
    let summary = pipeline(&temp_dir, Arc::new(AutoApproveGate), options(&temp_dir))
        .run()
        .await
        .unwrap();

    assert_eq!(summary.completed.len(), 7);

    // Both verdicts live in the append-only database
    let feedback = FeedbackStorage::new(temp_dir.path().to_path_buf());
    let records = feedback.for_ticket("ACM-2290").unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].verdict, ReviewVerdict::Rejected);
    assert_eq!(records[1].verdict, ReviewVerdict::Approved);
}

#[tokio::test]
async fn test_events_are_broadcast() {
    let temp_dir = TempDir::new().unwrap();
    let event_manager = Arc::new(EventManager::new());
    let mut receiver = event_manager.subscribe();

    let pipeline = Pipeline::new(
        sample_ticket(),
        TeamConfig::default(),
        Arc::new(StubBackend),
        Arc::new(AutoApproveGate),
        event_manager,
        options(&temp_dir),
    )
    .unwrap();

    pipeline.run().await.unwrap();

    // 7 started + 7 completed + 1 feedback + 1 validation
    let mut count = 0;
    while receiver.try_recv().is_ok() {
        count += 1;
    }
    assert_eq!(count, 16);
}
