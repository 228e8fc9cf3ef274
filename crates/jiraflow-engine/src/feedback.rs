//! Feedback manager

use std::path::PathBuf;
use std::sync::Arc;

use crate::event_manager::EventManager;
use crate::events::FeedbackEvent;
use jiraflow_core::{
    models::{FeedbackRecord, ReviewVerdict, StageId},
    storage::FeedbackStorage,
    Result as CoreResult,
};

/// Records review verdicts into the append-only feedback database.
pub struct FeedbackManager {
    storage: FeedbackStorage,
    event_manager: Arc<EventManager>,
}

impl FeedbackManager {
    pub fn new(event_manager: Arc<EventManager>, data_dir: PathBuf) -> Self {
        Self {
            storage: FeedbackStorage::new(data_dir),
            event_manager,
        }
    }

    pub fn record(
        &self,
        run_id: String,
        ticket_key: String,
        stage: StageId,
        verdict: ReviewVerdict,
        notes: Option<String>,
    ) -> CoreResult<FeedbackRecord> {
        let record = FeedbackRecord::new(run_id, ticket_key.clone(), stage, verdict, notes);
        self.storage.append(record.clone())?;

        self.event_manager
            .emit_feedback(FeedbackEvent::recorded(ticket_key, stage, verdict));

        Ok(record)
    }

    /// Feedback history for one ticket, oldest first
    pub fn history(&self, ticket_key: &str) -> CoreResult<Vec<FeedbackRecord>> {
        self.storage.for_ticket(ticket_key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_record_and_history() {
        let temp_dir = TempDir::new().unwrap();
        let event_manager = Arc::new(EventManager::new());
        let mut receiver = event_manager.subscribe();

        let manager = FeedbackManager::new(event_manager, temp_dir.path().to_path_buf());

        manager
            .record(
                "run-1".to_string(),
                "ACM-1".to_string(),
                StageId::Review,
                ReviewVerdict::Modified,
                Some("add a negative case".to_string()),
            )
            .unwrap();

        let history = manager.history("ACM-1").unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].verdict, ReviewVerdict::Modified);

        let event = receiver.recv().await.unwrap();
        assert!(matches!(event, crate::events::EngineEvent::Feedback(_)));
    }
}
