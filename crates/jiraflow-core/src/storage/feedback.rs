//! Feedback database storage operations

use crate::{models::FeedbackRecord, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Serialize, Deserialize)]
struct FeedbackFile {
    records: Vec<FeedbackRecord>,
}

/// Append-only feedback database. Records are added, never mutated.
pub struct FeedbackStorage {
    data_dir: PathBuf,
}

impl FeedbackStorage {
    pub fn new(data_dir: PathBuf) -> Self {
        Self { data_dir }
    }

    fn database_path(&self) -> PathBuf {
        self.data_dir.join("feedback-database.json")
    }

    pub fn load(&self) -> Result<Vec<FeedbackRecord>> {
        let path = self.database_path();

        if !path.exists() {
            return Ok(Vec::new());
        }

        let content = std::fs::read_to_string(path)?;
        if content.trim().is_empty() {
            return Ok(Vec::new());
        }

        let file: FeedbackFile = serde_json::from_str(&content)?;
        Ok(file.records)
    }

    pub fn append(&self, record: FeedbackRecord) -> Result<()> {
        std::fs::create_dir_all(&self.data_dir)?;

        let mut records = self.load()?;
        records.push(record);

        let file = FeedbackFile { records };
        let content = serde_json::to_string_pretty(&file)?;
        std::fs::write(self.database_path(), content)?;

        Ok(())
    }

    /// Records for one ticket, oldest first
    pub fn for_ticket(&self, ticket_key: &str) -> Result<Vec<FeedbackRecord>> {
        let records = self.load()?;
        Ok(records
            .into_iter()
            .filter(|r| r.ticket_key == ticket_key)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ReviewVerdict, StageId};
    use tempfile::TempDir;

    fn sample_record(ticket: &str) -> FeedbackRecord {
        FeedbackRecord::new(
            "run-1".to_string(),
            ticket.to_string(),
            StageId::Review,
            ReviewVerdict::Approved,
            None,
        )
    }

    #[test]
    fn test_load_missing_database() {
        let temp_dir = TempDir::new().unwrap();
        let storage = FeedbackStorage::new(temp_dir.path().to_path_buf());
        assert!(storage.load().unwrap().is_empty());
    }

    #[test]
    fn test_append_preserves_existing_records() {
        let temp_dir = TempDir::new().unwrap();
        let storage = FeedbackStorage::new(temp_dir.path().to_path_buf());

        storage.append(sample_record("ACM-1")).unwrap();
        storage.append(sample_record("ACM-2")).unwrap();
        storage.append(sample_record("ACM-1")).unwrap();

        let records = storage.load().unwrap();
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].ticket_key, "ACM-1");
        assert_eq!(records[1].ticket_key, "ACM-2");
    }

    #[test]
    fn test_for_ticket_filters() {
        let temp_dir = TempDir::new().unwrap();
        let storage = FeedbackStorage::new(temp_dir.path().to_path_buf());

        storage.append(sample_record("ACM-1")).unwrap();
        storage.append(sample_record("ACM-2")).unwrap();

        let records = storage.for_ticket("ACM-1").unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].ticket_key, "ACM-1");
    }
}
