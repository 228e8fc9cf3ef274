//! Workflow state storage operations

use crate::{models::WorkflowState, Result};
use std::path::PathBuf;

pub struct WorkflowStorage {
    data_dir: PathBuf,
}

impl WorkflowStorage {
    pub fn new(data_dir: PathBuf) -> Self {
        Self { data_dir }
    }

    fn state_path(&self, ticket_key: &str) -> PathBuf {
        super::run_dir(&self.data_dir, ticket_key).join("workflow-state.json")
    }

    pub fn load(&self, ticket_key: &str) -> Result<Option<WorkflowState>> {
        let state_path = self.state_path(ticket_key);

        if !state_path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(state_path)?;
        let state: WorkflowState = serde_json::from_str(&content)?;
        state.validate()?;
        Ok(Some(state))
    }

    pub fn save(&self, state: &WorkflowState) -> Result<()> {
        state.validate()?;

        let run_dir = super::run_dir(&self.data_dir, &state.ticket_key);
        std::fs::create_dir_all(&run_dir)?;

        let content = serde_json::to_string_pretty(state)?;
        std::fs::write(run_dir.join("workflow-state.json"), content)?;

        Ok(())
    }
}
