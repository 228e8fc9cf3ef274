//! Generated analysis artifacts

use crate::{Error, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::workflow::StageId;

/// A generated markdown document produced by one pipeline stage.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AnalysisArtifact {
    pub stage: StageId,
    pub title: String,
    pub body: String,
    pub created_at: DateTime<Utc>,
}

impl AnalysisArtifact {
    pub fn new(stage: StageId, title: String, body: String) -> Result<Self> {
        let artifact = Self {
            stage,
            title,
            body,
            created_at: Utc::now(),
        };
        artifact.validate()?;
        Ok(artifact)
    }

    /// Validate the artifact
    pub fn validate(&self) -> Result<()> {
        if self.title.trim().is_empty() {
            return Err(Error::Validation(
                "Artifact title cannot be empty".to_string(),
            ));
        }
        if self.body.trim().is_empty() {
            return Err(Error::Validation(
                "Artifact body cannot be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// File name under the run's reports directory
    pub fn file_name(&self) -> String {
        format!("{}.md", self.stage.as_str())
    }

    /// Rendered document: title header plus body
    pub fn render(&self) -> String {
        if self.body.trim_start().starts_with('#') {
            self.body.clone()
        } else {
            format!("# {}\n\n{}", self.title, self.body)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_name() {
        let artifact = AnalysisArtifact::new(
            StageId::TestPlan,
            "Test Plan".to_string(),
            "steps".to_string(),
        )
        .unwrap();
        assert_eq!(artifact.file_name(), "test_plan.md");
    }

    #[test]
    fn test_render_adds_header() {
        let artifact = AnalysisArtifact::new(
            StageId::Analysis,
            "Analysis".to_string(),
            "The ticket concerns upgrades.".to_string(),
        )
        .unwrap();
        assert!(artifact.render().starts_with("# Analysis\n"));
    }

    #[test]
    fn test_render_keeps_existing_header() {
        let artifact = AnalysisArtifact::new(
            StageId::Analysis,
            "Analysis".to_string(),
            "# Ticket Analysis\n\nBody".to_string(),
        )
        .unwrap();
        assert!(artifact.render().starts_with("# Ticket Analysis"));
    }

    #[test]
    fn test_empty_body_rejected() {
        let result =
            AnalysisArtifact::new(StageId::Analysis, "Analysis".to_string(), "  ".to_string());
        assert!(result.is_err());
    }
}
