//! Report and validation artifact storage

use crate::{
    models::{AnalysisArtifact, StageId, ValidationReport},
    Result,
};
use std::path::PathBuf;

pub struct ReportStorage {
    data_dir: PathBuf,
}

impl ReportStorage {
    pub fn new(data_dir: PathBuf) -> Self {
        Self { data_dir }
    }

    fn reports_dir(&self, ticket_key: &str) -> PathBuf {
        super::run_dir(&self.data_dir, ticket_key).join("reports")
    }

    pub fn save(&self, artifact: &AnalysisArtifact, ticket_key: &str) -> Result<PathBuf> {
        artifact.validate()?;

        let reports_dir = self.reports_dir(ticket_key);
        std::fs::create_dir_all(&reports_dir)?;

        let path = reports_dir.join(artifact.file_name());
        std::fs::write(&path, artifact.render())?;

        Ok(path)
    }

    pub fn load(&self, ticket_key: &str, stage: StageId) -> Result<Option<String>> {
        let path = self
            .reports_dir(ticket_key)
            .join(format!("{}.md", stage.as_str()));

        if !path.exists() {
            return Ok(None);
        }

        Ok(Some(std::fs::read_to_string(path)?))
    }

    /// Paths of all saved reports for a run, sorted by file name
    pub fn list(&self, ticket_key: &str) -> Result<Vec<PathBuf>> {
        let reports_dir = self.reports_dir(ticket_key);

        if !reports_dir.exists() {
            return Ok(Vec::new());
        }

        let mut paths: Vec<PathBuf> = std::fs::read_dir(reports_dir)?
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| path.is_file())
            .collect();
        paths.sort();
        Ok(paths)
    }

    pub fn save_validation(&self, report: &ValidationReport) -> Result<PathBuf> {
        let reports_dir = self.reports_dir(&report.ticket_key);
        std::fs::create_dir_all(&reports_dir)?;

        let path = reports_dir.join("validation.json");
        let content = serde_json::to_string_pretty(report)?;
        std::fs::write(&path, content)?;

        Ok(path)
    }

    /// Write warning lines to the run's `.validation-warnings` file,
    /// removing the file when there are none.
    pub fn save_warnings(&self, ticket_key: &str, lines: &[String]) -> Result<()> {
        let run_dir = super::run_dir(&self.data_dir, ticket_key);
        std::fs::create_dir_all(&run_dir)?;

        let path = run_dir.join(".validation-warnings");
        if lines.is_empty() {
            if path.exists() {
                std::fs::remove_file(path)?;
            }
            return Ok(());
        }

        let mut content = lines.join("\n");
        content.push('\n');
        std::fs::write(path, content)?;

        Ok(())
    }

    pub fn warnings_path(&self, ticket_key: &str) -> PathBuf {
        super::run_dir(&self.data_dir, ticket_key).join(".validation-warnings")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ValidationCheck;
    use tempfile::TempDir;

    #[test]
    fn test_save_and_load_artifact() {
        let temp_dir = TempDir::new().unwrap();
        let storage = ReportStorage::new(temp_dir.path().to_path_buf());

        let artifact = AnalysisArtifact::new(
            StageId::Analysis,
            "Analysis".to_string(),
            "# Ticket Analysis\n\nUpgrade path".to_string(),
        )
        .unwrap();

        let path = storage.save(&artifact, "ACM-1234").unwrap();
        assert!(path.ends_with("runs/ACM-1234/reports/analysis.md"));

        let loaded = storage.load("ACM-1234", StageId::Analysis).unwrap();
        assert_eq!(loaded.unwrap(), "# Ticket Analysis\n\nUpgrade path");
    }

    #[test]
    fn test_load_missing_report() {
        let temp_dir = TempDir::new().unwrap();
        let storage = ReportStorage::new(temp_dir.path().to_path_buf());
        assert!(storage.load("ACM-1234", StageId::TestPlan).unwrap().is_none());
    }

    #[test]
    fn test_list_reports() {
        let temp_dir = TempDir::new().unwrap();
        let storage = ReportStorage::new(temp_dir.path().to_path_buf());

        for (stage, title) in [
            (StageId::Analysis, "Analysis"),
            (StageId::TestPlan, "Test Plan"),
        ] {
            let artifact =
                AnalysisArtifact::new(stage, title.to_string(), "body".to_string()).unwrap();
            storage.save(&artifact, "ACM-1234").unwrap();
        }

        let paths = storage.list("ACM-1234").unwrap();
        assert_eq!(paths.len(), 2);
    }

    #[test]
    fn test_warnings_file_lifecycle() {
        let temp_dir = TempDir::new().unwrap();
        let storage = ReportStorage::new(temp_dir.path().to_path_buf());

        storage
            .save_warnings("ACM-1234", &["jenkins: unreachable".to_string()])
            .unwrap();
        let path = storage.warnings_path("ACM-1234");
        assert!(path.exists());
        assert!(std::fs::read_to_string(&path)
            .unwrap()
            .contains("jenkins: unreachable"));

        storage.save_warnings("ACM-1234", &[]).unwrap();
        assert!(!path.exists());
    }

    #[test]
    fn test_save_validation_report() {
        let temp_dir = TempDir::new().unwrap();
        let storage = ReportStorage::new(temp_dir.path().to_path_buf());

        let report = ValidationReport::new(
            "ACM-1234".to_string(),
            vec![ValidationCheck::passed("artifact", 0.95, "ok")],
        );
        let path = storage.save_validation(&report).unwrap();
        assert!(path.ends_with("runs/ACM-1234/reports/validation.json"));
    }
}
