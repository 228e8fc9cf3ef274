//! Validation checks
//!
//! Each check runs a command or HTTP probe, inspects the output, and
//! assigns a fixed confidence for its kind. Warnings accumulate in the
//! run's `.validation-warnings` file; only hard failures stop the run.

use std::process::Stdio;
use std::time::Duration;

use jiraflow_assistant::response::has_meta_preamble;
use jiraflow_core::models::{StageId, ValidationCheck, ValidationReport};
use tokio::process::Command;

use crate::stages::StageContext;

const PROBE_TIMEOUT: Duration = Duration::from_secs(10);

// Fixed confidence per check kind
const CONFIDENCE_ARTIFACT: f64 = 0.95;
const CONFIDENCE_ARTIFACT_SUSPECT: f64 = 0.6;
const CONFIDENCE_CLUSTER: f64 = 0.9;
const CONFIDENCE_REPO: f64 = 0.85;
const CONFIDENCE_JENKINS: f64 = 0.85;
const CONFIDENCE_UNAVAILABLE: f64 = 0.5;

enum Probe {
    Success(String),
    Failed(String),
    Missing,
    TimedOut,
}

pub struct ValidationEngine;

impl ValidationEngine {
    pub fn new() -> Self {
        Self
    }

    /// Run every applicable check and collect the report.
    pub async fn run(&self, ctx: &StageContext) -> ValidationReport {
        let mut checks = Vec::new();

        self.check_artifacts(ctx, &mut checks);
        self.check_cluster(ctx, &mut checks).await;
        self.check_repositories(ctx, &mut checks).await;
        self.check_jenkins(ctx, &mut checks).await;

        ValidationReport::new(ctx.ticket.key.clone(), checks)
    }

    /// Generated artifacts exist and are free of meta-commentary preambles
    fn check_artifacts(&self, ctx: &StageContext, checks: &mut Vec<ValidationCheck>) {
        for stage in [StageId::Analysis, StageId::TestPlan, StageId::Implementation] {
            let name = format!("artifact:{}", stage);
            match ctx.artifact(stage) {
                Ok(body) if body.trim().is_empty() => {
                    checks.push(ValidationCheck::failed(
                        name,
                        CONFIDENCE_ARTIFACT,
                        format!("generated {} document is empty", stage),
                    ));
                }
                Ok(body) if has_meta_preamble(&body) => {
                    checks.push(ValidationCheck::warning(
                        name,
                        CONFIDENCE_ARTIFACT_SUSPECT,
                        format!("{} document opens with meta-commentary", stage),
                    ));
                }
                Ok(_) => {
                    checks.push(ValidationCheck::passed(
                        name,
                        CONFIDENCE_ARTIFACT,
                        "document present",
                    ));
                }
                Err(_) => {
                    checks.push(ValidationCheck::warning(
                        name,
                        CONFIDENCE_UNAVAILABLE,
                        format!("no {} document found for this run", stage),
                    ));
                }
            }
        }
    }

    /// Cluster login works (`oc whoami`), when a cluster is configured
    async fn check_cluster(&self, ctx: &StageContext, checks: &mut Vec<ValidationCheck>) {
        if ctx.config.cluster_console_url.is_none() {
            return;
        }

        let check = match probe_command("oc", &["whoami"]).await {
            Probe::Success(user) => ValidationCheck::passed(
                "cluster_access",
                CONFIDENCE_CLUSTER,
                format!("authenticated as {}", user.trim()),
            ),
            Probe::Failed(stderr) => ValidationCheck::warning(
                "cluster_access",
                CONFIDENCE_UNAVAILABLE,
                format!("oc whoami failed: {}", stderr.trim()),
            ),
            Probe::Missing => ValidationCheck::warning(
                "cluster_access",
                CONFIDENCE_UNAVAILABLE,
                "oc is not installed",
            ),
            Probe::TimedOut => ValidationCheck::warning(
                "cluster_access",
                CONFIDENCE_UNAVAILABLE,
                "oc whoami timed out",
            ),
        };
        checks.push(check);
    }

    /// Each configured repository answers `git ls-remote`
    async fn check_repositories(&self, ctx: &StageContext, checks: &mut Vec<ValidationCheck>) {
        for repo in &ctx.config.repositories {
            let name = format!("repo:{}", repo.name);
            let check = match probe_command("git", &["ls-remote", &repo.url, "HEAD"]).await {
                Probe::Success(_) => {
                    ValidationCheck::passed(name, CONFIDENCE_REPO, "remote reachable")
                }
                Probe::Failed(stderr) => ValidationCheck::warning(
                    name,
                    CONFIDENCE_UNAVAILABLE,
                    format!("ls-remote failed: {}", stderr.trim()),
                ),
                Probe::Missing => {
                    ValidationCheck::warning(name, CONFIDENCE_UNAVAILABLE, "git is not installed")
                }
                Probe::TimedOut => {
                    ValidationCheck::warning(name, CONFIDENCE_UNAVAILABLE, "ls-remote timed out")
                }
            };
            checks.push(check);
        }
    }

    /// Jenkins console endpoint answers, when configured
    async fn check_jenkins(&self, ctx: &StageContext, checks: &mut Vec<ValidationCheck>) {
        let Some(url) = ctx.config.jenkins_base_url.clone() else {
            return;
        };

        let client = match reqwest::Client::builder().timeout(PROBE_TIMEOUT).build() {
            Ok(client) => client,
            Err(e) => {
                checks.push(ValidationCheck::warning(
                    "jenkins",
                    CONFIDENCE_UNAVAILABLE,
                    format!("http client error: {}", e),
                ));
                return;
            }
        };

        let check = match client.get(&url).send().await {
            Ok(response) if response.status().is_success() => {
                ValidationCheck::passed("jenkins", CONFIDENCE_JENKINS, "console endpoint reachable")
            }
            Ok(response) => ValidationCheck::warning(
                "jenkins",
                CONFIDENCE_UNAVAILABLE,
                format!("console endpoint returned {}", response.status()),
            ),
            Err(e) => ValidationCheck::warning(
                "jenkins",
                CONFIDENCE_UNAVAILABLE,
                format!("console endpoint unreachable: {}", e),
            ),
        };
        checks.push(check);
    }
}

impl Default for ValidationEngine {
    fn default() -> Self {
        Self::new()
    }
}

async fn probe_command(program: &str, args: &[&str]) -> Probe {
    let mut command = Command::new(program);
    command
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    match tokio::time::timeout(PROBE_TIMEOUT, command.output()).await {
        Err(_) => Probe::TimedOut,
        Ok(Err(e)) if e.kind() == std::io::ErrorKind::NotFound => Probe::Missing,
        Ok(Err(e)) => Probe::Failed(e.to_string()),
        Ok(Ok(output)) if output.status.success() => {
            Probe::Success(String::from_utf8_lossy(&output.stdout).to_string())
        }
        Ok(Ok(output)) => Probe::Failed(String::from_utf8_lossy(&output.stderr).to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stages::testing;
    use jiraflow_core::models::CheckOutcome;
    use tempfile::TempDir;

    fn context_with_artifacts(temp_dir: &TempDir) -> StageContext {
        let mut ctx = testing::context(temp_dir.path());
        ctx.artifacts
            .insert(StageId::Analysis, "# Analysis\n\nBody".to_string());
        ctx.artifacts
            .insert(StageId::TestPlan, "# Test Plan\n\nBody".to_string());
        ctx.artifacts.insert(
            StageId::Implementation,
            "# Test Implementation\n\nBody".to_string(),
        );
        ctx
    }

    #[tokio::test]
    async fn test_clean_artifacts_pass() {
        let temp_dir = TempDir::new().unwrap();
        let ctx = context_with_artifacts(&temp_dir);

        let report = ValidationEngine::new().run(&ctx).await;
        assert!(!report.has_failures());
        assert!(!report.has_warnings());
        assert_eq!(report.checks.len(), 3);
    }

    #[tokio::test]
    async fn test_meta_preamble_warns() {
        let temp_dir = TempDir::new().unwrap();
        let mut ctx = context_with_artifacts(&temp_dir);
        ctx.artifacts.insert(
            StageId::TestPlan,
            "Here is the plan you requested\n\n# Test Plan".to_string(),
        );

        let report = ValidationEngine::new().run(&ctx).await;
        assert!(report.has_warnings());
        let warning = &report.warnings()[0];
        assert_eq!(warning.name, "artifact:test_plan");
        assert_eq!(warning.confidence, CONFIDENCE_ARTIFACT_SUSPECT);
    }

    #[tokio::test]
    async fn test_missing_artifact_warns() {
        let temp_dir = TempDir::new().unwrap();
        let ctx = testing::context(temp_dir.path());

        let report = ValidationEngine::new().run(&ctx).await;
        assert_eq!(report.warnings().len(), 3);
        assert!(!report.has_failures());
    }

    #[tokio::test]
    async fn test_unreachable_repo_warns() {
        let temp_dir = TempDir::new().unwrap();
        let mut ctx = context_with_artifacts(&temp_dir);
        ctx.config.repositories = vec![jiraflow_core::models::RepoTarget {
            name: "missing".to_string(),
            url: temp_dir.path().join("nope").to_string_lossy().to_string(),
            branch: None,
        }];

        let report = ValidationEngine::new().run(&ctx).await;
        let repo_check = report
            .checks
            .iter()
            .find(|c| c.name == "repo:missing")
            .unwrap();
        assert_eq!(repo_check.outcome, CheckOutcome::Warning);
    }

    #[tokio::test]
    async fn test_probe_success_and_failure() {
        assert!(matches!(probe_command("true", &[]).await, Probe::Success(_)));
        assert!(matches!(probe_command("false", &[]).await, Probe::Failed(_)));
        assert!(matches!(
            probe_command("definitely-not-a-command-xyz", &[]).await,
            Probe::Missing
        ));
    }
}
