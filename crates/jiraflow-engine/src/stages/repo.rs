//! Repository access stage

use async_trait::async_trait;
use jiraflow_core::{git::RepoWorkspace, models::StageId};

use super::{Result, Stage, StageContext, StageError, StageOutcome};

/// Clones each configured target repository into the run's workspace.
/// Individual failures degrade to warnings; the stage fails only when
/// every configured repository is unreachable.
pub struct RepoAccess;

#[async_trait]
impl Stage for RepoAccess {
    fn id(&self) -> StageId {
        StageId::RepoAccess
    }

    async fn run(&self, ctx: &mut StageContext) -> Result<StageOutcome> {
        if ctx.config.repositories.is_empty() {
            return Ok(StageOutcome::new("no repositories configured"));
        }

        let workspace = RepoWorkspace::new(ctx.run_dir().join("repos"));
        let mut reachable = 0;
        let mut warnings = Vec::new();

        for repo in ctx.config.repositories.clone() {
            match workspace.clone_or_open(&repo.name, &repo.url) {
                Ok(()) => {
                    reachable += 1;
                    tracing::info!(repo = %repo.name, "repository ready");

                    if let Some(ref branch) = repo.branch {
                        if let Err(e) = workspace.checkout_branch(&repo.name, branch) {
                            warnings
                                .push(format!("repo '{}': checkout '{}': {}", repo.name, branch, e));
                        }
                    }
                }
                Err(e) => {
                    warnings.push(format!("repo '{}': {}", repo.name, e));
                }
            }
        }

        for warning in &warnings {
            ctx.warn(warning.clone());
        }

        if reachable == 0 {
            return Err(StageError::Environment(
                "no configured repository is reachable".to_string(),
            ));
        }

        Ok(StageOutcome::new(format!(
            "{}/{} repositories ready",
            reachable,
            ctx.config.repositories.len()
        )))
    }
}
