use crate::{Error, Result};
use git2::{build::RepoBuilder, Cred, FetchOptions, RemoteCallbacks, Repository};
use std::path::{Path, PathBuf};

/// Workspace of cloned target repositories, one subdirectory per repo.
/// Read-only access: repositories are cloned and inspected, never pushed.
pub struct RepoWorkspace {
    base_dir: PathBuf,
}

impl RepoWorkspace {
    pub fn new(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    pub fn repo_path(&self, name: &str) -> PathBuf {
        self.base_dir.join(name)
    }

    pub fn is_cloned(&self, name: &str) -> bool {
        self.repo_path(name).join(".git").exists()
    }

    fn get_repo(&self, name: &str) -> Result<Repository> {
        Repository::open(self.repo_path(name))
            .map_err(|e| Error::InvalidData(format!("Failed to open repo '{}': {}", name, e)))
    }

    /// Clone the repository if it is not already present
    pub fn clone_or_open(&self, name: &str, url: &str) -> Result<()> {
        if self.is_cloned(name) {
            self.get_repo(name)?;
            return Ok(());
        }

        std::fs::create_dir_all(&self.base_dir)?;

        let mut callbacks = RemoteCallbacks::new();
        callbacks.credentials(|_url, username_from_url, _allowed_types| {
            Cred::ssh_key_from_agent(username_from_url.unwrap_or("git"))
        });

        let mut fetch_opts = FetchOptions::new();
        fetch_opts.remote_callbacks(callbacks);

        RepoBuilder::new()
            .fetch_options(fetch_opts)
            .clone(url, &self.repo_path(name))
            .map_err(|e| Error::InvalidData(format!("Failed to clone '{}': {}", url, e)))?;

        Ok(())
    }

    pub fn current_branch(&self, name: &str) -> Result<String> {
        let repo = self.get_repo(name)?;

        let head = repo
            .head()
            .map_err(|e| Error::InvalidData(format!("Failed to get HEAD: {}", e)))?;

        let branch = head
            .shorthand()
            .ok_or_else(|| Error::InvalidData("Failed to get branch name".to_string()))?;

        Ok(branch.to_string())
    }

    pub fn checkout_branch(&self, name: &str, branch: &str) -> Result<()> {
        let repo = self.get_repo(name)?;

        let refname = format!("refs/heads/{}", branch);
        let reference = match repo.find_reference(&refname) {
            Ok(reference) => reference,
            Err(_) => {
                // Fall back to a remote-tracking branch and create a local one
                let remote_ref = repo
                    .find_reference(&format!("refs/remotes/origin/{}", branch))
                    .map_err(|e| {
                        Error::InvalidData(format!("Branch '{}' not found: {}", branch, e))
                    })?;
                let commit = remote_ref.peel_to_commit().map_err(|e| {
                    Error::InvalidData(format!("Failed to resolve branch '{}': {}", branch, e))
                })?;
                repo.branch(branch, &commit, false)
                    .map_err(|e| Error::InvalidData(format!("Failed to create branch: {}", e)))?;
                repo.find_reference(&refname)
                    .map_err(|e| Error::InvalidData(format!("Failed to find branch: {}", e)))?
            }
        };

        let target = reference
            .name()
            .ok_or_else(|| Error::InvalidData("Invalid branch reference".to_string()))?
            .to_string();

        repo.set_head(&target)
            .map_err(|e| Error::InvalidData(format!("Failed to set HEAD: {}", e)))?;

        repo.checkout_head(Some(git2::build::CheckoutBuilder::default().force()))
            .map_err(|e| Error::InvalidData(format!("Failed to checkout: {}", e)))?;

        Ok(())
    }

    pub fn last_commit_message(&self, name: &str) -> Result<String> {
        let repo = self.get_repo(name)?;

        let head = repo
            .head()
            .map_err(|e| Error::InvalidData(format!("Failed to get HEAD: {}", e)))?;

        let commit = head
            .peel_to_commit()
            .map_err(|e| Error::InvalidData(format!("Failed to get commit: {}", e)))?;

        let message = commit
            .message()
            .ok_or_else(|| Error::InvalidData("Failed to get commit message".to_string()))?;

        Ok(message.to_string())
    }

    pub fn has_changes(&self, name: &str) -> Result<bool> {
        let repo = self.get_repo(name)?;
        let mut opts = git2::StatusOptions::new();
        opts.include_untracked(true);
        opts.include_ignored(false);

        let statuses = repo
            .statuses(Some(&mut opts))
            .map_err(|e| Error::InvalidData(format!("Failed to get status: {}", e)))?;

        Ok(!statuses.is_empty())
    }
}

/// Initialize a repository with one commit. Used by tests and fixtures.
pub fn init_repo_with_commit(path: &Path, message: &str) -> Result<()> {
    let repo = Repository::init(path)
        .map_err(|e| Error::InvalidData(format!("Failed to init git repo: {}", e)))?;

    let signature = git2::Signature::now("JiraFlow", "jiraflow@local")
        .map_err(|e| Error::InvalidData(format!("Failed to create signature: {}", e)))?;

    std::fs::write(path.join("README.md"), "# fixture\n")?;

    let mut index = repo
        .index()
        .map_err(|e| Error::InvalidData(format!("Failed to get index: {}", e)))?;
    index
        .add_all(["*"].iter(), git2::IndexAddOption::DEFAULT, None)
        .map_err(|e| Error::InvalidData(format!("Failed to add files: {}", e)))?;
    index
        .write()
        .map_err(|e| Error::InvalidData(format!("Failed to write index: {}", e)))?;

    let tree_id = index
        .write_tree()
        .map_err(|e| Error::InvalidData(format!("Failed to write tree: {}", e)))?;
    let tree = repo
        .find_tree(tree_id)
        .map_err(|e| Error::InvalidData(format!("Failed to find tree: {}", e)))?;

    repo.commit(Some("HEAD"), &signature, &signature, message, &tree, &[])
        .map_err(|e| Error::InvalidData(format!("Failed to create commit: {}", e)))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn source_repo(temp_dir: &TempDir) -> PathBuf {
        let source = temp_dir.path().join("source");
        std::fs::create_dir_all(&source).unwrap();
        init_repo_with_commit(&source, "Initial commit").unwrap();
        source
    }

    #[test]
    fn test_clone_or_open_from_local_path() {
        let temp_dir = TempDir::new().unwrap();
        let source = source_repo(&temp_dir);

        let workspace = RepoWorkspace::new(temp_dir.path().join("repos"));
        assert!(!workspace.is_cloned("curator"));

        workspace
            .clone_or_open("curator", source.to_str().unwrap())
            .unwrap();
        assert!(workspace.is_cloned("curator"));

        // Second call opens the existing clone
        workspace
            .clone_or_open("curator", source.to_str().unwrap())
            .unwrap();
    }

    #[test]
    fn test_clone_invalid_url_fails() {
        let temp_dir = TempDir::new().unwrap();
        let workspace = RepoWorkspace::new(temp_dir.path().join("repos"));

        let result = workspace.clone_or_open("missing", temp_dir.path().join("nope").to_str().unwrap());
        assert!(result.is_err());
    }

    #[test]
    fn test_last_commit_message() {
        let temp_dir = TempDir::new().unwrap();
        let source = source_repo(&temp_dir);

        let workspace = RepoWorkspace::new(temp_dir.path().join("repos"));
        workspace
            .clone_or_open("curator", source.to_str().unwrap())
            .unwrap();

        assert_eq!(
            workspace.last_commit_message("curator").unwrap(),
            "Initial commit"
        );
    }

    #[test]
    fn test_current_branch_and_changes() {
        let temp_dir = TempDir::new().unwrap();
        let source = source_repo(&temp_dir);

        let workspace = RepoWorkspace::new(temp_dir.path().join("repos"));
        workspace
            .clone_or_open("curator", source.to_str().unwrap())
            .unwrap();

        let branch = workspace.current_branch("curator").unwrap();
        assert!(!branch.is_empty());

        assert!(!workspace.has_changes("curator").unwrap());
        std::fs::write(workspace.repo_path("curator").join("new.txt"), "x").unwrap();
        assert!(workspace.has_changes("curator").unwrap());
    }
}
