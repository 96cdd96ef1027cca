//! Integration tests for commit-graph
//!
//! End-to-end layout scenarios, the git2 record supplier against real
//! repositories, and the command-line binary.

mod cli;
mod git_source;
mod scenarios;

/// Test utilities for integration tests
pub mod test_utils {
    use std::path::{Path, PathBuf};
    use std::process::Command;
    use tempfile::TempDir;

    pub fn git(repo_path: &Path, args: &[&str]) -> anyhow::Result<()> {
        Command::new("git").args(args).current_dir(repo_path).output()?;
        Ok(())
    }

    /// Create a temporary Git repository on branch `main`
    pub fn create_test_repo() -> anyhow::Result<(TempDir, PathBuf)> {
        let temp_dir = TempDir::new()?;
        let repo_path = temp_dir.path().to_path_buf();

        git(&repo_path, &["init"])?;
        git(&repo_path, &["symbolic-ref", "HEAD", "refs/heads/main"])?;

        // Configure Git user for commits
        git(&repo_path, &["config", "user.name", "Test User"])?;
        git(&repo_path, &["config", "user.email", "test@example.com"])?;

        Ok((temp_dir, repo_path))
    }

    /// Create a test commit in the repository
    pub fn create_test_commit(repo_path: &Path, message: &str) -> anyhow::Result<()> {
        let test_file = repo_path.join("test.txt");
        std::fs::write(&test_file, format!("Test content for {}", message))?;

        git(repo_path, &["add", "test.txt"])?;
        git(repo_path, &["commit", "-m", message])?;
        Ok(())
    }

    /// main and feature/test diverge from one base commit, then feature is merged into main
    pub fn create_complex_test_repo() -> anyhow::Result<(TempDir, PathBuf)> {
        let (temp_dir, repo_path) = create_test_repo()?;

        create_test_commit(&repo_path, "Initial commit")?;
        git(&repo_path, &["tag", "v1.0"])?;

        git(&repo_path, &["checkout", "-b", "feature/test"])?;
        std::fs::write(repo_path.join("feature.txt"), "feature")?;
        git(&repo_path, &["add", "feature.txt"])?;
        git(&repo_path, &["commit", "-m", "Add feature functionality"])?;

        git(&repo_path, &["checkout", "main"])?;
        create_test_commit(&repo_path, "Main branch update")?;

        git(&repo_path, &["merge", "feature/test", "--no-ff", "-m", "Merge feature branch"])?;

        Ok((temp_dir, repo_path))
    }
}
