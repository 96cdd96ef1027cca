use serde::{Deserialize, Serialize};

use crate::models::{BranchTip, CommitRecord, TagTip, LOCAL_PREFIX};

/// Everything the layout engine consumes for one build.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphInput {
    /// Commit records, newest first.
    pub commits: Vec<CommitRecord>,
    #[serde(default)]
    pub local_branches: Vec<BranchTip>,
    #[serde(default)]
    pub current_branch: Option<String>,
    #[serde(default)]
    pub remotes: Vec<String>,
    #[serde(default)]
    pub tags: Vec<TagTip>,
}

impl GraphInput {
    pub fn new(commits: Vec<CommitRecord>) -> Self {
        Self {
            commits,
            ..Default::default()
        }
    }

    pub fn with_current_branch(mut self, name: impl Into<String>) -> Self {
        self.current_branch = Some(name.into());
        self
    }

    pub fn with_remote(mut self, name: impl Into<String>) -> Self {
        self.remotes.push(name.into());
        self
    }

    pub fn with_local_branch(mut self, name: impl Into<String>, tip_sha: impl Into<String>) -> Self {
        self.local_branches.push(BranchTip::new(name, tip_sha));
        self
    }

    pub fn with_tag(mut self, name: impl Into<String>, sha: impl Into<String>) -> Self {
        self.tags.push(TagTip::new(name, sha));
        self
    }

    /// Current branch name without a `refs/heads/` prefix.
    pub fn current_branch_name(&self) -> Option<&str> {
        self.current_branch
            .as_deref()
            .map(|name| name.strip_prefix(LOCAL_PREFIX).unwrap_or(name))
            .filter(|name| !name.is_empty())
    }

    pub fn is_empty(&self) -> bool {
        self.commits.is_empty()
    }
}
