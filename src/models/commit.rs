use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A raw commit record as supplied by the git-access collaborator.
///
/// Records arrive newest first. `branches` and `tags` hold the ref names that
/// point at this commit, either fully qualified (`refs/heads/main`,
/// `refs/remotes/origin/main`, `refs/tags/v1.0`) or short (`main`, `origin/main`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommitRecord {
    pub hash: String,
    #[serde(default)]
    pub parents: Vec<String>,
    #[serde(default)]
    pub branches: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub date: Option<DateTime<Utc>>,
}

impl CommitRecord {
    pub fn new(hash: impl Into<String>, parents: &[&str]) -> Self {
        Self {
            hash: hash.into(),
            parents: parents.iter().map(|p| p.to_string()).collect(),
            branches: Vec::new(),
            tags: Vec::new(),
            subject: String::new(),
            author: String::new(),
            date: None,
        }
    }

    pub fn with_branch(mut self, name: impl Into<String>) -> Self {
        self.branches.push(name.into());
        self
    }

    pub fn with_tag(mut self, name: impl Into<String>) -> Self {
        self.tags.push(name.into());
        self
    }

    pub fn with_subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = subject.into();
        self
    }

    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = author.into();
        self
    }
}

/// Structural classification of a commit by its parent count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommitKind {
    Root,
    Normal,
    Merge,
}

impl CommitKind {
    pub fn from_parent_count(count: usize) -> Self {
        match count {
            0 => CommitKind::Root,
            1 => CommitKind::Normal,
            _ => CommitKind::Merge,
        }
    }
}

/// Shape hint for the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeShape {
    Circle,
    Diamond,
}

impl From<CommitKind> for NodeShape {
    fn from(kind: CommitKind) -> Self {
        match kind {
            CommitKind::Merge => NodeShape::Diamond,
            CommitKind::Root | CommitKind::Normal => NodeShape::Circle,
        }
    }
}

/// A commit in the node arena.
///
/// Parent and child links are shas, never references into the arena. Layout
/// fields (`column`, `color_idx`, `owning_branch_key`, `x`, `y`) are filled by
/// the later build stages.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CommitNode {
    pub sha: String,
    pub parents: Vec<String>,
    pub children: Vec<String>,
    pub message: String,
    pub author: String,
    pub date: Option<DateTime<Utc>>,
    pub refs: Vec<String>,
    pub kind: CommitKind,
    pub shape: NodeShape,
    /// Position of the commit in the input ordering.
    pub row_index: usize,
    pub column: usize,
    /// `None` for commits no branch owns in branch-row mode.
    pub color_idx: Option<usize>,
    pub owning_branch_key: Option<crate::models::BranchKey>,
    pub x: f32,
    pub y: f32,
}

impl CommitNode {
    pub fn from_record(record: &CommitRecord, row_index: usize) -> Self {
        let kind = CommitKind::from_parent_count(record.parents.len());
        let refs = record
            .branches
            .iter()
            .chain(record.tags.iter())
            .cloned()
            .collect();

        Self {
            sha: record.hash.clone(),
            parents: record.parents.clone(),
            children: Vec::new(),
            message: record.subject.clone(),
            author: record.author.clone(),
            date: record.date,
            refs,
            kind,
            shape: kind.into(),
            row_index,
            column: 0,
            color_idx: None,
            owning_branch_key: None,
            x: 0.0,
            y: 0.0,
        }
    }

    pub fn short_sha(&self) -> &str {
        let end = self
            .sha
            .char_indices()
            .nth(7)
            .map(|(i, _)| i)
            .unwrap_or(self.sha.len());
        &self.sha[..end]
    }

    pub fn is_merge(&self) -> bool {
        self.kind == CommitKind::Merge
    }

    pub fn is_root(&self) -> bool {
        self.kind == CommitKind::Root
    }
}
