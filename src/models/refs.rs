use serde::{Deserialize, Serialize};
use std::fmt;

pub const LOCAL_PREFIX: &str = "refs/heads/";
pub const REMOTE_PREFIX: &str = "refs/remotes/";
pub const TAG_PREFIX: &str = "refs/tags/";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RefKind {
    LocalBranch,
    RemoteBranch,
    Tag,
}

impl RefKind {
    fn prefix(self) -> &'static str {
        match self {
            RefKind::LocalBranch => LOCAL_PREFIX,
            RefKind::RemoteBranch => REMOTE_PREFIX,
            RefKind::Tag => TAG_PREFIX,
        }
    }
}

/// Kind-qualified key for a branch or tag (`refs/heads/main`, `refs/tags/v1.0`).
///
/// A local branch and a tag may share a short name, the key never collides.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BranchKey(String);

impl BranchKey {
    pub fn new(kind: RefKind, full_name: &str) -> Self {
        BranchKey(format!("{}{}", kind.prefix(), full_name))
    }

    pub fn local(name: &str) -> Self {
        Self::new(RefKind::LocalBranch, name)
    }

    pub fn remote(name: &str) -> Self {
        Self::new(RefKind::RemoteBranch, name)
    }

    pub fn tag(name: &str) -> Self {
        Self::new(RefKind::Tag, name)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BranchKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A classified branch or tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefDescriptor {
    /// Last path segment, as shown in the branch tree.
    pub display_name: String,
    /// Name without the `refs/...` prefix (`feature/new-ux`, `origin/main`, `v1.0`).
    pub full_name: String,
    pub kind: RefKind,
    pub remote_name: Option<String>,
    pub is_current: bool,
    pub tip_sha: String,
}

impl RefDescriptor {
    pub fn key(&self) -> BranchKey {
        BranchKey::new(self.kind, &self.full_name)
    }

    pub fn is_branch(&self) -> bool {
        matches!(self.kind, RefKind::LocalBranch | RefKind::RemoteBranch)
    }

    /// Path segments below the remote group, used to nest the leaf in the tree.
    pub fn tree_path(&self) -> Vec<&str> {
        let name = match (&self.kind, &self.remote_name) {
            (RefKind::RemoteBranch, Some(remote)) => self
                .full_name
                .strip_prefix(remote.as_str())
                .and_then(|rest| rest.strip_prefix('/'))
                .unwrap_or(&self.full_name),
            _ => &self.full_name,
        };
        name.split('/').filter(|s| !s.is_empty()).collect()
    }
}

/// Local branch as listed by the git-access collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BranchTip {
    pub name: String,
    pub tip_sha: String,
}

impl BranchTip {
    pub fn new(name: impl Into<String>, tip_sha: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            tip_sha: tip_sha.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagTip {
    pub name: String,
    pub sha: String,
}

impl TagTip {
    pub fn new(name: impl Into<String>, sha: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            sha: sha.into(),
        }
    }
}
