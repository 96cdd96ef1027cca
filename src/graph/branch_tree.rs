use serde::Serialize;
use std::collections::{BTreeSet, HashMap};
use std::fmt;
use tracing::{debug, warn};

use crate::error_handling::InputValidator;
use crate::models::{
    BranchKey, GraphInput, RefDescriptor, RefKind, LOCAL_PREFIX, REMOTE_PREFIX, TAG_PREFIX,
};

pub const LOCAL_GROUP_NAME: &str = "Local Branches";
pub const REMOTES_GROUP_NAME: &str = "Remotes";
pub const TAGS_GROUP_NAME: &str = "Tags";

/// Renderer-independent handle for a tree row.
///
/// Leaves use their branch key, so `RowKey::from(&key)` names the row of a branch.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct RowKey(String);

impl RowKey {
    pub fn new(key: impl Into<String>) -> Self {
        RowKey(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&BranchKey> for RowKey {
    fn from(key: &BranchKey) -> Self {
        RowKey(key.as_str().to_string())
    }
}

impl fmt::Display for RowKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TreeNodeKind {
    Root,
    Group,
    RemoteGroup,
    BranchLeaf,
    TagLeaf,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TreeNode {
    pub kind: TreeNodeKind,
    pub display_name: String,
    pub children: Vec<TreeNode>,
    #[serde(rename = "ref", skip_serializing_if = "Option::is_none")]
    pub reference: Option<RefDescriptor>,
    pub row_key: RowKey,
}

impl TreeNode {
    fn container(kind: TreeNodeKind, display_name: &str, row_key: String) -> Self {
        Self {
            kind,
            display_name: display_name.to_string(),
            children: Vec::new(),
            reference: None,
            row_key: RowKey(row_key),
        }
    }

    fn leaf(descriptor: RefDescriptor) -> Self {
        let kind = match descriptor.kind {
            RefKind::Tag => TreeNodeKind::TagLeaf,
            RefKind::LocalBranch | RefKind::RemoteBranch => TreeNodeKind::BranchLeaf,
        };
        Self {
            kind,
            display_name: descriptor.display_name.clone(),
            children: Vec::new(),
            row_key: RowKey::from(&descriptor.key()),
            reference: Some(descriptor),
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self.kind, TreeNodeKind::BranchLeaf | TreeNodeKind::TagLeaf)
    }

    /// Follow a path of display names from this node.
    pub fn find_path(&self, path: &[&str]) -> Option<&TreeNode> {
        path.iter().try_fold(self, |node, name| {
            node.children.iter().find(|child| child.display_name == *name)
        })
    }

    /// Refs of every leaf below this node, depth first.
    pub fn leaves(&self) -> Vec<&RefDescriptor> {
        let mut out = Vec::new();
        self.collect_leaves(&mut out);
        out
    }

    fn collect_leaves<'a>(&'a self, out: &mut Vec<&'a RefDescriptor>) {
        if let Some(reference) = &self.reference {
            out.push(reference);
        }
        for child in &self.children {
            child.collect_leaves(out);
        }
    }

    fn sort_recursive(&mut self) {
        self.children
            .sort_by(|a, b| a.display_name.cmp(&b.display_name).then(a.kind.cmp(&b.kind)));
        for child in &mut self.children {
            child.sort_recursive();
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RefSource {
    Branch,
    Tag,
}

/// Classify a raw ref name into kind, full name and remote.
///
/// `refs/heads/`, `refs/remotes/` and `refs/tags/` prefixes decide outright.
/// A short branch name is remote when its first segment is a known remote.
fn classify(raw: &str, source: RefSource, remotes: &[String]) -> Option<(RefKind, String, Option<String>)> {
    let raw = raw.trim();

    if let Some(name) = raw.strip_prefix(TAG_PREFIX).or_else(|| raw.strip_prefix("tag: ")) {
        return Some((RefKind::Tag, name.to_string(), None));
    }
    if source == RefSource::Tag {
        return Some((RefKind::Tag, raw.to_string(), None));
    }
    if let Some(name) = raw.strip_prefix(LOCAL_PREFIX) {
        return Some((RefKind::LocalBranch, name.to_string(), None));
    }
    if let Some(name) = raw.strip_prefix(REMOTE_PREFIX) {
        let (remote, rest) = name.split_once('/')?;
        if rest.is_empty() || rest == "HEAD" {
            return None;
        }
        return Some((RefKind::RemoteBranch, name.to_string(), Some(remote.to_string())));
    }
    if raw == "HEAD" {
        return None;
    }
    if let Some((prefix, rest)) = raw.split_once('/') {
        if remotes.iter().any(|r| r == prefix) {
            if rest.is_empty() || rest == "HEAD" {
                return None;
            }
            return Some((RefKind::RemoteBranch, raw.to_string(), Some(prefix.to_string())));
        }
    }
    Some((RefKind::LocalBranch, raw.to_string(), None))
}

/// All branches and tags of one build, deduplicated by key, with a tip index.
#[derive(Debug, Clone, Default)]
pub struct RefCatalog {
    refs: Vec<RefDescriptor>,
    by_key: HashMap<BranchKey, usize>,
    by_tip: HashMap<String, Vec<usize>>,
    remotes: BTreeSet<String>,
}

impl RefCatalog {
    /// Collect refs from the explicit branch/tag lists first, then from commit records.
    pub fn from_input(input: &GraphInput) -> Self {
        let mut catalog = RefCatalog {
            remotes: input.remotes.iter().cloned().collect(),
            ..Default::default()
        };
        let current = input.current_branch_name();

        for branch in &input.local_branches {
            catalog.add(&branch.name, &branch.tip_sha, RefSource::Branch, &input.remotes, current);
        }
        for record in &input.commits {
            for name in &record.branches {
                catalog.add(name, &record.hash, RefSource::Branch, &input.remotes, current);
            }
        }
        for tag in &input.tags {
            catalog.add(&tag.name, &tag.sha, RefSource::Tag, &input.remotes, current);
        }
        for record in &input.commits {
            for name in &record.tags {
                catalog.add(name, &record.hash, RefSource::Tag, &input.remotes, current);
            }
        }

        debug!("Catalogued {} refs across {} remotes", catalog.refs.len(), catalog.remotes.len());
        catalog
    }

    fn add(&mut self, raw: &str, tip_sha: &str, source: RefSource, remotes: &[String], current: Option<&str>) {
        let Some((kind, full_name, remote_name)) = classify(raw, source, remotes) else {
            return;
        };
        if InputValidator::validate_ref_name(&full_name).is_err() {
            warn!("Skipping ref with invalid name '{}'", raw);
            return;
        }

        let key = BranchKey::new(kind, &full_name);
        if self.by_key.contains_key(&key) {
            return;
        }

        let descriptor = RefDescriptor {
            display_name: String::new(),
            is_current: kind == RefKind::LocalBranch && current == Some(full_name.as_str()),
            full_name,
            kind,
            remote_name,
            tip_sha: tip_sha.to_string(),
        };
        let display_name = descriptor
            .tree_path()
            .last()
            .map(|s| s.to_string())
            .unwrap_or_else(|| descriptor.full_name.clone());
        let descriptor = RefDescriptor { display_name, ..descriptor };

        if let Some(remote) = &descriptor.remote_name {
            self.remotes.insert(remote.clone());
        }
        let idx = self.refs.len();
        self.by_key.insert(key, idx);
        self.by_tip.entry(descriptor.tip_sha.clone()).or_default().push(idx);
        self.refs.push(descriptor);
    }

    pub fn refs(&self) -> &[RefDescriptor] {
        &self.refs
    }

    pub fn len(&self) -> usize {
        self.refs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.refs.is_empty()
    }

    pub fn get(&self, key: &BranchKey) -> Option<&RefDescriptor> {
        self.by_key.get(key).map(|&i| &self.refs[i])
    }

    /// Refs whose tip is `sha`, in catalogue order.
    pub fn tips_at(&self, sha: &str) -> Vec<&RefDescriptor> {
        self.by_tip
            .get(sha)
            .map(|ids| ids.iter().map(|&i| &self.refs[i]).collect())
            .unwrap_or_default()
    }

    pub fn remotes(&self) -> impl Iterator<Item = &str> {
        self.remotes.iter().map(String::as_str)
    }
}

/// Builds the Local Branches / Remotes / Tags hierarchy.
pub struct BranchTreeBuilder;

impl BranchTreeBuilder {
    pub fn build(catalog: &RefCatalog) -> TreeNode {
        let mut local = TreeNode::container(TreeNodeKind::Group, LOCAL_GROUP_NAME, "group:local".into());
        let mut remotes =
            TreeNode::container(TreeNodeKind::Group, REMOTES_GROUP_NAME, "group:remotes".into());
        let mut tags = TreeNode::container(TreeNodeKind::Group, TAGS_GROUP_NAME, "group:tags".into());

        for remote in catalog.remotes() {
            remotes.children.push(TreeNode::container(
                TreeNodeKind::RemoteGroup,
                remote,
                format!("remote:{}", remote),
            ));
        }

        for descriptor in catalog.refs() {
            match descriptor.kind {
                RefKind::LocalBranch => {
                    let path = descriptor.tree_path();
                    Self::insert_nested(&mut local, &path, descriptor, "group:local");
                }
                RefKind::RemoteBranch => {
                    let Some(remote) = descriptor.remote_name.as_deref() else {
                        continue;
                    };
                    let path = descriptor.tree_path();
                    let prefix = format!("remote:{}", remote);
                    if let Some(group) = remotes.children.iter_mut().find(|child| {
                        child.kind == TreeNodeKind::RemoteGroup && child.display_name == remote
                    }) {
                        Self::insert_nested(group, &path, descriptor, &prefix);
                    }
                }
                RefKind::Tag => tags.children.push(TreeNode::leaf(descriptor.clone())),
            }
        }

        local.sort_recursive();
        remotes.sort_recursive();
        tags.sort_recursive();

        let mut root = TreeNode::container(TreeNodeKind::Root, "", "root".into());
        root.children = vec![local, remotes, tags];
        root
    }

    fn insert_nested(parent: &mut TreeNode, path: &[&str], descriptor: &RefDescriptor, row_prefix: &str) {
        match path {
            [] | [_] => parent.children.push(TreeNode::leaf(descriptor.clone())),
            [segment, rest @ ..] => {
                let group_key = format!("{}/{}", row_prefix, segment);
                let position = parent
                    .children
                    .iter()
                    .position(|child| child.kind == TreeNodeKind::Group && child.display_name == *segment);
                let idx = match position {
                    Some(idx) => idx,
                    None => {
                        parent
                            .children
                            .push(TreeNode::container(TreeNodeKind::Group, segment, group_key.clone()));
                        parent.children.len() - 1
                    }
                };
                Self::insert_nested(&mut parent.children[idx], rest, descriptor, &group_key);
            }
        }
    }
}
