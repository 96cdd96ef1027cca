use serde::{Serialize, Serializer};
use std::collections::HashMap;
use tracing::{debug, warn};

use crate::models::{CommitNode, CommitRecord};

/// Sha-indexed owner of every `CommitNode` in one build.
///
/// Nodes keep input order (newest first). Parent and child links are also
/// kept as arena indices so later stages never search by sha.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CommitArena {
    nodes: Vec<CommitNode>,
    index: HashMap<String, usize>,
    parent_links: Vec<Vec<usize>>,
    child_links: Vec<Vec<usize>>,
}

impl CommitArena {
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn get(&self, sha: &str) -> Option<&CommitNode> {
        self.index.get(sha).map(|&i| &self.nodes[i])
    }

    pub fn index_of(&self, sha: &str) -> Option<usize> {
        self.index.get(sha).copied()
    }

    pub fn contains(&self, sha: &str) -> bool {
        self.index.contains_key(sha)
    }

    pub fn node(&self, idx: usize) -> &CommitNode {
        &self.nodes[idx]
    }

    pub(crate) fn node_mut(&mut self, idx: usize) -> &mut CommitNode {
        &mut self.nodes[idx]
    }

    pub fn nodes(&self) -> &[CommitNode] {
        &self.nodes
    }

    pub fn iter(&self) -> impl Iterator<Item = &CommitNode> {
        self.nodes.iter()
    }

    /// In-window parents of `idx`, in the order the record listed them.
    pub fn parents_of(&self, idx: usize) -> &[usize] {
        &self.parent_links[idx]
    }

    /// In-window children of `idx`, newest first.
    pub fn children_of(&self, idx: usize) -> &[usize] {
        &self.child_links[idx]
    }

    /// Parent shas of `idx` that point outside the loaded window.
    pub fn boundary_parents(&self, idx: usize) -> Vec<&str> {
        let node = &self.nodes[idx];
        node.parents
            .iter()
            .filter(|p| {
                self.index_of(p)
                    .map_or(true, |parent_idx| !self.parent_links[idx].contains(&parent_idx))
            })
            .map(String::as_str)
            .collect()
    }

    /// The in-window parent closest to `idx` in the ordering (smallest y).
    pub fn nearest_parent(&self, idx: usize) -> Option<usize> {
        self.parent_links[idx].iter().copied().min()
    }
}

impl Serialize for CommitArena {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(&self.nodes)
    }
}

/// Builds the node arena from raw records in two passes: nodes, then child links.
pub struct GraphModelBuilder;

impl GraphModelBuilder {
    pub fn build(records: &[CommitRecord]) -> CommitArena {
        let mut last_occurrence: HashMap<&str, usize> = HashMap::with_capacity(records.len());
        for (i, record) in records.iter().enumerate() {
            if last_occurrence.insert(record.hash.as_str(), i).is_some() {
                warn!("Duplicate commit {} in input, keeping the last occurrence", record.hash);
            }
        }

        let mut arena = CommitArena {
            nodes: Vec::with_capacity(last_occurrence.len()),
            index: HashMap::with_capacity(last_occurrence.len()),
            parent_links: Vec::new(),
            child_links: Vec::new(),
        };

        for (i, record) in records.iter().enumerate() {
            if last_occurrence.get(record.hash.as_str()) != Some(&i) {
                continue;
            }
            let row_index = arena.nodes.len();
            arena.index.insert(record.hash.clone(), row_index);
            arena.nodes.push(CommitNode::from_record(record, row_index));
        }

        arena.parent_links = vec![Vec::new(); arena.nodes.len()];
        arena.child_links = vec![Vec::new(); arena.nodes.len()];

        let mut boundary_count = 0;
        for child_idx in 0..arena.nodes.len() {
            for parent_sha in &arena.nodes[child_idx].parents {
                match arena.index.get(parent_sha) {
                    Some(&parent_idx) if parent_idx > child_idx => {
                        if !arena.parent_links[child_idx].contains(&parent_idx) {
                            arena.parent_links[child_idx].push(parent_idx);
                            arena.child_links[parent_idx].push(child_idx);
                        }
                    }
                    Some(_) => {
                        warn!(
                            "Parent {} of {} is not listed after its child, treating it as a boundary",
                            parent_sha, arena.nodes[child_idx].sha
                        );
                        boundary_count += 1;
                    }
                    None => boundary_count += 1,
                }
            }
        }

        for parent_idx in 0..arena.nodes.len() {
            let children: Vec<String> = arena.child_links[parent_idx]
                .iter()
                .map(|&c| arena.nodes[c].sha.clone())
                .collect();
            arena.nodes[parent_idx].children = children;
        }

        debug!(
            "Built commit arena: {} nodes, {} boundary references",
            arena.nodes.len(),
            boundary_count
        );
        arena
    }
}
