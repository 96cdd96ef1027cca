use serde::{Deserialize, Serialize};

use crate::error_handling::GraphError;
use crate::graph::arena::CommitArena;
use crate::graph::branch_tree::TreeNode;
use crate::graph::colors::Rgb;
use crate::graph::edges::EdgeDescriptor;
use crate::models::{BranchKey, CommitNode};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LayoutMode {
    /// One tree row per branch; a branch's commits share its row.
    BranchRows,
    /// One row per commit with reusable lanes.
    #[default]
    Swimlane,
}

/// Palette binding for one lane.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LaneAssignment {
    pub lane: usize,
    pub color_idx: Option<usize>,
    pub color: Option<Rgb>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub branch_key: Option<BranchKey>,
}

/// Everything a renderer needs for one frame of the graph.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraphViewModel {
    pub mode: LayoutMode,
    pub branch_tree: TreeNode,
    pub commit_nodes: CommitArena,
    pub edges: Vec<EdgeDescriptor>,
    pub lane_assignments: Vec<LaneAssignment>,
}

impl GraphViewModel {
    pub fn node(&self, sha: &str) -> Option<&CommitNode> {
        self.commit_nodes.get(sha)
    }

    pub fn nodes(&self) -> &[CommitNode] {
        self.commit_nodes.nodes()
    }

    pub fn is_empty(&self) -> bool {
        self.commit_nodes.is_empty()
    }

    pub fn lane_count(&self) -> usize {
        self.lane_assignments.len()
    }

    pub fn edges_from<'a>(&'a self, sha: &'a str) -> impl Iterator<Item = &'a EdgeDescriptor> + 'a {
        self.edges.iter().filter(move |edge| edge.from_sha == sha)
    }

    pub fn to_json(&self) -> Result<String, GraphError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
