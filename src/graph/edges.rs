use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::graph::arena::CommitArena;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeKind {
    /// Child and parent share a lane.
    Straight,
    /// The child's line leaves the parent's lane.
    BranchOut,
    /// A merge's secondary parent line converging into the merge's lane.
    MergeIn,
}

/// How a renderer may draw a lane-changing connector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RouteHint {
    /// Single diagonal segment.
    #[default]
    Direct,
    /// Down, across, down.
    Elbow,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EdgeDescriptor {
    pub from_sha: String,
    pub to_sha: String,
    /// Palette index; `None` when neither end has a colour.
    pub color: Option<usize>,
    pub kind: EdgeKind,
    pub route: RouteHint,
    /// The parent lies outside the loaded window; draw a stub.
    pub truncated: bool,
}

/// Classifies child→parent connections from finished columns and colours.
pub struct EdgeRouter {
    style: RouteHint,
}

impl EdgeRouter {
    pub fn new(style: RouteHint) -> Self {
        Self { style }
    }

    pub fn route(&self, arena: &CommitArena) -> Vec<EdgeDescriptor> {
        let mut edges = Vec::new();

        for idx in 0..arena.len() {
            let child = arena.node(idx);
            let nearest = arena.nearest_parent(idx);

            for &parent_idx in arena.parents_of(idx) {
                let parent = arena.node(parent_idx);
                let kind = if parent.column == child.column {
                    EdgeKind::Straight
                } else if child.is_merge() && Some(parent_idx) != nearest {
                    EdgeKind::MergeIn
                } else {
                    EdgeKind::BranchOut
                };
                let color = match kind {
                    EdgeKind::MergeIn => parent.color_idx.or(child.color_idx),
                    EdgeKind::Straight | EdgeKind::BranchOut => child.color_idx.or(parent.color_idx),
                };
                let route = match kind {
                    EdgeKind::Straight => RouteHint::Direct,
                    EdgeKind::BranchOut | EdgeKind::MergeIn => self.style,
                };
                edges.push(EdgeDescriptor {
                    from_sha: child.sha.clone(),
                    to_sha: parent.sha.clone(),
                    color,
                    kind,
                    route,
                    truncated: false,
                });
            }

            for parent_sha in arena.boundary_parents(idx) {
                edges.push(EdgeDescriptor {
                    from_sha: child.sha.clone(),
                    to_sha: parent_sha.to_string(),
                    color: child.color_idx,
                    kind: EdgeKind::Straight,
                    route: RouteHint::Direct,
                    truncated: true,
                });
            }
        }

        debug!("Routed {} edges", edges.len());
        edges
    }
}

impl Default for EdgeRouter {
    fn default() -> Self {
        Self::new(RouteHint::default())
    }
}
