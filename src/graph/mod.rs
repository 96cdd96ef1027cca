//! Commit-graph construction and layout.
//!
//! A build runs newest to oldest through fixed stages: the sha-indexed node
//! arena, the branch tree, commit ownership, lane allocation, positions and
//! finally edge classification. [`GraphEngine::build`] ties them together.

pub mod arena;
pub mod branch_tree;
pub mod colors;
pub mod edges;
pub mod engine;
pub mod lanes;
pub mod ownership;
pub mod positions;
pub mod view_model;

pub use arena::{CommitArena, GraphModelBuilder};
pub use branch_tree::{BranchTreeBuilder, RefCatalog, RowKey, TreeNode, TreeNodeKind};
pub use colors::{ColorAssigner, Palette, Rgb};
pub use edges::{EdgeDescriptor, EdgeKind, EdgeRouter, RouteHint};
pub use engine::{CommitGraph, GraphEngine};
pub use lanes::{BranchLaneTable, LaneTable, SwimlaneAllocator};
pub use ownership::{OwnershipMap, OwnershipResolver};
pub use positions::{LayoutMetrics, NoRowGeometry, PositionResolver, RowGeometry, RowRect};
pub use view_model::{GraphViewModel, LaneAssignment, LayoutMode};

#[cfg(any(test, feature = "testing"))]
pub use positions::MockRowGeometry;
