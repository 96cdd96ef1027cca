//! # commit-graph
//!
//! Commit-graph construction and layout for version-control history browsers.
//!
//! Given commit records (newest first) and the repository's branches, remotes and
//! tags, the engine produces a renderer-independent [`GraphViewModel`]: a branch
//! tree, positioned commit nodes with lane and colour assignments, and classified
//! edges between them.
//!
//! ## Architecture
//!
//! - [`models`] - Input records, commit nodes and ref descriptors
//! - [`graph`] - The layout pipeline and the view model it produces
//! - [`git`] - Record suppliers: git2 repository reader and `git log` parser
//! - [`state`] - Persisted layout configuration
//! - [`error_handling`] - Error types, validation and reporting
//!
//! ## Layout modes
//!
//! - **Swimlane**: one row per commit, lanes are reused as branches end
//! - **Branch rows**: one row per branch, all of a branch's commits share its row
//!
//! ## Example
//!
//! ```rust
//! use commit_graph::graph::{GraphEngine, LayoutMode, NoRowGeometry};
//! use commit_graph::models::{CommitRecord, GraphInput};
//!
//! let input = GraphInput::new(vec![
//!     CommitRecord::new("c3", &["c2"]).with_branch("main"),
//!     CommitRecord::new("c2", &["c1"]),
//!     CommitRecord::new("c1", &[]).with_tag("v1.0"),
//! ])
//! .with_current_branch("main");
//!
//! let view = GraphEngine::new(LayoutMode::Swimlane).build(&input, &NoRowGeometry);
//! assert_eq!(view.nodes().len(), 3);
//! assert!(view.nodes().iter().all(|node| node.column == 0));
//! ```

pub mod error_handling;
pub mod git;
pub mod graph;
pub mod models;
pub mod state;

pub use error_handling::GraphError;
pub use graph::{CommitGraph, GraphEngine, GraphViewModel, LayoutMode};

/// Library version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Library description
pub const DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");
