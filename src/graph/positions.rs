use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::graph::arena::CommitArena;
use crate::graph::branch_tree::RowKey;
use crate::graph::view_model::LayoutMode;

/// Vertical extent of one renderer row.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RowRect {
    pub top: f32,
    pub height: f32,
}

impl RowRect {
    pub fn new(top: f32, height: f32) -> Self {
        Self { top, height }
    }

    pub fn center_y(&self) -> f32 {
        self.top + self.height / 2.0
    }
}

/// Geometry the rendering layer reports back for tree rows.
///
/// Queried synchronously during a build. Rows that are collapsed, filtered or
/// unknown answer `None`.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
pub trait RowGeometry {
    fn row_rect(&self, key: &RowKey) -> Option<RowRect>;
    fn header_width(&self) -> f32;
    fn is_header_visible(&self) -> bool;
}

/// Geometry for headless builds: no rows, no header.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoRowGeometry;

impl RowGeometry for NoRowGeometry {
    fn row_rect(&self, _key: &RowKey) -> Option<RowRect> {
        None
    }

    fn header_width(&self) -> f32 {
        0.0
    }

    fn is_header_visible(&self) -> bool {
        false
    }
}

/// Renderer-supplied spacing constants.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LayoutMetrics {
    pub row_height: f32,
    pub column_width: f32,
    pub base_offset: f32,
}

impl Default for LayoutMetrics {
    fn default() -> Self {
        Self {
            row_height: 30.0,
            column_width: 20.0,
            base_offset: 0.0,
        }
    }
}

pub struct PositionResolver<'a> {
    metrics: LayoutMetrics,
    geometry: &'a dyn RowGeometry,
    base_x: f32,
}

impl<'a> PositionResolver<'a> {
    pub fn new(metrics: LayoutMetrics, geometry: &'a dyn RowGeometry) -> Self {
        let header = if geometry.is_header_visible() {
            geometry.header_width()
        } else {
            0.0
        };
        Self {
            metrics,
            geometry,
            base_x: metrics.base_offset + header,
        }
    }

    pub fn base_x(&self) -> f32 {
        self.base_x
    }

    /// Centre of `column`.
    pub fn x_for_column(&self, column: usize) -> f32 {
        self.base_x + column as f32 * self.metrics.column_width + self.metrics.column_width / 2.0
    }

    /// Topological fallback: one row per commit in input order.
    pub fn fallback_y(&self, row_index: usize) -> f32 {
        row_index as f32 * self.metrics.row_height + self.metrics.row_height / 2.0
    }

    /// Writes `x`/`y` on every node from its column and owner.
    ///
    /// In branch-row mode a commit sits on its owner's row when the renderer
    /// reports one; everything else uses the topological fallback.
    pub fn resolve(&self, arena: &mut CommitArena, mode: LayoutMode) {
        let mut anchored = 0;
        for idx in 0..arena.len() {
            let node = arena.node(idx);
            let row_y = match (mode, &node.owning_branch_key) {
                (LayoutMode::BranchRows, Some(key)) => {
                    self.geometry.row_rect(&RowKey::from(key)).map(|rect| rect.center_y())
                }
                _ => None,
            };
            if row_y.is_some() {
                anchored += 1;
            }
            let y = row_y.unwrap_or_else(|| self.fallback_y(node.row_index));
            let x = self.x_for_column(node.column);

            let node = arena.node_mut(idx);
            node.x = x;
            node.y = y;
        }
        debug!(
            "Positioned {} commits, {} on branch rows, base x {}",
            arena.len(),
            anchored,
            self.base_x
        );
    }
}
