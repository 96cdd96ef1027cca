use tracing::{debug, info};

use crate::error_handling::GraphError;
use crate::graph::arena::GraphModelBuilder;
use crate::graph::branch_tree::{BranchTreeBuilder, RefCatalog, RowKey};
use crate::graph::colors::{ColorAssigner, Palette};
use crate::graph::edges::{EdgeRouter, RouteHint};
use crate::graph::lanes::{BranchLaneTable, SwimlaneAllocator};
use crate::graph::ownership::OwnershipResolver;
use crate::graph::positions::{LayoutMetrics, PositionResolver, RowGeometry};
use crate::graph::view_model::{GraphViewModel, LaneAssignment, LayoutMode};
use crate::models::GraphInput;
use crate::state::config::LayoutConfig;

/// Runs the full pipeline: arena, tree, ownership, lanes, positions, edges.
///
/// Every build starts from empty tables; nothing carries over between calls.
#[derive(Debug, Clone)]
pub struct GraphEngine {
    mode: LayoutMode,
    palette: Palette,
    metrics: LayoutMetrics,
    edge_style: RouteHint,
}

impl GraphEngine {
    pub fn new(mode: LayoutMode) -> Self {
        Self {
            mode,
            palette: Palette::default(),
            metrics: LayoutMetrics::default(),
            edge_style: RouteHint::default(),
        }
    }

    pub fn from_config(config: &LayoutConfig) -> Result<Self, GraphError> {
        config.validate()?;
        Ok(Self {
            mode: config.layout_mode,
            palette: config.palette()?,
            metrics: config.metrics(),
            edge_style: config.edge_style,
        })
    }

    pub fn with_palette(mut self, palette: Palette) -> Self {
        self.palette = palette;
        self
    }

    pub fn with_metrics(mut self, metrics: LayoutMetrics) -> Self {
        self.metrics = metrics;
        self
    }

    pub fn with_edge_style(mut self, style: RouteHint) -> Self {
        self.edge_style = style;
        self
    }

    pub fn mode(&self) -> LayoutMode {
        self.mode
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    pub fn build(&self, input: &GraphInput, geometry: &dyn RowGeometry) -> GraphViewModel {
        let mut arena = GraphModelBuilder::build(&input.commits);
        let catalog = RefCatalog::from_input(input);
        let branch_tree = BranchTreeBuilder::build(&catalog);

        let ownership = OwnershipResolver::resolve(&arena, &catalog);
        for idx in 0..arena.len() {
            arena.node_mut(idx).owning_branch_key = ownership.owner_of(idx).cloned();
        }

        let colors = ColorAssigner::new(&self.palette);
        let lanes = match self.mode {
            LayoutMode::BranchRows => {
                BranchLaneTable::from_tree(&branch_tree, &colors).assign(&arena, &ownership, |key| {
                    geometry.row_rect(&RowKey::from(key)).is_some()
                })
            }
            LayoutMode::Swimlane => SwimlaneAllocator::allocate(&arena, &colors),
        };
        for idx in 0..arena.len() {
            let node = arena.node_mut(idx);
            node.column = lanes.column_of(idx);
            node.color_idx = lanes.color_of(idx);
        }

        PositionResolver::new(self.metrics, geometry).resolve(&mut arena, self.mode);
        let edges = EdgeRouter::new(self.edge_style).route(&arena);

        let lane_assignments = lanes
            .lanes()
            .iter()
            .enumerate()
            .map(|(lane, slot)| LaneAssignment {
                lane,
                color_idx: slot.color_idx,
                color: slot.color_idx.map(|c| self.palette.get(c)),
                branch_key: slot.branch_key.clone(),
            })
            .collect::<Vec<_>>();

        debug!(
            "Layout {:?}: {} refs, {} lanes, {} edges",
            self.mode,
            catalog.len(),
            lane_assignments.len(),
            edges.len()
        );
        info!("Built commit graph with {} commits", arena.len());

        GraphViewModel {
            mode: self.mode,
            branch_tree,
            commit_nodes: arena,
            edges,
            lane_assignments,
        }
    }
}

impl Default for GraphEngine {
    fn default() -> Self {
        Self::new(LayoutMode::default())
    }
}

/// Holds the latest view model and rebuilds it wholesale on new data.
#[derive(Debug, Clone)]
pub struct CommitGraph {
    engine: GraphEngine,
    view: GraphViewModel,
}

impl CommitGraph {
    pub fn new(engine: GraphEngine) -> Self {
        let view = engine.build(&GraphInput::default(), &crate::graph::positions::NoRowGeometry);
        Self { engine, view }
    }

    pub fn set_commit_data(&mut self, input: &GraphInput, geometry: &dyn RowGeometry) -> &GraphViewModel {
        self.view = self.engine.build(input, geometry);
        &self.view
    }

    pub fn view_model(&self) -> &GraphViewModel {
        &self.view
    }

    pub fn engine(&self) -> &GraphEngine {
        &self.engine
    }

    /// Takes effect on the next `set_commit_data`.
    pub fn set_layout_mode(&mut self, mode: LayoutMode) {
        self.engine.mode = mode;
    }
}
