use std::collections::HashMap;
use tracing::debug;

use crate::graph::arena::CommitArena;
use crate::graph::branch_tree::TreeNode;
use crate::graph::colors::ColorAssigner;
use crate::graph::ownership::OwnershipMap;
use crate::models::BranchKey;

/// One lane of a finished layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaneSlot {
    pub color_idx: Option<usize>,
    /// Set in branch-lane mode; swimlanes are not tied to a ref.
    pub branch_key: Option<BranchKey>,
}

/// Column and colour per arena index, plus the lanes they refer to.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LaneTable {
    columns: Vec<usize>,
    colors: Vec<Option<usize>>,
    lanes: Vec<LaneSlot>,
}

impl LaneTable {
    pub fn column_of(&self, idx: usize) -> usize {
        self.columns[idx]
    }

    pub fn color_of(&self, idx: usize) -> Option<usize> {
        self.colors[idx]
    }

    pub fn lanes(&self) -> &[LaneSlot] {
        &self.lanes
    }

    pub fn lane_count(&self) -> usize {
        self.lanes.len()
    }
}

/// Branch-lane mode: one lane per ref, handed out in tree order and never reused.
#[derive(Debug, Clone, Default)]
pub struct BranchLaneTable {
    lanes: Vec<(BranchKey, usize)>,
    index: HashMap<BranchKey, usize>,
}

impl BranchLaneTable {
    /// Walks the tree depth first (Local Branches, Remotes, Tags) and gives
    /// every leaf the next lane on first sight.
    pub fn from_tree(tree: &TreeNode, colors: &ColorAssigner<'_>) -> Self {
        let mut table = Self::default();
        for descriptor in tree.leaves() {
            let key = descriptor.key();
            if table.index.contains_key(&key) {
                continue;
            }
            let previous = table.lanes.last().map(|(_, color)| *color);
            let color = colors.branch_color(&descriptor.full_name, previous);
            table.index.insert(key.clone(), table.lanes.len());
            table.lanes.push((key, color));
        }
        table
    }

    pub fn lane_of(&self, key: &BranchKey) -> Option<usize> {
        self.index.get(key).copied()
    }

    pub fn color_of_lane(&self, lane: usize) -> Option<usize> {
        self.lanes.get(lane).map(|(_, color)| *color)
    }

    pub fn len(&self) -> usize {
        self.lanes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lanes.is_empty()
    }

    /// Lane used for commits no ref owns; sits after every branch lane.
    pub fn detached_lane(&self) -> usize {
        self.lanes.len()
    }

    /// Commits take their owner's lane and colour; unowned commits share the detached lane, uncoloured.
    ///
    /// A branch whose row the renderer reports (`on_row`) puts all its commits
    /// on one Y, so it widens to one column per owned commit, newest at its
    /// anchor. Other branches keep a single column. Anchors follow tree order.
    pub fn assign(
        &self,
        arena: &CommitArena,
        ownership: &OwnershipMap,
        on_row: impl Fn(&BranchKey) -> bool,
    ) -> LaneTable {
        let mut spans = Vec::with_capacity(self.lanes.len());
        let mut lanes = Vec::new();
        for (key, color) in &self.lanes {
            let spread = on_row(key);
            let width = if spread {
                ownership.commits_owned_by(key).count().max(1)
            } else {
                1
            };
            spans.push((lanes.len(), spread));
            lanes.extend((0..width).map(|_| LaneSlot {
                color_idx: Some(*color),
                branch_key: Some(key.clone()),
            }));
        }
        let detached_column = lanes.len();

        let mut ordinals = vec![0usize; self.lanes.len()];
        let mut columns = Vec::with_capacity(arena.len());
        let mut colors = Vec::with_capacity(arena.len());
        let mut uses_detached = false;

        for idx in 0..arena.len() {
            match ownership.owner_of(idx).and_then(|key| self.lane_of(key)) {
                Some(lane) => {
                    let (anchor, spread) = spans[lane];
                    let column = if spread {
                        ordinals[lane] += 1;
                        anchor + ordinals[lane] - 1
                    } else {
                        anchor
                    };
                    columns.push(column);
                    colors.push(self.color_of_lane(lane));
                }
                None => {
                    uses_detached = true;
                    columns.push(detached_column);
                    colors.push(None);
                }
            }
        }

        if uses_detached {
            lanes.push(LaneSlot {
                color_idx: None,
                branch_key: None,
            });
        }

        debug!(
            "Branch lanes: {} refs across {} columns",
            self.lanes.len(),
            lanes.len()
        );
        LaneTable { columns, colors, lanes }
    }
}

#[derive(Debug, Clone)]
struct Reservation {
    expects: usize,
    color: usize,
    from_merge: bool,
    reserved_by: usize,
}

/// Flat mode: classic swimlanes, one row per commit.
///
/// Walking newest to oldest, each commit reserves its column for its nearest
/// parent and opens (or reuses) lanes for its other parents. A parent takes
/// the reservation left by a merge first, then the one left by its newest
/// child; its other reserved columns end there.
pub struct SwimlaneAllocator;

impl SwimlaneAllocator {
    pub fn allocate(arena: &CommitArena, colors: &ColorAssigner<'_>) -> LaneTable {
        let mut lanes: Vec<Option<Reservation>> = Vec::new();
        let mut columns = Vec::with_capacity(arena.len());
        let mut commit_colors = Vec::with_capacity(arena.len());

        for idx in 0..arena.len() {
            let mut claimed: Vec<(usize, Reservation)> = lanes
                .iter()
                .enumerate()
                .filter_map(|(column, slot)| {
                    slot.as_ref()
                        .filter(|r| r.expects == idx)
                        .map(|r| (column, r.clone()))
                })
                .collect();
            claimed.sort_by_key(|(column, r)| (!r.from_merge, r.reserved_by, *column));

            for (column, _) in &claimed {
                lanes[*column] = None;
            }

            let (column, color) = match claimed.first() {
                Some((column, reservation)) => (*column, reservation.color),
                None => {
                    let column = Self::open_lane(&mut lanes);
                    (column, colors.lane_color(column))
                }
            };
            assert!(
                lanes[column].is_none(),
                "column {} still reserved when placing {}",
                column,
                arena.node(idx).sha
            );

            let nearest = arena.nearest_parent(idx);
            if let Some(parent) = nearest {
                lanes[column] = Some(Reservation {
                    expects: parent,
                    color,
                    from_merge: arena.node(idx).is_merge(),
                    reserved_by: idx,
                });
            }

            for &parent in arena.parents_of(idx) {
                if Some(parent) == nearest || lanes.iter().flatten().any(|r| r.expects == parent) {
                    continue;
                }
                let side = Self::open_lane(&mut lanes);
                lanes[side] = Some(Reservation {
                    expects: parent,
                    color: colors.lane_color(side),
                    from_merge: false,
                    reserved_by: idx,
                });
            }

            columns.push(column);
            commit_colors.push(Some(color));
        }

        let lane_count = columns.iter().max().map_or(0, |max| max + 1);
        let lanes = (0..lane_count)
            .map(|column| LaneSlot {
                color_idx: Some(colors.lane_color(column)),
                branch_key: None,
            })
            .collect();

        debug!("Swimlane layout: {} commits across {} lanes", arena.len(), lane_count);
        LaneTable {
            columns,
            colors: commit_colors,
            lanes,
        }
    }

    /// First free column from the left, growing the table when all are taken.
    fn open_lane(lanes: &mut Vec<Option<Reservation>>) -> usize {
        match lanes.iter().position(Option::is_none) {
            Some(column) => column,
            None => {
                lanes.push(None);
                lanes.len() - 1
            }
        }
    }
}
