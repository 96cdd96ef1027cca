//! Layout scenarios run through the public API.

use commit_graph::graph::{
    EdgeKind, GraphEngine, LayoutMode, NoRowGeometry, RowGeometry, RowKey, RowRect, TreeNodeKind,
};
use commit_graph::models::{BranchKey, CommitRecord, GraphInput, NodeShape};
use pretty_assertions::assert_eq;
use std::collections::HashMap;

/// Row rectangles keyed by row key, with a visible header.
struct FixedRows {
    rows: HashMap<String, RowRect>,
    header_width: f32,
}

impl RowGeometry for FixedRows {
    fn row_rect(&self, key: &RowKey) -> Option<RowRect> {
        self.rows.get(key.as_str()).copied()
    }

    fn header_width(&self) -> f32 {
        self.header_width
    }

    fn is_header_visible(&self) -> bool {
        true
    }
}

fn fork_input() -> GraphInput {
    GraphInput::new(vec![
        CommitRecord::new("c4", &["c2"]).with_branch("develop"),
        CommitRecord::new("c3", &["c2"]).with_branch("main"),
        CommitRecord::new("c2", &["c1"]),
        CommitRecord::new("c1", &[]),
    ])
    .with_current_branch("develop")
}

#[test]
fn test_single_branch_with_tag() {
    let input = GraphInput::new(vec![
        CommitRecord::new("c3", &["c2"]).with_branch("main"),
        CommitRecord::new("c2", &["c1"]),
        CommitRecord::new("c1", &[]).with_tag("v1.0"),
    ])
    .with_current_branch("main");

    for mode in [LayoutMode::BranchRows, LayoutMode::Swimlane] {
        let view = GraphEngine::new(mode).build(&input, &NoRowGeometry);
        let main = BranchKey::local("main");
        let column = view.node("c3").unwrap().column;

        for sha in ["c3", "c2", "c1"] {
            let node = view.node(sha).unwrap();
            assert_eq!(node.owning_branch_key.as_ref(), Some(&main));
            assert_eq!(node.column, column);
        }
        let tag = view.branch_tree.find_path(&["Tags", "v1.0"]).unwrap();
        assert_eq!(tag.reference.as_ref().unwrap().tip_sha, "c1");
    }
}

#[test]
fn test_fork_with_current_branch() {
    let view = GraphEngine::new(LayoutMode::BranchRows).build(&fork_input(), &NoRowGeometry);
    let develop = BranchKey::local("develop");

    assert_ne!(view.node("c4").unwrap().column, view.node("c3").unwrap().column);
    assert_eq!(view.node("c2").unwrap().owning_branch_key.as_ref(), Some(&develop));
    assert_eq!(view.node("c1").unwrap().owning_branch_key.as_ref(), Some(&develop));

    let current = view.branch_tree.find_path(&["Local Branches", "develop"]).unwrap();
    assert!(current.reference.as_ref().unwrap().is_current);
}

#[test]
fn test_branch_rows_with_renderer_geometry() {
    let geometry = FixedRows {
        rows: HashMap::from([
            ("refs/heads/develop".to_string(), RowRect::new(40.0, 20.0)),
            ("refs/heads/main".to_string(), RowRect::new(60.0, 20.0)),
        ]),
        header_width: 120.0,
    };

    let view = GraphEngine::new(LayoutMode::BranchRows).build(&fork_input(), &geometry);

    for sha in ["c4", "c2", "c1"] {
        assert_eq!(view.node(sha).unwrap().y, 50.0);
    }
    assert_eq!(view.node("c3").unwrap().y, 70.0);
    assert!(view.nodes().iter().all(|node| node.x > 120.0));

    let develop_row: Vec<(usize, f32)> = ["c4", "c2", "c1"]
        .iter()
        .map(|sha| {
            let node = view.node(sha).unwrap();
            (node.column, node.x)
        })
        .collect();
    assert_eq!(develop_row[0].0, 0);
    assert!(develop_row.windows(2).all(|pair| pair[0].0 < pair[1].0 && pair[0].1 < pair[1].1));
    assert!(view.node("c3").unwrap().column > develop_row[2].0);
}

#[test]
fn test_rows_shared_by_every_branch() {
    let geometry = FixedRows {
        rows: HashMap::from([
            ("refs/heads/develop".to_string(), RowRect::new(0.0, 20.0)),
            ("refs/heads/main".to_string(), RowRect::new(0.0, 20.0)),
        ]),
        header_width: 0.0,
    };
    let view = GraphEngine::new(LayoutMode::BranchRows).build(&fork_input(), &geometry);

    let mut columns: Vec<usize> = view.nodes().iter().map(|node| node.column).collect();
    assert!(view.nodes().iter().all(|node| node.y == 10.0));
    columns.sort_unstable();
    columns.dedup();
    assert_eq!(columns.len(), 4);
}

#[test]
fn test_remote_and_namespaced_tree() {
    let input = GraphInput::new(vec![
        CommitRecord::new("c4", &["c1"]).with_branch("refs/remotes/origin/feature-x"),
        CommitRecord::new("c3", &["c1"]).with_branch("feature/sidebar"),
        CommitRecord::new("c2", &["c1"]).with_branch("feature/new-ux"),
        CommitRecord::new("c1", &[]).with_branch("main"),
    ])
    .with_remote("origin")
    .with_current_branch("feature/new-ux");
    let view = GraphEngine::default().build(&input, &NoRowGeometry);

    let origin = view.branch_tree.find_path(&["Remotes", "origin"]).unwrap();
    assert_eq!(origin.kind, TreeNodeKind::RemoteGroup);
    let remote_leaf = origin.find_path(&["feature-x"]).unwrap();
    assert_eq!(remote_leaf.reference.as_ref().unwrap().full_name, "origin/feature-x");

    let feature = view.branch_tree.find_path(&["Local Branches", "feature"]).unwrap();
    assert_eq!(feature.kind, TreeNodeKind::Group);
    let names: Vec<&str> = feature.children.iter().map(|c| c.display_name.as_str()).collect();
    assert_eq!(names, vec!["new-ux", "sidebar"]);
}

#[test]
fn test_merge_keeps_nearest_parent_lane() {
    let input = GraphInput::new(vec![
        CommitRecord::new("m", &["main1", "topic1"]).with_branch("main"),
        CommitRecord::new("main1", &["base"]),
        CommitRecord::new("topic1", &["base"]).with_branch("topic"),
        CommitRecord::new("base", &[]),
    ])
    .with_current_branch("main");
    let view = GraphEngine::new(LayoutMode::Swimlane).build(&input, &NoRowGeometry);

    let merge = view.node("m").unwrap();
    let nearest = view.node("main1").unwrap();
    assert_eq!(merge.shape, NodeShape::Diamond);
    assert_eq!(merge.column, nearest.column);
    assert_eq!(merge.color_idx, nearest.color_idx);

    let topic = view.node("topic1").unwrap();
    assert_ne!(topic.column, merge.column);
    let kinds: Vec<EdgeKind> = view.edges_from("m").map(|e| e.kind).collect();
    assert_eq!(kinds, vec![EdgeKind::Straight, EdgeKind::MergeIn]);
}

#[test]
fn test_truncated_history() {
    let input = GraphInput::new(vec![
        CommitRecord::new("c3", &["c2"]).with_branch("main"),
        CommitRecord::new("c2", &["c1"]),
    ])
    .with_local_branch("stale", "c0");
    let view = GraphEngine::default().build(&input, &NoRowGeometry);

    let boundary: Vec<_> = view.edges.iter().filter(|e| e.truncated).collect();
    assert_eq!(boundary.len(), 1);
    assert_eq!(boundary[0].from_sha, "c2");
    assert_eq!(boundary[0].to_sha, "c1");

    assert!(view.branch_tree.find_path(&["Local Branches", "stale"]).is_some());
    assert!(view
        .nodes()
        .iter()
        .all(|node| node.owning_branch_key != Some(BranchKey::local("stale"))));
}

#[test]
fn test_identical_builds_serialize_identically() {
    let engine = GraphEngine::new(LayoutMode::BranchRows);
    let first = engine.build(&fork_input(), &NoRowGeometry);
    let second = engine.build(&fork_input(), &NoRowGeometry);

    assert_eq!(first, second);
    assert_eq!(first.to_json().unwrap(), second.to_json().unwrap());
}
