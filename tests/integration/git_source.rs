//! The git2 record supplier feeding the engine.

use super::test_utils::*;
use commit_graph::git::{git_log_args, GitRepository, LogParser};
use commit_graph::graph::{EdgeKind, GraphEngine, LayoutMode, NoRowGeometry, TreeNodeKind};
use commit_graph::models::{BranchKey, NodeShape};
use std::process::Command;

#[test]
fn test_repository_discovery() -> anyhow::Result<()> {
    let (_temp_dir, repo_path) = create_test_repo()?;
    create_test_commit(&repo_path, "Test commit")?;

    let repo = GitRepository::discover(&repo_path)?;
    assert!(repo.path().exists());
    assert_eq!(repo.current_branch().as_deref(), Some("main"));
    Ok(())
}

#[test]
fn test_merged_repository_layout() -> anyhow::Result<()> {
    let (_temp_dir, repo_path) = create_complex_test_repo()?;
    let repo = GitRepository::discover(&repo_path)?;
    let input = repo.load_graph_input(100, true)?;
    assert_eq!(input.commits.len(), 4);

    let view = GraphEngine::new(LayoutMode::Swimlane).build(&input, &NoRowGeometry);
    let merge = &view.nodes()[0];
    assert_eq!(merge.message, "Merge feature branch");
    assert_eq!(merge.shape, NodeShape::Diamond);
    assert_eq!(merge.owning_branch_key, Some(BranchKey::local("main")));
    assert!(view.edges_from(&merge.sha).any(|e| e.kind == EdgeKind::MergeIn));

    let root = view.nodes().last().unwrap();
    assert_eq!(root.message, "Initial commit");
    let tag = view.branch_tree.find_path(&["Tags", "v1.0"]).unwrap();
    assert_eq!(tag.reference.as_ref().unwrap().tip_sha, root.sha);

    let feature = view
        .branch_tree
        .find_path(&["Local Branches", "feature", "test"])
        .unwrap();
    assert_eq!(feature.kind, TreeNodeKind::BranchLeaf);
    Ok(())
}

#[test]
fn test_remote_tracking_refs() -> anyhow::Result<()> {
    let (_temp_dir, repo_path) = create_test_repo()?;
    create_test_commit(&repo_path, "Shared commit")?;
    git(&repo_path, &["remote", "add", "origin", "https://example.invalid/repo.git"])?;
    git(&repo_path, &["update-ref", "refs/remotes/origin/main", "HEAD"])?;
    create_test_commit(&repo_path, "Local only")?;

    let repo = GitRepository::discover(&repo_path)?;
    let input = repo.load_graph_input(100, true)?;
    assert_eq!(input.remotes, vec!["origin"]);

    let view = GraphEngine::new(LayoutMode::BranchRows).build(&input, &NoRowGeometry);
    let leaf = view.branch_tree.find_path(&["Remotes", "origin", "main"]).unwrap();
    assert_eq!(leaf.reference.as_ref().unwrap().full_name, "origin/main");
    assert_eq!(
        view.nodes()[1].owning_branch_key,
        Some(BranchKey::remote("origin/main"))
    );

    let without_remotes = repo.load_graph_input(100, false)?;
    assert!(without_remotes.remotes.is_empty());
    assert!(without_remotes.commits.iter().all(|c| c.branches.iter().all(|b| !b.starts_with("refs/remotes/"))));
    Ok(())
}

#[test]
fn test_log_dump_matches_repository() -> anyhow::Result<()> {
    let (_temp_dir, repo_path) = create_complex_test_repo()?;

    let output = Command::new("git")
        .args(git_log_args(None))
        .current_dir(&repo_path)
        .output()?;
    let parsed = LogParser::new()?.parse(&String::from_utf8(output.stdout)?);
    assert_eq!(parsed.skipped, 0);
    assert_eq!(parsed.head_branch.as_deref(), Some("main"));

    let from_log = parsed.into_input(Vec::new());
    let from_repo = GitRepository::discover(&repo_path)?.load_graph_input(100, true)?;

    let log_shas: Vec<&str> = from_log.commits.iter().map(|c| c.hash.as_str()).collect();
    let repo_shas: Vec<&str> = from_repo.commits.iter().map(|c| c.hash.as_str()).collect();
    assert_eq!(log_shas.len(), repo_shas.len());
    assert_eq!(log_shas.first(), repo_shas.first());
    assert_eq!(log_shas.last(), repo_shas.last());
    Ok(())
}
