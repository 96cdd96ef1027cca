use std::cmp::Ordering;
use tracing::debug;

use crate::graph::arena::CommitArena;
use crate::graph::branch_tree::RefCatalog;
use crate::models::{BranchKey, RefDescriptor, RefKind};

/// Ordering used when several refs compete for one commit.
///
/// Current branch, then other local branches, then remote branches, then tags;
/// ties fall back to display name and then full name.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct RefPriority<'a> {
    class: u8,
    display_name: &'a str,
    full_name: &'a str,
}

impl<'a> RefPriority<'a> {
    pub fn of(descriptor: &'a RefDescriptor) -> Self {
        let class = match descriptor.kind {
            RefKind::LocalBranch if descriptor.is_current => 0,
            RefKind::LocalBranch => 1,
            RefKind::RemoteBranch => 2,
            RefKind::Tag => 3,
        };
        Self {
            class,
            display_name: &descriptor.display_name,
            full_name: &descriptor.full_name,
        }
    }

    pub fn is_tag(&self) -> bool {
        self.class == 3
    }
}

/// Owning ref per arena index. `None` marks an unowned (detached) commit.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OwnershipMap {
    owners: Vec<Option<BranchKey>>,
}

impl OwnershipMap {
    pub fn owner_of(&self, idx: usize) -> Option<&BranchKey> {
        self.owners.get(idx).and_then(Option::as_ref)
    }

    pub fn len(&self) -> usize {
        self.owners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.owners.is_empty()
    }

    pub fn owned_count(&self) -> usize {
        self.owners.iter().filter(|o| o.is_some()).count()
    }

    /// Arena indices owned by `key`, newest first.
    pub fn commits_owned_by<'a>(&'a self, key: &'a BranchKey) -> impl Iterator<Item = usize> + 'a {
        self.owners
            .iter()
            .enumerate()
            .filter(move |(_, owner)| owner.as_ref() == Some(key))
            .map(|(idx, _)| idx)
    }
}

/// Attributes every commit to at most one branch or tag.
///
/// Walks newest to oldest. Precedence per commit: a branch tip at the commit,
/// then the branch owning one of its children, then a tag at the commit, then a
/// tag owning one of its children.
pub struct OwnershipResolver;

impl OwnershipResolver {
    pub fn resolve(arena: &CommitArena, catalog: &RefCatalog) -> OwnershipMap {
        let mut owners: Vec<Option<BranchKey>> = vec![None; arena.len()];
        let mut priorities: Vec<Option<RefPriority<'_>>> = vec![None; arena.len()];

        for idx in 0..arena.len() {
            let tips = catalog.tips_at(&arena.node(idx).sha);
            let best_tip = |want_tag: bool| {
                tips.iter()
                    .filter(|d| d.is_branch() != want_tag)
                    .min_by(|a, b| RefPriority::of(a).cmp(&RefPriority::of(b)))
                    .copied()
            };

            // Children precede their parents in the arena, so their owners are settled.
            let inherited = arena
                .children_of(idx)
                .iter()
                .filter_map(|&child| priorities[child].clone().map(|p| (p, child)))
                .min_by(|(pa, ca), (pb, cb)| Self::compare_inherited(pa, *ca, pb, *cb));

            // (owner, its priority, the child it was inherited from)
            let chosen: Option<(BranchKey, RefPriority<'_>, Option<usize>)> = if let Some(tip) = best_tip(false) {
                Some((tip.key(), RefPriority::of(tip), None))
            } else if let Some((priority, child)) = inherited.clone().filter(|(p, _)| !p.is_tag()) {
                owners[child].clone().map(|key| (key, priority, Some(child)))
            } else if let Some(tag) = best_tip(true) {
                Some((tag.key(), RefPriority::of(tag), None))
            } else if let Some((priority, child)) = inherited {
                owners[child].clone().map(|key| (key, priority, Some(child)))
            } else {
                None
            };

            if let Some((key, priority, from_child)) = chosen {
                Self::assert_consistent_owner(arena, catalog, idx, &key, from_child);
                owners[idx] = Some(key);
                priorities[idx] = Some(priority);
            }
        }

        let map = OwnershipMap { owners };
        debug!("Resolved ownership: {} of {} commits owned", map.owned_count(), map.len());
        map
    }

    /// Panics when `key` is not a catalogued ref, or when an inherited owner
    /// does not come from a child of `idx`.
    fn assert_consistent_owner(
        arena: &CommitArena,
        catalog: &RefCatalog,
        idx: usize,
        key: &BranchKey,
        from_child: Option<usize>,
    ) {
        let sha = &arena.node(idx).sha;
        assert!(catalog.get(key).is_some(), "commit {} owned by unknown ref {}", sha, key);
        if let Some(child) = from_child {
            assert!(
                arena.children_of(idx).contains(&child),
                "commit {} inherits {} from {}, which is not one of its children",
                sha,
                key,
                arena.node(child).sha
            );
        }
    }

    /// Class first, then the newest child, then names.
    fn compare_inherited(a: &RefPriority<'_>, a_child: usize, b: &RefPriority<'_>, b_child: usize) -> Ordering {
        a.class
            .cmp(&b.class)
            .then(a_child.cmp(&b_child))
            .then_with(|| a.display_name.cmp(b.display_name))
            .then_with(|| a.full_name.cmp(b.full_name))
    }
}
