use chrono::DateTime;
use git2::{Oid, Repository, RepositoryOpenFlags, Sort};
use std::collections::{BTreeMap, HashSet};
use std::path::Path;
use tracing::{debug, info, warn};

use crate::error_handling::GraphError;
use crate::models::{BranchTip, CommitRecord, GraphInput, TagTip, LOCAL_PREFIX, REMOTE_PREFIX, TAG_PREFIX};

/// Supplies commit records and refs from a local repository.
pub struct GitRepository {
    repo: Repository,
}

impl std::fmt::Debug for GitRepository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitRepository")
            .field("path", &self.repo.path())
            .finish()
    }
}

#[derive(Debug, Default)]
struct RefSnapshot {
    /// Tip oid to fully qualified branch refs.
    branches: BTreeMap<Oid, Vec<String>>,
    tags: BTreeMap<Oid, Vec<String>>,
    local_branches: Vec<BranchTip>,
    tag_tips: Vec<TagTip>,
}

impl GitRepository {
    /// Open the repository containing `path`, searching parent directories.
    pub fn discover<P: AsRef<Path>>(path: P) -> Result<Self, GraphError> {
        let repo = Repository::open_ext(
            path.as_ref(),
            RepositoryOpenFlags::empty(),
            &[] as &[&std::ffi::OsStr],
        )
        .map_err(|e| {
            GraphError::repository(format!(
                "no git repository at {}: {}",
                path.as_ref().display(),
                e.message()
            ))
        })?;
        Ok(Self { repo })
    }

    pub fn path(&self) -> &Path {
        self.repo.workdir().unwrap_or_else(|| self.repo.path())
    }

    /// Short name of the checked-out branch; `None` when detached or unborn.
    pub fn current_branch(&self) -> Option<String> {
        let head = self.repo.head().ok()?;
        if head.is_branch() {
            head.shorthand().map(str::to_string)
        } else {
            None
        }
    }

    pub fn remotes(&self) -> Result<Vec<String>, GraphError> {
        Ok(self.repo.remotes()?.iter().flatten().map(str::to_string).collect())
    }

    /// Build the engine input from every branch and tag tip, newest first,
    /// children always before their parents.
    pub fn load_graph_input(&self, limit: usize, include_remotes: bool) -> Result<GraphInput, GraphError> {
        let refs = self.snapshot_refs(include_remotes)?;

        let mut revwalk = self.repo.revwalk()?;
        revwalk.set_sorting(Sort::TOPOLOGICAL | Sort::TIME)?;
        let mut pushed = HashSet::new();
        for oid in refs.branches.keys().chain(refs.tags.keys()) {
            if pushed.insert(*oid) {
                revwalk.push(*oid)?;
            }
        }

        let mut commits = Vec::new();
        if !pushed.is_empty() {
            for oid in revwalk.take(limit) {
                let oid = oid?;
                let commit = self.repo.find_commit(oid)?;
                commits.push(Self::record_for(&commit, &refs));
            }
        }

        let remotes = if include_remotes { self.remotes()? } else { Vec::new() };
        info!(
            "Loaded {} commits, {} local branches, {} tags from {}",
            commits.len(),
            refs.local_branches.len(),
            refs.tag_tips.len(),
            self.path().display()
        );

        Ok(GraphInput {
            commits,
            local_branches: refs.local_branches,
            current_branch: self.current_branch(),
            remotes,
            tags: refs.tag_tips,
        })
    }

    fn record_for(commit: &git2::Commit<'_>, refs: &RefSnapshot) -> CommitRecord {
        let oid = commit.id();
        let author = commit.author();
        let author = match (author.name(), author.email()) {
            (Some(name), Some(email)) if !email.is_empty() => format!("{} <{}>", name, email),
            (Some(name), _) => name.to_string(),
            (None, _) => String::new(),
        };

        CommitRecord {
            hash: oid.to_string(),
            parents: commit.parent_ids().map(|p| p.to_string()).collect(),
            branches: refs.branches.get(&oid).cloned().unwrap_or_default(),
            tags: refs.tags.get(&oid).cloned().unwrap_or_default(),
            subject: commit.summary().unwrap_or_default().to_string(),
            author,
            date: DateTime::from_timestamp(commit.time().seconds(), 0),
        }
    }

    fn snapshot_refs(&self, include_remotes: bool) -> Result<RefSnapshot, GraphError> {
        let mut snapshot = RefSnapshot::default();

        for reference in self.repo.references()? {
            let reference = reference?;
            let Some(name) = reference.name().map(str::to_string) else {
                warn!("Skipping reference with a non UTF-8 name");
                continue;
            };

            if let Some(short) = name.strip_prefix(LOCAL_PREFIX) {
                let Ok(commit) = reference.peel_to_commit() else { continue };
                snapshot.local_branches.push(BranchTip::new(short, commit.id().to_string()));
                snapshot.branches.entry(commit.id()).or_default().push(name);
            } else if let Some(short) = name.strip_prefix(REMOTE_PREFIX) {
                if !include_remotes || short.ends_with("/HEAD") {
                    continue;
                }
                let Ok(commit) = reference.peel_to_commit() else { continue };
                snapshot.branches.entry(commit.id()).or_default().push(name);
            } else if let Some(short) = name.strip_prefix(TAG_PREFIX) {
                // Tags on trees or blobs have no place in the graph.
                let Ok(commit) = reference.peel_to_commit() else {
                    debug!("Tag {} does not point at a commit", short);
                    continue;
                };
                snapshot.tag_tips.push(TagTip::new(short, commit.id().to_string()));
                snapshot.tags.entry(commit.id()).or_default().push(name);
            }
        }

        Ok(snapshot)
    }
}
