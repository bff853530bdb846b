//! Commit history loader.
//!
//! Walks one ref of a local clone in parent-before-child order and turns
//! every commit into an immutable [`Commit`] with per-file line deltas,
//! diffed against the first parent with rename detection.

pub mod renames;

use std::path::{Path, PathBuf};

use git2::{Delta, DiffFindOptions, DiffOptions, Oid, Patch, Repository, Revwalk, Sort};

use crate::error::{MineError, MineResult};

pub struct GitRepo {
    repo: Repository,
    path: PathBuf,
}

/// Commit author. `email` is lower-cased and is the identity key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Author {
    pub name: String,
    pub email: String,
}

impl Author {
    pub fn new(name: &str, email: &str) -> Self {
        let email = email.trim().to_lowercase();
        let name = name.trim();
        Self {
            name: if name.is_empty() {
                email.clone()
            } else {
                name.to_string()
            },
            email,
        }
    }

    pub fn key(&self) -> &str {
        &self.email
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    Added,
    Modified,
    Deleted,
    Renamed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileChange {
    /// Path after the commit (the removed path for deletions).
    pub path: PathBuf,
    /// Path before the commit, set for renames.
    pub old_path: Option<PathBuf>,
    pub added: usize,
    pub removed: usize,
    pub kind: ChangeKind,
}

#[derive(Debug, Clone)]
pub struct Commit {
    pub id: String,
    pub author: Author,
    /// Author time, unix seconds.
    pub time: i64,
    pub parents: Vec<String>,
    pub changes: Vec<FileChange>,
}

impl Commit {
    pub fn is_merge(&self) -> bool {
        self.parents.len() > 1
    }
}

/// Which slice of history to load. Passed explicitly to every walk.
#[derive(Debug, Clone)]
pub struct HistoryRange {
    pub branch: String,
    pub since: Option<i64>,
    pub until: Option<i64>,
    pub first_parent: bool,
}

impl HistoryRange {
    pub fn branch(branch: &str) -> Self {
        Self {
            branch: branch.to_string(),
            since: None,
            until: None,
            first_parent: false,
        }
    }

    fn contains(&self, time: i64) -> bool {
        self.since.is_none_or(|s| time >= s) && self.until.is_none_or(|u| time <= u)
    }
}

impl GitRepo {
    /// Open a work tree, any path inside one, or a `.git`/bare directory.
    pub fn open(path: &Path) -> MineResult<Self> {
        let repo = Repository::discover(path).map_err(|e| MineError::RepositoryAccess {
            path: path.to_path_buf(),
            message: e.message().to_string(),
        })?;
        Ok(Self {
            repo,
            path: path.to_path_buf(),
        })
    }

    /// The path the repository was opened with, for messages.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Work tree root, or the git directory for bare repositories.
    pub fn root(&self) -> &Path {
        self.repo.workdir().unwrap_or_else(|| self.repo.path())
    }

    /// Resolve a branch, ref or revision to a commit. `Ok(None)` means
    /// the ref is the unborn branch of an empty repository.
    ///
    /// A name that resolves to a missing or unreadable object is a
    /// corrupt history, not an unknown ref.
    pub fn resolve(&self, reference: &str) -> MineResult<Option<Oid>> {
        let target = self
            .repo
            .resolve_reference_from_short_name(reference)
            .and_then(|r| r.resolve())
            .ok()
            .and_then(|r| r.target());
        if let Some(oid) = target {
            let commit = self
                .repo
                .find_object(oid, None)
                .and_then(|obj| obj.peel_to_commit())
                .map_err(|e| MineError::integrity(oid, e))?;
            return Ok(Some(commit.id()));
        }

        match self
            .repo
            .revparse_single(reference)
            .and_then(|obj| obj.peel_to_commit())
        {
            Ok(commit) => Ok(Some(commit.id())),
            Err(_) if self.is_unborn(reference) => Ok(None),
            Err(e) => Err(MineError::RefNotFound {
                path: self.path.clone(),
                reference: reference.to_string(),
                message: e.message().to_string(),
            }),
        }
    }

    fn is_unborn(&self, reference: &str) -> bool {
        let Ok(head) = self.repo.find_reference("HEAD") else {
            return false;
        };
        let Some(target) = head.symbolic_target() else {
            return false;
        };
        if self.repo.find_reference(target).is_ok() {
            return false;
        }
        reference == "HEAD"
            || reference == target
            || target.strip_prefix("refs/heads/") == Some(reference)
    }

    /// Start a fresh walk over `range`. Each call restarts from the tip.
    pub fn history(&self, range: &HistoryRange) -> MineResult<CommitWalk<'_>> {
        let walk = match self.resolve(&range.branch)? {
            Some(tip) => {
                let integrity = |e| MineError::integrity(tip, e);
                let mut walk = self.repo.revwalk().map_err(integrity)?;
                walk.set_sorting(Sort::TOPOLOGICAL | Sort::TIME | Sort::REVERSE)
                    .map_err(integrity)?;
                walk.push(tip).map_err(integrity)?;
                if range.first_parent {
                    walk.simplify_first_parent().map_err(integrity)?;
                }
                Some(walk)
            }
            None => None,
        };
        Ok(CommitWalk {
            repo: &self.repo,
            walk,
            range: range.clone(),
        })
    }

    /// Load the whole range eagerly.
    pub fn load(&self, range: &HistoryRange) -> MineResult<Vec<Commit>> {
        self.history(range)?.collect()
    }
}

/// Lazy, finite walk over one history range, parents before children.
pub struct CommitWalk<'r> {
    repo: &'r Repository,
    walk: Option<Revwalk<'r>>,
    range: HistoryRange,
}

impl Iterator for CommitWalk<'_> {
    type Item = MineResult<Commit>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let oid = match self.walk.as_mut()?.next()? {
                Ok(oid) => oid,
                Err(e) => return Some(Err(MineError::integrity("revwalk", e))),
            };
            let commit = match self.repo.find_commit(oid) {
                Ok(c) => c,
                Err(e) => return Some(Err(MineError::integrity(oid, e))),
            };
            if !self.range.contains(commit.author().when().seconds()) {
                continue;
            }
            return Some(load_commit(self.repo, &commit));
        }
    }
}

fn load_commit(repo: &Repository, commit: &git2::Commit) -> MineResult<Commit> {
    let id = commit.id().to_string();
    let integrity = |e| MineError::integrity(&id, e);

    let tree = commit.tree().map_err(integrity)?;
    // Merges are diffed against their first parent.
    let parent_tree = if commit.parent_count() > 0 {
        Some(commit.parent(0).and_then(|p| p.tree()).map_err(integrity)?)
    } else {
        None
    };

    let mut opts = DiffOptions::new();
    let mut diff = repo
        .diff_tree_to_tree(parent_tree.as_ref(), Some(&tree), Some(&mut opts))
        .map_err(integrity)?;
    let mut find = DiffFindOptions::new();
    find.renames(true);
    diff.find_similar(Some(&mut find)).map_err(integrity)?;

    let mut changes = Vec::new();
    for idx in 0..diff.deltas().len() {
        let Some(delta) = diff.get_delta(idx) else {
            continue;
        };
        let kind = match delta.status() {
            Delta::Added | Delta::Copied => ChangeKind::Added,
            Delta::Deleted => ChangeKind::Deleted,
            Delta::Renamed => ChangeKind::Renamed,
            Delta::Modified | Delta::Typechange => ChangeKind::Modified,
            _ => continue,
        };
        let path = match kind {
            ChangeKind::Deleted => delta.old_file().path(),
            _ => delta.new_file().path(),
        };
        let Some(path) = path.map(Path::to_path_buf) else {
            continue;
        };
        let old_path = match kind {
            ChangeKind::Renamed => delta.old_file().path().map(Path::to_path_buf),
            _ => None,
        };

        // Binary deltas produce no patch lines.
        let (added, removed) = match Patch::from_diff(&diff, idx).map_err(integrity)? {
            Some(patch) => {
                let (_, added, removed) = patch.line_stats().map_err(integrity)?;
                (added, removed)
            }
            None => (0, 0),
        };

        changes.push(FileChange {
            path,
            old_path,
            added,
            removed,
            kind,
        });
    }
    changes.sort_by(|a, b| a.path.cmp(&b.path));

    let sig = commit.author();
    let author = Author::new(
        sig.name().unwrap_or_default(),
        sig.email().unwrap_or("unknown"),
    );

    Ok(Commit {
        id,
        author,
        time: sig.when().seconds(),
        parents: commit.parent_ids().map(|p| p.to_string()).collect(),
        changes,
    })
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
