//! Rename tracking across a loaded history.
//!
//! Rewrites every historical path to the name the file carries at the
//! end of the range, so contributions made before a move are attributed
//! to the current path.

use std::collections::HashMap;
use std::path::PathBuf;

use super::{ChangeKind, Commit};

/// Rewrite paths in place. `commits` must be in parent-before-child order.
///
/// Walking newest to oldest, a rename `old -> new` maps `old` to whatever
/// `new` finally became. Renames are recorded only after the commit's own
/// changes are rewritten, so a file re-created at `old` later on keeps its
/// own identity.
pub fn track_renames(commits: &mut [Commit]) {
    let mut latest: HashMap<PathBuf, PathBuf> = HashMap::new();

    for commit in commits.iter_mut().rev() {
        let mut renamed: Vec<(PathBuf, PathBuf)> = Vec::new();

        for change in &mut commit.changes {
            if let Some(current) = latest.get(&change.path) {
                change.path = current.clone();
            }
            if change.kind == ChangeKind::Renamed
                && let Some(old) = &change.old_path
            {
                renamed.push((old.clone(), change.path.clone()));
            }
        }

        for (old, current) in renamed {
            latest.insert(old, current);
        }
    }
}

#[cfg(test)]
#[path = "renames_test.rs"]
mod tests;
