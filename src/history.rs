//! Flattened view of a loaded history: one contribution per (commit, file),
//! plus the per-commit file sets used as the co-change signal.

use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::config::WeightMode;
use crate::filter::PathFilter;
use crate::git::Commit;

/// One author's work on one file in one commit.
#[derive(Debug, Clone, PartialEq)]
pub struct Contribution {
    pub author: String,
    pub path: PathBuf,
    pub weight: u64,
    pub time: i64,
}

#[derive(Debug, Default)]
pub struct History {
    /// In history order (parents before children).
    pub contributions: Vec<Contribution>,
    /// Files touched by each counted commit, sorted, in history order.
    pub commit_files: Vec<Vec<PathBuf>>,
    /// Author key -> display name (first name seen).
    pub authors: BTreeMap<String, String>,
    /// Time of the newest counted commit.
    pub latest: Option<i64>,
    pub commits: usize,
    pub skipped_merges: usize,
}

pub struct FlattenOptions<'a> {
    pub filter: &'a PathFilter,
    pub weight: WeightMode,
    /// Count merge commits (only meaningful on a first-parent walk).
    pub count_merges: bool,
}

/// Flatten rename-tracked commits into contributions.
pub fn flatten(commits: &[Commit], opts: &FlattenOptions<'_>) -> History {
    let mut history = History::default();

    for commit in commits {
        if commit.is_merge() && !opts.count_merges {
            history.skipped_merges += 1;
            continue;
        }

        let key = commit.author.key().to_string();
        history
            .authors
            .entry(key.clone())
            .or_insert_with(|| commit.author.name.clone());

        let mut files: Vec<PathBuf> = Vec::new();
        for change in &commit.changes {
            if opts.filter.excludes(&change.path) {
                continue;
            }
            files.push(change.path.clone());
            history.contributions.push(Contribution {
                author: key.clone(),
                path: change.path.clone(),
                weight: opts.weight.weight(change.added, change.removed),
                time: commit.time,
            });
        }
        // A rename into an existing path can list the same path twice.
        files.sort();
        files.dedup();

        history.commits += 1;
        history.latest = Some(history.latest.map_or(commit.time, |t| t.max(commit.time)));
        history.commit_files.push(files);
    }

    if history.skipped_merges > 0 {
        tracing::debug!(
            skipped = history.skipped_merges,
            "merge commits skipped (use first-parent mode to count them)"
        );
    }
    history
}

/// Sum of weights over the whole history, for conservation checks.
pub fn total_weight(history: &History) -> u64 {
    history.contributions.iter().map(|c| c.weight).sum()
}

#[cfg(test)]
#[path = "history_test.rs"]
mod tests;
