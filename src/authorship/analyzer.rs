//! Potential authorship: how well an author could work on a file they
//! never touched, inferred from their knowledge of related files.
//!
//! Two files are related when they change together (co-change strength =
//! shared_commits / min(commits_a, commits_b)) or live in the same
//! directory. An author's estimate for file f is the relatedness-weighted
//! mean of their knowledge share over f's related files.

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

use crate::knowledge::{DeveloperKnowledge, module_of};
use crate::ownership::Ownership;

/// Co-change counts over a history.
#[derive(Debug, Default)]
pub struct CoChange {
    commits: HashMap<PathBuf, usize>,
    shared: HashMap<PathBuf, BTreeMap<PathBuf, usize>>,
}

impl CoChange {
    /// Count, per file, the commits touching it and, per pair, the commits
    /// touching both. Commits with more than `max_commit_files` files
    /// (bulk reformatting, vendoring) still count per file but add no pairs.
    pub fn from_commits(commit_files: &[Vec<PathBuf>], max_commit_files: usize) -> Self {
        let mut co = CoChange::default();

        for files in commit_files {
            for f in files {
                *co.commits.entry(f.clone()).or_insert(0) += 1;
            }
            if files.len() < 2 || files.len() > max_commit_files {
                continue;
            }
            for i in 0..files.len() {
                for j in (i + 1)..files.len() {
                    co.bump(&files[i], &files[j]);
                    co.bump(&files[j], &files[i]);
                }
            }
        }

        co
    }

    fn bump(&mut self, a: &Path, b: &Path) {
        *self
            .shared
            .entry(a.to_path_buf())
            .or_default()
            .entry(b.to_path_buf())
            .or_insert(0) += 1;
    }

    pub fn commits(&self, path: &Path) -> usize {
        self.commits.get(path).copied().unwrap_or(0)
    }

    pub fn shared(&self, a: &Path, b: &Path) -> usize {
        self.shared
            .get(a)
            .and_then(|m| m.get(b))
            .copied()
            .unwrap_or(0)
    }

    /// shared / min(commits_a, commits_b), in `[0, 1]`.
    pub fn strength(&self, a: &Path, b: &Path) -> f64 {
        let shared = self.shared(a, b);
        let min_commits = self.commits(a).min(self.commits(b));
        if shared == 0 || min_commits == 0 {
            0.0
        } else {
            shared as f64 / min_commits as f64
        }
    }

    /// Files that changed together with `path` at least once.
    pub fn partners(&self, path: &Path) -> impl Iterator<Item = &Path> {
        self.shared
            .get(path)
            .into_iter()
            .flat_map(|m| m.keys().map(PathBuf::as_path))
    }
}

#[derive(Debug, Clone, Copy)]
pub struct EstimateOptions {
    pub co_change_weight: f64,
    pub directory_weight: f64,
    pub min_estimate: f64,
}

/// Estimates indexed by file then author; direct contributors never appear.
#[derive(Debug, Default)]
pub struct PotentialAuthorship {
    pub by_file: BTreeMap<PathBuf, BTreeMap<String, f64>>,
}

impl PotentialAuthorship {
    pub fn estimate(&self, author: &str, path: &Path) -> f64 {
        self.by_file
            .get(path)
            .and_then(|m| m.get(author))
            .copied()
            .unwrap_or(0.0)
    }

    pub fn len(&self) -> usize {
        self.by_file.values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.by_file.is_empty()
    }
}

/// Relatedness of every file related to `path`, keyed by the other file.
pub fn related_files<'a>(
    path: &Path,
    co: &'a CoChange,
    siblings: &'a BTreeMap<String, Vec<&'a Path>>,
    opts: &EstimateOptions,
) -> BTreeMap<&'a Path, f64> {
    let mut related: BTreeMap<&Path, f64> = BTreeMap::new();

    if opts.co_change_weight > 0.0 {
        for other in co.partners(path) {
            let strength = co.strength(path, other);
            if strength > 0.0 {
                *related.entry(other).or_insert(0.0) += opts.co_change_weight * strength;
            }
        }
    }
    if opts.directory_weight > 0.0
        && let Some(dir) = siblings.get(&module_of(path))
    {
        for other in dir.iter().copied().filter(|o| *o != path) {
            *related.entry(other).or_insert(0.0) += opts.directory_weight;
        }
    }

    related
}

pub fn estimate(
    ownership: &Ownership,
    knowledge: &DeveloperKnowledge,
    co: &CoChange,
    opts: &EstimateOptions,
) -> PotentialAuthorship {
    let mut siblings: BTreeMap<String, Vec<&Path>> = BTreeMap::new();
    for path in ownership.files.keys() {
        siblings.entry(module_of(path)).or_default().push(path.as_path());
    }

    let file_totals: HashMap<&Path, f64> = knowledge
        .by_file
        .keys()
        .map(|p| (p.as_path(), knowledge.file_total(p)))
        .collect();

    let mut by_file: BTreeMap<PathBuf, BTreeMap<String, f64>> = BTreeMap::new();

    for path in ownership.files.keys() {
        let related = related_files(path, co, &siblings, opts);
        let total_relatedness: f64 = related.values().sum();
        if total_relatedness <= 0.0 {
            continue;
        }

        let mut weighted: BTreeMap<&str, f64> = BTreeMap::new();
        for (other, rel) in &related {
            let total = file_totals.get(other).copied().unwrap_or(0.0);
            if total <= 0.0 {
                continue;
            }
            let Some(scores) = knowledge.by_file.get(*other) else {
                continue;
            };
            for (author, score) in scores {
                *weighted.entry(author.as_str()).or_insert(0.0) += rel * (score / total);
            }
        }

        let estimates: BTreeMap<String, f64> = weighted
            .into_iter()
            .filter(|(author, _)| !ownership.is_direct(author, path))
            .map(|(author, w)| (author.to_string(), (w / total_relatedness).min(1.0)))
            .filter(|(_, e)| *e > 0.0 && *e >= opts.min_estimate)
            .collect();

        if !estimates.is_empty() {
            by_file.insert(path.clone(), estimates);
        }
    }

    PotentialAuthorship { by_file }
}

#[cfg(test)]
#[path = "analyzer_test.rs"]
mod tests;
