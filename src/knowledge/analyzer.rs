use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

use crate::error::{MineError, MineResult};
use crate::history::Contribution;

/// Exponential decay with a fixed half-life: a contribution of weight `w`
/// made at `t` is worth `w * 2^(-(T - t) / half_life)` at instant `T`.
#[derive(Debug, Clone, Copy)]
pub struct DecayModel {
    half_life_secs: f64,
}

impl DecayModel {
    pub fn new(half_life_secs: f64) -> MineResult<Self> {
        if !(half_life_secs.is_finite() && half_life_secs > 0.0) {
            return Err(MineError::Computation(format!(
                "half-life must be positive, got {half_life_secs}"
            )));
        }
        Ok(Self { half_life_secs })
    }

    /// Multiplier for a score carried forward by `elapsed` seconds.
    pub fn factor(&self, elapsed: i64) -> f64 {
        (-(elapsed as f64) / self.half_life_secs).exp2()
    }
}

/// Running score for one (author, file), decayed to `last`.
#[derive(Debug, Clone, Copy)]
struct Running {
    score: f64,
    last: i64,
}

/// Incremental knowledge state: each event costs O(1), and evaluation
/// never replays history.
pub struct KnowledgeAccumulator {
    model: DecayModel,
    state: HashMap<(String, PathBuf), Running>,
}

impl KnowledgeAccumulator {
    pub fn new(model: DecayModel) -> Self {
        Self {
            model,
            state: HashMap::new(),
        }
    }

    pub fn record(&mut self, author: &str, path: &Path, weight: f64, time: i64) -> MineResult<()> {
        if !(weight.is_finite() && weight >= 0.0) {
            return Err(MineError::Computation(format!(
                "invalid contribution weight {weight} for {}",
                path.display()
            )));
        }
        let model = self.model;
        let running = self
            .state
            .entry((author.to_string(), path.to_path_buf()))
            .or_insert(Running {
                score: 0.0,
                last: time,
            });

        if time >= running.last {
            running.score = running.score * model.factor(time - running.last) + weight;
            running.last = time;
        } else {
            // Out-of-order timestamp (rebased or back-dated commit):
            // fold it in at the current reference time.
            running.score += weight * model.factor(running.last - time);
        }

        if !running.score.is_finite() {
            return Err(MineError::Computation(format!(
                "knowledge score overflow for {author} on {}",
                path.display()
            )));
        }
        Ok(())
    }

    pub fn score_at(&self, author: &str, path: &Path, at: i64) -> MineResult<f64> {
        match self.state.get(&(author.to_string(), path.to_path_buf())) {
            Some(running) => self.decayed(running, at),
            None => Ok(0.0),
        }
    }

    fn decayed(&self, running: &Running, at: i64) -> MineResult<f64> {
        if at < running.last {
            return Err(MineError::Computation(format!(
                "evaluation instant {at} precedes a contribution at {}",
                running.last
            )));
        }
        let score = running.score * self.model.factor(at - running.last);
        if !(score.is_finite() && score >= 0.0) {
            return Err(MineError::Computation(format!(
                "knowledge score out of range: {score}"
            )));
        }
        Ok(score)
    }

    /// Snapshot every (author, file) score at instant `at`.
    pub fn evaluate(&self, at: i64) -> MineResult<DeveloperKnowledge> {
        let mut by_file: BTreeMap<PathBuf, BTreeMap<String, f64>> = BTreeMap::new();
        for ((author, path), running) in &self.state {
            let score = self.decayed(running, at)?;
            by_file
                .entry(path.clone())
                .or_default()
                .insert(author.clone(), score);
        }
        Ok(DeveloperKnowledge {
            evaluated_at: at,
            by_file,
        })
    }
}

/// Knowledge scores at one instant, indexed by file then author.
#[derive(Debug, Default)]
pub struct DeveloperKnowledge {
    pub evaluated_at: i64,
    pub by_file: BTreeMap<PathBuf, BTreeMap<String, f64>>,
}

impl DeveloperKnowledge {
    pub fn score(&self, author: &str, path: &Path) -> f64 {
        self.by_file
            .get(path)
            .and_then(|authors| authors.get(author))
            .copied()
            .unwrap_or(0.0)
    }

    pub fn file_total(&self, path: &Path) -> f64 {
        self.by_file
            .get(path)
            .map(|authors| authors.values().sum())
            .unwrap_or(0.0)
    }

    /// The author's fraction of all knowledge about `path`, in `[0, 1]`.
    pub fn share(&self, author: &str, path: &Path) -> f64 {
        let total = self.file_total(path);
        if total > 0.0 {
            self.score(author, path) / total
        } else {
            0.0
        }
    }

    /// Scores regrouped as author -> file -> score.
    pub fn by_author(&self) -> BTreeMap<&str, BTreeMap<&Path, f64>> {
        let mut out: BTreeMap<&str, BTreeMap<&Path, f64>> = BTreeMap::new();
        for (path, authors) in &self.by_file {
            for (author, score) in authors {
                out.entry(author.as_str())
                    .or_default()
                    .insert(path.as_path(), *score);
            }
        }
        out
    }

    /// Scores summed per author and module (parent directory).
    pub fn modules(&self) -> BTreeMap<&str, BTreeMap<String, f64>> {
        let mut out: BTreeMap<&str, BTreeMap<String, f64>> = BTreeMap::new();
        for (path, authors) in &self.by_file {
            let module = module_of(path);
            for (author, score) in authors {
                *out.entry(author.as_str())
                    .or_default()
                    .entry(module.clone())
                    .or_insert(0.0) += score;
            }
        }
        out
    }

    pub fn is_empty(&self) -> bool {
        self.by_file.is_empty()
    }
}

/// Parent directory of a repository-relative path; `.` for the root.
pub fn module_of(path: &Path) -> String {
    match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir.display().to_string(),
        _ => ".".to_string(),
    }
}

/// Run the decay model over a whole history and evaluate at `at`.
pub fn compute(
    contributions: &[Contribution],
    model: DecayModel,
    at: i64,
) -> MineResult<DeveloperKnowledge> {
    let mut acc = KnowledgeAccumulator::new(model);
    for c in contributions {
        acc.record(&c.author, &c.path, c.weight as f64, c.time)?;
    }
    acc.evaluate(at)
}

#[cfg(test)]
#[path = "analyzer_test.rs"]
mod tests;
