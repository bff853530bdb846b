//! Several repositories in one invocation, mined in parallel.
//!
//! Each repository gets its own run (repository handle, history, results)
//! and its own output directory, `<output-dir>/<repository name>`. A
//! failing repository is reported and skipped; the others still emit.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use rayon::prelude::*;

use crate::error::MineError;
use crate::pipeline::{self, MineRequest, OutputMode, OutputPlan};

pub struct RepoOutcome {
    pub repository: PathBuf,
    pub output_dir: PathBuf,
    pub result: Result<usize, MineError>,
}

impl RepoOutcome {
    pub fn exit_code(&self) -> i32 {
        match &self.result {
            Ok(_) => 0,
            Err(e) => e.exit_code(),
        }
    }
}

/// Output subdirectory names, one per repository, unique within a batch.
pub fn output_names(repositories: &[PathBuf]) -> Vec<String> {
    let mut taken: BTreeSet<String> = BTreeSet::new();
    repositories
        .iter()
        .map(|path| {
            let base = dir_name(path);
            let mut name = base.clone();
            let mut n = 2;
            while !taken.insert(name.clone()) {
                name = format!("{base}-{n}");
                n += 1;
            }
            name
        })
        .collect()
}

fn dir_name(path: &Path) -> String {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().trim_end_matches(".git").to_string())
        .unwrap_or_default();
    if name.is_empty() || name == "." || name == ".." {
        "repository".to_string()
    } else {
        name
    }
}

/// Mine every repository with the settings of `template`, on at most
/// `jobs` threads. Outcomes keep the input order.
pub fn run(
    repositories: &[PathBuf],
    template: &MineRequest,
    output_dir: &Path,
    jobs: usize,
) -> Vec<RepoOutcome> {
    let requests: Vec<MineRequest> = repositories
        .iter()
        .zip(output_names(repositories))
        .map(|(repo, name)| MineRequest {
            repository: repo.clone(),
            outputs: OutputPlan {
                dir: Some(output_dir.join(name)),
                files: Default::default(),
            },
            ..template.clone()
        })
        .collect();

    let mine = |req: &MineRequest| {
        let result = pipeline::run(req, OutputMode::Quiet).map(|a| a.history.commits);
        if let Err(e) = &result {
            tracing::warn!(repository = %req.repository.display(), "{e}");
        }
        RepoOutcome {
            repository: req.repository.clone(),
            output_dir: req.outputs.dir.clone().unwrap_or_default(),
            result,
        }
    };

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(jobs)
        .build();
    match pool {
        Ok(pool) => pool.install(|| requests.par_iter().map(mine).collect()),
        Err(e) => {
            tracing::warn!("cannot start worker pool ({e}), mining sequentially");
            requests.iter().map(mine).collect()
        }
    }
}

/// The highest failure code, so any failure is visible to the caller.
pub fn exit_code(outcomes: &[RepoOutcome]) -> i32 {
    outcomes.iter().map(RepoOutcome::exit_code).max().unwrap_or(0)
}

pub fn print_summary(outcomes: &[RepoOutcome]) {
    for o in outcomes {
        match &o.result {
            Ok(commits) => println!(
                "ok    {} ({commits} commits) -> {}",
                o.repository.display(),
                o.output_dir.display()
            ),
            Err(e) => println!("FAIL  {}: {e}", o.repository.display()),
        }
    }
    let failed = outcomes.iter().filter(|o| o.result.is_err()).count();
    println!();
    println!("{} repositories, {failed} failed.", outcomes.len());
}

#[cfg(test)]
#[path = "batch_test.rs"]
mod tests;
