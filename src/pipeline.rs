//! A mining run end to end.
//!
//! `analyze` turns one history range into every result (ownership,
//! knowledge, potential authorship, assignment matrix, contributor
//! statistics) without touching the filesystem. `run` wraps it with
//! configuration loading and then either prints reports or emits the
//! requested documents, only once every stage has succeeded.

use std::collections::{BTreeMap, BTreeSet};
use std::io::Write;
use std::path::{Path, PathBuf};

use clap::ValueEnum;
use tracing::{debug, info};

use crate::authorship::{self, CoChange, EstimateOptions, PotentialAuthorship};
use crate::config::MinerConfig;
use crate::contributors::{self, ContributorStats};
use crate::emit::{self, Document, RunInfo};
use crate::error::{MineError, MineResult};
use crate::filter::PathFilter;
use crate::git::{GitRepo, HistoryRange, renames};
use crate::history::{self, FlattenOptions, History};
use crate::knowledge::{self, DecayModel, DeveloperKnowledge};
use crate::matrix::{self, AssignmentMatrix};
use crate::ownership::{self, Ownership};

/// Which results a run produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Miner {
    /// Accumulated line contributions per file and author
    Ownership,
    /// Time-decayed developer knowledge per file
    Knowledge,
    /// Estimated ability to work on files never touched
    Authorship,
    /// User x file assignment matrix with id maps
    Matrix,
    /// Per-contributor statistics and suggested roles
    Contributors,
    /// Everything above
    All,
}

impl Miner {
    pub fn documents(self) -> &'static [DocKind] {
        match self {
            Miner::Ownership => &[DocKind::FilesOwnership],
            Miner::Knowledge => &[DocKind::DeveloperKnowledge],
            Miner::Authorship => &[DocKind::PotentialAuthorship],
            Miner::Matrix => &[DocKind::AssignmentMatrix, DocKind::UserIds, DocKind::FileIds],
            Miner::Contributors => &[DocKind::Contributors],
            Miner::All => &DocKind::ALL,
        }
    }
}

/// One emitted document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum DocKind {
    FilesOwnership,
    DeveloperKnowledge,
    PotentialAuthorship,
    AssignmentMatrix,
    UserIds,
    FileIds,
    Contributors,
}

impl DocKind {
    pub const ALL: [DocKind; 7] = [
        DocKind::FilesOwnership,
        DocKind::DeveloperKnowledge,
        DocKind::PotentialAuthorship,
        DocKind::AssignmentMatrix,
        DocKind::UserIds,
        DocKind::FileIds,
        DocKind::Contributors,
    ];

    pub fn file_name(self) -> &'static str {
        match self {
            DocKind::FilesOwnership => "FilesOwnership.json",
            DocKind::DeveloperKnowledge => "DeveloperKnowledge.json",
            DocKind::PotentialAuthorship => "PotentialAuthorship.json",
            DocKind::AssignmentMatrix => "AssignmentMatrix.json",
            DocKind::UserIds => "idToUser.json",
            DocKind::FileIds => "idToFile.json",
            DocKind::Contributors => "Contributors.json",
        }
    }

    /// Value of the envelope's `miner` field.
    pub fn label(self) -> &'static str {
        match self {
            DocKind::FilesOwnership => "ownership",
            DocKind::DeveloperKnowledge => "knowledge",
            DocKind::PotentialAuthorship => "authorship",
            DocKind::AssignmentMatrix => "matrix",
            DocKind::UserIds => "user-ids",
            DocKind::FileIds => "file-ids",
            DocKind::Contributors => "contributors",
        }
    }
}

/// Where documents go. With neither a directory nor an explicit file,
/// results are printed instead.
#[derive(Debug, Clone, Default)]
pub struct OutputPlan {
    pub dir: Option<PathBuf>,
    /// Explicit destinations; these documents are written even when the
    /// selected miner would not produce them.
    pub files: BTreeMap<DocKind, PathBuf>,
}

impl OutputPlan {
    pub fn destinations(&self, miner: Miner) -> MineResult<Vec<(DocKind, PathBuf)>> {
        let mut kinds: BTreeSet<DocKind> = self.files.keys().copied().collect();
        if self.dir.is_some() {
            kinds.extend(miner.documents().iter().copied());
        }

        let mut out = Vec::with_capacity(kinds.len());
        let mut seen: BTreeSet<PathBuf> = BTreeSet::new();
        for kind in kinds {
            let path = match (self.files.get(&kind), &self.dir) {
                (Some(p), _) => p.clone(),
                (None, Some(dir)) => dir.join(kind.file_name()),
                (None, None) => continue,
            };
            if !seen.insert(path.clone()) {
                return Err(MineError::Config(format!(
                    "two documents would be written to {}",
                    path.display()
                )));
            }
            out.push((kind, path));
        }
        Ok(out)
    }
}

/// How results reach the user when no document is written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    Table { top: usize },
    Json,
    Quiet,
}

/// Command-line values that win over the configuration file.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub half_life_days: Option<f64>,
    pub first_parent: bool,
    pub include_tests: bool,
}

impl Overrides {
    pub fn apply(&self, config: &mut MinerConfig) {
        if let Some(days) = self.half_life_days {
            config.half_life_days = days;
        }
        config.first_parent |= self.first_parent;
        config.include_tests |= self.include_tests;
    }
}

/// Everything one run needs, passed explicitly.
#[derive(Debug, Clone)]
pub struct MineRequest {
    pub repository: PathBuf,
    pub branch: String,
    pub since: Option<i64>,
    pub until: Option<i64>,
    pub config_file: Option<PathBuf>,
    pub overrides: Overrides,
    pub miner: Miner,
    pub outputs: OutputPlan,
}

impl MineRequest {
    pub fn new(repository: &Path, branch: &str, miner: Miner) -> Self {
        Self {
            repository: repository.to_path_buf(),
            branch: branch.to_string(),
            since: None,
            until: None,
            config_file: None,
            overrides: Overrides::default(),
            miner,
            outputs: OutputPlan::default(),
        }
    }
}

/// Results of one run.
pub struct Analysis {
    pub info: RunInfo,
    pub half_life_days: f64,
    pub history: History,
    pub ownership: Ownership,
    pub knowledge: DeveloperKnowledge,
    pub potential: PotentialAuthorship,
    pub matrix: AssignmentMatrix,
    pub contributors: Vec<ContributorStats>,
}

/// Display name of a repository: its work tree directory, or the bare
/// directory without `.git`.
pub fn repository_name(repo: &GitRepo) -> String {
    let root = repo.root();
    let dir = match root.file_name() {
        Some(name) if name == ".git" => root.parent().and_then(Path::file_name),
        other => other,
    };
    dir.map(|n| n.to_string_lossy().trim_end_matches(".git").to_string())
        .filter(|n| !n.is_empty())
        .unwrap_or_else(|| repo.path().display().to_string())
}

/// The knowledge evaluation instant: the range's upper bound when given,
/// else the newest commit. Never the wall clock, so reruns agree.
pub fn evaluation_instant(range: &HistoryRange, history: &History) -> i64 {
    range.until.or(history.latest).unwrap_or(0)
}

pub fn analyze(repo: &GitRepo, range: &HistoryRange, config: &MinerConfig) -> MineResult<Analysis> {
    let mut commits = repo.load(range)?;
    debug!(commits = commits.len(), "history loaded");
    renames::track_renames(&mut commits);

    let filter = PathFilter::new(&config.exclude, config.include_tests)?;
    let history = history::flatten(
        &commits,
        &FlattenOptions {
            filter: &filter,
            weight: config.weight,
            count_merges: range.first_parent,
        },
    );
    drop(commits);

    let ownership = ownership::accumulate(&history.contributions);
    let recorded = history::total_weight(&history);
    if ownership.total_weight() != recorded {
        return Err(MineError::Computation(format!(
            "ownership holds {} weight but history recorded {recorded}",
            ownership.total_weight()
        )));
    }
    debug!(files = ownership.files.len(), weight = recorded, "ownership accumulated");

    let at = evaluation_instant(range, &history);
    let model = DecayModel::new(config.half_life_secs())?;
    let knowledge = knowledge::compute(&history.contributions, model, at)?;
    debug!(files = knowledge.by_file.len(), at, "knowledge evaluated");

    let co = CoChange::from_commits(&history.commit_files, config.max_commit_files);
    let potential = authorship::estimate(
        &ownership,
        &knowledge,
        &co,
        &EstimateOptions {
            co_change_weight: config.co_change_weight,
            directory_weight: config.directory_weight,
            min_estimate: config.min_estimate,
        },
    );
    debug!(estimates = potential.len(), "potential authorship estimated");

    let matrix = matrix::build(&ownership, &knowledge, &potential);
    let contributors = contributors::analyze(&matrix);

    Ok(Analysis {
        info: RunInfo {
            repository: repository_name(repo),
            branch: range.branch.clone(),
            evaluated_at: at,
        },
        half_life_days: config.half_life_days,
        history,
        ownership,
        knowledge,
        potential,
        matrix,
        contributors,
    })
}

impl Analysis {
    pub fn render(&self, kind: DocKind) -> MineResult<Vec<u8>> {
        let authors = &self.history.authors;
        let label = kind.label();
        match kind {
            DocKind::FilesOwnership => emit::render(
                &self.info,
                label,
                &ownership::report::document(&self.ownership, authors),
            ),
            DocKind::DeveloperKnowledge => emit::render(
                &self.info,
                label,
                &knowledge::report::document(&self.knowledge, authors, self.half_life_days),
            ),
            DocKind::PotentialAuthorship => emit::render(
                &self.info,
                label,
                &authorship::report::document(&self.potential, authors),
            ),
            DocKind::AssignmentMatrix => {
                emit::render(&self.info, label, &matrix::report::document(&self.matrix))
            }
            DocKind::UserIds => emit::render(
                &self.info,
                label,
                &matrix::report::user_ids(&self.matrix, authors),
            ),
            DocKind::FileIds => {
                emit::render(&self.info, label, &matrix::report::file_ids(&self.matrix))
            }
            DocKind::Contributors => emit::render(
                &self.info,
                label,
                &contributors::report::document(&self.contributors, authors),
            ),
        }
    }

    pub fn print_tables(&self, miner: Miner, top: usize) {
        let authors = &self.history.authors;
        let all = miner == Miner::All;
        let mut first = true;
        let mut section = |print: &dyn Fn()| {
            if !first {
                println!();
            }
            first = false;
            print();
        };

        if all || miner == Miner::Ownership {
            section(&|| ownership::report::print_report(&self.ownership, authors, top));
        }
        if all || miner == Miner::Knowledge {
            section(&|| knowledge::report::print_report(&self.knowledge, authors, top));
        }
        if all || miner == Miner::Authorship {
            section(&|| authorship::report::print_report(&self.potential, authors, top));
        }
        if all || miner == Miner::Matrix {
            section(&|| matrix::report::print_report(&self.matrix, authors, top));
        }
        if all || miner == Miner::Contributors {
            section(&|| contributors::report::print_report(&self.contributors, authors, top));
        }
    }

    /// Rendered documents for every destination, in destination order.
    pub fn documents(&self, destinations: &[(DocKind, PathBuf)]) -> MineResult<Vec<Document>> {
        destinations
            .iter()
            .map(|(kind, path)| {
                Ok(Document {
                    path: path.clone(),
                    bytes: self.render(*kind)?,
                })
            })
            .collect()
    }
}

/// Open, configure, analyze, then emit or display.
pub fn run(request: &MineRequest, mode: OutputMode) -> MineResult<Analysis> {
    let repo = GitRepo::open(&request.repository)?;

    let mut config = MinerConfig::load(request.config_file.as_deref(), repo.root())?;
    request.overrides.apply(&mut config);
    config.validate()?;

    let range = HistoryRange {
        since: request.since,
        until: request.until,
        first_parent: config.first_parent,
        ..HistoryRange::branch(&request.branch)
    };
    if let (Some(since), Some(until)) = (range.since, range.until)
        && since > until
    {
        return Err(MineError::Config("--since is later than --until".to_string()));
    }
    let destinations = request.outputs.destinations(request.miner)?;

    info!(
        repository = %request.repository.display(),
        branch = %range.branch,
        "mining started"
    );
    let analysis = analyze(&repo, &range, &config)?;

    if !destinations.is_empty() {
        let documents = analysis.documents(&destinations)?;
        emit::write_all(&documents)?;
    } else {
        match mode {
            OutputMode::Table { top } => analysis.print_tables(request.miner, top),
            OutputMode::Json => {
                let mut stdout = std::io::stdout().lock();
                for kind in request.miner.documents() {
                    let bytes = analysis.render(*kind)?;
                    stdout.write_all(&bytes).map_err(|source| MineError::OutputWrite {
                        path: PathBuf::from("<stdout>"),
                        source,
                    })?;
                }
            }
            OutputMode::Quiet => {}
        }
    }

    info!(
        commits = analysis.history.commits,
        files = analysis.ownership.files.len(),
        authors = analysis.history.authors.len(),
        documents = destinations.len(),
        "mining finished"
    );
    Ok(analysis)
}

#[cfg(test)]
#[path = "pipeline_test.rs"]
mod tests;
