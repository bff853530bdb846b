/// CLI argument definitions for the `lineage` command.
///
/// One subcommand per miner, plus `batch` and `completions`, using the
/// `clap` derive macros.
use std::collections::BTreeMap;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;

use crate::cli_help;
use crate::error::{MineError, MineResult};
use crate::pipeline::{DocKind, MineRequest, Miner, OutputPlan, Overrides};
use crate::util;

/// Top-level CLI parser with a single subcommand selector.
#[derive(Parser)]
#[command(
    name = "lineage",
    version,
    about = "Mine a Git history for file ownership, developer knowledge and potential authorship"
)]
pub struct Cli {
    /// More diagnostics on stderr (-v info, -vv debug); LINEAGE_LOG overrides
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

/// History slice and model settings shared by every miner.
#[derive(Args, Clone)]
pub struct RangeArgs {
    /// Only consider commits since this time (e.g. 6m, 1y, 30d, or a date)
    #[arg(long)]
    pub since: Option<String>,

    /// Only consider commits up to this time (YYYY-MM-DD includes the
    /// whole day, or RFC 3339); also the knowledge evaluation instant
    #[arg(long)]
    pub until: Option<String>,

    /// Knowledge half-life in days (default: 180, or lineage.toml)
    #[arg(long)]
    pub half_life: Option<f64>,

    /// Walk only the first-parent chain and count merge commits
    #[arg(long)]
    pub first_parent: bool,

    /// Include test files and directories in analysis (excluded by default)
    #[arg(long)]
    pub include_tests: bool,

    /// Configuration file (default: lineage.toml at the repository root)
    #[arg(long)]
    pub config: Option<PathBuf>,
}

/// Arguments of a single-repository run.
#[derive(Args)]
pub struct MineArgs {
    /// Branch, ref or revision to analyze
    #[arg(default_value = "HEAD")]
    pub branch: String,

    /// Repository to analyze (default: current directory)
    #[arg(short, long, default_value = ".")]
    pub repository: PathBuf,

    /// Write every document of this miner into DIR
    #[arg(short, long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Write FilesOwnership to FILE
    #[arg(long, value_name = "FILE")]
    pub files_ownership: Option<PathBuf>,

    /// Write DeveloperKnowledge to FILE
    #[arg(long, value_name = "FILE")]
    pub developer_knowledge: Option<PathBuf>,

    /// Write PotentialAuthorship to FILE
    #[arg(long, value_name = "FILE")]
    pub potential_ownership: Option<PathBuf>,

    /// Write AssignmentMatrix to FILE
    #[arg(long, value_name = "FILE")]
    pub assignment_matrix: Option<PathBuf>,

    #[command(flatten)]
    pub range: RangeArgs,

    /// Print documents as JSON instead of tables
    #[arg(long)]
    pub json: bool,

    /// Show only the top N rows per table (0 = all)
    #[arg(long, default_value = "20")]
    pub top: usize,
}

/// All available subcommands.
#[derive(Subcommand)]
pub enum Commands {
    /// Accumulated line contributions per file and author
    #[command(long_about = cli_help::OWNERSHIP)]
    Ownership(MineArgs),

    /// Time-decayed developer knowledge per file
    #[command(long_about = cli_help::KNOWLEDGE)]
    Knowledge(MineArgs),

    /// Potential authorship of files never touched
    #[command(long_about = cli_help::AUTHORSHIP)]
    Authorship(MineArgs),

    /// User x file assignment matrix with id maps
    #[command(long_about = cli_help::MATRIX)]
    Matrix(MineArgs),

    /// Contributor statistics and suggested roles
    #[command(long_about = cli_help::CONTRIBUTORS)]
    Contributors(MineArgs),

    /// Run every miner
    All(MineArgs),

    /// Mine several repositories in parallel
    #[command(long_about = cli_help::BATCH)]
    Batch {
        /// Repositories to analyze
        #[arg(required = true)]
        repositories: Vec<PathBuf>,

        /// Branch, ref or revision to analyze in every repository
        #[arg(long, default_value = "HEAD")]
        branch: String,

        /// Which documents to write
        #[arg(long, value_enum, default_value = "all")]
        miner: Miner,

        /// Parent directory of the per-repository outputs
        #[arg(short, long, value_name = "DIR")]
        output_dir: PathBuf,

        /// Worker threads (0 = one per CPU)
        #[arg(short, long, default_value = "0")]
        jobs: usize,

        #[command(flatten)]
        range: RangeArgs,
    },

    /// Print a shell completion script to stdout
    Completions {
        /// Target shell
        #[arg(value_enum)]
        shell: Shell,
    },
}

impl RangeArgs {
    /// Fill the range and override fields of `request`.
    pub fn apply(&self, request: &mut MineRequest) -> MineResult<()> {
        let config_err = |e: Box<dyn std::error::Error>| MineError::Config(e.to_string());
        request.since = self
            .since
            .as_deref()
            .map(|s| util::parse_since(s, util::now()))
            .transpose()
            .map_err(config_err)?;
        request.until = self
            .until
            .as_deref()
            .map(util::parse_until)
            .transpose()
            .map_err(config_err)?;
        request.config_file = self.config.clone();
        request.overrides = Overrides {
            half_life_days: self.half_life,
            first_parent: self.first_parent,
            include_tests: self.include_tests,
        };
        Ok(())
    }
}

impl MineArgs {
    pub fn request(&self, miner: Miner) -> MineResult<MineRequest> {
        let mut request = MineRequest::new(&self.repository, &self.branch, miner);
        self.range.apply(&mut request)?;

        let mut files = BTreeMap::new();
        for (kind, path) in [
            (DocKind::FilesOwnership, &self.files_ownership),
            (DocKind::DeveloperKnowledge, &self.developer_knowledge),
            (DocKind::PotentialAuthorship, &self.potential_ownership),
            (DocKind::AssignmentMatrix, &self.assignment_matrix),
        ] {
            if let Some(path) = path {
                files.insert(kind, path.clone());
            }
        }
        request.outputs = OutputPlan {
            dir: self.output_dir.clone(),
            files,
        };
        Ok(request)
    }
}

#[cfg(test)]
#[path = "cli_test.rs"]
mod tests;
