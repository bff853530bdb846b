mod authorship;
mod batch;
mod cli;
mod cli_help;
mod config;
mod contributors;
mod emit;
mod error;
mod filter;
mod git;
mod history;
mod knowledge;
mod logging;
mod matrix;
mod ownership;
mod pipeline;
mod report_helpers;
#[cfg(test)]
mod test_support;
mod util;

use std::path::Path;

use clap::{CommandFactory, Parser};

use cli::{Cli, Commands, MineArgs};
use error::MineResult;
use pipeline::{MineRequest, Miner, OutputMode};

fn mine(args: &MineArgs, miner: Miner) -> MineResult<()> {
    let request = args.request(miner)?;
    let mode = if args.json {
        OutputMode::Json
    } else {
        OutputMode::Table { top: args.top }
    };
    pipeline::run(&request, mode)?;
    Ok(())
}

fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let result = match &cli.command {
        Commands::Ownership(args) => mine(args, Miner::Ownership),
        Commands::Knowledge(args) => mine(args, Miner::Knowledge),
        Commands::Authorship(args) => mine(args, Miner::Authorship),
        Commands::Matrix(args) => mine(args, Miner::Matrix),
        Commands::Contributors(args) => mine(args, Miner::Contributors),
        Commands::All(args) => mine(args, Miner::All),
        Commands::Batch {
            repositories,
            branch,
            miner,
            output_dir,
            jobs,
            range,
        } => {
            let mut template = MineRequest::new(Path::new("."), branch, *miner);
            if let Err(err) = range.apply(&mut template) {
                eprintln!("error: {err}");
                std::process::exit(err.exit_code());
            }
            let outcomes = batch::run(repositories, &template, output_dir, *jobs);
            batch::print_summary(&outcomes);
            std::process::exit(batch::exit_code(&outcomes));
        }
        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            clap_complete::generate(*shell, &mut cmd, "lineage", &mut std::io::stdout());
            Ok(())
        }
    };

    if let Err(err) = result {
        eprintln!("error: {err}");
        if err.is_repository_access() {
            eprintln!("hint: check --repository and the branch name");
        }
        std::process::exit(err.exit_code());
    }
}
