//! Ingest - file subtype classification
//!
//! Decides, from path rules alone, which subtype profile each input file
//! belongs to before any content is parsed.

use anyhow::Result;
use clap::{Parser, Subcommand};
use ingest_logging::LogConfig;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::error;

mod cli;

#[derive(Parser, Debug)]
#[command(name = "ingest", about = "Classify input files into subtypes by path rules")]
struct Cli {
    /// Enable verbose logging (info/debug to stderr)
    #[arg(short = 'v', long, global = true)]
    verbose: bool,

    /// Subtype configuration file (default: ~/.ingest/subtypes.toml)
    #[arg(short = 'c', long, global = true, env = "INGEST_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the subtype of each file
    Classify {
        /// Files to classify
        #[arg(required = true)]
        paths: Vec<PathBuf>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Walk a directory and classify every file in it
    Scan {
        /// Directory to scan
        path: PathBuf,

        /// Maximum directory depth to scan
        #[arg(short, long)]
        depth: Option<usize>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Try an ad-hoc rule against one path
    Check {
        /// Regex for the file's base name
        #[arg(short, long)]
        name: Option<String>,

        /// Directory rule, e.g. "!ROOT!/data/!DIRS!/exports"
        #[arg(short, long)]
        directories: Option<String>,

        /// Path to test
        path: PathBuf,
    },

    /// List configured subtypes
    Subtypes {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = ingest_logging::init_logging(LogConfig {
        app_name: "ingest",
        verbose: cli.verbose,
    }) {
        eprintln!("Warning: failed to initialize logging: {:#}", e);
    }

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{:#}", e);
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = cli.config;
    match cli.command {
        Commands::Classify { paths, json } => cli::classify::run(cli::classify::ClassifyArgs {
            config,
            paths,
            json,
        }),
        Commands::Scan { path, depth, json } => cli::scan::run(cli::scan::ScanArgs {
            config,
            path,
            depth,
            json,
        }),
        Commands::Check {
            name,
            directories,
            path,
        } => cli::check::run(cli::check::CheckArgs {
            name,
            directories,
            path,
        }),
        Commands::Subtypes { json } => cli::subtypes::run(config, json),
    }
}
