//! reffinder CLI - asset dependency and reference trees from the command line.
//!
//! reffinder indexes every asset under a project root (assets carry their
//! GUID in a `.meta` sidecar) and shows what an asset uses or what uses it.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use tracing_subscriber::EnvFilter;

mod cli;

/// reffinder: find what an asset depends on and what references it.
#[derive(Parser)]
#[command(name = "reffinder")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Project root directory (defaults to current directory)
    #[arg(short, long, global = true)]
    root: Option<PathBuf>,

    /// Verbose output (can be repeated: -v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

/// Options shared by the tree commands.
#[derive(clap::Args)]
struct TreeArgs {
    /// Assets or folders to start from (paths relative to the root)
    #[arg(required = true)]
    paths: Vec<String>,

    /// Show the cached state without re-scanning visited assets
    #[arg(long)]
    no_refresh: bool,

    /// Print the tree as JSON
    #[arg(long)]
    json: bool,

    /// Use ASCII connectors instead of Unicode
    #[arg(long)]
    ascii: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the dependency index (or load it from cache)
    Index {
        /// Rebuild from scratch even if the cache is valid
        #[arg(long)]
        rebuild: bool,
    },

    /// Show what the selected assets depend on
    Deps(TreeArgs),

    /// Show what references the selected assets
    Refs(TreeArgs),

    /// Show a tree in the direction given, or the configured default
    Tree {
        /// Direction to walk
        #[arg(short, long, value_enum)]
        direction: Option<DirectionArg>,

        #[command(flatten)]
        args: TreeArgs,
    },

    /// Detect circular dependencies
    Cycles,

    /// Show index statistics
    Stats,
}

#[derive(Clone, Copy, ValueEnum)]
enum DirectionArg {
    Dependencies,
    References,
}

impl From<DirectionArg> for reffinder::Direction {
    fn from(arg: DirectionArg) -> Self {
        match arg {
            DirectionArg::Dependencies => Self::Dependencies,
            DirectionArg::References => Self::References,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    let filter = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    // Determine project root
    let root = match cli.root {
        Some(r) => r,
        None => match std::env::current_dir() {
            Ok(dir) => dir,
            Err(e) => {
                eprintln!(
                    "{}: failed to get current directory: {e}",
                    "error".red().bold()
                );
                return ExitCode::FAILURE;
            }
        },
    };

    let config = match reffinder::Config::load(&root) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}: {e}", "error".red().bold());
            return ExitCode::FAILURE;
        }
    };

    let result = match cli.command {
        Commands::Index { rebuild } => cli::index::run(&root, config, rebuild),
        Commands::Deps(args) => {
            cli::tree::run(&root, config, &args.into(), reffinder::Direction::Dependencies)
        }
        Commands::Refs(args) => {
            cli::tree::run(&root, config, &args.into(), reffinder::Direction::References)
        }
        Commands::Tree { direction, args } => {
            let direction = direction.map_or(config.direction, Into::into);
            cli::tree::run(&root, config, &args.into(), direction)
        }
        Commands::Cycles => cli::cycles::run(&root, config),
        Commands::Stats => cli::stats::run(&root, config),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}: {e}", "error".red().bold());
            // Show cause chain for nested errors
            let mut source = std::error::Error::source(&e);
            while let Some(cause) = source {
                eprintln!("  {}: {cause}", "caused by".dimmed());
                source = std::error::Error::source(cause);
            }
            ExitCode::FAILURE
        }
    }
}

impl From<TreeArgs> for cli::tree::TreeOptions {
    fn from(args: TreeArgs) -> Self {
        Self {
            paths: args.paths,
            no_refresh: args.no_refresh,
            json: args.json,
            ascii: args.ascii,
        }
    }
}
