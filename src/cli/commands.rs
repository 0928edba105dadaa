use std::path::PathBuf;

use anyhow::Result;
use clap::{ArgGroup, Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::cli::{indexeddb, sessions};
use crate::indexeddb::UnavailableBackend;
use crate::output::OutputFormat;

#[derive(Parser)]
#[command(name = "artifact-extractor")]
#[command(version)]
#[command(
    about = "Extract browser IndexedDB stores and Claude Code session logs to JSON",
    long_about = None
)]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Discover and extract Chromium IndexedDB stores
    Indexeddb(IndexeddbArgs),
    /// Discover, parse and copy Claude Code session logs
    Sessions {
        #[command(subcommand)]
        command: SessionsCommand,
    },
}

#[derive(Args, Debug)]
#[command(group(
    ArgGroup::new("mode").required(true).args(["list_profiles", "list", "path", "all"])
))]
pub struct IndexeddbArgs {
    /// Browser user-data root (defaults to the platform's Chrome directory)
    #[arg(long, value_name = "DIR")]
    pub chrome_path: Option<PathBuf>,

    /// Only look at this profile, e.g. "Default" or "Profile 2"
    #[arg(long, value_name = "NAME")]
    pub profile: Option<String>,

    /// List profiles with their number of IndexedDB origins
    #[arg(long)]
    pub list_profiles: bool,

    /// List discovered origins and their databases
    #[arg(long)]
    pub list: bool,

    /// Extract one origin directory given by path
    #[arg(long, value_name = "DIR")]
    pub path: Option<PathBuf>,

    /// Extract every discovered origin
    #[arg(long)]
    pub all: bool,

    /// Copy each store to a temporary directory before reading it
    #[arg(long)]
    pub safe_copy: bool,

    /// Parent directory for safe copies
    #[arg(long, value_name = "DIR", requires = "safe_copy")]
    pub temp_dir: Option<PathBuf>,

    /// Include records marked as deleted
    #[arg(long)]
    pub include_deleted: bool,

    /// Indent JSON output
    #[arg(long)]
    pub pretty: bool,

    /// Write JSON to this file instead of stdout
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum SessionsCommand {
    /// List session log files
    List(SessionSelection),
    /// Parse session logs into transcripts
    Extract(ExtractSessionsArgs),
    /// Copy raw session logs into one directory
    Copy(CopySessionsArgs),
}

#[derive(Args, Debug, Clone, Default)]
pub struct SessionSelection {
    /// Claude directory (defaults to ~/.claude)
    #[arg(long, value_name = "DIR")]
    pub claude_dir: Option<PathBuf>,

    /// Only sessions of this project path, e.g. /Users/me/app
    #[arg(long, value_name = "PATH")]
    pub project: Option<String>,
}

#[derive(Args, Debug)]
pub struct ExtractSessionsArgs {
    #[command(flatten)]
    pub selection: SessionSelection,

    /// Parse a single session file
    #[arg(long, value_name = "FILE", conflicts_with = "project")]
    pub file: Option<PathBuf>,

    /// Only sessions whose id contains this text; sub-agents follow their parent
    #[arg(long, value_name = "ID", conflicts_with = "file")]
    pub session: Option<String>,

    #[arg(long, value_enum, default_value_t)]
    pub format: OutputFormat,

    /// Write output to this file instead of stdout
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct CopySessionsArgs {
    #[command(flatten)]
    pub selection: SessionSelection,

    /// Destination directory
    #[arg(short, long, value_name = "DIR")]
    pub output: PathBuf,
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match &cli.command {
        Some(Commands::Indexeddb(args)) => {
            indexeddb::run(args, &UnavailableBackend)?;
        }
        Some(Commands::Sessions { command }) => match command {
            SessionsCommand::List(selection) => sessions::list(selection)?,
            SessionsCommand::Extract(args) => sessions::extract(args)?,
            SessionsCommand::Copy(args) => sessions::copy(args)?,
        },
        None => {
            println!("Use --help for usage information");
        }
    }

    Ok(())
}

/// Diagnostics go to stderr; `RUST_LOG` overrides the `-v` level
fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("artifact_extractor={}", level)));
    // Ignore the error when a subscriber is already installed
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
