//! CLI argument parsing and command dispatch

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};

use git_vendor::defaults::{default_project_dir, DEFAULT_GIT_PROGRAM};
use git_vendor::git::SystemGit;
use git_vendor::output::{ColorChoice, OutputConfig};
use git_vendor::project::SharedGit;

use crate::commands;

/// git-vendor - Vendor dependencies as pinned git submodules or plain copies
#[derive(Parser, Debug)]
#[command(name = "git-vendor")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Project directory to operate on (defaults to the current directory)
    #[arg(
        short = 'C',
        long,
        global = true,
        value_name = "DIR",
        env = "GIT_VENDOR_PROJECT_DIR"
    )]
    project_dir: Option<PathBuf>,

    /// Git executable to run
    #[arg(long, global = true, value_name = "PATH", env = "GIT_VENDOR_GIT", default_value = DEFAULT_GIT_PROGRAM)]
    git: String,

    /// Colorize output
    #[arg(long, global = true, value_name = "WHEN", value_enum, default_value_t = ColorChoice::Auto)]
    color: ColorChoice,

    /// Set log level (error, warn, info, debug, trace)
    #[arg(long, global = true, value_name = "LEVEL", default_value = "warn")]
    log_level: String,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List the vendors of the project
    Ls(commands::ls::LsArgs),
    /// Vendor a dependency under vendor/<IMPORT_PATH>
    Add(commands::add::AddArgs),
    /// Remove a vendored dependency
    Remove(commands::remove::RemoveArgs),
    /// Initialise and update vendored submodules
    Sync(commands::sync::SyncArgs),
    /// Generate shell completion scripts
    Completions(commands::completions::CompletionsArgs),
}

/// Settings shared by every command.
pub struct Context {
    pub project_dir: PathBuf,
    pub git: SharedGit,
    pub output: OutputConfig,
}

impl Cli {
    /// Execute the CLI command
    pub fn execute(self) -> Result<()> {
        init_logging(&self.log_level);

        let context = Context {
            project_dir: self.project_dir.unwrap_or_else(default_project_dir),
            git: Arc::new(SystemGit::with_program(self.git)),
            output: OutputConfig::new(self.color),
        };

        match self.command {
            Commands::Ls(args) => commands::ls::execute(args, &context),
            Commands::Add(args) => commands::add::execute(args, &context),
            Commands::Remove(args) => commands::remove::execute(args, &context),
            Commands::Sync(args) => commands::sync::execute(args, &context),
            Commands::Completions(args) => commands::completions::execute(args),
        }
    }
}

/// `RUST_LOG` takes precedence over `--log-level`.
fn init_logging(level: &str) {
    let env = env_logger::Env::default().default_filter_or(level);
    // A logger may already be installed when embedded in tests
    let _ = env_logger::Builder::from_env(env)
        .format_timestamp(None)
        .try_init();
}
