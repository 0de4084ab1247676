//! # Remove Command Implementation
//!
//! This module implements the `remove` subcommand. Submodule vendors are
//! deinitialised and untracked; copied vendors are deleted. Directories left
//! empty under `vendor/` (and `.git/modules/vendor/`) are pruned.

use anyhow::{Context as _, Result};
use clap::Args;

use git_vendor::git_project::open_local;
use git_vendor::project::LocalProject;

use crate::cli::Context;

/// Remove a vendored dependency
#[derive(Args, Debug)]
pub struct RemoveArgs {
    /// Import path of the vendor to remove
    #[arg(value_name = "IMPORT_PATH")]
    pub import_path: String,
}

/// Execute the `remove` command.
pub fn execute(args: RemoveArgs, context: &Context) -> Result<()> {
    let project = open_local(&context.project_dir, context.git.clone()).with_context(|| {
        format!(
            "Failed to open project at {}",
            context.project_dir.display()
        )
    })?;
    project
        .remove_vendor(&args.import_path)
        .with_context(|| format!("Failed to remove {}", args.import_path))?;

    println!("{} Removed {}", context.output.done(), args.import_path);
    Ok(())
}
