//! # Sync Command Implementation
//!
//! This module implements the `sync` subcommand, which runs
//! `git submodule init` and `git submodule update` so every submodule vendor
//! recorded by the project is checked out at its pinned commit. Useful right
//! after cloning a project that vendors through submodules.

use anyhow::{Context as _, Result};
use clap::Args;

use git_vendor::git_project::GitProject;

use crate::cli::Context;

/// Initialise and update vendored submodules
#[derive(Args, Debug)]
pub struct SyncArgs {}

/// Execute the `sync` command.
pub fn execute(_args: SyncArgs, context: &Context) -> Result<()> {
    let dir = context
        .project_dir
        .canonicalize()
        .with_context(|| format!("Project directory not found: {}", context.project_dir.display()))?;
    let project = GitProject::from_path(&dir, &dir, context.git.clone())
        .with_context(|| format!("sync needs a git repository at {}", dir.display()))?;
    project
        .sync_submodules()
        .context("Failed to sync submodules")?;

    println!("{} Submodules synced", context.output.done());
    Ok(())
}
