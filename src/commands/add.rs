//! # Add Command Implementation
//!
//! This module implements the `add` subcommand, which vendors a dependency
//! under `vendor/<IMPORT_PATH>`.
//!
//! ## Sources
//!
//! - **Local directory**: a git working tree with a remote is attached as a
//!   submodule pinned to its current commit; any other directory is copied.
//! - **Anything else**: taken as a git URI and attached as a submodule (or
//!   cloned, when the project itself is not under git).

use anyhow::{Context as _, Result};
use clap::Args;

use git_vendor::git_project::{open_local, open_source};
use git_vendor::project::LocalProject;

use crate::cli::Context;

/// Vendor a dependency under vendor/<IMPORT_PATH>
#[derive(Args, Debug)]
pub struct AddArgs {
    /// Import path of the vendor, e.g. github.com/acme/lib
    #[arg(value_name = "IMPORT_PATH")]
    pub import_path: String,

    /// Local directory or git URI to vendor
    #[arg(value_name = "SOURCE")]
    pub source: String,
}

/// Execute the `add` command.
pub fn execute(args: AddArgs, context: &Context) -> Result<()> {
    let project = open_local(&context.project_dir, context.git.clone()).with_context(|| {
        format!(
            "Failed to open project at {}",
            context.project_dir.display()
        )
    })?;
    let source = open_source(&args.source, context.git.clone())
        .with_context(|| format!("Failed to open source {}", args.source))?;

    let vendor = project
        .add_vendor(&args.import_path, source.as_ref())
        .with_context(|| format!("Failed to vendor {}", args.import_path))?;

    println!(
        "{} Vendored {} ({}) at {}",
        context.output.done(),
        vendor.import_path(),
        context.output.kind(vendor.kind()),
        vendor.base_dir().display()
    );
    Ok(())
}
