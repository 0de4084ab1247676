//! # Ls Command Implementation
//!
//! This module implements the `ls` subcommand, which lists the vendors of a
//! project by scanning its `vendor/` directory. Git vendors also show the
//! revision they have checked out.
//!
//! This command is read-only.

use anyhow::{Context as _, Result};
use clap::Args;
use serde::Serialize;

use git_vendor::git_project::open_local;
use git_vendor::project::{LocalGit, LocalProject, Project, ProjectKind, Vendors};

use crate::cli::Context;

/// List the vendors of the project
#[derive(Args, Debug)]
pub struct LsArgs {
    /// Output in JSON format
    #[arg(long)]
    pub json: bool,
}

/// One row of the listing.
#[derive(Debug, Serialize)]
struct VendorEntry {
    import_path: String,
    kind: ProjectKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    reference: Option<String>,
}

fn entries(vendors: &Vendors) -> Result<Vec<VendorEntry>> {
    vendors
        .values()
        .map(|vendor| {
            let reference = vendor
                .project()
                .as_local_git()
                .map(|git| git.reference())
                .transpose()
                .with_context(|| format!("Failed to resolve revision of {}", vendor.import_path()))?;
            Ok(VendorEntry {
                import_path: vendor.import_path().to_string(),
                kind: vendor.kind(),
                reference,
            })
        })
        .collect()
}

/// Execute the `ls` command.
pub fn execute(args: LsArgs, context: &Context) -> Result<()> {
    let project = open_local(&context.project_dir, context.git.clone()).with_context(|| {
        format!(
            "Failed to open project at {}",
            context.project_dir.display()
        )
    })?;
    let vendors = project.vendors().context("Failed to scan vendors")?;
    let entries = entries(&vendors)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    if entries.is_empty() {
        println!("No vendors in {}", project.base_dir().display());
        return Ok(());
    }

    let width = entries
        .iter()
        .map(|e| e.import_path.len())
        .max()
        .unwrap_or(0);
    for entry in &entries {
        let kind = context.output.kind(entry.kind);
        match &entry.reference {
            Some(reference) => println!("{:width$}  {}  {}", entry.import_path, kind, reference),
            None => println!("{:width$}  {}", entry.import_path, kind),
        }
    }
    println!("\n{} vendor(s)", entries.len());
    Ok(())
}
