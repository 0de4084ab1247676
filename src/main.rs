//! # git-vendor CLI
//!
//! This is the binary entry point for the `git-vendor` command-line tool.
//!
//! Its responsibilities are parsing arguments with `clap`, setting up logging
//! and dispatching to the command implementations. Vendoring logic lives in
//! the `git_vendor` library crate; the binary is a thin wrapper around it.

mod cli;
mod commands;

use anyhow::Result;
use clap::Parser;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    cli.execute()
}
