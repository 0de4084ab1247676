//! # Completions Command Implementation
//!
//! Prints a completion script for `git-vendor` on stdout. The script covers
//! the subcommands (`ls`, `add`, `remove`, `sync`) and the global flags;
//! import paths and sources are free-form and are not completed.
//!
//! ```bash
//! git-vendor completions bash > ~/.local/share/bash-completion/completions/git-vendor
//! git-vendor completions zsh > ~/.zfunc/_git-vendor
//! git-vendor completions fish > ~/.config/fish/completions/git-vendor.fish
//! ```
//!
//! Global flags are usually set once per shell instead of completed on every
//! call: `GIT_VENDOR_PROJECT_DIR` stands in for `-C` and `GIT_VENDOR_GIT` for
//! `--git`.

use std::io::{self, Write};

use anyhow::{Context as _, Result};
use clap::{Args, CommandFactory};
use clap_complete::{generate, Shell};

use crate::cli::Cli;

/// Name the scripts register completions for.
const BIN_NAME: &str = "git-vendor";

/// Generate shell completion scripts
#[derive(Args, Debug)]
pub struct CompletionsArgs {
    /// Shell to generate the script for
    #[arg(value_enum)]
    pub shell: Shell,
}

/// Execute the `completions` command.
pub fn execute(args: CompletionsArgs) -> Result<()> {
    let mut stdout = io::stdout().lock();
    generate(args.shell, &mut Cli::command(), BIN_NAME, &mut stdout);
    stdout
        .flush()
        .context("Failed to write completion script")
}
