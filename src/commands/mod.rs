//! # CLI Command Implementations
//!
//! Each subcommand of `git-vendor` lives in its own module with:
//! - An `Args` struct deriving `clap::Args` for its arguments and options.
//! - An `execute` function that performs the command by calling into the
//!   `git_vendor` library.

pub mod add;
pub mod completions;
pub mod ls;
pub mod remove;
pub mod sync;
