//! # git-vendor Library
//!
//! This library attaches dependencies ("vendors") to a project under its
//! `vendor/` directory and detaches them again. It is designed to be used by
//! the `git-vendor` command-line tool but can also be embedded in other
//! tools that manage vendored source trees.
//!
//! ## Quick Example
//!
//! ```
//! use std::sync::Arc;
//! use git_vendor::git::SystemGit;
//! use git_vendor::project::{LocalProject, PlainProject};
//!
//! let temp = tempfile::TempDir::new().unwrap();
//! let git = Arc::new(SystemGit::new());
//!
//! let app = PlainProject::new(temp.path().join("app"), git.clone());
//! let dep_dir = temp.path().join("dep");
//! std::fs::create_dir_all(&dep_dir).unwrap();
//! std::fs::write(dep_dir.join("lib.rs"), "pub fn f() {}").unwrap();
//! let dep = PlainProject::new(&dep_dir, git);
//!
//! // A project without a vendor directory has no vendors
//! assert!(app.vendors().unwrap().is_empty());
//!
//! let vendor = app.add_vendor("example.com/dep", &dep).unwrap();
//! assert!(vendor.base_dir().join("lib.rs").exists());
//!
//! app.remove_vendor("example.com/dep").unwrap();
//! assert!(app.vendors().unwrap().is_empty());
//! ```
//!
//! ## Core Concepts
//!
//! - **Projects (`project`)**: the capability traits every project variant
//!   implements, the plain (no version control) project, and the vendor
//!   registry derived from the `vendor/` tree.
//! - **Git projects (`git_project`)**: local working trees and remote
//!   repositories. A git host attaches fetchable dependencies as submodules,
//!   pinned to the dependency's current revision, and rolls the submodule back
//!   when pinning fails.
//! - **Git adapter (`git`)**: the `GitOperations` trait and its `SystemGit`
//!   implementation, the only place the `git` executable is run.
//! - **Filesystem (`filesystem`)**: import-path layout, staged copies and
//!   pruning of empty directories.
//!
//! ## Execution Model
//!
//! Everything is synchronous and single-threaded: each operation runs at most
//! one external process at a time and waits for it. The tool assumes it has
//! exclusive access to the project tree while a command runs.

pub mod defaults;
pub mod error;
pub mod exec;
pub mod filesystem;
pub mod git;
pub mod git_project;
pub mod output;
pub mod project;

#[cfg(test)]
mod import_path_proptest;
#[cfg(test)]
mod mock_git;
