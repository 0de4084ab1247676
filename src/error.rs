//! # Error Handling
//!
//! This module defines the error type shared by every part of the
//! `git-vendor` library. It uses `thiserror` to derive a single `Error` enum
//! whose variants map onto the failure kinds callers need to tell apart:
//!
//! - **Registry errors**: `DuplicateVendor` and `UnknownVendor` are raised by
//!   attach and detach when the import path is already taken or absent. An
//!   import path nested inside, or enclosing, a registered vendor is an
//!   `InvalidImportPath`, and a copy with nothing at its top level is an
//!   `EmptySourceRoot`, since neither could be found again by a scan.
//! - **Repository discovery**: `NotAGitRepository` is raised when no git root
//!   contains a path, or when the root found lies above the expected boundary.
//! - **Remote lookup**: `NoRemote` signals that a repository has no fetchable
//!   remote configured. Project code turns it into a `None` remote rather than
//!   a failure.
//! - **Adapter failures**: `GitCommand`, `RemoteParse` and `Spawn` carry the
//!   operation and working directory so the message is actionable on its own.
//!
//! The `Result` alias is used throughout the library.

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for git-vendor operations
#[derive(Error, Debug)]
pub enum Error {
    /// A vendor is already registered under this import path.
    #[error("Vendor already exists: {import_path}")]
    DuplicateVendor { import_path: String },

    /// No vendor is registered under this import path.
    #[error("Unknown vendor: {import_path}")]
    UnknownVendor { import_path: String },

    /// The import path cannot be used as a location under `vendor/`.
    #[error("Invalid import path '{import_path}': {reason}")]
    InvalidImportPath { import_path: String, reason: String },

    /// The path is not inside a dedicated git repository.
    #[error("Not a git repository: {}", path.display())]
    NotAGitRepository { path: PathBuf },

    /// The repository has no fetchable remote configured.
    #[error("No remote found for {}", dir.display())]
    NoRemote { dir: PathBuf },

    /// A git command exited with a non-zero status.
    #[error("Git command failed in {}: {command} - {stderr}", dir.display())]
    GitCommand {
        command: String,
        dir: PathBuf,
        stderr: String,
    },

    /// `git remote -v` printed something that is not a remote listing.
    #[error("Could not extract remote URL from {}: {output:?}", dir.display())]
    RemoteParse { dir: PathBuf, output: String },

    /// The external command could not be started at all.
    #[error("Failed to run {command}: {message}")]
    Spawn { command: String, message: String },

    /// An I/O error, wrapped from `std::io::Error`.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A directory walk error, wrapped from `walkdir::Error`.
    #[error("Directory walk error: {0}")]
    Walk(#[from] walkdir::Error),

    /// A copied tree has nothing at its top level that marks it as a vendor
    /// root, so the registry scan would not find it.
    #[error(
        "Nothing to vendor at the top of {}: it needs a file or a .git entry",
        path.display()
    )]
    EmptySourceRoot { path: PathBuf },
}

impl Error {
    /// Returns true for the "not a git repository" condition.
    pub fn is_not_a_repository(&self) -> bool {
        matches!(self, Error::NotAGitRepository { .. })
    }

    /// Returns true when a repository simply has no remote configured.
    pub fn is_no_remote(&self) -> bool {
        matches!(self, Error::NoRemote { .. })
    }
}

/// A convenient type alias for `Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;
