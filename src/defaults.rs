//! Default values for git-vendor.
//!
//! This module provides the fixed names and fallbacks shared by the
//! library and the CLI, so the on-disk layout is defined in one place.

use std::path::{Path, PathBuf};

/// Directory, relative to a project's base directory, holding its vendors.
pub const VENDOR_DIR: &str = "vendor";

/// Directory, relative to a repository root, where git keeps submodule
/// repositories.
pub const GIT_MODULES_DIR: &str = ".git/modules";

/// Reference reported for a project that has no base directory to resolve
/// against. This is a placeholder, not a resolved revision.
pub const DEFAULT_BRANCH: &str = "master";

/// The git executable used when none is configured.
pub const DEFAULT_GIT_PROGRAM: &str = "git";

/// Returns the default project directory: the current working directory,
/// or `.` if it cannot be determined.
pub fn default_project_dir() -> PathBuf {
    std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
}

/// Returns `<base>/.git/modules/vendor`, the submodule metadata root that
/// mirrors the working-tree `vendor` directory.
pub fn modules_vendor_root(base: &Path) -> PathBuf {
    base.join(GIT_MODULES_DIR).join(VENDOR_DIR)
}
