//! Shared test utilities for integration and E2E tests.
//!
//! This module provides fixtures for building throwaway projects and git
//! repositories, plus a command helper for the `git-vendor` binary.
//!
//! ## Usage
//!
//! Add `mod common;` to your test file, then use the helpers:
//!
//! ```rust,ignore
//! mod common;
//! use common::prelude::*;
//!
//! #[test]
//! fn test_example() {
//!     let fixture = TestFixture::new().with_file("app/main.rs", "fn main() {}");
//!     fixture.command().arg("ls").assert().success();
//! }
//! ```

use assert_fs::prelude::*;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Re-export commonly used test dependencies for convenience.
pub mod prelude {
    #[allow(unused_imports)]
    pub use assert_cmd::cargo::cargo_bin_cmd;
    pub use assert_fs::prelude::*;
    #[allow(unused_imports)]
    pub use assert_fs::TempDir;
    pub use predicates::prelude::*;

    #[allow(unused_imports)]
    pub use super::{git, git_available, head, init_repo, TestFixture};
}

/// Check whether a usable `git` executable is on the PATH.
///
/// Tests that need real git return early when this is `false`.
#[allow(dead_code)]
pub fn git_available() -> bool {
    Command::new("git")
        .arg("--version")
        .output()
        .map(|o| o.status.success())
        .unwrap_or(false)
}

/// Run git in `dir` with a fixed identity and return trimmed stdout.
///
/// Panics when git exits non-zero.
#[allow(dead_code)]
pub fn git(dir: &Path, args: &[&str]) -> String {
    let output = Command::new("git")
        .args([
            "-c",
            "user.name=Vendor Test",
            "-c",
            "user.email=vendor-test@example.com",
            "-c",
            "protocol.file.allow=always",
            "-c",
            "init.defaultBranch=master",
        ])
        .args(args)
        .current_dir(dir)
        .output()
        .expect("Failed to run git");
    assert!(
        output.status.success(),
        "git {:?} failed in {}: {}",
        args,
        dir.display(),
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8_lossy(&output.stdout).trim().to_string()
}

/// Create a repository at `dir` with one commit adding `README.md`.
#[allow(dead_code)]
pub fn init_repo(dir: &Path) -> String {
    std::fs::create_dir_all(dir).expect("Failed to create repository directory");
    git(dir, &["init", "-q"]);
    commit_file(dir, "README.md", "initial\n")
}

/// Write `name` in `dir`, commit it and return the new commit.
#[allow(dead_code)]
pub fn commit_file(dir: &Path, name: &str, content: &str) -> String {
    std::fs::write(dir.join(name), content).expect("Failed to write file");
    git(dir, &["add", name]);
    git(dir, &["commit", "-q", "-m", &format!("update {}", name)]);
    head(dir)
}

/// The commit checked out in `dir`.
#[allow(dead_code)]
pub fn head(dir: &Path) -> String {
    git(dir, &["rev-parse", "HEAD"])
}

/// A temporary directory for building projects under test.
///
/// # Example
///
/// ```rust,ignore
/// let fixture = TestFixture::new()
///     .with_file("dep/lib.rs", "pub fn f() {}");
///
/// fixture
///     .command()
///     .args(["add", "example.com/dep", "dep"])
///     .assert()
///     .success();
/// ```
pub struct TestFixture {
    temp_dir: assert_fs::TempDir,
}

impl TestFixture {
    /// Create a new test fixture with an empty temporary directory.
    pub fn new() -> Self {
        Self {
            temp_dir: assert_fs::TempDir::new().expect("Failed to create temp directory"),
        }
    }

    /// Add a file with the given path and content.
    #[allow(dead_code)]
    pub fn with_file(self, path: &str, content: &str) -> Self {
        self.temp_dir
            .child(path)
            .write_str(content)
            .expect("Failed to write file");
        self
    }

    /// Get the canonical path to the temporary directory.
    ///
    /// Git reports canonical paths, so comparisons use this form.
    pub fn path(&self) -> PathBuf {
        self.temp_dir
            .path()
            .canonicalize()
            .expect("Failed to canonicalize temp directory")
    }

    /// Create a child path in the temp directory.
    #[allow(dead_code)]
    pub fn child(&self, path: &str) -> assert_fs::fixture::ChildPath {
        self.temp_dir.child(path)
    }

    /// Create a command configured to run in this fixture's directory.
    #[allow(dead_code)]
    pub fn command(&self) -> assert_cmd::Command {
        let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("git-vendor");
        cmd.current_dir(self.path())
            .env_remove("GIT_VENDOR_PROJECT_DIR")
            .env_remove("GIT_VENDOR_GIT")
            .env("NO_COLOR", "1")
            .env("GIT_AUTHOR_NAME", "Vendor Test")
            .env("GIT_AUTHOR_EMAIL", "vendor-test@example.com")
            .env("GIT_COMMITTER_NAME", "Vendor Test")
            .env("GIT_COMMITTER_EMAIL", "vendor-test@example.com");
        cmd
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixture_creates_temp_dir() {
        let fixture = TestFixture::new();
        assert!(fixture.path().exists());
    }

    #[test]
    fn test_fixture_with_file() {
        let fixture = TestFixture::new().with_file("nested/test.txt", "hello");
        assert!(fixture.path().join("nested/test.txt").exists());
    }
}
