//! # Git Adapter
//!
//! Every version-control action the library takes goes through the
//! [`GitOperations`] trait. [`SystemGit`] implements it by running the `git`
//! executable, which means SSH keys, credential helpers and anything else in
//! the user's git configuration apply unchanged.
//!
//! The trait is the seam used by tests: project logic is exercised against an
//! in-memory implementation, while `SystemGit` is covered by the integration
//! tests under `tests/`.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;

use crate::defaults::{DEFAULT_GIT_PROGRAM, GIT_MODULES_DIR};
use crate::error::{Error, Result};
use crate::exec::{self, display_command, CommandOutput};

/// Name of the remote preferred when several fetch remotes are configured.
pub const PREFERRED_REMOTE: &str = "origin";

/// Logical git operations needed to attach and detach vendors.
///
/// Every method runs in an explicit working directory. Failures carry the
/// command and directory (see [`Error::GitCommand`]).
pub trait GitOperations: Send + Sync {
    /// Clone `remote_uri` into `target_dir`.
    fn clone_repo(&self, remote_uri: &str, target_dir: &Path) -> Result<()>;

    /// Register `remote_uri` as a submodule of `repo_dir` at `target_path`
    /// (relative to `repo_dir`) and check it out.
    fn add_submodule(&self, repo_dir: &Path, remote_uri: &str, target_path: &Path) -> Result<()>;

    /// Deinitialise the submodule at `target_path`, untrack it and delete its
    /// metadata under `.git/modules`. Stops at the first failing step.
    fn remove_submodule(&self, repo_dir: &Path, target_path: &Path) -> Result<()>;

    /// Check out `reference` in the working tree at `repo_dir`.
    fn checkout(&self, repo_dir: &Path, reference: &str) -> Result<()>;

    /// The fetch URI of the repository at `repo_dir`.
    ///
    /// Returns [`Error::NoRemote`] when no remote is configured.
    fn remote_uri(&self, repo_dir: &Path) -> Result<String>;

    /// The commit currently checked out at `repo_dir`.
    fn current_commit(&self, repo_dir: &Path) -> Result<String>;

    /// The root of the repository containing `dir`.
    ///
    /// Returns [`Error::NotAGitRepository`] when `dir` is not inside one.
    fn root_dir(&self, dir: &Path) -> Result<PathBuf>;

    /// Create an empty repository at `repo_dir`.
    fn init_repo(&self, repo_dir: &Path) -> Result<()>;

    /// Copy submodule settings from `.gitmodules` into the local config.
    fn init_submodules(&self, repo_dir: &Path) -> Result<()>;

    /// Check out the recorded commit of every initialised submodule.
    fn update_submodules(&self, repo_dir: &Path) -> Result<()>;
}

/// [`GitOperations`] backed by the `git` executable.
#[derive(Debug, Clone)]
pub struct SystemGit {
    program: String,
}

impl Default for SystemGit {
    fn default() -> Self {
        Self::new()
    }
}

impl SystemGit {
    /// Use `git` from `PATH`.
    pub fn new() -> Self {
        Self::with_program(DEFAULT_GIT_PROGRAM)
    }

    /// Use a specific git executable.
    pub fn with_program(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// The executable this adapter runs.
    pub fn program(&self) -> &str {
        &self.program
    }

    fn output(&self, dir: Option<&Path>, args: &[&str]) -> Result<CommandOutput> {
        exec::run(dir, &self.program, args)
    }

    /// Run and fail on a non-zero exit.
    fn checked(&self, dir: &Path, args: &[&str]) -> Result<CommandOutput> {
        let command = display_command(&self.program, args);
        self.output(Some(dir), args)?.into_result(&command, dir)
    }
}

fn path_arg(path: &Path) -> Result<&str> {
    path.to_str().ok_or_else(|| {
        Error::Io(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("path is not valid UTF-8: {}", path.display()),
        ))
    })
}

impl GitOperations for SystemGit {
    fn clone_repo(&self, remote_uri: &str, target_dir: &Path) -> Result<()> {
        // Create parent directory if it doesn't exist
        let parent = match target_dir.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        fs::create_dir_all(&parent)?;

        let target = path_arg(target_dir)?;
        self.checked(&parent, &["clone", remote_uri, target])?;
        Ok(())
    }

    fn add_submodule(&self, repo_dir: &Path, remote_uri: &str, target_path: &Path) -> Result<()> {
        let target = path_arg(target_path)?;
        // Local paths are legitimate sources for a vendor, so the file
        // transport is allowed for this one command.
        self.checked(
            repo_dir,
            &[
                "-c",
                "protocol.file.allow=always",
                "submodule",
                "add",
                "-f",
                remote_uri,
                target,
            ],
        )?;
        Ok(())
    }

    fn remove_submodule(&self, repo_dir: &Path, target_path: &Path) -> Result<()> {
        let target = path_arg(target_path)?;
        self.checked(repo_dir, &["submodule", "deinit", "-f", target])?;
        self.checked(repo_dir, &["rm", "-rf", target])?;

        let modules = repo_dir.join(GIT_MODULES_DIR).join(target_path);
        match fs::remove_dir_all(&modules) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    fn checkout(&self, repo_dir: &Path, reference: &str) -> Result<()> {
        self.checked(repo_dir, &["checkout", reference])?;
        Ok(())
    }

    fn remote_uri(&self, repo_dir: &Path) -> Result<String> {
        let output = self.checked(repo_dir, &["remote", "-v"])?;
        parse_remote_uri(&output.stdout, repo_dir)
    }

    fn current_commit(&self, repo_dir: &Path) -> Result<String> {
        let output = self.checked(repo_dir, &["rev-parse", "--verify", "HEAD"])?;
        Ok(output.stdout_trimmed().to_string())
    }

    fn root_dir(&self, dir: &Path) -> Result<PathBuf> {
        let args = ["rev-parse", "--show-toplevel"];
        let output = self.output(Some(dir), &args)?;
        if !output.success && is_not_a_repository(&output.stderr) {
            return Err(Error::NotAGitRepository {
                path: dir.to_path_buf(),
            });
        }
        let output = output.into_result(&display_command(&self.program, &args), dir)?;
        Ok(PathBuf::from(output.stdout_trimmed()))
    }

    fn init_repo(&self, repo_dir: &Path) -> Result<()> {
        fs::create_dir_all(repo_dir)?;
        self.checked(repo_dir, &["init"])?;
        Ok(())
    }

    fn init_submodules(&self, repo_dir: &Path) -> Result<()> {
        self.checked(repo_dir, &["submodule", "init"])?;
        Ok(())
    }

    fn update_submodules(&self, repo_dir: &Path) -> Result<()> {
        self.checked(
            repo_dir,
            &["-c", "protocol.file.allow=always", "submodule", "update"],
        )?;
        Ok(())
    }
}

/// Git prints "fatal: not a git repository" (capitalised in older releases).
fn is_not_a_repository(stderr: &str) -> bool {
    stderr.to_lowercase().contains("not a git repository")
}

/// One `<name> <uri> (fetch)` line of `git remote -v`.
static FETCH_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^(\S+)\s+(\S+) \(fetch\)").expect("fetch line pattern is valid")
});

/// Extract the fetch URI from `git remote -v` output.
///
/// Empty output means no remote is configured. When several remotes are
/// listed, `origin` wins; otherwise the first fetch line is used.
pub fn parse_remote_uri(output: &str, repo_dir: &Path) -> Result<String> {
    if output.trim().is_empty() {
        return Err(Error::NoRemote {
            dir: repo_dir.to_path_buf(),
        });
    }

    let mut first = None;
    for captures in FETCH_LINE.captures_iter(output) {
        let name = &captures[1];
        let uri = captures[2].to_string();
        if name == PREFERRED_REMOTE {
            return Ok(uri);
        }
        first.get_or_insert(uri);
    }

    first.ok_or_else(|| Error::RemoteParse {
        dir: repo_dir.to_path_buf(),
        output: output.to_string(),
    })
}
