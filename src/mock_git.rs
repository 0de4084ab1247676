//! In-memory [`GitOperations`] for unit tests.
//!
//! Repositories are tracked in a table keyed by root directory, while the
//! directories themselves are created on disk so vendor scanning sees the
//! same layout real git would leave behind.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::defaults::GIT_MODULES_DIR;
use crate::error::{Error, Result};
use crate::git::GitOperations;

#[derive(Debug, Clone)]
struct MockRepo {
    head: String,
    remote: Option<String>,
}

#[derive(Debug, Clone)]
struct MockRemote {
    commits: Vec<String>,
}

#[derive(Debug, Default)]
struct MockState {
    repos: HashMap<PathBuf, MockRepo>,
    remotes: HashMap<String, MockRemote>,
    calls: Vec<String>,
    fail_remote_lookup: bool,
    panic_on_checkout: bool,
}

#[derive(Debug, Default)]
pub struct MockGit {
    state: Mutex<MockState>,
}

fn command_error(command: &str, dir: &Path, stderr: &str) -> Error {
    Error::GitCommand {
        command: command.to_string(),
        dir: dir.to_path_buf(),
        stderr: stderr.to_string(),
    }
}

impl MockGit {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a repository on disk at `root` with `head` checked out.
    pub fn add_repo(&self, root: &Path, head: &str, remote: Option<&str>) {
        fs::create_dir_all(root.join(".git")).unwrap();
        fs::write(root.join("README.md"), format!("{}\n", head)).unwrap();
        self.state.lock().unwrap().repos.insert(
            root.to_path_buf(),
            MockRepo {
                head: head.to_string(),
                remote: remote.map(str::to_string),
            },
        );
    }

    /// Publish a remote whose default branch points at the last commit.
    pub fn add_remote(&self, uri: &str, commits: &[&str]) {
        self.state.lock().unwrap().remotes.insert(
            uri.to_string(),
            MockRemote {
                commits: commits.iter().map(|c| c.to_string()).collect(),
            },
        );
    }

    pub fn set_fail_remote_lookup(&self, fail: bool) {
        self.state.lock().unwrap().fail_remote_lookup = fail;
    }

    pub fn set_panic_on_checkout(&self, panic: bool) {
        self.state.lock().unwrap().panic_on_checkout = panic;
    }

    pub fn head(&self, root: &Path) -> Option<String> {
        let state = self.state.lock().unwrap();
        state.repos.get(root).map(|r| r.head.clone())
    }

    pub fn is_repo(&self, root: &Path) -> bool {
        self.state.lock().unwrap().repos.contains_key(root)
    }

    pub fn calls(&self) -> Vec<String> {
        self.state.lock().unwrap().calls.clone()
    }

    /// Number of recorded calls to operation `name`.
    pub fn count(&self, name: &str) -> usize {
        self.calls().iter().filter(|c| c.as_str() == name).count()
    }

    fn record(&self, name: &str) {
        self.state.lock().unwrap().calls.push(name.to_string());
    }

    /// Check out the remote's default branch into `root`.
    fn materialise(&self, uri: &str, root: &Path, command: &str) -> Result<()> {
        let head = {
            let state = self.state.lock().unwrap();
            let remote = state.remotes.get(uri).ok_or_else(|| {
                command_error(command, root, "fatal: repository not found")
            })?;
            remote.commits.last().cloned().unwrap_or_default()
        };
        fs::create_dir_all(root)?;
        fs::write(root.join(".git"), "gitdir: mock\n")?;
        fs::write(root.join("README.md"), format!("{}\n", head))?;
        self.state.lock().unwrap().repos.insert(
            root.to_path_buf(),
            MockRepo {
                head,
                remote: Some(uri.to_string()),
            },
        );
        Ok(())
    }
}

impl GitOperations for MockGit {
    fn clone_repo(&self, remote_uri: &str, target_dir: &Path) -> Result<()> {
        self.record("clone_repo");
        self.materialise(remote_uri, target_dir, "git clone")
    }

    fn add_submodule(&self, repo_dir: &Path, remote_uri: &str, target_path: &Path) -> Result<()> {
        self.record("add_submodule");
        let target = repo_dir.join(target_path);
        self.materialise(remote_uri, &target, "git submodule add")?;
        let modules = repo_dir.join(GIT_MODULES_DIR).join(target_path);
        fs::create_dir_all(&modules)?;
        fs::write(modules.join("HEAD"), "mock\n")?;
        Ok(())
    }

    fn remove_submodule(&self, repo_dir: &Path, target_path: &Path) -> Result<()> {
        self.record("remove_submodule");
        let target = repo_dir.join(target_path);
        self.state.lock().unwrap().repos.remove(&target);
        if target.exists() {
            fs::remove_dir_all(&target)?;
        }
        let modules = repo_dir.join(GIT_MODULES_DIR).join(target_path);
        if modules.exists() {
            fs::remove_dir_all(&modules)?;
        }
        Ok(())
    }

    fn checkout(&self, repo_dir: &Path, reference: &str) -> Result<()> {
        self.record("checkout");
        let mut state = self.state.lock().unwrap();
        if state.panic_on_checkout {
            drop(state);
            panic!("checkout interrupted");
        }
        let uri = state
            .repos
            .get(repo_dir)
            .and_then(|r| r.remote.clone())
            .unwrap_or_default();
        let known = state
            .remotes
            .get(&uri)
            .is_some_and(|r| r.commits.iter().any(|c| c == reference));
        if !known {
            return Err(command_error(
                "git checkout",
                repo_dir,
                "fatal: reference is not a tree",
            ));
        }
        if let Some(repo) = state.repos.get_mut(repo_dir) {
            repo.head = reference.to_string();
        }
        Ok(())
    }

    fn remote_uri(&self, repo_dir: &Path) -> Result<String> {
        self.record("remote_uri");
        let state = self.state.lock().unwrap();
        if state.fail_remote_lookup {
            return Err(command_error("git remote -v", repo_dir, "fatal: broken config"));
        }
        let repo = state
            .repos
            .get(repo_dir)
            .ok_or_else(|| Error::NotAGitRepository {
                path: repo_dir.to_path_buf(),
            })?;
        repo.remote.clone().ok_or_else(|| Error::NoRemote {
            dir: repo_dir.to_path_buf(),
        })
    }

    fn current_commit(&self, repo_dir: &Path) -> Result<String> {
        self.record("current_commit");
        self.head(repo_dir)
            .ok_or_else(|| command_error("git rev-parse", repo_dir, "fatal: bad revision"))
    }

    fn root_dir(&self, dir: &Path) -> Result<PathBuf> {
        self.record("root_dir");
        let state = self.state.lock().unwrap();
        state
            .repos
            .keys()
            .filter(|root| dir.starts_with(root))
            .max_by_key(|root| root.as_os_str().len())
            .cloned()
            .ok_or_else(|| Error::NotAGitRepository {
                path: dir.to_path_buf(),
            })
    }

    fn init_repo(&self, repo_dir: &Path) -> Result<()> {
        self.record("init_repo");
        fs::create_dir_all(repo_dir.join(".git"))?;
        self.state.lock().unwrap().repos.insert(
            repo_dir.to_path_buf(),
            MockRepo {
                head: String::new(),
                remote: None,
            },
        );
        Ok(())
    }

    fn init_submodules(&self, _repo_dir: &Path) -> Result<()> {
        self.record("init_submodules");
        Ok(())
    }

    fn update_submodules(&self, _repo_dir: &Path) -> Result<()> {
        self.record("update_submodules");
        Ok(())
    }
}
