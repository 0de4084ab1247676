//! # Version-Controlled Projects
//!
//! `GitProject` is a project backed by a git working tree; `RemoteGitProject`
//! is a repository known only by its URI. When a git project gains a vendor,
//! the dependency is attached as a submodule whenever it can be fetched from
//! a remote:
//!
//! 1. A remote dependency is added as a submodule directly.
//! 2. A local dependency with a remote is added as a submodule of that remote
//!    and then checked out at the dependency's current revision, so the vendor
//!    is pinned to what the dependency has, not to the remote's default
//!    branch.
//! 3. Anything else is copied.
//!
//! An attach is all-or-nothing: if anything fails after the submodule was
//! added, the submodule is removed again before the error is returned, and
//! the same happens if the thread panics.

use std::cell::OnceCell;
use std::fmt;
use std::path::{Path, PathBuf};

use log::{debug, info, warn};

use crate::defaults::{modules_vendor_root, DEFAULT_BRANCH, VENDOR_DIR};
use crate::error::{Error, Result};
use crate::filesystem::{
    import_path_to_relative, install_copy, prune_empty_dirs, relative_vendor_path,
    validate_import_path, vendor_path,
};
use crate::project::{
    ensure_vacant, remove_vendor_tree, scan_vendors, take_vendor, LocalGit, LocalProject,
    PlainProject, Project, ProjectKind, RemoteGit, SharedGit, Vendor, Vendors,
};

/// A git repository identified by a fetchable URI.
#[derive(Clone)]
pub struct RemoteGitProject {
    uri: String,
    git: SharedGit,
}

impl fmt::Debug for RemoteGitProject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RemoteGitProject")
            .field("uri", &self.uri)
            .finish_non_exhaustive()
    }
}

impl RemoteGitProject {
    pub fn new(uri: impl Into<String>, git: SharedGit) -> Self {
        Self {
            uri: uri.into(),
            git,
        }
    }
}

impl Project for RemoteGitProject {
    /// Clone into `destination`.
    fn install(&self, destination: &Path) -> Result<Box<dyn LocalProject>> {
        self.git.clone_repo(&self.uri, destination)?;
        let project = GitProject::from_path(destination, destination, self.git.clone())?;
        Ok(Box::new(project))
    }

    fn as_remote_git(&self) -> Option<&dyn RemoteGit> {
        Some(self)
    }
}

impl RemoteGit for RemoteGitProject {
    fn git_uri(&self) -> &str {
        &self.uri
    }
}

/// A project backed by a git working tree.
///
/// The reference and the remote are looked up once and cached for the
/// lifetime of the handle.
pub struct GitProject {
    base_dir: PathBuf,
    git: SharedGit,
    reference: OnceCell<String>,
    /// Unset: not looked up yet. `Some(None)`: no remote configured.
    remote: OnceCell<Option<RemoteGitProject>>,
}

impl fmt::Debug for GitProject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GitProject")
            .field("base_dir", &self.base_dir)
            .field("reference", &self.reference.get())
            .finish_non_exhaustive()
    }
}

impl GitProject {
    /// Open the repository containing `path`.
    ///
    /// Fails with `NotAGitRepository` when there is none, or when its root is
    /// shorter than `root_path`, meaning the repository found encloses the
    /// expected boundary instead of starting at it.
    pub fn from_path(path: &Path, root_path: &Path, git: SharedGit) -> Result<Self> {
        let base_dir = git.root_dir(path)?;
        if base_dir.as_os_str().len() < root_path.as_os_str().len() {
            debug!(
                "{} belongs to the repository at {}",
                path.display(),
                base_dir.display()
            );
            return Err(Error::NotAGitRepository {
                path: path.to_path_buf(),
            });
        }
        Ok(Self {
            base_dir,
            git,
            reference: OnceCell::new(),
            remote: OnceCell::new(),
        })
    }

    /// Initialise and update every submodule, restoring vendors recorded in
    /// `.gitmodules` but missing from the working tree.
    pub fn sync_submodules(&self) -> Result<()> {
        self.git.init_submodules(&self.base_dir)?;
        self.git.update_submodules(&self.base_dir)?;
        info!("synced submodules in {}", self.base_dir.display());
        Ok(())
    }

    fn open_vendor(&self, path: &Path) -> Result<Box<dyn LocalProject>> {
        Ok(Box::new(GitProject::from_path(path, path, self.git.clone())?))
    }

    /// Add `uri` as a submodule at `target`, optionally pin it to
    /// `reference`, and open it. Rolls the submodule back on any failure
    /// after it was added.
    fn attach_submodule(
        &self,
        uri: &str,
        reference: Option<&str>,
        target: &VendorLocation,
    ) -> Result<Box<dyn LocalProject>> {
        self.git.add_submodule(&self.base_dir, uri, &target.relative)?;
        let rollback = SubmoduleRollback::new(self, target);

        if let Some(reference) = reference {
            self.git.checkout(&target.absolute, reference)?;
        }
        let installed = self.open_vendor(&target.absolute)?;

        rollback.disarm();
        Ok(installed)
    }
}

impl Project for GitProject {
    /// Copy the working tree, without git metadata.
    fn install(&self, destination: &Path) -> Result<Box<dyn LocalProject>> {
        install_copy(&self.base_dir, destination)?;
        Ok(Box::new(PlainProject::new(destination, self.git.clone())))
    }

    fn as_local_git(&self) -> Option<&dyn LocalGit> {
        Some(self)
    }
}

impl LocalGit for GitProject {
    fn reference(&self) -> Result<String> {
        if let Some(reference) = self.reference.get() {
            return Ok(reference.clone());
        }
        let reference = if self.base_dir.as_os_str().is_empty() {
            DEFAULT_BRANCH.to_string()
        } else {
            self.git.current_commit(&self.base_dir)?
        };
        Ok(self.reference.get_or_init(|| reference).clone())
    }

    fn remote(&self) -> Result<Option<RemoteGitProject>> {
        if let Some(remote) = self.remote.get() {
            return Ok(remote.clone());
        }
        let remote = match self.git.remote_uri(&self.base_dir) {
            Ok(uri) => Some(RemoteGitProject::new(uri, self.git.clone())),
            Err(e) if e.is_no_remote() => None,
            Err(e) => return Err(e),
        };
        Ok(self.remote.get_or_init(|| remote).clone())
    }
}

impl LocalProject for GitProject {
    fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    fn kind(&self) -> ProjectKind {
        ProjectKind::Git
    }

    fn vendors(&self) -> Result<Vendors> {
        scan_vendors(&self.base_dir, &self.git)
    }

    /// Attach as a submodule when the dependency can be fetched, otherwise
    /// copy it.
    fn add_vendor(&self, import_path: &str, project: &dyn Project) -> Result<Vendor> {
        validate_import_path(import_path)?;
        ensure_vacant(&self.vendors()?, &self.base_dir, import_path)?;

        let target = VendorLocation::new(&self.base_dir, import_path);
        let installed = match ATTACH_STRATEGIES
            .iter()
            .find_map(|attach| attach(self, &target, project))
        {
            Some(attached) => attached?,
            None => {
                let installed = project.install(&target.absolute)?;
                info!("vendored {} by copy", import_path);
                installed
            }
        };
        Ok(Vendor::new(import_path, &self.base_dir, installed))
    }

    fn remove_vendor(&self, import_path: &str) -> Result<()> {
        validate_import_path(import_path)?;
        let mut vendor = take_vendor(&mut self.vendors()?, import_path)?;

        if vendor.project().as_local_git().is_some() {
            let location = VendorLocation::new(&self.base_dir, import_path);
            self.git.remove_submodule(&self.base_dir, &location.relative)?;
            prune_empty_dirs(&location.modules, &modules_vendor_root(&self.base_dir))?;
            prune_empty_dirs(&location.absolute, &self.base_dir.join(VENDOR_DIR))?;
        } else {
            remove_vendor_tree(&self.base_dir, &vendor)?;
        }

        vendor.detach();
        info!("removed vendor {}", import_path);
        Ok(())
    }
}

/// Where a vendor lives: relative to the host, absolute, and where git keeps
/// its submodule metadata.
struct VendorLocation {
    relative: PathBuf,
    absolute: PathBuf,
    modules: PathBuf,
}

impl VendorLocation {
    fn new(base_dir: &Path, import_path: &str) -> Self {
        Self {
            relative: relative_vendor_path(import_path),
            absolute: vendor_path(base_dir, import_path),
            modules: modules_vendor_root(base_dir).join(import_path_to_relative(import_path)),
        }
    }
}

/// One way of attaching a dependency. Returns `None` when the dependency
/// lacks the capability this step needs, letting the next step try.
type AttachStep =
    fn(&GitProject, &VendorLocation, &dyn Project) -> Option<Result<Box<dyn LocalProject>>>;

/// Tried in order; the first step that applies decides the outcome.
const ATTACH_STRATEGIES: &[AttachStep] = &[attach_remote, attach_pinned];

fn attach_remote(
    host: &GitProject,
    target: &VendorLocation,
    project: &dyn Project,
) -> Option<Result<Box<dyn LocalProject>>> {
    let remote = project.as_remote_git()?;
    info!("vendoring {} as submodule", remote.git_uri());
    Some(host.attach_submodule(remote.git_uri(), None, target))
}

fn attach_pinned(
    host: &GitProject,
    target: &VendorLocation,
    project: &dyn Project,
) -> Option<Result<Box<dyn LocalProject>>> {
    let local = project.as_local_git()?;
    let remote = match local.remote() {
        Ok(Some(remote)) => remote,
        Ok(None) => return None,
        Err(e) => return Some(Err(e)),
    };
    let reference = match local.reference() {
        Ok(reference) => reference,
        Err(e) => return Some(Err(e)),
    };
    info!(
        "vendoring {} as submodule pinned at {}",
        remote.git_uri(),
        reference
    );
    Some(host.attach_submodule(remote.git_uri(), Some(&reference), target))
}

/// Removes a freshly added submodule when dropped while still armed, which
/// covers both early returns and unwinding.
struct SubmoduleRollback<'a> {
    host: &'a GitProject,
    target: &'a VendorLocation,
    armed: bool,
}

impl<'a> SubmoduleRollback<'a> {
    fn new(host: &'a GitProject, target: &'a VendorLocation) -> Self {
        Self {
            host,
            target,
            armed: true,
        }
    }

    fn disarm(mut self) {
        self.armed = false;
    }
}

impl Drop for SubmoduleRollback<'_> {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        let base_dir = &self.host.base_dir;
        info!("rolling back submodule {}", self.target.relative.display());
        if let Err(e) = self.host.git.remove_submodule(base_dir, &self.target.relative) {
            warn!(
                "failed to roll back submodule {}: {}",
                self.target.relative.display(),
                e
            );
            return;
        }
        let modules_root = modules_vendor_root(base_dir);
        let pruned = prune_empty_dirs(&self.target.absolute, &base_dir.join(VENDOR_DIR))
            .and_then(|()| prune_empty_dirs(&self.target.modules, &modules_root));
        if let Err(e) = pruned {
            warn!("failed to prune after rollback: {}", e);
        }
    }
}

/// A directory opened as whichever kind of project it is.
pub(crate) enum DirProject {
    Git(GitProject),
    Plain(PlainProject),
}

impl DirProject {
    /// A git project when `path` is the root of its own repository, a plain
    /// project otherwise.
    pub(crate) fn open(path: &Path, git: SharedGit) -> Result<Self> {
        match GitProject::from_path(path, path, git.clone()) {
            Ok(project) => Ok(Self::Git(project)),
            Err(e) if e.is_not_a_repository() => Ok(Self::Plain(PlainProject::new(path, git))),
            Err(e) => Err(e),
        }
    }

    pub(crate) fn into_local(self) -> Box<dyn LocalProject> {
        match self {
            Self::Git(project) => Box::new(project),
            Self::Plain(project) => Box::new(project),
        }
    }

    fn into_project(self) -> Box<dyn Project> {
        match self {
            Self::Git(project) => Box::new(project),
            Self::Plain(project) => Box::new(project),
        }
    }
}

/// Open the project rooted at `path`, see [`DirProject::open`].
pub fn open_local(path: &Path, git: SharedGit) -> Result<Box<dyn LocalProject>> {
    Ok(DirProject::open(&path.canonicalize()?, git)?.into_local())
}

/// Open a dependency source: an existing directory is opened like
/// [`open_local`], anything else is taken as a remote URI.
pub fn open_source(source: &str, git: SharedGit) -> Result<Box<dyn Project>> {
    let path = Path::new(source);
    if !path.is_dir() {
        return Ok(Box::new(RemoteGitProject::new(source, git)));
    }
    Ok(DirProject::open(&path.canonicalize()?, git)?.into_project())
}
