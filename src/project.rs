//! # Projects and Vendors
//!
//! A project is a directory tree that can hold vendored dependencies under
//! `vendor/<import-path>`, or a source that can be installed into one.
//!
//! ## Capabilities
//!
//! The traits in this module describe what a project can do rather than what
//! it is:
//!
//! - **`Project`**: can be installed at a destination path. Every project has
//!   this capability.
//! - **`LocalProject`**: lives on disk, so it has a base directory and a vendor
//!   registry that can be listed, extended and pruned.
//! - **`RemoteGit`**: exposes a fetchable git URI.
//! - **`LocalGit`**: exposes a resolvable revision and, possibly, a remote.
//!
//! `Project::as_remote_git` and `Project::as_local_git` let attach logic ask
//! a dependency for a capability without knowing its concrete type.
//!
//! `PlainProject` is the variant without version control: dependencies are
//! attached by copying and detached by deleting. The version-controlled
//! variants live in [`crate::git_project`].

use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use log::info;
use serde::Serialize;

use crate::defaults::VENDOR_DIR;
use crate::error::{Error, Result};
use crate::filesystem::{
    find_vendor_units, import_path_from_relative, import_paths_nested, install_copy,
    prune_empty_dirs, validate_import_path, vendor_path,
};
use crate::git::GitOperations;
use crate::git_project::{DirProject, RemoteGitProject};

/// Git adapter shared by a project and every project it hands out.
pub type SharedGit = Arc<dyn GitOperations>;

/// Vendor registry: import path to vendor, ordered by import path.
pub type Vendors = BTreeMap<String, Vendor>;

/// How a local project is tracked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectKind {
    Plain,
    Git,
}

impl fmt::Display for ProjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProjectKind::Plain => write!(f, "plain"),
            ProjectKind::Git => write!(f, "git"),
        }
    }
}

/// Anything that can be materialised at a destination path.
pub trait Project: fmt::Debug {
    /// Materialise this project at `destination` and return a handle to the
    /// installed copy.
    fn install(&self, destination: &Path) -> Result<Box<dyn LocalProject>>;

    /// This project as a fetchable git remote, if it is one.
    fn as_remote_git(&self) -> Option<&dyn RemoteGit> {
        None
    }

    /// This project as a local git working tree, if it is one.
    fn as_local_git(&self) -> Option<&dyn LocalGit> {
        None
    }
}

/// A project rooted at a directory on disk.
pub trait LocalProject: Project {
    /// The project's root directory.
    fn base_dir(&self) -> &Path;

    fn kind(&self) -> ProjectKind;

    /// Scan `vendor/` and return every vendored project.
    ///
    /// A project with no `vendor` directory has no vendors.
    fn vendors(&self) -> Result<Vendors>;

    /// Attach `project` under `vendor/<import_path>`.
    fn add_vendor(&self, import_path: &str, project: &dyn Project) -> Result<Vendor>;

    /// Detach the vendor at `import_path` and prune directories it leaves
    /// empty.
    fn remove_vendor(&self, import_path: &str) -> Result<()>;
}

/// A git repository reachable by URI.
pub trait RemoteGit: Project {
    fn git_uri(&self) -> &str;
}

/// A git working tree on disk.
pub trait LocalGit: LocalProject {
    /// The checked-out revision, usable with `git checkout`.
    fn reference(&self) -> Result<String>;

    /// The repository as seen from its remote, or `None` when no remote is
    /// configured.
    fn remote(&self) -> Result<Option<RemoteGitProject>>;
}

/// A project installed inside another project's `vendor/` tree.
#[derive(Debug)]
pub struct Vendor {
    import_path: String,
    /// Base directory of the project this vendor is attached to.
    parent: Option<PathBuf>,
    project: Box<dyn LocalProject>,
}

impl Vendor {
    pub(crate) fn new(import_path: &str, parent: &Path, project: Box<dyn LocalProject>) -> Self {
        Self {
            import_path: import_path.to_string(),
            parent: Some(parent.to_path_buf()),
            project,
        }
    }

    pub fn import_path(&self) -> &str {
        &self.import_path
    }

    /// Base directory of the owning project, or `None` once detached.
    pub fn parent(&self) -> Option<&Path> {
        self.parent.as_deref()
    }

    /// The installed dependency.
    pub fn project(&self) -> &dyn LocalProject {
        self.project.as_ref()
    }

    pub fn base_dir(&self) -> &Path {
        self.project.base_dir()
    }

    pub fn kind(&self) -> ProjectKind {
        self.project.kind()
    }

    pub(crate) fn detach(&mut self) {
        self.parent = None;
    }
}

/// Build the vendor registry of the project rooted at `base_dir`.
///
/// A unit with a `.git` entry is opened as a git project when it is its own
/// repository root; everything else is a plain project.
pub fn scan_vendors(base_dir: &Path, git: &SharedGit) -> Result<Vendors> {
    let vendor_root = base_dir.join(VENDOR_DIR);
    let mut vendors = Vendors::new();

    for unit in find_vendor_units(&vendor_root)? {
        let relative = unit
            .strip_prefix(&vendor_root)
            .map_err(|e| std::io::Error::other(e.to_string()))?;
        let import_path = import_path_from_relative(relative);

        let project: Box<dyn LocalProject> = if unit.join(".git").exists() {
            DirProject::open(&unit, git.clone())?.into_local()
        } else {
            Box::new(PlainProject::new(unit.clone(), git.clone()))
        };

        vendors.insert(import_path.clone(), Vendor::new(&import_path, base_dir, project));
    }
    Ok(vendors)
}

/// Check that `import_path` can be attached under `base_dir`.
///
/// Fails with `DuplicateVendor` when it is registered or something already
/// occupies `vendor/<import_path>`, and with `InvalidImportPath` when it lies
/// inside or around a registered vendor.
pub(crate) fn ensure_vacant(vendors: &Vendors, base_dir: &Path, import_path: &str) -> Result<()> {
    let duplicate = || Error::DuplicateVendor {
        import_path: import_path.to_string(),
    };
    if vendors.contains_key(import_path) {
        return Err(duplicate());
    }
    if let Some(existing) = vendors
        .keys()
        .find(|existing| import_paths_nested(existing, import_path))
    {
        return Err(Error::InvalidImportPath {
            import_path: import_path.to_string(),
            reason: format!("overlaps vendor '{}'", existing),
        });
    }
    if vendor_path(base_dir, import_path).symlink_metadata().is_ok() {
        return Err(duplicate());
    }
    Ok(())
}

/// Take `import_path` out of the registry, failing with `UnknownVendor`.
pub(crate) fn take_vendor(vendors: &mut Vendors, import_path: &str) -> Result<Vendor> {
    vendors.remove(import_path).ok_or_else(|| Error::UnknownVendor {
        import_path: import_path.to_string(),
    })
}

/// Delete a vendor's installed tree and prune the empty directories above
/// it, up to `vendor/`.
pub(crate) fn remove_vendor_tree(base_dir: &Path, vendor: &Vendor) -> Result<()> {
    fs::remove_dir_all(vendor.base_dir())?;
    prune_empty_dirs(
        &vendor_path(base_dir, vendor.import_path()),
        &base_dir.join(VENDOR_DIR),
    )
}

/// A project directory without version control.
#[derive(Clone)]
pub struct PlainProject {
    base_dir: PathBuf,
    git: SharedGit,
}

impl fmt::Debug for PlainProject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlainProject")
            .field("base_dir", &self.base_dir)
            .finish_non_exhaustive()
    }
}

impl PlainProject {
    /// `git` is used to classify vendors found under this project.
    pub fn new(base_dir: impl Into<PathBuf>, git: SharedGit) -> Self {
        Self {
            base_dir: base_dir.into(),
            git,
        }
    }
}

impl Project for PlainProject {
    fn install(&self, destination: &Path) -> Result<Box<dyn LocalProject>> {
        install_copy(&self.base_dir, destination)?;
        Ok(Box::new(PlainProject::new(destination, self.git.clone())))
    }
}

impl LocalProject for PlainProject {
    fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    fn kind(&self) -> ProjectKind {
        ProjectKind::Plain
    }

    fn vendors(&self) -> Result<Vendors> {
        scan_vendors(&self.base_dir, &self.git)
    }

    fn add_vendor(&self, import_path: &str, project: &dyn Project) -> Result<Vendor> {
        validate_import_path(import_path)?;
        ensure_vacant(&self.vendors()?, &self.base_dir, import_path)?;

        let destination = vendor_path(&self.base_dir, import_path);
        let installed = project.install(&destination)?;
        info!("vendored {} by copy", import_path);
        Ok(Vendor::new(import_path, &self.base_dir, installed))
    }

    fn remove_vendor(&self, import_path: &str) -> Result<()> {
        validate_import_path(import_path)?;
        let mut vendor = take_vendor(&mut self.vendors()?, import_path)?;

        remove_vendor_tree(&self.base_dir, &vendor)?;
        vendor.detach();
        info!("removed vendor {}", import_path);
        Ok(())
    }
}
