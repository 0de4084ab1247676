//! On-disk helpers for vendored trees.
//!
//! Covers the layout of `vendor/<import-path>`, recursive copies used by the
//! plain install path, and pruning of directories left empty after a vendor
//! is removed.

use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

use log::debug;
use walkdir::WalkDir;

use crate::defaults::VENDOR_DIR;
use crate::error::{Error, Result};

/// Name of git's metadata entry, never copied by a plain install.
const GIT_ENTRY: &str = ".git";

/// Prefix of the staging directories used by [`install_copy`].
const STAGING_PREFIX: &str = ".git-vendor-";

/// Check that an import path is a relative, `/`-separated path with no empty,
/// `.` or `..` segments.
pub fn validate_import_path(import_path: &str) -> Result<()> {
    let invalid = |reason: &str| Error::InvalidImportPath {
        import_path: import_path.to_string(),
        reason: reason.to_string(),
    };

    if import_path.is_empty() {
        return Err(invalid("import path is empty"));
    }
    if import_path.starts_with('/') || import_path.contains('\\') {
        return Err(invalid("import path must be relative and use '/'"));
    }
    for segment in import_path.split('/') {
        match segment {
            "" => return Err(invalid("import path has an empty segment")),
            "." | ".." => return Err(invalid("import path may not contain '.' or '..'")),
            _ => {}
        }
    }
    Ok(())
}

/// True when one import path lies strictly inside the other.
pub fn import_paths_nested(a: &str, b: &str) -> bool {
    let inside = |outer: &str, inner: &str| {
        inner
            .strip_prefix(outer)
            .is_some_and(|rest| rest.starts_with('/'))
    };
    inside(a, b) || inside(b, a)
}

/// An import path as a relative filesystem path.
pub fn import_path_to_relative(import_path: &str) -> PathBuf {
    import_path.split('/').collect()
}

/// `vendor/<import-path>`, relative to a project's base directory.
pub fn relative_vendor_path(import_path: &str) -> PathBuf {
    Path::new(VENDOR_DIR).join(import_path_to_relative(import_path))
}

/// `<base>/vendor/<import-path>`.
pub fn vendor_path(base: &Path, import_path: &str) -> PathBuf {
    base.join(relative_vendor_path(import_path))
}

/// Convert a path relative to a vendor root back into an import path.
pub fn import_path_from_relative(relative: &Path) -> String {
    relative
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

/// Recursively copy `src` into `dst`, skipping git metadata.
pub fn copy_dir(src: &Path, dst: &Path) -> Result<()> {
    if !src.is_dir() {
        return Err(Error::Io(io::Error::new(
            io::ErrorKind::NotFound,
            format!("source directory not found: {}", src.display()),
        )));
    }
    fs::create_dir_all(dst)?;

    for entry in WalkDir::new(src)
        .min_depth(1)
        .into_iter()
        .filter_entry(|e| e.file_name() != GIT_ENTRY)
    {
        let entry = entry?;
        let relative = entry
            .path()
            .strip_prefix(src)
            .map_err(|e| io::Error::other(e.to_string()))?;
        let target = dst.join(relative);
        let file_type = entry.file_type();

        if file_type.is_dir() {
            fs::create_dir_all(&target)?;
        } else if file_type.is_symlink() {
            copy_symlink(entry.path(), &target)?;
        } else {
            fs::copy(entry.path(), &target)?;
        }
    }
    Ok(())
}

#[cfg(unix)]
fn copy_symlink(src: &Path, dst: &Path) -> Result<()> {
    let link = fs::read_link(src)?;
    std::os::unix::fs::symlink(link, dst)?;
    Ok(())
}

#[cfg(not(unix))]
fn copy_symlink(src: &Path, dst: &Path) -> Result<()> {
    if src.is_dir() {
        copy_dir(src, dst)
    } else {
        fs::copy(src, dst)?;
        Ok(())
    }
}

/// Copy `src` to `dst` through a staging directory beside `dst`.
///
/// The staging copy is renamed into place only once it is complete, so a
/// failed copy leaves no directory at `dst`. Fails if `dst` already exists,
/// and with `EmptySourceRoot` when the copy has no regular file at its top
/// level, since [`find_vendor_units`] would not recognise it as one vendor.
pub fn install_copy(src: &Path, dst: &Path) -> Result<()> {
    if dst.exists() {
        return Err(Error::Io(io::Error::new(
            io::ErrorKind::AlreadyExists,
            format!("destination already exists: {}", dst.display()),
        )));
    }
    let parent = dst.parent().ok_or_else(|| {
        Error::Io(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("destination has no parent: {}", dst.display()),
        ))
    })?;
    fs::create_dir_all(parent)?;

    let staging = tempfile::Builder::new()
        .prefix(STAGING_PREFIX)
        .tempdir_in(parent)?;
    copy_dir(src, staging.path())?;
    if !is_unit(staging.path())? {
        return Err(Error::EmptySourceRoot {
            path: src.to_path_buf(),
        });
    }
    fs::rename(staging.path(), dst)?;
    debug!("copied {} to {}", src.display(), dst.display());
    Ok(())
}

fn is_empty_dir(path: &Path) -> Result<bool> {
    Ok(fs::read_dir(path)?.next().is_none())
}

/// Remove empty directories upward from `leaf`, stopping at the first
/// non-empty one or at `boundary`, which is never removed.
///
/// Missing directories along the way are skipped, so `leaf` may already be
/// gone.
pub fn prune_empty_dirs(leaf: &Path, boundary: &Path) -> Result<()> {
    let mut current = leaf;
    while current != boundary && current.starts_with(boundary) {
        if current.is_dir() {
            if !is_empty_dir(current)? {
                break;
            }
            debug!("removing empty directory {}", current.display());
            fs::remove_dir(current)?;
        } else if current.exists() {
            break;
        }
        match current.parent() {
            Some(parent) => current = parent,
            None => break,
        }
    }
    Ok(())
}

/// Find the vendored units under `vendor_root`.
///
/// A directory is a unit when it holds a `.git` entry or at least one
/// regular file; otherwise its subdirectories are searched. Hidden
/// directories are not descended into. A missing `vendor_root` yields no
/// units.
pub fn find_vendor_units(vendor_root: &Path) -> Result<Vec<PathBuf>> {
    let mut units = Vec::new();
    if !vendor_root.is_dir() {
        return Ok(units);
    }

    let mut subdirs = child_dirs(vendor_root)?;
    while let Some(dir) = subdirs.pop() {
        if is_unit(&dir)? {
            units.push(dir);
        } else {
            subdirs.extend(child_dirs(&dir)?);
        }
    }
    units.sort();
    Ok(units)
}

fn child_dirs(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut dirs = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let hidden = entry.file_name().to_string_lossy().starts_with('.');
        if !hidden && entry.file_type()?.is_dir() {
            dirs.push(entry.path());
        }
    }
    Ok(dirs)
}

fn is_unit(dir: &Path) -> Result<bool> {
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        if entry.file_name() == GIT_ENTRY || entry.file_type()?.is_file() {
            return Ok(true);
        }
    }
    Ok(false)
}
