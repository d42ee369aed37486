//! Scratch directory owned by a single subsetting run.
//!
//! [`StagingDir`] is an RAII guard: the directory is removed when the guard
//! is dropped, whichever way the run ends. [`StagingDir::close`] removes it
//! eagerly and reports failures; [`StagingDir::keep`] disarms the guard.

use std::fs;
use std::io;
use std::path::Path;
use std::path::PathBuf;

use walkdir::WalkDir;

use crate::Result;

/// RAII guard for the staging directory.
#[derive(Debug)]
pub struct StagingDir {
    path: PathBuf,
    armed: bool,
}

impl StagingDir {
    /// Removes any leftover tree at `path` and creates it empty.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the leftover tree cannot be removed or the
    /// directory cannot be created.
    pub fn prepare<P: Into<PathBuf>>(path: P) -> Result<Self> {
        let path = path.into();
        if fs::symlink_metadata(&path).is_ok() {
            log::debug!("removing stale staging tree {}", path.display());
            remove_tree(&path)?;
        }
        fs::create_dir_all(&path)?;
        Ok(Self { path, armed: true })
    }

    /// Path of the staging directory.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Removes the staging tree now.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if any part of the tree cannot be removed.
    pub fn close(mut self) -> Result<()> {
        self.armed = false;
        remove_tree(&self.path)
    }

    /// Leaves the staging tree on disk and returns its path.
    #[must_use]
    pub fn keep(mut self) -> PathBuf {
        self.armed = false;
        std::mem::take(&mut self.path)
    }
}

impl Drop for StagingDir {
    fn drop(&mut self) {
        if self.armed
            && let Err(e) = remove_tree(&self.path)
        {
            log::warn!(
                "failed to remove staging directory {}: {e}",
                self.path.display()
            );
        }
    }
}

/// Removes a file or directory tree, deepest entries first.
///
/// Symlinks are removed, never followed. A path that does not exist is not
/// an error.
///
/// # Errors
///
/// Returns an I/O error if an entry cannot be removed.
pub fn remove_tree(path: &Path) -> Result<()> {
    let metadata = match fs::symlink_metadata(path) {
        Ok(m) => m,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(()),
        Err(e) => return Err(e.into()),
    };
    if !metadata.is_dir() {
        fs::remove_file(path)?;
        return Ok(());
    }

    for entry in WalkDir::new(path).follow_links(false).contents_first(true) {
        let entry = entry.map_err(io::Error::from)?;
        if entry.file_type().is_dir() {
            fs::remove_dir(entry.path())?;
        } else {
            fs::remove_file(entry.path())?;
        }
    }
    Ok(())
}
