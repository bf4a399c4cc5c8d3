//! Artifact file I/O.

use std::{
    fs::{create_dir_all, read, write},
    path::{Path, PathBuf},
};

use anyhow::{Context, Result, bail};
use glob::glob;

/// A build input or output on disk.
#[derive(Debug, Clone)]
pub struct Artifact {
    path: PathBuf,
}

impl Artifact {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Fail with a missing-input error unless the file exists.
    pub fn require(&self) -> Result<()> {
        if !self.path.is_file() {
            bail!("Missing input: {} not found", self.path.display());
        }
        Ok(())
    }

    pub fn read(&self) -> Result<Vec<u8>> {
        read(&self.path).with_context(|| format!("Failed to read {}", self.path.display()))
    }

    /// Write `data`, creating the parent directory first.
    pub fn write(&self, data: impl AsRef<[u8]>) -> Result<()> {
        self.ensure_parent_dir()?;
        write(&self.path, data).with_context(|| format!("Failed to write {}", self.path.display()))
    }

    pub fn ensure_parent_dir(&self) -> Result<()> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }
        Ok(())
    }
}

pub fn glob_files(dir: &Path, pattern: &str) -> Result<Vec<PathBuf>> {
    let pattern = dir.join(pattern);
    let pattern_str = pattern.to_str().context("Invalid pattern path")?;
    Ok(glob(pattern_str)
        .with_context(|| format!("Failed to glob pattern: {pattern_str}"))?
        .filter_map(Result::ok)
        .collect())
}

/// Fail with a missing-input error unless `dir` holds at least one file matching `pattern`.
pub fn require_files(dir: &Path, pattern: &str) -> Result<usize> {
    if !dir.is_dir() {
        bail!("Missing input: directory {} not found", dir.display());
    }
    let count = glob_files(dir, pattern)?.len();
    if count == 0 {
        bail!("Missing input: no {pattern} files in {}", dir.display());
    }
    Ok(count)
}
