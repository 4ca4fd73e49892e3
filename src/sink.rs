//! Output sinks receiving the (path, content) pairs of a generation run.
//!
//! Paths handed to a sink are relative and `/`-separated. Every sink treats
//! a repeated write of identical content as a no-op and reports divergent
//! content for the same path instead of silently replacing it.

use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use indexmap::IndexMap;
use log::{debug, warn};
use walkdir::WalkDir;

use crate::error::{Error, Result};

/// What a sink did with one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteOutcome {
    Created,
    /// Identical content was already present.
    Unchanged,
    /// Differing content was replaced in force mode.
    Overwritten,
    /// Content was compared against a reference instead of written.
    Compared { matches: bool },
}

impl fmt::Display for WriteOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WriteOutcome::Created => f.write_str("Created"),
            WriteOutcome::Unchanged => f.write_str("Unchanged"),
            WriteOutcome::Overwritten => f.write_str("Overwritten"),
            WriteOutcome::Compared { matches: true } => f.write_str("Matched"),
            WriteOutcome::Compared { matches: false } => f.write_str("Mismatched"),
        }
    }
}

/// Destination for generated files.
pub trait OutputSink: Send + Sync {
    /// Delivers one rendered file.
    ///
    /// # Errors
    /// * `Error::WriteConflict` if different content already exists at `path`
    /// * `Error::IoError` on filesystem failures
    fn write(&self, path: &str, content: &str) -> Result<WriteOutcome>;
}

fn join_relative(root: &Path, path: &str) -> PathBuf {
    path.split('/').fold(root.to_path_buf(), |acc, part| acc.join(part))
}

/// Inverse of [`join_relative`]: the `/`-separated key of `path` below `root`.
fn relative_key(root: &Path, path: &Path) -> Result<String> {
    let relative = path.strip_prefix(root).map_err(io::Error::other)?;
    Ok(relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/"))
}

/// Writes files below a root directory, creating parent directories.
pub struct FileSystemSink {
    root: PathBuf,
    force: bool,
    locks: Mutex<HashMap<PathBuf, Arc<Mutex<()>>>>,
}

impl FileSystemSink {
    /// # Arguments
    /// * `root` - Directory generated paths are relative to
    /// * `force` - Overwrite existing files whose content differs
    pub fn new<P: AsRef<Path>>(root: P, force: bool) -> Self {
        Self { root: root.as_ref().to_path_buf(), force, locks: Mutex::new(HashMap::new()) }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn lock_for(&self, target: &Path) -> Arc<Mutex<()>> {
        let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
        locks.entry(target.to_path_buf()).or_default().clone()
    }
}

impl OutputSink for FileSystemSink {
    fn write(&self, path: &str, content: &str) -> Result<WriteOutcome> {
        let target = join_relative(&self.root, path);

        // One writer per path, so two runs sharing a server never interleave.
        let lock = self.lock_for(&target);
        let _guard = lock.lock().unwrap_or_else(PoisonError::into_inner);

        let outcome = if target.exists() {
            let existing = fs::read(&target)?;
            if existing == content.as_bytes() {
                debug!("Unchanged file: {}", target.display());
                return Ok(WriteOutcome::Unchanged);
            }
            if !self.force {
                return Err(Error::WriteConflict { path: path.to_string() });
            }
            warn!("Overwriting file with different content: {}", target.display());
            WriteOutcome::Overwritten
        } else {
            WriteOutcome::Created
        };

        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)?;
        }
        debug!("Writing file: {}", target.display());
        fs::write(&target, content)?;
        Ok(outcome)
    }
}

/// Collects files in memory, in first-write order.
#[derive(Default)]
pub struct MemorySink {
    files: Mutex<IndexMap<String, String>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything written so far.
    pub fn files(&self) -> IndexMap<String, String> {
        self.files.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }
}

impl OutputSink for MemorySink {
    fn write(&self, path: &str, content: &str) -> Result<WriteOutcome> {
        let mut files = self.files.lock().unwrap_or_else(PoisonError::into_inner);
        match files.get(path) {
            Some(existing) if existing == content => Ok(WriteOutcome::Unchanged),
            Some(_) => Err(Error::WriteConflict { path: path.to_string() }),
            None => {
                files.insert(path.to_string(), content.to_string());
                Ok(WriteOutcome::Created)
            }
        }
    }
}

/// Result of comparing one generated file with its golden reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verification {
    Match,
    Mismatch { expected: String, actual: String },
    /// No golden file exists for the path.
    Missing,
}

/// Compares generated content byte for byte against golden files.
pub struct VerificationSink {
    golden_root: PathBuf,
    results: Mutex<IndexMap<String, Verification>>,
}

impl VerificationSink {
    pub fn new<P: AsRef<Path>>(golden_root: P) -> Self {
        Self { golden_root: golden_root.as_ref().to_path_buf(), results: Mutex::new(IndexMap::new()) }
    }

    /// Per-path results in first-compare order.
    pub fn results(&self) -> IndexMap<String, Verification> {
        self.results.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    pub fn all_match(&self) -> bool {
        self.results().values().all(|v| *v == Verification::Match)
    }

    /// Paths whose content differs from, or has no, golden reference.
    pub fn mismatches(&self) -> Vec<String> {
        self.results()
            .into_iter()
            .filter(|(_, v)| *v != Verification::Match)
            .map(|(path, _)| path)
            .collect()
    }

    /// Golden files that no write has been compared against.
    ///
    /// # Errors
    /// * `Error::IoError` if the golden tree cannot be walked
    pub fn unvisited(&self) -> Result<Vec<String>> {
        let results = self.results();
        let mut unvisited = Vec::new();
        for entry in WalkDir::new(&self.golden_root).sort_by_file_name() {
            let entry = entry.map_err(|e| Error::IoError(e.into()))?;
            if !entry.file_type().is_file() {
                continue;
            }
            let key = relative_key(&self.golden_root, entry.path())?;
            if !results.contains_key(&key) {
                unvisited.push(key);
            }
        }
        Ok(unvisited)
    }
}

impl OutputSink for VerificationSink {
    fn write(&self, path: &str, content: &str) -> Result<WriteOutcome> {
        let golden = join_relative(&self.golden_root, path);
        let verification = match fs::read(&golden) {
            Ok(expected) if expected == content.as_bytes() => Verification::Match,
            Ok(expected) => Verification::Mismatch {
                expected: String::from_utf8_lossy(&expected).into_owned(),
                actual: content.to_string(),
            },
            Err(e) if e.kind() == io::ErrorKind::NotFound => Verification::Missing,
            Err(e) => return Err(Error::IoError(e)),
        };
        let matches = verification == Verification::Match;
        if !matches {
            debug!("Golden mismatch: {}", golden.display());
        }
        self.results
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(path.to_string(), verification);
        Ok(WriteOutcome::Compared { matches })
    }
}
