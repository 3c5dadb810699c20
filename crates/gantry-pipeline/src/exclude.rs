//! Directory exclusion around player builds
//!
//! Profiles can name directories that must not ship. For the duration of a
//! player build those directories are moved into a holding directory at the
//! project root, then moved back afterwards. The holding-dir entry encodes
//! the original relative path with `~~` standing in for path separators, so
//! a crashed run can always be restored from the holding dir alone.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

/// Holding directory for excluded content, at the project root
pub const EXCLUDE_HOLDING_DIR: &str = "__ExcludeBuild";

const SEPARATOR_ENCODING: &str = "~~";

/// Moves matching directories aside on construction and back on [`Drop`].
#[derive(Debug)]
pub struct ExclusionGuard {
    project_root: PathBuf,
    restored: bool,
}

impl ExclusionGuard {
    /// Move every directory under `project_root` whose name matches an entry
    /// in `names` into the holding directory.
    pub fn exclude(project_root: &Path, names: &[String]) -> io::Result<Self> {
        let guard = Self {
            project_root: project_root.to_path_buf(),
            restored: false,
        };
        if names.iter().all(String::is_empty) {
            return Ok(guard);
        }

        let holding = project_root.join(EXCLUDE_HOLDING_DIR);
        let mut moved: Vec<PathBuf> = Vec::new();

        for entry in WalkDir::new(project_root)
            .min_depth(1)
            .into_iter()
            .filter_entry(|e| e.file_name() != EXCLUDE_HOLDING_DIR)
            .filter_map(Result::ok)
        {
            if !entry.file_type().is_dir() {
                continue;
            }
            let path = entry.path();
            // A directory inside an already-moved one no longer exists.
            if moved.iter().any(|m| path.starts_with(m)) {
                continue;
            }
            let matches = entry
                .file_name()
                .to_str()
                .is_some_and(|name| names.iter().any(|n| n == name));
            if !matches {
                continue;
            }

            fs::create_dir_all(&holding)?;
            let relative = path.strip_prefix(project_root).unwrap_or(path);
            fs::rename(path, holding.join(encode_relative(relative)))?;
            moved.push(path.to_path_buf());
        }

        Ok(guard)
    }

    /// Move everything in the holding directory back to its original place.
    pub fn restore(mut self) -> io::Result<()> {
        self.restored = true;
        restore_holding_dir(&self.project_root)
    }

    /// Restore leftovers from a previous run that never finished.
    pub fn restore_orphaned(project_root: &Path) -> io::Result<()> {
        restore_holding_dir(project_root)
    }
}

impl Drop for ExclusionGuard {
    fn drop(&mut self) {
        if !self.restored {
            let _ = restore_holding_dir(&self.project_root);
        }
    }
}

fn restore_holding_dir(project_root: &Path) -> io::Result<()> {
    let holding = project_root.join(EXCLUDE_HOLDING_DIR);
    if !holding.is_dir() {
        return Ok(());
    }

    for entry in fs::read_dir(&holding)? {
        let entry = entry?;
        let Some(encoded) = entry.file_name().to_str().map(str::to_string) else {
            continue;
        };
        let original = project_root.join(decode_relative(&encoded));
        if let Some(parent) = original.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::rename(entry.path(), original)?;
    }
    fs::remove_dir(&holding)?;
    Ok(())
}

fn encode_relative(relative: &Path) -> String {
    relative
        .components()
        .filter_map(|c| c.as_os_str().to_str())
        .collect::<Vec<_>>()
        .join(SEPARATOR_ENCODING)
}

fn decode_relative(encoded: &str) -> PathBuf {
    encoded.split(SEPARATOR_ENCODING).collect()
}
