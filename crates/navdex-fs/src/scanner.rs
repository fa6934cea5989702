//! Fragment discovery by filesystem walking.
//!
//! Discovery is separated from loading: the Scanner only identifies fragment
//! files and where they sit, returning lightweight references for
//! `FragmentLoader` to read and parse.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::LoadError;

/// Kind of fragment file.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum FragmentKind {
    /// Versioned JSON record; carries its own module path.
    Record,
    /// Legacy `initSidebarItems(...)` file; path comes from its directory.
    Legacy,
}

/// Reference to one fragment file.
///
/// No content is read at this stage.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct FragmentRef {
    pub kind: FragmentKind,
    /// Absolute path to the file.
    pub file_path: PathBuf,
    /// Directory names between the source root and the file.
    pub dir_segments: Vec<String>,
}

/// Discovers fragment references by walking the filesystem.
pub(crate) struct Scanner<'a> {
    source_dir: &'a Path,
    record_filename: &'a str,
    /// `None` when legacy import is disabled.
    legacy_filename: Option<&'a str>,
}

impl<'a> Scanner<'a> {
    pub fn new(
        source_dir: &'a Path,
        record_filename: &'a str,
        legacy_filename: Option<&'a str>,
    ) -> Self {
        Self {
            source_dir,
            record_filename,
            legacy_filename,
        }
    }

    /// Scan the source directory and return fragment references sorted by
    /// file path.
    ///
    /// Hidden entries are skipped and symlinked directories are not followed.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::SourceNotFound`] if the source directory is
    /// missing and [`LoadError::Io`] if any directory cannot be read.
    pub fn scan(&self) -> Result<Vec<FragmentRef>, LoadError> {
        if !self.source_dir.is_dir() {
            return Err(LoadError::SourceNotFound(self.source_dir.to_path_buf()));
        }

        let mut refs = Vec::new();
        let mut segments = Vec::new();
        self.scan_directory(self.source_dir, &mut segments, &mut refs)?;
        refs.sort_by(|a, b| a.file_path.cmp(&b.file_path));
        Ok(refs)
    }

    fn scan_directory(
        &self,
        dir_path: &Path,
        segments: &mut Vec<String>,
        refs: &mut Vec<FragmentRef>,
    ) -> Result<(), LoadError> {
        let entries = fs::read_dir(dir_path).map_err(|e| LoadError::io(dir_path, e))?;

        for entry in entries {
            let entry = entry.map_err(|e| LoadError::io(dir_path, e))?;
            let name = entry.file_name().to_string_lossy().into_owned();
            if name.starts_with('.') {
                continue;
            }

            // file_type() does not follow symlinks
            let file_type = entry.file_type().map_err(|e| LoadError::io(entry.path(), e))?;
            if file_type.is_dir() {
                segments.push(name);
                self.scan_directory(&entry.path(), segments, refs)?;
                segments.pop();
                continue;
            }

            let kind = if name == self.record_filename {
                FragmentKind::Record
            } else if self.legacy_filename == Some(name.as_str()) {
                FragmentKind::Legacy
            } else {
                continue;
            };
            refs.push(FragmentRef {
                kind,
                file_path: entry.path(),
                dir_segments: segments.clone(),
            });
        }

        Ok(())
    }
}
