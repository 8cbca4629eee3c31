// src/selection.rs
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::error::SelectionError;

pub const CSV_EXTENSION: &str = "csv";
pub const REPORT_EXTENSION: &str = "pdf";

/// The file chosen for conversion. Once a file is selected the state never
/// goes back to `NoFileSelected`; a new valid file replaces the old one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Selection {
    #[default]
    NoFileSelected,
    FileSelected(PathBuf),
}

impl Selection {
    pub fn new() -> Self {
        Selection::NoFileSelected
    }

    /// Store `candidate` if it names a CSV file. A rejected candidate leaves
    /// the current selection as it was.
    pub fn select(&mut self, candidate: PathBuf) -> Result<(), SelectionError> {
        if !has_csv_extension(&candidate) {
            warn!(path = %candidate.display(), "rejected non-CSV selection");
            return Err(SelectionError::InvalidExtension { path: candidate });
        }

        debug!(path = %candidate.display(), "file selected");
        *self = Selection::FileSelected(candidate);
        Ok(())
    }

    pub fn path(&self) -> Option<&Path> {
        match self {
            Selection::FileSelected(path) => Some(path),
            Selection::NoFileSelected => None,
        }
    }

    /// Whether the convert action may be offered.
    pub fn is_ready(&self) -> bool {
        matches!(self, Selection::FileSelected(_))
    }
}

pub fn has_csv_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map_or(false, |ext| ext.eq_ignore_ascii_case(CSV_EXTENSION))
}

/// Drop payloads may arrive wrapped in braces when the path has spaces.
pub fn normalize_dropped_path(path: PathBuf) -> PathBuf {
    let unwrapped = match path.to_str() {
        Some(raw) => {
            let trimmed = raw.trim();
            trimmed
                .strip_prefix('{')
                .and_then(|rest| rest.strip_suffix('}'))
                .unwrap_or(trimmed)
                .to_owned()
        }
        None => return path,
    };
    PathBuf::from(unwrapped)
}

/// `<source without extension>.pdf`, next to the source.
pub fn report_path_for(source: &Path) -> PathBuf {
    source.with_extension(REPORT_EXTENSION)
}

pub fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
