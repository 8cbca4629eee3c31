// src/error.rs
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Rejections raised while choosing the input file.
#[derive(Debug, Error)]
pub enum SelectionError {
    #[error("'{}' is not a .csv file", path.display())]
    InvalidExtension { path: PathBuf },
}

/// Everything that can stop a conversion. The `Display` text is what the
/// user sees, so each variant keeps the underlying cause.
#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("No file selected.")]
    NoFileSelected,

    #[error("cannot open '{}': {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("cannot parse '{}': {source}", path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("no columns to parse from '{}'", path.display())]
    NoColumns { path: PathBuf },

    #[error("error tokenizing '{}': expected {expected} fields in line {line}, saw {found}", path.display())]
    RaggedRow {
        path: PathBuf,
        line: u64,
        expected: usize,
        found: usize,
    },

    #[error("PDF generation failed: {0}")]
    Render(String),

    #[error("cannot write '{}': {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}
