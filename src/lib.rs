//! csv2pdf
//!
//! Turns a CSV file into a PDF report: a title line and one styled table
//! whose header band repeats on every page. The desktop front end lives in
//! `main.rs`; everything it needs to convert files is here.

pub mod converter;
pub mod csv_handler;
pub mod data_types;
pub mod error;
pub mod fonts;
pub mod pdf_handler;
pub mod report;
pub mod selection;

pub use converter::{convert, convert_selection, ConversionSummary};
pub use data_types::TableData;
pub use error::{ConvertError, SelectionError};
pub use report::ReportStyle;
pub use selection::Selection;
