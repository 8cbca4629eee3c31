// src/converter.rs
//! The CSV to PDF pipeline: parse, lay out, render, write.
//!
//! Each step short-circuits on failure. Parsing happens before anything is
//! written, and the report is only persisted once it has been rendered in
//! full, so a failed conversion never leaves a partial file behind.

use std::path::{Path, PathBuf};
use tokio::task;
use tracing::{info, info_span, warn};

use crate::csv_handler::CSVHandler;
use crate::data_types::TableData;
use crate::error::ConvertError;
use crate::pdf_handler::PdfHandler;
use crate::report::ReportStyle;
use crate::selection::{display_name, report_path_for, Selection};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionSummary {
    pub output_path: PathBuf,
    /// Table rows including the header.
    pub rows: usize,
    pub columns: usize,
    pub pages: usize,
}

pub fn report_title(source: &Path) -> String {
    format!("Report for {}", display_name(source))
}

pub fn convert(source: &Path, style: &ReportStyle) -> Result<ConversionSummary, ConvertError> {
    let _span = info_span!("convert", source = %source.display()).entered();

    let table = CSVHandler::new().read_csv(source)?;
    write_report(source, &table, style)
}

/// Convert whatever is currently selected.
pub fn convert_selection(selection: &Selection, style: &ReportStyle) -> Result<ConversionSummary, ConvertError> {
    match selection.path() {
        Some(path) => convert(path, style),
        None => Err(ConvertError::NoFileSelected),
    }
}

/// Render an already parsed table and write it next to `source`.
pub fn write_report(source: &Path, table: &TableData, style: &ReportStyle) -> Result<ConversionSummary, ConvertError> {
    let output_path = report_path_for(source);
    let handler = PdfHandler::new(style.clone());

    let (bytes, layout) = handler.render(table, &report_title(source))?;
    handler.write_report(&bytes, &output_path)?;

    let summary = ConversionSummary {
        output_path,
        rows: table.row_count() + 1,
        columns: table.column_count(),
        pages: layout.page_count(),
    };
    info!(
        output = %summary.output_path.display(),
        rows = summary.rows,
        columns = summary.columns,
        pages = summary.pages,
        "conversion finished"
    );
    Ok(summary)
}

/// Parse `path` on the blocking pool. Errors are flattened to their message
/// so they can travel inside UI messages.
pub async fn load_table(path: PathBuf) -> Result<TableData, String> {
    task::spawn_blocking(move || CSVHandler::new().read_csv(&path))
        .await
        .map_err(|err| err.to_string())?
        .map_err(|err| {
            warn!(error = %err, "CSV parsing failed");
            err.to_string()
        })
}

/// Second half of [`load_table`]: render and write on the blocking pool.
pub async fn render_and_write(
    source: PathBuf,
    table: TableData,
    style: ReportStyle,
) -> Result<ConversionSummary, String> {
    task::spawn_blocking(move || write_report(&source, &table, &style))
        .await
        .map_err(|err| err.to_string())?
        .map_err(|err| {
            warn!(error = %err, "PDF generation failed");
            err.to_string()
        })
}
