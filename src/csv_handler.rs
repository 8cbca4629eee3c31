// src/csv_handler.rs
use csv::ReaderBuilder;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::{debug, info};

use crate::data_types::TableData;
use crate::error::ConvertError;

pub struct CSVHandler {}

impl CSVHandler {
    pub fn new() -> Self {
        CSVHandler {}
    }

    pub fn read_csv(&self, path: &Path) -> Result<TableData, ConvertError> {
        let file = File::open(path).map_err(|source| ConvertError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        self.read_from(file, path)
    }

    /// Parse comma-separated text. `source` is only used in error messages.
    ///
    /// The first record is the header; csv drops a leading UTF-8 BOM. Short rows are padded with empty
    /// cells; a row with more fields than the header is rejected.
    pub fn read_from<R: Read>(&self, input: R, source: &Path) -> Result<TableData, ConvertError> {
        let csv_error = |err: csv::Error| ConvertError::Csv {
            path: source.to_path_buf(),
            source: err,
        };

        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(input);

        let headers: Vec<String> = reader
            .headers()
            .map_err(csv_error)?
            .iter()
            .map(String::from)
            .collect();

        if headers.is_empty() {
            return Err(ConvertError::NoColumns {
                path: source.to_path_buf(),
            });
        }

        let width = headers.len();
        let mut rows = Vec::new();

        for result in reader.records() {
            let record = result.map_err(csv_error)?;

            if record.len() > width {
                return Err(ConvertError::RaggedRow {
                    path: source.to_path_buf(),
                    line: record.position().map_or(0, |pos| pos.line()),
                    expected: width,
                    found: record.len(),
                });
            }

            let mut row: Vec<String> = record.iter().map(String::from).collect();
            if row.len() < width {
                debug!(line = record.position().map_or(0, |pos| pos.line()), "padding short row");
                row.resize(width, String::new());
            }
            rows.push(row);
        }

        info!(
            path = %source.display(),
            columns = width,
            rows = rows.len(),
            "parsed CSV"
        );

        Ok(TableData { headers, rows })
    }
}

impl Default for CSVHandler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Cursor;

    fn parse(text: &str) -> Result<TableData, ConvertError> {
        CSVHandler::new().read_from(Cursor::new(text.as_bytes().to_vec()), Path::new("test.csv"))
    }

    fn strings(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|cell| cell.to_string()).collect()
    }

    #[test]
    fn missing_cells_become_empty_strings() {
        let data = parse("name,age\nAlice,30\nBob,\n").unwrap();
        assert_eq!(data.headers, strings(&["name", "age"]));
        assert_eq!(
            data.rows,
            vec![strings(&["Alice", "30"]), strings(&["Bob", ""])]
        );
    }

    #[test]
    fn short_rows_are_padded_to_header_width() {
        let data = parse("a,b,c\n1\n1,2\n").unwrap();
        assert_eq!(data.rows, vec![strings(&["1", "", ""]), strings(&["1", "2", ""])]);
    }

    #[test]
    fn values_are_kept_verbatim() {
        let data = parse("id,price,note\n007, 1.50 ,\"a, quoted\"\n").unwrap();
        assert_eq!(data.rows[0], strings(&["007", " 1.50 ", "a, quoted"]));
    }

    #[test]
    fn header_only_file_has_no_rows() {
        let data = parse("name,age\n").unwrap();
        assert_eq!(data.column_count(), 2);
        assert_eq!(data.row_count(), 0);
    }

    #[test]
    fn long_row_is_rejected_with_line_number() {
        let err = parse("a,b\n1,2\n1,2,3\n").unwrap_err();
        match err {
            ConvertError::RaggedRow { line, expected, found, .. } => {
                assert_eq!(line, 3);
                assert_eq!(expected, 2);
                assert_eq!(found, 3);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn empty_input_has_no_columns() {
        assert!(matches!(parse(""), Err(ConvertError::NoColumns { .. })));
    }

    #[test]
    fn multiline_cell_is_kept_intact() {
        let data = parse("note,n\n\"line one\nline two\",1\n").unwrap();
        assert_eq!(data.rows, vec![strings(&["line one\nline two", "1"])]);
    }

    #[test]
    fn byte_order_mark_is_dropped() {
        let data = parse("\u{feff}name,age\nAlice,30\n").unwrap();
        assert_eq!(data.headers[0], "name");
    }

    #[test]
    fn invalid_utf8_is_a_parse_error() {
        let bytes = b"name\n\xff\xfe\n".to_vec();
        let err = CSVHandler::new()
            .read_from(Cursor::new(bytes), Path::new("bad.csv"))
            .unwrap_err();
        assert!(matches!(err, ConvertError::Csv { .. }));
        assert!(err.to_string().contains("bad.csv"));
    }

    #[test]
    fn missing_file_reports_open_error() {
        let err = CSVHandler::new()
            .read_csv(Path::new("/definitely/not/here.csv"))
            .unwrap_err();
        assert!(matches!(err, ConvertError::Open { .. }));
        assert!(err.to_string().contains("here.csv"));
    }
}
