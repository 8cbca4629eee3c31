// src/data_types.rs

/// Header plus rows read from a CSV file. Every row holds exactly
/// `headers.len()` cells; missing cells are empty strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableData {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl TableData {
    pub fn column_count(&self) -> usize {
        self.headers.len()
    }

    /// Data rows, header excluded.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Rows as rendered: the header first, then the data rows.
    pub fn grid(&self) -> impl Iterator<Item = &[String]> {
        std::iter::once(self.headers.as_slice()).chain(self.rows.iter().map(Vec::as_slice))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> TableData {
        TableData {
            headers: vec!["name".into(), "age".into()],
            rows: vec![
                vec!["Alice".into(), "30".into()],
                vec!["Bob".into(), String::new()],
            ],
        }
    }

    #[test]
    fn grid_starts_with_header() {
        let data = sample();
        let grid: Vec<&[String]> = data.grid().collect();
        assert_eq!(grid.len(), 3);
        assert_eq!(grid[0], data.headers.as_slice());
        assert_eq!(grid[2][1], "");
    }

    #[test]
    fn counts_exclude_header() {
        let data = sample();
        assert_eq!(data.column_count(), 2);
        assert_eq!(data.row_count(), 2);
    }

    #[test]
    fn header_only_grid_has_one_row() {
        let data = TableData {
            headers: vec!["id".into()],
            rows: Vec::new(),
        };
        assert_eq!(data.grid().count(), 1);
    }
}
