// src/report.rs
//! Page layout for the table report.
//!
//! Everything is measured in PDF points with the origin at the top-left of
//! the page; the renderer flips the y axis when it writes content streams.

use std::ops::Range;

use crate::data_types::TableData;
use crate::fonts::{text_width, StandardFont};

const INCH: f32 = 72.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgb(pub f32, pub f32, pub f32);

impl Rgb {
    pub const BLACK: Rgb = Rgb(0.0, 0.0, 0.0);
    pub const WHITE_SMOKE: Rgb = Rgb(245.0 / 255.0, 245.0 / 255.0, 245.0 / 255.0);

    pub fn from_hex(hex: u32) -> Rgb {
        Rgb(
            ((hex >> 16) & 0xff) as f32 / 255.0,
            ((hex >> 8) & 0xff) as f32 / 255.0,
            (hex & 0xff) as f32 / 255.0,
        )
    }
}

/// Geometry and colors of the report.
#[derive(Debug, Clone)]
pub struct ReportStyle {
    /// Page size in points. Wide enough that typical tables fit unwrapped.
    pub page_width: f32,
    pub page_height: f32,
    pub margin: f32,

    pub title_size: f32,
    pub title_leading: f32,
    pub title_space_after: f32,
    /// Gap between the title and the table.
    pub spacer: f32,

    pub cell_font_size: f32,
    pub cell_leading: f32,
    pub cell_padding_x: f32,
    pub cell_padding_top: f32,
    pub cell_padding_bottom: f32,
    pub header_padding_bottom: f32,

    pub grid_width: f32,
    pub grid_color: Rgb,
    pub header_background: Rgb,
    pub header_text: Rgb,
    pub body_background: Rgb,
    pub body_text: Rgb,
}

impl Default for ReportStyle {
    fn default() -> Self {
        Self {
            page_width: 20.0 * INCH,
            page_height: 15.0 * INCH,
            margin: INCH,
            title_size: 18.0,
            title_leading: 21.6,
            title_space_after: 6.0,
            spacer: 0.2 * INCH,
            cell_font_size: 10.0,
            cell_leading: 12.0,
            cell_padding_x: 6.0,
            cell_padding_top: 3.0,
            cell_padding_bottom: 3.0,
            header_padding_bottom: 12.0,
            grid_width: 1.0,
            grid_color: Rgb::BLACK,
            header_background: Rgb::from_hex(0x4A6B8A),
            header_text: Rgb::WHITE_SMOKE,
            body_background: Rgb::from_hex(0xD0D3D4),
            body_text: Rgb::BLACK,
        }
    }
}

impl ReportStyle {
    /// Height of the header band when its tallest cell has `lines` lines.
    pub fn header_row_height(&self, lines: usize) -> f32 {
        lines as f32 * self.cell_leading + self.cell_padding_top + self.header_padding_bottom
    }

    pub fn body_row_height(&self, lines: usize) -> f32 {
        lines as f32 * self.cell_leading + self.cell_padding_top + self.cell_padding_bottom
    }

    fn frame_width(&self) -> f32 {
        self.page_width - 2.0 * self.margin
    }

    fn frame_height(&self) -> f32 {
        self.page_height - 2.0 * self.margin
    }

    fn title_block_height(&self) -> f32 {
        self.title_leading + self.title_space_after + self.spacer
    }
}

/// One physical page: the header band followed by a slice of body rows.
#[derive(Debug, Clone, PartialEq)]
pub struct PageLayout {
    pub has_title: bool,
    /// Distance from the top of the page to the top of the header band.
    pub table_top: f32,
    pub rows: Range<usize>,
}

#[derive(Debug, Clone)]
pub struct ReportLayout {
    pub title: String,
    pub column_widths: Vec<f32>,
    pub table_left: f32,
    pub header_height: f32,
    /// Height of every body row, indexed like `TableData::rows`.
    pub row_heights: Vec<f32>,
    pub pages: Vec<PageLayout>,
}

impl ReportLayout {
    pub fn compute(table: &TableData, title: &str, style: &ReportStyle) -> Self {
        let column_widths = column_widths(table, style);
        let table_width: f32 = column_widths.iter().sum();
        let table_left = (style.margin + (style.frame_width() - table_width) / 2.0).max(style.margin);

        let header_height = style.header_row_height(tallest(&table.headers));
        let row_heights: Vec<f32> = table
            .rows
            .iter()
            .map(|row| style.body_row_height(tallest(row)))
            .collect();
        let pages = paginate(header_height, &row_heights, style);

        ReportLayout {
            title: title.to_string(),
            column_widths,
            table_left,
            header_height,
            row_heights,
            pages,
        }
    }

    /// Combined height of the body rows in `rows`.
    pub fn rows_height(&self, rows: Range<usize>) -> f32 {
        self.row_heights[rows].iter().sum()
    }

    pub fn table_width(&self) -> f32 {
        self.column_widths.iter().sum()
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Left edge of every column.
    pub fn column_offsets(&self) -> Vec<f32> {
        self.column_widths
            .iter()
            .scan(self.table_left, |x, width| {
                let left = *x;
                *x += width;
                Some(left)
            })
            .collect()
    }
}

/// Lines of a cell as drawn. CRLF and LF both break the line.
pub fn cell_lines(text: &str) -> impl Iterator<Item = &str> {
    text.split('\n').map(|line| line.strip_suffix('\r').unwrap_or(line))
}

fn tallest(cells: &[String]) -> usize {
    cells.iter().map(|cell| cell_lines(cell).count()).max().unwrap_or(1)
}

fn widest_line(text: &str, font: StandardFont, size: f32) -> f32 {
    cell_lines(text)
        .map(|line| text_width(line, font, size))
        .fold(0.0_f32, f32::max)
}

fn column_widths(table: &TableData, style: &ReportStyle) -> Vec<f32> {
    let size = style.cell_font_size;
    table
        .headers
        .iter()
        .enumerate()
        .map(|(column, header)| {
            let header_width = widest_line(header, StandardFont::HelveticaBold, size);
            let body_width = table
                .rows
                .iter()
                .filter_map(|row| row.get(column))
                .map(|cell| widest_line(cell, StandardFont::Helvetica, size))
                .fold(0.0_f32, f32::max);
            header_width.max(body_width) + 2.0 * style.cell_padding_x
        })
        .collect()
}

fn paginate(header: f32, row_heights: &[f32], style: &ReportStyle) -> Vec<PageLayout> {
    let row_count = row_heights.len();
    let mut pages = Vec::new();
    let mut next = 0;

    loop {
        let has_title = pages.is_empty();
        let title_block = if has_title { style.title_block_height() } else { 0.0 };
        let room = style.frame_height() - title_block - header;

        // A row taller than the page still gets a page of its own.
        let mut end = next;
        let mut used = 0.0;
        while end < row_count && (end == next || used + row_heights[end] <= room) {
            used += row_heights[end];
            end += 1;
        }

        pages.push(PageLayout {
            has_title,
            table_top: style.margin + title_block,
            rows: next..end,
        });

        next = end;
        if next >= row_count {
            break;
        }
    }

    pages
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn table(rows: usize) -> TableData {
        TableData {
            headers: vec!["name".into(), "age".into()],
            rows: (0..rows)
                .map(|i| vec![format!("person {i}"), i.to_string()])
                .collect(),
        }
    }

    #[test]
    fn default_page_is_twenty_by_fifteen_inches() {
        let style = ReportStyle::default();
        assert_eq!((style.page_width, style.page_height), (1440.0, 1080.0));
    }

    #[test]
    fn header_color_matches_hex() {
        let Rgb(r, g, b) = Rgb::from_hex(0x4A6B8A);
        assert!((r - 74.0 / 255.0).abs() < 1e-6);
        assert!((g - 107.0 / 255.0).abs() < 1e-6);
        assert!((b - 138.0 / 255.0).abs() < 1e-6);
    }

    #[test]
    fn column_fits_widest_cell_plus_padding() {
        let style = ReportStyle::default();
        let data = TableData {
            headers: vec!["id".into()],
            rows: vec![vec!["a much longer value".into()]],
        };
        let layout = ReportLayout::compute(&data, "t", &style);
        let expected = text_width("a much longer value", StandardFont::Helvetica, 10.0) + 12.0;
        assert!((layout.column_widths[0] - expected).abs() < 1e-4);
    }

    #[test]
    fn table_is_centered_between_margins() {
        let style = ReportStyle::default();
        let layout = ReportLayout::compute(&table(2), "t", &style);
        let right_gap = style.page_width - style.margin - (layout.table_left + layout.table_width());
        assert!((layout.table_left - style.margin - right_gap).abs() < 1e-3);
        assert_eq!(layout.column_offsets()[0], layout.table_left);
    }

    #[test]
    fn oversized_table_starts_at_left_margin() {
        let style = ReportStyle::default();
        let data = TableData {
            headers: vec!["x".repeat(400)],
            rows: vec![],
        };
        let layout = ReportLayout::compute(&data, "t", &style);
        assert_eq!(layout.table_left, style.margin);
    }

    #[test]
    fn header_only_table_yields_single_page() {
        let layout = ReportLayout::compute(&table(0), "t", &ReportStyle::default());
        assert_eq!(layout.page_count(), 1);
        assert!(layout.pages[0].has_title);
        assert_eq!(layout.pages[0].rows, 0..0);
    }

    #[test]
    fn rows_flow_onto_further_pages_without_title() {
        let style = ReportStyle::default();
        let layout = ReportLayout::compute(&table(200), "t", &style);

        assert!(layout.page_count() > 1);
        let covered: usize = layout.pages.iter().map(|page| page.rows.len()).sum();
        assert_eq!(covered, 200);
        for pair in layout.pages.windows(2) {
            assert_eq!(pair[0].rows.end, pair[1].rows.start);
            assert!(!pair[1].has_title);
            assert_eq!(pair[1].table_top, style.margin);
        }

        let first = &layout.pages[0];
        let bottom = first.table_top + layout.header_height + layout.rows_height(first.rows.clone());
        assert!(bottom <= style.page_height - style.margin);
        assert_eq!(layout.header_height, style.header_row_height(1));
    }

    #[test]
    fn at_least_one_row_per_page_on_cramped_geometry() {
        let style = ReportStyle {
            page_height: 200.0,
            ..ReportStyle::default()
        };
        let layout = ReportLayout::compute(&table(3), "t", &style);
        assert_eq!(layout.page_count(), 3);
        assert!(layout.pages.iter().all(|page| page.rows.len() == 1));
    }

    #[test]
    fn line_breaks_split_cells() {
        let lines: Vec<&str> = cell_lines("one\r\ntwo\nthree").collect();
        assert_eq!(lines, vec!["one", "two", "three"]);
        assert_eq!(cell_lines("").count(), 1);
    }

    #[test]
    fn multiline_cell_makes_its_row_taller() {
        let style = ReportStyle::default();
        let data = TableData {
            headers: vec!["note".into(), "n".into()],
            rows: vec![
                vec!["line one\nline two\nline three".into(), "1".into()],
                vec!["single".into(), "2".into()],
            ],
        };
        let layout = ReportLayout::compute(&data, "t", &style);

        assert_eq!(layout.row_heights, vec![style.body_row_height(3), style.body_row_height(1)]);
        assert_eq!(style.body_row_height(3) - style.body_row_height(1), 2.0 * style.cell_leading);
        let expected = text_width("line three", StandardFont::Helvetica, 10.0) + 12.0;
        assert!((layout.column_widths[0] - expected).abs() < 1e-4);
    }

    #[test]
    fn tall_rows_fill_pages_sooner() {
        let style = ReportStyle::default();
        let tall = TableData {
            headers: vec!["note".into()],
            rows: (0..40).map(|_| vec!["a\nb\nc\nd".into()]).collect(),
        };
        let layout = ReportLayout::compute(&tall, "t", &style);
        let flat = ReportLayout::compute(&table(40), "t", &style);

        assert_eq!(flat.page_count(), 1);
        assert!(layout.page_count() > 1);
        for page in &layout.pages {
            let bottom = page.table_top + layout.header_height + layout.rows_height(page.rows.clone());
            assert!(bottom <= style.page_height - style.margin);
        }
    }
}
