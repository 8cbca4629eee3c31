// src/pdf_handler.rs
use chrono::Local;
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, StringFormat, Stream};
use std::fs;
use std::io::{self, Write};
use std::path::Path;
use tempfile::{Builder, NamedTempFile};
use tracing::{debug, info};

use crate::data_types::TableData;
use crate::error::ConvertError;
use crate::fonts::{encode_win_ansi, text_width, StandardFont};
use crate::report::{cell_lines, PageLayout, ReportLayout, ReportStyle, Rgb};

const PRODUCER: &str = concat!("csv2pdf ", env!("CARGO_PKG_VERSION"));

pub struct PdfHandler {
    style: ReportStyle,
}

impl PdfHandler {
    pub fn new(style: ReportStyle) -> Self {
        PdfHandler { style }
    }

    /// Render the title and table into an in-memory PDF.
    pub fn render(&self, table: &TableData, title: &str) -> Result<(Vec<u8>, ReportLayout), ConvertError> {
        let layout = ReportLayout::compute(table, title, &self.style);
        let style = &self.style;

        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();

        let mut fonts = lopdf::Dictionary::new();
        for font in [StandardFont::Helvetica, StandardFont::HelveticaBold] {
            let font_id = doc.add_object(dictionary! {
                "Type" => "Font",
                "Subtype" => "Type1",
                "BaseFont" => font.base_font(),
                "Encoding" => "WinAnsiEncoding",
            });
            fonts.set(font.resource_name(), font_id);
        }
        let resources_id = doc.add_object(dictionary! { "Font" => fonts });

        let mut kids: Vec<Object> = Vec::with_capacity(layout.page_count());
        for page in &layout.pages {
            let content = Content {
                operations: self.page_operations(table, &layout, page),
            };
            let encoded = content
                .encode()
                .map_err(|err| ConvertError::Render(err.to_string()))?;
            let content_id = doc.add_object(Stream::new(dictionary! {}, encoded));
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
            });
            kids.push(page_id.into());
        }

        let page_count = kids.len() as i64;
        let pages = dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => page_count,
            "Resources" => resources_id,
            "MediaBox" => vec![0.0_f32.into(), 0.0_f32.into(), style.page_width.into(), style.page_height.into()],
        };
        doc.objects.insert(pages_id, Object::Dictionary(pages));

        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        let info_id = doc.add_object(dictionary! {
            "Title" => Object::string_literal(encode_win_ansi(title)),
            "Producer" => Object::string_literal(PRODUCER),
            "CreationDate" => Object::string_literal(Local::now().format("D:%Y%m%d%H%M%S").to_string()),
        });
        doc.trailer.set("Root", catalog_id);
        doc.trailer.set("Info", info_id);

        let mut bytes = Vec::new();
        doc.save_to(&mut bytes)
            .map_err(|err| ConvertError::Render(err.to_string()))?;

        debug!(pages = layout.page_count(), bytes = bytes.len(), "rendered PDF");
        Ok((bytes, layout))
    }

    /// Replace `path` with `bytes` in one step: the data goes to a temporary
    /// file in the same directory, which is then renamed over the target.
    pub fn write_report(&self, bytes: &[u8], path: &Path) -> Result<(), ConvertError> {
        let write_error = |source| ConvertError::Write {
            path: path.to_path_buf(),
            source,
        };
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        let mut file = temp_report(dir).map_err(write_error)?;
        file.write_all(bytes).map_err(write_error)?;
        file.as_file().sync_all().map_err(write_error)?;
        // Replacing a report keeps whatever mode the old one had.
        if let Ok(existing) = fs::metadata(path) {
            file.as_file()
                .set_permissions(existing.permissions())
                .map_err(write_error)?;
        }
        file.persist(path).map_err(|err| write_error(err.error))?;

        info!(path = %path.display(), bytes = bytes.len(), "report written");
        Ok(())
    }

    fn page_operations(&self, table: &TableData, layout: &ReportLayout, page: &PageLayout) -> Vec<Operation> {
        let style = &self.style;
        let mut ops = Vec::new();

        if page.has_title {
            let baseline = style.margin + style.title_size;
            ops.extend(fill_color(Rgb::BLACK));
            ops.extend(self.show_text(
                &layout.title,
                StandardFont::HelveticaBold,
                style.title_size,
                style.margin,
                baseline,
            ));
        }

        let left = layout.table_left;
        let width = layout.table_width();
        let body_top = page.table_top + layout.header_height;
        let bottom = body_top + layout.rows_height(page.rows.clone());

        // Backgrounds first so text and grid sit on top.
        ops.extend(fill_color(style.header_background));
        ops.extend(self.fill_rect(left, page.table_top, width, layout.header_height));
        if !page.rows.is_empty() {
            ops.extend(fill_color(style.body_background));
            ops.extend(self.fill_rect(left, body_top, width, bottom - body_top));
        }

        let offsets = layout.column_offsets();

        ops.extend(fill_color(style.header_text));
        for ((header, x), column_width) in table.headers.iter().zip(&offsets).zip(&layout.column_widths) {
            ops.extend(self.centered_cell(header, StandardFont::HelveticaBold, *x, *column_width, page.table_top));
        }

        ops.extend(fill_color(style.body_text));
        let mut row_bottoms = Vec::with_capacity(page.rows.len());
        let mut row_top = body_top;
        for row_index in page.rows.clone() {
            for ((cell, x), column_width) in table.rows[row_index].iter().zip(&offsets).zip(&layout.column_widths) {
                ops.extend(self.centered_cell(cell, StandardFont::Helvetica, *x, *column_width, row_top));
            }
            row_top += layout.row_heights[row_index];
            row_bottoms.push(row_top);
        }

        ops.extend(self.grid(layout, page.table_top, body_top, &row_bottoms, bottom));
        ops
    }

    /// Each line of `text` centered in its column, one text object per line.
    /// Blank lines draw nothing.
    fn centered_cell(&self, text: &str, font: StandardFont, x: f32, width: f32, row_top: f32) -> Vec<Operation> {
        let size = self.style.cell_font_size;
        let mut ops = Vec::new();
        for (index, line) in cell_lines(text).enumerate() {
            if line.is_empty() {
                continue;
            }
            let text_left = x + (width - text_width(line, font, size)) / 2.0;
            let baseline = row_top + self.style.cell_padding_top + size + index as f32 * self.style.cell_leading;
            ops.extend(self.show_text(line, font, size, text_left, baseline));
        }
        ops
    }

    fn show_text(&self, text: &str, font: StandardFont, size: f32, x: f32, top_y: f32) -> Vec<Operation> {
        vec![
            Operation::new("BT", vec![]),
            Operation::new("Tf", vec![font.resource_name().into(), size.into()]),
            Operation::new("Td", vec![x.into(), self.flip(top_y).into()]),
            Operation::new(
                "Tj",
                vec![Object::String(encode_win_ansi(text), StringFormat::Hexadecimal)],
            ),
            Operation::new("ET", vec![]),
        ]
    }

    fn fill_rect(&self, x: f32, top_y: f32, width: f32, height: f32) -> Vec<Operation> {
        vec![
            Operation::new(
                "re",
                vec![x.into(), self.flip(top_y + height).into(), width.into(), height.into()],
            ),
            Operation::new("f", vec![]),
        ]
    }

    fn grid(&self, layout: &ReportLayout, table_top: f32, body_top: f32, row_bottoms: &[f32], bottom: f32) -> Vec<Operation> {
        let style = &self.style;
        let Rgb(r, g, b) = style.grid_color;
        let left = layout.table_left;
        let right = left + layout.table_width();

        let mut ops = vec![
            Operation::new("RG", vec![r.into(), g.into(), b.into()]),
            Operation::new("w", vec![style.grid_width.into()]),
        ];

        let mut horizontal = vec![table_top, body_top];
        horizontal.extend_from_slice(row_bottoms);
        for y in horizontal {
            ops.extend(self.line(left, y, right, y));
        }

        let mut x = left;
        ops.extend(self.line(x, table_top, x, bottom));
        for width in &layout.column_widths {
            x += width;
            ops.extend(self.line(x, table_top, x, bottom));
        }

        ops.push(Operation::new("S", vec![]));
        ops
    }

    fn line(&self, x1: f32, y1: f32, x2: f32, y2: f32) -> Vec<Operation> {
        vec![
            Operation::new("m", vec![x1.into(), self.flip(y1).into()]),
            Operation::new("l", vec![x2.into(), self.flip(y2).into()]),
        ]
    }

    /// Layout coordinates grow downwards, PDF user space grows upwards.
    fn flip(&self, y: f32) -> f32 {
        self.style.page_height - y
    }
}

/// Temporary sibling of the report. On unix it is created with the same
/// 0o666-minus-umask mode a plain `File::create` would get, not tempfile's 0o600.
fn temp_report(dir: &Path) -> io::Result<NamedTempFile> {
    let mut builder = Builder::new();
    builder.prefix(".csv2pdf").suffix(".tmp");
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        builder.permissions(fs::Permissions::from_mode(0o666));
    }
    builder.tempfile_in(dir)
}

fn fill_color(color: Rgb) -> Vec<Operation> {
    let Rgb(r, g, b) = color;
    vec![Operation::new("rg", vec![r.into(), g.into(), b.into()])]
}
