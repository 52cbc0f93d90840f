//! Paginated document rendering.
//!
//! A4 landscape pages, each starting with the header row. Cells are framed
//! with grid lines and rows are filled in the category colour. Text is
//! single-line and clipped to the cell width.

use crate::errors::RenderError;
use crate::rows::{category_fill, ReportRow, COLUMNS, HEADER_FILL};
use printpdf::{
    BuiltinFont, Color, IndirectFontRef, Line, Mm, PdfDocument, PdfLayerReference, Point, Rect,
    Rgb,
};

const PAGE_WIDTH_MM: f32 = 297.0;
const PAGE_HEIGHT_MM: f32 = 210.0;
const MARGIN_MM: f32 = 10.0;
const ROW_HEIGHT_MM: f32 = 6.0;
const FONT_SIZE_PT: f32 = 7.0;
const CELL_PADDING_MM: f32 = 1.2;
const GRID_THICKNESS_PT: f32 = 0.25;

/// Column widths in mm; they add up to the printable width.
const COLUMN_WIDTHS_MM: [f32; 7] = [40.0, 45.0, 55.0, 55.0, 18.0, 32.0, 32.0];

/// Approximate Helvetica advance per character at `FONT_SIZE_PT`, in mm.
const CHAR_WIDTH_MM: f32 = FONT_SIZE_PT * 0.55 * 0.3528;

const LAYER_NAME: &str = "Table";

/// Body rows that fit on one page below the header.
pub fn rows_per_page() -> usize {
    let usable = PAGE_HEIGHT_MM - 2.0 * MARGIN_MM;
    ((usable / ROW_HEIGHT_MM).floor() as usize).saturating_sub(1)
}

/// Pages needed for `row_count` body rows. An empty report still has one
/// page carrying the header.
pub fn page_count(row_count: usize) -> usize {
    row_count.div_ceil(rows_per_page()).max(1)
}

fn rgb(hex: u32) -> Color {
    let channel = |shift: u32| ((hex >> shift) & 0xFF) as f32 / 255.0;
    Color::Rgb(Rgb::new(channel(16), channel(8), channel(0), None))
}

/// Fit `text` into a cell of `width_mm`, replacing characters the builtin
/// font cannot encode.
fn fit_text(text: &str, width_mm: f32) -> String {
    let capacity = ((width_mm - 2.0 * CELL_PADDING_MM) / CHAR_WIDTH_MM).floor() as usize;
    let printable: Vec<char> = text
        .chars()
        .map(|c| match c {
            '\n' | '\r' | '\t' => ' ',
            c if (c as u32) < 0x20 || (c as u32) > 0xFF => '?',
            c => c,
        })
        .collect();
    if printable.len() <= capacity {
        printable.into_iter().collect()
    } else {
        let keep = capacity.saturating_sub(3);
        printable.into_iter().take(keep).chain("...".chars()).collect()
    }
}

fn draw_row(
    layer: &PdfLayerReference,
    font: &IndirectFontRef,
    cells: &[String],
    fill: u32,
    top_mm: f32,
) {
    let bottom_mm = top_mm - ROW_HEIGHT_MM;
    let mut left_mm = MARGIN_MM;

    layer.set_fill_color(rgb(fill));
    layer.add_rect(Rect::new(
        Mm(MARGIN_MM),
        Mm(bottom_mm),
        Mm(PAGE_WIDTH_MM - MARGIN_MM),
        Mm(top_mm),
    ));

    layer.set_fill_color(rgb(0x000000));
    for (cell, width_mm) in cells.iter().zip(COLUMN_WIDTHS_MM) {
        layer.use_text(
            fit_text(cell, width_mm),
            FONT_SIZE_PT,
            Mm(left_mm + CELL_PADDING_MM),
            Mm(bottom_mm + 2.0),
            font,
        );
        left_mm += width_mm;
    }
}

fn segment(x1: f32, y1: f32, x2: f32, y2: f32) -> Line {
    Line {
        points: vec![
            (Point::new(Mm(x1), Mm(y1)), false),
            (Point::new(Mm(x2), Mm(y2)), false),
        ],
        is_closed: false,
    }
}

/// Horizontal rule under every row and a vertical rule at every column edge.
fn draw_grid(layer: &PdfLayerReference, rows_on_page: usize) {
    let top_mm = PAGE_HEIGHT_MM - MARGIN_MM;
    let bottom_mm = top_mm - (rows_on_page + 1) as f32 * ROW_HEIGHT_MM;
    let right_mm = PAGE_WIDTH_MM - MARGIN_MM;

    layer.set_outline_color(rgb(0x000000));
    layer.set_outline_thickness(GRID_THICKNESS_PT);

    for i in 0..=rows_on_page + 1 {
        let y = top_mm - i as f32 * ROW_HEIGHT_MM;
        layer.add_line(segment(MARGIN_MM, y, right_mm, y));
    }

    let mut x = MARGIN_MM;
    layer.add_line(segment(x, top_mm, x, bottom_mm));
    for width_mm in COLUMN_WIDTHS_MM {
        x += width_mm;
        layer.add_line(segment(x, top_mm, x, bottom_mm));
    }
}

/// Encode the rows as a PDF document.
///
/// # Errors
///
/// Returns [`RenderError::Document`] if the font cannot be embedded or the
/// document cannot be serialized.
pub fn render_pdf(title: &str, rows: &[ReportRow]) -> Result<Vec<u8>, RenderError> {
    let (doc, first_page, first_layer) =
        PdfDocument::new(title, Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), LAYER_NAME);
    let font = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(|e| RenderError::Document(format!("{:?}", e)))?;
    let header: Vec<String> = COLUMNS.iter().map(|c| c.to_string()).collect();

    let per_page = rows_per_page();
    let mut chunks: Vec<&[ReportRow]> = rows.chunks(per_page).collect();
    if chunks.is_empty() {
        chunks.push(&[]);
    }

    for (page_index, chunk) in chunks.into_iter().enumerate() {
        let layer = if page_index == 0 {
            doc.get_page(first_page).get_layer(first_layer)
        } else {
            let (page, layer) = doc.add_page(Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), LAYER_NAME);
            doc.get_page(page).get_layer(layer)
        };

        let mut top_mm = PAGE_HEIGHT_MM - MARGIN_MM;
        draw_row(&layer, &font, &header, HEADER_FILL, top_mm);
        for row in chunk {
            top_mm -= ROW_HEIGHT_MM;
            draw_row(&layer, &font, &row.cells, category_fill(row.kind), top_mm);
        }
        draw_grid(&layer, chunk.len());
    }

    doc.save_to_bytes()
        .map_err(|e| RenderError::Document(format!("{:?}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use cmsnap_core::diff::ChangeKind;

    #[test]
    fn test_column_widths_fill_printable_width() {
        let total: f32 = COLUMN_WIDTHS_MM.iter().sum();
        assert!((total - (PAGE_WIDTH_MM - 2.0 * MARGIN_MM)).abs() < 0.01);
    }

    #[test]
    fn test_page_count() {
        let per_page = rows_per_page();
        assert_eq!(per_page, 30);
        assert_eq!(page_count(0), 1);
        assert_eq!(page_count(per_page), 1);
        assert_eq!(page_count(per_page + 1), 2);
    }

    #[test]
    fn test_fit_text_clips_and_sanitizes() {
        assert_eq!(fit_text("short", 40.0), "short");
        let clipped = fit_text(&"x".repeat(200), 18.0);
        assert!(clipped.ends_with("..."));
        assert!(clipped.chars().count() < 20);
        assert_eq!(fit_text("a\nb\u{4e2d}", 40.0), "a b?");
    }

    #[test]
    fn test_render_pdf_produces_document() {
        let rows: Vec<ReportRow> = (0..75)
            .map(|i| ReportRow {
                cells: [
                    format!("cm{}", i),
                    "data.key".to_string(),
                    "1".to_string(),
                    "2".to_string(),
                    "Modified".to_string(),
                    "20260501-120000".to_string(),
                    "20260501-120030".to_string(),
                ],
                kind: ChangeKind::Modified,
            })
            .collect();

        let bytes = render_pdf("prod_billing_diff", &rows).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }
}
