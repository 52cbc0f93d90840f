//! Spreadsheet rendering.
//!
//! One worksheet named "Diff Report": a bold header row, then one row per
//! change with every cell filled in the category colour.

use crate::errors::RenderError;
use crate::rows::{category_fill, ReportRow, COLUMNS, HEADER_FILL};
use rust_xlsxwriter::{Color, Format, FormatBorder, FormatPattern, Workbook};

pub const SHEET_NAME: &str = "Diff Report";

/// Longest string a spreadsheet cell accepts.
const MAX_CELL_CHARS: usize = 32_767;

const COLUMN_WIDTHS: [f64; 7] = [28.0, 32.0, 40.0, 40.0, 11.0, 19.0, 19.0];

fn fill_format(rgb: u32) -> Format {
    Format::new()
        .set_pattern(FormatPattern::Solid)
        .set_background_color(Color::RGB(rgb))
        .set_border(FormatBorder::Thin)
}

fn clip(text: &str) -> String {
    if text.chars().count() <= MAX_CELL_CHARS {
        text.to_string()
    } else {
        text.chars().take(MAX_CELL_CHARS).collect()
    }
}

/// Encode the rows as an `.xlsx` workbook.
///
/// # Errors
///
/// Returns [`RenderError::Spreadsheet`] if the workbook cannot be built.
pub fn render_xlsx(rows: &[ReportRow]) -> Result<Vec<u8>, RenderError> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(SHEET_NAME)?;

    let header = fill_format(HEADER_FILL).set_bold();
    for (col, (title, width)) in COLUMNS.iter().zip(COLUMN_WIDTHS).enumerate() {
        let col = col as u16;
        worksheet.write_string_with_format(0, col, *title, &header)?;
        worksheet.set_column_width(col, width)?;
    }
    worksheet.set_freeze_panes(1, 0)?;

    for (i, row) in rows.iter().enumerate() {
        let format = fill_format(category_fill(row.kind));
        let row_num = (i + 1) as u32;
        for (col, cell) in row.cells.iter().enumerate() {
            worksheet.write_string_with_format(row_num, col as u16, clip(cell), &format)?;
        }
    }

    Ok(workbook.save_to_buffer()?)
}
