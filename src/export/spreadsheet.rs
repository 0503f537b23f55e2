//! The spreadsheet (XLSX) renderer.

use rust_decimal::{Decimal, prelude::ToPrimitive};
use rust_xlsxwriter::{Format, FormatAlign, Workbook};

use crate::{
    Error,
    expense::{ExpenseRow, format_date},
    export::MISSING_CATEGORY_LABEL,
};

const HEADERS: [&str; 4] = ["Date", "Category", "Description", "Amount"];
const COLUMN_WIDTHS: [f64; 4] = [12.0, 15.0, 30.0, 12.0];

/// Render a single-sheet workbook: a merged bold title, a bold header row,
/// one row per expense and a bold total row, with fixed column widths.
pub fn render_spreadsheet(rows: &[ExpenseRow], period_label: &str) -> Result<Vec<u8>, Error> {
    let mut workbook = Workbook::new();

    let title_format = Format::new()
        .set_bold()
        .set_font_size(14)
        .set_align(FormatAlign::Center);
    let bold = Format::new().set_bold();

    let worksheet = workbook.add_worksheet();
    worksheet.set_name("Expenses").map_err(spreadsheet_error)?;

    worksheet
        .merge_range(
            0,
            0,
            0,
            4,
            &format!("Business Expenses Report - {period_label}"),
            &title_format,
        )
        .map_err(spreadsheet_error)?;

    // Row 1 is left blank, headers go on row 2.
    for (column, header) in HEADERS.iter().enumerate() {
        worksheet
            .write_with_format(2, column as u16, *header, &bold)
            .map_err(spreadsheet_error)?;
    }

    let mut total = Decimal::ZERO;
    let mut row_index: u32 = 3;

    for row in rows {
        worksheet
            .write(row_index, 0, format_date(row.date))
            .map_err(spreadsheet_error)?;
        worksheet
            .write(
                row_index,
                1,
                row.category.as_deref().unwrap_or(MISSING_CATEGORY_LABEL),
            )
            .map_err(spreadsheet_error)?;
        worksheet
            .write(row_index, 2, row.description.as_deref().unwrap_or(""))
            .map_err(spreadsheet_error)?;
        worksheet
            .write(row_index, 3, row.amount.to_f64().unwrap_or_default())
            .map_err(spreadsheet_error)?;

        total += row.amount;
        row_index += 1;
    }

    // Blank row, then the total row.
    row_index += 1;
    worksheet
        .write_with_format(row_index, 2, "Total:", &bold)
        .map_err(spreadsheet_error)?;
    worksheet
        .write_with_format(row_index, 3, total.to_f64().unwrap_or_default(), &bold)
        .map_err(spreadsheet_error)?;

    for (column, width) in COLUMN_WIDTHS.iter().enumerate() {
        worksheet
            .set_column_width(column as u16, *width)
            .map_err(spreadsheet_error)?;
    }

    workbook.save_to_buffer().map_err(spreadsheet_error)
}

fn spreadsheet_error(error: impl std::fmt::Display) -> Error {
    Error::SpreadsheetError(error.to_string())
}
