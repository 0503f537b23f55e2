//! Export renderers: CSV, spreadsheet and PDF document (with a pie chart).
//!
//! Each renderer is a pure function from an ordered slice of expense rows and
//! a period label to an output byte buffer. Callers fetch and sort the rows;
//! renderers never touch storage.

mod chart;
mod csv;
mod document;
mod endpoints;
mod spreadsheet;

pub use csv::{render_history_csv, render_period_csv};
pub use document::render_document;
pub use endpoints::{
    export_excel_endpoint, export_history_csv_endpoint, export_json_endpoint,
    export_pdf_endpoint, export_period_csv_endpoint,
};
pub use spreadsheet::render_spreadsheet;

use rust_decimal::Decimal;

/// The label used for uncategorized expenses in export tables.
pub(crate) const MISSING_CATEGORY_LABEL: &str = "N/A";

/// Render an amount as a plain decimal number.
///
/// Trailing zeros are trimmed and integral amounts keep a single decimal
/// place: `4.50` renders as `4.5`, `120.00` as `120.0`.
pub(crate) fn format_amount(amount: Decimal) -> String {
    let normalized = amount.normalize();

    if normalized.scale() == 0 {
        format!("{normalized}.0")
    } else {
        normalized.to_string()
    }
}

#[cfg(test)]
mod format_amount_tests {
    use rust_decimal_macros::dec;

    use super::format_amount;

    #[test]
    fn trailing_zeros_are_trimmed() {
        assert_eq!(format_amount(dec!(4.50)), "4.5");
    }

    #[test]
    fn integral_amounts_keep_one_decimal_place() {
        assert_eq!(format_amount(dec!(120.00)), "120.0");
        assert_eq!(format_amount(dec!(300)), "300.0");
    }

    #[test]
    fn precise_amounts_are_unchanged() {
        assert_eq!(format_amount(dec!(12.345)), "12.345");
    }
}
