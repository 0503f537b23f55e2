//! The two CSV renderer configurations.
//!
//! The full-history export and the period export emit different column
//! orders; both shapes are kept as-is rather than unified since their
//! consumers expect them.

use crate::{
    Error,
    expense::{ExpenseRow, format_date},
    export::{MISSING_CATEGORY_LABEL, format_amount},
};

/// Render the full-history CSV: `Date,Title,Amount,Category,Description`.
///
/// Uncategorized expenses render the category as `N/A` and a missing
/// description as the empty string. Emits the header row even for an empty
/// set.
pub fn render_history_csv(rows: &[ExpenseRow]) -> Result<Vec<u8>, Error> {
    let mut writer = csv::Writer::from_writer(Vec::new());

    writer
        .write_record(["Date", "Title", "Amount", "Category", "Description"])
        .map_err(csv_error)?;

    for row in rows {
        writer
            .write_record([
                format_date(row.date).as_str(),
                row.title.as_str(),
                format_amount(row.amount).as_str(),
                row.category.as_deref().unwrap_or(MISSING_CATEGORY_LABEL),
                row.description.as_deref().unwrap_or(""),
            ])
            .map_err(csv_error)?;
    }

    writer.into_inner().map_err(csv_error)
}

/// Render the period-export CSV: `Date,Category,Description,Amount`.
pub fn render_period_csv(rows: &[ExpenseRow]) -> Result<Vec<u8>, Error> {
    let mut writer = csv::Writer::from_writer(Vec::new());

    writer
        .write_record(["Date", "Category", "Description", "Amount"])
        .map_err(csv_error)?;

    for row in rows {
        writer
            .write_record([
                format_date(row.date).as_str(),
                row.category.as_deref().unwrap_or(MISSING_CATEGORY_LABEL),
                row.description.as_deref().unwrap_or(""),
                format_amount(row.amount).as_str(),
            ])
            .map_err(csv_error)?;
    }

    writer.into_inner().map_err(csv_error)
}

fn csv_error(error: impl std::fmt::Display) -> Error {
    Error::CsvError(error.to_string())
}

#[cfg(test)]
mod csv_tests {
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use time::macros::date;

    use crate::expense::ExpenseRow;

    use super::{render_history_csv, render_period_csv};

    fn row(
        date: time::Date,
        title: &str,
        category: Option<&str>,
        amount: Decimal,
        description: Option<&str>,
    ) -> ExpenseRow {
        ExpenseRow {
            date,
            title: title.to_owned(),
            amount,
            category: category.map(str::to_owned),
            description: description.map(str::to_owned),
        }
    }

    fn sample_rows() -> Vec<ExpenseRow> {
        vec![
            row(date!(2024 - 01 - 05), "Coffee", Some("Office"), dec!(4.50), None),
            row(date!(2024 - 01 - 20), "Chair", Some("Office"), dec!(120.00), None),
            row(date!(2024 - 02 - 01), "Flight", Some("Travel"), dec!(300.00), None),
        ]
    }

    #[test]
    fn history_csv_has_header_plus_one_line_per_row() {
        let bytes = render_history_csv(&sample_rows()).unwrap();
        let text = String::from_utf8(bytes).unwrap();

        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], "Date,Title,Amount,Category,Description");
        assert_eq!(lines[1], "2024-01-05,Coffee,4.5,Office,");
        assert_eq!(lines[2], "2024-01-20,Chair,120.0,Office,");
        assert_eq!(lines[3], "2024-02-01,Flight,300.0,Travel,");
    }

    #[test]
    fn history_csv_renders_missing_category_as_na() {
        let rows = vec![row(
            date!(2024 - 01 - 05),
            "Mystery",
            None,
            dec!(1.00),
            Some("who knows"),
        )];

        let bytes = render_history_csv(&rows).unwrap();
        let text = String::from_utf8(bytes).unwrap();

        assert_eq!(text.lines().nth(1).unwrap(), "2024-01-05,Mystery,1.0,N/A,who knows");
    }

    #[test]
    fn empty_input_still_emits_the_header() {
        let bytes = render_history_csv(&[]).unwrap();
        let text = String::from_utf8(bytes).unwrap();

        assert_eq!(text.trim_end(), "Date,Title,Amount,Category,Description");
    }

    #[test]
    fn period_csv_uses_the_other_column_order() {
        let bytes = render_period_csv(&sample_rows()).unwrap();
        let text = String::from_utf8(bytes).unwrap();

        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines[0], "Date,Category,Description,Amount");
        assert_eq!(lines[1], "2024-01-05,Office,,4.5");
    }

    #[test]
    fn csv_round_trips_through_a_reader() {
        let rows = sample_rows();
        let bytes = render_history_csv(&rows).unwrap();

        let mut reader = csv::Reader::from_reader(bytes.as_slice());
        let records: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();

        assert_eq!(records.len(), rows.len());
        for (record, row) in records.iter().zip(&rows) {
            assert_eq!(&record[0], crate::expense::format_date(row.date).as_str());
            assert_eq!(&record[1], row.title.as_str());
            assert_eq!(record[2].parse::<Decimal>().unwrap(), row.amount);
        }
    }
}
