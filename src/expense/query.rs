//! The materialized expense row query used by reports and exports.

use rusqlite::Connection;
use rust_decimal::Decimal;
use time::Date;

use crate::{Error, expense::format_date, report::WindowRange, user::UserID};

/// An expense row materialized for aggregation and export: the category is
/// already resolved to its name and bookkeeping columns are dropped.
#[derive(Debug, Clone, PartialEq)]
pub struct ExpenseRow {
    pub date: Date,
    pub title: String,
    pub amount: Decimal,
    /// The category name, or `None` for uncategorized expenses.
    pub category: Option<String>,
    pub description: Option<String>,
}

/// The order to sort expense rows in a query.
pub enum SortOrder {
    /// Oldest first, used by the period-scoped exports.
    Ascending,
    /// Newest first, used by the full-history export.
    Descending,
}

/// Get the user's expense rows, optionally restricted to an inclusive date
/// window, sorted by date in the given order (ties broken by ID ascending so
/// the ordering is stable).
pub fn get_expense_rows_in_range(
    user_id: UserID,
    window: Option<&WindowRange>,
    sort_order: SortOrder,
    connection: &Connection,
) -> Result<Vec<ExpenseRow>, Error> {
    let window_clause = match window {
        Some(_) => "AND expense.date BETWEEN :start AND :end ",
        None => "",
    };
    let order_clause = match sort_order {
        SortOrder::Ascending => "ORDER BY expense.date ASC",
        SortOrder::Descending => "ORDER BY expense.date DESC",
    };

    let query = format!(
        "SELECT expense.date, expense.title, expense.amount, category.name, expense.description \
        FROM expense LEFT JOIN category ON expense.category_id = category.id \
        WHERE expense.user_id = :user_id {window_clause}{order_clause}, expense.id ASC"
    );

    let mut statement = connection.prepare(&query)?;

    let user_id = user_id.as_i64();
    let map_row = |row: &rusqlite::Row| {
        let raw_amount: String = row.get(2)?;
        let amount = raw_amount.parse::<Decimal>().map_err(|error| {
            rusqlite::Error::FromSqlConversionFailure(
                2,
                rusqlite::types::Type::Text,
                Box::new(error),
            )
        })?;

        Ok(ExpenseRow {
            date: row.get(0)?,
            title: row.get(1)?,
            amount,
            category: row.get(3)?,
            description: row.get(4)?,
        })
    };

    let rows = match window {
        Some(window) => statement.query_map(
            rusqlite::named_params! {
                ":user_id": user_id,
                ":start": format_date(window.start),
                ":end": format_date(window.end),
            },
            map_row,
        )?,
        None => statement.query_map(rusqlite::named_params! { ":user_id": user_id }, map_row)?,
    };

    rows.map(|maybe_row| maybe_row.map_err(|error| error.into()))
        .collect()
}
