//! Pure aggregation over materialized expense rows.
//!
//! These functions never touch storage; they fold an already-fetched,
//! already-filtered slice of rows into the shapes the report endpoints and
//! chart renderer need. All sums are exact decimals.

use std::collections::{BTreeMap, HashMap};

use rust_decimal::Decimal;

use crate::expense::{ExpenseRow, format_date};

/// The label used for expenses without a category in charts and reports.
pub const UNCATEGORIZED_LABEL: &str = "Uncategorized";

/// A category's share of a set of expenses.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryAggregate {
    pub label: String,
    pub total: Decimal,
    pub count: u64,
}

/// Sum amounts per category, with per-category expense counts.
///
/// Categories appear in first-seen order of the input sequence, not
/// alphabetical order, so chart slices line up with the data they were
/// generated from.
pub fn category_breakdown(rows: &[ExpenseRow]) -> Vec<CategoryAggregate> {
    let mut aggregates: Vec<CategoryAggregate> = Vec::new();
    let mut index_by_label: HashMap<String, usize> = HashMap::new();

    for row in rows {
        let label = row.category.as_deref().unwrap_or(UNCATEGORIZED_LABEL);

        match index_by_label.get(label) {
            Some(&index) => {
                aggregates[index].total += row.amount;
                aggregates[index].count += 1;
            }
            None => {
                index_by_label.insert(label.to_owned(), aggregates.len());
                aggregates.push(CategoryAggregate {
                    label: label.to_owned(),
                    total: row.amount,
                    count: 1,
                });
            }
        }
    }

    aggregates
}

/// Sum amounts per category name, in first-seen order.
pub fn by_category(rows: &[ExpenseRow]) -> Vec<(String, Decimal)> {
    category_breakdown(rows)
        .into_iter()
        .map(|aggregate| (aggregate.label, aggregate.total))
        .collect()
}

/// Sum amounts per day, returned as (`YYYY-MM-DD`, total) pairs sorted
/// ascending by date.
pub fn by_date(rows: &[ExpenseRow]) -> Vec<(String, Decimal)> {
    let mut totals: BTreeMap<time::Date, Decimal> = BTreeMap::new();

    for row in rows {
        *totals.entry(row.date).or_insert(Decimal::ZERO) += row.amount;
    }

    totals
        .into_iter()
        .map(|(date, total)| (format_date(date), total))
        .collect()
}

/// Sum amounts per month (1-12) for expenses dated in `year`.
///
/// Months with no expenses are omitted rather than zero-filled.
pub fn by_month(rows: &[ExpenseRow], year: i32) -> BTreeMap<u8, Decimal> {
    let mut totals = BTreeMap::new();

    for row in rows.iter().filter(|row| row.date.year() == year) {
        *totals
            .entry(u8::from(row.date.month()))
            .or_insert(Decimal::ZERO) += row.amount;
    }

    totals
}

/// The sum of all amounts in the set.
pub fn grand_total(rows: &[ExpenseRow]) -> Decimal {
    rows.iter().map(|row| row.amount).sum()
}
