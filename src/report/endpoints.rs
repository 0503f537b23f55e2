//! JSON endpoints serving aggregated report data.

use std::sync::{Arc, Mutex};

use axum::{
    Extension, Json,
    extract::{FromRef, Path, Query, State},
};
use rusqlite::Connection;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::{
    Error,
    category::{CategoryId, get_category},
    expense::{SortOrder, get_expense_rows_in_range},
    report::{
        Period, WindowRange, by_category, by_date, by_month, category_breakdown, grand_total,
    },
    state::{AppState, lock_connection},
    user::UserID,
};

/// The state needed for the report endpoints.
#[derive(Debug, Clone)]
pub struct ReportEndpointState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for ReportEndpointState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Parallel label/value arrays, ready for a chart library.
#[derive(Debug, Serialize, Deserialize)]
pub struct ChartSeries {
    pub labels: Vec<String>,
    pub values: Vec<Decimal>,
}

/// Aggregated expense data for the period report charts.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportDataBody {
    pub category_data: ChartSeries,
    pub date_data: ChartSeries,
    pub total: Decimal,
    pub count: u64,
}

/// Aggregate the acting user's expenses over a named look-back period.
///
/// Returns per-category totals (first-seen order), per-day totals (ascending)
/// and the grand total with a transaction count.
pub async fn report_data_endpoint(
    State(state): State<ReportEndpointState>,
    Extension(user_id): Extension<UserID>,
    Path(period): Path<String>,
) -> Result<Json<ReportDataBody>, Error> {
    let period: Period = period.parse()?;
    let window = period.window(OffsetDateTime::now_utc().date());

    let connection = lock_connection(&state.db_connection)?;
    let rows = get_expense_rows_in_range(user_id, Some(&window), SortOrder::Ascending, &connection)?;

    let (category_labels, category_values) = by_category(&rows).into_iter().unzip();
    let (date_labels, date_values) = by_date(&rows).into_iter().unzip();

    Ok(Json(ReportDataBody {
        category_data: ChartSeries {
            labels: category_labels,
            values: category_values,
        },
        date_data: ChartSeries {
            labels: date_labels,
            values: date_values,
        },
        total: grand_total(&rows),
        count: rows.len() as u64,
    }))
}

/// The query parameters accepted by the yearly report.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct YearReportQuery {
    /// The calendar year to report on; defaults to the current year.
    pub year: Option<i32>,
    /// Restrict the report to a single category.
    pub category_id: Option<CategoryId>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MonthTotal {
    pub month: u8,
    pub total: Decimal,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CategoryTotal {
    pub name: String,
    pub total: Decimal,
    pub count: u64,
}

/// Monthly and per-category totals for one calendar year.
#[derive(Debug, Serialize, Deserialize)]
pub struct YearReportBody {
    pub year: i32,
    pub monthly: Vec<MonthTotal>,
    pub categories: Vec<CategoryTotal>,
    pub total: Decimal,
}

/// Aggregate the acting user's expenses for a calendar year, by month and by
/// category.
pub async fn year_report_endpoint(
    State(state): State<ReportEndpointState>,
    Extension(user_id): Extension<UserID>,
    Query(query): Query<YearReportQuery>,
) -> Result<Json<YearReportBody>, Error> {
    let year = query
        .year
        .unwrap_or_else(|| OffsetDateTime::now_utc().year());
    let window = year_window(year)?;

    let connection = lock_connection(&state.db_connection)?;
    let mut rows =
        get_expense_rows_in_range(user_id, Some(&window), SortOrder::Ascending, &connection)?;

    if let Some(category_id) = query.category_id {
        let category = get_category(user_id, category_id, &connection)?;
        rows.retain(|row| row.category.as_deref() == Some(category.name.as_ref()));
    }

    let monthly = by_month(&rows, year)
        .into_iter()
        .map(|(month, total)| MonthTotal { month, total })
        .collect();
    let categories = category_breakdown(&rows)
        .into_iter()
        .map(|aggregate| CategoryTotal {
            name: aggregate.label,
            total: aggregate.total,
            count: aggregate.count,
        })
        .collect();

    Ok(Json(YearReportBody {
        year,
        monthly,
        categories,
        total: grand_total(&rows),
    }))
}

fn year_window(year: i32) -> Result<WindowRange, Error> {
    let start = time::Date::from_calendar_date(year, time::Month::January, 1)
        .map_err(|_| Error::InvalidDateFormat(year.to_string()))?;
    let end = time::Date::from_calendar_date(year, time::Month::December, 31)
        .map_err(|_| Error::InvalidDateFormat(year.to_string()))?;

    Ok(WindowRange { start, end })
}
