//! Download endpoints for the export renderers.

use std::sync::{Arc, Mutex};

use axum::{
    Extension, Json,
    extract::{FromRef, Path, Query, State},
    http::header,
    response::{IntoResponse, Response},
};
use rusqlite::Connection;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::{
    Error,
    attachment::{AttachmentSummary, get_attachments_for_expense},
    expense::{
        ExpenseBody, SortOrder, get_expense_rows_in_range, list_all_expenses_with_category,
    },
    export::{render_document, render_history_csv, render_period_csv, render_spreadsheet},
    report::Period,
    state::{AppState, lock_connection},
    user::UserID,
};

const XLSX_MIME: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";
const PDF_MIME: &str = "application/pdf";
const CSV_MIME: &str = "text/csv";

/// The state needed for the export endpoints.
#[derive(Debug, Clone)]
pub struct ExportEndpointState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for ExportEndpointState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Download the period expense report as a spreadsheet.
pub async fn export_excel_endpoint(
    State(state): State<ExportEndpointState>,
    Extension(user_id): Extension<UserID>,
    Path(period): Path<String>,
) -> Result<Response, Error> {
    let period: Period = period.parse()?;
    let rows = period_rows(&state, user_id, period)?;

    let bytes = render_spreadsheet(&rows, period.label())?;
    let filename = format!("expenses_{}.xlsx", period.as_token());

    Ok(attachment_response(bytes, XLSX_MIME, &filename))
}

/// Download the period expense report as a PDF with a category chart.
pub async fn export_pdf_endpoint(
    State(state): State<ExportEndpointState>,
    Extension(user_id): Extension<UserID>,
    Path(period): Path<String>,
) -> Result<Response, Error> {
    let period: Period = period.parse()?;
    let rows = period_rows(&state, user_id, period)?;

    let bytes = render_document(&rows, period.label())?;
    let filename = format!("expenses_{}.pdf", period.as_token());

    Ok(attachment_response(bytes, PDF_MIME, &filename))
}

/// Download the period expense report as CSV
/// (`Date,Category,Description,Amount`).
pub async fn export_period_csv_endpoint(
    State(state): State<ExportEndpointState>,
    Extension(user_id): Extension<UserID>,
    Path(period): Path<String>,
) -> Result<Response, Error> {
    let period: Period = period.parse()?;
    let rows = period_rows(&state, user_id, period)?;

    let bytes = render_period_csv(&rows)?;
    let filename = format!("expenses_{}.csv", period.as_token());

    Ok(attachment_response(bytes, CSV_MIME, &filename))
}

/// The query parameters for the format-selected exports.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExportQuery {
    pub format: Option<String>,
}

/// Download the full expense history as CSV
/// (`Date,Title,Amount,Category,Description`), newest first.
pub async fn export_history_csv_endpoint(
    State(state): State<ExportEndpointState>,
    Extension(user_id): Extension<UserID>,
    Query(query): Query<ExportQuery>,
) -> Result<Response, Error> {
    match query.format.as_deref().unwrap_or("csv") {
        "csv" => {}
        other => return Err(Error::InvalidExportFormat(other.to_owned())),
    }

    let connection = lock_connection(&state.db_connection)?;
    let rows = get_expense_rows_in_range(user_id, None, SortOrder::Descending, &connection)?;

    let bytes = render_history_csv(&rows)?;

    let today = OffsetDateTime::now_utc().date();
    let filename = format!(
        "expenses_{:04}{:02}{:02}.csv",
        today.year(),
        u8::from(today.month()),
        today.day()
    );

    Ok(attachment_response(bytes, CSV_MIME, &filename))
}

/// The full expense history as JSON with totals.
#[derive(Debug, Serialize, Deserialize)]
pub struct JsonExportBody {
    pub expenses: Vec<ExpenseBody>,
    pub total_amount: Decimal,
    pub count: u64,
}

/// Export the full expense history as JSON.
pub async fn export_json_endpoint(
    State(state): State<ExportEndpointState>,
    Extension(user_id): Extension<UserID>,
    Query(query): Query<ExportQuery>,
) -> Result<Json<JsonExportBody>, Error> {
    match query.format.as_deref().unwrap_or("json") {
        "json" => {}
        other => return Err(Error::InvalidExportFormat(other.to_owned())),
    }

    let connection = lock_connection(&state.db_connection)?;

    let mut total_amount = Decimal::ZERO;
    let expenses = list_all_expenses_with_category(user_id, &connection)?
        .into_iter()
        .map(|(expense, category)| {
            total_amount += expense.amount;
            let attachments = get_attachments_for_expense(expense.id, &connection)?
                .into_iter()
                .map(AttachmentSummary::from)
                .collect();

            Ok(ExpenseBody {
                expense,
                category,
                attachments,
            })
        })
        .collect::<Result<Vec<_>, Error>>()?;

    let count = expenses.len() as u64;

    Ok(Json(JsonExportBody {
        expenses,
        total_amount,
        count,
    }))
}

/// Fetch the rows for a period export, oldest first.
fn period_rows(
    state: &ExportEndpointState,
    user_id: UserID,
    period: Period,
) -> Result<Vec<crate::expense::ExpenseRow>, Error> {
    let window = period.window(OffsetDateTime::now_utc().date());
    let connection = lock_connection(&state.db_connection)?;

    get_expense_rows_in_range(user_id, Some(&window), SortOrder::Ascending, &connection)
}

fn attachment_response(bytes: Vec<u8>, content_type: &str, filename: &str) -> Response {
    (
        [
            (header::CONTENT_TYPE, content_type.to_owned()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{filename}\""),
            ),
        ],
        bytes,
    )
        .into_response()
}
