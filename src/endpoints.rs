//! The API endpoint URIs.

/// The route for registering a new account.
pub const USERS: &str = "/api/users";
/// The route for logging in a user.
pub const LOG_IN: &str = "/api/log_in";
/// The route for the client to log out the current user.
pub const LOG_OUT: &str = "/api/log_out";

/// The legacy route to list and create expenses.
pub const EXPENSES: &str = "/api/expenses";
/// The legacy route to update and delete an expense.
pub const EXPENSE: &str = "/api/expenses/{expense_id}";
/// The route for aggregated chart data over a named period.
pub const REPORT_DATA: &str = "/api/report-data/{period}";

/// The route to download the period report as a spreadsheet.
pub const EXPORT_EXCEL: &str = "/export/excel/{period}";
/// The route to download the period report as a PDF.
pub const EXPORT_PDF: &str = "/export/pdf/{period}";
/// The route to download the period report as CSV.
pub const EXPORT_CSV_PERIOD: &str = "/export/csv/{period}";
/// The route to download the full expense history as CSV.
pub const EXPORT_CSV: &str = "/expenses/export";

/// The v1 route to list and create expenses.
pub const API_V1_EXPENSES: &str = "/api/v1/expenses";
/// The v1 route to get, update and delete an expense.
pub const API_V1_EXPENSE: &str = "/api/v1/expenses/{expense_id}";
/// The v1 route to attach a file to an expense.
pub const API_V1_EXPENSE_ATTACHMENTS: &str = "/api/v1/expenses/{expense_id}/attachments";
/// The v1 route to list and create categories.
pub const API_V1_CATEGORIES: &str = "/api/v1/categories";
/// The v1 route to update and delete a category.
pub const API_V1_CATEGORY: &str = "/api/v1/categories/{category_id}";
/// The v1 route to export the full expense history as JSON.
pub const API_V1_EXPORT: &str = "/api/v1/export";
/// The v1 route for the yearly report.
pub const API_V1_REPORT: &str = "/api/v1/report";
