//! Defines the app level error type and its conversion to JSON HTTP responses.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The user provided an invalid combination of username and password.
    #[error("invalid username or password")]
    InvalidCredentials,

    /// The request did not carry a valid auth cookie.
    #[error("authentication required")]
    NotAuthenticated,

    /// The user provided a password that is too easy to guess.
    #[error("password is too weak: {0}")]
    PasswordTooWeak(String),

    /// An unexpected error occurred with the underlying hashing library.
    ///
    /// The error string should only be logged for debugging on the server.
    #[error("hashing failed: {0}")]
    HashingError(String),

    /// The username is already registered.
    #[error("the username is already taken")]
    DuplicateUsername,

    /// The email address is already registered.
    #[error("the email address is already registered")]
    DuplicateEmail,

    /// An empty string was used as a username.
    #[error("username cannot be empty")]
    EmptyUsername,

    /// The string used to register an account is not an email address.
    #[error("{0:?} is not a valid email address")]
    InvalidEmail(String),

    /// An empty string was used as an expense title.
    #[error("expense title cannot be empty")]
    EmptyTitle,

    /// A zero or negative amount was used to create or update an expense.
    #[error("expense amount must be greater than zero")]
    NonPositiveAmount,

    /// A date string could not be parsed as a calendar date.
    #[error("could not parse {0:?} as a date (expected YYYY-MM-DD)")]
    InvalidDateFormat(String),

    /// An empty string was used as a category name.
    #[error("category name cannot be empty")]
    EmptyCategoryName,

    /// An unrecognized report period token was used.
    #[error("{0:?} is not a valid report period")]
    InvalidPeriod(String),

    /// An unrecognized export format was requested.
    #[error("{0:?} is not a supported export format")]
    InvalidExportFormat(String),

    /// The multipart form could not be parsed as a file upload.
    #[error("could not parse multipart form: {0}")]
    InvalidMultipart(String),

    /// The multipart form did not contain a file part.
    #[error("no file was supplied")]
    MissingFile,

    /// The requested resource was not found.
    ///
    /// Covers both rows that do not exist and rows owned by another user;
    /// the two cases are indistinguishable to the caller.
    #[error("the requested resource could not be found")]
    NotFound,

    /// Could not acquire the database lock.
    #[error("could not acquire the database lock")]
    DatabaseLockError,

    /// An attachment file could not be written to the upload directory.
    #[error("could not store the attachment file: {0}")]
    AttachmentWriteError(String),

    /// The CSV renderer failed.
    #[error("could not render the CSV export: {0}")]
    CsvError(String),

    /// The spreadsheet renderer failed.
    #[error("could not render the spreadsheet export: {0}")]
    SpreadsheetError(String),

    /// The document renderer failed.
    #[error("could not render the document export: {0}")]
    DocumentError(String),

    /// The category pie chart could not be drawn.
    #[error("could not render the category chart: {0}")]
    ChartError(String),

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            // Code 2067 occurs when a UNIQUE constraint failed.
            rusqlite::Error::SqliteFailure(sql_error, Some(ref desc))
                if sql_error.extended_code == 2067 && desc.contains("user.username") =>
            {
                Error::DuplicateUsername
            }
            rusqlite::Error::SqliteFailure(sql_error, Some(ref desc))
                if sql_error.extended_code == 2067 && desc.contains("user.email") =>
            {
                Error::DuplicateEmail
            }
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status_code = match self {
            Error::InvalidCredentials | Error::NotAuthenticated => StatusCode::UNAUTHORIZED,
            Error::NotFound => StatusCode::NOT_FOUND,
            Error::InvalidPeriod(_)
            | Error::InvalidExportFormat(_)
            | Error::InvalidMultipart(_)
            | Error::MissingFile => StatusCode::BAD_REQUEST,
            Error::PasswordTooWeak(_)
            | Error::DuplicateUsername
            | Error::DuplicateEmail
            | Error::EmptyUsername
            | Error::InvalidEmail(_)
            | Error::EmptyTitle
            | Error::NonPositiveAmount
            | Error::InvalidDateFormat(_)
            | Error::EmptyCategoryName => StatusCode::UNPROCESSABLE_ENTITY,
            // Any errors that are not handled above are not intended to be
            // shown to the client.
            ref error => {
                tracing::error!("An unexpected error occurred: {}", error);
                return (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": "an internal error occurred" })),
                )
                    .into_response();
            }
        };

        (status_code, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
