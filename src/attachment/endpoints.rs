//! The multipart endpoint for attaching a file to an existing expense.

use std::{
    path::PathBuf,
    sync::{Arc, Mutex},
};

use axum::{
    Extension, Json,
    extract::{FromRef, Multipart, Path, State},
    http::StatusCode,
};
use rusqlite::Connection;

use crate::{
    Error,
    attachment::{AttachmentSummary, AttachmentUpload, add_attachment},
    expense::ExpenseId,
    state::{AppState, lock_connection},
    user::UserID,
};

/// The state needed for the attachment upload endpoint.
#[derive(Debug, Clone)]
pub struct AttachmentEndpointState {
    pub db_connection: Arc<Mutex<Connection>>,
    pub upload_dir: PathBuf,
}

impl FromRef<AppState> for AttachmentEndpointState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            upload_dir: state.upload_dir.clone(),
        }
    }
}

/// Attach an uploaded file to one of the acting user's expenses.
///
/// Expects a multipart form with a `file` part. The attachment row and the
/// backing file are persisted atomically.
pub async fn upload_attachment_endpoint(
    State(state): State<AttachmentEndpointState>,
    Extension(user_id): Extension<UserID>,
    Path(expense_id): Path<ExpenseId>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<AttachmentSummary>), Error> {
    let mut upload = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|error| Error::InvalidMultipart(error.to_string()))?
    {
        if field.name() == Some("file") {
            let filename = field.file_name().unwrap_or("attachment").to_owned();
            let bytes = field
                .bytes()
                .await
                .map_err(|error| Error::InvalidMultipart(error.to_string()))?;

            upload = Some(AttachmentUpload {
                filename,
                bytes: bytes.to_vec(),
            });
        }
    }

    let upload = upload.ok_or(Error::MissingFile)?;

    let connection = lock_connection(&state.db_connection)?;
    let attachment = add_attachment(
        user_id,
        expense_id,
        &upload,
        &state.upload_dir,
        &connection,
    )?;

    Ok((StatusCode::CREATED, Json(attachment.into())))
}
