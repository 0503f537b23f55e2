//! File storage for attachments.
//!
//! Files live in a configured upload directory under a timestamp-prefixed,
//! sanitized filename so concurrent uploads of the same file cannot collide.

use std::{
    fs,
    path::{Path, PathBuf},
};

use rusqlite::Connection;
use time::OffsetDateTime;

use crate::{
    Error,
    attachment::{Attachment, AttachmentUpload, db::insert_attachment},
    expense::{ExpenseId, get_expense},
    user::UserID,
};

/// Persist an attachment for an expense: the row via `connection` and the
/// file under `upload_dir`.
///
/// The row is inserted before the file is written, so when this is called
/// inside a transaction a failed file write leaves no row behind once the
/// transaction is dropped.
///
/// # Errors
/// Returns [Error::AttachmentWriteError] if the file could not be written.
pub fn store_attachment(
    expense_id: ExpenseId,
    upload: &AttachmentUpload,
    upload_dir: &Path,
    connection: &Connection,
) -> Result<Attachment, Error> {
    let uploaded_at = OffsetDateTime::now_utc();
    let stored_name = timestamped_filename(&upload.filename, uploaded_at);
    let filepath = upload_dir.join(stored_name);
    let filepath_text = filepath.to_string_lossy().into_owned();

    let id = insert_attachment(
        &upload.filename,
        &filepath_text,
        expense_id,
        uploaded_at,
        connection,
    )?;

    fs::write(&filepath, &upload.bytes)
        .map_err(|error| Error::AttachmentWriteError(format!("{}: {error}", filepath.display())))?;

    Ok(Attachment {
        id,
        filename: upload.filename.clone(),
        filepath: filepath_text,
        expense_id,
        uploaded_at,
    })
}

/// Attach a file to an existing expense owned by `user_id`.
///
/// The row and file are persisted atomically: a failed file write rolls back
/// the row.
pub fn add_attachment(
    user_id: UserID,
    expense_id: ExpenseId,
    upload: &AttachmentUpload,
    upload_dir: &Path,
    connection: &Connection,
) -> Result<Attachment, Error> {
    let transaction = connection.unchecked_transaction()?;

    get_expense(user_id, expense_id, &transaction)?;
    let attachment = store_attachment(expense_id, upload, upload_dir, &transaction)?;

    if let Err(error) = transaction.commit() {
        remove_stored_file(&attachment);
        return Err(error.into());
    }

    Ok(attachment)
}

/// Remove the backing files for a set of attachments, best-effort.
///
/// A failure to remove one file is logged at warn level and removal continues
/// with the rest. Returns the number of files that could not be removed.
pub fn remove_attachment_files(attachments: &[Attachment]) -> usize {
    let mut failures = 0;

    for attachment in attachments {
        if let Err(error) = fs::remove_file(&attachment.filepath) {
            tracing::warn!(
                "could not remove attachment file {}: {error}",
                attachment.filepath
            );
            failures += 1;
        }
    }

    failures
}

/// Remove a single stored attachment file, logging on failure.
pub fn remove_stored_file(attachment: &Attachment) {
    if let Err(error) = fs::remove_file(&attachment.filepath) {
        tracing::warn!(
            "could not remove attachment file {}: {error}",
            attachment.filepath
        );
    }
}

/// Build the on-disk name for an upload: a UTC timestamp prefix plus the
/// sanitized original filename.
fn timestamped_filename(original: &str, uploaded_at: OffsetDateTime) -> PathBuf {
    let date = uploaded_at.date();
    let time = uploaded_at.time();

    PathBuf::from(format!(
        "{:04}{:02}{:02}{:02}{:02}{:02}_{}",
        date.year(),
        u8::from(date.month()),
        date.day(),
        time.hour(),
        time.minute(),
        time.second(),
        sanitize_filename(original),
    ))
}

/// Reduce a client-supplied filename to a safe basename.
///
/// Path separators are stripped by keeping only the final component, and any
/// character outside `[A-Za-z0-9._-]` is replaced with an underscore.
fn sanitize_filename(original: &str) -> String {
    let basename = original
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(original);

    let sanitized: String = basename
        .chars()
        .map(|character| {
            if character.is_ascii_alphanumeric() || matches!(character, '.' | '-' | '_') {
                character
            } else {
                '_'
            }
        })
        .collect();

    if sanitized.trim_matches(['_', '.']).is_empty() {
        "file".to_owned()
    } else {
        sanitized
    }
}
