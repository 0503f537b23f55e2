//! The `Attachment` type and upload payload.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::expense::ExpenseId;

/// The row ID of an attachment in the application database.
pub type AttachmentId = i64;

/// A file stored alongside an expense, e.g., a scanned receipt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attachment {
    /// The ID of the attachment.
    pub id: AttachmentId,
    /// The filename the file was uploaded with.
    pub filename: String,
    /// Where the file is stored on disk.
    pub filepath: String,
    /// The ID of the expense the attachment belongs to.
    pub expense_id: ExpenseId,
    /// When the file was uploaded.
    #[serde(with = "time::serde::rfc3339")]
    pub uploaded_at: OffsetDateTime,
}

/// The contents of a file upload before it has been persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct AttachmentUpload {
    /// The filename supplied by the client.
    pub filename: String,
    /// The raw file contents.
    pub bytes: Vec<u8>,
}

/// The subset of attachment fields exposed in expense JSON bodies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttachmentSummary {
    pub id: AttachmentId,
    pub filename: String,
}

impl From<Attachment> for AttachmentSummary {
    fn from(attachment: Attachment) -> Self {
        Self {
            id: attachment.id,
            filename: attachment.filename,
        }
    }
}
