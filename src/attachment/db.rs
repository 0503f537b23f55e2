//! Database operations for attachment rows.

use rusqlite::{Connection, Row};

use crate::{
    Error,
    attachment::{Attachment, AttachmentId},
    expense::ExpenseId,
};

/// Initialize the attachment table.
///
/// Attachment rows are deleted by the database when their expense row is
/// deleted; removing the backing files is the repository's job.
pub fn create_attachment_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS attachment (
            id INTEGER PRIMARY KEY,
            filename TEXT NOT NULL,
            filepath TEXT NOT NULL,
            expense_id INTEGER NOT NULL REFERENCES expense(id) ON DELETE CASCADE,
            uploaded_at TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_attachment_expense ON attachment(expense_id);",
    )?;

    Ok(())
}

/// Insert an attachment row and return it with its generated ID.
pub(super) fn insert_attachment(
    filename: &str,
    filepath: &str,
    expense_id: ExpenseId,
    uploaded_at: time::OffsetDateTime,
    connection: &Connection,
) -> Result<AttachmentId, Error> {
    connection.execute(
        "INSERT INTO attachment (filename, filepath, expense_id, uploaded_at) \
        VALUES (?1, ?2, ?3, ?4)",
        (filename, filepath, expense_id, uploaded_at),
    )?;

    Ok(connection.last_insert_rowid())
}

/// Retrieve the attachments belonging to an expense, oldest first.
pub fn get_attachments_for_expense(
    expense_id: ExpenseId,
    connection: &Connection,
) -> Result<Vec<Attachment>, Error> {
    connection
        .prepare(
            "SELECT id, filename, filepath, expense_id, uploaded_at FROM attachment \
            WHERE expense_id = :expense_id ORDER BY id ASC",
        )?
        .query_map(&[(":expense_id", &expense_id)], map_row)?
        .map(|maybe_attachment| maybe_attachment.map_err(|error| error.into()))
        .collect()
}

fn map_row(row: &Row) -> Result<Attachment, rusqlite::Error> {
    Ok(Attachment {
        id: row.get(0)?,
        filename: row.get(1)?,
        filepath: row.get(2)?,
        expense_id: row.get(3)?,
        uploaded_at: row.get(4)?,
    })
}
