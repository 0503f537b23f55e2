//! Database operations for categories.
//!
//! Every query is scoped to the acting user: rows owned by another user are
//! reported as [Error::NotFound], indistinguishable from rows that do not
//! exist.

use rusqlite::{Connection, Row};
use time::OffsetDateTime;

use crate::{
    Error,
    category::{Category, CategoryId, CategoryName},
    user::UserID,
};

/// Initialize the category table and indexes.
pub fn create_category_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS category (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL,
            description TEXT,
            user_id INTEGER NOT NULL REFERENCES user(id) ON DELETE CASCADE,
            created_at TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_category_user ON category(user_id);",
    )?;

    Ok(())
}

/// Create a category owned by `user_id` and return it with its generated ID.
pub fn create_category(
    user_id: UserID,
    name: CategoryName,
    description: Option<String>,
    connection: &Connection,
) -> Result<Category, Error> {
    let created_at = OffsetDateTime::now_utc();

    connection.execute(
        "INSERT INTO category (name, description, user_id, created_at) VALUES (?1, ?2, ?3, ?4)",
        (name.as_ref(), &description, user_id.as_i64(), created_at),
    )?;

    Ok(Category {
        id: connection.last_insert_rowid(),
        name,
        description,
        user_id,
        created_at,
    })
}

/// Retrieve a single category owned by `user_id`.
pub fn get_category(
    user_id: UserID,
    category_id: CategoryId,
    connection: &Connection,
) -> Result<Category, Error> {
    connection
        .prepare(
            "SELECT id, name, description, user_id, created_at FROM category \
            WHERE id = :id AND user_id = :user_id",
        )?
        .query_row(
            &[(":id", &category_id), (":user_id", &user_id.as_i64())],
            map_row,
        )
        .map_err(|error| error.into())
}

/// Retrieve all of a user's categories ordered alphabetically by name.
pub fn get_all_categories(user_id: UserID, connection: &Connection) -> Result<Vec<Category>, Error> {
    connection
        .prepare(
            "SELECT id, name, description, user_id, created_at FROM category \
            WHERE user_id = :user_id ORDER BY name ASC",
        )?
        .query_map(&[(":user_id", &user_id.as_i64())], map_row)?
        .map(|maybe_category| maybe_category.map_err(|error| error.into()))
        .collect()
}

/// Update a category's name and description.
///
/// # Errors
/// Returns [Error::NotFound] if the category does not exist or is owned by
/// another user.
pub fn update_category(
    user_id: UserID,
    category_id: CategoryId,
    name: CategoryName,
    description: Option<String>,
    connection: &Connection,
) -> Result<Category, Error> {
    let rows_affected = connection.execute(
        "UPDATE category SET name = ?1, description = ?2 WHERE id = ?3 AND user_id = ?4",
        (name.as_ref(), &description, category_id, user_id.as_i64()),
    )?;

    if rows_affected == 0 {
        return Err(Error::NotFound);
    }

    get_category(user_id, category_id, connection)
}

/// Delete a category, clearing the category reference on any expenses that
/// use it. The expenses themselves are kept.
///
/// # Errors
/// Returns [Error::NotFound] if the category does not exist or is owned by
/// another user.
pub fn delete_category(
    user_id: UserID,
    category_id: CategoryId,
    connection: &Connection,
) -> Result<(), Error> {
    let transaction = connection.unchecked_transaction()?;

    // The nullify must happen before the delete while foreign keys are
    // enforced.
    transaction.execute(
        "UPDATE expense SET category_id = NULL WHERE category_id = ?1 AND user_id = ?2",
        (category_id, user_id.as_i64()),
    )?;

    let rows_affected = transaction.execute(
        "DELETE FROM category WHERE id = ?1 AND user_id = ?2",
        (category_id, user_id.as_i64()),
    )?;

    if rows_affected == 0 {
        return Err(Error::NotFound);
    }

    transaction.commit()?;

    Ok(())
}

/// Count the expenses of `user_id` that reference `category_id`.
pub fn count_expenses(
    user_id: UserID,
    category_id: CategoryId,
    connection: &Connection,
) -> Result<i64, Error> {
    connection
        .prepare("SELECT COUNT(*) FROM expense WHERE category_id = :id AND user_id = :user_id")?
        .query_row(
            &[(":id", &category_id), (":user_id", &user_id.as_i64())],
            |row| row.get(0),
        )
        .map_err(|error| error.into())
}

fn map_row(row: &Row) -> Result<Category, rusqlite::Error> {
    let raw_name: String = row.get(1)?;

    Ok(Category {
        id: row.get(0)?,
        name: CategoryName::new_unchecked(&raw_name),
        description: row.get(2)?,
        user_id: UserID::new(row.get(3)?),
        created_at: row.get(4)?,
    })
}
