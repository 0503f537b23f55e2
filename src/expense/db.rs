//! Database operations for expenses.
//!
//! Every query is scoped to the acting user. Attachment files are persisted
//! and removed together with their expense rows: a failed file write rolls
//! back the expense write, while file removal during delete is best-effort
//! and never fails the delete.

use std::path::Path;

use rusqlite::{Connection, Row, params, params_from_iter, types::Value};
use rust_decimal::Decimal;
use time::{Date, OffsetDateTime};

use crate::{
    Error,
    attachment::{
        AttachmentUpload, get_attachments_for_expense, remove_attachment_files,
        remove_stored_file, store_attachment,
    },
    category::CategoryId,
    expense::{Expense, ExpenseId, NewExpense, UpdateExpense, format_date},
    pagination::{Page, page_count},
    user::UserID,
};

/// Initialize the expense table and indexes.
pub fn create_expense_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS expense (
            id INTEGER PRIMARY KEY,
            title TEXT NOT NULL,
            amount TEXT NOT NULL,
            date TEXT NOT NULL,
            description TEXT,
            category_id INTEGER REFERENCES category(id),
            user_id INTEGER NOT NULL REFERENCES user(id) ON DELETE CASCADE,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_expense_user_date ON expense(user_id, date);",
    )?;

    Ok(())
}

/// The filters and paging accepted by [list_expenses].
#[derive(Debug, Clone)]
pub struct ExpenseFilter {
    /// Only return expenses in this category.
    pub category_id: Option<CategoryId>,
    /// Only return expenses on or after this date.
    pub start_date: Option<Date>,
    /// Only return expenses on or before this date.
    pub end_date: Option<Date>,
    /// The 1-based page number. Values below 1 are clamped to 1.
    pub page: u64,
    /// The number of rows per page. Values below 1 are clamped to 1.
    pub per_page: u64,
}

impl Default for ExpenseFilter {
    fn default() -> Self {
        Self {
            category_id: None,
            start_date: None,
            end_date: None,
            page: 1,
            per_page: 20,
        }
    }
}

/// Get a page of the user's expenses with their category names.
///
/// Rows are ordered by date descending, with ties broken by ID descending so
/// the ordering is stable across requests.
pub fn list_expenses(
    user_id: UserID,
    filter: &ExpenseFilter,
    connection: &Connection,
) -> Result<Page<(Expense, Option<String>)>, Error> {
    let mut conditions = String::from("expense.user_id = ?");
    let mut params: Vec<Value> = vec![Value::from(user_id.as_i64())];

    if let Some(category_id) = filter.category_id {
        conditions.push_str(" AND expense.category_id = ?");
        params.push(Value::from(category_id));
    }

    if let Some(start) = filter.start_date {
        conditions.push_str(" AND expense.date >= ?");
        params.push(Value::from(format_date(start)));
    }

    if let Some(end) = filter.end_date {
        conditions.push_str(" AND expense.date <= ?");
        params.push(Value::from(format_date(end)));
    }

    let total: i64 = connection
        .prepare(&format!("SELECT COUNT(*) FROM expense WHERE {conditions}"))?
        .query_row(params_from_iter(params.iter().cloned()), |row| row.get(0))?;
    let total = total.max(0) as u64;

    let page = filter.page.max(1);
    let per_page = filter.per_page.max(1);

    let query = format!(
        "SELECT expense.id, expense.title, expense.amount, expense.date, expense.description, \
        expense.category_id, expense.user_id, expense.created_at, expense.updated_at, \
        category.name \
        FROM expense LEFT JOIN category ON expense.category_id = category.id \
        WHERE {conditions} \
        ORDER BY expense.date DESC, expense.id DESC LIMIT ? OFFSET ?"
    );
    params.push(Value::from(per_page as i64));
    params.push(Value::from(((page - 1) * per_page) as i64));

    let items = connection
        .prepare(&query)?
        .query_map(params_from_iter(params), |row| {
            let expense = map_row(row)?;
            let category_name: Option<String> = row.get(9)?;

            Ok((expense, category_name))
        })?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Page {
        items,
        total,
        pages: page_count(total, per_page),
        current_page: page,
    })
}

/// Get all of the user's expenses with their category names, ordered by date
/// descending (ties broken by ID descending).
pub fn list_all_expenses_with_category(
    user_id: UserID,
    connection: &Connection,
) -> Result<Vec<(Expense, Option<String>)>, Error> {
    connection
        .prepare(
            "SELECT expense.id, expense.title, expense.amount, expense.date, \
            expense.description, expense.category_id, expense.user_id, expense.created_at, \
            expense.updated_at, category.name \
            FROM expense LEFT JOIN category ON expense.category_id = category.id \
            WHERE expense.user_id = :user_id \
            ORDER BY expense.date DESC, expense.id DESC",
        )?
        .query_map(&[(":user_id", &user_id.as_i64())], |row| {
            let expense = map_row(row)?;
            let category_name: Option<String> = row.get(9)?;

            Ok((expense, category_name))
        })?
        .map(|maybe_row| maybe_row.map_err(|error| error.into()))
        .collect()
}

/// Get a single expense owned by `user_id`.
///
/// # Errors
/// Returns [Error::NotFound] if the expense does not exist or is owned by
/// another user.
pub fn get_expense(
    user_id: UserID,
    expense_id: ExpenseId,
    connection: &Connection,
) -> Result<Expense, Error> {
    connection
        .prepare(
            "SELECT id, title, amount, date, description, category_id, user_id, created_at, \
            updated_at FROM expense WHERE id = :id AND user_id = :user_id",
        )?
        .query_row(
            &[(":id", &expense_id), (":user_id", &user_id.as_i64())],
            map_row,
        )
        .map_err(|error| error.into())
}

/// Get a single expense owned by `user_id` along with its category name.
pub fn get_expense_with_category(
    user_id: UserID,
    expense_id: ExpenseId,
    connection: &Connection,
) -> Result<(Expense, Option<String>), Error> {
    connection
        .prepare(
            "SELECT expense.id, expense.title, expense.amount, expense.date, \
            expense.description, expense.category_id, expense.user_id, expense.created_at, \
            expense.updated_at, category.name \
            FROM expense LEFT JOIN category ON expense.category_id = category.id \
            WHERE expense.id = :id AND expense.user_id = :user_id",
        )?
        .query_row(
            &[(":id", &expense_id), (":user_id", &user_id.as_i64())],
            |row| {
                let expense = map_row(row)?;
                let category_name: Option<String> = row.get(9)?;

                Ok((expense, category_name))
            },
        )
        .map_err(|error| error.into())
}

/// Create an expense, optionally persisting an attachment in the same
/// transaction.
///
/// The candidate category is stored only if it is owned by `user_id`,
/// otherwise the expense is stored without a category. If the attachment file
/// cannot be written the expense row is rolled back.
pub fn create_expense(
    user_id: UserID,
    new_expense: NewExpense,
    attachment: Option<AttachmentUpload>,
    upload_dir: &Path,
    connection: &Connection,
) -> Result<Expense, Error> {
    let transaction = connection.unchecked_transaction()?;

    let category_id = resolve_category(user_id, new_expense.category_id, &transaction)?;
    let now = OffsetDateTime::now_utc();

    transaction.execute(
        "INSERT INTO expense (title, amount, date, description, category_id, user_id, \
        created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        params![
            new_expense.title,
            new_expense.amount.to_string(),
            new_expense.date,
            new_expense.description,
            category_id,
            user_id.as_i64(),
            now,
            now,
        ],
    )?;
    let id = transaction.last_insert_rowid();

    let stored_file = match attachment {
        Some(upload) => Some(store_attachment(id, &upload, upload_dir, &transaction)?),
        None => None,
    };

    if let Err(error) = transaction.commit() {
        if let Some(attachment) = stored_file {
            remove_stored_file(&attachment);
        }

        return Err(error.into());
    }

    Ok(Expense {
        id,
        title: new_expense.title,
        amount: new_expense.amount,
        date: new_expense.date,
        description: new_expense.description,
        category_id,
        user_id,
        created_at: now,
        updated_at: now,
    })
}

/// Apply a partial update to an expense, optionally persisting a newly
/// supplied attachment in the same transaction.
///
/// Only the fields present in `update` are changed. Changed amounts are
/// re-validated for positivity and changed categories for ownership.
pub fn update_expense(
    user_id: UserID,
    expense_id: ExpenseId,
    update: UpdateExpense,
    attachment: Option<AttachmentUpload>,
    upload_dir: &Path,
    connection: &Connection,
) -> Result<Expense, Error> {
    let transaction = connection.unchecked_transaction()?;

    let current = get_expense(user_id, expense_id, &transaction)?;

    let title = match update.title {
        Some(title) if title.trim().is_empty() => return Err(Error::EmptyTitle),
        Some(title) => title,
        None => current.title,
    };
    let amount = match update.amount {
        Some(amount) if amount <= Decimal::ZERO => return Err(Error::NonPositiveAmount),
        Some(amount) => amount,
        None => current.amount,
    };
    let date = update.date.unwrap_or(current.date);
    let description = update.description.unwrap_or(current.description);
    let category_id = match update.category_id {
        Some(candidate) => resolve_category(user_id, candidate, &transaction)?,
        None => current.category_id,
    };

    let updated_at = OffsetDateTime::now_utc();

    transaction.execute(
        "UPDATE expense SET title = ?1, amount = ?2, date = ?3, description = ?4, \
        category_id = ?5, updated_at = ?6 WHERE id = ?7 AND user_id = ?8",
        params![
            title,
            amount.to_string(),
            date,
            description,
            category_id,
            updated_at,
            expense_id,
            user_id.as_i64(),
        ],
    )?;

    let stored_file = match attachment {
        Some(upload) => Some(store_attachment(
            expense_id,
            &upload,
            upload_dir,
            &transaction,
        )?),
        None => None,
    };

    if let Err(error) = transaction.commit() {
        if let Some(attachment) = stored_file {
            remove_stored_file(&attachment);
        }

        return Err(error.into());
    }

    Ok(Expense {
        id: expense_id,
        title,
        amount,
        date,
        description,
        category_id,
        user_id,
        created_at: current.created_at,
        updated_at,
    })
}

/// Delete an expense, its attachment rows and their backing files.
///
/// Files are removed first, best-effort: a failure to remove one file is
/// logged and the remaining files and the row are still removed.
pub fn delete_expense(
    user_id: UserID,
    expense_id: ExpenseId,
    connection: &Connection,
) -> Result<(), Error> {
    get_expense(user_id, expense_id, connection)?;

    let attachments = get_attachments_for_expense(expense_id, connection)?;
    let failed_removals = remove_attachment_files(&attachments);
    if failed_removals > 0 {
        tracing::warn!(
            "{failed_removals} attachment file(s) could not be removed while deleting \
            expense {expense_id}"
        );
    }

    let rows_affected = connection.execute(
        "DELETE FROM expense WHERE id = ?1 AND user_id = ?2",
        (expense_id, user_id.as_i64()),
    )?;

    if rows_affected == 0 {
        return Err(Error::NotFound);
    }

    Ok(())
}

/// Resolve a candidate category reference against the user's categories.
///
/// Returns the ID unchanged when the category is owned by `user_id`, and
/// `None` when it is missing or owned by someone else, so an expense is
/// stored without a category rather than pointing at another user's data.
fn resolve_category(
    user_id: UserID,
    candidate: Option<CategoryId>,
    connection: &Connection,
) -> Result<Option<CategoryId>, Error> {
    let Some(category_id) = candidate else {
        return Ok(None);
    };

    let owned: bool = connection
        .prepare("SELECT EXISTS (SELECT 1 FROM category WHERE id = :id AND user_id = :user_id)")?
        .query_row(
            &[(":id", &category_id), (":user_id", &user_id.as_i64())],
            |row| row.get(0),
        )?;

    Ok(owned.then_some(category_id))
}

fn map_row(row: &Row) -> Result<Expense, rusqlite::Error> {
    let raw_amount: String = row.get(2)?;
    let amount = raw_amount.parse::<Decimal>().map_err(|error| {
        rusqlite::Error::FromSqlConversionFailure(2, rusqlite::types::Type::Text, Box::new(error))
    })?;

    Ok(Expense {
        id: row.get(0)?,
        title: row.get(1)?,
        amount,
        date: row.get(3)?,
        description: row.get(4)?,
        category_id: row.get(5)?,
        user_id: UserID::new(row.get(6)?),
        created_at: row.get(7)?,
        updated_at: row.get(8)?,
    })
}

#[cfg(test)]
mod expense_query_tests {
    use std::path::Path;

    use rusqlite::Connection;
    use rust_decimal_macros::dec;
    use time::macros::date;

    use crate::{
        Error,
        attachment::{AttachmentUpload, get_attachments_for_expense},
        category::{CategoryName, create_category},
        db::initialize,
        expense::{ExpenseFilter, NewExpense, UpdateExpense},
        password::PasswordHash,
        user::{User, create_user},
    };

    use super::{
        create_expense, delete_expense, get_expense, get_expense_with_category, list_expenses,
        update_expense,
    };

    fn get_test_db_connection() -> (Connection, User) {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).expect("Could not initialize database");

        let user = create_user(
            "alice",
            "alice@example.com",
            PasswordHash::new_unchecked("hunter2"),
            &connection,
        )
        .expect("Could not create test user");

        (connection, user)
    }

    fn insert_expense(
        connection: &Connection,
        user: &User,
        title: &str,
        amount: rust_decimal::Decimal,
        date: time::Date,
    ) -> crate::expense::Expense {
        let new_expense = NewExpense::new(title, amount, date).unwrap();
        create_expense(user.id, new_expense, None, Path::new("unused"), connection)
            .expect("Could not create expense")
    }

    #[test]
    fn create_and_get_round_trips() {
        let (connection, user) = get_test_db_connection();

        let inserted = insert_expense(&connection, &user, "Coffee", dec!(4.50), date!(2024 - 01 - 05));

        let selected = get_expense(user.id, inserted.id, &connection);
        assert_eq!(Ok(inserted), selected);
    }

    #[test]
    fn amounts_round_trip_exactly() {
        let (connection, user) = get_test_db_connection();

        let inserted = insert_expense(
            &connection,
            &user,
            "Oddly precise",
            dec!(0.1),
            date!(2024 - 01 - 05),
        );

        let selected = get_expense(user.id, inserted.id, &connection).unwrap();
        assert_eq!(selected.amount, dec!(0.1));
    }

    #[test]
    fn get_expense_owned_by_other_user_returns_not_found() {
        let (connection, user) = get_test_db_connection();
        let other_user = create_user(
            "bob",
            "bob@example.com",
            PasswordHash::new_unchecked("hunter2"),
            &connection,
        )
        .unwrap();
        let expense = insert_expense(
            &connection,
            &other_user,
            "Secret",
            dec!(1),
            date!(2024 - 01 - 05),
        );

        let result = get_expense(user.id, expense.id, &connection);

        assert_eq!(result, Err(Error::NotFound));
    }

    #[test]
    fn unowned_category_is_not_stored() {
        let (connection, user) = get_test_db_connection();
        let other_user = create_user(
            "bob",
            "bob@example.com",
            PasswordHash::new_unchecked("hunter2"),
            &connection,
        )
        .unwrap();
        let foreign_category = create_category(
            other_user.id,
            CategoryName::new_unchecked("Groceries"),
            None,
            &connection,
        )
        .unwrap();

        let new_expense = NewExpense::new("Coffee", dec!(4.50), date!(2024 - 01 - 05))
            .unwrap()
            .with_category(Some(foreign_category.id));
        let expense =
            create_expense(user.id, new_expense, None, Path::new("unused"), &connection).unwrap();

        assert_eq!(expense.category_id, None);
    }

    #[test]
    fn list_orders_by_date_then_id_descending() {
        let (connection, user) = get_test_db_connection();
        let first = insert_expense(&connection, &user, "Chair", dec!(120), date!(2024 - 01 - 20));
        let second = insert_expense(&connection, &user, "Coffee", dec!(4.50), date!(2024 - 01 - 05));
        let third = insert_expense(&connection, &user, "Tea", dec!(3), date!(2024 - 01 - 20));

        let page = list_expenses(user.id, &ExpenseFilter::default(), &connection).unwrap();

        let ids: Vec<_> = page.items.iter().map(|(expense, _)| expense.id).collect();
        // Same date: the later insert (higher ID) comes first.
        assert_eq!(ids, vec![third.id, first.id, second.id]);
        assert_eq!(page.total, 3);
        assert_eq!(page.pages, 1);
    }

    #[test]
    fn list_never_returns_other_users_expenses() {
        let (connection, user) = get_test_db_connection();
        let other_user = create_user(
            "bob",
            "bob@example.com",
            PasswordHash::new_unchecked("hunter2"),
            &connection,
        )
        .unwrap();
        insert_expense(&connection, &other_user, "Secret", dec!(1), date!(2024 - 01 - 05));
        let mine = insert_expense(&connection, &user, "Coffee", dec!(4.50), date!(2024 - 01 - 06));

        let page = list_expenses(user.id, &ExpenseFilter::default(), &connection).unwrap();

        assert_eq!(page.total, 1);
        assert_eq!(page.items[0].0.id, mine.id);
    }

    #[test]
    fn list_filters_by_category_and_date_range() {
        let (connection, user) = get_test_db_connection();
        let category = create_category(
            user.id,
            CategoryName::new_unchecked("Office"),
            None,
            &connection,
        )
        .unwrap();

        let new_expense = NewExpense::new("Chair", dec!(120), date!(2024 - 01 - 20))
            .unwrap()
            .with_category(Some(category.id));
        let chair =
            create_expense(user.id, new_expense, None, Path::new("unused"), &connection).unwrap();
        insert_expense(&connection, &user, "Coffee", dec!(4.50), date!(2024 - 01 - 05));
        insert_expense(&connection, &user, "Flight", dec!(300), date!(2024 - 02 - 01));

        let filter = ExpenseFilter {
            category_id: Some(category.id),
            start_date: Some(date!(2024 - 01 - 10)),
            end_date: Some(date!(2024 - 01 - 31)),
            ..Default::default()
        };
        let page = list_expenses(user.id, &filter, &connection).unwrap();

        assert_eq!(page.total, 1);
        assert_eq!(page.items[0].0.id, chair.id);
        assert_eq!(page.items[0].1.as_deref(), Some("Office"));
    }

    #[test]
    fn list_paginates() {
        let (connection, user) = get_test_db_connection();
        for day in 1..=5u8 {
            insert_expense(
                &connection,
                &user,
                &format!("expense #{day}"),
                dec!(1),
                date!(2024 - 01 - 01).replace_day(day).unwrap(),
            );
        }

        let filter = ExpenseFilter {
            page: 2,
            per_page: 2,
            ..Default::default()
        };
        let page = list_expenses(user.id, &filter, &connection).unwrap();

        assert_eq!(page.total, 5);
        assert_eq!(page.pages, 3);
        assert_eq!(page.current_page, 2);
        assert_eq!(page.items.len(), 2);
        // Date descending: page 2 holds days 3 and 2.
        assert_eq!(page.items[0].0.date, date!(2024 - 01 - 03));
        assert_eq!(page.items[1].0.date, date!(2024 - 01 - 02));
    }

    #[test]
    fn list_page_past_the_end_is_empty() {
        let (connection, user) = get_test_db_connection();
        insert_expense(&connection, &user, "Coffee", dec!(4.50), date!(2024 - 01 - 05));

        let filter = ExpenseFilter {
            page: 99,
            ..Default::default()
        };
        let page = list_expenses(user.id, &filter, &connection).unwrap();

        assert!(page.items.is_empty());
        assert_eq!(page.total, 1);
    }

    #[test]
    fn update_applies_only_supplied_fields() {
        let (connection, user) = get_test_db_connection();
        let expense = insert_expense(&connection, &user, "Coffee", dec!(4.50), date!(2024 - 01 - 05));

        let update = UpdateExpense {
            amount: Some(dec!(5.25)),
            ..Default::default()
        };
        let updated = update_expense(
            user.id,
            expense.id,
            update,
            None,
            Path::new("unused"),
            &connection,
        )
        .expect("Could not update expense");

        assert_eq!(updated.amount, dec!(5.25));
        assert_eq!(updated.title, "Coffee");
        assert_eq!(updated.date, expense.date);
    }

    #[test]
    fn update_rejects_non_positive_amount() {
        let (connection, user) = get_test_db_connection();
        let expense = insert_expense(&connection, &user, "Coffee", dec!(4.50), date!(2024 - 01 - 05));

        let update = UpdateExpense {
            amount: Some(dec!(0)),
            ..Default::default()
        };
        let result = update_expense(
            user.id,
            expense.id,
            update,
            None,
            Path::new("unused"),
            &connection,
        );

        assert_eq!(result, Err(Error::NonPositiveAmount));
    }

    #[test]
    fn update_clears_description_on_null() {
        let (connection, user) = get_test_db_connection();
        let new_expense = NewExpense::new("Coffee", dec!(4.50), date!(2024 - 01 - 05))
            .unwrap()
            .with_description(Some("with oat milk".to_owned()));
        let expense =
            create_expense(user.id, new_expense, None, Path::new("unused"), &connection).unwrap();

        let update = UpdateExpense {
            description: Some(None),
            ..Default::default()
        };
        let updated = update_expense(
            user.id,
            expense.id,
            update,
            None,
            Path::new("unused"),
            &connection,
        )
        .unwrap();

        assert_eq!(updated.description, None);
    }

    #[test]
    fn update_for_other_users_expense_returns_not_found() {
        let (connection, user) = get_test_db_connection();
        let other_user = create_user(
            "bob",
            "bob@example.com",
            PasswordHash::new_unchecked("hunter2"),
            &connection,
        )
        .unwrap();
        let expense = insert_expense(
            &connection,
            &other_user,
            "Secret",
            dec!(1),
            date!(2024 - 01 - 05),
        );

        let result = update_expense(
            user.id,
            expense.id,
            UpdateExpense::default(),
            None,
            Path::new("unused"),
            &connection,
        );

        assert_eq!(result, Err(Error::NotFound));
    }

    #[test]
    fn create_with_attachment_persists_row_and_file() {
        let (connection, user) = get_test_db_connection();
        let upload_dir = tempfile::tempdir().expect("Could not create temp dir");

        let new_expense = NewExpense::new("Printer", dec!(89.99), date!(2024 - 03 - 10)).unwrap();
        let upload = AttachmentUpload {
            filename: "receipt.pdf".to_owned(),
            bytes: b"%PDF-1.4 fake".to_vec(),
        };
        let expense = create_expense(
            user.id,
            new_expense,
            Some(upload),
            upload_dir.path(),
            &connection,
        )
        .expect("Could not create expense with attachment");

        let attachments = get_attachments_for_expense(expense.id, &connection).unwrap();
        assert_eq!(attachments.len(), 1);
        assert_eq!(attachments[0].filename, "receipt.pdf");
        assert!(Path::new(&attachments[0].filepath).is_file());
    }

    #[test]
    fn create_with_unwritable_upload_dir_rolls_back() {
        let (connection, user) = get_test_db_connection();

        let new_expense = NewExpense::new("Printer", dec!(89.99), date!(2024 - 03 - 10)).unwrap();
        let upload = AttachmentUpload {
            filename: "receipt.pdf".to_owned(),
            bytes: b"%PDF-1.4 fake".to_vec(),
        };
        let result = create_expense(
            user.id,
            new_expense,
            Some(upload),
            Path::new("/nonexistent/upload/dir"),
            &connection,
        );

        assert!(matches!(result, Err(Error::AttachmentWriteError(_))));

        let count: i64 = connection
            .query_row("SELECT COUNT(*) FROM expense", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 0, "the expense row should have been rolled back");
    }

    #[test]
    fn delete_removes_row_attachments_and_files() {
        let (connection, user) = get_test_db_connection();
        let upload_dir = tempfile::tempdir().expect("Could not create temp dir");

        let new_expense = NewExpense::new("Printer", dec!(89.99), date!(2024 - 03 - 10)).unwrap();
        let upload = AttachmentUpload {
            filename: "receipt.pdf".to_owned(),
            bytes: b"%PDF-1.4 fake".to_vec(),
        };
        let expense = create_expense(
            user.id,
            new_expense,
            Some(upload),
            upload_dir.path(),
            &connection,
        )
        .unwrap();
        let filepath = get_attachments_for_expense(expense.id, &connection).unwrap()[0]
            .filepath
            .clone();

        delete_expense(user.id, expense.id, &connection).expect("Could not delete expense");

        assert_eq!(
            get_expense(user.id, expense.id, &connection),
            Err(Error::NotFound)
        );
        assert!(
            get_attachments_for_expense(expense.id, &connection)
                .unwrap()
                .is_empty()
        );
        assert!(!Path::new(&filepath).exists());
    }

    #[test]
    fn delete_succeeds_even_when_a_file_is_already_gone() {
        let (connection, user) = get_test_db_connection();
        let upload_dir = tempfile::tempdir().expect("Could not create temp dir");

        let new_expense = NewExpense::new("Printer", dec!(89.99), date!(2024 - 03 - 10)).unwrap();
        let upload = AttachmentUpload {
            filename: "receipt.pdf".to_owned(),
            bytes: b"%PDF-1.4 fake".to_vec(),
        };
        let expense = create_expense(
            user.id,
            new_expense,
            Some(upload),
            upload_dir.path(),
            &connection,
        )
        .unwrap();
        let filepath = get_attachments_for_expense(expense.id, &connection).unwrap()[0]
            .filepath
            .clone();
        std::fs::remove_file(&filepath).unwrap();

        delete_expense(user.id, expense.id, &connection)
            .expect("Delete should not fail on missing files");
    }

    #[test]
    fn delete_for_other_users_expense_returns_not_found() {
        let (connection, user) = get_test_db_connection();
        let other_user = create_user(
            "bob",
            "bob@example.com",
            PasswordHash::new_unchecked("hunter2"),
            &connection,
        )
        .unwrap();
        let expense = insert_expense(
            &connection,
            &other_user,
            "Secret",
            dec!(1),
            date!(2024 - 01 - 05),
        );

        let result = delete_expense(user.id, expense.id, &connection);

        assert_eq!(result, Err(Error::NotFound));
        assert!(get_expense(other_user.id, expense.id, &connection).is_ok());
    }

    #[test]
    fn get_with_category_includes_name() {
        let (connection, user) = get_test_db_connection();
        let category = create_category(
            user.id,
            CategoryName::new_unchecked("Office"),
            None,
            &connection,
        )
        .unwrap();
        let new_expense = NewExpense::new("Chair", dec!(120), date!(2024 - 01 - 20))
            .unwrap()
            .with_category(Some(category.id));
        let expense =
            create_expense(user.id, new_expense, None, Path::new("unused"), &connection).unwrap();

        let (_, category_name) =
            get_expense_with_category(user.id, expense.id, &connection).unwrap();

        assert_eq!(category_name.as_deref(), Some("Office"));
    }
}
