//! The `Expense` model and the types used to create and update expenses.

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use time::{Date, OffsetDateTime, format_description::BorrowedFormatItem, macros::format_description};

use crate::{Error, category::CategoryId, user::UserID};

/// The row ID of an expense in the application database.
pub type ExpenseId = i64;

/// The format for expense dates in request parameters, CSV output and report
/// labels.
pub const DATE_FORMAT: &[BorrowedFormatItem] = format_description!("[year]-[month]-[day]");

time::serde::format_description!(iso_date, Date, "[year]-[month]-[day]");

/// Format a calendar date as `YYYY-MM-DD`.
pub fn format_date(date: Date) -> String {
    format!(
        "{:04}-{:02}-{:02}",
        date.year(),
        u8::from(date.month()),
        date.day()
    )
}

/// Parse a `YYYY-MM-DD` string as a calendar date.
///
/// # Errors
///
/// Returns [Error::InvalidDateFormat] if `text` is not a valid date.
pub fn parse_date(text: &str) -> Result<Date, Error> {
    Date::parse(text, DATE_FORMAT).map_err(|_| Error::InvalidDateFormat(text.to_owned()))
}

/// A single expense recorded by a user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    /// The ID of the expense.
    pub id: ExpenseId,
    /// A short label for what the money was spent on.
    pub title: String,
    /// The amount of money spent. Always greater than zero.
    pub amount: Decimal,
    /// The day the expense happened.
    #[serde(with = "iso_date")]
    pub date: Date,
    /// Free-form notes about the expense.
    pub description: Option<String>,
    /// The category the expense belongs to, if any.
    pub category_id: Option<CategoryId>,
    /// The ID of the user that owns the expense. Never changes.
    pub user_id: UserID,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

/// The validated fields for creating an expense.
///
/// Construct with [NewExpense::new] which enforces the title and amount
/// invariants.
#[derive(Debug, Clone, PartialEq)]
pub struct NewExpense {
    pub title: String,
    pub amount: Decimal,
    pub date: Date,
    pub description: Option<String>,
    pub category_id: Option<CategoryId>,
}

impl NewExpense {
    /// Create the fields for a new expense.
    ///
    /// # Errors
    ///
    /// Returns [Error::EmptyTitle] if `title` is empty or whitespace, and
    /// [Error::NonPositiveAmount] if `amount` is zero or negative.
    pub fn new(title: &str, amount: Decimal, date: Date) -> Result<Self, Error> {
        if title.trim().is_empty() {
            return Err(Error::EmptyTitle);
        }

        if amount <= Decimal::ZERO {
            return Err(Error::NonPositiveAmount);
        }

        Ok(Self {
            title: title.to_owned(),
            amount,
            date,
            description: None,
            category_id: None,
        })
    }

    /// Set the free-form description.
    pub fn with_description(mut self, description: Option<String>) -> Self {
        self.description = description;
        self
    }

    /// Set the candidate category. Ownership of the category is checked when
    /// the expense is persisted, not here.
    pub fn with_category(mut self, category_id: Option<CategoryId>) -> Self {
        self.category_id = category_id;
        self
    }
}

/// A partial update to an expense. Fields that are `None` are left unchanged.
///
/// `description` and `category_id` are doubly optional so a JSON `null` can
/// clear the stored value while an absent field leaves it alone.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateExpense {
    pub title: Option<String>,
    pub amount: Option<Decimal>,
    #[serde(default, with = "iso_date::option")]
    pub date: Option<Date>,
    #[serde(default, deserialize_with = "double_option")]
    pub description: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub category_id: Option<Option<CategoryId>>,
}

fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Deserialize::deserialize(deserializer).map(Some)
}



#[cfg(test)]
mod update_expense_tests {
    use super::UpdateExpense;

    #[test]
    fn absent_fields_deserialize_to_none() {
        let update: UpdateExpense = serde_json::from_str("{}").unwrap();

        assert!(update.title.is_none());
        assert!(update.description.is_none());
        assert!(update.category_id.is_none());
    }

    #[test]
    fn null_description_clears_the_value() {
        let update: UpdateExpense = serde_json::from_str(r#"{"description": null}"#).unwrap();

        assert_eq!(update.description, Some(None));
    }

    #[test]
    fn present_fields_deserialize_to_values() {
        let update: UpdateExpense =
            serde_json::from_str(r#"{"title": "Tea", "date": "2024-02-01", "category_id": 3}"#)
                .unwrap();

        assert_eq!(update.title.as_deref(), Some("Tea"));
        assert_eq!(update.date, Some(time::macros::date!(2024 - 02 - 01)));
        assert_eq!(update.category_id, Some(Some(3)));
    }
}
