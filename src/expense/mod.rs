//! Expense management for the application.
//!
//! This module contains everything related to expenses:
//! - The `Expense` model, validated `NewExpense` and partial `UpdateExpense`
//! - Ownership-scoped database functions for storing, querying and managing
//!   expenses, including atomic attachment persistence
//! - The materialized row query used by reports and exports
//! - The JSON endpoints for the legacy and v1 API surfaces

mod db;
mod domain;
mod endpoints;
mod query;

pub use db::{
    ExpenseFilter, create_expense, create_expense_table, delete_expense, get_expense,
    get_expense_with_category, list_all_expenses_with_category, list_expenses, update_expense,
};
pub use domain::{
    DATE_FORMAT, Expense, ExpenseId, NewExpense, UpdateExpense, format_date, parse_date,
};
pub use endpoints::{
    ExpenseBody, ExpenseListBody, create_expense_endpoint, delete_expense_endpoint,
    delete_expense_v1_endpoint, get_expense_v1_endpoint, list_expenses_endpoint,
    list_expenses_v1_endpoint, update_expense_endpoint,
};
pub use query::{ExpenseRow, SortOrder, get_expense_rows_in_range};
