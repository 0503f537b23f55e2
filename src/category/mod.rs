//! Category management: the domain type, database operations and endpoints.
//!
//! A category groups a user's expenses, e.g., 'Travel', 'Office Supplies'.
//! An expense may reference at most one category.

mod db;
mod domain;
mod endpoints;

pub use db::{
    count_expenses, create_category, create_category_table, delete_category, get_all_categories,
    get_category, update_category,
};
pub use domain::{Category, CategoryId, CategoryName};
pub use endpoints::{
    create_category_endpoint, delete_category_endpoint, list_categories_endpoint,
    update_category_endpoint,
};
