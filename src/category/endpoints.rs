//! JSON endpoints for listing and managing categories.

use std::sync::{Arc, Mutex};

use axum::{
    Extension, Json,
    extract::{FromRef, Path, State},
    http::StatusCode,
};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::{
    Error,
    category::{
        Category, CategoryId, CategoryName, count_expenses, create_category, delete_category,
        get_all_categories, update_category,
    },
    state::{AppState, lock_connection},
    user::UserID,
};

/// The state needed for the category endpoints.
#[derive(Debug, Clone)]
pub struct CategoryEndpointState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CategoryEndpointState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The fields accepted when creating or updating a category.
#[derive(Debug, Clone, Deserialize)]
pub struct CategoryFormData {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// A category plus the number of expenses that reference it.
#[derive(Debug, Serialize)]
pub struct CategorySummary {
    pub id: CategoryId,
    pub name: String,
    pub description: Option<String>,
    pub expense_count: i64,
}

#[derive(Debug, Serialize)]
pub struct CategoryListBody {
    pub categories: Vec<CategorySummary>,
}

/// List the acting user's categories with their expense counts.
pub async fn list_categories_endpoint(
    State(state): State<CategoryEndpointState>,
    Extension(user_id): Extension<UserID>,
) -> Result<Json<CategoryListBody>, Error> {
    let connection = lock_connection(&state.db_connection)?;

    let categories = get_all_categories(user_id, &connection)?
        .into_iter()
        .map(|category| {
            let expense_count = count_expenses(user_id, category.id, &connection)?;

            Ok(CategorySummary {
                id: category.id,
                name: category.name.to_string(),
                description: category.description,
                expense_count,
            })
        })
        .collect::<Result<Vec<_>, Error>>()?;

    Ok(Json(CategoryListBody { categories }))
}

/// Create a category from a JSON body.
pub async fn create_category_endpoint(
    State(state): State<CategoryEndpointState>,
    Extension(user_id): Extension<UserID>,
    Json(form): Json<CategoryFormData>,
) -> Result<(StatusCode, Json<Category>), Error> {
    let name = CategoryName::new(&form.name)?;
    let connection = lock_connection(&state.db_connection)?;

    let category = create_category(user_id, name, form.description, &connection)?;

    Ok((StatusCode::CREATED, Json(category)))
}

/// Update a category's name and description.
pub async fn update_category_endpoint(
    State(state): State<CategoryEndpointState>,
    Extension(user_id): Extension<UserID>,
    Path(category_id): Path<CategoryId>,
    Json(form): Json<CategoryFormData>,
) -> Result<Json<Category>, Error> {
    let name = CategoryName::new(&form.name)?;
    let connection = lock_connection(&state.db_connection)?;

    let category = update_category(user_id, category_id, name, form.description, &connection)?;

    Ok(Json(category))
}

/// Delete a category. Expenses referencing it are kept with their category
/// cleared.
pub async fn delete_category_endpoint(
    State(state): State<CategoryEndpointState>,
    Extension(user_id): Extension<UserID>,
    Path(category_id): Path<CategoryId>,
) -> Result<Json<Value>, Error> {
    let connection = lock_connection(&state.db_connection)?;

    delete_category(user_id, category_id, &connection)?;

    Ok(Json(json!({ "message": "Category deleted successfully" })))
}
