//! JSON endpoints for expenses.
//!
//! Two surfaces share these handlers: the legacy routes under `/api` (flat
//! list, empty 204 delete) and the v1 routes under `/api/v1` (paginated list,
//! message-body delete).

use std::{
    path::PathBuf,
    sync::{Arc, Mutex},
};

use axum::{
    Extension, Json,
    extract::{FromRef, Path, Query, State},
    http::StatusCode,
};
use rusqlite::Connection;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use time::{Date, OffsetDateTime};

use crate::{
    Error,
    attachment::{AttachmentSummary, get_attachments_for_expense},
    category::CategoryId,
    expense::{
        Expense, ExpenseFilter, ExpenseId, NewExpense, UpdateExpense, create_expense,
        delete_expense, get_expense_with_category, list_all_expenses_with_category, list_expenses,
        parse_date, update_expense,
    },
    pagination::PaginationConfig,
    state::{AppState, lock_connection},
    user::UserID,
};

/// The state needed for the expense endpoints.
#[derive(Debug, Clone)]
pub struct ExpenseEndpointState {
    pub db_connection: Arc<Mutex<Connection>>,
    pub upload_dir: PathBuf,
    pub pagination_config: PaginationConfig,
}

impl FromRef<AppState> for ExpenseEndpointState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            upload_dir: state.upload_dir.clone(),
            pagination_config: state.pagination_config.clone(),
        }
    }
}

/// An expense as returned to clients: the row plus its resolved category name
/// and attachment summaries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpenseBody {
    #[serde(flatten)]
    pub expense: Expense,
    pub category: Option<String>,
    pub attachments: Vec<AttachmentSummary>,
}

/// The fields accepted when creating an expense.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateExpenseForm {
    pub title: String,
    pub amount: Decimal,
    /// `YYYY-MM-DD`; defaults to today (UTC) when absent.
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub category_id: Option<CategoryId>,
}

/// The query parameters accepted by the paginated expense list.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListExpensesQuery {
    pub page: Option<u64>,
    pub per_page: Option<u64>,
    pub category_id: Option<CategoryId>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

/// A page of expenses in the shape the v1 API clients expect.
#[derive(Debug, Serialize, Deserialize)]
pub struct ExpenseListBody {
    pub expenses: Vec<ExpenseBody>,
    pub total: u64,
    pub pages: u64,
    pub current_page: u64,
}

/// List the acting user's expenses with filters and pagination (v1 surface).
pub async fn list_expenses_v1_endpoint(
    State(state): State<ExpenseEndpointState>,
    Extension(user_id): Extension<UserID>,
    Query(query): Query<ListExpensesQuery>,
) -> Result<Json<ExpenseListBody>, Error> {
    let config = &state.pagination_config;
    let filter = ExpenseFilter {
        category_id: query.category_id,
        start_date: parse_date_param(query.start_date.as_deref()),
        end_date: parse_date_param(query.end_date.as_deref()),
        page: query.page.unwrap_or(config.default_page),
        per_page: query
            .per_page
            .unwrap_or(config.default_page_size)
            .min(config.max_page_size),
    };

    let connection = lock_connection(&state.db_connection)?;
    let page = list_expenses(user_id, &filter, &connection)?;

    let expenses = page
        .items
        .into_iter()
        .map(|(expense, category)| expense_body(expense, category, &connection))
        .collect::<Result<Vec<_>, Error>>()?;

    Ok(Json(ExpenseListBody {
        expenses,
        total: page.total,
        pages: page.pages,
        current_page: page.current_page,
    }))
}

/// List all of the acting user's expenses, newest first (legacy surface).
pub async fn list_expenses_endpoint(
    State(state): State<ExpenseEndpointState>,
    Extension(user_id): Extension<UserID>,
) -> Result<Json<Vec<ExpenseBody>>, Error> {
    let connection = lock_connection(&state.db_connection)?;

    let expenses = list_all_expenses_with_category(user_id, &connection)?
        .into_iter()
        .map(|(expense, category)| expense_body(expense, category, &connection))
        .collect::<Result<Vec<_>, Error>>()?;

    Ok(Json(expenses))
}

/// Get a single expense owned by the acting user.
pub async fn get_expense_v1_endpoint(
    State(state): State<ExpenseEndpointState>,
    Extension(user_id): Extension<UserID>,
    Path(expense_id): Path<ExpenseId>,
) -> Result<Json<ExpenseBody>, Error> {
    let connection = lock_connection(&state.db_connection)?;
    let (expense, category) = get_expense_with_category(user_id, expense_id, &connection)?;

    Ok(Json(expense_body(expense, category, &connection)?))
}

/// Create an expense from a JSON body.
pub async fn create_expense_endpoint(
    State(state): State<ExpenseEndpointState>,
    Extension(user_id): Extension<UserID>,
    Json(form): Json<CreateExpenseForm>,
) -> Result<(StatusCode, Json<ExpenseBody>), Error> {
    let date = match form.date.as_deref() {
        Some(text) => parse_date(text)?,
        None => OffsetDateTime::now_utc().date(),
    };
    let new_expense = NewExpense::new(&form.title, form.amount, date)?
        .with_description(form.description)
        .with_category(form.category_id);

    let connection = lock_connection(&state.db_connection)?;
    let expense = create_expense(user_id, new_expense, None, &state.upload_dir, &connection)?;
    let (expense, category) = get_expense_with_category(user_id, expense.id, &connection)?;

    Ok((
        StatusCode::CREATED,
        Json(expense_body(expense, category, &connection)?),
    ))
}

/// Apply a partial update to an expense.
pub async fn update_expense_endpoint(
    State(state): State<ExpenseEndpointState>,
    Extension(user_id): Extension<UserID>,
    Path(expense_id): Path<ExpenseId>,
    Json(update): Json<UpdateExpense>,
) -> Result<Json<ExpenseBody>, Error> {
    let connection = lock_connection(&state.db_connection)?;
    update_expense(
        user_id,
        expense_id,
        update,
        None,
        &state.upload_dir,
        &connection,
    )?;
    let (expense, category) = get_expense_with_category(user_id, expense_id, &connection)?;

    Ok(Json(expense_body(expense, category, &connection)?))
}

/// Delete an expense (legacy surface, empty 204 response).
pub async fn delete_expense_endpoint(
    State(state): State<ExpenseEndpointState>,
    Extension(user_id): Extension<UserID>,
    Path(expense_id): Path<ExpenseId>,
) -> Result<StatusCode, Error> {
    let connection = lock_connection(&state.db_connection)?;
    delete_expense(user_id, expense_id, &connection)?;

    Ok(StatusCode::NO_CONTENT)
}

/// Delete an expense (v1 surface, message body).
pub async fn delete_expense_v1_endpoint(
    State(state): State<ExpenseEndpointState>,
    Extension(user_id): Extension<UserID>,
    Path(expense_id): Path<ExpenseId>,
) -> Result<Json<Value>, Error> {
    let connection = lock_connection(&state.db_connection)?;
    delete_expense(user_id, expense_id, &connection)?;

    Ok(Json(json!({ "message": "Expense deleted successfully" })))
}

/// Parse an optional date query parameter.
///
/// Malformed dates are treated as absent rather than as an error, so filters
/// are applied partially.
fn parse_date_param(param: Option<&str>) -> Option<Date> {
    param.and_then(|text| parse_date(text).ok())
}

fn expense_body(
    expense: Expense,
    category: Option<String>,
    connection: &Connection,
) -> Result<ExpenseBody, Error> {
    let attachments = get_attachments_for_expense(expense.id, connection)?
        .into_iter()
        .map(AttachmentSummary::from)
        .collect();

    Ok(ExpenseBody {
        expense,
        category,
        attachments,
    })
}

#[cfg(test)]
mod expense_endpoint_tests {
    use std::sync::{Arc, Mutex};

    use axum::{
        Extension, Json,
        extract::{Path, Query, State},
        http::StatusCode,
    };
    use rusqlite::Connection;
    use rust_decimal_macros::dec;
    use time::macros::date;

    use crate::{
        Error,
        category::{CategoryName, create_category},
        db::initialize,
        expense::UpdateExpense,
        pagination::PaginationConfig,
        password::PasswordHash,
        user::{UserID, create_user},
    };

    use super::{
        CreateExpenseForm, ExpenseEndpointState, ListExpensesQuery, create_expense_endpoint,
        delete_expense_endpoint, get_expense_v1_endpoint, list_expenses_v1_endpoint,
        parse_date_param, update_expense_endpoint,
    };

    fn get_test_state() -> (ExpenseEndpointState, UserID) {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).expect("Could not initialize database");
        let user = create_user(
            "alice",
            "alice@example.com",
            PasswordHash::new_unchecked("hunter2"),
            &connection,
        )
        .unwrap();

        (
            ExpenseEndpointState {
                db_connection: Arc::new(Mutex::new(connection)),
                upload_dir: std::env::temp_dir(),
                pagination_config: PaginationConfig::default(),
            },
            user.id,
        )
    }

    fn coffee_form() -> CreateExpenseForm {
        CreateExpenseForm {
            title: "Coffee".to_owned(),
            amount: dec!(4.50),
            date: Some("2024-01-05".to_owned()),
            description: None,
            category_id: None,
        }
    }

    #[tokio::test]
    async fn create_then_get_round_trips() {
        let (state, user_id) = get_test_state();

        let (status, Json(created)) = create_expense_endpoint(
            State(state.clone()),
            Extension(user_id),
            Json(coffee_form()),
        )
        .await
        .expect("Could not create expense");

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(created.expense.title, "Coffee");
        assert_eq!(created.expense.date, date!(2024 - 01 - 05));

        let Json(fetched) = get_expense_v1_endpoint(
            State(state),
            Extension(user_id),
            Path(created.expense.id),
        )
        .await
        .expect("Could not get expense");

        assert_eq!(fetched, created);
    }

    #[tokio::test]
    async fn create_resolves_category_name() {
        let (state, user_id) = get_test_state();
        let category_id = {
            let connection = state.db_connection.lock().unwrap();
            create_category(
                user_id,
                CategoryName::new_unchecked("Office"),
                None,
                &connection,
            )
            .unwrap()
            .id
        };

        let form = CreateExpenseForm {
            category_id: Some(category_id),
            ..coffee_form()
        };
        let (_, Json(created)) =
            create_expense_endpoint(State(state), Extension(user_id), Json(form))
                .await
                .unwrap();

        assert_eq!(created.category.as_deref(), Some("Office"));
    }

    #[tokio::test]
    async fn create_rejects_malformed_date() {
        let (state, user_id) = get_test_state();

        let form = CreateExpenseForm {
            date: Some("05/01/2024".to_owned()),
            ..coffee_form()
        };
        let result = create_expense_endpoint(State(state), Extension(user_id), Json(form)).await;

        assert!(matches!(result, Err(Error::InvalidDateFormat(_))));
    }

    #[tokio::test]
    async fn list_paginates_and_filters() {
        let (state, user_id) = get_test_state();
        for day in 1..=3 {
            let form = CreateExpenseForm {
                date: Some(format!("2024-01-0{day}")),
                ..coffee_form()
            };
            create_expense_endpoint(State(state.clone()), Extension(user_id), Json(form))
                .await
                .unwrap();
        }

        let query = ListExpensesQuery {
            per_page: Some(2),
            ..Default::default()
        };
        let Json(body) = list_expenses_v1_endpoint(State(state), Extension(user_id), Query(query))
            .await
            .expect("Could not list expenses");

        assert_eq!(body.total, 3);
        assert_eq!(body.pages, 2);
        assert_eq!(body.current_page, 1);
        assert_eq!(body.expenses.len(), 2);
        assert_eq!(body.expenses[0].expense.date, date!(2024 - 01 - 03));
    }

    #[tokio::test]
    async fn malformed_filter_dates_are_ignored() {
        let (state, user_id) = get_test_state();
        create_expense_endpoint(
            State(state.clone()),
            Extension(user_id),
            Json(coffee_form()),
        )
        .await
        .unwrap();

        let query = ListExpensesQuery {
            start_date: Some("not-a-date".to_owned()),
            ..Default::default()
        };
        let Json(body) = list_expenses_v1_endpoint(State(state), Extension(user_id), Query(query))
            .await
            .expect("Malformed dates should not error");

        assert_eq!(body.total, 1);
    }

    #[tokio::test]
    async fn update_changes_amount_only() {
        let (state, user_id) = get_test_state();
        let (_, Json(created)) = create_expense_endpoint(
            State(state.clone()),
            Extension(user_id),
            Json(coffee_form()),
        )
        .await
        .unwrap();

        let update = UpdateExpense {
            amount: Some(dec!(5.25)),
            ..Default::default()
        };
        let Json(updated) = update_expense_endpoint(
            State(state),
            Extension(user_id),
            Path(created.expense.id),
            Json(update),
        )
        .await
        .expect("Could not update expense");

        assert_eq!(updated.expense.amount, dec!(5.25));
        assert_eq!(updated.expense.title, "Coffee");
    }

    #[tokio::test]
    async fn delete_returns_no_content() {
        let (state, user_id) = get_test_state();
        let (_, Json(created)) = create_expense_endpoint(
            State(state.clone()),
            Extension(user_id),
            Json(coffee_form()),
        )
        .await
        .unwrap();

        let status =
            delete_expense_endpoint(State(state.clone()), Extension(user_id), Path(created.expense.id))
                .await
                .expect("Could not delete expense");

        assert_eq!(status, StatusCode::NO_CONTENT);

        let result =
            get_expense_v1_endpoint(State(state), Extension(user_id), Path(created.expense.id))
                .await;
        assert!(matches!(result, Err(Error::NotFound)));
    }

    #[test]
    fn parse_date_param_ignores_garbage() {
        assert_eq!(parse_date_param(Some("banana")), None);
        assert_eq!(parse_date_param(None), None);
        assert_eq!(
            parse_date_param(Some("2024-01-05")),
            Some(date!(2024 - 01 - 05))
        );
    }
}
