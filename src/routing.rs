//! Application router configuration with protected and unprotected route
//! definitions.

use axum::{
    Router, middleware,
    routing::{get, post, put},
};

use crate::{
    attachment::upload_attachment_endpoint,
    auth_middleware::auth_guard,
    category::{
        create_category_endpoint, delete_category_endpoint, list_categories_endpoint,
        update_category_endpoint,
    },
    endpoints,
    expense::{
        create_expense_endpoint, delete_expense_endpoint, delete_expense_v1_endpoint,
        get_expense_v1_endpoint, list_expenses_endpoint, list_expenses_v1_endpoint,
        update_expense_endpoint,
    },
    export::{
        export_excel_endpoint, export_history_csv_endpoint, export_json_endpoint,
        export_pdf_endpoint, export_period_csv_endpoint,
    },
    log_in::post_log_in,
    log_out::get_log_out,
    logging::logging_middleware,
    register_user::register_user,
    report::{report_data_endpoint, year_report_endpoint},
    state::AppState,
};

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    let unprotected_routes = Router::new()
        .route(endpoints::USERS, post(register_user))
        .route(endpoints::LOG_IN, post(post_log_in))
        .route(endpoints::LOG_OUT, get(get_log_out));

    let protected_routes = Router::new()
        .route(
            endpoints::EXPENSES,
            get(list_expenses_endpoint).post(create_expense_endpoint),
        )
        .route(
            endpoints::EXPENSE,
            put(update_expense_endpoint).delete(delete_expense_endpoint),
        )
        .route(endpoints::REPORT_DATA, get(report_data_endpoint))
        .route(endpoints::EXPORT_EXCEL, get(export_excel_endpoint))
        .route(endpoints::EXPORT_PDF, get(export_pdf_endpoint))
        .route(endpoints::EXPORT_CSV_PERIOD, get(export_period_csv_endpoint))
        .route(endpoints::EXPORT_CSV, get(export_history_csv_endpoint))
        .route(
            endpoints::API_V1_EXPENSES,
            get(list_expenses_v1_endpoint).post(create_expense_endpoint),
        )
        .route(
            endpoints::API_V1_EXPENSE,
            get(get_expense_v1_endpoint)
                .put(update_expense_endpoint)
                .delete(delete_expense_v1_endpoint),
        )
        .route(
            endpoints::API_V1_EXPENSE_ATTACHMENTS,
            post(upload_attachment_endpoint),
        )
        .route(
            endpoints::API_V1_CATEGORIES,
            get(list_categories_endpoint).post(create_category_endpoint),
        )
        .route(
            endpoints::API_V1_CATEGORY,
            put(update_category_endpoint).delete(delete_category_endpoint),
        )
        .route(endpoints::API_V1_EXPORT, get(export_json_endpoint))
        .route(endpoints::API_V1_REPORT, get(year_report_endpoint))
        .layer(middleware::from_fn_with_state(state.clone(), auth_guard));

    unprotected_routes
        .merge(protected_routes)
        .layer(middleware::from_fn(logging_middleware))
        .with_state(state)
}
