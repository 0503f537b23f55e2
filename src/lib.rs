//! Outlay is a web app for tracking personal and business expenses.
//!
//! Users register and log in, record expenses against categories, browse and
//! filter their history, view aggregate reports, and download their data as
//! CSV, spreadsheet or PDF (with a category chart).
//!
//! This library provides the JSON REST API and the export download routes.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum_server::Handle;
use tokio::signal;

pub mod attachment;
mod auth_cookie;
mod auth_middleware;
pub mod category;
mod db;
mod endpoints;
mod error;
pub mod expense;
pub mod export;
mod log_in;
mod log_out;
mod logging;
mod pagination;
mod password;
mod register_user;
pub mod report;
mod routing;
mod state;
pub mod user;

pub use db::initialize as initialize_db;
pub use error::Error;
pub use logging::{LOG_BODY_LENGTH_LIMIT, logging_middleware};
pub use pagination::{Page, PaginationConfig};
pub use password::{PasswordHash, ValidatedPassword};
pub use routing::build_router;
pub use state::AppState;

/// An async task that waits for either the ctrl+c or terminate signal,
/// whichever comes first, and then signals the server to shut down
/// gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Received termination signal, shutting down...");
    handle.graceful_shutdown(Some(Duration::from_secs(10)));
}
