//! The log-out endpoint.

use axum::Json;
use axum_extra::extract::PrivateCookieJar;
use serde_json::{Value, json};

use crate::auth_cookie::invalidate_auth_cookie;

/// Expire the client's auth cookie.
///
/// Logging out without a session is harmless, so this never fails.
pub async fn get_log_out(jar: PrivateCookieJar) -> (PrivateCookieJar, Json<Value>) {
    (
        invalidate_auth_cookie(jar),
        Json(json!({ "message": "Logged out successfully" })),
    )
}
