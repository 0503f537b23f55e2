//! The account registration endpoint.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, State},
    http::StatusCode,
};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};

use crate::{
    Error,
    password::PasswordHash,
    state::{AppState, lock_connection},
    user::{UserID, create_user},
};

/// The fields sent by the client to register an account.
#[derive(Debug, Deserialize)]
pub struct RegisterForm {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// The public view of a newly registered account.
#[derive(Debug, Serialize)]
pub struct RegisteredUser {
    pub id: UserID,
    pub username: String,
    pub email: String,
}

/// The state needed to register a user.
#[derive(Debug, Clone)]
pub struct RegisterState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for RegisterState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Handler for registration requests.
///
/// The password must pass the strength check; the username and email must be
/// unused.
pub async fn register_user(
    State(state): State<RegisterState>,
    Json(form): Json<RegisterForm>,
) -> Result<(StatusCode, Json<RegisteredUser>), Error> {
    if form.username.trim().is_empty() {
        return Err(Error::EmptyUsername);
    }

    // Only rejects the obviously malformed; full RFC 5322 validation is not
    // worth the trouble here.
    if !form.email.contains('@') {
        return Err(Error::InvalidEmail(form.email));
    }

    let password_hash = PasswordHash::from_raw_password(&form.password, PasswordHash::DEFAULT_COST)?;

    let connection = lock_connection(&state.db_connection)?;
    let user = create_user(&form.username, &form.email, password_hash, &connection)?;

    Ok((
        StatusCode::CREATED,
        Json(RegisteredUser {
            id: user.id,
            username: user.username,
            email: user.email,
        }),
    ))
}
