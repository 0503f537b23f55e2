//! Functions for setting and reading the private auth cookie.

use axum_extra::extract::{
    PrivateCookieJar,
    cookie::{Cookie, SameSite},
};
use time::{Duration, OffsetDateTime};

use crate::user::UserID;

/// The name of the cookie that holds the logged-in user's ID.
pub(crate) const COOKIE_USER_ID: &str = "user_id";

/// How long an auth cookie is valid for after log-in.
pub const DEFAULT_COOKIE_DURATION: Duration = Duration::minutes(30);

/// Add an encrypted auth cookie holding `user_id` to the jar.
pub(crate) fn set_auth_cookie(
    jar: PrivateCookieJar,
    user_id: UserID,
    duration: Duration,
) -> PrivateCookieJar {
    jar.add(
        Cookie::build((COOKIE_USER_ID, user_id.as_i64().to_string()))
            .expires(OffsetDateTime::now_utc() + duration)
            .http_only(true)
            .same_site(SameSite::Lax)
            .secure(true),
    )
}

/// Expire the auth cookie, logging the client out.
pub(crate) fn invalidate_auth_cookie(jar: PrivateCookieJar) -> PrivateCookieJar {
    jar.remove(Cookie::from(COOKIE_USER_ID))
}

/// Extract the user ID from the auth cookie, if present and well-formed.
pub(crate) fn get_user_id_from_auth_cookie(jar: &PrivateCookieJar) -> Option<UserID> {
    jar.get(COOKIE_USER_ID)?
        .value_trimmed()
        .parse()
        .map(UserID::new)
        .ok()
}
