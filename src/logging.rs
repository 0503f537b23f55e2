//! Middleware for logging requests and responses.

use axum::{extract::Request, http::header::CONTENT_TYPE, middleware::Next, response::Response};

/// Log the request and response for each request.
///
/// Both the request and response are logged at the `info` level. If a body is
/// longer than [LOG_BODY_LENGTH_LIMIT] bytes, it is truncated and the full
/// body logged at the `debug` level. Password fields in JSON bodies are
/// redacted.
pub async fn logging_middleware(request: Request, next: Next) -> Response {
    let (parts, body_text) = extract_parts_and_body_text_from_request(request).await;

    let is_json = parts
        .headers
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.starts_with("application/json"));

    if is_json {
        let display_text = redact_json_field(&body_text, "password");
        log_request(&parts, &display_text);
    } else {
        log_request(&parts, &body_text);
    }

    let request = Request::from_parts(parts, body_text.into());
    let response = next.run(request).await;

    let (parts, body_text) = extract_parts_and_body_text_from_response(response).await;
    log_response(&parts, &body_text);

    Response::from_parts(parts, body_text.into())
}

/// Replace the string value of `field_name` in a JSON body with asterisks.
///
/// Works on the raw text so bodies that fail to parse as JSON are still
/// redacted on a best-effort basis.
fn redact_json_field(body_text: &str, field_name: &str) -> String {
    let needle = format!("\"{field_name}\"");

    let Some(key_position) = body_text.find(&needle) else {
        return body_text.to_owned();
    };

    let after_key = &body_text[key_position + needle.len()..];
    let Some(colon_offset) = after_key.find(':') else {
        return body_text.to_owned();
    };
    let Some(open_quote_offset) = after_key[colon_offset..].find('"') else {
        return body_text.to_owned();
    };

    let value_start = key_position + needle.len() + colon_offset + open_quote_offset + 1;
    let mut value_end = value_start;
    let bytes = body_text.as_bytes();
    while value_end < bytes.len() {
        match bytes[value_end] {
            b'\\' => value_end += 2,
            b'"' => break,
            _ => value_end += 1,
        }
    }

    if value_end > bytes.len() {
        return body_text.to_owned();
    }

    format!(
        "{}********{}",
        &body_text[..value_start],
        &body_text[value_end.min(bytes.len())..]
    )
}

async fn extract_parts_and_body_text_from_request(
    request: Request,
) -> (axum::http::request::Parts, String) {
    let (parts, body) = request.into_parts();
    let body_bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap_or_default();

    (parts, String::from_utf8_lossy(&body_bytes).to_string())
}

async fn extract_parts_and_body_text_from_response(
    response: Response,
) -> (axum::http::response::Parts, String) {
    let (parts, body) = response.into_parts();
    let body_bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap_or_default();

    (parts, String::from_utf8_lossy(&body_bytes).to_string())
}

/// Bodies longer than this are truncated in the info-level logs.
pub const LOG_BODY_LENGTH_LIMIT: usize = 64;

fn log_request(parts: &axum::http::request::Parts, body: &str) {
    if body.len() > LOG_BODY_LENGTH_LIMIT {
        tracing::info!(
            "Received request: {} {}\nbody: {}...",
            parts.method,
            parts.uri,
            &body[..LOG_BODY_LENGTH_LIMIT]
        );
        tracing::debug!("Full request body: {body:?}");
    } else {
        tracing::info!(
            "Received request: {} {}\nbody: {body:?}",
            parts.method,
            parts.uri
        );
    }
}

fn log_response(parts: &axum::http::response::Parts, body: &str) {
    if body.len() > LOG_BODY_LENGTH_LIMIT {
        tracing::info!(
            "Sending response: {}\nbody: {}...",
            parts.status,
            &body[..LOG_BODY_LENGTH_LIMIT]
        );
        tracing::debug!("Full response body: {body:?}");
    } else {
        tracing::info!("Sending response: {}\nbody: {body:?}", parts.status);
    }
}

#[cfg(test)]
mod redaction_tests {
    use super::redact_json_field;

    #[test]
    fn redacts_password_value() {
        let body = r#"{"username": "alice", "password": "hunter2"}"#;

        let redacted = redact_json_field(body, "password");

        assert_eq!(redacted, r#"{"username": "alice", "password": "********"}"#);
    }

    #[test]
    fn leaves_bodies_without_the_field_alone() {
        let body = r#"{"title": "Coffee", "amount": 4.5}"#;

        assert_eq!(redact_json_field(body, "password"), body);
    }

    #[test]
    fn handles_escaped_quotes_in_the_value() {
        let body = r#"{"password": "hun\"ter2"}"#;

        let redacted = redact_json_field(body, "password");

        assert_eq!(redacted, r#"{"password": "********"}"#);
    }

    #[test]
    fn does_not_panic_on_truncated_bodies() {
        let body = r#"{"password": "unterminated"#;

        let redacted = redact_json_field(body, "password");

        assert!(redacted.starts_with(r#"{"password": "********"#));
    }
}
