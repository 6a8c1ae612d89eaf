//! Middleware for logging requests and responses.

use axum::{
    body::Body,
    extract::Request,
    http::{StatusCode, header::CONTENT_TYPE, request, response},
    middleware::Next,
    response::{IntoResponse, Response},
};
use serde_json::Value;

/// Request and response bodies longer than this many characters are
/// truncated in the `info` logs.
pub const LOG_BODY_LENGTH_LIMIT: usize = 64;

const PASSWORD_FIELDS: [&str; 2] = ["password", "confirm_password"];
const REDACTED: &str = "********";

/// Log the request and response for each request.
///
/// Both the request and response are logged at the `info` level.
/// If a body is longer than [LOG_BODY_LENGTH_LIMIT] characters, it is
/// truncated and the full body is logged at the `debug` level.
/// Passwords in JSON and form bodies are redacted.
pub async fn logging_middleware(request: Request, next: Next) -> Response {
    let (parts, body) = request.into_parts();
    let bytes = match axum::body::to_bytes(body, usize::MAX).await {
        Ok(bytes) => bytes,
        Err(error) => {
            tracing::error!("could not read request body: {error}");
            return StatusCode::BAD_REQUEST.into_response();
        }
    };

    log_request(&parts, &redact_body(&parts, &String::from_utf8_lossy(&bytes)));

    // The handlers get the original bytes, not the lossy text that is logged.
    let request = Request::from_parts(parts, Body::from(bytes));
    let response = next.run(request).await;

    let (parts, body) = response.into_parts();
    let bytes = match axum::body::to_bytes(body, usize::MAX).await {
        Ok(bytes) => bytes,
        Err(error) => {
            tracing::error!("could not read response body: {error}");
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };

    log_response(&parts, &String::from_utf8_lossy(&bytes));

    Response::from_parts(parts, Body::from(bytes))
}

fn redact_body(parts: &request::Parts, body: &str) -> String {
    let content_type = parts
        .headers
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default();

    if content_type.starts_with("application/json") {
        redact_json_passwords(body)
    } else if content_type.starts_with("application/x-www-form-urlencoded") {
        PASSWORD_FIELDS
            .iter()
            .fold(body.to_owned(), |text, field| redact_form_field(&text, field))
    } else {
        body.to_owned()
    }
}

fn redact_json_passwords(json_text: &str) -> String {
    let Ok(mut value) = serde_json::from_str::<Value>(json_text) else {
        return json_text.to_owned();
    };

    let Some(object) = value.as_object_mut() else {
        return json_text.to_owned();
    };

    let mut redacted = false;

    for field in PASSWORD_FIELDS {
        if let Some(password) = object.get_mut(field) {
            *password = Value::String(REDACTED.to_owned());
            redacted = true;
        }
    }

    if redacted {
        value.to_string()
    } else {
        json_text.to_owned()
    }
}

fn redact_form_field(form_text: &str, field_name: &str) -> String {
    let prefix = format!("{field_name}=");

    form_text
        .split('&')
        .map(|pair| {
            if pair.starts_with(&prefix) {
                format!("{prefix}{REDACTED}")
            } else {
                pair.to_owned()
            }
        })
        .collect::<Vec<_>>()
        .join("&")
}

/// The first [LOG_BODY_LENGTH_LIMIT] characters of `body`, or `None` if the
/// body is short enough to log in full.
fn truncate(body: &str) -> Option<&str> {
    body.char_indices()
        .nth(LOG_BODY_LENGTH_LIMIT)
        .map(|(end, _)| &body[..end])
}

fn log_request(parts: &request::Parts, body: &str) {
    match truncate(body) {
        Some(truncated) => {
            tracing::info!("Received request: {parts:#?}\nbody: {truncated}...");
            tracing::debug!("Full request body: {body:?}");
        }
        None => tracing::info!("Received request: {parts:#?}\nbody: {body:?}"),
    }
}

fn log_response(parts: &response::Parts, body: &str) {
    match truncate(body) {
        Some(truncated) => {
            tracing::info!("Sending response: {parts:#?}\nbody: {truncated}...");
            tracing::debug!("Full response body: {body:?}");
        }
        None => tracing::info!("Sending response: {parts:#?}\nbody: {body:?}"),
    }
}

#[cfg(test)]
mod tests {
    use axum::{
        Json, Router,
        body::Bytes,
        http::StatusCode,
        middleware,
        routing::post,
    };
    use axum_test::TestServer;
    use rusqlite::Connection;
    use serde_json::{Value, json};

    use crate::{AppState, build_router, endpoints, record::count_records};

    use super::{
        LOG_BODY_LENGTH_LIMIT, logging_middleware, redact_form_field, redact_json_passwords,
        truncate,
    };

    #[test]
    fn redacts_form_password() {
        let redacted = redact_form_field("username=alice&password=hunter2&remember=on", "password");

        assert_eq!(redacted, "username=alice&password=********&remember=on");
    }

    #[test]
    fn form_redaction_leaves_similar_fields() {
        let redacted = redact_form_field("confirm_password=abc&password=def", "password");

        assert_eq!(redacted, "confirm_password=abc&password=********");
    }

    #[test]
    fn redacts_json_password() {
        let redacted = redact_json_passwords(r#"{"username":"alice","password":"hunter2"}"#);

        let value: Value = serde_json::from_str(&redacted).unwrap();
        assert_eq!(value["username"], "alice");
        assert_eq!(value["password"], "********");
    }

    #[test]
    fn json_without_password_is_unchanged() {
        let body = r#"{"amount":100,"notes":"salary"}"#;

        assert_eq!(redact_json_passwords(body), body);
        assert_eq!(redact_json_passwords("not json"), "not json");
    }

    #[test]
    fn truncates_on_char_boundary() {
        let body = "é".repeat(LOG_BODY_LENGTH_LIMIT + 1);

        let truncated = truncate(&body).expect("body should be truncated");

        assert_eq!(truncated.chars().count(), LOG_BODY_LENGTH_LIMIT);
        assert_eq!(truncate("short"), None);
    }

    #[tokio::test]
    async fn passes_request_and_response_through() {
        let app = Router::new()
            .route("/echo", post(|Json(body): Json<Value>| async move { Json(body) }))
            .layer(middleware::from_fn(logging_middleware));
        let server = TestServer::try_new(app).expect("could not create test server");

        let response = server
            .post("/echo")
            .json(&json!({ "username": "alice", "password": "hunter2" }))
            .await;

        response.assert_status_ok();
        response.assert_json(&json!({ "username": "alice", "password": "hunter2" }));
    }

    #[tokio::test]
    async fn invalid_utf8_json_is_still_rejected() {
        let state = AppState::new(
            Connection::open_in_memory().expect("Could not open database in memory."),
            "nafstenoas",
            "Etc/UTC",
        )
        .expect("Could not create app state.");
        let db_connection = state.db_connection.clone();
        let app = build_router(state).layer(middleware::from_fn(logging_middleware));

        let mut body = br#"{"amount":1,"date":"2024-01-05T00:00","type":"income","notes":"a"#.to_vec();
        body.push(0xff);
        body.extend_from_slice(br#"","userId":"u1"}"#);
        let server = TestServer::try_new(app).expect("could not create test server");

        let response = server
            .post(endpoints::RECORDS_API)
            .content_type("application/json")
            .bytes(Bytes::from(body))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let connection = db_connection.lock().unwrap();
        assert_eq!(count_records(&connection).unwrap(), 0);
    }
}
