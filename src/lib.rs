//! Slipbook is a small web app for keeping track of your income and expenses.
//!
//! This library provides a JSON API for managing records and a tracker page
//! that renders running totals and a chart of the last two months.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_server::Handle;
use serde_json::json;
use tokio::signal;

mod alert;
mod app_state;
mod auth;
mod database_id;
mod db;
mod endpoints;
mod extract;
mod html;
mod internal_server_error;
mod logging;
mod not_found;
mod record;
mod routing;
mod timezone;
mod tracker;

#[cfg(test)]
mod test_utils;

pub use app_state::AppState;
pub use auth::{CredentialVerifier, Credentials, Identity, PlaceholderVerifier};
pub use database_id::RecordId;
pub use db::initialize as initialize_db;
pub use logging::{LOG_BODY_LENGTH_LIMIT, logging_middleware};
pub use record::{NewRecord, Record, RecordType, count_records, create_record};
pub use routing::build_router;
pub use timezone::get_local_offset;

use crate::{alert::Alert, tracker::RecordInputError};

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        if let Err(error) = signal::ctrl_c().await {
            tracing::error!("failed to install Ctrl+C handler: {error}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(error) => {
                tracing::error!("failed to install signal handler: {error}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The request did not identify whose records to access, e.g. the
    /// `userId` header is missing.
    #[error("the request did not include a user ID")]
    Unauthorized,

    /// The credentials were rejected by the credential verifier.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// The session cookie is missing from the cookie jar in the request.
    #[error("no session cookie in the cookie jar")]
    CookieMissing,

    /// The session cookie could not be decoded, or it has expired.
    #[error("invalid session token: {0}")]
    InvalidToken(String),

    /// The requested resource was not found.
    ///
    /// For HTTP request handlers, the client should check that the ID is
    /// correct and that the record has not already been deleted.
    ///
    /// Internally, this error may occur when a query returns no rows.
    #[error("the requested resource could not be found")]
    NotFound,

    /// The request body could not be parsed into the expected shape.
    #[error("invalid request body: {0}")]
    InvalidRequestBody(String),

    /// The tracker form was submitted with values that fail validation.
    #[error("invalid record: {0}")]
    InvalidRecordInput(RecordInputError),

    /// A record type other than "income" or "expense" was read from or
    /// written to the database.
    #[error("\"{0}\" is not a valid record type")]
    InvalidRecordType(String),

    /// An error occurred while getting the local timezone from a canonical timezone string.
    #[error("invalid timezone {0}")]
    InvalidTimezoneError(String),

    /// Could not acquire the database lock
    #[error("could not acquire the database lock")]
    DatabaseLockError,

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

impl From<JsonRejection> for Error {
    fn from(rejection: JsonRejection) -> Self {
        tracing::debug!("rejected JSON request body: {rejection}");
        Error::InvalidRequestBody(rejection.body_text())
    }
}

impl Error {
    /// The status code and client facing message for this error.
    ///
    /// Errors that are not the client's fault all share one generic message so
    /// that internal details only end up in the server logs.
    fn status_and_message(&self) -> (StatusCode, String) {
        match self {
            Error::Unauthorized | Error::CookieMissing | Error::InvalidToken(_) => {
                (StatusCode::UNAUTHORIZED, "Unauthorized".to_owned())
            }
            Error::InvalidCredentials => {
                (StatusCode::UNAUTHORIZED, "Invalid credentials".to_owned())
            }
            Error::NotFound => (StatusCode::NOT_FOUND, "Record not found".to_owned()),
            Error::InvalidRequestBody(reason) => (StatusCode::BAD_REQUEST, reason.clone()),
            Error::InvalidRecordInput(reason) => {
                (StatusCode::UNPROCESSABLE_ENTITY, reason.to_string())
            }
            _ => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Server error occurred".to_owned(),
            ),
        }
    }

    /// Render the error as an HTML alert for htmx requests made by the tracker page.
    fn into_alert_response(self) -> Response {
        let (status, _) = self.status_and_message();

        let (message, details) = match &self {
            Error::NotFound => (
                "Could not find record",
                "The record could not be found. \
                Try refreshing the page to see if the record has already been deleted."
                    .to_owned(),
            ),
            Error::InvalidRecordInput(reason) => ("Invalid record", reason.to_string()),
            Error::InvalidTimezoneError(timezone) => (
                "Invalid Timezone Settings",
                format!(
                    "Could not get local timezone \"{timezone}\". Check your server settings and \
                    ensure the timezone has been set to valid, canonical timezone string"
                ),
            ),
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                (
                    "Something went wrong",
                    "An unexpected error occurred, check the server logs for more details."
                        .to_owned(),
                )
            }
        };

        (status, Alert::error(message, &details).into_html()).into_response()
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let (status, message) = self.status_and_message();

        if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!("An unexpected error occurred: {}", self);
        }

        (status, Json(json!({ "error": message }))).into_response()
    }
}

#[cfg(test)]
mod error_tests {
    use axum::{http::StatusCode, response::IntoResponse};
    use serde_json::Value;

    use crate::Error;

    async fn response_parts(error: Error) -> (StatusCode, Value) {
        let response = error.into_response();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("could not read response body");

        (
            status,
            serde_json::from_slice(&body).expect("response body is not JSON"),
        )
    }

    #[test]
    fn no_rows_maps_to_not_found() {
        assert_eq!(
            Error::from(rusqlite::Error::QueryReturnedNoRows),
            Error::NotFound
        );
    }

    #[tokio::test]
    async fn unauthorized_is_401() {
        let (status, body) = response_parts(Error::Unauthorized).await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"], "Unauthorized");
    }

    #[tokio::test]
    async fn not_found_is_404() {
        let (status, body) = response_parts(Error::NotFound).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Record not found");
    }

    #[tokio::test]
    async fn internal_errors_hide_details() {
        let (status, body) = response_parts(Error::InvalidRecordType("foo".to_owned())).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Server error occurred");
    }
}
