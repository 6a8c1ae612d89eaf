//! Route handlers for logging in, reading the current session and logging out.

use std::sync::Arc;

use axum::{
    Json,
    extract::{FromRef, State},
};
use axum_extra::extract::PrivateCookieJar;
use serde::Serialize;
use serde_json::{Value, json};
use time::{Duration, OffsetDateTime, format_description::well_known::Rfc3339};

use crate::{
    AppState, Error,
    auth::{
        CredentialVerifier, Credentials,
        cookie::{get_token_from_cookies, invalidate_session_cookie, set_session_cookie},
        token::Token,
    },
    extract::JsonBody,
};

/// The state needed to log in.
#[derive(Debug, Clone)]
pub struct AuthState {
    /// The duration for which a session is valid.
    pub session_duration: Duration,
    /// Checks the credentials submitted by the client.
    pub credential_verifier: Arc<dyn CredentialVerifier>,
}

impl FromRef<AppState> for AuthState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            session_duration: state.session_duration,
            credential_verifier: state.credential_verifier.clone(),
        }
    }
}

/// The user of a session.
#[derive(Debug, Serialize, PartialEq)]
pub struct SessionUser {
    pub name: String,
    pub email: String,
}

/// A logged in session as reported to the client.
#[derive(Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub user: SessionUser,
    /// When the session expires, as an RFC 3339 date-time.
    pub expires: String,
    /// The subject of the session token.
    pub user_id: String,
}

impl TryFrom<Token> for Session {
    type Error = Error;

    fn try_from(token: Token) -> Result<Self, Self::Error> {
        let expires = token
            .expires_at
            .format(&Rfc3339)
            .map_err(|error| Error::InvalidToken(error.to_string()))?;

        Ok(Self {
            user: SessionUser {
                name: token.name,
                email: token.email,
            },
            expires,
            user_id: token.sub,
        })
    }
}

/// A route handler that exchanges credentials for a session cookie.
///
/// # Errors
/// Returns [Error::InvalidCredentials] if the verifier rejects the credentials.
pub async fn log_in_endpoint(
    State(state): State<AuthState>,
    jar: PrivateCookieJar,
    JsonBody(credentials): JsonBody<Credentials>,
) -> Result<(PrivateCookieJar, Json<Session>), Error> {
    let identity = state
        .credential_verifier
        .verify(&credentials)
        .inspect_err(|error| tracing::warn!("log in rejected: {error}"))?;

    let expires_at = OffsetDateTime::now_utc() + state.session_duration;
    let token = Token::new(&identity, expires_at);
    let jar = set_session_cookie(jar, &token)?;

    tracing::info!("Started session for {}", token.sub);

    Ok((jar, Json(Session::try_from(token)?)))
}

/// A route handler that returns the session stored in the session cookie.
///
/// # Errors
/// Returns [Error::CookieMissing] or [Error::InvalidToken] if there is no
/// valid session.
pub async fn get_session_endpoint(jar: PrivateCookieJar) -> Result<Json<Session>, Error> {
    let token = get_token_from_cookies(&jar)?;

    Ok(Json(Session::try_from(token)?))
}

/// A route handler that ends the current session.
pub async fn log_out_endpoint(jar: PrivateCookieJar) -> (PrivateCookieJar, Json<Value>) {
    (
        invalidate_session_cookie(jar),
        Json(json!({ "message": "Logged out" })),
    )
}
