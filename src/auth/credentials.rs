//! Defines the credentials a client logs in with and how they are verified.

use std::fmt::Debug;

use serde::{Deserialize, Serialize};

use crate::Error;

/// The credentials submitted by a client when logging in.
#[derive(Clone, Deserialize, PartialEq)]
pub struct Credentials {
    /// The name the client logs in as.
    pub username: String,
    /// The password in plain text.
    pub password: String,
}

// The password must never end up in the logs.
impl Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"********")
            .finish()
    }
}

/// Who a set of credentials belongs to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Identity {
    /// The user's ID, used as the subject of session tokens.
    pub id: i64,
    /// The user's display name.
    pub name: String,
    /// The user's email address.
    pub email: String,
}

/// Checks credentials and resolves them to an [Identity].
pub trait CredentialVerifier: Debug + Send + Sync {
    /// Verify `credentials`.
    ///
    /// # Errors
    /// Returns [Error::InvalidCredentials] if the credentials are rejected.
    fn verify(&self, credentials: &Credentials) -> Result<Identity, Error>;
}

/// A verifier that accepts any credentials and always returns the same
/// identity.
///
/// This is not authentication. It only marks where a real verifier plugs in.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlaceholderVerifier;

impl PlaceholderVerifier {
    /// The identity returned for every set of credentials.
    pub fn identity() -> Identity {
        Identity {
            id: 1,
            name: "John Doe".to_owned(),
            email: "john@example.com".to_owned(),
        }
    }
}

impl CredentialVerifier for PlaceholderVerifier {
    fn verify(&self, credentials: &Credentials) -> Result<Identity, Error> {
        tracing::warn!(
            "Accepting credentials for {:?} without verification",
            credentials.username
        );

        Ok(Self::identity())
    }
}
