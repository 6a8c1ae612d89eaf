//! A placeholder credential exchange.
//!
//! Any credentials are accepted by [PlaceholderVerifier]. A real verifier can
//! be plugged in through the [CredentialVerifier] trait without touching the
//! session handling.

mod cookie;
mod credentials;
mod session;
mod token;

pub use cookie::DEFAULT_SESSION_DURATION;
pub use credentials::{CredentialVerifier, Credentials, Identity, PlaceholderVerifier};
pub use session::{get_session_endpoint, log_in_endpoint, log_out_endpoint};
