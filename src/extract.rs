use axum::extract::FromRequest;

use crate::Error;

/// A JSON request body that rejects malformed input with an [Error] so that
/// the client gets the same `{"error": ...}` shape as every other failure.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(Error))]
pub struct JsonBody<T>(pub T);
