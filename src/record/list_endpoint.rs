//! Defines the endpoint for listing the records of a user.

use axum::{Json, extract::State, http::HeaderMap};
use serde::Serialize;

use crate::{
    Error,
    record::{Record, RecordState, get_records_by_user},
};

/// The header that identifies whose records to list.
///
/// Header names are case-insensitive, so clients may send it as `userId`.
pub const USER_ID_HEADER: &str = "userid";

/// The response body for a list of records.
#[derive(Debug, Serialize)]
pub struct ListRecordsResponse {
    pub data: Vec<Record>,
}

/// A route handler that lists all the records owned by the user in the
/// `userId` header.
///
/// # Errors
/// Returns [Error::Unauthorized] if the header is missing or empty. The
/// header is not checked against any session.
pub async fn list_records_endpoint(
    State(state): State<RecordState>,
    headers: HeaderMap,
) -> Result<Json<ListRecordsResponse>, Error> {
    let user_id = headers
        .get(USER_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .filter(|value| !value.is_empty())
        .ok_or(Error::Unauthorized)?;

    let connection = state.connection()?;
    let records = get_records_by_user(user_id, &connection)
        .inspect_err(|error| tracing::error!("could not get records for {user_id}: {error}"))?;

    tracing::debug!("Found {} records for user {user_id}", records.len());

    Ok(Json(ListRecordsResponse { data: records }))
}
