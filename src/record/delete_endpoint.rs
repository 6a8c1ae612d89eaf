//! Defines the endpoint for deleting a record.

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};

use crate::{
    Error,
    database_id::RecordId,
    extract::JsonBody,
    record::{RecordState, delete_record},
};

/// The request body for deleting a record.
#[derive(Debug, Deserialize)]
pub struct DeleteRecordRequest {
    /// The ID of the record to delete. A missing ID matches no record.
    pub id: Option<RecordId>,
}

#[derive(Debug, Serialize, PartialEq)]
pub struct DeleteRecordResponse {
    pub message: &'static str,
}

/// A route handler for deleting a record by its ID.
///
/// Any caller that knows the ID of a record may delete it.
///
/// # Errors
/// Returns [Error::NotFound] if no record has the requested ID.
pub async fn delete_record_endpoint(
    State(state): State<RecordState>,
    JsonBody(request): JsonBody<DeleteRecordRequest>,
) -> Result<Json<DeleteRecordResponse>, Error> {
    tracing::info!("Delete request received for record {:?}", request.id);

    let Some(id) = request.id else {
        tracing::error!("Record not found: no ID in delete request");
        return Err(Error::NotFound);
    };

    let connection = state.connection()?;

    match delete_record(id, &connection) {
        Ok(_) => {
            tracing::info!("Record {id} deleted successfully");
            Ok(Json(DeleteRecordResponse {
                message: "Record deleted",
            }))
        }
        Err(Error::NotFound) => {
            tracing::error!("Record {id} not found");
            Err(Error::NotFound)
        }
        Err(error) => {
            tracing::error!("Error during deletion of record {id}: {error}");
            Err(error)
        }
    }
}
