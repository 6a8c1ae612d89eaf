//! Defines the endpoint for updating an existing record.

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};

use crate::{
    Error,
    database_id::RecordId,
    extract::JsonBody,
    record::{Record, RecordState, RecordType, RecordUpdate, core::update_record},
};

/// The request body for updating a record.
///
/// The owner of a record cannot be changed, so there is no `userId` field.
#[derive(Debug, Deserialize)]
pub struct UpdateRecordRequest {
    pub id: Option<RecordId>,
    pub amount: Option<f64>,
    pub date: Option<String>,
    #[serde(rename = "type")]
    pub record_type: Option<RecordType>,
    pub notes: Option<String>,
}

#[derive(Debug, Serialize, PartialEq)]
pub struct UpdateRecordResponse {
    pub message: &'static str,
    pub data: Record,
}

/// A route handler for updating the amount, date, type and notes of a record.
///
/// Any caller that knows the ID of a record may update it.
///
/// # Errors
/// Returns [Error::NotFound] if no record has the requested ID.
pub async fn update_record_endpoint(
    State(state): State<RecordState>,
    JsonBody(request): JsonBody<UpdateRecordRequest>,
) -> Result<Json<UpdateRecordResponse>, Error> {
    tracing::info!("Edit request received for record {:?}", request.id);

    let Some(id) = request.id else {
        tracing::error!("Record not found: no ID in update request");
        return Err(Error::NotFound);
    };

    let update = RecordUpdate {
        amount: request.amount,
        date: request.date,
        record_type: request.record_type,
        notes: request.notes,
    };

    let connection = state.connection()?;

    match update_record(id, update, &connection) {
        Ok(record) => {
            tracing::info!("Record {id} updated successfully");
            Ok(Json(UpdateRecordResponse {
                message: "Record updated",
                data: record,
            }))
        }
        Err(Error::NotFound) => {
            tracing::error!("Record {id} not found");
            Err(Error::NotFound)
        }
        Err(error) => {
            tracing::error!("Error during update of record {id}: {error}");
            Err(error)
        }
    }
}
