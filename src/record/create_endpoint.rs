//! Defines the endpoint for creating a new record.

use axum::{Json, extract::State};
use serde::Serialize;

use crate::{
    Error,
    extract::JsonBody,
    record::{NewRecord, RecordState, create_record},
};

/// The acknowledgement sent back once a record has been stored.
#[derive(Debug, Serialize, PartialEq)]
pub struct CreateRecordResponse {
    pub status: u16,
    pub message: &'static str,
}

/// A route handler for creating a new record.
///
/// The record is inserted as is: there is no duplicate check and no check
/// that `userId` matches the caller.
pub async fn create_record_endpoint(
    State(state): State<RecordState>,
    JsonBody(new_record): JsonBody<NewRecord>,
) -> Result<Json<CreateRecordResponse>, Error> {
    let connection = state.connection()?;

    let record = create_record(new_record, &connection)
        .inspect_err(|error| tracing::error!("could not create record: {error}"))?;

    tracing::info!("Created record {} for user {}", record.id, record.user_id);

    Ok(Json(CreateRecordResponse {
        status: 200,
        message: "Record added",
    }))
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::extract::State;

    use crate::{
        extract::JsonBody,
        record::{
            RecordState, RecordType, create_endpoint::CreateRecordResponse,
            create_record_endpoint, get_record,
            test_utils::{get_test_connection, new_record},
        },
    };

    #[tokio::test]
    async fn can_create_record() {
        let state = RecordState {
            db_connection: Arc::new(Mutex::new(get_test_connection())),
        };
        let want = new_record(100.0, RecordType::Income, "u1");

        let response = create_record_endpoint(State(state.clone()), JsonBody(want.clone()))
            .await
            .expect("could not create record");

        assert_eq!(
            response.0,
            CreateRecordResponse {
                status: 200,
                message: "Record added"
            }
        );
        // The first record will always have the ID 1.
        let connection = state.db_connection.lock().unwrap();
        let got = get_record(1, &connection).expect("could not get created record");
        assert_eq!(got.amount, want.amount);
        assert_eq!(got.notes, want.notes);
        assert_eq!(got.user_id, want.user_id);
    }

    #[tokio::test]
    async fn creates_duplicates() {
        let state = RecordState {
            db_connection: Arc::new(Mutex::new(get_test_connection())),
        };
        let record = new_record(1.0, RecordType::Expense, "u1");

        for _ in 0..2 {
            create_record_endpoint(State(state.clone()), JsonBody(record.clone()))
                .await
                .expect("could not create record");
        }

        let connection = state.db_connection.lock().unwrap();
        assert!(get_record(2, &connection).is_ok());
    }
}
