//! Record management for the tracker.
//!
//! This module contains everything related to income and expense records:
//! - The `Record` model and the payloads used to create and update records
//! - Database functions for storing, querying, and managing records
//! - The JSON API handlers on `/api/v1/slip`

mod core;
mod create_endpoint;
mod delete_endpoint;
mod list_endpoint;
mod state;
mod update_endpoint;

pub use core::{
    NewRecord, Record, RecordType, RecordUpdate, count_records, create_record,
    create_record_table, delete_record, get_records_by_user,
};
pub use create_endpoint::create_record_endpoint;
pub use delete_endpoint::delete_record_endpoint;
pub use list_endpoint::list_records_endpoint;
pub use state::RecordState;
pub use update_endpoint::update_record_endpoint;

#[cfg(test)]
pub use core::{get_record, update_record};
#[cfg(test)]
pub(crate) use core::test_utils;
#[cfg(test)]
pub use list_endpoint::USER_ID_HEADER;
