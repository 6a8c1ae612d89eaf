//! The view state of the tracker page.

use time::Date;

use crate::{
    database_id::RecordId,
    record::{NewRecord, Record, RecordType},
    tracker::{MonthlySeries, RecordInput, RecordInputError, Totals},
};

/// A record as the tracker knows it.
///
/// Records added through [Tracker::submit] have no ID until the list is
/// fetched again.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackedRecord {
    pub id: Option<RecordId>,
    pub amount: f64,
    pub date: String,
    pub record_type: RecordType,
    pub notes: String,
    pub user_id: String,
}

impl From<Record> for TrackedRecord {
    fn from(record: Record) -> Self {
        Self {
            id: Some(record.id),
            amount: record.amount,
            date: record.date,
            record_type: record.record_type,
            notes: record.notes,
            user_id: record.user_id,
        }
    }
}

impl From<NewRecord> for TrackedRecord {
    fn from(record: NewRecord) -> Self {
        Self {
            id: None,
            amount: record.amount,
            date: record.date,
            record_type: record.record_type,
            notes: record.notes,
            user_id: record.user_id,
        }
    }
}

/// Identifies one fetch of a user's records.
///
/// Only the ticket of the most recent fetch is accepted by
/// [Tracker::receive_records].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct FetchTicket(u64);

/// The local record list and form of the tracker page.
#[derive(Debug, Clone, Default)]
pub struct Tracker {
    records: Vec<TrackedRecord>,
    input: RecordInput,
    latest_fetch: u64,
}

impl Tracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> &[TrackedRecord] {
        &self.records
    }

    pub fn input(&self) -> &RecordInput {
        &self.input
    }

    /// The form fields other than the user ID.
    pub fn input_mut(&mut self) -> &mut RecordInput {
        &mut self.input
    }

    /// Change whose records are shown.
    ///
    /// Returns the ticket for the fetch the caller should start, or `None`
    /// if the user ID is empty or unchanged. Any fetch still in flight is
    /// made stale either way a change happens.
    pub fn set_user_id(&mut self, user_id: &str) -> Option<FetchTicket> {
        if self.input.user_id() == user_id {
            return None;
        }

        self.input.set_user_id(user_id);
        self.latest_fetch += 1;

        if user_id.is_empty() {
            None
        } else {
            Some(FetchTicket(self.latest_fetch))
        }
    }

    /// Replace the local list with the result of a fetch.
    ///
    /// Returns `false` and leaves the list untouched if `ticket` is not from
    /// the latest fetch.
    pub fn receive_records(&mut self, ticket: FetchTicket, records: Vec<Record>) -> bool {
        if ticket.0 != self.latest_fetch {
            tracing::debug!(
                "Dropping stale fetch {} (latest is {})",
                ticket.0,
                self.latest_fetch
            );
            return false;
        }

        self.records = records.into_iter().map(TrackedRecord::from).collect();
        true
    }

    /// Validate the form, append the record it describes and clear the form.
    ///
    /// The returned record is what should be sent to the records API.
    ///
    /// # Errors
    /// Returns a [RecordInputError] and leaves the form as it is if the form
    /// is not valid.
    pub fn submit(&mut self) -> Result<NewRecord, RecordInputError> {
        let new_record = self.input.validate()?;

        self.records.push(TrackedRecord::from(new_record.clone()));
        self.set_user_id("");
        self.input.reset();

        Ok(new_record)
    }

    pub fn totals(&self) -> Totals {
        Totals::from_records(&self.records)
    }

    pub fn monthly_series(&self, today: Date) -> MonthlySeries {
        MonthlySeries::from_records(&self.records, today)
    }
}
