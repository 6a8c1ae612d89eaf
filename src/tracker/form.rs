//! The values of the tracker form.

use crate::record::{NewRecord, RecordType};

/// The reasons a filled in form is rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum RecordInputError {
    /// The amount is zero, negative or not a number.
    #[error("the amount must be greater than zero")]
    NonPositiveAmount,

    #[error("the date must not be empty")]
    MissingDate,

    /// The notes are empty or only whitespace.
    #[error("the notes must not be empty")]
    MissingNotes,

    #[error("the user ID must not be empty")]
    MissingUserId,
}

/// The five fields of the tracker form.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RecordInput {
    amount: f64,
    date: String,
    record_type: RecordType,
    notes: String,
    user_id: String,
}

impl RecordInput {
    #[cfg(test)]
    pub fn amount(&self) -> f64 {
        self.amount
    }

    pub fn date(&self) -> &str {
        &self.date
    }

    pub fn record_type(&self) -> RecordType {
        self.record_type
    }

    pub fn notes(&self) -> &str {
        &self.notes
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    pub fn set_amount(&mut self, amount: f64) {
        self.amount = amount;
    }

    pub fn set_date(&mut self, date: impl Into<String>) {
        self.date = date.into();
    }

    pub fn set_record_type(&mut self, record_type: RecordType) {
        self.record_type = record_type;
    }

    pub fn set_notes(&mut self, notes: impl Into<String>) {
        self.notes = notes.into();
    }

    /// Changing the user ID changes which records are shown, so this goes
    /// through [crate::tracker::Tracker::set_user_id].
    pub(super) fn set_user_id(&mut self, user_id: impl Into<String>) {
        self.user_id = user_id.into();
    }

    /// Clear the form back to its initial values.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Check the form and build the record it describes.
    ///
    /// # Errors
    /// Returns the first [RecordInputError] found, checking the amount, date,
    /// notes and user ID in that order.
    pub fn validate(&self) -> Result<NewRecord, RecordInputError> {
        if self.amount.is_nan() || self.amount <= 0.0 {
            return Err(RecordInputError::NonPositiveAmount);
        }

        if self.date.is_empty() {
            return Err(RecordInputError::MissingDate);
        }

        if self.notes.trim().is_empty() {
            return Err(RecordInputError::MissingNotes);
        }

        if self.user_id.is_empty() {
            return Err(RecordInputError::MissingUserId);
        }

        Ok(NewRecord {
            amount: self.amount,
            date: self.date.clone(),
            record_type: self.record_type,
            notes: self.notes.clone(),
            user_id: self.user_id.clone(),
        })
    }
}
