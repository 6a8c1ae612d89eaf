//! Defines the core data models and database queries for records.

use std::{fmt::Display, str::FromStr};

use rusqlite::{
    Connection, Row,
    types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef},
};
use serde::{Deserialize, Serialize};

use crate::{Error, database_id::RecordId};

// ============================================================================
// MODELS
// ============================================================================

/// Whether a record is money earned or money spent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordType {
    /// Money earned, e.g. a salary payment.
    #[default]
    Income,
    /// Money spent, e.g. groceries.
    Expense,
}

impl RecordType {
    /// The name of the record type as it is stored and sent over the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordType::Income => "income",
            RecordType::Expense => "expense",
        }
    }
}

impl Display for RecordType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RecordType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "income" => Ok(RecordType::Income),
            "expense" => Ok(RecordType::Expense),
            other => Err(Error::InvalidRecordType(other.to_owned())),
        }
    }
}

impl ToSql for RecordType {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for RecordType {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()?
            .parse()
            .map_err(|error| FromSqlError::Other(Box::new(error)))
    }
}

/// One income or expense entry owned by a user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Record {
    /// The ID assigned by the store when the record was created.
    pub id: RecordId,
    /// The amount of money earned or spent. The sign is not constrained.
    pub amount: f64,
    /// When the money changed hands.
    ///
    /// This is free-form text, usually the value of a `datetime-local` input
    /// such as "2024-01-05T00:00", and is not validated as a calendar date.
    pub date: String,
    /// Whether the record is income or an expense.
    #[serde(rename = "type")]
    pub record_type: RecordType,
    /// A description of what the record is for.
    pub notes: String,
    /// The identifier of the user that owns the record.
    ///
    /// This is not checked against any user, it is only used to group records.
    pub user_id: String,
}

/// The data needed to create a [Record].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewRecord {
    /// See [Record::amount].
    pub amount: f64,
    /// See [Record::date].
    pub date: String,
    /// See [Record::record_type].
    #[serde(rename = "type")]
    pub record_type: RecordType,
    /// See [Record::notes].
    pub notes: String,
    /// See [Record::user_id].
    pub user_id: String,
}

/// The fields of a [Record] that may be changed after it is created.
///
/// Fields set to `None` keep their current value. The owner of a record can
/// never be changed.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RecordUpdate {
    pub amount: Option<f64>,
    pub date: Option<String>,
    #[serde(rename = "type")]
    pub record_type: Option<RecordType>,
    pub notes: Option<String>,
}

// ============================================================================
// DATABASE FUNCTIONS
// ============================================================================

/// Insert a new record into the database.
///
/// No checks are made on the values of `new_record` beyond what the table
/// schema enforces.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is an SQL error.
pub fn create_record(new_record: NewRecord, connection: &Connection) -> Result<Record, Error> {
    let record = connection
        .prepare(
            "INSERT INTO record (amount, date, \"type\", notes, user_id)
             VALUES (?1, ?2, ?3, ?4, ?5)
             RETURNING id, amount, date, \"type\", notes, user_id",
        )?
        .query_row(
            (
                new_record.amount,
                new_record.date,
                new_record.record_type,
                new_record.notes,
                new_record.user_id,
            ),
            map_record_row,
        )?;

    Ok(record)
}

/// Retrieve a record from the database by its `id`.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `id` does not refer to a valid record,
/// - or [Error::SqlError] there is some other SQL error.
#[cfg(test)]
pub fn get_record(id: RecordId, connection: &Connection) -> Result<Record, Error> {
    let record = connection
        .prepare(
            "SELECT id, amount, date, \"type\", notes, user_id FROM record WHERE id = :id",
        )?
        .query_row(&[(":id", &id)], map_record_row)?;

    Ok(record)
}

/// Retrieve all the records owned by `user_id` in the order they were created.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is an SQL error.
pub fn get_records_by_user(user_id: &str, connection: &Connection) -> Result<Vec<Record>, Error> {
    connection
        .prepare(
            "SELECT id, amount, date, \"type\", notes, user_id FROM record
             WHERE user_id = :user_id
             ORDER BY id ASC",
        )?
        .query_map(&[(":user_id", &user_id)], map_record_row)?
        .collect::<Result<Vec<Record>, rusqlite::Error>>()
        .map_err(|error| error.into())
}

/// Update the record with `id`, returning the updated record.
///
/// Only the fields set in `update` are changed, the owner is left untouched.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `id` does not refer to a valid record,
/// - or [Error::SqlError] there is some other SQL error.
pub fn update_record(
    id: RecordId,
    update: RecordUpdate,
    connection: &Connection,
) -> Result<Record, Error> {
    let record = connection
        .prepare(
            "UPDATE record
             SET
                amount = COALESCE(?1, amount),
                date = COALESCE(?2, date),
                \"type\" = COALESCE(?3, \"type\"),
                notes = COALESCE(?4, notes)
             WHERE id = ?5
             RETURNING id, amount, date, \"type\", notes, user_id",
        )?
        .query_row(
            (
                update.amount,
                update.date,
                update.record_type,
                update.notes,
                id,
            ),
            map_record_row,
        )?;

    Ok(record)
}

/// Delete the record with `id`, returning the deleted record.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `id` does not refer to a valid record,
/// - or [Error::SqlError] there is some other SQL error.
pub fn delete_record(id: RecordId, connection: &Connection) -> Result<Record, Error> {
    let record = connection
        .prepare(
            "DELETE FROM record WHERE id = :id
             RETURNING id, amount, date, \"type\", notes, user_id",
        )?
        .query_row(&[(":id", &id)], map_record_row)?;

    Ok(record)
}

/// Get the total number of records in the database.
///
/// # Errors
/// This function will return a [Error::SqlError] there is some SQL error.
pub fn count_records(connection: &Connection) -> Result<u32, Error> {
    connection
        .query_row("SELECT COUNT(id) FROM record;", [], |row| row.get(0))
        .map_err(|error| error.into())
}

/// Create the record table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_record_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS record (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                amount REAL NOT NULL,
                date TEXT NOT NULL,
                \"type\" TEXT NOT NULL CHECK (\"type\" IN ('income', 'expense')),
                notes TEXT NOT NULL,
                user_id TEXT NOT NULL
                )",
        (),
    )?;

    // Ensure the sequence starts at 1
    connection.execute(
        "INSERT OR IGNORE INTO sqlite_sequence (name, seq) VALUES ('record', 0)",
        (),
    )?;

    connection.execute(
        "CREATE INDEX IF NOT EXISTS idx_record_user_id ON record(user_id);",
        (),
    )?;

    Ok(())
}

/// Map a database row to a Record.
pub fn map_record_row(row: &Row) -> Result<Record, rusqlite::Error> {
    let id = row.get(0)?;
    let amount = row.get(1)?;
    let date = row.get(2)?;
    let record_type = row.get(3)?;
    let notes = row.get(4)?;
    let user_id = row.get(5)?;

    Ok(Record {
        id,
        amount,
        date,
        record_type,
        notes,
        user_id,
    })
}

// ============================================================================
// TESTS
// ============================================================================
