//! The tracker page.
//!
//! The page keeps a local copy of a user's records, lets the user add new
//! records through a form and shows running totals and a chart comparing the
//! current and previous month.

mod chart;
mod form;
mod page;
mod state;
mod summary;

pub use form::{RecordInput, RecordInputError};
pub use page::{create_tracker_record_endpoint, delete_tracker_record_endpoint, get_tracker_page};
pub use state::{TrackedRecord, Tracker};
pub use summary::{CURRENT_MONTH, MonthlySeries, PREVIOUS_MONTH, Totals};
