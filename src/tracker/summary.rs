//! Running totals and the two month series shown on the tracker page.

use time::{
    Date, Month, OffsetDateTime, PrimitiveDateTime,
    format_description::{BorrowedFormatItem, well_known::Rfc3339},
    macros::format_description,
};

use crate::{record::RecordType, tracker::TrackedRecord};

/// The index of the current month in a [MonthlySeries].
pub const CURRENT_MONTH: usize = 0;
/// The index of the previous month in a [MonthlySeries].
pub const PREVIOUS_MONTH: usize = 1;

/// The value of a `datetime-local` input, e.g. "2024-01-05T00:00".
const DATE_TIME_LOCAL_FORMAT: &[BorrowedFormatItem] =
    format_description!("[year]-[month]-[day]T[hour]:[minute]");
const DATE_TIME_LOCAL_WITH_SECONDS_FORMAT: &[BorrowedFormatItem] =
    format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]");
const DATE_FORMAT: &[BorrowedFormatItem] = format_description!("[year]-[month]-[day]");

/// The sums of income and expenses over a set of records.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Totals {
    pub income: f64,
    pub expense: f64,
}

impl Totals {
    /// Sum the amounts of `records` by record type.
    pub fn from_records(records: &[TrackedRecord]) -> Self {
        records
            .iter()
            .fold(Self::default(), |mut totals, record| {
                match record.record_type {
                    RecordType::Income => totals.income += record.amount,
                    RecordType::Expense => totals.expense += record.amount,
                }
                totals
            })
    }

    /// Income minus expenses.
    pub fn net(&self) -> f64 {
        self.income - self.expense
    }
}

/// Income and expense sums for the current and the previous calendar month.
///
/// Index [CURRENT_MONTH] holds the current month and [PREVIOUS_MONTH] the one
/// before it.
#[derive(Debug, Clone, PartialEq)]
pub struct MonthlySeries {
    /// The month names, e.g. "October".
    pub labels: [String; 2],
    pub income: [f64; 2],
    pub expense: [f64; 2],
}

impl MonthlySeries {
    /// Bucket `records` by the calendar month of their date relative to `today`.
    ///
    /// Records outside the two months, or whose date cannot be parsed, are
    /// left out.
    pub fn from_records(records: &[TrackedRecord], today: Date) -> Self {
        let current_month = (today.year(), today.month());
        let previous_month = previous_month(today.year(), today.month());

        let mut series = Self {
            labels: [
                current_month.1.to_string(),
                previous_month.1.to_string(),
            ],
            income: [0.0; 2],
            expense: [0.0; 2],
        };

        for record in records {
            let Some(date) = parse_record_date(&record.date) else {
                tracing::debug!("Skipping record with unparseable date {:?}", record.date);
                continue;
            };

            let month = (date.year(), date.month());
            let index = if month == current_month {
                CURRENT_MONTH
            } else if month == previous_month {
                PREVIOUS_MONTH
            } else {
                continue;
            };

            match record.record_type {
                RecordType::Income => series.income[index] += record.amount,
                RecordType::Expense => series.expense[index] += record.amount,
            }
        }

        series
    }
}

/// The year and month before `month` of `year`, wrapping back over new year.
fn previous_month(year: i32, month: Month) -> (i32, Month) {
    match month {
        Month::January => (year - 1, Month::December),
        month => (year, month.previous()),
    }
}

/// Try to read the calendar date of a record's free-form date text.
///
/// Accepts `datetime-local` values with or without seconds, RFC 3339
/// date-times and plain dates. Anything else gives `None`.
pub fn parse_record_date(text: &str) -> Option<Date> {
    let text = text.trim();

    PrimitiveDateTime::parse(text, DATE_TIME_LOCAL_FORMAT)
        .or_else(|_| PrimitiveDateTime::parse(text, DATE_TIME_LOCAL_WITH_SECONDS_FORMAT))
        .map(|date_time| date_time.date())
        .or_else(|_| OffsetDateTime::parse(text, &Rfc3339).map(|date_time| date_time.date()))
        .or_else(|_| Date::parse(text, DATE_FORMAT))
        .ok()
}

#[cfg(test)]
mod tests {
    use time::{Month, macros::date};

    use crate::{
        record::RecordType,
        tracker::{
            TrackedRecord,
            summary::{
                CURRENT_MONTH, MonthlySeries, PREVIOUS_MONTH, Totals, parse_record_date,
                previous_month,
            },
        },
    };

    fn record(amount: f64, record_type: RecordType, date: &str) -> TrackedRecord {
        TrackedRecord {
            id: None,
            amount,
            date: date.to_owned(),
            record_type,
            notes: "test".to_owned(),
            user_id: "u1".to_owned(),
        }
    }

    #[test]
    fn totals_for_single_income() {
        let records = vec![record(100.0, RecordType::Income, "2024-01-05T00:00")];

        let totals = Totals::from_records(&records);

        assert_eq!(totals.income, 100.0);
        assert_eq!(totals.expense, 0.0);
        assert_eq!(totals.net(), 100.0);
    }

    #[test]
    fn totals_for_mixed_records() {
        let records = vec![
            record(100.0, RecordType::Income, "2024-01-05T00:00"),
            record(30.0, RecordType::Expense, "2024-01-06T00:00"),
            record(20.0, RecordType::Expense, "not a date"),
        ];

        let totals = Totals::from_records(&records);

        assert_eq!(
            totals,
            Totals {
                income: 100.0,
                expense: 50.0
            }
        );
        assert_eq!(totals.net(), 50.0);
    }

    #[test]
    fn totals_for_no_records_are_zero() {
        assert_eq!(Totals::from_records(&[]), Totals::default());
    }

    #[test]
    fn same_month_records_land_in_current_bucket() {
        let records = vec![
            record(50.0, RecordType::Income, "2024-05-02T08:00"),
            record(20.0, RecordType::Expense, "2024-05-20T18:30"),
        ];

        let series = MonthlySeries::from_records(&records, date!(2024 - 05 - 31));

        assert_eq!(series.income[CURRENT_MONTH], 50.0);
        assert_eq!(series.expense[CURRENT_MONTH], 20.0);
        assert_eq!(series.income[PREVIOUS_MONTH], 0.0);
        assert_eq!(series.expense[PREVIOUS_MONTH], 0.0);
    }

    #[test]
    fn previous_month_and_older_records() {
        let records = vec![
            record(10.0, RecordType::Income, "2024-04-30T23:59"),
            record(5.0, RecordType::Expense, "2024-04-01"),
            record(1000.0, RecordType::Income, "2024-03-15T00:00"),
            record(1000.0, RecordType::Income, "2023-05-15T00:00"),
        ];

        let series = MonthlySeries::from_records(&records, date!(2024 - 05 - 01));

        assert_eq!(series.income, [0.0, 10.0]);
        assert_eq!(series.expense, [0.0, 5.0]);
    }

    #[test]
    fn previous_month_of_january_is_last_december() {
        let records = vec![record(42.0, RecordType::Expense, "2023-12-31T12:00")];

        let series = MonthlySeries::from_records(&records, date!(2024 - 01 - 10));

        assert_eq!(series.expense[PREVIOUS_MONTH], 42.0);
        assert_eq!(series.labels, ["January".to_owned(), "December".to_owned()]);
        assert_eq!(previous_month(2024, Month::January), (2023, Month::December));
    }

    #[test]
    fn unparseable_dates_are_skipped() {
        let records = vec![record(1.0, RecordType::Income, "yesterday")];

        let series = MonthlySeries::from_records(&records, date!(2024 - 05 - 01));

        assert_eq!(series.income, [0.0, 0.0]);
    }

    #[test]
    fn parses_supported_date_formats() {
        assert_eq!(
            parse_record_date("2024-01-05T00:00"),
            Some(date!(2024 - 01 - 05))
        );
        assert_eq!(
            parse_record_date("2024-01-05T13:45:10"),
            Some(date!(2024 - 01 - 05))
        );
        assert_eq!(
            parse_record_date("2024-01-05T13:45:10Z"),
            Some(date!(2024 - 01 - 05))
        );
        assert_eq!(parse_record_date(" 2024-01-05 "), Some(date!(2024 - 01 - 05)));
        assert_eq!(parse_record_date("05/01/2024"), None);
        assert_eq!(parse_record_date(""), None);
    }
}
