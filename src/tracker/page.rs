//! The route handlers and view for the tracker page.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Path, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
// Must use axum_extra's Form since that parses an empty string as None instead
// of crashing like axum::Form.
use axum_extra::extract::Form;
use axum_htmx::HxRedirect;
use maud::{Markup, html};
use rusqlite::Connection;
use serde::Deserialize;
use time::{Date, format_description::BorrowedFormatItem, macros::format_description};

use crate::{
    AppState, Error,
    database_id::RecordId,
    endpoints::{self, format_endpoint},
    html::{
        BUTTON_DELETE_STYLE, BUTTON_PRIMARY_STYLE, FORM_LABEL_STYLE, FORM_RADIO_INPUT_STYLE,
        FORM_RADIO_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, PAGE_CONTAINER_STYLE, TABLE_CELL_STYLE,
        TABLE_HEADER_STYLE, TABLE_ROW_STYLE, base, dollar_input_styles, format_currency,
    },
    internal_server_error::InternalServerError,
    record::{RecordType, create_record, delete_record, get_records_by_user},
    timezone::local_today,
    tracker::{
        Tracker,
        chart::{TrackerChart, chart_script, chart_view},
        summary::parse_record_date,
    },
};

const DISPLAY_DATE_FORMAT: &[BorrowedFormatItem] =
    format_description!("[month padding:none]/[day padding:none]/[year]");

/// The state needed by the tracker page.
#[derive(Debug, Clone)]
pub struct TrackerPageState {
    /// The database connection for managing records.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
}

impl FromRef<AppState> for TrackerPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// The query string of the tracker page.
#[derive(Debug, Default, Deserialize)]
pub struct TrackerQuery {
    /// Whose records to show.
    #[serde(default)]
    pub user_id: String,
}

/// Render the tracker page for the user in the query string.
pub async fn get_tracker_page(
    State(state): State<TrackerPageState>,
    Query(query): Query<TrackerQuery>,
) -> Response {
    let Some(today) = local_today(&state.local_timezone) else {
        tracing::error!("Invalid timezone {}", state.local_timezone);
        return InternalServerError {
            description: "Invalid timezone",
            fix: "Set the server timezone to a valid, canonical timezone name.",
        }
        .into_response();
    };

    let mut tracker = Tracker::new();

    if let Some(ticket) = tracker.set_user_id(&query.user_id) {
        let records = {
            let connection = match state.db_connection.lock() {
                Ok(connection) => connection,
                Err(error) => {
                    tracing::error!("could not acquire database lock: {error}");
                    return InternalServerError::default().into_response();
                }
            };

            get_records_by_user(&query.user_id, &connection)
        };

        match records {
            Ok(records) => {
                tracker.receive_records(ticket, records);
            }
            Err(error) => {
                tracing::error!("could not get records for {:?}: {error}", query.user_id);
                return InternalServerError {
                    description: "Could not load records",
                    fix: "Try again later or check the server logs",
                }
                .into_response();
            }
        }
    }

    Html(tracker_view(&tracker, today).into_string()).into_response()
}

/// The form data submitted by the tracker page.
#[derive(Debug, Deserialize)]
pub struct TrackerForm {
    /// The amount in dollars.
    pub amount: Option<f64>,
    #[serde(default)]
    pub date: String,
    #[serde(rename = "type", default)]
    pub record_type: RecordType,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub user_id: String,
}

/// A route handler for adding a record from the tracker form.
///
/// Redirects back to the tracker page of the record's owner on success.
pub async fn create_tracker_record_endpoint(
    State(state): State<TrackerPageState>,
    Form(form): Form<TrackerForm>,
) -> Response {
    let mut tracker = Tracker::new();
    tracker.set_user_id(&form.user_id);

    let input = tracker.input_mut();
    input.set_amount(form.amount.unwrap_or_default());
    input.set_date(form.date);
    input.set_record_type(form.record_type);
    input.set_notes(form.notes);

    let new_record = match tracker.submit() {
        Ok(new_record) => new_record,
        Err(error) => {
            tracing::debug!("rejected tracker form: {error}");
            return Error::InvalidRecordInput(error).into_alert_response();
        }
    };

    let user_id = new_record.user_id.clone();

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    if let Err(error) = create_record(new_record, &connection) {
        tracing::error!("could not create record: {error}");
        return error.into_alert_response();
    }

    (HxRedirect(tracker_url(&user_id)), StatusCode::SEE_OTHER).into_response()
}

/// A route handler for deleting a record from the tracker page.
///
/// Redirects back to the tracker page of the deleted record's owner.
pub async fn delete_tracker_record_endpoint(
    State(state): State<TrackerPageState>,
    Path(record_id): Path<RecordId>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match delete_record(record_id, &connection) {
        Ok(record) => (HxRedirect(tracker_url(&record.user_id)), StatusCode::SEE_OTHER)
            .into_response(),
        Err(error) => {
            tracing::debug!("could not delete record {record_id}: {error}");
            error.into_alert_response()
        }
    }
}

/// The URL of the tracker page showing the records of `user_id`.
fn tracker_url(user_id: &str) -> String {
    if user_id.is_empty() {
        return endpoints::ROOT.to_owned();
    }

    match serde_urlencoded::to_string([("user_id", user_id)]) {
        Ok(query) => format!("{}?{query}", endpoints::ROOT),
        Err(error) => {
            tracing::error!("could not encode user ID {user_id:?}: {error}");
            endpoints::ROOT.to_owned()
        }
    }
}

fn tracker_view(tracker: &Tracker, today: Date) -> Markup {
    let chart = TrackerChart::monthly(&tracker.monthly_series(today));

    let content = html!(
        div class=(PAGE_CONTAINER_STYLE)
        {
            div class="w-full max-w-4xl space-y-6"
            {
                h1 class="text-2xl font-bold" { "Slipbook" }

                (record_form(tracker))
                (totals_view(tracker))
                (chart_view(&chart))
                (chart_script(&chart))
                (records_table(tracker))
            }
        }
    );

    base("Tracker", &[dollar_input_styles()], &content)
}

fn record_form(tracker: &Tracker) -> Markup {
    let input = tracker.input();

    html!(
        form
            hx-post=(endpoints::TRACKER_RECORDS)
            hx-swap="none"
            class="w-full grid grid-cols-1 md:grid-cols-2 gap-4"
        {
            div
            {
                label for="user_id" class=(FORM_LABEL_STYLE) { "User ID" }

                input
                    id="user_id"
                    name="user_id"
                    type="text"
                    required
                    value=(input.user_id())
                    hx-get=(endpoints::ROOT)
                    hx-trigger="change"
                    hx-target="body"
                    hx-push-url="true"
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            div
            {
                label for="amount" class=(FORM_LABEL_STYLE) { "Amount" }

                div class="input-wrapper"
                {
                    input
                        id="amount"
                        name="amount"
                        type="number"
                        step="0.01"
                        min="0.01"
                        placeholder="0.00"
                        required
                        class=(FORM_TEXT_INPUT_STYLE);
                }
            }

            div
            {
                label for="date" class=(FORM_LABEL_STYLE) { "Date" }

                input
                    id="date"
                    name="date"
                    type="datetime-local"
                    required
                    value=(input.date())
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            div
            {
                label for="notes" class=(FORM_LABEL_STYLE) { "Notes" }

                input
                    id="notes"
                    name="notes"
                    type="text"
                    required
                    value=(input.notes())
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            fieldset class="flex gap-2"
            {
                legend class=(FORM_LABEL_STYLE) { "Type" }

                @for record_type in [RecordType::Income, RecordType::Expense] {
                    label class="flex-1 flex items-center gap-2"
                    {
                        input
                            type="radio"
                            name="type"
                            value=(record_type.as_str())
                            checked[input.record_type() == record_type]
                            class=(FORM_RADIO_INPUT_STYLE);

                        span class=(FORM_RADIO_LABEL_STYLE) { (type_label(record_type)) }
                    }
                }
            }

            div class="flex items-end"
            {
                button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Add Record" }
            }
        }
    )
}

fn totals_view(tracker: &Tracker) -> Markup {
    let totals = tracker.totals();

    html!(
        section id="totals" class="grid grid-cols-1 md:grid-cols-3 gap-4"
        {
            div class="p-4 rounded bg-white dark:bg-gray-800"
            {
                p class="text-sm" { "Income" }
                p id="income-total" class="text-xl font-semibold text-green-600"
                {
                    (format_currency(totals.income))
                }
            }

            div class="p-4 rounded bg-white dark:bg-gray-800"
            {
                p class="text-sm" { "Expenses" }
                p id="expense-total" class="text-xl font-semibold text-red-600"
                {
                    (format_currency(totals.expense))
                }
            }

            div class="p-4 rounded bg-white dark:bg-gray-800"
            {
                p class="text-sm" { "Net" }
                p id="net-total" class="text-xl font-semibold" { (format_currency(totals.net())) }
            }
        }
    )
}

fn records_table(tracker: &Tracker) -> Markup {
    html!(
        section id="records" class="overflow-x-auto"
        {
            table class="w-full text-sm text-left text-gray-500 dark:text-gray-400"
            {
                thead class=(TABLE_HEADER_STYLE)
                {
                    tr
                    {
                        th scope="col" class=(TABLE_CELL_STYLE) { "Date" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Type" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Amount" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Notes" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Actions" }
                    }
                }

                tbody
                {
                    @for record in tracker.records() {
                        tr class=(TABLE_ROW_STYLE)
                        {
                            td class=(TABLE_CELL_STYLE) { (record_date(&record.date)) }
                            td class=(TABLE_CELL_STYLE) { (type_label(record.record_type)) }
                            td class=(TABLE_CELL_STYLE) { (format_currency(record.amount)) }
                            td class=(TABLE_CELL_STYLE) { (record.notes) }
                            td class=(TABLE_CELL_STYLE)
                            {
                                @if let Some(id) = record.id {
                                    button
                                        hx-delete=(format_endpoint(endpoints::TRACKER_RECORD, id))
                                        hx-confirm="Delete this record?"
                                        hx-swap="none"
                                        class=(BUTTON_DELETE_STYLE)
                                    {
                                        "Delete"
                                    }
                                }
                            }
                        }
                    }

                    @if tracker.records().is_empty() {
                        tr class=(TABLE_ROW_STYLE)
                        {
                            td colspan="5" class=(TABLE_CELL_STYLE) { "No records yet." }
                        }
                    }
                }
            }
        }
    )
}

/// Show `text` as a short date, or as is when it is not a recognised date.
fn record_date(text: &str) -> Markup {
    match parse_record_date(text) {
        Some(date) => html!(
            time datetime=(date.to_string())
            {
                (date.format(DISPLAY_DATE_FORMAT).unwrap_or_else(|_| date.to_string()))
            }
        ),
        None => html!((text)),
    }
}

fn type_label(record_type: RecordType) -> &'static str {
    match record_type {
        RecordType::Income => "Income",
        RecordType::Expense => "Expense",
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::{
        extract::{Path, Query, State},
        http::StatusCode,
        response::IntoResponse,
    };
    use axum_extra::extract::Form;
    use scraper::Selector;

    use crate::{
        record::{
            RecordType, count_records, create_record, get_record,
            test_utils::{get_test_connection, new_record},
        },
        test_utils::{
            assert_form_input, assert_hx_endpoint, assert_hx_redirect, assert_status_ok,
            assert_valid_html, must_get_form, parse_html_document, parse_html_fragment,
        },
        tracker::page::{
            TrackerForm, TrackerPageState, TrackerQuery, create_tracker_record_endpoint,
            delete_tracker_record_endpoint, get_tracker_page, tracker_url,
        },
    };

    fn get_state() -> TrackerPageState {
        TrackerPageState {
            db_connection: Arc::new(Mutex::new(get_test_connection())),
            local_timezone: "Etc/UTC".to_owned(),
        }
    }

    fn query(user_id: &str) -> Query<TrackerQuery> {
        Query(TrackerQuery {
            user_id: user_id.to_owned(),
        })
    }

    fn form(amount: Option<f64>, notes: &str, user_id: &str) -> Form<TrackerForm> {
        Form(TrackerForm {
            amount,
            date: "2024-01-05T00:00".to_owned(),
            record_type: RecordType::Income,
            notes: notes.to_owned(),
            user_id: user_id.to_owned(),
        })
    }

    fn text_of(html: &scraper::Html, selector: &str) -> String {
        let selector = Selector::parse(selector).unwrap();
        html.select(&selector)
            .next()
            .unwrap_or_else(|| panic!("no element matches {selector:?}"))
            .text()
            .collect::<String>()
            .trim()
            .to_owned()
    }

    #[tokio::test]
    async fn page_without_user_shows_empty_form() {
        let response = get_tracker_page(State(get_state()), query(""))
            .await
            .into_response();

        assert_status_ok(&response);
        let html = parse_html_document(response).await;
        assert_valid_html(&html);

        let form = must_get_form(&html);
        assert_hx_endpoint(&form, "/records", "hx-post");
        assert_form_input(&form, "user_id", "text");
        assert_form_input(&form, "amount", "number");
        assert_form_input(&form, "date", "datetime-local");
        assert_form_input(&form, "notes", "text");

        assert_eq!(text_of(&html, "#income-total"), "$0.00");
        assert_eq!(text_of(&html, "#net-total"), "$0.00");
    }

    #[tokio::test]
    async fn page_lists_records_and_totals_for_user() {
        let state = get_state();
        {
            let connection = state.db_connection.lock().unwrap();
            create_record(new_record(100.0, RecordType::Income, "u1"), &connection).unwrap();
            create_record(new_record(30.0, RecordType::Expense, "u1"), &connection).unwrap();
            create_record(new_record(999.0, RecordType::Income, "u2"), &connection).unwrap();
        }

        let response = get_tracker_page(State(state), query("u1"))
            .await
            .into_response();

        assert_status_ok(&response);
        let html = parse_html_document(response).await;
        let row_selector = Selector::parse("#records tbody tr").unwrap();
        assert_eq!(html.select(&row_selector).count(), 2);
        assert_eq!(text_of(&html, "#income-total"), "$100.00");
        assert_eq!(text_of(&html, "#expense-total"), "$30.00");
        assert_eq!(text_of(&html, "#net-total"), "$70.00");

        let delete_selector = Selector::parse("button[hx-delete='/records/1']").unwrap();
        assert!(html.select(&delete_selector).next().is_some());
    }

    #[tokio::test]
    async fn page_shows_short_dates_and_keeps_unparseable_text() {
        let state = get_state();
        {
            let connection = state.db_connection.lock().unwrap();
            create_record(new_record(100.0, RecordType::Income, "u1"), &connection).unwrap();
            let mut undated = new_record(5.0, RecordType::Expense, "u1");
            undated.date = "sometime".to_owned();
            create_record(undated, &connection).unwrap();
        }

        let response = get_tracker_page(State(state), query("u1"))
            .await
            .into_response();

        let html = parse_html_document(response).await;
        assert_eq!(
            text_of(&html, "#records tbody tr:nth-child(1) td:first-child"),
            "1/5/2024"
        );
        let time_selector =
            Selector::parse("#records tbody tr:nth-child(1) time[datetime='2024-01-05']").unwrap();
        assert!(html.select(&time_selector).next().is_some());
        assert_eq!(
            text_of(&html, "#records tbody tr:nth-child(2) td:first-child"),
            "sometime"
        );
    }

    #[tokio::test]
    async fn page_with_invalid_timezone_is_server_error() {
        let state = TrackerPageState {
            local_timezone: "Mars/Base".to_owned(),
            ..get_state()
        };

        let response = get_tracker_page(State(state), query("u1"))
            .await
            .into_response();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn submitting_form_creates_record_and_redirects() {
        let state = get_state();

        let response =
            create_tracker_record_endpoint(State(state.clone()), form(Some(100.0), "salary", "u1"))
                .await;

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_hx_redirect(&response, "/?user_id=u1");

        let connection = state.db_connection.lock().unwrap();
        let record = get_record(1, &connection).unwrap();
        assert_eq!(record.amount, 100.0);
        assert_eq!(record.notes, "salary");
        assert_eq!(record.user_id, "u1");
    }

    #[tokio::test]
    async fn invalid_form_shows_alert_and_creates_nothing() {
        let state = get_state();

        let response =
            create_tracker_record_endpoint(State(state.clone()), form(None, "salary", "u1")).await;

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let html = parse_html_fragment(response).await;
        assert!(
            text_of(&html, "[role=alert]").contains("the amount must be greater than zero")
        );

        let connection = state.db_connection.lock().unwrap();
        assert_eq!(count_records(&connection).unwrap(), 0);
    }

    #[tokio::test]
    async fn blank_notes_are_rejected() {
        let state = get_state();

        let response =
            create_tracker_record_endpoint(State(state.clone()), form(Some(5.0), "  ", "u1")).await;

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn deleting_record_redirects_to_owner_page() {
        let state = get_state();
        {
            let connection = state.db_connection.lock().unwrap();
            create_record(new_record(5.0, RecordType::Expense, "u 1"), &connection).unwrap();
        }

        let response = delete_tracker_record_endpoint(State(state.clone()), Path(1)).await;

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_hx_redirect(&response, "/?user_id=u+1");
        let connection = state.db_connection.lock().unwrap();
        assert_eq!(count_records(&connection).unwrap(), 0);
    }

    #[tokio::test]
    async fn deleting_missing_record_shows_alert() {
        let response = delete_tracker_record_endpoint(State(get_state()), Path(42)).await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let html = parse_html_fragment(response).await;
        assert_eq!(text_of(&html, "[role=alert] span"), "Could not find record");
    }

    #[test]
    fn tracker_url_encodes_user_id() {
        assert_eq!(tracker_url(""), "/");
        assert_eq!(tracker_url("u1"), "/?user_id=u1");
        assert_eq!(tracker_url("a&b"), "/?user_id=a%26b");
    }
}
