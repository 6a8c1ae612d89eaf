//! Application router configuration.

use axum::{
    Router,
    routing::{delete, get, post},
};

use crate::{
    AppState,
    auth::{get_session_endpoint, log_in_endpoint, log_out_endpoint},
    endpoints,
    not_found::get_404_not_found,
    record::{
        create_record_endpoint, delete_record_endpoint, list_records_endpoint,
        update_record_endpoint,
    },
    tracker::{create_tracker_record_endpoint, delete_tracker_record_endpoint, get_tracker_page},
};

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    let page_routes = Router::new()
        .route(endpoints::ROOT, get(get_tracker_page))
        .route(
            endpoints::TRACKER_RECORDS,
            post(create_tracker_record_endpoint),
        )
        .route(
            endpoints::TRACKER_RECORD,
            delete(delete_tracker_record_endpoint),
        );

    let api_routes = Router::new()
        .route(
            endpoints::RECORDS_API,
            get(list_records_endpoint)
                .post(create_record_endpoint)
                .put(update_record_endpoint)
                .delete(delete_record_endpoint),
        )
        .route(endpoints::LOG_IN_API, post(log_in_endpoint))
        .route(endpoints::SESSION_API, get(get_session_endpoint))
        .route(endpoints::LOG_OUT_API, get(log_out_endpoint));

    page_routes
        .merge(api_routes)
        .fallback(get_404_not_found)
        .with_state(state)
}
