//! The API endpoints URIs.
//!
//! For endpoints that take a parameter, e.g., '/records/{record_id}', use [format_endpoint].

/// The tracker page.
pub const ROOT: &str = "/";
/// The route the tracker form is submitted to.
pub const TRACKER_RECORDS: &str = "/records";
/// The route the tracker page deletes a single record with.
pub const TRACKER_RECORD: &str = "/records/{record_id}";

/// The route for listing, creating, updating and deleting records.
pub const RECORDS_API: &str = "/api/v1/slip";
/// The route for logging in.
pub const LOG_IN_API: &str = "/api/auth/log_in";
/// The route for getting the current session.
pub const SESSION_API: &str = "/api/auth/session";
/// The route for the client to log out.
pub const LOG_OUT_API: &str = "/api/auth/log_out";

/// Replace the parameter in `endpoint_path` with `id`.
///
/// A parameter is a string that starts with a left brace, followed by
/// lowercase letters or underscores, and ends with a right brace.
/// For example, in the endpoint path '/records/{record_id}', '{record_id}' is the parameter.
///
/// This function assumes that an endpoint path only contains ASCII characters
/// and a single parameter.
///
/// If no parameter is found in `endpoint_path`, the function returns the
/// the original `endpoint_path`.
pub fn format_endpoint(endpoint_path: &str, id: i64) -> String {
    let Some(param_start) = endpoint_path.find('{') else {
        return endpoint_path.to_string();
    };

    let param_end = endpoint_path[param_start..]
        .find('}')
        .map(|end| param_start + end + 1)
        .unwrap_or(endpoint_path.len());

    format!(
        "{}{}{}",
        &endpoint_path[..param_start],
        id,
        &endpoint_path[param_end..]
    )
}
