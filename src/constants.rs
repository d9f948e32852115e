//! Endpoint constants for the www.space-track.org REST API.
//! See https://www.space-track.org/documentation for the query grammar.

/// Source identifier used in run records, metrics labels, and log lines
pub const SPACE_TRACK_API: &str = "space_track";

/// Base URI of the catalog service
pub const URI_BASE: &str = "https://www.space-track.org";

/// Login endpoint (form POST with identity/password)
pub const REQUEST_LOGIN: &str = "/ajaxauth/login";

/// Logout endpoint, invoked best-effort when the session closes
pub const REQUEST_LOGOUT: &str = "/ajaxauth/logout";

/// Query action prefix for basic space data requests
pub const REQUEST_CMD_ACTION: &str = "/basicspacedata/query";

// The catalog query picks up one latest-element row per object with a recent
// epoch and mean motion above 11.25 rev/day. The string must match the remote
// query grammar byte for byte; do not reformat it.
pub const REQUEST_CATALOG: &str =
    "/class/tle_latest/ORDINAL/1/EPOCH/>now-30/MEAN_MOTION/>11.25/format/csv";
