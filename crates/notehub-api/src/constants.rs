//! API constants

/// Prefix for catalog and note routes. The delete endpoint keeps its legacy root path.
pub const API_PREFIX: &str = "/api/v0";

/// Default and maximum page size for the recent-notes listing
pub const DEFAULT_RECENT_NOTES_LIMIT: i64 = 50;
pub const MAX_RECENT_NOTES_LIMIT: i64 = 200;
