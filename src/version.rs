// Version information for the Restoration Node

/// Full version string with feature description
pub const VERSION: &str = "v1.2.0-bounded-polling-2026-10-18";

/// Semantic version number
pub const VERSION_NUMBER: &str = "1.2.0";

/// Major version number
pub const VERSION_MAJOR: u32 = 1;

/// Minor version number
pub const VERSION_MINOR: u32 = 2;

/// Patch version number
pub const VERSION_PATCH: u32 = 0;

/// Build date
pub const BUILD_DATE: &str = "2026-10-18";

/// Supported features in this version
pub const FEATURES: &[&str] = &[
    "room-restoration",
    "gaming-room-prompt",
    "fixed-window-quota",
    "upstash-quota",
    "bounded-polling",
    "graceful-shutdown",
    "tagged-outcome-endpoint",
];

/// Breaking changes from previous version
pub const BREAKING_CHANGES: &[&str] = &[
    "Polling stops after POLL_TIMEOUT_SECS (default 300) and returns 504; set 0 to poll until the job finishes",
    "Jobs still pending at shutdown end with 503",
];

/// Get formatted version string for logging
pub fn get_version_string() -> String {
    format!("Restoration Node {} ({})", VERSION_NUMBER, BUILD_DATE)
}

/// Get full version info for API responses
pub fn get_version_info() -> serde_json::Value {
    serde_json::json!({
        "version": VERSION_NUMBER,
        "build": VERSION,
        "date": BUILD_DATE,
        "features": FEATURES,
        "breaking_changes": BREAKING_CHANGES,
    })
}
