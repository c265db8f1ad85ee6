//! Default values for every configuration option. File names are relative
//! to the storage data directory.

// Storage defaults
pub const DEFAULT_DATA_DIR: &str = ".";
pub const DEFAULT_FILMS_FILE: &str = "films.xml";
pub const DEFAULT_SESSIONS_FILE: &str = "sessions.xml";
pub const DEFAULT_TICKETS_FILE: &str = "tickets.xml";
pub const DEFAULT_TEXT_SNAPSHOT_FILE: &str = "cinema_data.txt";
pub const DEFAULT_HTML_REPORT_FILE: &str = "cinema_films_report.html";
pub const DEFAULT_PIPELINE_REPORT_FILE: &str = "cinema_report_from_threads.html";
pub const DEFAULT_PRINTABLE_REPORT_FILE: &str = "cinema_films_report.pdf";

// Pipeline defaults
pub const DEFAULT_LOADER_DELAY_MS: u64 = 500;
pub const DEFAULT_MARKER_SUFFIX: &str = " (edited)";

// Report defaults
pub const DEFAULT_UNIT_PRICE: u64 = 350;
pub const DEFAULT_CURRENCY: &str = "RUB";

// Environment overrides, e.g. CINEMA_ADMIN_PIPELINE__MARKER_SUFFIX
pub const ENV_PREFIX: &str = "CINEMA_ADMIN_";
