use std::path::PathBuf;

/// Application-level constants
pub const APP_NAME: &str = "Carepulse";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// File name of the check-in database inside the data directory.
pub const DATABASE_FILE: &str = "check_ins.db";

/// Get the application data directory (~/Carepulse/).
/// Falls back to the working directory when no home directory is known.
pub fn app_data_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_NAME)
}

/// Default location of the check-in database.
pub fn database_path() -> PathBuf {
    app_data_dir().join(DATABASE_FILE)
}

/// Log filter used when `RUST_LOG` is not set.
pub fn default_log_filter() -> &'static str {
    "carepulse_lib=info,carepulse=info,warn"
}
