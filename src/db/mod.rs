pub mod repository;
pub mod sqlite;

pub use repository::*;
pub use sqlite::*;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DatabaseError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Invalid enum value for {field}: {value}")]
    InvalidEnum { field: String, value: String },

    #[error("Migration failed at version {version}: {reason}")]
    MigrationFailed { version: i64, reason: String },

    #[error("Constraint violated: {0}")]
    ConstraintViolation(String),

    #[error("JSON column error: {0}")]
    Json(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    use crate::models::RiskLevel;

    fn kind(err: &DatabaseError) -> &'static str {
        match err {
            DatabaseError::Sqlite(_) => "sqlite",
            DatabaseError::InvalidEnum { .. } => "invalid_enum",
            DatabaseError::MigrationFailed { .. } => "migration",
            DatabaseError::ConstraintViolation(_) => "constraint",
            DatabaseError::Json(_) => "json",
        }
    }

    #[test]
    fn variants_are_produced_by_the_crate() {
        let conn = open_memory_database().unwrap();
        let sqlite: DatabaseError = conn.execute("SELECT * FROM missing", []).unwrap_err().into();
        assert_eq!(kind(&sqlite), "sqlite");

        let invalid = RiskLevel::from_str("severe").unwrap_err();
        assert_eq!(kind(&invalid), "invalid_enum");
        assert!(invalid.to_string().contains("severe"));

        let json: DatabaseError = serde_json::from_str::<Vec<String>>("{").unwrap_err().into();
        assert_eq!(kind(&json), "json");
    }
}
