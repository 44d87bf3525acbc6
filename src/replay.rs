//! Replays a file of recorded submissions through a journal.
//!
//! Scoring is deterministic, so replaying the same file into an empty store
//! always reproduces the same tiers and explanations.

use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use clap::Parser;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::config;
use crate::db::DatabaseError;
use crate::journal::{CheckInJournal, JournalError};
use crate::models::{CheckIn, CheckInSubmission};

#[derive(Error, Debug)]
pub enum ReplayError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid submissions file: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),

    #[error("Submission {index} failed: {source}")]
    Submission {
        index: usize,
        #[source]
        source: JournalError,
    },
}

/// One recorded caregiver submission.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReplayRecord {
    pub patient_id: Uuid,
    pub date: NaiveDate,
    #[serde(flatten)]
    pub submission: CheckInSubmission,
}

/// Command-line options for the replay binary.
#[derive(Debug, Clone, PartialEq, Eq, Parser)]
#[command(name = "carepulse", version)]
#[command(about = "Replays recorded caregiver submissions and prints each scored check-in as a JSON line", long_about = None)]
pub struct ReplayArgs {
    /// JSON array of submissions, each with patient_id and date
    pub input: PathBuf,

    /// SQLite file to record check-ins in (in-memory when omitted)
    #[arg(long = "db", value_name = "PATH")]
    pub database: Option<PathBuf>,

    /// Record into the default database under the app data directory
    #[arg(long, conflicts_with = "database")]
    pub persist: bool,
}

impl ReplayArgs {
    /// Database file to open, or `None` for an in-memory history.
    pub fn database_path(&self) -> Option<PathBuf> {
        match (&self.database, self.persist) {
            (Some(path), _) => Some(path.clone()),
            (None, true) => Some(config::database_path()),
            (None, false) => None,
        }
    }
}

pub fn load_records(path: &Path) -> Result<Vec<ReplayRecord>, ReplayError> {
    let raw = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&raw)?)
}

/// Submits records in file order. Stops at the first rejected submission.
pub fn replay(journal: &CheckInJournal, records: &[ReplayRecord]) -> Result<Vec<CheckIn>, ReplayError> {
    records
        .iter()
        .enumerate()
        .map(|(index, record)| {
            journal
                .submit(record.patient_id, record.date, &record.submission)
                .map_err(|source| ReplayError::Submission { index, source })
        })
        .collect()
}

/// Writes each check-in as one JSON line.
pub fn write_json_lines<W: Write>(out: &mut W, check_ins: &[CheckIn]) -> Result<(), ReplayError> {
    for check_in in check_ins {
        serde_json::to_writer(&mut *out, check_in)?;
        out.write_all(b"\n")?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::MemoryCheckInStore;
    use crate::models::RiskLevel;
    use std::sync::Arc;

    const PATIENT: &str = "6f209238-27e9-464e-881d-67b59b993a53";

    fn records_json() -> String {
        format!(
            r#"[
                {{"patient_id": "{PATIENT}", "date": "2026-01-14", "pain_level": 5, "symptoms": ["fatigue"], "voice_transcript": "Doing fine today"}},
                {{"patient_id": "{PATIENT}", "date": "2026-01-15", "pain_level": 6, "symptoms": ["fatigue", "sleep issues"], "voice_transcript": "Had sharp pain. Barely slept."}}
            ]"#
        )
    }

    fn run_once(records: &[ReplayRecord]) -> Vec<CheckIn> {
        let journal = CheckInJournal::new(Arc::new(MemoryCheckInStore::new()));
        replay(&journal, records).unwrap()
    }

    #[test]
    fn parses_records_with_flattened_submission() {
        let records: Vec<ReplayRecord> = serde_json::from_str(&records_json()).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].submission.pain_level, 6);
        assert_eq!(records[1].date.to_string(), "2026-01-15");
    }

    #[test]
    fn replay_reproduces_tiers_and_explanations() {
        let records: Vec<ReplayRecord> = serde_json::from_str(&records_json()).unwrap();
        let first = run_once(&records);
        let second = run_once(&records);

        assert_eq!(first[1].risk_level, Some(RiskLevel::High));
        for (a, b) in first.iter().zip(&second) {
            assert_eq!(a.risk_level, b.risk_level);
            assert_eq!(a.risk_explanation, b.risk_explanation);
        }
    }

    #[test]
    fn replay_reports_failing_index() {
        let mut records: Vec<ReplayRecord> = serde_json::from_str(&records_json()).unwrap();
        records[1].submission.pain_level = 0;
        let journal = CheckInJournal::new(Arc::new(MemoryCheckInStore::new()));
        let err = replay(&journal, &records).unwrap_err();
        assert!(matches!(err, ReplayError::Submission { index: 1, .. }));
    }

    #[test]
    fn load_records_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("submissions.json");
        std::fs::write(&path, records_json()).unwrap();
        assert_eq!(load_records(&path).unwrap().len(), 2);
    }

    #[test]
    fn json_lines_output() {
        let records: Vec<ReplayRecord> = serde_json::from_str(&records_json()).unwrap();
        let check_ins = run_once(&records);
        let mut buf = Vec::new();
        write_json_lines(&mut buf, &check_ins).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        let parsed: CheckIn = serde_json::from_str(lines[1]).unwrap();
        assert_eq!(parsed, check_ins[1]);
    }

    #[test]
    fn args_parsing() {
        let args = ReplayArgs::try_parse_from(["carepulse", "in.json"]).unwrap();
        assert_eq!(args.input, PathBuf::from("in.json"));
        assert!(args.database_path().is_none());

        let args = ReplayArgs::try_parse_from(["carepulse", "in.json", "--db", "out.db"]).unwrap();
        assert_eq!(args.database_path(), Some(PathBuf::from("out.db")));

        let args = ReplayArgs::try_parse_from(["carepulse", "--db=out.db", "in.json"]).unwrap();
        assert_eq!(args.input, PathBuf::from("in.json"));
        assert_eq!(args.database, Some(PathBuf::from("out.db")));

        let args = ReplayArgs::try_parse_from(["carepulse", "--", "--odd-name.json"]).unwrap();
        assert_eq!(args.input, PathBuf::from("--odd-name.json"));
    }

    #[test]
    fn args_help_and_errors() {
        let err = ReplayArgs::try_parse_from(["carepulse", "--help"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayHelp);

        let err = ReplayArgs::try_parse_from(["carepulse"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::MissingRequiredArgument);

        let err = ReplayArgs::try_parse_from(["carepulse", "in.json", "--db"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::InvalidValue);
    }

    #[test]
    fn persist_uses_default_database() {
        let args = ReplayArgs::try_parse_from(["carepulse", "in.json", "--persist"]).unwrap();
        assert_eq!(args.database_path(), Some(config::database_path()));

        let err = ReplayArgs::try_parse_from(["carepulse", "in.json", "--persist", "--db", "x.db"])
            .unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::ArgumentConflict);
    }
}
