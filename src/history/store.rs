//! Storage port for check-in histories, plus the two backends.
//!
//! `CheckInHistory` only talks to `CheckInStore`, so tests run against
//! `MemoryCheckInStore` and the app runs against `SqliteCheckInStore`.

use std::collections::HashMap;
use std::path::Path;
use std::sync::{Mutex, RwLock};

use rusqlite::Connection;
use uuid::Uuid;

use crate::db::{self, DatabaseError};
use crate::models::CheckIn;

use super::HistoryError;

/// Read/append interface over persisted check-ins.
pub trait CheckInStore: Send + Sync {
    /// Most recent check-in for the patient.
    fn latest(&self, patient_id: &Uuid) -> Result<Option<CheckIn>, HistoryError>;

    /// Appends a check-in to the end of its patient's history.
    fn append(&self, check_in: &CheckIn) -> Result<(), HistoryError>;

    /// Whole history, oldest first.
    fn list(&self, patient_id: &Uuid) -> Result<Vec<CheckIn>, HistoryError>;

    /// The last `limit` check-ins, oldest first.
    fn recent(&self, patient_id: &Uuid, limit: usize) -> Result<Vec<CheckIn>, HistoryError>;

    fn contains(&self, patient_id: &Uuid, check_in_id: &Uuid) -> Result<bool, HistoryError>;

    fn count(&self, patient_id: &Uuid) -> Result<usize, HistoryError>;
}

// ═══════════════════════════════════════════
// In-memory store
// ═══════════════════════════════════════════

/// In-memory store backed by RwLock, one Vec per patient.
#[derive(Default)]
pub struct MemoryCheckInStore {
    histories: RwLock<HashMap<Uuid, Vec<CheckIn>>>,
}

impl MemoryCheckInStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CheckInStore for MemoryCheckInStore {
    fn latest(&self, patient_id: &Uuid) -> Result<Option<CheckIn>, HistoryError> {
        let histories = self.histories.read().map_err(|_| HistoryError::LockPoisoned)?;
        Ok(histories.get(patient_id).and_then(|h| h.last()).cloned())
    }

    fn append(&self, check_in: &CheckIn) -> Result<(), HistoryError> {
        let mut histories = self.histories.write().map_err(|_| HistoryError::LockPoisoned)?;
        histories
            .entry(check_in.patient_id)
            .or_default()
            .push(check_in.clone());
        Ok(())
    }

    fn list(&self, patient_id: &Uuid) -> Result<Vec<CheckIn>, HistoryError> {
        let histories = self.histories.read().map_err(|_| HistoryError::LockPoisoned)?;
        Ok(histories.get(patient_id).cloned().unwrap_or_default())
    }

    fn recent(&self, patient_id: &Uuid, limit: usize) -> Result<Vec<CheckIn>, HistoryError> {
        let histories = self.histories.read().map_err(|_| HistoryError::LockPoisoned)?;
        let Some(history) = histories.get(patient_id) else {
            return Ok(Vec::new());
        };
        let start = history.len().saturating_sub(limit);
        Ok(history[start..].to_vec())
    }

    fn contains(&self, patient_id: &Uuid, check_in_id: &Uuid) -> Result<bool, HistoryError> {
        let histories = self.histories.read().map_err(|_| HistoryError::LockPoisoned)?;
        Ok(histories
            .get(patient_id)
            .is_some_and(|h| h.iter().any(|c| &c.id == check_in_id)))
    }

    fn count(&self, patient_id: &Uuid) -> Result<usize, HistoryError> {
        let histories = self.histories.read().map_err(|_| HistoryError::LockPoisoned)?;
        Ok(histories.get(patient_id).map_or(0, Vec::len))
    }
}

// ═══════════════════════════════════════════
// SQLite store
// ═══════════════════════════════════════════

/// SQLite-backed store. The connection is not `Sync`, so it sits behind a Mutex.
pub struct SqliteCheckInStore {
    conn: Mutex<Connection>,
}

impl SqliteCheckInStore {
    pub fn new(conn: Connection) -> Self {
        Self {
            conn: Mutex::new(conn),
        }
    }

    pub fn open(path: &Path) -> Result<Self, DatabaseError> {
        Ok(Self::new(db::open_database(path)?))
    }

    pub fn open_in_memory() -> Result<Self, DatabaseError> {
        Ok(Self::new(db::open_memory_database()?))
    }

    fn with_conn<T>(
        &self,
        f: impl FnOnce(&Connection) -> Result<T, DatabaseError>,
    ) -> Result<T, HistoryError> {
        let conn = self.conn.lock().map_err(|_| HistoryError::LockPoisoned)?;
        Ok(f(&conn)?)
    }
}

impl CheckInStore for SqliteCheckInStore {
    fn latest(&self, patient_id: &Uuid) -> Result<Option<CheckIn>, HistoryError> {
        self.with_conn(|conn| db::get_latest_check_in(conn, patient_id))
    }

    fn append(&self, check_in: &CheckIn) -> Result<(), HistoryError> {
        self.with_conn(|conn| db::insert_check_in(conn, check_in))
    }

    fn list(&self, patient_id: &Uuid) -> Result<Vec<CheckIn>, HistoryError> {
        self.with_conn(|conn| db::get_check_ins_for_patient(conn, patient_id))
    }

    fn recent(&self, patient_id: &Uuid, limit: usize) -> Result<Vec<CheckIn>, HistoryError> {
        self.with_conn(|conn| db::get_recent_check_ins(conn, patient_id, limit))
    }

    fn contains(&self, _patient_id: &Uuid, check_in_id: &Uuid) -> Result<bool, HistoryError> {
        // ids are globally unique in the table
        self.with_conn(|conn| db::check_in_exists(conn, check_in_id))
    }

    fn count(&self, patient_id: &Uuid) -> Result<usize, HistoryError> {
        self.with_conn(|conn| db::count_check_ins(conn, patient_id))
    }
}
