//! Per-patient check-in history.
//!
//! Append-only and kept in insertion order, which is also date order
//! because appends never go back in time. Only scored check-ins
//! get in; the scorer reads `most_recent()` as "the prior check-in".

pub mod store;

pub use store::{CheckInStore, MemoryCheckInStore, SqliteCheckInStore};

use std::sync::Arc;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::db::DatabaseError;
use crate::models::{CheckIn, RiskLevel};

/// Number of check-ins the doctor-facing pain chart shows.
pub const TREND_WINDOW: usize = 7;

#[derive(Error, Debug)]
pub enum HistoryError {
    #[error("Check-in {id} has no risk assessment")]
    Unscored { id: Uuid },

    #[error("Check-in {id} is already in the history")]
    AlreadyPresent { id: Uuid },

    #[error("Check-in {id} belongs to patient {found}, history is for {expected}")]
    WrongPatient { id: Uuid, expected: Uuid, found: Uuid },

    #[error("Check-in {id} dated {date} precedes latest entry dated {latest}")]
    OutOfOrder {
        id: Uuid,
        date: NaiveDate,
        latest: NaiveDate,
    },

    #[error("Storage error: {0}")]
    Storage(#[from] DatabaseError),

    #[error("History lock poisoned")]
    LockPoisoned,
}

impl HistoryError {
    /// True for errors caused by the record itself rather than the store.
    /// These point at a bug upstream and must not be retried.
    pub fn is_invariant_violation(&self) -> bool {
        matches!(
            self,
            Self::Unscored { .. }
                | Self::AlreadyPresent { .. }
                | Self::WrongPatient { .. }
                | Self::OutOfOrder { .. }
        )
    }
}

/// One point of the pain chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrendPoint {
    pub date: NaiveDate,
    pub pain_level: i32,
}

/// A single patient's check-in history over a storage port.
#[derive(Clone)]
pub struct CheckInHistory {
    store: Arc<dyn CheckInStore>,
    patient_id: Uuid,
}

impl CheckInHistory {
    pub fn new(store: Arc<dyn CheckInStore>, patient_id: Uuid) -> Self {
        Self { store, patient_id }
    }

    pub fn patient_id(&self) -> Uuid {
        self.patient_id
    }

    /// Last appended check-in, `None` for a new patient.
    pub fn most_recent(&self) -> Result<Option<CheckIn>, HistoryError> {
        self.store.latest(&self.patient_id)
    }

    /// Appends a fully scored check-in.
    pub fn append(&self, check_in: CheckIn) -> Result<(), HistoryError> {
        if !check_in.is_scored() {
            return Err(HistoryError::Unscored { id: check_in.id });
        }
        if check_in.patient_id != self.patient_id {
            return Err(HistoryError::WrongPatient {
                id: check_in.id,
                expected: self.patient_id,
                found: check_in.patient_id,
            });
        }
        if self.store.contains(&self.patient_id, &check_in.id)? {
            return Err(HistoryError::AlreadyPresent { id: check_in.id });
        }
        if let Some(latest) = self.store.latest(&self.patient_id)? {
            if check_in.date < latest.date {
                return Err(HistoryError::OutOfOrder {
                    id: check_in.id,
                    date: check_in.date,
                    latest: latest.date,
                });
            }
        }

        self.store.append(&check_in)?;
        tracing::info!(
            patient_id = %self.patient_id,
            check_in_id = %check_in.id,
            date = %check_in.date,
            risk_level = check_in.risk_level.map(|l| l.as_str()).unwrap_or_default(),
            "Check-in appended"
        );
        Ok(())
    }

    /// Full history, oldest first.
    pub fn all(&self) -> Result<Vec<CheckIn>, HistoryError> {
        self.store.list(&self.patient_id)
    }

    /// Last `n` check-ins, oldest first.
    pub fn recent(&self, n: usize) -> Result<Vec<CheckIn>, HistoryError> {
        self.store.recent(&self.patient_id, n)
    }

    /// Pain levels of the last `n` check-ins for charting.
    pub fn pain_trend(&self, n: usize) -> Result<Vec<TrendPoint>, HistoryError> {
        Ok(self
            .recent(n)?
            .into_iter()
            .map(|c| TrendPoint {
                date: c.date,
                pain_level: c.pain_level,
            })
            .collect())
    }

    /// Tier of the latest check-in; a patient with no check-ins is low.
    pub fn current_risk_level(&self) -> Result<RiskLevel, HistoryError> {
        Ok(self
            .most_recent()?
            .and_then(|c| c.risk_level)
            .unwrap_or(RiskLevel::Low))
    }

    pub fn len(&self) -> Result<usize, HistoryError> {
        self.store.count(&self.patient_id)
    }

    pub fn is_empty(&self) -> Result<bool, HistoryError> {
        Ok(self.len()? == 0)
    }
}
