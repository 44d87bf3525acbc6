//! Check-in journal: the submission flow around scorer and history.
//!
//! `submit` reads the prior check-in, scores against it and appends the
//! result while holding that patient's lock, so two devices submitting for
//! the same patient never score against the same stale prior entry.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::NaiveDate;
use thiserror::Error;
use uuid::Uuid;

use crate::history::{CheckInHistory, CheckInStore, HistoryError};
use crate::models::{CheckIn, CheckInSubmission, RiskLevel};
use crate::scoring::{self, ScoringError};

#[derive(Error, Debug)]
pub enum JournalError {
    #[error(transparent)]
    Scoring(#[from] ScoringError),

    #[error(transparent)]
    History(#[from] HistoryError),
}

/// Receives check-ins that scored `high` so a doctor-facing view can be told.
pub trait RiskAlertSink: Send + Sync {
    fn high_risk(&self, check_in: &CheckIn);
}

/// Default sink: records the alert in the log and nothing else.
pub struct LogAlertSink;

impl RiskAlertSink for LogAlertSink {
    fn high_risk(&self, check_in: &CheckIn) {
        tracing::warn!(
            patient_id = %check_in.patient_id,
            check_in_id = %check_in.id,
            pain_level = check_in.pain_level,
            "High-risk check-in, doctor should review"
        );
    }
}

pub struct CheckInJournal {
    store: Arc<dyn CheckInStore>,
    alerts: Arc<dyn RiskAlertSink>,
    patient_locks: Mutex<HashMap<Uuid, Arc<Mutex<()>>>>,
}

impl CheckInJournal {
    pub fn new(store: Arc<dyn CheckInStore>) -> Self {
        Self::with_alerts(store, Arc::new(LogAlertSink))
    }

    pub fn with_alerts(store: Arc<dyn CheckInStore>, alerts: Arc<dyn RiskAlertSink>) -> Self {
        Self {
            store,
            alerts,
            patient_locks: Mutex::new(HashMap::new()),
        }
    }

    pub fn history(&self, patient_id: Uuid) -> CheckInHistory {
        CheckInHistory::new(Arc::clone(&self.store), patient_id)
    }

    /// Scores a caregiver submission and records it in the patient's history.
    pub fn submit(
        &self,
        patient_id: Uuid,
        date: NaiveDate,
        submission: &CheckInSubmission,
    ) -> Result<CheckIn, JournalError> {
        if !submission.pain_in_range() {
            return Err(ScoringError::InvalidInput {
                pain_level: submission.pain_level,
            }
            .into());
        }

        let lock = self.patient_lock(&patient_id)?;
        let recorded = self.score_and_append(&lock, patient_id, date, submission);
        drop(lock);
        self.release_patient_lock(&patient_id);
        let check_in = recorded?;

        if check_in.risk_level == Some(RiskLevel::High) {
            self.alerts.high_risk(&check_in);
        }
        Ok(check_in)
    }

    fn score_and_append(
        &self,
        lock: &Mutex<()>,
        patient_id: Uuid,
        date: NaiveDate,
        submission: &CheckInSubmission,
    ) -> Result<CheckIn, JournalError> {
        let _guard = lock.lock().map_err(|_| HistoryError::LockPoisoned)?;
        let history = self.history(patient_id);
        let previous = history.most_recent()?;
        let assessment = scoring::score(submission, previous.as_ref())?;
        tracing::debug!(
            patient_id = %patient_id,
            score = assessment.score,
            risk_level = assessment.level.as_str(),
            "Check-in scored"
        );
        let check_in = assessment.apply(CheckIn::unscored(patient_id, date, submission));
        history.append(check_in.clone())?;
        Ok(check_in)
    }

    fn patient_lock(&self, patient_id: &Uuid) -> Result<Arc<Mutex<()>>, HistoryError> {
        let mut locks = self
            .patient_locks
            .lock()
            .map_err(|_| HistoryError::LockPoisoned)?;
        Ok(Arc::clone(locks.entry(*patient_id).or_default()))
    }

    /// Drops the patient's lock entry once no submission holds a handle to it.
    /// Handles are only cloned under the map lock, so a count of one means the
    /// map owns the last reference.
    fn release_patient_lock(&self, patient_id: &Uuid) {
        let Ok(mut locks) = self.patient_locks.lock() else {
            return;
        };
        if locks
            .get(patient_id)
            .is_some_and(|lock| Arc::strong_count(lock) == 1)
        {
            locks.remove(patient_id);
        }
    }

    #[cfg(test)]
    fn tracked_patients(&self) -> usize {
        self.patient_locks.lock().map(|locks| locks.len()).unwrap_or(0)
    }
}
