//! Risk scoring for daily check-ins.
//!
//! Turns pain level, symptom tags and the transcript into a tier plus the
//! explanation a clinician sees next to it.

pub mod engine;
pub mod transcript;
pub mod trend;

pub use engine::{score, RiskScorer};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::{CheckIn, RiskExplanation, RiskLevel};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScoringError {
    #[error("Invalid input: pain level {pain_level} outside 1-10")]
    InvalidInput { pain_level: i32 },
}

/// Output of one scoring pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskAssessment {
    pub score: i32,
    pub level: RiskLevel,
    pub explanation: RiskExplanation,
}

impl RiskAssessment {
    /// Stamps tier and explanation onto an unscored check-in.
    pub fn apply(self, mut check_in: CheckIn) -> CheckIn {
        check_in.risk_level = Some(self.level);
        check_in.risk_explanation = Some(self.explanation);
        check_in
    }
}
