use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::enums::{RiskLevel, SentimentLabel, SymptomTag};

/// Lowest accepted pain level on the check-in slider.
pub const PAIN_LEVEL_MIN: i32 = 1;
/// Highest accepted pain level on the check-in slider.
pub const PAIN_LEVEL_MAX: i32 = 10;

/// Raw caregiver input, before scoring.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckInSubmission {
    pub pain_level: i32,
    #[serde(default)]
    pub symptoms: Vec<SymptomTag>,
    /// Speech-to-text output or typed note; treated identically.
    #[serde(default)]
    pub voice_transcript: String,
}

impl CheckInSubmission {
    pub fn new(pain_level: i32, symptoms: Vec<SymptomTag>, voice_transcript: impl Into<String>) -> Self {
        Self {
            pain_level,
            symptoms,
            voice_transcript: voice_transcript.into(),
        }
    }

    pub fn pain_in_range(&self) -> bool {
        (PAIN_LEVEL_MIN..=PAIN_LEVEL_MAX).contains(&self.pain_level)
    }

    /// Symptoms with repeats removed, first occurrence keeps its position.
    pub fn distinct_symptoms(&self) -> Vec<SymptomTag> {
        let mut seen = Vec::with_capacity(self.symptoms.len());
        for tag in &self.symptoms {
            if !seen.contains(tag) {
                seen.push(*tag);
            }
        }
        seen
    }
}

/// Why a check-in landed in its tier. Absent fields did not apply.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskExplanation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pain_change: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_symptoms: Option<Vec<SymptomTag>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sentiment_analysis: Option<SentimentLabel>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keywords: Option<Vec<String>>,
}

/// One day's check-in for a patient.
///
/// `risk_level` and `risk_explanation` come from the same scoring pass;
/// a record missing either one is unscored and cannot enter a history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckIn {
    pub id: Uuid,
    pub patient_id: Uuid,
    pub date: NaiveDate,
    pub pain_level: i32,
    pub symptoms: Vec<SymptomTag>,
    pub voice_transcript: String,
    pub risk_level: Option<RiskLevel>,
    pub risk_explanation: Option<RiskExplanation>,
}

impl CheckIn {
    /// Builds a check-in from a submission without a risk assessment.
    pub fn unscored(patient_id: Uuid, date: NaiveDate, submission: &CheckInSubmission) -> Self {
        Self {
            id: Uuid::new_v4(),
            patient_id,
            date,
            pain_level: submission.pain_level,
            symptoms: submission.distinct_symptoms(),
            voice_transcript: submission.voice_transcript.clone(),
            risk_level: None,
            risk_explanation: None,
        }
    }

    pub fn is_scored(&self) -> bool {
        self.risk_level.is_some() && self.risk_explanation.is_some()
    }
}
