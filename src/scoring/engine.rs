//! Weighted point accumulation over one check-in, then tier mapping.
//!
//! Each signal adds its points independently; none short-circuits another.

use crate::models::{CheckIn, CheckInSubmission, RiskExplanation, RiskLevel, SymptomTag};

use super::transcript::{count_tone_words, detect_keywords};
use super::trend::{absolute_pain_points, PainChange};
use super::{RiskAssessment, ScoringError};

pub const NEW_SYMPTOM_POINTS: i32 = 20;
pub const KEYWORD_POINTS: i32 = 15;
pub const NEGATIVE_TONE_POINTS: i32 = 10;

/// Scores `current` against the patient's prior check-in, if any.
///
/// Pure and deterministic: the same inputs always give the same assessment.
pub fn score(
    current: &CheckInSubmission,
    previous: Option<&CheckIn>,
) -> Result<RiskAssessment, ScoringError> {
    if !current.pain_in_range() {
        return Err(ScoringError::InvalidInput {
            pain_level: current.pain_level,
        });
    }

    let mut risk_score = 0;
    let mut explanation = RiskExplanation::default();

    if let Some(prev) = previous {
        let change = PainChange::between(prev.pain_level, current.pain_level);
        risk_score += change.points();
        explanation.pain_change = Some(change.describe());
    }

    let prior_symptoms: &[SymptomTag] = previous.map(|p| p.symptoms.as_slice()).unwrap_or(&[]);
    let new_symptoms: Vec<SymptomTag> = current
        .distinct_symptoms()
        .into_iter()
        .filter(|tag| !prior_symptoms.contains(tag))
        .collect();
    if !new_symptoms.is_empty() {
        risk_score += NEW_SYMPTOM_POINTS;
        explanation.new_symptoms = Some(new_symptoms);
    }

    risk_score += absolute_pain_points(current.pain_level);

    let keywords = detect_keywords(&current.voice_transcript);
    if !keywords.is_empty() {
        risk_score += KEYWORD_POINTS;
        explanation.keywords = Some(keywords);
    }

    let tone = count_tone_words(&current.voice_transcript);
    if tone.negative > tone.positive {
        risk_score += NEGATIVE_TONE_POINTS;
    }
    explanation.sentiment_analysis = Some(tone.label());

    let level = RiskLevel::from_score(risk_score);
    tracing::debug!(
        score = risk_score,
        risk_level = level.as_str(),
        has_previous = previous.is_some(),
        "Scored check-in"
    );

    Ok(RiskAssessment {
        score: risk_score,
        level,
        explanation,
    })
}

/// Stateless entry point for callers that prefer an object at the seam.
#[derive(Debug, Clone, Copy, Default)]
pub struct RiskScorer;

impl RiskScorer {
    pub fn new() -> Self {
        Self
    }

    pub fn score(
        &self,
        current: &CheckInSubmission,
        previous: Option<&CheckIn>,
    ) -> Result<RiskAssessment, ScoringError> {
        score(current, previous)
    }
}
