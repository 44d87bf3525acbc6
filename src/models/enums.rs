use crate::db::DatabaseError;
use serde::{Deserialize, Serialize};

/// Macro to generate enum with as_str + std::str::FromStr pattern.
/// Serde uses the same string as `as_str`, so stored rows and JSON agree.
macro_rules! str_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $s:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(#[serde(rename = $s)] $variant),+
        }

        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $s),+
                }
            }
        }

        impl std::str::FromStr for $name {
            type Err = DatabaseError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($s => Ok(Self::$variant)),+,
                    _ => Err(DatabaseError::InvalidEnum {
                        field: stringify!($name).into(),
                        value: s.into(),
                    }),
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

str_enum!(
    /// Coarse urgency tier of a scored check-in.
    RiskLevel {
        Low => "low",
        Medium => "medium",
        High => "high",
    }
);

str_enum!(
    /// Symptoms a caregiver can tick on the daily check-in form.
    SymptomTag {
        Fatigue => "fatigue",
        SleepIssues => "sleep issues",
        DifficultyMoving => "difficulty moving",
        Swelling => "swelling",
        Nausea => "nausea",
        Dizziness => "dizziness",
        Fever => "fever",
        LossOfAppetite => "loss of appetite",
    }
);

str_enum!(
    /// Tone label derived from the transcript word counts.
    SentimentLabel {
        Negative => "Negative tone detected",
        Positive => "Positive tone detected",
        Neutral => "Neutral tone",
    }
);

impl RiskLevel {
    /// Tier for an accumulated risk score.
    pub fn from_score(score: i32) -> Self {
        if score >= 50 {
            Self::High
        } else if score >= 30 {
            Self::Medium
        } else {
            Self::Low
        }
    }
}

impl SymptomTag {
    pub const ALL: [SymptomTag; 8] = [
        Self::Fatigue,
        Self::SleepIssues,
        Self::DifficultyMoving,
        Self::Swelling,
        Self::Nausea,
        Self::Dizziness,
        Self::Fever,
        Self::LossOfAppetite,
    ];
}
