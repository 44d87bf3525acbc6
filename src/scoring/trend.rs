//! Pain trend against the prior check-in.

/// Delta at or above which an increase counts as significant.
pub const SIGNIFICANT_INCREASE_DELTA: i32 = 3;

pub const SIGNIFICANT_INCREASE_POINTS: i32 = 30;
pub const INCREASE_POINTS: i32 = 15;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PainTrend {
    SignificantIncrease,
    Increase,
    Stable,
    /// Any decrease, whatever its size.
    Improving,
}

/// Pain movement from `previous` to `current` with its contribution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PainChange {
    pub previous: i32,
    pub current: i32,
    pub trend: PainTrend,
}

impl PainChange {
    pub fn between(previous: i32, current: i32) -> Self {
        let delta = current - previous;
        let trend = if delta >= SIGNIFICANT_INCREASE_DELTA {
            PainTrend::SignificantIncrease
        } else if delta >= 1 {
            PainTrend::Increase
        } else if delta <= -1 {
            PainTrend::Improving
        } else {
            PainTrend::Stable
        };
        Self {
            previous,
            current,
            trend,
        }
    }

    pub fn points(&self) -> i32 {
        match self.trend {
            PainTrend::SignificantIncrease => SIGNIFICANT_INCREASE_POINTS,
            PainTrend::Increase => INCREASE_POINTS,
            PainTrend::Stable | PainTrend::Improving => 0,
        }
    }

    pub fn describe(&self) -> String {
        let (prev, curr) = (self.previous, self.current);
        match self.trend {
            PainTrend::SignificantIncrease => format!("Significant pain increase ({prev}\u{2192}{curr})"),
            PainTrend::Increase => format!("Pain increased ({prev}\u{2192}{curr})"),
            PainTrend::Improving => format!("Pain decreased ({prev}\u{2192}{curr}) - improving"),
            PainTrend::Stable => "Pain level stable".to_string(),
        }
    }
}

/// Score contribution of the absolute pain level.
pub fn absolute_pain_points(pain_level: i32) -> i32 {
    if pain_level >= 7 {
        25
    } else if pain_level >= 5 {
        10
    } else {
        0
    }
}
