//! Goal processing — the three-goal system.
//!
//! A stated CPL goal can be absent, sandbagged, or wishful. Rather than
//! trusting it everywhere, the engine derives three variants:
//!   - display goal: the advertiser's stated goal, untouched;
//!   - operating goal (`effective_cpl_goal`): substitutes only
//!     missing/too-low goals, used by business logic and labels;
//!   - risk goal (`risk_cpl_goal`): substitutes every unrealistic goal
//!     and clamps the rest around the vertical median, used by the
//!     churn and expected-leads math so a bad goal cannot inflate risk.

use crate::{preprocess::RowFacts, types::Money};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GoalQuality {
    Missing,
    TooLow,
    Reasonable,
    TooHigh,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GoalAssessment {
    pub quality:            GoalQuality,
    pub effective_cpl_goal: Money,
    pub risk_cpl_goal:      Money,
    pub was_substituted:    bool,
    pub cpl_delta:          Money,
    pub cpl_variance_pct:   f64,
}

/// Classify a stated goal against the vertical median. A goal at
/// exactly half the median is still sandbagged.
pub fn classify_goal(goal: Option<Money>, median: Money) -> GoalQuality {
    match goal {
        None => GoalQuality::Missing,
        Some(g) if g <= 0.0 => GoalQuality::Missing,
        Some(g) if g <= 0.5 * median => GoalQuality::TooLow,
        Some(g) if g > 1.5 * median => GoalQuality::TooHigh,
        Some(_) => GoalQuality::Reasonable,
    }
}

pub fn assess(facts: &RowFacts) -> GoalAssessment {
    let median = facts.bench.cpl_median_or_default();
    let quality = classify_goal(facts.cpl_goal, median);

    let effective_cpl_goal = match quality {
        GoalQuality::Missing | GoalQuality::TooLow => median,
        _ => facts.cpl_goal.unwrap_or(median),
    };
    let risk_cpl_goal = match quality {
        GoalQuality::Reasonable => facts
            .cpl_goal
            .unwrap_or(median)
            .clamp(0.8 * median, 1.2 * median),
        _ => median,
    };
    let was_substituted = matches!(quality, GoalQuality::Missing | GoalQuality::TooLow);

    let cpl = facts.cpl_or(0.0);
    let cpl_delta = cpl - effective_cpl_goal;
    let cpl_variance_pct = if effective_cpl_goal > 0.0 {
        (cpl / effective_cpl_goal - 1.0) * 100.0
    } else {
        0.0
    };

    GoalAssessment {
        quality,
        effective_cpl_goal,
        risk_cpl_goal,
        was_substituted,
        cpl_delta,
        cpl_variance_pct,
    }
}
