//! Expected-leads projection.
//!
//! Plan-based expectation goes clicks-first: budget over benchmark CPC
//! gives expected clicks, a benchmark conversion rate turns clicks into
//! leads. When the vertical has no usable CPC the projection falls back
//! to budget over the risk CPL goal. A spend-based variant answers
//! "how many leads should the money already spent have bought".

use crate::{
    constants::{
        AVG_CYCLE, CR_MAX, CR_MIN, EXPECTED_LEADS_CAP, FALLBACK_CPL_MEDIAN, GLOBAL_CR_PRIOR,
    },
    goals::GoalAssessment,
    preprocess::RowFacts,
};

#[derive(Debug, Clone, PartialEq)]
pub struct LeadExpectation {
    pub monthly:       f64,
    pub to_date:       f64,
    pub to_date_spend: f64,
}

impl LeadExpectation {
    /// Actual leads over plan-based expectation, clamped to [0, 10].
    /// The 0.1 floor keeps brand-new rows out of division trouble.
    pub fn lead_ratio(&self, leads: f64) -> f64 {
        (leads / self.to_date.max(0.1)).clamp(0.0, 10.0)
    }
}

pub fn project(facts: &RowFacts, goals: &GoalAssessment) -> LeadExpectation {
    let budget = facts.budget;
    let cpl_target = if goals.risk_cpl_goal > 0.0 {
        goals.risk_cpl_goal
    } else {
        FALLBACK_CPL_MEDIAN
    };
    let bench = facts.bench.cpl_median_or_default();

    // Benchmark conversion rate with guardrails; the global prior
    // covers verticals with junk CPC data.
    let cpc = facts.bench.cpc_average;
    let cr = match cpc {
        Some(c) => {
            let raw = c / bench;
            if raw.is_finite() && raw > 0.0 {
                raw.clamp(CR_MIN, CR_MAX)
            } else {
                GLOBAL_CR_PRIOR
            }
        }
        None => GLOBAL_CR_PRIOR,
    };

    let expected_clicks = cpc.map(|c| budget / c);
    let monthly = expected_clicks
        .map(|clicks| clicks * cr)
        .unwrap_or(budget / cpl_target)
        .clamp(0.0, EXPECTED_LEADS_CAP);

    let pacing = (facts.days_elapsed / AVG_CYCLE).clamp(0.0, 2.0);

    LeadExpectation {
        monthly,
        to_date: monthly * pacing,
        to_date_spend: if cpl_target > 0.0 { facts.spent / cpl_target } else { 0.0 },
    }
}
