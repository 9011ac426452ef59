//! SAFE detection — the golden rule for "clearly performing".
//!
//! A disjunction of six predicates. Any single match marks the row
//! SAFE, which caps its churn probability at the tenure baseline and
//! collapses its diagnostics to a healthy state. The rules trade off
//! tenure, volume, and efficiency; an emerging or chronic zero-lead
//! state disqualifies all of them.

use crate::{
    goals::GoalAssessment, leads::LeadExpectation, preprocess::RowFacts, zero_lead::ZeroLeadFlags,
};

/// CPL stand-in when the feed has none: pessimistic enough that no
/// efficiency predicate can pass on missing data.
const UNKNOWN_CPL: f64 = 999.0;

pub fn is_clearly_performing(
    facts: &RowFacts,
    goals: &GoalAssessment,
    expectation: &LeadExpectation,
    flags: &ZeroLeadFlags,
) -> bool {
    if flags.any_performance() {
        return false;
    }

    let days = facts.days_elapsed;
    let spent = facts.spent;
    let leads = facts.leads;
    let cpl = facts.cpl_or(UNKNOWN_CPL);
    let bench = facts.bench.cpl_median_or_default();
    let lead_ratio = expectation.lead_ratio(leads);

    // 1. Early winner: under a week in, already converting at volume.
    let early_winner =
        (2.0..=7.0).contains(&days) && spent >= 500.0 && leads >= 3.0 && cpl <= 2.0 * bench;

    // 2. Standard good: on goal with decent volume and enough data.
    let standard_good = cpl <= 1.1 * goals.effective_cpl_goal
        && lead_ratio >= 0.8
        && days >= 10.0
        && leads >= 3.0;

    // 3. Obviously excellent: half the vertical cost at real volume,
    //    regardless of every other signal.
    let obviously_excellent = cpl <= 0.5 * bench && leads >= 10.0;

    // 4. New and thriving.
    let new_and_thriving = (5.0..30.0).contains(&days)
        && (lead_ratio >= 0.6 || leads >= 1.0)
        && cpl <= 0.8 * bench
        && spent >= 300.0;

    // 5. New with excellent efficiency: volume not required yet.
    let new_excellent_efficiency =
        (3.0..30.0).contains(&days) && leads >= 1.0 && cpl <= 0.7 * bench && spent >= 100.0;

    // 6. Beating the advertiser's own goal by 20%+.
    let goal_performance = match facts.cpl_goal {
        Some(goal) if goal > 0.0 => cpl <= 0.8 * goal && leads >= 1.0,
        _ => false,
    };

    let safe = early_winner
        || standard_good
        || obviously_excellent
        || new_and_thriving
        || new_excellent_efficiency
        || goal_performance;

    if safe {
        log::debug!(
            "campaign {}: SAFE (ew={early_winner} sg={standard_good} oe={obviously_excellent} \
             nt={new_and_thriving} ne={new_excellent_efficiency} gp={goal_performance})",
            facts.campaign_id,
        );
    }
    safe
}
