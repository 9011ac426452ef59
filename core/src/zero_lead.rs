//! Zero-lead classification.
//!
//! Three mutually exclusive states, split on spend and tenure:
//!   - idle:     no leads because the campaign is barely spending —
//!               a live-state problem, not a conversion crisis;
//!   - emerging: 5–29 days into the cycle, real spend, still nothing;
//!   - chronic:  30+ days of real spend with nothing to show, confirmed
//!               against the rolling 30-day lead count when the feed
//!               carries one.
//!
//! Exclusivity falls out of the gates: idle requires spend below the
//! floor, the other two require spend at or above it, and the day
//! windows of emerging and chronic do not overlap.

use crate::{
    constants::{
        MIN_DAYS_FOR_ALERTS, MIN_SPEND_FOR_ZERO_LEAD, REQUIRE_ROLLING_30D_LEADS,
        ZERO_LEAD_LAST_MO_MIN_SPENDPROG, ZERO_LEAD_MIN_EXPECTED_TD, ZERO_LEAD_MIN_SPEND_PROGRESS,
    },
    leads::LeadExpectation,
    preprocess::RowFacts,
    viability::SemViability,
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ZeroLeadFlags {
    pub idle:     bool,
    pub emerging: bool,
    pub chronic:  bool,
}

impl ZeroLeadFlags {
    /// The states that indicate a conversion failure. Idle rows are a
    /// pacing problem and do not disqualify SAFE or add churn factors.
    pub fn any_performance(&self) -> bool {
        self.emerging || self.chronic
    }
}

pub fn classify(
    facts: &RowFacts,
    expectation: &LeadExpectation,
    viability: &SemViability,
) -> ZeroLeadFlags {
    let days = facts.days_elapsed;
    let spend = facts.spent;

    if facts.leads > 0.0 || days < MIN_DAYS_FOR_ALERTS {
        return ZeroLeadFlags::default();
    }

    let idle = spend < MIN_SPEND_FOR_ZERO_LEAD;

    let emerging = !idle
        && days < 30.0
        && expectation.to_date >= ZERO_LEAD_MIN_EXPECTED_TD
        && facts.spend_progress >= ZERO_LEAD_MIN_SPEND_PROGRESS
        && viability.viable();

    let rolling_confirms = match facts.leads_rolling_30d {
        Some(v) => v == 0.0,
        None => false,
    };
    let chronic = !idle
        && days >= 30.0
        && facts.spend_progress >= ZERO_LEAD_LAST_MO_MIN_SPENDPROG
        && viability.viable()
        && (!REQUIRE_ROLLING_30D_LEADS || rolling_confirms);

    ZeroLeadFlags { idle, emerging, chronic }
}
