//! The scoring engine — one batch transform over a campaign snapshot.
//!
//! EXECUTION ORDER (fixed, documented, never reordered):
//!   1. Preprocess        (coercion, utilization, pacing denominators)
//!   2. Goal processing   (three-goal system, CPL variance)
//!   3. Expected leads    (plan-based and spend-based projections)
//!   4. SEM viability     (capacity floors, OR-combined)
//!   5. Zero-lead states  (idle / emerging / chronic)
//!   6. SAFE detection    (six-rule performing override)
//!   7. Churn             (odds stacking, drivers, reconciliation)
//!   8. Priority / FLARE  (snapshot-wide percentiles, tiers)
//!   9. Diagnostics       (headline, pills, goal advice, issue)
//!
//! RULES:
//!   - Stages 1–7 are row-local; stage 8 needs the full snapshot.
//!   - Input rows are never mutated.
//!   - The engine holds no state across runs and performs no I/O.

use crate::{
    benchmark::BenchmarkLookup,
    churn::{self, ChurnAssessment},
    diagnostics,
    error::EngineResult,
    flare::{self, PriorityInputs},
    goals::{self, GoalAssessment},
    leads::{self, LeadExpectation},
    preprocess::{self, RowFacts},
    safe,
    snapshot::{CampaignSnapshot, ScoredCampaign},
    viability::{self, SemViability},
    zero_lead::{self, ZeroLeadFlags},
};

pub struct ScoringEngine<'b> {
    benchmarks: &'b dyn BenchmarkLookup,
}

struct WorkingRow {
    facts:       RowFacts,
    goals:       GoalAssessment,
    expectation: LeadExpectation,
    viability:   SemViability,
    flags:       ZeroLeadFlags,
    is_safe:     bool,
    churn:       ChurnAssessment,
}

impl<'b> ScoringEngine<'b> {
    pub fn new(benchmarks: &'b dyn BenchmarkLookup) -> Self {
        Self { benchmarks }
    }

    /// Score every row of a snapshot. Row order is preserved.
    pub fn score_book(&self, rows: &[CampaignSnapshot]) -> EngineResult<Vec<ScoredCampaign>> {
        let mut working = Vec::with_capacity(rows.len());
        for (index, row) in rows.iter().enumerate() {
            working.push(self.score_row(index, row)?);
        }

        let priority_inputs: Vec<PriorityInputs> = working
            .iter()
            .map(|w| PriorityInputs {
                churn_prob:         w.churn.p_clamped,
                revenue_at_risk:    w.churn.revenue_at_risk,
                controllable_share: w.churn.controllable_share,
                is_safe:            w.is_safe,
            })
            .collect();
        let priorities = flare::attach_priority(&priority_inputs);

        let scored: Vec<ScoredCampaign> = rows
            .iter()
            .zip(working)
            .zip(priorities)
            .map(|((row, w), priority)| {
                let (headline_diagnosis, headline_severity) = diagnostics::headline(
                    &w.facts,
                    &w.goals,
                    &w.expectation,
                    &w.flags,
                    w.is_safe,
                );
                let diagnosis_pills = diagnostics::diagnosis_pills(
                    &w.facts,
                    &w.goals,
                    &w.flags,
                    &w.viability,
                    w.is_safe,
                    w.churn.revenue_at_risk,
                );
                let goal_advice_json = diagnostics::goal_advice(&w.facts, &w.goals);
                let primary_issue = diagnostics::primary_issue(&w.facts, &w.goals);

                ScoredCampaign {
                    snapshot: row.clone(),

                    is_cpl_goal_missing:  w.facts.is_cpl_goal_missing,
                    goal_quality:         w.goals.quality,
                    goal_was_substituted: w.goals.was_substituted,
                    effective_cpl_goal:   w.goals.effective_cpl_goal,
                    risk_cpl_goal:        w.goals.risk_cpl_goal,
                    cpl_delta:            w.goals.cpl_delta,
                    cpl_variance_pct:     w.goals.cpl_variance_pct,

                    expected_leads_monthly:       w.expectation.monthly,
                    expected_leads_to_date:       w.expectation.to_date,
                    expected_leads_to_date_spend: w.expectation.to_date_spend,

                    sem_viable:         w.viability.viable(),
                    zero_lead_emerging: w.flags.emerging,
                    zero_lead_last_mo:  w.flags.chronic,
                    zero_lead_idle:     w.flags.idle,
                    is_safe:            w.is_safe,

                    churn_prob_90d:           w.churn.p_clamped,
                    churn_prob_90d_unclamped: w.churn.p_unclamped,
                    churn_risk_band:          w.churn.band,
                    revenue_at_risk:          w.churn.revenue_at_risk,
                    risk_drivers_json:        w.churn.drivers,

                    flare_score:    priority.index,
                    priority_index: priority.index,
                    priority_tier:  priority.tier,

                    primary_issue,
                    headline_diagnosis,
                    headline_severity,
                    diagnosis_pills,
                    goal_advice_json,

                    benchmark_fallback_used: w.facts.bench.fallback_used,
                    data_quality:            w.facts.data_quality.clone(),
                }
            })
            .collect();

        log::info!(
            "scored {} campaigns ({} SAFE, {} zero-lead)",
            scored.len(),
            scored.iter().filter(|r| r.is_safe).count(),
            scored
                .iter()
                .filter(|r| r.zero_lead_emerging || r.zero_lead_last_mo || r.zero_lead_idle)
                .count(),
        );
        Ok(scored)
    }

    fn score_row(&self, index: usize, row: &CampaignSnapshot) -> EngineResult<WorkingRow> {
        let facts = preprocess::prepare(index, row, self.benchmarks)?;
        let goal_assessment = goals::assess(&facts);
        let expectation = leads::project(&facts, &goal_assessment);
        let sem = viability::assess(&facts, &expectation);
        let flags = zero_lead::classify(&facts, &expectation, &sem);
        let is_safe = safe::is_clearly_performing(&facts, &goal_assessment, &expectation, &flags);
        let churn = churn::assess(&facts, &goal_assessment, &expectation, &sem, &flags, is_safe)?;

        Ok(WorkingRow {
            facts,
            goals: goal_assessment,
            expectation,
            viability: sem,
            flags,
            is_safe,
            churn,
        })
    }
}
