//! Preprocessing — the first stage of every run.
//!
//! Coerces each input row into a fully numeric working set:
//!   1. Fills required fields with neutral defaults, recording a
//!      data-quality warning for each one used downstream.
//!   2. Sanitizes utilization (the feed mixes percent and fraction
//!      encodings) with a pacing-based fallback.
//!   3. Derives the pacing denominators every later stage shares:
//!      `ideal_spend_to_date` and `spend_progress`.
//!
//! A row without a campaign id is structurally unusable and aborts
//! the run with a configuration error.

use crate::{
    benchmark::{self, BenchmarkLookup, RowBenchmarks},
    constants::AVG_CYCLE,
    error::{EngineError, EngineResult},
    snapshot::CampaignSnapshot,
    types::{CampaignId, Days, Money},
};

/// The numeric working set for one row, shared by every later stage.
#[derive(Debug, Clone)]
pub struct RowFacts {
    pub campaign_id:      CampaignId,
    pub io_cycle:         f64,
    pub avg_cycle_length: Days,
    pub days_elapsed:     Days,
    /// Observed runtime across cycles; derived from the cycle fields
    /// when the feed does not carry it.
    pub true_days_running: Days,
    pub budget:            Money,
    pub spent:             Money,
    pub leads:             f64,
    /// Absent when the feed could not compute a CPL (no leads booked).
    pub cpl:               Option<Money>,
    /// Sanitized utilization in [0, 2].
    pub utilization:       f64,
    pub cpl_goal:            Option<Money>,
    pub is_cpl_goal_missing: bool,
    pub product_count:       f64,
    pub leads_rolling_30d:   Option<f64>,
    /// Budget prorated over the full IO at `days_elapsed`.
    pub ideal_spend_to_date: Money,
    /// `spent / ideal_spend_to_date`, clamped to [0, 2].
    pub spend_progress: f64,
    pub bench:           RowBenchmarks,
    pub data_quality:    Vec<String>,
}

impl RowFacts {
    pub fn true_months_running(&self) -> f64 {
        self.true_days_running / 30.0
    }

    /// CPL with a pessimistic default for predicates that must not
    /// pass when the CPL is unknown.
    pub fn cpl_or(&self, default: Money) -> Money {
        self.cpl.unwrap_or(default)
    }
}

fn required(
    value: Option<f64>,
    field: &str,
    default: f64,
    campaign_id: &str,
    dq: &mut Vec<String>,
) -> f64 {
    match value {
        Some(v) => v,
        None => {
            let msg = format!("{field} absent; defaulted to {default}");
            log::warn!("campaign {campaign_id}: {msg}");
            dq.push(msg);
            default
        }
    }
}

pub fn prepare(
    index: usize,
    row: &CampaignSnapshot,
    benchmarks: &dyn BenchmarkLookup,
) -> EngineResult<RowFacts> {
    if row.campaign_id.trim().is_empty() {
        return Err(EngineError::Configuration {
            detail: format!("row {index} has no campaign_id"),
        });
    }
    let cid = row.campaign_id.clone();
    let mut dq = Vec::new();

    let io_cycle = required(row.io_cycle, "io_cycle", 1.0, &cid, &mut dq).max(1.0);
    let avg_cycle_length = match row.avg_cycle_length {
        Some(v) if v > 0.0 => v,
        _ => AVG_CYCLE,
    };
    let days_elapsed = required(row.days_elapsed, "days_elapsed", 0.0, &cid, &mut dq).max(0.0);
    let budget = required(row.campaign_budget, "campaign_budget", 0.0, &cid, &mut dq).max(0.0);
    let spent = required(row.amount_spent, "amount_spent", 0.0, &cid, &mut dq).max(0.0);
    let leads = required(row.running_cid_leads, "running_cid_leads", 0.0, &cid, &mut dq).max(0.0);
    let product_count =
        required(row.advertiser_product_count, "advertiser_product_count", 1.0, &cid, &mut dq);

    if row.running_cid_cpl.is_none() {
        dq.push("running_cid_cpl absent".into());
    }
    let cpl = row.running_cid_cpl.filter(|v| v.is_finite() && *v >= 0.0);

    let true_days_running = match row.true_days_running {
        Some(v) if v >= 0.0 => v,
        _ => ((io_cycle - 1.0).max(0.0) * avg_cycle_length + days_elapsed).max(0.0),
    };

    // Pacing denominator: budget prorated over the full IO span.
    let total_io_days = io_cycle * avg_cycle_length;
    let ideal_spend_to_date = if total_io_days > 0.0 {
        (budget / total_io_days) * days_elapsed
    } else {
        0.0
    };
    let spend_progress = (spent / ideal_spend_to_date.max(1.0)).clamp(0.0, 2.0);

    // Utilization: >= 3 means the feed sent percent, not fraction.
    let sanitized = row.utilization.map(|u| if u >= 3.0 { u / 100.0 } else { u });
    let fallback = if ideal_spend_to_date > 0.0 {
        (spent / ideal_spend_to_date).clamp(0.0, 2.0)
    } else {
        0.0
    };
    let utilization = match sanitized {
        Some(u) if u > 0.0 && u <= 2.0 => u,
        _ => fallback,
    };

    let is_cpl_goal_missing = !matches!(row.cpl_goal, Some(g) if g > 0.0);

    Ok(RowFacts {
        campaign_id: cid,
        io_cycle,
        avg_cycle_length,
        days_elapsed,
        true_days_running,
        budget,
        spent,
        leads,
        cpl,
        utilization,
        cpl_goal: row.cpl_goal,
        is_cpl_goal_missing,
        product_count,
        leads_rolling_30d: row.leads_rolling_30d,
        ideal_spend_to_date,
        spend_progress,
        bench: benchmark::resolve(row, benchmarks),
        data_quality: dq,
    })
}
