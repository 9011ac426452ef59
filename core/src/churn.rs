//! 90-day churn probability via odds stacking.
//!
//! The model is deliberately rule-based: a tenure-bucket baseline
//! converted to odds, an ordered list of calibrated hazard-ratio
//! factors multiplied in, and the result converted back to a
//! probability. Every factor also yields a SHAP-style percentage-point
//! contribution, so baseline + driver points reconciles to the
//! unclamped total. Do not replace the stack with a learned model —
//! the waterfall decomposition is the product.
//!
//! RULES:
//!   - Factor order is part of the public contract: CPL, lead deficit,
//!     zero-lead emerging, zero-lead chronic, single product.
//!   - The SAFE clamp applies AFTER the unclamped probability and the
//!     drivers are computed, never before.
//!   - Driver points must reconcile to the unclamped total within
//!     ±1 pp; a larger drift is a bug and aborts the run.

use crate::{
    constants::{
        BAND_HIGH_MAX, BAND_LOW_MAX, BAND_MEDIUM_MAX, BASELINE_GT_6, BASELINE_LTE_90D,
        BASELINE_M3_6, CPL_HR_ALPHA, CPL_HR_CAP, MODEL_VERSION, MODERATE_LEAD_DEFICIT_HR,
        SEVERE_LEAD_DEFICIT_HR, SINGLE_PRODUCT_HR, ZERO_LEAD_CHRONIC_HR, ZERO_LEAD_EMERGING_HR,
        ConstantsUsed,
    },
    error::{EngineError, EngineResult},
    goals::GoalAssessment,
    leads::LeadExpectation,
    preprocess::RowFacts,
    types::{Days, Money},
    viability::SemViability,
    zero_lead::ZeroLeadFlags,
};
use serde::{Deserialize, Serialize};

// ── Public types ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TenureBucket {
    #[serde(rename = "LTE_90D")]
    Lte90d,
    #[serde(rename = "M3_6")]
    M3To6,
    #[serde(rename = "GT_6")]
    Gt6,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ChurnRiskBand {
    Low,
    Medium,
    High,
    Critical,
}

/// One factor's percentage-point attribution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskDriver {
    pub name:            String,
    /// Signed percentage points, rounded to one decimal.
    pub points:          f64,
    pub is_controllable: bool,
    pub explanation:     String,
    pub lift_x:          f64,
}

/// The auditable decomposition embedded in every scored row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskDrivers {
    /// Cohort baseline in whole percentage points.
    pub baseline:        i64,
    pub drivers:         Vec<RiskDriver>,
    pub p_unclamped_pct: i64,
    pub p_clamped_pct:   i64,
    pub is_safe:         bool,
    /// True when the SAFE clamp actually moved the headline number.
    pub safe_clamped:    bool,
    pub model_version:   String,
    pub constants_used:  ConstantsUsed,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChurnAssessment {
    pub tenure_bucket:      TenureBucket,
    pub base_p:             f64,
    pub p_unclamped:        f64,
    pub p_clamped:          f64,
    pub band:               ChurnRiskBand,
    pub revenue_at_risk:    Money,
    pub controllable_share: f64,
    pub drivers:            RiskDrivers,
}

// ── Baseline ─────────────────────────────────────────────────────────────────

pub fn tenure_bucket(io_cycle: f64, avg_cycle_length: Days, days_elapsed: Days) -> TenureBucket {
    let total_days = (io_cycle - 1.0).max(0.0) * avg_cycle_length + days_elapsed;
    let months = total_days / 30.0;
    if months <= 3.0 {
        TenureBucket::Lte90d
    } else if months <= 6.0 {
        TenureBucket::M3To6
    } else {
        TenureBucket::Gt6
    }
}

pub fn tenure_baseline(bucket: TenureBucket) -> f64 {
    let p = match bucket {
        TenureBucket::Lte90d => BASELINE_LTE_90D,
        TenureBucket::M3To6  => BASELINE_M3_6,
        TenureBucket::Gt6    => BASELINE_GT_6,
    };
    p.clamp(0.01, 0.95)
}

// ── Odds factors ─────────────────────────────────────────────────────────────

/// Smooth CPL hazard curve: HR = 1 + alpha * (ratio - 1)^2, capped.
pub fn cpl_hazard_ratio(ratio: f64) -> f64 {
    if ratio <= 1.0 {
        return 1.0;
    }
    let excess = ratio - 1.0;
    (1.0 + CPL_HR_ALPHA * excess * excess).min(CPL_HR_CAP)
}

fn cpl_driver_label(ratio: f64) -> Option<&'static str> {
    if ratio >= 3.0 {
        Some("High CPL (≥3× goal)")
    } else if ratio >= 1.5 {
        Some("Elevated CPL (1.5–3×)")
    } else if ratio >= 1.2 {
        Some("CPL above goal (1.2–1.5×)")
    } else {
        None
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct OddsFactor {
    pub name:         &'static str,
    pub multiplier:   f64,
    pub controllable: bool,
}

/// Build the ordered factor list for one row. Order is contractual.
pub fn collect_odds_factors(
    facts: &RowFacts,
    goals: &GoalAssessment,
    expectation: &LeadExpectation,
    viability: &SemViability,
    flags: &ZeroLeadFlags,
) -> Vec<OddsFactor> {
    let mut factors = Vec::new();

    // CPL factor. Neutral ratio when either side is unusable, so a
    // missing goal can never read as "good CPL".
    let cpl_ratio = match (facts.cpl, goals.effective_cpl_goal) {
        (Some(cpl), goal) if goal > 0.0 => cpl / goal,
        _ => 1.0,
    };
    if cpl_ratio >= 1.2 {
        let hr = cpl_hazard_ratio(cpl_ratio);
        if let Some(label) = cpl_driver_label(cpl_ratio) {
            if hr > 1.0 {
                factors.push(OddsFactor { name: label, multiplier: hr, controllable: true });
            }
        }
    }

    // Lead-deficit factors. An emerging/chronic zero-lead state reads
    // the same signal; the two families must not stack.
    if !flags.any_performance() {
        let lead_ratio = expectation.lead_ratio(facts.leads);
        let days = facts.days_elapsed;
        if lead_ratio <= 0.25 && facts.spend_progress >= 0.5 && days >= 7.0 && viability.viable() {
            factors.push(OddsFactor {
                name:         "Severe lead deficit (≤25% of plan)",
                multiplier:   SEVERE_LEAD_DEFICIT_HR,
                controllable: true,
            });
        } else if lead_ratio <= 0.50
            && facts.spend_progress >= 0.4
            && days >= 5.0
            && viability.viable()
        {
            factors.push(OddsFactor {
                name:         "Moderate lead deficit (≤50% of plan)",
                multiplier:   MODERATE_LEAD_DEFICIT_HR,
                controllable: true,
            });
        }
    }

    if flags.emerging {
        factors.push(OddsFactor {
            name:         "Zero leads (emerging)",
            multiplier:   ZERO_LEAD_EMERGING_HR,
            controllable: true,
        });
    }
    if flags.chronic {
        factors.push(OddsFactor {
            name:         "Zero leads (30+ days)",
            multiplier:   ZERO_LEAD_CHRONIC_HR,
            controllable: true,
        });
    }

    if facts.product_count == 1.0 {
        factors.push(OddsFactor {
            name:         "Single Product",
            multiplier:   SINGLE_PRODUCT_HR,
            controllable: false,
        });
    }

    factors
}

// ── Probability & decomposition ──────────────────────────────────────────────

fn round1(v: f64) -> f64 {
    (v * 10.0).round() / 10.0
}

/// Sequential odds walk: each factor's contribution is the probability
/// delta it causes given everything stacked before it.
fn shap_points(base_p: f64, factors: &[OddsFactor]) -> Vec<RiskDriver> {
    let mut odds = base_p / (1.0 - base_p);
    factors
        .iter()
        .map(|f| {
            let p_before = odds / (1.0 + odds);
            odds *= f.multiplier;
            let p_after = odds / (1.0 + odds);
            RiskDriver {
                name:            f.name.to_string(),
                points:          round1((p_after - p_before) * 100.0),
                is_controllable: f.controllable,
                explanation:     format!("Factor multiplier: {:.2}x", f.multiplier),
                lift_x:          f.multiplier,
            }
        })
        .collect()
}

pub fn band_for(p_clamped: f64) -> ChurnRiskBand {
    if p_clamped <= BAND_LOW_MAX {
        ChurnRiskBand::Low
    } else if p_clamped <= BAND_MEDIUM_MAX {
        ChurnRiskBand::Medium
    } else if p_clamped <= BAND_HIGH_MAX {
        ChurnRiskBand::High
    } else {
        ChurnRiskBand::Critical
    }
}

pub fn assess(
    facts: &RowFacts,
    goals: &GoalAssessment,
    expectation: &LeadExpectation,
    viability: &SemViability,
    flags: &ZeroLeadFlags,
    is_safe: bool,
) -> EngineResult<ChurnAssessment> {
    let bucket = tenure_bucket(facts.io_cycle, facts.avg_cycle_length, facts.days_elapsed);
    let base_p = tenure_baseline(bucket);

    let factors = collect_odds_factors(facts, goals, expectation, viability, flags);

    let mut odds = base_p / (1.0 - base_p);
    for f in &factors {
        odds *= f.multiplier;
    }
    let p_unclamped = (odds / (1.0 + odds)).clamp(0.01, 0.99);
    let p_clamped = if is_safe { p_unclamped.min(base_p) } else { p_unclamped };

    let drivers = shap_points(base_p, &factors);

    // Reconciliation: whole-point baseline + whole-point drivers must
    // land within ±1 pp of the unclamped total.
    let baseline_pp = (base_p * 100.0).round() as i64;
    let driver_sum_pp = baseline_pp + drivers.iter().map(|d| d.points.round() as i64).sum::<i64>();
    let target_pp = (p_unclamped * 100.0).round() as i64;
    if (driver_sum_pp - target_pp).abs() > 1 {
        return Err(EngineError::DriverReconciliation {
            campaign_id: facts.campaign_id.clone(),
            driver_sum_pp,
            target_pp,
        });
    }

    let points_total: f64 = drivers.iter().map(|d| d.points).sum();
    let points_controllable: f64 =
        drivers.iter().filter(|d| d.is_controllable).map(|d| d.points).sum();
    let controllable_share = points_controllable / points_total.max(1.0);

    Ok(ChurnAssessment {
        tenure_bucket: bucket,
        base_p,
        p_unclamped,
        p_clamped,
        band: band_for(p_clamped),
        revenue_at_risk: facts.budget * p_clamped,
        controllable_share,
        drivers: RiskDrivers {
            baseline: baseline_pp,
            drivers,
            p_unclamped_pct: (p_unclamped * 100.0).round() as i64,
            p_clamped_pct: (p_clamped * 100.0).round() as i64,
            is_safe,
            safe_clamped: is_safe && (p_unclamped - p_clamped > 0.01),
            model_version: MODEL_VERSION.to_string(),
            constants_used: ConstantsUsed::current(),
        },
    })
}
