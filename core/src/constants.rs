//! Calibrated model constants.
//!
//! RULE: Every tunable lives here under a name, and nowhere else.
//! Changing any value that alters scoring output must also bump
//! MODEL_VERSION — callers and stored runs key on that string.

use serde::{Deserialize, Serialize};

/// Version tag embedded in every scored row's `risk_drivers_json`.
pub const MODEL_VERSION: &str = "bookrisk-2025-09-18-scope-fixed";

// ── Cycle & pacing ───────────────────────────────────────────────────────────

/// Average billing-cycle length in days, used for pacing math.
pub const AVG_CYCLE: f64 = 30.4;

// ── Expected-leads projection ────────────────────────────────────────────────

/// Global click→lead conversion-rate prior, used when benchmark CPC is absent.
pub const GLOBAL_CR_PRIOR: f64 = 0.07;

/// Benchmark conversion rate is clamped to this window.
pub const CR_MIN: f64 = 0.01;
pub const CR_MAX: f64 = 0.25;

/// Fallback vertical CPL median when no benchmark exists for the category.
pub const FALLBACK_CPL_MEDIAN: f64 = 150.0;

/// Fallback benchmark CPC when no benchmark exists for the category.
pub const FALLBACK_CPC: f64 = 3.0;

/// Cap on the monthly expected-leads projection.
pub const EXPECTED_LEADS_CAP: f64 = 1_000_000.0;

// ── SEM viability floors (OR-combined) ───────────────────────────────────────

pub const SEM_MIN_BUDGET: f64        = 2_500.0;
pub const SEM_MIN_DAILY_CLICKS: f64  = 3.0;
pub const SEM_MIN_MONTHLY_LEADS: f64 = 10.0;

// ── Zero-lead gates ──────────────────────────────────────────────────────────

pub const MIN_DAYS_FOR_ALERTS: f64             = 5.0;
pub const MIN_SPEND_FOR_ZERO_LEAD: f64         = 100.0;
pub const ZERO_LEAD_MIN_EXPECTED_TD: f64       = 1.0;
pub const ZERO_LEAD_MIN_SPEND_PROGRESS: f64    = 0.4;
pub const ZERO_LEAD_LAST_MO_MIN_SPENDPROG: f64 = 0.5;
pub const REQUIRE_ROLLING_30D_LEADS: bool      = true;

// ── Churn calibration ────────────────────────────────────────────────────────

/// Baseline 90-day churn probability by tenure bucket.
pub const BASELINE_LTE_90D: f64 = 0.11;
pub const BASELINE_M3_6: f64    = 0.08;
pub const BASELINE_GT_6: f64    = 0.05;

/// Smooth CPL hazard curve: HR = 1 + alpha * (ratio - 1)^2, capped.
pub const CPL_HR_ALPHA: f64 = 0.35;
pub const CPL_HR_CAP: f64   = 3.5;

/// Hazard ratios for the remaining odds factors.
pub const SEVERE_LEAD_DEFICIT_HR: f64   = 2.8;
pub const MODERATE_LEAD_DEFICIT_HR: f64 = 1.6;
pub const ZERO_LEAD_EMERGING_HR: f64    = 1.80;
pub const ZERO_LEAD_CHRONIC_HR: f64     = 2.5;
pub const SINGLE_PRODUCT_HR: f64        = 1.35;

/// Churn-band breakpoints on the clamped probability.
pub const BAND_LOW_MAX: f64    = 0.15;
pub const BAND_MEDIUM_MAX: f64 = 0.30;
pub const BAND_HIGH_MAX: f64   = 0.45;

// ── Priority / FLARE ─────────────────────────────────────────────────────────

/// Composite weights over the three percentile inputs.
pub const PRIORITY_WEIGHT_CHURN: f64        = 0.50;
pub const PRIORITY_WEIGHT_RAR: f64          = 0.35;
pub const PRIORITY_WEIGHT_CONTROLLABLE: f64 = 0.15;

/// Tier percentile floors on the composite index: top 10% is P1,
/// the next 20% P2, the next 30% P3, the remainder P4.
pub const TIER_P1_PCTL: f64 = 0.90;
pub const TIER_P2_PCTL: f64 = 0.70;
pub const TIER_P3_PCTL: f64 = 0.40;

// ── Diagnostics ──────────────────────────────────────────────────────────────

pub const DOLLAR_RISK_HIGH: f64 = 5_000.0;
pub const DOLLAR_RISK_WARN: f64 = 2_000.0;

/// The calibration constants actually applied, echoed into every
/// scored row so downstream consumers can audit what produced it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConstantsUsed {
    pub single_product_hr: f64,
    pub cpl_hr_alpha:      f64,
    pub cpl_hr_cap:        f64,
    pub tenure_baselines:  TenureBaselines,
    pub priority_weights:  [f64; 3],
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TenureBaselines {
    pub lte_90d: f64,
    pub m3_6:    f64,
    pub gt_6:    f64,
}

impl ConstantsUsed {
    pub fn current() -> Self {
        Self {
            single_product_hr: SINGLE_PRODUCT_HR,
            cpl_hr_alpha:      CPL_HR_ALPHA,
            cpl_hr_cap:        CPL_HR_CAP,
            tenure_baselines:  TenureBaselines {
                lte_90d: BASELINE_LTE_90D,
                m3_6:    BASELINE_M3_6,
                gt_6:    BASELINE_GT_6,
            },
            priority_weights: [
                PRIORITY_WEIGHT_CHURN,
                PRIORITY_WEIGHT_RAR,
                PRIORITY_WEIGHT_CONTROLLABLE,
            ],
        }
    }
}
