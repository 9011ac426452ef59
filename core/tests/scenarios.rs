//! End-to-end scenarios over the full pipeline. All rows share the
//! fixture defaults: 30-day cycle, $3 benchmark CPC, $100 vertical
//! median, single product.

mod common;

use approx::assert_relative_eq;
use bookrisk_core::{ChurnRiskBand, PillKind, PriorityTier, Severity};
use common::{base_row, score_one};

/// S1 — healthy mid-cycle: on goal, on volume, SAFE via the standard
/// good-performance rule.
#[test]
fn healthy_mid_cycle() {
    let mut row = base_row("s1");
    row.amount_spent = Some(1_500.0);
    row.days_elapsed = Some(15.0);
    row.running_cid_leads = Some(20.0);
    row.running_cid_cpl = Some(75.0);
    row.cpl_goal = Some(80.0);

    let scored = score_one(row);
    assert!(scored.is_safe);
    assert!(scored.churn_prob_90d <= 0.11);
    assert_eq!(scored.priority_tier, PriorityTier::P4Low);
    assert_eq!(scored.headline_diagnosis, "PERFORMING — ON TRACK");
    assert_eq!(scored.headline_severity, Severity::Healthy);
    assert_eq!(scored.diagnosis_pills.len(), 1);
    assert_eq!(scored.diagnosis_pills[0].text, "Performing");
    assert_eq!(scored.diagnosis_pills[0].kind, PillKind::Success);
}

/// S2 — chronic zero lead on a mature account: the chronic factor and
/// the single-product factor stack on the long-tenure baseline.
#[test]
fn chronic_zero_lead() {
    let mut row = base_row("s2");
    row.io_cycle = Some(7.0); // > 6 months tenure → 0.05 baseline
    row.campaign_budget = Some(5_000.0);
    row.amount_spent = Some(4_000.0);
    row.days_elapsed = Some(45.0);
    row.cpl_goal = Some(100.0);
    row.leads_rolling_30d = Some(0.0);

    let scored = score_one(row);
    assert!(scored.zero_lead_last_mo);
    assert!(!scored.zero_lead_emerging && !scored.zero_lead_idle);

    let drivers = &scored.risk_drivers_json.drivers;
    let names: Vec<&str> = drivers.iter().map(|d| d.name.as_str()).collect();
    assert_eq!(names, vec!["Zero leads (30+ days)", "Single Product"]);
    assert_relative_eq!(drivers[0].lift_x, 2.5);
    assert_relative_eq!(drivers[1].lift_x, 1.35);

    // odds 0.05/0.95 × 2.5 × 1.35 ≈ 0.1776 → p ≈ 0.151
    assert_eq!(scored.risk_drivers_json.baseline, 5);
    assert_relative_eq!(scored.churn_prob_90d_unclamped, 0.151, epsilon = 1e-3);
    assert_eq!(scored.churn_risk_band, ChurnRiskBand::Medium);
    assert_eq!(scored.headline_diagnosis, "ZERO LEADS — NO CONVERSIONS");
    assert_eq!(scored.headline_severity, Severity::Critical);
}

/// S3 — high CPL on a new account: the hazard curve caps at 3.5 and
/// the headline escalates to a crisis.
#[test]
fn high_cpl_new_account() {
    let mut row = base_row("s3");
    row.campaign_budget = Some(2_000.0);
    row.amount_spent = Some(800.0);
    row.days_elapsed = Some(20.0);
    row.running_cid_leads = Some(2.0);
    row.running_cid_cpl = Some(450.0);
    row.cpl_goal = Some(100.0);

    let scored = score_one(row);
    assert!(!scored.is_safe);

    let drivers = &scored.risk_drivers_json.drivers;
    let cpl = drivers.iter().find(|d| d.name == "High CPL (≥3× goal)").unwrap();
    assert_relative_eq!(cpl.lift_x, 3.5); // 1 + 0.35 × 3.5² = 5.29, capped
    let single = drivers.iter().find(|d| d.name == "Single Product").unwrap();
    assert_relative_eq!(single.lift_x, 1.35);

    assert_eq!(scored.headline_diagnosis, "CPL CRISIS — NEW ACCOUNT — LOW LEADS");
    assert_eq!(scored.headline_severity, Severity::Critical);
}

/// S4 — goal misaligned but performing: an absurd $5 goal against a
/// $100 median is substituted, the row is SAFE on raw efficiency, and
/// the goal advisory surfaces.
#[test]
fn goal_misaligned_but_performing() {
    let mut row = base_row("s4");
    row.campaign_budget = Some(2_000.0);
    row.amount_spent = Some(1_000.0);
    row.days_elapsed = Some(14.0);
    row.running_cid_leads = Some(10.0);
    row.running_cid_cpl = Some(40.0);
    row.cpl_goal = Some(5.0);

    let scored = score_one(row);
    assert!(scored.is_safe); // obviously excellent: 40 ≤ 50, 10 leads
    assert!(scored.goal_was_substituted);
    assert_relative_eq!(scored.effective_cpl_goal, 100.0);
    assert_eq!(scored.headline_diagnosis, "PERFORMING — ON TRACK");
    assert_eq!(
        scored.goal_advice_json.status,
        bookrisk_core::diagnostics::GoalAdviceStatus::TooLow
    );
    assert!(scored.goal_advice_json.show);
}

/// S5 — underpacing: utilization ≈ 0.225 dominates the story; the CPL
/// variance (20%) is not headline-worthy.
#[test]
fn underpacing() {
    let mut row = base_row("s5");
    row.campaign_budget = Some(10_000.0);
    row.amount_spent = Some(1_500.0);
    row.days_elapsed = Some(20.0);
    row.running_cid_leads = Some(5.0);
    row.running_cid_cpl = Some(300.0);
    row.cpl_goal = Some(250.0);

    let scored = score_one(row);
    assert_relative_eq!(scored.cpl_variance_pct, 20.0);
    assert_eq!(scored.headline_diagnosis, "UNDERPACING — 77% BEHIND");
    assert_eq!(scored.headline_severity, Severity::Warning);
    assert!(scored.diagnosis_pills.iter().any(|p| p.text == "Pacing -77%"));
}

/// S6 — idle: barely spending and nothing converted. Not a crisis and
/// not a churn factor — idle suppresses the zero-lead multipliers.
#[test]
fn idle() {
    let mut row = base_row("s6");
    row.campaign_budget = Some(1_000.0);
    row.amount_spent = Some(10.0);
    row.days_elapsed = Some(10.0);

    let scored = score_one(row);
    assert!(scored.zero_lead_idle);
    assert!(!scored.zero_lead_emerging && !scored.zero_lead_last_mo);
    assert_eq!(scored.headline_diagnosis, "NOT SPENDING — ZERO LEADS");
    assert_eq!(scored.headline_severity, Severity::Warning);

    // Only the structural factor contributes.
    let names: Vec<&str> =
        scored.risk_drivers_json.drivers.iter().map(|d| d.name.as_str()).collect();
    assert_eq!(names, vec!["Single Product"]);
}
