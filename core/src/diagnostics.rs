//! Diagnostic generation — headline, pills, goal advice, issue category.
//!
//! Everything here is presentation over already-computed signals. The
//! headline ladder is strict precedence: the first matching rule wins
//! and SAFE always wins. Pills are OR-combined independent signals.
//! All artifacts degrade to neutral values on thin data; nothing in
//! this module can fail a run.

use crate::{
    constants::{DOLLAR_RISK_HIGH, DOLLAR_RISK_WARN, MIN_DAYS_FOR_ALERTS, MIN_SPEND_FOR_ZERO_LEAD},
    goals::{GoalAssessment, GoalQuality},
    leads::LeadExpectation,
    preprocess::RowFacts,
    types::Money,
    viability::SemViability,
    zero_lead::ZeroLeadFlags,
};
use serde::{Deserialize, Serialize};

// ── Public types ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Healthy,
    Neutral,
    Warning,
    Critical,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PillKind {
    Success,
    Warning,
    Critical,
    Neutral,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pill {
    pub text: String,
    #[serde(rename = "type")]
    pub kind: PillKind,
}

impl Pill {
    fn new(text: impl Into<String>, kind: PillKind) -> Self {
        Self { text: text.into(), kind }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PrimaryIssue {
    ConversionFailure,
    EfficiencyCrisis,
    Underpacing,
    Performing,
    Monitoring,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GoalAdviceStatus {
    Missing,
    TooLow,
    Ambitious,
    Reasonable,
    TooHigh,
    WildlyHigh,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkWindow {
    pub p25: f64,
    pub p50: f64,
    pub p75: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RecommendedGoal {
    pub point: f64,
    pub range: [f64; 2],
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceBands {
    pub vs_goal:        String,
    pub vs_recommended: String,
}

/// Compact, UI-ready advisory about CPL goal realism.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoalAdvice {
    pub show:                 bool,
    pub status:               GoalAdviceStatus,
    pub goal_advertiser:      Option<Money>,
    pub goal_effective:       Option<Money>,
    pub goal_was_substituted: bool,
    pub benchmark:            BenchmarkWindow,
    pub recommended:          RecommendedGoal,
    pub performance_band:     PerformanceBands,
    pub rationale:            String,
}

// ── Headline ─────────────────────────────────────────────────────────────────

/// One headline per row, chosen by strict precedence.
pub fn headline(
    facts: &RowFacts,
    goals: &GoalAssessment,
    expectation: &LeadExpectation,
    flags: &ZeroLeadFlags,
    is_safe: bool,
) -> (String, Severity) {
    if is_safe {
        return ("PERFORMING — ON TRACK".into(), Severity::Healthy);
    }

    let days = facts.days_elapsed;
    let spend = facts.spent;
    let leads = facts.leads;
    let cpl_pct = goals.cpl_variance_pct;

    // Spend stopped mid-flight (leads prove it was delivering before);
    // a row that never converted reads as idle zero-lead instead.
    if days >= MIN_DAYS_FOR_ALERTS && spend < MIN_SPEND_FOR_ZERO_LEAD && leads > 0.0 {
        return ("NOT SPENDING — CHECK LIVE STATE".into(), Severity::Warning);
    }
    if flags.idle {
        return ("NOT SPENDING — ZERO LEADS".into(), Severity::Warning);
    }
    if flags.emerging || flags.chronic {
        return ("ZERO LEADS — NO CONVERSIONS".into(), Severity::Critical);
    }

    if cpl_pct > 300.0 && facts.io_cycle <= 3.0 && leads <= 5.0 {
        return ("CPL CRISIS — NEW ACCOUNT — LOW LEADS".into(), Severity::Critical);
    }
    if cpl_pct > 100.0 {
        let severity = if cpl_pct <= 200.0 { Severity::Warning } else { Severity::Critical };
        return (
            format!(
                "HIGH CPL — ${} vs ${} GOAL",
                facts.cpl_or(0.0) as i64,
                goals.effective_cpl_goal as i64
            ),
            severity,
        );
    }

    // New account, spending on pace, still behind the curve. If the
    // only symptom is pacing the row reads UNDERPACING below.
    if facts.io_cycle <= 3.0 && facts.utilization >= 0.5 {
        return ("NEW ACCOUNT AT RISK".into(), Severity::Warning);
    }
    if facts.utilization > 0.0 && facts.utilization < 0.5 {
        let pct = ((1.0 - facts.utilization) * 100.0) as i64;
        return (format!("UNDERPACING — {pct}% BEHIND"), Severity::Warning);
    }

    let on_goal = cpl_pct < -20.0
        || (expectation.to_date_spend > 0.0 && leads >= expectation.to_date_spend);
    if on_goal {
        return ("PERFORMING — ON/UNDER GOAL".into(), Severity::Healthy);
    }

    let median = facts.bench.cpl_median_or_default();
    let absurd_goal = goals.quality == GoalQuality::TooLow
        && matches!(facts.cpl_goal, Some(g) if g > 0.0 && g < 0.5 * median);
    if absurd_goal {
        return ("GOAL MISALIGNED — Reset Required".into(), Severity::Warning);
    }

    ("MONITORING FOR CHANGES".into(), Severity::Neutral)
}

// ── Pills ────────────────────────────────────────────────────────────────────

pub fn diagnosis_pills(
    facts: &RowFacts,
    goals: &GoalAssessment,
    flags: &ZeroLeadFlags,
    viability: &SemViability,
    is_safe: bool,
    revenue_at_risk: Money,
) -> Vec<Pill> {
    if is_safe {
        return vec![Pill::new("Performing", PillKind::Success)];
    }

    let mut pills = Vec::new();

    if flags.any_performance() {
        pills.push(Pill::new("Zero Leads", PillKind::Critical));
    } else if flags.idle {
        pills.push(Pill::new("Zero Leads (Idle)", PillKind::Warning));
    } else if facts.days_elapsed >= MIN_DAYS_FOR_ALERTS
        && facts.leads == 0.0
        && viability.viable()
    {
        pills.push(Pill::new("No Leads Yet", PillKind::Warning));
    }

    let cpl_pct = goals.cpl_variance_pct;
    if cpl_pct.abs() > 20.0 {
        let pct = cpl_pct as i64;
        let kind = if pct > 200 { PillKind::Critical } else { PillKind::Warning };
        pills.push(Pill::new(format!("CPL {pct:+}%"), kind));
    }

    if facts.true_months_running() <= 3.0 {
        pills.push(Pill::new("Early Account", PillKind::Warning));
    }

    if facts.product_count == 1.0 {
        pills.push(Pill::new("Single Product", PillKind::Neutral));
    }

    let util = facts.utilization;
    if util < 0.5 {
        pills.push(Pill::new(format!("Pacing -{}%", ((1.0 - util) * 100.0) as i64), PillKind::Warning));
    } else if util > 1.25 {
        pills.push(Pill::new(format!("Pacing +{}%", ((util - 1.0) * 100.0) as i64), PillKind::Warning));
    }

    match goals.quality {
        GoalQuality::Missing => pills.push(Pill::new("No Goal", PillKind::Warning)),
        GoalQuality::TooLow => pills.push(Pill::new("Goal Too Low", PillKind::Warning)),
        _ => {}
    }

    if revenue_at_risk >= DOLLAR_RISK_HIGH {
        pills.push(Pill::new("High $ Risk", PillKind::Critical));
    } else if revenue_at_risk >= DOLLAR_RISK_WARN {
        pills.push(Pill::new("$ Risk", PillKind::Warning));
    }

    pills
}

// ── Goal advice ──────────────────────────────────────────────────────────────

/// Performance band for a CPL-to-goal ratio.
fn band(ratio: f64) -> String {
    if !ratio.is_finite() || ratio <= 0.0 {
        return "—".into();
    }
    if ratio >= 3.0 {
        "CRISIS (≥3×)".into()
    } else if ratio >= 2.0 {
        "Major gap (2–3×)".into()
    } else if ratio >= 1.5 {
        "Gap (1.5–2×)".into()
    } else if ratio > 1.1 {
        "Slightly high (1.1–1.5×)".into()
    } else if ratio >= 0.9 {
        "On target (±10%)".into()
    } else {
        "Under target (<0.9×)".into()
    }
}

pub fn goal_advice(facts: &RowFacts, goals: &GoalAssessment) -> GoalAdvice {
    let p50 = facts.bench.cpl_median_or_default();
    let p25 = facts.bench.cpl_p25.unwrap_or(0.8 * p50);
    let p75 = facts.bench.cpl_p75.unwrap_or(1.2 * p50);

    let goal = facts.cpl_goal.filter(|g| g.is_finite() && *g > 0.0);

    let status = match goal {
        None => GoalAdviceStatus::Missing,
        Some(g) => {
            let ratio = g / p50;
            if ratio < 0.5 {
                GoalAdviceStatus::TooLow
            } else if ratio < 0.7 {
                GoalAdviceStatus::Ambitious
            } else if ratio <= 1.5 {
                GoalAdviceStatus::Reasonable
            } else if ratio <= 2.5 {
                GoalAdviceStatus::TooHigh
            } else {
                GoalAdviceStatus::WildlyHigh
            }
        }
    };

    // Tight, defensible window: real percentiles intersected with
    // ±20% around the median.
    let rec_min = (0.8 * p50).max(p25);
    let rec_max = (1.2 * p50).min(p75);
    let rec_pt = p50.max(rec_min).min(rec_max);

    let act = facts.cpl_or(f64::NAN);
    let vs_goal = match goal {
        Some(g) => band(act / g),
        None => "—".into(),
    };
    let vs_recommended = band(act / rec_pt);

    // Avoid scolding day-1 launches.
    let show_gate = facts.days_elapsed >= 7.0 || facts.io_cycle >= 1.0;
    let show =
        show_gate && matches!(status, GoalAdviceStatus::Missing | GoalAdviceStatus::TooLow);

    GoalAdvice {
        show,
        status,
        goal_advertiser: goal,
        goal_effective: Some(goals.effective_cpl_goal).filter(|g| *g > 0.0),
        goal_was_substituted: goals.was_substituted,
        benchmark: BenchmarkWindow { p25, p50, p75 },
        recommended: RecommendedGoal { point: rec_pt, range: [rec_min, rec_max] },
        performance_band: PerformanceBands { vs_goal, vs_recommended },
        rationale: format!(
            "Vertical median (p50) ≈ ${}. Recommended window ${}–${}.",
            p50.round() as i64,
            rec_min.round() as i64,
            rec_max.round() as i64
        ),
    }
}

// ── Primary issue ────────────────────────────────────────────────────────────

/// Coarse issue category for book-level rollups. First match wins.
pub fn primary_issue(facts: &RowFacts, goals: &GoalAssessment) -> PrimaryIssue {
    if facts.leads == 0.0 && facts.spent > 100.0 {
        PrimaryIssue::ConversionFailure
    } else if goals.cpl_variance_pct > 200.0 {
        PrimaryIssue::EfficiencyCrisis
    } else if facts.utilization < 0.5 {
        PrimaryIssue::Underpacing
    } else if goals.cpl_variance_pct < -20.0 {
        PrimaryIssue::Performing
    } else {
        PrimaryIssue::Monitoring
    }
}
