//! Churn waterfall — shapes one scored row for visualization.
//!
//! The header shows the clamped probability; the bars sum to the
//! UNCLAMPED total so the math stays additive and honest. Whole-point
//! rounding can leave a ±1 pp residual; it is absorbed into the last
//! bar for display only — the model-side reconciliation has already
//! been enforced before this point.

use crate::{churn::RiskDriver, snapshot::ScoredCampaign};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WaterfallBarKind {
    Controllable,
    Structural,
    Protective,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaterfallBar {
    pub label: String,
    pub pp:    i64,
    #[serde(rename = "type")]
    pub kind:  WaterfallBarKind,
    pub lift_x: Option<f64>,
    pub why:    String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChurnWaterfall {
    /// Header number (clamped).
    pub total_pct:            i64,
    /// Annotation only: what the raw model said.
    pub math_total_unclamped: i64,
    pub baseline_pp:          i64,
    pub drivers:              Vec<WaterfallBar>,
    pub note:                 Option<String>,
    pub cap_to:               i64,
    pub show_ranges:          bool,
}

fn bar(driver: &RiskDriver) -> Option<WaterfallBar> {
    let pp = driver.points.round() as i64;
    if pp == 0 {
        return None;
    }
    let kind = if pp < 0 {
        WaterfallBarKind::Protective
    } else if driver.is_controllable {
        WaterfallBarKind::Controllable
    } else {
        WaterfallBarKind::Structural
    };
    Some(WaterfallBar {
        label: driver.name.clone(),
        pp,
        kind,
        lift_x: Some(driver.lift_x),
        why: driver.explanation.clone(),
    })
}

pub fn build_churn_waterfall(row: &ScoredCampaign) -> Option<ChurnWaterfall> {
    let risk = &row.risk_drivers_json;

    let total_clamped = (row.churn_prob_90d * 100.0).round() as i64;
    let total_unclamped = risk.p_unclamped_pct;
    let baseline = risk.baseline.clamp(0, 100);

    let mut bars: Vec<WaterfallBar> = risk.drivers.iter().filter_map(bar).collect();

    // Rounding reconciliation only — never a fake bar.
    let residual = total_unclamped - (baseline + bars.iter().map(|b| b.pp).sum::<i64>());
    if residual.abs() >= 1 {
        if let Some(last) = bars.last_mut() {
            last.pp += residual;
        }
    }

    let note = (total_clamped < total_unclamped).then(|| {
        format!(
            "SAFE clamp active: displayed churn {total_clamped}% < model {total_unclamped}%."
        )
    });

    if total_clamped == 0 && baseline == 0 && bars.is_empty() {
        return None;
    }

    Some(ChurnWaterfall {
        total_pct: total_clamped,
        math_total_unclamped: total_unclamped,
        baseline_pp: baseline,
        drivers: bars,
        note,
        cap_to: 100,
        show_ranges: false,
    })
}
