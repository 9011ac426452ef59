//! Priority / FLARE scoring — the only snapshot-wide stage.
//!
//! Everything before this point is row-local. Priority is relative:
//! each row's churn probability, revenue at risk, and controllable
//! share are turned into percentile ranks across the whole snapshot,
//! blended into a composite index, and bucketed into tiers by fixed
//! percentile cuts. Adding or removing rows shifts everyone's tier —
//! that is intentional ("worst 10% today") — so the percentile math
//! must be deterministic with stable tie handling.

use crate::constants::{
    PRIORITY_WEIGHT_CHURN, PRIORITY_WEIGHT_CONTROLLABLE, PRIORITY_WEIGHT_RAR, TIER_P1_PCTL,
    TIER_P2_PCTL, TIER_P3_PCTL,
};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PriorityTier {
    #[serde(rename = "P1 - CRITICAL")]
    P1Critical,
    #[serde(rename = "P2 - HIGH")]
    P2High,
    #[serde(rename = "P3 - MEDIUM")]
    P3Medium,
    #[serde(rename = "P4 - LOW")]
    P4Low,
}

impl std::fmt::Display for PriorityTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            PriorityTier::P1Critical => "P1 - CRITICAL",
            PriorityTier::P2High     => "P2 - HIGH",
            PriorityTier::P3Medium   => "P3 - MEDIUM",
            PriorityTier::P4Low      => "P4 - LOW",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriorityInputs {
    pub churn_prob:         f64,
    pub revenue_at_risk:    f64,
    pub controllable_share: f64,
    pub is_safe:            bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriorityAssessment {
    pub index: f64,
    pub tier:  PriorityTier,
}

/// Midrank percentile: ties share their average rank, so equal values
/// always get equal percentiles regardless of input order.
pub fn percentile_ranks(values: &[f64]) -> Vec<f64> {
    let n = values.len();
    if n == 0 {
        return Vec::new();
    }

    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&a, &b| {
        values[a]
            .partial_cmp(&values[b])
            .unwrap_or(Ordering::Equal)
            .then(a.cmp(&b))
    });

    let mut ranks = vec![0.0; n];
    let mut i = 0;
    while i < n {
        let mut j = i;
        while j + 1 < n && values[order[j + 1]] == values[order[i]] {
            j += 1;
        }
        // 1-based average rank of the tie group, shifted to (0, 1).
        let avg_rank = (i + j + 2) as f64 / 2.0;
        let pctl = (avg_rank - 0.5) / n as f64;
        for &k in &order[i..=j] {
            ranks[k] = pctl;
        }
        i = j + 1;
    }
    ranks
}

fn tier_for(index_pctl: f64) -> PriorityTier {
    if index_pctl >= TIER_P1_PCTL {
        PriorityTier::P1Critical
    } else if index_pctl >= TIER_P2_PCTL {
        PriorityTier::P2High
    } else if index_pctl >= TIER_P3_PCTL {
        PriorityTier::P3Medium
    } else {
        PriorityTier::P4Low
    }
}

/// Score the whole snapshot. SAFE rows are floored at P4 so a clamped
/// churn number can never raise a false alarm.
pub fn attach_priority(inputs: &[PriorityInputs]) -> Vec<PriorityAssessment> {
    let pctl_churn = percentile_ranks(&inputs.iter().map(|r| r.churn_prob).collect::<Vec<_>>());
    let pctl_rar = percentile_ranks(&inputs.iter().map(|r| r.revenue_at_risk).collect::<Vec<_>>());
    let pctl_ctrl =
        percentile_ranks(&inputs.iter().map(|r| r.controllable_share).collect::<Vec<_>>());

    let index: Vec<f64> = (0..inputs.len())
        .map(|i| {
            100.0
                * (PRIORITY_WEIGHT_CHURN * pctl_churn[i]
                    + PRIORITY_WEIGHT_RAR * pctl_rar[i]
                    + PRIORITY_WEIGHT_CONTROLLABLE * pctl_ctrl[i])
        })
        .collect();

    let index_pctl = percentile_ranks(&index);

    inputs
        .iter()
        .enumerate()
        .map(|(i, row)| {
            let tier = if row.is_safe { PriorityTier::P4Low } else { tier_for(index_pctl[i]) };
            PriorityAssessment { index: index[i], tier }
        })
        .collect()
}
