//! Campaign snapshot rows — engine input and enriched output.
//!
//! RULE: Input rows are read-only. The engine never mutates a
//! `CampaignSnapshot`; it embeds the input untouched in a new
//! `ScoredCampaign` and appends derived fields alongside it.
//!
//! Numeric input fields use loose coercion at the serde boundary:
//! a JSON number, a numeric string, an empty string, or null are all
//! accepted, and anything unparseable becomes absent. Upstream feeds
//! mix all four encodings freely.

use crate::{
    churn::{ChurnRiskBand, RiskDrivers},
    diagnostics::{GoalAdvice, Pill, PrimaryIssue, Severity},
    flare::PriorityTier,
    goals::GoalQuality,
    types::{CampaignId, Days, Money},
};
use serde::{Deserialize, Deserializer, Serialize};

/// Deserialize a numeric field that may arrive as a number, a numeric
/// string, an empty string, or null. Unparseable values become `None`.
fn loose_num<'de, D>(de: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Num(f64),
        Text(String),
    }

    Ok(match Option::<Raw>::deserialize(de)? {
        None => None,
        Some(Raw::Num(v)) if v.is_finite() => Some(v),
        Some(Raw::Num(_)) => None,
        Some(Raw::Text(s)) => s.trim().parse::<f64>().ok().filter(|v| v.is_finite()),
    })
}

// ── Input row ────────────────────────────────────────────────────────────────

/// One campaign at one point in time, as delivered by the upstream loader.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CampaignSnapshot {
    // Identity
    #[serde(default)]
    pub campaign_id:          CampaignId,
    #[serde(default)]
    pub campaign_name:        Option<String>,
    #[serde(default)]
    pub advertiser_name:      Option<String>,
    #[serde(default)]
    pub partner_name:         Option<String>,
    #[serde(default)]
    pub business_category:    Option<String>,
    #[serde(default)]
    pub business_subcategory: Option<String>,

    // Financial
    #[serde(default, deserialize_with = "loose_num")]
    pub campaign_budget: Option<Money>,
    #[serde(default, deserialize_with = "loose_num")]
    pub amount_spent:    Option<Money>,

    // Cycle
    #[serde(default, deserialize_with = "loose_num")]
    pub io_cycle:          Option<f64>,
    #[serde(default, deserialize_with = "loose_num")]
    pub avg_cycle_length:  Option<Days>,
    #[serde(default, deserialize_with = "loose_num")]
    pub days_elapsed:      Option<Days>,
    #[serde(default, deserialize_with = "loose_num")]
    pub true_days_running: Option<Days>,

    // Performance
    #[serde(default, deserialize_with = "loose_num")]
    pub running_cid_leads: Option<f64>,
    #[serde(default, deserialize_with = "loose_num")]
    pub running_cid_cpl:   Option<Money>,
    #[serde(default, deserialize_with = "loose_num")]
    pub utilization:       Option<f64>,
    #[serde(default, deserialize_with = "loose_num")]
    pub leads_rolling_30d: Option<f64>,

    // Goal
    #[serde(default, deserialize_with = "loose_num")]
    pub cpl_goal: Option<Money>,

    // Benchmark (row-level values win over the injected lookup)
    #[serde(default, deserialize_with = "loose_num")]
    pub bsc_cpl_avg:          Option<Money>,
    #[serde(default, deserialize_with = "loose_num")]
    pub bsc_cpl_top_25pct:    Option<Money>,
    #[serde(default, deserialize_with = "loose_num")]
    pub bsc_cpl_bottom_25pct: Option<Money>,
    #[serde(default, deserialize_with = "loose_num")]
    pub bsc_cpc_average:      Option<Money>,

    // Structure
    #[serde(default, deserialize_with = "loose_num")]
    pub advertiser_product_count: Option<f64>,
}

// ── Output row ───────────────────────────────────────────────────────────────

/// An enriched campaign row: the input snapshot plus every derived field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredCampaign {
    #[serde(flatten)]
    pub snapshot: CampaignSnapshot,

    // Goal processing
    pub is_cpl_goal_missing:  bool,
    pub goal_quality:         GoalQuality,
    pub goal_was_substituted: bool,
    pub effective_cpl_goal:   Money,
    pub risk_cpl_goal:        Money,
    pub cpl_delta:            Money,
    pub cpl_variance_pct:     f64,

    // Lead expectation
    pub expected_leads_monthly:       f64,
    pub expected_leads_to_date:       f64,
    pub expected_leads_to_date_spend: f64,

    // Gates
    #[serde(rename = "_sem_viable")]
    pub sem_viable:         bool,
    pub zero_lead_emerging: bool,
    pub zero_lead_last_mo:  bool,
    pub zero_lead_idle:     bool,
    pub is_safe:            bool,

    // Churn
    pub churn_prob_90d:           f64,
    pub churn_prob_90d_unclamped: f64,
    pub churn_risk_band:          ChurnRiskBand,
    pub revenue_at_risk:          Money,
    pub risk_drivers_json:        RiskDrivers,

    // Priority / FLARE
    pub flare_score:    f64,
    pub priority_index: f64,
    pub priority_tier:  PriorityTier,

    // Diagnostics
    pub primary_issue:      PrimaryIssue,
    pub headline_diagnosis: String,
    pub headline_severity:  Severity,
    pub diagnosis_pills:    Vec<Pill>,
    pub goal_advice_json:   GoalAdvice,

    // Confidence & data quality
    pub benchmark_fallback_used: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub data_quality: Vec<String>,
}
