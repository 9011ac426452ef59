//! SEM viability gate and zero-lead state classification.

mod common;

use bookrisk_core::{goals, leads, viability, zero_lead};
use common::{base_row, facts_for};

fn gates(row: &bookrisk_core::CampaignSnapshot) -> (viability::SemViability, zero_lead::ZeroLeadFlags) {
    let facts = facts_for(row);
    let g = goals::assess(&facts);
    let exp = leads::project(&facts, &g);
    let viab = viability::assess(&facts, &exp);
    let flags = zero_lead::classify(&facts, &exp, &viab);
    (viab, flags)
}

/// The three capacity floors are OR-combined: any one clears the gate.
#[test]
fn viability_floors_are_or_combined() {
    // Budget floor alone.
    let mut row = base_row("c-1");
    row.campaign_budget = Some(2_500.0);
    let (v, _) = gates(&row);
    assert!(v.budget_ok && v.viable());

    // Small budget, but enough daily clicks.
    let mut row = base_row("c-2");
    row.campaign_budget = Some(400.0);
    let (v, _) = gates(&row);
    assert!(!v.budget_ok && v.clicks_ok && v.viable());

    // Below every floor.
    let mut row = base_row("c-3");
    row.campaign_budget = Some(250.0);
    let (v, _) = gates(&row);
    assert!(!v.budget_ok && !v.clicks_ok && !v.volume_ok && !v.viable());
}

/// Cheap-click verticals can't trivially clear the clicks floor: the
/// CPC denominator is floored at 3.
#[test]
fn clicks_floor_uses_cpc_floor() {
    let mut row = base_row("c-1");
    row.campaign_budget = Some(250.0);
    row.bsc_cpc_average = Some(0.5);

    let (v, _) = gates(&row);
    assert!(!v.clicks_ok);
}

/// Idle: zero leads with spend below the floor — a live-state problem.
#[test]
fn idle_state() {
    let mut row = base_row("c-1");
    row.days_elapsed = Some(10.0);
    row.amount_spent = Some(10.0);

    let (_, flags) = gates(&row);
    assert!(flags.idle);
    assert!(!flags.emerging && !flags.chronic);
    assert!(!flags.any_performance());
}

/// Emerging: 5–29 days of real, on-pace spend with nothing converted.
#[test]
fn emerging_state() {
    let mut row = base_row("c-1");
    row.days_elapsed = Some(20.0);
    row.amount_spent = Some(1_000.0);

    let (_, flags) = gates(&row);
    assert!(flags.emerging);
    assert!(!flags.idle && !flags.chronic);
    assert!(flags.any_performance());
}

/// Emerging requires spend progress ≥ 0.4; trickle spend stays quiet.
#[test]
fn emerging_needs_spend_progress() {
    let mut row = base_row("c-1");
    row.days_elapsed = Some(20.0);
    row.amount_spent = Some(300.0); // progress 0.15

    let (_, flags) = gates(&row);
    assert!(!flags.emerging);
}

/// Chronic: 30+ days in-cycle, on-pace spend, confirmed by the rolling
/// 30-day lead count.
#[test]
fn chronic_state_requires_rolling_confirmation() {
    let mut row = base_row("c-1");
    row.campaign_budget = Some(5_000.0);
    row.days_elapsed = Some(45.0);
    row.amount_spent = Some(4_000.0);

    // No rolling count → not chronic.
    let (_, flags) = gates(&row);
    assert!(!flags.chronic);

    row.leads_rolling_30d = Some(0.0);
    let (_, flags) = gates(&row);
    assert!(flags.chronic);
    assert!(!flags.idle && !flags.emerging);
}

/// Nothing fires before the alert floor or once any lead has landed.
#[test]
fn no_states_below_day_floor_or_with_leads() {
    let mut row = base_row("c-1");
    row.days_elapsed = Some(3.0);
    row.amount_spent = Some(10.0);
    let (_, flags) = gates(&row);
    assert!(!flags.idle && !flags.emerging && !flags.chronic);

    let mut row = base_row("c-2");
    row.days_elapsed = Some(20.0);
    row.amount_spent = Some(1_000.0);
    row.running_cid_leads = Some(1.0);
    let (_, flags) = gates(&row);
    assert!(!flags.idle && !flags.emerging && !flags.chronic);
}
