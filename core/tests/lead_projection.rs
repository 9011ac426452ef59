//! Expected-leads projection: CPC path, CPL fallback, clamps.

mod common;

use approx::assert_relative_eq;
use bookrisk_core::{goals, leads};
use common::{base_row, facts_for};

/// Primary path: clicks from budget/CPC, leads from clicks × CR.
#[test]
fn cpc_path_projects_clicks_times_cr() {
    let mut row = base_row("c-1");
    row.campaign_budget = Some(3_000.0);
    row.cpl_goal = Some(100.0);
    row.days_elapsed = Some(15.0);

    let facts = facts_for(&row);
    let g = goals::assess(&facts);
    let exp = leads::project(&facts, &g);

    // clicks = 3000/3 = 1000; cr = 3/100 = 0.03 → 30/month
    assert_relative_eq!(exp.monthly, 30.0);
    assert_relative_eq!(exp.to_date, 30.0 * (15.0 / 30.4), epsilon = 1e-9);
}

/// Without a usable CPC the projection falls back to budget over the
/// risk CPL goal.
#[test]
fn cpl_fallback_without_cpc() {
    let mut row = base_row("c-1");
    row.bsc_cpc_average = None;
    row.campaign_budget = Some(2_000.0);
    row.cpl_goal = Some(100.0);

    let facts = facts_for(&row);
    let g = goals::assess(&facts);
    let exp = leads::project(&facts, &g);

    assert_relative_eq!(exp.monthly, 20.0);
}

/// The benchmark conversion rate is clamped to [0.01, 0.25].
#[test]
fn conversion_rate_clamped() {
    // cpc 60 on a 100 median → raw cr 0.6 → clamped 0.25
    let mut row = base_row("c-1");
    row.bsc_cpc_average = Some(60.0);
    row.campaign_budget = Some(600.0);
    row.cpl_goal = Some(100.0);

    let facts = facts_for(&row);
    let g = goals::assess(&facts);
    let exp = leads::project(&facts, &g);

    // clicks = 600/60 = 10 → 10 × 0.25
    assert_relative_eq!(exp.monthly, 2.5);
}

/// Pacing is clamped to [0, 2]: two cycles behind is the ceiling.
#[test]
fn pacing_clamped_at_two_cycles() {
    let mut row = base_row("c-1");
    row.days_elapsed = Some(90.0);
    row.cpl_goal = Some(100.0);

    let facts = facts_for(&row);
    let g = goals::assess(&facts);
    let exp = leads::project(&facts, &g);

    assert_relative_eq!(exp.to_date, exp.monthly * 2.0);
}

/// Spend-based expectation answers "what should this spend have bought".
#[test]
fn spend_based_expectation() {
    let mut row = base_row("c-1");
    row.amount_spent = Some(1_500.0);
    row.cpl_goal = Some(100.0);

    let facts = facts_for(&row);
    let g = goals::assess(&facts);
    let exp = leads::project(&facts, &g);

    assert_relative_eq!(exp.to_date_spend, 15.0);
}

/// Lead ratio is floored against near-zero expectations and capped at 10.
#[test]
fn lead_ratio_guards() {
    let mut row = base_row("c-1");
    row.days_elapsed = Some(0.0);
    row.cpl_goal = Some(100.0);

    let facts = facts_for(&row);
    let g = goals::assess(&facts);
    let exp = leads::project(&facts, &g);

    // to_date = 0 → denominator floors at 0.1, ratio caps at 10
    assert_relative_eq!(exp.lead_ratio(500.0), 10.0);
    assert_relative_eq!(exp.lead_ratio(0.0), 0.0);
}
