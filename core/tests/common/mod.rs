//! Shared helpers for the integration tests: row builders with the
//! canonical fixture defaults, and a seeded random book generator for
//! property tests. Same seed, same book — nothing here touches a
//! platform RNG.
#![allow(dead_code)]

use bookrisk_core::{
    preprocess::{self, RowFacts},
    CampaignSnapshot, NoBenchmarks, ScoredCampaign, ScoringEngine,
};
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg64Mcg;

/// Fixture defaults shared by the end-to-end scenarios: 30-day cycle,
/// first IO, $3 benchmark CPC, $100 vertical median, single product.
pub fn base_row(id: &str) -> CampaignSnapshot {
    CampaignSnapshot {
        campaign_id: id.into(),
        io_cycle: Some(1.0),
        avg_cycle_length: Some(30.0),
        days_elapsed: Some(0.0),
        campaign_budget: Some(3_000.0),
        amount_spent: Some(0.0),
        running_cid_leads: Some(0.0),
        running_cid_cpl: Some(0.0),
        bsc_cpl_avg: Some(100.0),
        bsc_cpc_average: Some(3.0),
        advertiser_product_count: Some(1.0),
        ..Default::default()
    }
}

pub fn score(rows: &[CampaignSnapshot]) -> Vec<ScoredCampaign> {
    ScoringEngine::new(&NoBenchmarks).score_book(rows).unwrap()
}

pub fn score_one(row: CampaignSnapshot) -> ScoredCampaign {
    score(&[row]).remove(0)
}

pub fn facts_for(row: &CampaignSnapshot) -> RowFacts {
    preprocess::prepare(0, row, &NoBenchmarks).unwrap()
}

/// Deterministic random book covering the realistic mess: missing
/// goals, sandbagged goals, zero-lead rows, tiny budgets, long tenures.
pub fn random_book(count: usize, seed: u64) -> Vec<CampaignSnapshot> {
    let mut rng = Pcg64Mcg::seed_from_u64(seed);
    let verticals: [(f64, f64); 4] = [(180.0, 6.5), (90.0, 3.2), (120.0, 4.0), (60.0, 2.1)];

    (0..count)
        .map(|i| {
            let (median_cpl, cpc) = verticals[rng.gen_range(0..verticals.len())];
            let budget = rng.gen_range(200.0..20_000.0_f64).round();
            let io_cycle = rng.gen_range(1..=14) as f64;
            let days = rng.gen_range(0.0..45.0_f64).round();
            let spent = (budget * (days / 30.4) * rng.gen_range(0.0..1.5)).round();

            let expected = spent / median_cpl;
            let leads = match rng.gen_range(0..8) {
                0 | 1 => 0.0,
                2 => (expected * 0.2).floor(),
                _ => (expected * rng.gen_range(0.5..2.0)).floor(),
            };
            let cpl = if leads > 0.0 { spent / leads } else { 0.0 };
            let goal = match rng.gen_range(0..5) {
                0 => None,
                1 => Some((median_cpl * 0.25).round()),
                2 => Some((median_cpl * 2.0).round()),
                _ => Some((median_cpl * rng.gen_range(0.7..1.4)).round()),
            };

            let mut row = base_row(&format!("c-{i:05}"));
            row.campaign_budget = Some(budget);
            row.amount_spent = Some(spent);
            row.io_cycle = Some(io_cycle);
            row.avg_cycle_length = Some(30.4);
            row.days_elapsed = Some(days);
            row.running_cid_leads = Some(leads);
            row.running_cid_cpl = Some(cpl);
            row.cpl_goal = goal;
            row.bsc_cpl_avg = Some(median_cpl);
            row.bsc_cpc_average = Some(cpc);
            row.advertiser_product_count = Some(rng.gen_range(1..4) as f64);
            if days >= 30.0 && leads == 0.0 {
                row.leads_rolling_30d = Some(0.0);
            }
            row
        })
        .collect()
}
