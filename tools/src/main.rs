//! risk-runner: headless batch scorer for campaign books.
//!
//! Usage:
//!   risk-runner --input book.json --output scored.json
//!   risk-runner --input book.csv --benchmarks bench.json
//!   risk-runner --demo 200 --seed 42

use anyhow::{bail, Context, Result};
use bookrisk_core::{
    BenchmarkLookup, BenchmarkRecord, CampaignSnapshot, NoBenchmarks, PriorityTier,
    ScoredCampaign, ScoringEngine, MODEL_VERSION,
};
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg64Mcg;
use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::Path;

#[derive(serde::Serialize)]
struct RunReport<'a> {
    run_id:        String,
    generated_at:  String,
    model_version: &'static str,
    rows:          &'a [ScoredCampaign],
}

/// File-backed benchmark lookup keyed "category|subcategory", with a
/// bare-category fallback row.
struct MapBenchmarks {
    records: HashMap<String, BenchmarkRecord>,
}

impl MapBenchmarks {
    fn load(path: &str) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("reading benchmark file {path}"))?;
        let records: HashMap<String, BenchmarkRecord> =
            serde_json::from_str(&raw).context("parsing benchmark file")?;
        Ok(Self { records })
    }
}

impl BenchmarkLookup for MapBenchmarks {
    fn lookup(&self, category: &str, subcategory: &str) -> Option<BenchmarkRecord> {
        self.records
            .get(&format!("{category}|{subcategory}"))
            .or_else(|| self.records.get(category))
            .cloned()
    }
}

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let input = string_arg(&args, "--input");
    let output = string_arg(&args, "--output");
    let benchmarks_path = string_arg(&args, "--benchmarks");
    let demo = parse_arg(&args, "--demo", 0usize);
    let seed = parse_arg(&args, "--seed", 42u64);
    let top = parse_arg(&args, "--top", 5usize);

    let rows = match (&input, demo) {
        (Some(path), 0) => load_book(path)?,
        (None, n) if n > 0 => demo_book(n, seed),
        (Some(_), _) => bail!("--input and --demo are mutually exclusive"),
        (None, _) => bail!("nothing to score: pass --input <book.json|book.csv> or --demo <n>"),
    };

    println!("risk-runner — campaign book scorer");
    println!("  model:   {MODEL_VERSION}");
    println!("  rows:    {}", rows.len());
    if demo > 0 {
        println!("  seed:    {seed}");
    }
    println!();

    let loaded;
    let benchmarks: &dyn BenchmarkLookup = match benchmarks_path {
        Some(path) => {
            loaded = MapBenchmarks::load(&path)?;
            &loaded
        }
        None => &NoBenchmarks,
    };

    let scored = ScoringEngine::new(benchmarks).score_book(&rows)?;
    print_summary(&scored, top);

    if let Some(path) = output {
        let now = chrono::Utc::now();
        let report = RunReport {
            run_id:        format!("score-{}", now.format("%Y%m%dT%H%M%SZ")),
            generated_at:  now.to_rfc3339(),
            model_version: MODEL_VERSION,
            rows:          &scored,
        };
        fs::write(&path, serde_json::to_string_pretty(&report)?)
            .with_context(|| format!("writing {path}"))?;
        println!("\nwrote {} rows to {path}", scored.len());
    }

    Ok(())
}

fn parse_arg<T: std::str::FromStr>(args: &[String], flag: &str, default: T) -> T {
    args.windows(2)
        .find(|w| w[0] == flag)
        .and_then(|w| w[1].parse().ok())
        .unwrap_or(default)
}

fn string_arg(args: &[String], flag: &str) -> Option<String> {
    args.windows(2).find(|w| w[0] == flag).map(|w| w[1].clone())
}

fn load_book(path: &str) -> Result<Vec<CampaignSnapshot>> {
    let ext = Path::new(path)
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();
    match ext.as_str() {
        "csv" => {
            let mut reader =
                csv::Reader::from_path(path).with_context(|| format!("opening {path}"))?;
            let mut rows = Vec::new();
            for record in reader.deserialize() {
                rows.push(record.context("parsing CSV row")?);
            }
            Ok(rows)
        }
        _ => {
            let raw =
                fs::read_to_string(path).with_context(|| format!("reading {path}"))?;
            serde_json::from_str(&raw).with_context(|| format!("parsing {path}"))
        }
    }
}

// ── Demo book ────────────────────────────────────────────────────────────────

/// Deterministic synthetic book: same seed, same rows, same scores.
fn demo_book(count: usize, seed: u64) -> Vec<CampaignSnapshot> {
    let mut rng = Pcg64Mcg::seed_from_u64(seed);
    let verticals: [(&str, f64, f64); 4] = [
        ("Legal Services", 180.0, 6.5),
        ("Home Services", 90.0, 3.2),
        ("Healthcare", 120.0, 4.0),
        ("Automotive", 60.0, 2.1),
    ];

    (0..count)
        .map(|i| {
            let (category, median_cpl, cpc) = verticals[rng.gen_range(0..verticals.len())];
            let budget = rng.gen_range(800.0..15_000.0_f64).round();
            let io_cycle = rng.gen_range(1..=12) as f64;
            let days = rng.gen_range(1.0..45.0_f64).round();
            let spent = (budget * (days / 30.4) * rng.gen_range(0.2..1.2)).round();

            // Most rows convert near plan; a tail converts badly or
            // not at all.
            let expected = (spent / median_cpl).max(0.0);
            let leads = match rng.gen_range(0..10) {
                0 | 1 => 0.0,
                2 => (expected * 0.3).floor(),
                _ => (expected * rng.gen_range(0.6..1.8)).floor(),
            };
            let cpl = if leads > 0.0 { spent / leads } else { 0.0 };
            let goal = match rng.gen_range(0..6) {
                0 => None,
                1 => Some((median_cpl * 0.3).round()),
                _ => Some((median_cpl * rng.gen_range(0.8..1.4)).round()),
            };

            CampaignSnapshot {
                campaign_id: format!("demo-{i:05}"),
                campaign_name: Some(format!("{category} #{i}")),
                advertiser_name: Some(format!("Advertiser {i}")),
                partner_name: Some("Demo Partner".into()),
                business_category: Some(category.into()),
                business_subcategory: None,
                campaign_budget: Some(budget),
                amount_spent: Some(spent),
                io_cycle: Some(io_cycle),
                avg_cycle_length: Some(30.4),
                days_elapsed: Some(days),
                true_days_running: None,
                running_cid_leads: Some(leads),
                running_cid_cpl: Some(cpl),
                utilization: None,
                leads_rolling_30d: if days >= 30.0 && leads == 0.0 { Some(0.0) } else { None },
                cpl_goal: goal,
                bsc_cpl_avg: Some(median_cpl),
                bsc_cpl_top_25pct: Some((median_cpl * 0.75).round()),
                bsc_cpl_bottom_25pct: Some((median_cpl * 1.3).round()),
                bsc_cpc_average: Some(cpc),
                advertiser_product_count: Some(rng.gen_range(1..4) as f64),
            }
        })
        .collect()
}

// ── Summary ──────────────────────────────────────────────────────────────────

fn print_summary(scored: &[ScoredCampaign], top: usize) {
    let tier_count = |tier: PriorityTier| scored.iter().filter(|r| r.priority_tier == tier).count();
    let total_rar: f64 = scored.iter().map(|r| r.revenue_at_risk).sum();
    let safe = scored.iter().filter(|r| r.is_safe).count();

    println!("tiers:");
    println!("  P1 - CRITICAL  {:>5}", tier_count(PriorityTier::P1Critical));
    println!("  P2 - HIGH      {:>5}", tier_count(PriorityTier::P2High));
    println!("  P3 - MEDIUM    {:>5}", tier_count(PriorityTier::P3Medium));
    println!("  P4 - LOW       {:>5}", tier_count(PriorityTier::P4Low));
    println!("safe: {safe}   revenue at risk: ${total_rar:.0}");

    let mut ranked: Vec<&ScoredCampaign> = scored.iter().collect();
    ranked.sort_by(|a, b| {
        b.priority_index
            .partial_cmp(&a.priority_index)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.snapshot.campaign_id.cmp(&b.snapshot.campaign_id))
    });

    println!("\ntop {} by priority:", top.min(ranked.len()));
    for row in ranked.iter().take(top) {
        println!(
            "  {:<12} {:<14} churn {:>5.1}%  ${:>8.0} at risk  {}",
            row.snapshot.campaign_id,
            row.priority_tier.to_string(),
            row.churn_prob_90d * 100.0,
            row.revenue_at_risk,
            row.headline_diagnosis,
        );
    }
}
