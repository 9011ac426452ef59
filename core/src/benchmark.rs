//! Vertical benchmark lookup — the engine's only injected collaborator.
//!
//! Benchmark ingestion lives elsewhere; the engine sees a read-only
//! service keyed by (category, subcategory). Rows may also carry their
//! own `bsc_*` values, which always win over the lookup. A miss on both
//! falls back to the documented global constants, and the row is flagged
//! so the UI can show lower confidence.

use crate::{
    constants::{FALLBACK_CPC, FALLBACK_CPL_MEDIAN},
    snapshot::CampaignSnapshot,
    types::Money,
};
use serde::{Deserialize, Serialize};

/// One vertical's benchmark aggregates. Any field may be absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkRecord {
    pub cpl_p25:       Option<Money>,
    pub cpl_median:    Option<Money>,
    pub cpl_p75:       Option<Money>,
    pub cpc_average:   Option<Money>,
    pub ctr_average:   Option<f64>,
    pub budget_median: Option<Money>,
}

/// Read-only benchmark service. Implementations must be cheap to call;
/// the engine performs one lookup per row.
pub trait BenchmarkLookup {
    fn lookup(&self, category: &str, subcategory: &str) -> Option<BenchmarkRecord>;
}

/// A lookup that never has data. Every row scores on row-level
/// benchmarks or the global fallbacks.
pub struct NoBenchmarks;

impl BenchmarkLookup for NoBenchmarks {
    fn lookup(&self, _category: &str, _subcategory: &str) -> Option<BenchmarkRecord> {
        None
    }
}

/// Benchmark values resolved for a single row: row fields first, then
/// the lookup, each filtered to positive finite values.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RowBenchmarks {
    pub cpl_median:    Option<f64>,
    pub cpl_p25:       Option<f64>,
    pub cpl_p75:       Option<f64>,
    pub cpc_average:   Option<f64>,
    /// True when the vertical CPL median had to fall back to the
    /// global constant — surfaced as `benchmark_fallback_used`.
    pub fallback_used: bool,
}

impl RowBenchmarks {
    pub fn cpl_median_or_default(&self) -> f64 {
        self.cpl_median.unwrap_or(FALLBACK_CPL_MEDIAN)
    }

    pub fn cpc_or_default(&self) -> f64 {
        self.cpc_average.unwrap_or(FALLBACK_CPC)
    }
}

fn positive(v: Option<f64>) -> Option<f64> {
    v.filter(|x| x.is_finite() && *x > 0.0)
}

pub fn resolve(row: &CampaignSnapshot, lookup: &dyn BenchmarkLookup) -> RowBenchmarks {
    let record = lookup.lookup(
        row.business_category.as_deref().unwrap_or(""),
        row.business_subcategory.as_deref().unwrap_or(""),
    );
    let record = record.unwrap_or_default();

    let cpl_median = positive(row.bsc_cpl_avg).or(positive(record.cpl_median));
    RowBenchmarks {
        fallback_used: cpl_median.is_none(),
        cpl_median,
        cpl_p25:     positive(row.bsc_cpl_top_25pct).or(positive(record.cpl_p25)),
        cpl_p75:     positive(row.bsc_cpl_bottom_25pct).or(positive(record.cpl_p75)),
        cpc_average: positive(row.bsc_cpc_average).or(positive(record.cpc_average)),
    }
}
