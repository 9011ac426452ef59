//! bookrisk-core — the Campaign Risk & Priority Engine.
//!
//! A batch scoring engine for advertising-campaign books: snapshot in,
//! enriched snapshot out. For every campaign row it produces a 90-day
//! churn probability with an auditable driver decomposition, a priority
//! tier and index, a goal-realism advisory, and compact diagnostic
//! labels. The engine is a pure function: no I/O, no clocks, no
//! randomness, no state across runs.
//!
//! Entry points:
//!   - [`engine::ScoringEngine::score_book`] — the batch transform;
//!   - [`waterfall::build_churn_waterfall`] — per-row visualization record;
//!   - [`benchmark::BenchmarkLookup`] — the one injected collaborator.

pub mod benchmark;
pub mod churn;
pub mod constants;
pub mod diagnostics;
pub mod engine;
pub mod error;
pub mod flare;
pub mod goals;
pub mod leads;
pub mod preprocess;
pub mod safe;
pub mod snapshot;
pub mod types;
pub mod viability;
pub mod waterfall;
pub mod zero_lead;

pub use benchmark::{BenchmarkLookup, BenchmarkRecord, NoBenchmarks};
pub use churn::{ChurnRiskBand, RiskDriver, RiskDrivers, TenureBucket};
pub use constants::{ConstantsUsed, MODEL_VERSION};
pub use diagnostics::{GoalAdvice, Pill, PillKind, PrimaryIssue, Severity};
pub use engine::ScoringEngine;
pub use error::{EngineError, EngineResult};
pub use flare::PriorityTier;
pub use goals::GoalQuality;
pub use snapshot::{CampaignSnapshot, ScoredCampaign};
pub use waterfall::{build_churn_waterfall, ChurnWaterfall};
