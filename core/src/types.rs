//! Shared primitive types used across the entire engine.

/// Monetary amount in account currency. Stored as f64 because the
/// upstream feeds deliver floats; nothing here does ledger arithmetic.
pub type Money = f64;

/// Elapsed days, fractional where the feed reports them that way.
pub type Days = f64;

/// A stable, unique identifier for a campaign row.
pub type CampaignId = String;
