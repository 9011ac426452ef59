use thiserror::Error;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Configuration error: {detail}")]
    Configuration { detail: String },

    #[error(
        "Driver reconciliation failed for campaign '{campaign_id}': \
         baseline + driver points = {driver_sum_pp}pp, unclamped target = {target_pp}pp"
    )]
    DriverReconciliation {
        campaign_id:   String,
        driver_sum_pp: i64,
        target_pp:     i64,
    },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type EngineResult<T> = Result<T, EngineError>;
