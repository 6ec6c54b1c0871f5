// Wait Time Predictor Port (external estimate override)

use crate::domain::Priority;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Inputs handed to an external predictor at check-in time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionContext {
    pub department: String,
    /// Waiting entries before the new one is admitted
    pub queue_length: usize,
    pub average_service_time: u32,
    pub priority: Priority,
    pub check_in_time: i64, // epoch ms
}

/// Predictor output (minutes)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaitPrediction {
    pub estimated_wait_time: f64,
    #[serde(default)]
    pub confidence_score: Option<f64>,
}

impl WaitPrediction {
    /// Whole minutes, or `Malformed` for NaN, infinite, negative or oversized values
    pub fn minutes(&self) -> Result<u32, PredictionError> {
        let value = self.estimated_wait_time;
        if !value.is_finite() || value < 0.0 || value > f64::from(u32::MAX) {
            return Err(PredictionError::Malformed(format!(
                "estimated wait time {} is not a usable minute count",
                value
            )));
        }
        Ok(value.round() as u32)
    }
}

#[derive(Error, Debug)]
pub enum PredictionError {
    #[error("Predictor unavailable: {0}")]
    Unavailable(String),

    #[error("Malformed prediction: {0}")]
    Malformed(String),
}

/// Optional collaborator that may override a new entry's initial estimate
///
/// Returning `Ok(None)` means "no opinion"; errors make the engine fall back
/// to the deterministic formula.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait WaitTimePredictor: Send + Sync {
    async fn predict(
        &self,
        ctx: &PredictionContext,
    ) -> Result<Option<WaitPrediction>, PredictionError>;
}

/// Default predictor: never overrides the formula
pub struct NoopPredictor;

#[async_trait]
impl WaitTimePredictor for NoopPredictor {
    async fn predict(
        &self,
        _ctx: &PredictionContext,
    ) -> Result<Option<WaitPrediction>, PredictionError> {
        Ok(None)
    }
}
