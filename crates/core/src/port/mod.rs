// Port Layer - Interfaces for external collaborators

pub mod time_provider;
pub mod wait_time_predictor;

// Re-exports
pub use time_provider::TimeProvider;
pub use wait_time_predictor::{
    NoopPredictor, PredictionContext, PredictionError, WaitPrediction, WaitTimePredictor,
};
