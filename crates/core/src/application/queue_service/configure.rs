// Configure Use Case

use crate::application::registry::QueueRegistry;
use crate::domain::{DomainError, QueueSnapshot};
use crate::error::Result;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigureRequest {
    pub department: String,
    /// Minutes; decoded loosely so that negative or fractional input is
    /// reported as an invalid argument instead of a decode failure
    pub average_wait_time: f64,
}

/// Whole, positive minutes that fit the queue's counter
pub fn validate_request(req: &ConfigureRequest) -> Result<u32> {
    let value = req.average_wait_time;
    if !value.is_finite() || value <= 0.0 {
        return Err(DomainError::InvalidArgument(format!(
            "average wait time must be positive, got {}",
            value
        ))
        .into());
    }

    if value.fract() != 0.0 {
        return Err(DomainError::InvalidArgument(format!(
            "average wait time must be whole minutes, got {}",
            value
        ))
        .into());
    }

    if value > f64::from(u32::MAX) {
        return Err(DomainError::InvalidArgument(format!(
            "average wait time out of range: {}",
            value
        ))
        .into());
    }

    Ok(value as u32)
}

pub async fn execute(registry: &QueueRegistry, req: ConfigureRequest) -> Result<QueueSnapshot> {
    let minutes = validate_request(&req)?;
    registry.configure(&req.department, minutes).await
}
