// Check-In Use Case

use crate::application::registry::QueueRegistry;
use crate::domain::{DomainError, Priority, TicketNumber};
use crate::error::Result;
use crate::port::{PredictionContext, TimeProvider, WaitTimePredictor};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// Check-in request as received from a transport
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckInRequest {
    pub department: String,
    pub entity_id: String,

    /// Priority label; `medium` when omitted
    #[serde(default)]
    pub priority: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckInResponse {
    pub department: String,
    pub ticket_number: TicketNumber,
    pub position: Option<usize>,
    pub estimated_wait_time: u32,
    pub already_checked_in: bool,
}

/// Validate the request and resolve its priority label
pub fn validate_request(req: &CheckInRequest) -> Result<Priority> {
    if req.entity_id.trim().is_empty() {
        return Err(DomainError::InvalidArgument("entity id cannot be empty".to_string()).into());
    }

    let priority = match req.priority.as_deref() {
        None => Priority::default(),
        Some(label) => label.parse::<Priority>()?,
    };
    Ok(priority)
}

/// Execute check-in
///
/// The predictor is consulted without holding the department lock; the
/// write lock then re-checks idempotency, so a racing duplicate simply
/// discards the prediction.
pub async fn execute(
    registry: &QueueRegistry,
    time_provider: &dyn TimeProvider,
    predictor: &dyn WaitTimePredictor,
    req: CheckInRequest,
) -> Result<CheckInResponse> {
    let priority = validate_request(&req)?;
    let queue = registry.get_or_create(&req.department)?;

    let ctx = {
        let guard = queue.read().await;
        if let Some(existing) = guard.active_entry(&req.entity_id) {
            debug!(
                department = %req.department,
                entity_id = %req.entity_id,
                ticket = existing.ticket_number,
                "Duplicate check-in, returning existing entry"
            );
            let position = guard.position(&req.entity_id)?;
            return Ok(CheckInResponse {
                department: req.department,
                ticket_number: existing.ticket_number,
                position,
                estimated_wait_time: existing.estimated_wait_time,
                already_checked_in: true,
            });
        }

        PredictionContext {
            department: req.department.clone(),
            queue_length: guard.waiting_count(),
            average_service_time: guard.average_wait_time(),
            priority,
            check_in_time: time_provider.now_millis(),
        }
    };

    let prediction = predictor
        .predict(&ctx)
        .await
        .and_then(|p| p.map(|p| p.minutes()).transpose());
    let initial_estimate = match prediction {
        Ok(minutes) => minutes,
        Err(e) => {
            warn!(
                department = %req.department,
                error = %e,
                "Wait prediction unusable, using formula"
            );
            None
        }
    };

    let outcome = {
        let mut guard = queue.write().await;
        guard.check_in(
            &req.entity_id,
            priority,
            time_provider.now_millis(),
            initial_estimate,
        )?
    };

    if !outcome.already_checked_in {
        info!(
            department = %req.department,
            entity_id = %req.entity_id,
            ticket = outcome.ticket_number,
            priority = %priority,
            position = ?outcome.position,
            estimated_wait_time = outcome.estimated_wait_time,
            "Entity checked in"
        );
    }

    Ok(CheckInResponse {
        department: req.department,
        ticket_number: outcome.ticket_number,
        position: outcome.position,
        estimated_wait_time: outcome.estimated_wait_time,
        already_checked_in: outcome.already_checked_in,
    })
}
