// Call-Next Use Case

use crate::application::registry::QueueRegistry;
use crate::domain::QueueEntry;
use crate::error::Result;
use crate::port::TimeProvider;
use tracing::info;

/// Dequeue the first waiting entry of `department` and mark it in progress
pub async fn execute(
    registry: &QueueRegistry,
    time_provider: &dyn TimeProvider,
    department: &str,
) -> Result<QueueEntry> {
    let queue = registry.get(department)?;
    let mut guard = queue.write().await;
    let called = guard.call_next(time_provider.now_millis())?;

    info!(
        department = %department,
        entity_id = %called.entity_id,
        ticket = called.ticket_number,
        priority = %called.priority,
        remaining = guard.waiting_count(),
        "Called next entry"
    );
    Ok(called)
}
