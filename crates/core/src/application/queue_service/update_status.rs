// Status Change Use Case (complete / no-show)

use crate::application::registry::QueueRegistry;
use crate::domain::{EntryStatus, EntryView};
use crate::error::Result;
use crate::port::TimeProvider;
use serde::{Deserialize, Serialize};
use tracing::info;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateStatusRequest {
    pub department: String,
    pub entity_id: String,
    pub status: String,
}

pub async fn execute(
    registry: &QueueRegistry,
    time_provider: &dyn TimeProvider,
    req: UpdateStatusRequest,
) -> Result<EntryView> {
    let next: EntryStatus = req.status.parse()?;
    let queue = registry.get(&req.department)?;

    let updated = queue
        .write()
        .await
        .update_status(&req.entity_id, next, time_provider.now_millis())?;

    info!(
        department = %req.department,
        entity_id = %req.entity_id,
        ticket = updated.ticket_number,
        status = %updated.status,
        "Entry status changed"
    );

    // Completed and no-show entries hold no position
    Ok(EntryView {
        entry: updated,
        position: None,
    })
}
