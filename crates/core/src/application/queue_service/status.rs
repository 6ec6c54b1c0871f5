// Status & Listing Use Cases (read side)

use crate::application::registry::QueueRegistry;
use crate::domain::{EntryView, QueueSnapshot};
use crate::error::Result;

/// Current entry of `entity_id` in `department`
pub async fn execute(registry: &QueueRegistry, department: &str, entity_id: &str) -> Result<EntryView> {
    let queue = registry.get(department)?;
    let guard = queue.read().await;
    Ok(guard.lookup(entity_id)?)
}

/// Snapshot of one department, or of every known department
///
/// Each snapshot is taken under that department's read lock; departments are
/// not frozen relative to each other.
pub async fn list(registry: &QueueRegistry, department: Option<&str>) -> Result<Vec<QueueSnapshot>> {
    let departments = match department {
        Some(d) => vec![d.to_string()],
        None => registry.departments(),
    };

    let mut snapshots = Vec::with_capacity(departments.len());
    for d in departments {
        let queue = registry.get(&d)?;
        let snapshot = queue.read().await.snapshot();
        snapshots.push(snapshot);
    }
    Ok(snapshots)
}
