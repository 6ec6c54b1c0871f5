//! Wait-Time Estimator
//!
//! Deterministic estimate: `round(position * average_wait * priority_factor)`.
//! The recompute pass refreshes every waiting entry after a queue mutation.

use crate::domain::entry::QueueEntry;
use crate::domain::priority::Priority;

/// Estimated wait (minutes) for an entry at zero-based `position` among waiting entries
pub fn estimate_wait(position: usize, average_wait_minutes: u32, priority: Priority) -> u32 {
    let base_wait = position as f64 * f64::from(average_wait_minutes);
    (base_wait * priority.wait_factor()).round() as u32
}

/// Indices of waiting entries in service order
pub fn waiting_order(entries: &[QueueEntry]) -> Vec<usize> {
    let mut order: Vec<usize> = entries
        .iter()
        .enumerate()
        .filter(|(_, e)| e.is_waiting())
        .map(|(i, _)| i)
        .collect();
    order.sort_by_key(|&i| entries[i].order_key());
    order
}

/// Recompute pass
///
/// Overwrites `estimated_wait_time` of every waiting entry. Entries in any
/// other status keep their last estimate. Returns the number of entries touched.
pub fn recompute(entries: &mut [QueueEntry], average_wait_minutes: u32) -> usize {
    let order = waiting_order(entries);
    for (position, &idx) in order.iter().enumerate() {
        let entry = &mut entries[idx];
        entry.estimated_wait_time = estimate_wait(position, average_wait_minutes, entry.priority);
    }
    order.len()
}
