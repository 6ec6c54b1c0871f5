// Department Queue Domain Model

use crate::domain::entry::{EntityId, EntryStatus, QueueEntry, TicketNumber};
use crate::domain::error::{DomainError, Result};
use crate::domain::estimator;
use crate::domain::priority::Priority;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Department identifier
pub type DepartmentId = String;

/// Baseline per-entry service time when a department is created implicitly
pub const DEFAULT_AVERAGE_WAIT_MINUTES: u32 = 15;

/// Result of a check-in against a single department
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckIn {
    pub ticket_number: TicketNumber,
    /// 0-based rank among waiting entries, `None` when already in progress
    pub position: Option<usize>,
    pub estimated_wait_time: u32,
    /// True when the entity already had an active entry and nothing changed
    pub already_checked_in: bool,
}

/// Copy of an entry plus its current position
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntryView {
    #[serde(flatten)]
    pub entry: QueueEntry,
    pub position: Option<usize>,
}

/// Per-status entry counts
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueStats {
    pub waiting: usize,
    pub in_progress: usize,
    pub completed: usize,
    pub no_show: usize,
}

/// Point-in-time copy of a department queue
///
/// Entries are listed waiting-first in service order, then in-progress and
/// terminal entries by ticket number.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueueSnapshot {
    pub department: DepartmentId,
    pub current_number: TicketNumber,
    pub average_wait_time: u32,
    pub last_updated: i64,
    pub stats: QueueStats,
    pub entries: Vec<EntryView>,
}

/// Ordered collection of entries for one department
#[derive(Debug, Clone)]
pub struct DepartmentQueue {
    department: DepartmentId,
    current_number: TicketNumber,
    average_wait_time: u32,
    last_updated: i64,
    // Admission order; service order is derived by the estimator
    entries: Vec<QueueEntry>,
}

impl DepartmentQueue {
    pub fn new(
        department: impl Into<String>,
        average_wait_minutes: u32,
        now_millis: i64,
    ) -> Result<Self> {
        validate_average_wait(average_wait_minutes)?;
        Ok(Self {
            department: department.into(),
            current_number: 0,
            average_wait_time: average_wait_minutes,
            last_updated: now_millis,
            entries: Vec::new(),
        })
    }

    pub fn department(&self) -> &str {
        &self.department
    }

    pub fn current_number(&self) -> TicketNumber {
        self.current_number
    }

    pub fn average_wait_time(&self) -> u32 {
        self.average_wait_time
    }

    pub fn last_updated(&self) -> i64 {
        self.last_updated
    }

    pub fn entries(&self) -> &[QueueEntry] {
        &self.entries
    }

    pub fn waiting_count(&self) -> usize {
        self.entries.iter().filter(|e| e.is_waiting()).count()
    }

    /// Waiting entries in service order
    pub fn waiting(&self) -> Vec<&QueueEntry> {
        estimator::waiting_order(&self.entries)
            .into_iter()
            .map(|i| &self.entries[i])
            .collect()
    }

    /// The waiting or in-progress entry of `entity_id`, if any
    pub fn active_entry(&self, entity_id: &str) -> Option<&QueueEntry> {
        self.entries
            .iter()
            .find(|e| e.entity_id == entity_id && e.status.is_active())
    }

    /// Admit an entity
    ///
    /// Idempotent by entity id while the entity is active. `initial_estimate`
    /// (e.g. from an external predictor) replaces the formula result for the
    /// new entry until the next recompute pass.
    pub fn check_in(
        &mut self,
        entity_id: &str,
        priority: Priority,
        now_millis: i64,
        initial_estimate: Option<u32>,
    ) -> Result<CheckIn> {
        if entity_id.trim().is_empty() {
            return Err(DomainError::InvalidArgument(
                "entity id cannot be empty".to_string(),
            ));
        }

        if let Some(existing) = self.active_entry(entity_id) {
            debug!(
                department = %self.department,
                entity_id = %entity_id,
                ticket = existing.ticket_number,
                "Entity already checked in"
            );
            return Ok(CheckIn {
                ticket_number: existing.ticket_number,
                position: self.position_of(existing),
                estimated_wait_time: existing.estimated_wait_time,
                already_checked_in: true,
            });
        }

        self.current_number += 1;
        let ticket = self.current_number;
        self.entries
            .push(QueueEntry::new(entity_id, ticket, priority, now_millis));
        self.touch(now_millis);

        let idx = self.entries.len() - 1;
        if let Some(minutes) = initial_estimate {
            self.entries[idx].estimated_wait_time = minutes;
        }

        let entry = &self.entries[idx];
        Ok(CheckIn {
            ticket_number: ticket,
            position: self.position_of(entry),
            estimated_wait_time: entry.estimated_wait_time,
            already_checked_in: false,
        })
    }

    /// Position of an entity's active entry (`None` while in progress)
    pub fn position(&self, entity_id: &str) -> Result<Option<usize>> {
        let entry = self
            .active_entry(entity_id)
            .ok_or_else(|| self.not_found(entity_id))?;
        Ok(self.position_of(entry))
    }

    /// Entry of `entity_id` with its position
    ///
    /// Prefers the active entry; falls back to the most recent terminal one.
    pub fn lookup(&self, entity_id: &str) -> Result<EntryView> {
        let entry = self.active_entry(entity_id).or_else(|| {
            self.entries
                .iter()
                .filter(|e| e.entity_id == entity_id)
                .max_by_key(|e| e.ticket_number)
        });

        entry
            .map(|e| self.view(e))
            .ok_or_else(|| self.not_found(entity_id))
    }

    /// Dequeue the first waiting entry and mark it in progress
    pub fn call_next(&mut self, now_millis: i64) -> Result<QueueEntry> {
        let idx = estimator::waiting_order(&self.entries)
            .first()
            .copied()
            .ok_or_else(|| DomainError::EmptyQueue(self.department.clone()))?;

        self.entries[idx].start(now_millis)?;
        let called = self.entries[idx].clone();
        self.touch(now_millis);
        Ok(called)
    }

    /// Complete or drop (no-show) the entity's active entry
    ///
    /// Only terminal targets are accepted; entries enter service through
    /// [`DepartmentQueue::call_next`] alone.
    pub fn update_status(
        &mut self,
        entity_id: &str,
        next: EntryStatus,
        now_millis: i64,
    ) -> Result<QueueEntry> {
        let idx = self
            .entries
            .iter()
            .position(|e| e.entity_id == entity_id && e.status.is_active());

        // Only terminal history left: report the illegal transition rather than NotFound
        let current = match idx {
            Some(idx) => self.entries[idx].status,
            None => {
                self.entries
                    .iter()
                    .filter(|e| e.entity_id == entity_id)
                    .max_by_key(|e| e.ticket_number)
                    .ok_or_else(|| self.not_found(entity_id))?
                    .status
            }
        };

        let idx = match idx {
            Some(idx) if next.is_terminal() => idx,
            _ => {
                return Err(DomainError::InvalidStateTransition {
                    from: current.to_string(),
                    to: next.to_string(),
                })
            }
        };

        self.entries[idx].transition_to(next, now_millis)?;
        let updated = self.entries[idx].clone();
        self.touch(now_millis);
        Ok(updated)
    }

    /// Change the baseline service time and refresh every estimate
    pub fn set_average_wait_time(&mut self, minutes: u32, now_millis: i64) -> Result<()> {
        validate_average_wait(minutes)?;
        self.average_wait_time = minutes;
        self.touch(now_millis);
        Ok(())
    }

    pub fn stats(&self) -> QueueStats {
        let mut stats = QueueStats::default();
        for entry in &self.entries {
            match entry.status {
                EntryStatus::Waiting => stats.waiting += 1,
                EntryStatus::InProgress => stats.in_progress += 1,
                EntryStatus::Completed => stats.completed += 1,
                EntryStatus::NoShow => stats.no_show += 1,
            }
        }
        stats
    }

    pub fn snapshot(&self) -> QueueSnapshot {
        let mut entries: Vec<EntryView> = self.waiting().into_iter().map(|e| self.view(e)).collect();

        let mut rest: Vec<&QueueEntry> = self.entries.iter().filter(|e| !e.is_waiting()).collect();
        rest.sort_by_key(|e| (e.status != EntryStatus::InProgress, e.ticket_number));
        entries.extend(rest.into_iter().map(|e| self.view(e)));

        QueueSnapshot {
            department: self.department.clone(),
            current_number: self.current_number,
            average_wait_time: self.average_wait_time,
            last_updated: self.last_updated,
            stats: self.stats(),
            entries,
        }
    }

    /// Recompute pass, then stamp the mutation time
    fn touch(&mut self, now_millis: i64) {
        let refreshed = estimator::recompute(&mut self.entries, self.average_wait_time);
        self.last_updated = now_millis;
        debug!(department = %self.department, refreshed, "Recomputed wait estimates");
    }

    fn position_of(&self, entry: &QueueEntry) -> Option<usize> {
        if !entry.is_waiting() {
            return None;
        }
        let key = entry.order_key();
        Some(
            self.entries
                .iter()
                .filter(|e| e.is_waiting() && e.order_key() < key)
                .count(),
        )
    }

    fn view(&self, entry: &QueueEntry) -> EntryView {
        EntryView {
            entry: entry.clone(),
            position: self.position_of(entry),
        }
    }

    fn not_found(&self, entity_id: &str) -> DomainError {
        DomainError::EntityNotFound {
            department: self.department.clone(),
            entity_id: entity_id.to_string(),
        }
    }
}

fn validate_average_wait(minutes: u32) -> Result<()> {
    if minutes == 0 {
        return Err(DomainError::InvalidArgument(
            "average wait time must be positive".to_string(),
        ));
    }
    Ok(())
}

/// Entity ids of the waiting entries in service order
pub fn waiting_ids(queue: &DepartmentQueue) -> Vec<EntityId> {
    queue.waiting().into_iter().map(|e| e.entity_id.clone()).collect()
}
