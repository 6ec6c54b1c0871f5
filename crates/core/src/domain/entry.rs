// Queue Entry Domain Model

use crate::domain::error::{DomainError, Result};
use crate::domain::priority::Priority;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Opaque identifier of the person being served
pub type EntityId = String;

/// Per-department admission sequence number
pub type TicketNumber = u64;

/// Entry Status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EntryStatus {
    Waiting,
    InProgress,
    Completed,
    NoShow,
}

impl EntryStatus {
    /// Waiting or in-progress entries block a second check-in of the same entity
    pub fn is_active(self) -> bool {
        matches!(self, EntryStatus::Waiting | EntryStatus::InProgress)
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, EntryStatus::Completed | EntryStatus::NoShow)
    }

    pub fn can_transition_to(self, next: EntryStatus) -> bool {
        matches!(
            (self, next),
            (EntryStatus::Waiting, EntryStatus::InProgress)
                | (EntryStatus::Waiting, EntryStatus::Completed)
                | (EntryStatus::Waiting, EntryStatus::NoShow)
                | (EntryStatus::InProgress, EntryStatus::Completed)
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            EntryStatus::Waiting => "waiting",
            EntryStatus::InProgress => "in-progress",
            EntryStatus::Completed => "completed",
            EntryStatus::NoShow => "no-show",
        }
    }
}

impl std::fmt::Display for EntryStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntryStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "waiting" => Ok(EntryStatus::Waiting),
            "in-progress" => Ok(EntryStatus::InProgress),
            "completed" => Ok(EntryStatus::Completed),
            "no-show" => Ok(EntryStatus::NoShow),
            _ => Err(DomainError::InvalidStatus(s.to_string())),
        }
    }
}

/// Ordering key for waiting entries: urgency, then arrival, then ticket.
///
/// Two entries checked in within the same millisecond still keep their
/// admission order because tickets are strictly increasing.
pub type OrderKey = (u8, i64, TicketNumber);

/// One entity's record in a department queue
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueueEntry {
    pub entity_id: EntityId,
    pub ticket_number: TicketNumber,
    pub priority: Priority,
    pub status: EntryStatus,

    pub check_in_time: i64, // epoch ms
    pub called_at: Option<i64>,
    pub finished_at: Option<i64>,

    /// Minutes, refreshed by every recompute pass while waiting
    pub estimated_wait_time: u32,
}

impl QueueEntry {
    /// Create a new waiting entry
    ///
    /// `check_in_time` is injected (epoch ms), never read from the system clock here.
    pub fn new(
        entity_id: impl Into<String>,
        ticket_number: TicketNumber,
        priority: Priority,
        check_in_time: i64,
    ) -> Self {
        Self {
            entity_id: entity_id.into(),
            ticket_number,
            priority,
            status: EntryStatus::Waiting,
            check_in_time,
            called_at: None,
            finished_at: None,
            estimated_wait_time: 0,
        }
    }

    pub fn order_key(&self) -> OrderKey {
        (self.priority.rank(), self.check_in_time, self.ticket_number)
    }

    pub fn is_waiting(&self) -> bool {
        self.status == EntryStatus::Waiting
    }

    /// Apply a status transition, stamping `called_at` / `finished_at`
    pub fn transition_to(&mut self, next: EntryStatus, now_millis: i64) -> Result<()> {
        if !self.status.can_transition_to(next) {
            return Err(DomainError::InvalidStateTransition {
                from: self.status.to_string(),
                to: next.to_string(),
            });
        }

        match next {
            EntryStatus::InProgress => self.called_at = Some(now_millis),
            EntryStatus::Completed | EntryStatus::NoShow => self.finished_at = Some(now_millis),
            EntryStatus::Waiting => {}
        }
        self.status = next;
        Ok(())
    }

    /// Transition to InProgress (called by a server)
    pub fn start(&mut self, now_millis: i64) -> Result<()> {
        self.transition_to(EntryStatus::InProgress, now_millis)
    }

    /// Transition to Completed
    pub fn complete(&mut self, now_millis: i64) -> Result<()> {
        self.transition_to(EntryStatus::Completed, now_millis)
    }

    /// Transition to NoShow (abandoned before being called)
    pub fn mark_no_show(&mut self, now_millis: i64) -> Result<()> {
        self.transition_to(EntryStatus::NoShow, now_millis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry() -> QueueEntry {
        QueueEntry::new("patient-1", 1, Priority::Medium, 1_000)
    }

    #[test]
    fn test_new_entry_is_waiting() {
        let e = entry();
        assert_eq!(e.status, EntryStatus::Waiting);
        assert!(e.called_at.is_none());
        assert!(e.finished_at.is_none());
        assert_eq!(e.order_key(), (2, 1_000, 1));
    }

    #[test]
    fn test_lifecycle() {
        let mut e = entry();
        assert!(e.start(2_000).is_ok());
        assert_eq!(e.status, EntryStatus::InProgress);
        assert_eq!(e.called_at, Some(2_000));

        assert!(e.complete(3_000).is_ok());
        assert_eq!(e.status, EntryStatus::Completed);
        assert_eq!(e.finished_at, Some(3_000));
    }

    #[test]
    fn test_no_show_from_waiting() {
        let mut e = entry();
        assert!(e.mark_no_show(2_000).is_ok());
        assert_eq!(e.status, EntryStatus::NoShow);
    }

    #[test]
    fn test_terminal_states_reject_everything() {
        let mut e = entry();
        e.complete(2_000).unwrap();

        let err = e.transition_to(EntryStatus::Waiting, 3_000).unwrap_err();
        assert_eq!(
            err,
            DomainError::InvalidStateTransition {
                from: "completed".to_string(),
                to: "waiting".to_string(),
            }
        );
        assert!(e.start(3_000).is_err());
        assert!(e.mark_no_show(3_000).is_err());
    }

    #[test]
    fn test_in_progress_cannot_become_no_show_or_waiting() {
        let mut e = entry();
        e.start(2_000).unwrap();
        assert!(e.mark_no_show(3_000).is_err());
        assert!(e.transition_to(EntryStatus::Waiting, 3_000).is_err());
        assert!(e.start(3_000).is_err());
        assert_eq!(e.status, EntryStatus::InProgress);
    }

    #[test]
    fn test_status_parse() {
        assert_eq!("in_progress".parse::<EntryStatus>().unwrap(), EntryStatus::InProgress);
        assert_eq!("No-Show".parse::<EntryStatus>().unwrap(), EntryStatus::NoShow);
        assert!("cancelled".parse::<EntryStatus>().is_err());
    }
}
