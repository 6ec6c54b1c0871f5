// Domain Layer - Pure queue logic and entities

pub mod entry;
pub mod error;
pub mod estimator;
pub mod priority;
pub mod queue;

// Re-exports
pub use entry::{EntityId, EntryStatus, QueueEntry, TicketNumber};
pub use error::DomainError;
pub use priority::Priority;
pub use queue::{
    CheckIn, DepartmentId, DepartmentQueue, EntryView, QueueSnapshot, QueueStats,
    DEFAULT_AVERAGE_WAIT_MINUTES,
};
