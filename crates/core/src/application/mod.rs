// Application Layer - Use Cases and Registry

pub mod queue_service;
pub mod registry;

// Re-exports
pub use queue_service::QueueService;
pub use registry::{QueueRegistry, RegistryConfig, SharedQueue};
