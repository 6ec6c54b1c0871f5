//! Queue Registry
//!
//! Owns every department queue. Each queue sits behind its own
//! `tokio::sync::RwLock`; the map itself is a `DashMap`, whose shard lock
//! makes lazy creation single-winner.

use crate::domain::{DepartmentId, DepartmentQueue, DomainError, QueueSnapshot};
use crate::domain::DEFAULT_AVERAGE_WAIT_MINUTES;
use crate::error::{AppError, Result};
use crate::port::TimeProvider;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::info;

/// Maximum department identifier length
pub const MAX_DEPARTMENT_LEN: usize = 64;

/// Shared handle to one department's queue
pub type SharedQueue = Arc<RwLock<DepartmentQueue>>;

/// Registry behaviour
#[derive(Debug, Clone)]
pub struct RegistryConfig {
    /// Baseline service time for departments created without explicit configuration
    pub default_average_wait_minutes: u32,
    /// When false, check-in only works for registered/configured departments
    pub allow_implicit_departments: bool,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            default_average_wait_minutes: DEFAULT_AVERAGE_WAIT_MINUTES,
            allow_implicit_departments: true,
        }
    }
}

pub struct QueueRegistry {
    queues: DashMap<DepartmentId, SharedQueue>,
    config: RegistryConfig,
    time_provider: Arc<dyn TimeProvider>,
}

impl QueueRegistry {
    pub fn new(config: RegistryConfig, time_provider: Arc<dyn TimeProvider>) -> Result<Self> {
        if config.default_average_wait_minutes == 0 {
            return Err(AppError::Config(
                "default average wait time must be positive".to_string(),
            ));
        }

        Ok(Self {
            queues: DashMap::new(),
            config,
            time_provider,
        })
    }

    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    /// Existing queue for `department`
    pub fn get(&self, department: &str) -> Result<SharedQueue> {
        self.queues
            .get(department)
            .map(|q| q.value().clone())
            .ok_or_else(|| AppError::NotFound(format!("Department {} not found", department)))
    }

    /// Existing queue, or a new one when implicit departments are allowed
    pub fn get_or_create(&self, department: &str) -> Result<SharedQueue> {
        if let Some(queue) = self.queues.get(department) {
            return Ok(queue.value().clone());
        }

        if !self.config.allow_implicit_departments {
            return Err(AppError::NotFound(format!(
                "Department {} is not registered",
                department
            )));
        }

        self.create(department, self.config.default_average_wait_minutes)
    }

    /// Explicitly create a department (no-op if it already exists)
    pub fn register(&self, department: &str) -> Result<SharedQueue> {
        self.create(department, self.config.default_average_wait_minutes)
    }

    /// Set a department's baseline service time, creating the department if needed
    pub async fn configure(&self, department: &str, average_wait_minutes: u32) -> Result<QueueSnapshot> {
        if average_wait_minutes == 0 {
            return Err(DomainError::InvalidArgument(
                "average wait time must be positive".to_string(),
            )
            .into());
        }

        let queue = self.create(department, average_wait_minutes)?;
        let mut guard = queue.write().await;
        guard.set_average_wait_time(average_wait_minutes, self.time_provider.now_millis())?;

        info!(
            department = %department,
            average_wait_minutes,
            "Department configured"
        );
        Ok(guard.snapshot())
    }

    /// Known department ids, sorted
    pub fn departments(&self) -> Vec<DepartmentId> {
        let mut ids: Vec<DepartmentId> = self.queues.iter().map(|q| q.key().clone()).collect();
        ids.sort();
        ids
    }

    pub fn len(&self) -> usize {
        self.queues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queues.is_empty()
    }

    fn create(&self, department: &str, average_wait_minutes: u32) -> Result<SharedQueue> {
        validate_department(department)?;

        // Shard write lock held for the whole match: exactly one creator wins
        match self.queues.entry(department.to_string()) {
            Entry::Occupied(existing) => Ok(existing.get().clone()),
            Entry::Vacant(slot) => {
                let queue = DepartmentQueue::new(
                    department,
                    average_wait_minutes,
                    self.time_provider.now_millis(),
                )?;
                info!(department = %department, average_wait_minutes, "Created department queue");
                Ok(slot.insert(Arc::new(RwLock::new(queue))).value().clone())
            }
        }
    }
}

/// Department ids: non-empty, at most 64 chars, alphanumeric plus `-`, `_` and space
pub fn validate_department(department: &str) -> Result<()> {
    if department.trim().is_empty() {
        return Err(AppError::Validation("Department cannot be empty".to_string()));
    }

    if department.len() > MAX_DEPARTMENT_LEN {
        return Err(AppError::Validation(format!(
            "Department name too long (max {} chars)",
            MAX_DEPARTMENT_LEN
        )));
    }

    if !department
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-' || c == '_' || c == ' ')
    {
        return Err(AppError::Validation(
            "Department must be alphanumeric (with -, _ or spaces)".to_string(),
        ));
    }

    Ok(())
}
