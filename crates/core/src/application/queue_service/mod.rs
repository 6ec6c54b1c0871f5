// Queue Service - Operation surface for transports (RPC, CLI, tests)

pub mod call_next;
pub mod check_in;
pub mod configure;
pub mod status;
pub mod update_status;


pub use check_in::{CheckInRequest, CheckInResponse};
pub use configure::ConfigureRequest;
pub use update_status::UpdateStatusRequest;

use crate::application::registry::QueueRegistry;
use crate::domain::{EntryView, QueueEntry, QueueSnapshot};
use crate::error::Result;
use crate::port::{NoopPredictor, TimeProvider, WaitTimePredictor};
use std::sync::Arc;

/// Queue Service
pub struct QueueService {
    registry: Arc<QueueRegistry>,
    time_provider: Arc<dyn TimeProvider>,
    predictor: Arc<dyn WaitTimePredictor>,
}

impl QueueService {
    pub fn new(registry: Arc<QueueRegistry>, time_provider: Arc<dyn TimeProvider>) -> Self {
        Self {
            registry,
            time_provider,
            predictor: Arc::new(NoopPredictor),
        }
    }

    /// Replace the default (no-op) wait-time predictor
    pub fn with_predictor(mut self, predictor: Arc<dyn WaitTimePredictor>) -> Self {
        self.predictor = predictor;
        self
    }

    pub fn registry(&self) -> &Arc<QueueRegistry> {
        &self.registry
    }

    /// Admit an entity into a department queue
    pub async fn check_in(&self, req: CheckInRequest) -> Result<CheckInResponse> {
        check_in::execute(
            self.registry.as_ref(),
            self.time_provider.as_ref(),
            self.predictor.as_ref(),
            req,
        )
        .await
    }

    /// Serve the next waiting entry
    pub async fn call_next(&self, department: &str) -> Result<QueueEntry> {
        call_next::execute(self.registry.as_ref(), self.time_provider.as_ref(), department).await
    }

    pub async fn status(&self, department: &str, entity_id: &str) -> Result<EntryView> {
        status::execute(self.registry.as_ref(), department, entity_id).await
    }

    pub async fn configure(&self, req: ConfigureRequest) -> Result<QueueSnapshot> {
        configure::execute(self.registry.as_ref(), req).await
    }

    pub async fn list(&self, department: Option<&str>) -> Result<Vec<QueueSnapshot>> {
        status::list(self.registry.as_ref(), department).await
    }

    /// Complete or drop (no-show) an entry
    pub async fn update_status(&self, req: UpdateStatusRequest) -> Result<EntryView> {
        update_status::execute(self.registry.as_ref(), self.time_provider.as_ref(), req).await
    }
}
