//! RPC Request/Response Types
//!
//! Method parameters and results of the `queue.*.v1` methods.

use clinicq_core::domain::{Priority, TicketNumber};
use serde::{Deserialize, Serialize};

/// queue.check_in.v1 - Admit an entity
#[derive(Debug, Deserialize)]
pub struct CheckInRequest {
    pub department: String,
    pub entity_id: String,
    #[serde(default)]
    pub priority: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CheckInResponse {
    pub department: String,
    pub ticket_number: TicketNumber,
    pub position: Option<usize>,
    pub estimated_wait_time: u32,
    pub already_checked_in: bool,
}

/// queue.call_next.v1 - Serve the next waiting entry
#[derive(Debug, Deserialize)]
pub struct CallNextRequest {
    pub department: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct CallNextResponse {
    pub department: String,
    pub entity_id: String,
    pub ticket_number: TicketNumber,
    pub priority: Priority,
}

/// queue.status.v1 - Look up one entity
#[derive(Debug, Deserialize)]
pub struct StatusRequest {
    pub department: String,
    pub entity_id: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct StatusResponse {
    pub ticket_number: TicketNumber,
    pub status: String,
    pub priority: Priority,
    pub estimated_wait_time: u32,
    pub position: Option<usize>,
    pub check_in_time: i64,
}

/// queue.configure.v1 - Set a department's average service time
#[derive(Debug, Deserialize)]
pub struct ConfigureRequest {
    pub department: String,
    pub average_wait_time: f64,
}

/// queue.list.v1 - Snapshot one or all departments
#[derive(Debug, Default, Deserialize)]
pub struct ListRequest {
    #[serde(default)]
    pub department: Option<String>,
}

/// queue.update_status.v1 - Complete or drop an entry
#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub department: String,
    pub entity_id: String,
    pub status: String,
}
