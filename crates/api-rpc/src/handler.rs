//! RPC Method Handlers
//!
//! Thin translation between wire types and the queue service.

use crate::error::to_rpc_error;
use crate::types::{
    CallNextRequest, CallNextResponse, CheckInRequest, CheckInResponse, ConfigureRequest,
    ListRequest, StatusRequest, StatusResponse, UpdateStatusRequest,
};
use clinicq_core::application::queue_service;
use clinicq_core::application::QueueService;
use clinicq_core::domain::{EntryView, QueueSnapshot};
use jsonrpsee::types::ErrorObjectOwned;
use std::sync::Arc;

/// RPC Handler with injected dependencies
pub struct RpcHandler {
    service: Arc<QueueService>,
}

impl RpcHandler {
    pub fn new(service: Arc<QueueService>) -> Self {
        Self { service }
    }

    /// queue.check_in.v1
    pub async fn check_in(
        &self,
        params: CheckInRequest,
    ) -> Result<CheckInResponse, ErrorObjectOwned> {
        let req = queue_service::CheckInRequest {
            department: params.department,
            entity_id: params.entity_id,
            priority: params.priority,
        };

        let res = self.service.check_in(req).await.map_err(to_rpc_error)?;

        Ok(CheckInResponse {
            department: res.department,
            ticket_number: res.ticket_number,
            position: res.position,
            estimated_wait_time: res.estimated_wait_time,
            already_checked_in: res.already_checked_in,
        })
    }

    /// queue.call_next.v1
    pub async fn call_next(
        &self,
        params: CallNextRequest,
    ) -> Result<CallNextResponse, ErrorObjectOwned> {
        let entry = self
            .service
            .call_next(&params.department)
            .await
            .map_err(to_rpc_error)?;

        Ok(CallNextResponse {
            department: params.department,
            entity_id: entry.entity_id,
            ticket_number: entry.ticket_number,
            priority: entry.priority,
        })
    }

    /// queue.status.v1
    pub async fn status(&self, params: StatusRequest) -> Result<StatusResponse, ErrorObjectOwned> {
        let view = self
            .service
            .status(&params.department, &params.entity_id)
            .await
            .map_err(to_rpc_error)?;

        Ok(status_response(view))
    }

    /// queue.configure.v1
    pub async fn configure(
        &self,
        params: ConfigureRequest,
    ) -> Result<QueueSnapshot, ErrorObjectOwned> {
        self.service
            .configure(queue_service::ConfigureRequest {
                department: params.department,
                average_wait_time: params.average_wait_time,
            })
            .await
            .map_err(to_rpc_error)
    }

    /// queue.list.v1
    pub async fn list(&self, params: ListRequest) -> Result<Vec<QueueSnapshot>, ErrorObjectOwned> {
        self.service
            .list(params.department.as_deref())
            .await
            .map_err(to_rpc_error)
    }

    /// queue.update_status.v1
    pub async fn update_status(
        &self,
        params: UpdateStatusRequest,
    ) -> Result<StatusResponse, ErrorObjectOwned> {
        let view = self
            .service
            .update_status(queue_service::UpdateStatusRequest {
                department: params.department,
                entity_id: params.entity_id,
                status: params.status,
            })
            .await
            .map_err(to_rpc_error)?;

        Ok(status_response(view))
    }
}

fn status_response(view: EntryView) -> StatusResponse {
    StatusResponse {
        ticket_number: view.entry.ticket_number,
        status: view.entry.status.to_string(),
        priority: view.entry.priority,
        estimated_wait_time: view.entry.estimated_wait_time,
        position: view.position,
        check_in_time: view.entry.check_in_time,
    }
}
