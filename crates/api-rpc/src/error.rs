//! RPC Error Types
//!
//! Maps application errors to JSON-RPC error codes.

use clinicq_core::error::{AppError, ErrorKind};
use jsonrpsee::types::ErrorObjectOwned;

/// RPC Error Codes
pub mod code {
    pub const VALIDATION_ERROR: i32 = 4000;
    pub const NOT_FOUND: i32 = 4001;
    pub const CONFLICT: i32 = 4002;
    pub const EMPTY_QUEUE: i32 = 4004;
    pub const INTERNAL_ERROR: i32 = 5000;
}

/// Error code for an application error kind
pub fn code_for(kind: ErrorKind) -> i32 {
    match kind {
        ErrorKind::InvalidArgument | ErrorKind::InvalidPriority => code::VALIDATION_ERROR,
        ErrorKind::NotFound => code::NOT_FOUND,
        ErrorKind::InvalidTransition | ErrorKind::Conflict => code::CONFLICT,
        ErrorKind::EmptyQueue => code::EMPTY_QUEUE,
        ErrorKind::Internal => code::INTERNAL_ERROR,
    }
}

/// Convert AppError to JSON-RPC ErrorObject
pub fn to_rpc_error(err: AppError) -> ErrorObjectOwned {
    let code = code_for(err.kind());
    if code == code::INTERNAL_ERROR {
        tracing::error!(error = %err, "Internal error while handling RPC");
    }
    ErrorObjectOwned::owned(code, err.to_string(), None::<()>)
}
