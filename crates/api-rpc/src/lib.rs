//! JSON-RPC API Layer
//!
//! Exposes the queue engine as JSON-RPC 2.0 methods (`queue.*.v1`).

pub mod error;
pub mod handler;
pub mod server;
pub mod types;

pub use server::{RpcServer, RpcServerConfig};
