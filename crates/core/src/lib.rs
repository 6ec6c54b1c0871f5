// Clinicq Core - Department queue engine (domain, use cases, ports)
// NO transport or storage dependencies

pub mod application;
pub mod domain;
pub mod error;
pub mod port;

pub use error::{AppError, ErrorKind, Result};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
