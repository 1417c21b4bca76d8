// Audit domain services
pub mod audit_service;
pub mod state;

pub use audit_service::*;
pub use state::*;
