// Audit domain handlers
pub mod audit_handler;
