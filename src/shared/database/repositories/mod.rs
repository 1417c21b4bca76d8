// All repositories module
pub mod auth;
pub mod budget;
pub mod ledger;
pub mod audit;

// Re-export all repositories for convenience
pub use auth::*;
pub use budget::*;
pub use ledger::*;
pub use audit::*;
