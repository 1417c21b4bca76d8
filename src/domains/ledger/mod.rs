// Ledger domain module (months, accounts, transactions, balance recalculation)
pub mod engine;
pub mod handlers;
pub mod services;
pub mod models;
pub mod routes;

pub use models::*;
pub use routes::*;
