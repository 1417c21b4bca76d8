// Domain modules
pub mod auth;
pub mod budget;
pub mod ledger;
pub mod audit;
pub mod realtime;
