// Ledger domain handlers
pub mod month_handler;
pub mod account_handler;
pub mod transaction_handler;
