// Ledger repositories
pub mod month_repository;
pub mod account_repository;
pub mod transaction_repository;

pub use month_repository::*;
pub use account_repository::*;
pub use transaction_repository::*;
