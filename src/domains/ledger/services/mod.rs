// Ledger domain services
pub mod recalculation_service;
pub mod month_service;
pub mod account_service;
pub mod transaction_service;
pub mod state;

pub use recalculation_service::*;
pub use month_service::*;
pub use account_service::*;
pub use transaction_service::*;
pub use state::*;
