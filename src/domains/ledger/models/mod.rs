// Ledger domain models
pub mod month;
pub mod account;
pub mod transaction;
pub mod recalculation;

pub use month::*;
pub use account::*;
pub use transaction::*;
pub use recalculation::*;
