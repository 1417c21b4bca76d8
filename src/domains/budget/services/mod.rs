// Budget domain services
pub mod access;
pub mod budget_service;
pub mod member_service;
pub mod invite_service;
pub mod state;

pub use budget_service::*;
pub use member_service::*;
pub use invite_service::*;
pub use state::*;
