// Budget repositories
pub mod budget_repository;
pub mod member_repository;
pub mod invite_repository;

pub use budget_repository::*;
pub use member_repository::*;
pub use invite_repository::*;
