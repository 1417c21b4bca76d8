// Budget domain models
pub mod role;
pub mod budget;
pub mod member;
pub mod invite;

pub use role::*;
pub use budget::*;
pub use member::*;
pub use invite::*;
