// Shared utilities
pub mod token;
pub mod text;

pub use token::*;
pub use text::*;
