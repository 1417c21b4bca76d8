// Realtime domain models
pub mod event;

pub use event::*;
