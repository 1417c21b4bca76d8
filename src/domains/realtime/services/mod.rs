// Realtime domain services
pub mod event_hub;
pub mod state;

pub use event_hub::*;
pub use state::*;
