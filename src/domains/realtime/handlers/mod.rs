// Realtime domain handlers
pub mod ws_handler;
