// Realtime domain state
// 실시간 도메인 상태
use crate::domains::realtime::services::EventHub;

/// Realtime domain state
#[derive(Clone)]
pub struct RealtimeState {
    pub event_hub: EventHub,
}

impl RealtimeState {
    pub fn new(event_hub: EventHub) -> Self {
        Self { event_hub }
    }
}
