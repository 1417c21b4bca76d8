use std::collections::HashMap;
use std::sync::Arc;
use parking_lot::RwLock;
use tokio::sync::broadcast::{
    self,
    error::{RecvError, TryRecvError},
};
use crate::domains::realtime::models::BudgetEvent;

/// 예산별 이벤트 허브 (Pub/Sub)
/// Per-budget publish/subscribe hub
///
/// 역할:
/// - 예산마다 broadcast 채널 하나를 관리 (첫 구독 시 생성)
/// - 서비스 계층이 커밋 후 이벤트를 발행
/// - WebSocket 핸들러가 구독하여 클라이언트로 전달
///
/// 구독자가 모두 끊긴 채널은 마지막 `Subscription`이 drop될 때 제거됩니다.
#[derive(Clone)]
pub struct EventHub {
    channels: Arc<RwLock<HashMap<u64, broadcast::Sender<BudgetEvent>>>>,
    capacity: usize,
}

impl EventHub {
    /// # Arguments
    /// * `capacity` - 채널 용량 (느린 구독자는 이 이상 밀리면 Lagged)
    pub fn new(capacity: usize) -> Self {
        Self {
            channels: Arc::new(RwLock::new(HashMap::new())),
            capacity: capacity.max(1),
        }
    }

    /// 예산 구독
    /// Subscribe to a budget's events
    pub fn subscribe(&self, budget_id: u64) -> Subscription {
        let receiver = self
            .channels
            .write()
            .entry(budget_id)
            .or_insert_with(|| broadcast::channel(self.capacity).0)
            .subscribe();

        Subscription {
            receiver: Some(receiver),
            hub: self.clone(),
            budget_id,
        }
    }

    /// 구독자가 없으면 채널 제거
    /// Drop the budget's channel once no receiver is left
    fn prune(&self, budget_id: u64) {
        let mut channels = self.channels.write();
        if channels.get(&budget_id).map_or(false, |tx| tx.receiver_count() == 0) {
            channels.remove(&budget_id);
            tracing::debug!(budget_id, "budget channel released");
        }
    }

    /// 이벤트 발행
    /// Publish an event; returns the number of subscribers reached
    pub fn publish(&self, event: BudgetEvent) -> usize {
        let budget_id = event.budget_id;
        let sender = self.channels.read().get(&budget_id).cloned();

        let Some(sender) = sender else {
            return 0;
        };

        match sender.send(event) {
            Ok(receivers) => {
                tracing::debug!(budget_id, receivers, "budget event published");
                receivers
            }
            Err(_) => {
                self.prune(budget_id);
                0
            }
        }
    }

    /// 현재 구독자 수
    pub fn subscriber_count(&self, budget_id: u64) -> usize {
        self.channels
            .read()
            .get(&budget_id)
            .map_or(0, |tx| tx.receiver_count())
    }

    /// 열려 있는 채널 수
    pub fn channel_count(&self) -> usize {
        self.channels.read().len()
    }
}

/// 예산 구독 핸들
/// A live subscription; dropping the last one releases the budget's channel
pub struct Subscription {
    // drop 시점에 먼저 비워야 receiver_count가 0이 됨
    receiver: Option<broadcast::Receiver<BudgetEvent>>,
    hub: EventHub,
    budget_id: u64,
}

impl Subscription {
    pub async fn recv(&mut self) -> Result<BudgetEvent, RecvError> {
        match self.receiver.as_mut() {
            Some(rx) => rx.recv().await,
            None => Err(RecvError::Closed),
        }
    }

    pub fn try_recv(&mut self) -> Result<BudgetEvent, TryRecvError> {
        match self.receiver.as_mut() {
            Some(rx) => rx.try_recv(),
            None => Err(TryRecvError::Closed),
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        drop(self.receiver.take());
        self.hub.prune(self.budget_id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::audit::models::{AuditAction, EntityType};
    use serde_json::json;

    fn event(budget_id: u64, entity_id: u64) -> BudgetEvent {
        BudgetEvent::new(budget_id, EntityType::Transaction, AuditAction::Create, entity_id, 1, &json!({}))
    }

    #[tokio::test]
    async fn test_subscribers_receive_only_their_budget() {
        let hub = EventHub::new(16);
        let mut rx1 = hub.subscribe(1);
        let mut rx2 = hub.subscribe(2);

        assert_eq!(hub.publish(event(1, 10)), 1);

        let received = rx1.recv().await.unwrap();
        assert_eq!(received.entity_id, 10);
        assert!(rx2.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_publish_without_subscribers_is_dropped() {
        let hub = EventHub::new(16);
        assert_eq!(hub.publish(event(5, 1)), 0);
        assert_eq!(hub.channel_count(), 0);
    }

    #[tokio::test]
    async fn test_channel_removed_when_last_subscriber_leaves() {
        let hub = EventHub::new(16);
        let first = hub.subscribe(3);
        let second = hub.subscribe(3);
        assert_eq!(hub.subscriber_count(3), 2);

        drop(first);
        assert_eq!(hub.channel_count(), 1);
        assert_eq!(hub.subscriber_count(3), 1);

        // 발행 없이도 마지막 구독 해제 시 채널 제거
        drop(second);
        assert_eq!(hub.channel_count(), 0);
        assert_eq!(hub.publish(event(3, 1)), 0);
    }

    #[tokio::test]
    async fn test_resubscribe_after_release_gets_fresh_channel() {
        let hub = EventHub::new(16);
        drop(hub.subscribe(4));
        assert_eq!(hub.channel_count(), 0);

        let mut rx = hub.subscribe(4);
        assert_eq!(hub.publish(event(4, 9)), 1);
        assert_eq!(rx.recv().await.unwrap().entity_id, 9);
    }

    #[tokio::test]
    async fn test_slow_subscriber_lags() {
        let hub = EventHub::new(2);
        let mut rx = hub.subscribe(1);

        for i in 0..5 {
            hub.publish(event(1, i));
        }

        match rx.recv().await {
            Err(broadcast::error::RecvError::Lagged(skipped)) => assert_eq!(skipped, 3),
            other => panic!("expected lag, got {:?}", other.map(|e| e.entity_id)),
        }
    }
}
