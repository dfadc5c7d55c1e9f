use tokio::sync::broadcast;

use crate::modules::chat::domain::ChatDomainEvent;

const DEFAULT_CAPACITY: usize = 100;

/// 领域事件总线
///
/// 没有订阅者时事件直接丢弃；订阅者落后超过容量时会收到 `Lagged`
pub struct EventBus {
    sender: broadcast::Sender<ChatDomainEvent>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    pub fn publish(&self, event: ChatDomainEvent) {
        tracing::debug!(
            "[EventBus] Publishing event: {} (session {})",
            event.event_type(),
            event.session_id()
        );
        let _ = self.sender.send(event);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ChatDomainEvent> {
        self.sender.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}
