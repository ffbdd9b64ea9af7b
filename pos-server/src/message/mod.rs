//! 通知总线
//!
//! ```text
//! handler ──▶ ServerState::notify() ──▶ MessageBus::publish()
//!                                              │
//!                               broadcast::Sender<Notification>
//!                                              │
//!                         ┌────────────────────┼────────────────────┐
//!                         ▼                    ▼                    ▼
//!                    /ws client           /ws client           /ws client
//! ```
//!
//! 投递语义: at-most-once。落后的订阅者收到 `Lagged` 后跳过丢失的消息继续。

use shared::message::Notification;
use tokio::sync::broadcast;

/// Default broadcast channel capacity
pub const DEFAULT_CAPACITY: usize = 1024;

/// 消息总线 - 进程内广播
#[derive(Debug, Clone)]
pub struct MessageBus {
    tx: broadcast::Sender<Notification>,
}

impl Default for MessageBus {
    fn default() -> Self {
        Self::new()
    }
}

impl MessageBus {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        Self { tx }
    }

    /// 发布通知 (服务器 -> 所有订阅者)
    ///
    /// 没有订阅者时消息直接丢弃, 不返回错误
    pub fn publish(&self, msg: Notification) {
        let kind = msg.kind;
        match self.tx.send(msg) {
            Ok(receivers) => {
                tracing::debug!(event = %kind, receivers, "Notification published");
            }
            Err(_) => {
                tracing::debug!(event = %kind, "No subscribers, notification dropped");
            }
        }
    }

    /// 订阅所有后续通知
    pub fn subscribe(&self) -> broadcast::Receiver<Notification> {
        self.tx.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::message::NotificationType;
    use tokio::sync::broadcast::error::RecvError;

    #[tokio::test]
    async fn test_publish_reaches_every_subscriber() {
        let bus = MessageBus::new();
        let mut a = bus.subscribe();
        let mut b = bus.subscribe();
        assert_eq!(bus.subscriber_count(), 2);

        bus.publish(Notification::deleted(NotificationType::ClienteEliminado, 7));

        let msg = a.recv().await.unwrap();
        assert_eq!(msg.kind, NotificationType::ClienteEliminado);
        assert_eq!(msg.data["id"], 7);
        assert_eq!(b.recv().await.unwrap().kind, NotificationType::ClienteEliminado);
    }

    #[test]
    fn test_publish_without_subscribers_is_silent() {
        let bus = MessageBus::new();
        bus.publish(Notification::deleted(NotificationType::GastoEliminado, 1));
        assert_eq!(bus.subscriber_count(), 0);
    }

    #[tokio::test]
    async fn test_lagging_subscriber_skips_and_continues() {
        let bus = MessageBus::with_capacity(2);
        let mut rx = bus.subscribe();
        for id in 0..5 {
            bus.publish(Notification::deleted(NotificationType::VentaEliminada, id));
        }

        assert!(matches!(rx.recv().await, Err(RecvError::Lagged(3))));
        assert_eq!(rx.recv().await.unwrap().data["id"], 3);
        assert_eq!(rx.recv().await.unwrap().data["id"], 4);
    }
}
