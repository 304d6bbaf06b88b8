//! Customer Notification Dispatch
//!
//! 订单生命周期事件的客户通知。严格 best-effort：
//! 渠道失败只记日志，绝不影响触发它的订单变更。
//!
//! 通知开关 (`send_customer_notifications`) 由调用方显式传入，
//! 不读全局状态，保证测试可确定。

pub mod channel;

pub use channel::{
    LogChannel, NotificationChannel, NotifyError, RecordingChannel, WebhookChannel,
};

use std::sync::Arc;

use serde::Serialize;
use shared::models::order::{Order, OrderStatus};

/// One customer-facing notification, as handed to the delivery channel.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerNotification {
    /// Idempotency key for downstream gateways
    pub notification_id: String,
    pub order_id: String,
    /// Owning user, when the order is not a guest order
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recipient_id: Option<String>,
    pub subject: String,
    pub body: String,
}

/// Message template for a status, if one exists.
fn status_template(status: OrderStatus) -> Option<&'static str> {
    match status {
        OrderStatus::Preparing => Some("Your pizza is in the oven!"),
        OrderStatus::InTransit => Some("Your order is on its way."),
        OrderStatus::Delivered => Some("Your order has been delivered. Buon appetito!"),
        OrderStatus::Cancelled => Some("Your order has been cancelled."),
        // Moving back to pending has no bespoke wording
        OrderStatus::Pending => None,
    }
}

/// Human-readable message for a status change, falling back to a generic
/// "status updated" line for statuses without a template.
fn status_message(status: OrderStatus) -> String {
    match status_template(status) {
        Some(template) => template.to_string(),
        None => format!("Your order status was updated to {}", status),
    }
}

/// Dispatches lifecycle notifications through a pluggable channel.
#[derive(Clone)]
pub struct NotificationService {
    channel: Arc<dyn NotificationChannel>,
}

impl NotificationService {
    pub fn new(channel: Arc<dyn NotificationChannel>) -> Self {
        Self { channel }
    }

    /// Notify the customer their order was received.
    ///
    /// Returns whether a notification was actually delivered. `false` when
    /// notifications are disabled or the channel failed (failure is logged,
    /// never propagated).
    pub async fn notify_created(&self, order: &Order, enabled: bool) -> bool {
        if !enabled {
            return false;
        }
        self.dispatch(CustomerNotification {
            notification_id: uuid::Uuid::new_v4().to_string(),
            order_id: order.id.clone(),
            recipient_id: order.owner_id.clone(),
            subject: "Order received".to_string(),
            body: format!(
                "We received your order {} — total {:.2}. We'll keep you posted.",
                order.id, order.total
            ),
        })
        .await
    }

    /// Notify the customer their order moved to a new status.
    pub async fn notify_status_changed(&self, order: &Order, enabled: bool) -> bool {
        if !enabled {
            return false;
        }
        self.dispatch(CustomerNotification {
            notification_id: uuid::Uuid::new_v4().to_string(),
            order_id: order.id.clone(),
            recipient_id: order.owner_id.clone(),
            subject: format!("Order {}: {}", order.id, order.status),
            body: status_message(order.status),
        })
        .await
    }

    async fn dispatch(&self, notification: CustomerNotification) -> bool {
        match self.channel.deliver(&notification).await {
            Ok(()) => {
                tracing::debug!(
                    order_id = %notification.order_id,
                    subject = %notification.subject,
                    "Customer notification delivered"
                );
                true
            }
            Err(e) => {
                // Best-effort: the order mutation already succeeded.
                tracing::error!(
                    order_id = %notification.order_id,
                    error = %e,
                    "Customer notification delivery failed"
                );
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::models::order::PaymentMethod;

    fn order(status: OrderStatus) -> Order {
        Order {
            id: "order-1".to_string(),
            owner_id: Some("alice".to_string()),
            line_items: vec![],
            subtotal: 10.0,
            delivery_fee: 0.0,
            total: 10.0,
            status,
            payment_method: PaymentMethod::Cash,
            delivery_address: "pickup".to_string(),
            created_at: 0,
            updated_at: 0,
        }
    }

    #[tokio::test]
    async fn test_disabled_flag_suppresses_delivery() {
        let channel = Arc::new(RecordingChannel::new());
        let service = NotificationService::new(channel.clone());

        assert!(!service.notify_created(&order(OrderStatus::Pending), false).await);
        assert!(
            !service
                .notify_status_changed(&order(OrderStatus::Preparing), false)
                .await
        );
        assert!(channel.delivered().is_empty());
    }

    #[tokio::test]
    async fn test_enabled_flag_delivers() {
        let channel = Arc::new(RecordingChannel::new());
        let service = NotificationService::new(channel.clone());

        assert!(service.notify_created(&order(OrderStatus::Pending), true).await);
        assert!(
            service
                .notify_status_changed(&order(OrderStatus::Preparing), true)
                .await
        );

        let sent = channel.delivered();
        assert_eq!(sent.len(), 2);
        assert_eq!(sent[0].subject, "Order received");
        assert_eq!(sent[1].body, "Your pizza is in the oven!");
        assert_eq!(sent[1].recipient_id.as_deref(), Some("alice"));
    }

    #[tokio::test]
    async fn test_channel_failure_is_swallowed() {
        let channel = Arc::new(RecordingChannel::new());
        channel.set_failing(true);
        let service = NotificationService::new(channel.clone());

        // Returns false, does not panic or propagate
        assert!(
            !service
                .notify_status_changed(&order(OrderStatus::Delivered), true)
                .await
        );
    }

    #[test]
    fn test_status_message_fallback() {
        // Statuses without a template get the generic wording
        assert_eq!(
            status_message(OrderStatus::Pending),
            "Your order status was updated to pending"
        );
        // Templated statuses keep their wording
        assert_eq!(
            status_message(OrderStatus::Delivered),
            "Your order has been delivered. Buon appetito!"
        );
    }

    #[tokio::test]
    async fn test_notifications_carry_unique_ids() {
        let channel = Arc::new(RecordingChannel::new());
        let service = NotificationService::new(channel.clone());

        service.notify_created(&order(OrderStatus::Pending), true).await;
        service.notify_created(&order(OrderStatus::Pending), true).await;

        let sent = channel.delivered();
        assert_ne!(sent[0].notification_id, sent[1].notification_id);
    }
}
