//! Notification delivery channels
//!
//! The dispatcher is channel-agnostic: production posts to a webhook
//! (an email/SMS gateway sits behind it), development logs, tests record.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use thiserror::Error;

use super::CustomerNotification;

/// Channel delivery errors (always swallowed by the dispatcher).
#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("webhook request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("webhook rejected notification with status {0}")]
    Rejected(u16),
}

/// A delivery channel for customer notifications.
#[async_trait]
pub trait NotificationChannel: Send + Sync {
    async fn deliver(&self, notification: &CustomerNotification) -> Result<(), NotifyError>;
}

/// Production channel: POSTs the notification as JSON to a gateway webhook.
pub struct WebhookChannel {
    client: reqwest::Client,
    endpoint: String,
}

impl WebhookChannel {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.into(),
        }
    }
}

#[async_trait]
impl NotificationChannel for WebhookChannel {
    async fn deliver(&self, notification: &CustomerNotification) -> Result<(), NotifyError> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(notification)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(NotifyError::Rejected(response.status().as_u16()));
        }
        Ok(())
    }
}

/// Development fallback when no webhook is configured: log and succeed.
pub struct LogChannel;

#[async_trait]
impl NotificationChannel for LogChannel {
    async fn deliver(&self, notification: &CustomerNotification) -> Result<(), NotifyError> {
        tracing::info!(
            order_id = %notification.order_id,
            subject = %notification.subject,
            body = %notification.body,
            "Customer notification (no webhook configured)"
        );
        Ok(())
    }
}

/// Test double: records delivered notifications, optionally fails on demand.
#[derive(Default)]
pub struct RecordingChannel {
    sent: Mutex<Vec<CustomerNotification>>,
    failing: AtomicBool,
}

impl RecordingChannel {
    pub fn new() -> Self {
        Self::default()
    }

    /// When set, `deliver` fails until cleared.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Snapshot of everything delivered so far.
    pub fn delivered(&self) -> Vec<CustomerNotification> {
        self.sent.lock().expect("recording channel poisoned").clone()
    }
}

#[async_trait]
impl NotificationChannel for RecordingChannel {
    async fn deliver(&self, notification: &CustomerNotification) -> Result<(), NotifyError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(NotifyError::Rejected(503));
        }
        self.sent
            .lock()
            .expect("recording channel poisoned")
            .push(notification.clone());
        Ok(())
    }
}
