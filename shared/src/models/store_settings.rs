//! Store Settings Model
//!
//! 门店级配置单例：通知开关、配送费。
//! 由管理端编辑，订单流程每次请求读取。

use serde::{Deserialize, Serialize};

/// Store-wide settings document.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StoreSettings {
    /// Master switch for customer notifications (created / status changed)
    pub send_customer_notifications: bool,
    /// Flat delivery fee applied to non-pickup orders
    pub delivery_fee: f64,
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            send_customer_notifications: true,
            delivery_fee: 3.99,
        }
    }
}

/// Partial update payload (`PUT /api/settings`)
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct StoreSettingsUpdate {
    pub send_customer_notifications: Option<bool>,
    pub delivery_fee: Option<f64>,
}

impl StoreSettings {
    /// Apply a partial update, returning the merged document.
    pub fn merged(&self, update: &StoreSettingsUpdate) -> StoreSettings {
        StoreSettings {
            send_customer_notifications: update
                .send_customer_notifications
                .unwrap_or(self.send_customer_notifications),
            delivery_fee: update.delivery_fee.unwrap_or(self.delivery_fee),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merged_keeps_unset_fields() {
        let base = StoreSettings {
            send_customer_notifications: true,
            delivery_fee: 2.5,
        };
        let merged = base.merged(&StoreSettingsUpdate {
            send_customer_notifications: Some(false),
            delivery_fee: None,
        });
        assert!(!merged.send_customer_notifications);
        assert_eq!(merged.delivery_fee, 2.5);
    }
}
