//! Order Model
//!
//! 订单主实体：行项目、金额、生命周期状态。
//! 金额字段由服务端计算并持久化，客户端只读。

use serde::{Deserialize, Serialize};

/// Sentinel delivery address for in-store pickup orders.
///
/// A pickup order carries no delivery fee.
pub const PICKUP_ADDRESS: &str = "pickup";

/// Order lifecycle status.
///
/// `Delivered` and `Cancelled` are terminal: no transition may leave them.
/// Wire representation is the lowercase string (`pending`, `in_transit`, ...).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Pending,
    Preparing,
    InTransit,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    /// Terminal states admit no further transitions.
    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Delivered | OrderStatus::Cancelled)
    }

    /// Lowercase wire name, matching the serde representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Preparing => "preparing",
            OrderStatus::InTransit => "in_transit",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Cancelled => "cancelled",
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Accepted payment methods.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    /// 货到付款（现金）
    Cash,
    /// 货到付款（刷卡）
    Card,
    /// 在线支付（网关集成在本服务之外）
    Online,
}

/// One priced, quantified product entry within an order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    /// Menu item id
    pub id: String,
    /// Item name snapshot (menu renames must not rewrite history)
    pub name: String,
    /// Per-unit price
    pub unit_price: f64,
    /// Quantity (>= 1)
    pub quantity: i32,
    /// Free-text customization ("no onions", "extra cheese")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub special_instructions: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

/// Order entity
///
/// Invariant: `total == subtotal + delivery_fee` for every persisted order,
/// and `delivery_fee == 0` whenever the order is a pickup order.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    /// System-assigned, immutable
    pub id: String,
    /// Placing user; `None` for guest orders
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner_id: Option<String>,
    pub line_items: Vec<LineItem>,
    pub subtotal: f64,
    pub delivery_fee: f64,
    pub total: f64,
    pub status: OrderStatus,
    pub payment_method: PaymentMethod,
    /// Delivery address, or the literal [`PICKUP_ADDRESS`] sentinel
    pub delivery_address: String,
    /// Unix millis, immutable after creation
    pub created_at: i64,
    /// Unix millis, refreshed on every mutation
    pub updated_at: i64,
}

impl Order {
    /// Whether this order is picked up in store (no delivery).
    pub fn is_pickup(&self) -> bool {
        self.delivery_address == PICKUP_ADDRESS
    }
}

// =============================================================================
// API Request Types
// =============================================================================

/// Create order payload (`POST /api/orders`)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewOrderRequest {
    pub line_items: Vec<LineItem>,
    pub payment_method: PaymentMethod,
    /// Delivery address, or [`PICKUP_ADDRESS`] for in-store pickup
    pub delivery_address: String,
}

/// Status transition payload (`PUT /api/orders/{id}/status`)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusUpdateRequest {
    pub status: OrderStatus,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_wire_names_are_lowercase() {
        assert_eq!(
            serde_json::to_string(&OrderStatus::InTransit).unwrap(),
            "\"in_transit\""
        );
        assert_eq!(
            serde_json::from_str::<OrderStatus>("\"cancelled\"").unwrap(),
            OrderStatus::Cancelled
        );
    }

    #[test]
    fn unknown_status_is_rejected() {
        assert!(serde_json::from_str::<OrderStatus>("\"shipped\"").is_err());
    }

    #[test]
    fn terminal_states() {
        assert!(OrderStatus::Delivered.is_terminal());
        assert!(OrderStatus::Cancelled.is_terminal());
        assert!(!OrderStatus::Pending.is_terminal());
        assert!(!OrderStatus::Preparing.is_terminal());
        assert!(!OrderStatus::InTransit.is_terminal());
    }

    #[test]
    fn line_item_uses_camel_case_keys() {
        let item = LineItem {
            id: "margherita".to_string(),
            name: "Margherita".to_string(),
            unit_price: 8.5,
            quantity: 2,
            special_instructions: None,
            image_url: None,
        };
        let json = serde_json::to_value(&item).unwrap();
        assert!(json.get("unitPrice").is_some());
        assert!(json.get("specialInstructions").is_none()); // skipped when None
    }
}
