//! Shared domain types for the Forno ordering platform
//!
//! 前后端共享的领域模型：订单、角色、门店设置。
//! 这里只放纯数据类型和序列化约定，不放任何服务端逻辑。

pub mod models;
pub mod util;

pub use models::order::{
    LineItem, NewOrderRequest, Order, OrderStatus, PaymentMethod, StatusUpdateRequest,
    PICKUP_ADDRESS,
};
pub use models::role::Role;
pub use models::store_settings::{StoreSettings, StoreSettingsUpdate};
