//! Order API Handlers

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;

use shared::models::order::{NewOrderRequest, Order, OrderStatus, StatusUpdateRequest};
use shared::{Role, PICKUP_ADDRESS};

use crate::audit::AuditAction;
use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::orders::store::NewOrder;
use crate::orders::{access, compute_totals, transition, TransitionOutcome};
use crate::utils::{AppError, AppResult};

/// Place a new order
///
/// Totals are computed server-side from the configured delivery fee; the
/// order is persisted in `pending` state and a best-effort "order received"
/// notification goes out to the customer.
pub async fn create(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(payload): Json<NewOrderRequest>,
) -> AppResult<(StatusCode, Json<Order>)> {
    if payload.line_items.is_empty() {
        return Err(AppError::validation(
            "Order must contain at least one line item",
        ));
    }

    let settings = state
        .settings
        .get()
        .map_err(|e| AppError::database(e.to_string()))?;

    let pickup = payload.delivery_address == PICKUP_ADDRESS;
    let totals = compute_totals(&payload.line_items, settings.delivery_fee, pickup)?;

    // Customers own the orders they place. Staff placing an order through
    // the API produce a guest order (walk-in / phone order).
    let owner_id = match user.role {
        Role::Customer => Some(user.id.clone()),
        Role::Admin | Role::AdminMaster => None,
    };

    let order = state
        .store
        .create(NewOrder {
            owner_id,
            line_items: payload.line_items,
            subtotal: totals.subtotal,
            delivery_fee: totals.delivery_fee,
            total: totals.total,
            payment_method: payload.payment_method,
            delivery_address: payload.delivery_address,
        })
        .map_err(|e| AppError::database(e.to_string()))?;

    state
        .notifier
        .notify_created(&order, settings.send_customer_notifications)
        .await;

    tracing::info!(order_id = %order.id, total = order.total, "Order created");

    Ok((StatusCode::CREATED, Json(order)))
}

/// Query params for listing orders
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub status: Option<OrderStatus>,
}

/// List orders
///
/// Staff see every order (optionally filtered by status); customers only
/// their own.
pub async fn list(
    State(state): State<ServerState>,
    user: CurrentUser,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Vec<Order>>> {
    let orders = match user.role {
        Role::Admin | Role::AdminMaster => match query.status {
            Some(status) => state.store.list_by_status(status),
            None => state.store.list_all(),
        },
        Role::Customer => state.store.list_by_owner(&user.id).map(|orders| {
            orders
                .into_iter()
                .filter(|o| query.status.is_none_or(|s| o.status == s))
                .collect()
        }),
    }
    .map_err(|e| AppError::database(e.to_string()))?;

    Ok(Json(orders))
}

/// Get order by id
///
/// 403 when the order exists but the actor may not see it; 404 only for
/// genuinely absent ids.
pub async fn get_by_id(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<Order>> {
    let order = state
        .store
        .get(&id)
        .map_err(|e| AppError::database(e.to_string()))?
        .ok_or_else(|| AppError::not_found(format!("Order {} not found", id)))?;

    if !access::can_view(&user, &order) {
        return Err(AppError::forbidden("You may not view this order"));
    }

    Ok(Json(order))
}

/// Change order status (staff only)
pub async fn update_status(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
    Json(payload): Json<StatusUpdateRequest>,
) -> AppResult<Json<Order>> {
    match transition(state.store.as_ref(), &id, payload.status, &user)? {
        TransitionOutcome::Changed { previous, order } => {
            if let Err(e) = state.audit.append(
                AuditAction::OrderStatusChanged,
                "order",
                Some(order.id.clone()),
                &user,
                serde_json::json!({ "from": previous, "to": order.status }),
            ) {
                tracing::error!(order_id = %order.id, error = %e, "Failed to write audit entry");
            }

            let notifications_enabled = state
                .settings
                .get()
                .map(|s| s.send_customer_notifications)
                .unwrap_or(false);
            state
                .notifier
                .notify_status_changed(&order, notifications_enabled)
                .await;

            tracing::info!(
                order_id = %order.id,
                from = %previous,
                to = %order.status,
                admin = %user.id,
                "Order status changed"
            );

            Ok(Json(order))
        }
        // Retried request: nothing changed, no audit entry, no notification
        TransitionOutcome::Noop(order) => Ok(Json(order)),
    }
}

/// Hard-delete an order (admin_master only)
///
/// Operational escape hatch that bypasses the lifecycle state machine.
pub async fn hard_delete(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    if !access::can_hard_delete(&user) {
        return Err(AppError::forbidden(
            "Only the master administrator may delete orders",
        ));
    }

    let existed = state
        .store
        .hard_delete(&id)
        .map_err(|e| AppError::database(e.to_string()))?;
    if !existed {
        return Err(AppError::not_found(format!("Order {} not found", id)));
    }

    if let Err(e) = state.audit.append(
        AuditAction::OrderDeleted,
        "order",
        Some(id.clone()),
        &user,
        serde_json::Value::Null,
    ) {
        tracing::error!(order_id = %id, error = %e, "Failed to write audit entry");
    }

    tracing::info!(order_id = %id, admin = %user.id, "Order hard-deleted");

    Ok(StatusCode::NO_CONTENT)
}
