//! Order Lifecycle State Machine
//!
//! Status flow: `pending → preparing → in_transit → delivered`, with
//! `cancelled` reachable from any non-terminal state.
//!
//! Beyond refusing to leave terminal states, sequencing is deliberately
//! permissive: staff may move an order backward (`in_transit → preparing`)
//! or skip states to correct mistakes.

use shared::models::order::{Order, OrderStatus};

use super::{access, OrderError, OrderStore};
use crate::auth::CurrentUser;

/// Result of a successful transition request.
#[derive(Debug, Clone)]
pub enum TransitionOutcome {
    /// The status changed and the order was persisted.
    Changed {
        previous: OrderStatus,
        order: Order,
    },
    /// `new_status` equals the current status: nothing was written and no
    /// event is emitted, so retried requests cannot duplicate notifications.
    Noop(Order),
}

impl TransitionOutcome {
    pub fn order(&self) -> &Order {
        match self {
            TransitionOutcome::Changed { order, .. } => order,
            TransitionOutcome::Noop(order) => order,
        }
    }
}

/// Validate and apply a status transition.
///
/// Checks, in order: actor rights, order existence, idempotent no-op,
/// terminal-state exit. On success persists the new status and reports the
/// previous one so the caller can audit and notify.
pub fn transition(
    store: &dyn OrderStore,
    order_id: &str,
    new_status: OrderStatus,
    actor: &CurrentUser,
) -> Result<TransitionOutcome, OrderError> {
    if !access::can_mutate_status(actor) {
        return Err(OrderError::Forbidden(format!(
            "role {} may not change order status",
            actor.role
        )));
    }

    let order = store
        .get(order_id)?
        .ok_or_else(|| OrderError::OrderNotFound(order_id.to_string()))?;

    if order.status == new_status {
        return Ok(TransitionOutcome::Noop(order));
    }

    if order.status.is_terminal() {
        return Err(OrderError::IllegalTransition {
            id: order.id,
            status: order.status,
        });
    }

    let updated = store
        .update_status(order_id, new_status)?
        .ok_or_else(|| OrderError::OrderNotFound(order_id.to_string()))?;

    Ok(TransitionOutcome::Changed {
        previous: order.status,
        order: updated,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::orders::store::{NewOrder, OrderStorage};
    use shared::models::order::{LineItem, PaymentMethod};
    use shared::Role;

    fn admin() -> CurrentUser {
        CurrentUser {
            id: "admin-1".to_string(),
            username: "Gina".to_string(),
            role: Role::Admin,
        }
    }

    fn customer(id: &str) -> CurrentUser {
        CurrentUser {
            id: id.to_string(),
            username: id.to_string(),
            role: Role::Customer,
        }
    }

    fn seed_order(storage: &OrderStorage) -> Order {
        storage
            .create(NewOrder {
                owner_id: Some("alice".to_string()),
                line_items: vec![LineItem {
                    id: "margherita".to_string(),
                    name: "Margherita".to_string(),
                    unit_price: 8.5,
                    quantity: 1,
                    special_instructions: None,
                    image_url: None,
                }],
                subtotal: 8.5,
                delivery_fee: 3.99,
                total: 12.49,
                payment_method: PaymentMethod::Card,
                delivery_address: "Via Roma 1".to_string(),
            })
            .unwrap()
    }

    fn seed_with_status(storage: &OrderStorage, status: OrderStatus) -> Order {
        let order = seed_order(storage);
        storage.update_status(&order.id, status).unwrap().unwrap()
    }

    #[test]
    fn test_admin_moves_pending_to_preparing() {
        let storage = OrderStorage::open_in_memory().unwrap();
        let order = seed_order(&storage);

        let outcome =
            transition(&storage, &order.id, OrderStatus::Preparing, &admin()).unwrap();

        match outcome {
            TransitionOutcome::Changed { previous, order } => {
                assert_eq!(previous, OrderStatus::Pending);
                assert_eq!(order.status, OrderStatus::Preparing);
            }
            other => panic!("expected Changed, got {:?}", other),
        }

        // Persisted, not just returned
        let stored = storage.get(&order.id).unwrap().unwrap();
        assert_eq!(stored.status, OrderStatus::Preparing);
    }

    #[test]
    fn test_customer_cannot_transition() {
        let storage = OrderStorage::open_in_memory().unwrap();
        let order = seed_order(&storage);

        // Not even the order's own customer may drive the lifecycle
        let result = transition(&storage, &order.id, OrderStatus::Cancelled, &customer("alice"));
        assert!(matches!(result, Err(OrderError::Forbidden(_))));

        let stored = storage.get(&order.id).unwrap().unwrap();
        assert_eq!(stored.status, OrderStatus::Pending);
    }

    #[test]
    fn test_unknown_order_is_not_found() {
        let storage = OrderStorage::open_in_memory().unwrap();
        let result = transition(&storage, "order-404", OrderStatus::Preparing, &admin());
        assert!(matches!(result, Err(OrderError::OrderNotFound(_))));
    }

    #[test]
    fn test_same_status_is_idempotent_noop() {
        let storage = OrderStorage::open_in_memory().unwrap();
        let order = seed_with_status(&storage, OrderStatus::Preparing);
        let before = storage.get(&order.id).unwrap().unwrap();

        let outcome =
            transition(&storage, &order.id, OrderStatus::Preparing, &admin()).unwrap();
        assert!(matches!(outcome, TransitionOutcome::Noop(_)));

        // No write happened
        let after = storage.get(&order.id).unwrap().unwrap();
        assert_eq!(after.updated_at, before.updated_at);
    }

    #[test]
    fn test_noop_applies_to_terminal_states_too() {
        // Re-sending "delivered" for a delivered order is a retry, not an error
        let storage = OrderStorage::open_in_memory().unwrap();
        let order = seed_with_status(&storage, OrderStatus::Delivered);

        let outcome =
            transition(&storage, &order.id, OrderStatus::Delivered, &admin()).unwrap();
        assert!(matches!(outcome, TransitionOutcome::Noop(_)));
    }

    #[test]
    fn test_delivered_is_terminal() {
        let storage = OrderStorage::open_in_memory().unwrap();
        let order = seed_with_status(&storage, OrderStatus::Delivered);

        for target in [
            OrderStatus::Pending,
            OrderStatus::Preparing,
            OrderStatus::InTransit,
            OrderStatus::Cancelled,
        ] {
            let result = transition(&storage, &order.id, target, &admin());
            assert!(
                matches!(result, Err(OrderError::IllegalTransition { .. })),
                "delivered → {} should be rejected",
                target
            );
        }
    }

    #[test]
    fn test_cancelled_is_terminal() {
        let storage = OrderStorage::open_in_memory().unwrap();
        let order = seed_with_status(&storage, OrderStatus::Cancelled);

        let result = transition(&storage, &order.id, OrderStatus::Pending, &admin());
        assert!(matches!(result, Err(OrderError::IllegalTransition { .. })));
    }

    #[test]
    fn test_cancel_reachable_from_every_non_terminal_state() {
        for start in [
            OrderStatus::Pending,
            OrderStatus::Preparing,
            OrderStatus::InTransit,
        ] {
            let storage = OrderStorage::open_in_memory().unwrap();
            let order = seed_with_status(&storage, start);
            let outcome =
                transition(&storage, &order.id, OrderStatus::Cancelled, &admin()).unwrap();
            assert_eq!(outcome.order().status, OrderStatus::Cancelled);
        }
    }

    #[test]
    fn test_backward_and_skipping_moves_allowed() {
        let storage = OrderStorage::open_in_memory().unwrap();

        // Backward: in_transit → preparing (driver came back, pizza remade)
        let order = seed_with_status(&storage, OrderStatus::InTransit);
        let outcome =
            transition(&storage, &order.id, OrderStatus::Preparing, &admin()).unwrap();
        assert_eq!(outcome.order().status, OrderStatus::Preparing);

        // Skip: pending → delivered
        let order = seed_order(&storage);
        let outcome =
            transition(&storage, &order.id, OrderStatus::Delivered, &admin()).unwrap();
        assert_eq!(outcome.order().status, OrderStatus::Delivered);
    }
}
