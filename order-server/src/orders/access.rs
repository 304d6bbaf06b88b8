//! Order Access Control
//!
//! Role-gated checks over the closed [`Role`] enum. Every rule is an
//! exhaustive `match`: adding a role forces every gate to be revisited.
//!
//! Unauthenticated requests never reach these functions — the JWT extractor
//! rejects them with 401 first.

use shared::models::order::Order;
use shared::Role;

use crate::auth::CurrentUser;

/// Whether the actor may read the given order.
///
/// Admins see every order; a customer only their own. Guest orders
/// (`owner_id == None`) are visible to staff only.
pub fn can_view(actor: &CurrentUser, order: &Order) -> bool {
    match actor.role {
        Role::Admin | Role::AdminMaster => true,
        Role::Customer => order.owner_id.as_deref() == Some(actor.id.as_str()),
    }
}

/// Whether the actor may drive the order lifecycle.
pub fn can_mutate_status(actor: &CurrentUser) -> bool {
    match actor.role {
        Role::Admin | Role::AdminMaster => true,
        Role::Customer => false,
    }
}

/// Whether the actor may permanently delete an order (operational escape
/// hatch, bypasses the state machine).
pub fn can_hard_delete(actor: &CurrentUser) -> bool {
    match actor.role {
        Role::AdminMaster => true,
        Role::Admin | Role::Customer => false,
    }
}
