//! Store Settings API Handlers

use axum::{extract::State, Json};

use shared::{StoreSettings, StoreSettingsUpdate};

use crate::audit::AuditAction;
use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::utils::{AppError, AppResult};

/// Get store settings (staff only)
pub async fn get(
    State(state): State<ServerState>,
    user: CurrentUser,
) -> AppResult<Json<StoreSettings>> {
    if !user.role.is_admin() {
        return Err(AppError::forbidden("Store settings are staff-only"));
    }

    let settings = state
        .settings
        .get()
        .map_err(|e| AppError::database(e.to_string()))?;
    Ok(Json(settings))
}

/// Update store settings (staff only, audited)
pub async fn update(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(payload): Json<StoreSettingsUpdate>,
) -> AppResult<Json<StoreSettings>> {
    if !user.role.is_admin() {
        return Err(AppError::forbidden("Store settings are staff-only"));
    }

    if let Some(fee) = payload.delivery_fee {
        if !fee.is_finite() || fee < 0.0 {
            return Err(AppError::validation(format!(
                "Delivery fee must be a non-negative number, got {}",
                fee
            )));
        }
    }

    let updated = state
        .settings
        .update(&payload)
        .map_err(|e| AppError::database(e.to_string()))?;

    if let Err(e) = state.audit.append(
        AuditAction::SettingsUpdated,
        "settings",
        None,
        &user,
        serde_json::json!({
            "sendCustomerNotifications": payload.send_customer_notifications,
            "deliveryFee": payload.delivery_fee,
        }),
    ) {
        tracing::error!(error = %e, "Failed to write audit entry");
    }

    tracing::info!(admin = %user.id, "Store settings updated");

    Ok(Json(updated))
}
