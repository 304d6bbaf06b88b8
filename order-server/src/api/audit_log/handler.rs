//! Audit Log API Handlers

use axum::{
    extract::{Query, State},
    Json,
};

use crate::audit::{AuditListResponse, AuditQuery};
use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::utils::{AppError, AppResult};

/// List audit entries, newest first (staff only)
pub async fn list(
    State(state): State<ServerState>,
    user: CurrentUser,
    Query(query): Query<AuditQuery>,
) -> AppResult<Json<AuditListResponse>> {
    if !user.role.is_admin() {
        return Err(AppError::forbidden("Audit log is staff-only"));
    }

    let response = state
        .audit
        .query(&query)
        .map_err(|e| AppError::database(e.to_string()))?;
    Ok(Json(response))
}
