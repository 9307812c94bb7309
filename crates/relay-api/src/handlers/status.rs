//! Presence status handlers

use axum::{
    extract::{Path, State},
    Json,
};
use relay_service::{PresenceSnapshot, StatusService};

use crate::response::ApiResult;
use crate::state::AppState;

/// Cached presence of the owner
///
/// GET /api/status
pub async fn get_self_status(State(state): State<AppState>) -> Json<PresenceSnapshot> {
    let snapshot = StatusService::new(state.service_context()).get_self();
    Json(PresenceSnapshot::clone(&snapshot))
}

/// Live presence of any member of the configured guild
///
/// GET /api/status/{user_id}
pub async fn get_user_status(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> ApiResult<Json<PresenceSnapshot>> {
    let service = StatusService::new(state.service_context());
    let snapshot = service.get_user(&user_id).await?;
    Ok(Json(snapshot))
}
