//! Cache handlers

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::Json;

use crate::{AppState, SuccessResponse};

/// DELETE /api/cache/users/:user_id - Drop a user's cached insights after their data changed
pub async fn invalidate_user_cache(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<i64>,
) -> Json<SuccessResponse> {
    state.engine.invalidate_user(user_id);
    Json(SuccessResponse { success: true })
}
