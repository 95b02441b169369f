//! Profile field API handler.

use std::time::Instant;

use axum::extract::State;
use axum::Json;

use benefactor_types::field::ProfileFields;

use crate::http::error::AppError;
use crate::http::extractors::session::CurrentUser;
use crate::http::response::ApiResponse;
use crate::state::AppState;

/// GET /api/v1/profile/fields - Ordered field groups for the current visitor.
pub async fn get_profile_fields(
    State(state): State<AppState>,
    user: CurrentUser,
) -> Result<Json<ApiResponse<ProfileFields>>, AppError> {
    let start = Instant::now();
    let request_id = uuid::Uuid::now_v7().to_string();

    let fields = state.profile_service.fields(&user.context).await?;

    let elapsed = start.elapsed().as_millis() as u64;
    let resp = ApiResponse::success(fields, request_id, elapsed)
        .with_link("self", "/api/v1/profile/fields")
        .with_link("form", "/profile");

    Ok(Json(resp))
}
