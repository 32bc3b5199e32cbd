use axum::{extract::State, Extension, Json};
use axum_extra::extract::WithRejection;

use models::profile::{self, ProfileChanges};
use models::review::ReviewDetail;
use service::auth::domain::Claims;
use service::{profile_service, review_service};

use crate::errors::JsonApiError;
use crate::extract::ApiJson;
use crate::routes::auth::caller_id;
use crate::state::ServerState;

#[utoipa::path(get, path = "/api/profile", tag = "profile", responses((status = 200, description = "Own profile"), (status = 401, description = "Unauthorized"), (status = 404, description = "Not Found")))]
pub async fn get(
    State(state): State<ServerState>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<profile::Model>, JsonApiError> {
    profile_service::get_profile(&state.db, caller_id(&claims)?)
        .await?
        .map(Json)
        .ok_or_else(|| JsonApiError::not_found("profile not found"))
}

/// Self-service edit; the role can only be changed through the admin panel.
#[utoipa::path(put, path = "/api/profile", tag = "profile", request_body = crate::openapi::ProfileRequest, responses((status = 200, description = "Updated"), (status = 400, description = "Bad Request")))]
pub async fn update(
    State(state): State<ServerState>,
    Extension(claims): Extension<Claims>,
    WithRejection(Json(changes), _): ApiJson<ProfileChanges>,
) -> Result<Json<profile::Model>, JsonApiError> {
    let changes = ProfileChanges { role: None, ..changes };
    Ok(Json(profile_service::update_profile(&state.db, caller_id(&claims)?, changes).await?))
}

#[utoipa::path(get, path = "/api/profile/reviews", tag = "profile", responses((status = 200, description = "Reviews written by the caller")))]
pub async fn my_reviews(
    State(state): State<ServerState>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<Vec<ReviewDetail>>, JsonApiError> {
    Ok(Json(review_service::list_for_user(&state.db, caller_id(&claims)?).await?))
}
