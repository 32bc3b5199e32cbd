use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use axum_extra::extract::WithRejection;
use uuid::Uuid;

use common::pagination::Page;
use models::review::{self, ReviewDetail};
use service::auth::domain::Claims;
use service::review_service::{self, Actor, ReviewFilters};

use crate::errors::JsonApiError;
use crate::extract::{ApiJson, ApiPath, ApiQuery};
use crate::routes::auth::caller_id;
use crate::state::ServerState;

pub(crate) fn actor(claims: &Claims) -> Result<Actor, JsonApiError> {
    Ok(Actor { user_id: caller_id(claims)?, is_admin: claims.is_admin() })
}

#[utoipa::path(get, path = "/api/reviews", tag = "reviews",
    params(
        ("game_id" = Option<Uuid>, Query, description = "Restrict to one game"),
        ("page" = Option<String>, Query, description = "1-based page"),
    ),
    responses((status = 200, description = "Paged approved reviews")))]
pub async fn list(
    State(state): State<ServerState>,
    WithRejection(Query(filters), _): ApiQuery<ReviewFilters>,
) -> Result<Json<Page<ReviewDetail>>, JsonApiError> {
    let page_size = state.config.reviews.page_size;
    Ok(Json(review_service::list_public_reviews(&state.db, &filters, page_size).await?))
}

#[utoipa::path(get, path = "/api/reviews/recent", tag = "reviews", responses((status = 200, description = "Latest approved reviews")))]
pub async fn recent(State(state): State<ServerState>) -> Result<Json<Vec<ReviewDetail>>, JsonApiError> {
    Ok(Json(review_service::recent(&state.db, state.config.reviews.recent_limit).await?))
}

#[utoipa::path(get, path = "/api/reviews/{id}", tag = "reviews", params(("id" = Uuid, Path, description = "Review id")), responses((status = 200, description = "Review"), (status = 404, description = "Not Found")))]
pub async fn get(
    State(state): State<ServerState>,
    WithRejection(Path(id), _): ApiPath<Uuid>,
) -> Result<Json<ReviewDetail>, JsonApiError> {
    review_service::get_public_review(&state.db, id)
        .await?
        .map(Json)
        .ok_or_else(|| JsonApiError::not_found("review not found"))
}

#[utoipa::path(post, path = "/api/reviews", tag = "reviews", request_body = crate::openapi::ReviewRequest, responses((status = 201, description = "Created"), (status = 400, description = "Bad Request"), (status = 401, description = "Unauthorized"), (status = 404, description = "Game not found")))]
pub async fn create(
    State(state): State<ServerState>,
    Extension(claims): Extension<Claims>,
    WithRejection(Json(input), _): ApiJson<review::NewReview>,
) -> Result<(StatusCode, Json<review::Model>), JsonApiError> {
    let user_id = caller_id(&claims)?;
    let created =
        review_service::create_review(&state.db, user_id, input, state.config.reviews.auto_approve).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

#[utoipa::path(put, path = "/api/reviews/{id}", tag = "reviews", params(("id" = Uuid, Path, description = "Review id")), request_body = crate::openapi::ReviewChangesRequest, responses((status = 200, description = "Updated"), (status = 403, description = "Not the author"), (status = 404, description = "Not Found")))]
pub async fn update(
    State(state): State<ServerState>,
    Extension(claims): Extension<Claims>,
    WithRejection(Path(id), _): ApiPath<Uuid>,
    WithRejection(Json(changes), _): ApiJson<review::ReviewChanges>,
) -> Result<Json<review::Model>, JsonApiError> {
    let actor = actor(&claims)?;
    Ok(Json(review_service::update_review(&state.db, &actor, id, changes).await?))
}

#[utoipa::path(delete, path = "/api/reviews/{id}", tag = "reviews", params(("id" = Uuid, Path, description = "Review id")), responses((status = 204, description = "Deleted"), (status = 403, description = "Not the author"), (status = 404, description = "Not Found")))]
pub async fn delete(
    State(state): State<ServerState>,
    Extension(claims): Extension<Claims>,
    WithRejection(Path(id), _): ApiPath<Uuid>,
) -> Result<StatusCode, JsonApiError> {
    let actor = actor(&claims)?;
    review_service::delete_review(&state.db, &actor, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
