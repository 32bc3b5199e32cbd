use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use axum_extra::extract::WithRejection;
use chrono::Utc;
use serde::Deserialize;
use uuid::Uuid;

use common::pagination::Page;
use models::review::{self, ReviewDetail};
use models::{category, game, profile};
use service::auth::domain::Claims;
use service::catalog::domain::GameSummary;
use service::catalog::GameFilters;
use service::profile_service::{self, ProfileSummary, UserFilters};
use service::review_service::{self, ReviewFilters};
use service::stats_service::{self, AdminStats};
use service::category_service;

use crate::errors::JsonApiError;
use crate::extract::{ApiJson, ApiPath, ApiQuery};
use crate::routes::auth::caller_id;
use crate::routes::reviews::actor;
use crate::state::ServerState;

#[derive(Debug, Deserialize)]
pub struct NewCategory {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

#[utoipa::path(get, path = "/admin/stats", tag = "admin", responses((status = 200, description = "Dashboard figures"), (status = 403, description = "Forbidden")))]
pub async fn stats(State(state): State<ServerState>) -> Result<Json<AdminStats>, JsonApiError> {
    Ok(Json(stats_service::admin_stats(&state.db, Utc::now()).await?))
}

// ===== games =====

#[utoipa::path(get, path = "/admin/games", tag = "admin", responses((status = 200, description = "All games, inactive included")))]
pub async fn list_games(
    State(state): State<ServerState>,
    WithRejection(Query(filters), _): ApiQuery<GameFilters>,
) -> Result<Json<Page<GameSummary>>, JsonApiError> {
    Ok(Json(state.catalog.admin_games(&filters).await?))
}

#[utoipa::path(post, path = "/admin/games", tag = "admin", request_body = crate::openapi::GameRequest, responses((status = 201, description = "Created"), (status = 400, description = "Bad Request")))]
pub async fn create_game(
    State(state): State<ServerState>,
    WithRejection(Json(input), _): ApiJson<game::GameInput>,
) -> Result<(StatusCode, Json<game::Model>), JsonApiError> {
    let created = state.catalog.create_game(input).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

#[utoipa::path(get, path = "/admin/games/{id}", tag = "admin", params(("id" = Uuid, Path, description = "Game id")), responses((status = 200, description = "Game"), (status = 404, description = "Not Found")))]
pub async fn get_game(
    State(state): State<ServerState>,
    WithRejection(Path(id), _): ApiPath<Uuid>,
) -> Result<Json<GameSummary>, JsonApiError> {
    state
        .catalog
        .get_game_for_admin(id)
        .await?
        .map(Json)
        .ok_or_else(|| JsonApiError::not_found("game not found"))
}

#[utoipa::path(put, path = "/admin/games/{id}", tag = "admin", params(("id" = Uuid, Path, description = "Game id")), request_body = crate::openapi::GameRequest, responses((status = 200, description = "Updated"), (status = 400, description = "Bad Request"), (status = 404, description = "Not Found")))]
pub async fn update_game(
    State(state): State<ServerState>,
    WithRejection(Path(id), _): ApiPath<Uuid>,
    WithRejection(Json(changes), _): ApiJson<game::GameChanges>,
) -> Result<Json<game::Model>, JsonApiError> {
    Ok(Json(state.catalog.update_game(id, changes).await?))
}

#[utoipa::path(delete, path = "/admin/games/{id}", tag = "admin", params(("id" = Uuid, Path, description = "Game id")), responses((status = 204, description = "Deleted"), (status = 404, description = "Not Found")))]
pub async fn delete_game(
    State(state): State<ServerState>,
    WithRejection(Path(id), _): ApiPath<Uuid>,
) -> Result<StatusCode, JsonApiError> {
    state.catalog.delete_game(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ===== reviews =====

#[utoipa::path(get, path = "/admin/reviews", tag = "admin", responses((status = 200, description = "Paged reviews of any status")))]
pub async fn list_reviews(
    State(state): State<ServerState>,
    WithRejection(Query(filters), _): ApiQuery<ReviewFilters>,
) -> Result<Json<Page<ReviewDetail>>, JsonApiError> {
    let page_size = state.config.reviews.page_size;
    Ok(Json(review_service::list_reviews(&state.db, &filters, page_size).await?))
}

#[utoipa::path(post, path = "/admin/reviews/{id}/approve", tag = "admin", params(("id" = Uuid, Path, description = "Review id")), responses((status = 200, description = "Approved"), (status = 404, description = "Not Found")))]
pub async fn approve_review(
    State(state): State<ServerState>,
    WithRejection(Path(id), _): ApiPath<Uuid>,
) -> Result<Json<review::Model>, JsonApiError> {
    Ok(Json(review_service::approve_review(&state.db, id).await?))
}

#[utoipa::path(post, path = "/admin/reviews/{id}/reject", tag = "admin", params(("id" = Uuid, Path, description = "Review id")), responses((status = 200, description = "Rejected"), (status = 404, description = "Not Found")))]
pub async fn reject_review(
    State(state): State<ServerState>,
    WithRejection(Path(id), _): ApiPath<Uuid>,
) -> Result<Json<review::Model>, JsonApiError> {
    Ok(Json(review_service::reject_review(&state.db, id).await?))
}

#[utoipa::path(delete, path = "/admin/reviews/{id}", tag = "admin", params(("id" = Uuid, Path, description = "Review id")), responses((status = 204, description = "Deleted"), (status = 404, description = "Not Found")))]
pub async fn delete_review(
    State(state): State<ServerState>,
    Extension(claims): Extension<Claims>,
    WithRejection(Path(id), _): ApiPath<Uuid>,
) -> Result<StatusCode, JsonApiError> {
    review_service::delete_review(&state.db, &actor(&claims)?, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ===== users =====

#[utoipa::path(get, path = "/admin/users", tag = "admin",
    params(
        ("search" = Option<String>, Query, description = "Name or email contains"),
        ("page" = Option<String>, Query, description = "1-based page"),
    ),
    responses((status = 200, description = "Paged users with review counts")))]
pub async fn list_users(
    State(state): State<ServerState>,
    WithRejection(Query(filters), _): ApiQuery<UserFilters>,
) -> Result<Json<Page<ProfileSummary>>, JsonApiError> {
    let page_size = state.config.users.page_size;
    Ok(Json(profile_service::list_profiles(&state.db, &filters, page_size).await?))
}

#[utoipa::path(get, path = "/admin/users/{id}", tag = "admin", params(("id" = Uuid, Path, description = "User id")), responses((status = 200, description = "User"), (status = 404, description = "Not Found")))]
pub async fn get_user(
    State(state): State<ServerState>,
    WithRejection(Path(id), _): ApiPath<Uuid>,
) -> Result<Json<profile::Model>, JsonApiError> {
    profile_service::get_profile(&state.db, id)
        .await?
        .map(Json)
        .ok_or_else(|| JsonApiError::not_found("user not found"))
}

#[utoipa::path(put, path = "/admin/users/{id}", tag = "admin", params(("id" = Uuid, Path, description = "User id")), request_body = crate::openapi::ProfileRequest, responses((status = 200, description = "Updated"), (status = 404, description = "Not Found")))]
pub async fn update_user(
    State(state): State<ServerState>,
    WithRejection(Path(id), _): ApiPath<Uuid>,
    WithRejection(Json(changes), _): ApiJson<profile::ProfileChanges>,
) -> Result<Json<profile::Model>, JsonApiError> {
    Ok(Json(profile_service::update_profile(&state.db, id, changes).await?))
}

#[utoipa::path(delete, path = "/admin/users/{id}", tag = "admin", params(("id" = Uuid, Path, description = "User id")), responses((status = 204, description = "Deleted"), (status = 403, description = "Own account"), (status = 404, description = "Not Found")))]
pub async fn delete_user(
    State(state): State<ServerState>,
    Extension(claims): Extension<Claims>,
    WithRejection(Path(id), _): ApiPath<Uuid>,
) -> Result<StatusCode, JsonApiError> {
    if caller_id(&claims)? == id {
        return Err(JsonApiError::forbidden("admins cannot delete their own account"));
    }
    profile_service::delete_profile(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ===== categories =====

#[utoipa::path(post, path = "/admin/categories", tag = "admin", request_body = crate::openapi::CategoryRequest, responses((status = 201, description = "Created"), (status = 409, description = "Duplicate name")))]
pub async fn create_category(
    State(state): State<ServerState>,
    WithRejection(Json(body), _): ApiJson<NewCategory>,
) -> Result<(StatusCode, Json<category::Model>), JsonApiError> {
    let created = category_service::create_category(&state.db, &body.name, body.description).await?;
    Ok((StatusCode::CREATED, Json(created)))
}
