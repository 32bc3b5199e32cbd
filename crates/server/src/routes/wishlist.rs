use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use axum_extra::extract::WithRejection;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use models::wishlist::{self, WishlistEntry};
use service::auth::domain::Claims;
use service::wishlist_service;

use crate::errors::JsonApiError;
use crate::extract::{ApiJson, ApiPath};
use crate::routes::auth::caller_id;
use crate::state::ServerState;

#[derive(Debug, Deserialize)]
pub struct AddToWishlist {
    pub game_id: Uuid,
}

#[derive(Debug, Serialize)]
pub struct WishlistStatus {
    pub in_wishlist: bool,
}

#[utoipa::path(get, path = "/api/wishlist", tag = "wishlist", responses((status = 200, description = "Wishlist, newest first"), (status = 401, description = "Unauthorized")))]
pub async fn list(
    State(state): State<ServerState>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<Vec<WishlistEntry>>, JsonApiError> {
    Ok(Json(wishlist_service::list(&state.db, caller_id(&claims)?).await?))
}

#[utoipa::path(post, path = "/api/wishlist", tag = "wishlist", request_body = crate::openapi::WishlistRequest, responses((status = 201, description = "Added"), (status = 404, description = "Game not found"), (status = 409, description = "Already in wishlist")))]
pub async fn add(
    State(state): State<ServerState>,
    Extension(claims): Extension<Claims>,
    WithRejection(Json(body), _): ApiJson<AddToWishlist>,
) -> Result<(StatusCode, Json<wishlist::Model>), JsonApiError> {
    let entry = wishlist_service::add(&state.db, caller_id(&claims)?, body.game_id).await?;
    Ok((StatusCode::CREATED, Json(entry)))
}

#[utoipa::path(get, path = "/api/wishlist/{game_id}", tag = "wishlist", params(("game_id" = Uuid, Path, description = "Game id")), responses((status = 200, description = "Membership flag")))]
pub async fn check(
    State(state): State<ServerState>,
    Extension(claims): Extension<Claims>,
    WithRejection(Path(game_id), _): ApiPath<Uuid>,
) -> Result<Json<WishlistStatus>, JsonApiError> {
    let in_wishlist = wishlist_service::contains(&state.db, caller_id(&claims)?, game_id).await?;
    Ok(Json(WishlistStatus { in_wishlist }))
}

#[utoipa::path(delete, path = "/api/wishlist/{game_id}", tag = "wishlist", params(("game_id" = Uuid, Path, description = "Game id")), responses((status = 204, description = "Removed"), (status = 404, description = "Not in wishlist")))]
pub async fn remove(
    State(state): State<ServerState>,
    Extension(claims): Extension<Claims>,
    WithRejection(Path(game_id), _): ApiPath<Uuid>,
) -> Result<StatusCode, JsonApiError> {
    wishlist_service::remove(&state.db, caller_id(&claims)?, game_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
