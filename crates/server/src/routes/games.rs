use axum::{
    extract::{Path, Query, State},
    Json,
};
use axum_extra::extract::WithRejection;
use serde::Deserialize;
use uuid::Uuid;

use common::pagination::Page;
use models::review::ReviewDetail;
use service::catalog::domain::{FilterOptions, GameSummary};
use service::catalog::GameFilters;
use service::review_service;

use crate::errors::JsonApiError;
use crate::extract::{ApiPath, ApiQuery};
use crate::state::ServerState;

#[derive(Debug, Default, Deserialize)]
pub struct SearchQuery {
    pub q: Option<String>,
}

#[utoipa::path(get, path = "/api/games", tag = "games",
    params(
        ("search" = Option<String>, Query, description = "Title or description contains"),
        ("category" = Option<String>, Query, description = "Category id or all-categories"),
        ("players" = Option<String>, Query, description = "Player count, or N+ for at least N"),
        ("playtime" = Option<String>, Query, description = "Maximum playing time in minutes"),
        ("page" = Option<String>, Query, description = "1-based page"),
        ("sort" = Option<String>, Query, description = "newest, title, rating, price_asc, price_desc, playtime"),
    ),
    responses((status = 200, description = "Paged games"), (status = 400, description = "Bad filter")))]
pub async fn list_games(
    State(state): State<ServerState>,
    WithRejection(Query(filters), _): ApiQuery<GameFilters>,
) -> Result<Json<Page<GameSummary>>, JsonApiError> {
    Ok(Json(state.catalog.list_games(&filters).await?))
}

#[utoipa::path(get, path = "/api/games/featured", tag = "games", responses((status = 200, description = "Newest games")))]
pub async fn featured(State(state): State<ServerState>) -> Result<Json<Vec<GameSummary>>, JsonApiError> {
    Ok(Json(state.catalog.featured().await?))
}

#[utoipa::path(get, path = "/api/games/search", tag = "games", params(("q" = Option<String>, Query, description = "Search text")), responses((status = 200, description = "Matching games")))]
pub async fn search(
    State(state): State<ServerState>,
    WithRejection(Query(q), _): ApiQuery<SearchQuery>,
) -> Result<Json<Vec<GameSummary>>, JsonApiError> {
    Ok(Json(state.catalog.search(q.q.as_deref().unwrap_or_default()).await?))
}

#[utoipa::path(get, path = "/api/games/suggestions", tag = "games", params(("q" = Option<String>, Query, description = "At least two characters")), responses((status = 200, description = "Autocomplete suggestions")))]
pub async fn suggestions(
    State(state): State<ServerState>,
    WithRejection(Query(q), _): ApiQuery<SearchQuery>,
) -> Result<Json<Vec<GameSummary>>, JsonApiError> {
    Ok(Json(state.catalog.suggestions(q.q.as_deref().unwrap_or_default()).await?))
}

#[utoipa::path(get, path = "/api/games/filters", tag = "games", responses((status = 200, description = "Filter choices")))]
pub async fn filter_options(State(state): State<ServerState>) -> Result<Json<FilterOptions>, JsonApiError> {
    Ok(Json(state.catalog.filter_options().await?))
}

#[utoipa::path(get, path = "/api/games/{id}", tag = "games", params(("id" = Uuid, Path, description = "Game id")), responses((status = 200, description = "Game"), (status = 404, description = "Not Found")))]
pub async fn get_game(
    State(state): State<ServerState>,
    WithRejection(Path(id), _): ApiPath<Uuid>,
) -> Result<Json<GameSummary>, JsonApiError> {
    state
        .catalog
        .get_game(id)
        .await?
        .map(Json)
        .ok_or_else(|| JsonApiError::not_found("game not found"))
}

#[utoipa::path(get, path = "/api/games/{id}/similar", tag = "games", params(("id" = Uuid, Path, description = "Game id")), responses((status = 200, description = "Games in the same category"), (status = 404, description = "Not Found")))]
pub async fn similar(
    State(state): State<ServerState>,
    WithRejection(Path(id), _): ApiPath<Uuid>,
) -> Result<Json<Vec<GameSummary>>, JsonApiError> {
    Ok(Json(state.catalog.similar(id).await?))
}

#[utoipa::path(get, path = "/api/games/{id}/reviews", tag = "games", params(("id" = Uuid, Path, description = "Game id")), responses((status = 200, description = "Approved reviews")))]
pub async fn game_reviews(
    State(state): State<ServerState>,
    WithRejection(Path(id), _): ApiPath<Uuid>,
) -> Result<Json<Vec<ReviewDetail>>, JsonApiError> {
    Ok(Json(review_service::list_for_game(&state.db, id).await?))
}
