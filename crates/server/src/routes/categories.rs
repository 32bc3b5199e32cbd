use axum::{
    extract::{Path, Query, State},
    Json,
};
use axum_extra::extract::WithRejection;
use serde::Deserialize;
use uuid::Uuid;

use models::category;
use service::category_service::{self, FeaturedCategory};

use crate::errors::JsonApiError;
use crate::extract::{ApiPath, ApiQuery};
use crate::state::ServerState;

const DEFAULT_FEATURED: usize = 6;

#[derive(Debug, Default, Deserialize)]
pub struct FeaturedQuery {
    pub limit: Option<usize>,
}

#[utoipa::path(get, path = "/api/categories", tag = "categories", responses((status = 200, description = "Categories by name")))]
pub async fn list(State(state): State<ServerState>) -> Result<Json<Vec<category::Model>>, JsonApiError> {
    Ok(Json(category_service::list_categories(&state.db).await?))
}

#[utoipa::path(get, path = "/api/categories/featured", tag = "categories", params(("limit" = Option<usize>, Query, description = "Defaults to 6")), responses((status = 200, description = "Categories with the most active games")))]
pub async fn featured(
    State(state): State<ServerState>,
    WithRejection(Query(q), _): ApiQuery<FeaturedQuery>,
) -> Result<Json<Vec<FeaturedCategory>>, JsonApiError> {
    let limit = q.limit.unwrap_or(DEFAULT_FEATURED);
    Ok(Json(category_service::featured_categories(&state.db, limit).await?))
}

#[utoipa::path(get, path = "/api/categories/{id}", tag = "categories", params(("id" = Uuid, Path, description = "Category id")), responses((status = 200, description = "Category"), (status = 404, description = "Not Found")))]
pub async fn get(
    State(state): State<ServerState>,
    WithRejection(Path(id), _): ApiPath<Uuid>,
) -> Result<Json<category::Model>, JsonApiError> {
    category_service::get_category(&state.db, id)
        .await?
        .map(Json)
        .ok_or_else(|| JsonApiError::not_found("category not found"))
}
