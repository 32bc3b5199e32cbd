use axum::{
    middleware,
    routing::{get, post},
    Json, Router,
};
use tower_http::{
    cors::CorsLayer,
    services::{ServeDir, ServeFile},
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use common::types::Health;

use crate::openapi::ApiDoc;
use crate::state::ServerState;

pub mod admin;
pub mod auth;
pub mod categories;
pub mod games;
pub mod profile;
pub mod reviews;
pub mod wishlist;

#[utoipa::path(get, path = "/health", tag = "health", responses((status = 200, description = "OK", body = crate::openapi::HealthResponse)))]
pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

/// Build the full application router, including public, authenticated, and admin routes
pub fn build_router(state: ServerState, cors: CorsLayer) -> Router {
    let static_dir = state.config.server.static_dir.clone();
    let assets = ServeDir::new(&static_dir).fallback(ServeFile::new(format!("{static_dir}/index.html")));

    // Public routes
    let public = Router::new()
        .route("/health", get(health))
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route("/auth/logout", post(auth::logout))
        .route("/api/games", get(games::list_games))
        .route("/api/games/featured", get(games::featured))
        .route("/api/games/search", get(games::search))
        .route("/api/games/suggestions", get(games::suggestions))
        .route("/api/games/filters", get(games::filter_options))
        .route("/api/games/:id", get(games::get_game))
        .route("/api/games/:id/similar", get(games::similar))
        .route("/api/games/:id/reviews", get(games::game_reviews))
        .route("/api/categories", get(categories::list))
        .route("/api/categories/featured", get(categories::featured))
        .route("/api/categories/:id", get(categories::get))
        .route("/api/reviews", get(reviews::list))
        .route("/api/reviews/recent", get(reviews::recent))
        .route("/api/reviews/:id", get(reviews::get));

    // Authenticated routes
    let user = Router::new()
        .route("/auth/me", get(auth::me))
        .route("/api/profile", get(profile::get).put(profile::update))
        .route("/api/profile/reviews", get(profile::my_reviews))
        .route("/api/reviews", post(reviews::create))
        .route("/api/reviews/:id", axum::routing::put(reviews::update).delete(reviews::delete))
        .route("/api/wishlist", get(wishlist::list).post(wishlist::add))
        .route("/api/wishlist/:game_id", get(wishlist::check).delete(wishlist::remove))
        .route_layer(middleware::from_fn_with_state(state.clone(), auth::require_auth));

    // Admin routes: authentication runs first, then the role check
    let admin_routes = Router::new()
        .route("/admin/stats", get(admin::stats))
        .route("/admin/games", get(admin::list_games).post(admin::create_game))
        .route("/admin/games/:id", get(admin::get_game).put(admin::update_game).delete(admin::delete_game))
        .route("/admin/reviews", get(admin::list_reviews))
        .route("/admin/reviews/:id", axum::routing::delete(admin::delete_review))
        .route("/admin/reviews/:id/approve", post(admin::approve_review))
        .route("/admin/reviews/:id/reject", post(admin::reject_review))
        .route("/admin/users", get(admin::list_users))
        .route("/admin/users/:id", get(admin::get_user).put(admin::update_user).delete(admin::delete_user))
        .route("/admin/categories", post(admin::create_category))
        .route_layer(middleware::from_fn(auth::require_admin))
        .route_layer(middleware::from_fn_with_state(state.clone(), auth::require_auth));

    // Compose
    public
        .merge(user)
        .merge(admin_routes)
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .fallback_service(assets)
        .with_state(state)
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                // one span per request, at INFO
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO).include_headers(false))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                // status code and latency
                .on_response(DefaultOnResponse::new().level(Level::INFO).include_headers(false))
                // 5xx and other failures at ERROR
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}
