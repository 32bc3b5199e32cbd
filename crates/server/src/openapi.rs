use utoipa::OpenApi;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(ToSchema)]
pub struct HealthResponse { pub status: String }

#[derive(ToSchema)]
pub struct RegisterRequest { pub email: String, pub password: String, pub full_name: String }

#[derive(ToSchema)]
pub struct LoginRequest { pub email: String, pub password: String }

#[derive(ToSchema)]
pub struct ReviewRequest {
    pub game_id: Uuid,
    /// 1 to 5
    pub rating: i32,
    pub title: String,
    pub content: String,
    pub is_verified_purchase: Option<bool>,
}

#[derive(ToSchema)]
pub struct ReviewChangesRequest {
    pub rating: Option<i32>,
    pub title: Option<String>,
    pub content: Option<String>,
}

#[derive(ToSchema)]
pub struct WishlistRequest { pub game_id: Uuid }

#[derive(ToSchema)]
pub struct ProfileRequest {
    pub full_name: Option<String>,
    pub avatar_url: Option<String>,
    pub bio: Option<String>,
    /// `user` or `admin`; only honored on the admin endpoint
    pub role: Option<String>,
}

#[derive(ToSchema)]
pub struct CategoryRequest { pub name: String, pub description: Option<String> }

/// Create body; every field is optional on update.
#[derive(ToSchema)]
pub struct GameRequest {
    pub title: String,
    pub description: String,
    pub short_description: Option<String>,
    pub publisher: Option<String>,
    pub designer: Option<String>,
    pub year_published: Option<i32>,
    pub min_players: i32,
    pub max_players: i32,
    pub min_age: Option<i32>,
    pub playing_time: i32,
    pub complexity_rating: Option<f64>,
    pub price: Option<f64>,
    pub image_url: Option<String>,
    pub thumbnail_url: Option<String>,
    pub category_id: Option<Uuid>,
    pub is_active: Option<bool>,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        crate::routes::auth::register,
        crate::routes::auth::login,
        crate::routes::auth::logout,
        crate::routes::auth::me,
        crate::routes::games::list_games,
        crate::routes::games::featured,
        crate::routes::games::search,
        crate::routes::games::suggestions,
        crate::routes::games::filter_options,
        crate::routes::games::get_game,
        crate::routes::games::similar,
        crate::routes::games::game_reviews,
        crate::routes::categories::list,
        crate::routes::categories::featured,
        crate::routes::categories::get,
        crate::routes::reviews::list,
        crate::routes::reviews::recent,
        crate::routes::reviews::get,
        crate::routes::reviews::create,
        crate::routes::reviews::update,
        crate::routes::reviews::delete,
        crate::routes::wishlist::list,
        crate::routes::wishlist::add,
        crate::routes::wishlist::check,
        crate::routes::wishlist::remove,
        crate::routes::profile::get,
        crate::routes::profile::update,
        crate::routes::profile::my_reviews,
        crate::routes::admin::stats,
        crate::routes::admin::list_games,
        crate::routes::admin::create_game,
        crate::routes::admin::get_game,
        crate::routes::admin::update_game,
        crate::routes::admin::delete_game,
        crate::routes::admin::list_reviews,
        crate::routes::admin::approve_review,
        crate::routes::admin::reject_review,
        crate::routes::admin::delete_review,
        crate::routes::admin::list_users,
        crate::routes::admin::get_user,
        crate::routes::admin::update_user,
        crate::routes::admin::delete_user,
        crate::routes::admin::create_category,
    ),
    components(
        schemas(
            HealthResponse,
            RegisterRequest,
            LoginRequest,
            ReviewRequest,
            ReviewChangesRequest,
            WishlistRequest,
            ProfileRequest,
            CategoryRequest,
            GameRequest,
        )
    ),
    tags(
        (name = "health"),
        (name = "auth"),
        (name = "games"),
        (name = "categories"),
        (name = "reviews"),
        (name = "wishlist"),
        (name = "profile"),
        (name = "admin")
    )
)]
pub struct ApiDoc;
