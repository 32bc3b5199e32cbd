use uuid::Uuid;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder};
use tracing::{info, instrument};

use models::{game, wishlist};
use models::wishlist::WishlistEntry;

use crate::errors::ServiceError;

#[instrument(skip(db), fields(user_id = %user_id, game_id = %game_id))]
pub async fn add(db: &DatabaseConnection, user_id: Uuid, game_id: Uuid) -> Result<wishlist::Model, ServiceError> {
    if game::Entity::find_by_id(game_id).one(db).await?.is_none() {
        return Err(ServiceError::not_found("game"));
    }
    let item = wishlist::add(db, user_id, game_id).await?;
    info!("wishlist_added");
    Ok(item)
}

#[instrument(skip(db), fields(user_id = %user_id, game_id = %game_id))]
pub async fn remove(db: &DatabaseConnection, user_id: Uuid, game_id: Uuid) -> Result<(), ServiceError> {
    if !wishlist::remove(db, user_id, game_id).await? {
        return Err(ServiceError::NotFound("game is not in your wishlist".into()));
    }
    info!("wishlist_removed");
    Ok(())
}

/// A user's wishlist, newest first.
pub async fn list(db: &DatabaseConnection, user_id: Uuid) -> Result<Vec<WishlistEntry>, ServiceError> {
    let rows = wishlist::with_game()
        .filter(wishlist::Column::UserId.eq(user_id))
        .order_by_desc(wishlist::Column::CreatedAt)
        .into_model::<WishlistEntry>()
        .all(db)
        .await?;
    Ok(rows)
}

pub async fn contains(db: &DatabaseConnection, user_id: Uuid, game_id: Uuid) -> Result<bool, ServiceError> {
    let n = wishlist::Entity::find()
        .filter(wishlist::Column::UserId.eq(user_id))
        .filter(wishlist::Column::GameId.eq(game_id))
        .count(db)
        .await?;
    Ok(n > 0)
}
