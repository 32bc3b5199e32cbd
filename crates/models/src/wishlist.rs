use sea_orm::{entity::prelude::*, DatabaseConnection, FromQueryResult, JoinType, QueryFilter, QuerySelect, Set};
use uuid::Uuid;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::errors::ModelError;
use crate::{category, game, profile};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "wishlist")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub user_id: Uuid,
    pub game_id: Uuid,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation { Game, Profile }

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Game => Entity::belongs_to(game::Entity)
                .from(Column::GameId)
                .to(game::Column::Id)
                .into(),
            Relation::Profile => Entity::belongs_to(profile::Entity)
                .from(Column::UserId)
                .to(profile::Column::Id)
                .into(),
        }
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// A wishlist item with the game fields the wishlist page shows.
#[derive(Clone, Debug, PartialEq, FromQueryResult, Serialize, Deserialize)]
pub struct WishlistEntry {
    pub id: Uuid,
    pub user_id: Uuid,
    pub game_id: Uuid,
    pub created_at: DateTimeWithTimeZone,
    pub game_title: Option<String>,
    pub image_url: Option<String>,
    pub category_name: Option<String>,
}

/// `wishlist` joined with `game` and the game's `category`.
pub fn with_game() -> Select<Entity> {
    Entity::find()
        .join(JoinType::LeftJoin, Relation::Game.def())
        .join(JoinType::LeftJoin, game::Relation::Category.def())
        .column_as(game::Column::Title, "game_title")
        .column_as(game::Column::ImageUrl, "image_url")
        .column_as(category::Column::Name, "category_name")
}

pub async fn add(db: &DatabaseConnection, user_id: Uuid, game_id: Uuid) -> Result<Model, ModelError> {
    let am = ActiveModel {
        id: Set(Uuid::new_v4()),
        user_id: Set(user_id),
        game_id: Set(game_id),
        created_at: Set(Utc::now().into()),
    };
    am.insert(db).await.map_err(|e| ModelError::from_db(e, "game is already in your wishlist"))
}

pub async fn remove(db: &DatabaseConnection, user_id: Uuid, game_id: Uuid) -> Result<bool, ModelError> {
    let res = Entity::delete_many()
        .filter(Column::UserId.eq(user_id))
        .filter(Column::GameId.eq(game_id))
        .exec(db)
        .await?;
    Ok(res.rows_affected > 0)
}
