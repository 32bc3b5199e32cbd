use sea_orm::{entity::prelude::*, DatabaseConnection, FromQueryResult, JoinType, QuerySelect, Set};
use uuid::Uuid;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::errors::{self, ModelError};
use crate::{game, profile};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "review")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub game_id: Uuid,
    pub user_id: Uuid,
    pub rating: i32,
    pub title: String,
    pub content: String,
    pub is_verified_purchase: bool,
    pub status: String,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
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

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReviewStatus {
    Pending,
    Approved,
    Rejected,
}

impl ReviewStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReviewStatus::Pending => "pending",
            ReviewStatus::Approved => "approved",
            ReviewStatus::Rejected => "rejected",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pending" => Some(ReviewStatus::Pending),
            "approved" => Some(ReviewStatus::Approved),
            "rejected" => Some(ReviewStatus::Rejected),
            _ => None,
        }
    }
}

/// A review joined with its author and game.
#[derive(Clone, Debug, PartialEq, FromQueryResult, Serialize, Deserialize)]
pub struct ReviewDetail {
    pub id: Uuid,
    pub game_id: Uuid,
    pub user_id: Uuid,
    pub rating: i32,
    pub title: String,
    pub content: String,
    pub is_verified_purchase: bool,
    pub status: String,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
    pub user_name: Option<String>,
    pub user_email: Option<String>,
    pub game_title: Option<String>,
}

/// `review` joined with `profile` and `game` for display.
pub fn with_details() -> Select<Entity> {
    Entity::find()
        .join(JoinType::LeftJoin, Relation::Profile.def())
        .join(JoinType::LeftJoin, Relation::Game.def())
        .column_as(profile::Column::FullName, "user_name")
        .column_as(profile::Column::Email, "user_email")
        .column_as(game::Column::Title, "game_title")
}

pub fn validate_rating(rating: i32) -> Result<(), ModelError> {
    if !(1..=5).contains(&rating) {
        return Err(ModelError::Validation("rating must be between 1 and 5".into()));
    }
    Ok(())
}

pub fn validate_text(title: &str, content: &str) -> Result<(), ModelError> {
    errors::required_text("review title", title, 150)?;
    errors::required_text("review content", content, 5000)
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NewReview {
    pub game_id: Uuid,
    pub rating: i32,
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub is_verified_purchase: bool,
}

pub async fn create(db: &DatabaseConnection, user_id: Uuid, new: NewReview, status: ReviewStatus) -> Result<Model, ModelError> {
    validate_rating(new.rating)?;
    validate_text(&new.title, &new.content)?;
    let now = Utc::now().into();
    let am = ActiveModel {
        id: Set(Uuid::new_v4()),
        game_id: Set(new.game_id),
        user_id: Set(user_id),
        rating: Set(new.rating),
        title: Set(new.title.trim().to_string()),
        content: Set(new.content.trim().to_string()),
        is_verified_purchase: Set(new.is_verified_purchase),
        status: Set(status.as_str().to_string()),
        created_at: Set(now),
        updated_at: Set(now),
    };
    Ok(am.insert(db).await?)
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ReviewChanges {
    pub rating: Option<i32>,
    pub title: Option<String>,
    pub content: Option<String>,
}

pub async fn update(db: &DatabaseConnection, id: Uuid, changes: ReviewChanges) -> Result<Model, ModelError> {
    let existing = Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| ModelError::Validation("review not found".into()))?;
    let rating = changes.rating.unwrap_or(existing.rating);
    let title = changes.title.unwrap_or_else(|| existing.title.clone());
    let content = changes.content.unwrap_or_else(|| existing.content.clone());
    validate_rating(rating)?;
    validate_text(&title, &content)?;
    let mut am: ActiveModel = existing.into();
    am.rating = Set(rating);
    am.title = Set(title.trim().to_string());
    am.content = Set(content.trim().to_string());
    am.updated_at = Set(Utc::now().into());
    Ok(am.update(db).await?)
}

pub async fn set_status(db: &DatabaseConnection, id: Uuid, status: ReviewStatus) -> Result<Model, ModelError> {
    let mut am: ActiveModel = Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| ModelError::Validation("review not found".into()))?
        .into();
    am.status = Set(status.as_str().to_string());
    am.updated_at = Set(Utc::now().into());
    Ok(am.update(db).await?)
}
