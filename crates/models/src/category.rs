use sea_orm::{entity::prelude::*, Set, DatabaseConnection};
use uuid::Uuid;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::errors::{self, ModelError};
use crate::game;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "category")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation { Game }

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Game => Entity::has_many(game::Entity).into(),
        }
    }
}

impl Related<game::Entity> for Entity {
    fn to() -> RelationDef { Relation::Game.def() }
}

impl ActiveModelBehavior for ActiveModel {}

pub fn validate_name(name: &str) -> Result<(), ModelError> {
    errors::required_text("category name", name, 64)
}

pub async fn create(db: &DatabaseConnection, name: &str, description: Option<String>) -> Result<Model, ModelError> {
    validate_name(name)?;
    let am = ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(name.trim().to_string()),
        description: Set(errors::non_blank(description)),
        created_at: Set(Utc::now().into()),
    };
    am.insert(db).await.map_err(|e| ModelError::from_db(e, "category already exists"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_rules() {
        assert!(validate_name("Strategy").is_ok());
        assert!(validate_name("   ").is_err());
        assert!(validate_name(&"x".repeat(65)).is_err());
    }
}
