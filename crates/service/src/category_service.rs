use std::collections::HashMap;

use uuid::Uuid;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, QuerySelect};
use serde::Serialize;
use tracing::info;

use models::{category, game};

use crate::errors::ServiceError;

/// A category with its number of active games.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeaturedCategory {
    #[serde(flatten)]
    pub category: category::Model,
    pub game_count: u64,
}

pub async fn list_categories(db: &DatabaseConnection) -> Result<Vec<category::Model>, ServiceError> {
    Ok(category::Entity::find().order_by_asc(category::Column::Name).all(db).await?)
}

pub async fn get_category(db: &DatabaseConnection, id: Uuid) -> Result<Option<category::Model>, ServiceError> {
    Ok(category::Entity::find_by_id(id).one(db).await?)
}

pub async fn create_category(db: &DatabaseConnection, name: &str, description: Option<String>) -> Result<category::Model, ServiceError> {
    let created = category::create(db, name, description).await?;
    info!(category_id = %created.id, name = %created.name, "category_created");
    Ok(created)
}

/// Categories ordered by active game count, busiest first.
pub async fn featured_categories(db: &DatabaseConnection, limit: usize) -> Result<Vec<FeaturedCategory>, ServiceError> {
    let categories = list_categories(db).await?;
    let counts: Vec<(Option<Uuid>, i64)> = game::Entity::find()
        .select_only()
        .column(game::Column::CategoryId)
        .column_as(game::Column::Id.count(), "game_count")
        .filter(game::Column::IsActive.eq(true))
        .filter(game::Column::CategoryId.is_not_null())
        .group_by(game::Column::CategoryId)
        .into_tuple()
        .all(db)
        .await?;
    let counts = counts
        .into_iter()
        .filter_map(|(id, n)| id.map(|id| (id, n.max(0) as u64)))
        .collect();
    Ok(rank_featured(categories, &counts, limit))
}

/// Drop empty categories, order by count desc then name, keep `limit`.
pub fn rank_featured(categories: Vec<category::Model>, counts: &HashMap<Uuid, u64>, limit: usize) -> Vec<FeaturedCategory> {
    let mut ranked: Vec<FeaturedCategory> = categories
        .into_iter()
        .filter_map(|c| {
            let n = counts.get(&c.id).copied().unwrap_or(0);
            (n > 0).then_some(FeaturedCategory { category: c, game_count: n })
        })
        .collect();
    ranked.sort_by(|a, b| b.game_count.cmp(&a.game_count).then_with(|| a.category.name.cmp(&b.category.name)));
    ranked.truncate(limit);
    ranked
}


#[cfg(test)]
mod db_tests {
    use super::*;
    use crate::test_support::get_db;

    #[tokio::test]
    async fn featured_counts_only_active_games() -> Result<(), anyhow::Error> {
        let Some(db) = get_db().await else { return Ok(()) };
        let tag = Uuid::new_v4().simple().to_string();
        let busy = create_category(&db, &format!("Busy {tag}"), None).await?;
        let empty = create_category(&db, &format!("Empty {tag}"), None).await?;

        let mut games = Vec::new();
        for active in [true, true, false] {
            let input = game::GameInput {
                title: format!("Featured {}", Uuid::new_v4()),
                description: "grouped".into(),
                min_players: 2,
                max_players: 4,
                playing_time: 45,
                category_id: Some(busy.id),
                is_active: Some(active),
                ..Default::default()
            };
            games.push(game::create(&db, input).await?);
        }

        let featured = featured_categories(&db, usize::MAX).await?;
        let entry = featured.iter().find(|f| f.category.id == busy.id).expect("busy category ranked");
        assert_eq!(entry.game_count, 2);
        assert!(featured.iter().all(|f| f.category.id != empty.id));

        for g in games {
            game::Entity::delete_by_id(g.id).exec(&db).await?;
        }
        for c in [busy.id, empty.id] {
            category::Entity::delete_by_id(c).exec(&db).await?;
        }
        Ok(())
    }
}
