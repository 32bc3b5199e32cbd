use async_trait::async_trait;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, QuerySelect};
use uuid::Uuid;

use models::{category, game, review};

use crate::errors::ServiceError;
use super::filters::GameQuery;

/// Persistence seam of the catalog.
#[async_trait]
pub trait CatalogRepository: Send + Sync {
    /// Games matching the query, newest first, with category names.
    async fn find_games(&self, query: &GameQuery) -> Result<Vec<game::GameRow>, ServiceError>;
    /// A single game regardless of its active flag.
    async fn get_game(&self, id: Uuid) -> Result<Option<game::GameRow>, ServiceError>;
    /// `(game_id, rating)` of approved reviews for the given games.
    async fn approved_ratings(&self, game_ids: &[Uuid]) -> Result<Vec<(Uuid, i32)>, ServiceError>;
    async fn categories(&self) -> Result<Vec<category::Model>, ServiceError>;
    async fn create_game(&self, input: game::GameInput) -> Result<game::Model, ServiceError>;
    async fn update_game(&self, id: Uuid, changes: game::GameChanges) -> Result<game::Model, ServiceError>;
    async fn delete_game(&self, id: Uuid) -> Result<bool, ServiceError>;
}

/// SeaORM-backed repository implementation.
pub struct SeaOrmCatalogRepository {
    pub db: DatabaseConnection,
}

#[async_trait]
impl CatalogRepository for SeaOrmCatalogRepository {
    async fn find_games(&self, query: &GameQuery) -> Result<Vec<game::GameRow>, ServiceError> {
        let rows = game::with_category()
            .filter(query.to_condition())
            .order_by_desc(game::Column::CreatedAt)
            .into_model::<game::GameRow>()
            .all(&self.db)
            .await?;
        Ok(rows)
    }

    async fn get_game(&self, id: Uuid) -> Result<Option<game::GameRow>, ServiceError> {
        let row = game::with_category()
            .filter(game::Column::Id.eq(id))
            .into_model::<game::GameRow>()
            .one(&self.db)
            .await?;
        Ok(row)
    }

    async fn approved_ratings(&self, game_ids: &[Uuid]) -> Result<Vec<(Uuid, i32)>, ServiceError> {
        if game_ids.is_empty() {
            return Ok(Vec::new());
        }
        let rows = review::Entity::find()
            .select_only()
            .column(review::Column::GameId)
            .column(review::Column::Rating)
            .filter(review::Column::GameId.is_in(game_ids.iter().copied()))
            .filter(review::Column::Status.eq(review::ReviewStatus::Approved.as_str()))
            .into_tuple::<(Uuid, i32)>()
            .all(&self.db)
            .await?;
        Ok(rows)
    }

    async fn categories(&self) -> Result<Vec<category::Model>, ServiceError> {
        Ok(category::Entity::find().order_by_asc(category::Column::Name).all(&self.db).await?)
    }

    async fn create_game(&self, input: game::GameInput) -> Result<game::Model, ServiceError> {
        Ok(game::create(&self.db, input).await?)
    }

    async fn update_game(&self, id: Uuid, changes: game::GameChanges) -> Result<game::Model, ServiceError> {
        Ok(game::update(&self.db, id, changes).await?)
    }

    async fn delete_game(&self, id: Uuid) -> Result<bool, ServiceError> {
        let res = game::Entity::delete_by_id(id).exec(&self.db).await?;
        Ok(res.rows_affected > 0)
    }
}

/// Simple in-memory mock repository for tests
pub mod mock {
    use super::*;
    use std::sync::Mutex;

    use chrono::Utc;

    #[derive(Default)]
    pub struct MockCatalogRepository {
        pub games: Mutex<Vec<game::GameRow>>,
        pub categories: Mutex<Vec<category::Model>>,
        /// `(game_id, rating, approved)`
        pub ratings: Mutex<Vec<(Uuid, i32, bool)>>,
    }

    impl MockCatalogRepository {
        pub fn with_games(games: Vec<game::GameRow>) -> Self {
            Self { games: Mutex::new(games), ..Default::default() }
        }

        pub fn add_category(&self, name: &str) -> category::Model {
            let c = category::Model { id: Uuid::new_v4(), name: name.to_string(), description: None, created_at: Utc::now().into() };
            self.categories.lock().unwrap().push(c.clone());
            c
        }

        pub fn rate(&self, game_id: Uuid, rating: i32, approved: bool) {
            self.ratings.lock().unwrap().push((game_id, rating, approved));
        }

        fn category_name(&self, id: Option<Uuid>) -> Option<String> {
            let id = id?;
            self.categories.lock().unwrap().iter().find(|c| c.id == id).map(|c| c.name.clone())
        }
    }

    fn to_model(g: &game::GameRow) -> game::Model {
        game::Model {
            id: g.id,
            title: g.title.clone(),
            description: g.description.clone(),
            short_description: g.short_description.clone(),
            publisher: g.publisher.clone(),
            designer: g.designer.clone(),
            year_published: g.year_published,
            min_players: g.min_players,
            max_players: g.max_players,
            min_age: g.min_age,
            playing_time: g.playing_time,
            complexity_rating: g.complexity_rating,
            price: g.price,
            image_url: g.image_url.clone(),
            thumbnail_url: g.thumbnail_url.clone(),
            category_id: g.category_id,
            is_active: g.is_active,
            created_at: g.created_at,
            updated_at: g.updated_at,
        }
    }

    fn from_input(id: Uuid, input: game::GameInput, created_at: sea_orm::prelude::DateTimeWithTimeZone) -> game::Model {
        game::Model {
            id,
            title: input.title.trim().to_string(),
            description: input.description.trim().to_string(),
            short_description: input.short_description,
            publisher: input.publisher,
            designer: input.designer,
            year_published: input.year_published,
            min_players: input.min_players,
            max_players: input.max_players,
            min_age: input.min_age,
            playing_time: input.playing_time,
            complexity_rating: input.complexity_rating,
            price: input.price,
            image_url: input.image_url,
            thumbnail_url: input.thumbnail_url,
            category_id: input.category_id,
            is_active: input.is_active.unwrap_or(true),
            created_at,
            updated_at: Utc::now().into(),
        }
    }

    #[async_trait]
    impl CatalogRepository for MockCatalogRepository {
        async fn find_games(&self, query: &GameQuery) -> Result<Vec<game::GameRow>, ServiceError> {
            let mut rows: Vec<game::GameRow> = self.games.lock().unwrap().iter().filter(|g| query.matches(g)).cloned().collect();
            rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
            Ok(rows)
        }

        async fn get_game(&self, id: Uuid) -> Result<Option<game::GameRow>, ServiceError> {
            Ok(self.games.lock().unwrap().iter().find(|g| g.id == id).cloned())
        }

        async fn approved_ratings(&self, game_ids: &[Uuid]) -> Result<Vec<(Uuid, i32)>, ServiceError> {
            let ratings = self.ratings.lock().unwrap();
            Ok(ratings.iter().filter(|(id, _, ok)| *ok && game_ids.contains(id)).map(|(id, r, _)| (*id, *r)).collect())
        }

        async fn categories(&self) -> Result<Vec<category::Model>, ServiceError> {
            Ok(self.categories.lock().unwrap().clone())
        }

        async fn create_game(&self, input: game::GameInput) -> Result<game::Model, ServiceError> {
            game::validate(&input)?;
            let m = from_input(Uuid::new_v4(), input, Utc::now().into());
            let row = game::GameRow::from_model(m.clone(), self.category_name(m.category_id));
            self.games.lock().unwrap().push(row);
            Ok(m)
        }

        async fn update_game(&self, id: Uuid, changes: game::GameChanges) -> Result<game::Model, ServiceError> {
            let existing = self
                .get_game(id)
                .await?
                .ok_or_else(|| ServiceError::Validation("game not found".into()))?;
            let existing = to_model(&existing);
            let merged = game::validate_changes(&existing, &changes)?;
            let m = from_input(id, merged, existing.created_at);
            let name = self.category_name(m.category_id);
            let mut games = self.games.lock().unwrap();
            if let Some(slot) = games.iter_mut().find(|g| g.id == id) {
                *slot = game::GameRow::from_model(m.clone(), name);
            }
            Ok(m)
        }

        async fn delete_game(&self, id: Uuid) -> Result<bool, ServiceError> {
            let mut games = self.games.lock().unwrap();
            let before = games.len();
            games.retain(|g| g.id != id);
            Ok(games.len() < before)
        }
    }
}
