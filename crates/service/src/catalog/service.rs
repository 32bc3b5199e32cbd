use std::sync::Arc;

use tracing::{info, instrument};
use uuid::Uuid;

use common::pagination::Page;
use configs::CatalogConfig;
use models::game;

use crate::errors::ServiceError;
use super::domain::{self, FilterOptions, GameSummary};
use super::filters::{GameFilters, GameQuery, SortOrder};
use super::ratings;
use super::repository::CatalogRepository;

/// Minimum query length before suggestions are offered.
pub const MIN_SUGGESTION_QUERY: usize = 2;

/// Catalog business service independent of web framework
pub struct CatalogService<R: CatalogRepository> {
    repo: Arc<R>,
    cfg: CatalogConfig,
}

impl<R: CatalogRepository> CatalogService<R> {
    pub fn new(repo: Arc<R>, cfg: CatalogConfig) -> Self { Self { repo, cfg } }

    /// Fetch the games matching `query` and attach their rating summaries.
    async fn summaries(&self, query: &GameQuery) -> Result<Vec<GameSummary>, ServiceError> {
        let rows = self.repo.find_games(query).await?;
        self.rate(rows).await
    }

    async fn rate(&self, rows: Vec<game::GameRow>) -> Result<Vec<GameSummary>, ServiceError> {
        let ids: Vec<Uuid> = rows.iter().map(|g| g.id).collect();
        let ratings = ratings::summarize(&self.repo.approved_ratings(&ids).await?);
        Ok(domain::summarize_games(rows, &ratings))
    }

    async fn query_page(&self, query: GameQuery) -> Result<Page<GameSummary>, ServiceError> {
        let mut games = self.summaries(&query).await?;
        domain::sort_games(&mut games, query.sort);
        Ok(Page::from_vec(games, query.page, self.cfg.page_size))
    }

    /// Public catalog listing.
    pub async fn list_games(&self, filters: &GameFilters) -> Result<Page<GameSummary>, ServiceError> {
        let query = GameQuery::from_filters(filters)?;
        self.query_page(query).await
    }

    /// Catalog listing for the admin panel, inactive games included.
    pub async fn admin_games(&self, filters: &GameFilters) -> Result<Page<GameSummary>, ServiceError> {
        let query = GameQuery::from_filters(filters)?.with_inactive();
        self.query_page(query).await
    }

    pub async fn featured(&self) -> Result<Vec<GameSummary>, ServiceError> {
        let mut games = self.all_games().await?;
        games.truncate(self.cfg.featured_limit as usize);
        Ok(games)
    }

    /// Every active game, newest first.
    pub async fn all_games(&self) -> Result<Vec<GameSummary>, ServiceError> {
        self.summaries(&GameQuery::default()).await
    }

    /// An active game; `None` when missing or inactive.
    pub async fn get_game(&self, id: Uuid) -> Result<Option<GameSummary>, ServiceError> {
        match self.repo.get_game(id).await? {
            Some(g) if g.is_active => Ok(self.rate(vec![g]).await?.pop()),
            _ => Ok(None),
        }
    }

    pub async fn get_game_for_admin(&self, id: Uuid) -> Result<Option<GameSummary>, ServiceError> {
        match self.repo.get_game(id).await? {
            Some(g) => Ok(self.rate(vec![g]).await?.pop()),
            None => Ok(None),
        }
    }

    /// Active games whose title or description contains `q`, by title.
    pub async fn search(&self, q: &str) -> Result<Vec<GameSummary>, ServiceError> {
        let q = q.trim();
        if q.is_empty() {
            return Ok(Vec::new());
        }
        let query = GameQuery { search: Some(q.to_string()), ..Default::default() };
        let mut games = self.summaries(&query).await?;
        domain::sort_games(&mut games, SortOrder::Title);
        Ok(games)
    }

    pub async fn suggestions(&self, q: &str) -> Result<Vec<GameSummary>, ServiceError> {
        if q.trim().chars().count() < MIN_SUGGESTION_QUERY {
            return Ok(Vec::new());
        }
        let mut games = self.search(q).await?;
        games.truncate(self.cfg.suggestion_limit);
        Ok(games)
    }

    /// Active games sharing the category of `id`, excluding itself.
    pub async fn similar(&self, id: Uuid) -> Result<Vec<GameSummary>, ServiceError> {
        let game = self.repo.get_game(id).await?.ok_or_else(|| ServiceError::not_found("game"))?;
        let Some(category_id) = game.category_id else {
            return Ok(Vec::new());
        };
        let query = GameQuery { category_id: Some(category_id), ..Default::default() };
        let rows: Vec<game::GameRow> = self
            .repo
            .find_games(&query)
            .await?
            .into_iter()
            .filter(|g| g.id != id)
            .take(self.cfg.similar_limit as usize)
            .collect();
        self.rate(rows).await
    }

    pub async fn filter_options(&self) -> Result<FilterOptions, ServiceError> {
        let categories = self.repo.categories().await?;
        let games = self.repo.find_games(&GameQuery::default()).await?;
        Ok(domain::filter_options(categories, &games))
    }

    #[instrument(skip(self, input), fields(title = %input.title))]
    pub async fn create_game(&self, input: game::GameInput) -> Result<game::Model, ServiceError> {
        let created = self.repo.create_game(input).await?;
        info!(game_id = %created.id, "game_created");
        Ok(created)
    }

    #[instrument(skip(self, changes), fields(game_id = %id))]
    pub async fn update_game(&self, id: Uuid, changes: game::GameChanges) -> Result<game::Model, ServiceError> {
        if self.repo.get_game(id).await?.is_none() {
            return Err(ServiceError::not_found("game"));
        }
        let updated = self.repo.update_game(id, changes).await?;
        info!("game_updated");
        Ok(updated)
    }

    #[instrument(skip(self), fields(game_id = %id))]
    pub async fn delete_game(&self, id: Uuid) -> Result<(), ServiceError> {
        if !self.repo.delete_game(id).await? {
            return Err(ServiceError::not_found("game"));
        }
        info!("game_deleted");
        Ok(())
    }

    pub async fn set_active(&self, id: Uuid, active: bool) -> Result<game::Model, ServiceError> {
        self.update_game(id, game::GameChanges { is_active: Some(active), ..Default::default() }).await
    }
}
