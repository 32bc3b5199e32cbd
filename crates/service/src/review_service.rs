use uuid::Uuid;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, QuerySelect};
use serde::Deserialize;
use tracing::{info, instrument};

use common::pagination::{parse_page, Page};
use models::{game, review};
use models::review::{ReviewDetail, ReviewStatus};

use crate::errors::ServiceError;

/// The authenticated caller of a review operation.
#[derive(Debug, Clone, Copy)]
pub struct Actor {
    pub user_id: Uuid,
    pub is_admin: bool,
}

impl Actor {
    /// Owners and admins may edit or delete a review.
    pub fn can_modify(&self, owner_id: Uuid) -> bool {
        self.is_admin || self.user_id == owner_id
    }
}

/// Query-string parameters of the review listing.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReviewFilters {
    pub status: Option<String>,
    pub game_id: Option<Uuid>,
    pub page: Option<String>,
}

impl ReviewFilters {
    /// Blank or `all` means no status filter; anything else must be a known status.
    pub fn status(&self) -> Result<Option<ReviewStatus>, ServiceError> {
        match self.status.as_deref().map(str::trim) {
            None | Some("") | Some("all") => Ok(None),
            Some(s) => ReviewStatus::parse(s)
                .map(Some)
                .ok_or_else(|| ServiceError::Validation(format!("invalid review status: {s}"))),
        }
    }

    /// The same filters pinned to approved reviews, whatever status was asked for.
    pub fn approved_only(&self) -> Self {
        Self { status: Some(ReviewStatus::Approved.as_str().to_string()), ..self.clone() }
    }
}

/// Strip the author's email before a review leaves the admin panel.
fn public_view(mut detail: ReviewDetail) -> ReviewDetail {
    detail.user_email = None;
    detail
}

/// Approved reviews of a game, newest first.
pub async fn list_for_game(db: &DatabaseConnection, game_id: Uuid) -> Result<Vec<ReviewDetail>, ServiceError> {
    let rows = review::with_details()
        .filter(review::Column::GameId.eq(game_id))
        .filter(review::Column::Status.eq(ReviewStatus::Approved.as_str()))
        .order_by_desc(review::Column::CreatedAt)
        .into_model::<ReviewDetail>()
        .all(db)
        .await?;
    Ok(rows.into_iter().map(public_view).collect())
}

/// All reviews matching the filters, newest first, sliced into pages.
pub async fn list_reviews(db: &DatabaseConnection, filters: &ReviewFilters, page_size: u32) -> Result<Page<ReviewDetail>, ServiceError> {
    let mut query = review::with_details();
    if let Some(status) = filters.status()? {
        query = query.filter(review::Column::Status.eq(status.as_str()));
    }
    if let Some(game_id) = filters.game_id {
        query = query.filter(review::Column::GameId.eq(game_id));
    }
    let rows = query
        .order_by_desc(review::Column::CreatedAt)
        .into_model::<ReviewDetail>()
        .all(db)
        .await?;
    Ok(Page::from_vec(rows, parse_page(filters.page.as_deref()), page_size))
}

/// Public review listing: approved reviews only, without author emails.
pub async fn list_public_reviews(db: &DatabaseConnection, filters: &ReviewFilters, page_size: u32) -> Result<Page<ReviewDetail>, ServiceError> {
    Ok(list_reviews(db, &filters.approved_only(), page_size).await?.map(public_view))
}

/// A user's reviews in any status, newest first.
pub async fn list_for_user(db: &DatabaseConnection, user_id: Uuid) -> Result<Vec<ReviewDetail>, ServiceError> {
    let rows = review::with_details()
        .filter(review::Column::UserId.eq(user_id))
        .order_by_desc(review::Column::CreatedAt)
        .into_model::<ReviewDetail>()
        .all(db)
        .await?;
    Ok(rows)
}

/// Newest approved reviews.
pub async fn recent(db: &DatabaseConnection, limit: u64) -> Result<Vec<ReviewDetail>, ServiceError> {
    let rows = review::with_details()
        .filter(review::Column::Status.eq(ReviewStatus::Approved.as_str()))
        .order_by_desc(review::Column::CreatedAt)
        .limit(limit)
        .into_model::<ReviewDetail>()
        .all(db)
        .await?;
    Ok(rows.into_iter().map(public_view).collect())
}

pub async fn get_review(db: &DatabaseConnection, id: Uuid) -> Result<Option<ReviewDetail>, ServiceError> {
    let row = review::with_details()
        .filter(review::Column::Id.eq(id))
        .into_model::<ReviewDetail>()
        .one(db)
        .await?;
    Ok(row)
}

/// A review as the public sees it; `None` unless approved.
pub async fn get_public_review(db: &DatabaseConnection, id: Uuid) -> Result<Option<ReviewDetail>, ServiceError> {
    let row = review::with_details()
        .filter(review::Column::Id.eq(id))
        .filter(review::Column::Status.eq(ReviewStatus::Approved.as_str()))
        .into_model::<ReviewDetail>()
        .one(db)
        .await?;
    Ok(row.map(public_view))
}

/// Status given to a freshly submitted review.
pub fn initial_status(auto_approve: bool) -> ReviewStatus {
    if auto_approve { ReviewStatus::Approved } else { ReviewStatus::Pending }
}

#[instrument(skip(db, new), fields(user_id = %user_id, game_id = %new.game_id))]
pub async fn create_review(
    db: &DatabaseConnection,
    user_id: Uuid,
    new: review::NewReview,
    auto_approve: bool,
) -> Result<review::Model, ServiceError> {
    review::validate_rating(new.rating)?;
    review::validate_text(&new.title, &new.content)?;
    match game::Entity::find_by_id(new.game_id).one(db).await? {
        Some(g) if g.is_active => {}
        _ => return Err(ServiceError::not_found("game")),
    }
    let created = review::create(db, user_id, new, initial_status(auto_approve)).await?;
    info!(review_id = %created.id, status = %created.status, "review_created");
    Ok(created)
}

async fn find_owned(db: &DatabaseConnection, actor: &Actor, id: Uuid) -> Result<review::Model, ServiceError> {
    let existing = review::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| ServiceError::not_found("review"))?;
    if !actor.can_modify(existing.user_id) {
        return Err(ServiceError::Forbidden("not allowed to modify this review".into()));
    }
    Ok(existing)
}

/// Edit a review. The status is left untouched.
#[instrument(skip(db, changes), fields(user_id = %actor.user_id, review_id = %id))]
pub async fn update_review(
    db: &DatabaseConnection,
    actor: &Actor,
    id: Uuid,
    changes: review::ReviewChanges,
) -> Result<review::Model, ServiceError> {
    find_owned(db, actor, id).await?;
    let updated = review::update(db, id, changes).await?;
    info!("review_updated");
    Ok(updated)
}

#[instrument(skip(db), fields(user_id = %actor.user_id, review_id = %id))]
pub async fn delete_review(db: &DatabaseConnection, actor: &Actor, id: Uuid) -> Result<(), ServiceError> {
    find_owned(db, actor, id).await?;
    review::Entity::delete_by_id(id).exec(db).await?;
    info!("review_deleted");
    Ok(())
}

async fn moderate(db: &DatabaseConnection, id: Uuid, status: ReviewStatus) -> Result<review::Model, ServiceError> {
    if review::Entity::find_by_id(id).one(db).await?.is_none() {
        return Err(ServiceError::not_found("review"));
    }
    let updated = review::set_status(db, id, status).await?;
    info!(review_id = %id, status = status.as_str(), "review_moderated");
    Ok(updated)
}

pub async fn approve_review(db: &DatabaseConnection, id: Uuid) -> Result<review::Model, ServiceError> {
    moderate(db, id, ReviewStatus::Approved).await
}

pub async fn reject_review(db: &DatabaseConnection, id: Uuid) -> Result<review::Model, ServiceError> {
    moderate(db, id, ReviewStatus::Rejected).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_filter_parsing() {
        let f = |s: &str| ReviewFilters { status: Some(s.into()), ..Default::default() };
        assert_eq!(ReviewFilters::default().status().unwrap(), None);
        assert_eq!(f("all").status().unwrap(), None);
        assert_eq!(f("pending").status().unwrap(), Some(ReviewStatus::Pending));
        assert!(matches!(f("spam").status(), Err(ServiceError::Validation(_))));
    }

    #[test]
    fn public_filters_are_pinned_to_approved() {
        let asked = ReviewFilters { status: Some("pending".into()), game_id: Some(Uuid::nil()), page: Some("2".into()) };
        let pinned = asked.approved_only();
        assert_eq!(pinned.status().unwrap(), Some(ReviewStatus::Approved));
        assert_eq!(pinned.game_id, Some(Uuid::nil()));
        assert_eq!(pinned.page.as_deref(), Some("2"));
        assert_eq!(ReviewFilters::default().approved_only().status().unwrap(), Some(ReviewStatus::Approved));
    }

    #[test]
    fn owner_or_admin_may_modify() {
        let owner = Uuid::new_v4();
        assert!(Actor { user_id: owner, is_admin: false }.can_modify(owner));
        assert!(!Actor { user_id: Uuid::new_v4(), is_admin: false }.can_modify(owner));
        assert!(Actor { user_id: Uuid::new_v4(), is_admin: true }.can_modify(owner));
    }

    #[test]
    fn auto_approve_controls_initial_status() {
        assert_eq!(initial_status(true), ReviewStatus::Approved);
        assert_eq!(initial_status(false), ReviewStatus::Pending);
    }
}

#[cfg(test)]
mod db_tests {
    use super::*;
    use crate::test_support::{get_db, seed_user_and_game};

    #[tokio::test]
    async fn review_lifecycle() -> Result<(), anyhow::Error> {
        let Some(db) = get_db().await else { return Ok(()) };
        let (user, game) = seed_user_and_game(&db).await;
        let owner = Actor { user_id: user.id, is_admin: false };
        let stranger = Actor { user_id: Uuid::new_v4(), is_admin: false };

        let new = review::NewReview { game_id: game.id, rating: 4, title: " Solid ".into(), content: "Plays well".into(), is_verified_purchase: false };
        let pending = create_review(&db, user.id, new.clone(), false).await?;
        assert_eq!(pending.status, "pending");
        assert_eq!(pending.title, "Solid");
        assert!(list_for_game(&db, game.id).await?.is_empty());
        let everything = ReviewFilters { game_id: Some(game.id), ..Default::default() };
        assert_eq!(list_reviews(&db, &everything, 10).await?.total_count, 1);
        assert_eq!(list_public_reviews(&db, &everything, 10).await?.total_count, 0);
        assert!(get_public_review(&db, pending.id).await?.is_none());

        approve_review(&db, pending.id).await?;
        let visible = list_for_game(&db, game.id).await?;
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].user_name.as_deref(), Some("Test User"));
        assert!(visible[0].user_email.is_none());
        let public = list_public_reviews(&db, &everything, 10).await?;
        assert_eq!(public.total_count, 1);
        assert!(public.items[0].user_email.is_none());
        assert!(get_public_review(&db, pending.id).await?.is_some());

        let edited = update_review(&db, &owner, pending.id, review::ReviewChanges { rating: Some(5), ..Default::default() }).await?;
        assert_eq!(edited.status, "approved");
        assert!(matches!(
            update_review(&db, &stranger, pending.id, review::ReviewChanges::default()).await,
            Err(ServiceError::Forbidden(_))
        ));

        let bad = review::NewReview { rating: 7, ..new.clone() };
        assert!(matches!(create_review(&db, user.id, bad, true).await, Err(ServiceError::Validation(_))));
        let missing = review::NewReview { game_id: Uuid::new_v4(), ..new };
        assert!(matches!(create_review(&db, user.id, missing, true).await, Err(ServiceError::NotFound(_))));

        let filters = ReviewFilters { status: Some("approved".into()), game_id: Some(game.id), page: None };
        assert_eq!(list_reviews(&db, &filters, 10).await?.total_count, 1);
        assert_eq!(list_for_user(&db, user.id).await?.len(), 1);

        delete_review(&db, &owner, pending.id).await?;
        assert!(get_review(&db, pending.id).await?.is_none());

        models::profile::delete(&db, user.id).await?;
        game::Entity::delete_by_id(game.id).exec(&db).await?;
        Ok(())
    }
}
