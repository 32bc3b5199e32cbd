use std::collections::HashMap;

use uuid::Uuid;
use sea_orm::sea_query::{Expr, Func};
use sea_orm::{ColumnTrait, Condition, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use common::pagination::{parse_page, Page, Pagination};
use models::{profile, review};

use crate::errors::ServiceError;

/// Query-string parameters of the admin user listing.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserFilters {
    pub search: Option<String>,
    pub page: Option<String>,
}

/// A profile with the number of reviews it wrote.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProfileSummary {
    #[serde(flatten)]
    pub profile: profile::Model,
    pub review_count: u64,
}

pub async fn get_profile(db: &DatabaseConnection, id: Uuid) -> Result<Option<profile::Model>, ServiceError> {
    Ok(profile::Entity::find_by_id(id).one(db).await?)
}

#[instrument(skip(db, changes), fields(user_id = %id))]
pub async fn update_profile(db: &DatabaseConnection, id: Uuid, changes: profile::ProfileChanges) -> Result<profile::Model, ServiceError> {
    profile::validate_changes(&changes)?;
    if get_profile(db, id).await?.is_none() {
        return Err(ServiceError::not_found("user"));
    }
    let updated = profile::update(db, id, changes).await?;
    info!("profile_updated");
    Ok(updated)
}

#[instrument(skip(db), fields(user_id = %id))]
pub async fn delete_profile(db: &DatabaseConnection, id: Uuid) -> Result<(), ServiceError> {
    if !profile::delete(db, id).await? {
        return Err(ServiceError::not_found("user"));
    }
    info!("profile_deleted");
    Ok(())
}

/// Case-insensitive match on full name or email.
pub fn search_condition(search: &str) -> Condition {
    let pattern = format!("%{}%", search.trim().to_lowercase());
    Condition::any()
        .add(Expr::expr(Func::lower(Expr::col((profile::Entity, profile::Column::FullName)))).like(pattern.clone()))
        .add(Expr::expr(Func::lower(Expr::col((profile::Entity, profile::Column::Email)))).like(pattern))
}

/// Profiles newest first, paginated in the database.
pub async fn list_profiles(db: &DatabaseConnection, filters: &UserFilters, page_size: u32) -> Result<Page<ProfileSummary>, ServiceError> {
    let mut query = profile::Entity::find();
    if let Some(search) = filters.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        query = query.filter(search_condition(search));
    }
    let page = parse_page(filters.page.as_deref());
    let (page_idx, per_page) = Pagination { page, per_page: page_size }.normalize();
    let paginator = query.order_by_desc(profile::Column::CreatedAt).paginate(db, per_page);
    let total = paginator.num_items().await?;
    let profiles = paginator.fetch_page(page_idx).await?;

    let ids: Vec<Uuid> = profiles.iter().map(|p| p.id).collect();
    let counts = review_counts(db, &ids).await?;
    let items = profiles
        .into_iter()
        .map(|p| {
            let review_count = counts.get(&p.id).copied().unwrap_or(0);
            ProfileSummary { profile: p, review_count }
        })
        .collect();
    Ok(Page::new(items, page, per_page as u32, total))
}

async fn review_counts(db: &DatabaseConnection, user_ids: &[Uuid]) -> Result<HashMap<Uuid, u64>, ServiceError> {
    if user_ids.is_empty() {
        return Ok(HashMap::new());
    }
    let rows: Vec<(Uuid, i64)> = review::Entity::find()
        .select_only()
        .column(review::Column::UserId)
        .column_as(review::Column::Id.count(), "review_count")
        .filter(review::Column::UserId.is_in(user_ids.iter().copied()))
        .group_by(review::Column::UserId)
        .into_tuple()
        .all(db)
        .await?;
    Ok(rows.into_iter().map(|(id, n)| (id, n.max(0) as u64)).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{DbBackend, QueryTrait};

    #[test]
    fn search_matches_name_or_email() {
        let sql = profile::Entity::find()
            .filter(search_condition(" Ann "))
            .build(DbBackend::Postgres)
            .to_string();
        assert!(sql.contains(r#"LOWER("profile"."full_name") LIKE '%ann%'"#), "{sql}");
        assert!(sql.contains(r#"LOWER("profile"."email") LIKE '%ann%'"#), "{sql}");
        assert!(sql.contains(" OR "), "{sql}");
    }
}

#[cfg(test)]
mod db_tests {
    use super::*;
    use crate::test_support::{get_db, seed_user_and_game};
    use models::game;
    use models::review::{NewReview, ReviewStatus};

    #[tokio::test]
    async fn list_profiles_pages_and_counts_reviews() -> Result<(), anyhow::Error> {
        let Some(db) = get_db().await else { return Ok(()) };
        let (seeded, game) = seed_user_and_game(&db).await;
        let tag = format!("lp{}", Uuid::new_v4().simple());
        let reviewer = profile::create(&db, &format!("{tag}_a@example.com"), "Reviewer", profile::Role::User).await?;
        let lurker = profile::create(&db, &format!("{tag}_b@example.com"), "Lurker", profile::Role::User).await?;
        let new = NewReview { game_id: game.id, rating: 5, title: "Great".into(), content: "Loved it".into(), is_verified_purchase: false };
        review::create(&db, reviewer.id, new, ReviewStatus::Approved).await?;

        let filters = UserFilters { search: Some(tag.to_uppercase()), page: None };
        let first = list_profiles(&db, &filters, 1).await?;
        assert_eq!(first.total_count, 2);
        assert_eq!(first.total_pages, 2);
        assert_eq!(first.items.len(), 1);
        let second = list_profiles(&db, &UserFilters { page: Some("2".into()), ..filters.clone() }, 1).await?;
        assert_eq!(second.current_page, 2);
        assert_eq!(second.items.len(), 1);

        let all = list_profiles(&db, &filters, 10).await?;
        let count_of = |id: Uuid| all.items.iter().find(|s| s.profile.id == id).map(|s| s.review_count);
        assert_eq!(count_of(reviewer.id), Some(1));
        assert_eq!(count_of(lurker.id), Some(0));

        for id in [reviewer.id, lurker.id, seeded.id] {
            profile::delete(&db, id).await?;
        }
        game::Entity::delete_by_id(game.id).exec(&db).await?;
        Ok(())
    }
}
