use chrono::{DateTime, Datelike, Duration, TimeZone, Utc};
use sea_orm::sea_query::{Alias, Expr, Func, SimpleExpr};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, QuerySelect};
use serde::Serialize;

use models::{game, profile, review};
use models::review::ReviewStatus;

use crate::catalog::ratings;
use crate::errors::ServiceError;

/// Window for counting a reviewer as active.
pub const ACTIVE_USER_WINDOW_DAYS: i64 = 30;

/// Figures shown on the admin dashboard.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AdminStats {
    pub total_games: u64,
    pub total_users: u64,
    pub total_reviews: u64,
    pub average_rating: f64,
    pub pending_reviews: u64,
    pub active_users: u64,
    pub games_this_month: u64,
    pub reviews_this_month: u64,
}

/// Midnight UTC on the first day of `now`'s month.
pub fn month_start(now: DateTime<Utc>) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(now.year(), now.month(), 1, 0, 0, 0)
        .single()
        .unwrap_or(now)
}

pub async fn admin_stats(db: &DatabaseConnection, now: DateTime<Utc>) -> Result<AdminStats, ServiceError> {
    let month = month_start(now);
    let active_since = now - Duration::days(ACTIVE_USER_WINDOW_DAYS);

    let total_games = game::Entity::find().count(db).await?;
    let total_users = profile::Entity::find().count(db).await?;
    let total_reviews = review::Entity::find().count(db).await?;
    let pending_reviews = review::Entity::find()
        .filter(review::Column::Status.eq(ReviewStatus::Pending.as_str()))
        .count(db)
        .await?;
    // AVG over an integer column is numeric in Postgres
    let mean = SimpleExpr::from(Func::cast_as(
        Func::avg(Expr::col(review::Column::Rating)),
        Alias::new("double precision"),
    ));
    let average_rating: Option<f64> = review::Entity::find()
        .select_only()
        .column_as(mean, "average_rating")
        .into_tuple::<Option<f64>>()
        .one(db)
        .await?
        .flatten();
    let active_users: Option<i64> = review::Entity::find()
        .select_only()
        .column_as(SimpleExpr::from(Func::count_distinct(Expr::col(review::Column::UserId))), "active_users")
        .filter(review::Column::CreatedAt.gte(active_since))
        .into_tuple::<i64>()
        .one(db)
        .await?;
    let games_this_month = game::Entity::find().filter(game::Column::CreatedAt.gte(month)).count(db).await?;
    let reviews_this_month = review::Entity::find().filter(review::Column::CreatedAt.gte(month)).count(db).await?;

    Ok(AdminStats {
        total_games,
        total_users,
        total_reviews,
        average_rating: average_rating.map(ratings::round1).unwrap_or(0.0),
        pending_reviews,
        active_users: active_users.unwrap_or(0).max(0) as u64,
        games_this_month,
        reviews_this_month,
    })
}


#[cfg(test)]
mod db_tests {
    use super::*;
    use crate::test_support::{get_db, seed_user_and_game};

    #[tokio::test]
    async fn admin_stats_counts_seeded_rows() -> Result<(), anyhow::Error> {
        let Some(db) = get_db().await else { return Ok(()) };
        let (user, game) = seed_user_and_game(&db).await;
        let new = review::NewReview { game_id: game.id, rating: 3, title: "Fine".into(), content: "Mid".into(), is_verified_purchase: false };
        review::create(&db, user.id, new, ReviewStatus::Pending).await?;

        // Other tests share the database, so only lower bounds hold
        let after = admin_stats(&db, Utc::now()).await?;
        assert!(after.total_games >= 1);
        assert!(after.total_users >= 1);
        assert!(after.pending_reviews >= 1);
        assert!(after.total_reviews >= after.pending_reviews);
        assert!(after.active_users >= 1);
        assert!(after.games_this_month >= 1);
        assert!(after.reviews_this_month >= 1);
        assert!((1.0..=5.0).contains(&after.average_rating));
        assert_eq!(after.average_rating, ratings::round1(after.average_rating));

        models::profile::delete(&db, user.id).await?;
        game::Entity::delete_by_id(game.id).exec(&db).await?;
        Ok(())
    }
}
