use crate::errors::ModelError;
use crate::{category, game, profile, review, user_credentials, wishlist};
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter};
use anyhow::Result;
use uuid::Uuid;

use super::setup_test_db;

fn game_input(title: &str, category_id: Option<Uuid>) -> game::GameInput {
    game::GameInput {
        title: title.to_string(),
        description: "A test game".into(),
        min_players: 2,
        max_players: 4,
        playing_time: 60,
        category_id,
        ..Default::default()
    }
}

/// Test game create/update with joined category name
#[tokio::test]
async fn test_game_crud() -> Result<()> {
    let Some(db) = setup_test_db().await else { return Ok(()) };

    let cat = category::create(&db, &format!("cat_{}", Uuid::new_v4()), Some("test".into())).await?;
    let created = game::create(&db, game_input("Crud Game", Some(cat.id))).await?;
    assert!(created.is_active);
    assert_eq!(created.created_at, created.updated_at);

    let row = game::with_category()
        .filter(game::Column::Id.eq(created.id))
        .into_model::<game::GameRow>()
        .one(&db)
        .await?
        .expect("joined row");
    assert_eq!(row.category_name.as_deref(), Some(cat.name.as_str()));

    let updated = game::update(&db, created.id, game::GameChanges { price: Some(Some(12.5)), ..Default::default() }).await?;
    assert_eq!(updated.price, Some(12.5));
    assert!(updated.updated_at >= created.updated_at);

    let missing = game::update(&db, Uuid::new_v4(), game::GameChanges::default()).await;
    assert!(matches!(missing, Err(ModelError::Validation(_))));

    game::Entity::delete_by_id(created.id).exec(&db).await?;
    category::Entity::delete_by_id(cat.id).exec(&db).await?;
    Ok(())
}

/// Duplicate category names and emails surface as conflicts
#[tokio::test]
async fn test_unique_conflicts() -> Result<()> {
    let Some(db) = setup_test_db().await else { return Ok(()) };

    let name = format!("dup_{}", Uuid::new_v4());
    let cat = category::create(&db, &name, None).await?;
    assert!(matches!(category::create(&db, &name, None).await, Err(ModelError::Conflict(_))));

    let email = format!("dup_{}@example.com", Uuid::new_v4());
    let user = profile::create(&db, &email, "Dup", profile::Role::User).await?;
    assert!(matches!(profile::create(&db, &email, "Dup", profile::Role::User).await, Err(ModelError::Conflict(_))));

    profile::delete(&db, user.id).await?;
    category::Entity::delete_by_id(cat.id).exec(&db).await?;
    Ok(())
}

/// Review lifecycle and wishlist uniqueness
#[tokio::test]
async fn test_review_and_wishlist_flow() -> Result<()> {
    let Some(db) = setup_test_db().await else { return Ok(()) };

    let user = profile::create(&db, &format!("flow_{}@example.com", Uuid::new_v4()), "Flow User", profile::Role::User).await?;
    user_credentials::upsert_password(&db, user.id, "hash".into(), "argon2").await?;
    let g = game::create(&db, game_input("Flow Game", None)).await?;

    let r = review::create(
        &db,
        user.id,
        review::NewReview { game_id: g.id, rating: 4, title: "  Nice ".into(), content: "Fun".into(), is_verified_purchase: false },
        review::ReviewStatus::Pending,
    )
    .await?;
    assert_eq!(r.title, "Nice");
    assert_eq!(r.status, "pending");

    let r = review::set_status(&db, r.id, review::ReviewStatus::Approved).await?;
    assert_eq!(r.status, "approved");
    let r = review::update(&db, r.id, review::ReviewChanges { rating: Some(5), ..Default::default() }).await?;
    assert_eq!(r.rating, 5);
    assert!(review::update(&db, r.id, review::ReviewChanges { rating: Some(9), ..Default::default() }).await.is_err());

    let detail = review::with_details()
        .filter(review::Column::Id.eq(r.id))
        .into_model::<review::ReviewDetail>()
        .one(&db)
        .await?
        .expect("detail");
    assert_eq!(detail.user_name.as_deref(), Some("Flow User"));
    assert_eq!(detail.game_title.as_deref(), Some("Flow Game"));

    wishlist::add(&db, user.id, g.id).await?;
    assert!(matches!(wishlist::add(&db, user.id, g.id).await, Err(ModelError::Conflict(_))));
    let entries = wishlist::with_game()
        .filter(wishlist::Column::UserId.eq(user.id))
        .into_model::<wishlist::WishlistEntry>()
        .all(&db)
        .await?;
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].game_title.as_deref(), Some("Flow Game"));
    assert!(wishlist::remove(&db, user.id, g.id).await?);
    assert!(!wishlist::remove(&db, user.id, g.id).await?);

    // cascade removes the review and credentials
    assert!(profile::delete(&db, user.id).await?);
    assert!(review::Entity::find_by_id(r.id).one(&db).await?.is_none());
    assert!(user_credentials::find_for_user(&db, user.id).await?.is_none());
    game::Entity::delete_by_id(g.id).exec(&db).await?;
    Ok(())
}
