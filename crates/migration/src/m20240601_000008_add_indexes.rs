use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Game: index on category_id
        manager
            .create_index(
                Index::create()
                    .name("idx_game_category")
                    .table(Game::Table)
                    .col(Game::CategoryId)
                    .to_owned(),
            )
            .await?;

        // Review: lookups by game and by author
        manager
            .create_index(
                Index::create()
                    .name("idx_review_game")
                    .table(Review::Table)
                    .col(Review::GameId)
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("idx_review_user")
                    .table(Review::Table)
                    .col(Review::UserId)
                    .to_owned(),
            )
            .await?;

        // Wishlist: composite unique (user_id, game_id)
        manager
            .create_index(
                Index::create()
                    .name("uniq_wishlist_user_game")
                    .table(Wishlist::Table)
                    .col(Wishlist::UserId)
                    .col(Wishlist::GameId)
                    .unique()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_game_category").table(Game::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_review_game").table(Review::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_review_user").table(Review::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("uniq_wishlist_user_game").table(Wishlist::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Game { Table, CategoryId }

#[derive(DeriveIden)]
enum Review { Table, GameId, UserId }

#[derive(DeriveIden)]
enum Wishlist { Table, UserId, GameId }
