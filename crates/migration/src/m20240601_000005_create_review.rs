//! Create `review` table linking profiles to games.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Review::Table)
                    .if_not_exists()
                    .col(uuid(Review::Id).primary_key())
                    .col(uuid(Review::GameId).not_null())
                    .col(uuid(Review::UserId).not_null())
                    .col(integer(Review::Rating).not_null().check(Expr::col(Review::Rating).between(1, 5)))
                    .col(string_len(Review::Title, 150).not_null())
                    .col(text(Review::Content).not_null())
                    .col(boolean(Review::IsVerifiedPurchase).not_null().default(false))
                    .col(string_len(Review::Status, 16).not_null().default("pending"))
                    .col(timestamp_with_time_zone(Review::CreatedAt).not_null())
                    .col(timestamp_with_time_zone(Review::UpdatedAt).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_review_game")
                            .from(Review::Table, Review::GameId)
                            .to(Game::Table, Game::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_review_profile")
                            .from(Review::Table, Review::UserId)
                            .to(Profile::Table, Profile::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Review::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Review {
    Table,
    Id,
    GameId,
    UserId,
    Rating,
    Title,
    Content,
    IsVerifiedPurchase,
    Status,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Game { Table, Id }

#[derive(DeriveIden)]
enum Profile { Table, Id }
