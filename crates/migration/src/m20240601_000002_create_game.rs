//! Create `game` table with optional FK to `category`.
//!
//! Deleting a category leaves its games uncategorized.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Game::Table)
                    .if_not_exists()
                    .col(uuid(Game::Id).primary_key())
                    .col(string_len(Game::Title, 100).not_null())
                    .col(text(Game::Description).not_null())
                    .col(string_len_null(Game::ShortDescription, 255))
                    .col(string_len_null(Game::Publisher, 100))
                    .col(string_len_null(Game::Designer, 100))
                    .col(integer_null(Game::YearPublished))
                    .col(integer(Game::MinPlayers).not_null())
                    .col(integer(Game::MaxPlayers).not_null())
                    .col(integer_null(Game::MinAge))
                    .col(integer(Game::PlayingTime).not_null())
                    .col(double_null(Game::ComplexityRating))
                    .col(double_null(Game::Price))
                    .col(string_len_null(Game::ImageUrl, 512))
                    .col(string_len_null(Game::ThumbnailUrl, 512))
                    .col(uuid_null(Game::CategoryId))
                    .col(boolean(Game::IsActive).not_null().default(true))
                    .col(timestamp_with_time_zone(Game::CreatedAt).not_null())
                    .col(timestamp_with_time_zone(Game::UpdatedAt).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_game_category")
                            .from(Game::Table, Game::CategoryId)
                            .to(Category::Table, Category::Id)
                            .on_delete(ForeignKeyAction::SetNull)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Game::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Game {
    Table,
    Id,
    Title,
    Description,
    ShortDescription,
    Publisher,
    Designer,
    YearPublished,
    MinPlayers,
    MaxPlayers,
    MinAge,
    PlayingTime,
    ComplexityRating,
    Price,
    ImageUrl,
    ThumbnailUrl,
    CategoryId,
    IsActive,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Category { Table, Id }
