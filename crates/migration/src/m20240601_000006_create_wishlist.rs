//! Create `wishlist` table. The (user, game) pair is unique; see the index
//! migration.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Wishlist::Table)
                    .if_not_exists()
                    .col(uuid(Wishlist::Id).primary_key())
                    .col(uuid(Wishlist::UserId).not_null())
                    .col(uuid(Wishlist::GameId).not_null())
                    .col(timestamp_with_time_zone(Wishlist::CreatedAt).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_wishlist_profile")
                            .from(Wishlist::Table, Wishlist::UserId)
                            .to(Profile::Table, Profile::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_wishlist_game")
                            .from(Wishlist::Table, Wishlist::GameId)
                            .to(Game::Table, Game::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Wishlist::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Wishlist { Table, Id, UserId, GameId, CreatedAt }

#[derive(DeriveIden)]
enum Game { Table, Id }

#[derive(DeriveIden)]
enum Profile { Table, Id }
