//! Migrator registering entity-specific migrations in dependency order.
//! Seed data follows the tables; indexes are applied last.
pub use sea_orm_migration::prelude::*;

mod m20240601_000001_create_category;
mod m20240601_000002_create_game;
mod m20240601_000003_create_profile;
mod m20240601_000004_create_user_credentials;
mod m20240601_000005_create_review;
mod m20240601_000006_create_wishlist;
mod m20240601_000007_seed_categories;
mod m20240601_000008_add_indexes;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240601_000001_create_category::Migration),
            Box::new(m20240601_000002_create_game::Migration),
            Box::new(m20240601_000003_create_profile::Migration),
            Box::new(m20240601_000004_create_user_credentials::Migration),
            Box::new(m20240601_000005_create_review::Migration),
            Box::new(m20240601_000006_create_wishlist::Migration),
            Box::new(m20240601_000007_seed_categories::Migration),
            // Indexes should always be applied last
            Box::new(m20240601_000008_add_indexes::Migration),
        ]
    }
}
