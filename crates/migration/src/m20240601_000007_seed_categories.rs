//! Seed the default game categories.
use sea_orm_migration::prelude::*;

const DEFAULT_CATEGORIES: [(&str, &str); 7] = [
    ("Strategy", "Long-term planning and resource management"),
    ("Family", "Accessible games for all ages"),
    ("Party", "Large groups and quick rounds"),
    ("Adventure", "Exploration and storytelling"),
    ("Puzzle", "Logic and pattern solving"),
    ("Educational", "Learn while you play"),
    ("Other", "Everything else"),
];

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        for (name, description) in DEFAULT_CATEGORIES {
            db.execute_unprepared(&format!(
                "INSERT INTO category (id, name, description, created_at) \
                 VALUES (gen_random_uuid(), '{name}', '{description}', now()) \
                 ON CONFLICT (name) DO NOTHING"
            ))
            .await?;
        }
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let names = DEFAULT_CATEGORIES
            .iter()
            .map(|(name, _)| format!("'{name}'"))
            .collect::<Vec<_>>()
            .join(", ");
        manager
            .get_connection()
            .execute_unprepared(&format!("DELETE FROM category WHERE name IN ({names})"))
            .await?;
        Ok(())
    }
}
