#![cfg(test)]
use tokio::sync::OnceCell;
use sea_orm::DatabaseConnection;
use migration::MigratorTrait;
use models::db::{connect_with_config, DatabaseConfig};
use uuid::Uuid;

// Migrations run once per test process; `false` means the database is unusable.
static MIGRATED: OnceCell<bool> = OnceCell::const_new();

fn test_config() -> DatabaseConfig {
    let mut cfg = DatabaseConfig::from_file("config.toml").unwrap_or_else(|_| DatabaseConfig::from_env());
    cfg.min_connections = cfg.min_connections.min(1);
    cfg.connect_timeout = std::time::Duration::from_secs(5);
    cfg.acquire_timeout = std::time::Duration::from_secs(10);
    cfg
}

/// A migrated connection, or `None` when `SKIP_DB_TESTS` is set or no
/// database is reachable.
pub async fn get_db() -> Option<DatabaseConnection> {
    if std::env::var("SKIP_DB_TESTS").is_ok() {
        return None;
    }
    let ready = *MIGRATED
        .get_or_init(|| async {
            match connect_with_config(&test_config()).await {
                Ok(db) => match migration::Migrator::up(&db, None).await {
                    Ok(()) => true,
                    Err(e) => {
                        eprintln!("skip: migrate up failed: {e}");
                        false
                    }
                },
                Err(e) => {
                    eprintln!("skip: cannot connect to db: {e}");
                    false
                }
            }
        })
        .await;
    if !ready {
        return None;
    }
    // Fresh connection for the current test's runtime
    connect_with_config(&test_config()).await.ok()
}

/// Insert a throwaway profile and an active game.
pub async fn seed_user_and_game(db: &DatabaseConnection) -> (models::profile::Model, models::game::Model) {
    let user = models::profile::create(db, &format!("t_{}@example.com", Uuid::new_v4()), "Test User", models::profile::Role::User)
        .await
        .expect("create profile");
    let game = models::game::create(
        db,
        models::game::GameInput {
            title: format!("Test Game {}", Uuid::new_v4()),
            description: "integration".into(),
            min_players: 1,
            max_players: 4,
            playing_time: 30,
            ..Default::default()
        },
    )
    .await
    .expect("create game");
    (user, game)
}
