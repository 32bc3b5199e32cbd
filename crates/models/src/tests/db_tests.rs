use crate::db::{connect_with_config, test_connection, DatabaseConfig, DATABASE_URL};
use sea_orm::{ConnectionTrait, DatabaseBackend, Statement};
use std::time::Duration;
use anyhow::Result;

use super::setup_test_db;

#[test]
fn default_pool_settings() {
    let cfg = DatabaseConfig::default();
    assert_eq!(cfg.max_connections, 10);
    assert_eq!(cfg.min_connections, 2);
    assert_eq!(cfg.connect_timeout, Duration::from_secs(30));
    assert!(!cfg.sqlx_logging);
}

#[test]
fn converts_from_app_config_seconds() {
    let app = configs::DatabaseConfig {
        url: "postgres://localhost/x".into(),
        max_connections: 7,
        min_connections: 1,
        connect_timeout_secs: 3,
        idle_timeout_secs: 4,
        max_lifetime_secs: 5,
        acquire_timeout_secs: 6,
        sqlx_logging: true,
    };
    let cfg = DatabaseConfig::from(&app);
    assert_eq!(cfg.url, "postgres://localhost/x");
    assert_eq!(cfg.max_connections, 7);
    assert_eq!(cfg.acquire_timeout, Duration::from_secs(6));
    assert_eq!(cfg.max_lifetime, Duration::from_secs(5));
    assert!(cfg.sqlx_logging);
}

/// Test basic database connection
#[tokio::test]
async fn test_basic_connection() -> Result<()> {
    let Some(db) = setup_test_db().await else { return Ok(()) };

    let stmt = Statement::from_string(DatabaseBackend::Postgres, "SELECT 1 as test".to_string());
    let row = db.query_one(stmt).await?.expect("one row");
    let test_value: i32 = row.try_get("", "test")?;
    assert_eq!(test_value, 1);
    test_connection(&db).await?;
    Ok(())
}

/// Test connection with custom configuration
#[tokio::test]
async fn test_custom_config_connection() -> Result<()> {
    if setup_test_db().await.is_none() {
        return Ok(());
    }
    let config = DatabaseConfig {
        url: DATABASE_URL.clone(),
        max_connections: 5,
        min_connections: 1,
        connect_timeout: Duration::from_secs(10),
        ..Default::default()
    };
    let db = connect_with_config(&config).await?;
    let stmt = Statement::from_string(DatabaseBackend::Postgres, "SELECT current_database()".to_string());
    assert!(db.query_one(stmt).await?.is_some());
    Ok(())
}

/// Default categories are seeded by the migrator
#[tokio::test]
async fn test_seeded_categories() -> Result<()> {
    use sea_orm::{ColumnTrait, EntityTrait, QueryFilter};
    let Some(db) = setup_test_db().await else { return Ok(()) };
    for name in ["Strategy", "Family", "Party", "Adventure", "Puzzle", "Educational", "Other"] {
        let found = crate::category::Entity::find()
            .filter(crate::category::Column::Name.eq(name))
            .one(&db)
            .await?;
        assert!(found.is_some(), "missing seeded category {name}");
    }
    Ok(())
}
