use std::sync::Arc;

use sea_orm::DatabaseConnection;

use configs::AppConfig;
use service::auth::repo::SeaOrmAuthRepository;
use service::auth::service::{AuthConfig, AuthService};
use service::catalog::repository::SeaOrmCatalogRepository;
use service::catalog::CatalogService;

/// Shared router state; cheap to clone.
#[derive(Clone)]
pub struct ServerState {
    pub db: DatabaseConnection,
    pub config: Arc<AppConfig>,
    pub catalog: Arc<CatalogService<SeaOrmCatalogRepository>>,
    pub auth: Arc<AuthService<SeaOrmAuthRepository>>,
}

impl ServerState {
    pub fn new(db: DatabaseConnection, config: AppConfig) -> Self {
        let catalog = CatalogService::new(
            Arc::new(SeaOrmCatalogRepository { db: db.clone() }),
            config.catalog.clone(),
        );
        let auth = AuthService::new(
            Arc::new(SeaOrmAuthRepository { db: db.clone() }),
            AuthConfig::from_app(&config.auth),
        );
        Self { db, config: Arc::new(config), catalog: Arc::new(catalog), auth: Arc::new(auth) }
    }
}
