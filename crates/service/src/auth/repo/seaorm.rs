use sea_orm::{DatabaseConnection, EntityTrait, ColumnTrait, QueryFilter, TransactionTrait};
use uuid::Uuid;

use models::errors::ModelError;
use models::profile::{self, Role};

use crate::auth::domain::{AuthUser, Credentials};
use crate::auth::errors::AuthError;
use crate::auth::repository::AuthRepository;

pub struct SeaOrmAuthRepository {
    pub db: DatabaseConnection,
}

fn to_user(p: profile::Model) -> AuthUser {
    let role = p.role();
    AuthUser { id: p.id, email: p.email, full_name: p.full_name, role }
}

#[async_trait::async_trait]
impl AuthRepository for SeaOrmAuthRepository {
    async fn find_user_by_email(&self, email: &str) -> Result<Option<AuthUser>, AuthError> {
        let res = profile::Entity::find()
            .filter(profile::Column::Email.eq(email.trim().to_lowercase()))
            .one(&self.db)
            .await
            .map_err(|e| AuthError::Repository(e.to_string()))?;
        Ok(res.map(to_user))
    }

    async fn find_user_by_id(&self, id: Uuid) -> Result<Option<AuthUser>, AuthError> {
        let res = profile::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| AuthError::Repository(e.to_string()))?;
        Ok(res.map(to_user))
    }

    async fn create_user(&self, email: &str, full_name: &str, role: Role, password: Credentials) -> Result<AuthUser, AuthError> {
        let txn = self.db.begin().await.map_err(ModelError::from)?;
        let created = profile::create(&txn, email, full_name, role).await?;
        models::user_credentials::upsert_password(&txn, created.id, password.password_hash, &password.password_algorithm).await?;
        txn.commit().await.map_err(ModelError::from)?;
        Ok(to_user(created))
    }

    async fn get_credentials(&self, user_id: Uuid) -> Result<Option<Credentials>, AuthError> {
        let res = models::user_credentials::find_for_user(&self.db, user_id).await?;
        Ok(res.map(|c| Credentials { user_id: c.user_id, password_hash: c.password_hash, password_algorithm: c.password_algorithm }))
    }
}
