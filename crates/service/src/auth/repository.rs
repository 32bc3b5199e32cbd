use async_trait::async_trait;
use uuid::Uuid;

use models::profile::Role;

use super::domain::{AuthUser, Credentials};
use super::errors::AuthError;

/// Repository abstraction for auth-related persistence.
#[async_trait]
pub trait AuthRepository: Send + Sync {
    async fn find_user_by_email(&self, email: &str) -> Result<Option<AuthUser>, AuthError>;
    async fn find_user_by_id(&self, id: Uuid) -> Result<Option<AuthUser>, AuthError>;
    /// Store the profile and its password hash together; neither is kept
    /// when the other fails.
    async fn create_user(&self, email: &str, full_name: &str, role: Role, password: Credentials) -> Result<AuthUser, AuthError>;

    async fn get_credentials(&self, user_id: Uuid) -> Result<Option<Credentials>, AuthError>;
}

/// Simple in-memory mock repository for tests and doc examples
pub mod mock {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    #[derive(Default)]
    pub struct MockAuthRepository {
        users: Mutex<HashMap<String, AuthUser>>, // key: lowercased email
        creds: Mutex<HashMap<Uuid, Credentials>>, // key: user_id
    }

    #[async_trait]
    impl AuthRepository for MockAuthRepository {
        async fn find_user_by_email(&self, email: &str) -> Result<Option<AuthUser>, AuthError> {
            let users = self.users.lock().unwrap();
            Ok(users.get(&email.trim().to_lowercase()).cloned())
        }

        async fn find_user_by_id(&self, id: Uuid) -> Result<Option<AuthUser>, AuthError> {
            let users = self.users.lock().unwrap();
            Ok(users.values().find(|u| u.id == id).cloned())
        }

        async fn create_user(&self, email: &str, full_name: &str, role: Role, password: Credentials) -> Result<AuthUser, AuthError> {
            let key = email.trim().to_lowercase();
            let mut users = self.users.lock().unwrap();
            if users.contains_key(&key) {
                return Err(AuthError::Conflict);
            }
            if password.password_hash.trim().is_empty() {
                return Err(AuthError::Validation("password hash required".into()));
            }
            let user = AuthUser { id: Uuid::new_v4(), email: key.clone(), full_name: full_name.trim().to_string(), role };
            self.creds.lock().unwrap().insert(user.id, Credentials { user_id: user.id, ..password });
            users.insert(key, user.clone());
            Ok(user)
        }

        async fn get_credentials(&self, user_id: Uuid) -> Result<Option<Credentials>, AuthError> {
            let creds = self.creds.lock().unwrap();
            Ok(creds.get(&user_id).cloned())
        }
    }
}
