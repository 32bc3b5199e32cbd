use std::sync::Arc;

use argon2::{Argon2, password_hash::{PasswordHasher, PasswordVerifier, SaltString}, PasswordHash};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header as JwtHeader, Validation};
use rand::rngs::OsRng;
use uuid::Uuid;
use tracing::{info, debug, instrument};

use models::profile::{self, Role};

use super::domain::{AuthSession, AuthUser, Claims, Credentials, LoginInput, RegisterInput};
use super::errors::AuthError;
use super::repository::AuthRepository;

/// Minimum password length accepted at registration.
pub const MIN_PASSWORD_LEN: usize = 8;

/// Auth service configuration
#[derive(Clone, Debug)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub password_algorithm: String,
    pub token_ttl_hours: i64,
    /// Lowercased emails that register as admins.
    pub admin_emails: Vec<String>,
}

impl AuthConfig {
    pub fn from_app(cfg: &configs::AuthConfig) -> Self {
        Self {
            jwt_secret: cfg.jwt_secret.clone(),
            password_algorithm: "argon2".into(),
            token_ttl_hours: cfg.token_ttl_hours,
            admin_emails: cfg.admin_emails.clone(),
        }
    }

    fn role_for(&self, email: &str) -> Role {
        let email = email.trim().to_lowercase();
        if self.admin_emails.iter().any(|e| *e == email) { Role::Admin } else { Role::User }
    }
}

/// Decode and validate a session token signed with `secret`.
pub fn verify_token(secret: &str, token: &str) -> Result<Claims, AuthError> {
    let data = decode::<Claims>(token, &DecodingKey::from_secret(secret.as_bytes()), &Validation::default())
        .map_err(|e| AuthError::TokenError(e.to_string()))?;
    Ok(data.claims)
}

/// Auth business service independent of web framework
pub struct AuthService<R: AuthRepository> {
    repo: Arc<R>,
    cfg: AuthConfig,
}

impl<R: AuthRepository> AuthService<R> {
    pub fn new(repo: Arc<R>, cfg: AuthConfig) -> Self { Self { repo, cfg } }

    /// Register a new user with a hashed password.
    ///
    /// # Examples
    /// ```
    /// use service::auth::{service::{AuthService, AuthConfig}, repository::mock::MockAuthRepository};
    /// use service::auth::domain::RegisterInput;
    /// use std::sync::Arc;
    /// let repo = Arc::new(MockAuthRepository::default());
    /// let cfg = AuthConfig { jwt_secret: "secret".into(), password_algorithm: "argon2".into(), token_ttl_hours: 12, admin_emails: vec![] };
    /// let svc = AuthService::new(repo, cfg);
    /// let input = RegisterInput { email: "user@example.com".into(), full_name: "Test".into(), password: "Secret123".into() };
    /// let user = tokio_test::block_on(svc.register(input)).unwrap();
    /// assert_eq!(user.email, "user@example.com");
    /// ```
    #[instrument(skip(self, input), fields(email = %input.email))]
    pub async fn register(&self, input: RegisterInput) -> Result<AuthUser, AuthError> {
        profile::validate_email(&input.email)?;
        profile::validate_name(&input.full_name)?;
        if input.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(AuthError::Validation(format!("password too short (>={MIN_PASSWORD_LEN})")));
        }
        if let Some(existing) = self.repo.find_user_by_email(&input.email).await? {
            debug!("user exists: {}", existing.email);
            return Err(AuthError::Conflict);
        }

        let salt = SaltString::generate(&mut OsRng);
        let hash = Argon2::default()
            .hash_password(input.password.as_bytes(), &salt)
            .map_err(|e| AuthError::HashError(e.to_string()))?
            .to_string();
        let password = Credentials { user_id: Uuid::nil(), password_hash: hash, password_algorithm: self.cfg.password_algorithm.clone() };

        let role = self.cfg.role_for(&input.email);
        let user = self.repo.create_user(&input.email, &input.full_name, role, password).await?;
        info!(user_id = %user.id, email = %user.email, role = user.role.as_str(), "user_registered");
        Ok(user)
    }

    /// Authenticate a user and issue a session token.
    ///
    /// # Examples
    /// ```
    /// use service::auth::{service::{AuthService, AuthConfig}, repository::mock::MockAuthRepository};
    /// use service::auth::domain::{RegisterInput, LoginInput};
    /// use std::sync::Arc;
    /// let repo = Arc::new(MockAuthRepository::default());
    /// let cfg = AuthConfig { jwt_secret: "secret".into(), password_algorithm: "argon2".into(), token_ttl_hours: 12, admin_emails: vec![] };
    /// let svc = AuthService::new(repo.clone(), cfg);
    /// let _ = tokio_test::block_on(svc.register(RegisterInput { email: "u@e.com".into(), full_name: "N".into(), password: "Passw0rd".into() }));
    /// let session = tokio_test::block_on(svc.login(LoginInput { email: "u@e.com".into(), password: "Passw0rd".into() })).unwrap();
    /// assert_eq!(session.user.email, "u@e.com");
    /// assert!(!session.token.is_empty());
    /// ```
    #[instrument(skip(self, input), fields(email = %input.email))]
    pub async fn login(&self, input: LoginInput) -> Result<AuthSession, AuthError> {
        let user = self.repo
            .find_user_by_email(&input.email)
            .await?
            .ok_or(AuthError::Unauthorized)?;

        let cred = self.repo
            .get_credentials(user.id)
            .await?
            .ok_or(AuthError::Unauthorized)?;

        let parsed = PasswordHash::new(&cred.password_hash).map_err(|e| AuthError::HashError(e.to_string()))?;
        if Argon2::default().verify_password(input.password.as_bytes(), &parsed).is_err() {
            return Err(AuthError::Unauthorized);
        }

        let token = self.issue_token(&user)?;
        info!(user_id = %user.id, "user_logged_in");
        Ok(AuthSession { user, token })
    }

    /// Sign an HS256 token for `user` valid for the configured ttl.
    pub fn issue_token(&self, user: &AuthUser) -> Result<String, AuthError> {
        let exp = (chrono::Utc::now() + chrono::Duration::hours(self.cfg.token_ttl_hours)).timestamp().max(0) as usize;
        let claims = Claims { sub: user.id.to_string(), email: user.email.clone(), role: user.role, exp };
        encode(&JwtHeader::default(), &claims, &EncodingKey::from_secret(self.cfg.jwt_secret.as_bytes()))
            .map_err(|e| AuthError::TokenError(e.to_string()))
    }

    pub fn verify_token(&self, token: &str) -> Result<Claims, AuthError> {
        verify_token(&self.cfg.jwt_secret, token)
    }

    /// The user a token belongs to, if it still exists.
    pub async fn current_user(&self, claims: &Claims) -> Result<AuthUser, AuthError> {
        let id = claims.user_id().ok_or(AuthError::Unauthorized)?;
        self.repo.find_user_by_id(id).await?.ok_or(AuthError::NotFound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::repository::mock::MockAuthRepository;

    fn svc() -> AuthService<MockAuthRepository> {
        let cfg = AuthConfig {
            jwt_secret: "test-secret".into(),
            password_algorithm: "argon2".into(),
            token_ttl_hours: 1,
            admin_emails: vec!["boss@example.com".into()],
        };
        AuthService::new(Arc::new(MockAuthRepository::default()), cfg)
    }

    fn register_input(email: &str, password: &str) -> RegisterInput {
        RegisterInput { email: email.into(), password: password.into(), full_name: "Tester".into() }
    }

    #[tokio::test]
    async fn register_validates_and_rejects_duplicates() {
        let svc = svc();
        assert!(matches!(svc.register(register_input("bad-email", "Password1")).await, Err(AuthError::Validation(_))));
        assert!(matches!(svc.register(register_input("a@b.com", "short")).await, Err(AuthError::Validation(_))));
        let user = svc.register(register_input("a@b.com", "Password1")).await.unwrap();
        assert_eq!(user.role, Role::User);
        assert!(matches!(svc.register(register_input("A@B.com", "Password1")).await, Err(AuthError::Conflict)));
    }

    #[tokio::test]
    async fn register_stores_a_verifiable_hash_with_the_user() {
        let svc = svc();
        let user = svc.register(register_input("h@e.com", "Password1")).await.unwrap();
        let creds = svc.repo.get_credentials(user.id).await.unwrap().expect("credentials stored");
        assert_eq!(creds.user_id, user.id);
        assert_eq!(creds.password_algorithm, "argon2");
        let parsed = PasswordHash::new(&creds.password_hash).unwrap();
        assert!(Argon2::default().verify_password(b"Password1", &parsed).is_ok());
    }

    #[tokio::test]
    async fn admin_emails_get_admin_role() {
        let svc = svc();
        let user = svc.register(register_input("Boss@Example.com", "Password1")).await.unwrap();
        assert_eq!(user.role, Role::Admin);
    }

    #[tokio::test]
    async fn login_issues_verifiable_token() {
        let svc = svc();
        let user = svc.register(register_input("c@d.com", "Password1")).await.unwrap();
        let session = svc.login(LoginInput { email: "c@d.com".into(), password: "Password1".into() }).await.unwrap();
        let claims = svc.verify_token(&session.token).unwrap();
        assert_eq!(claims.user_id(), Some(user.id));
        assert_eq!(claims.email, "c@d.com");
        assert!(!claims.is_admin());
        assert_eq!(svc.current_user(&claims).await.unwrap().id, user.id);

        assert!(matches!(
            svc.login(LoginInput { email: "c@d.com".into(), password: "wrong-pass".into() }).await,
            Err(AuthError::Unauthorized)
        ));
        assert!(matches!(
            svc.login(LoginInput { email: "nobody@d.com".into(), password: "Password1".into() }).await,
            Err(AuthError::Unauthorized)
        ));
    }

    #[test]
    fn tampered_or_foreign_tokens_are_rejected() {
        assert!(verify_token("test-secret", "not-a-token").is_err());
        let other = AuthService::new(
            Arc::new(MockAuthRepository::default()),
            AuthConfig { jwt_secret: "other".into(), password_algorithm: "argon2".into(), token_ttl_hours: 1, admin_emails: vec![] },
        );
        let user = AuthUser { id: uuid::Uuid::new_v4(), email: "x@y.z".into(), full_name: "X".into(), role: Role::Admin };
        let token = other.issue_token(&user).unwrap();
        assert!(verify_token("test-secret", &token).is_err());
        assert!(verify_token("other", &token).unwrap().is_admin());
    }
}
