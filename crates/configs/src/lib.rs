use anyhow::Result;
use serde::Deserialize;
use anyhow::anyhow;
use tracing::warn;

pub const DEV_JWT_SECRET: &str = "dev-secret-change-me";

#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub catalog: CatalogConfig,
    #[serde(default)]
    pub reviews: ReviewsConfig,
    #[serde(default)]
    pub users: UsersConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    #[serde(default)]
    pub worker_threads: Option<usize>,
    #[serde(default = "default_static_dir")]
    pub static_dir: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { host: "127.0.0.1".into(), port: 8080, worker_threads: Some(4), static_dir: default_static_dir() }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default)]
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
    #[serde(default = "default_idle_timeout")]
    pub idle_timeout_secs: u64,
    #[serde(default = "default_max_lifetime")]
    pub max_lifetime_secs: u64,
    #[serde(default = "default_acquire_timeout")]
    pub acquire_timeout_secs: u64,
    #[serde(default)]
    pub sqlx_logging: bool,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            max_connections: default_max_connections(),
            min_connections: default_min_connections(),
            connect_timeout_secs: default_connect_timeout(),
            idle_timeout_secs: default_idle_timeout(),
            max_lifetime_secs: default_max_lifetime(),
            acquire_timeout_secs: default_acquire_timeout(),
            sqlx_logging: false,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    #[serde(default)]
    pub jwt_secret: String,
    #[serde(default = "default_token_ttl_hours")]
    pub token_ttl_hours: i64,
    /// Emails that receive the admin role on registration.
    #[serde(default)]
    pub admin_emails: Vec<String>,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self { jwt_secret: String::new(), token_ttl_hours: default_token_ttl_hours(), admin_emails: Vec::new() }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CatalogConfig {
    #[serde(default = "default_catalog_page_size")]
    pub page_size: u32,
    #[serde(default = "default_featured_limit")]
    pub featured_limit: u64,
    #[serde(default = "default_similar_limit")]
    pub similar_limit: u64,
    #[serde(default = "default_suggestion_limit")]
    pub suggestion_limit: usize,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            page_size: default_catalog_page_size(),
            featured_limit: default_featured_limit(),
            similar_limit: default_similar_limit(),
            suggestion_limit: default_suggestion_limit(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReviewsConfig {
    #[serde(default = "default_reviews_page_size")]
    pub page_size: u32,
    #[serde(default = "default_true")]
    pub auto_approve: bool,
    #[serde(default = "default_recent_limit")]
    pub recent_limit: u64,
}

impl Default for ReviewsConfig {
    fn default() -> Self {
        Self { page_size: default_reviews_page_size(), auto_approve: true, recent_limit: default_recent_limit() }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct UsersConfig {
    #[serde(default = "default_users_page_size")]
    pub page_size: u32,
}

impl Default for UsersConfig {
    fn default() -> Self { Self { page_size: default_users_page_size() } }
}

fn default_static_dir() -> String { "frontend".into() }
fn default_max_connections() -> u32 { 10 }
fn default_min_connections() -> u32 { 2 }
fn default_connect_timeout() -> u64 { 30 }
fn default_idle_timeout() -> u64 { 600 }
fn default_max_lifetime() -> u64 { 3600 }
fn default_acquire_timeout() -> u64 { 30 }
fn default_token_ttl_hours() -> i64 { 12 }
fn default_catalog_page_size() -> u32 { 9 }
fn default_featured_limit() -> u64 { 6 }
fn default_similar_limit() -> u64 { 3 }
fn default_suggestion_limit() -> usize { 5 }
fn default_reviews_page_size() -> u32 { 10 }
fn default_recent_limit() -> u64 { 6 }
fn default_users_page_size() -> u32 { 10 }
fn default_true() -> bool { true }

pub fn load_default() -> Result<AppConfig> {
    let path = std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
    load_from_file(&path)
}

pub fn load_from_file(path: &str) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path)?;
    parse(&content)
}

pub fn parse(content: &str) -> Result<AppConfig> {
    let cfg: AppConfig = toml::from_str(content)?;
    Ok(cfg)
}

impl AppConfig {
    pub fn load_and_validate() -> Result<Self> {
        let mut cfg = load_default()?;
        cfg.normalize_and_validate()?;
        Ok(cfg)
    }

    /// Config file when present, otherwise environment variables; validated
    /// either way. A config file that exists but fails to parse is an error.
    pub fn load_or_env() -> Result<Self> {
        let path = std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
        let mut cfg = if std::path::Path::new(&path).exists() {
            load_from_file(&path)?
        } else {
            warn!(%path, "config file not found; using environment variables");
            AppConfig::from_env()
        };
        cfg.normalize_and_validate()?;
        Ok(cfg)
    }

    /// Configuration assembled from environment variables only, used when no
    /// config file is present.
    pub fn from_env() -> Self {
        let mut cfg = AppConfig::default();
        if let Ok(host) = std::env::var("SERVER_HOST") {
            cfg.server.host = host;
        }
        if let Some(port) = std::env::var("SERVER_PORT").ok().and_then(|p| p.parse::<u16>().ok()) {
            cfg.server.port = port;
        }
        cfg
    }

    pub fn normalize_and_validate(&mut self) -> Result<()> {
        self.server.normalize()?;
        // DATABASE_URL may fill in a missing url
        self.database.normalize_from_env();
        self.database.validate()?;
        self.auth.normalize_from_env();
        self.auth.validate()?;
        self.catalog.validate()?;
        if self.reviews.page_size == 0 || self.users.page_size == 0 {
            return Err(anyhow!("page_size must be >= 1"));
        }
        Ok(())
    }
}

impl ServerConfig {
    fn normalize(&mut self) -> Result<()> {
        if self.host.trim().is_empty() {
            self.host = "127.0.0.1".to_string();
        }
        if self.port == 0 {
            return Err(anyhow!("server.port must be in 1..=65535"));
        }
        match self.worker_threads {
            Some(w) if w > 0 => {}
            _ => self.worker_threads = Some(4),
        }
        if self.static_dir.trim().is_empty() {
            self.static_dir = default_static_dir();
        }
        Ok(())
    }
}

impl DatabaseConfig {
    pub fn normalize_from_env(&mut self) {
        if self.url.trim().is_empty() {
            if let Ok(url) = std::env::var("DATABASE_URL") {
                self.url = url;
            }
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.url.trim().is_empty() {
            return Err(anyhow!("database.url is empty; set it in config.toml or DATABASE_URL"));
        }
        let lower = self.url.to_lowercase();
        if !(lower.starts_with("postgresql://") || lower.starts_with("postgres://")) {
            return Err(anyhow!("database.url must start with postgresql:// or postgres://"));
        }
        if self.min_connections == 0 {
            return Err(anyhow!("database.min_connections must be >= 1"));
        }
        if self.max_connections < self.min_connections {
            return Err(anyhow!("database.max_connections must be >= min_connections"));
        }
        if self.connect_timeout_secs == 0 || self.acquire_timeout_secs == 0 {
            return Err(anyhow!("database timeouts must be positive seconds"));
        }
        Ok(())
    }
}

impl AuthConfig {
    pub fn normalize_from_env(&mut self) {
        if self.jwt_secret.trim().is_empty() {
            match std::env::var("JWT_SECRET") {
                Ok(secret) if !secret.trim().is_empty() => self.jwt_secret = secret,
                _ => {
                    warn!("JWT_SECRET not configured; using development secret");
                    self.jwt_secret = DEV_JWT_SECRET.to_string();
                }
            }
        }
        if self.admin_emails.is_empty() {
            if let Ok(list) = std::env::var("ADMIN_EMAILS") {
                self.admin_emails = parse_email_list(&list);
            }
        }
        self.admin_emails = self.admin_emails.iter().map(|e| e.trim().to_lowercase()).filter(|e| !e.is_empty()).collect();
    }

    pub fn validate(&self) -> Result<()> {
        if self.token_ttl_hours <= 0 {
            return Err(anyhow!("auth.token_ttl_hours must be positive"));
        }
        Ok(())
    }
}

impl CatalogConfig {
    fn validate(&self) -> Result<()> {
        if self.page_size == 0 {
            return Err(anyhow!("catalog.page_size must be >= 1"));
        }
        Ok(())
    }
}

/// Split a comma separated email list, dropping blanks.
pub fn parse_email_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty())
        .collect()
}
