use sea_orm::{entity::prelude::*, Set, DatabaseConnection};
use uuid::Uuid;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::errors::{self, ModelError};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "profile")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub email: String,
    pub full_name: String,
    pub avatar_url: Option<String>,
    pub bio: Option<String>,
    pub role: String,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn role(&self) -> Role {
        Role::parse(&self.role).unwrap_or(Role::User)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Admin => "admin",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "user" => Some(Role::User),
            "admin" => Some(Role::Admin),
            _ => None,
        }
    }
}

pub fn validate_email(email: &str) -> Result<(), ModelError> {
    let email = email.trim();
    let valid = match email.split_once('@') {
        Some((local, domain)) => !local.is_empty() && !domain.is_empty() && !domain.contains('@'),
        None => false,
    };
    if !valid {
        return Err(ModelError::Validation("invalid email".into()));
    }
    errors::max_len("email", email, 255)
}

pub fn validate_name(name: &str) -> Result<(), ModelError> {
    errors::required_text("full_name", name, 128)
}

pub async fn create<C: ConnectionTrait>(db: &C, email: &str, full_name: &str, role: Role) -> Result<Model, ModelError> {
    validate_email(email)?;
    validate_name(full_name)?;
    let now = Utc::now().into();
    let am = ActiveModel {
        id: Set(Uuid::new_v4()),
        email: Set(email.trim().to_lowercase()),
        full_name: Set(full_name.trim().to_string()),
        avatar_url: Set(None),
        bio: Set(None),
        role: Set(role.as_str().to_string()),
        created_at: Set(now),
        updated_at: Set(now),
    };
    am.insert(db).await.map_err(|e| ModelError::from_db(e, "email already registered"))
}

/// Editable profile fields; `role` is only honored for admin callers.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfileChanges {
    pub full_name: Option<String>,
    pub avatar_url: Option<String>,
    pub bio: Option<String>,
    pub role: Option<Role>,
}

pub fn validate_changes(changes: &ProfileChanges) -> Result<(), ModelError> {
    if let Some(name) = &changes.full_name {
        validate_name(name)?;
    }
    if let Some(bio) = &changes.bio {
        errors::max_len("bio", bio, 500)?;
    }
    if let Some(url) = &changes.avatar_url {
        errors::max_len("avatar_url", url, errors::MAX_URL_LEN)?;
    }
    Ok(())
}

pub async fn update(db: &DatabaseConnection, id: Uuid, changes: ProfileChanges) -> Result<Model, ModelError> {
    validate_changes(&changes)?;
    let mut am: ActiveModel = Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| ModelError::Validation("user not found".into()))?
        .into();
    if let Some(name) = changes.full_name {
        am.full_name = Set(name.trim().to_string());
    }
    if changes.avatar_url.is_some() {
        am.avatar_url = Set(errors::non_blank(changes.avatar_url));
    }
    if changes.bio.is_some() {
        am.bio = Set(errors::non_blank(changes.bio));
    }
    if let Some(role) = changes.role {
        am.role = Set(role.as_str().to_string());
    }
    am.updated_at = Set(Utc::now().into());
    Ok(am.update(db).await?)
}

/// Returns whether a row was removed. Reviews, wishlist entries and
/// credentials go with it through cascading keys.
pub async fn delete(db: &DatabaseConnection, id: Uuid) -> Result<bool, ModelError> {
    let res = Entity::delete_by_id(id).exec(db).await?;
    Ok(res.rows_affected > 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_rules() {
        assert!(validate_email("a@b.com").is_ok());
        assert!(validate_email("nope").is_err());
        assert!(validate_email("@b.com").is_err());
        assert!(validate_email("a@").is_err());
    }

    #[test]
    fn role_parse_round_trips() {
        assert_eq!(Role::parse("ADMIN"), Some(Role::Admin));
        assert_eq!(Role::parse("user"), Some(Role::User));
        assert_eq!(Role::parse("root"), None);
        assert_eq!(Role::Admin.as_str(), "admin");
    }

    #[test]
    fn bio_is_capped() {
        let long = ProfileChanges { bio: Some("b".repeat(501)), ..Default::default() };
        assert!(validate_changes(&long).is_err());
        let blank_name = ProfileChanges { full_name: Some(" ".into()), ..Default::default() };
        assert!(validate_changes(&blank_name).is_err());
    }

    #[test]
    fn avatar_url_fits_the_column() {
        let long = ProfileChanges { avatar_url: Some(format!("https://img.example.com/{}", "x".repeat(520))), ..Default::default() };
        assert!(matches!(validate_changes(&long), Err(ModelError::Validation(_))));
        let fine = ProfileChanges { avatar_url: Some("https://img.example.com/me.png".into()), ..Default::default() };
        assert!(validate_changes(&fine).is_ok());
    }
}
