use serde::{Deserialize, Deserializer};
use sea_orm::{DbErr, SqlErr};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("validation error: {0}")]
    Validation(String),
    #[error("database error: {0}")]
    Db(String),
    #[error("conflict: {0}")]
    Conflict(String),
}

impl ModelError {
    /// Map a database error, turning unique violations into `Conflict` with
    /// the given message.
    pub fn from_db(e: DbErr, conflict_msg: &str) -> Self {
        match e.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(_)) => ModelError::Conflict(conflict_msg.to_string()),
            _ => ModelError::Db(e.to_string()),
        }
    }
}

impl From<DbErr> for ModelError {
    fn from(e: DbErr) -> Self {
        ModelError::Db(e.to_string())
    }
}

/// Width of the `varchar` URL columns.
pub const MAX_URL_LEN: usize = 512;

/// Required text field: non-blank after trim and at most `max` characters.
pub(crate) fn required_text(field: &str, value: &str, max: usize) -> Result<(), ModelError> {
    if value.trim().is_empty() {
        return Err(ModelError::Validation(format!("{field} is required")));
    }
    max_len(field, value, max)
}

pub(crate) fn max_len(field: &str, value: &str, max: usize) -> Result<(), ModelError> {
    if value.trim().chars().count() > max {
        return Err(ModelError::Validation(format!("{field} must be at most {max} characters")));
    }
    Ok(())
}

/// Blank optional strings are stored as NULL.
pub(crate) fn non_blank(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

/// Lets a partial update tell "field absent" (`None`) from an explicit
/// `null` (`Some(None)`), which clears a nullable column.
pub(crate) fn double_option<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Some(Option::deserialize(deserializer)?))
}
