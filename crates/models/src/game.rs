use sea_orm::{entity::prelude::*, DatabaseConnection, FromQueryResult, JoinType, QuerySelect, Set};
use uuid::Uuid;
use chrono::{Datelike, Utc};
use serde::{Deserialize, Serialize};

use crate::category;
use crate::errors::{self, ModelError};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "game")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub short_description: Option<String>,
    pub publisher: Option<String>,
    pub designer: Option<String>,
    pub year_published: Option<i32>,
    pub min_players: i32,
    pub max_players: i32,
    pub min_age: Option<i32>,
    pub playing_time: i32,
    pub complexity_rating: Option<f64>,
    pub price: Option<f64>,
    pub image_url: Option<String>,
    pub thumbnail_url: Option<String>,
    pub category_id: Option<Uuid>,
    pub is_active: bool,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation { Category }

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Category => Entity::belongs_to(category::Entity)
                .from(Column::CategoryId)
                .to(category::Column::Id)
                .into(),
        }
    }
}

impl Related<category::Entity> for Entity {
    fn to() -> RelationDef { Relation::Category.def() }
}

impl ActiveModelBehavior for ActiveModel {}

/// A game row joined with its category name.
#[derive(Clone, Debug, PartialEq, FromQueryResult, Serialize, Deserialize)]
pub struct GameRow {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub short_description: Option<String>,
    pub publisher: Option<String>,
    pub designer: Option<String>,
    pub year_published: Option<i32>,
    pub min_players: i32,
    pub max_players: i32,
    pub min_age: Option<i32>,
    pub playing_time: i32,
    pub complexity_rating: Option<f64>,
    pub price: Option<f64>,
    pub image_url: Option<String>,
    pub thumbnail_url: Option<String>,
    pub category_id: Option<Uuid>,
    pub is_active: bool,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
    pub category_name: Option<String>,
}

impl GameRow {
    pub fn from_model(m: Model, category_name: Option<String>) -> Self {
        Self {
            id: m.id,
            title: m.title,
            description: m.description,
            short_description: m.short_description,
            publisher: m.publisher,
            designer: m.designer,
            year_published: m.year_published,
            min_players: m.min_players,
            max_players: m.max_players,
            min_age: m.min_age,
            playing_time: m.playing_time,
            complexity_rating: m.complexity_rating,
            price: m.price,
            image_url: m.image_url,
            thumbnail_url: m.thumbnail_url,
            category_id: m.category_id,
            is_active: m.is_active,
            created_at: m.created_at,
            updated_at: m.updated_at,
            category_name,
        }
    }
}

/// `game` left-joined with `category`, selecting every game column plus
/// `category_name`.
pub fn with_category() -> Select<Entity> {
    Entity::find()
        .join(JoinType::LeftJoin, Relation::Category.def())
        .column_as(category::Column::Name, "category_name")
}

/// Fields accepted when creating a game.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct GameInput {
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub short_description: Option<String>,
    #[serde(default)]
    pub publisher: Option<String>,
    #[serde(default)]
    pub designer: Option<String>,
    #[serde(default)]
    pub year_published: Option<i32>,
    pub min_players: i32,
    pub max_players: i32,
    #[serde(default)]
    pub min_age: Option<i32>,
    pub playing_time: i32,
    #[serde(default)]
    pub complexity_rating: Option<f64>,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub thumbnail_url: Option<String>,
    #[serde(default)]
    pub category_id: Option<Uuid>,
    #[serde(default)]
    pub is_active: Option<bool>,
}

/// Partial update; absent fields keep their current value, an explicit
/// `null` clears a nullable one.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct GameChanges {
    pub title: Option<String>,
    pub description: Option<String>,
    #[serde(default, deserialize_with = "errors::double_option")]
    pub short_description: Option<Option<String>>,
    #[serde(default, deserialize_with = "errors::double_option")]
    pub publisher: Option<Option<String>>,
    #[serde(default, deserialize_with = "errors::double_option")]
    pub designer: Option<Option<String>>,
    #[serde(default, deserialize_with = "errors::double_option")]
    pub year_published: Option<Option<i32>>,
    pub min_players: Option<i32>,
    pub max_players: Option<i32>,
    #[serde(default, deserialize_with = "errors::double_option")]
    pub min_age: Option<Option<i32>>,
    pub playing_time: Option<i32>,
    #[serde(default, deserialize_with = "errors::double_option")]
    pub complexity_rating: Option<Option<f64>>,
    #[serde(default, deserialize_with = "errors::double_option")]
    pub price: Option<Option<f64>>,
    #[serde(default, deserialize_with = "errors::double_option")]
    pub image_url: Option<Option<String>>,
    #[serde(default, deserialize_with = "errors::double_option")]
    pub thumbnail_url: Option<Option<String>>,
    #[serde(default, deserialize_with = "errors::double_option")]
    pub category_id: Option<Option<Uuid>>,
    pub is_active: Option<bool>,
}

impl GameInput {
    /// The state a game would have after applying `changes`.
    pub fn merged(existing: &Model, changes: &GameChanges) -> Self {
        let c = changes.clone();
        Self {
            title: c.title.unwrap_or_else(|| existing.title.clone()),
            description: c.description.unwrap_or_else(|| existing.description.clone()),
            short_description: keep_or_set(c.short_description, &existing.short_description),
            publisher: keep_or_set(c.publisher, &existing.publisher),
            designer: keep_or_set(c.designer, &existing.designer),
            year_published: keep_or_set(c.year_published, &existing.year_published),
            min_players: c.min_players.unwrap_or(existing.min_players),
            max_players: c.max_players.unwrap_or(existing.max_players),
            min_age: keep_or_set(c.min_age, &existing.min_age),
            playing_time: c.playing_time.unwrap_or(existing.playing_time),
            complexity_rating: keep_or_set(c.complexity_rating, &existing.complexity_rating),
            price: keep_or_set(c.price, &existing.price),
            image_url: keep_or_set(c.image_url, &existing.image_url),
            thumbnail_url: keep_or_set(c.thumbnail_url, &existing.thumbnail_url),
            category_id: keep_or_set(c.category_id, &existing.category_id),
            is_active: Some(c.is_active.unwrap_or(existing.is_active)),
        }
    }
}

fn keep_or_set<T: Clone>(change: Option<Option<T>>, current: &Option<T>) -> Option<T> {
    change.unwrap_or_else(|| current.clone())
}

fn validate_image_url(field: &str, url: &Option<String>) -> Result<(), ModelError> {
    if let Some(u) = url {
        errors::max_len(field, u, errors::MAX_URL_LEN)?;
    }
    match url.as_deref().map(str::trim) {
        None | Some("") => Ok(()),
        Some(u) if u.starts_with("http://") || u.starts_with("https://") || u.starts_with('/') => Ok(()),
        Some(_) => Err(ModelError::Validation(format!("{field} must be an http(s) URL or an absolute path"))),
    }
}

pub fn validate(input: &GameInput) -> Result<(), ModelError> {
    validate_for_year(input, Utc::now().year())
}

/// Game rules, with `current_year` bounding `year_published`.
pub fn validate_for_year(input: &GameInput, current_year: i32) -> Result<(), ModelError> {
    errors::required_text("title", &input.title, 100)?;
    errors::required_text("description", &input.description, 2000)?;
    for (field, value, max) in [
        ("short_description", &input.short_description, 255),
        ("publisher", &input.publisher, 100),
        ("designer", &input.designer, 100),
    ] {
        if let Some(v) = value {
            errors::max_len(field, v, max)?;
        }
    }
    if !(1..=20).contains(&input.min_players) || !(1..=20).contains(&input.max_players) {
        return Err(ModelError::Validation("players must be between 1 and 20".into()));
    }
    if input.min_players > input.max_players {
        return Err(ModelError::Validation("min_players cannot exceed max_players".into()));
    }
    if !(5..=480).contains(&input.playing_time) {
        return Err(ModelError::Validation("playing_time must be between 5 and 480 minutes".into()));
    }
    if let Some(year) = input.year_published {
        if !(1900..=current_year + 1).contains(&year) {
            return Err(ModelError::Validation(format!("year_published must be between 1900 and {}", current_year + 1)));
        }
    }
    if let Some(age) = input.min_age {
        if !(0..=18).contains(&age) {
            return Err(ModelError::Validation("min_age must be between 0 and 18".into()));
        }
    }
    if let Some(c) = input.complexity_rating {
        if !(1.0..=5.0).contains(&c) {
            return Err(ModelError::Validation("complexity_rating must be between 1 and 5".into()));
        }
    }
    if let Some(p) = input.price {
        if !(0.0..=1000.0).contains(&p) {
            return Err(ModelError::Validation("price must be between 0 and 1000".into()));
        }
    }
    validate_image_url("image_url", &input.image_url)?;
    validate_image_url("thumbnail_url", &input.thumbnail_url)?;
    Ok(())
}

pub fn validate_changes(existing: &Model, changes: &GameChanges) -> Result<GameInput, ModelError> {
    let merged = GameInput::merged(existing, changes);
    validate(&merged)?;
    Ok(merged)
}

/// `"2 players"` when the bounds match, else `"2-4 players"`.
pub fn player_range(min: i32, max: i32) -> String {
    if min == max {
        format!("{min} players")
    } else {
        format!("{min}-{max} players")
    }
}

fn apply(am: &mut ActiveModel, input: GameInput) {
    am.title = Set(input.title.trim().to_string());
    am.description = Set(input.description.trim().to_string());
    am.short_description = Set(errors::non_blank(input.short_description));
    am.publisher = Set(errors::non_blank(input.publisher));
    am.designer = Set(errors::non_blank(input.designer));
    am.year_published = Set(input.year_published);
    am.min_players = Set(input.min_players);
    am.max_players = Set(input.max_players);
    am.min_age = Set(input.min_age);
    am.playing_time = Set(input.playing_time);
    am.complexity_rating = Set(input.complexity_rating);
    am.price = Set(input.price);
    am.image_url = Set(errors::non_blank(input.image_url));
    am.thumbnail_url = Set(errors::non_blank(input.thumbnail_url));
    am.category_id = Set(input.category_id);
    am.is_active = Set(input.is_active.unwrap_or(true));
}

pub async fn create(db: &DatabaseConnection, input: GameInput) -> Result<Model, ModelError> {
    validate(&input)?;
    let now: DateTimeWithTimeZone = Utc::now().into();
    let mut am = ActiveModel {
        id: Set(Uuid::new_v4()),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };
    apply(&mut am, input);
    Ok(am.insert(db).await?)
}

pub async fn update(db: &DatabaseConnection, id: Uuid, changes: GameChanges) -> Result<Model, ModelError> {
    let existing = Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| ModelError::Validation("game not found".into()))?;
    let merged = validate_changes(&existing, &changes)?;
    let mut am: ActiveModel = existing.into();
    apply(&mut am, merged);
    am.updated_at = Set(Utc::now().into());
    Ok(am.update(db).await?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input() -> GameInput {
        GameInput {
            title: "Catan".into(),
            description: "Trade and build".into(),
            min_players: 3,
            max_players: 4,
            playing_time: 90,
            year_published: Some(1995),
            price: Some(44.99),
            ..Default::default()
        }
    }

    #[test]
    fn accepts_valid_game() {
        assert!(validate_for_year(&input(), 2024).is_ok());
    }

    #[test]
    fn rejects_inverted_players() {
        let g = GameInput { min_players: 5, max_players: 2, ..input() };
        assert!(validate_for_year(&g, 2024).is_err());
        let g = GameInput { min_players: 0, ..input() };
        assert!(validate_for_year(&g, 2024).is_err());
        let g = GameInput { max_players: 21, ..input() };
        assert!(validate_for_year(&g, 2024).is_err());
    }

    #[test]
    fn enforces_numeric_ranges() {
        assert!(validate_for_year(&GameInput { playing_time: 4, ..input() }, 2024).is_err());
        assert!(validate_for_year(&GameInput { playing_time: 481, ..input() }, 2024).is_err());
        assert!(validate_for_year(&GameInput { year_published: Some(2025), ..input() }, 2024).is_ok());
        assert!(validate_for_year(&GameInput { year_published: Some(2026), ..input() }, 2024).is_err());
        assert!(validate_for_year(&GameInput { year_published: Some(1899), ..input() }, 2024).is_err());
        assert!(validate_for_year(&GameInput { min_age: Some(19), ..input() }, 2024).is_err());
        assert!(validate_for_year(&GameInput { complexity_rating: Some(0.5), ..input() }, 2024).is_err());
        assert!(validate_for_year(&GameInput { price: Some(-1.0), ..input() }, 2024).is_err());
        assert!(validate_for_year(&GameInput { price: Some(1000.5), ..input() }, 2024).is_err());
    }

    #[test]
    fn text_limits_and_blanks() {
        assert!(validate_for_year(&GameInput { title: "  ".into(), ..input() }, 2024).is_err());
        assert!(validate_for_year(&GameInput { title: "t".repeat(101), ..input() }, 2024).is_err());
        assert!(validate_for_year(&GameInput { description: "d".repeat(2001), ..input() }, 2024).is_err());
    }

    #[test]
    fn image_urls_must_be_http_or_rooted() {
        assert!(validate_for_year(&GameInput { image_url: Some("https://cdn/x.png".into()), ..input() }, 2024).is_ok());
        assert!(validate_for_year(&GameInput { image_url: Some("/images/x.png".into()), ..input() }, 2024).is_ok());
        assert!(validate_for_year(&GameInput { image_url: Some("".into()), ..input() }, 2024).is_ok());
        assert!(validate_for_year(&GameInput { thumbnail_url: Some("ftp://x".into()), ..input() }, 2024).is_err());
    }

    #[test]
    fn merged_keeps_unchanged_fields() {
        let now: DateTimeWithTimeZone = Utc::now().into();
        let existing = Model {
            id: Uuid::new_v4(),
            title: "Old".into(),
            description: "desc".into(),
            short_description: None,
            publisher: Some("Kosmos".into()),
            designer: None,
            year_published: Some(1995),
            min_players: 3,
            max_players: 4,
            min_age: Some(10),
            playing_time: 90,
            complexity_rating: None,
            price: Some(40.0),
            image_url: None,
            thumbnail_url: None,
            category_id: None,
            is_active: false,
            created_at: now,
            updated_at: now,
        };
        let merged = GameInput::merged(&existing, &GameChanges { title: Some("New".into()), max_players: Some(6), ..Default::default() });
        assert_eq!(merged.title, "New");
        assert_eq!(merged.max_players, 6);
        assert_eq!(merged.min_players, 3);
        assert_eq!(merged.publisher.as_deref(), Some("Kosmos"));
        assert_eq!(merged.is_active, Some(false));

        let bad = GameChanges { min_players: Some(8), ..Default::default() };
        assert!(validate_changes(&existing, &bad).is_err());

        let cleared = GameInput::merged(&existing, &GameChanges { price: Some(None), publisher: Some(None), ..Default::default() });
        assert_eq!(cleared.price, None);
        assert_eq!(cleared.publisher, None);
    }

    #[test]
    fn null_in_changes_differs_from_absent() {
        let absent: GameChanges = serde_json::from_str(r#"{"title":"X"}"#).unwrap();
        assert_eq!(absent.price, None);
        assert_eq!(absent.category_id, None);
        let nulled: GameChanges = serde_json::from_str(r#"{"price":null,"category_id":null,"image_url":"/img/a.png"}"#).unwrap();
        assert_eq!(nulled.price, Some(None));
        assert_eq!(nulled.category_id, Some(None));
        assert_eq!(nulled.image_url, Some(Some("/img/a.png".to_string())));
    }

    #[test]
    fn overlong_image_urls_are_rejected() {
        let long = format!("https://cdn.example.com/{}", "a".repeat(600));
        let g = GameInput { image_url: Some(long.clone()), ..input() };
        assert!(matches!(validate_for_year(&g, 2024), Err(ModelError::Validation(_))));
        let g = GameInput { thumbnail_url: Some(long), ..input() };
        assert!(validate_for_year(&g, 2024).is_err());
        let ok = GameInput { image_url: Some(format!("https://cdn.example.com/{}", "a".repeat(400))), ..input() };
        assert!(validate_for_year(&ok, 2024).is_ok());
    }

    #[test]
    fn player_range_text() {
        assert_eq!(player_range(2, 2), "2 players");
        assert_eq!(player_range(2, 4), "2-4 players");
    }
}
