//! Catalog query parameters and the predicate they translate into.

use sea_orm::sea_query::{Expr, Func};
use sea_orm::{ColumnTrait, Condition};
use serde::Deserialize;
use uuid::Uuid;

use common::pagination::parse_page;
use models::game;

use crate::errors::ServiceError;

/// Sentinel the catalog form sends for "no category".
pub const ALL_CATEGORIES: &str = "all-categories";
/// Sentinel the catalog form sends for "any player count".
pub const ANY_PLAYERS: &str = "any-number";

/// Raw query-string parameters of the catalog page.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GameFilters {
    pub search: Option<String>,
    pub category: Option<String>,
    pub players: Option<String>,
    pub playtime: Option<String>,
    pub page: Option<String>,
    pub sort: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayersFilter {
    /// `"5+"`: the game supports at least this many players.
    AtLeast(i32),
    /// The count lies within `min_players..=max_players`.
    Exactly(i32),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOrder {
    #[default]
    Newest,
    Title,
    Rating,
    PriceAsc,
    PriceDesc,
    Playtime,
}

impl SortOrder {
    pub fn parse(s: &str) -> Self {
        match s.trim() {
            "title" => SortOrder::Title,
            "rating" => SortOrder::Rating,
            "price_asc" => SortOrder::PriceAsc,
            "price_desc" => SortOrder::PriceDesc,
            "playtime" => SortOrder::Playtime,
            _ => SortOrder::Newest,
        }
    }
}

/// Parsed, typed catalog query.
#[derive(Debug, Clone, PartialEq)]
pub struct GameQuery {
    pub search: Option<String>,
    pub category_id: Option<Uuid>,
    pub players: Option<PlayersFilter>,
    pub max_playtime: Option<i32>,
    pub sort: SortOrder,
    pub page: u32,
    /// Admin listings see inactive games too.
    pub include_inactive: bool,
}

impl Default for GameQuery {
    fn default() -> Self {
        Self { search: None, category_id: None, players: None, max_playtime: None, sort: SortOrder::Newest, page: 1, include_inactive: false }
    }
}

fn non_blank(v: &Option<String>) -> Option<&str> {
    v.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

fn parse_players(raw: &str) -> Option<PlayersFilter> {
    if raw == ANY_PLAYERS {
        return None;
    }
    if let Some(n) = raw.strip_suffix('+') {
        return n.trim().parse().ok().map(PlayersFilter::AtLeast);
    }
    raw.parse().ok().map(PlayersFilter::Exactly)
}

impl GameQuery {
    pub fn from_filters(f: &GameFilters) -> Result<Self, ServiceError> {
        let category_id = match non_blank(&f.category) {
            None | Some(ALL_CATEGORIES) => None,
            Some(raw) => Some(
                Uuid::parse_str(raw).map_err(|_| ServiceError::Validation(format!("invalid category id: {raw}")))?,
            ),
        };
        Ok(Self {
            search: non_blank(&f.search).map(str::to_string),
            category_id,
            players: non_blank(&f.players).and_then(parse_players),
            max_playtime: non_blank(&f.playtime).and_then(|p| p.parse().ok()),
            sort: non_blank(&f.sort).map(SortOrder::parse).unwrap_or_default(),
            page: parse_page(f.page.as_deref()),
            include_inactive: false,
        })
    }

    pub fn with_inactive(mut self) -> Self {
        self.include_inactive = true;
        self
    }

    /// SQL predicate over `game` columns.
    pub fn to_condition(&self) -> Condition {
        let mut cond = Condition::all();
        if !self.include_inactive {
            cond = cond.add(game::Column::IsActive.eq(true));
        }
        if let Some(search) = &self.search {
            let pattern = format!("%{}%", search.to_lowercase());
            cond = cond.add(
                Condition::any()
                    .add(Expr::expr(Func::lower(Expr::col((game::Entity, game::Column::Title)))).like(pattern.clone()))
                    .add(Expr::expr(Func::lower(Expr::col((game::Entity, game::Column::Description)))).like(pattern)),
            );
        }
        if let Some(id) = self.category_id {
            cond = cond.add(game::Column::CategoryId.eq(id));
        }
        match self.players {
            Some(PlayersFilter::AtLeast(n)) => cond = cond.add(game::Column::MaxPlayers.gte(n)),
            Some(PlayersFilter::Exactly(n)) => {
                cond = cond.add(game::Column::MinPlayers.lte(n)).add(game::Column::MaxPlayers.gte(n))
            }
            None => {}
        }
        if let Some(max) = self.max_playtime {
            cond = cond.add(game::Column::PlayingTime.lte(max));
        }
        cond
    }

    /// In-memory equivalent of `to_condition`.
    pub fn matches(&self, g: &game::GameRow) -> bool {
        if !self.include_inactive && !g.is_active {
            return false;
        }
        if let Some(search) = &self.search {
            let needle = search.to_lowercase();
            if !g.title.to_lowercase().contains(&needle) && !g.description.to_lowercase().contains(&needle) {
                return false;
            }
        }
        if let Some(id) = self.category_id {
            if g.category_id != Some(id) {
                return false;
            }
        }
        let players_ok = match self.players {
            Some(PlayersFilter::AtLeast(n)) => g.max_players >= n,
            Some(PlayersFilter::Exactly(n)) => g.min_players <= n && n <= g.max_players,
            None => true,
        };
        players_ok && self.max_playtime.map_or(true, |max| g.playing_time <= max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{DbBackend, EntityTrait, QueryFilter, QueryTrait};

    fn filters(pairs: &[(&str, &str)]) -> GameFilters {
        let mut f = GameFilters::default();
        for (k, v) in pairs {
            let v = Some(v.to_string());
            match *k {
                "search" => f.search = v,
                "category" => f.category = v,
                "players" => f.players = v,
                "playtime" => f.playtime = v,
                "page" => f.page = v,
                "sort" => f.sort = v,
                _ => unreachable!(),
            }
        }
        f
    }

    fn sql(q: &GameQuery) -> String {
        game::Entity::find().filter(q.to_condition()).build(DbBackend::Postgres).to_string()
    }

    #[test]
    fn empty_filters_only_require_active() {
        let q = GameQuery::from_filters(&GameFilters::default()).unwrap();
        assert_eq!(q, GameQuery::default());
        let s = sql(&q);
        assert!(s.contains(r#""game"."is_active" = TRUE"#), "{s}");
        assert!(!s.contains("LIKE"));
    }

    #[test]
    fn sentinels_are_ignored() {
        let q = GameQuery::from_filters(&filters(&[("category", "all-categories"), ("players", "any-number"), ("search", "   ")])).unwrap();
        assert_eq!(q.category_id, None);
        assert_eq!(q.players, None);
        assert_eq!(q.search, None);
    }

    #[test]
    fn bad_category_is_a_validation_error() {
        let err = GameQuery::from_filters(&filters(&[("category", "strategy")])).unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));
    }

    #[test]
    fn players_parse_and_render() {
        let q = GameQuery::from_filters(&filters(&[("players", "5+")])).unwrap();
        assert_eq!(q.players, Some(PlayersFilter::AtLeast(5)));
        assert!(sql(&q).contains(r#""game"."max_players" >= 5"#));

        let q = GameQuery::from_filters(&filters(&[("players", "3")])).unwrap();
        assert_eq!(q.players, Some(PlayersFilter::Exactly(3)));
        let s = sql(&q);
        assert!(s.contains(r#""game"."min_players" <= 3"#), "{s}");
        assert!(s.contains(r#""game"."max_players" >= 3"#), "{s}");

        let q = GameQuery::from_filters(&filters(&[("players", "lots")])).unwrap();
        assert_eq!(q.players, None);
    }

    #[test]
    fn search_category_and_playtime_render() {
        let id = Uuid::new_v4();
        let q = GameQuery::from_filters(&filters(&[
            ("search", " Catan "),
            ("category", &id.to_string()),
            ("playtime", "60"),
            ("sort", "price_desc"),
            ("page", "2"),
        ]))
        .unwrap();
        assert_eq!(q.search.as_deref(), Some("Catan"));
        assert_eq!(q.sort, SortOrder::PriceDesc);
        assert_eq!(q.page, 2);
        let s = sql(&q);
        assert!(s.contains(r#"LOWER("game"."title") LIKE '%catan%'"#), "{s}");
        assert!(s.contains(r#"LOWER("game"."description") LIKE '%catan%'"#), "{s}");
        assert!(s.contains(" OR "), "{s}");
        assert!(s.contains(&id.to_string()), "{s}");
        assert!(s.contains(r#""game"."playing_time" <= 60"#), "{s}");
    }

    #[test]
    fn unknown_sort_and_bad_page_fall_back() {
        let q = GameQuery::from_filters(&filters(&[("sort", "popularity"), ("page", "-4"), ("playtime", "long")])).unwrap();
        assert_eq!(q.sort, SortOrder::Newest);
        assert_eq!(q.page, 1);
        assert_eq!(q.max_playtime, None);
    }

    #[test]
    fn inactive_games_included_for_admin() {
        let q = GameQuery::default().with_inactive();
        assert!(!sql(&q).contains("WHERE"));
    }
}
