use std::cmp::Ordering;
use std::collections::HashMap;

use serde::Serialize;
use uuid::Uuid;

use models::{category, game};

use super::filters::SortOrder;
use super::ratings::RatingSummary;

/// A game as listed in the catalog: the joined row plus computed fields.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GameSummary {
    #[serde(flatten)]
    pub game: game::GameRow,
    pub average_rating: f64,
    pub review_count: u64,
    pub player_range: String,
}

impl GameSummary {
    pub fn new(game: game::GameRow, rating: RatingSummary) -> Self {
        let player_range = game::player_range(game.min_players, game.max_players);
        Self { game, average_rating: rating.average, review_count: rating.count, player_range }
    }

    pub fn id(&self) -> Uuid { self.game.id }
}

/// Attach rating summaries; games without approved reviews get zeros.
pub fn summarize_games(rows: Vec<game::GameRow>, ratings: &HashMap<Uuid, RatingSummary>) -> Vec<GameSummary> {
    rows.into_iter()
        .map(|g| {
            let r = ratings.get(&g.id).copied().unwrap_or_default();
            GameSummary::new(g, r)
        })
        .collect()
}

fn cmp_f64(a: f64, b: f64) -> Ordering {
    a.partial_cmp(&b).unwrap_or(Ordering::Equal)
}

/// Sort in place. Games without a price sort after priced ones in both
/// price orders. Ties fall back to newest first.
pub fn sort_games(games: &mut [GameSummary], order: SortOrder) {
    games.sort_by(|a, b| {
        let primary = match order {
            SortOrder::Newest => Ordering::Equal,
            SortOrder::Title => a.game.title.to_lowercase().cmp(&b.game.title.to_lowercase()),
            SortOrder::Rating => cmp_f64(b.average_rating, a.average_rating).then(b.review_count.cmp(&a.review_count)),
            SortOrder::PriceAsc => match (a.game.price, b.game.price) {
                (Some(x), Some(y)) => cmp_f64(x, y),
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => Ordering::Equal,
            },
            SortOrder::PriceDesc => match (a.game.price, b.game.price) {
                (Some(x), Some(y)) => cmp_f64(y, x),
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => Ordering::Equal,
            },
            SortOrder::Playtime => a.game.playing_time.cmp(&b.game.playing_time),
        };
        primary.then(b.game.created_at.cmp(&a.game.created_at))
    });
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Range {
    pub min: i32,
    pub max: i32,
}

/// Values the catalog filter form offers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FilterOptions {
    pub categories: Vec<category::Model>,
    pub players: Range,
    pub playtime: Range,
}

pub const DEFAULT_PLAYERS: Range = Range { min: 1, max: 10 };
pub const DEFAULT_PLAYTIME: Range = Range { min: 15, max: 180 };

/// Bounds over the given (active) games, with defaults when there are none.
pub fn filter_options(mut categories: Vec<category::Model>, games: &[game::GameRow]) -> FilterOptions {
    categories.sort_by(|a, b| a.name.cmp(&b.name));
    let players = match (games.iter().map(|g| g.min_players).min(), games.iter().map(|g| g.max_players).max()) {
        (Some(min), Some(max)) => Range { min, max },
        _ => DEFAULT_PLAYERS,
    };
    let playtime = match (games.iter().map(|g| g.playing_time).min(), games.iter().map(|g| g.playing_time).max()) {
        (Some(min), Some(max)) => Range { min, max },
        _ => DEFAULT_PLAYTIME,
    };
    FilterOptions { categories, players, playtime }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use chrono::{Duration, Utc};
    use models::game::GameRow;
    use uuid::Uuid;

    /// A valid active game created `age_days` ago.
    pub fn game_row(title: &str, age_days: i64) -> GameRow {
        let at = (Utc::now() - Duration::days(age_days)).into();
        GameRow {
            id: Uuid::new_v4(),
            title: title.to_string(),
            description: format!("{title} description"),
            short_description: None,
            publisher: None,
            designer: None,
            year_published: None,
            min_players: 2,
            max_players: 4,
            min_age: None,
            playing_time: 60,
            complexity_rating: None,
            price: None,
            image_url: None,
            thumbnail_url: None,
            category_id: None,
            is_active: true,
            created_at: at,
            updated_at: at,
            category_name: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::game_row;
    use super::*;

    fn titles(games: &[GameSummary]) -> Vec<&str> {
        games.iter().map(|g| g.game.title.as_str()).collect()
    }

    #[test]
    fn sorts_by_each_order() {
        let mut a = game_row("Azul", 3);
        a.price = Some(30.0);
        a.playing_time = 45;
        let mut b = game_row("brass", 1);
        b.price = Some(60.0);
        b.playing_time = 120;
        let mut c = game_row("Catan", 2);
        c.playing_time = 90;
        let ratings = HashMap::from([
            (a.id, RatingSummary { average: 4.0, count: 2 }),
            (b.id, RatingSummary { average: 4.5, count: 1 }),
            (c.id, RatingSummary { average: 4.0, count: 5 }),
        ]);
        let mut games = summarize_games(vec![a, b, c], &ratings);

        sort_games(&mut games, SortOrder::Newest);
        assert_eq!(titles(&games), ["brass", "Catan", "Azul"]);
        sort_games(&mut games, SortOrder::Title);
        assert_eq!(titles(&games), ["Azul", "brass", "Catan"]);
        sort_games(&mut games, SortOrder::Rating);
        assert_eq!(titles(&games), ["brass", "Catan", "Azul"]);
        sort_games(&mut games, SortOrder::PriceAsc);
        assert_eq!(titles(&games), ["Azul", "brass", "Catan"]);
        sort_games(&mut games, SortOrder::PriceDesc);
        assert_eq!(titles(&games), ["brass", "Azul", "Catan"]);
        sort_games(&mut games, SortOrder::Playtime);
        assert_eq!(titles(&games), ["Azul", "Catan", "brass"]);
    }

    #[test]
    fn summary_defaults_to_zero_rating() {
        let g = game_row("Solo", 0);
        let s = summarize_games(vec![g], &HashMap::new());
        assert_eq!(s[0].average_rating, 0.0);
        assert_eq!(s[0].review_count, 0);
        assert_eq!(s[0].player_range, "2-4 players");
    }

    #[test]
    fn filter_options_bounds_and_defaults() {
        let empty = filter_options(Vec::new(), &[]);
        assert_eq!(empty.players, DEFAULT_PLAYERS);
        assert_eq!(empty.playtime, DEFAULT_PLAYTIME);

        let mut a = game_row("A", 0);
        a.min_players = 1;
        a.max_players = 2;
        a.playing_time = 20;
        let mut b = game_row("B", 0);
        b.min_players = 3;
        b.max_players = 8;
        b.playing_time = 240;
        let opts = filter_options(Vec::new(), &[a, b]);
        assert_eq!(opts.players, Range { min: 1, max: 8 });
        assert_eq!(opts.playtime, Range { min: 20, max: 240 });
    }
}
