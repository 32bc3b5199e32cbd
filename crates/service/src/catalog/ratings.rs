//! Aggregation of approved review ratings per game.

use std::collections::HashMap;

use serde::Serialize;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct RatingSummary {
    pub average: f64,
    pub count: u64,
}

/// Round to one decimal place.
pub fn round1(v: f64) -> f64 {
    (v * 10.0).round() / 10.0
}

/// Mean of the ratings rounded to one decimal; 0.0 when empty.
pub fn average(ratings: &[i32]) -> f64 {
    if ratings.is_empty() {
        return 0.0;
    }
    let sum: i64 = ratings.iter().map(|r| *r as i64).sum();
    round1(sum as f64 / ratings.len() as f64)
}

/// Group `(game_id, rating)` pairs into per-game summaries. Callers pass
/// approved ratings only.
pub fn summarize(ratings: &[(Uuid, i32)]) -> HashMap<Uuid, RatingSummary> {
    let mut grouped: HashMap<Uuid, Vec<i32>> = HashMap::new();
    for (game_id, rating) in ratings {
        grouped.entry(*game_id).or_default().push(*rating);
    }
    grouped
        .into_iter()
        .map(|(id, rs)| (id, RatingSummary { average: average(&rs), count: rs.len() as u64 }))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn average_rounds_to_one_decimal() {
        assert_eq!(average(&[4, 5, 5]), 4.7);
        assert_eq!(average(&[1, 2]), 1.5);
        assert_eq!(average(&[]), 0.0);
    }

    #[test]
    fn summarize_groups_by_game() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let out = summarize(&[(a, 5), (b, 2), (a, 4), (a, 4)]);
        assert_eq!(out[&a], RatingSummary { average: 4.3, count: 3 });
        assert_eq!(out[&b], RatingSummary { average: 2.0, count: 1 });
        assert!(!out.contains_key(&Uuid::new_v4()));
    }
}
