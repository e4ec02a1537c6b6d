//! Helpers shared by normal and endless study runs.

use chrono::{DateTime, Utc};
use rand::seq::SliceRandom;
use rand::Rng;

const SECONDS_PER_DAY: f64 = 86_400.0;

/// Rounded accuracy percentage of a run; 0 when nothing was answered.
pub fn compute_accuracy(total_answered: u32, correct: u32) -> u32 {
    if total_answered == 0 {
        return 0;
    }
    (correct as f64 * 100.0 / total_answered as f64).round() as u32
}

/// Shuffle a deck's cards for a normal run.
pub fn shuffle_cards<T, R: Rng + ?Sized>(cards: &mut [T], rng: &mut R) {
    cards.shuffle(rng);
}

/// Human-readable label for when a deck is next due.
pub fn describe_next_review(next_review_at: Option<DateTime<Utc>>, now: DateTime<Utc>) -> String {
    let Some(next) = next_review_at else {
        return "Due now".to_string();
    };

    let seconds = (next - now).num_seconds() as f64;
    let days = (seconds / SECONDS_PER_DAY).round() as i64;

    match days {
        d if d <= 0 => "Today".to_string(),
        1 => "Tomorrow".to_string(),
        d => format!("In {} days", d),
    }
}
