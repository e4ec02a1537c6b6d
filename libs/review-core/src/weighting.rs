//! Adaptive card weighting for endless study sessions.
//!
//! Cards the user keeps missing are drawn more often; cards never seen sit at
//! a neutral weight.

use rand::Rng;

use crate::types::{Card, CardId, Outcome, StatsByCard};

/// Weight of a card with no history.
pub const UNSEEN_WEIGHT: f64 = 1.0;
/// Weight of a card answered correctly every time.
pub const BASE_WEIGHT: f64 = 0.3;
/// Added when the last answer for the card was wrong.
pub const RECENT_MISS_BONUS: f64 = 0.5;
/// Every card keeps at least this weight.
pub const MIN_WEIGHT: f64 = 0.1;

/// Sampling weight of a card given its answer history.
pub fn card_weight(card_id: CardId, stats: &StatsByCard) -> f64 {
    let Some(stats) = stats.get(&card_id) else {
        return UNSEEN_WEIGHT;
    };
    let Some(accuracy) = stats.accuracy() else {
        return UNSEEN_WEIGHT;
    };

    let mut weight = BASE_WEIGHT + (1.0 - accuracy);
    if stats.last_outcome == Some(Outcome::Incorrect) {
        weight += RECENT_MISS_BONUS;
    }

    weight.max(MIN_WEIGHT)
}

/// Draw the index of the next card, proportionally to each card's weight.
///
/// Returns 0 for an empty slice; callers are expected to check for empty decks first.
pub fn choose_weighted_index<R: Rng + ?Sized>(
    cards: &[Card],
    stats: &StatsByCard,
    rng: &mut R,
) -> usize {
    if cards.is_empty() {
        return 0;
    }

    let weights: Vec<f64> = cards.iter().map(|c| card_weight(c.id, stats)).collect();
    let total: f64 = weights.iter().sum();

    if total.is_nan() || total <= 0.0 {
        return rng.gen_range(0..cards.len());
    }

    let mut remaining = rng.gen::<f64>() * total;
    for (index, weight) in weights.iter().enumerate() {
        remaining -= weight;
        if remaining <= 0.0 {
            return index;
        }
    }

    // Rounding can leave a sliver of weight unclaimed.
    cards.len() - 1
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::CardStats;
    use pretty_assertions::assert_eq;
    use rand::rngs::mock::StepRng;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn card(id: CardId) -> Card {
        Card {
            id,
            deck_id: 1,
            question: format!("Question {}?", id),
            answer: format!("Answer {}.", id),
            explanation: None,
            image_path: None,
            explanation_image_path: None,
        }
    }

    fn stats(seen: u32, correct: u32, last_outcome: Option<Outcome>) -> CardStats {
        CardStats {
            seen,
            correct,
            last_outcome,
        }
    }

    fn assert_close(actual: f64, expected: f64) {
        assert!((actual - expected).abs() < 1e-9, "{actual} != {expected}");
    }

    #[test]
    fn unseen_card_has_neutral_weight() {
        let mut by_card = StatsByCard::new();
        assert_close(card_weight(1, &by_card), UNSEEN_WEIGHT);

        by_card.insert(1, stats(0, 0, None));
        assert_close(card_weight(1, &by_card), UNSEEN_WEIGHT);
    }

    #[test]
    fn weight_grows_with_error_rate() {
        let by_card = StatsByCard::from([
            (1, stats(10, 10, Some(Outcome::Correct))),
            (2, stats(10, 5, Some(Outcome::Correct))),
            (3, stats(10, 0, None)),
        ]);

        assert_close(card_weight(1, &by_card), 0.3);
        assert_close(card_weight(2, &by_card), 0.8);
        assert_close(card_weight(3, &by_card), 1.3);
    }

    #[test]
    fn recent_miss_adds_bonus() {
        let by_card = StatsByCard::from([
            (1, stats(4, 2, Some(Outcome::Correct))),
            (2, stats(4, 2, Some(Outcome::Incorrect))),
        ]);

        assert_close(card_weight(2, &by_card) - card_weight(1, &by_card), RECENT_MISS_BONUS);
    }

    #[test]
    fn weight_never_drops_below_minimum() {
        // Inconsistent stats would give a negative error rate.
        let by_card = StatsByCard::from([(1, stats(1, 5, Some(Outcome::Correct)))]);
        assert_close(card_weight(1, &by_card), MIN_WEIGHT);
    }

    #[test]
    fn empty_deck_returns_zero() {
        let mut rng = StdRng::seed_from_u64(7);
        assert_eq!(choose_weighted_index(&[], &StatsByCard::new(), &mut rng), 0);
    }

    #[test]
    fn lowest_draw_picks_first_card() {
        let cards = vec![card(1), card(2), card(3)];
        let mut rng = StepRng::new(0, 0);
        assert_eq!(choose_weighted_index(&cards, &StatsByCard::new(), &mut rng), 0);
    }

    #[test]
    fn highest_draw_picks_last_card() {
        let cards = vec![card(1), card(2), card(3)];
        let mut rng = StepRng::new(u64::MAX, 0);
        assert_eq!(choose_weighted_index(&cards, &StatsByCard::new(), &mut rng), 2);
    }

    #[test]
    fn high_error_card_is_drawn_more_often() {
        let cards = vec![card(1), card(2)];
        let by_card = StatsByCard::from([
            (1, stats(10, 1, Some(Outcome::Correct))),
            (2, stats(10, 9, Some(Outcome::Correct))),
        ]);
        let mut rng = StdRng::seed_from_u64(42);

        let mut counts = [0usize; 2];
        for _ in 0..10_000 {
            counts[choose_weighted_index(&cards, &by_card, &mut rng)] += 1;
        }

        // Weights are 1.2 and 0.4, so the expected split is 3:1.
        assert!(counts[0] > counts[1] * 2, "counts: {:?}", counts);
        assert!(counts[1] > 1_000, "counts: {:?}", counts);
    }

    #[test]
    fn every_card_stays_reachable() {
        let cards = vec![card(1), card(2), card(3)];
        let by_card = StatsByCard::from([
            (1, stats(50, 50, Some(Outcome::Correct))),
            (2, stats(50, 0, Some(Outcome::Incorrect))),
        ]);
        let mut rng = StdRng::seed_from_u64(3);

        let mut seen = [false; 3];
        for _ in 0..5_000 {
            seen[choose_weighted_index(&cards, &by_card, &mut rng)] = true;
        }
        assert_eq!(seen, [true, true, true]);
    }
}
