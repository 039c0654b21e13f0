use crate::{Hands, Scores, Seat, Tile, JOKER_PENALTY, SEATS, WILDCARD_FALLBACK_VALUE, WINNER_SCORE};
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Describes why a match ended.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EndReason {
    /// A seat played its last tile and won.
    HandEmpty,
    /// The stock ran out. The opened seat(s) with the lowest score win.
    DrawingStackExhausted,
    /// Every seat dropped combinations and holds nothing but pairs. Nobody wins.
    AllPairs,
}

/// The result of a finished match. Lower scores are better.
///
/// # See Also
///
/// * [conclude]
/// * [Notification::GameEnded](crate::Notification::GameEnded)
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct GameOutcome {
    /// Why the match ended.
    pub reason: EndReason,
    /// The first of `winners`, if any.
    pub winner: Option<Seat>,
    /// Every winning seat in ascending order.
    pub winners: Vec<Seat>,
    /// Whether the match has no single winner after the stock ran out.
    pub is_draw: bool,
    /// The score of the winners, if any.
    pub winning_score: Option<i32>,
    /// The final score of every seat. [None] for seats not eligible for scoring.
    pub scores: Scores,
    /// The seats that dropped combinations during the match.
    pub dropped: BTreeSet<Seat>,
}

/// Sums the numbers of the tiles in `hand`. A [wildcard](crate::Wildcard) counts as
/// `joker_number`, or as [WILDCARD_FALLBACK_VALUE] when no indicator is known.
pub fn calculate_player_score(hand: &[Tile], joker_number: Option<u8>) -> i32 {
    hand.iter()
        .map(|tile| {
            if tile.is_wildcard() {
                i32::from(joker_number.unwrap_or(WILDCARD_FALLBACK_VALUE))
            } else {
                i32::from(tile.number)
            }
        })
        .sum()
}

/// # Returns
///
/// Whether `hand` is not empty and every number in it appears exactly twice.
pub fn has_only_pairs(hand: &[Tile]) -> bool {
    !hand.is_empty()
        && hand.len() % 2 == 0
        && hand
            .iter()
            .counts_by(|tile| tile.number)
            .into_values()
            .all(|count| count == 2)
}

/// Scores every seat for `reason`.
///
/// * [EndReason::HandEmpty] `winner` scores [WINNER_SCORE]. Every other seat scores its
///   [hand](calculate_player_score), plus [JOKER_PENALTY] when it still holds a wildcard, and
///   the sum is doubled when the seat never dropped combinations.
/// * [EndReason::DrawingStackExhausted] Only `dropped` seats are scored by their hand. The
///   lowest score wins, and a tie is a draw. Without any scored seat the match is a draw
///   without winners.
/// * [EndReason::AllPairs] Every seat scores [JOKER_PENALTY] when it holds a wildcard, else `0`.
///
/// `hands` are indexed by seat minus one.
pub fn conclude(
    reason: EndReason,
    winner: Option<Seat>,
    hands: &Hands,
    dropped: &BTreeSet<Seat>,
    joker_number: Option<u8>,
) -> GameOutcome {
    let seats = (1..=SEATS).zip(hands.iter());

    let (scores, winners, is_draw, winning_score): (Scores, Vec<Seat>, bool, Option<i32>) =
        match reason {
            EndReason::HandEmpty => {
                let scores = seats
                    .map(|(seat, hand)| {
                        if Some(seat) == winner {
                            return (seat, Some(WINNER_SCORE));
                        }
                        let mut penalty = calculate_player_score(hand, joker_number);
                        if holds_wildcard(hand) {
                            penalty += JOKER_PENALTY;
                        }
                        if !dropped.contains(&seat) {
                            penalty *= 2;
                        }
                        (seat, Some(penalty))
                    })
                    .collect();
                (
                    scores,
                    winner.into_iter().collect(),
                    false,
                    winner.map(|_| WINNER_SCORE),
                )
            }
            EndReason::DrawingStackExhausted => {
                let scores: Scores = seats
                    .map(|(seat, hand)| {
                        let score = dropped
                            .contains(&seat)
                            .then(|| calculate_player_score(hand, joker_number));
                        (seat, score)
                    })
                    .collect();
                let winning_score = scores.values().flatten().copied().min();
                let winners = scores
                    .iter()
                    .filter(|(_, score)| score.is_some() && **score == winning_score)
                    .map(|(&seat, _)| seat)
                    .collect_vec();
                let is_draw = winners.len() != 1;
                (scores, winners, is_draw, winning_score)
            }
            EndReason::AllPairs => {
                let scores = seats
                    .map(|(seat, hand)| {
                        let score = if holds_wildcard(hand) { JOKER_PENALTY } else { 0 };
                        (seat, Some(score))
                    })
                    .collect();
                (scores, Vec::new(), false, None)
            }
        };

    GameOutcome {
        reason,
        winner: winners.first().copied(),
        winners,
        is_draw,
        winning_score,
        scores,
        dropped: dropped.clone(),
    }
}

fn holds_wildcard(hand: &[Tile]) -> bool {
    hand.iter().any(Tile::is_wildcard)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Color::{Black, Blue, Red, Yellow};
    use crate::{random_tiles, Hand};
    use map_macro::btree_set;

    #[test]
    fn player_score_sums_numbers() {
        let hand = [Tile::new(Red, 3), Tile::new(Blue, 5)];

        assert_eq!(8, calculate_player_score(&hand, Some(6)));
    }

    #[test]
    fn player_score_wildcards() {
        let hand = [Tile::joker(Red, 6), Tile::false_joker(Red, 5)];

        assert_eq!(12, calculate_player_score(&hand, Some(6)));
        assert_eq!(14, calculate_player_score(&hand, None));
    }

    #[test]
    fn player_score_regular_tiles() {
        let hand = random_tiles(&mut rand::thread_rng());
        let expected: i32 = hand.iter().map(|tile| i32::from(tile.number)).sum();

        assert_eq!(expected, calculate_player_score(&hand, Some(6)));
        assert_eq!(expected, calculate_player_score(&hand, None));
    }

    #[test]
    fn only_pairs() {
        let hand = [
            Tile::new(Red, 3),
            Tile::new(Blue, 3),
            Tile::new(Red, 9),
            Tile::new(Red, 9),
        ];

        assert!(has_only_pairs(&hand));
        assert!(!has_only_pairs(&hand[..3]));
        assert!(!has_only_pairs(&[]));
        assert!(!has_only_pairs(&[
            Tile::new(Red, 3),
            Tile::new(Blue, 3),
            Tile::new(Black, 3),
            Tile::new(Yellow, 3)
        ]));
    }

    #[test]
    fn hand_empty_scores() {
        let hands = test_hands([
            &[],
            &[Tile::new(Red, 4), Tile::new(Red, 5)],
            &[Tile::new(Red, 4), Tile::joker(Red, 6)],
            &[Tile::new(Blue, 10), Tile::false_joker(Red, 5)],
        ]);

        let actual = conclude(
            EndReason::HandEmpty,
            Some(1),
            &hands,
            &btree_set! { 1, 2, 3 },
            Some(6),
        );

        assert_eq!(Some(1), actual.winner);
        assert_eq!(vec![1], actual.winners);
        assert!(!actual.is_draw);
        assert_eq!(Some(WINNER_SCORE), actual.winning_score);
        assert_eq!(Some(-101), actual.scores[&1]);
        assert_eq!(Some(9), actual.scores[&2]);
        assert_eq!(Some(10 + 101), actual.scores[&3]);
        assert_eq!(Some((16 + 101) * 2), actual.scores[&4]);
        assert_eq!(btree_set! { 1, 2, 3 }, actual.dropped);
    }

    #[test]
    fn stock_exhausted_scores() {
        let hands = test_hands([
            &[Tile::new(Red, 8)],
            &[Tile::new(Red, 6)],
            &[Tile::new(Red, 1)],
            &[Tile::new(Red, 2)],
        ]);

        let actual = conclude(
            EndReason::DrawingStackExhausted,
            None,
            &hands,
            &btree_set! { 1, 2 },
            Some(6),
        );

        assert_eq!(Some(2), actual.winner);
        assert_eq!(vec![2], actual.winners);
        assert!(!actual.is_draw);
        assert_eq!(Some(6), actual.winning_score);
        assert_eq!(
            Scores::from([(1, Some(8)), (2, Some(6)), (3, None), (4, None)]),
            actual.scores
        );
    }

    #[test]
    fn stock_exhausted_tie_is_draw() {
        let hands = test_hands([
            &[Tile::new(Red, 8)],
            &[Tile::new(Red, 5)],
            &[Tile::new(Blue, 5)],
            &[Tile::new(Red, 2)],
        ]);

        let actual = conclude(
            EndReason::DrawingStackExhausted,
            None,
            &hands,
            &btree_set! { 1, 2, 3 },
            Some(6),
        );

        assert_eq!(vec![2, 3], actual.winners);
        assert_eq!(Some(2), actual.winner);
        assert!(actual.is_draw);
    }

    #[test]
    fn stock_exhausted_nobody_opened() {
        let hands = test_hands([&[Tile::new(Red, 8)], &[], &[], &[]]);

        let actual = conclude(
            EndReason::DrawingStackExhausted,
            None,
            &hands,
            &BTreeSet::new(),
            Some(6),
        );

        assert_eq!(None, actual.winner);
        assert!(actual.winners.is_empty());
        assert!(actual.is_draw);
        assert_eq!(None, actual.winning_score);
        assert!(actual.scores.values().all(Option::is_none));
    }

    #[test]
    fn all_pairs_scores() {
        let hands = test_hands([
            &[Tile::new(Red, 3), Tile::new(Blue, 3)],
            &[Tile::joker(Red, 6), Tile::new(Blue, 6)],
            &[Tile::new(Red, 9), Tile::new(Red, 9)],
            &[Tile::new(Red, 1), Tile::new(Red, 1)],
        ]);

        let actual = conclude(
            EndReason::AllPairs,
            None,
            &hands,
            &btree_set! { 1, 2, 3, 4 },
            Some(6),
        );

        assert_eq!(None, actual.winner);
        assert!(!actual.is_draw);
        assert_eq!(
            Scores::from([(1, Some(0)), (2, Some(101)), (3, Some(0)), (4, Some(0))]),
            actual.scores
        );
    }

    #[test]
    fn end_reason_wire_names() {
        assert_eq!(
            "\"drawing_stack_exhausted\"",
            serde_json::to_string(&EndReason::DrawingStackExhausted)
                .expect("serialize should return Ok")
        );
        assert_eq!(
            "\"hand_empty\"",
            serde_json::to_string(&EndReason::HandEmpty).expect("serialize should return Ok")
        );
    }

    fn test_hands(hands: [&[Tile]; SEATS]) -> Hands {
        hands.map(Hand::from_slice)
    }
}
