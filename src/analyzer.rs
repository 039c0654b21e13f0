use crate::{
    calculate_combination_points, classify, CombinationKind, HandPositions, Meld, Tile,
    MAX_NUMBER, MAX_SET_LEN, MIN_COMBINATION_LEN,
};
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;
use std::collections::HashSet;

/// A valid combination found in a hand, identified by the positions of its tiles.
///
/// # See Also
///
/// * [find_all_valid_combinations]
/// * [MatchState::suggest_meld](crate::MatchState::suggest_meld)
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct HandCombination {
    /// Indexes into the analyzed hand.
    pub positions: HandPositions,
    /// The tiles at `positions`, in hand order.
    pub tiles: Meld,
    /// Whether the tiles form a run or a set.
    pub kind: CombinationKind,
    /// [Points](calculate_combination_points) of the tiles.
    pub points: u32,
}

/// Finds every subset of at least [MIN_COMBINATION_LEN] tiles in `hand` that forms a
/// [valid combination](classify), then greedily keeps combinations whose positions do not
/// overlap.
///
/// Candidates are ordered by points descending, then by tile count descending, keeping
/// enumeration order (ascending size, then ascending positions) among equals. A candidate is
/// accepted when none of its positions were claimed by a previously accepted one.
///
/// The greedy pass is an approximation. It can miss the packing with the highest total, which
/// would need a weighted set-packing search.
///
/// # Returns
///
/// The accepted combinations in acceptance order.
pub fn find_all_valid_combinations(hand: &[Tile]) -> Vec<HandCombination> {
    let candidates = enumerate_candidates(hand)
        .into_iter()
        .sorted_by_key(|candidate| (Reverse(candidate.points), Reverse(candidate.positions.len())));

    let mut used = HashSet::with_capacity(hand.len());
    let mut accepted = Vec::new();
    for candidate in candidates {
        if candidate.positions.iter().any(|position| used.contains(position)) {
            continue;
        }
        used.extend(candidate.positions.iter().copied());
        accepted.push(candidate);
    }

    log::debug!(
        "analyzed hand of {} tiles: {} combinations accepted",
        hand.len(),
        accepted.len()
    );
    accepted
}

/// # Returns
///
/// The sum of points over the combinations [find_all_valid_combinations] selects in `hand`.
pub fn calculate_total_combination_points(hand: &[Tile]) -> u32 {
    find_all_valid_combinations(hand)
        .iter()
        .map(|combination| combination.points)
        .sum()
}

/// Every subset of `hand` forming a valid combination, ordered by size and then by positions.
fn enumerate_candidates(hand: &[Tile]) -> Vec<HandCombination> {
    let max_len = hand.len().min(MAX_NUMBER as usize);
    let mut candidates = Vec::new();
    let mut picked = Vec::with_capacity(max_len);
    for len in MIN_COMBINATION_LEN..=max_len {
        pick(hand, len, 0, &mut picked, &mut candidates);
    }
    candidates
}

/// Extends `picked` with positions from `start` onwards until it holds `len` positions,
/// skipping every branch that can no longer become a combination of `len` tiles.
fn pick(
    hand: &[Tile],
    len: usize,
    start: usize,
    picked: &mut Vec<usize>,
    candidates: &mut Vec<HandCombination>,
) {
    if picked.len() == len {
        let tiles: Meld = picked.iter().map(|&position| hand[position]).collect();
        if let Some(kind) = classify(&tiles) {
            candidates.push(HandCombination {
                positions: picked.iter().copied().collect(),
                points: calculate_combination_points(&tiles),
                tiles,
                kind,
            });
        }
        return;
    }

    let remaining = len - picked.len();
    for position in start..=hand.len().saturating_sub(remaining) {
        picked.push(position);
        if could_complete(hand, picked, len) {
            pick(hand, len, position + 1, picked, candidates);
        }
        picked.pop();
    }
}

/// Whether the tiles at `picked` could still be part of a combination of `len` tiles. Adding
/// tiles never turns a failing check into a passing one.
fn could_complete(hand: &[Tile], picked: &[usize], len: usize) -> bool {
    let regular = picked
        .iter()
        .map(|&position| hand[position])
        .filter(|tile| !tile.is_wildcard())
        .collect_vec();
    if !regular
        .iter()
        .map(|tile| (tile.color, tile.number))
        .all_unique()
    {
        return false;
    }

    let Some((min, max)) = regular
        .iter()
        .map(|tile| tile.number)
        .minmax()
        .into_option()
    else {
        return true;
    };

    let could_be_run = regular.iter().map(|tile| tile.color).all_equal()
        && usize::from(max - min) < len
        && len <= MAX_NUMBER as usize;
    let could_be_set = min == max && len <= MAX_SET_LEN;
    could_be_run || could_be_set
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Color::{Black, Blue, Red, Yellow};
    use crate::INITIAL_MELD_MINIMUM;
    use map_macro::btree_set;

    #[test]
    fn find_in_empty_hand() {
        assert_eq!(Vec::<HandCombination>::new(), find_all_valid_combinations(&[]));
        assert_eq!(0, calculate_total_combination_points(&[]));
    }

    #[test]
    fn find_single_run() {
        let hand = [
            Tile::new(Red, 3),
            Tile::new(Blue, 9),
            Tile::new(Red, 4),
            Tile::new(Red, 5),
        ];

        let actual = find_all_valid_combinations(&hand);

        assert_eq!(
            vec![HandCombination {
                positions: btree_set! { 0, 2, 3 },
                tiles: Meld::from_slice(&[
                    Tile::new(Red, 3),
                    Tile::new(Red, 4),
                    Tile::new(Red, 5)
                ]),
                kind: CombinationKind::Run,
                points: 12,
            }],
            actual
        );
    }

    #[test]
    fn find_prefers_higher_points() {
        // The run 3-4-5 (12 points) and the set of 5s (15 points) share the red 5.
        let hand = [
            Tile::new(Red, 3),
            Tile::new(Red, 4),
            Tile::new(Red, 5),
            Tile::new(Yellow, 5),
            Tile::new(Black, 5),
        ];

        let actual = find_all_valid_combinations(&hand);

        assert_eq!(1, actual.len());
        assert_eq!(btree_set! { 2, 3, 4 }, actual[0].positions);
        assert_eq!(CombinationKind::Set, actual[0].kind);
        assert_eq!(15, calculate_total_combination_points(&hand));
    }

    #[test]
    fn find_keeps_disjoint_combinations() {
        let hand = [
            Tile::new(Blue, 1),
            Tile::new(Blue, 2),
            Tile::new(Blue, 3),
            Tile::new(Blue, 4),
            Tile::new(Red, 10),
            Tile::new(Yellow, 10),
            Tile::new(Blue, 10),
        ];

        let actual = find_all_valid_combinations(&hand);

        assert_eq!(2, actual.len());
        assert_eq!(btree_set! { 4, 5, 6 }, actual[0].positions);
        assert_eq!(30, actual[0].points);
        assert_eq!(btree_set! { 0, 1, 2, 3 }, actual[1].positions);
        assert_eq!(10, actual[1].points);
        assert_eq!(40, calculate_total_combination_points(&hand));
    }

    #[test]
    fn find_prefers_longer_on_equal_points() {
        // The run 3-6 and the set of 6s are both worth 18 points.
        let hand = [
            Tile::new(Red, 3),
            Tile::new(Red, 4),
            Tile::new(Red, 5),
            Tile::new(Red, 6),
            Tile::new(Yellow, 6),
            Tile::new(Black, 6),
        ];

        let actual = find_all_valid_combinations(&hand);

        assert_eq!(1, actual.len());
        assert_eq!(btree_set! { 0, 1, 2, 3 }, actual[0].positions);
        assert_eq!(CombinationKind::Run, actual[0].kind);
        assert_eq!(18, actual[0].points);
    }

    #[test]
    fn find_non_overlapping() {
        let hand = [
            Tile::new(Red, 10),
            Tile::new(Red, 11),
            Tile::new(Red, 12),
            Tile::new(Red, 13),
            Tile::new(Yellow, 13),
            Tile::new(Black, 13),
            Tile::new(Blue, 13),
        ];

        let actual = find_all_valid_combinations(&hand);

        let mut seen = HashSet::new();
        for combination in &actual {
            for position in &combination.positions {
                assert!(seen.insert(*position));
            }
        }
        // The set of four 13s (52) wins over the run 10-13 (46).
        assert_eq!(btree_set! { 3, 4, 5, 6 }, actual[0].positions);
    }

    #[test]
    fn find_is_greedy() {
        // Greedy takes the four 13s (52) and strands the red 11 and 12, while the run 11-13
        // plus the other three 13s would be worth 75.
        let hand = [
            Tile::new(Red, 11),
            Tile::new(Red, 12),
            Tile::new(Red, 13),
            Tile::new(Yellow, 13),
            Tile::new(Blue, 13),
            Tile::new(Black, 13),
        ];

        let actual = find_all_valid_combinations(&hand);

        assert_eq!(1, actual.len());
        assert_eq!(btree_set! { 2, 3, 4, 5 }, actual[0].positions);
        assert_eq!(52, calculate_total_combination_points(&hand));
    }

    #[test]
    fn find_with_wildcard() {
        let hand = [
            Tile::new(Black, 12),
            Tile::joker(Red, 6),
            Tile::new(Black, 13),
            Tile::new(Yellow, 2),
        ];

        let actual = find_all_valid_combinations(&hand);

        assert_eq!(1, actual.len());
        assert_eq!(btree_set! { 0, 1, 2 }, actual[0].positions);
        assert_eq!(CombinationKind::Run, actual[0].kind);
        assert_eq!(11 + 12 + 13, actual[0].points);
    }

    #[test]
    fn find_in_dealt_hand_is_consistent() {
        let hand = crate::random_hand(&mut rand::thread_rng());

        let actual = find_all_valid_combinations(&hand);

        let mut seen = HashSet::new();
        for combination in &actual {
            assert!(combination.positions.len() >= MIN_COMBINATION_LEN);
            assert_eq!(Some(combination.kind), classify(&combination.tiles));
            for position in &combination.positions {
                assert!(seen.insert(*position));
            }
        }
        assert_eq!(
            actual.iter().map(|combination| combination.points).sum::<u32>(),
            calculate_total_combination_points(&hand)
        );
    }

    #[test]
    fn total_reaches_initial_meld_minimum() {
        let hand = [
            Tile::new(Red, 10),
            Tile::new(Yellow, 10),
            Tile::new(Blue, 10),
            Tile::new(Red, 11),
            Tile::new(Yellow, 11),
            Tile::new(Blue, 11),
            Tile::new(Black, 12),
            Tile::new(Yellow, 12),
            Tile::new(Blue, 12),
        ];

        let total = calculate_total_combination_points(&hand);

        assert_eq!(99, total);
        assert!(total < INITIAL_MELD_MINIMUM);
    }
}
