use crate::{
    CombinationId, Meld, Seat, Tile, MAX_NUMBER, MAX_SET_LEN, MIN_COMBINATION_LEN, MIN_NUMBER,
    WILDCARD_FALLBACK_VALUE,
};
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// The number each [tile](Tile) of a combination stands for, in the same order as the tiles.
pub type StandIns = SmallVec<[u8; MAX_NUMBER as usize]>;

/// Describes the shape of a valid combination.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CombinationKind {
    /// Same color, consecutive numbers.
    Run,
    /// Same number, pairwise different colors, at most [MAX_SET_LEN] tiles.
    Set,
}

/// A combination placed on the table. Owned by the table, tagged with the seat that placed it.
///
/// # See Also
///
/// * [Table](crate::Table)
/// * [MatchState::drop_combinations](crate::MatchState::drop_combinations)
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct Combination {
    /// Identifies the combination on the table.
    pub id: CombinationId,
    /// Whether the combination is a run or a set.
    pub kind: CombinationKind,
    /// The tiles of the combination. Runs are kept in ascending order of the numbers
    /// their tiles stand for.
    pub tiles: Meld,
    /// The sum of the numbers the tiles stand for.
    pub points: u32,
    /// The seat that placed the combination.
    pub owner: Seat,
}

impl Combination {
    /// Classifies `tiles` and arranges a run in ascending order of the numbers its tiles
    /// stand for, so wildcards sit where they fill the run.
    ///
    /// # Returns
    ///
    /// A [Combination], or [None] when `tiles` are neither a run nor a set.
    pub fn new(id: CombinationId, owner: Seat, tiles: &[Tile]) -> Option<Combination> {
        let kind = classify(tiles)?;
        let tiles: Meld = match kind {
            CombinationKind::Run => tiles
                .iter()
                .zip(stand_in_numbers(tiles))
                .sorted_by_key(|&(_, number)| number)
                .map(|(&tile, _)| tile)
                .collect(),
            CombinationKind::Set => tiles.iter().copied().collect(),
        };
        Some(Combination::placed(id, owner, kind, tiles))
    }

    /// A [Combination] of already arranged `tiles` with points read from their positions.
    /// Fragments left by the [meld editor](crate::split_run_and_add_tile) are not validated.
    pub(crate) fn placed(
        id: CombinationId,
        owner: Seat,
        kind: CombinationKind,
        tiles: Meld,
    ) -> Combination {
        let points = match kind {
            CombinationKind::Run => run_numbers(&tiles)
                .map(|numbers| numbers.into_iter().map(u32::from).sum())
                .unwrap_or_else(|| calculate_combination_points(&tiles)),
            CombinationKind::Set => calculate_combination_points(&tiles),
        };
        Combination {
            id,
            kind,
            tiles,
            points,
            owner,
        }
    }
}

/// Checks `tiles` without treating any of them as wildcards.
///
/// # Returns
///
/// Whether there are at least [MIN_COMBINATION_LEN] tiles without duplicates that either all
/// share a color and form a consecutive sequence of numbers, or all share a number with
/// pairwise different colors and at most [MAX_SET_LEN] tiles.
pub fn is_valid_combination(tiles: &[Tile]) -> bool {
    if tiles.len() < MIN_COMBINATION_LEN || has_duplicates(tiles.iter()) {
        return false;
    }

    if tiles.iter().map(|tile| tile.color).all_equal() {
        return tiles
            .iter()
            .map(|tile| tile.number)
            .sorted()
            .tuple_windows()
            .all(|(lower, higher)| higher == lower + 1);
    }

    tiles.len() <= MAX_SET_LEN
        && tiles.iter().map(|tile| tile.number).all_equal()
        && tiles.iter().map(|tile| tile.color).all_unique()
}

/// Checks `tiles` where [jokers and false jokers](crate::Wildcard) stand in for any tile.
///
/// # See Also
///
/// * [classify]
pub fn is_valid_combination_with_wildcards(tiles: &[Tile]) -> bool {
    classify(tiles).is_some()
}

/// Decides the shape of `tiles` where [jokers and false jokers](crate::Wildcard) stand in for
/// any tile.
///
/// * Fewer than [MIN_COMBINATION_LEN] tiles are never a combination.
/// * Only wildcards always form a run.
/// * Duplicate regular tiles are never a combination.
/// * Regular tiles sharing a color form a run when some window of `tiles.len()` consecutive
///   numbers inside `1..=13` contains all of their numbers. Numbers do not wrap.
/// * Regular tiles sharing a number form a set of `3..=4` tiles when their colors differ.
///
/// # Returns
///
/// The [kind](CombinationKind) of combination, preferring a run, or [None].
pub fn classify(tiles: &[Tile]) -> Option<CombinationKind> {
    if tiles.len() < MIN_COMBINATION_LEN {
        return None;
    }

    let regular = regular_tiles(tiles);
    if regular.is_empty() {
        return Some(CombinationKind::Run);
    }
    if has_duplicates(regular.iter().copied()) {
        return None;
    }

    if run_start(tiles).is_some() {
        Some(CombinationKind::Run)
    } else if is_set(tiles) {
        Some(CombinationKind::Set)
    } else {
        None
    }
}

/// Finds the number each tile of `tiles` stands for. Regular tiles stand for their own number.
///
/// * In a run, wildcards take the numbers missing from the lowest fitting window, lowest
///   missing number first, in the order the wildcards appear.
/// * In a set, wildcards take the shared number.
/// * Without any regular tile, or when no shape fits, wildcards are worth
///   [WILDCARD_FALLBACK_VALUE].
pub fn stand_in_numbers(tiles: &[Tile]) -> StandIns {
    let regular = regular_tiles(tiles);
    let fallback = || -> StandIns {
        tiles
            .iter()
            .map(|tile| {
                if tile.is_wildcard() {
                    WILDCARD_FALLBACK_VALUE
                } else {
                    tile.number
                }
            })
            .collect()
    };

    let Some(first) = regular.first() else {
        return fallback();
    };

    if regular.iter().all(|tile| tile.color == first.color) {
        let Some(start) = run_start(tiles) else {
            return fallback();
        };
        let mut missing = (start..start + tiles.len() as u8)
            .filter(|number| regular.iter().all(|tile| tile.number != *number));
        return tiles
            .iter()
            .map(|tile| {
                if tile.is_wildcard() {
                    missing.next().unwrap_or(WILDCARD_FALLBACK_VALUE)
                } else {
                    tile.number
                }
            })
            .collect();
    }

    if regular.iter().all(|tile| tile.number == first.number) {
        return tiles.iter().map(|_| first.number).collect();
    }

    fallback()
}

/// # Returns
///
/// The sum of the numbers each tile of `tiles` [stands for](stand_in_numbers).
///
/// # Examples
///
/// ```
/// use okey_game_state::{calculate_combination_points, Color, Tile};
///
/// let run = [
///     Tile::new(Color::Red, 10),
///     Tile::new(Color::Red, 11),
///     Tile::new(Color::Red, 12),
/// ];
/// assert_eq!(33, calculate_combination_points(&run));
/// ```
pub fn calculate_combination_points(tiles: &[Tile]) -> u32 {
    stand_in_numbers(tiles).into_iter().map(u32::from).sum()
}

/// Reads the numbers of an arranged run from the positions of its tiles. Regular tiles keep
/// their own number, a wildcard continues its left neighbour, and leading wildcards count
/// down from the first regular tile. Gaps between regular tiles are kept as they are.
///
/// # Returns
///
/// The numbers in the order of `tiles`, or [None] when there is no regular tile or some
/// wildcard would fall outside `1..=13`.
pub fn run_numbers(tiles: &[Tile]) -> Option<StandIns> {
    let (anchor_index, anchor) = tiles
        .iter()
        .enumerate()
        .find(|(_, tile)| !tile.is_wildcard())?;

    let mut previous = isize::from(anchor.number) - anchor_index as isize - 1;
    let mut numbers = StandIns::with_capacity(tiles.len());
    for tile in tiles {
        let number = if tile.is_wildcard() {
            previous + 1
        } else {
            isize::from(tile.number)
        };
        if number < isize::from(MIN_NUMBER) || number > isize::from(MAX_NUMBER) {
            return None;
        }
        numbers.push(number as u8);
        previous = number;
    }

    Some(numbers)
}

/// The lowest number starting a window of `tiles.len()` consecutive numbers inside `1..=13`
/// that contains every regular tile, when all regular tiles share a color.
fn run_start(tiles: &[Tile]) -> Option<u8> {
    let regular = regular_tiles(tiles);
    let first = regular.first()?;
    if !regular.iter().all(|tile| tile.color == first.color)
        || has_duplicates(regular.iter().copied())
        || tiles.len() > MAX_NUMBER as usize
    {
        return None;
    }

    let (min, max) = regular
        .iter()
        .map(|tile| tile.number)
        .minmax()
        .into_option()?;
    let len = tiles.len() as u8;
    (MIN_NUMBER..=MAX_NUMBER + 1 - len).find(|&start| start <= min && max < start + len)
}

fn is_set(tiles: &[Tile]) -> bool {
    let regular = regular_tiles(tiles);
    (MIN_COMBINATION_LEN..=MAX_SET_LEN).contains(&tiles.len())
        && regular.iter().map(|tile| tile.number).all_equal()
        && regular.iter().map(|tile| tile.color).all_unique()
}

fn regular_tiles(tiles: &[Tile]) -> SmallVec<[&Tile; MAX_NUMBER as usize]> {
    tiles.iter().filter(|tile| !tile.is_wildcard()).collect()
}

#[allow(single_use_lifetimes)]
fn has_duplicates<'a>(tiles: impl Iterator<Item = &'a Tile>) -> bool {
    !tiles
        .map(|tile| (tile.color, tile.number))
        .all_unique()
}
