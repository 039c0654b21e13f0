use crate::{
    classify, run_numbers, CombinationKind, Meld, Tile, MAX_NUMBER, MAX_SET_LEN, MIN_NUMBER,
};
use either::Either;
use serde::{Deserialize, Serialize};

/// Where a [tile](Tile) should go when it is added to a combination on the table.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Position {
    /// Before the lowest number of a run.
    Start,
    /// After the highest number of a run.
    End,
    /// Into a gap of exactly one number inside a run, splitting it.
    Middle,
    /// The first of [Position::Start], [Position::End] and [Position::Middle] that fits.
    Auto,
}

/// Describes the reason why a [tile](Tile) cannot be added to a combination.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, thiserror::Error)]
pub enum MeldEditError {
    /// The combination holds no tiles.
    #[error("combination is empty")]
    EmptyCombination,
    /// The set already holds [MAX_SET_LEN] tiles, or the run already covers every number.
    #[error("combination is full")]
    CombinationFull,
    /// The tile extends neither the run nor the set at the requested position.
    #[error("tile does not fit the combination")]
    TileDoesNotFit,
}

/// Where a tile lands inside a run.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
enum Slot {
    Start,
    End,
    /// The run splits after this index.
    Gap(usize),
}

/// # Returns
///
/// Whether `tile` can be added to the run of `tiles` at `position`.
///
/// A regular tile must share the run's color and either continue it at the ends or fill a gap
/// of exactly one number. A [wildcard](crate::Wildcard) fits wherever a number is free inside
/// `1..=13`.
pub fn can_add_to_run(tile: &Tile, tiles: &[Tile], position: Position) -> bool {
    run_slot(tile, tiles, position).is_some()
}

/// # Returns
///
/// Whether `tile` can be added to the set of `tiles`: the set holds fewer than [MAX_SET_LEN]
/// tiles, and `tile` is a [wildcard](crate::Wildcard) or has the set's number and a color not
/// yet present.
pub fn can_add_to_set(tile: &Tile, tiles: &[Tile]) -> bool {
    if tiles.len() >= MAX_SET_LEN {
        return false;
    }
    if tile.is_wildcard() {
        return true;
    }

    let mut regular = tiles.iter().filter(|other| !other.is_wildcard()).peekable();
    let number_matches = regular
        .peek()
        .map_or(true, |first| first.number == tile.number);
    number_matches && regular.all(|other| other.color != tile.color)
}

/// Inserts `tile` into the single-number gap of the run of `tiles` that it fills.
///
/// The run is cut at the gap. The first fragment ends with `tile`, the second fragment holds
/// the rest. Fragments are not validated, so either may hold fewer than
/// [MIN_COMBINATION_LEN](crate::MIN_COMBINATION_LEN) tiles.
///
/// # Returns
///
/// Both fragments, or [None] when `tile` fills no gap.
pub fn split_run_and_add_tile(tiles: &[Tile], tile: Tile) -> Option<(Meld, Meld)> {
    let split_after = gap_index(&tile, tiles)?;
    let (left, right) = tiles.split_at(split_after + 1);

    let mut first = Meld::from_slice(left);
    first.push(tile);
    Some((first, Meld::from_slice(right)))
}

/// Adds `tile` to the combination of `kind` holding `tiles` at `position`. Sets ignore
/// `position`.
///
/// # Returns
///
/// Either the grown combination, or both fragments when `tile` [splits](split_run_and_add_tile)
/// a run.
///
/// # Errors
///
/// * [MeldEditError::EmptyCombination] When `tiles` is empty.
/// * [MeldEditError::CombinationFull] When the combination cannot grow.
/// * [MeldEditError::TileDoesNotFit] When `tile` fits nowhere at `position`.
pub fn add_to_combination(
    kind: CombinationKind,
    tiles: &[Tile],
    tile: Tile,
    position: Position,
) -> Result<Either<Meld, (Meld, Meld)>, MeldEditError> {
    if tiles.is_empty() {
        return Err(MeldEditError::EmptyCombination);
    }

    match kind {
        CombinationKind::Set => {
            if tiles.len() >= MAX_SET_LEN {
                return Err(MeldEditError::CombinationFull);
            }
            if !can_add_to_set(&tile, tiles) {
                return Err(MeldEditError::TileDoesNotFit);
            }
            let mut set = Meld::from_slice(tiles);
            set.push(tile);
            Ok(Either::Left(set))
        }
        CombinationKind::Run => {
            if tiles.len() >= MAX_NUMBER as usize {
                return Err(MeldEditError::CombinationFull);
            }
            let slot = run_slot(&tile, tiles, position).ok_or(MeldEditError::TileDoesNotFit)?;
            let mut run = Meld::from_slice(tiles);
            match slot {
                Slot::Start => run.insert(0, tile),
                Slot::End => run.push(tile),
                Slot::Gap(_) => {
                    return split_run_and_add_tile(tiles, tile)
                        .map(Either::Right)
                        .ok_or(MeldEditError::TileDoesNotFit)
                }
            }
            Ok(Either::Left(run))
        }
    }
}

fn run_slot(tile: &Tile, tiles: &[Tile], position: Position) -> Option<Slot> {
    match position {
        Position::Start => fits_start(tile, tiles).then_some(Slot::Start),
        Position::End => fits_end(tile, tiles).then_some(Slot::End),
        Position::Middle => gap_index(tile, tiles).map(Slot::Gap),
        Position::Auto => run_slot(tile, tiles, Position::Start)
            .or_else(|| run_slot(tile, tiles, Position::End))
            .or_else(|| run_slot(tile, tiles, Position::Middle)),
    }
}

fn fits_start(tile: &Tile, tiles: &[Tile]) -> bool {
    let Some(numbers) = run_numbers(tiles) else {
        return without_anchor(tile, tiles, Slot::Start);
    };
    matches_run_color(tile, tiles)
        && numbers.first().map_or(false, |&first| {
            first > MIN_NUMBER && (tile.is_wildcard() || tile.number + 1 == first)
        })
}

fn fits_end(tile: &Tile, tiles: &[Tile]) -> bool {
    let Some(numbers) = run_numbers(tiles) else {
        return without_anchor(tile, tiles, Slot::End);
    };
    matches_run_color(tile, tiles)
        && numbers.last().map_or(false, |&last| {
            last < MAX_NUMBER && (tile.is_wildcard() || tile.number == last + 1)
        })
}

/// The index after which `tile` fills a gap of exactly one number.
fn gap_index(tile: &Tile, tiles: &[Tile]) -> Option<usize> {
    if !matches_run_color(tile, tiles) {
        return None;
    }
    let numbers = run_numbers(tiles)?;
    numbers.windows(2).position(|pair| {
        pair[0] + 2 == pair[1] && (tile.is_wildcard() || tile.number == pair[0] + 1)
    })
}

fn matches_run_color(tile: &Tile, tiles: &[Tile]) -> bool {
    tile.is_wildcard()
        || tiles
            .iter()
            .find(|other| !other.is_wildcard())
            .map_or(true, |anchor| anchor.color == tile.color)
}

/// A run of wildcards alone has no numbers to compare against, so the grown run is classified
/// instead.
fn without_anchor(tile: &Tile, tiles: &[Tile], slot: Slot) -> bool {
    let mut run = Meld::from_slice(tiles);
    match slot {
        Slot::Start => run.insert(0, *tile),
        _ => run.push(*tile),
    }
    classify(&run) == Some(CombinationKind::Run)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Color::{Black, Blue, Red, Yellow};
    use crate::Color;

    const JOKER: Tile = Tile::joker(Red, 6);

    #[test]
    fn split_fills_gap() {
        let run = test_run(Red, &[3, 4, 6, 7]);

        assert!(can_add_to_run(&Tile::new(Red, 5), &run, Position::Middle));

        let (first, second) =
            split_run_and_add_tile(&run, Tile::new(Red, 5)).expect("split should return Some");

        assert_eq!(test_run(Red, &[3, 4, 5]), first);
        assert_eq!(test_run(Red, &[6, 7]), second);
    }

    #[test]
    fn split_without_gap() {
        let run = test_run(Red, &[3, 4, 5]);

        assert_eq!(None, split_run_and_add_tile(&run, Tile::new(Red, 6)));
        assert!(!can_add_to_run(&Tile::new(Red, 4), &run, Position::Middle));
    }

    #[test]
    fn split_with_wildcard() {
        let run = test_run(Blue, &[8, 9, 11, 12]);

        let (first, second) =
            split_run_and_add_tile(&run, JOKER).expect("split should return Some");

        assert_eq!(Some(&JOKER), first.last());
        assert_eq!(3, first.len());
        assert_eq!(test_run(Blue, &[11, 12]), second);
    }

    #[test]
    fn run_start_and_end() {
        let run = test_run(Yellow, &[5, 6, 7]);

        assert!(can_add_to_run(&Tile::new(Yellow, 4), &run, Position::Start));
        assert!(can_add_to_run(&Tile::new(Yellow, 8), &run, Position::End));
        assert!(!can_add_to_run(&Tile::new(Yellow, 8), &run, Position::Start));
        assert!(!can_add_to_run(&Tile::new(Yellow, 4), &run, Position::End));
    }

    #[test]
    fn run_wrong_color() {
        let run = test_run(Yellow, &[5, 6, 7]);

        assert!(!can_add_to_run(&Tile::new(Black, 4), &run, Position::Auto));
        assert!(!can_add_to_run(&Tile::new(Black, 8), &run, Position::Auto));
    }

    #[test]
    fn run_bounds() {
        let low = test_run(Red, &[1, 2, 3]);
        let high = test_run(Red, &[11, 12, 13]);

        assert!(!can_add_to_run(&JOKER, &low, Position::Start));
        assert!(can_add_to_run(&JOKER, &low, Position::End));
        assert!(!can_add_to_run(&JOKER, &high, Position::End));
        assert!(can_add_to_run(&JOKER, &high, Position::Start));
        assert!(!can_add_to_run(&Tile::new(Red, 1), &high, Position::Auto));
    }

    #[test]
    fn run_with_wildcard_reads_positions() {
        let run = [Tile::new(Red, 7), JOKER, Tile::new(Red, 9)];

        assert!(can_add_to_run(&Tile::new(Red, 10), &run, Position::End));
        assert!(can_add_to_run(&Tile::new(Red, 6), &run, Position::Start));
        assert!(!can_add_to_run(&Tile::new(Red, 8), &run, Position::Auto));
    }

    #[test]
    fn add_auto_prefers_start() {
        let run = test_run(Black, &[4, 5, 6]);

        let actual = add_to_combination(CombinationKind::Run, &run, JOKER, Position::Auto)
            .expect("add should return Ok");

        assert_eq!(
            Either::Left(Meld::from_iter(
                [JOKER].into_iter().chain(run.iter().copied())
            )),
            actual
        );
    }

    #[test]
    fn add_to_run_end() {
        let run = test_run(Black, &[4, 5, 6]);

        let actual =
            add_to_combination(CombinationKind::Run, &run, Tile::new(Black, 7), Position::Auto)
                .expect("add should return Ok");

        assert_eq!(Either::Left(test_run(Black, &[4, 5, 6, 7])), actual);
    }

    #[test]
    fn add_to_run_splits() {
        let run = test_run(Red, &[3, 4, 6, 7]);

        let actual =
            add_to_combination(CombinationKind::Run, &run, Tile::new(Red, 5), Position::Auto)
                .expect("add should return Ok");

        assert_eq!(
            Either::Right((test_run(Red, &[3, 4, 5]), test_run(Red, &[6, 7]))),
            actual
        );
    }

    #[test]
    fn add_does_not_fit() {
        let run = test_run(Red, &[3, 4, 5]);

        let actual_error =
            add_to_combination(CombinationKind::Run, &run, Tile::new(Red, 9), Position::Auto)
                .expect_err("add should return Err");

        assert_eq!(MeldEditError::TileDoesNotFit, actual_error);
    }

    #[test]
    fn add_to_empty() {
        let actual_error =
            add_to_combination(CombinationKind::Set, &[], Tile::new(Red, 9), Position::Auto)
                .expect_err("add should return Err");

        assert_eq!(MeldEditError::EmptyCombination, actual_error);
    }

    #[test]
    fn set_fills_then_full() {
        let set = test_set(8, &[Red, Yellow, Blue]);

        assert!(can_add_to_set(&Tile::new(Black, 8), &set));
        let full = add_to_combination(
            CombinationKind::Set,
            &set,
            Tile::new(Black, 8),
            Position::Auto,
        )
        .expect("add should return Ok")
        .left()
        .expect("set should not split");
        assert_eq!(4, full.len());

        for color in Color::colors() {
            assert!(!can_add_to_set(&Tile::new(color, 8), &full));
            let actual_error = add_to_combination(
                CombinationKind::Set,
                &full,
                Tile::new(color, 8),
                Position::Auto,
            )
            .expect_err("add should return Err");
            assert_eq!(MeldEditError::CombinationFull, actual_error);
        }
    }

    #[test]
    fn set_rejects_present_color() {
        let set = test_set(8, &[Red, Yellow, Blue]);

        assert!(!can_add_to_set(&Tile::new(Yellow, 8), &set));
    }

    #[test]
    fn set_rejects_other_number() {
        let set = test_set(8, &[Red, Yellow, Blue]);

        assert!(!can_add_to_set(&Tile::new(Black, 9), &set));
    }

    #[test]
    fn set_accepts_wildcard() {
        let set = test_set(8, &[Red, Yellow, Blue]);

        assert!(can_add_to_set(&JOKER, &set));
    }

    fn test_run(color: Color, numbers: &[u8]) -> Meld {
        numbers
            .iter()
            .map(|&number| Tile::new(color, number))
            .collect()
    }

    fn test_set(number: u8, colors: &[Color]) -> Meld {
        colors
            .iter()
            .map(|&color| Tile::new(color, number))
            .collect()
    }
}
