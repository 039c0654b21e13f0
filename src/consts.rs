use crate::{Color, MAX_NUMBER};
use konst::primitive::parse_usize;
use konst::{option, result};

/// The number of seats in every match. Exactly `4` players.
///
/// # See Also
///
/// * [MatchState::new](crate::MatchState::new)
/// * [Deck::deal](crate::Deck::deal)
pub const SEATS: usize = 4;
/// The number of physical copies of every regular [tile](crate::Tile). `2` copies.
pub const COPIES_PER_TILE: usize = 2;
/// The number of printed false jokers in the deck. `2` false jokers.
pub const FALSE_JOKERS: usize = 2;
/// The number of [tiles](crate::Tile) in a complete deck. `106` tiles from
/// [every color](Color::colors) times every number times [copies](COPIES_PER_TILE)
/// plus [false jokers](FALSE_JOKERS).
pub const DECK_LEN: usize =
    Color::COLORS_LEN * MAX_NUMBER as usize * COPIES_PER_TILE + FALSE_JOKERS;
/// The number of [tiles](crate::Tile) dealt to the first player. `22` tiles.
pub const FIRST_HAND_LEN: usize = 22;
/// The number of [tiles](crate::Tile) dealt to every other player. `21` tiles.
pub const HAND_LEN: usize = 21;
/// The number of [tiles](crate::Tile) left in the stock after dealing. `21` tiles.
pub const STOCK_LEN: usize = DECK_LEN - FIRST_HAND_LEN - HAND_LEN * (SEATS - 1);
const _: () = assert!(STOCK_LEN == 21);

/// The minimum number of [tiles](crate::Tile) in a run or a set. `3` tiles.
pub const MIN_COMBINATION_LEN: usize = 3;
/// The maximum number of [tiles](crate::Tile) in a set, one per [color](Color). `4` tiles.
pub const MAX_SET_LEN: usize = Color::COLORS_LEN;
/// The minimum number of points a player must drop on their first meld. `101` points.
///
/// # See Also
///
/// * [MatchState::drop_combinations](crate::MatchState::drop_combinations)
pub const INITIAL_MELD_MINIMUM: u32 = 101;
/// The score of the player who empties their hand. `-101`, since lower scores are better.
pub const WINNER_SCORE: i32 = -101;
/// The penalty added to a player still holding a joker or a false joker when the match ends.
/// `101` points.
pub const JOKER_PENALTY: i32 = 101;
/// The value of a wildcard when nothing anchors the number it stands for. `7` points.
pub const WILDCARD_FALLBACK_VALUE: u8 = 7;

/// All small, dynamically allocated hands will be stored on the stack until the number of
/// [tiles](crate::Tile) in a hand becomes greater than `HAND_CAPACITY`. If the environment
/// variable named `HAND_CAPACITY` is present at compile time and is able to be parsed into
/// a `usize`, set to the value of the environment variable. Otherwise, it is set to `24`.
///
/// # See Also
///
/// * [Hand](crate::Hand)
pub const HAND_CAPACITY: usize = option::unwrap_or!(
    option::and_then!(option_env!("HAND_CAPACITY"), |str| result::ok!(
        parse_usize(str)
    )),
    24
);
/// The maximum number of matches hosted by a single [MatchManager](crate::MatchManager).
/// If the environment variable named `MATCH_LIMIT` is present at compile time and is able
/// to be parsed into a `usize`, set to the value of the environment variable. Otherwise,
/// it is set to `1024`.
///
/// # Panics
///
/// * When the given value is `0`
pub const MATCH_LIMIT: usize = option::unwrap_or!(
    option::and_then!(option_env!("MATCH_LIMIT"), |str| result::ok!(parse_usize(
        str
    ))),
    1024
);
const _: () = assert!(MATCH_LIMIT > 0);
