use num_derive::FromPrimitive;
use rand::distributions::{Distribution, Standard};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;

/// The lowest number printed on a [`Tile`]. `1`.
pub const MIN_NUMBER: u8 = 1;
/// The highest number printed on a [`Tile`]. `13`.
pub const MAX_NUMBER: u8 = 13;
/// Every number printed on a [`Tile`] in ascending order.
pub const NUMBERS: RangeInclusive<u8> = MIN_NUMBER..=MAX_NUMBER;

/// Describes the color on a [`Tile`].
#[derive(
    Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, FromPrimitive, Serialize, Deserialize,
)]
pub enum Color {
    /// `0`.
    Red = 0,
    /// `1`.
    Yellow = 1,
    /// `2`.
    Black = 2,
    /// `3`.
    Blue = 3,
}

impl Color {
    /// The number of [`Color`] variants. 4 colors.
    pub const COLORS_LEN: usize = 4;

    /// # Returns
    ///
    /// An array of all [`Color`] variants in order.
    #[inline]
    pub fn colors() -> [Color; Color::COLORS_LEN] {
        [Color::Red, Color::Yellow, Color::Black, Color::Blue]
    }
}

impl Distribution<Color> for Standard {
    #[inline]
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Color {
        let index = rng.gen_range(0..Color::COLORS_LEN);
        num_traits::FromPrimitive::from_usize(index).unwrap_or_else(|| {
            unreachable!(
                "index ({:?}) should be matched since colors cover all indexes \
                in range 0..Color::COLORS_LEN (0..{:?}).",
                index,
                Color::COLORS_LEN
            );
        })
    }
}

/// Describes how a [`Tile`] acts as a wildcard in combinations.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Wildcard {
    /// A regular tile printed with the indicator's color and the
    /// [joker number](joker_number). It keeps its printed color and number for identity.
    Joker,
    /// A printed wildcard whose effective color and number are the indicator's.
    FalseJoker,
}

/// Describes one physical tile in the game.
///
/// A tile can be at most one kind of [`Wildcard`]. Wildcards keep a color and number so that
/// they can be identified in a hand, but combinations treat them as whatever they stand for.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct Tile {
    /// The printed (or, for false jokers, effective) color.
    pub color: Color,
    /// The printed (or, for false jokers, effective) number in [`NUMBERS`].
    pub number: u8,
    /// Whether and how the tile acts as a wildcard.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wildcard: Option<Wildcard>,
    /// Whether the tile was turned face up to define the joker.
    #[serde(default)]
    pub is_indicator: bool,
}

impl Tile {
    /// A regular [`Tile`].
    #[inline]
    pub const fn new(color: Color, number: u8) -> Tile {
        Tile {
            color,
            number,
            wildcard: None,
            is_indicator: false,
        }
    }

    /// A [joker](Wildcard::Joker) printed with `color` and `number`.
    #[inline]
    pub const fn joker(color: Color, number: u8) -> Tile {
        Tile {
            color,
            number,
            wildcard: Some(Wildcard::Joker),
            is_indicator: false,
        }
    }

    /// A [false joker](Wildcard::FalseJoker) standing in as `color` and `number`.
    #[inline]
    pub const fn false_joker(color: Color, number: u8) -> Tile {
        Tile {
            color,
            number,
            wildcard: Some(Wildcard::FalseJoker),
            is_indicator: false,
        }
    }

    /// Whether the tile is a [joker or a false joker](Wildcard).
    #[inline]
    pub fn is_wildcard(&self) -> bool {
        self.wildcard.is_some()
    }

    /// Whether `other` has the same color and number, ignoring wildcard and indicator flags.
    #[inline]
    pub fn same_face(&self, other: &Tile) -> bool {
        self.color == other.color && self.number == other.number
    }
}

/// The number of the joker defined by an indicator number: one higher, where `13` wraps to `1`.
///
/// # Examples
///
/// ```
/// use okey_game_state::joker_number;
///
/// assert_eq!(6, joker_number(5));
/// assert_eq!(1, joker_number(13));
/// ```
#[inline]
pub fn joker_number(indicator_number: u8) -> u8 {
    if indicator_number >= MAX_NUMBER {
        MIN_NUMBER
    } else {
        indicator_number + 1
    }
}
