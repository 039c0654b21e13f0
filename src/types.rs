use crate::{Combination, Tile, HAND_CAPACITY, MAX_NUMBER, SEATS};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// The number of a seat at the table in the range `1..=`[SEATS]. Seat `1` is the first player.
///
/// # See Also
///
/// * [SEATS]
/// * [MatchState](crate::MatchState)
pub type Seat = usize;
/// An opaque identifier of a client connection, assigned by the transport.
///
/// # See Also
///
/// * [MatchManager](crate::MatchManager)
pub type ConnectionId = String;
/// A vector of [tiles](Tile) held by one player in display order.
///
/// # See Also
///
/// * [HAND_CAPACITY]
/// * [Hands]
pub type Hand = SmallVec<[Tile; HAND_CAPACITY]>;
/// One [hand](Hand) for each seat, where index `0` belongs to seat `1`.
pub type Hands = [Hand; SEATS];
/// This is the stack of [tiles](Tile) that haven't been dealt or drawn yet. Drawing pops
/// from the end.
pub type Stock = Vec<Tile>;
/// An ordered group of [tiles](Tile) forming (or offered as) a run or a set. A run never
/// holds more than [MAX_NUMBER] tiles.
pub type Meld = SmallVec<[Tile; MAX_NUMBER as usize]>;
/// Indexes into a player's [hand](Hand), selecting the [tiles](Tile) of one combination.
///
/// # See Also
///
/// * [MatchState::drop_combinations](crate::MatchState::drop_combinations)
/// * [MatchState::place_new_combination](crate::MatchState::place_new_combination)
pub type HandPositions = BTreeSet<usize>;
/// The combinations placed on the table, in placement order.
pub type Table = Vec<Combination>;
/// One pile of discarded [tiles](Tile) for each seat, where index `0` belongs to seat `1`. The
/// most recent discard is last.
pub type DiscardPiles = [Vec<Tile>; SEATS];
/// The number of [tiles](Tile) in each hand, where index `0` belongs to seat `1`.
pub type HandLens = [usize; SEATS];
/// The final score of each seat, or [None] when a seat was not eligible for scoring.
/// Lower scores are better.
///
/// # See Also
///
/// * [GameOutcome](crate::GameOutcome)
pub type Scores = BTreeMap<Seat, Option<i32>>;

/// Identifies a combination placed on the table for the lifetime of a match.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
pub struct CombinationId(pub u32);

impl fmt::Display for CombinationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Identifies a match hosted by a [MatchManager](crate::MatchManager).
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
pub struct MatchId(pub u64);

impl fmt::Display for MatchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "match-{}", self.0)
    }
}

/// # Returns
///
/// The index into [Hands] of `seat`, or [None] when `seat` is outside `1..=`[SEATS].
#[inline]
pub fn seat_index(seat: Seat) -> Option<usize> {
    (1..=SEATS).contains(&seat).then(|| seat - 1)
}

/// # Returns
///
/// The seat whose turn follows `seat`, where seat [SEATS] wraps to seat `1`.
#[inline]
pub fn next_seat(seat: Seat) -> Seat {
    seat % SEATS + 1
}

/// # Returns
///
/// The seat whose turn precedes `seat`, where seat `1` wraps to seat [SEATS].
#[inline]
pub fn previous_seat(seat: Seat) -> Seat {
    (seat + SEATS - 2) % SEATS + 1
}
