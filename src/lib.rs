//! Concrete structs to represent and protect the state of an Okey 101 match with methods to
//! progress through its turns.
//!
//! ## Summary
//!
//! Four players sit at seats `1..=4` and take turns in ascending order. On a turn, a seat
//! [draws](MatchState::draw) from the stock or [takes](MatchState::take_discard) the most
//! recent discard of the previous seat, may [meld](MatchState::drop_combinations), and
//! [discards](MatchState::discard) one [tile](Tile) to pass the turn. Melds are
//! [runs and sets](CombinationKind). The first meld of every seat must be worth at least
//! [INITIAL_MELD_MINIMUM] points. The match ends when some hand is empty, the stock runs out,
//! or every seat dropped combinations and holds nothing but pairs. Lower scores are better.
//!
//! ## How is a match created?
//!
//! A [Deck] of [DECK_LEN] tiles is shuffled, one tile is turned face up as the indicator, and
//! the tile one number higher in the indicator's color becomes the [joker](Wildcard::Joker).
//! [Deck::deal] hands seat `1` [FIRST_HAND_LEN] tiles and every other seat [HAND_LEN] tiles.
//! [MatchState::new] seats the players.
//!
//! [MatchManager] does all of this for connections joining its lobby and hosts every match
//! behind its own lock.
//!
//! ## How is the match advanced?
//!
//! Every [Intent] goes through [MatchState::apply]. An intent is either performed and answered
//! with [deliveries](Delivery) of [notifications](Notification), or rejected with every
//! [reason](IntentError) it violates and no change to the state.
//!
//! ### How are combinations checked?
//!
//! A run holds tiles of one color with consecutive numbers, where `1` is only low. A set holds
//! three or four tiles of one number in different colors. [Wildcards](Wildcard) stand in for
//! whatever tile completes a combination. The points of a combination are the sum of the
//! numbers its tiles [stand for](stand_in_numbers).
//!
//! [find_all_valid_combinations] suggests combinations from a hand, and [add_to_combination]
//! grows or splits combinations already on the table.
//!
//! ## How are points calculated?
//!
//! See [conclude]. A seat emptying its hand scores [WINNER_SCORE]. Everyone else scores the
//! numbers left in their hand, where a held wildcard adds [JOKER_PENALTY] and never dropping
//! anything doubles the score.
//!
//! ## How is the match viewed?
//!
//! [MatchState::match_view] shares what every seat may see, and [MatchState::get_hand] shares
//! the private hand of one seat.
//!
//! ## How are notifications delivered?
//!
//! [MatchManager] addresses deliveries to connections as [envelopes](Envelope), and
//! [dispatch] sends them through any [Transport].
//!
//! ## How are match states tested when properties are private?
//!
//! The `test` build configuration adds many required methods for testing. [MatchState]
//! implements methods to get mutable references to its properties and methods to set
//! properties for common scenarios, and random fixtures generate tiles and hands.

// Document!
#![forbid(
    rustdoc::broken_intra_doc_links,
    rustdoc::private_intra_doc_links,
    missing_docs,
    rustdoc::missing_crate_level_docs,
    rustdoc::invalid_codeblock_attributes,
    rustdoc::invalid_html_tags,
    rustdoc::bare_urls
)]
// Don't leave a build in a half finished state!
#![deny(
    warnings,
    future_incompatible,
    nonstandard_style,
    rust_2018_compatibility,
    rust_2018_idioms,
    rust_2021_compatibility,
    unused,
    single_use_lifetimes,
    unreachable_pub,
    missing_debug_implementations,
    unsafe_code
)]

pub use analyzer::*;
pub use combination::*;
pub use consts::*;
pub use deck::*;
pub use intent::*;
pub use manager::*;
pub use match_state::*;
pub use meld_editor::*;
pub use player::*;
#[cfg(test)]
pub use random::*;
pub use runtime::*;
pub use scoring::*;
pub use tile::*;
pub use types::*;

mod analyzer;
mod combination;
mod consts;
mod deck;
mod intent;
mod manager;
mod match_state;
mod meld_editor;
mod player;
#[cfg(test)]
mod random;
mod runtime;
mod scoring;
mod tile;
mod types;
