use crate::{ConnectionId, Hand, Seat};
use itertools::Itertools;
use serde::{Deserialize, Serialize};

/// Describes who sits at a seat, as known before the match starts.
#[derive(Debug, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct PlayerInfo {
    /// The connection the player joined from.
    pub connection_id: ConnectionId,
    /// The [normalized](normalize_display_name) display name.
    pub display_name: String,
}

impl PlayerInfo {
    /// Creates a [PlayerInfo] with a [normalized](normalize_display_name) `display_name`.
    pub fn new(connection_id: impl Into<ConnectionId>, display_name: &str) -> PlayerInfo {
        PlayerInfo {
            connection_id: connection_id.into(),
            display_name: normalize_display_name(display_name),
        }
    }
}

/// A player seated in a match.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Player {
    /// `1..=`[SEATS](crate::SEATS).
    pub seat: Seat,
    /// [None] once the player disconnected. The hand stays in play.
    pub connection_id: Option<ConnectionId>,
    /// The [normalized](normalize_display_name) display name.
    pub display_name: String,
    /// Whether the player was dealt the extra tile and acts first.
    pub is_first_player: bool,
    /// The tiles held by the player.
    pub hand: Hand,
}

impl Player {
    pub(crate) fn new(seat: Seat, info: PlayerInfo, hand: Hand) -> Player {
        Player {
            seat,
            connection_id: Some(info.connection_id),
            display_name: info.display_name,
            is_first_player: seat == 1,
            hand,
        }
    }
}

/// Trims `display_name`, lowercases it, and capitalizes the first letter of every word.
/// Words are separated by whitespace, and runs of whitespace collapse into one space.
///
/// # Examples
///
/// ```
/// use okey_game_state::normalize_display_name;
///
/// assert_eq!("Ada Lovelace", normalize_display_name("  aDA   lovelace "));
/// ```
pub fn normalize_display_name(display_name: &str) -> String {
    display_name
        .split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first
                    .to_uppercase()
                    .chain(chars.flat_map(char::to_lowercase))
                    .collect::<String>(),
                None => String::new(),
            }
        })
        .join(" ")
}
