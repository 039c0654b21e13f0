use crate::{
    Combination, CombinationId, GameOutcome, Hand, HandPositions, MeldEditError, Position, Seat,
    Tile,
};
use serde::{Deserialize, Serialize};

/// An action a seat asks the match to perform.
///
/// # See Also
///
/// * [MatchState::apply](crate::MatchState::apply)
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Intent {
    /// Draw the top tile of the stock.
    Draw,
    /// Take the most recent discard of the previous seat.
    TakeDiscard,
    /// Discard `tile` and pass the turn.
    Discard {
        /// A tile of the acting seat's hand.
        tile: Tile,
    },
    /// Drop combinations from the hand onto the table.
    DropCombinations {
        /// Hand positions of each offered combination.
        combinations: Vec<HandPositions>,
    },
    /// Add `tile` from the hand to a combination already on the table.
    AddToTableCombination {
        /// A tile of the acting seat's hand.
        tile: Tile,
        /// The target combination.
        combination: CombinationId,
        /// Where the tile should go.
        position: Position,
    },
    /// Place one more combination after opening. There is no point minimum.
    PlaceNewCombination {
        /// Hand positions of the combination.
        positions: HandPositions,
    },
    /// Discard the last tile of the hand and win.
    FinishHand,
}

/// Describes what happened in a match. Everything but the private variants is broadcast.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Notification {
    /// Private. The match started and `hand` was dealt to `seat`.
    MatchStarted {
        /// The receiving seat.
        seat: Seat,
        /// The face up tile.
        indicator: Tile,
        /// The number printed on jokers.
        joker_number: u8,
        /// The receiving seat's hand.
        hand: Hand,
        /// Tiles left to draw.
        stock_len: usize,
        /// The seat acting first.
        first_seat: Seat,
    },
    /// Private. `tile` was drawn from the stock.
    TileDrawn {
        /// The drawn tile.
        tile: Tile,
    },
    /// The stock shrank.
    StockCountChanged {
        /// Tiles left to draw.
        stock_len: usize,
    },
    /// `seat` took a discarded tile.
    DiscardTaken {
        /// The acting seat.
        seat: Seat,
        /// The taken tile.
        tile: Tile,
    },
    /// It is now `seat`'s turn.
    TurnChanged {
        /// The seat to act.
        seat: Seat,
        /// Whether the seat may still draw.
        draw_rights: bool,
    },
    /// `seat` discarded `tile`.
    DiscardBroadcast {
        /// The acting seat.
        seat: Seat,
        /// The discarded tile.
        tile: Tile,
    },
    /// `seat` placed `combinations` on the table.
    CombinationsPlaced {
        /// The acting seat.
        seat: Seat,
        /// The placed combinations as stored on the table.
        combinations: Vec<Combination>,
        /// The sum of their points.
        total_points: u32,
        /// Whether this opened the seat.
        is_initial_meld: bool,
    },
    /// Private. The receiving seat opened.
    PlayerOpened {
        /// Points of the opening meld.
        total_points: u32,
    },
    /// `seat` added `tile` to `combination`.
    CombinationUpdated {
        /// The acting seat.
        seat: Seat,
        /// The added tile.
        tile: Tile,
        /// The grown combination.
        combination: Combination,
    },
    /// `seat` split `original` by filling a gap with `tile`.
    CombinationSplit {
        /// The acting seat.
        seat: Seat,
        /// The added tile.
        tile: Tile,
        /// The id of the split combination. `first` keeps it.
        original: CombinationId,
        /// The fragment ending with `tile`.
        first: Combination,
        /// The rest of the run.
        second: Combination,
    },
    /// `seat` played its last tile.
    HandFinished {
        /// The acting seat.
        seat: Seat,
        /// The final tile.
        tile: Tile,
    },
    /// The match is over.
    GameEnded(GameOutcome),
    /// Lobby occupancy changed.
    PlayersChanged {
        /// Display names in seat order.
        players: Vec<String>,
    },
}

/// Who receives a [Notification].
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Audience {
    /// Every seat.
    Everyone,
    /// A single seat.
    Seat(Seat),
}

/// A [Notification] addressed to an [Audience].
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Delivery {
    /// The receivers.
    pub audience: Audience,
    /// The message.
    pub notification: Notification,
}

impl Delivery {
    /// A [Delivery] to [Audience::Everyone].
    #[inline]
    pub fn everyone(notification: Notification) -> Delivery {
        Delivery {
            audience: Audience::Everyone,
            notification,
        }
    }

    /// A [Delivery] to `seat` alone.
    #[inline]
    pub fn seat(seat: Seat, notification: Notification) -> Delivery {
        Delivery {
            audience: Audience::Seat(seat),
            notification,
        }
    }
}

/// Describes the reason why an [Intent] was rejected. Rejections never end the match.
#[derive(
    Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize, thiserror::Error,
)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum IntentError {
    /// The match already ended.
    #[error("the game is not active")]
    GameNotActive,
    /// The seat is not part of the match.
    #[error("seat {seat} is not part of the match")]
    UnknownSeat {
        /// The offending seat.
        seat: Seat,
    },
    /// Another seat is to act.
    #[error("it is not your turn")]
    OutOfTurn,
    /// The seat already drew this turn.
    #[error("you already drew this turn")]
    AlreadyDrawn,
    /// The previous seat has nothing to take.
    #[error("there is no discard to take")]
    NoDiscardToTake,
    /// The seat has to draw before acting.
    #[error("you must draw first")]
    MustDrawFirst,
    /// The seat discarded this turn and may not meld.
    #[error("you already discarded this turn")]
    AlreadyDiscardedThisTurn,
    /// A named tile is not in the hand.
    #[error("the tile is not in your hand")]
    StoneNotInHand,
    /// No combinations were offered.
    #[error("no combinations were offered")]
    EmptyCombinations,
    /// A hand position is not in the hand.
    #[error("hand position {position} is out of bounds")]
    PositionsOutOfBounds {
        /// The offending position.
        position: usize,
    },
    /// A hand position was offered more than once.
    #[error("hand position {position} is offered more than once")]
    OverlappingPositions {
        /// The offending position.
        position: usize,
    },
    /// An offered combination is neither a run nor a set.
    #[error("combination {index} is neither a run nor a set")]
    InvalidCombinationShape {
        /// Index of the offending combination in the intent.
        index: usize,
    },
    /// The opening meld is worth too little.
    #[error("initial meld is worth {total} points, at least 101 are required")]
    InsufficientMeldPoints {
        /// Points offered.
        total: u32,
    },
    /// The seat has not opened yet.
    #[error("you have not completed your initial meld")]
    InitialMeldNotCompleted,
    /// There is no combination with the given id on the table.
    #[error("combination {id} is not on the table")]
    UnknownCombination {
        /// The offending id.
        id: CombinationId,
    },
    /// The target set is full.
    #[error("the combination is full")]
    CombinationFull,
    /// The tile fits nowhere in the target combination.
    #[error("the tile does not fit the combination")]
    TileDoesNotFit,
    /// The seat does not hold exactly one tile.
    #[error("you can only finish with exactly one tile, you hold {held}")]
    NotFinishingHand {
        /// Tiles held.
        held: usize,
    },
}

impl From<MeldEditError> for IntentError {
    fn from(error: MeldEditError) -> IntentError {
        match error {
            MeldEditError::CombinationFull => IntentError::CombinationFull,
            MeldEditError::EmptyCombination | MeldEditError::TileDoesNotFit => {
                IntentError::TileDoesNotFit
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Color::Red;
    use map_macro::btree_set;

    #[test]
    fn intent_wire_format() {
        let intent: Intent = serde_json::from_str(
            r#"{"type": "drop_combinations", "combinations": [[0, 1, 2], [5, 6, 7]]}"#,
        )
        .expect("deserialize should return Ok");

        assert_eq!(
            Intent::DropCombinations {
                combinations: vec![btree_set! { 0, 1, 2 }, btree_set! { 5, 6, 7 }],
            },
            intent
        );
    }

    #[test]
    fn intent_tile_wire_format() {
        let intent: Intent = serde_json::from_str(
            r#"{"type": "discard", "tile": {"color": "Red", "number": 7}}"#,
        )
        .expect("deserialize should return Ok");

        assert_eq!(
            Intent::Discard {
                tile: Tile::new(Red, 7)
            },
            intent
        );
    }

    #[test]
    fn notification_wire_format() {
        let value = serde_json::to_value(Notification::TurnChanged {
            seat: 2,
            draw_rights: true,
        })
        .expect("serialize should return Ok");

        assert_eq!(
            serde_json::json!({"type": "turn_changed", "seat": 2, "draw_rights": true}),
            value
        );
    }

    #[test]
    fn error_wire_format() {
        let value = serde_json::to_value(IntentError::InsufficientMeldPoints { total: 100 })
            .expect("serialize should return Ok");

        assert_eq!(
            serde_json::json!({"reason": "insufficient_meld_points", "total": 100}),
            value
        );
    }

    #[test]
    fn error_messages() {
        assert_eq!("it is not your turn", IntentError::OutOfTurn.to_string());
        assert_eq!(
            "combination #3 is not on the table",
            IntentError::UnknownCombination {
                id: CombinationId(3)
            }
            .to_string()
        );
    }

    #[test]
    fn meld_edit_errors_convert() {
        assert_eq!(
            IntentError::CombinationFull,
            IntentError::from(MeldEditError::CombinationFull)
        );
        assert_eq!(
            IntentError::TileDoesNotFit,
            IntentError::from(MeldEditError::TileDoesNotFit)
        );
    }
}
