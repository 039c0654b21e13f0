use crate::Color::{Black, Blue, Red, Yellow};
use crate::{
    classify, Combination, CombinationId, CombinationKind, Deal, DiscardPiles, Hand, MatchState,
    Meld, PlayerInfo, Seat, Stock, Tile, SEATS,
};
use std::array;
use std::collections::BTreeSet;

/// The face up tile of every scripted match. Jokers are red 6s.
const TEST_INDICATOR: Tile = Tile {
    is_indicator: true,
    ..Tile::new(Red, 5)
};

impl MatchState {
    /// Generates a [MatchState] where nobody holds a tile.
    ///
    /// # Returns
    ///
    /// A [MatchState] struct with the properties set to the following:
    /// * `players`: Seats `1..=4` bound to `"connection-1"` through `"connection-4"`.
    /// * `indicator`: Red 5, so that jokers are red 6s.
    /// * `stock`: An empty stock.
    /// * `current_seat`: `1` in its first turn.
    pub fn empty_match_state() -> MatchState {
        MatchState::new(
            test_players(),
            Deal {
                indicator: TEST_INDICATOR,
                hands: array::from_fn(|_| Hand::new()),
                stock: Stock::new(),
            },
        )
    }

    /// Generates a [MatchState] with small hands without combinations and four tiles in the
    /// stock.
    ///
    /// # Returns
    ///
    /// A [MatchState] struct with the properties set to the following:
    /// * `hands`:
    ///   * Seat `1`: Yellow 1, Black 4, Blue 7, Yellow 10, Black 12.
    ///   * Seat `2`: Blue 1, Yellow 5, Black 10, Yellow 12.
    ///   * Seat `3`: Blue 3, Yellow 7, Black 11.
    ///   * Seat `4`: Black 2, Blue 9, Yellow 13.
    /// * `stock`: Red 1, Red 2, Red 3, and Red 4 on top.
    /// * Everything else as in [MatchState::empty_match_state].
    pub fn scripted_match_state() -> MatchState {
        let hands = [
            Hand::from_slice(&[
                Tile::new(Yellow, 1),
                Tile::new(Black, 4),
                Tile::new(Blue, 7),
                Tile::new(Yellow, 10),
                Tile::new(Black, 12),
            ]),
            Hand::from_slice(&[
                Tile::new(Blue, 1),
                Tile::new(Yellow, 5),
                Tile::new(Black, 10),
                Tile::new(Yellow, 12),
            ]),
            Hand::from_slice(&[Tile::new(Blue, 3), Tile::new(Yellow, 7), Tile::new(Black, 11)]),
            Hand::from_slice(&[Tile::new(Black, 2), Tile::new(Blue, 9), Tile::new(Yellow, 13)]),
        ];
        let stock = (1..=4).map(|number| Tile::new(Red, number)).collect();
        MatchState::new(
            test_players(),
            Deal {
                indicator: TEST_INDICATOR,
                hands,
                stock,
            },
        )
    }

    /// Hands the turn to `seat` after it drew, outside the first turn of the match.
    pub fn mid_turn(&mut self, seat: Seat) {
        self.current_seat = seat;
        self.first_start = false;
        self.draw_rights = false;
        self.has_drawn = true;
    }

    /// Hands the turn to `seat` before it drew, outside the first turn of the match.
    pub fn start_turn(&mut self, seat: Seat) {
        self.current_seat = seat;
        self.first_start = false;
        self.draw_rights = true;
        self.has_drawn = false;
    }

    /// Empties the stock and ends the match.
    pub fn end_by_stock(&mut self) {
        self.stock.clear();
        self.evaluate_end();
    }

    /// Places `tiles` on the table as a combination of `owner`, without validating them.
    /// Tiles that are neither a run nor a set are placed as a run.
    ///
    /// # Returns
    ///
    /// The id of the placed combination.
    pub fn place_test_combination(&mut self, owner: Seat, tiles: Vec<Tile>) -> CombinationId {
        let kind = classify(&tiles).unwrap_or(CombinationKind::Run);
        let id = CombinationId(self.next_combination_id);
        self.next_combination_id += 1;
        let tiles: Meld = tiles.into_iter().collect();
        self.table.push(Combination::placed(id, owner, kind, tiles));
        id
    }

    /// A mutable reference to the hand of `seat`.
    pub fn mut_hand(&mut self, seat: Seat) -> &mut Hand {
        &mut self.players[seat - 1].hand
    }

    /// A mutable reference to `self.stock`.
    pub fn mut_stock(&mut self) -> &mut Stock {
        &mut self.stock
    }

    /// A mutable reference to `self.discards`.
    pub fn mut_discards(&mut self) -> &mut DiscardPiles {
        &mut self.discards
    }

    /// A mutable reference to `self.opened`.
    pub fn mut_opened(&mut self) -> &mut BTreeSet<Seat> {
        &mut self.opened
    }

    /// A mutable reference to `self.dropped`.
    pub fn mut_dropped(&mut self) -> &mut BTreeSet<Seat> {
        &mut self.dropped
    }

    /// A mutable reference to `self.discarded_this_turn`.
    pub fn mut_discarded_this_turn(&mut self) -> &mut BTreeSet<Seat> {
        &mut self.discarded_this_turn
    }
}

fn test_players() -> [PlayerInfo; SEATS] {
    array::from_fn(|index| PlayerInfo::new(format!("connection-{}", index + 1), "player"))
}
