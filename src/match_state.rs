use crate::{
    conclude, has_only_pairs, joker_number, seat_index, Deal, Delivery, DiscardPiles,
    EndReason, GameOutcome, Hand, Hands, Intent, IntentError, Notification, Player, PlayerInfo,
    Seat, Stock, Table, Tile, SEATS,
};
use itertools::Itertools;
use std::array;
use std::collections::{BTreeSet, HashSet};
pub use match_meld::*;
pub use match_view::*;

mod match_discard;
mod match_draw;
mod match_meld;
mod match_view;
#[cfg(test)]
mod test_setup;

/// Owns the state of one match from the deal until it ends, and validates every [Intent]
/// before mutating anything.
///
/// Every operation returns the [deliveries](Delivery) it produced, or every reason it was
/// rejected. A rejected intent leaves the state untouched.
#[derive(Debug, Clone)]
pub struct MatchState {
    /// The four seated players with their hands, where index `0` belongs to seat `1`.
    players: [Player; SEATS],
    /// The face up tile defining the joker.
    indicator: Tile,
    /// The tiles left to draw. Drawing pops from the end.
    stock: Stock,
    /// Combinations placed by every seat.
    table: Table,
    /// The id of the next combination placed on the table.
    next_combination_id: u32,
    /// Discarded tiles of every seat.
    discards: DiscardPiles,
    /// The seat whose turn it is.
    current_seat: Seat,
    /// Whether `current_seat` may still draw or take a discard.
    draw_rights: bool,
    /// Whether `current_seat` drew or took a discard this turn.
    has_drawn: bool,
    /// Whether seat `1` is still in its first turn, where drawing is optional. Later turns of
    /// seat `1` must draw like every other seat.
    first_start: bool,
    /// Seats that completed their initial meld.
    opened: BTreeSet<Seat>,
    /// Seats that dropped combinations at least once.
    dropped: BTreeSet<Seat>,
    /// Seats that discarded and have not had their turn again since.
    discarded_this_turn: BTreeSet<Seat>,
    /// Set once the match ended.
    outcome: Option<GameOutcome>,
}

impl MatchState {
    /// Seats `players` in order, hands every seat its dealt hand, and gives the first turn to
    /// seat `1`, which may discard without drawing.
    ///
    /// # Arguments
    ///
    /// * `players`: Who sits at seats `1..=4`, in order.
    /// * `deal`: Hands, stock, and indicator from [Deck::deal](crate::Deck::deal).
    pub fn new(players: [PlayerInfo; SEATS], deal: Deal) -> MatchState {
        let Deal {
            indicator,
            hands,
            stock,
        } = deal;
        let seated = players
            .into_iter()
            .zip(hands)
            .enumerate()
            .map(|(index, (info, hand))| Player::new(index + 1, info, hand))
            .collect_vec();
        let Ok(players) = <[Player; SEATS]>::try_from(seated) else {
            unreachable!("zipping {SEATS} players with {SEATS} hands yields {SEATS} players.");
        };

        log::info!(
            "match started with indicator {:?} {} and {} tiles in stock",
            indicator.color,
            indicator.number,
            stock.len()
        );
        MatchState {
            players,
            indicator,
            stock,
            table: Table::new(),
            next_combination_id: 1,
            discards: array::from_fn(|_| Vec::new()),
            current_seat: 1,
            draw_rights: true,
            has_drawn: false,
            first_start: true,
            opened: BTreeSet::new(),
            dropped: BTreeSet::new(),
            discarded_this_turn: BTreeSet::new(),
            outcome: None,
        }
    }

    /// # Returns
    ///
    /// A private [Notification::MatchStarted] with the dealt hand for every seat, followed by
    /// the first [Notification::TurnChanged] for everyone.
    pub fn start_deliveries(&self) -> Vec<Delivery> {
        let joker_number = self.joker_number();
        self.players
            .iter()
            .map(|player| {
                Delivery::seat(
                    player.seat,
                    Notification::MatchStarted {
                        seat: player.seat,
                        indicator: self.indicator,
                        joker_number,
                        hand: player.hand.clone(),
                        stock_len: self.stock.len(),
                        first_seat: 1,
                    },
                )
            })
            .chain([self.turn_changed()])
            .collect()
    }

    /// Validates and performs `intent` for `seat`.
    ///
    /// # Errors
    ///
    /// Every [IntentError] the matching operation reports. See [MatchState::draw],
    /// [MatchState::take_discard], [MatchState::discard], [MatchState::drop_combinations],
    /// [MatchState::add_to_table_combination], [MatchState::place_new_combination], and
    /// [MatchState::finish_hand].
    pub fn apply(
        &mut self,
        seat: Seat,
        intent: &Intent,
    ) -> Result<Vec<Delivery>, HashSet<IntentError>> {
        let result = match intent {
            Intent::Draw => self.draw(seat),
            Intent::TakeDiscard => self.take_discard(seat),
            Intent::Discard { tile } => self.discard(seat, tile),
            Intent::DropCombinations { combinations } => {
                self.drop_combinations(seat, combinations)
            }
            Intent::AddToTableCombination {
                tile,
                combination,
                position,
            } => self.add_to_table_combination(seat, tile, *combination, *position),
            Intent::PlaceNewCombination { positions } => {
                self.place_new_combination(seat, positions)
            }
            Intent::FinishHand => self.finish_hand(seat),
        };

        match &result {
            Ok(deliveries) => log::debug!(
                "seat {seat} performed {intent:?} with {} deliveries",
                deliveries.len()
            ),
            Err(errors) => log::warn!("seat {seat} was rejected for {intent:?}: {errors:?}"),
        }
        result
    }

    /// # Returns
    ///
    /// Whether the match has not ended yet.
    #[inline]
    pub fn is_active(&self) -> bool {
        self.outcome.is_none()
    }

    /// # Returns
    ///
    /// The seat whose turn it is.
    #[inline]
    pub fn current_seat(&self) -> Seat {
        self.current_seat
    }

    /// # Returns
    ///
    /// The outcome once the match ended.
    #[inline]
    pub fn outcome(&self) -> Option<&GameOutcome> {
        self.outcome.as_ref()
    }

    /// # Returns
    ///
    /// The number printed on jokers in this match.
    #[inline]
    pub fn joker_number(&self) -> u8 {
        joker_number(self.indicator.number)
    }

    /// # Returns
    ///
    /// The player at `seat`, or [None] when `seat` is out of range.
    pub fn player(&self, seat: Seat) -> Option<&Player> {
        self.players.get(seat_index(seat)?)
    }

    /// # Returns
    ///
    /// Every seated player in seat order.
    #[inline]
    pub fn players(&self) -> &[Player; SEATS] {
        &self.players
    }

    /// Unbinds the connection of the player at `seat`. Their hand stays in play.
    ///
    /// # Returns
    ///
    /// The connection that was bound, if any.
    pub fn disconnect(&mut self, seat: Seat) -> Option<String> {
        let player = self.players.get_mut(seat_index(seat)?)?;
        log::warn!("seat {seat} ({}) disconnected", player.display_name);
        player.connection_id.take()
    }

    /// Collects the errors shared by every intent of `seat` into `errors`.
    ///
    /// # Returns
    ///
    /// Whether `seat` exists, so that its hand can be checked further.
    fn check_actor(&self, seat: Seat, errors: &mut HashSet<IntentError>) -> bool {
        if !self.is_active() {
            errors.insert(IntentError::GameNotActive);
        }
        if seat_index(seat).is_none() {
            errors.insert(IntentError::UnknownSeat { seat });
            return false;
        }
        if seat != self.current_seat {
            errors.insert(IntentError::OutOfTurn);
        }
        true
    }

    /// Whether the current seat may discard or meld without drawing first.
    #[inline]
    fn has_draw_satisfied(&self) -> bool {
        self.has_drawn || self.first_start
    }

    /// The hand of a seat already validated by [MatchState::check_actor].
    #[inline]
    fn hand(&self, seat: Seat) -> &Hand {
        &self.players[seat - 1].hand
    }

    #[inline]
    fn hand_mut(&mut self, seat: Seat) -> &mut Hand {
        &mut self.players[seat - 1].hand
    }

    fn turn_changed(&self) -> Delivery {
        Delivery::everyone(Notification::TurnChanged {
            seat: self.current_seat,
            draw_rights: self.draw_rights,
        })
    }

    fn stock_count_changed(&self) -> Delivery {
        Delivery::everyone(Notification::StockCountChanged {
            stock_len: self.stock.len(),
        })
    }

    /// Checks, in order, whether some hand is empty, whether the stock is empty, and whether
    /// every seat dropped combinations and holds only pairs. Ends the match on the first
    /// condition that holds.
    ///
    /// # Returns
    ///
    /// A [Notification::GameEnded] for everyone when the match ended just now.
    fn evaluate_end(&mut self) -> Option<Delivery> {
        if !self.is_active() {
            return None;
        }

        let (reason, winner) = if let Some(player) =
            self.players.iter().find(|player| player.hand.is_empty())
        {
            (EndReason::HandEmpty, Some(player.seat))
        } else if self.stock.is_empty() {
            (EndReason::DrawingStackExhausted, None)
        } else if self.dropped.len() == SEATS
            && self.players.iter().all(|player| has_only_pairs(&player.hand))
        {
            (EndReason::AllPairs, None)
        } else {
            return None;
        };

        let hands: Hands = array::from_fn(|index| self.players[index].hand.clone());
        let outcome = conclude(
            reason,
            winner,
            &hands,
            &self.dropped,
            Some(self.joker_number()),
        );
        log::info!(
            "match ended by {:?}, winners {:?}, scores {:?}",
            outcome.reason,
            outcome.winners,
            outcome.scores
        );
        self.outcome = Some(outcome.clone());
        Some(Delivery::everyone(Notification::GameEnded(outcome)))
    }
}
