use crate::{DiscardPiles, GameOutcome, Hand, HandLens, MatchState, Seat, Table, Tile};
use std::array;
use std::collections::BTreeSet;

/// What every seat may see of a match. Hands are only counted.
///
/// # See Also
///
/// * [MatchState::match_view]
/// * [MatchState::get_hand]
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct MatchView<'a> {
    /// Tiles left to draw.
    pub stock_len: usize,
    /// Tiles held by each seat, where index `0` belongs to seat `1`.
    pub hand_lens: HandLens,
    /// Combinations placed by every seat.
    pub table: &'a Table,
    /// Discarded tiles of every seat.
    pub discards: &'a DiscardPiles,
    /// The seat whose turn it is.
    pub current_seat: Seat,
    /// Whether `current_seat` may still draw or take a discard.
    pub draw_rights: bool,
    /// Seats that completed their initial meld.
    pub opened: &'a BTreeSet<Seat>,
    /// The face up tile.
    pub indicator: Tile,
    /// The number printed on jokers.
    pub joker_number: u8,
    /// Set once the match ended.
    pub outcome: Option<&'a GameOutcome>,
}

impl MatchState {
    /// # Returns
    ///
    /// The public [MatchView] of the match.
    pub fn match_view(&self) -> MatchView<'_> {
        let hand_lens: HandLens = array::from_fn(|index| self.players[index].hand.len());
        MatchView {
            stock_len: self.stock.len(),
            hand_lens,
            table: &self.table,
            discards: &self.discards,
            current_seat: self.current_seat,
            draw_rights: self.draw_rights,
            opened: &self.opened,
            indicator: self.indicator,
            joker_number: self.joker_number(),
            outcome: self.outcome(),
        }
    }

    /// # Returns
    ///
    /// The hand of `seat`, or [None] when `seat` is out of range.
    pub fn get_hand(&self, seat: Seat) -> Option<&Hand> {
        self.player(seat).map(|player| &player.hand)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Color::Red;
    use crate::{Deck, PlayerInfo, FIRST_HAND_LEN, HAND_LEN, SEATS, STOCK_LEN};

    #[test]
    fn match_view_after_deal() {
        let deal = Deck::new(&mut rand::thread_rng())
            .deal()
            .expect("deal should return Ok");
        let indicator = deal.indicator;
        let match_state = MatchState::new(
            array::from_fn(|index| PlayerInfo::new(format!("connection-{index}"), "player")),
            deal,
        );

        let view = match_state.match_view();

        assert_eq!(STOCK_LEN, view.stock_len);
        assert_eq!([FIRST_HAND_LEN, HAND_LEN, HAND_LEN, HAND_LEN], view.hand_lens);
        assert!(view.table.is_empty());
        assert!(view.discards.iter().all(Vec::is_empty));
        assert_eq!(1, view.current_seat);
        assert!(view.draw_rights);
        assert!(view.opened.is_empty());
        assert_eq!(indicator, view.indicator);
        assert_eq!(None, view.outcome);
    }

    #[test]
    fn match_view_follows_play() {
        let mut match_state = MatchState::scripted_match_state();
        match_state.mut_discards()[1].push(Tile::new(Red, 9));
        match_state.mut_opened().insert(3);
        match_state.end_by_stock();

        let view = match_state.match_view();

        assert_eq!(0, view.stock_len);
        assert_eq!(vec![Tile::new(Red, 9)], view.discards[1]);
        assert!(view.opened.contains(&3));
        assert_eq!(6, view.joker_number);
        assert!(view.outcome.is_some());
    }

    #[test]
    fn get_hand() {
        let match_state = MatchState::scripted_match_state();

        assert_eq!(
            Some(&match_state.players()[1].hand),
            match_state.get_hand(2)
        );
        assert_eq!(None, match_state.get_hand(0));
        assert_eq!(None, match_state.get_hand(SEATS + 1));
    }
}
