use crate::{next_seat, Delivery, IntentError, MatchState, Notification, Seat, Tile};
use std::collections::HashSet;

impl MatchState {
    /// Moves `tile` from `seat`'s hand onto its discard pile and passes the turn to the next
    /// seat, which regains its draw right.
    ///
    /// # Errors
    ///
    /// * [IntentError::GameNotActive] Attempting to discard after the match ended.
    /// * [IntentError::UnknownSeat] Attempting to discard for a seat outside the match.
    /// * [IntentError::OutOfTurn] Attempting to discard during another seat's turn.
    /// * [IntentError::MustDrawFirst] Attempting to discard before drawing, outside the first
    /// turn of the match.
    /// * [IntentError::StoneNotInHand] Attempting to discard a tile not in the hand.
    pub fn discard(
        &mut self,
        seat: Seat,
        tile: &Tile,
    ) -> Result<Vec<Delivery>, HashSet<IntentError>> {
        let position = self.check_discard(seat, tile)?;

        let tile = self.hand_mut(seat).remove(position);
        self.discards[seat - 1].push(tile);
        self.discarded_this_turn.insert(seat);

        self.current_seat = next_seat(seat);
        self.draw_rights = true;
        self.has_drawn = false;
        self.first_start = false;
        self.discarded_this_turn.remove(&self.current_seat);
        log::debug!("turn passed from seat {seat} to seat {}", self.current_seat);

        let mut deliveries = vec![
            Delivery::everyone(Notification::DiscardBroadcast { seat, tile }),
            self.turn_changed(),
        ];
        deliveries.extend(self.evaluate_end());
        Ok(deliveries)
    }

    /// Plays the last tile of `seat`'s hand face down, which ends the match with `seat` as
    /// the winner.
    ///
    /// # Errors
    ///
    /// * [IntentError::GameNotActive] Attempting to finish after the match ended.
    /// * [IntentError::UnknownSeat] Attempting to finish for a seat outside the match.
    /// * [IntentError::OutOfTurn] Attempting to finish during another seat's turn.
    /// * [IntentError::MustDrawFirst] Attempting to finish before drawing, outside the first
    /// turn of the match.
    /// * [IntentError::NotFinishingHand] Attempting to finish while holding other than one tile.
    pub fn finish_hand(&mut self, seat: Seat) -> Result<Vec<Delivery>, HashSet<IntentError>> {
        self.check_finish_hand(seat)?;

        let Some(tile) = self.hand_mut(seat).pop() else {
            unreachable!("a hand without exactly one tile should have been rejected by the check.");
        };
        log::info!("seat {seat} finished its hand");

        let mut deliveries = vec![Delivery::everyone(Notification::HandFinished { seat, tile })];
        deliveries.extend(self.evaluate_end());
        Ok(deliveries)
    }

    /// # Returns
    ///
    /// The position of `tile` in `seat`'s hand.
    fn check_discard(&self, seat: Seat, tile: &Tile) -> Result<usize, HashSet<IntentError>> {
        let mut errors = HashSet::with_capacity(4);
        if !self.check_actor(seat, &mut errors) {
            return Err(errors);
        }
        if seat == self.current_seat && !self.has_draw_satisfied() {
            errors.insert(IntentError::MustDrawFirst);
        }

        let position = self.hand(seat).iter().position(|held| held == tile);
        if position.is_none() {
            errors.insert(IntentError::StoneNotInHand);
        }

        match position {
            Some(position) if errors.is_empty() => Ok(position),
            _ => Err(errors),
        }
    }

    fn check_finish_hand(&self, seat: Seat) -> Result<(), HashSet<IntentError>> {
        let mut errors = HashSet::with_capacity(4);
        if !self.check_actor(seat, &mut errors) {
            return Err(errors);
        }
        if seat == self.current_seat && !self.has_draw_satisfied() {
            errors.insert(IntentError::MustDrawFirst);
        }

        let held = self.hand(seat).len();
        if held != 1 {
            errors.insert(IntentError::NotFinishingHand { held });
        }

        if !errors.is_empty() {
            return Err(errors);
        }

        Ok(())
    }
}
