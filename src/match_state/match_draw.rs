use crate::{previous_seat, Delivery, IntentError, MatchState, Notification, Seat};
use std::collections::HashSet;

impl MatchState {
    /// Pops the top tile of the stock into `seat`'s hand and spends the seat's draw right.
    /// Drawing from an empty stock ends the match instead of granting a tile.
    ///
    /// # Errors
    ///
    /// * [IntentError::GameNotActive] Attempting to draw after the match ended.
    /// * [IntentError::UnknownSeat] Attempting to draw for a seat outside the match.
    /// * [IntentError::OutOfTurn] Attempting to draw during another seat's turn.
    /// * [IntentError::AlreadyDrawn] Attempting to draw twice in one turn.
    pub fn draw(&mut self, seat: Seat) -> Result<Vec<Delivery>, HashSet<IntentError>> {
        self.check_draw(seat)?;

        let Some(tile) = self.stock.pop() else {
            log::info!("seat {seat} tried to draw from an empty stock");
            return Ok(self.evaluate_end().into_iter().collect());
        };
        self.hand_mut(seat).push(tile);
        self.draw_rights = false;
        self.has_drawn = true;

        let mut deliveries = vec![
            Delivery::seat(seat, Notification::TileDrawn { tile }),
            self.stock_count_changed(),
        ];
        deliveries.extend(self.evaluate_end());
        Ok(deliveries)
    }

    /// Moves the most recent discard of the seat before `seat` into `seat`'s hand and spends
    /// the seat's draw right.
    ///
    /// # Errors
    ///
    /// * [IntentError::GameNotActive] Attempting to take after the match ended.
    /// * [IntentError::UnknownSeat] Attempting to take for a seat outside the match.
    /// * [IntentError::OutOfTurn] Attempting to take during another seat's turn.
    /// * [IntentError::AlreadyDrawn] Attempting to take after drawing this turn.
    /// * [IntentError::NoDiscardToTake] The previous seat has not discarded anything left to
    /// take.
    pub fn take_discard(&mut self, seat: Seat) -> Result<Vec<Delivery>, HashSet<IntentError>> {
        self.check_take_discard(seat)?;

        let Some(tile) = self.discards[previous_seat(seat) - 1].pop() else {
            unreachable!("an empty discard pile should have been rejected by the check.");
        };
        self.hand_mut(seat).push(tile);
        self.draw_rights = false;
        self.has_drawn = true;

        let mut deliveries = vec![Delivery::everyone(Notification::DiscardTaken { seat, tile })];
        deliveries.extend(self.evaluate_end());
        Ok(deliveries)
    }

    fn check_draw(&self, seat: Seat) -> Result<(), HashSet<IntentError>> {
        let mut errors = HashSet::with_capacity(3);
        self.check_draw_rights(seat, &mut errors);

        if !errors.is_empty() {
            return Err(errors);
        }

        Ok(())
    }

    fn check_take_discard(&self, seat: Seat) -> Result<(), HashSet<IntentError>> {
        let mut errors = HashSet::with_capacity(4);
        if self.check_draw_rights(seat, &mut errors)
            && self.discards[previous_seat(seat) - 1].is_empty()
        {
            errors.insert(IntentError::NoDiscardToTake);
        }

        if !errors.is_empty() {
            return Err(errors);
        }

        Ok(())
    }

    /// Collects the errors of drawing in any way into `errors`.
    ///
    /// # Returns
    ///
    /// Whether `seat` exists.
    fn check_draw_rights(&self, seat: Seat, errors: &mut HashSet<IntentError>) -> bool {
        if !self.check_actor(seat, errors) {
            return false;
        }
        if seat == self.current_seat && !self.draw_rights {
            errors.insert(IntentError::AlreadyDrawn);
        }
        true
    }
}
