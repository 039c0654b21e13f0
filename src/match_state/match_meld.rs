use crate::{
    add_to_combination, calculate_combination_points, classify, find_all_valid_combinations,
    Combination, CombinationId, CombinationKind, Delivery, HandCombination, HandPositions,
    IntentError, MatchState, Meld, Notification, Position, Seat, Tile, INITIAL_MELD_MINIMUM,
};
use either::Either;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};
use std::slice;

/// What the [hand analyzer](find_all_valid_combinations) finds in a seat's hand.
///
/// # See Also
///
/// * [MatchState::suggest_meld]
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct MeldSuggestion {
    /// Non-overlapping combinations in acceptance order.
    pub combinations: Vec<HandCombination>,
    /// The sum of their points.
    pub total_points: u32,
    /// Whether dropping all of them would be accepted: the seat already opened, or
    /// `total_points` reaches [INITIAL_MELD_MINIMUM].
    pub meets_initial_minimum: bool,
}

/// Combinations that passed every check, with the hand positions they consume.
#[derive(Debug)]
struct CheckedMelds {
    melds: Vec<Meld>,
    positions: BTreeSet<usize>,
    total_points: u32,
}

impl MatchState {
    /// Removes the tiles at each of `combinations` from `seat`'s hand and places them on the
    /// table as runs or sets. The first drop of a seat opens it and must be worth at least
    /// [INITIAL_MELD_MINIMUM] points. The turn does not pass.
    ///
    /// # Arguments
    ///
    /// * `combinations`: Hand positions of each combination.
    ///
    /// # Errors
    ///
    /// * [IntentError::GameNotActive] Attempting to drop after the match ended.
    /// * [IntentError::UnknownSeat] Attempting to drop for a seat outside the match.
    /// * [IntentError::OutOfTurn] Attempting to drop during another seat's turn.
    /// * [IntentError::MustDrawFirst] Attempting to drop before drawing, outside the first turn
    /// of the match.
    /// * [IntentError::AlreadyDiscardedThisTurn] Attempting to drop after discarding.
    /// * [IntentError::EmptyCombinations] Attempting to drop nothing, or an empty combination.
    /// * [IntentError::PositionsOutOfBounds] Attempting to drop tiles not in the hand.
    /// * [IntentError::OverlappingPositions] Attempting to drop a tile twice.
    /// * [IntentError::InvalidCombinationShape] Attempting to drop neither a run nor a set.
    /// * [IntentError::InsufficientMeldPoints] Attempting to open with too few points.
    pub fn drop_combinations(
        &mut self,
        seat: Seat,
        combinations: &[HandPositions],
    ) -> Result<Vec<Delivery>, HashSet<IntentError>> {
        let mut errors = HashSet::with_capacity(8);
        let checked = self.check_melds(seat, combinations, &mut errors);
        if let Some(checked) = &checked {
            if !self.opened.contains(&seat) && checked.total_points < INITIAL_MELD_MINIMUM {
                errors.insert(IntentError::InsufficientMeldPoints {
                    total: checked.total_points,
                });
            }
        }
        let Some(checked) = checked.filter(|_| errors.is_empty()) else {
            return Err(errors);
        };

        let is_initial_meld = self.opened.insert(seat);
        let total_points = checked.total_points;
        let mut deliveries = vec![self.place(seat, checked, is_initial_meld)];
        if is_initial_meld {
            log::info!("seat {seat} opened with {total_points} points");
            deliveries.push(Delivery::seat(
                seat,
                Notification::PlayerOpened { total_points },
            ));
        }
        deliveries.extend(self.evaluate_end());
        Ok(deliveries)
    }

    /// Places one more combination from `seat`'s hand after the seat opened. There is no point
    /// minimum.
    ///
    /// # Errors
    ///
    /// * Every error of [MatchState::drop_combinations] but
    /// [IntentError::InsufficientMeldPoints].
    /// * [IntentError::InitialMeldNotCompleted] Attempting to place before opening.
    pub fn place_new_combination(
        &mut self,
        seat: Seat,
        positions: &HandPositions,
    ) -> Result<Vec<Delivery>, HashSet<IntentError>> {
        let mut errors = HashSet::with_capacity(8);
        let checked = self.check_melds(seat, slice::from_ref(positions), &mut errors);
        if !self.opened.contains(&seat) {
            errors.insert(IntentError::InitialMeldNotCompleted);
        }
        let Some(checked) = checked.filter(|_| errors.is_empty()) else {
            return Err(errors);
        };

        let mut deliveries = vec![self.place(seat, checked, false)];
        deliveries.extend(self.evaluate_end());
        Ok(deliveries)
    }

    /// Moves `tile` from `seat`'s hand into the table combination identified by `combination`.
    /// A tile filling a gap of one number splits the run in two. The fragment ending with
    /// `tile` keeps the id.
    ///
    /// # Errors
    ///
    /// * [IntentError::GameNotActive] Attempting to add after the match ended.
    /// * [IntentError::UnknownSeat] Attempting to add for a seat outside the match.
    /// * [IntentError::OutOfTurn] Attempting to add during another seat's turn.
    /// * [IntentError::MustDrawFirst] Attempting to add before drawing, outside the first turn
    /// of the match.
    /// * [IntentError::AlreadyDiscardedThisTurn] Attempting to add after discarding.
    /// * [IntentError::InitialMeldNotCompleted] Attempting to add before opening.
    /// * [IntentError::StoneNotInHand] Attempting to add a tile not in the hand.
    /// * [IntentError::UnknownCombination] Attempting to add to a combination not on the table.
    /// * [IntentError::CombinationFull] Attempting to add to a full combination.
    /// * [IntentError::TileDoesNotFit] Attempting to add a tile the combination does not accept
    /// at `position`.
    pub fn add_to_table_combination(
        &mut self,
        seat: Seat,
        tile: &Tile,
        combination: CombinationId,
        position: Position,
    ) -> Result<Vec<Delivery>, HashSet<IntentError>> {
        let (hand_position, table_index, edited) =
            self.check_add_to_table_combination(seat, tile, combination, position)?;

        let tile = self.hand_mut(seat).remove(hand_position);
        let target = &self.table[table_index];
        let (kind, owner) = (target.kind, target.owner);

        let delivery = match edited {
            Either::Left(tiles) => {
                let updated = Combination::placed(combination, owner, kind, tiles);
                self.table[table_index] = updated.clone();
                Notification::CombinationUpdated {
                    seat,
                    tile,
                    combination: updated,
                }
            }
            Either::Right((first, second)) => {
                let first = Combination::placed(combination, owner, CombinationKind::Run, first);
                let second_id = self.next_combination_id();
                let second = Combination::placed(second_id, owner, CombinationKind::Run, second);
                self.table[table_index] = first.clone();
                self.table.insert(table_index + 1, second.clone());
                log::debug!("seat {seat} split {combination} into {combination} and {second_id}");
                Notification::CombinationSplit {
                    seat,
                    tile,
                    original: combination,
                    first,
                    second,
                }
            }
        };

        let mut deliveries = vec![Delivery::everyone(delivery)];
        deliveries.extend(self.evaluate_end());
        Ok(deliveries)
    }

    /// Runs the [hand analyzer](find_all_valid_combinations) over `seat`'s hand.
    ///
    /// # Returns
    ///
    /// A [MeldSuggestion], or [None] when `seat` is out of range.
    pub fn suggest_meld(&self, seat: Seat) -> Option<MeldSuggestion> {
        let player = self.player(seat)?;
        let combinations = find_all_valid_combinations(&player.hand);
        let total_points = combinations
            .iter()
            .map(|combination| combination.points)
            .sum();
        Some(MeldSuggestion {
            combinations,
            total_points,
            meets_initial_minimum: self.opened.contains(&seat)
                || total_points >= INITIAL_MELD_MINIMUM,
        })
    }

    /// Removes the checked tiles from `seat`'s hand and places them on the table.
    ///
    /// # Returns
    ///
    /// A [Notification::CombinationsPlaced] for everyone.
    fn place(&mut self, seat: Seat, checked: CheckedMelds, is_initial_meld: bool) -> Delivery {
        let hand = self.hand_mut(seat);
        for &position in checked.positions.iter().rev() {
            hand.remove(position);
        }

        let mut combinations = Vec::with_capacity(checked.melds.len());
        for tiles in checked.melds {
            let id = self.next_combination_id();
            let Some(combination) = Combination::new(id, seat, &tiles) else {
                unreachable!("every checked meld is either a run or a set.");
            };
            combinations.push(combination);
        }
        self.table.extend(combinations.iter().cloned());
        self.dropped.insert(seat);

        Delivery::everyone(Notification::CombinationsPlaced {
            seat,
            combinations,
            total_points: checked.total_points,
            is_initial_meld,
        })
    }

    fn next_combination_id(&mut self) -> CombinationId {
        let id = CombinationId(self.next_combination_id);
        self.next_combination_id += 1;
        id
    }

    /// Collects every error of placing `combinations` from `seat`'s hand into `errors`, except
    /// for the rules on opening.
    ///
    /// # Returns
    ///
    /// The tiles of each combination when no error was found.
    fn check_melds(
        &self,
        seat: Seat,
        combinations: &[HandPositions],
        errors: &mut HashSet<IntentError>,
    ) -> Option<CheckedMelds> {
        if !self.check_actor(seat, errors) {
            return None;
        }
        self.check_may_meld(seat, errors);

        if combinations.is_empty() || combinations.iter().any(BTreeSet::is_empty) {
            errors.insert(IntentError::EmptyCombinations);
            return None;
        }

        let hand = self.hand(seat);
        let mut used = BTreeSet::new();
        for &position in combinations.iter().flatten() {
            if position >= hand.len() {
                errors.insert(IntentError::PositionsOutOfBounds { position });
            } else if !used.insert(position) {
                errors.insert(IntentError::OverlappingPositions { position });
            }
        }

        let mut melds = Vec::with_capacity(combinations.len());
        for (index, positions) in combinations.iter().enumerate() {
            let Some(tiles) = positions
                .iter()
                .map(|&position| hand.get(position).copied())
                .collect::<Option<Meld>>()
            else {
                continue;
            };
            if classify(&tiles).is_none() {
                errors.insert(IntentError::InvalidCombinationShape { index });
            }
            melds.push(tiles);
        }

        if !errors.is_empty() {
            return None;
        }

        let total_points = melds
            .iter()
            .map(|tiles| calculate_combination_points(tiles))
            .sum();
        Some(CheckedMelds {
            melds,
            positions: used,
            total_points,
        })
    }

    /// Collects the errors of changing the table during `seat`'s turn into `errors`.
    fn check_may_meld(&self, seat: Seat, errors: &mut HashSet<IntentError>) {
        if seat == self.current_seat && !self.has_draw_satisfied() {
            errors.insert(IntentError::MustDrawFirst);
        }
        if self.discarded_this_turn.contains(&seat) {
            errors.insert(IntentError::AlreadyDiscardedThisTurn);
        }
    }

    /// # Returns
    ///
    /// The position of `tile` in `seat`'s hand, the index of the target in the table, and the
    /// edited tiles.
    #[allow(clippy::type_complexity)]
    fn check_add_to_table_combination(
        &self,
        seat: Seat,
        tile: &Tile,
        combination: CombinationId,
        position: Position,
    ) -> Result<(usize, usize, Either<Meld, (Meld, Meld)>), HashSet<IntentError>> {
        let mut errors = HashSet::with_capacity(6);
        if !self.check_actor(seat, &mut errors) {
            return Err(errors);
        }
        self.check_may_meld(seat, &mut errors);
        if !self.opened.contains(&seat) {
            errors.insert(IntentError::InitialMeldNotCompleted);
        }

        let hand_position = self.hand(seat).iter().position(|held| held == tile);
        if hand_position.is_none() {
            errors.insert(IntentError::StoneNotInHand);
        }
        let table_index = self.table.iter().position(|placed| placed.id == combination);
        if table_index.is_none() {
            errors.insert(IntentError::UnknownCombination { id: combination });
        }

        let (Some(hand_position), Some(table_index)) = (hand_position, table_index) else {
            return Err(errors);
        };
        let target = &self.table[table_index];
        let edited = add_to_combination(target.kind, &target.tiles, *tile, position);
        match edited {
            Ok(edited) if errors.is_empty() => Ok((hand_position, table_index, edited)),
            Ok(_) => Err(errors),
            Err(error) => {
                errors.insert(error.into());
                Err(errors)
            }
        }
    }
}
