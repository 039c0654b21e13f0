use crate::{
    joker_number, Color, Hand, Hands, Stock, Tile, Wildcard, COPIES_PER_TILE, DECK_LEN,
    FALSE_JOKERS, FIRST_HAND_LEN, HAND_LEN, NUMBERS,
};
use itertools::Itertools;
use rand::seq::SliceRandom;
use rand::Rng;
use std::{array, cmp, iter};
use tap::Tap;

/// Describes the reason why a [deal](Deck::deal) could not be completed.
#[derive(Debug, Clone, Eq, PartialEq, Hash, thiserror::Error)]
pub enum DeckError {
    /// The number of dealt and remaining [tiles](Tile) differs from [DECK_LEN]. This indicates
    /// a defect in building the deck, never a user error.
    #[error("deck integrity mismatch: expected {expected} tiles but counted {actual}")]
    IntegrityMismatch {
        /// [DECK_LEN].
        expected: usize,
        /// The number of [tiles](Tile) in hands and stock combined.
        actual: usize,
    },
}

/// A shuffled deck of [DECK_LEN] [tiles](Tile) with the indicator turned face up and
/// the wildcards marked. Created from [Deck::new].
#[derive(Debug, Clone)]
pub struct Deck {
    /// Every tile of the match, in shuffled order.
    tiles: Stock,
    /// The face up tile defining the joker.
    indicator: Tile,
}

/// [Tiles](Tile) dealt from a [Deck] to every seat, plus what is left in the stock.
///
/// # See Also
///
/// * [Deck::deal]
/// * [MatchState::new](crate::MatchState::new)
#[derive(Debug, Clone, PartialEq)]
pub struct Deal {
    /// The face up tile defining the joker.
    pub indicator: Tile,
    /// One [hand](Hand) for each seat, where seat `1` holds [FIRST_HAND_LEN] tiles.
    pub hands: Hands,
    /// The [tiles](Tile) left to draw from.
    pub stock: Stock,
}

impl Deal {
    /// # Returns
    ///
    /// The number every [joker](Wildcard::Joker) is printed with.
    pub fn joker_number(&self) -> u8 {
        joker_number(self.indicator.number)
    }
}

impl Deck {
    /// Creates [COPIES_PER_TILE] regular tiles for [every color](Color::colors) and every
    /// number, shuffles them, and turns the first tile face up as the indicator.
    ///
    /// Every remaining regular tile with the indicator's color and the
    /// [joker number](joker_number) becomes a [joker](Wildcard::Joker), and [FALSE_JOKERS]
    /// false jokers taking the indicator's color and number are added. The deck is shuffled
    /// again so that the position of the wildcards leaks nothing.
    pub fn new<R: Rng + ?Sized>(rng: &mut R) -> Deck {
        let mut tiles = Color::colors()
            .into_iter()
            .cartesian_product(NUMBERS)
            .flat_map(|(color, number)| {
                iter::repeat(Tile::new(color, number)).take(COPIES_PER_TILE)
            })
            .collect_vec()
            .tap_mut(|tiles| tiles.shuffle(rng));

        let Some(indicator) = tiles.first_mut() else {
            unreachable!("a deck always holds regular tiles before the indicator is chosen.");
        };
        indicator.is_indicator = true;
        let indicator = *indicator;

        let joker_number = joker_number(indicator.number);
        let mut jokers = 0;
        for tile in tiles.iter_mut().skip(1) {
            if tile.color == indicator.color && tile.number == joker_number {
                tile.wildcard = Some(Wildcard::Joker);
                jokers += 1;
            }
        }
        if jokers != COPIES_PER_TILE {
            log::warn!("marked {jokers} jokers, expected {COPIES_PER_TILE}");
        }

        tiles.extend(
            iter::repeat(Tile::false_joker(indicator.color, indicator.number)).take(FALSE_JOKERS),
        );
        tiles.shuffle(rng);

        log::debug!(
            "built deck of {} tiles with indicator {:?} {}",
            tiles.len(),
            indicator.color,
            indicator.number
        );
        Deck { tiles, indicator }
    }

    /// The face up tile defining the joker.
    pub fn indicator(&self) -> Tile {
        self.indicator
    }

    /// Every tile in the deck in shuffled order.
    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    /// Pops [FIRST_HAND_LEN] tiles for seat `1` and [HAND_LEN] tiles for every other seat off
    /// the end of the deck, sorts each hand by number, and leaves the rest as the stock.
    ///
    /// # Errors
    ///
    /// * [DeckError::IntegrityMismatch] When hands and stock do not add up to [DECK_LEN].
    pub fn deal(self) -> Result<Deal, DeckError> {
        let Deck {
            tiles: mut stock,
            indicator,
        } = self;

        let hands: Hands = array::from_fn(|index| {
            let hand_len = if index == 0 { FIRST_HAND_LEN } else { HAND_LEN };
            let start = stock.len() - cmp::min(hand_len, stock.len());
            stock
                .drain(start..)
                .rev()
                .collect::<Hand>()
                .tap_mut(|hand| hand.sort_by_key(|tile| tile.number))
        });

        check_integrity(&hands, &stock)?;
        Ok(Deal {
            indicator,
            hands,
            stock,
        })
    }
}

/// Checks that the [tiles](Tile) in `hands` and `stock` add up to [DECK_LEN].
///
/// # Errors
///
/// * [DeckError::IntegrityMismatch] When they do not.
pub fn check_integrity(hands: &Hands, stock: &Stock) -> Result<(), DeckError> {
    let actual = hands.iter().map(|hand| hand.len()).sum::<usize>() + stock.len();
    if actual != DECK_LEN {
        log::error!("deck integrity mismatch: expected {DECK_LEN} tiles, counted {actual}");
        return Err(DeckError::IntegrityMismatch {
            expected: DECK_LEN,
            actual,
        });
    }

    Ok(())
}
