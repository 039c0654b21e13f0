use crate::{Color, Deck, Hand, Tile, HAND_LEN, NUMBERS};
use rand::Rng;

/// A regular [tile](Tile) with a random [color](Color) and number.
pub fn random_tile<R: Rng + ?Sized>(rng: &mut R) -> Tile {
    Tile::new(rng.gen::<Color>(), rng.gen_range(NUMBERS))
}

/// A random, small, non-zero number of regular [tiles](Tile), possibly with duplicates.
pub fn random_tiles<R: Rng + ?Sized>(rng: &mut R) -> Vec<Tile> {
    let len = rng.gen_range(1..=HAND_LEN);
    (0..len).map(|_| random_tile(rng)).collect()
}

/// [HAND_LEN] [tiles](Tile) from the top of a freshly shuffled [Deck], with wildcards marked
/// but without the indicator.
pub fn random_hand<R: Rng + ?Sized>(rng: &mut R) -> Hand {
    Deck::new(rng)
        .tiles()
        .iter()
        .filter(|tile| !tile.is_indicator)
        .take(HAND_LEN)
        .copied()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn random_tile_is_regular() {
        let mut rng = rand::thread_rng();

        for _ in 0..100 {
            let tile = random_tile(&mut rng);
            assert!(NUMBERS.contains(&tile.number));
            assert!(!tile.is_wildcard());
            assert!(!tile.is_indicator);
        }
    }

    #[test]
    fn random_tiles_len() {
        let tiles = random_tiles(&mut rand::thread_rng());

        assert!((1..=HAND_LEN).contains(&tiles.len()));
    }

    #[test]
    fn random_hand_len() {
        let hand = random_hand(&mut rand::thread_rng());

        assert_eq!(HAND_LEN, hand.len());
        assert!(hand.iter().all(|tile| !tile.is_indicator));
    }
}
