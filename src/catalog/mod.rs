//! Card catalog seam.
//!
//! The card pool, rarity odds, and artwork live in an external library; the
//! game only needs a way to draw a handful of unique card ids for a board.
//! `StaticCatalog` is the in-memory implementation used by the binary and by
//! tests.

use rand::seq::IndexedRandom;
use serenity::async_trait;

use crate::error::game::GameError;
use crate::model::card::CardId;

/// Source of unique playable cards for a round.
#[async_trait]
pub trait CardCatalog: Send + Sync {
    /// Draws `count` distinct cards.
    ///
    /// # Arguments
    /// - `count` - Number of unique cards requested
    ///
    /// # Returns
    /// - `Ok(Vec<CardId>)` - Exactly `count` distinct cards
    /// - `Err(GameError::CatalogExhausted)` - The catalog cannot supply that
    ///   many distinct cards
    async fn draw(&self, count: usize) -> Result<Vec<CardId>, GameError>;
}

/// Catalog backed by a fixed pool of card ids.
pub struct StaticCatalog {
    pool: Vec<CardId>,
}

impl StaticCatalog {
    pub fn new(pool: Vec<CardId>) -> Self {
        Self { pool }
    }

    /// Convenience pool of sequential card ids `1..=size`.
    pub fn sequential(size: u64) -> Self {
        Self::new((1..=size).map(CardId).collect())
    }
}

#[async_trait]
impl CardCatalog for StaticCatalog {
    async fn draw(&self, count: usize) -> Result<Vec<CardId>, GameError> {
        if self.pool.len() < count {
            return Err(GameError::CatalogExhausted {
                requested: count,
                available: self.pool.len(),
            });
        }

        let mut rng = rand::rng();
        Ok(self
            .pool
            .choose_multiple(&mut rng, count)
            .copied()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    /// Tests drawing unique cards from the pool.
    ///
    /// Expected: Ok with the requested number of distinct ids from the pool
    #[tokio::test]
    async fn test_draw_returns_unique_cards() {
        let catalog = StaticCatalog::sequential(10);
        let cards = catalog.draw(4).await.unwrap();

        assert_eq!(cards.len(), 4);
        let distinct: HashSet<CardId> = cards.iter().copied().collect();
        assert_eq!(distinct.len(), 4);
        assert!(cards.iter().all(|card| card.0 >= 1 && card.0 <= 10));
    }

    /// Tests drawing more cards than the pool holds.
    ///
    /// Expected: CatalogExhausted carrying the requested and available counts
    #[tokio::test]
    async fn test_draw_past_pool_is_exhausted() {
        let catalog = StaticCatalog::sequential(2);

        match catalog.draw(3).await {
            Err(GameError::CatalogExhausted {
                requested,
                available,
            }) => {
                assert_eq!(requested, 3);
                assert_eq!(available, 2);
            }
            other => panic!("expected CatalogExhausted, got {:?}", other.map(|_| ())),
        }
    }
}
