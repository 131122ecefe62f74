//! Board layout and reveal state.

use std::collections::HashMap;

use rand::seq::SliceRandom;
use rand::Rng;

use crate::model::card::CardId;
use crate::model::game::BoardView;

/// A session's card layout.
///
/// Holds `2 * pair_count` positions, each assigned one card from a multiset
/// where every card appears exactly twice. Positions are shuffled once at
/// construction and never reordered; only the covered/revealed projection of
/// a position changes afterwards.
#[derive(Debug, Clone)]
pub struct Board {
    cards: Vec<CardId>,
    revealed: Vec<bool>,
}

impl Board {
    /// Builds a board from a set of unique cards.
    ///
    /// Each card is placed twice and the combined layout is shuffled with a
    /// single uniform permutation.
    ///
    /// # Arguments
    /// - `unique` - The distinct cards for this board, one per pair
    /// - `rng` - Randomness source for the shuffle
    pub fn new(unique: Vec<CardId>, rng: &mut impl Rng) -> Self {
        let mut cards = unique.clone();
        cards.extend(unique);
        cards.shuffle(rng);
        Self::with_layout(cards)
    }

    /// Builds a board from a pre-arranged layout.
    ///
    /// The layout must already contain every card exactly twice; no shuffle
    /// is applied. Used for deterministic boards in tests and replays.
    pub fn with_layout(cards: Vec<CardId>) -> Self {
        debug_assert!(cards.len() % 2 == 0, "board layout must pair up");
        let revealed = vec![false; cards.len()];
        Self { cards, revealed }
    }

    /// Number of positions on the board.
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Whether the position currently shows its card.
    pub fn is_revealed(&self, position: usize) -> bool {
        self.revealed.get(position).copied().unwrap_or(false)
    }

    /// The underlying card at a position, regardless of visibility.
    ///
    /// Only the game core may look under a cover; everything outside works
    /// from the [`BoardView`] projection.
    pub(crate) fn card_at(&self, position: usize) -> Option<CardId> {
        self.cards.get(position).copied()
    }

    /// Sets the position's displayed value to its underlying card.
    pub fn reveal(&mut self, position: usize) {
        if let Some(slot) = self.revealed.get_mut(position) {
            *slot = true;
        }
    }

    /// Resets the position to the covered state.
    pub fn cover(&mut self, position: usize) {
        if let Some(slot) = self.revealed.get_mut(position) {
            *slot = false;
        }
    }

    /// Iterates over the card values currently revealed.
    pub(crate) fn revealed_values(&self) -> impl Iterator<Item = CardId> + '_ {
        self.cards
            .iter()
            .zip(self.revealed.iter())
            .filter(|(_, revealed)| **revealed)
            .map(|(card, _)| *card)
    }

    /// Count of distinct card values currently revealed in exactly two
    /// positions.
    pub fn matched_pairs(&self) -> u32 {
        let mut counts: HashMap<CardId, u32> = HashMap::new();
        for card in self.revealed_values() {
            *counts.entry(card).or_insert(0) += 1;
        }
        counts.values().filter(|count| **count == 2).count() as u32
    }

    /// The covered/revealed projection handed to renderers.
    pub fn view(&self, per_row: usize) -> BoardView {
        let slots = self
            .cards
            .iter()
            .zip(self.revealed.iter())
            .map(|(card, revealed)| revealed.then_some(*card))
            .collect();
        BoardView { slots, per_row }
    }
}
