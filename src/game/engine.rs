//! The pick state machine.
//!
//! `MatchEngine` consumes discrete "reveal position N" actions and enforces
//! the matching rules: one open pair at a time, a fixed attempt budget of
//! `2 * pair_count + 2` clicks, and a transient `Resolving` phase while a
//! mismatched pair stays visible. The engine performs no I/O and knows
//! nothing about timers; the session layer schedules `resolve_mismatch` and
//! observes `is_ended` after every transition.

use crate::error::game::PickRejection;
use crate::game::board::Board;
use crate::model::card::CardId;

/// Where the engine is in the first-pick/second-pick cycle.
///
/// The one-open-pair invariant is held explicitly here: `AwaitingSecondPick`
/// carries the single open position, and no phase can represent more than
/// one unresolved pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Expecting the first pick of a pair.
    AwaitingFirstPick,
    /// One position is open; expecting its candidate partner.
    AwaitingSecondPick { open: usize },
    /// A mismatched pair is being shown; input is suspended until the pair
    /// is covered again.
    Resolving { first: usize, second: usize },
    /// Terminal. All input is refused.
    Ended,
}

/// What an accepted pick did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickOutcome {
    /// A first pick was revealed; awaiting its partner.
    Opened,
    /// The second pick completed a pair; both positions are locked revealed.
    Matched(CardId),
    /// The second pick did not complete a pair; both positions stay visible
    /// until `resolve_mismatch` covers them again.
    Mismatched { first: usize, second: usize },
}

/// Per-session matching state machine.
#[derive(Debug, Clone)]
pub struct MatchEngine {
    board: Board,
    phase: Phase,
    pair_count: u32,
    max_clicks: u32,
    attempts: u32,
}

impl MatchEngine {
    /// Creates an engine over a freshly built board.
    ///
    /// # Arguments
    /// - `board` - The shuffled paired layout to play on
    /// - `pair_count` - Number of pairs on the board; the attempt budget is
    ///   `2 * pair_count + 2`
    pub fn new(board: Board, pair_count: u32) -> Self {
        debug_assert_eq!(board.len(), pair_count as usize * 2);
        Self {
            board,
            phase: Phase::AwaitingFirstPick,
            pair_count,
            max_clicks: pair_count * 2 + 2,
            attempts: 0,
        }
    }

    /// Applies one pick action.
    ///
    /// Rejections happen before any state mutation; an accepted pick
    /// increments the attempt counter exactly once, including the pick that
    /// exhausts the budget or completes the final pair. When a transition
    /// leaves the engine in a terminal position (budget spent or all pairs
    /// matched) the phase moves to `Ended` before returning.
    ///
    /// # Arguments
    /// - `position` - Board position to reveal, 0-based
    ///
    /// # Returns
    /// - `Ok(PickOutcome)` - The pick was accepted and applied
    /// - `Err(PickRejection)` - The pick was refused; nothing changed
    pub fn pick(&mut self, position: usize) -> Result<PickOutcome, PickRejection> {
        match self.phase {
            Phase::Ended => return Err(PickRejection::GameEnded),
            Phase::Resolving { .. } => return Err(PickRejection::ResolvePending),
            Phase::AwaitingFirstPick | Phase::AwaitingSecondPick { .. } => {}
        }

        if position >= self.board.len() || self.board.is_revealed(position) {
            return Err(PickRejection::InvalidPosition(position));
        }
        // Covered position on a live board always has a card.
        let card = self
            .board
            .card_at(position)
            .ok_or(PickRejection::InvalidPosition(position))?;

        let outcome = match self.phase {
            Phase::AwaitingFirstPick => {
                self.board.reveal(position);
                self.phase = Phase::AwaitingSecondPick { open: position };
                PickOutcome::Opened
            }
            Phase::AwaitingSecondPick { open } => {
                // Scan the values already on display rather than comparing
                // against a remembered index. Locked pairs cannot collide
                // with a fresh card since both of their copies are revealed.
                let is_match = self.board.revealed_values().any(|shown| shown == card);
                self.board.reveal(position);
                if is_match {
                    self.phase = Phase::AwaitingFirstPick;
                    PickOutcome::Matched(card)
                } else {
                    self.phase = Phase::Resolving {
                        first: open,
                        second: position,
                    };
                    PickOutcome::Mismatched {
                        first: open,
                        second: position,
                    }
                }
            }
            Phase::Resolving { .. } | Phase::Ended => unreachable!("rejected above"),
        };

        self.attempts += 1;
        if self.is_terminal() {
            self.phase = Phase::Ended;
        }

        Ok(outcome)
    }

    /// Covers a mismatched pair again and re-enables both positions.
    ///
    /// No-op unless the engine is in `Resolving`; in particular it does
    /// nothing once the game ended, so a late timer callback cannot disturb
    /// a frozen board.
    pub fn resolve_mismatch(&mut self) {
        if let Phase::Resolving { first, second } = self.phase {
            self.board.cover(first);
            self.board.cover(second);
            self.phase = Phase::AwaitingFirstPick;
        }
    }

    /// Whether the attempt budget is spent or every pair is matched.
    pub fn is_terminal(&self) -> bool {
        self.attempts >= self.max_clicks || self.matched_pairs() >= self.pair_count
    }

    /// Moves the engine to `Ended`, freezing the board as displayed.
    /// Idempotent.
    pub fn end(&mut self) {
        self.phase = Phase::Ended;
    }

    pub fn is_ended(&self) -> bool {
        self.phase == Phase::Ended
    }

    pub fn is_resolving(&self) -> bool {
        matches!(self.phase, Phase::Resolving { .. })
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn attempts_used(&self) -> u32 {
        self.attempts
    }

    pub fn clicks_left(&self) -> u32 {
        self.max_clicks.saturating_sub(self.attempts)
    }

    pub fn matched_pairs(&self) -> u32 {
        self.board.matched_pairs()
    }

    pub fn board(&self) -> &Board {
        &self.board
    }
}
