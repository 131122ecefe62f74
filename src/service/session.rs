//! One running matching game.
//!
//! A `MatchSession` wraps the pure engine with everything the engine refuses
//! to know about: who may play, the click limiter, the mismatch resolve
//! timer, and the idempotent end-of-game transition. All mutation goes
//! through one `tokio::sync::Mutex`, so user clicks and timer callbacks are
//! serialized against the same state; sessions share nothing with each
//! other.

use std::sync::Arc;

use tokio::sync::{watch, Mutex};

use crate::config::LevelSettings;
use crate::error::game::{GameError, PickRejection};
use crate::game::board::Board;
use crate::game::engine::{MatchEngine, PickOutcome};
use crate::game::limiter::ClickLimiter;
use crate::model::game::{GameSummary, RenderSnapshot, SessionId};
use crate::store::UserStore;

struct SessionState {
    engine: MatchEngine,
    limiter: ClickLimiter,
    ended: bool,
    summary: Option<GameSummary>,
}

/// A single game instance owned by one player.
pub struct MatchSession {
    id: SessionId,
    author: u64,
    settings: LevelSettings,
    store: Arc<dyn UserStore>,
    state: Mutex<SessionState>,
    ended_tx: watch::Sender<bool>,
}

impl MatchSession {
    /// Creates a session over a freshly built board.
    ///
    /// # Arguments
    /// - `id` - Registry id for this session
    /// - `author` - Discord id of the player; nobody else may pick
    /// - `settings` - Immutable level configuration
    /// - `board` - The shuffled paired layout
    /// - `store` - Persistence collaborator for reward grants
    pub fn new(
        id: SessionId,
        author: u64,
        settings: LevelSettings,
        board: Board,
        store: Arc<dyn UserStore>,
    ) -> Self {
        let engine = MatchEngine::new(board, settings.pair_count);
        let limiter = ClickLimiter::new(settings.click_cooldown);
        let (ended_tx, _) = watch::channel(false);
        Self {
            id,
            author,
            settings,
            store,
            state: Mutex::new(SessionState {
                engine,
                limiter,
                ended: false,
                summary: None,
            }),
            ended_tx,
        }
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn author(&self) -> u64 {
        self.author
    }

    pub fn settings(&self) -> &LevelSettings {
        &self.settings
    }

    /// Applies one pick from a user.
    ///
    /// Check order: author, ended flag, click limiter, then the engine's own
    /// gates. A rejected pick mutates nothing; an accepted pick commits its
    /// full transition before the snapshot is taken. A mismatch schedules
    /// the re-cover timer; a terminal transition runs the end-of-game
    /// sequence before returning.
    ///
    /// # Arguments
    /// - `user` - Discord id of the clicking user
    /// - `position` - Board position, 0-based
    ///
    /// # Returns
    /// - `Ok(RenderSnapshot)` - The committed state after the pick
    /// - `Err(GameError::Rejected)` - Why the pick was refused
    pub async fn submit_pick(
        self: &Arc<Self>,
        user: u64,
        position: usize,
    ) -> Result<RenderSnapshot, GameError> {
        let mut state = self.state.lock().await;

        if user != self.author {
            return Err(PickRejection::NotAuthor.into());
        }
        if state.ended {
            return Err(PickRejection::GameEnded.into());
        }
        if let Err(remaining) = state.limiter.check(user) {
            return Err(PickRejection::OnCooldown(remaining).into());
        }

        let outcome = state.engine.pick(position)?;

        if matches!(outcome, PickOutcome::Mismatched { .. }) && !state.engine.is_ended() {
            self.schedule_resolve();
        }
        if state.engine.is_ended() {
            self.finish(&mut state).await;
        }

        Ok(self.snapshot_locked(&state))
    }

    /// Current displayable state.
    pub async fn snapshot(&self) -> RenderSnapshot {
        let state = self.state.lock().await;
        self.snapshot_locked(&state)
    }

    /// Ends the game now, freezing the board as displayed.
    ///
    /// Idempotent: the first caller computes the reward grant, hands it to
    /// the user store, and receives the terminal summary; every later caller
    /// gets `None`. Invoked by the timeout supervisor and available to the
    /// adapter for manual termination.
    ///
    /// # Returns
    /// - `Some(GameSummary)` - The game ended just now
    /// - `None` - It had already ended
    pub async fn end_game(&self) -> Option<GameSummary> {
        let mut state = self.state.lock().await;
        self.finish(&mut state).await
    }

    /// The terminal summary, once the game has ended.
    pub async fn summary(&self) -> Option<GameSummary> {
        self.state.lock().await.summary.clone()
    }

    /// Completes when the session has ended, however it ended.
    pub async fn wait_ended(&self) {
        let mut rx = self.ended_tx.subscribe();
        while !*rx.borrow_and_update() {
            if rx.changed().await.is_err() {
                return;
            }
        }
    }

    /// Schedules the re-cover of the currently shown mismatched pair.
    ///
    /// The callback is keyed to this session and cancels itself against the
    /// ended flag, so a game that ends while the pair is on display keeps
    /// its frozen board.
    fn schedule_resolve(self: &Arc<Self>) {
        let session = Arc::clone(self);
        tokio::spawn(async move {
            tokio::time::sleep(session.settings.resolve_delay).await;
            let mut state = session.state.lock().await;
            if state.ended {
                return;
            }
            state.engine.resolve_mismatch();
            tracing::debug!("Session {}: mismatched pair covered again", session.id);
        });
    }

    async fn finish(&self, state: &mut SessionState) -> Option<GameSummary> {
        if state.ended {
            return None;
        }
        state.ended = true;
        state.engine.end();

        let matched_pairs = state.engine.matched_pairs();
        let grant = self.settings.rewards.grant(matched_pairs);
        if !grant.is_empty() {
            // The grant is handed over; totals are never applied here.
            if let Err(e) = self.store.apply_rewards(self.author, &grant).await {
                tracing::error!("Failed to apply rewards for user {}: {e}", self.author);
            }
        }

        let summary = GameSummary {
            session_id: self.id,
            author: self.author,
            level: self.settings.level.clone(),
            matched_pairs,
            attempts_used: state.engine.attempts_used(),
            grant,
        };
        state.summary = Some(summary.clone());
        let _ = self.ended_tx.send(true);

        tracing::info!(
            "Session {} ended: {} pair(s) matched in {} click(s)",
            self.id,
            summary.matched_pairs,
            summary.attempts_used
        );
        Some(summary)
    }

    fn snapshot_locked(&self, state: &SessionState) -> RenderSnapshot {
        RenderSnapshot {
            session_id: self.id,
            level: self.settings.level.clone(),
            view: state.engine.board().view(self.settings.per_row),
            clicks_left: state.engine.clicks_left(),
            matched_pairs: state.engine.matched_pairs(),
            resolving: state.engine.is_resolving(),
            ended: state.ended,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::reward::{RewardEntry, RewardTable};
    use crate::model::card::CardId;
    use crate::store::MemoryStore;
    use std::time::Duration;
    use tokio::time::sleep;

    const AUTHOR: u64 = 1001;

    /// Session over the deterministic layout [A, B, A, C, B, C].
    fn test_session() -> (Arc<MatchSession>, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        let settings = LevelSettings::for_level("1").unwrap();
        let board = Board::with_layout(vec![
            CardId(10),
            CardId(20),
            CardId(10),
            CardId(30),
            CardId(20),
            CardId(30),
        ]);
        let session = Arc::new(MatchSession::new(
            SessionId(1),
            AUTHOR,
            settings,
            board,
            store.clone(),
        ));
        (session, store)
    }

    /// Waits out the click limiter between picks.
    async fn next_click(session: &Arc<MatchSession>, position: usize) -> RenderSnapshot {
        sleep(session.settings().click_cooldown).await;
        session.submit_pick(AUTHOR, position).await.unwrap()
    }

    /// Tests the author gate.
    ///
    /// A click from anyone but the player who started the game must be
    /// refused without consuming an attempt.
    ///
    /// Expected: NotAuthor, snapshot unchanged
    #[tokio::test(start_paused = true)]
    async fn test_not_author_rejected() {
        let (session, _) = test_session();

        match session.submit_pick(AUTHOR + 1, 0).await {
            Err(GameError::Rejected(PickRejection::NotAuthor)) => {}
            other => panic!("expected NotAuthor, got {:?}", other.map(|_| ())),
        }
        assert_eq!(session.snapshot().await.clicks_left, 8);
    }

    /// Tests the click limiter inside a session.
    ///
    /// Two picks within the 3-second window: the second is rejected with the
    /// remaining wait and consumes no attempt.
    ///
    /// Expected: OnCooldown with full window remaining, clicks_left unchanged
    #[tokio::test(start_paused = true)]
    async fn test_rapid_second_pick_on_cooldown() {
        let (session, _) = test_session();

        session.submit_pick(AUTHOR, 0).await.unwrap();
        match session.submit_pick(AUTHOR, 2).await {
            Err(GameError::Rejected(PickRejection::OnCooldown(remaining))) => {
                assert_eq!(remaining, Duration::from_secs(3));
            }
            other => panic!("expected OnCooldown, got {:?}", other.map(|_| ())),
        }
        assert_eq!(session.snapshot().await.clicks_left, 7);
    }

    /// Tests that a mismatched pair is covered again after the resolve delay.
    ///
    /// Picks B then C (values differ), waits past the 5-second display, and
    /// verifies both positions are hidden, re-enabled, and that no pair was
    /// counted.
    ///
    /// Expected: resolving snapshot first, then covered slots and matched 0
    #[tokio::test(start_paused = true)]
    async fn test_mismatch_recovers_after_delay() {
        let (session, _) = test_session();

        session.submit_pick(AUTHOR, 1).await.unwrap();
        let snapshot = next_click(&session, 3).await;
        assert!(snapshot.resolving);
        assert_eq!(snapshot.view.slots[1], Some(CardId(20)));
        assert_eq!(snapshot.view.slots[3], Some(CardId(30)));

        sleep(session.settings().resolve_delay + Duration::from_millis(10)).await;
        let snapshot = session.snapshot().await;
        assert!(!snapshot.resolving);
        assert_eq!(snapshot.view.slots[1], None);
        assert_eq!(snapshot.view.slots[3], None);
        assert_eq!(snapshot.matched_pairs, 0);

        // Both positions take picks again.
        let snapshot = next_click(&session, 1).await;
        assert_eq!(snapshot.clicks_left, 5);
    }

    /// Tests a full game won by matching every pair.
    ///
    /// Expected: ended snapshot, exactly one summary, further picks refused
    /// with no mutation
    #[tokio::test(start_paused = true)]
    async fn test_winning_ends_session_once() {
        let (session, _) = test_session();

        session.submit_pick(AUTHOR, 0).await.unwrap();
        next_click(&session, 2).await;
        next_click(&session, 1).await;
        next_click(&session, 4).await;
        next_click(&session, 3).await;
        let snapshot = next_click(&session, 5).await;

        assert!(snapshot.ended);
        assert_eq!(snapshot.matched_pairs, 3);
        assert_eq!(snapshot.clicks_left, 2);

        let summary = session.summary().await.unwrap();
        assert_eq!(summary.matched_pairs, 3);
        assert_eq!(summary.attempts_used, 6);

        // end_game after the win is a no-op.
        assert!(session.end_game().await.is_none());

        sleep(Duration::from_secs(5)).await;
        match session.submit_pick(AUTHOR, 0).await {
            Err(GameError::Rejected(PickRejection::GameEnded)) => {}
            other => panic!("expected GameEnded, got {:?}", other.map(|_| ())),
        }
        let after = session.snapshot().await;
        assert_eq!(after.matched_pairs, 3);
        assert_eq!(after.clicks_left, 2);
    }

    /// Tests end_game idempotency on its own.
    ///
    /// Expected: first call Some, second None, wait_ended completes
    #[tokio::test(start_paused = true)]
    async fn test_end_game_emits_single_summary() {
        let (session, _) = test_session();

        let first = session.end_game().await;
        assert!(first.is_some());
        assert_eq!(first.unwrap().matched_pairs, 0);
        assert!(session.end_game().await.is_none());

        session.wait_ended().await;
        assert!(session.snapshot().await.ended);
    }

    /// Tests that ending the game cancels a pending re-cover.
    ///
    /// A mismatched pair is on display when the game ends; after the resolve
    /// delay would have fired, the board must still show the frozen pair.
    ///
    /// Expected: both positions still revealed past the resolve delay
    #[tokio::test(start_paused = true)]
    async fn test_end_cancels_pending_resolve() {
        let (session, _) = test_session();

        session.submit_pick(AUTHOR, 1).await.unwrap();
        let snapshot = next_click(&session, 3).await;
        assert!(snapshot.resolving);

        session.end_game().await.unwrap();
        sleep(Duration::from_secs(6)).await;

        let snapshot = session.snapshot().await;
        assert!(snapshot.ended);
        assert_eq!(snapshot.view.slots[1], Some(CardId(20)));
        assert_eq!(snapshot.view.slots[3], Some(CardId(30)));
    }

    /// Tests the reward pass-through at game end.
    ///
    /// With a configured table and at least one match, the grant must reach
    /// the user store; the session itself never applies totals.
    ///
    /// Expected: store totals incremented per the table
    #[tokio::test(start_paused = true)]
    async fn test_reward_grant_reaches_store() {
        let store = Arc::new(MemoryStore::new());
        let mut settings = LevelSettings::for_level("1").unwrap();
        settings.rewards = RewardTable::new(vec![RewardEntry {
            stat: "candies".to_string(),
            amount: 5,
        }]);
        let board = Board::with_layout(vec![
            CardId(10),
            CardId(20),
            CardId(10),
            CardId(30),
            CardId(20),
            CardId(30),
        ]);
        let session = Arc::new(MatchSession::new(
            SessionId(2),
            AUTHOR,
            settings,
            board,
            store.clone(),
        ));

        session.submit_pick(AUTHOR, 0).await.unwrap();
        next_click(&session, 2).await;
        session.end_game().await.unwrap();

        assert_eq!(store.totals(AUTHOR).await.get("candies"), Some(&5));
    }
}
