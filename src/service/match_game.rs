//! Matching-game orchestration.
//!
//! `MatchGameService` is the entry point the bot adapter talks to: it
//! validates the requested level, enforces the per-user game cooldown, draws
//! a board from the card catalog, registers the session, and supervises its
//! timeout. Sessions leave the registry as soon as they end, however they
//! end.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::Utc;
use tokio::sync::RwLock;

use crate::catalog::CardCatalog;
use crate::config::LevelSettings;
use crate::error::game::GameError;
use crate::game::board::Board;
use crate::model::game::{RenderSnapshot, SessionId};
use crate::service::session::MatchSession;
use crate::store::UserStore;

/// Registry and lifecycle supervisor for matching-game sessions.
pub struct MatchGameService {
    catalog: Arc<dyn CardCatalog>,
    store: Arc<dyn UserStore>,
    sessions: Arc<RwLock<HashMap<SessionId, Arc<MatchSession>>>>,
    next_session_id: AtomicU64,
}

impl MatchGameService {
    /// Creates the service over its two external collaborators.
    ///
    /// # Arguments
    /// - `catalog` - Card pool to draw boards from
    /// - `store` - User persistence for cooldowns and reward grants
    pub fn new(catalog: Arc<dyn CardCatalog>, store: Arc<dyn UserStore>) -> Self {
        Self {
            catalog,
            store,
            sessions: Arc::new(RwLock::new(HashMap::new())),
            next_session_id: AtomicU64::new(1),
        }
    }

    /// Starts a new game session for a player.
    ///
    /// Gate order: level validation, then the player's game cooldown, then
    /// the catalog draw. The cooldown is only committed once the draw
    /// succeeded, so a failed start costs the player nothing. The new
    /// session's timeout supervisor is spawned before this returns.
    ///
    /// # Arguments
    /// - `author` - Discord id of the player starting the game
    /// - `level` - Difficulty level key
    ///
    /// # Returns
    /// - `Ok(Arc<MatchSession>)` - The registered, running session
    /// - `Err(GameError::InvalidLevel)` - Unknown level key
    /// - `Err(GameError::GameCooldown)` - Previous game cooldown still live
    /// - `Err(GameError::CatalogExhausted)` - Not enough unique cards
    pub async fn start_session(
        &self,
        author: u64,
        level: &str,
    ) -> Result<Arc<MatchSession>, GameError> {
        let settings = LevelSettings::for_level(level)
            .ok_or_else(|| GameError::InvalidLevel(level.to_string()))?;

        let now = Utc::now();
        if let Some(until) = self.store.game_cooldown(author).await? {
            if until > now {
                return Err(GameError::GameCooldown(until));
            }
        }

        // Draw before committing the cooldown so an exhausted catalog
        // aborts with no board built and no cooldown burned.
        let unique = self.catalog.draw(settings.pair_count as usize).await?;
        let next_game = now + chrono::Duration::seconds(settings.game_cooldown.as_secs() as i64);
        self.store.set_game_cooldown(author, next_game).await?;

        let board = Board::new(unique, &mut rand::rng());
        let id = SessionId(self.next_session_id.fetch_add(1, Ordering::Relaxed));
        let session = Arc::new(MatchSession::new(
            id,
            author,
            settings,
            board,
            Arc::clone(&self.store),
        ));

        self.sessions.write().await.insert(id, Arc::clone(&session));
        self.supervise(Arc::clone(&session));

        tracing::info!(
            "Started matching game session {} for user {} at level {}",
            id,
            author,
            level
        );
        Ok(session)
    }

    /// Looks up a running session.
    pub async fn session(&self, id: SessionId) -> Option<Arc<MatchSession>> {
        self.sessions.read().await.get(&id).cloned()
    }

    /// Routes a pick to its session.
    ///
    /// # Returns
    /// - `Ok(RenderSnapshot)` - Committed state after the pick
    /// - `Err(GameError::UnknownSession)` - No such session registered
    /// - `Err(GameError::Rejected)` - The session refused the pick
    pub async fn submit_pick(
        &self,
        id: SessionId,
        user: u64,
        position: usize,
    ) -> Result<RenderSnapshot, GameError> {
        let session = self.session(id).await.ok_or(GameError::UnknownSession)?;
        session.submit_pick(user, position).await
    }

    /// Number of sessions currently registered.
    pub async fn active_sessions(&self) -> usize {
        self.sessions.read().await.len()
    }

    /// Spawns the timeout supervisor for a session.
    ///
    /// The supervisor force-ends the game once the level's timeout elapses;
    /// if the game ends earlier the pending timeout effect is pre-empted and
    /// the task just cleans up. Either way the session leaves the registry
    /// when it is over.
    fn supervise(&self, session: Arc<MatchSession>) {
        let sessions = Arc::clone(&self.sessions);
        tokio::spawn(async move {
            tokio::select! {
                _ = tokio::time::sleep(session.settings().timeout) => {
                    if session.end_game().await.is_some() {
                        tracing::info!("Session {} timed out", session.id());
                    }
                }
                _ = session.wait_ended() => {}
            }
            sessions.write().await.remove(&session.id());
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::StaticCatalog;
    use crate::store::MemoryStore;
    use std::time::Duration;
    use tokio::time::sleep;

    const AUTHOR: u64 = 2002;

    fn test_service() -> (MatchGameService, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        let catalog = Arc::new(StaticCatalog::sequential(32));
        (
            MatchGameService::new(catalog, store.clone()),
            store,
        )
    }

    /// Tests rejection of unknown level keys.
    ///
    /// Expected: InvalidLevel, nothing registered, no cooldown set
    #[tokio::test(start_paused = true)]
    async fn test_invalid_level_rejected() {
        let (service, store) = test_service();

        match service.start_session(AUTHOR, "9").await {
            Err(GameError::InvalidLevel(level)) => assert_eq!(level, "9"),
            other => panic!("expected InvalidLevel, got {:?}", other.map(|_| ())),
        }
        assert_eq!(service.active_sessions().await, 0);
        assert_eq!(store.game_cooldown(AUTHOR).await.unwrap(), None);
    }

    /// Tests the per-user game cooldown gate.
    ///
    /// Starting a game commits the level's cooldown; a second start inside
    /// that window must be refused with the retry time.
    ///
    /// Expected: GameCooldown carrying a future timestamp
    #[tokio::test(start_paused = true)]
    async fn test_game_cooldown_gate() {
        let (service, store) = test_service();

        service.start_session(AUTHOR, "1").await.unwrap();
        assert!(store.game_cooldown(AUTHOR).await.unwrap().is_some());

        match service.start_session(AUTHOR, "1").await {
            Err(GameError::GameCooldown(until)) => assert!(until > Utc::now()),
            other => panic!("expected GameCooldown, got {:?}", other.map(|_| ())),
        }
    }

    /// Tests that an exhausted catalog aborts session creation cleanly.
    ///
    /// The failure must happen before any board exists and before the
    /// player's cooldown is committed.
    ///
    /// Expected: CatalogExhausted, empty registry, no cooldown set
    #[tokio::test(start_paused = true)]
    async fn test_catalog_exhausted_aborts_start() {
        let store = Arc::new(MemoryStore::new());
        let catalog = Arc::new(StaticCatalog::sequential(2));
        let service = MatchGameService::new(catalog, store.clone());

        match service.start_session(AUTHOR, "1").await {
            Err(GameError::CatalogExhausted {
                requested,
                available,
            }) => {
                assert_eq!(requested, 3);
                assert_eq!(available, 2);
            }
            other => panic!("expected CatalogExhausted, got {:?}", other.map(|_| ())),
        }
        assert_eq!(service.active_sessions().await, 0);
        assert_eq!(store.game_cooldown(AUTHOR).await.unwrap(), None);
    }

    /// Tests routing picks to unknown sessions.
    ///
    /// Expected: UnknownSession
    #[tokio::test(start_paused = true)]
    async fn test_unknown_session_rejected() {
        let (service, _) = test_service();

        match service.submit_pick(SessionId(99), AUTHOR, 0).await {
            Err(GameError::UnknownSession) => {}
            other => panic!("expected UnknownSession, got {:?}", other.map(|_| ())),
        }
    }

    /// Tests the timeout supervisor force-ending a session.
    ///
    /// After the level's timeout elapses the game must be ended, summarized,
    /// and removed from the registry.
    ///
    /// Expected: ended session with a summary, empty registry
    #[tokio::test(start_paused = true)]
    async fn test_timeout_ends_session() {
        let (service, _) = test_service();
        let session = service.start_session(AUTHOR, "1").await.unwrap();
        assert_eq!(service.active_sessions().await, 1);

        sleep(session.settings().timeout + Duration::from_millis(10)).await;
        session.wait_ended().await;

        let summary = session.summary().await.unwrap();
        assert_eq!(summary.matched_pairs, 0);
        assert_eq!(service.active_sessions().await, 0);
    }

    /// Tests that an early end pre-empts the pending timeout.
    ///
    /// Ending the game by hand must release the supervisor and clean up the
    /// registry long before the timeout would have fired, and the later
    /// timeout deadline must produce no second summary.
    ///
    /// Expected: registry empty right after the end, single summary overall
    #[tokio::test(start_paused = true)]
    async fn test_early_end_preempts_timeout() {
        let (service, _) = test_service();
        let session = service.start_session(AUTHOR, "1").await.unwrap();

        assert!(session.end_game().await.is_some());
        sleep(Duration::from_millis(10)).await;
        assert_eq!(service.active_sessions().await, 0);

        sleep(session.settings().timeout).await;
        assert!(session.end_game().await.is_none());
    }
}
