//! User persistence seam.
//!
//! Reward totals and the per-user game cooldown live in an external document
//! store; the game reads and writes them through this narrow interface.
//! `MemoryStore` keeps everything in process for the demo binary and tests.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serenity::async_trait;
use tokio::sync::RwLock;

use crate::error::game::GameError;
use crate::model::game::RewardGrant;

/// Read/update access to a user's game bookkeeping.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// The time before which the user may not start another matching game.
    async fn game_cooldown(&self, user: u64) -> Result<Option<DateTime<Utc>>, GameError>;

    /// Records the user's next allowed game start.
    async fn set_game_cooldown(&self, user: u64, until: DateTime<Utc>) -> Result<(), GameError>;

    /// Applies reward increments to the user's totals.
    async fn apply_rewards(&self, user: u64, grant: &RewardGrant) -> Result<(), GameError>;
}

#[derive(Debug, Clone, Default)]
struct UserRecord {
    game_cooldown: Option<DateTime<Utc>>,
    totals: HashMap<String, i64>,
}

/// In-memory user store.
#[derive(Clone, Default)]
pub struct MemoryStore {
    users: Arc<RwLock<HashMap<u64, UserRecord>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current reward totals for a user, for inspection in tests and demos.
    pub async fn totals(&self, user: u64) -> HashMap<String, i64> {
        self.users
            .read()
            .await
            .get(&user)
            .map(|record| record.totals.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn game_cooldown(&self, user: u64) -> Result<Option<DateTime<Utc>>, GameError> {
        Ok(self
            .users
            .read()
            .await
            .get(&user)
            .and_then(|record| record.game_cooldown))
    }

    async fn set_game_cooldown(&self, user: u64, until: DateTime<Utc>) -> Result<(), GameError> {
        self.users
            .write()
            .await
            .entry(user)
            .or_default()
            .game_cooldown = Some(until);
        Ok(())
    }

    async fn apply_rewards(&self, user: u64, grant: &RewardGrant) -> Result<(), GameError> {
        let mut users = self.users.write().await;
        let record = users.entry(user).or_default();
        for (stat, amount) in &grant.increments {
            *record.totals.entry(stat.clone()).or_insert(0) += amount;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    /// Tests cooldown round-trip for a user.
    ///
    /// Expected: None before any write, the stored timestamp after
    #[tokio::test]
    async fn test_game_cooldown_roundtrip() {
        let store = MemoryStore::new();
        assert_eq!(store.game_cooldown(1).await.unwrap(), None);

        let until = Utc::now() + Duration::seconds(600);
        store.set_game_cooldown(1, until).await.unwrap();
        assert_eq!(store.game_cooldown(1).await.unwrap(), Some(until));
        assert_eq!(store.game_cooldown(2).await.unwrap(), None);
    }

    /// Tests that reward grants accumulate across games.
    ///
    /// Expected: totals summed per stat over repeated grants
    #[tokio::test]
    async fn test_apply_rewards_accumulates() {
        let store = MemoryStore::new();
        let mut grant = RewardGrant::default();
        grant.increments.insert("candies".to_string(), 3);

        store.apply_rewards(7, &grant).await.unwrap();
        store.apply_rewards(7, &grant).await.unwrap();

        assert_eq!(store.totals(7).await.get("candies"), Some(&6));
        assert!(store.totals(8).await.is_empty());
    }
}
