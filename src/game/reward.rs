//! Reward table hook.
//!
//! The reward values for the matching game are deliberately unconfigured:
//! the built-in tables are empty and `grant` produces an empty increments
//! map. The types exist so a reward scheme can be added per level without
//! touching the engine or the session layer; the grant is always handed to
//! the user store, never applied by the game itself.

use serde::{Deserialize, Serialize};

use crate::model::game::RewardGrant;

/// One stat increment awarded when a game ends with at least one match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewardEntry {
    /// Stat name in the user's reward totals.
    pub stat: String,
    /// Amount to add.
    pub amount: i64,
}

/// Per-level reward configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewardTable {
    entries: Vec<RewardEntry>,
}

impl RewardTable {
    pub fn new(entries: Vec<RewardEntry>) -> Self {
        Self { entries }
    }

    /// Computes the grant for a finished game.
    ///
    /// A game with no matched pairs grants nothing. Entries naming the same
    /// stat accumulate.
    pub fn grant(&self, matched_pairs: u32) -> RewardGrant {
        let mut grant = RewardGrant::default();
        if matched_pairs == 0 {
            return grant;
        }
        for entry in &self.entries {
            *grant.increments.entry(entry.stat.clone()).or_insert(0) += entry.amount;
        }
        grant
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Tests the default empty table.
    ///
    /// Expected: empty grant regardless of the matched count
    #[test]
    fn test_empty_table_grants_nothing() {
        let table = RewardTable::default();
        assert!(table.grant(0).is_empty());
        assert!(table.grant(3).is_empty());
    }

    /// Tests that zero matches grant nothing even with entries configured.
    ///
    /// Expected: empty grant for matched_pairs = 0
    #[test]
    fn test_no_matches_grants_nothing() {
        let table = RewardTable::new(vec![RewardEntry {
            stat: "candies".to_string(),
            amount: 5,
        }]);
        assert!(table.grant(0).is_empty());
    }

    /// Tests accumulation of entries naming the same stat.
    ///
    /// Expected: amounts summed per stat in the grant
    #[test]
    fn test_entries_accumulate_per_stat() {
        let table = RewardTable::new(vec![
            RewardEntry {
                stat: "candies".to_string(),
                amount: 5,
            },
            RewardEntry {
                stat: "candies".to_string(),
                amount: 2,
            },
            RewardEntry {
                stat: "exp".to_string(),
                amount: 10,
            },
        ]);

        let grant = table.grant(2);
        assert_eq!(grant.increments.get("candies"), Some(&7));
        assert_eq!(grant.increments.get("exp"), Some(&10));
    }
}
