//! Card identity.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Opaque identifier for a collectible photocard.
///
/// Equality is identity-based: two board positions match iff they hold the
/// same `CardId`. The bot never inspects anything else about a card; names,
/// rarity, and artwork all live behind the card catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CardId(pub u64);

impl fmt::Display for CardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
