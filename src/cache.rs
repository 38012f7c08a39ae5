//! Response cache.
//!
//! Keyed by `Query`, so two requests differing in any parameter (date
//! window, season, league) never share an entry. There is no TTL and no
//! capacity bound: entries live until `clear` removes them.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

use crate::source::{Payload, Query};

/// Coarse grouping used for bulk invalidation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CacheCategory {
    Leagues,
    Teams,
    Matches,
    Players,
    Stats,
}

impl fmt::Display for CacheCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CacheCategory::Leagues => "leagues",
            CacheCategory::Teams => "teams",
            CacheCategory::Matches => "matches",
            CacheCategory::Players => "players",
            CacheCategory::Stats => "stats",
        };
        f.write_str(name)
    }
}

#[derive(Default)]
pub struct ResponseCache {
    entries: HashMap<Query, Payload>,
}

impl ResponseCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, query: &Query) -> Option<&Payload> {
        self.entries.get(query)
    }

    /// Replace the whole entry for `query`.
    pub fn insert(&mut self, query: Query, payload: Payload) {
        self.entries.insert(query, payload);
    }

    /// Drop everything, one category, or a single entry.
    ///
    /// A `key` outside the given `category` removes nothing. Returns the
    /// number of entries removed.
    pub fn clear(&mut self, category: Option<CacheCategory>, key: Option<&Query>) -> usize {
        let before = self.entries.len();
        match (category, key) {
            (None, None) => self.entries.clear(),
            (Some(category), None) => self.entries.retain(|q, _| q.category() != category),
            (category, Some(key)) => {
                if category.map_or(true, |c| key.category() == c) {
                    self.entries.remove(key);
                }
            }
        }
        before - self.entries.len()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entry count per category.
    pub fn category_len(&self, category: CacheCategory) -> usize {
        self.entries.keys().filter(|q| q.category() == category).count()
    }
}
