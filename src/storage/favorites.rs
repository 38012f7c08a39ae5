//! Favorite teams.
//!
//! Stored as one flat `{"<sport>_<teamId>": true}` JSON object under a
//! single namespaced key, rewritten in full on every toggle. Toggling off
//! removes the key.

use std::collections::BTreeMap;
use tracing::{debug, warn};

use super::KeyValueStore;
use crate::types::Sport;

pub const FAVORITES_KEY: &str = "sportsdesk.favorites";

pub struct Favorites {
    store: Box<dyn KeyValueStore>,
    entries: BTreeMap<String, bool>,
}

impl Favorites {
    /// Read the favorites from `store`. Missing or unreadable data
    /// yields an empty set.
    pub fn load(store: Box<dyn KeyValueStore>) -> Self {
        let entries = match store.get(FAVORITES_KEY) {
            Ok(Some(raw)) => serde_json::from_str(&raw).unwrap_or_else(|e| {
                warn!(error = %e, "Corrupt favorites, starting empty");
                BTreeMap::new()
            }),
            Ok(None) => BTreeMap::new(),
            Err(e) => {
                warn!(error = %e, "Failed to read favorites, starting empty");
                BTreeMap::new()
            }
        };
        debug!(count = entries.values().filter(|v| **v).count(), "Favorites loaded");
        Self { store, entries }
    }

    fn key(sport: Sport, team_id: i64) -> String {
        format!("{sport}_{team_id}")
    }

    /// Flip membership and persist. Returns the new state.
    pub fn toggle(&mut self, sport: Sport, team_id: i64) -> bool {
        let key = Self::key(sport, team_id);
        let now = !self.entries.get(&key).copied().unwrap_or(false);
        if now {
            self.entries.insert(key, true);
        } else {
            self.entries.remove(&key);
        }

        match serde_json::to_string(&self.entries) {
            Ok(json) => {
                if let Err(e) = self.store.set(FAVORITES_KEY, &json) {
                    warn!(%sport, team_id, error = %e, "Failed to persist favorites");
                }
            }
            Err(e) => warn!(error = %e, "Failed to serialise favorites"),
        }
        now
    }

    pub fn contains(&self, sport: Sport, team_id: i64) -> bool {
        self.entries.get(&Self::key(sport, team_id)).copied().unwrap_or(false)
    }

    /// `(sport, team id)` of every current favorite.
    pub fn iter(&self) -> impl Iterator<Item = (Sport, i64)> + '_ {
        self.entries.iter().filter(|(_, on)| **on).filter_map(|(key, _)| {
            let (sport, id) = key.rsplit_once('_')?;
            Some((sport.parse().ok()?, id.parse().ok()?))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    #[test]
    fn test_toggle_round_trip() {
        let store = MemoryStore::new();
        let mut favorites = Favorites::load(Box::new(store.clone()));

        assert!(favorites.toggle(Sport::Football, 1));
        assert!(favorites.contains(Sport::Football, 1));
        assert!(!favorites.contains(Sport::Nba, 1));

        let raw = store.get(FAVORITES_KEY).unwrap().unwrap();
        assert_eq!(raw, r#"{"football_1":true}"#);

        assert!(!favorites.toggle(Sport::Football, 1));
        assert!(!favorites.contains(Sport::Football, 1));
        assert_eq!(store.get(FAVORITES_KEY).unwrap().unwrap(), "{}");
    }

    #[test]
    fn test_corrupt_storage_is_empty() {
        let mut store = MemoryStore::new();
        store.set(FAVORITES_KEY, "[oops").unwrap();
        let favorites = Favorites::load(Box::new(store));
        assert_eq!(favorites.iter().count(), 0);
    }

    #[test]
    fn test_iter_skips_cleared_entries() {
        let mut favorites = Favorites::load(Box::new(MemoryStore::new()));
        favorites.toggle(Sport::Nba, 101);
        favorites.toggle(Sport::Nfl, 12);
        favorites.toggle(Sport::Nfl, 12);
        assert_eq!(favorites.iter().collect::<Vec<_>>(), vec![(Sport::Nba, 101)]);
    }
}
