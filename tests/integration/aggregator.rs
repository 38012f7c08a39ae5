//! `Aggregator` end to end over demo data and scripted upstreams.

use chrono::{FixedOffset, NaiveDate, Utc};
use std::sync::Arc;

use sportsdesk::aggregator::{Aggregator, Session};
use sportsdesk::client::ProviderClient;
use sportsdesk::storage::{Favorites, JsonFileStore, KeyValueStore, MemoryStore};
use sportsdesk::types::Sport;

use crate::stub_transport::StubTransport;

fn utc() -> FixedOffset {
    FixedOffset::east_opt(0).unwrap()
}

fn demo_desk(stub: &StubTransport, store: Box<dyn KeyValueStore>) -> Aggregator {
    let client = ProviderClient::with_transport(Arc::new(stub.clone()), &[Sport::Football, Sport::Nba]);
    let today = Utc::now().date_naive();
    Aggregator::new(client, Session::starting(Sport::Football, today, 7), Favorites::load(store), utc())
}

#[test]
fn test_favorites_survive_restart() {
    let stub = StubTransport::new();
    let store = MemoryStore::new();

    let mut desk = demo_desk(&stub, Box::new(store.clone()));
    assert!(desk.toggle_favorite("football", 64).unwrap());
    assert!(desk.toggle_favorite("nba", 14).unwrap());
    assert!(!desk.toggle_favorite("nba", 14).unwrap());

    let reopened = demo_desk(&stub, Box::new(store));
    assert!(reopened.is_favorite("football", 64).unwrap());
    assert!(!reopened.is_favorite("nba", 14).unwrap());
    assert!(!reopened.is_favorite("nfl", 64).unwrap());
    assert!(reopened.is_favorite("cricket", 64).unwrap_err().is_configuration());
}

#[test]
fn test_favorites_on_disk() {
    let mut path = std::env::temp_dir();
    path.push(format!("sportsdesk_it_favorites_{}.json", uuid::Uuid::new_v4()));
    let stub = StubTransport::new();

    let mut desk = demo_desk(&stub, Box::new(JsonFileStore::new(&path)));
    desk.toggle_favorite("mlb", 147).unwrap();

    let reopened = demo_desk(&stub, Box::new(JsonFileStore::new(&path)));
    assert!(reopened.is_favorite("baseball", 147).unwrap());

    JsonFileStore::new(&path).delete().unwrap();
}

#[tokio::test]
async fn test_prompt_enriched_with_mentioned_team_stats() {
    let stub = StubTransport::new();
    let mut desk = demo_desk(&stub, Box::new(MemoryStore::new()));

    let prompt = "Will Liverpool win this weekend?";
    let enhanced = desk.generate_enhanced_prompt(prompt).await.unwrap();

    assert!(enhanced.starts_with(prompt));
    assert!(enhanced.contains("\n\nTeam Statistics:\n"));
    assert!(enhanced.contains("\nLiverpool:\n{"));
    assert!(enhanced.contains("\"points\": 64"));
    assert!(!enhanced.contains("Arsenal:"));
    assert_eq!(stub.call_count(), 0);
}

#[tokio::test]
async fn test_prompt_without_known_team_is_unchanged() {
    let stub = StubTransport::new();
    let mut desk = demo_desk(&stub, Box::new(MemoryStore::new()));

    let prompt = "Who wins the Tour de France?";
    assert_eq!(desk.generate_enhanced_prompt(prompt).await.unwrap(), prompt);
}

#[tokio::test]
async fn test_match_views_for_demo_window() {
    let stub = StubTransport::new();
    let mut desk = demo_desk(&stub, Box::new(MemoryStore::new()));

    let views = desk.load_matches().await.unwrap();
    assert_eq!(views.len(), 4);
    for view in &views {
        assert!(view.time.starts_with("Today, ") || view.time.starts_with("Tomorrow, "));
        assert_eq!(view.score.home, "-");
        assert_eq!(view.league, "Premier League");
        assert!(view.odds.home >= 1.0);
    }

    desk.set_date_range(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(), NaiveDate::from_ymd_opt(2024, 1, 8).unwrap());
    assert!(desk.loaded_matches().is_empty());
}

#[tokio::test]
async fn test_live_sport_degrades_to_empty_views() {
    let stub = StubTransport::new();
    stub.set_status(500);
    let mut desk = demo_desk(&stub, Box::new(MemoryStore::new()));

    desk.set_active_sport("nhl").unwrap();
    assert!(desk.load_matches().await.unwrap().is_empty());
    assert!(desk.load_team_stats(10).await.unwrap().is_none());
    assert_eq!(stub.call_count(), 2);
}
