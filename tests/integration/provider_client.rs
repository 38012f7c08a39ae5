//! `ProviderClient` against scripted upstreams: caching, degradation,
//! odds sanitising, derived football stats.

use chrono::NaiveDate;
use secrecy::SecretString;
use serde_json::{json, Value};
use std::sync::Arc;

use sportsdesk::cache::CacheCategory;
use sportsdesk::client::ProviderClient;
use sportsdesk::source::live::{Endpoint, LiveSource};
use sportsdesk::types::{FormResult, Sport, TeamStats};

use crate::stub_transport::StubTransport;

const FD_BASE: &str = "https://fd.test/v4";

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Live-only client with a football key, so every football query
/// reaches the stub.
fn live_client(stub: &StubTransport) -> ProviderClient {
    let live = LiveSource::new(Arc::new(stub.clone())).with_endpoint(
        Sport::Football,
        Endpoint::new(FD_BASE, Some(SecretString::new("test-key".to_string()))),
    );
    ProviderClient::new(vec![Box::new(live)])
}

fn fd_match(id: i64, utc_date: &str, home: i64, away: i64, score: (u32, u32)) -> Value {
    json!({
        "id": id,
        "utcDate": utc_date,
        "status": "FINISHED",
        "homeTeam": {"id": home, "name": format!("Team {home}")},
        "awayTeam": {"id": away, "name": format!("Team {away}")},
        "score": {"fullTime": {"home": score.0, "away": score.1}}
    })
}

fn fd_fixtures() -> Value {
    json!({"matches": [{
        "id": 501,
        "utcDate": "2024-01-06T15:00:00Z",
        "status": "SCHEDULED",
        "homeTeam": {"id": 64, "name": "Liverpool FC"},
        "awayTeam": {"id": 57, "name": "Arsenal FC"},
        "odds": {"homeWin": 0.5, "draw": null, "awayWin": 4.2}
    }]})
}

fn fd_teams() -> Value {
    json!({"teams": [
        {"id": 64, "name": "Liverpool FC", "shortName": "Liverpool", "tla": "LIV"},
        {"id": 57, "name": "Arsenal FC", "shortName": "Arsenal", "tla": "ARS"}
    ]})
}

#[tokio::test]
async fn test_odds_never_below_floor() {
    let stub = StubTransport::new().route("/competitions/2021/matches", fd_fixtures());
    let mut client = live_client(&stub);

    let matches = client
        .list_matches("football", 2021, date(2024, 1, 1), date(2024, 1, 8))
        .await
        .unwrap();
    assert_eq!(matches.len(), 1);

    let odds = matches[0].odds;
    assert_eq!(odds.home, 1.0);
    assert_eq!(odds.draw, 1.0);
    assert_eq!(odds.away, 4.2);
    assert!([odds.home, odds.draw, odds.away].iter().all(|p| p.is_finite() && *p >= 1.0));
}

#[tokio::test]
async fn test_repeat_query_served_from_cache() {
    let stub = StubTransport::new().route("/competitions/2021/matches", fd_fixtures());
    let mut client = live_client(&stub);

    let first = client.list_matches("football", 2021, date(2024, 1, 1), date(2024, 1, 8)).await.unwrap();
    let second = client.list_matches("soccer", 2021, date(2024, 1, 1), date(2024, 1, 8)).await.unwrap();

    assert_eq!(first, second);
    assert_eq!(stub.call_count(), 1);

    let stats = client.cache_stats();
    assert_eq!(stats.hits, 1);
    assert_eq!(stats.misses, 1);
    assert_eq!(stats.entries, 1);
}

#[tokio::test]
async fn test_different_windows_are_different_entries() {
    let stub = StubTransport::new().route("/competitions/2021/matches", fd_fixtures());
    let mut client = live_client(&stub);

    client.list_matches("football", 2021, date(2024, 1, 1), date(2024, 1, 8)).await.unwrap();
    client.list_matches("football", 2021, date(2024, 2, 1), date(2024, 2, 8)).await.unwrap();

    let calls = stub.calls();
    assert_eq!(calls.len(), 2);
    assert!(calls[0].ends_with("/competitions/2021/matches?dateFrom=2024-01-01&dateTo=2024-01-08"));
    assert!(calls[1].ends_with("/competitions/2021/matches?dateFrom=2024-02-01&dateTo=2024-02-08"));
}

#[tokio::test]
async fn test_football_stats_derived_from_season_fixtures() {
    // Team 2: three wins, a goalless draw and a defeat.
    let season = json!({"matches": [
        fd_match(1, "2024-01-01T15:00:00Z", 2, 10, (2, 0)),
        fd_match(2, "2024-01-08T15:00:00Z", 11, 2, (0, 1)),
        fd_match(3, "2024-01-15T15:00:00Z", 2, 12, (3, 1)),
        fd_match(4, "2024-01-22T15:00:00Z", 13, 2, (0, 0)),
        fd_match(5, "2024-01-29T15:00:00Z", 2, 14, (1, 2)),
    ]});
    let stub = StubTransport::new().route("/teams/2/matches?season=2024", season);
    let mut client = live_client(&stub);

    let stats = client.get_team_stats("football", 2, 2024).await.unwrap().unwrap();
    let TeamStats::Football(stats) = stats else { panic!("expected football stats") };

    assert_eq!(stats.played, 5);
    assert_eq!((stats.wins, stats.draws, stats.losses), (3, 1, 1));
    assert_eq!((stats.goals_for, stats.goals_against), (7, 3));
    assert_eq!(stats.points, 10);
    assert_eq!(stats.goal_difference, 4);
    assert_eq!(stats.clean_sheets, 3);
    assert_eq!(stats.win_rate, 60.0);
    assert_eq!(stats.form, vec![FormResult::W, FormResult::W, FormResult::W, FormResult::D, FormResult::L]);
}

#[tokio::test]
async fn test_upstream_failure_degrades_and_is_not_cached() {
    let stub = StubTransport::new().route("/competitions/2021/teams", fd_teams());
    stub.set_status(503);
    let mut client = live_client(&stub);

    assert!(client.list_teams("football", 2021).await.unwrap().is_empty());
    assert!(client.get_match_detail("football", 501).await.unwrap().is_none());
    assert_eq!(client.cache_stats().entries, 0);

    stub.clear_status();
    let teams = client.list_teams("football", 2021).await.unwrap();
    assert_eq!(teams.len(), 2);
    assert_eq!(stub.call_count(), 3);
}

#[tokio::test]
async fn test_unknown_sport_is_an_error_without_io() {
    let stub = StubTransport::new();
    let mut client = live_client(&stub);

    let err = client
        .list_matches("curling", 1, date(2024, 1, 1), date(2024, 1, 8))
        .await
        .unwrap_err();
    assert!(err.is_configuration());
    assert!(client.list_leagues("curling").await.unwrap_err().is_configuration());
    assert!(client.get_team_stats("curling", 1, 2024).await.unwrap_err().is_configuration());
    assert_eq!(stub.call_count(), 0);
}

#[tokio::test]
async fn test_missing_football_key_falls_back_without_io() {
    let stub = StubTransport::new().route("/competitions", json!({"competitions": []}));
    let mut client = ProviderClient::new(vec![Box::new(LiveSource::new(Arc::new(stub.clone())))]);

    assert!(client.list_teams("football", 2021).await.unwrap().is_empty());

    let leagues = client.list_leagues("football").await.unwrap();
    assert_eq!(leagues.len(), 6);
    assert_eq!(leagues[0].name, "Premier League");
    assert_eq!(stub.call_count(), 0);
}

#[tokio::test]
async fn test_leagues_from_fixed_table_for_other_sports() {
    let stub = StubTransport::new();
    let mut client = live_client(&stub);

    let leagues = client.list_leagues("mlb").await.unwrap();
    let ids: Vec<_> = leagues.iter().map(|l| l.id).collect();
    assert_eq!(ids, vec![103, 104]);
    assert_eq!(stub.call_count(), 0);
}

#[tokio::test]
async fn test_clear_one_category_keeps_the_rest() {
    let stub = StubTransport::new()
        .route("/competitions/2021/teams", fd_teams())
        .route("/competitions/2021/matches", fd_fixtures());
    let mut client = live_client(&stub);

    client.list_teams("football", 2021).await.unwrap();
    client.list_matches("football", 2021, date(2024, 1, 1), date(2024, 1, 8)).await.unwrap();
    assert_eq!(stub.call_count(), 2);

    client.clear_cache(Some(CacheCategory::Matches), None);
    client.list_teams("football", 2021).await.unwrap();
    client.list_matches("football", 2021, date(2024, 1, 1), date(2024, 1, 8)).await.unwrap();
    assert_eq!(stub.call_count(), 3);

    client.clear_cache(None, None);
    assert_eq!(client.cache_stats().entries, 0);
}

#[tokio::test]
async fn test_demo_sports_skip_the_network() {
    let stub = StubTransport::new().route(
        "/teams",
        json!({"data": [{"id": 14, "full_name": "Los Angeles Lakers", "name": "Lakers", "abbreviation": "LAL"}]}),
    );
    let mut client = ProviderClient::with_transport(Arc::new(stub.clone()), &[Sport::Football]);

    let football = client.list_teams("football", 2021).await.unwrap();
    assert_eq!(football.len(), 8);
    assert_eq!(stub.call_count(), 0);

    let nba = client.list_teams("nba", 0).await.unwrap();
    assert_eq!(nba[0].name, "Los Angeles Lakers");
    assert_eq!(stub.calls(), vec!["https://api.balldontlie.io/v1/teams".to_string()]);
}
