//! Live upstream source: one `SportProvider` per sport, one shared
//! `HttpTransport`.

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info};

use super::{DataSource, Payload, Query};
use crate::leagues;
use crate::providers::{default_providers, SportProvider};
use crate::transport::HttpTransport;
use crate::types::{Sport, SportsError};

/// Public base URL of each provider.
pub fn default_base_url(sport: Sport) -> &'static str {
    match sport {
        Sport::Football => "https://api.football-data.org/v4",
        Sport::Nba => "https://api.balldontlie.io/v1",
        Sport::Mlb => "https://statsapi.mlb.com/api/v1",
        Sport::Nfl => "https://site.api.espn.com/apis/site/v2/sports/football/nfl",
        Sport::Nhl => "https://statsapi.web.nhl.com/api/v1",
    }
}

/// Where one sport's provider lives and how to authenticate to it.
pub struct Endpoint {
    pub base_url: String,
    pub api_key: Option<SecretString>,
}

impl Endpoint {
    pub fn new(base_url: impl Into<String>, api_key: Option<SecretString>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key,
        }
    }
}

pub struct LiveSource {
    transport: Arc<dyn HttpTransport>,
    providers: HashMap<Sport, Box<dyn SportProvider>>,
    endpoints: HashMap<Sport, Endpoint>,
}

impl LiveSource {
    /// Every built-in provider at its public base URL, no API keys.
    pub fn new(transport: Arc<dyn HttpTransport>) -> Self {
        let providers: HashMap<Sport, Box<dyn SportProvider>> =
            default_providers().into_iter().map(|p| (p.sport(), p)).collect();
        let endpoints = providers
            .keys()
            .map(|&sport| (sport, Endpoint::new(default_base_url(sport), None)))
            .collect();
        Self { transport, providers, endpoints }
    }

    /// A source with no providers; add them with `with_provider`.
    pub fn empty(transport: Arc<dyn HttpTransport>) -> Self {
        Self { transport, providers: HashMap::new(), endpoints: HashMap::new() }
    }

    pub fn with_provider(mut self, provider: Box<dyn SportProvider>) -> Self {
        let sport = provider.sport();
        self.endpoints
            .entry(sport)
            .or_insert_with(|| Endpoint::new(default_base_url(sport), None));
        self.providers.insert(sport, provider);
        self
    }

    pub fn with_endpoint(mut self, sport: Sport, endpoint: Endpoint) -> Self {
        self.endpoints.insert(sport, endpoint);
        self
    }

    pub fn supports(&self, sport: Sport) -> bool {
        self.providers.contains_key(&sport)
    }

    fn provider(&self, sport: Sport) -> Result<&dyn SportProvider, SportsError> {
        self.providers
            .get(&sport)
            .map(|p| p.as_ref())
            .ok_or_else(|| SportsError::UnsupportedSport(sport.to_string()))
    }

    async fn get(&self, provider: &dyn SportProvider, path: &str) -> Result<Value, SportsError> {
        let sport = provider.sport();
        let endpoint = self
            .endpoints
            .get(&sport)
            .ok_or_else(|| SportsError::UnsupportedSport(sport.to_string()))?;

        let mut headers = Vec::new();
        match (&endpoint.api_key, provider.auth_header()) {
            (Some(key), Some(header)) => headers.push((header.to_string(), key.expose_secret().clone())),
            (None, _) if provider.requires_api_key() => return Err(SportsError::MissingApiKey(sport)),
            _ => {}
        }

        let url = format!("{}{}", endpoint.base_url, path);
        info!(%sport, url = %url, "Fetching from provider");
        self.transport.get_json(&url, headers).await
    }
}

#[async_trait]
impl DataSource for LiveSource {
    fn name(&self) -> &'static str {
        "live"
    }

    async fn fetch(&self, query: &Query) -> Result<Option<Payload>, SportsError> {
        let provider = self.provider(query.sport())?;

        let payload = match *query {
            Query::Leagues { sport } => match provider.leagues_path() {
                Some(path) => Payload::Leagues(provider.normalize_leagues(self.get(provider, &path).await?)?),
                None => {
                    debug!(%sport, "Fixed league table");
                    Payload::Leagues(leagues::default_leagues(sport))
                }
            },
            Query::Teams { league_id, .. } => {
                let body = self.get(provider, &provider.teams_path(league_id)).await?;
                Payload::Teams(provider.normalize_teams(body)?)
            }
            Query::Matches { sport, league_id, date_from, date_to } => {
                let body = self.get(provider, &provider.matches_path(league_id, date_from, date_to)).await?;
                let league = leagues::resolve(sport, league_id);
                Payload::Matches(provider.normalize_matches(body, &league)?)
            }
            Query::MatchDetail { match_id, .. } => {
                let body = self.get(provider, &provider.match_detail_path(match_id)).await?;
                match provider.normalize_match_detail(body)? {
                    Some(detail) => Payload::MatchDetail(Box::new(detail)),
                    None => return Ok(None),
                }
            }
            Query::TeamStats { team_id, season, .. } => {
                let body = self.get(provider, &provider.team_stats_path(team_id, season)).await?;
                match provider.normalize_team_stats(body, team_id)? {
                    Some(stats) => Payload::TeamStats(stats),
                    None => return Ok(None),
                }
            }
            Query::Players { team_id, .. } => {
                let body = self.get(provider, &provider.players_path(team_id)).await?;
                Payload::Players(provider.normalize_players(body)?)
            }
            Query::PlayerStats { player_id, season, .. } => {
                let body = self.get(provider, &provider.player_stats_path(player_id, season)).await?;
                match provider.normalize_player_stats(body, player_id, season)? {
                    Some(stats) => Payload::PlayerStats(stats),
                    None => return Ok(None),
                }
            }
        };

        Ok(Some(payload))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::basketball::BasketballProvider;
    use crate::transport::MockHttpTransport;
    use serde_json::json;

    fn key(value: &str) -> Option<SecretString> {
        Some(SecretString::new(value.to_string()))
    }

    #[tokio::test]
    async fn test_football_without_key_does_no_io() {
        let mut mock = MockHttpTransport::new();
        mock.expect_get_json().times(0);
        let source = LiveSource::new(Arc::new(mock));

        let err = source
            .fetch(&Query::Teams { sport: Sport::Football, league_id: 2021 })
            .await
            .unwrap_err();
        assert!(matches!(err, SportsError::MissingApiKey(Sport::Football)));
        assert!(!err.is_configuration());
    }

    #[tokio::test]
    async fn test_auth_header_and_base_url() {
        let mut mock = MockHttpTransport::new();
        mock.expect_get_json()
            .withf(|url, headers| {
                url == "https://proxy.test/v4/competitions/2021/teams"
                    && headers == &vec![("X-Auth-Token".to_string(), "secret".to_string())]
            })
            .times(1)
            .returning(|_, _| Ok(json!({"teams": [{"id": 64, "name": "Liverpool FC"}]})));

        let source = LiveSource::new(Arc::new(mock))
            .with_endpoint(Sport::Football, Endpoint::new("https://proxy.test/v4/", key("secret")));
        let payload = source
            .fetch(&Query::Teams { sport: Sport::Football, league_id: 2021 })
            .await
            .unwrap();
        let Some(Payload::Teams(teams)) = payload else {
            panic!("expected teams");
        };
        assert_eq!(teams[0].name, "Liverpool FC");
    }

    #[tokio::test]
    async fn test_fixed_league_table_skips_transport() {
        let mut mock = MockHttpTransport::new();
        mock.expect_get_json().times(0);
        let source = LiveSource::new(Arc::new(mock));

        let Some(Payload::Leagues(leagues)) = source.fetch(&Query::Leagues { sport: Sport::Mlb }).await.unwrap()
        else {
            panic!("expected leagues");
        };
        assert_eq!(leagues.len(), 2);
    }

    #[tokio::test]
    async fn test_unregistered_sport_is_configuration_error() {
        let mut mock = MockHttpTransport::new();
        mock.expect_get_json().times(0);
        let source = LiveSource::empty(Arc::new(mock)).with_provider(Box::new(BasketballProvider));

        assert!(source.supports(Sport::Nba));
        let err = source.fetch(&Query::Players { sport: Sport::Nhl, team_id: 10 }).await.unwrap_err();
        assert!(err.is_configuration());
    }

    #[tokio::test]
    async fn test_empty_singular_result_is_none() {
        let mut mock = MockHttpTransport::new();
        mock.expect_get_json().times(1).returning(|_, _| Ok(json!({"data": []})));
        let source = LiveSource::new(Arc::new(mock));

        let payload = source
            .fetch(&Query::PlayerStats { sport: Sport::Nba, player_id: 237, season: 2024 })
            .await
            .unwrap();
        assert!(payload.is_none());
    }

    #[tokio::test]
    async fn test_transport_error_propagates_to_caller() {
        let mut mock = MockHttpTransport::new();
        mock.expect_get_json()
            .returning(|url, _| Err(SportsError::Status { url: url.to_string(), status: 500 }));
        let source = LiveSource::new(Arc::new(mock));

        let err = source.fetch(&Query::Teams { sport: Sport::Nhl, league_id: 0 }).await.unwrap_err();
        assert!(matches!(err, SportsError::Status { status: 500, .. }));
    }
}
