//! Provider client: the uniform read API over every sport.
//!
//! Lookup order per query is cache, then each `DataSource` in turn
//! (demo before live). The first source that answers wins and its
//! answer is cached after sanitizing.
//!
//! Failure policy:
//! - an unknown sport is a caller mistake and comes back as `Err`;
//! - anything else (network, HTTP status, parse, missing key) is logged
//!   at `warn` and degraded to an empty list or `None`. Degraded results
//!   are not cached, so the next call retries.

use anyhow::Result;
use chrono::NaiveDate;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::cache::{CacheCategory, ResponseCache};
use crate::config::AppConfig;
use crate::leagues;
use crate::source::demo::DemoSource;
use crate::source::live::{default_base_url, Endpoint, LiveSource};
use crate::source::{DataSource, Payload, Query};
use crate::transport::{HttpTransport, ReqwestTransport};
use crate::types::{League, Match, MatchDetail, Player, PlayerStats, Sport, SportsError, Team, TeamStats};

/// Cache counters since construction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub entries: usize,
}

pub struct ProviderClient {
    cache: ResponseCache,
    sources: Vec<Box<dyn DataSource>>,
    hits: u64,
    misses: u64,
}

impl ProviderClient {
    /// Sources are consulted in order.
    pub fn new(sources: Vec<Box<dyn DataSource>>) -> Self {
        Self { cache: ResponseCache::new(), sources, hits: 0, misses: 0 }
    }

    /// Demo data for `demo_sports`, every built-in provider behind
    /// `transport` for the rest.
    pub fn with_transport(transport: Arc<dyn HttpTransport>, demo_sports: &[Sport]) -> Self {
        Self::new(vec![
            Box::new(DemoSource::new(demo_sports.iter().copied())),
            Box::new(LiveSource::new(transport)),
        ])
    }

    /// Build the production client: reqwest transport, configured base
    /// URLs and API keys, configured demo sports.
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let transport = ReqwestTransport::new(
            Duration::from_secs(config.http.timeout_secs),
            &config.http.user_agent,
        )?;

        let mut live = LiveSource::new(Arc::new(transport));
        for &sport in Sport::ALL {
            let base_url = config
                .provider(sport)
                .and_then(|p| p.base_url.clone())
                .unwrap_or_else(|| default_base_url(sport).to_string());
            let api_key = config.api_key(sport);
            if api_key.is_some() {
                debug!(%sport, "API key configured");
            }
            live = live.with_endpoint(sport, Endpoint::new(base_url, api_key));
        }

        info!(demo = ?config.demo.sports, "Provider client ready");
        Ok(Self::new(vec![
            Box::new(DemoSource::new(config.demo.sports.iter().copied())),
            Box::new(live),
        ]))
    }

    /// Answer `query` from cache or the first source that has it.
    async fn resolve(&mut self, query: Query) -> Result<Option<Payload>, SportsError> {
        if let Some(hit) = self.cache.get(&query) {
            self.hits += 1;
            debug!(key = %query, "Cache hit");
            return Ok(Some(hit.clone()));
        }
        self.misses += 1;

        for source in &self.sources {
            match source.fetch(&query).await {
                Ok(Some(payload)) => {
                    let payload = payload.sanitized();
                    debug!(
                        key = %query,
                        source = source.name(),
                        kind = payload.kind(),
                        records = payload.len(),
                        "Caching response"
                    );
                    self.cache.insert(query, payload.clone());
                    return Ok(Some(payload));
                }
                Ok(None) => continue,
                Err(e) if e.is_configuration() => return Err(e),
                Err(e) => {
                    warn!(key = %query, source = source.name(), error = %e, "Fetch failed, degrading");
                    return Ok(None);
                }
            }
        }
        Ok(None)
    }

    /// Leagues for `sport`. Falls back to the fixed table when the live
    /// listing is unavailable or empty.
    pub async fn list_leagues(&mut self, sport: &str) -> Result<Vec<League>, SportsError> {
        let sport: Sport = sport.parse()?;
        match self.resolve(Query::Leagues { sport }).await? {
            Some(Payload::Leagues(leagues)) if !leagues.is_empty() => Ok(leagues),
            _ => Ok(leagues::default_leagues(sport)),
        }
    }

    pub async fn list_teams(&mut self, sport: &str, league_id: i64) -> Result<Vec<Team>, SportsError> {
        let sport: Sport = sport.parse()?;
        match self.resolve(Query::Teams { sport, league_id }).await? {
            Some(Payload::Teams(teams)) => Ok(teams),
            _ => Ok(Vec::new()),
        }
    }

    /// Fixtures in `[date_from, date_to]`. Every returned match carries
    /// finite odds no lower than 1.0.
    pub async fn list_matches(
        &mut self,
        sport: &str,
        league_id: i64,
        date_from: NaiveDate,
        date_to: NaiveDate,
    ) -> Result<Vec<Match>, SportsError> {
        let sport: Sport = sport.parse()?;
        let query = Query::Matches { sport, league_id, date_from, date_to };
        match self.resolve(query).await? {
            Some(Payload::Matches(matches)) => Ok(matches),
            _ => Ok(Vec::new()),
        }
    }

    pub async fn get_match_detail(&mut self, sport: &str, match_id: i64) -> Result<Option<MatchDetail>, SportsError> {
        let sport: Sport = sport.parse()?;
        match self.resolve(Query::MatchDetail { sport, match_id }).await? {
            Some(Payload::MatchDetail(detail)) => Ok(Some(*detail)),
            _ => Ok(None),
        }
    }

    pub async fn get_team_stats(
        &mut self,
        sport: &str,
        team_id: i64,
        season: i32,
    ) -> Result<Option<TeamStats>, SportsError> {
        let sport: Sport = sport.parse()?;
        match self.resolve(Query::TeamStats { sport, team_id, season }).await? {
            Some(Payload::TeamStats(stats)) => Ok(Some(stats)),
            _ => Ok(None),
        }
    }

    pub async fn list_players(&mut self, sport: &str, team_id: i64) -> Result<Vec<Player>, SportsError> {
        let sport: Sport = sport.parse()?;
        match self.resolve(Query::Players { sport, team_id }).await? {
            Some(Payload::Players(players)) => Ok(players),
            _ => Ok(Vec::new()),
        }
    }

    pub async fn get_player_stats(
        &mut self,
        sport: &str,
        player_id: i64,
        season: i32,
    ) -> Result<Option<PlayerStats>, SportsError> {
        let sport: Sport = sport.parse()?;
        match self.resolve(Query::PlayerStats { sport, player_id, season }).await? {
            Some(Payload::PlayerStats(stats)) => Ok(Some(stats)),
            _ => Ok(None),
        }
    }

    /// Force a refresh: everything, one category, or one entry.
    pub fn clear_cache(&mut self, category: Option<CacheCategory>, key: Option<&Query>) {
        let removed = self.cache.clear(category, key);
        info!(
            category = ?category,
            key = ?key.map(Query::cache_key),
            removed,
            "Cache cleared"
        );
    }

    pub fn cache_stats(&self) -> CacheStats {
        CacheStats { hits: self.hits, misses: self.misses, entries: self.cache.len() }
    }
}
