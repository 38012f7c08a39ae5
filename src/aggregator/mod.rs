//! Session-level facade over `ProviderClient`.
//!
//! Owns the active sport, league and date window (`Session`), the
//! currently loaded teams and matches, per-team memos and the favorites
//! set, and turns canonical records into view-models.

pub mod prompt;
pub mod view;

use anyhow::Context;
use chrono::{Datelike, Duration, FixedOffset, NaiveDate, Utc};
use std::collections::HashMap;
use tracing::{debug, info};

use crate::client::ProviderClient;
use crate::config::AppConfig;
use crate::leagues;
use crate::storage::{Favorites, JsonFileStore};
use crate::types::{League, Match, MatchDetail, Player, Sport, SportsError, Team, TeamStats};

pub use view::{MatchView, ScoreView};

/// What the user is currently looking at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub sport: Sport,
    pub league_id: i64,
    pub date_from: NaiveDate,
    pub date_to: NaiveDate,
}

impl Session {
    /// `sport`'s first league, `window_days` starting at `today`.
    pub fn starting(sport: Sport, today: NaiveDate, window_days: i64) -> Self {
        Self {
            sport,
            league_id: leagues::first_league_id(sport),
            date_from: today,
            date_to: today + Duration::days(window_days),
        }
    }
}

pub struct Aggregator {
    client: ProviderClient,
    session: Session,
    offset: FixedOffset,
    teams: Vec<Team>,
    matches: Vec<Match>,
    team_stats: HashMap<(Sport, i64), TeamStats>,
    match_details: HashMap<(Sport, i64), MatchDetail>,
    favorites: Favorites,
}

impl Aggregator {
    pub fn new(client: ProviderClient, session: Session, favorites: Favorites, offset: FixedOffset) -> Self {
        Self {
            client,
            session,
            offset,
            teams: Vec::new(),
            matches: Vec::new(),
            team_stats: HashMap::new(),
            match_details: HashMap::new(),
            favorites,
        }
    }

    /// Production wiring: live client, JSON-file favorites, configured
    /// default sport and date window.
    pub fn from_config(config: &AppConfig) -> anyhow::Result<Self> {
        let client = ProviderClient::from_config(config).context("Failed to build provider client")?;
        let offset = config.utc_offset();
        let today = Utc::now().with_timezone(&offset).date_naive();

        let mut session = Session::starting(config.session.default_sport, today, config.session.date_window_days);
        if let Some(league_id) = config.session.default_league {
            session.league_id = league_id;
        }

        let favorites = Favorites::load(Box::new(JsonFileStore::new(&config.storage.favorites_path)));
        Ok(Self::new(client, session, favorites, offset))
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn client_mut(&mut self) -> &mut ProviderClient {
        &mut self.client
    }

    pub fn loaded_teams(&self) -> &[Team] {
        &self.teams
    }

    pub fn loaded_matches(&self) -> &[Match] {
        &self.matches
    }

    fn sport_key(&self) -> &'static str {
        self.session.sport.key()
    }

    fn today(&self) -> NaiveDate {
        Utc::now().with_timezone(&self.offset).date_naive()
    }

    fn clear_loaded(&mut self) {
        self.teams.clear();
        self.matches.clear();
    }

    /// Switch sport. The league resets to the new sport's first league.
    pub fn set_active_sport(&mut self, sport: &str) -> Result<(), SportsError> {
        let sport: Sport = sport.parse()?;
        self.session.sport = sport;
        self.session.league_id = leagues::first_league_id(sport);
        self.clear_loaded();
        info!(%sport, league_id = self.session.league_id, "Active sport changed");
        Ok(())
    }

    pub fn set_active_league(&mut self, league_id: i64) {
        self.session.league_id = league_id;
        self.clear_loaded();
        info!(sport = %self.session.sport, league_id, "Active league changed");
    }

    pub fn set_date_range(&mut self, date_from: NaiveDate, date_to: NaiveDate) {
        self.session.date_from = date_from;
        self.session.date_to = date_to;
        self.matches.clear();
        debug!(%date_from, %date_to, "Date range changed");
    }

    pub async fn load_leagues(&mut self) -> Result<Vec<League>, SportsError> {
        self.client.list_leagues(self.sport_key()).await
    }

    pub async fn load_teams(&mut self) -> Result<Vec<Team>, SportsError> {
        self.teams = self.client.list_teams(self.sport_key(), self.session.league_id).await?;
        info!(sport = %self.session.sport, count = self.teams.len(), "Teams loaded");
        Ok(self.teams.clone())
    }

    /// Fetch the session's fixtures and project them for display.
    pub async fn load_matches(&mut self) -> Result<Vec<MatchView>, SportsError> {
        let Session { sport, league_id, date_from, date_to } = self.session.clone();
        self.matches = self.client.list_matches(sport.key(), league_id, date_from, date_to).await?;
        info!(%sport, league_id, count = self.matches.len(), "Matches loaded");

        let reference = self.today();
        Ok(self.views(self.matches.iter(), reference))
    }

    fn views<'a>(&self, matches: impl Iterator<Item = &'a Match>, reference: NaiveDate) -> Vec<MatchView> {
        matches.map(|m| MatchView::from_match(m, reference, self.offset)).collect()
    }

    /// Loaded fixtures involving `team_id`, loading first if nothing is.
    pub async fn load_team_matches(&mut self, team_id: i64) -> Result<Vec<MatchView>, SportsError> {
        if self.matches.is_empty() {
            self.load_matches().await?;
        }
        let reference = self.today();
        Ok(self.views(self.matches.iter().filter(|m| m.involves(team_id)), reference))
    }

    /// Current-season stats, memoized per `(sport, team)` for the life of
    /// the aggregator.
    pub async fn load_team_stats(&mut self, team_id: i64) -> Result<Option<TeamStats>, SportsError> {
        let memo_key = (self.session.sport, team_id);
        if let Some(stats) = self.team_stats.get(&memo_key) {
            return Ok(Some(stats.clone()));
        }

        let season = self.today().year();
        let stats = self.client.get_team_stats(self.sport_key(), team_id, season).await?;
        if let Some(stats) = &stats {
            self.team_stats.insert(memo_key, stats.clone());
        }
        Ok(stats)
    }

    pub async fn load_match_details(&mut self, match_id: i64) -> Result<Option<MatchDetail>, SportsError> {
        let memo_key = (self.session.sport, match_id);
        if let Some(detail) = self.match_details.get(&memo_key) {
            return Ok(Some(detail.clone()));
        }

        let detail = self.client.get_match_detail(self.sport_key(), match_id).await?;
        if let Some(detail) = &detail {
            self.match_details.insert(memo_key, detail.clone());
        }
        Ok(detail)
    }

    pub async fn load_team_players(&mut self, team_id: i64) -> Result<Vec<Player>, SportsError> {
        self.client.list_players(self.sport_key(), team_id).await
    }

    /// Loaded teams whose name or short name contains `query`
    /// (case-insensitive). Loads teams first if none are loaded.
    pub async fn search_teams(&mut self, query: &str) -> Result<Vec<Team>, SportsError> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return Ok(Vec::new());
        }
        if self.teams.is_empty() {
            self.load_teams().await?;
        }
        Ok(self.teams.iter().filter(|t| t.name_matches(&needle)).cloned().collect())
    }

    /// Returns whether the team is a favorite afterwards.
    pub fn toggle_favorite(&mut self, sport: &str, team_id: i64) -> Result<bool, SportsError> {
        let sport: Sport = sport.parse()?;
        let now = self.favorites.toggle(sport, team_id);
        info!(%sport, team_id, favorite = now, "Favorite toggled");
        Ok(now)
    }

    pub fn is_favorite(&self, sport: &str, team_id: i64) -> Result<bool, SportsError> {
        let sport: Sport = sport.parse()?;
        Ok(self.favorites.contains(sport, team_id))
    }

    /// Append stats for every team `user_prompt` mentions.
    ///
    /// Unchanged when no team is recognised. Teams without stats (or
    /// without a usable id) are recognised but contribute no block.
    pub async fn generate_enhanced_prompt(&mut self, user_prompt: &str) -> Result<String, SportsError> {
        if self.teams.is_empty() {
            self.load_teams().await?;
        }

        let mentions = prompt::find_mentions(user_prompt, &self.teams, &self.matches);
        if mentions.is_empty() {
            return Ok(user_prompt.to_string());
        }

        let mut enhanced = String::from(user_prompt);
        enhanced.push_str(prompt::STATS_HEADER);
        for mention in mentions.iter().filter(|m| m.id != 0) {
            if let Some(stats) = self.load_team_stats(mention.id).await? {
                enhanced.push_str(&prompt::stats_block(&mention.name, &stats));
            }
        }

        debug!(teams = mentions.len(), "Prompt enriched");
        Ok(enhanced)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;
    use crate::transport::MockHttpTransport;
    use std::sync::Arc;

    fn demo_aggregator() -> Aggregator {
        let mut mock = MockHttpTransport::new();
        mock.expect_get_json().times(0);
        let client = ProviderClient::with_transport(Arc::new(mock), &[Sport::Football, Sport::Nba]);
        let today = Utc::now().date_naive();
        Aggregator::new(
            client,
            Session::starting(Sport::Football, today, 7),
            Favorites::load(Box::new(MemoryStore::new())),
            FixedOffset::east_opt(0).unwrap(),
        )
    }

    #[test]
    fn test_set_active_sport_resets_league() {
        let mut agg = demo_aggregator();
        agg.set_active_league(2014);
        agg.set_active_sport("mlb").unwrap();
        assert_eq!(agg.session().sport, Sport::Mlb);
        assert_eq!(agg.session().league_id, 103);

        assert!(agg.set_active_sport("curling").unwrap_err().is_configuration());
        assert_eq!(agg.session().sport, Sport::Mlb);
    }

    #[tokio::test]
    async fn test_switching_sport_drops_loaded_data() {
        let mut agg = demo_aggregator();
        agg.load_matches().await.unwrap();
        agg.load_teams().await.unwrap();
        assert!(!agg.loaded_matches().is_empty());

        agg.set_active_sport("nba").unwrap();
        assert!(agg.loaded_matches().is_empty());
        assert!(agg.loaded_teams().is_empty());
    }

    #[tokio::test]
    async fn test_team_matches_loads_on_demand() {
        let mut agg = demo_aggregator();
        let views = agg.load_team_matches(2).await.unwrap();
        assert_eq!(views.len(), 1);
        assert_eq!(views[0].away_team, "Liverpool");
        assert_eq!(agg.loaded_matches().len(), 4);
    }

    #[tokio::test]
    async fn test_stats_memo_is_per_sport() {
        let mut agg = demo_aggregator();
        let football = agg.load_team_stats(1).await.unwrap();
        assert!(matches!(football, Some(TeamStats::Football(_))));

        agg.set_active_sport("nba").unwrap();
        let nba = agg.load_team_stats(1).await.unwrap();
        assert!(matches!(nba, Some(TeamStats::Basketball(_))));
    }

    #[tokio::test]
    async fn test_search_teams() {
        let mut agg = demo_aggregator();
        let found = agg.search_teams("MAN").await.unwrap();
        let names: Vec<_> = found.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, ["Manchester United", "Manchester City"]);
        assert!(agg.search_teams("  ").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_match_details_memoized() {
        let mut agg = demo_aggregator();
        let first = agg.load_match_details(1001).await.unwrap().unwrap();
        let again = agg.load_match_details(1001).await.unwrap().unwrap();
        assert_eq!(first, again);
        assert_eq!(first.attendance, Some(74_000));
    }
}
