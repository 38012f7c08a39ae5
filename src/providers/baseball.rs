//! MLB via the public StatsAPI.
//!
//! API: `https://statsapi.mlb.com/api/v1`
//! Auth: none.

use chrono::NaiveDate;
use serde_json::Value;

use super::{statsapi, SportProvider};
use crate::types::{League, Match, MatchDetail, Player, PlayerStats, Sport, SportsError, Team, TeamStats};

/// `sportId` of Major League Baseball in StatsAPI.
const MLB_SPORT_ID: u32 = 1;

pub struct BaseballProvider;

impl SportProvider for BaseballProvider {
    fn sport(&self) -> Sport {
        Sport::Mlb
    }

    fn teams_path(&self, league_id: i64) -> String {
        format!("/teams?sportId={MLB_SPORT_ID}&leagueIds={league_id}")
    }

    fn normalize_teams(&self, body: Value) -> Result<Vec<Team>, SportsError> {
        statsapi::teams(Sport::Mlb, body)
    }

    fn matches_path(&self, league_id: i64, date_from: NaiveDate, date_to: NaiveDate) -> String {
        format!(
            "/schedule?sportId={MLB_SPORT_ID}&leagueId={league_id}&startDate={date_from}&endDate={date_to}"
        )
    }

    fn normalize_matches(&self, body: Value, league: &League) -> Result<Vec<Match>, SportsError> {
        statsapi::schedule(Sport::Mlb, body, league)
    }

    fn match_detail_path(&self, match_id: i64) -> String {
        format!("/schedule?sportId={MLB_SPORT_ID}&gamePk={match_id}")
    }

    fn normalize_match_detail(&self, body: Value) -> Result<Option<MatchDetail>, SportsError> {
        // The schedule response doesn't say which league the game belongs to.
        let league = crate::leagues::resolve(Sport::Mlb, 0);
        let games = statsapi::schedule(Sport::Mlb, body, &league)?;
        Ok(games.into_iter().next().map(MatchDetail::bare))
    }

    fn team_stats_path(&self, team_id: i64, season: i32) -> String {
        format!("/teams/{team_id}/stats?stats=season&group=hitting&season={season}")
    }

    fn normalize_team_stats(&self, body: Value, _team_id: i64) -> Result<Option<TeamStats>, SportsError> {
        Ok(statsapi::first_stat_line(Sport::Mlb, body)?.map(TeamStats::Line))
    }

    fn players_path(&self, team_id: i64) -> String {
        format!("/teams/{team_id}/roster")
    }

    fn normalize_players(&self, body: Value) -> Result<Vec<Player>, SportsError> {
        statsapi::roster(Sport::Mlb, body)
    }

    fn player_stats_path(&self, player_id: i64, season: i32) -> String {
        format!("/people/{player_id}/stats?stats=season&group=hitting&season={season}")
    }

    fn normalize_player_stats(
        &self,
        body: Value,
        player_id: i64,
        season: i32,
    ) -> Result<Option<PlayerStats>, SportsError> {
        Ok(statsapi::first_stat_line(Sport::Mlb, body)?
            .map(|values| PlayerStats { player_id, season, values }))
    }
}
