//! NHL via the StatsAPI.
//!
//! API: `https://statsapi.web.nhl.com/api/v1`
//! Auth: none. Seasons are addressed as `20232024`.

use chrono::NaiveDate;
use serde_json::Value;

use super::{statsapi, SportProvider};
use crate::types::{League, Match, MatchDetail, Player, PlayerStats, Sport, SportsError, Team, TeamStats};

/// `2023` -> `"20232024"`.
fn season_code(season: i32) -> String {
    format!("{season}{}", season + 1)
}

pub struct HockeyProvider;

impl SportProvider for HockeyProvider {
    fn sport(&self) -> Sport {
        Sport::Nhl
    }

    fn teams_path(&self, _league_id: i64) -> String {
        "/teams".to_string()
    }

    fn normalize_teams(&self, body: Value) -> Result<Vec<Team>, SportsError> {
        statsapi::teams(Sport::Nhl, body)
    }

    fn matches_path(&self, _league_id: i64, date_from: NaiveDate, date_to: NaiveDate) -> String {
        format!("/schedule?startDate={date_from}&endDate={date_to}")
    }

    fn normalize_matches(&self, body: Value, league: &League) -> Result<Vec<Match>, SportsError> {
        statsapi::schedule(Sport::Nhl, body, league)
    }

    fn match_detail_path(&self, match_id: i64) -> String {
        format!("/schedule?gamePk={match_id}")
    }

    fn normalize_match_detail(&self, body: Value) -> Result<Option<MatchDetail>, SportsError> {
        let league = crate::leagues::resolve(Sport::Nhl, 0);
        let games = statsapi::schedule(Sport::Nhl, body, &league)?;
        Ok(games.into_iter().next().map(MatchDetail::bare))
    }

    fn team_stats_path(&self, team_id: i64, season: i32) -> String {
        format!("/teams/{team_id}/stats?season={}", season_code(season))
    }

    fn normalize_team_stats(&self, body: Value, _team_id: i64) -> Result<Option<TeamStats>, SportsError> {
        Ok(statsapi::first_stat_line(Sport::Nhl, body)?.map(TeamStats::Line))
    }

    fn players_path(&self, team_id: i64) -> String {
        format!("/teams/{team_id}/roster")
    }

    fn normalize_players(&self, body: Value) -> Result<Vec<Player>, SportsError> {
        statsapi::roster(Sport::Nhl, body)
    }

    fn player_stats_path(&self, player_id: i64, season: i32) -> String {
        format!("/people/{player_id}/stats?stats=statsSingleSeason&season={}", season_code(season))
    }

    fn normalize_player_stats(
        &self,
        body: Value,
        player_id: i64,
        season: i32,
    ) -> Result<Option<PlayerStats>, SportsError> {
        Ok(statsapi::first_stat_line(Sport::Nhl, body)?
            .map(|values| PlayerStats { player_id, season, values }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_season_code() {
        assert_eq!(season_code(2023), "20232024");
        assert_eq!(HockeyProvider.team_stats_path(10, 2023), "/teams/10/stats?season=20232024");
    }

    #[test]
    fn test_team_stats_line() {
        let body = json!({"stats": [{"splits": [{"stat": {"gamesPlayed": 82, "wins": 46, "pts": 101}}]}]});
        let Some(TeamStats::Line(line)) = HockeyProvider.normalize_team_stats(body, 10).unwrap() else {
            panic!("expected stat line");
        };
        assert_eq!(line["wins"], 46);
    }

    #[test]
    fn test_normalize_teams_with_conference() {
        let body = json!({"teams": [{"id": 10, "name": "Toronto Maple Leafs", "teamName": "Maple Leafs",
            "abbreviation": "TOR", "conference": {"name": "Eastern"}, "division": {"name": "Atlantic"}}]});
        let teams = HockeyProvider.normalize_teams(body).unwrap();
        assert_eq!(teams[0].conference.as_deref(), Some("Eastern"));
        assert_eq!(teams[0].abbreviation.as_deref(), Some("TOR"));
    }
}
