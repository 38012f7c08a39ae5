//! Football (soccer) via football-data.org v4.
//!
//! API: `https://api.football-data.org/v4`
//! Auth: `X-Auth-Token` header. Free tier: 10 req/min.
//!
//! Team stats are not read from the API; they are derived by replaying a
//! team's season fixtures (see `crate::stats`).

use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::Value;
use tracing::warn;

use super::{decode, decode_rows, parse_kickoff, scalar_stat_line, SportProvider};
use crate::stats::derive_football_stats;
use crate::types::{
    Competition, League, LineupPlayer, Match, MatchDetail, Odds, Player, PlayerStats, Score, Sport,
    SportsError, Team, TeamRef, TeamStats,
};

// ---------------------------------------------------------------------------
// API response types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct CompetitionsResponse {
    #[serde(default)]
    competitions: Vec<FdCompetition>,
}

#[derive(Debug, Deserialize)]
struct FdCompetition {
    id: i64,
    name: String,
    #[serde(default)]
    area: Option<FdArea>,
    #[serde(default)]
    emblem: Option<String>,
}

#[derive(Debug, Deserialize)]
struct FdArea {
    #[serde(default)]
    name: String,
}

#[derive(Debug, Deserialize)]
struct TeamsResponse {
    #[serde(default)]
    teams: Vec<FdTeam>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FdTeam {
    id: i64,
    name: String,
    #[serde(default)]
    short_name: Option<String>,
    #[serde(default)]
    tla: Option<String>,
    #[serde(default)]
    crest: Option<String>,
    #[serde(default)]
    address: Option<String>,
    #[serde(default)]
    website: Option<String>,
    #[serde(default)]
    founded: Option<u32>,
    #[serde(default)]
    venue: Option<String>,
    #[serde(default)]
    coach: Option<FdCoach>,
    #[serde(default)]
    club_colors: Option<String>,
    #[serde(default, deserialize_with = "super::lenient::or_default")]
    squad: Vec<FdPlayer>,
}

#[derive(Debug, Deserialize)]
struct FdCoach {
    #[serde(default)]
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct MatchesResponse {
    #[serde(default)]
    competition: Option<FdCompetition>,
    #[serde(default)]
    matches: Option<Vec<Value>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FdMatch {
    id: i64,
    utc_date: String,
    #[serde(default, deserialize_with = "super::lenient::or_default")]
    status: String,
    #[serde(default)]
    matchday: Option<u32>,
    #[serde(default)]
    stage: Option<String>,
    #[serde(default)]
    venue: Option<String>,
    #[serde(default)]
    attendance: Option<u32>,
    home_team: FdSide,
    away_team: FdSide,
    #[serde(default, deserialize_with = "super::lenient::or_default")]
    score: FdScore,
    #[serde(default)]
    competition: Option<FdCompetition>,
    #[serde(default)]
    odds: Option<FdOdds>,
}

/// Knockout fixtures can list a side before it is decided: every field
/// may be null.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FdSide {
    #[serde(default)]
    id: Option<i64>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    short_name: Option<String>,
    #[serde(default)]
    tla: Option<String>,
    #[serde(default)]
    crest: Option<String>,
    #[serde(default)]
    coach: Option<FdCoach>,
    #[serde(default, deserialize_with = "super::lenient::or_default")]
    lineup: Vec<FdLineupPlayer>,
}

#[derive(Debug, Deserialize)]
struct FdLineupPlayer {
    id: i64,
    name: String,
    #[serde(default)]
    position: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FdScore {
    #[serde(default, deserialize_with = "super::lenient::or_default")]
    full_time: FdScoreLine,
}

#[derive(Debug, Default, Deserialize)]
struct FdScoreLine {
    #[serde(default)]
    home: Option<u32>,
    #[serde(default)]
    away: Option<u32>,
}

/// Only populated with the odds add-on; otherwise `{ "msg": "..." }`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FdOdds {
    #[serde(default)]
    home_win: Option<f64>,
    #[serde(default)]
    draw: Option<f64>,
    #[serde(default)]
    away_win: Option<f64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FdPlayer {
    id: i64,
    name: String,
    #[serde(default)]
    position: Option<String>,
    #[serde(default)]
    date_of_birth: Option<String>,
    #[serde(default)]
    nationality: Option<String>,
    #[serde(default)]
    shirt_number: Option<u32>,
}

// ---------------------------------------------------------------------------
// Normalization
// ---------------------------------------------------------------------------

impl FdSide {
    fn to_ref(&self) -> TeamRef {
        TeamRef {
            id: self.id.unwrap_or_default(),
            name: self.name.clone().unwrap_or_else(|| "TBD".to_string()),
            short_name: self.short_name.clone(),
            abbreviation: self.tla.clone(),
            crest: self.crest.clone(),
        }
    }

    fn lineup(&self) -> Vec<LineupPlayer> {
        self.lineup
            .iter()
            .map(|p| LineupPlayer { id: p.id, name: p.name.clone(), position: p.position.clone() })
            .collect()
    }
}

impl FdCompetition {
    fn to_competition(&self) -> Competition {
        Competition { id: self.id, name: self.name.clone(), emblem: self.emblem.clone() }
    }
}

/// Project one upstream match; `None` when the kickoff is unreadable.
fn to_match(m: &FdMatch, fallback: &Competition) -> Option<Match> {
    let Some(kickoff_time) = parse_kickoff(&m.utc_date) else {
        warn!(match_id = m.id, utc_date = %m.utc_date, "Skipping football match with unreadable date");
        return None;
    };

    let odds = m
        .odds
        .as_ref()
        .map(|o| Odds::new(o.home_win, o.draw, o.away_win))
        .unwrap_or_default();

    Some(Match {
        id: m.id,
        sport: Sport::Football,
        kickoff_time,
        status: m.status.clone(),
        home_team: m.home_team.to_ref(),
        away_team: m.away_team.to_ref(),
        score: Score { home: m.score.full_time.home, away: m.score.full_time.away },
        competition: m
            .competition
            .as_ref()
            .map(FdCompetition::to_competition)
            .unwrap_or_else(|| fallback.clone()),
        odds,
        venue: m.venue.clone(),
        matchday: m.matchday,
    })
}

fn unknown_competition() -> Competition {
    Competition { id: 0, name: crate::leagues::UNKNOWN_LEAGUE.to_string(), emblem: None }
}

// ---------------------------------------------------------------------------
// Provider
// ---------------------------------------------------------------------------

pub struct FootballProvider;

impl SportProvider for FootballProvider {
    fn sport(&self) -> Sport {
        Sport::Football
    }

    fn auth_header(&self) -> Option<&'static str> {
        Some("X-Auth-Token")
    }

    fn requires_api_key(&self) -> bool {
        true
    }

    fn leagues_path(&self) -> Option<String> {
        Some("/competitions".to_string())
    }

    fn normalize_leagues(&self, body: Value) -> Result<Vec<League>, SportsError> {
        let resp: CompetitionsResponse = decode(Sport::Football, "leagues", body)?;
        Ok(resp
            .competitions
            .into_iter()
            .map(|c| League {
                id: c.id,
                name: c.name,
                country: c.area.map(|a| a.name).unwrap_or_default(),
            })
            .collect())
    }

    fn teams_path(&self, league_id: i64) -> String {
        format!("/competitions/{league_id}/teams")
    }

    fn normalize_teams(&self, body: Value) -> Result<Vec<Team>, SportsError> {
        let resp: TeamsResponse = decode(Sport::Football, "teams", body)?;
        Ok(resp
            .teams
            .into_iter()
            .map(|t| Team {
                id: t.id,
                name: t.name,
                short_name: t.short_name,
                abbreviation: t.tla,
                crest: t.crest,
                venue: t.venue,
                coach: t.coach.and_then(|c| c.name),
                founded: t.founded,
                website: t.website,
                address: t.address,
                club_colors: t.club_colors,
                ..Team::default()
            })
            .collect())
    }

    fn matches_path(&self, league_id: i64, date_from: NaiveDate, date_to: NaiveDate) -> String {
        format!("/competitions/{league_id}/matches?dateFrom={date_from}&dateTo={date_to}")
    }

    fn normalize_matches(&self, body: Value, league: &League) -> Result<Vec<Match>, SportsError> {
        let resp: MatchesResponse = decode(Sport::Football, "matches", body)?;
        let fallback = resp
            .competition
            .as_ref()
            .map(FdCompetition::to_competition)
            .unwrap_or_else(|| Competition { id: league.id, name: league.name.clone(), emblem: None });

        let rows: Vec<FdMatch> = decode_rows(Sport::Football, "matches", resp.matches.unwrap_or_default());
        Ok(rows.iter().filter_map(|m| to_match(m, &fallback)).collect())
    }

    fn match_detail_path(&self, match_id: i64) -> String {
        format!("/matches/{match_id}")
    }

    fn normalize_match_detail(&self, body: Value) -> Result<Option<MatchDetail>, SportsError> {
        let m: FdMatch = decode(Sport::Football, "match detail", body)?;
        let Some(fixture) = to_match(&m, &unknown_competition()) else {
            return Ok(None);
        };
        Ok(Some(MatchDetail {
            stage: m.stage.clone(),
            attendance: m.attendance,
            home_coach: m.home_team.coach.as_ref().and_then(|c| c.name.clone()),
            away_coach: m.away_team.coach.as_ref().and_then(|c| c.name.clone()),
            home_lineup: m.home_team.lineup(),
            away_lineup: m.away_team.lineup(),
            ..MatchDetail::bare(fixture)
        }))
    }

    fn team_stats_path(&self, team_id: i64, season: i32) -> String {
        format!("/teams/{team_id}/matches?season={season}")
    }

    fn normalize_team_stats(&self, body: Value, team_id: i64) -> Result<Option<TeamStats>, SportsError> {
        let resp: MatchesResponse = decode(Sport::Football, "team stats", body)?;
        let fallback = unknown_competition();
        let rows: Vec<FdMatch> = decode_rows(Sport::Football, "team stats", resp.matches.unwrap_or_default());
        let matches: Vec<Match> = rows.iter().filter_map(|m| to_match(m, &fallback)).collect();

        if matches.is_empty() {
            return Ok(None);
        }
        Ok(Some(TeamStats::Football(derive_football_stats(team_id, &matches))))
    }

    fn players_path(&self, team_id: i64) -> String {
        format!("/teams/{team_id}")
    }

    fn normalize_players(&self, body: Value) -> Result<Vec<Player>, SportsError> {
        let team: FdTeam = decode(Sport::Football, "players", body)?;
        let team_name = team.name.clone();
        Ok(team
            .squad
            .into_iter()
            .map(|p| Player {
                id: p.id,
                name: p.name,
                position: p.position,
                nationality: p.nationality,
                date_of_birth: p.date_of_birth,
                shirt_number: p.shirt_number,
                team: Some(team_name.clone()),
                ..Player::default()
            })
            .collect())
    }

    fn player_stats_path(&self, player_id: i64, _season: i32) -> String {
        format!("/persons/{player_id}")
    }

    fn normalize_player_stats(
        &self,
        body: Value,
        player_id: i64,
        season: i32,
    ) -> Result<Option<PlayerStats>, SportsError> {
        let Some(object) = body.as_object() else {
            return Err(SportsError::Shape {
                sport: Sport::Football,
                message: "person response is not an object".to_string(),
            });
        };
        Ok(Some(PlayerStats { player_id, season, values: scalar_stat_line(object) }))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
