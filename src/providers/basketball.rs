//! NBA via balldontlie v1.
//!
//! API: `https://api.balldontlie.io/v1`
//! Auth: `Authorization: {key}` header (sent when configured).

use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::Value;
use tracing::warn;

use super::{decode, decode_rows, lenient, parse_kickoff, scalar_stat_line, SportProvider};
use crate::types::{
    Competition, League, Match, MatchDetail, Odds, Player, PlayerStats, Score, Sport, SportsError,
    Team, TeamRef, TeamStats,
};

// ---------------------------------------------------------------------------
// API response types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct ListResponse<T> {
    #[serde(default = "Vec::new")]
    data: Vec<T>,
}

#[derive(Debug, Deserialize)]
struct SingleResponse<T> {
    data: T,
}

#[derive(Debug, Deserialize)]
struct BdlTeam {
    id: i64,
    full_name: String,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    abbreviation: Option<String>,
    #[serde(default)]
    city: Option<String>,
    #[serde(default)]
    conference: Option<String>,
    #[serde(default)]
    division: Option<String>,
}

#[derive(Debug, Deserialize)]
struct BdlGame {
    id: i64,
    date: String,
    /// Full tip-off timestamp on newer responses; `date` is day-only.
    #[serde(default)]
    datetime: Option<String>,
    #[serde(default, deserialize_with = "lenient::or_default")]
    status: String,
    #[serde(default, deserialize_with = "lenient::or_default")]
    period: u32,
    home_team: BdlTeam,
    visitor_team: BdlTeam,
    #[serde(default)]
    home_team_score: Option<u32>,
    #[serde(default)]
    visitor_team_score: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct BdlPlayer {
    id: i64,
    first_name: String,
    last_name: String,
    #[serde(default)]
    position: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_u32")]
    jersey_number: Option<u32>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    height: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    weight: Option<String>,
    #[serde(default)]
    country: Option<String>,
    #[serde(default)]
    team: Option<BdlTeam>,
}

// ---------------------------------------------------------------------------
// Normalization
// ---------------------------------------------------------------------------

impl BdlTeam {
    fn to_ref(&self) -> TeamRef {
        TeamRef {
            id: self.id,
            name: self.full_name.clone(),
            short_name: self.name.clone(),
            abbreviation: self.abbreviation.clone(),
            crest: None,
        }
    }
}

fn to_match(game: &BdlGame, competition: &Competition) -> Option<Match> {
    let raw_date = game.datetime.as_deref().unwrap_or(&game.date);
    let Some(kickoff_time) = parse_kickoff(raw_date) else {
        warn!(game_id = game.id, date = %raw_date, "Skipping NBA game with unreadable date");
        return None;
    };

    // Scores read 0 before tip-off.
    let score = if game.period == 0 {
        Score::default()
    } else {
        Score { home: game.home_team_score, away: game.visitor_team_score }
    };

    Some(Match {
        id: game.id,
        sport: Sport::Nba,
        kickoff_time,
        status: game.status.clone(),
        home_team: game.home_team.to_ref(),
        away_team: game.visitor_team.to_ref(),
        score,
        competition: competition.clone(),
        odds: Odds::NEUTRAL,
        venue: None,
        matchday: None,
    })
}

fn nba_competition() -> Competition {
    let league = crate::leagues::resolve(Sport::Nba, 0);
    Competition { id: league.id, name: league.name, emblem: None }
}

fn first_stat_object(body: Value) -> Result<Option<serde_json::Map<String, Value>>, SportsError> {
    let resp: ListResponse<Value> = decode(Sport::Nba, "stats", body)?;
    Ok(resp.data.into_iter().find_map(|row| match row {
        Value::Object(map) => Some(map),
        _ => None,
    }))
}

// ---------------------------------------------------------------------------
// Provider
// ---------------------------------------------------------------------------

pub struct BasketballProvider;

impl SportProvider for BasketballProvider {
    fn sport(&self) -> Sport {
        Sport::Nba
    }

    fn auth_header(&self) -> Option<&'static str> {
        Some("Authorization")
    }

    fn teams_path(&self, _league_id: i64) -> String {
        "/teams".to_string()
    }

    fn normalize_teams(&self, body: Value) -> Result<Vec<Team>, SportsError> {
        let resp: ListResponse<BdlTeam> = decode(Sport::Nba, "teams", body)?;
        Ok(resp
            .data
            .into_iter()
            .map(|t| Team {
                id: t.id,
                name: t.full_name,
                short_name: t.name,
                abbreviation: t.abbreviation,
                city: t.city,
                conference: t.conference,
                division: t.division,
                ..Team::default()
            })
            .collect())
    }

    fn matches_path(&self, _league_id: i64, date_from: NaiveDate, date_to: NaiveDate) -> String {
        format!("/games?start_date={date_from}&end_date={date_to}&per_page=100")
    }

    fn normalize_matches(&self, body: Value, league: &League) -> Result<Vec<Match>, SportsError> {
        let resp: ListResponse<Value> = decode(Sport::Nba, "matches", body)?;
        let games: Vec<BdlGame> = decode_rows(Sport::Nba, "matches", resp.data);
        let competition = Competition { id: league.id, name: league.name.clone(), emblem: None };
        Ok(games.iter().filter_map(|g| to_match(g, &competition)).collect())
    }

    fn match_detail_path(&self, match_id: i64) -> String {
        format!("/games/{match_id}")
    }

    fn normalize_match_detail(&self, body: Value) -> Result<Option<MatchDetail>, SportsError> {
        let resp: SingleResponse<BdlGame> = decode(Sport::Nba, "match detail", body)?;
        Ok(to_match(&resp.data, &nba_competition()).map(MatchDetail::bare))
    }

    fn team_stats_path(&self, team_id: i64, season: i32) -> String {
        format!("/teams/{team_id}/stats?{}={season}", urlencoding::encode("seasons[]"))
    }

    fn normalize_team_stats(&self, body: Value, _team_id: i64) -> Result<Option<TeamStats>, SportsError> {
        Ok(first_stat_object(body)?.map(|obj| TeamStats::Line(scalar_stat_line(&obj))))
    }

    fn players_path(&self, team_id: i64) -> String {
        format!("/players?{}={team_id}&per_page=100", urlencoding::encode("team_ids[]"))
    }

    fn normalize_players(&self, body: Value) -> Result<Vec<Player>, SportsError> {
        let resp: ListResponse<BdlPlayer> = decode(Sport::Nba, "players", body)?;
        Ok(resp
            .data
            .into_iter()
            .map(|p| Player {
                id: p.id,
                name: format!("{} {}", p.first_name, p.last_name),
                position: p.position.filter(|s| !s.is_empty()),
                nationality: p.country,
                shirt_number: p.jersey_number,
                height: p.height,
                weight: p.weight,
                team: p.team.map(|t| t.full_name),
                ..Player::default()
            })
            .collect())
    }

    fn player_stats_path(&self, player_id: i64, season: i32) -> String {
        format!(
            "/season_averages?season={season}&{}={player_id}",
            urlencoding::encode("player_ids[]")
        )
    }

    fn normalize_player_stats(
        &self,
        body: Value,
        player_id: i64,
        season: i32,
    ) -> Result<Option<PlayerStats>, SportsError> {
        Ok(first_stat_object(body)?.map(|obj| PlayerStats {
            player_id,
            season,
            values: scalar_stat_line(&obj),
        }))
    }
}
