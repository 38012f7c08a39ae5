//! Response shapes shared by the MLB and NHL StatsAPI families.
//!
//! Both leagues grew out of the same vendor platform, so teams, schedules,
//! rosters and stat splits have identical JSON. The sport-specific
//! providers own the URLs; this module owns the projection.

use serde::Deserialize;
use serde_json::Value;
use tracing::warn;

use super::{decode, decode_rows, parse_kickoff};
use crate::types::{
    Competition, League, Match, Odds, Player, Score, Sport, SportsError, StatLine, Team, TeamRef,
};

#[derive(Debug, Deserialize)]
pub(super) struct TeamsResponse {
    #[serde(default)]
    teams: Vec<ApiTeam>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiTeam {
    id: i64,
    name: String,
    #[serde(default)]
    team_name: Option<String>,
    #[serde(default)]
    abbreviation: Option<String>,
    #[serde(default)]
    location_name: Option<String>,
    #[serde(default)]
    first_year_of_play: Option<String>,
    #[serde(default)]
    league: Option<Named>,
    #[serde(default)]
    division: Option<Named>,
    #[serde(default)]
    conference: Option<Named>,
    #[serde(default)]
    venue: Option<Named>,
}

#[derive(Debug, Deserialize)]
struct Named {
    #[serde(default)]
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(super) struct ScheduleResponse {
    #[serde(default)]
    dates: Vec<ScheduleDate>,
}

#[derive(Debug, Deserialize)]
struct ScheduleDate {
    #[serde(default)]
    games: Vec<Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ScheduleGame {
    game_pk: i64,
    game_date: String,
    #[serde(default, deserialize_with = "super::lenient::or_default")]
    status: GameStatus,
    teams: GameTeams,
    #[serde(default)]
    venue: Option<Named>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GameStatus {
    #[serde(default, deserialize_with = "super::lenient::or_default")]
    detailed_state: String,
}

#[derive(Debug, Deserialize)]
struct GameTeams {
    home: GameSide,
    away: GameSide,
}

#[derive(Debug, Deserialize)]
struct GameSide {
    team: SideTeam,
    #[serde(default)]
    score: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct SideTeam {
    id: i64,
    name: String,
}

#[derive(Debug, Deserialize)]
pub(super) struct RosterResponse {
    #[serde(default)]
    roster: Vec<RosterEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RosterEntry {
    person: Person,
    #[serde(default, deserialize_with = "super::lenient::opt_u32")]
    jersey_number: Option<u32>,
    #[serde(default)]
    position: Option<Named>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Person {
    id: i64,
    full_name: String,
}

#[derive(Debug, Deserialize)]
pub(super) struct StatsResponse {
    #[serde(default)]
    stats: Vec<StatGroup>,
}

#[derive(Debug, Deserialize)]
struct StatGroup {
    #[serde(default)]
    splits: Vec<Split>,
}

#[derive(Debug, Deserialize)]
struct Split {
    #[serde(default)]
    stat: serde_json::Map<String, Value>,
}

pub(super) fn teams(sport: Sport, body: Value) -> Result<Vec<Team>, SportsError> {
    let resp: TeamsResponse = decode(sport, "teams", body)?;
    Ok(resp
        .teams
        .into_iter()
        .map(|t| Team {
            id: t.id,
            name: t.name,
            short_name: t.team_name,
            abbreviation: t.abbreviation,
            city: t.location_name,
            founded: t.first_year_of_play.and_then(|y| y.parse().ok()),
            league: t.league.and_then(|n| n.name),
            division: t.division.and_then(|n| n.name),
            conference: t.conference.and_then(|n| n.name),
            venue: t.venue.and_then(|n| n.name),
            ..Team::default()
        })
        .collect())
}

/// Flatten every game of every date in the schedule.
pub(super) fn schedule(sport: Sport, body: Value, league: &League) -> Result<Vec<Match>, SportsError> {
    let resp: ScheduleResponse = decode(sport, "schedule", body)?;
    let competition = Competition { id: league.id, name: league.name.clone(), emblem: None };

    let rows: Vec<Value> = resp.dates.into_iter().flat_map(|d| d.games).collect();
    let parsed: Vec<ScheduleGame> = decode_rows(sport, "schedule", rows);

    let mut games = Vec::new();
    for game in &parsed {
        let Some(kickoff_time) = parse_kickoff(&game.game_date) else {
            warn!(%sport, game_pk = game.game_pk, date = %game.game_date, "Skipping game with unreadable date");
            continue;
        };
        games.push(Match {
            id: game.game_pk,
            sport,
            kickoff_time,
            status: game.status.detailed_state.clone(),
            home_team: side_ref(&game.teams.home),
            away_team: side_ref(&game.teams.away),
            score: Score { home: game.teams.home.score, away: game.teams.away.score },
            competition: competition.clone(),
            odds: Odds::NEUTRAL,
            venue: game.venue.as_ref().and_then(|v| v.name.clone()),
            matchday: None,
        });
    }
    Ok(games)
}

fn side_ref(side: &GameSide) -> TeamRef {
    TeamRef {
        id: side.team.id,
        name: side.team.name.clone(),
        ..TeamRef::default()
    }
}

pub(super) fn roster(sport: Sport, body: Value) -> Result<Vec<Player>, SportsError> {
    let resp: RosterResponse = decode(sport, "players", body)?;
    Ok(resp
        .roster
        .into_iter()
        .map(|entry| Player {
            id: entry.person.id,
            name: entry.person.full_name,
            position: entry.position.and_then(|p| p.name),
            shirt_number: entry.jersey_number,
            ..Player::default()
        })
        .collect())
}

/// The first split of the first stat group, which is where a
/// single-season query lands.
pub(super) fn first_stat_line(sport: Sport, body: Value) -> Result<Option<StatLine>, SportsError> {
    let resp: StatsResponse = decode(sport, "stats", body)?;
    Ok(resp
        .stats
        .into_iter()
        .flat_map(|g| g.splits)
        .next()
        .map(|split| super::scalar_stat_line(&split.stat)))
}
