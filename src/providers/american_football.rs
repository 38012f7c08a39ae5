//! NFL via the ESPN site API.
//!
//! API: `https://site.api.espn.com/apis/site/v2/sports/football/nfl`
//! Auth: none.
//!
//! ESPN sends ids and scores as strings, and prices as American
//! moneylines, so this normalizer leans on `lenient` and
//! `Odds::decimal_from_american`.

use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::Value;
use tracing::warn;

use super::{decode, decode_rows, lenient, parse_kickoff, SportProvider};
use crate::types::{
    Competition, League, Match, MatchDetail, Odds, Player, PlayerStats, Score, Sport, SportsError,
    StatLine, Team, TeamRef, TeamStats,
};

const SCHEDULED: &str = "STATUS_SCHEDULED";

// ---------------------------------------------------------------------------
// API response types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct TeamsResponse {
    #[serde(default)]
    sports: Vec<EspnSport>,
}

#[derive(Debug, Deserialize)]
struct EspnSport {
    #[serde(default)]
    leagues: Vec<EspnLeague>,
}

#[derive(Debug, Deserialize)]
struct EspnLeague {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    teams: Vec<TeamWrapper>,
}

#[derive(Debug, Deserialize)]
struct TeamWrapper {
    team: EspnTeam,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EspnTeam {
    #[serde(deserialize_with = "lenient::id")]
    id: i64,
    display_name: String,
    #[serde(default)]
    short_display_name: Option<String>,
    #[serde(default)]
    abbreviation: Option<String>,
    #[serde(default)]
    location: Option<String>,
    #[serde(default)]
    logo: Option<String>,
    #[serde(default)]
    logos: Vec<Logo>,
}

#[derive(Debug, Deserialize)]
struct Logo {
    href: String,
}

#[derive(Debug, Deserialize)]
struct ScoreboardResponse {
    #[serde(default)]
    events: Vec<Value>,
}

#[derive(Debug, Deserialize)]
struct EspnEvent {
    #[serde(deserialize_with = "lenient::id")]
    id: i64,
    #[serde(default)]
    date: Option<String>,
    #[serde(default)]
    status: Option<EspnStatus>,
    #[serde(default)]
    competitions: Vec<EspnCompetition>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EspnCompetition {
    #[serde(default)]
    date: Option<String>,
    #[serde(default)]
    status: Option<EspnStatus>,
    #[serde(default)]
    competitors: Vec<Competitor>,
    #[serde(default)]
    venue: Option<Venue>,
    #[serde(default)]
    odds: Vec<EspnOdds>,
    #[serde(default, deserialize_with = "lenient::opt_u32")]
    attendance: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct EspnStatus {
    #[serde(rename = "type")]
    kind: StatusType,
}

#[derive(Debug, Deserialize)]
struct StatusType {
    #[serde(default, deserialize_with = "lenient::or_default")]
    name: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Competitor {
    #[serde(default, deserialize_with = "lenient::or_default")]
    home_away: String,
    #[serde(default, deserialize_with = "lenient::opt_u32")]
    score: Option<u32>,
    team: EspnTeam,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Venue {
    #[serde(default)]
    full_name: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EspnOdds {
    #[serde(default)]
    home_team_odds: Option<Moneyline>,
    #[serde(default)]
    away_team_odds: Option<Moneyline>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Moneyline {
    #[serde(default)]
    money_line: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct SummaryResponse {
    header: SummaryHeader,
}

#[derive(Debug, Deserialize)]
struct SummaryHeader {
    #[serde(deserialize_with = "lenient::id")]
    id: i64,
    #[serde(default)]
    competitions: Vec<EspnCompetition>,
}

/// Statistics endpoints nest the categories under either `results.stats`
/// (teams) or `splits` (athletes).
#[derive(Debug, Default, Deserialize)]
struct StatisticsResponse {
    #[serde(default)]
    results: Option<StatResults>,
    #[serde(default)]
    splits: Option<CategoryList>,
}

#[derive(Debug, Deserialize)]
struct StatResults {
    #[serde(default)]
    stats: Option<CategoryList>,
}

#[derive(Debug, Default, Deserialize)]
struct CategoryList {
    #[serde(default)]
    categories: Vec<Category>,
}

#[derive(Debug, Deserialize)]
struct Category {
    name: String,
    #[serde(default)]
    stats: Vec<Stat>,
}

#[derive(Debug, Deserialize)]
struct Stat {
    name: String,
    #[serde(default)]
    value: Value,
}

#[derive(Debug, Deserialize)]
struct RosterResponse {
    #[serde(default)]
    athletes: Vec<PositionGroup>,
}

#[derive(Debug, Deserialize)]
struct PositionGroup {
    #[serde(default)]
    items: Vec<Athlete>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Athlete {
    #[serde(deserialize_with = "lenient::id")]
    id: i64,
    full_name: String,
    #[serde(default, deserialize_with = "lenient::opt_u32")]
    jersey: Option<u32>,
    #[serde(default)]
    position: Option<AthletePosition>,
    #[serde(default)]
    display_height: Option<String>,
    #[serde(default)]
    display_weight: Option<String>,
    #[serde(default)]
    date_of_birth: Option<String>,
    #[serde(default)]
    birth_place: Option<BirthPlace>,
}

#[derive(Debug, Deserialize)]
struct AthletePosition {
    #[serde(default)]
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct BirthPlace {
    #[serde(default)]
    country: Option<String>,
}

// ---------------------------------------------------------------------------
// Normalization
// ---------------------------------------------------------------------------

impl EspnTeam {
    fn crest(&self) -> Option<String> {
        self.logo
            .clone()
            .or_else(|| self.logos.first().map(|l| l.href.clone()))
    }

    fn to_ref(&self) -> TeamRef {
        TeamRef {
            id: self.id,
            name: self.display_name.clone(),
            short_name: self.short_display_name.clone(),
            abbreviation: self.abbreviation.clone(),
            crest: self.crest(),
        }
    }
}

/// Project one competition into a fixture. `fallback_date` and
/// `fallback_status` come from the enclosing event when the competition
/// omits them.
fn to_match(
    id: i64,
    comp: &EspnCompetition,
    fallback_date: Option<&str>,
    fallback_status: Option<&EspnStatus>,
    competition: &Competition,
) -> Option<Match> {
    let side = |name: &str| comp.competitors.iter().find(|c| c.home_away == name);
    let (Some(home), Some(away)) = (side("home"), side("away")) else {
        warn!(event_id = id, competitors = comp.competitors.len(), "Skipping NFL event without home and away sides");
        return None;
    };

    let raw_date = comp.date.as_deref().or(fallback_date)?;
    let Some(kickoff_time) = parse_kickoff(raw_date) else {
        warn!(event_id = id, date = %raw_date, "Skipping NFL event with unreadable date");
        return None;
    };

    let status = comp
        .status
        .as_ref()
        .or(fallback_status)
        .map(|s| s.kind.name.clone())
        .unwrap_or_default();

    // ESPN reports "0" for games that haven't started.
    let score = if status == SCHEDULED {
        Score::default()
    } else {
        Score { home: home.score, away: away.score }
    };

    let odds = comp
        .odds
        .first()
        .map(|o| {
            let price = |side: &Option<Moneyline>| {
                side.as_ref()
                    .and_then(|m| m.money_line)
                    .and_then(Odds::decimal_from_american)
            };
            Odds::new(price(&o.home_team_odds), None, price(&o.away_team_odds))
        })
        .unwrap_or(Odds::NEUTRAL);

    Some(Match {
        id,
        sport: Sport::Nfl,
        kickoff_time,
        status,
        home_team: home.team.to_ref(),
        away_team: away.team.to_ref(),
        score,
        competition: competition.clone(),
        odds,
        venue: comp.venue.as_ref().and_then(|v| v.full_name.clone()),
        matchday: None,
    })
}

fn flatten_categories(resp: StatisticsResponse) -> Option<StatLine> {
    let list = resp
        .results
        .and_then(|r| r.stats)
        .or(resp.splits)
        .unwrap_or_default();

    let line: StatLine = list
        .categories
        .into_iter()
        .flat_map(|cat| {
            cat.stats
                .into_iter()
                .map(move |s| (format!("{}.{}", cat.name, s.name), s.value))
        })
        .collect();

    (!line.is_empty()).then_some(line)
}

// ---------------------------------------------------------------------------
// Provider
// ---------------------------------------------------------------------------

pub struct AmericanFootballProvider;

impl SportProvider for AmericanFootballProvider {
    fn sport(&self) -> Sport {
        Sport::Nfl
    }

    fn teams_path(&self, _league_id: i64) -> String {
        "/teams".to_string()
    }

    fn normalize_teams(&self, body: Value) -> Result<Vec<Team>, SportsError> {
        let resp: TeamsResponse = decode(Sport::Nfl, "teams", body)?;
        let mut teams = Vec::new();
        for league in resp.sports.into_iter().flat_map(|s| s.leagues) {
            for TeamWrapper { team } in league.teams {
                teams.push(Team {
                    id: team.id,
                    crest: team.crest(),
                    name: team.display_name,
                    short_name: team.short_display_name,
                    abbreviation: team.abbreviation,
                    city: team.location,
                    league: league.name.clone(),
                    ..Team::default()
                });
            }
        }
        Ok(teams)
    }

    fn matches_path(&self, _league_id: i64, date_from: NaiveDate, date_to: NaiveDate) -> String {
        format!(
            "/scoreboard?dates={}-{}&limit=100",
            date_from.format("%Y%m%d"),
            date_to.format("%Y%m%d")
        )
    }

    fn normalize_matches(&self, body: Value, league: &League) -> Result<Vec<Match>, SportsError> {
        let resp: ScoreboardResponse = decode(Sport::Nfl, "matches", body)?;
        let events: Vec<EspnEvent> = decode_rows(Sport::Nfl, "matches", resp.events);
        let competition = Competition { id: league.id, name: league.name.clone(), emblem: None };
        Ok(events
            .iter()
            .filter_map(|event| {
                let comp = event.competitions.first()?;
                to_match(event.id, comp, event.date.as_deref(), event.status.as_ref(), &competition)
            })
            .collect())
    }

    fn match_detail_path(&self, match_id: i64) -> String {
        format!("/summary?event={match_id}")
    }

    fn normalize_match_detail(&self, body: Value) -> Result<Option<MatchDetail>, SportsError> {
        let resp: SummaryResponse = decode(Sport::Nfl, "match detail", body)?;
        let Some(comp) = resp.header.competitions.first() else {
            return Ok(None);
        };
        let league = crate::leagues::resolve(Sport::Nfl, 0);
        let competition = Competition { id: league.id, name: league.name, emblem: None };

        Ok(to_match(resp.header.id, comp, None, None, &competition).map(|fixture| MatchDetail {
            attendance: comp.attendance,
            ..MatchDetail::bare(fixture)
        }))
    }

    fn team_stats_path(&self, team_id: i64, season: i32) -> String {
        format!("/teams/{team_id}/statistics?season={season}")
    }

    fn normalize_team_stats(&self, body: Value, _team_id: i64) -> Result<Option<TeamStats>, SportsError> {
        let resp: StatisticsResponse = decode(Sport::Nfl, "team stats", body)?;
        Ok(flatten_categories(resp).map(TeamStats::Line))
    }

    fn players_path(&self, team_id: i64) -> String {
        format!("/teams/{team_id}/roster")
    }

    fn normalize_players(&self, body: Value) -> Result<Vec<Player>, SportsError> {
        let resp: RosterResponse = decode(Sport::Nfl, "players", body)?;
        Ok(resp
            .athletes
            .into_iter()
            .flat_map(|group| group.items)
            .map(|a| Player {
                id: a.id,
                name: a.full_name,
                position: a.position.and_then(|p| p.name),
                nationality: a.birth_place.and_then(|b| b.country),
                date_of_birth: a.date_of_birth,
                shirt_number: a.jersey,
                height: a.display_height,
                weight: a.display_weight,
                team: None,
            })
            .collect())
    }

    fn player_stats_path(&self, player_id: i64, season: i32) -> String {
        format!("/athletes/{player_id}/statistics?season={season}")
    }

    fn normalize_player_stats(
        &self,
        body: Value,
        player_id: i64,
        season: i32,
    ) -> Result<Option<PlayerStats>, SportsError> {
        let resp: StatisticsResponse = decode(Sport::Nfl, "player stats", body)?;
        Ok(flatten_categories(resp).map(|values| PlayerStats { player_id, season, values }))
    }
}
