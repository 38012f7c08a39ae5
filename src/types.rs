//! Shared types for SportsDesk.
//!
//! These are the canonical records every provider normalizes into.
//! Downstream code (cache, aggregator, view-models) never sees an
//! upstream schema, only these shapes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

// ---------------------------------------------------------------------------
// Sport
// ---------------------------------------------------------------------------

/// A supported sport. Each maps to exactly one upstream provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sport {
    Football,
    Nba,
    Mlb,
    Nfl,
    Nhl,
}

impl Sport {
    /// All supported sports (useful for iteration).
    pub const ALL: &'static [Sport] = &[
        Sport::Football,
        Sport::Nba,
        Sport::Mlb,
        Sport::Nfl,
        Sport::Nhl,
    ];

    /// Stable lowercase key used in cache keys and storage keys.
    pub fn key(&self) -> &'static str {
        match self {
            Sport::Football => "football",
            Sport::Nba => "nba",
            Sport::Mlb => "mlb",
            Sport::Nfl => "nfl",
            Sport::Nhl => "nhl",
        }
    }
}

impl fmt::Display for Sport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Parse a sport name (case-insensitive, common aliases accepted).
///
/// Anything else is a configuration error, not a transient fault.
impl std::str::FromStr for Sport {
    type Err = SportsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "football" | "soccer" => Ok(Sport::Football),
            "nba" | "basketball" => Ok(Sport::Nba),
            "mlb" | "baseball" => Ok(Sport::Mlb),
            "nfl" | "american_football" => Ok(Sport::Nfl),
            "nhl" | "hockey" | "ice_hockey" => Ok(Sport::Nhl),
            _ => Err(SportsError::UnsupportedSport(s.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// League & Team
// ---------------------------------------------------------------------------

/// A league or competition. Identity is `(sport, id)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct League {
    pub id: i64,
    pub name: String,
    pub country: String,
}

/// A team. The attribute set is a superset across sports; anything a
/// provider doesn't supply stays `None`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Team {
    pub id: i64,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub short_name: Option<String>,
    /// Three-letter code (`tla` for football, `abbreviation` elsewhere).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub abbreviation: Option<String>,
    /// Crest or logo URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub crest: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub venue: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coach: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub founded: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conference: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub division: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub league: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub club_colors: Option<String>,
}

impl Team {
    /// Case-insensitive match of `needle` (already lowercased) against the
    /// team's name or short name.
    pub fn name_matches(&self, needle: &str) -> bool {
        self.name.to_lowercase().contains(needle)
            || self
                .short_name
                .as_deref()
                .is_some_and(|s| s.to_lowercase().contains(needle))
    }
}

// ---------------------------------------------------------------------------
// Match
// ---------------------------------------------------------------------------

/// The side of a fixture as embedded in a match record.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamRef {
    pub id: i64,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub short_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub abbreviation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub crest: Option<String>,
}

/// Full-time score; `None` until the match has one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Score {
    pub home: Option<u32>,
    pub away: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Competition {
    pub id: i64,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emblem: Option<String>,
}

/// Lowest decimal price we accept. Anything below (or missing, or NaN)
/// becomes this neutral value.
pub const ODDS_FLOOR: f64 = 1.0;

/// Decimal 1X2 odds. Always finite and `>= ODDS_FLOOR`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Odds {
    pub home: f64,
    pub draw: f64,
    pub away: f64,
}

impl Odds {
    pub const NEUTRAL: Odds = Odds {
        home: ODDS_FLOOR,
        draw: ODDS_FLOOR,
        away: ODDS_FLOOR,
    };

    /// Build odds from optional upstream prices, coercing each one.
    pub fn new(home: Option<f64>, draw: Option<f64>, away: Option<f64>) -> Self {
        Self {
            home: Self::coerce(home),
            draw: Self::coerce(draw),
            away: Self::coerce(away),
        }
    }

    /// Re-apply the floor to every price.
    pub fn sanitized(self) -> Self {
        Self::new(Some(self.home), Some(self.draw), Some(self.away))
    }

    pub fn is_neutral(&self) -> bool {
        *self == Self::NEUTRAL
    }

    /// Convert an American moneyline (+150 / -200) to a decimal price.
    pub fn decimal_from_american(moneyline: f64) -> Option<f64> {
        if !moneyline.is_finite() || moneyline == 0.0 {
            return None;
        }
        if moneyline > 0.0 {
            Some(1.0 + moneyline / 100.0)
        } else {
            Some(1.0 + 100.0 / moneyline.abs())
        }
    }

    fn coerce(price: Option<f64>) -> f64 {
        match price {
            Some(p) if p.is_finite() && p >= ODDS_FLOOR => p,
            _ => ODDS_FLOOR,
        }
    }
}

impl Default for Odds {
    fn default() -> Self {
        Self::NEUTRAL
    }
}

/// Canonical fixture, identical in shape for every sport.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Match {
    pub id: i64,
    pub sport: Sport,
    pub kickoff_time: DateTime<Utc>,
    /// Provider status string, passed through (`SCHEDULED`, `FINISHED`, `Final`, ...).
    pub status: String,
    pub home_team: TeamRef,
    pub away_team: TeamRef,
    pub score: Score,
    pub competition: Competition,
    pub odds: Odds,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub venue: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub matchday: Option<u32>,
}

impl Match {
    pub fn is_finished(&self) -> bool {
        self.status == "FINISHED"
    }

    /// Whether `team_id` plays in this fixture.
    pub fn involves(&self, team_id: i64) -> bool {
        self.home_team.id == team_id || self.away_team.id == team_id
    }
}

impl fmt::Display for Match {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {} vs {} ({}, {})",
            self.competition.name,
            self.home_team.name,
            self.away_team.name,
            self.kickoff_time.format("%Y-%m-%d %H:%M UTC"),
            self.status,
        )
    }
}

/// Historical meeting summary between the two sides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeadToHead {
    pub total_matches: u32,
    pub home_wins: u32,
    pub away_wins: u32,
    pub draws: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineupPlayer {
    pub id: i64,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<String>,
}

/// A match plus whatever extra detail the provider's single-match
/// endpoint exposes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchDetail {
    #[serde(flatten)]
    pub fixture: Match,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stage: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attendance: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub home_coach: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub away_coach: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub home_lineup: Vec<LineupPlayer>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub away_lineup: Vec<LineupPlayer>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub head_to_head: Option<HeadToHead>,
}

impl MatchDetail {
    /// Detail record carrying nothing beyond the base fixture.
    pub fn bare(fixture: Match) -> Self {
        Self {
            fixture,
            stage: None,
            attendance: None,
            home_coach: None,
            away_coach: None,
            home_lineup: Vec::new(),
            away_lineup: Vec::new(),
            head_to_head: None,
        }
    }
}

// ---------------------------------------------------------------------------
// Statistics
// ---------------------------------------------------------------------------

/// Single-match outcome from one team's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FormResult {
    W,
    D,
    L,
}

/// Season tally for a football team.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FootballTeamStats {
    pub played: u32,
    pub wins: u32,
    pub draws: u32,
    pub losses: u32,
    pub goals_for: u32,
    pub goals_against: u32,
    pub clean_sheets: u32,
    pub points: u32,
    pub goal_difference: i32,
    /// Percentage, one decimal place.
    pub win_rate: f64,
    pub form: Vec<FormResult>,
}

/// Per-game averages for a basketball team.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BasketballTeamStats {
    pub wins: u32,
    pub losses: u32,
    pub win_percentage: f64,
    pub points_per_game: f64,
    pub rebounds_per_game: f64,
    pub assists_per_game: f64,
    pub steals_per_game: f64,
    pub blocks_per_game: f64,
    pub turnovers_per_game: f64,
    pub field_goal_percentage: f64,
    pub three_point_percentage: f64,
    pub free_throw_percentage: f64,
    pub form: Vec<FormResult>,
}

/// Provider-named stat values, for sports without a dedicated shape.
pub type StatLine = BTreeMap<String, serde_json::Value>;

/// Team statistics. Not unified across sports: callers must know which
/// variant the active sport produces.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TeamStats {
    Football(FootballTeamStats),
    Basketball(BasketballTeamStats),
    Line(StatLine),
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    pub id: i64,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nationality: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_of_birth: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shirt_number: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub team: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerStats {
    pub player_id: i64,
    pub season: i32,
    pub values: StatLine,
}

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors raised by the data layer.
///
/// Only `UnsupportedSport` reaches callers of `ProviderClient`; the rest
/// are logged and degraded to empty/`None` results.
#[derive(Debug, thiserror::Error)]
pub enum SportsError {
    #[error("Sport '{0}' not supported")]
    UnsupportedSport(String),

    #[error("No API key configured for {0}")]
    MissingApiKey(Sport),

    #[error("Request to {url} failed: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Transport error ({url}): {message}")]
    Transport { url: String, message: String },

    #[error("Upstream {url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("Failed to parse {sport} {operation} response: {source}")]
    Parse {
        sport: Sport,
        operation: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("Unexpected {sport} response shape: {message}")]
    Shape { sport: Sport, message: String },
}

impl SportsError {
    /// Caller misuse that must propagate rather than degrade.
    pub fn is_configuration(&self) -> bool {
        matches!(self, SportsError::UnsupportedSport(_))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sport_from_str_aliases() {
        assert_eq!("Football".parse::<Sport>().unwrap(), Sport::Football);
        assert_eq!("soccer".parse::<Sport>().unwrap(), Sport::Football);
        assert_eq!("basketball".parse::<Sport>().unwrap(), Sport::Nba);
        assert_eq!(" NHL ".parse::<Sport>().unwrap(), Sport::Nhl);
    }

    #[test]
    fn test_sport_from_str_unsupported_is_configuration_error() {
        let err = "curling".parse::<Sport>().unwrap_err();
        assert!(err.is_configuration());
        assert_eq!(err.to_string(), "Sport 'curling' not supported");
    }

    #[test]
    fn test_sport_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Sport::Mlb).unwrap(), "\"mlb\"");
    }

    #[test]
    fn test_odds_missing_prices_are_neutral() {
        let odds = Odds::new(None, None, None);
        assert!(odds.is_neutral());
        assert_eq!(odds.home, 1.0);
    }

    #[test]
    fn test_odds_never_zero_or_nan() {
        let odds = Odds::new(Some(0.0), Some(f64::NAN), Some(2.5));
        assert_eq!(odds.home, ODDS_FLOOR);
        assert_eq!(odds.draw, ODDS_FLOOR);
        assert_eq!(odds.away, 2.5);

        let odds = Odds { home: -3.0, draw: f64::INFINITY, away: 0.4 }.sanitized();
        assert!(odds.is_neutral());
    }

    #[test]
    fn test_decimal_from_american() {
        assert_eq!(Odds::decimal_from_american(150.0), Some(2.5));
        assert_eq!(Odds::decimal_from_american(-200.0), Some(1.5));
        assert_eq!(Odds::decimal_from_american(0.0), None);
    }

    #[test]
    fn test_team_name_matches_short_name() {
        let team = Team {
            id: 6,
            name: "Tottenham Hotspur".into(),
            short_name: Some("Spurs".into()),
            ..Team::default()
        };
        assert!(team.name_matches("spurs"));
        assert!(team.name_matches("tottenham"));
        assert!(!team.name_matches("arsenal"));
    }

    #[test]
    fn test_team_stats_serialize_untagged() {
        let stats = TeamStats::Football(FootballTeamStats {
            played: 1,
            wins: 1,
            points: 3,
            win_rate: 100.0,
            form: vec![FormResult::W],
            ..FootballTeamStats::default()
        });
        let json = serde_json::to_value(&stats).unwrap();
        assert_eq!(json["played"], 1);
        assert_eq!(json["winRate"], 100.0);
        assert_eq!(json["form"][0], "W");
    }
}
