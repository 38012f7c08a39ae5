//! Upstream sports providers.
//!
//! Defines the `SportProvider` trait (one implementation per sport) and
//! the helpers the normalizers share:
//! - football-data.org v4 (football)
//! - balldontlie v1 (NBA)
//! - MLB StatsAPI
//! - ESPN site API (NFL)
//! - NHL StatsAPI
//!
//! A provider knows two things: how to phrase a request as a URL path,
//! and how to project the upstream JSON into canonical records. It
//! performs no I/O itself.

pub mod american_football;
pub mod baseball;
pub mod basketball;
pub mod football;
pub mod hockey;
mod statsapi;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::warn;

use crate::types::{League, Match, MatchDetail, Player, PlayerStats, Sport, SportsError, StatLine, Team, TeamStats};

/// Schema knowledge for one sport's upstream API.
///
/// Every `*_path` returns a path (with query string) relative to the
/// provider's configured base URL.
pub trait SportProvider: Send + Sync {
    fn sport(&self) -> Sport;

    /// Header carrying the API key, if the provider authenticates.
    fn auth_header(&self) -> Option<&'static str> {
        None
    }

    /// Whether requests are pointless without a key.
    fn requires_api_key(&self) -> bool {
        false
    }

    /// Only providers with a dynamic competition list override this.
    fn leagues_path(&self) -> Option<String> {
        None
    }

    fn normalize_leagues(&self, _body: Value) -> Result<Vec<League>, SportsError> {
        Ok(Vec::new())
    }

    fn teams_path(&self, league_id: i64) -> String;
    fn normalize_teams(&self, body: Value) -> Result<Vec<Team>, SportsError>;

    fn matches_path(&self, league_id: i64, date_from: NaiveDate, date_to: NaiveDate) -> String;
    /// `league` supplies competition fields the response may omit.
    fn normalize_matches(&self, body: Value, league: &League) -> Result<Vec<Match>, SportsError>;

    fn match_detail_path(&self, match_id: i64) -> String;
    fn normalize_match_detail(&self, body: Value) -> Result<Option<MatchDetail>, SportsError>;

    fn team_stats_path(&self, team_id: i64, season: i32) -> String;
    fn normalize_team_stats(&self, body: Value, team_id: i64) -> Result<Option<TeamStats>, SportsError>;

    fn players_path(&self, team_id: i64) -> String;
    fn normalize_players(&self, body: Value) -> Result<Vec<Player>, SportsError>;

    fn player_stats_path(&self, player_id: i64, season: i32) -> String;
    fn normalize_player_stats(
        &self,
        body: Value,
        player_id: i64,
        season: i32,
    ) -> Result<Option<PlayerStats>, SportsError>;
}

/// One provider per supported sport.
pub fn default_providers() -> Vec<Box<dyn SportProvider>> {
    vec![
        Box::new(football::FootballProvider),
        Box::new(basketball::BasketballProvider),
        Box::new(baseball::BaseballProvider),
        Box::new(american_football::AmericanFootballProvider),
        Box::new(hockey::HockeyProvider),
    ]
}

// ---------------------------------------------------------------------------
// Shared helpers
// ---------------------------------------------------------------------------

/// Deserialize an upstream body into a typed response.
pub(crate) fn decode<T: DeserializeOwned>(
    sport: Sport,
    operation: &'static str,
    body: Value,
) -> Result<T, SportsError> {
    serde_json::from_value(body).map_err(|source| SportsError::Parse {
        sport,
        operation,
        source,
    })
}

/// Decode each row of a list on its own. Rows that don't fit `T` are
/// logged and skipped so one bad record never costs the whole list.
pub(crate) fn decode_rows<T: DeserializeOwned>(
    sport: Sport,
    operation: &'static str,
    rows: Vec<Value>,
) -> Vec<T> {
    rows.into_iter()
        .enumerate()
        .filter_map(|(index, row)| match serde_json::from_value(row) {
            Ok(item) => Some(item),
            Err(e) => {
                warn!(%sport, operation, index, error = %e, "Skipping unreadable row");
                None
            }
        })
        .collect()
}

/// Parse the kickoff formats seen across providers:
/// RFC 3339 (`2024-01-01T15:00:00Z`), ESPN's minute precision
/// (`2024-09-06T00:20Z`), and bare dates (`2024-01-01`, midnight UTC).
pub(crate) fn parse_kickoff(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%MZ") {
        return Some(naive.and_utc());
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Keep the scalar entries of a JSON object as a stat line.
pub(crate) fn scalar_stat_line(object: &serde_json::Map<String, Value>) -> StatLine {
    object
        .iter()
        .filter(|(_, v)| !v.is_object() && !v.is_array())
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect()
}

/// Tolerant field deserializers for providers that mix numbers and
/// numeric strings.
pub(crate) mod lenient {
    use serde::de::{self, Deserialize, Deserializer};
    use serde_json::Value;

    pub fn id<'de, D>(d: D) -> Result<i64, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Value::deserialize(d)? {
            Value::Number(n) => n.as_i64().ok_or_else(|| de::Error::custom("id out of range")),
            Value::String(s) => s.trim().parse().map_err(de::Error::custom),
            other => Err(de::Error::custom(format!("invalid id: {other}"))),
        }
    }

    /// `null` reads as the type's default, like a missing key does.
    pub fn or_default<'de, D, T>(d: D) -> Result<T, D::Error>
    where
        D: Deserializer<'de>,
        T: Deserialize<'de> + Default,
    {
        Ok(Option::<T>::deserialize(d)?.unwrap_or_default())
    }

    pub fn opt_u32<'de, D>(d: D) -> Result<Option<u32>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match Option::<Value>::deserialize(d)? {
            Some(Value::Number(n)) => n.as_u64().and_then(|v| u32::try_from(v).ok()),
            Some(Value::String(s)) => s.trim().parse().ok(),
            _ => None,
        })
    }

    pub fn opt_string<'de, D>(d: D) -> Result<Option<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match Option::<Value>::deserialize(d)? {
            Some(Value::String(s)) if !s.is_empty() => Some(s),
            Some(Value::Number(n)) => Some(n.to_string()),
            _ => None,
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
