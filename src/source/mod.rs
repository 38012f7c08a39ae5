//! Where answers come from.
//!
//! A `Query` names one read operation and its parameters; a `DataSource`
//! either answers it with a `Payload` or declines (`Ok(None)`) so the
//! next source in line can try. `ProviderClient` composes a cache, the
//! canned demo source, and the live HTTP source in that order.

pub mod demo;
pub mod live;

use async_trait::async_trait;
use chrono::NaiveDate;
use std::fmt;

use crate::cache::CacheCategory;
use crate::types::{League, Match, MatchDetail, Player, PlayerStats, Sport, SportsError, Team, TeamStats};

/// One read operation plus its parameters. Doubles as the cache key, so
/// every parameter that changes the answer must be a field here.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Query {
    Leagues {
        sport: Sport,
    },
    Teams {
        sport: Sport,
        league_id: i64,
    },
    Matches {
        sport: Sport,
        league_id: i64,
        date_from: NaiveDate,
        date_to: NaiveDate,
    },
    MatchDetail {
        sport: Sport,
        match_id: i64,
    },
    TeamStats {
        sport: Sport,
        team_id: i64,
        season: i32,
    },
    Players {
        sport: Sport,
        team_id: i64,
    },
    PlayerStats {
        sport: Sport,
        player_id: i64,
        season: i32,
    },
}

impl Query {
    pub fn sport(&self) -> Sport {
        match self {
            Query::Leagues { sport }
            | Query::Teams { sport, .. }
            | Query::Matches { sport, .. }
            | Query::MatchDetail { sport, .. }
            | Query::TeamStats { sport, .. }
            | Query::Players { sport, .. }
            | Query::PlayerStats { sport, .. } => *sport,
        }
    }

    pub fn category(&self) -> CacheCategory {
        match self {
            Query::Leagues { .. } => CacheCategory::Leagues,
            Query::Teams { .. } => CacheCategory::Teams,
            Query::Matches { .. } | Query::MatchDetail { .. } => CacheCategory::Matches,
            Query::Players { .. } => CacheCategory::Players,
            Query::TeamStats { .. } | Query::PlayerStats { .. } => CacheCategory::Stats,
        }
    }

    /// Human-readable key, e.g. `matches:football:2021:2024-01-01:2024-01-08`.
    pub fn cache_key(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Query::Leagues { sport } => write!(f, "leagues:{sport}"),
            Query::Teams { sport, league_id } => write!(f, "teams:{sport}:{league_id}"),
            Query::Matches { sport, league_id, date_from, date_to } => {
                write!(f, "matches:{sport}:{league_id}:{date_from}:{date_to}")
            }
            Query::MatchDetail { sport, match_id } => write!(f, "match:{sport}:{match_id}"),
            Query::TeamStats { sport, team_id, season } => {
                write!(f, "team_stats:{sport}:{team_id}:{season}")
            }
            Query::Players { sport, team_id } => write!(f, "players:{sport}:{team_id}"),
            Query::PlayerStats { sport, player_id, season } => {
                write!(f, "player_stats:{sport}:{player_id}:{season}")
            }
        }
    }
}

/// A normalized answer to a `Query`.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    Leagues(Vec<League>),
    Teams(Vec<Team>),
    Matches(Vec<Match>),
    MatchDetail(Box<MatchDetail>),
    TeamStats(TeamStats),
    Players(Vec<Player>),
    PlayerStats(PlayerStats),
}

impl Payload {
    /// Re-apply the odds floor to every fixture the payload carries.
    pub fn sanitized(self) -> Self {
        match self {
            Payload::Matches(matches) => Payload::Matches(
                matches
                    .into_iter()
                    .map(|m| Match { odds: m.odds.sanitized(), ..m })
                    .collect(),
            ),
            Payload::MatchDetail(mut detail) => {
                detail.fixture.odds = detail.fixture.odds.sanitized();
                Payload::MatchDetail(detail)
            }
            other => other,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Payload::Leagues(_) => "leagues",
            Payload::Teams(_) => "teams",
            Payload::Matches(_) => "matches",
            Payload::MatchDetail(_) => "match detail",
            Payload::TeamStats(_) => "team stats",
            Payload::Players(_) => "players",
            Payload::PlayerStats(_) => "player stats",
        }
    }

    /// Number of records, for logging.
    pub fn len(&self) -> usize {
        match self {
            Payload::Leagues(v) => v.len(),
            Payload::Teams(v) => v.len(),
            Payload::Matches(v) => v.len(),
            Payload::Players(v) => v.len(),
            Payload::MatchDetail(_) | Payload::TeamStats(_) | Payload::PlayerStats(_) => 1,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A capability that can answer some queries.
#[async_trait]
pub trait DataSource: Send + Sync {
    /// Short name for logs (`"demo"`, `"live"`).
    fn name(&self) -> &'static str;

    /// `Ok(None)` means "not mine, ask the next source" for list queries
    /// and "not found" for singular ones when this is the last source.
    async fn fetch(&self, query: &Query) -> Result<Option<Payload>, SportsError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Odds;

    fn window(from: (i32, u32, u32), to: (i32, u32, u32)) -> Query {
        Query::Matches {
            sport: Sport::Football,
            league_id: 2021,
            date_from: NaiveDate::from_ymd_opt(from.0, from.1, from.2).unwrap(),
            date_to: NaiveDate::from_ymd_opt(to.0, to.1, to.2).unwrap(),
        }
    }

    #[test]
    fn test_cache_key_includes_date_range() {
        let jan = window((2024, 1, 1), (2024, 1, 8));
        let feb = window((2024, 2, 1), (2024, 2, 8));
        assert_ne!(jan, feb);
        assert_eq!(jan.cache_key(), "matches:football:2021:2024-01-01:2024-01-08");
        assert_eq!(jan.category(), CacheCategory::Matches);
    }

    #[test]
    fn test_stats_queries_share_category() {
        let team = Query::TeamStats { sport: Sport::Nba, team_id: 14, season: 2024 };
        let player = Query::PlayerStats { sport: Sport::Nba, player_id: 14, season: 2024 };
        assert_eq!(team.category(), player.category());
        assert_ne!(team, player);
        assert_eq!(player.sport(), Sport::Nba);
    }

    #[test]
    fn test_sanitized_payload_floors_odds() {
        let fixture = Match {
            id: 1,
            sport: Sport::Football,
            kickoff_time: chrono::Utc::now(),
            status: "SCHEDULED".into(),
            home_team: Default::default(),
            away_team: Default::default(),
            score: Default::default(),
            competition: crate::types::Competition { id: 2021, name: "Premier League".into(), emblem: None },
            odds: Odds { home: 0.0, draw: f64::NAN, away: 3.1 },
            venue: None,
            matchday: None,
        };
        let Payload::Matches(out) = Payload::Matches(vec![fixture]).sanitized() else {
            panic!("kind changed");
        };
        assert_eq!(out[0].odds, Odds { home: 1.0, draw: 1.0, away: 3.1 });
    }
}
