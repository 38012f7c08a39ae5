//! Fixed per-sport league tables.
//!
//! Every sport has a predefined list. Football is the only sport whose
//! list can also be refreshed from the provider; this table is its
//! fallback.

use crate::types::{League, Sport};

struct LeagueDef {
    id: i64,
    name: &'static str,
    country: &'static str,
}

const FOOTBALL: &[LeagueDef] = &[
    LeagueDef { id: 2021, name: "Premier League", country: "England" },
    LeagueDef { id: 2014, name: "La Liga", country: "Spain" },
    LeagueDef { id: 2019, name: "Serie A", country: "Italy" },
    LeagueDef { id: 2002, name: "Bundesliga", country: "Germany" },
    LeagueDef { id: 2015, name: "Ligue 1", country: "France" },
    LeagueDef { id: 2001, name: "UEFA Champions League", country: "Europe" },
];

const NBA: &[LeagueDef] = &[LeagueDef { id: 0, name: "NBA", country: "USA" }];

const MLB: &[LeagueDef] = &[
    LeagueDef { id: 103, name: "American League", country: "USA" },
    LeagueDef { id: 104, name: "National League", country: "USA" },
];

const NFL: &[LeagueDef] = &[
    LeagueDef { id: 1, name: "AFC", country: "USA" },
    LeagueDef { id: 2, name: "NFC", country: "USA" },
];

const NHL: &[LeagueDef] = &[LeagueDef { id: 0, name: "NHL", country: "USA/Canada" }];

pub const UNKNOWN_LEAGUE: &str = "Unknown League";

fn table(sport: Sport) -> &'static [LeagueDef] {
    match sport {
        Sport::Football => FOOTBALL,
        Sport::Nba => NBA,
        Sport::Mlb => MLB,
        Sport::Nfl => NFL,
        Sport::Nhl => NHL,
    }
}

/// The predefined leagues for a sport.
pub fn default_leagues(sport: Sport) -> Vec<League> {
    table(sport)
        .iter()
        .map(|def| League {
            id: def.id,
            name: def.name.to_string(),
            country: def.country.to_string(),
        })
        .collect()
}

/// The league a session lands on after switching to `sport`.
pub fn first_league_id(sport: Sport) -> i64 {
    // Every table is non-empty.
    table(sport).first().map(|def| def.id).unwrap_or_default()
}

/// Name of a predefined league, or `"Unknown League"`.
pub fn league_name(sport: Sport, league_id: i64) -> String {
    table(sport)
        .iter()
        .find(|def| def.id == league_id)
        .map(|def| def.name.to_string())
        .unwrap_or_else(|| UNKNOWN_LEAGUE.to_string())
}

/// Resolve a league record, synthesising one for unknown ids.
pub fn resolve(sport: Sport, league_id: i64) -> League {
    table(sport)
        .iter()
        .find(|def| def.id == league_id)
        .map(|def| League {
            id: def.id,
            name: def.name.to_string(),
            country: def.country.to_string(),
        })
        .unwrap_or_else(|| League {
            id: league_id,
            name: UNKNOWN_LEAGUE.to_string(),
            country: String::new(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_sport_has_leagues() {
        for sport in Sport::ALL {
            assert!(!default_leagues(*sport).is_empty(), "{sport} has no leagues");
        }
    }

    #[test]
    fn test_first_league() {
        assert_eq!(first_league_id(Sport::Football), 2021);
        assert_eq!(first_league_id(Sport::Mlb), 103);
        assert_eq!(first_league_id(Sport::Nfl), 1);
    }

    #[test]
    fn test_league_name_lookup() {
        assert_eq!(league_name(Sport::Football, 2014), "La Liga");
        assert_eq!(league_name(Sport::Football, 9999), UNKNOWN_LEAGUE);
        assert_eq!(resolve(Sport::Nhl, 42).name, UNKNOWN_LEAGUE);
    }
}
