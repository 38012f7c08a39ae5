//! Canned demonstration data.
//!
//! Serves football and NBA fixtures without API keys. Kickoffs are
//! offsets from the moment of the fetch, so the demo always shows
//! upcoming games.

use async_trait::async_trait;
use chrono::{Duration, Utc};
use std::collections::HashSet;
use tracing::debug;

use super::{DataSource, Payload, Query};
use crate::types::{
    BasketballTeamStats, Competition, FootballTeamStats, FormResult, HeadToHead, LineupPlayer, Match,
    MatchDetail, Odds, Player, Score, Sport, SportsError, Team, TeamRef, TeamStats,
};

use FormResult::{D, L, W};

struct DemoTeam {
    id: i64,
    name: &'static str,
    short_name: &'static str,
    abbreviation: &'static str,
    crest: Option<&'static str>,
}

const FOOTBALL_TEAMS: &[DemoTeam] = &[
    DemoTeam { id: 1, name: "Manchester United", short_name: "Man United", abbreviation: "MUN", crest: Some("https://crests.football-data.org/66.svg") },
    DemoTeam { id: 2, name: "Liverpool", short_name: "Liverpool", abbreviation: "LIV", crest: Some("https://crests.football-data.org/64.svg") },
    DemoTeam { id: 3, name: "Arsenal", short_name: "Arsenal", abbreviation: "ARS", crest: Some("https://crests.football-data.org/57.svg") },
    DemoTeam { id: 4, name: "Chelsea", short_name: "Chelsea", abbreviation: "CHE", crest: Some("https://crests.football-data.org/61.svg") },
    DemoTeam { id: 5, name: "Manchester City", short_name: "Man City", abbreviation: "MCI", crest: Some("https://crests.football-data.org/65.svg") },
    DemoTeam { id: 6, name: "Tottenham Hotspur", short_name: "Spurs", abbreviation: "TOT", crest: Some("https://crests.football-data.org/73.svg") },
    DemoTeam { id: 7, name: "Newcastle United", short_name: "Newcastle", abbreviation: "NEW", crest: Some("https://crests.football-data.org/67.svg") },
    DemoTeam { id: 8, name: "Aston Villa", short_name: "Aston Villa", abbreviation: "AVL", crest: Some("https://crests.football-data.org/58.svg") },
];

const NBA_TEAMS: &[DemoTeam] = &[
    DemoTeam { id: 101, name: "Los Angeles Lakers", short_name: "Lakers", abbreviation: "LAL", crest: None },
    DemoTeam { id: 102, name: "Boston Celtics", short_name: "Celtics", abbreviation: "BOS", crest: None },
    DemoTeam { id: 103, name: "Golden State Warriors", short_name: "Warriors", abbreviation: "GSW", crest: None },
    DemoTeam { id: 104, name: "Brooklyn Nets", short_name: "Nets", abbreviation: "BKN", crest: None },
];

/// `(match id, hours from now, home index, away index)` into the team table.
const FOOTBALL_FIXTURES: &[(i64, i64, usize, usize)] = &[(1001, 1, 0, 1), (1002, 2, 2, 3), (1003, 3, 4, 5), (1004, 4, 6, 7)];
const NBA_FIXTURES: &[(i64, i64, usize, usize)] = &[(2001, 1, 0, 1), (2002, 2, 2, 3)];

const PREMIER_LEAGUE_EMBLEM: &str = "https://crests.football-data.org/PL.png";

impl DemoTeam {
    fn to_team(&self) -> Team {
        Team {
            id: self.id,
            name: self.name.to_string(),
            short_name: Some(self.short_name.to_string()),
            abbreviation: Some(self.abbreviation.to_string()),
            crest: self.crest.map(str::to_string),
            ..Team::default()
        }
    }

    fn to_ref(&self) -> TeamRef {
        TeamRef {
            id: self.id,
            name: self.name.to_string(),
            short_name: Some(self.short_name.to_string()),
            abbreviation: Some(self.abbreviation.to_string()),
            crest: self.crest.map(str::to_string),
        }
    }
}

fn teams_table(sport: Sport) -> &'static [DemoTeam] {
    match sport {
        Sport::Football => FOOTBALL_TEAMS,
        Sport::Nba => NBA_TEAMS,
        _ => &[],
    }
}

fn competition(sport: Sport, league_id: i64) -> Competition {
    let emblem = (sport == Sport::Football && league_id == 2021).then(|| PREMIER_LEAGUE_EMBLEM.to_string());
    Competition { id: league_id, name: crate::leagues::league_name(sport, league_id), emblem }
}

fn fixtures(sport: Sport, league_id: i64) -> Vec<Match> {
    let (table, schedule) = match sport {
        Sport::Football => (FOOTBALL_TEAMS, FOOTBALL_FIXTURES),
        Sport::Nba => (NBA_TEAMS, NBA_FIXTURES),
        _ => return Vec::new(),
    };
    let now = Utc::now();
    schedule
        .iter()
        .map(|&(id, hours, home, away)| Match {
            id,
            sport,
            kickoff_time: now + Duration::hours(hours),
            status: "SCHEDULED".to_string(),
            home_team: table[home].to_ref(),
            away_team: table[away].to_ref(),
            score: Score::default(),
            competition: competition(sport, league_id),
            odds: Odds::NEUTRAL,
            venue: None,
            matchday: None,
        })
        .collect()
}

fn football_detail(match_id: i64) -> MatchDetail {
    let lineup = |players: &[(i64, &str, &str)]| -> Vec<LineupPlayer> {
        players
            .iter()
            .map(|&(id, name, position)| LineupPlayer {
                id,
                name: name.to_string(),
                position: Some(position.to_string()),
            })
            .collect()
    };

    let fixture = Match {
        id: match_id,
        sport: Sport::Football,
        kickoff_time: Utc::now() + Duration::days(1),
        status: "SCHEDULED".to_string(),
        home_team: FOOTBALL_TEAMS[0].to_ref(),
        away_team: FOOTBALL_TEAMS[1].to_ref(),
        score: Score::default(),
        competition: competition(Sport::Football, crate::leagues::first_league_id(Sport::Football)),
        odds: Odds::NEUTRAL,
        venue: Some("Old Trafford".to_string()),
        matchday: Some(30),
    };

    MatchDetail {
        stage: Some("REGULAR_SEASON".to_string()),
        attendance: Some(74_000),
        home_coach: Some("Erik ten Hag".to_string()),
        away_coach: Some("Jürgen Klopp".to_string()),
        home_lineup: lineup(&[
            (101, "David de Gea", "Goalkeeper"),
            (102, "Aaron Wan-Bissaka", "Defender"),
            (103, "Raphael Varane", "Defender"),
            (104, "Lisandro Martinez", "Defender"),
        ]),
        away_lineup: lineup(&[
            (201, "Alisson", "Goalkeeper"),
            (202, "Trent Alexander-Arnold", "Defender"),
            (203, "Virgil van Dijk", "Defender"),
            (204, "Andrew Robertson", "Defender"),
        ]),
        head_to_head: Some(HeadToHead { total_matches: 12, home_wins: 5, away_wins: 4, draws: 3 }),
        ..MatchDetail::bare(fixture)
    }
}

#[allow(clippy::too_many_arguments)]
fn football_line(
    played: u32,
    wins: u32,
    draws: u32,
    losses: u32,
    goals_for: u32,
    goals_against: u32,
    clean_sheets: u32,
    win_rate: f64,
    form: [FormResult; 5],
) -> FootballTeamStats {
    FootballTeamStats {
        played,
        wins,
        draws,
        losses,
        goals_for,
        goals_against,
        clean_sheets,
        points: wins * 3 + draws,
        goal_difference: goals_for as i32 - goals_against as i32,
        win_rate,
        form: form.to_vec(),
    }
}

fn football_stats(team_id: i64) -> FootballTeamStats {
    match team_id {
        1 => football_line(28, 16, 6, 6, 48, 33, 9, 57.1, [W, D, W, L, W]),
        2 => football_line(29, 19, 7, 3, 65, 26, 12, 65.5, [W, W, W, D, W]),
        3 => football_line(29, 21, 4, 4, 70, 24, 11, 72.4, [W, W, W, L, W]),
        4 => football_line(28, 11, 7, 10, 44, 39, 8, 39.3, [L, W, L, D, W]),
        5 => football_line(28, 20, 5, 3, 67, 26, 10, 71.4, [W, W, D, W, W]),
        _ => football_line(28, 12, 8, 8, 42, 40, 7, 42.9, [W, L, D, W, L]),
    }
}

fn nba_stats() -> BasketballTeamStats {
    BasketballTeamStats {
        wins: 42,
        losses: 30,
        win_percentage: 0.583,
        points_per_game: 115.7,
        rebounds_per_game: 44.2,
        assists_per_game: 25.8,
        steals_per_game: 7.5,
        blocks_per_game: 5.2,
        turnovers_per_game: 13.5,
        field_goal_percentage: 47.6,
        three_point_percentage: 36.2,
        free_throw_percentage: 78.3,
        form: vec![W, W, L, W, L],
    }
}

/// `(id, name, position, nationality, date of birth, shirt number)`
type SquadRow = (i64, &'static str, &'static str, &'static str, &'static str, u32);

const MAN_UNITED_SQUAD: &[SquadRow] = &[
    (101, "David de Gea", "Goalkeeper", "Spain", "1990-11-07", 1),
    (102, "Aaron Wan-Bissaka", "Defender", "England", "1997-11-26", 29),
    (103, "Raphael Varane", "Defender", "France", "1993-04-25", 19),
    (104, "Lisandro Martinez", "Defender", "Argentina", "1998-01-18", 6),
    (105, "Luke Shaw", "Defender", "England", "1995-07-12", 23),
    (106, "Casemiro", "Midfielder", "Brazil", "1992-02-23", 18),
    (107, "Bruno Fernandes", "Midfielder", "Portugal", "1994-09-08", 8),
    (108, "Mason Mount", "Midfielder", "England", "1999-01-10", 7),
    (109, "Marcus Rashford", "Attacker", "England", "1997-10-31", 10),
    (110, "Rasmus Højlund", "Attacker", "Denmark", "2003-02-04", 11),
    (111, "Antony", "Attacker", "Brazil", "2000-02-24", 21),
];

const LIVERPOOL_SQUAD: &[SquadRow] = &[
    (201, "Alisson", "Goalkeeper", "Brazil", "1992-10-02", 1),
    (202, "Trent Alexander-Arnold", "Defender", "England", "1998-10-07", 66),
    (203, "Virgil van Dijk", "Defender", "Netherlands", "1991-07-08", 4),
    (204, "Andrew Robertson", "Defender", "Scotland", "1994-03-11", 26),
    (205, "Ibrahima Konaté", "Defender", "France", "1999-05-25", 5),
    (206, "Alexis Mac Allister", "Midfielder", "Argentina", "1998-12-24", 10),
    (207, "Dominik Szoboszlai", "Midfielder", "Hungary", "2000-10-25", 8),
    (208, "Ryan Gravenberch", "Midfielder", "Netherlands", "2002-05-16", 38),
    (209, "Mohamed Salah", "Attacker", "Egypt", "1992-06-15", 11),
    (210, "Luis Díaz", "Attacker", "Colombia", "1997-01-13", 7),
    (211, "Darwin Núñez", "Attacker", "Uruguay", "1999-06-24", 9),
];

const GENERIC_SQUAD: &[SquadRow] = &[
    (901, "Goalkeeper", "Goalkeeper", "England", "1990-01-01", 1),
    (902, "Defender 1", "Defender", "England", "1992-01-01", 2),
    (903, "Defender 2", "Defender", "France", "1993-01-01", 3),
    (904, "Defender 3", "Defender", "Spain", "1994-01-01", 4),
    (905, "Midfielder 1", "Midfielder", "Brazil", "1995-01-01", 6),
    (906, "Midfielder 2", "Midfielder", "Argentina", "1996-01-01", 8),
    (907, "Midfielder 3", "Midfielder", "Germany", "1997-01-01", 10),
    (908, "Forward 1", "Attacker", "Portugal", "1998-01-01", 7),
    (909, "Forward 2", "Attacker", "Italy", "1999-01-01", 9),
    (910, "Forward 3", "Attacker", "Belgium", "2000-01-01", 11),
];

/// `(id, name, position, number, height, weight)`
const LAKERS_ROSTER: &[(i64, &str, &str, u32, &str, &str)] = &[
    (301, "LeBron James", "Forward", 23, "6-9", "250"),
    (302, "Anthony Davis", "Forward-Center", 3, "6-10", "253"),
    (303, "Austin Reaves", "Guard", 15, "6-5", "197"),
    (304, "D'Angelo Russell", "Guard", 1, "6-4", "193"),
    (305, "Jarred Vanderbilt", "Forward", 2, "6-9", "214"),
    (306, "Rui Hachimura", "Forward", 28, "6-8", "230"),
    (307, "Gabe Vincent", "Guard", 7, "6-3", "200"),
    (308, "Taurean Prince", "Forward", 12, "6-7", "218"),
    (309, "Christian Wood", "Center", 35, "6-9", "214"),
    (310, "Jaxson Hayes", "Center", 11, "7-0", "220"),
];

fn football_squad(team_id: i64) -> Vec<Player> {
    let rows = match team_id {
        1 => MAN_UNITED_SQUAD,
        2 => LIVERPOOL_SQUAD,
        _ => GENERIC_SQUAD,
    };
    rows.iter()
        .map(|&(id, name, position, nationality, dob, shirt)| Player {
            id,
            name: name.to_string(),
            position: Some(position.to_string()),
            nationality: Some(nationality.to_string()),
            date_of_birth: Some(dob.to_string()),
            shirt_number: Some(shirt),
            ..Player::default()
        })
        .collect()
}

fn nba_roster() -> Vec<Player> {
    LAKERS_ROSTER
        .iter()
        .map(|&(id, name, position, number, height, weight)| Player {
            id,
            name: name.to_string(),
            position: Some(position.to_string()),
            shirt_number: Some(number),
            height: Some(height.to_string()),
            weight: Some(weight.to_string()),
            team: Some(NBA_TEAMS[0].name.to_string()),
            ..Player::default()
        })
        .collect()
}

/// Canned answers for a configurable set of sports.
pub struct DemoSource {
    sports: HashSet<Sport>,
}

impl DemoSource {
    pub fn new(sports: impl IntoIterator<Item = Sport>) -> Self {
        Self { sports: sports.into_iter().collect() }
    }

    /// Demo data for every sport that has any.
    pub fn all() -> Self {
        Self::new([Sport::Football, Sport::Nba])
    }

    pub fn serves(&self, sport: Sport) -> bool {
        self.sports.contains(&sport)
    }

    fn answer(query: &Query) -> Option<Payload> {
        match *query {
            Query::Teams { sport, .. } => {
                let table = teams_table(sport);
                (!table.is_empty()).then(|| Payload::Teams(table.iter().map(DemoTeam::to_team).collect()))
            }
            Query::Matches { sport, league_id, .. } => {
                let matches = fixtures(sport, league_id);
                (!matches.is_empty()).then_some(Payload::Matches(matches))
            }
            Query::MatchDetail { sport: Sport::Football, match_id } => {
                Some(Payload::MatchDetail(Box::new(football_detail(match_id))))
            }
            Query::TeamStats { sport: Sport::Football, team_id, .. } => {
                Some(Payload::TeamStats(TeamStats::Football(football_stats(team_id))))
            }
            Query::TeamStats { sport: Sport::Nba, .. } => Some(Payload::TeamStats(TeamStats::Basketball(nba_stats()))),
            Query::Players { sport: Sport::Football, team_id } => Some(Payload::Players(football_squad(team_id))),
            Query::Players { sport: Sport::Nba, .. } => Some(Payload::Players(nba_roster())),
            _ => None,
        }
    }
}

#[async_trait]
impl DataSource for DemoSource {
    fn name(&self) -> &'static str {
        "demo"
    }

    async fn fetch(&self, query: &Query) -> Result<Option<Payload>, SportsError> {
        if !self.serves(query.sport()) {
            return Ok(None);
        }
        let payload = Self::answer(query);
        if payload.is_some() {
            debug!(query = %query, "Serving demo data");
        }
        Ok(payload)
    }
}
