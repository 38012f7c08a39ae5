//! Football team statistics derived from match history.
//!
//! football-data.org has no season-stats endpoint on the free tier, so
//! the tally is rebuilt from a team's fixtures.

use crate::types::{FootballTeamStats, FormResult, Match};

/// Number of recent results kept in `form`.
const FORM_LENGTH: usize = 5;

/// Fold `matches` into a season tally for `team_id`.
///
/// Only `FINISHED` fixtures involving the team count. A missing score on a
/// finished fixture counts as 0. The totals are order-independent; only
/// `form` depends on kickoff order.
pub fn derive_football_stats(team_id: i64, matches: &[Match]) -> FootballTeamStats {
    let mut stats = FootballTeamStats::default();
    let mut results: Vec<(&Match, FormResult)> = Vec::new();

    for m in matches.iter().filter(|m| m.is_finished() && m.involves(team_id)) {
        let is_home = m.home_team.id == team_id;
        let (ours, theirs) = if is_home {
            (m.score.home.unwrap_or(0), m.score.away.unwrap_or(0))
        } else {
            (m.score.away.unwrap_or(0), m.score.home.unwrap_or(0))
        };

        stats.played += 1;
        stats.goals_for += ours;
        stats.goals_against += theirs;

        let result = if ours > theirs {
            stats.wins += 1;
            stats.points += 3;
            FormResult::W
        } else if ours == theirs {
            stats.draws += 1;
            stats.points += 1;
            FormResult::D
        } else {
            stats.losses += 1;
            FormResult::L
        };

        if theirs == 0 {
            stats.clean_sheets += 1;
        }
        results.push((m, result));
    }

    stats.goal_difference = stats.goals_for as i32 - stats.goals_against as i32;
    stats.win_rate = win_rate(stats.wins, stats.played);

    results.sort_by_key(|(m, _)| m.kickoff_time);
    let skip = results.len().saturating_sub(FORM_LENGTH);
    stats.form = results.into_iter().skip(skip).map(|(_, r)| r).collect();

    stats
}

/// Win percentage rounded to one decimal; 0 when nothing was played.
fn win_rate(wins: u32, played: u32) -> f64 {
    if played == 0 {
        return 0.0;
    }
    (f64::from(wins) / f64::from(played) * 1000.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Competition, Odds, Score, Sport, TeamRef};
    use chrono::{Duration, TimeZone, Utc};

    fn fixture(id: i64, home: i64, away: i64, score: (u32, u32), status: &str, day: i64) -> Match {
        Match {
            id,
            sport: Sport::Football,
            kickoff_time: Utc.with_ymd_and_hms(2024, 1, 1, 15, 0, 0).unwrap() + Duration::days(day),
            status: status.to_string(),
            home_team: TeamRef { id: home, name: format!("Team {home}"), ..TeamRef::default() },
            away_team: TeamRef { id: away, name: format!("Team {away}"), ..TeamRef::default() },
            score: Score { home: Some(score.0), away: Some(score.1) },
            competition: Competition { id: 2021, name: "Premier League".into(), emblem: None },
            odds: Odds::NEUTRAL,
            venue: None,
            matchday: None,
        }
    }

    #[test]
    fn test_three_wins_one_draw_one_loss() {
        let matches = vec![
            fixture(1, 2, 9, (2, 0), "FINISHED", 0),
            fixture(2, 8, 2, (0, 1), "FINISHED", 7),
            fixture(3, 2, 7, (1, 1), "FINISHED", 14),
            fixture(4, 6, 2, (2, 1), "FINISHED", 21),
            fixture(5, 2, 5, (2, 0), "FINISHED", 28),
        ];
        let stats = derive_football_stats(2, &matches);

        assert_eq!(stats.played, 5);
        assert_eq!(stats.wins, 3);
        assert_eq!(stats.draws, 1);
        assert_eq!(stats.losses, 1);
        assert_eq!(stats.points, 10);
        assert_eq!(stats.goals_for, 7);
        assert_eq!(stats.goals_against, 3);
        assert_eq!(stats.goal_difference, 4);
        assert_eq!(stats.clean_sheets, 3);
        assert_eq!(stats.win_rate, 60.0);
        assert_eq!(
            stats.form,
            vec![FormResult::W, FormResult::W, FormResult::D, FormResult::L, FormResult::W]
        );
    }

    #[test]
    fn test_unfinished_matches_ignored() {
        let matches = vec![
            fixture(1, 2, 9, (2, 0), "FINISHED", 0),
            fixture(2, 2, 8, (0, 0), "SCHEDULED", 7),
            fixture(3, 2, 7, (0, 0), "IN_PLAY", 8),
        ];
        let stats = derive_football_stats(2, &matches);
        assert_eq!(stats.played, 1);
        assert_eq!(stats.win_rate, 100.0);
    }

    #[test]
    fn test_no_matches_guards_division() {
        let stats = derive_football_stats(2, &[]);
        assert_eq!(stats.played, 0);
        assert_eq!(stats.win_rate, 0.0);
        assert!(stats.form.is_empty());
    }

    #[test]
    fn test_order_independent_totals() {
        let mut matches = vec![
            fixture(1, 2, 9, (3, 1), "FINISHED", 0),
            fixture(2, 8, 2, (2, 2), "FINISHED", 7),
            fixture(3, 2, 7, (0, 1), "FINISHED", 14),
        ];
        let forward = derive_football_stats(2, &matches);
        matches.reverse();
        let backward = derive_football_stats(2, &matches);
        assert_eq!(forward, backward);
        assert_eq!(forward.win_rate, 33.3);
    }

    #[test]
    fn test_form_keeps_latest_five() {
        let matches: Vec<Match> = (0..7)
            .map(|i| {
                let score = if i < 2 { (0, 1) } else { (1, 0) };
                fixture(i, 2, 9, score, "FINISHED", i)
            })
            .collect();
        let stats = derive_football_stats(2, &matches);
        assert_eq!(stats.form, vec![FormResult::W; 5]);
    }
}
