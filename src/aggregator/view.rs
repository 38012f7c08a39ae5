//! Presentation-ready projections of canonical records.

use chrono::{DateTime, FixedOffset, NaiveDate};
use serde::Serialize;

use crate::types::{Match, Odds};

/// Shown in place of a score the match doesn't have yet.
pub const NO_SCORE: &str = "-";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScoreView {
    pub home: String,
    pub away: String,
}

/// A fixture as the UI renders it.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchView {
    pub id: i64,
    pub home_team: String,
    pub away_team: String,
    pub home_team_id: i64,
    pub away_team_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub home_team_logo: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub away_team_logo: Option<String>,
    /// `"Today, 15:00"`, `"Tomorrow, 20:45"`, `"06/01/2024, 15:00"`.
    pub time: String,
    pub date: DateTime<FixedOffset>,
    pub status: String,
    pub league: String,
    pub league_id: i64,
    pub score: ScoreView,
    pub odds: Odds,
}

/// `"Today"` / `"Tomorrow"` relative to `reference`, else `dd/mm/yyyy`.
///
/// `reference` is read, never advanced: "tomorrow" is always computed as
/// a fresh successor of it.
pub fn relative_day_label(day: NaiveDate, reference: NaiveDate) -> String {
    if day == reference {
        "Today".to_string()
    } else if reference.succ_opt() == Some(day) {
        "Tomorrow".to_string()
    } else {
        day.format("%d/%m/%Y").to_string()
    }
}

fn score_text(score: Option<u32>) -> String {
    score.map_or_else(|| NO_SCORE.to_string(), |s| s.to_string())
}

impl MatchView {
    /// Project `m` for display in `offset`, labelling days against
    /// `reference` (a date in the same offset).
    pub fn from_match(m: &Match, reference: NaiveDate, offset: FixedOffset) -> Self {
        let local = m.kickoff_time.with_timezone(&offset);
        let label = relative_day_label(local.date_naive(), reference);

        Self {
            id: m.id,
            home_team: m.home_team.name.clone(),
            away_team: m.away_team.name.clone(),
            home_team_id: m.home_team.id,
            away_team_id: m.away_team.id,
            home_team_logo: m.home_team.crest.clone(),
            away_team_logo: m.away_team.crest.clone(),
            time: format!("{label}, {}", local.format("%H:%M")),
            date: local,
            status: m.status.clone(),
            league: m.competition.name.clone(),
            league_id: m.competition.id,
            score: ScoreView {
                home: score_text(m.score.home),
                away: score_text(m.score.away),
            },
            odds: m.odds,
        }
    }
}
