//! Team-mention detection and stats rendering for prompt enrichment.
//!
//! A case-insensitive substring heuristic, not a parser: overlapping names
//! can both match, and nothing breaks the tie.

use crate::types::{Match, Team, TeamStats};

pub const STATS_HEADER: &str = "\n\nTeam Statistics:\n";

/// A team recognised in a prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mention {
    pub id: i64,
    pub name: String,
}

/// Teams named in `prompt`, first by scanning `teams` (name or short
/// name), then, if none matched, the sides of `matches`. Deduplicated by
/// id, first occurrence wins.
pub fn find_mentions(prompt: &str, teams: &[Team], matches: &[Match]) -> Vec<Mention> {
    let haystack = prompt.to_lowercase();
    let mentioned = |name: &str| !name.is_empty() && haystack.contains(&name.to_lowercase());

    let mut found: Vec<Mention> = teams
        .iter()
        .filter(|t| mentioned(&t.name) || t.short_name.as_deref().is_some_and(mentioned))
        .map(|t| Mention { id: t.id, name: t.name.clone() })
        .collect();

    if found.is_empty() {
        for side in matches.iter().flat_map(|m| [&m.home_team, &m.away_team]) {
            if mentioned(&side.name) {
                found.push(Mention { id: side.id, name: side.name.clone() });
            }
        }
    }

    let mut unique: Vec<Mention> = Vec::with_capacity(found.len());
    for mention in found {
        if !unique.iter().any(|u| u.id == mention.id) {
            unique.push(mention);
        }
    }
    unique
}

/// One `"\n{name}:\n{pretty json}\n"` block.
pub fn stats_block(name: &str, stats: &TeamStats) -> String {
    let json = serde_json::to_string_pretty(stats).unwrap_or_else(|_| "{}".to_string());
    format!("\n{name}:\n{json}\n")
}
