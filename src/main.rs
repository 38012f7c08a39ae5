//! SportsDesk: multi-provider sports data for a betting assistant
//!
//! Entry point. Loads configuration, initialises structured logging,
//! then prints the active sport's leagues and fixtures and, if given,
//! the stats-enriched version of a prompt.
//!
//! Usage: `sportsdesk [sport] [prompt...]`

use anyhow::Result;
use tracing::{info, warn};

use sportsdesk::aggregator::Aggregator;
use sportsdesk::config;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (non-fatal if missing)
    let _ = dotenv::dotenv();

    let cfg = config::AppConfig::load_or_default("config.toml")?;
    init_logging();

    let mut args = std::env::args().skip(1);
    let sport = args.next();
    let prompt = args.collect::<Vec<_>>().join(" ");

    let mut desk = Aggregator::from_config(&cfg)?;
    if let Some(sport) = sport.as_deref() {
        desk.set_active_sport(sport)?;
    }

    let session = desk.session().clone();
    info!(
        sport = %session.sport,
        league_id = session.league_id,
        from = %session.date_from,
        to = %session.date_to,
        "SportsDesk starting up"
    );

    let leagues = desk.load_leagues().await?;
    println!("Leagues ({}):", session.sport);
    for league in &leagues {
        println!("  [{}] {} ({})", league.id, league.name, league.country);
    }

    let matches = desk.load_matches().await?;
    if matches.is_empty() {
        warn!(sport = %session.sport, "No fixtures in the current window");
    }
    println!("\nFixtures {} to {}:", session.date_from, session.date_to);
    for m in &matches {
        println!(
            "  {:<18} {} vs {}  [{} - {}]  {:.2}/{:.2}/{:.2}  {}",
            m.time, m.home_team, m.away_team, m.score.home, m.score.away,
            m.odds.home, m.odds.draw, m.odds.away, m.status,
        );
    }

    if !prompt.is_empty() {
        let enhanced = desk.generate_enhanced_prompt(&prompt).await?;
        println!("\nPrompt:\n{enhanced}");
    }

    let stats = desk.client_mut().cache_stats();
    info!(hits = stats.hits, misses = stats.misses, entries = stats.entries, "SportsDesk done");
    Ok(())
}

/// Initialise the `tracing` subscriber.
fn init_logging() {
    use tracing_subscriber::{fmt, EnvFilter};

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("sportsdesk=info"));

    let json_logging = std::env::var("SPORTSDESK_LOG_JSON").is_ok();

    if json_logging {
        fmt()
            .json()
            .with_env_filter(env_filter)
            .with_target(true)
            .with_thread_ids(true)
            .init();
    } else {
        fmt()
            .with_env_filter(env_filter)
            .with_target(true)
            .init();
    }
}
