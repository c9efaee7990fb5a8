use chrono::{Duration, NaiveDateTime};
use clap::Args;
use wayfinder_core::reveal::{entropy_sampler, seeded_sampler};
use wayfinder_core::{Clock, Config, Engine, ManualClock, SystemClock};

use super::{parse_at, CommandResult};

#[derive(Args)]
pub struct SuggestArgs {
    /// Route the visitor lands on
    #[arg(long)]
    pub route: String,
    /// Earlier routes in this session, oldest first (repeatable)
    #[arg(long = "visit")]
    pub visits: Vec<String>,
    /// Local wall time, e.g. "2026-03-02 02:00" (defaults to now)
    #[arg(long, value_parser = parse_at)]
    pub at: Option<NaiveDateTime>,
    /// Seed for reveal jitter
    #[arg(long)]
    pub seed: Option<u64>,
    /// Print the full snapshot as JSON
    #[arg(long)]
    pub json: bool,
}

/// Seconds between replayed visits.
const VISIT_GAP_SECS: i64 = 1;

pub fn run(args: SuggestArgs) -> CommandResult {
    let config = Config::load_or_default();
    let at = args.at.unwrap_or_else(|| SystemClock.now());

    // Replay so that the final navigation happens at `at`.
    let replay = Duration::seconds(VISIT_GAP_SECS * args.visits.len() as i64);
    let clock = ManualClock::new(at - replay);
    let sampler = match args.seed {
        Some(seed) => seeded_sampler(seed),
        None => entropy_sampler(),
    };
    let mut engine = Engine::new(config, clock.clone()).with_sampler(sampler);

    for visit in &args.visits {
        engine.on_route_changed(visit);
        clock.advance(Duration::seconds(VISIT_GAP_SECS));
    }
    engine.on_route_changed(&args.route);

    let snapshot = engine.snapshot();
    if args.json {
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
        return Ok(());
    }

    println!("Route: {}", args.route);
    println!("Time: {}", snapshot.at.format("%Y-%m-%d %H:%M"));
    println!(
        "Emergency mode: {}",
        if snapshot.emergency_mode { "on" } else { "off" }
    );

    println!("\nActions:");
    if snapshot.contextual_actions.is_empty() {
        println!("  (none)");
    }
    for action in &snapshot.contextual_actions {
        println!(
            "  [{:<6}] {:<20} -> {} ({})",
            action.priority, action.label, action.destination, action.kind
        );
    }

    println!("\nReveal plan:");
    for pending in &snapshot.pending_reveals {
        println!(
            "  +{:>5}ms  [{}] {}",
            pending.delay_ms, pending.suggestion.priority, pending.suggestion.text
        );
    }
    Ok(())
}
