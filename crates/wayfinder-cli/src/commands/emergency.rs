use chrono::{Duration, NaiveDateTime};
use clap::Args;
use wayfinder_core::{BehaviorTracker, Clock, Config, EmergencyDetector, RouteRegistry, SystemClock};

use super::{parse_at, CommandResult};

#[derive(Args)]
pub struct EmergencyArgs {
    /// Route to evaluate
    #[arg(long, default_value = "/")]
    pub route: String,
    /// Earlier routes in this session, oldest first (repeatable)
    #[arg(long = "visit")]
    pub visits: Vec<String>,
    /// Local wall time, e.g. "2026-12-25 12:00" (defaults to now)
    #[arg(long, value_parser = parse_at)]
    pub at: Option<NaiveDateTime>,
    /// Print the assessment as JSON
    #[arg(long)]
    pub json: bool,
}

/// Seconds between replayed visits.
const VISIT_GAP_SECS: i64 = 1;

pub fn run(args: EmergencyArgs) -> CommandResult {
    let config = Config::load_or_default();
    let at = args.at.unwrap_or_else(|| SystemClock.now());

    // Replay so that the final navigation happens at `at`.
    let mut visited_at = at - Duration::seconds(VISIT_GAP_SECS * args.visits.len() as i64);
    let mut behavior = BehaviorTracker::with_limits(visited_at, &config.limits);
    for visit in &args.visits {
        behavior.on_route_changed(visit, visited_at);
        visited_at += Duration::seconds(VISIT_GAP_SECS);
    }
    behavior.on_route_changed(&args.route, at);

    let detector = EmergencyDetector::from_config(&config);
    let registry = RouteRegistry::standard();
    let assessment = detector.assess(&args.route, behavior.state(), &registry, at);

    if args.json {
        let json = serde_json::json!({
            "route": args.route,
            "at": at,
            "emergency_mode": assessment.is_emergency(),
            "reasons": assessment,
        });
        println!("{}", serde_json::to_string_pretty(&json)?);
        return Ok(());
    }

    println!(
        "Emergency mode: {}",
        if assessment.is_emergency() { "on" } else { "off" }
    );
    if assessment.after_hours {
        println!(
            "  after hours (open {:02}:00-{:02}:00)",
            config.hours.open_hour, config.hours.close_hour
        );
    }
    if let Some(name) = &assessment.holiday {
        println!("  holiday: {name}");
    }
    if assessment.emergency_route {
        println!("  {} is an emergency route", args.route);
    }
    if assessment.rapid_revisits {
        println!(
            "  rapid revisits ({} visits to {})",
            behavior.state().visit_count(&args.route),
            args.route
        );
    }
    Ok(())
}
