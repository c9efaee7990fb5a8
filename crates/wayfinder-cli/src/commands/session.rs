use std::time::Duration;

use clap::Args;
use tokio::sync::mpsc;
use wayfinder_core::reveal::{entropy_sampler, seeded_sampler};
use wayfinder_core::{Config, Engine, Event, SessionCommand, SessionDriver, SystemClock};

use super::CommandResult;

#[derive(Args)]
pub struct SessionArgs {
    /// Routes to visit in order (repeatable)
    #[arg(long = "route", required = true)]
    pub routes: Vec<String>,
    /// Seconds to stay on each route
    #[arg(long, default_value = "10")]
    pub dwell_secs: u64,
    /// Seed for reveal jitter
    #[arg(long)]
    pub seed: Option<u64>,
    /// Print events as JSON lines
    #[arg(long)]
    pub json: bool,
}

pub fn run(args: SessionArgs) -> CommandResult {
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(drive(args))
}

async fn drive(args: SessionArgs) -> CommandResult {
    let config = Config::load_or_default();
    let sampler = match args.seed {
        Some(seed) => seeded_sampler(seed),
        None => entropy_sampler(),
    };
    let engine = Engine::new(config, SystemClock).with_sampler(sampler);

    let (cmd_tx, cmd_rx) = mpsc::channel(16);
    let (event_tx, mut event_rx) = mpsc::unbounded_channel();
    let driver = tokio::spawn(SessionDriver::new(engine).run(cmd_rx, event_tx));

    let json = args.json;
    let printer = tokio::spawn(async move {
        while let Some(event) = event_rx.recv().await {
            print_event(&event, json);
        }
    });

    let dwell = Duration::from_secs(args.dwell_secs);
    for route in args.routes {
        cmd_tx.send(SessionCommand::Navigate(route)).await?;
        tokio::time::sleep(dwell).await;
    }
    cmd_tx.send(SessionCommand::Shutdown).await?;

    let engine = driver.await?;
    drop(engine);
    printer.await?;
    Ok(())
}

fn print_event(event: &Event, json: bool) {
    if json {
        match serde_json::to_string(event) {
            Ok(line) => println!("{line}"),
            Err(e) => tracing::warn!(error = %e, "failed to encode event"),
        }
        return;
    }

    match event {
        Event::RouteChanged { to, at, .. } => println!("{} navigate {to}", at.format("%H:%M:%S")),
        Event::EmergencyModeChanged { active, at } => {
            println!(
                "{} emergency mode {}",
                at.format("%H:%M:%S"),
                if *active { "on" } else { "off" }
            )
        }
        Event::RevealsCancelled {
            cancelled, cleared, at, ..
        } => println!(
            "{} cancelled {cancelled} pending, cleared {cleared} visible",
            at.format("%H:%M:%S")
        ),
        Event::RevealScheduled { key, delay_ms, .. } => {
            println!("         scheduled {key} in {delay_ms}ms")
        }
        Event::SuggestionRevealed { text, at, .. } => {
            println!("{} reveal: {text}", at.format("%H:%M:%S"))
        }
        Event::ActionTracked {
            action_id, count, ..
        } => println!("         tracked {action_id} ({count})"),
    }
}
