#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that runs Emberline combat scenarios headlessly.

mod player;
mod scenario;
mod simulation;

use std::{path::PathBuf, time::Duration};

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use scenario::Scenario;
use simulation::Simulation;

/// Runs a combat scenario and prints what happened.
#[derive(Debug, Parser)]
#[command(name = "emberline", version, about = "Headless Emberline combat simulation")]
struct Cli {
    /// Scenario file to run (TOML, or JSON for `.json` files).
    scenario: PathBuf,
    /// Overrides the tick length in milliseconds.
    #[arg(long, value_name = "MS")]
    tick_ms: Option<u64>,
    /// Overrides the maximum simulated duration in seconds.
    #[arg(long, value_name = "SECS")]
    duration_secs: Option<u64>,
    /// Prints the summary as JSON instead of plain text.
    #[arg(long)]
    json: bool,
}

/// Entry point for the Emberline command-line interface.
fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let scenario = Scenario::load(&cli.scenario)?;

    let tick = Duration::from_millis(cli.tick_ms.unwrap_or(scenario.tick_ms).max(1));
    let duration = Duration::from_secs(cli.duration_secs.unwrap_or(scenario.duration_secs));
    info!(
        scenario = %cli.scenario.display(),
        tick_ms = tick.as_millis() as u64,
        duration_secs = duration.as_secs(),
        "starting simulation"
    );

    let mut simulation = Simulation::new(&scenario)?;
    let summary = simulation.run(tick, duration);
    info!(
        outcome = summary.outcome.label(),
        died = summary.died,
        arrived = summary.arrived,
        survivors = summary.survivors,
        "simulation finished"
    );

    if cli.json {
        let rendered =
            serde_json::to_string_pretty(&summary).context("failed to render summary as json")?;
        println!("{rendered}");
    } else {
        println!("outcome:          {}", summary.outcome.label());
        println!("ticks:            {}", summary.ticks);
        println!("simulated time:   {} ms", summary.simulated_ms);
        println!("enemies spawned:  {}", summary.spawned);
        println!("spawns rejected:  {}", summary.spawn_rejections);
        println!("shots launched:   {}", summary.launched);
        println!("shots skipped:    {}", summary.skipped_shots);
        println!("shots landed:     {}", summary.landed);
        println!("enemies killed:   {}", summary.died);
        println!("enemies through:  {}", summary.arrived);
        println!("enemies left:     {}", summary.survivors);
        println!("waves started:    {}", summary.waves_started);
        println!("player health:    {}", summary.player_health);
        println!("gold:             {}", summary.gold);
    }

    Ok(())
}
