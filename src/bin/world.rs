//! dune-world-sim binary
//!
//! Runs a headless session: the autopilot drives across a procedurally
//! streamed desert, shelling targets, while every world event is written to
//! stdout as one JSON object per line.
//!
//! ## Configuration (TOML via `--config`, env, flags)
//!
//! | Key                       | Default   | Description                        |
//! |---------------------------|-----------|------------------------------------|
//! | `DUNE_WORLD__WORLD_SEED`  | `42`      | World seed                         |
//! | `DUNE_WORLD__VIEW_DISTANCE` | `1`     | Chebyshev streaming radius (chunks) |
//! | `DUNE_AGENT__TICK_RATE_HZ`| `30`      | Simulation tick rate               |
//! | `DUNE_AGENT__SESSION`     | `default` | Session name stamped on events     |
//! | `DUNE_SEED`               |           | Same as `--seed`; beats the file   |
//!
//! Command-line flags override both.

use anyhow::{Context, Result};
use clap::Parser;
use dune_world::{
    agent::{Autopilot, WorldAgent},
    session::GameSession,
    settings::Settings,
    terrain::{DuneTerrain, FlatTerrain, TerrainSource},
};
use parking_lot::Mutex;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::mpsc;

// ---------------------------------------------------------------------------
// CLI
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(name = "dune-world-sim", about = "Dune World headless simulation", version)]
struct Args {
    /// TOML configuration file
    #[arg(long, short)]
    config: Option<PathBuf>,

    /// World seed (overrides configuration)
    #[arg(long, env = "DUNE_SEED")]
    seed: Option<u64>,

    /// Streaming radius in chunks (overrides configuration)
    #[arg(long)]
    view_distance: Option<i32>,

    /// Tick rate in Hz (overrides configuration)
    #[arg(long)]
    tick_rate_hz: Option<f32>,

    /// Stop after this many ticks (runs until Ctrl-C otherwise)
    #[arg(long)]
    ticks: Option<u64>,

    /// Initial autopilot heading in degrees from +X
    #[arg(long, default_value_t = 0.0)]
    heading: f32,

    /// Use flat ground instead of dunes
    #[arg(long)]
    flat: bool,

    /// Do not print events to stdout
    #[arg(long)]
    quiet: bool,
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Initialise logging (stderr, so stdout stays pure JSON lines)
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("dune_world=info".parse()?),
        )
        .init();

    let args = Args::parse();

    let mut settings =
        Settings::load(args.config.as_deref()).context("Failed to load settings")?;
    if let Some(seed) = args.seed {
        settings.world.world_seed = seed;
    }
    if let Some(view_distance) = args.view_distance {
        settings.world.view_distance = view_distance;
    }
    if let Some(hz) = args.tick_rate_hz {
        settings.agent.tick_rate_hz = hz;
    }
    settings.validate().context("Invalid command-line overrides")?;

    log::info!(
        "Starting dune-world-sim (session='{}', seed={}, chunk_size={}, view_distance={})",
        settings.agent.session,
        settings.world.world_seed,
        settings.world.chunk_size,
        settings.world.view_distance,
    );

    let terrain: Arc<dyn TerrainSource> = if args.flat {
        Arc::new(FlatTerrain::default())
    } else {
        Arc::new(DuneTerrain::new(settings.world.world_seed))
    };

    let session = Arc::new(Mutex::new(GameSession::new(
        settings.world.clone(),
        settings.artillery.clone(),
        terrain,
    )));

    // Event writer task
    let (tx, mut rx) = mpsc::channel::<bytes::Bytes>(1024);
    let quiet = args.quiet;
    let writer = tokio::spawn(async move {
        let stdout = std::io::stdout();
        while let Some(line) = rx.recv().await {
            if quiet {
                continue;
            }
            let mut out = stdout.lock();
            if out.write_all(&line).and_then(|_| out.write_all(b"\n")).is_err() {
                break;
            }
        }
    });

    let agent = WorldAgent::new(settings.agent.clone(), session)
        .with_autopilot(Autopilot::new(args.heading.to_radians()));
    let summary = agent.run(tx, args.ticks).await?;

    writer.await.context("Event writer task failed")?;

    log::info!(
        "Finished after {} ticks: {}",
        summary.ticks,
        serde_json::to_string(&summary.stats)?
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::Args;
    use clap::CommandFactory;
    use std::ffi::OsStr;

    #[test]
    fn cli_is_well_formed() {
        Args::command().debug_assert();
    }

    #[test]
    fn seed_flag_reads_prefixed_env() {
        let cmd = Args::command();
        let seed = cmd
            .get_arguments()
            .find(|a| a.get_id() == "seed")
            .unwrap();
        assert_eq!(seed.get_env(), Some(OsStr::new("DUNE_SEED")));
    }
}
