use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use racer_autopilot::bots;
use racer_autopilot::runner::{self, RaceSpec};

// 30 simulated minutes at the fixed 60 fps step.
const DEFAULT_MAX_TICKS: u64 = 108_000;

#[derive(Parser)]
#[command(
    name = "racer-autopilot",
    about = "Headless driver for the racer simulation core"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run one race and print its metrics as JSON.
    Race {
        #[arg(long, default_value = "flatout")]
        bot: String,
        #[arg(long, default_value_t = 0xC0FF_EE00)]
        seed: u32,
        #[arg(long, default_value_t = 3)]
        laps: u32,
        #[arg(long, default_value_t = 10)]
        traffic: usize,
        /// Tick budget; falls back to RACER_MAX_TICKS, then 30 sim-minutes.
        #[arg(long)]
        max_ticks: Option<u64>,
    },
    /// Run one bot across a contiguous seed range in parallel.
    Batch {
        #[arg(long, default_value = "flatout")]
        bot: String,
        #[arg(long, default_value_t = 1)]
        start_seed: u32,
        #[arg(long, default_value_t = 16)]
        count: u32,
        #[arg(long, default_value_t = 3)]
        laps: u32,
        #[arg(long, default_value_t = 10)]
        traffic: usize,
        #[arg(long)]
        max_ticks: Option<u64>,
    },
    /// Replay one race twice and confirm the fingerprints agree.
    Verify {
        #[arg(long, default_value = "weaver")]
        bot: String,
        #[arg(long, default_value_t = 0xC0FF_EE00)]
        seed: u32,
        #[arg(long, default_value_t = 1)]
        laps: u32,
        #[arg(long, default_value_t = 10)]
        traffic: usize,
        #[arg(long)]
        max_ticks: Option<u64>,
    },
    /// List the available bots.
    Bots,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    match Cli::parse().command {
        Command::Race {
            bot,
            seed,
            laps,
            traffic,
            max_ticks,
        } => {
            let spec = RaceSpec {
                bot_id: &bot,
                seed,
                laps,
                traffic,
                max_ticks: resolve_max_ticks(max_ticks),
            };
            let artifact = runner::run_race(&spec)?;
            println!("{}", serde_json::to_string_pretty(&artifact.metrics)?);
        }
        Command::Batch {
            bot,
            start_seed,
            count,
            laps,
            traffic,
            max_ticks,
        } => {
            let summary = runner::run_batch(
                &bot,
                start_seed,
                count,
                laps,
                traffic,
                resolve_max_ticks(max_ticks),
            )?;
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
        Command::Verify {
            bot,
            seed,
            laps,
            traffic,
            max_ticks,
        } => {
            let spec = RaceSpec {
                bot_id: &bot,
                seed,
                laps,
                traffic,
                max_ticks: resolve_max_ticks(max_ticks),
            };
            let first = runner::run_race(&spec)?;
            let second = runner::run_race(&spec)?;
            if first.metrics.fingerprint != second.metrics.fingerprint {
                return Err(anyhow!(
                    "replay diverged: 0x{:016x} vs 0x{:016x}",
                    first.metrics.fingerprint,
                    second.metrics.fingerprint
                ));
            }
            println!(
                "deterministic over {} ticks, fingerprint 0x{:016x}",
                first.metrics.ticks, first.metrics.fingerprint
            );
        }
        Command::Bots => {
            for id in bots::bot_ids() {
                let bot = bots::create_bot(id).ok_or_else(|| anyhow!("bot {id} missing"))?;
                println!("{:<10} {}", bot.id(), bot.description());
            }
        }
    }
    Ok(())
}

fn resolve_max_ticks(flag: Option<u64>) -> u64 {
    flag.unwrap_or_else(|| read_env_u64("RACER_MAX_TICKS", DEFAULT_MAX_TICKS))
}

fn read_env_u64(name: &str, default: u64) -> u64 {
    std::env::var(name)
        .ok()
        .and_then(|value| value.parse::<u64>().ok())
        .filter(|value| *value > 0)
        .unwrap_or(default)
}
