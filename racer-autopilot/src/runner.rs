//! Drives the simulation core at its fixed step from setup to chequered
//! flag, collecting metrics and a replay fingerprint along the way.

use anyhow::{anyhow, Context, Result};
use rayon::prelude::*;
use serde::Serialize;

use racer_core::{sprite, Tuning, World, WorldConfig, WorldSnapshot};

use crate::bots::{create_bot, DriverBot};
use crate::track_builder;

const FNV_OFFSET_BASIS: u64 = 0xCBF2_9CE4_8422_2325;

#[derive(Clone, Copy, Debug)]
pub struct RaceSpec<'a> {
    pub bot_id: &'a str,
    pub seed: u32,
    pub laps: u32,
    pub traffic: usize,
    pub max_ticks: u64,
}

#[derive(Clone, Debug, Serialize)]
pub struct RaceMetrics {
    pub bot_id: String,
    pub seed: u32,
    pub laps: u32,
    pub traffic: usize,
    pub ticks: u64,
    pub sim_seconds: f32,
    pub finished: bool,
    pub final_place: u32,
    pub lap_times: Vec<f32>,
    pub best_lap: Option<f32>,
    pub crashes: u32,
    pub top_speed: f32,
    pub fingerprint: u64,
}

#[derive(Clone, Debug)]
pub struct RaceArtifact {
    pub metrics: RaceMetrics,
    pub final_snapshot: WorldSnapshot,
}

#[derive(Clone, Debug, Serialize)]
pub struct BatchSummary {
    pub bot_id: String,
    pub finished_runs: usize,
    pub total_crashes: u32,
    pub best_lap: Option<f32>,
    pub runs: Vec<RaceMetrics>,
}

#[inline]
fn mix_u64(hash: u64, value: u64) -> u64 {
    hash.wrapping_mul(0x0000_0100_0000_01B3) ^ value
}

/// Order-sensitive digest of every car's physical state.
pub fn snapshot_fingerprint(snapshot: &WorldSnapshot) -> u64 {
    let mut hash = FNV_OFFSET_BASIS;
    hash = mix_u64(hash, snapshot.tick);
    for car in &snapshot.cars {
        hash = mix_u64(hash, car.z.to_bits() as u64);
        hash = mix_u64(hash, car.x.to_bits() as u64);
        hash = mix_u64(hash, car.speed.to_bits() as u64);
        hash = mix_u64(hash, car.segment as u64);
        hash = mix_u64(hash, car.lap as u64);
        hash = mix_u64(hash, car.place as u64);
        hash = mix_u64(hash, car.reset_timer as i64 as u64);
    }
    hash
}

pub fn run_race(spec: &RaceSpec) -> Result<RaceArtifact> {
    let mut bot = create_bot(spec.bot_id).ok_or_else(|| anyhow!("unknown bot '{}'", spec.bot_id))?;
    run_bot_instance(bot.as_mut(), spec)
}

pub fn run_bot_instance(bot: &mut dyn DriverBot, spec: &RaceSpec) -> Result<RaceArtifact> {
    if spec.max_ticks == 0 {
        return Err(anyhow!("max_ticks must be > 0"));
    }
    bot.reset(spec.seed);

    let mut world = World::new(WorldConfig::default(), Tuning::default(), spec.seed)
        .context("world setup")?;
    track_builder::build_default_track(&mut world);
    track_builder::scatter_decorations(&mut world, spec.seed).context("decoration scatter")?;
    track_builder::mark_start_and_finish(&mut world).context("start/finish bands")?;
    let player = world.add_player(sprite::PLAYER).context("player setup")?;
    world.spawn_traffic(spec.traffic).context("traffic setup")?;
    world.start_race(spec.laps).context("race start")?;

    tracing::info!(
        bot = spec.bot_id,
        seed = spec.seed,
        laps = spec.laps,
        traffic = spec.traffic,
        segments = world.track().len(),
        "race start"
    );

    let dt = world.step();
    let mut fingerprint = FNV_OFFSET_BASIS;
    let mut crashes = 0u32;
    let mut was_stalled = false;
    let mut top_speed = 0.0f32;
    let mut last_lap = 1u32;
    let mut ticks = 0u64;
    let mut snapshot = world.snapshot();

    while ticks < spec.max_ticks {
        let me = *snapshot
            .car(player)
            .ok_or_else(|| anyhow!("player car missing from snapshot"))?;
        world.set_input(player, bot.next_input(&me, &snapshot));
        world.update(dt);
        snapshot = world.snapshot();
        ticks += 1;

        let me = *snapshot
            .car(player)
            .ok_or_else(|| anyhow!("player car missing from snapshot"))?;
        let stalled = me.reset_timer > 0;
        if stalled && !was_stalled {
            crashes += 1;
            tracing::debug!(tick = ticks, z = f64::from(me.z), "player crashed");
        }
        was_stalled = stalled;
        top_speed = top_speed.max(me.speed);
        if me.lap > last_lap {
            last_lap = me.lap;
            let time = snapshot
                .player(player)
                .and_then(|view| view.last_lap_time)
                .unwrap_or(0.0);
            tracing::info!(
                lap = me.lap - 1,
                time = f64::from(time),
                place = me.place,
                "lap complete"
            );
        }
        fingerprint = mix_u64(fingerprint, snapshot_fingerprint(&snapshot));
        if me.finished {
            break;
        }
    }

    let view = snapshot
        .player(player)
        .ok_or_else(|| anyhow!("player missing from final snapshot"))?
        .clone();
    let best_lap = view
        .lap_times
        .iter()
        .copied()
        .fold(None, |best: Option<f32>, time| {
            Some(best.map_or(time, |b| b.min(time)))
        });

    tracing::info!(
        ticks,
        finished = view.finished,
        place = view.place,
        crashes,
        "race over"
    );

    Ok(RaceArtifact {
        metrics: RaceMetrics {
            bot_id: spec.bot_id.to_string(),
            seed: spec.seed,
            laps: spec.laps,
            traffic: spec.traffic,
            ticks,
            sim_seconds: ticks as f32 * dt,
            finished: view.finished,
            final_place: view.place,
            lap_times: view.lap_times.clone(),
            best_lap,
            crashes,
            top_speed,
            fingerprint,
        },
        final_snapshot: snapshot,
    })
}

/// Runs the same bot across a contiguous seed range, one race per rayon
/// worker.
pub fn run_batch(
    bot_id: &str,
    start_seed: u32,
    count: u32,
    laps: u32,
    traffic: usize,
    max_ticks: u64,
) -> Result<BatchSummary> {
    if create_bot(bot_id).is_none() {
        return Err(anyhow!("unknown bot '{bot_id}'"));
    }

    let runs = (0..count)
        .into_par_iter()
        .map(|offset| {
            let spec = RaceSpec {
                bot_id,
                seed: start_seed.wrapping_add(offset),
                laps,
                traffic,
                max_ticks,
            };
            run_race(&spec).map(|artifact| artifact.metrics)
        })
        .collect::<Result<Vec<RaceMetrics>>>()?;

    let finished_runs = runs.iter().filter(|run| run.finished).count();
    let total_crashes = runs.iter().map(|run| run.crashes).sum();
    let best_lap = runs
        .iter()
        .filter_map(|run| run.best_lap)
        .fold(None, |best: Option<f32>, time| {
            Some(best.map_or(time, |b| b.min(time)))
        });

    Ok(BatchSummary {
        bot_id: bot_id.to_string(),
        finished_runs,
        total_crashes,
        best_lap,
        runs,
    })
}
