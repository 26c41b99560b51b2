//! Scripted input policies standing in for a human player. A bot sees only
//! the public snapshots and emits held-key intents, exactly like the real
//! input collaborator would.

use racer_core::{CarSnapshot, PlayerInput, WorldSnapshot};

pub trait DriverBot {
    fn id(&self) -> &'static str;
    fn description(&self) -> &'static str;
    fn reset(&mut self, seed: u32);
    fn next_input(&mut self, me: &CarSnapshot, world: &WorldSnapshot) -> PlayerInput;
}

/// Throttle pinned, steering only to stay out of the dirt.
pub struct FlatOut;

impl DriverBot for FlatOut {
    fn id(&self) -> &'static str {
        "flatout"
    }

    fn description(&self) -> &'static str {
        "holds the throttle and recentres when drifting wide"
    }

    fn reset(&mut self, _seed: u32) {}

    fn next_input(&mut self, me: &CarSnapshot, _world: &WorldSnapshot) -> PlayerInput {
        PlayerInput {
            accelerate: true,
            brake: false,
            steer_left: me.x > 0.5,
            steer_right: me.x < -0.5,
        }
    }
}

/// Holds a target fraction of top speed with a coast band between throttle
/// and brake.
pub struct Cruiser {
    target: f32,
}

impl Default for Cruiser {
    fn default() -> Self {
        Self { target: 0.6 }
    }
}

impl DriverBot for Cruiser {
    fn id(&self) -> &'static str {
        "cruiser"
    }

    fn description(&self) -> &'static str {
        "holds 60% of top speed and keeps to the centre"
    }

    fn reset(&mut self, _seed: u32) {}

    fn next_input(&mut self, me: &CarSnapshot, world: &WorldSnapshot) -> PlayerInput {
        let target = self.target * world.max_speed;
        PlayerInput {
            accelerate: me.speed < target,
            brake: me.speed > target * 1.15,
            steer_left: me.x > 0.4,
            steer_right: me.x < -0.4,
        }
    }
}

/// Swings across the road on a fixed cadence; exercises the off-road and
/// collision paths without giving up determinism.
pub struct Weaver;

impl DriverBot for Weaver {
    fn id(&self) -> &'static str {
        "weaver"
    }

    fn description(&self) -> &'static str {
        "weaves lane to lane at full throttle"
    }

    fn reset(&mut self, _seed: u32) {}

    fn next_input(&mut self, _me: &CarSnapshot, world: &WorldSnapshot) -> PlayerInput {
        let phase = world.tick % 240;
        PlayerInput {
            accelerate: true,
            brake: false,
            steer_left: phase < 70,
            steer_right: (120..190).contains(&phase),
        }
    }
}

pub fn bot_ids() -> &'static [&'static str] {
    &["flatout", "cruiser", "weaver"]
}

pub fn create_bot(id: &str) -> Option<Box<dyn DriverBot>> {
    match id {
        "flatout" => Some(Box::new(FlatOut)),
        "cruiser" => Some(Box::new(Cruiser::default())),
        "weaver" => Some(Box::new(Weaver)),
        _ => None,
    }
}
