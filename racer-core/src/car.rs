use serde::Serialize;

use crate::sprite::SpriteShape;

/// Stable car identity. Doubles as the update-order rank: cars are always
/// simulated in ascending id (creation) order, which is what makes contested
/// collision and steering resolutions reproducible.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct CarId(pub(crate) u32);

impl CarId {
    pub fn index(&self) -> usize {
        self.0 as usize
    }
}

/// Who decides a car's lateral intent each tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum ControlSource {
    /// Held-key intents supplied through `World::set_input`.
    PlayerInput,
    /// The look-ahead steering heuristic; no input, no inertia.
    HeuristicAi,
}

/// Held-key intents for one controlled player, sampled once per tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct PlayerInput {
    pub steer_left: bool,
    pub steer_right: bool,
    pub accelerate: bool,
    pub brake: bool,
}

#[derive(Clone, Debug)]
pub(crate) struct Car {
    pub(crate) control: ControlSource,
    pub(crate) shape: SpriteShape,
    /// Longitudinal position in `[0, track_length)`.
    pub(crate) z: f32,
    pub(crate) prev_z: f32,
    /// Lateral offset in road-width units; `[-1, 1]` is on the road.
    pub(crate) x: f32,
    /// Lateral velocity, player-controlled cars only (already per-tick).
    pub(crate) dx: f32,
    pub(crate) speed: f32,
    /// Speed an AI car accelerates back to after a crash and never exceeds.
    pub(crate) cruise_speed: f32,
    pub(crate) lap: u32,
    pub(crate) current_lap_time: f32,
    pub(crate) lap_times: Vec<f32>,
    /// Frames left in a crash stall, or -1 when not stalled.
    pub(crate) reset_timer: i32,
    pub(crate) finished: bool,
    /// 1-based rank while racing; 0 before the first ranking.
    pub(crate) place: u32,
    pub(crate) input: PlayerInput,
    /// Segment currently listing this car, with its slot in that list.
    pub(crate) segment: usize,
    pub(crate) slot: usize,
}

impl Car {
    pub(crate) fn new(control: ControlSource, shape: SpriteShape) -> Self {
        Self {
            control,
            shape,
            z: 0.0,
            prev_z: 0.0,
            x: 0.0,
            dx: 0.0,
            speed: 0.0,
            cruise_speed: 0.0,
            lap: 1,
            current_lap_time: 0.0,
            lap_times: Vec::new(),
            reset_timer: -1,
            finished: false,
            place: 0,
            input: PlayerInput::default(),
            segment: 0,
            slot: 0,
        }
    }

    pub(crate) fn reset_race_bookkeeping(&mut self) {
        self.lap = 1;
        self.current_lap_time = 0.0;
        self.lap_times.clear();
        self.finished = false;
        self.place = 0;
    }
}
