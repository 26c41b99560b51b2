//! The fixed-timestep race world. The external loop driver calls
//! [`World::update`] once per frame with a constant `dt`; everything else on
//! [`World`] is either one-time setup or a read-only query for the rendering
//! collaborator, safe to use between ticks.

use serde::Serialize;

use crate::car::{CarId, ControlSource, PlayerInput};
use crate::config::{Tuning, WorldConfig};
use crate::error::{InvariantCode, SetupError};
use crate::sprite::SpriteShape;
use crate::track::{ColorBand, Decoration, Track};

mod race;
mod steer;

use race::Race;

/// Per-car view for rendering and bots.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct CarSnapshot {
    pub id: CarId,
    pub control: ControlSource,
    pub shape: SpriteShape,
    pub z: f32,
    pub x: f32,
    pub speed: f32,
    pub segment: usize,
    /// Fraction of the way through the current segment, for interpolated
    /// rendering.
    pub percent_into_segment: f32,
    pub lap: u32,
    pub place: u32,
    pub reset_timer: i32,
    pub finished: bool,
}

/// Race bookkeeping for one controlled player.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PlayerSnapshot {
    pub id: CarId,
    pub lap: u32,
    pub current_lap_time: f32,
    pub last_lap_time: Option<f32>,
    pub lap_times: Vec<f32>,
    pub place: u32,
    pub finished: bool,
}

/// One segment's render-facing state, occupants included.
#[derive(Clone, Debug, Serialize)]
pub struct SegmentSnapshot {
    pub index: usize,
    pub curve: f32,
    pub p1_elevation: f32,
    pub p2_elevation: f32,
    pub color: ColorBand,
    pub decorations: Vec<Decoration>,
    pub occupants: Vec<CarId>,
}

/// Whole-world view taken between ticks.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct WorldSnapshot {
    pub tick: u64,
    pub race_active: bool,
    pub num_laps: u32,
    pub track_length: f32,
    pub max_speed: f32,
    pub cars: Vec<CarSnapshot>,
    pub players: Vec<PlayerSnapshot>,
}

impl WorldSnapshot {
    pub fn car(&self, id: CarId) -> Option<&CarSnapshot> {
        self.cars.get(id.index())
    }

    pub fn player(&self, id: CarId) -> Option<&PlayerSnapshot> {
        self.players.iter().find(|player| player.id == id)
    }
}

pub struct World {
    race: Race,
}

impl World {
    /// Builds an empty world. The track must be populated through
    /// [`World::add_segment`] before cars can exist.
    pub fn new(config: WorldConfig, tuning: Tuning, seed: u32) -> Result<Self, SetupError> {
        Ok(Self {
            race: Race::new(config, tuning, seed)?,
        })
    }

    pub fn config(&self) -> &WorldConfig {
        self.race.config()
    }

    pub fn tuning(&self) -> &Tuning {
        self.race.tuning()
    }

    /// Applies a new option set. Returns `true` when the change invalidated
    /// the track geometry; in that case the track and all cars are cleared
    /// and the caller must rebuild before racing again.
    pub fn apply_options(&mut self, config: WorldConfig) -> Result<bool, SetupError> {
        self.race.apply_options(config)
    }

    pub fn add_segment(&mut self, curve: f32, end_elevation: f32) {
        self.race.track_mut().add_segment(curve, end_elevation);
    }

    pub fn add_decoration(
        &mut self,
        segment: usize,
        shape: SpriteShape,
        offset: f32,
    ) -> Result<(), SetupError> {
        self.race.track_mut().add_decoration(segment, shape, offset)
    }

    pub fn set_color_band(&mut self, segment: usize, color: ColorBand) -> Result<(), SetupError> {
        self.race.track_mut().set_color_band(segment, color)
    }

    /// Registers a controlled player. Grid position is assigned by
    /// [`World::start_race`].
    pub fn add_player(&mut self, shape: SpriteShape) -> Result<CarId, SetupError> {
        self.race.add_player(shape)
    }

    /// Seeds `count` AI traffic cars at random offsets, segments and cruise
    /// speeds.
    pub fn spawn_traffic(&mut self, count: usize) -> Result<(), SetupError> {
        self.race.spawn_traffic(count)
    }

    /// Lines players up on the grid, resets lap bookkeeping for every car
    /// and activates lap/place tracking.
    pub fn start_race(&mut self, num_laps: u32) -> Result<(), SetupError> {
        self.race.start_race(num_laps)
    }

    /// Latches one player's held-key intents until the next call.
    pub fn set_input(&mut self, player: CarId, input: PlayerInput) {
        self.race.set_input(player, input);
    }

    /// Advances one fixed tick. `dt` is expected constant and equal to
    /// `tuning.step()`; the physics constants are tuned against it.
    pub fn update(&mut self, dt: f32) {
        self.race.update(dt);
    }

    pub fn snapshot(&self) -> WorldSnapshot {
        self.race.snapshot()
    }

    pub fn segment_snapshot(&self, index: usize) -> Option<SegmentSnapshot> {
        self.race.segment_snapshot(index)
    }

    pub fn track(&self) -> &Track {
        self.race.track()
    }

    pub fn track_length(&self) -> f32 {
        self.race.track().length()
    }

    pub fn max_speed(&self) -> f32 {
        self.race.max_speed()
    }

    /// Duration of one simulated frame.
    pub fn step(&self) -> f32 {
        self.race.tuning().step()
    }

    pub fn tick(&self) -> u64 {
        self.race.tick()
    }

    pub fn race_active(&self) -> bool {
        self.race.race_active()
    }

    pub fn players(&self) -> &[CarId] {
        self.race.players()
    }

    pub fn car_count(&self) -> usize {
        self.race.car_count()
    }

    /// Checks every world-state invariant; `Err` means a bug in the
    /// simulation (or a test poking at internals), never a runtime
    /// condition.
    pub fn validate_invariants(&self) -> Result<(), InvariantCode> {
        self.race.validate_invariants()
    }
}
