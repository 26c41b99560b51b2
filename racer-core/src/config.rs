use serde::{Deserialize, Serialize};

use crate::error::SetupError;

/// Setup options recognised by the world. Applying a new set with a changed
/// `segment_length` or `rumble_length` forces a full track rebuild; every
/// other field takes effect without one. The camera fields are owned by the
/// rendering collaborator but stored here so the simulation can answer its
/// read-only queries.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct WorldConfig {
    pub lanes: u32,
    /// Half the road width in world units; the road spans `-road_width` to
    /// `+road_width`.
    pub road_width: f32,
    pub camera_height: f32,
    /// Number of segments the renderer draws; also bounds how far traffic
    /// bothers steering around the lead car.
    pub draw_distance: usize,
    pub fog_density: f32,
    pub field_of_view: f32,
    pub segment_length: f32,
    /// Segments per alternating rumble-strip color band.
    pub rumble_length: u32,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            lanes: 3,
            road_width: 2000.0,
            camera_height: 1000.0,
            draw_distance: 300,
            fog_density: 1.0,
            field_of_view: 100.0,
            segment_length: 200.0,
            rumble_length: 3,
        }
    }
}

impl WorldConfig {
    pub fn validate(&self) -> Result<(), SetupError> {
        if !(self.segment_length > 0.0) {
            return Err(SetupError::NonPositiveSegmentLength {
                value: self.segment_length,
            });
        }
        if self.lanes == 0 {
            return Err(SetupError::ZeroLanes);
        }
        if self.rumble_length == 0 {
            return Err(SetupError::ZeroRumbleLength);
        }
        Ok(())
    }

    /// True when switching to `other` invalidates existing track geometry.
    pub fn requires_rebuild(&self, other: &WorldConfig) -> bool {
        self.segment_length != other.segment_length || self.rumble_length != other.rumble_length
    }
}

/// Every tuned physics constant in one record. The defaults are the values
/// the original feel was tuned against at a fixed 60 fps step; rate fields
/// are fractions of `max_speed` per second so they scale with the track.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Tuning {
    /// Simulated frames per second; `dt` is expected to equal `1.0 / fps`.
    pub fps: f32,
    /// Divisor for the curvature pull: larger values weaken it.
    pub centrifugal: f32,
    pub accel_factor: f32,
    pub braking_factor: f32,
    pub drag_factor: f32,
    pub off_road_decel_factor: f32,
    /// Off-road deceleration stops applying below this fraction of
    /// `max_speed`.
    pub off_road_limit_factor: f32,
    /// Strength of the extra distance travelled on the outside of a curve.
    pub arc_length_correction: f32,
    /// Segments the steering heuristic scans ahead for conflicts.
    pub lookahead: usize,
    pub terrain_tolerance: f32,
    pub car_tolerance: f32,
    pub steer_tolerance: f32,
    /// A car this far off centre is treated as committed to that side when
    /// traffic decides which way to swerve.
    pub swerve_commit: f32,
    /// Lateral offset beyond which drifting traffic nudges itself back.
    pub edge_threshold: f32,
    pub edge_pullback: f32,
    /// Hard clamp for lateral offset, well outside the road's `[-1, 1]`.
    pub lateral_bound: f32,
    pub collision_penalty_divisor: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            fps: 60.0,
            centrifugal: 10.0 / 3.0,
            accel_factor: 0.2,
            braking_factor: -1.0,
            drag_factor: -0.2,
            off_road_decel_factor: -0.5,
            off_road_limit_factor: 0.25,
            arc_length_correction: 0.03,
            lookahead: 20,
            terrain_tolerance: 1.0,
            car_tolerance: 0.8,
            steer_tolerance: 1.2,
            swerve_commit: 0.5,
            edge_threshold: 0.9,
            edge_pullback: 0.1,
            lateral_bound: 3.0,
            collision_penalty_divisor: 3.0,
        }
    }
}

impl Tuning {
    pub fn validate(&self) -> Result<(), SetupError> {
        if !(self.fps > 0.0) {
            return Err(SetupError::NonPositiveFrameRate { value: self.fps });
        }
        Ok(())
    }

    /// Duration of one simulated frame.
    pub fn step(&self) -> f32 {
        1.0 / self.fps
    }

    /// Top speed, chosen so a car cannot cross more than one segment per
    /// frame (keeps every collision check within the current segment).
    pub fn max_speed(&self, segment_length: f32) -> f32 {
        segment_length * self.fps
    }
}
