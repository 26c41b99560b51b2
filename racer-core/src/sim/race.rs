use std::cmp::Ordering;

use super::steer::{self, LeadCar};
use super::{CarSnapshot, PlayerSnapshot, SegmentSnapshot, WorldSnapshot};
use crate::car::{Car, CarId, ControlSource, PlayerInput};
use crate::config::{Tuning, WorldConfig};
use crate::error::{InvariantCode, SetupError};
use crate::rng::SeededRng;
use crate::sprite::{self, SpriteShape};
use crate::track::Track;
use crate::util;

/// The whole mutable race state. Only ever touched by the single simulation
/// thread; one `update` call is atomic from the outside.
pub(super) struct Race {
    config: WorldConfig,
    tuning: Tuning,
    track: Track,
    cars: Vec<Car>,
    players: Vec<CarId>,
    rng: SeededRng,
    race_active: bool,
    num_laps: u32,
    tick: u64,
}

impl Race {
    pub(super) fn new(config: WorldConfig, tuning: Tuning, seed: u32) -> Result<Self, SetupError> {
        config.validate()?;
        tuning.validate()?;
        Ok(Self {
            track: Track::new(config.segment_length, config.rumble_length),
            cars: Vec::new(),
            players: Vec::new(),
            rng: SeededRng::new(seed),
            race_active: false,
            num_laps: 0,
            tick: 0,
            config,
            tuning,
        })
    }

    pub(super) fn config(&self) -> &WorldConfig {
        &self.config
    }

    pub(super) fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub(super) fn track(&self) -> &Track {
        &self.track
    }

    pub(super) fn track_mut(&mut self) -> &mut Track {
        &mut self.track
    }

    pub(super) fn max_speed(&self) -> f32 {
        self.tuning.max_speed(self.config.segment_length)
    }

    pub(super) fn tick(&self) -> u64 {
        self.tick
    }

    pub(super) fn race_active(&self) -> bool {
        self.race_active
    }

    pub(super) fn players(&self) -> &[CarId] {
        &self.players
    }

    pub(super) fn car_count(&self) -> usize {
        self.cars.len()
    }

    pub(super) fn apply_options(&mut self, config: WorldConfig) -> Result<bool, SetupError> {
        config.validate()?;
        let rebuild = self.config.requires_rebuild(&config);
        self.config = config;
        if rebuild {
            self.track = Track::new(config.segment_length, config.rumble_length);
            self.cars.clear();
            self.players.clear();
            self.race_active = false;
        }
        Ok(rebuild)
    }

    pub(super) fn add_player(&mut self, shape: SpriteShape) -> Result<CarId, SetupError> {
        if self.track.is_empty() {
            return Err(SetupError::EmptyTrack);
        }
        let id = CarId(self.cars.len() as u32);
        let mut car = Car::new(ControlSource::PlayerInput, shape);
        car.cruise_speed = self.max_speed();
        self.cars.push(car);
        self.place_in_segment(id.index());
        self.players.push(id);
        Ok(id)
    }

    pub(super) fn spawn_traffic(&mut self, count: usize) -> Result<(), SetupError> {
        if self.track.is_empty() {
            return Err(SetupError::EmptyTrack);
        }
        let max_speed = self.max_speed();
        for _ in 0..count {
            let shape = *self.rng.choose(&sprite::TRAFFIC);
            let side = *self.rng.choose(&[-0.8f32, 0.8]);
            let x = self.rng.next_f32() * side;
            let z =
                self.rng.next_int(self.track.len() as u32) as f32 * self.track.segment_length();
            // Semis hold the slow end of the speed range.
            let spread = if shape == sprite::SEMI { 4.0 } else { 2.0 };
            let speed = max_speed / 2.0 + self.rng.next_f32() * max_speed / spread;

            let idx = self.cars.len();
            let mut car = Car::new(ControlSource::HeuristicAi, shape);
            car.x = x;
            car.z = z;
            car.prev_z = z;
            car.speed = speed;
            car.cruise_speed = speed;
            self.cars.push(car);
            self.place_in_segment(idx);
        }
        Ok(())
    }

    pub(super) fn start_race(&mut self, num_laps: u32) -> Result<(), SetupError> {
        if self.track.is_empty() {
            return Err(SetupError::EmptyTrack);
        }
        if num_laps == 0 {
            return Err(SetupError::ZeroLaps);
        }
        let track_length = self.track.length();
        let segment_length = self.config.segment_length;
        let lanes = self.config.lanes;
        for n in 0..self.players.len() {
            let idx = self.players[n].index();
            // Grid lineup: lanes at -2/3, 0, +2/3, rows five segments apart
            // ending at the start line.
            let lane = (n as u32 % lanes) as f32 - 1.0;
            let row = (n as u32 / lanes) as f32;
            let z = (track_length - row * segment_length * 5.0).rem_euclid(track_length);
            self.remove_from_segment(idx);
            {
                let car = &mut self.cars[idx];
                car.x = lane * 2.0 / 3.0;
                car.dx = 0.0;
                car.z = z;
                car.prev_z = z;
                car.speed = 0.0;
                car.reset_timer = -1;
                car.input = PlayerInput::default();
            }
            self.place_in_segment(idx);
        }
        for car in &mut self.cars {
            car.reset_race_bookkeeping();
        }
        self.num_laps = num_laps;
        self.race_active = true;
        Ok(())
    }

    pub(super) fn set_input(&mut self, player: CarId, input: PlayerInput) {
        let car = &mut self.cars[player.index()];
        debug_assert_eq!(car.control, ControlSource::PlayerInput);
        car.input = input;
    }

    /// One fixed tick: every car runs the full pipeline in creation order,
    /// then places are ranked from the settled positions.
    pub(super) fn update(&mut self, dt: f32) {
        debug_assert!(dt > 0.0);
        if self.track.is_empty() {
            return;
        }
        let lead = self.lead_car();
        for idx in 0..self.cars.len() {
            self.update_car(idx, dt, lead.as_ref());
        }
        if self.race_active {
            self.update_places();
        }
        self.tick += 1;
    }

    /// Start-of-tick view of the camera car; every AI steers against the
    /// same state no matter where it falls in the update order.
    fn lead_car(&self) -> Option<LeadCar> {
        let id = *self.players.first()?;
        let car = &self.cars[id.index()];
        Some(LeadCar {
            id,
            segment: car.segment,
            x: car.x,
            speed: car.speed,
            width: car.shape.width,
        })
    }

    fn update_car(&mut self, idx: usize, dt: f32, lead: Option<&LeadCar>) {
        // 1. Stall check. A frozen car skips the whole pipeline but stays in
        // its segment's occupant list as an obstacle.
        {
            let car = &mut self.cars[idx];
            if car.reset_timer > 0 {
                car.reset_timer -= 1;
                return;
            }
            if car.reset_timer == 0 {
                car.x = 0.0;
                car.dx = 0.0;
                car.speed = 0.0;
                car.reset_timer = -1;
            }
        }

        let tuning = self.tuning;
        let max_speed = self.max_speed();
        let track_length = self.track.length();
        let curve = self.track.segment(self.cars[idx].segment).curve;

        // 2. Lateral control: AI gets an immediate positional nudge from the
        // heuristic, players integrate a lateral velocity.
        let ai_delta = match self.cars[idx].control {
            ControlSource::HeuristicAi => Some(steer::steer_delta(
                &self.cars,
                &self.track,
                &tuning,
                max_speed,
                self.config.draw_distance,
                idx,
                lead,
            )),
            ControlSource::PlayerInput => None,
        };

        {
            let car = &mut self.cars[idx];
            let speed_percent = car.speed / max_speed;
            // At top speed a car crosses the road (-1 to 1) in one second.
            let dx_max = 2.0 * speed_percent * dt;

            match ai_delta {
                Some(delta) => car.x += delta,
                None => {
                    let ax = speed_percent / 2.0;
                    if car.input.steer_left {
                        car.dx = util::accelerate(car.dx, -ax, dt).max(-dx_max);
                    } else if car.input.steer_right {
                        car.dx = util::accelerate(car.dx, ax, dt).min(dx_max);
                    } else if car.x != 0.0 {
                        car.dx -= car.dx / 2.0;
                    }
                    car.x += car.dx;
                }
            }

            // 3. Centrifugal pull toward the outside of the curve.
            car.x -= dx_max * curve / tuning.centrifugal;

            // 4. Longitudinal integration.
            car.prev_z = car.z;
            let advance = dt * car.speed;
            car.z = util::increase(car.z, advance, track_length);

            let rate = match car.control {
                ControlSource::PlayerInput => {
                    if car.input.accelerate {
                        tuning.accel_factor * max_speed
                    } else if car.input.brake {
                        tuning.braking_factor * max_speed
                    } else {
                        tuning.drag_factor * max_speed
                    }
                }
                ControlSource::HeuristicAi => {
                    if car.speed < car.cruise_speed {
                        tuning.accel_factor * max_speed
                    } else {
                        // Cruising traffic holds its assigned speed.
                        0.0
                    }
                }
            };
            if rate != 0.0 {
                car.speed = util::accelerate(car.speed, rate, dt);
                if rate < 0.0 && car.speed < 0.0 {
                    car.speed = 0.0;
                }
                if car.control == ControlSource::HeuristicAi {
                    car.speed = car.speed.min(car.cruise_speed);
                }
            }

            // The outer edge of a curve is longer than the centreline; shave
            // the advance by a curvature- and offset-dependent factor.
            let curve_sign = if curve < 0.0 { -1.0 } else { 1.0 };
            let x_off = (curve_sign - car.x).abs();
            let z_off = advance * tuning.arc_length_correction * curve.abs().cbrt() * x_off;
            if z_off != 0.0 {
                car.z = util::increase(car.z, -z_off, track_length);
            }

            // 5. Off-road penalty: stronger deceleration down to a floor.
            if (car.x < -1.0 || car.x > 1.0)
                && car.speed > tuning.off_road_limit_factor * max_speed
            {
                car.speed =
                    util::accelerate(car.speed, tuning.off_road_decel_factor * max_speed, dt);
                if car.speed < 0.0 {
                    car.speed = 0.0;
                }
            }
        }

        // Both collision checks run against the segment reached this tick,
        // even if the terrain check then rolls the position back. Occupant
        // lists are whatever they are mid-tick: cars updated earlier this
        // tick have already moved on.
        let motion_segment = self.track.find_segment_index(self.cars[idx].z);

        // 6. Terrain collision, only tested while off road.
        let off_road = {
            let car = &self.cars[idx];
            car.x < -1.0 || car.x > 1.0
        };
        if off_road {
            let hit = {
                let car = &self.cars[idx];
                self.track
                    .segment(motion_segment)
                    .decorations
                    .iter()
                    .any(|deco| {
                        util::overlap(
                            car.x,
                            car.shape.width,
                            deco.body_center(),
                            deco.shape.width,
                            tuning.terrain_tolerance,
                        )
                    })
            };
            if hit {
                let car = &mut self.cars[idx];
                car.reset_timer = (tuning.fps * (1.0 + car.speed / max_speed)).floor() as i32;
                car.speed = 0.0;
                car.z = car.prev_z;
            }
        }

        // 7. Car-to-car collision: only the faster car pays, scaled steeply
        // by the speed ratio, and loses this tick's forward motion.
        let bumped_speed = {
            let car = &self.cars[idx];
            let mut found = None;
            for &other_id in self.track.segment(motion_segment).occupants() {
                if other_id.index() == idx {
                    continue;
                }
                let other = &self.cars[other_id.index()];
                if car.speed > other.speed
                    && util::overlap(
                        car.x,
                        car.shape.width,
                        other.x,
                        other.shape.width,
                        tuning.car_tolerance,
                    )
                {
                    found = Some(other.speed);
                    break;
                }
            }
            found
        };
        if let Some(other_speed) = bumped_speed {
            let car = &mut self.cars[idx];
            car.speed = other_speed * (other_speed / car.speed) / tuning.collision_penalty_divisor;
            car.z = car.prev_z;
        }

        // 8. Bounds clamp.
        {
            let car = &mut self.cars[idx];
            car.x = util::limit(car.x, -tuning.lateral_bound, tuning.lateral_bound);
            car.speed = util::limit(car.speed, 0.0, max_speed);
        }

        // 9. Segment reassignment, once per car per tick, after its position
        // is final.
        self.reassign_segment(idx);

        // 10. Lap tracking: crossing the ring boundary this tick closes a
        // lap.
        if self.race_active && !self.cars[idx].finished {
            let num_laps = self.num_laps;
            let car = &mut self.cars[idx];
            if car.current_lap_time > 0.0 && car.prev_z > car.z {
                car.lap_times.push(car.current_lap_time);
                car.lap += 1;
                if car.lap > num_laps {
                    car.finished = true;
                } else {
                    car.current_lap_time = 0.0;
                }
            } else {
                car.current_lap_time += dt;
            }
        }
    }

    /// Rank every unfinished car by race progress; ties go to the lower id.
    /// Finished cars keep the place they finished with.
    fn update_places(&mut self) {
        let track_length = self.track.length();
        let mut order: Vec<usize> = (0..self.cars.len())
            .filter(|&idx| !self.cars[idx].finished)
            .collect();
        order.sort_by(|&a, &b| {
            let pa = self.cars[a].lap as f32 * track_length + self.cars[a].z;
            let pb = self.cars[b].lap as f32 * track_length + self.cars[b].z;
            pb.partial_cmp(&pa)
                .unwrap_or(Ordering::Equal)
                .then(a.cmp(&b))
        });
        for (rank, &idx) in order.iter().enumerate() {
            self.cars[idx].place = rank as u32 + 1;
        }
    }

    fn place_in_segment(&mut self, idx: usize) {
        let segment = self.track.find_segment_index(self.cars[idx].z);
        let occupants = self.track.occupants_mut(segment);
        occupants.push(CarId(idx as u32));
        let slot = occupants.len() - 1;
        let car = &mut self.cars[idx];
        car.segment = segment;
        car.slot = slot;
    }

    fn remove_from_segment(&mut self, idx: usize) {
        let (segment, slot) = {
            let car = &self.cars[idx];
            (car.segment, car.slot)
        };
        let occupants = self.track.occupants_mut(segment);
        let removed = occupants.swap_remove(slot);
        debug_assert_eq!(removed.index(), idx);
        // Patch the slot cache of whichever car the swap moved.
        if let Some(&moved) = occupants.get(slot) {
            self.cars[moved.index()].slot = slot;
        }
    }

    fn reassign_segment(&mut self, idx: usize) {
        let new_segment = self.track.find_segment_index(self.cars[idx].z);
        if new_segment == self.cars[idx].segment {
            return;
        }
        self.remove_from_segment(idx);
        let occupants = self.track.occupants_mut(new_segment);
        occupants.push(CarId(idx as u32));
        let slot = occupants.len() - 1;
        let car = &mut self.cars[idx];
        car.segment = new_segment;
        car.slot = slot;
    }

    pub(super) fn validate_invariants(&self) -> Result<(), InvariantCode> {
        let max_speed = self.max_speed();
        let bound = self.tuning.lateral_bound;
        for (idx, car) in self.cars.iter().enumerate() {
            if !car.z.is_finite() || !car.x.is_finite() {
                return Err(InvariantCode::CarPositionFinite);
            }
            if !(0.0..=max_speed).contains(&car.speed) {
                return Err(InvariantCode::CarSpeedRange);
            }
            if !(-bound..=bound).contains(&car.x) {
                return Err(InvariantCode::CarLateralRange);
            }
            if car.reset_timer < -1 {
                return Err(InvariantCode::CarResetTimerRange);
            }
            let derived = self.track.find_segment_index(car.z);
            if derived != car.segment {
                return Err(InvariantCode::CarSegmentMembership);
            }
            let occupants = self.track.segment(car.segment).occupants();
            if occupants.get(car.slot).map(|id| id.index()) != Some(idx) {
                return Err(InvariantCode::CarOccupancySlot);
            }
            if car.lap < 1 || car.lap_times.len() != (car.lap - 1) as usize {
                return Err(InvariantCode::CarLapTimeCount);
            }
        }
        let listed: usize = self
            .track
            .segments()
            .iter()
            .map(|segment| segment.occupants().len())
            .sum();
        if listed != self.cars.len() {
            return Err(InvariantCode::SegmentOccupantCount);
        }
        Ok(())
    }

    pub(super) fn snapshot(&self) -> WorldSnapshot {
        let segment_length = self.config.segment_length;
        WorldSnapshot {
            tick: self.tick,
            race_active: self.race_active,
            num_laps: self.num_laps,
            track_length: self.track.length(),
            max_speed: self.max_speed(),
            cars: self
                .cars
                .iter()
                .enumerate()
                .map(|(idx, car)| CarSnapshot {
                    id: CarId(idx as u32),
                    control: car.control,
                    shape: car.shape,
                    z: car.z,
                    x: car.x,
                    speed: car.speed,
                    segment: car.segment,
                    percent_into_segment: util::percent_remaining(car.z, segment_length),
                    lap: car.lap,
                    place: car.place,
                    reset_timer: car.reset_timer,
                    finished: car.finished,
                })
                .collect(),
            players: self
                .players
                .iter()
                .map(|&id| {
                    let car = &self.cars[id.index()];
                    PlayerSnapshot {
                        id,
                        lap: car.lap,
                        current_lap_time: car.current_lap_time,
                        last_lap_time: car.lap_times.last().copied(),
                        lap_times: car.lap_times.clone(),
                        place: car.place,
                        finished: car.finished,
                    }
                })
                .collect(),
        }
    }

    pub(super) fn segment_snapshot(&self, index: usize) -> Option<SegmentSnapshot> {
        if index >= self.track.len() {
            return None;
        }
        let segment = self.track.segment(index);
        Some(SegmentSnapshot {
            index: segment.index,
            curve: segment.curve,
            p1_elevation: segment.p1_elevation,
            p2_elevation: segment.p2_elevation,
            color: segment.color,
            decorations: segment.decorations.clone(),
            occupants: segment.occupants().to_vec(),
        })
    }
}
