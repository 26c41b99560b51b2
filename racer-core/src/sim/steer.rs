//! Lateral steering for heuristic-driven traffic: a pure function of the
//! current world geometry, recomputed every tick. No persistent AI state.

use crate::car::{Car, CarId};
use crate::config::Tuning;
use crate::track::Track;
use crate::util::overlap;

/// Start-of-tick view of the controlled car the camera follows. Captured
/// once per tick so every AI car steers against the same lead state.
#[derive(Clone, Copy, Debug)]
pub(super) struct LeadCar {
    pub(super) id: CarId,
    pub(super) segment: usize,
    pub(super) x: f32,
    pub(super) speed: f32,
    pub(super) width: f32,
}

/// Signed lateral-offset delta for the car at `idx` this tick; 0 when no
/// adjustment is needed. Scans up to `lookahead` segments ahead in track
/// order; the first conflict wins, and closer conflicts with bigger speed
/// gaps produce larger corrections.
pub(super) fn steer_delta(
    cars: &[Car],
    track: &Track,
    tuning: &Tuning,
    max_speed: f32,
    draw_distance: usize,
    idx: usize,
    lead: Option<&LeadCar>,
) -> f32 {
    let car = &cars[idx];
    let car_w = car.shape.width;
    let car_segment = car.segment;

    // Out of sight of the lead car: nobody can tell, skip the work.
    if let Some(lead) = lead {
        if car_segment as isize - lead.segment as isize > draw_distance as isize {
            return 0.0;
        }
    }

    let segment_count = track.len();
    for i in 1..tuning.lookahead {
        let segment = track.segment((car_segment + i) % segment_count);

        if let Some(lead) = lead {
            if segment.index == lead.segment
                && car.speed > lead.speed
                && overlap(lead.x, lead.width, car.x, car_w, tuning.steer_tolerance)
            {
                let dir = swerve_direction(lead.x, car.x, tuning.swerve_commit);
                return dir * (1.0 / i as f32) * (car.speed - lead.speed) / max_speed;
            }
        }

        for &other_id in segment.occupants() {
            if other_id.index() == idx {
                continue;
            }
            // The lead branch above already judged the lead car.
            if lead.map(|lead| lead.id) == Some(other_id) {
                continue;
            }
            let other = &cars[other_id.index()];
            if car.speed > other.speed
                && overlap(car.x, car_w, other.x, other.shape.width, tuning.steer_tolerance)
            {
                let dir = swerve_direction(other.x, car.x, tuning.swerve_commit);
                return dir * (1.0 / i as f32) * (car.speed - other.speed) / max_speed;
            }
        }
    }

    // Nothing ahead; if we have drifted near the verge, ease back on road.
    if car.x < -tuning.edge_threshold {
        tuning.edge_pullback
    } else if car.x > tuning.edge_threshold {
        -tuning.edge_pullback
    } else {
        0.0
    }
}

/// Swerve away from an obstacle committed to one side of the road,
/// otherwise toward whichever side increases separation from its exact
/// offset.
fn swerve_direction(obstacle_x: f32, car_x: f32, commit: f32) -> f32 {
    if obstacle_x > commit {
        -1.0
    } else if obstacle_x < -commit {
        1.0
    } else if car_x > obstacle_x {
        1.0
    } else {
        -1.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn swerves_away_from_committed_sides() {
        assert_eq!(swerve_direction(0.6, 0.0, 0.5), -1.0);
        assert_eq!(swerve_direction(-0.6, 0.0, 0.5), 1.0);
    }

    #[test]
    fn swerves_apart_near_center() {
        assert_eq!(swerve_direction(0.1, 0.3, 0.5), 1.0);
        assert_eq!(swerve_direction(0.1, -0.2, 0.5), -1.0);
    }
}
