//! Track construction vocabulary. Everything here goes through the core's
//! `add_segment`/`add_decoration`/`set_color_band` primitives; the core only
//! requires a non-empty ring of whole segments before a race starts.

use anyhow::Result;
use racer_core::rng::SeededRng;
use racer_core::track::ColorBand;
use racer_core::util::{ease_in, ease_in_out};
use racer_core::{sprite, World};

pub mod road {
    pub const LENGTH_SHORT: usize = 25;
    pub const LENGTH_MEDIUM: usize = 50;
    pub const LENGTH_LONG: usize = 100;

    pub const HILL_NONE: f32 = 0.0;
    pub const HILL_LOW: f32 = 20.0;
    pub const HILL_MEDIUM: f32 = 40.0;
    pub const HILL_HIGH: f32 = 60.0;

    pub const CURVE_NONE: f32 = 0.0;
    pub const CURVE_EASY: f32 = 2.0;
    pub const CURVE_MEDIUM: f32 = 4.0;
    pub const CURVE_HARD: f32 = 6.0;
}

/// One road section: curvature eases in over `enter` segments, holds for
/// `hold`, eases back out over `leave`; elevation eases across the whole
/// section toward `start + hill * segment_length`.
pub fn add_road(world: &mut World, enter: usize, hold: usize, leave: usize, curve: f32, hill: f32) {
    let start_y = world.track().last_elevation();
    let end_y = start_y + hill * world.config().segment_length;
    let total = (enter + hold + leave) as f32;

    for n in 0..enter {
        world.add_segment(
            ease_in(0.0, curve, n as f32 / enter as f32),
            ease_in_out(start_y, end_y, n as f32 / total),
        );
    }
    for n in 0..hold {
        world.add_segment(
            curve,
            ease_in_out(start_y, end_y, (enter + n) as f32 / total),
        );
    }
    for n in 0..leave {
        world.add_segment(
            ease_in_out(curve, 0.0, n as f32 / leave as f32),
            ease_in_out(start_y, end_y, (enter + hold + n) as f32 / total),
        );
    }
}

pub fn add_straight(world: &mut World, num: usize) {
    add_road(world, num, num, num, road::CURVE_NONE, road::HILL_NONE);
}

pub fn add_hill(world: &mut World, num: usize, height: f32) {
    add_road(world, num, num, num, road::CURVE_NONE, height);
}

pub fn add_curve(world: &mut World, num: usize, curve: f32, height: f32) {
    add_road(world, num, num, num, curve, height);
}

pub fn add_low_rolling_hills(world: &mut World, num: usize, height: f32) {
    add_road(world, num, num, num, 0.0, height / 2.0);
    add_road(world, num, num, num, 0.0, -height);
    add_road(world, num, num, num, road::CURVE_EASY, height);
    add_road(world, num, num, num, 0.0, 0.0);
    add_road(world, num, num, num, -road::CURVE_EASY, height / 2.0);
    add_road(world, num, num, num, 0.0, 0.0);
}

pub fn add_s_curves(world: &mut World) {
    let num = road::LENGTH_MEDIUM;
    add_road(world, num, num, num, -road::CURVE_EASY, road::HILL_NONE);
    add_road(world, num, num, num, road::CURVE_MEDIUM, road::HILL_MEDIUM);
    add_road(world, num, num, num, road::CURVE_EASY, -road::HILL_LOW);
    add_road(world, num, num, num, -road::CURVE_EASY, road::HILL_MEDIUM);
    add_road(world, num, num, num, -road::CURVE_MEDIUM, -road::HILL_MEDIUM);
}

pub fn add_bumps(world: &mut World) {
    for hill in [5.0, -2.0, -5.0, 8.0, 5.0, -7.0, 5.0, -2.0] {
        add_road(world, 10, 10, 10, 0.0, hill);
    }
}

/// Eases the elevation profile back to zero so the ring closes cleanly.
pub fn add_downhill_to_end(world: &mut World, num: usize) {
    let drop = -world.track().last_elevation() / world.config().segment_length;
    add_road(world, num, num, num, -road::CURVE_EASY, drop);
}

/// The full default circuit: hills, bumps, s-curves and two long sweeps.
pub fn build_default_track(world: &mut World) {
    add_straight(world, road::LENGTH_SHORT);
    add_low_rolling_hills(world, road::LENGTH_SHORT, road::HILL_LOW);
    add_s_curves(world);
    add_curve(world, road::LENGTH_MEDIUM, road::CURVE_MEDIUM, road::HILL_LOW);
    add_bumps(world);
    add_low_rolling_hills(world, road::LENGTH_SHORT, road::HILL_LOW);
    add_curve(world, road::LENGTH_LONG * 2, road::CURVE_MEDIUM, road::HILL_MEDIUM);
    add_straight(world, road::LENGTH_MEDIUM);
    add_hill(world, road::LENGTH_MEDIUM, road::HILL_HIGH);
    add_s_curves(world);
    add_curve(world, road::LENGTH_LONG, -road::CURVE_MEDIUM, road::HILL_NONE);
    add_hill(world, road::LENGTH_LONG, road::HILL_HIGH);
    add_curve(world, road::LENGTH_LONG, road::CURVE_MEDIUM, -road::HILL_LOW);
    add_bumps(world);
    add_hill(world, road::LENGTH_LONG, -road::HILL_MEDIUM);
    add_straight(world, road::LENGTH_MEDIUM);
    add_downhill_to_end(world, 200);
}

/// Seeds the roadside with the classic scatter: billboards on the opening
/// stretch, palm rows, columns faced by trees, sparse plants the whole way
/// round and billboard clusters on the back half. Every index is bounds
/// checked so the scatter also works on short test tracks.
pub fn scatter_decorations(world: &mut World, seed: u32) -> Result<()> {
    let mut rng = SeededRng::new(seed);
    let count = world.track().len();

    for n in [20usize, 60, 100, 140, 180] {
        if n < count {
            world.add_decoration(n, sprite::BILLBOARD, -1.2)?;
        }
    }
    if 240 < count {
        world.add_decoration(240, sprite::BILLBOARD, -1.2)?;
        world.add_decoration(240, sprite::BILLBOARD, 1.2)?;
    }
    if count > 25 {
        world.add_decoration(count - 25, sprite::BILLBOARD, -1.2)?;
        world.add_decoration(count - 25, sprite::BILLBOARD, 1.2)?;
    }

    let mut n = 10;
    while n < count.min(200) {
        world.add_decoration(n, sprite::PALM_TREE, 0.6 + rng.next_f32() * 0.5)?;
        world.add_decoration(n, sprite::PALM_TREE, 1.1 + rng.next_f32() * 2.0)?;
        n += 4 + n / 100;
    }

    let mut n = 250;
    while n < count.min(1_000) {
        world.add_decoration(n, sprite::COLUMN, 1.2)?;
        for _ in 0..2 {
            let spot = n + rng.next_int(6) as usize;
            if spot < count {
                world.add_decoration(spot, sprite::TREE, -1.2 - rng.next_f32() * 2.0)?;
            }
        }
        n += 5;
    }

    let mut n = 200;
    while n < count {
        let side = *rng.choose(&[1.0f32, -1.0]);
        world.add_decoration(
            n,
            *rng.choose(&sprite::PLANTS),
            side * (2.0 + rng.next_f32() * 5.0),
        )?;
        n += 3;
    }

    let mut n = 1_000;
    while n + 50 < count.saturating_sub(50) {
        let side = *rng.choose(&[1.0f32, -1.0]);
        let spot = n + rng.next_int(51) as usize;
        if spot < count {
            world.add_decoration(spot, sprite::BILLBOARD, -side)?;
        }
        for _ in 0..20 {
            let spot = n + rng.next_int(51) as usize;
            if spot < count {
                world.add_decoration(
                    spot,
                    *rng.choose(&sprite::PLANTS),
                    side * (1.5 + rng.next_f32()),
                )?;
            }
        }
        n += 100;
    }

    Ok(())
}

/// Paints the start band just past the grid and the finish band over the
/// last rumble strip.
pub fn mark_start_and_finish(world: &mut World) -> Result<()> {
    let count = world.track().len();
    let rumble = world.config().rumble_length as usize;
    for n in [2usize, 3] {
        if n < count {
            world.set_color_band(n, ColorBand::Start)?;
        }
    }
    for n in 0..rumble.min(count) {
        world.set_color_band(count - 1 - n, ColorBand::Finish)?;
    }
    Ok(())
}
