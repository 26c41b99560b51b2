//! Scalar helpers shared by the simulation step and external track builders.

use core::f32::consts::PI;

#[inline]
pub fn limit(value: f32, min: f32, max: f32) -> f32 {
    value.clamp(min, max)
}

#[inline]
pub fn accelerate(speed: f32, rate: f32, dt: f32) -> f32 {
    speed + rate * dt
}

#[inline]
pub fn interpolate(a: f32, b: f32, percent: f32) -> f32 {
    a + (b - a) * percent
}

#[inline]
pub fn ease_in(a: f32, b: f32, percent: f32) -> f32 {
    a + (b - a) * percent * percent
}

#[inline]
pub fn ease_out(a: f32, b: f32, percent: f32) -> f32 {
    a + (b - a) * (1.0 - (1.0 - percent) * (1.0 - percent))
}

#[inline]
pub fn ease_in_out(a: f32, b: f32, percent: f32) -> f32 {
    a + (b - a) * (-(percent * PI).cos() / 2.0 + 0.5)
}

/// Wrap-around increment into `[0, max)`.
#[inline]
pub fn increase(start: f32, increment: f32, max: f32) -> f32 {
    let mut result = start + increment;
    while result >= max {
        result -= max;
    }
    while result < 0.0 {
        result += max;
    }
    result
}

/// Fraction of the way through an interval of length `total`.
#[inline]
pub fn percent_remaining(n: f32, total: f32) -> f32 {
    (n % total) / total
}

/// Interval overlap test between two bodies centred at `x1` and `x2`. Each
/// body spans `width * tolerance`, so a tolerance below 1.0 shrinks both
/// hitboxes and above 1.0 pads them.
#[inline]
pub fn overlap(x1: f32, w1: f32, x2: f32, w2: f32, tolerance: f32) -> bool {
    let half = tolerance / 2.0;
    let min1 = x1 - w1 * half;
    let max1 = x1 + w1 * half;
    let min2 = x2 - w2 * half;
    let max2 = x2 + w2 * half;
    !(max1 < min2 || min1 > max2)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn increase_wraps_in_both_directions() {
        assert_eq!(increase(90.0, 20.0, 100.0), 10.0);
        assert_eq!(increase(10.0, -20.0, 100.0), 90.0);
        assert_eq!(increase(0.0, 0.0, 100.0), 0.0);
        assert_eq!(increase(50.0, 250.0, 100.0), 0.0);
    }

    #[test]
    fn increase_result_stays_in_range() {
        let mut z = 0.0;
        for _ in 0..1_000 {
            z = increase(z, 33.7, 100.0);
            assert!((0.0..100.0).contains(&z));
        }
    }

    #[test]
    fn easing_hits_endpoints() {
        assert_eq!(ease_in(2.0, 6.0, 0.0), 2.0);
        assert_eq!(ease_in(2.0, 6.0, 1.0), 6.0);
        assert_eq!(ease_out(2.0, 6.0, 0.0), 2.0);
        assert_eq!(ease_out(2.0, 6.0, 1.0), 6.0);
        assert!((ease_in_out(2.0, 6.0, 0.0) - 2.0).abs() < 1e-6);
        assert!((ease_in_out(2.0, 6.0, 1.0) - 6.0).abs() < 1e-6);
        assert!((ease_in_out(2.0, 6.0, 0.5) - 4.0).abs() < 1e-6);
    }

    #[test]
    fn overlap_tolerance_shrinks_hitboxes() {
        // Bodies of width 1.0 centred 0.9 apart: touching at full width,
        // clear at the 0.8 car-collision tolerance.
        assert!(overlap(0.0, 1.0, 0.9, 1.0, 1.0));
        assert!(!overlap(0.0, 1.0, 0.9, 1.0, 0.8));
        // The loose 1.2 steering tolerance reaches further.
        assert!(overlap(0.0, 1.0, 1.1, 1.0, 1.2));
        assert!(!overlap(0.0, 1.0, 1.3, 1.0, 1.2));
    }

    #[test]
    fn overlap_is_symmetric() {
        assert_eq!(
            overlap(-0.2, 0.5, 0.1, 0.9, 1.0),
            overlap(0.1, 0.9, -0.2, 0.5, 1.0)
        );
    }

    #[test]
    fn percent_remaining_fraction_of_segment() {
        assert!((percent_remaining(250.0, 200.0) - 0.25).abs() < 1e-6);
        assert_eq!(percent_remaining(0.0, 200.0), 0.0);
    }
}
