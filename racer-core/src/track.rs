//! The segment store: a closed ring of fixed-length road slices. Geometry
//! and decorations are immutable once a race starts; the only mutable state
//! is each segment's occupant list, kept exact by the simulation step.

use serde::Serialize;

use crate::car::CarId;
use crate::error::SetupError;
use crate::sprite::SpriteShape;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum ColorBand {
    Light,
    Dark,
    Start,
    Finish,
}

/// Roadside decoration; immutable after placement.
#[derive(Clone, Copy, Debug, Serialize)]
pub struct Decoration {
    pub shape: SpriteShape,
    /// Lateral anchor in road-width units; positive is the right verge.
    pub offset: f32,
}

impl Decoration {
    /// Collision centre: the anchor shifted by half the body width toward
    /// the verge, matching how the renderer plants roadside sprites.
    pub fn body_center(&self) -> f32 {
        let half = self.shape.width / 2.0;
        self.offset + half * if self.offset > 0.0 { 1.0 } else { -1.0 }
    }
}

#[derive(Clone, Debug)]
pub struct Segment {
    pub index: usize,
    pub curve: f32,
    pub p1_elevation: f32,
    pub p2_elevation: f32,
    pub p1_z: f32,
    pub p2_z: f32,
    pub color: ColorBand,
    pub decorations: Vec<Decoration>,
    pub(crate) cars: Vec<CarId>,
}

impl Segment {
    /// Cars whose longitudinal position currently falls inside this segment.
    pub fn occupants(&self) -> &[CarId] {
        &self.cars
    }
}

#[derive(Clone, Debug)]
pub struct Track {
    segments: Vec<Segment>,
    segment_length: f32,
    rumble_length: u32,
}

impl Track {
    pub(crate) fn new(segment_length: f32, rumble_length: u32) -> Self {
        Self {
            segments: Vec::new(),
            segment_length,
            rumble_length,
        }
    }

    /// Appends a segment whose start elevation continues the previous
    /// segment's end (the very first segment starts at elevation 0).
    pub fn add_segment(&mut self, curve: f32, end_elevation: f32) {
        let n = self.segments.len();
        let color = if (n as u32 / self.rumble_length) % 2 == 1 {
            ColorBand::Dark
        } else {
            ColorBand::Light
        };
        self.segments.push(Segment {
            index: n,
            curve,
            p1_elevation: self.last_elevation(),
            p2_elevation: end_elevation,
            p1_z: n as f32 * self.segment_length,
            p2_z: (n + 1) as f32 * self.segment_length,
            color,
            decorations: Vec::new(),
            cars: Vec::new(),
        });
    }

    pub fn add_decoration(
        &mut self,
        segment: usize,
        shape: SpriteShape,
        offset: f32,
    ) -> Result<(), SetupError> {
        let segment_count = self.segments.len();
        let slot = self
            .segments
            .get_mut(segment)
            .ok_or(SetupError::SegmentOutOfRange {
                index: segment,
                segment_count,
            })?;
        slot.decorations.push(Decoration { shape, offset });
        Ok(())
    }

    /// Recolors one segment; used by builders to mark start and finish bands.
    pub fn set_color_band(&mut self, segment: usize, color: ColorBand) -> Result<(), SetupError> {
        let segment_count = self.segments.len();
        let slot = self
            .segments
            .get_mut(segment)
            .ok_or(SetupError::SegmentOutOfRange {
                index: segment,
                segment_count,
            })?;
        slot.color = color;
        Ok(())
    }

    pub fn last_elevation(&self) -> f32 {
        self.segments
            .last()
            .map(|segment| segment.p2_elevation)
            .unwrap_or(0.0)
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn segment_length(&self) -> f32 {
        self.segment_length
    }

    /// Total ring length; longitudinal positions live in `[0, length())`.
    pub fn length(&self) -> f32 {
        self.segments.len() as f32 * self.segment_length
    }

    /// O(1) lookup of the segment covering longitudinal position `z`,
    /// wrapping around the ring. `z` must be finite and the track non-empty;
    /// anything else is a programming error upstream.
    pub fn find_segment_index(&self, z: f32) -> usize {
        debug_assert!(z.is_finite(), "longitudinal position corrupted: {z}");
        debug_assert!(!self.segments.is_empty(), "findSegment on empty track");
        let index = (z / self.segment_length).floor() as isize;
        index.rem_euclid(self.segments.len() as isize) as usize
    }

    pub fn find_segment(&self, z: f32) -> &Segment {
        &self.segments[self.find_segment_index(z)]
    }

    pub fn segment(&self, index: usize) -> &Segment {
        &self.segments[index]
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub(crate) fn occupants_mut(&mut self, index: usize) -> &mut Vec<CarId> {
        &mut self.segments[index].cars
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sprite;

    fn ring(segments: usize) -> Track {
        let mut track = Track::new(200.0, 3);
        for _ in 0..segments {
            track.add_segment(0.0, 0.0);
        }
        track
    }

    #[test]
    fn find_segment_covers_whole_ring() {
        let track = ring(30);
        let mut z = 0.0;
        while z < track.length() {
            assert_eq!(track.find_segment_index(z), (z / 200.0).floor() as usize);
            z += 37.5;
        }
    }

    #[test]
    fn find_segment_wraps_any_whole_number_of_laps() {
        let track = ring(30);
        for k in 1..4 {
            let z = 1_234.5;
            assert_eq!(
                track.find_segment_index(z),
                track.find_segment_index(z + k as f32 * track.length())
            );
        }
    }

    #[test]
    fn elevation_profile_is_continuous() {
        let mut track = Track::new(200.0, 3);
        track.add_segment(0.0, 40.0);
        track.add_segment(2.0, 90.0);
        track.add_segment(0.0, 10.0);
        assert_eq!(track.segment(0).p1_elevation, 0.0);
        assert_eq!(track.segment(1).p1_elevation, 40.0);
        assert_eq!(track.segment(2).p1_elevation, 90.0);
        assert_eq!(track.last_elevation(), 10.0);
    }

    #[test]
    fn rumble_color_bands_alternate() {
        let track = ring(12);
        assert_eq!(track.segment(0).color, ColorBand::Light);
        assert_eq!(track.segment(2).color, ColorBand::Light);
        assert_eq!(track.segment(3).color, ColorBand::Dark);
        assert_eq!(track.segment(5).color, ColorBand::Dark);
        assert_eq!(track.segment(6).color, ColorBand::Light);
    }

    #[test]
    fn decoration_body_center_shifts_toward_verge() {
        let deco = Decoration {
            shape: SpriteShape {
                name: "test",
                width: 2.0,
            },
            offset: -1.2,
        };
        assert!((deco.body_center() - -2.2).abs() < 1e-6);

        let right = Decoration {
            shape: sprite::BILLBOARD,
            offset: 1.2,
        };
        assert!((right.body_center() - (1.2 + sprite::BILLBOARD.width / 2.0)).abs() < 1e-6);
    }

    #[test]
    fn decoration_placement_rejects_bad_segment() {
        let mut track = ring(5);
        assert!(matches!(
            track.add_decoration(9, sprite::PALM_TREE, 1.2),
            Err(SetupError::SegmentOutOfRange {
                index: 9,
                segment_count: 5
            })
        ));
        assert!(track.add_decoration(4, sprite::PALM_TREE, 1.2).is_ok());
        assert_eq!(track.segment(4).decorations.len(), 1);
    }
}
