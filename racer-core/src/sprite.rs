//! Static sprite descriptors. The simulation only needs body widths; they
//! are pre-scaled into road-width units (the classic sheet's pixel widths
//! times its 0.3/80 scale factor), so `width * road_half_widths` math never
//! appears in the hot path.

use serde::Serialize;

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct SpriteShape {
    pub name: &'static str,
    pub width: f32,
}

pub const PLAYER: SpriteShape = SpriteShape {
    name: "player",
    width: 0.3,
};

pub const CAR_COMPACT: SpriteShape = SpriteShape {
    name: "car_compact",
    width: 0.3,
};
pub const CAR_SEDAN: SpriteShape = SpriteShape {
    name: "car_sedan",
    width: 0.3,
};
pub const CAR_MUSCLE: SpriteShape = SpriteShape {
    name: "car_muscle",
    width: 0.33,
};
pub const TRUCK: SpriteShape = SpriteShape {
    name: "truck",
    width: 0.375,
};
pub const SEMI: SpriteShape = SpriteShape {
    name: "semi",
    width: 0.458,
};

pub const BILLBOARD: SpriteShape = SpriteShape {
    name: "billboard",
    width: 1.125,
};
pub const PALM_TREE: SpriteShape = SpriteShape {
    name: "palm_tree",
    width: 0.806,
};
pub const TREE: SpriteShape = SpriteShape {
    name: "tree",
    width: 1.35,
};
pub const COLUMN: SpriteShape = SpriteShape {
    name: "column",
    width: 0.75,
};
pub const BUSH: SpriteShape = SpriteShape {
    name: "bush",
    width: 0.9,
};
pub const CACTUS: SpriteShape = SpriteShape {
    name: "cactus",
    width: 0.88,
};
pub const BOULDER: SpriteShape = SpriteShape {
    name: "boulder",
    width: 0.825,
};

/// Shapes traffic spawns with; semis are wider and capped slower.
pub const TRAFFIC: [SpriteShape; 5] = [CAR_COMPACT, CAR_SEDAN, CAR_MUSCLE, TRUCK, SEMI];

/// Small roadside filler used by decoration scatter.
pub const PLANTS: [SpriteShape; 3] = [BUSH, CACTUS, BOULDER];
