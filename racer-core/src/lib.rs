pub mod car;
pub mod config;
pub mod error;
pub mod rng;
pub mod sim;
pub mod sprite;
pub mod track;
pub mod util;

pub use car::{CarId, ControlSource, PlayerInput};
pub use config::{Tuning, WorldConfig};
pub use error::{InvariantCode, SetupError};
pub use sim::{CarSnapshot, PlayerSnapshot, SegmentSnapshot, World, WorldSnapshot};
