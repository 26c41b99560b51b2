use std::fmt;

/// World-state invariants checked by `World::validate_invariants`. These are
/// programming-error classes, not runtime conditions: a well-formed world
/// never reports one.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InvariantCode {
    CarPositionFinite,
    CarSpeedRange,
    CarLateralRange,
    CarResetTimerRange,
    CarSegmentMembership,
    CarOccupancySlot,
    CarLapTimeCount,
    SegmentOccupantCount,
}

impl fmt::Display for InvariantCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CarPositionFinite => write!(f, "CAR_POSITION_FINITE"),
            Self::CarSpeedRange => write!(f, "CAR_SPEED_RANGE"),
            Self::CarLateralRange => write!(f, "CAR_LATERAL_RANGE"),
            Self::CarResetTimerRange => write!(f, "CAR_RESET_TIMER_RANGE"),
            Self::CarSegmentMembership => write!(f, "CAR_SEGMENT_MEMBERSHIP"),
            Self::CarOccupancySlot => write!(f, "CAR_OCCUPANCY_SLOT"),
            Self::CarLapTimeCount => write!(f, "CAR_LAP_TIME_COUNT"),
            Self::SegmentOccupantCount => write!(f, "SEGMENT_OCCUPANT_COUNT"),
        }
    }
}

/// Fatal precondition violations reported before a race can start. Nothing
/// here is recoverable mid-tick; the update loop never surfaces errors.
#[derive(Clone, Debug, PartialEq)]
pub enum SetupError {
    EmptyTrack,
    NonPositiveSegmentLength { value: f32 },
    NonPositiveFrameRate { value: f32 },
    ZeroLanes,
    ZeroRumbleLength,
    ZeroLaps,
    SegmentOutOfRange { index: usize, segment_count: usize },
}

impl fmt::Display for SetupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyTrack => write!(f, "track has no segments"),
            Self::NonPositiveSegmentLength { value } => {
                write!(f, "segment length must be positive, got {value}")
            }
            Self::NonPositiveFrameRate { value } => {
                write!(f, "frame rate must be positive, got {value}")
            }
            Self::ZeroLanes => write!(f, "lane count must be at least 1"),
            Self::ZeroRumbleLength => write!(f, "rumble length must be at least 1"),
            Self::ZeroLaps => write!(f, "race needs at least 1 lap"),
            Self::SegmentOutOfRange {
                index,
                segment_count,
            } => write!(
                f,
                "segment index {index} out of range (track has {segment_count})"
            ),
        }
    }
}

impl std::error::Error for SetupError {}
