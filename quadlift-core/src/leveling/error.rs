//! Leveling errors

use core::fmt;

use quadlift_protocol::write_mm;

use crate::config::ConfigError;
use crate::geometry::{BedPoint, Corner};
use crate::traits::{MotionError, MotorBusError};

/// Where in a run a motion command failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Phase {
    /// Offset capture and XY homing
    Init,
    /// Per-pass Z homing
    Homing,
    /// Travelling to or probing a corner
    Measure(Corner),
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Init => f.write_str("init"),
            Phase::Homing => f.write_str("Z homing"),
            Phase::Measure(corner) => write!(f, "measuring {}", corner),
        }
    }
}

/// Errors that abort a leveling run
///
/// Reaching the iteration cap is not an error; it is reported through
/// [`LevelingOutcome::converged`](super::LevelingOutcome).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LevelingError {
    /// The endstop did not change state within the jog bound
    ProbeTimeout { corner: Corner, jogs: u16 },
    /// A measurement point lies outside the bed
    InvalidCornerGeometry { corner: Corner, point: BedPoint },
    /// A scalar configuration value is unusable
    InvalidConfig(ConfigError),
    /// The motion queue failed
    Motion { phase: Phase, error: MotionError },
    /// A motor line failed while correcting a corner
    Bus { corner: Corner, error: MotorBusError },
    /// The endstop could not be read
    Endstop { corner: Corner },
}

impl LevelingError {
    pub(crate) fn motion(phase: Phase) -> impl Fn(MotionError) -> Self {
        move |error| LevelingError::Motion { phase, error }
    }
}

impl fmt::Display for LevelingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LevelingError::ProbeTimeout { corner, jogs } => {
                write!(f, "probe did not trigger at {} after {} jogs", corner, jogs)
            }
            LevelingError::InvalidCornerGeometry { corner, point } => {
                write!(f, "{} at X", corner)?;
                write_mm(f, point.x_um, 3)?;
                f.write_str(" Y")?;
                write_mm(f, point.y_um, 3)?;
                f.write_str(" is off the bed")
            }
            LevelingError::InvalidConfig(e) => write!(f, "invalid config: {}", e),
            LevelingError::Motion { phase, error } => {
                write!(f, "motion failed during {}: {}", phase, error)
            }
            LevelingError::Bus { corner, error } => {
                write!(f, "{} fault while correcting {}", error, corner)
            }
            LevelingError::Endstop { corner } => {
                write!(f, "endstop read failed at {}", corner)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_the_corner() {
        let timeout = LevelingError::ProbeTimeout {
            corner: Corner::ALL[2],
            jogs: 200,
        };
        assert_eq!(
            timeout.to_string(),
            "probe did not trigger at corner 2 after 200 jogs"
        );

        let geometry = LevelingError::InvalidCornerGeometry {
            corner: Corner::ALL[1],
            point: BedPoint::new(-500, 40_000),
        };
        assert_eq!(
            geometry.to_string(),
            "corner 1 at X-0.500 Y40.000 is off the bed"
        );

        let bus = LevelingError::Bus {
            corner: Corner::ALL[3],
            error: MotorBusError::Select(Corner::ALL[3]),
        };
        assert_eq!(
            bus.to_string(),
            "select line of corner 3 fault while correcting corner 3"
        );
    }

    #[test]
    fn test_motion_message_names_phase() {
        let err = LevelingError::motion(Phase::Measure(Corner::FIRST))(MotionError::Rejected);
        assert_eq!(
            err.to_string(),
            "motion failed during measuring corner 0: command rejected"
        );
    }
}
