//! Hardware and host abstraction traits
//!
//! These traits define the interface between the leveling logic and
//! board- or firmware-specific implementations.

pub mod bus;
pub mod endstop;
pub mod host;
pub mod motion;

pub use bus::{LiftDirection, MotorBus, MotorBusError};
pub use endstop::{Endstop, EndstopError};
pub use host::{Housekeeping, LevelingHost, ProbeOffsetStore, Reporter};
pub use motion::{MotionError, MotionQueue};
