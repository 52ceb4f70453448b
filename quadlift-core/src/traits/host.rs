//! Host services consumed by the leveling run

use crate::leveling::Report;

use super::{Endstop, MotionQueue};

/// Persisted probe offset (`M851`)
pub trait ProbeOffsetStore {
    /// Current probe Z offset in micrometres
    fn z_offset_um(&self) -> i32;

    /// Replace the probe Z offset
    fn set_z_offset_um(&mut self, z_um: i32);
}

/// Line-oriented status channel
pub trait Reporter {
    /// Emit one status report
    fn report(&mut self, report: &Report);
}

/// Background work that must keep running during long blocking loops
///
/// Called after every step pulse so temperature regulation and the
/// watchdog are serviced while a correction is in progress.
pub trait Housekeeping {
    fn idle(&mut self);
}

impl Housekeeping for () {
    fn idle(&mut self) {}
}

/// Everything a leveling run needs from the host besides the motor bus
///
/// Blanket-implemented, so firmware only implements the individual
/// traits on its machine type.
pub trait LevelingHost: MotionQueue + Endstop + ProbeOffsetStore + Reporter + Housekeeping {}

impl<T> LevelingHost for T where
    T: MotionQueue + Endstop + ProbeOffsetStore + Reporter + Housekeeping + ?Sized
{
}
