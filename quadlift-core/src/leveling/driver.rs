//! Corner correction
//!
//! Moves one lift motor by a signed number of jog quanta. The pulse
//! train is a blocking loop with no planner involvement; housekeeping
//! runs after every pulse.

use crate::geometry::Corner;
use crate::traits::{Housekeeping, LiftDirection, MotorBus, MotorBusError};

/// Drive one corner's motor by `units` jog quanta
///
/// Emits `|units| × steps_per_unit` step pulses with only `corner`
/// selected, then deselects every motor and re-engages holding current.
/// `units == 0` touches no line at all.
///
/// If a line fails mid-train the bus is still returned to the hold state
/// before the first error is reported.
///
/// Returns the number of pulses emitted.
pub fn drive_motor<B, H>(
    bus: &mut B,
    housekeeping: &mut H,
    corner: Corner,
    units: i32,
    steps_per_unit: u16,
) -> Result<u64, MotorBusError>
where
    B: MotorBus + ?Sized,
    H: Housekeeping + ?Sized,
{
    if units == 0 {
        return Ok(0);
    }

    let pulses = u64::from(units.unsigned_abs()) * u64::from(steps_per_unit);
    let train = pulse_train(
        bus,
        housekeeping,
        corner,
        LiftDirection::for_deviation(units),
        pulses,
    );
    let hold = bus.hold_all();

    train?;
    hold?;
    Ok(pulses)
}

fn pulse_train<B, H>(
    bus: &mut B,
    housekeeping: &mut H,
    corner: Corner,
    dir: LiftDirection,
    pulses: u64,
) -> Result<(), MotorBusError>
where
    B: MotorBus + ?Sized,
    H: Housekeeping + ?Sized,
{
    bus.set_direction(dir)?;
    bus.release_hold()?;
    bus.select(corner)?;

    for _ in 0..pulses {
        bus.pulse()?;
        housekeeping.idle();
    }
    Ok(())
}
