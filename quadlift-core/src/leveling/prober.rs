//! Corner deviation measurement
//!
//! With the nozzle parked over a corner at the reference height, the
//! shared endstop is either pressed (corner sits high) or open. The prober
//! jogs Z one quantum at a time until the switch flips and reports the
//! signed jog count:
//!
//! - open → jog toward the switch, count up; result ≥ 0
//! - pressed → jog away from the switch, count down, then add one for
//!   the final jog that overshot the trip point; result ≤ 0
//!
//! Counting whole jogs keeps the measurement exact no matter how many
//! passes a run takes.

use quadlift_protocol::MotionCommand;

use crate::config::LevelingConfig;
use crate::geometry::Corner;
use crate::traits::{Endstop, MotionQueue};

use super::error::{LevelingError, Phase};

/// Measure one corner's deviation in jog quanta
///
/// Relative positioning must already be active. Absolute positioning is
/// restored before returning, on the error paths too.
pub fn probe_deviation<H>(
    host: &mut H,
    config: &LevelingConfig,
    corner: Corner,
) -> Result<i32, LevelingError>
where
    H: MotionQueue + Endstop + ?Sized,
{
    let measured = count_jogs(host, config, corner);
    let restored = host
        .submit(&MotionCommand::absolute())
        .map_err(LevelingError::motion(Phase::Measure(corner)));

    let deviation = measured?;
    restored?;
    Ok(deviation)
}

fn read_endstop<H>(host: &mut H, corner: Corner) -> Result<bool, LevelingError>
where
    H: Endstop + ?Sized,
{
    host.is_triggered()
        .map_err(|_| LevelingError::Endstop { corner })
}

fn count_jogs<H>(host: &mut H, config: &LevelingConfig, corner: Corner) -> Result<i32, LevelingError>
where
    H: MotionQueue + Endstop + ?Sized,
{
    let on_motion_error = LevelingError::motion(Phase::Measure(corner));
    let quantum = i32::from(config.jog_quantum_um);

    let start_triggered = read_endstop(host, corner)?;
    let (jog_um, step) = if start_triggered {
        (quantum, -1)
    } else {
        (-quantum, 1)
    };
    let jog = MotionCommand::move_z(jog_um, config.jog_feedrate_mm_min);

    let mut deviation: i32 = 0;
    let mut jogs: u16 = 0;
    loop {
        if jogs >= config.max_probe_jogs {
            #[cfg(feature = "defmt")]
            defmt::warn!("{}: endstop stuck after {} jogs", corner, jogs);
            return Err(LevelingError::ProbeTimeout { corner, jogs });
        }

        host.submit(&jog).map_err(&on_motion_error)?;
        host.synchronize().map_err(&on_motion_error)?;
        deviation += step;
        jogs += 1;

        if read_endstop(host, corner)? != start_triggered {
            break;
        }
    }

    if start_triggered {
        deviation += 1;
    }
    Ok(deviation)
}
