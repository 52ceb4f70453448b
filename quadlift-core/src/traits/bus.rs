//! Motor bus trait
//!
//! The four lift motors share one step line and one direction line. A
//! motor only moves when its select line is active, and the shared Z
//! enable line controls holding current for all of them.
//!
//! ```text
//!            ┌── SEL0 ── motor 0
//!  STEP ─┐   ├── SEL1 ── motor 1
//!  DIR  ─┼───┼── SEL2 ── motor 2
//!  ZEN  ─┘   └── SEL3 ── motor 3
//! ```

use core::fmt;

use crate::geometry::Corner;

/// Lift direction of the selected motor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LiftDirection {
    /// Raise the corner
    Up,
    /// Lower the corner
    Down,
}

impl LiftDirection {
    /// Direction that corrects a signed deviation
    pub fn for_deviation(units: i32) -> Self {
        if units > 0 {
            LiftDirection::Up
        } else {
            LiftDirection::Down
        }
    }
}

/// A motor control line failed to switch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MotorBusError {
    /// Shared direction line
    Direction,
    /// Shared Z enable (holding current) line
    Enable,
    /// Select line of one motor
    Select(Corner),
    /// Shared step line
    Step,
}

impl fmt::Display for MotorBusError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MotorBusError::Direction => f.write_str("direction line"),
            MotorBusError::Enable => f.write_str("enable line"),
            MotorBusError::Select(corner) => write!(f, "select line of {}", corner),
            MotorBusError::Step => f.write_str("step line"),
        }
    }
}

/// Exclusive access to the shared lift motor lines
///
/// Implementations must keep the select lines mutually exclusive:
/// `select` activates exactly one motor and deactivates the other three.
pub trait MotorBus {
    /// Set the shared direction line
    fn set_direction(&mut self, dir: LiftDirection) -> Result<(), MotorBusError>;

    /// Drop holding current on the shared enable line
    ///
    /// All motors are free to move until [`MotorBus::hold_all`].
    fn release_hold(&mut self) -> Result<(), MotorBusError>;

    /// Route step pulses to exactly one motor
    fn select(&mut self, corner: Corner) -> Result<(), MotorBusError>;

    /// Emit one step pulse: high, delay, low, delay
    fn pulse(&mut self) -> Result<(), MotorBusError>;

    /// Deselect every motor and re-engage holding current
    fn hold_all(&mut self) -> Result<(), MotorBusError>;
}

impl<B: MotorBus + ?Sized> MotorBus for &mut B {
    fn set_direction(&mut self, dir: LiftDirection) -> Result<(), MotorBusError> {
        (**self).set_direction(dir)
    }

    fn release_hold(&mut self) -> Result<(), MotorBusError> {
        (**self).release_hold()
    }

    fn select(&mut self, corner: Corner) -> Result<(), MotorBusError> {
        (**self).select(corner)
    }

    fn pulse(&mut self) -> Result<(), MotorBusError> {
        (**self).pulse()
    }

    fn hold_all(&mut self) -> Result<(), MotorBusError> {
        (**self).hold_all()
    }
}
