//! Hardware bindings for the leveling core
//!
//! This crate implements the traits defined in quadlift-core on top of
//! `embedded-hal` 1.0 and a G-code text host:
//!
//! - Motor bus (four select lines, shared enable, step and direction)
//! - Z endstop with configurable polarity
//! - Motion queue that emits G-code lines

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod bus;
pub mod endstop;
pub mod gcode;

pub use bus::GpioMotorBus;
pub use endstop::GpioEndstop;
pub use gcode::{GcodeMotionQueue, GcodeSink, SYNC_LINE};
