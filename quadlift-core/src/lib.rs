//! Board-agnostic core logic for four-corner bed leveling
//!
//! This crate contains all leveling logic that does not depend on
//! specific hardware implementations:
//!
//! - Hardware and host abstraction traits (motor bus, endstop, motion queue)
//! - Bed geometry and corner indexing
//! - Leveling configuration and validation
//! - Motor driver, deviation prober and the leveling state machine
//! - Status reports for the host's text channel

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod config;
pub mod geometry;
pub mod leveling;
pub mod traits;

pub use config::{ConfigError, LevelingConfig};
pub use geometry::{BedGeometry, BedPoint, Corner, CORNER_COUNT};
pub use leveling::{LevelingController, LevelingError, LevelingOutcome, Report};
