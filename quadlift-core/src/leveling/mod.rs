//! Four-corner mechanical bed leveling
//!
//! A run repeats measure → correct → evaluate passes:
//!
//! 1. Home Z to re-establish the reference height.
//! 2. At each corner, count fixed-size Z jogs until the shared endstop
//!    changes state ([`prober`]).
//! 3. Drive each corner's lift motor by its deviation ([`driver`]).
//! 4. Stop once the spread between corners is within tolerance or the
//!    iteration cap is reached ([`controller`]).

pub mod controller;
pub mod driver;
pub mod error;
pub mod prober;
pub mod report;

pub use controller::{evaluate, spread, LevelingController, LevelingOutcome, LevelingState, Verdict};
pub use driver::drive_motor;
pub use error::{LevelingError, Phase};
pub use prober::probe_deviation;
pub use report::{Report, TextReporter};
