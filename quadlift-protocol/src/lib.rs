//! Textual motion command protocol
//!
//! This crate defines the line-oriented commands exchanged between the
//! leveling routine and the host motion system. The leveling code never
//! talks to the planner directly; it submits commands that render as
//! ordinary G-code lines:
//!
//! ```text
//! G28 X Y                          home X and Y
//! G28 Z                            home Z
//! G90 / G91                        absolute / relative positioning
//! G1 X20.000 Y200.000 Z0.000 F1300 linear move
//! M851 Z-1.25                      probe Z offset
//! M777 P3                          run leveling, at most 3 passes
//! ```
//!
//! All distances are carried as integer micrometres and rendered as
//! fixed-point millimetres, so no floating point is involved anywhere.

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod command;
pub mod fixed;
pub mod gcode;
pub mod word;

pub use command::{LevelCommand, LEVEL_CODE};
pub use fixed::{parse_mm, write_mm, UM_PER_MM};
pub use gcode::{GcodeError, HomeAxes, Line, LinearMove, MotionCommand, Positioning, MAX_LINE_LEN};
pub use word::{Word, Words};
