//! Motion commands and their G-code text form
//!
//! Only the handful of commands the leveling routine issues are modelled.
//! Each renders to exactly one line; [`MotionCommand::parse`] accepts
//! both the spaced form produced here and the packed form
//! (`G1X20.000Y40.000Z0F1300`) common in firmware sources.

use core::fmt::{self, Write};

use heapless::String;

use crate::fixed::{parse_mm, write_mm};
use crate::word::{Word, Words};

/// Maximum rendered line length in bytes
pub const MAX_LINE_LEN: usize = 64;

/// A rendered command line
pub type Line = String<MAX_LINE_LEN>;

/// Fractional digits for move coordinates
const MOVE_DECIMALS: u8 = 3;

/// Fractional digits for the probe offset
const OFFSET_DECIMALS: u8 = 2;

/// Errors from rendering or parsing a command line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum GcodeError {
    /// Line contains no command word
    Empty,
    /// Command letter/number is not one we handle
    UnknownCommand,
    /// Word value is not a valid number
    InvalidNumber(char),
    /// Word is not allowed for this command
    UnexpectedWord(char),
    /// Required word is missing
    MissingWord(char),
    /// Rendered line would exceed [`MAX_LINE_LEN`]
    LineTooLong,
}

/// Positioning mode (`G90` / `G91`)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Positioning {
    /// Coordinates are absolute machine positions
    Absolute,
    /// Coordinates are offsets from the current position
    Relative,
}

/// Axes to home with `G28`
///
/// No axis set means "home all", matching bare `G28`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct HomeAxes {
    /// Home X
    pub x: bool,
    /// Home Y
    pub y: bool,
    /// Home Z
    pub z: bool,
}

/// Linear move (`G1`)
///
/// Coordinates are micrometres, feedrate is mm/min. Omitted words leave
/// the corresponding axis (or feedrate) unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LinearMove {
    pub x_um: Option<i32>,
    pub y_um: Option<i32>,
    pub z_um: Option<i32>,
    pub feedrate_mm_min: Option<u32>,
}

/// Commands submitted to the host motion system
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MotionCommand {
    /// Home the given axes
    Home(HomeAxes),
    /// Switch positioning mode
    SetPositioning(Positioning),
    /// Linear move
    LinearMove(LinearMove),
    /// Set the probe Z offset in micrometres
    SetProbeZOffset { z_um: i32 },
}

impl MotionCommand {
    /// `G28 X Y`
    pub const fn home_xy() -> Self {
        Self::Home(HomeAxes {
            x: true,
            y: true,
            z: false,
        })
    }

    /// `G28 Z`
    pub const fn home_z() -> Self {
        Self::Home(HomeAxes {
            x: false,
            y: false,
            z: true,
        })
    }

    /// `G90`
    pub const fn absolute() -> Self {
        Self::SetPositioning(Positioning::Absolute)
    }

    /// `G91`
    pub const fn relative() -> Self {
        Self::SetPositioning(Positioning::Relative)
    }

    /// Move to an XYZ position at the given feedrate
    pub const fn move_to(x_um: i32, y_um: i32, z_um: i32, feedrate_mm_min: u32) -> Self {
        Self::LinearMove(LinearMove {
            x_um: Some(x_um),
            y_um: Some(y_um),
            z_um: Some(z_um),
            feedrate_mm_min: Some(feedrate_mm_min),
        })
    }

    /// Move to an XY position, leaving Z alone
    pub const fn move_xy(x_um: i32, y_um: i32, feedrate_mm_min: u32) -> Self {
        Self::LinearMove(LinearMove {
            x_um: Some(x_um),
            y_um: Some(y_um),
            z_um: None,
            feedrate_mm_min: Some(feedrate_mm_min),
        })
    }

    /// Z-only move; a jog when relative positioning is active
    pub const fn move_z(z_um: i32, feedrate_mm_min: u32) -> Self {
        Self::LinearMove(LinearMove {
            x_um: None,
            y_um: None,
            z_um: Some(z_um),
            feedrate_mm_min: Some(feedrate_mm_min),
        })
    }

    /// Render this command into a bounded line
    pub fn to_line(&self) -> Result<Line, GcodeError> {
        let mut line = Line::new();
        write!(line, "{}", self).map_err(|_| GcodeError::LineTooLong)?;
        Ok(line)
    }

    /// Parse one line of G-code into a command
    pub fn parse(line: &str) -> Result<Self, GcodeError> {
        let mut words = Words::new(line);
        let head = match words.next() {
            Some(Ok(word)) => word,
            Some(Err(c)) => return Err(GcodeError::UnexpectedWord(c)),
            None => return Err(GcodeError::Empty),
        };
        let code: u16 = head
            .value
            .parse()
            .map_err(|_| GcodeError::InvalidNumber(head.letter))?;

        match (head.letter, code) {
            ('G', 28) => parse_home(words),
            ('G', 90) => expect_end(words).map(|_| Self::absolute()),
            ('G', 91) => expect_end(words).map(|_| Self::relative()),
            ('G', 0) | ('G', 1) => parse_move(words),
            ('M', 851) => parse_probe_offset(words),
            _ => Err(GcodeError::UnknownCommand),
        }
    }
}

fn next_word<'a>(words: &mut Words<'a>) -> Result<Option<Word<'a>>, GcodeError> {
    words.next().transpose().map_err(GcodeError::UnexpectedWord)
}

fn expect_end(mut words: Words<'_>) -> Result<(), GcodeError> {
    match next_word(&mut words)? {
        Some(word) => Err(GcodeError::UnexpectedWord(word.letter)),
        None => Ok(()),
    }
}

fn parse_home(mut words: Words<'_>) -> Result<MotionCommand, GcodeError> {
    let mut axes = HomeAxes::default();
    while let Some(word) = next_word(&mut words)? {
        if !(word.value.is_empty() || word.value == "0") {
            return Err(GcodeError::InvalidNumber(word.letter));
        }
        match word.letter {
            'X' => axes.x = true,
            'Y' => axes.y = true,
            'Z' => axes.z = true,
            other => return Err(GcodeError::UnexpectedWord(other)),
        }
    }
    Ok(MotionCommand::Home(axes))
}

fn parse_move(mut words: Words<'_>) -> Result<MotionCommand, GcodeError> {
    let mut mv = LinearMove::default();
    while let Some(word) = next_word(&mut words)? {
        let coord = || parse_mm(word.value).ok_or(GcodeError::InvalidNumber(word.letter));
        match word.letter {
            'X' => mv.x_um = Some(coord()?),
            'Y' => mv.y_um = Some(coord()?),
            'Z' => mv.z_um = Some(coord()?),
            'F' => {
                let feed = word
                    .value
                    .parse()
                    .map_err(|_| GcodeError::InvalidNumber('F'))?;
                mv.feedrate_mm_min = Some(feed);
            }
            other => return Err(GcodeError::UnexpectedWord(other)),
        }
    }
    Ok(MotionCommand::LinearMove(mv))
}

fn parse_probe_offset(mut words: Words<'_>) -> Result<MotionCommand, GcodeError> {
    let mut z_um = None;
    while let Some(word) = next_word(&mut words)? {
        match word.letter {
            'Z' => z_um = Some(parse_mm(word.value).ok_or(GcodeError::InvalidNumber('Z'))?),
            other => return Err(GcodeError::UnexpectedWord(other)),
        }
    }
    let z_um = z_um.ok_or(GcodeError::MissingWord('Z'))?;
    Ok(MotionCommand::SetProbeZOffset { z_um })
}

fn write_axis(f: &mut fmt::Formatter<'_>, letter: char, um: Option<i32>) -> fmt::Result {
    if let Some(um) = um {
        write!(f, " {}", letter)?;
        write_mm(f, um, MOVE_DECIMALS)?;
    }
    Ok(())
}

impl fmt::Display for MotionCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MotionCommand::Home(axes) => {
                f.write_str("G28")?;
                for (set, name) in [(axes.x, " X"), (axes.y, " Y"), (axes.z, " Z")] {
                    if set {
                        f.write_str(name)?;
                    }
                }
                Ok(())
            }
            MotionCommand::SetPositioning(Positioning::Absolute) => f.write_str("G90"),
            MotionCommand::SetPositioning(Positioning::Relative) => f.write_str("G91"),
            MotionCommand::LinearMove(mv) => {
                f.write_str("G1")?;
                write_axis(f, 'X', mv.x_um)?;
                write_axis(f, 'Y', mv.y_um)?;
                write_axis(f, 'Z', mv.z_um)?;
                if let Some(feed) = mv.feedrate_mm_min {
                    write!(f, " F{}", feed)?;
                }
                Ok(())
            }
            MotionCommand::SetProbeZOffset { z_um } => {
                f.write_str("M851 Z")?;
                write_mm(f, *z_um, OFFSET_DECIMALS)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_render_home() {
        assert_eq!(MotionCommand::home_xy().to_line().unwrap().as_str(), "G28 X Y");
        assert_eq!(MotionCommand::home_z().to_line().unwrap().as_str(), "G28 Z");
        let all = MotionCommand::Home(HomeAxes::default());
        assert_eq!(all.to_line().unwrap().as_str(), "G28");
    }

    #[test]
    fn test_render_positioning() {
        assert_eq!(MotionCommand::absolute().to_line().unwrap().as_str(), "G90");
        assert_eq!(MotionCommand::relative().to_line().unwrap().as_str(), "G91");
    }

    #[test]
    fn test_render_corner_move() {
        let cmd = MotionCommand::move_to(20_000, 200_000, 0, 1300);
        assert_eq!(
            cmd.to_line().unwrap().as_str(),
            "G1 X20.000 Y200.000 Z0.000 F1300"
        );
    }

    #[test]
    fn test_render_jog() {
        assert_eq!(
            MotionCommand::move_z(-100, 500).to_line().unwrap().as_str(),
            "G1 Z-0.100 F500"
        );
    }

    #[test]
    fn test_render_probe_offset() {
        let cmd = MotionCommand::SetProbeZOffset { z_um: -1_250 };
        assert_eq!(cmd.to_line().unwrap().as_str(), "M851 Z-1.25");
        let zero = MotionCommand::SetProbeZOffset { z_um: 0 };
        assert_eq!(zero.to_line().unwrap().as_str(), "M851 Z0.00");
    }

    #[test]
    fn test_parse_packed_move() {
        let cmd = MotionCommand::parse("G1X20.000Y200.000Z0F1300").unwrap();
        assert_eq!(cmd, MotionCommand::move_to(20_000, 200_000, 0, 1300));
    }

    #[test]
    fn test_parse_commands() {
        assert_eq!(MotionCommand::parse("G28 X Y"), Ok(MotionCommand::home_xy()));
        assert_eq!(MotionCommand::parse("g28 z"), Ok(MotionCommand::home_z()));
        assert_eq!(MotionCommand::parse("G91"), Ok(MotionCommand::relative()));
        assert_eq!(MotionCommand::parse("G90 ; back"), Ok(MotionCommand::absolute()));
        assert_eq!(
            MotionCommand::parse("G1 Z0.1 F500"),
            Ok(MotionCommand::move_z(100, 500))
        );
        assert_eq!(
            MotionCommand::parse("M851 Z-0.75"),
            Ok(MotionCommand::SetProbeZOffset { z_um: -750 })
        );
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(MotionCommand::parse("   "), Err(GcodeError::Empty));
        assert_eq!(MotionCommand::parse("G29"), Err(GcodeError::UnknownCommand));
        assert_eq!(MotionCommand::parse("Gx"), Err(GcodeError::InvalidNumber('G')));
        assert_eq!(
            MotionCommand::parse("G1 E5"),
            Err(GcodeError::UnexpectedWord('E'))
        );
        assert_eq!(
            MotionCommand::parse("G1 Z0.1 F5.5"),
            Err(GcodeError::InvalidNumber('F'))
        );
        assert_eq!(MotionCommand::parse("M851"), Err(GcodeError::MissingWord('Z')));
        assert_eq!(
            MotionCommand::parse("G90 X1"),
            Err(GcodeError::UnexpectedWord('X'))
        );
    }

    proptest! {
        #[test]
        fn prop_any_move_fits_a_line(
            x in proptest::option::of(any::<i32>()),
            y in proptest::option::of(any::<i32>()),
            z in proptest::option::of(any::<i32>()),
            f in proptest::option::of(any::<u32>()),
        ) {
            let cmd = MotionCommand::LinearMove(LinearMove {
                x_um: x,
                y_um: y,
                z_um: z,
                feedrate_mm_min: f,
            });
            let line = cmd.to_line();
            prop_assert!(line.is_ok());
            prop_assert!(line.unwrap().is_ascii());
        }

        #[test]
        fn prop_parse_never_panics(line in "\\PC{0,80}") {
            let _ = MotionCommand::parse(&line);
        }
    }
}
