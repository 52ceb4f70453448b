//! Leveling command (`M777`)
//!
//! `M777` starts a hardware bed leveling run. An optional `P<n>` word
//! overrides the configured iteration cap for that run only.

use core::fmt;

use crate::gcode::GcodeError;
use crate::word::Words;

/// M-code that starts a leveling run
pub const LEVEL_CODE: u16 = 777;

/// Parsed `M777` invocation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LevelCommand {
    /// Iteration cap override (`P`), at least 1
    pub max_iterations: Option<u8>,
}

impl LevelCommand {
    /// Parse `M777 [P<n>]`
    ///
    /// `P` must be an integer in `1..=255`.
    pub fn parse(line: &str) -> Result<Self, GcodeError> {
        let mut words = Words::new(line);
        let head = match words.next() {
            Some(Ok(word)) => word,
            Some(Err(c)) => return Err(GcodeError::UnexpectedWord(c)),
            None => return Err(GcodeError::Empty),
        };
        if head.letter != 'M' || head.value.parse::<u16>() != Ok(LEVEL_CODE) {
            return Err(GcodeError::UnknownCommand);
        }

        let mut command = LevelCommand::default();
        for word in words {
            let word = word.map_err(GcodeError::UnexpectedWord)?;
            match word.letter {
                'P' => {
                    let cap = word
                        .value
                        .parse::<u8>()
                        .ok()
                        .filter(|&n| n > 0)
                        .ok_or(GcodeError::InvalidNumber('P'))?;
                    command.max_iterations = Some(cap);
                }
                other => return Err(GcodeError::UnexpectedWord(other)),
            }
        }
        Ok(command)
    }
}

impl fmt::Display for LevelCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "M{}", LEVEL_CODE)?;
        if let Some(cap) = self.max_iterations {
            write!(f, " P{}", cap)?;
        }
        Ok(())
    }
}
