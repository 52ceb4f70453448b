//! Status reports
//!
//! Each report renders as one line of plain text for the host's serial
//! or display channel.

use core::fmt::{self, Write};

use crate::geometry::CORNER_COUNT;
use crate::traits::Reporter;

use super::error::LevelingError;

/// A status line emitted during a run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Report {
    /// Run accepted, about to home
    Started { max_iterations: u8 },
    /// Deviations measured in one pass, in motor order
    DeviationSummary {
        iteration: u8,
        deviations: [i32; CORNER_COUNT],
    },
    /// Final spread against the tolerance
    Spread { spread: u32, tolerance: u32 },
    /// Passes used against the cap
    Iterations { iterations: u8, max_iterations: u8 },
    /// Run finished and the probe offset is restored
    Ended { converged: bool },
    /// Run aborted
    Fault(LevelingError),
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Report::Started { .. } => f.write_str("Starting bed leveling..."),
            Report::DeviationSummary { deviations, .. } => {
                f.write_str("Deviation summary: ")?;
                for (i, d) in deviations.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", d)?;
                }
                Ok(())
            }
            Report::Spread { spread, tolerance } => write!(f, "Spread: {}/{}", spread, tolerance),
            Report::Iterations {
                iterations,
                max_iterations,
            } => write!(f, "Iterations: {}/{}", iterations, max_iterations),
            Report::Ended { converged: true } => f.write_str("Ended bed leveling."),
            Report::Ended { converged: false } => {
                f.write_str("Ended bed leveling (iteration cap reached).")
            }
            Report::Fault(e) => write!(f, "Leveling fault: {}", e),
        }
    }
}

/// Reporter that writes one line per report to a text sink
///
/// Write errors are dropped; a failing status channel must not abort
/// a run half way through a correction.
pub struct TextReporter<W> {
    out: W,
}

impl<W: Write> TextReporter<W> {
    /// Wrap a text sink
    pub fn new(out: W) -> Self {
        Self { out }
    }

    /// Get the underlying sink
    pub fn get_ref(&self) -> &W {
        &self.out
    }

    /// Consume the reporter and return the sink
    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Reporter for TextReporter<W> {
    fn report(&mut self, report: &Report) {
        let _ = writeln!(self.out, "{}", report);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Corner;
    use heapless::String;

    #[test]
    fn test_summary_line() {
        let mut reporter = TextReporter::new(String::<128>::new());
        reporter.report(&Report::DeviationSummary {
            iteration: 1,
            deviations: [3, -3, 0, 0],
        });
        assert_eq!(reporter.get_ref().as_str(), "Deviation summary: 3, -3, 0, 0\n");
    }

    #[test]
    fn test_finish_lines() {
        let mut reporter = TextReporter::new(String::<128>::new());
        reporter.report(&Report::Spread {
            spread: 1,
            tolerance: 2,
        });
        reporter.report(&Report::Iterations {
            iterations: 2,
            max_iterations: 5,
        });
        reporter.report(&Report::Ended { converged: true });
        assert_eq!(
            reporter.into_inner().as_str(),
            "Spread: 1/2\nIterations: 2/5\nEnded bed leveling.\n"
        );
    }

    #[test]
    fn test_fault_line() {
        let mut reporter = TextReporter::new(String::<128>::new());
        reporter.report(&Report::Fault(LevelingError::Endstop {
            corner: Corner::ALL[1],
        }));
        assert_eq!(
            reporter.get_ref().as_str(),
            "Leveling fault: endstop read failed at corner 1\n"
        );
    }

    #[test]
    fn test_full_sink_does_not_panic() {
        let mut reporter = TextReporter::new(String::<8>::new());
        reporter.report(&Report::Started { max_iterations: 5 });
        assert!(reporter.get_ref().len() <= 8);
    }
}
