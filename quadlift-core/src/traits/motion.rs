//! Host motion queue
//!
//! Motion commands are asynchronous submissions. The only way to observe
//! completion is [`MotionQueue::synchronize`], which blocks until the
//! planner has drained.

use core::fmt;

use quadlift_protocol::{GcodeError, MotionCommand};

/// Errors reported by the motion queue
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MotionError {
    /// The planner refused the command
    Rejected,
    /// The command could not be rendered
    Format(GcodeError),
}

impl From<GcodeError> for MotionError {
    fn from(e: GcodeError) -> Self {
        MotionError::Format(e)
    }
}

impl fmt::Display for MotionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MotionError::Rejected => f.write_str("command rejected"),
            MotionError::Format(e) => write!(f, "command not encodable ({:?})", e),
        }
    }
}

/// Planner queue owned by the host firmware
pub trait MotionQueue {
    /// Enqueue a command
    fn submit(&mut self, command: &MotionCommand) -> Result<(), MotionError>;

    /// Block until every queued move has finished
    fn synchronize(&mut self) -> Result<(), MotionError>;
}
