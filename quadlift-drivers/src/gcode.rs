//! G-code motion queue adapter
//!
//! Feeds motion commands to a host that accepts G-code text, such as the
//! firmware's own command injector or a serial link to the planner.

use quadlift_core::traits::{MotionError, MotionQueue};
use quadlift_protocol::MotionCommand;

/// `M400`: wait for all queued moves to finish
pub const SYNC_LINE: &str = "M400";

/// Destination for G-code lines
///
/// `send_line` returns once the host has accepted the line (for a serial
/// host, after its `ok`). Lines carry no terminator.
pub trait GcodeSink {
    type Error;

    fn send_line(&mut self, line: &str) -> Result<(), Self::Error>;
}

/// [`MotionQueue`] that renders every command as a G-code line
///
/// Synchronization is an `M400` line, so the sink must not accept it
/// until the planner has drained.
pub struct GcodeMotionQueue<S> {
    sink: S,
    lines_sent: u32,
}

impl<S: GcodeSink> GcodeMotionQueue<S> {
    pub fn new(sink: S) -> Self {
        Self {
            sink,
            lines_sent: 0,
        }
    }

    /// Lines accepted by the sink so far
    pub fn lines_sent(&self) -> u32 {
        self.lines_sent
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn into_inner(self) -> S {
        self.sink
    }

    fn send(&mut self, line: &str) -> Result<(), MotionError> {
        #[cfg(feature = "defmt")]
        defmt::trace!("> {}", line);

        self.sink.send_line(line).map_err(|_| MotionError::Rejected)?;
        self.lines_sent = self.lines_sent.wrapping_add(1);
        Ok(())
    }
}

impl<S: GcodeSink> MotionQueue for GcodeMotionQueue<S> {
    fn submit(&mut self, command: &MotionCommand) -> Result<(), MotionError> {
        let line = command.to_line()?;
        self.send(&line)
    }

    fn synchronize(&mut self) -> Result<(), MotionError> {
        self.send(SYNC_LINE)
    }
}
