//! Shared Z endstop

/// The endstop input could not be read
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct EndstopError;

/// The single Z-minimum switch shared by all four corners
///
/// Polarity is resolved by the implementation; `true` always means the
/// switch is pressed.
pub trait Endstop {
    /// Read the switch state
    fn is_triggered(&mut self) -> Result<bool, EndstopError>;
}
