//! Leveling configuration
//!
//! Defaults reproduce the reference machine: a 180 × 240 mm bed with lift
//! motors under (20,200) (20,40) (160,200) (160,40), 0.1 mm jog quantum
//! and 40 microsteps per quantum.

use core::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::geometry::{BedGeometry, BedPoint, CORNER_COUNT};
use crate::leveling::LevelingError;

/// Default corner inset from the left/right bed edges (mm)
pub const DEFAULT_INSET_X_MM: i32 = 20;

/// Default corner inset from the front/back bed edges (mm)
pub const DEFAULT_INSET_Y_MM: i32 = 40;

/// Default convergence tolerance in jog quanta (0.2 mm)
pub const DEFAULT_TOLERANCE: u32 = 2;

/// Default iteration cap
pub const DEFAULT_MAX_ITERATIONS: u8 = 5;

/// Default microsteps per jog quantum
///
/// The Z axis runs 400 steps/mm; one 0.1 mm quantum is 40 steps.
pub const DEFAULT_STEPS_PER_UNIT: u16 = 40;

/// Default half-period of a correction step pulse (µs)
pub const DEFAULT_PULSE_DELAY_US: u32 = 2_500;

/// Default jog quantum (µm)
pub const DEFAULT_JOG_QUANTUM_UM: u16 = 100;

/// Default jog feedrate (mm/min)
pub const DEFAULT_JOG_FEEDRATE: u32 = 500;

/// Default travel feedrate between corners (mm/min)
pub const DEFAULT_TRAVEL_FEEDRATE: u32 = 1_300;

/// Default bound on jogs per probe (20 mm at the default quantum)
pub const DEFAULT_MAX_PROBE_JOGS: u16 = 200;

/// Scalar configuration errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Bed width or depth is not positive
    EmptyBed,
    /// Iteration cap is zero
    ZeroIterations,
    /// Steps per jog quantum is zero
    ZeroStepsPerUnit,
    /// Jog quantum is zero
    ZeroJogQuantum,
    /// Probe jog bound is zero
    ZeroProbeJogs,
    /// A feedrate is zero
    ZeroFeedrate,
    /// Safe Z-home point is off the bed
    SafeHomeOffBed,
    /// Serialization failed (buffer too small)
    Serialize,
    /// Stored bytes are not a valid configuration
    Deserialize,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            ConfigError::EmptyBed => "bed dimensions must be positive",
            ConfigError::ZeroIterations => "iteration cap must be at least 1",
            ConfigError::ZeroStepsPerUnit => "steps per unit must be at least 1",
            ConfigError::ZeroJogQuantum => "jog quantum must be at least 1 um",
            ConfigError::ZeroProbeJogs => "probe jog bound must be at least 1",
            ConfigError::ZeroFeedrate => "feedrates must be positive",
            ConfigError::SafeHomeOffBed => "safe Z home point is off the bed",
            ConfigError::Serialize => "config does not fit the buffer",
            ConfigError::Deserialize => "stored config is invalid",
        };
        f.write_str(msg)
    }
}

/// Leveling configuration
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LevelingConfig {
    /// Printable bed area
    pub bed: BedGeometry,
    /// Measurement point above each lift motor, in motor-select order
    pub corners: [BedPoint; CORNER_COUNT],
    /// Where to park before homing Z; `None` leaves it to the host's
    /// own safe-homing behaviour
    pub safe_z_home: Option<BedPoint>,
    /// Largest accepted spread, in jog quanta
    pub tolerance: u32,
    /// Maximum measure/correct passes
    pub max_iterations: u8,
    /// Motor microsteps per jog quantum
    pub steps_per_unit: u16,
    /// Step pulse high/low time in µs
    pub pulse_delay_us: u32,
    /// Size of one probe jog in µm
    pub jog_quantum_um: u16,
    /// Probe jog feedrate (mm/min)
    pub jog_feedrate_mm_min: u32,
    /// Corner-to-corner travel feedrate (mm/min)
    pub travel_feedrate_mm_min: u32,
    /// Jogs allowed before a probe is declared stuck
    pub max_probe_jogs: u16,
}

impl Default for LevelingConfig {
    fn default() -> Self {
        let bed = BedGeometry::default();
        Self {
            bed,
            corners: bed.corners(DEFAULT_INSET_X_MM * 1000, DEFAULT_INSET_Y_MM * 1000),
            safe_z_home: None,
            tolerance: DEFAULT_TOLERANCE,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            steps_per_unit: DEFAULT_STEPS_PER_UNIT,
            pulse_delay_us: DEFAULT_PULSE_DELAY_US,
            jog_quantum_um: DEFAULT_JOG_QUANTUM_UM,
            jog_feedrate_mm_min: DEFAULT_JOG_FEEDRATE,
            travel_feedrate_mm_min: DEFAULT_TRAVEL_FEEDRATE,
            max_probe_jogs: DEFAULT_MAX_PROBE_JOGS,
        }
    }
}

impl LevelingConfig {
    /// Configuration for a bed, with corners inset from its edges
    pub fn for_bed(bed: BedGeometry, inset_x_um: i32, inset_y_um: i32) -> Self {
        Self {
            bed,
            corners: bed.corners(inset_x_um, inset_y_um),
            ..Self::default()
        }
    }

    /// Check every field before any motion happens
    ///
    /// Scalar problems are reported as [`LevelingError::InvalidConfig`];
    /// the first corner found off the bed is reported as
    /// [`LevelingError::InvalidCornerGeometry`].
    pub fn validate(&self) -> Result<(), LevelingError> {
        self.validate_scalars().map_err(LevelingError::InvalidConfig)?;

        for (corner, point) in crate::geometry::Corner::ALL.iter().zip(self.corners.iter()) {
            if !self.bed.contains(*point) {
                return Err(LevelingError::InvalidCornerGeometry {
                    corner: *corner,
                    point: *point,
                });
            }
        }
        Ok(())
    }

    fn validate_scalars(&self) -> Result<(), ConfigError> {
        if self.bed.width_um <= 0 || self.bed.depth_um <= 0 {
            return Err(ConfigError::EmptyBed);
        }
        if self.max_iterations == 0 {
            return Err(ConfigError::ZeroIterations);
        }
        if self.steps_per_unit == 0 {
            return Err(ConfigError::ZeroStepsPerUnit);
        }
        if self.jog_quantum_um == 0 {
            return Err(ConfigError::ZeroJogQuantum);
        }
        if self.max_probe_jogs == 0 {
            return Err(ConfigError::ZeroProbeJogs);
        }
        if self.jog_feedrate_mm_min == 0 || self.travel_feedrate_mm_min == 0 {
            return Err(ConfigError::ZeroFeedrate);
        }
        if let Some(point) = self.safe_z_home {
            if !self.bed.contains(point) {
                return Err(ConfigError::SafeHomeOffBed);
            }
        }
        Ok(())
    }

    /// Physical size of a deviation in micrometres
    pub fn units_to_um(&self, units: i32) -> i64 {
        i64::from(units) * i64::from(self.jog_quantum_um)
    }

    /// Serialize into `buf` with postcard, returning the used prefix
    #[cfg(feature = "serde")]
    pub fn to_slice<'a>(&self, buf: &'a mut [u8]) -> Result<&'a mut [u8], ConfigError> {
        postcard::to_slice(self, buf).map_err(|_| ConfigError::Serialize)
    }

    /// Deserialize a postcard-encoded configuration and validate it
    #[cfg(feature = "serde")]
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ConfigError> {
        let config: Self = postcard::from_bytes(bytes).map_err(|_| ConfigError::Deserialize)?;
        config.validate_scalars()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Corner;

    #[test]
    fn test_default_is_valid() {
        let config = LevelingConfig::default();
        assert_eq!(config.validate(), Ok(()));
        assert_eq!(config.corners[0], BedPoint::from_mm(20, 200));
        assert_eq!(config.corners[3], BedPoint::from_mm(160, 40));
    }

    #[test]
    fn test_corner_off_bed() {
        let mut config = LevelingConfig::default();
        config.corners[2] = BedPoint::from_mm(181, 200);
        assert_eq!(
            config.validate(),
            Err(LevelingError::InvalidCornerGeometry {
                corner: Corner::ALL[2],
                point: BedPoint::from_mm(181, 200),
            })
        );
    }

    #[test]
    fn test_negative_inset_pushes_corners_off_bed() {
        let config = LevelingConfig::for_bed(BedGeometry::from_mm(200, 200), -1_000, 10_000);
        assert!(matches!(
            config.validate(),
            Err(LevelingError::InvalidCornerGeometry { corner, .. }) if corner == Corner::FIRST
        ));
    }

    #[test]
    fn test_scalar_validation() {
        let cases: [(fn(&mut LevelingConfig), ConfigError); 6] = [
            (|c| c.max_iterations = 0, ConfigError::ZeroIterations),
            (|c| c.steps_per_unit = 0, ConfigError::ZeroStepsPerUnit),
            (|c| c.jog_quantum_um = 0, ConfigError::ZeroJogQuantum),
            (|c| c.max_probe_jogs = 0, ConfigError::ZeroProbeJogs),
            (|c| c.travel_feedrate_mm_min = 0, ConfigError::ZeroFeedrate),
            (
                |c| c.safe_z_home = Some(BedPoint::from_mm(-5, 0)),
                ConfigError::SafeHomeOffBed,
            ),
        ];

        for (mutate, expected) in cases {
            let mut config = LevelingConfig::default();
            mutate(&mut config);
            assert_eq!(config.validate(), Err(LevelingError::InvalidConfig(expected)));
        }
    }

    #[test]
    fn test_empty_bed_reported_before_corners() {
        let mut config = LevelingConfig::default();
        config.bed = BedGeometry::from_mm(0, 240);
        assert_eq!(
            config.validate(),
            Err(LevelingError::InvalidConfig(ConfigError::EmptyBed))
        );
    }

    #[test]
    fn test_units_to_um() {
        let config = LevelingConfig::default();
        assert_eq!(config.units_to_um(-3), -300);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_postcard_persistence() {
        let mut config = LevelingConfig::default();
        config.max_iterations = 8;
        config.safe_z_home = Some(BedPoint::from_mm(90, 120));

        let mut buf = [0u8; 128];
        let used = config.to_slice(&mut buf).unwrap().len();
        let loaded = LevelingConfig::from_bytes(&buf[..used]).unwrap();
        assert_eq!(loaded, config);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_postcard_rejects_truncated() {
        let mut buf = [0u8; 128];
        let used = LevelingConfig::default().to_slice(&mut buf).unwrap().len();
        assert_eq!(
            LevelingConfig::from_bytes(&buf[..used / 2]),
            Err(ConfigError::Deserialize)
        );
    }
}
