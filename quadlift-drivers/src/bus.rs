//! GPIO motor bus
//!
//! Drives the four lift motors through the shared step/dir lines, one
//! active-low select line per motor and the shared active-low Z enable.
//!
//! | line   | high            | low            |
//! |--------|-----------------|----------------|
//! | DIR    | up              | down           |
//! | ZEN    | current off     | holding        |
//! | SEL n  | motor n ignored | motor n steps  |

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;

use quadlift_core::geometry::{Corner, CORNER_COUNT};
use quadlift_core::traits::{LiftDirection, MotorBus, MotorBusError};
use quadlift_core::LevelingConfig;

/// Motor bus on plain GPIO outputs
pub struct GpioMotorBus<SEL, EN, STEP, DIR, D> {
    select: [SEL; CORNER_COUNT],
    enable: EN,
    step: STEP,
    dir: DIR,
    delay: D,
    /// Step high time and low time (µs)
    pulse_delay_us: u32,
}

impl<SEL, EN, STEP, DIR, D> GpioMotorBus<SEL, EN, STEP, DIR, D>
where
    SEL: OutputPin,
    EN: OutputPin,
    STEP: OutputPin,
    DIR: OutputPin,
    D: DelayNs,
{
    /// Take ownership of the bus lines and put them in the hold state
    ///
    /// # Arguments
    /// - `select`: select line per motor, in corner order
    /// - `enable`: shared Z enable line
    /// - `pulse_delay_us`: step high time, and the low time after it
    pub fn new(
        select: [SEL; CORNER_COUNT],
        enable: EN,
        step: STEP,
        dir: DIR,
        delay: D,
        pulse_delay_us: u32,
    ) -> Result<Self, MotorBusError> {
        let mut bus = Self {
            select,
            enable,
            step,
            dir,
            delay,
            pulse_delay_us,
        };
        bus.step.set_low().map_err(|_| MotorBusError::Step)?;
        bus.hold_all()?;
        Ok(bus)
    }

    /// Create a bus timed from the leveling configuration
    pub fn from_config(
        select: [SEL; CORNER_COUNT],
        enable: EN,
        step: STEP,
        dir: DIR,
        delay: D,
        config: &LevelingConfig,
    ) -> Result<Self, MotorBusError> {
        Self::new(select, enable, step, dir, delay, config.pulse_delay_us)
    }

    /// Release the pins
    pub fn release(self) -> ([SEL; CORNER_COUNT], EN, STEP, DIR, D) {
        (self.select, self.enable, self.step, self.dir, self.delay)
    }

    fn deselect(&mut self, index: usize) -> Result<(), MotorBusError> {
        let corner = Corner::ALL[index];
        self.select[index]
            .set_high()
            .map_err(|_| MotorBusError::Select(corner))
    }
}

impl<SEL, EN, STEP, DIR, D> MotorBus for GpioMotorBus<SEL, EN, STEP, DIR, D>
where
    SEL: OutputPin,
    EN: OutputPin,
    STEP: OutputPin,
    DIR: OutputPin,
    D: DelayNs,
{
    fn set_direction(&mut self, dir: LiftDirection) -> Result<(), MotorBusError> {
        match dir {
            LiftDirection::Up => self.dir.set_high(),
            LiftDirection::Down => self.dir.set_low(),
        }
        .map_err(|_| MotorBusError::Direction)
    }

    fn release_hold(&mut self) -> Result<(), MotorBusError> {
        self.enable.set_high().map_err(|_| MotorBusError::Enable)
    }

    fn select(&mut self, corner: Corner) -> Result<(), MotorBusError> {
        // Deactivate the others first so two motors are never active together
        for index in 0..CORNER_COUNT {
            if index != corner.index() {
                self.deselect(index)?;
            }
        }
        self.select[corner.index()]
            .set_low()
            .map_err(|_| MotorBusError::Select(corner))
    }

    fn pulse(&mut self) -> Result<(), MotorBusError> {
        self.step.set_high().map_err(|_| MotorBusError::Step)?;
        self.delay.delay_us(self.pulse_delay_us);
        self.step.set_low().map_err(|_| MotorBusError::Step)?;
        self.delay.delay_us(self.pulse_delay_us);
        Ok(())
    }

    fn hold_all(&mut self) -> Result<(), MotorBusError> {
        // Try every line even if one fails; report the first failure
        let mut first_err = None;
        for index in 0..CORNER_COUNT {
            if let Err(e) = self.deselect(index) {
                first_err.get_or_insert(e);
            }
        }
        if let Err(e) = self.enable.set_low().map_err(|_| MotorBusError::Enable) {
            first_err.get_or_insert(e);
        }
        first_err.map_or(Ok(()), Err)
    }
}
