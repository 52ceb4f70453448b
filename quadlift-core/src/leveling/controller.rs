//! Leveling state machine
//!
//! One call to [`LevelingController::run`] walks
//! `Init → (Homing → MeasureCorner ×4 → CorrectCorner ×4 → Evaluate)+`
//! and ends in `Done` or `Failed`. The probe offset captured in `Init` is
//! written back exactly once on every exit path.

use crate::config::{ConfigError, LevelingConfig};
use crate::geometry::{Corner, CORNER_COUNT};
use crate::traits::{LevelingHost, MotorBus};
use quadlift_protocol::{LevelCommand, MotionCommand};

use super::driver::drive_motor;
use super::error::{LevelingError, Phase};
use super::prober::probe_deviation;
use super::report::Report;

/// Controller states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LevelingState {
    /// No run in progress
    Idle,
    /// Saving the probe offset and homing X/Y
    Init,
    /// Re-homing Z at the start of a pass
    Homing,
    /// Travelling to and probing a corner
    MeasureCorner(Corner),
    /// Driving a corner's lift motor
    CorrectCorner(Corner),
    /// Comparing the pass's spread against the tolerance
    Evaluate,
    /// Run finished, converged or capped
    Done,
    /// Run aborted
    Failed,
}

impl LevelingState {
    /// Check if a run is in progress
    pub fn is_running(&self) -> bool {
        !matches!(
            self,
            LevelingState::Idle | LevelingState::Done | LevelingState::Failed
        )
    }
}

/// Decision taken at the end of a pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Verdict {
    /// Spread within tolerance
    Converged,
    /// Out of tolerance with no passes left
    CapReached,
    /// Out of tolerance, run another pass
    Continue,
}

/// Largest minus smallest deviation
pub fn spread(deviations: &[i32; CORNER_COUNT]) -> u32 {
    let (min, max) = deviations
        .iter()
        .fold((i32::MAX, i32::MIN), |(lo, hi), &d| (lo.min(d), hi.max(d)));
    max.abs_diff(min)
}

/// Decide what follows pass `iteration` (1-based) of `max_iterations`
///
/// A spread within tolerance converges even on the last pass.
pub fn evaluate(spread: u32, tolerance: u32, iteration: u8, max_iterations: u8) -> Verdict {
    if spread <= tolerance {
        Verdict::Converged
    } else if iteration >= max_iterations {
        Verdict::CapReached
    } else {
        Verdict::Continue
    }
}

/// Result of a run that was not aborted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LevelingOutcome {
    /// Passes performed
    pub iterations: u8,
    /// Spread of the last pass
    pub final_spread: u32,
    /// Whether the last pass was within tolerance
    pub converged: bool,
    /// Deviations measured in the last pass
    pub deviations: [i32; CORNER_COUNT],
}

/// Bookkeeping for one run
struct RunState {
    iteration: u8,
    max_iterations: u8,
    saved_offset_um: Option<i32>,
    deviations: [i32; CORNER_COUNT],
    spread: u32,
    converged: bool,
}

impl RunState {
    fn new(max_iterations: u8) -> Self {
        Self {
            iteration: 1,
            max_iterations,
            saved_offset_um: None,
            deviations: [0; CORNER_COUNT],
            spread: 0,
            converged: false,
        }
    }

    fn outcome(&self) -> LevelingOutcome {
        LevelingOutcome {
            iterations: self.iteration,
            final_spread: self.spread,
            converged: self.converged,
            deviations: self.deviations,
        }
    }
}

/// Four-corner leveling controller
///
/// Owns the motor bus; everything else comes from the host passed to
/// [`run`](Self::run).
pub struct LevelingController<B> {
    bus: B,
    config: LevelingConfig,
    state: LevelingState,
}

impl<B: MotorBus> LevelingController<B> {
    /// Create an idle controller
    pub fn new(bus: B, config: LevelingConfig) -> Self {
        Self {
            bus,
            config,
            state: LevelingState::Idle,
        }
    }

    /// Current state
    pub fn state(&self) -> LevelingState {
        self.state
    }

    /// Active configuration
    pub fn config(&self) -> &LevelingConfig {
        &self.config
    }

    /// Get a reference to the motor bus
    pub fn bus(&self) -> &B {
        &self.bus
    }

    /// Consume the controller and return the motor bus
    pub fn into_bus(self) -> B {
        self.bus
    }

    /// Level the bed
    ///
    /// `max_iterations` overrides the configured cap for this run only.
    /// Configuration and geometry are checked before any motion or offset
    /// change; a rejected run reports the fault and returns immediately.
    ///
    /// Hitting the cap is not an error: the outcome has
    /// `converged == false`.
    pub fn run<H>(
        &mut self,
        host: &mut H,
        max_iterations: Option<u8>,
    ) -> Result<LevelingOutcome, LevelingError>
    where
        H: LevelingHost + ?Sized,
    {
        let cap = max_iterations.unwrap_or(self.config.max_iterations);
        if let Err(e) = self.check(cap) {
            self.state = LevelingState::Failed;
            host.report(&Report::Fault(e));
            return Err(e);
        }

        #[cfg(feature = "defmt")]
        defmt::info!("Leveling started, cap {} passes", cap);
        host.report(&Report::Started {
            max_iterations: cap,
        });

        let mut run = RunState::new(cap);
        self.state = LevelingState::Init;
        let result = self.drive(host, &mut run);

        if let Some(saved) = run.saved_offset_um.take() {
            host.set_z_offset_um(saved);
        }

        match result {
            Ok(()) => {
                self.state = LevelingState::Done;
                let outcome = run.outcome();

                #[cfg(feature = "defmt")]
                defmt::info!(
                    "Leveling ended after {} passes, spread {}",
                    outcome.iterations,
                    outcome.final_spread
                );

                host.report(&Report::Spread {
                    spread: outcome.final_spread,
                    tolerance: self.config.tolerance,
                });
                host.report(&Report::Iterations {
                    iterations: outcome.iterations,
                    max_iterations: cap,
                });
                host.report(&Report::Ended {
                    converged: outcome.converged,
                });
                Ok(outcome)
            }
            Err(e) => {
                self.state = LevelingState::Failed;

                #[cfg(feature = "defmt")]
                defmt::error!("Leveling aborted: {}", e);

                host.report(&Report::Fault(e));
                Err(e)
            }
        }
    }

    /// Run a parsed `M777` command
    pub fn run_command<H>(
        &mut self,
        host: &mut H,
        command: &LevelCommand,
    ) -> Result<LevelingOutcome, LevelingError>
    where
        H: LevelingHost + ?Sized,
    {
        self.run(host, command.max_iterations)
    }

    fn check(&self, cap: u8) -> Result<(), LevelingError> {
        if cap == 0 {
            return Err(LevelingError::InvalidConfig(ConfigError::ZeroIterations));
        }
        self.config.validate()
    }

    fn drive<H>(&mut self, host: &mut H, run: &mut RunState) -> Result<(), LevelingError>
    where
        H: LevelingHost + ?Sized,
    {
        while self.state.is_running() {
            self.state = self.step(host, run)?;
        }
        Ok(())
    }

    /// Execute the current state and return the next one
    fn step<H>(&mut self, host: &mut H, run: &mut RunState) -> Result<LevelingState, LevelingError>
    where
        H: LevelingHost + ?Sized,
    {
        use LevelingState::*;

        let next = match self.state {
            Init => {
                run.saved_offset_um = Some(host.z_offset_um());
                host.set_z_offset_um(0);

                let on_err = LevelingError::motion(Phase::Init);
                host.submit(&MotionCommand::absolute()).map_err(&on_err)?;
                host.submit(&MotionCommand::home_xy()).map_err(&on_err)?;
                host.synchronize().map_err(&on_err)?;
                Homing
            }

            Homing => {
                let on_err = LevelingError::motion(Phase::Homing);
                if let Some(point) = self.config.safe_z_home {
                    host.submit(&MotionCommand::absolute()).map_err(&on_err)?;
                    host.submit(&MotionCommand::move_xy(
                        point.x_um,
                        point.y_um,
                        self.config.travel_feedrate_mm_min,
                    ))
                    .map_err(&on_err)?;
                }
                host.submit(&MotionCommand::home_z()).map_err(&on_err)?;
                host.synchronize().map_err(&on_err)?;
                MeasureCorner(Corner::FIRST)
            }

            MeasureCorner(corner) => {
                let on_err = LevelingError::motion(Phase::Measure(corner));
                let point = self.config.corners[corner.index()];
                host.submit(&MotionCommand::absolute()).map_err(&on_err)?;
                host.submit(&MotionCommand::move_to(
                    point.x_um,
                    point.y_um,
                    0,
                    self.config.travel_feedrate_mm_min,
                ))
                .map_err(&on_err)?;
                host.synchronize().map_err(&on_err)?;
                host.submit(&MotionCommand::relative()).map_err(&on_err)?;

                run.deviations[corner.index()] = probe_deviation(host, &self.config, corner)?;
                corner.next().map_or(CorrectCorner(Corner::FIRST), MeasureCorner)
            }

            CorrectCorner(corner) => {
                let units = run.deviations[corner.index()];
                drive_motor(
                    &mut self.bus,
                    host,
                    corner,
                    units,
                    self.config.steps_per_unit,
                )
                .map_err(|error| LevelingError::Bus { corner, error })?;
                corner.next().map_or(Evaluate, CorrectCorner)
            }

            Evaluate => {
                host.report(&Report::DeviationSummary {
                    iteration: run.iteration,
                    deviations: run.deviations,
                });
                run.spread = spread(&run.deviations);

                #[cfg(feature = "defmt")]
                defmt::debug!(
                    "Pass {}: deviations {}, spread {}",
                    run.iteration,
                    run.deviations,
                    run.spread
                );

                match evaluate(
                    run.spread,
                    self.config.tolerance,
                    run.iteration,
                    run.max_iterations,
                ) {
                    Verdict::Converged => {
                        run.converged = true;
                        Done
                    }
                    Verdict::CapReached => Done,
                    Verdict::Continue => {
                        run.iteration += 1;
                        Homing
                    }
                }
            }

            Idle | Done | Failed => self.state,
        };
        Ok(next)
    }
}
