//! The simulation loop.
use std::io::Write;

use crate::circuit::Circuit;
use crate::config::SimulationConfig;
use crate::error::CPGError;
use crate::trace::{Observable, TraceWriter};

/// Anything that can be advanced tick by tick and observed in between.
pub trait Simulation {
    /// Run one tick starting at the provided time.
    fn tick(&mut self, time: f64, dt: f64);

    /// Same as [`Simulation::tick`], then returns an error if a state variable is no longer finite.
    fn try_tick(&mut self, time: f64, dt: f64) -> Result<(), CPGError>;

    /// Returns the current value of an observable.
    fn observe(&self, observable: &Observable) -> Result<f64, CPGError>;
}

impl Simulation for Circuit {
    fn tick(&mut self, time: f64, dt: f64) {
        Circuit::tick(self, time, dt);
    }

    fn try_tick(&mut self, time: f64, dt: f64) -> Result<(), CPGError> {
        Circuit::try_tick(self, time, dt)
    }

    fn observe(&self, observable: &Observable) -> Result<f64, CPGError> {
        self.read(observable)
    }
}

/// The outcome of a run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RunSummary {
    /// The number of ticks performed.
    pub ticks: usize,
    /// The simulated time at the end of the run.
    pub final_time: f64,
}

/// Runs simulations with fixed settings.
#[derive(Debug, Clone, PartialEq)]
pub struct Simulator {
    config: SimulationConfig,
}

impl Simulator {
    /// Create a simulator.
    /// The function returns an error if the settings are invalid.
    pub fn build(config: SimulationConfig) -> Result<Self, CPGError> {
        Ok(Simulator {
            config: config.build()?,
        })
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Run the simulation over `[0, duration)` and record the observables.
    ///
    /// Tick `k` starts at time `k * step`.
    /// The trace gets one row with the initial values at time 0, then one row every `record_every` ticks with the values at the end of the tick.
    /// With `check_divergence`, the run stops at the first tick producing a NaN or infinite state variable and returns the error.
    pub fn run<S: Simulation + ?Sized, W: Write>(
        &self,
        simulation: &mut S,
        observables: &[Observable],
        trace: &mut TraceWriter<W>,
    ) -> Result<RunSummary, CPGError> {
        let dt = self.config.step;
        let num_ticks = self.config.num_ticks();
        log::info!(
            "Simulation start: {} ticks of {} ms, {} observables",
            num_ticks,
            dt,
            observables.len()
        );

        let mut values = vec![0.0; observables.len()];
        let mut record = |simulation: &S, time: f64| -> Result<(), CPGError> {
            for (value, observable) in values.iter_mut().zip(observables.iter()) {
                *value = simulation.observe(observable)?;
            }
            trace.write_row(time, &values)
        };
        record(simulation, 0.0)?;

        for k in 0..num_ticks {
            let time = k as f64 * dt;
            if self.config.check_divergence {
                if let Err(e) = simulation.try_tick(time, dt) {
                    log::warn!("Simulation stopped at tick {}: {}", k, e);
                    return Err(e);
                }
            } else {
                simulation.tick(time, dt);
            }
            if (k + 1) % self.config.record_every == 0 {
                record(simulation, (k + 1) as f64 * dt)?;
            }
        }
        trace.flush()?;

        let summary = RunSummary {
            ticks: num_ticks,
            final_time: num_ticks as f64 * dt,
        };
        log::info!(
            "Simulation done: {} ticks, final time {} ms, {} rows",
            summary.ticks,
            summary.final_time,
            trace.rows()
        );
        Ok(summary)
    }
}
