//! Settings of a simulation run, loadable from JSON.
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use crate::error::CPGError;
use crate::DEFAULT_TIME_STEP;

/// The settings of a simulation run.
/// Fields absent from a configuration file take their default value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// The integration step, in ms.
    pub step: f64,
    /// The simulated time, in ms.
    pub duration: f64,
    /// Whether to stop at the first tick producing a NaN or infinite state variable.
    pub check_divergence: bool,
    /// Write one trace row every `record_every` ticks.
    pub record_every: usize,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        SimulationConfig {
            step: DEFAULT_TIME_STEP,
            duration: 1000.0,
            check_divergence: false,
            record_every: 1,
        }
    }
}

impl SimulationConfig {
    /// Returns the configuration after checking it.
    /// The function returns an error if the step is not positive and finite, if the duration is negative or not finite, or if `record_every` is zero.
    pub fn build(self) -> Result<Self, CPGError> {
        if !(self.step > 0.0 && self.step.is_finite()) {
            return Err(CPGError::InvalidParameters(format!(
                "The time step must be positive and finite, got {}",
                self.step
            )));
        }
        if !(self.duration >= 0.0 && self.duration.is_finite()) {
            return Err(CPGError::InvalidParameters(format!(
                "The duration must be non-negative and finite, got {}",
                self.duration
            )));
        }
        if self.record_every == 0 {
            return Err(CPGError::InvalidParameters(
                "record_every must be at least 1".to_string(),
            ));
        }
        Ok(self)
    }

    /// Returns the number of ticks covering `[0, duration)`.
    pub fn num_ticks(&self) -> usize {
        // The tolerance absorbs the rounding of duration / step, e.g., 10000 / 0.01.
        (self.duration / self.step - 1e-9).ceil().max(0.0) as usize
    }

    pub fn save_to<P: AsRef<Path>>(&self, path: P) -> Result<(), CPGError> {
        let file = File::create(path).map_err(|e| CPGError::IOError(e.to_string()))?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, self)
            .map_err(|e| CPGError::IOError(e.to_string()))?;
        writer.flush().map_err(|e| CPGError::IOError(e.to_string()))
    }

    /// Load a configuration from a file and check it.
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, CPGError> {
        Self::load_with_defaults(path, SimulationConfig::default())
    }

    /// Load a configuration from a file and check it, taking the fields absent from the file from `defaults`.
    pub fn load_with_defaults<P: AsRef<Path>>(
        path: P,
        defaults: SimulationConfig,
    ) -> Result<Self, CPGError> {
        let file = File::open(path).map_err(|e| CPGError::IOError(e.to_string()))?;
        let reader = BufReader::new(file);
        let fields: ConfigFields =
            serde_json::from_reader(reader).map_err(|e| CPGError::IOError(e.to_string()))?;
        SimulationConfig {
            step: fields.step.unwrap_or(defaults.step),
            duration: fields.duration.unwrap_or(defaults.duration),
            check_divergence: fields.check_divergence.unwrap_or(defaults.check_divergence),
            record_every: fields.record_every.unwrap_or(defaults.record_every),
        }
        .build()
    }
}

/// The fields present in a configuration file.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFields {
    step: Option<f64>,
    duration: Option<f64>,
    check_divergence: Option<bool>,
    record_every: Option<usize>,
}
