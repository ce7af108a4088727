//! External drive currents applied to the neurons of a circuit.
use crate::circuit::NeuronId;
use crate::core::utils::{TimeInterval, TimeIntervalUnion};

/// A constant current injected into one neuron, either always or during a union of closed time windows.
#[derive(Debug, Clone, PartialEq)]
pub struct Stimulus {
    target: NeuronId,
    amplitude: f64,
    windows: Option<TimeIntervalUnion>,
}

impl Stimulus {
    /// A current injected at every tick.
    pub fn tonic(target: NeuronId, amplitude: f64) -> Self {
        Stimulus {
            target,
            amplitude,
            windows: None,
        }
    }

    /// A current injected at every tick whose time lies in the window, bounds included.
    pub fn pulse(target: NeuronId, amplitude: f64, window: TimeInterval) -> Self {
        Stimulus {
            target,
            amplitude,
            windows: Some(window.into()),
        }
    }

    /// A current injected at every tick whose time lies in one of the windows, bounds included.
    pub fn pulses(target: NeuronId, amplitude: f64, windows: Vec<TimeInterval>) -> Self {
        Stimulus {
            target,
            amplitude,
            windows: Some(TimeIntervalUnion::new_from(windows)),
        }
    }

    pub fn target(&self) -> NeuronId {
        self.target
    }

    pub fn amplitude(&self) -> f64 {
        self.amplitude
    }

    #[inline]
    pub fn is_active(&self, time: f64) -> bool {
        match &self.windows {
            Some(windows) => windows.contains(time),
            None => true,
        }
    }

    /// Returns the current injected at the provided time.
    #[inline]
    pub fn current(&self, time: f64) -> f64 {
        if self.is_active(time) {
            self.amplitude
        } else {
            0.0
        }
    }
}
