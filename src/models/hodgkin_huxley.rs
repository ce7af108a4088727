//! Hodgkin-Huxley squid giant axon model.
//!
//! Voltages are in mV with the resting potential near -65 mV.
//! The membrane capacitance and the maximal conductances are parameters, so a patch of membrane of a given area is simulated by scaling all of them by that area.
//! A positive input depolarizes.
use crate::core::model::{require_positive, Model};
use crate::core::params::ParameterSet;
use crate::error::CPGError;
use crate::keys;

keys! {
    /// State variables of the Hodgkin-Huxley model.
    pub enum HodgkinHuxleyVariable {
        /// Membrane voltage.
        V => "v",
        /// Sodium activation.
        M => "m",
        /// Sodium inactivation.
        H => "h",
        /// Potassium activation.
        N => "n",
    }
}

keys! {
    /// Parameters of the Hodgkin-Huxley model.
    pub enum HodgkinHuxleyParameter {
        /// Membrane capacitance.
        Cm => "cm",
        Vna => "vna",
        Vk => "vk",
        Vl => "vl",
        Gna => "gna",
        Gk => "gk",
        Gl => "gl",
    }
}

/// The membrane area used by the default parameters, in cm^2.
pub const DEFAULT_AREA: f64 = 7.854e-3;

/// Maximum number of bisection iterations when searching the resting potential.
const MAX_BISECTIONS: usize = 200;

/// Returns `x / (exp(x / y) - 1)`, continuous at `x = 0`.
fn vtrap(x: f64, y: f64) -> f64 {
    if (x / y).abs() < 1e-6 {
        y * (1.0 - x / y / 2.0)
    } else {
        x / ((x / y).exp() - 1.0)
    }
}

fn alpha_m(v: f64) -> f64 {
    0.1 * vtrap(-(v + 40.0), 10.0)
}

fn beta_m(v: f64) -> f64 {
    4.0 * (-(v + 65.0) / 18.0).exp()
}

fn alpha_h(v: f64) -> f64 {
    0.07 * (-(v + 65.0) / 20.0).exp()
}

fn beta_h(v: f64) -> f64 {
    1.0 / (1.0 + (-(v + 35.0) / 10.0).exp())
}

fn alpha_n(v: f64) -> f64 {
    0.01 * vtrap(-(v + 55.0), 10.0)
}

fn beta_n(v: f64) -> f64 {
    0.125 * (-(v + 65.0) / 80.0).exp()
}

/// The four-variable Hodgkin-Huxley model.
#[derive(Debug, Clone, PartialEq)]
pub struct HodgkinHuxley {
    params: ParameterSet<HodgkinHuxleyParameter>,
}

impl HodgkinHuxley {
    /// Returns the classic parameters for a patch of membrane of the provided area (cm^2).
    pub fn params_for_area(area: f64) -> ParameterSet<HodgkinHuxleyParameter> {
        use HodgkinHuxleyParameter::*;
        ParameterSet::new()
            .with(Cm, 1.0 * area)
            .with(Vna, 50.0)
            .with(Vk, -77.0)
            .with(Vl, -54.387)
            .with(Gna, 120.0 * area)
            .with(Gk, 36.0 * area)
            .with(Gl, 0.3 * area)
    }

    /// Returns the classic parameters for the default membrane area.
    pub fn default_params() -> ParameterSet<HodgkinHuxleyParameter> {
        Self::params_for_area(DEFAULT_AREA)
    }

    /// Returns the state with voltage `v` and every gate at its steady state for `v`.
    pub fn steady_state(v: f64) -> [f64; 4] {
        let m = alpha_m(v) / (alpha_m(v) + beta_m(v));
        let h = alpha_h(v) / (alpha_h(v) + beta_h(v));
        let n = alpha_n(v) / (alpha_n(v) + beta_n(v));
        [v, m, h, n]
    }

    /// Returns the total ionic current (outward positive) for the provided state.
    pub fn ionic_current(&self, state: &[f64; 4]) -> f64 {
        use HodgkinHuxleyParameter::*;
        let p = &self.params;
        let [v, m, h, n] = *state;
        p.get(Gna) * m * m * m * h * (v - p.get(Vna))
            + p.get(Gk) * n * n * n * n * (v - p.get(Vk))
            + p.get(Gl) * (v - p.get(Vl))
    }

    /// Returns the voltage at which the steady-state ionic current vanishes, searched by bisection in [v_min, v_max].
    /// The function returns an error if the steady-state current does not change sign on the interval.
    pub fn resting_potential(&self, v_min: f64, v_max: f64) -> Result<f64, CPGError> {
        let current = |v: f64| self.ionic_current(&Self::steady_state(v));
        let (mut lo, mut hi) = (v_min, v_max);
        let (i_lo, i_hi) = (current(lo), current(hi));
        if !(i_lo < 0.0 && i_hi > 0.0) {
            return Err(CPGError::ConvergenceError(format!(
                "no resting potential in [{}, {}]: steady-state currents are {} and {}",
                v_min, v_max, i_lo, i_hi
            )));
        }

        for _ in 0..MAX_BISECTIONS {
            let mid = 0.5 * (lo + hi);
            if mid <= lo || mid >= hi {
                break;
            }
            match current(mid) > 0.0 {
                true => hi = mid,
                false => lo = mid,
            }
        }
        Ok(0.5 * (lo + hi))
    }
}

impl Model for HodgkinHuxley {
    type Variable = HodgkinHuxleyVariable;
    type Parameter = HodgkinHuxleyParameter;
    type State = [f64; 4];

    const NAME: &'static str = "Hodgkin-Huxley";

    fn build(params: ParameterSet<HodgkinHuxleyParameter>) -> Result<Self, CPGError> {
        require_positive(&params, HodgkinHuxleyParameter::Cm, Self::NAME)?;
        Ok(HodgkinHuxley { params })
    }

    fn params(&self) -> &ParameterSet<HodgkinHuxleyParameter> {
        &self.params
    }

    fn derivative(&self, state: &[f64; 4], input: f64) -> [f64; 4] {
        let [v, m, h, n] = *state;
        [
            (input - self.ionic_current(state)) / self.params.get(HodgkinHuxleyParameter::Cm),
            alpha_m(v) * (1.0 - m) - beta_m(v) * m,
            alpha_h(v) * (1.0 - h) - beta_h(v) * h,
            alpha_n(v) * (1.0 - n) - beta_n(v) * n,
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::neuron::NeuronUnit;
    use approx::assert_relative_eq;

    #[test]
    fn test_rates_are_continuous_at_singular_points() {
        assert_relative_eq!(alpha_m(-40.0), 1.0, epsilon = 1e-9);
        assert_relative_eq!(alpha_m(-40.0 + 1e-4), alpha_m(-40.0), epsilon = 1e-5);
        assert_relative_eq!(alpha_n(-55.0), 0.1, epsilon = 1e-9);
    }

    #[test]
    fn test_resting_potential() {
        let model = HodgkinHuxley::build(HodgkinHuxley::default_params()).unwrap();
        let v_rest = model.resting_potential(-100.0, 0.0).unwrap();
        assert!((v_rest + 65.0).abs() < 0.5, "v_rest = {}", v_rest);
        let derivative = model.derivative(&HodgkinHuxley::steady_state(v_rest), 0.0);
        for d in derivative {
            assert!(d.abs() < 1e-9);
        }
        assert!(matches!(
            model.resting_potential(-100.0, -90.0),
            Err(CPGError::ConvergenceError(_))
        ));
    }

    #[test]
    fn test_zero_input_steady_state() {
        let model = HodgkinHuxley::build(HodgkinHuxley::default_params()).unwrap();
        let rest = HodgkinHuxley::steady_state(model.resting_potential(-100.0, 0.0).unwrap());
        let mut neuron = NeuronUnit::<HodgkinHuxley>::new(model).with_state(rest);
        for _ in 0..10_000 {
            neuron.step(0.01);
        }
        let state = neuron.state();
        assert_relative_eq!(state[0], rest[0], epsilon = 1e-6);
        for i in 1..4 {
            assert_relative_eq!(state[i], rest[i], epsilon = 1e-8);
        }
    }

    #[test]
    fn test_tonic_drive_elicits_spikes() {
        let params = HodgkinHuxley::default_params();
        let mut neuron = NeuronUnit::<HodgkinHuxley>::build(params)
            .unwrap()
            .with_state(HodgkinHuxley::steady_state(-65.0));
        let mut spikes = 0;
        let mut previous = neuron.get(HodgkinHuxleyVariable::V);
        for _ in 0..10_000 {
            neuron.add_synaptic_input(10.0 * DEFAULT_AREA);
            neuron.step(0.01);
            let v = neuron.get(HodgkinHuxleyVariable::V);
            if previous < 0.0 && v >= 0.0 {
                spikes += 1;
            }
            previous = v;
        }
        assert!(spikes >= 5, "spikes = {}", spikes);
    }

    #[test]
    fn test_rejects_zero_capacitance() {
        let params = HodgkinHuxley::default_params().with(HodgkinHuxleyParameter::Cm, 0.0);
        assert!(matches!(
            HodgkinHuxley::build(params),
            Err(CPGError::InvalidParameters(_))
        ));
    }
}
