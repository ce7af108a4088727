//! Gradual-activation synapse with second-order kinetics, after Vavoulis et al. (2007).
//!
//! ```text
//! tau dr/dt = r_inf(v_pre) - r,   r_inf(v) = 1 / (1 + exp((V_r - v) / dec_slope))
//! tau ds/dt = r - s
//! i = g_syn s (v_post - E_syn)
//! ```
//!
//! The two chained first-order filters smooth the onset and offset of the conductance.
use std::marker::PhantomData;

use super::Synapse;
use crate::core::integrator::{Integrator, RungeKutta4};
use crate::core::key::Key;
use crate::core::model::{require_positive, Model};
use crate::core::params::ParameterSet;
use crate::core::state::StateVector;
use crate::core::system::SystemWrapper;
use crate::core::utils::boltzmann;
use crate::error::CPGError;
use crate::keys;

keys! {
    /// State variables of the gradual-activation kinetics.
    pub enum GradualVariable {
        /// Intermediate activation.
        R => "r",
        /// Conductance gate.
        S => "s",
    }
}

keys! {
    /// Parameters of the gradual-activation synapse.
    pub enum GradualParameter {
        ESyn => "esyn",
        GSyn => "gsyn",
        TauSyn => "tau_syn",
        /// Presynaptic voltage the gates are in equilibrium with, see [`GradualKinetics::steady_state`].
        VPre => "v_pre",
        /// Half-activation voltage of `r_inf`.
        VR => "v_r",
        DecSlope => "dec_slope",
    }
}

/// The `(r, s)` kinetics, driven by the presynaptic voltage.
#[derive(Debug, Clone, PartialEq)]
pub struct GradualKinetics {
    params: ParameterSet<GradualParameter>,
}

impl GradualKinetics {
    /// Returns the steady-state activation for a presynaptic voltage.
    #[inline]
    pub fn r_inf(&self, v_pre: f64) -> f64 {
        boltzmann(
            v_pre,
            self.params.get(GradualParameter::VR),
            self.params.get(GradualParameter::DecSlope),
        )
    }

    /// Returns the state in equilibrium with the `v_pre` parameter.
    pub fn steady_state(&self) -> [f64; 2] {
        let r = self.r_inf(self.params.get(GradualParameter::VPre));
        [r, r]
    }
}

impl Model for GradualKinetics {
    type Variable = GradualVariable;
    type Parameter = GradualParameter;
    type State = [f64; 2];

    const NAME: &'static str = "gradual synapse";

    fn build(params: ParameterSet<GradualParameter>) -> Result<Self, CPGError> {
        require_positive(&params, GradualParameter::TauSyn, Self::NAME)?;
        if params.get(GradualParameter::DecSlope) == 0.0 {
            return Err(CPGError::InvalidParameters(format!(
                "{}: dec_slope must be non-zero",
                Self::NAME
            )));
        }
        Ok(GradualKinetics { params })
    }

    fn params(&self) -> &ParameterSet<GradualParameter> {
        &self.params
    }

    #[inline]
    fn derivative(&self, state: &[f64; 2], v_pre: f64) -> [f64; 2] {
        let tau = self.params.get(GradualParameter::TauSyn);
        let [r, s] = *state;
        [(self.r_inf(v_pre) - r) / tau, (r - s) / tau]
    }
}

/// A gradual-activation synapse.
///
/// The synapse does not know its neurons: a [`Circuit`](crate::circuit::Circuit) stores it together with the ids of its endpoints and injects the returned current.
/// Its gates start closed.
#[derive(Debug, Clone)]
pub struct GradualSynapse<I: Integrator = RungeKutta4> {
    system: SystemWrapper<GradualKinetics>,
    state: [f64; 2],
    current: f64,
    integrator: PhantomData<I>,
}

impl<I: Integrator> GradualSynapse<I> {
    pub fn build(params: ParameterSet<GradualParameter>) -> Result<Self, CPGError> {
        Ok(GradualSynapse {
            system: SystemWrapper::new(GradualKinetics::build(params)?),
            state: <[f64; 2]>::zeros(),
            current: 0.0,
            integrator: PhantomData,
        })
    }

    pub fn kinetics(&self) -> &GradualKinetics {
        self.system.model()
    }

    pub fn params(&self) -> &ParameterSet<GradualParameter> {
        self.system.model().params()
    }

    /// Advance `(r, s)` by one step with `v_pre` held, then returns the new current `g_syn s (v_post - E_syn)`.
    #[inline]
    pub fn advance(&mut self, dt: f64, v_pre: f64, v_post: f64) -> f64 {
        self.state = I::advance(&self.system, &self.state, v_pre, dt);
        let p = self.params();
        let current = p.get(GradualParameter::GSyn)
            * self.state[GradualVariable::S.index()]
            * (v_post - p.get(GradualParameter::ESyn));
        self.current = current;
        current
    }

    pub fn get(&self, variable: GradualVariable) -> f64 {
        self.state[variable.index()]
    }

    pub fn set(&mut self, variable: GradualVariable, value: f64) {
        self.state[variable.index()] = value;
    }

    pub fn state(&self) -> &[f64; 2] {
        &self.state
    }

    pub fn set_state(&mut self, state: [f64; 2]) {
        self.state = state;
    }
}

impl<I: Integrator> Synapse for GradualSynapse<I> {
    fn current(&self) -> f64 {
        self.current
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaCha8Rng;

    fn params(tau: f64) -> ParameterSet<GradualParameter> {
        use GradualParameter::*;
        ParameterSet::new()
            .with(ESyn, -90.0)
            .with(GSyn, 50.0)
            .with(TauSyn, tau)
            .with(VPre, -67.0)
            .with(VR, -40.0)
            .with(DecSlope, 2.5)
    }

    #[test]
    fn test_current() {
        let mut synapse = GradualSynapse::<RungeKutta4>::build(params(50.0)).unwrap();
        assert_eq!(synapse.current(), 0.0);
        synapse.set_state([0.5, 0.2]);
        synapse.advance(0.0, 0.0, -60.0);
        assert_eq!(synapse.state(), &[0.5, 0.2]);
        assert_relative_eq!(synapse.current(), 50.0 * 0.2 * 30.0);
    }

    #[test]
    fn test_r_converges_monotonically() {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let v_pre = -30.0;
        for _ in 0..20 {
            let mut synapse = GradualSynapse::<RungeKutta4>::build(params(50.0)).unwrap();
            let r_inf = synapse.kinetics().r_inf(v_pre);
            synapse.set_state([rng.gen_range(0.0..1.0), rng.gen_range(0.0..1.0)]);

            let mut gap = synapse.get(GradualVariable::R) - r_inf;
            for _ in 0..10_000 {
                synapse.advance(0.01, v_pre, -60.0);
                let new_gap = synapse.get(GradualVariable::R) - r_inf;
                // Strictly closer to the target, from the same side.
                assert!(new_gap.abs() < gap.abs());
                assert!(new_gap * gap > 0.0);
                gap = new_gap;
            }
        }
    }

    #[test]
    fn test_s_follows_converged_r() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let v_pre = -35.0;
        for _ in 0..20 {
            let mut synapse = GradualSynapse::<RungeKutta4>::build(params(20.0)).unwrap();
            let r_inf = synapse.kinetics().r_inf(v_pre);
            synapse.set_state([r_inf, rng.gen_range(0.0..1.0)]);

            let mut gap = synapse.get(GradualVariable::S) - r_inf;
            for _ in 0..5_000 {
                synapse.advance(0.01, v_pre, -60.0);
                assert_relative_eq!(synapse.get(GradualVariable::R), r_inf, epsilon = 1e-12);
                let new_gap = synapse.get(GradualVariable::S) - r_inf;
                assert!(new_gap.abs() < gap.abs());
                assert!(new_gap * gap > 0.0);
                gap = new_gap;
            }
        }
    }

    #[test]
    fn test_steady_state() {
        let kinetics = GradualKinetics::build(params(50.0)).unwrap();
        let state = kinetics.steady_state();
        assert_relative_eq!(state[0], 1.0 / (1.0 + (27.0_f64 / 2.5).exp()));
        assert_eq!(kinetics.derivative(&state, -67.0), [0.0, 0.0]);
    }

    #[test]
    fn test_rejects_invalid_parameters() {
        assert!(matches!(
            GradualSynapse::<RungeKutta4>::build(params(0.0)),
            Err(CPGError::InvalidParameters(_))
        ));
        assert!(matches!(
            GradualSynapse::<RungeKutta4>::build(params(50.0).with(GradualParameter::DecSlope, 0.0)),
            Err(CPGError::InvalidParameters(_))
        ));
    }
}
