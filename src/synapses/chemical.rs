//! Chemical synapse with an instantaneous fast component and a first-order slow component, after Golowasch et al.
//!
//! ```text
//! i_fast = g_fast (v_post - E_syn) / (1 + exp(s_fast (V_fast - v_pre)))
//! dm/dt  = k1 (1 - m) / (1 + exp(s_slow (V_slow - v_pre))) - k2 m
//! i_slow = g_slow m (v_post - E_syn)
//! i      = i_fast + i_slow
//! ```
//!
//! Setting `g_slow` to zero gives a fast-only synapse.
use std::marker::PhantomData;

use super::Synapse;
use crate::core::integrator::{Integrator, RungeKutta4};
use crate::core::key::Key;
use crate::core::model::Model;
use crate::core::params::ParameterSet;
use crate::core::system::SystemWrapper;
use crate::error::CPGError;
use crate::keys;

keys! {
    /// The integrated gate of the chemical synapse.
    pub enum ChemicalGate {
        M => "m",
    }
}

keys! {
    /// Quantities exposed by a chemical synapse.
    pub enum ChemicalVariable {
        /// Slow activation gate.
        M => "m",
        /// Total current.
        I => "i",
        IFast => "ifast",
        ISlow => "islow",
    }
}

keys! {
    /// Parameters of the chemical synapse.
    pub enum ChemicalParameter {
        GFast => "gfast",
        ESyn => "esyn",
        SFast => "sfast",
        VFast => "vfast",
        GSlow => "gslow",
        K1 => "k1",
        K2 => "k2",
        SSlow => "sslow",
        VSlow => "vslow",
    }
}

/// The slow gate kinetics, driven by the presynaptic voltage.
#[derive(Debug, Clone, PartialEq)]
pub struct ChemicalKinetics {
    params: ParameterSet<ChemicalParameter>,
}

impl Model for ChemicalKinetics {
    type Variable = ChemicalGate;
    type Parameter = ChemicalParameter;
    type State = [f64; 1];

    const NAME: &'static str = "chemical synapse";

    fn build(params: ParameterSet<ChemicalParameter>) -> Result<Self, CPGError> {
        if let Some((key, value)) = params.iter().find(|(_, value)| !value.is_finite()) {
            return Err(CPGError::InvalidParameters(format!(
                "{}: {} must be finite, got {}",
                Self::NAME,
                key,
                value
            )));
        }
        Ok(ChemicalKinetics { params })
    }

    fn params(&self) -> &ParameterSet<ChemicalParameter> {
        &self.params
    }

    #[inline]
    fn derivative(&self, state: &[f64; 1], v_pre: f64) -> [f64; 1] {
        use ChemicalParameter::*;
        let p = &self.params;
        let m = state[0];
        let activation = 1.0 / (1.0 + (p.get(SSlow) * (p.get(VSlow) - v_pre)).exp());
        [p.get(K1) * (1.0 - m) * activation - p.get(K2) * m]
    }
}

/// A chemical synapse which receives the pre- and postsynaptic voltages at every step.
///
/// The current is never applied by the synapse: the caller reads it with [`ChemicalSynapse::get`] and feeds it to any neuron, with any sign, through `add_synaptic_input`.
#[derive(Debug, Clone)]
pub struct ChemicalSynapse<I: Integrator = RungeKutta4> {
    system: SystemWrapper<ChemicalKinetics>,
    gate: [f64; 1],
    i_fast: f64,
    i_slow: f64,
    integrator: PhantomData<I>,
}

impl<I: Integrator> ChemicalSynapse<I> {
    /// Create a synapse with a closed slow gate and no current.
    pub fn build(params: ParameterSet<ChemicalParameter>) -> Result<Self, CPGError> {
        Ok(ChemicalSynapse {
            system: SystemWrapper::new(ChemicalKinetics::build(params)?),
            gate: [0.0],
            i_fast: 0.0,
            i_slow: 0.0,
            integrator: PhantomData,
        })
    }

    pub fn params(&self) -> &ParameterSet<ChemicalParameter> {
        self.system.model().params()
    }

    /// Advance the slow gate by one step with `v_pre` held, then recompute the currents.
    pub fn step(&mut self, dt: f64, v_pre: f64, v_post: f64) {
        use ChemicalParameter::*;
        self.gate = I::advance(&self.system, &self.gate, v_pre, dt);

        let p = self.params();
        let drive = v_post - p.get(ESyn);
        let i_fast = p.get(GFast) * drive / (1.0 + (p.get(SFast) * (p.get(VFast) - v_pre)).exp());
        let i_slow = p.get(GSlow) * self.gate[0] * drive;
        self.i_fast = i_fast;
        self.i_slow = i_slow;
    }

    /// Returns the value of the gate or of one of the currents of the last step.
    pub fn get(&self, variable: ChemicalVariable) -> f64 {
        match variable {
            ChemicalVariable::M => self.gate[ChemicalGate::M.index()],
            ChemicalVariable::I => self.i_fast + self.i_slow,
            ChemicalVariable::IFast => self.i_fast,
            ChemicalVariable::ISlow => self.i_slow,
        }
    }

    /// Set the slow gate.
    pub fn set_gate(&mut self, m: f64) {
        self.gate = [m];
    }
}

impl<I: Integrator> Synapse for ChemicalSynapse<I> {
    fn current(&self) -> f64 {
        self.get(ChemicalVariable::I)
    }
}
