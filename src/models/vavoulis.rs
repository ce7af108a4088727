//! Two-compartment (soma and axon) model of the Lymnaea feeding network interneurons, after Vavoulis et al. (2007).
//!
//! The soma is passive apart from a cell-specific current; the axon carries the spike-generating sodium and potassium currents.
//! The compartments are coupled by `g_ecs (va - v)` on the soma and `g_eca (v - va)` on the axon:
//!
//! ```text
//! dv/dt  = -gl (v - el) - ix_soma - input + g_ecs (va - v)
//! dva/dt = -gl (va - el) - gna m^3 h (va - ena) - gk n^4 (va - ek) - ix_axon + g_eca (v - va)
//! ```
//!
//! Following the source convention, a negative input depolarizes.
//! The cell type is selected by the `n_type` parameter:
//!
//! - 0, SO: passive soma, no cell-specific current.
//! - 1, N1M: persistent sodium plateau current on the soma, `p` with time constant `tau_p`.
//! - 2, N2v: slow sodium plateau current `p^3 q` on the axon, with voltage-dependent time constants.
//! - 3, N3t: low-threshold calcium current `p q` on the soma, time constants `tau_p` and `tau_q`.
use std::fmt;

use crate::core::model::{require_positive, Model};
use crate::core::params::ParameterSet;
use crate::core::utils::boltzmann;
use crate::error::CPGError;
use crate::keys;

keys! {
    /// State variables of the Vavoulis model.
    pub enum VavoulisVariable {
        /// Soma voltage.
        V => "v",
        /// Axon voltage.
        Va => "va",
        /// Activation of the cell-specific current.
        P => "p",
        /// Inactivation of the cell-specific current.
        Q => "q",
        /// Sodium inactivation (axon).
        H => "h",
        /// Potassium activation (axon).
        N => "n",
    }
}

keys! {
    /// Parameters of the Vavoulis model.
    pub enum VavoulisParameter {
        /// Cell type code, see [`CellType`].
        NType => "n_type",
        TauP => "tau_p",
        TauQ => "tau_q",
        /// Soma to axon coupling conductance.
        GEca => "g_eca",
        /// Axon to soma coupling conductance.
        GEcs => "g_ecs",
    }
}

/// Resting potential shared by all cell types (mV).
pub const V_REST: f64 = -67.0;

const EL: f64 = -67.0;
const ENA: f64 = 50.0;
const EK: f64 = -80.0;
const ECA: f64 = 80.0;
const GL: f64 = 0.1;
const GNA: f64 = 30.0;
const GK: f64 = 10.0;
const G_N1M: f64 = 0.05;
const G_N2V: f64 = 0.3;
const G_N3T: f64 = 0.6;

/// The cell types of the feeding network.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellType {
    /// Slow oscillator interneuron.
    SlowOscillator,
    /// Protraction phase interneuron.
    N1M,
    /// Rasp phase interneuron.
    N2v,
    /// Swallow phase interneuron.
    N3t,
}

impl CellType {
    /// Returns the cell type encoded by the `n_type` parameter.
    pub fn from_code(code: f64) -> Result<Self, CPGError> {
        match code {
            c if c == 0.0 => Ok(CellType::SlowOscillator),
            c if c == 1.0 => Ok(CellType::N1M),
            c if c == 2.0 => Ok(CellType::N2v),
            c if c == 3.0 => Ok(CellType::N3t),
            _ => Err(CPGError::InvalidParameters(format!(
                "n_type must be 0 (SO), 1 (N1M), 2 (N2v) or 3 (N3t), got {}",
                code
            ))),
        }
    }

    /// Returns the `n_type` code of the cell type.
    pub fn code(self) -> f64 {
        match self {
            CellType::SlowOscillator => 0.0,
            CellType::N1M => 1.0,
            CellType::N2v => 2.0,
            CellType::N3t => 3.0,
        }
    }
}

impl fmt::Display for CellType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            CellType::SlowOscillator => write!(f, "SO"),
            CellType::N1M => write!(f, "N1M"),
            CellType::N2v => write!(f, "N2v"),
            CellType::N3t => write!(f, "N3t"),
        }
    }
}

fn m_inf(va: f64) -> f64 {
    boltzmann(va, -42.0, 5.0)
}

fn h_inf(va: f64) -> f64 {
    boltzmann(va, -55.2, -7.1)
}

fn n_inf(va: f64) -> f64 {
    boltzmann(va, -30.0, 17.4)
}

fn tau_h(va: f64) -> f64 {
    0.5 + 4.0 * (-((va + 55.0) / 15.0).powi(2)).exp()
}

fn tau_n(va: f64) -> f64 {
    1.0 + 3.0 * (-((va + 40.0) / 20.0).powi(2)).exp()
}

/// Steady state of the cell-specific gates `(p, q)` for the relevant compartment voltage.
fn pq_inf(cell: CellType, v: f64) -> (f64, f64) {
    match cell {
        CellType::SlowOscillator => (0.0, 0.0),
        CellType::N1M => (boltzmann(v, -38.8, 10.0), 0.0),
        CellType::N2v => (boltzmann(v, -51.0, 10.3), boltzmann(v, -60.0, -3.0)),
        CellType::N3t => (boltzmann(v, -61.6, 5.6), boltzmann(v, -73.2, -5.1)),
    }
}

/// The two-compartment Vavoulis model.
#[derive(Debug, Clone, PartialEq)]
pub struct Vavoulis {
    params: ParameterSet<VavoulisParameter>,
    cell: CellType,
}

impl Vavoulis {
    /// Returns the parameters of a cell type.
    /// Soma and axon are tightly coupled (8 both ways) except in N2v, whose axon barely feeds back on the soma.
    pub fn params_for(cell: CellType) -> ParameterSet<VavoulisParameter> {
        use VavoulisParameter::*;
        let (tau_p, tau_q) = match cell {
            CellType::N1M => (250.0, 1.0),
            CellType::N3t => (4.0, 400.0),
            CellType::SlowOscillator | CellType::N2v => (1.0, 1.0),
        };
        let (g_eca, g_ecs) = match cell {
            CellType::N2v => (0.06, 0.55),
            CellType::SlowOscillator | CellType::N1M | CellType::N3t => (8.0, 8.0),
        };
        ParameterSet::new()
            .with(NType, cell.code())
            .with(TauP, tau_p)
            .with(TauQ, tau_q)
            .with(GEca, g_eca)
            .with(GEcs, g_ecs)
    }

    /// Returns the cell type of the model.
    pub fn cell_type(&self) -> CellType {
        self.cell
    }

    /// Returns the state with both compartments at `v` and every gate at its steady state for `v`.
    pub fn steady_state(&self, v: f64) -> [f64; 6] {
        let (p, q) = pq_inf(self.cell, v);
        [v, v, p, q, h_inf(v), n_inf(v)]
    }
}

impl Model for Vavoulis {
    type Variable = VavoulisVariable;
    type Parameter = VavoulisParameter;
    type State = [f64; 6];

    const NAME: &'static str = "Vavoulis";

    fn build(params: ParameterSet<VavoulisParameter>) -> Result<Self, CPGError> {
        let cell = CellType::from_code(params.get(VavoulisParameter::NType))?;
        match cell {
            CellType::N1M => require_positive(&params, VavoulisParameter::TauP, Self::NAME)?,
            CellType::N3t => {
                require_positive(&params, VavoulisParameter::TauP, Self::NAME)?;
                require_positive(&params, VavoulisParameter::TauQ, Self::NAME)?;
            }
            CellType::SlowOscillator | CellType::N2v => {}
        }
        Ok(Vavoulis { params, cell })
    }

    fn params(&self) -> &ParameterSet<VavoulisParameter> {
        &self.params
    }

    fn derivative(&self, state: &[f64; 6], input: f64) -> [f64; 6] {
        use VavoulisParameter::*;
        let [v, va, p, q, h, n] = *state;

        let (ix_soma, ix_axon, dp, dq) = match self.cell {
            CellType::SlowOscillator => (0.0, 0.0, 0.0, 0.0),
            CellType::N1M => {
                let (p_inf, _) = pq_inf(self.cell, v);
                (
                    G_N1M * p * (v - ENA),
                    0.0,
                    (p_inf - p) / self.params.get(TauP),
                    0.0,
                )
            }
            CellType::N2v => {
                let (p_inf, q_inf) = pq_inf(self.cell, va);
                let tau_p = 28.3 + 44.1 * (-((-11.8 - va) / 26.6).powi(2)).exp();
                let tau_q = 187.6 + 637.7 * (-((-9.5 - va) / 23.3).powi(2)).exp();
                (
                    0.0,
                    G_N2V * p * p * p * q * (va - ENA),
                    (p_inf - p) / tau_p,
                    (q_inf - q) / tau_q,
                )
            }
            CellType::N3t => {
                let (p_inf, q_inf) = pq_inf(self.cell, v);
                (
                    G_N3T * p * q * (v - ECA),
                    0.0,
                    (p_inf - p) / self.params.get(TauP),
                    (q_inf - q) / self.params.get(TauQ),
                )
            }
        };

        let m = m_inf(va);
        let dv = -GL * (v - EL) - ix_soma - input + self.params.get(GEcs) * (va - v);
        let dva = -GL * (va - EL)
            - GNA * m * m * m * h * (va - ENA)
            - GK * n * n * n * n * (va - EK)
            - ix_axon
            + self.params.get(GEca) * (v - va);

        [
            dv,
            dva,
            dp,
            dq,
            (h_inf(va) - h) / tau_h(va),
            (n_inf(va) - n) / tau_n(va),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::neuron::NeuronUnit;

    fn neuron(cell: CellType) -> NeuronUnit<Vavoulis> {
        let model = Vavoulis::build(Vavoulis::params_for(cell)).unwrap();
        let rest = model.steady_state(V_REST);
        NeuronUnit::new(model).with_state(rest)
    }

    #[test]
    fn test_cell_type_codes() {
        for cell in [
            CellType::SlowOscillator,
            CellType::N1M,
            CellType::N2v,
            CellType::N3t,
        ] {
            assert_eq!(CellType::from_code(cell.code()), Ok(cell));
        }
        assert!(CellType::from_code(4.0).is_err());
        assert!(CellType::from_code(1.5).is_err());
    }

    #[test]
    fn test_build_validates_time_constants() {
        let params = Vavoulis::params_for(CellType::N3t).with(VavoulisParameter::TauQ, 0.0);
        assert!(matches!(
            Vavoulis::build(params),
            Err(CPGError::InvalidParameters(_))
        ));
        // N2v computes its own time constants.
        let params = Vavoulis::params_for(CellType::N2v).with(VavoulisParameter::TauP, 0.0);
        assert!(Vavoulis::build(params).is_ok());
    }

    #[test]
    fn test_coupling_conductances() {
        for cell in [CellType::SlowOscillator, CellType::N1M, CellType::N3t] {
            let params = Vavoulis::params_for(cell);
            assert_eq!(params.get(VavoulisParameter::GEca), 8.0);
            assert_eq!(params.get(VavoulisParameter::GEcs), 8.0);
        }
        let params = Vavoulis::params_for(CellType::N2v);
        assert_eq!(params.get(VavoulisParameter::GEca), 0.06);
        assert_eq!(params.get(VavoulisParameter::GEcs), 0.55);
    }

    #[test]
    fn test_coupling_terms() {
        let model = Vavoulis::build(Vavoulis::params_for(CellType::SlowOscillator)).unwrap();
        let mut state = model.steady_state(V_REST);
        state[1] = V_REST + 1.0;
        let derivative = model.derivative(&state, 0.0);
        let reference = model.derivative(&model.steady_state(V_REST), 0.0);
        // The soma only sees the leak at rest plus the coupling from the axon.
        assert!((derivative[0] - reference[0] - 8.0).abs() < 1e-12);
    }

    #[test]
    fn test_negative_input_depolarizes() {
        let model = Vavoulis::build(Vavoulis::params_for(CellType::SlowOscillator)).unwrap();
        let rest = model.steady_state(V_REST);
        assert!(model.derivative(&rest, -1.0)[0] > model.derivative(&rest, 0.0)[0]);
    }

    #[test]
    fn test_so_fires_under_drive() {
        let mut so = neuron(CellType::SlowOscillator);
        let mut spikes = 0;
        let mut previous = so.get(VavoulisVariable::V);
        for k in 0..100_000 {
            if k >= 10_000 {
                so.add_synaptic_input(-10.0);
            }
            so.step(0.01);
            let v = so.get(VavoulisVariable::V);
            if previous < -20.0 && v >= -20.0 {
                spikes += 1;
            }
            previous = v;
        }
        assert!(spikes >= 5, "spikes = {}", spikes);
    }

    #[test]
    fn test_n3t_fires_tonically() {
        let mut n3t = neuron(CellType::N3t);
        let mut spikes = 0;
        let mut previous = n3t.get(VavoulisVariable::V);
        for k in 0..200_000 {
            n3t.step(0.01);
            let v = n3t.get(VavoulisVariable::V);
            assert!(v > -90.0 && v < 50.0);
            if k >= 100_000 && previous < -20.0 && v >= -20.0 {
                spikes += 1;
            }
            previous = v;
        }
        assert!(spikes >= 10, "spikes = {}", spikes);
    }

    #[test]
    fn test_rest_is_quiet_without_input() {
        for cell in [CellType::SlowOscillator, CellType::N1M, CellType::N2v] {
            let mut neuron = neuron(cell);
            for _ in 0..50_000 {
                neuron.step(0.01);
                let v = neuron.get(VavoulisVariable::V);
                assert!(v > -75.0 && v < -55.0, "{}: v = {}", cell, v);
            }
        }
    }
}
