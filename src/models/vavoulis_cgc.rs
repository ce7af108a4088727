//! Multi-current model of the Lymnaea cerebral giant cell (CGC), after Vavoulis et al. (2010).
//!
//! Six ionic currents share one compartment:
//!
//! ```text
//! cm dv/dt = input - g_nat m^3 h (v - vna) - g_nap r (v - vna)
//!                  - g_a a b (v - vk) - g_d n (v - vk)
//!                  - g_lva c d (v - vca) - g_hva e f (v - vca)
//! ```
//!
//! The gates `m`, `c` and `d` are instantaneous Boltzmann functions of `v`.
//! Every other gate `x` relaxes as `dx/dt = (x_inf(v) - x) / tau_x(v)` with
//! `tau_x(v) = tau0 / (exp(delta u) + exp(-(1 - delta) u))`, `u = (v - vh) / vs`.
//! A positive input depolarizes.
use crate::core::model::Model;
use crate::core::params::ParameterSet;
use crate::core::utils::boltzmann;
use crate::error::CPGError;
use crate::keys;

keys! {
    /// State variables of the CGC model.
    pub enum CgcVariable {
        V => "v",
        /// Transient sodium inactivation.
        H => "h",
        /// Persistent sodium activation.
        R => "r",
        /// A-type potassium activation.
        A => "a",
        /// A-type potassium inactivation.
        B => "b",
        /// Delayed rectifier activation.
        N => "n",
        /// High-voltage-activated calcium activation.
        E => "e",
        /// High-voltage-activated calcium inactivation.
        F => "f",
    }
}

keys! {
    /// Parameters of the CGC model.
    pub enum CgcParameter {
        Cm => "cm",
        Vna => "vna",
        Vk => "vk",
        Vca => "vca",
        Gnat => "g_nat",
        Gnap => "g_nap",
        Ga => "g_a",
        Gd => "g_d",
        Glva => "g_lva",
        Ghva => "g_hva",
        VhH => "vh_h",
        VsH => "vs_h",
        Tau0H => "tau0_h",
        DeltaH => "delta_h",
        VhR => "vh_r",
        VsR => "vs_r",
        Tau0R => "tau0_r",
        DeltaR => "delta_r",
        VhA => "vh_a",
        VsA => "vs_a",
        Tau0A => "tau0_a",
        DeltaA => "delta_a",
        VhB => "vh_b",
        VsB => "vs_b",
        Tau0B => "tau0_b",
        DeltaB => "delta_b",
        VhN => "vh_n",
        VsN => "vs_n",
        Tau0N => "tau0_n",
        DeltaN => "delta_n",
        VhE => "vh_e",
        VsE => "vs_e",
        Tau0E => "tau0_e",
        DeltaE => "delta_e",
        VhF => "vh_f",
        VsF => "vs_f",
        Tau0F => "tau0_f",
        DeltaF => "delta_f",
        VhM => "vh_m",
        VsM => "vs_m",
        VhC => "vh_c",
        VsC => "vs_c",
        VhD => "vh_d",
        VsD => "vs_d",
    }
}

/// The parameter keys `(vh, vs, tau0, delta)` of each kinetic gate, in state order after `v`.
const GATE_KEYS: [[CgcParameter; 4]; 7] = {
    use CgcParameter::*;
    [
        [VhH, VsH, Tau0H, DeltaH],
        [VhR, VsR, Tau0R, DeltaR],
        [VhA, VsA, Tau0A, DeltaA],
        [VhB, VsB, Tau0B, DeltaB],
        [VhN, VsN, Tau0N, DeltaN],
        [VhE, VsE, Tau0E, DeltaE],
        [VhF, VsF, Tau0F, DeltaF],
    ]
};

/// Boltzmann steady state and asymmetric bell-shaped time constant of a gate.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Kinetics {
    v_half: f64,
    slope: f64,
    tau0: f64,
    delta: f64,
}

impl Kinetics {
    #[inline]
    fn steady(&self, v: f64) -> f64 {
        boltzmann(v, self.v_half, self.slope)
    }

    #[inline]
    fn tau(&self, v: f64) -> f64 {
        let u = (v - self.v_half) / self.slope;
        self.tau0 / ((self.delta * u).exp() + (-(1.0 - self.delta) * u).exp())
    }
}

/// The eight-variable CGC model.
#[derive(Debug, Clone, PartialEq)]
pub struct VavoulisCgc {
    params: ParameterSet<CgcParameter>,
    gates: [Kinetics; 7],
}

impl VavoulisCgc {
    /// Returns the published parameters of the CGC.
    pub fn default_params() -> ParameterSet<CgcParameter> {
        use CgcParameter::*;
        let mut params = ParameterSet::new()
            .with(Cm, 1.0)
            .with(Vna, 55.0)
            .with(Vk, -90.0)
            .with(Vca, 80.0)
            .with(Gnat, 1.68)
            .with(Gnap, 0.44)
            .with(Ga, 18.82)
            .with(Gd, 1.20)
            .with(Glva, 0.01)
            .with(Ghva, 1.03)
            .with(VhM, -35.20)
            .with(VsM, 9.66)
            .with(VhC, -41.35)
            .with(VsC, 5.05)
            .with(VhD, -64.13)
            .with(VsD, -4.03);
        let gates = [
            [-56.43, -8.41, 778.82, 0.03],
            [-47.03, 20.55, 4.01, 1.00],
            [-36.37, 8.72, 13.28, 0.39],
            [-83.00, -6.20, 266.75, 0.83],
            [-59.43, 34.79, 14.52, 0.18],
            [-14.25, 6.96, 3.81, 0.84],
            [-21.44, -5.78, 34.68, 0.97],
        ];
        for (keys, values) in GATE_KEYS.iter().zip(gates.iter()) {
            for (&key, &value) in keys.iter().zip(values.iter()) {
                params.set(key, value);
            }
        }
        params
    }

    /// Returns the state with voltage `v` and every kinetic gate at its steady state for `v`.
    pub fn steady_state(&self, v: f64) -> [f64; 8] {
        let mut state = [v; 8];
        for (x, gate) in state[1..].iter_mut().zip(self.gates.iter()) {
            *x = gate.steady(v);
        }
        state
    }

    /// Returns the total ionic current (outward positive) for the provided state.
    pub fn ionic_current(&self, state: &[f64; 8]) -> f64 {
        use CgcParameter::*;
        let p = &self.params;
        let [v, h, r, a, b, n, e, f] = *state;
        let m = boltzmann(v, p.get(VhM), p.get(VsM));
        let c = boltzmann(v, p.get(VhC), p.get(VsC));
        let d = boltzmann(v, p.get(VhD), p.get(VsD));

        (p.get(Gnat) * m * m * m * h + p.get(Gnap) * r) * (v - p.get(Vna))
            + (p.get(Ga) * a * b + p.get(Gd) * n) * (v - p.get(Vk))
            + (p.get(Glva) * c * d + p.get(Ghva) * e * f) * (v - p.get(Vca))
    }
}

impl Model for VavoulisCgc {
    type Variable = CgcVariable;
    type Parameter = CgcParameter;
    type State = [f64; 8];

    const NAME: &'static str = "Vavoulis CGC";

    fn build(params: ParameterSet<CgcParameter>) -> Result<Self, CPGError> {
        use CgcParameter::*;
        let invalid = |key: CgcParameter, reason: &str| {
            CPGError::InvalidParameters(format!(
                "{}: {} {}, got {}",
                Self::NAME,
                key,
                reason,
                params.get(key)
            ))
        };
        if !(params.get(Cm) > 0.0) {
            return Err(invalid(Cm, "must be positive"));
        }
        for key in [VsM, VsC, VsD] {
            if params.get(key) == 0.0 {
                return Err(invalid(key, "must be non-zero"));
            }
        }

        let mut gates = [Kinetics {
            v_half: 0.0,
            slope: 1.0,
            tau0: 1.0,
            delta: 0.0,
        }; 7];
        for (gate, [vh, vs, tau0, delta]) in gates.iter_mut().zip(GATE_KEYS) {
            if params.get(vs) == 0.0 {
                return Err(invalid(vs, "must be non-zero"));
            }
            if !(params.get(tau0) > 0.0) {
                return Err(invalid(tau0, "must be positive"));
            }
            *gate = Kinetics {
                v_half: params.get(vh),
                slope: params.get(vs),
                tau0: params.get(tau0),
                delta: params.get(delta),
            };
        }

        Ok(VavoulisCgc { params, gates })
    }

    fn params(&self) -> &ParameterSet<CgcParameter> {
        &self.params
    }

    fn derivative(&self, state: &[f64; 8], input: f64) -> [f64; 8] {
        let v = state[0];
        let mut derivative = [0.0; 8];
        derivative[0] = (input - self.ionic_current(state)) / self.params.get(CgcParameter::Cm);
        for (i, gate) in self.gates.iter().enumerate() {
            derivative[i + 1] = (gate.steady(v) - state[i + 1]) / gate.tau(v);
        }
        derivative
    }
}
