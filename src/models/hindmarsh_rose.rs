//! Hindmarsh-Rose bursting neuron.
//!
//! ```text
//! dx/dt = vh (y + b x^2 - a x^3 - z + e + input)
//! dy/dt = vh (c - d x^2 - y)
//! dz/dt = vh mu (S (x - xr) - z)
//! ```
//!
//! `x` plays the role of the membrane voltage, `y` is the fast recovery current and `z` the slow adaptation current.
//! `vh` rescales time for the whole vector field; a positive input depolarizes.
use crate::core::model::Model;
use crate::core::params::ParameterSet;
use crate::error::CPGError;
use crate::keys;

keys! {
    /// State variables of the Hindmarsh-Rose model.
    pub enum HindmarshRoseVariable {
        X => "x",
        Y => "y",
        Z => "z",
    }
}

keys! {
    /// Parameters of the Hindmarsh-Rose model.
    pub enum HindmarshRoseParameter {
        /// Constant bias current.
        E => "e",
        /// Time scale of the slow variable.
        Mu => "mu",
        S => "s",
        A => "a",
        B => "b",
        C => "c",
        D => "d",
        /// Resting value of the slow variable.
        Xr => "xr",
        /// Time scale of the whole system.
        Vh => "vh",
    }
}

/// Initial state on the bursting attractor for the default parameters.
pub const INITIAL_STATE: [f64; 3] = [-0.712841, -1.93688, 3.16568];

/// The three-variable Hindmarsh-Rose model.
#[derive(Debug, Clone, PartialEq)]
pub struct HindmarshRose {
    params: ParameterSet<HindmarshRoseParameter>,
}

impl HindmarshRose {
    /// Returns the parameters of the regular bursting regime.
    pub fn default_params() -> ParameterSet<HindmarshRoseParameter> {
        use HindmarshRoseParameter::*;
        ParameterSet::new()
            .with(E, 0.0)
            .with(Mu, 0.006)
            .with(S, 4.0)
            .with(A, 1.0)
            .with(B, 3.0)
            .with(C, 1.0)
            .with(D, 5.0)
            .with(Xr, -1.6)
            .with(Vh, 1.0)
    }
}

impl Model for HindmarshRose {
    type Variable = HindmarshRoseVariable;
    type Parameter = HindmarshRoseParameter;
    type State = [f64; 3];

    const NAME: &'static str = "Hindmarsh-Rose";

    fn build(params: ParameterSet<HindmarshRoseParameter>) -> Result<Self, CPGError> {
        Ok(HindmarshRose { params })
    }

    fn params(&self) -> &ParameterSet<HindmarshRoseParameter> {
        &self.params
    }

    fn derivative(&self, state: &[f64; 3], input: f64) -> [f64; 3] {
        use HindmarshRoseParameter::*;
        let p = &self.params;
        let [x, y, z] = *state;

        let dx = y + p.get(B) * x * x - p.get(A) * x * x * x - z + p.get(E) + input;
        let dy = p.get(C) - p.get(D) * x * x - y;
        let dz = p.get(Mu) * (p.get(S) * (x - p.get(Xr)) - z);

        let vh = p.get(Vh);
        [vh * dx, vh * dy, vh * dz]
    }
}
