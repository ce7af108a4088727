//! Pluggable derivative functions of the dynamical models.
use std::fmt;

use super::key::Key;
use super::params::ParameterSet;
use super::state::StateVector;
use crate::error::CPGError;

/// A dynamical model: the right-hand side of an ODE system `dx/dt = f(x, input)`.
///
/// The parameters are fixed when the model is built and the derivative is a pure function of the state and of the external input.
/// It must be total over the reals: gating variables are nominally in [0, 1] but are never clamped.
pub trait Model: Clone + fmt::Debug {
    /// The state variables of the model.
    type Variable: Key;
    /// The parameters of the model.
    type Parameter: Key;
    /// The state vector, with one entry per variable.
    type State: StateVector;

    /// A short human-readable name of the model, e.g., used in logs.
    const NAME: &'static str;

    /// Create a model from its parameters.
    /// The function returns an error for parameters the equations cannot use, e.g., a zero time constant.
    fn build(params: ParameterSet<Self::Parameter>) -> Result<Self, CPGError>;

    /// Returns the parameters of the model.
    fn params(&self) -> &ParameterSet<Self::Parameter>;

    /// Returns the instantaneous rate of change of every state variable.
    fn derivative(&self, state: &Self::State, input: f64) -> Self::State;
}

/// Returns an error if the parameter is not strictly positive and finite.
pub(crate) fn require_positive<K: Key>(
    params: &ParameterSet<K>,
    key: K,
    model: &str,
) -> Result<(), CPGError> {
    let value = params.get(key);
    if value > 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(CPGError::InvalidParameters(format!(
            "{}: {} must be positive, got {}",
            model, key, value
        )))
    }
}
