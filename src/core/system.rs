//! Uniform ODE interface over the models.
use super::key::Key;
use super::model::Model;
use super::state::StateVector;

/// A fixed-size ODE system as seen by the integrators.
pub trait OdeSystem {
    /// The flat state vector of the system.
    type State: StateVector;

    /// Returns the derivative of the state for a constant external input.
    fn derivative(&self, state: &Self::State, input: f64) -> Self::State;
}

/// Presents a model as an [`OdeSystem`], translating between its variable keys and flat indices.
#[derive(Debug, Clone, PartialEq)]
pub struct SystemWrapper<M: Model> {
    model: M,
}

impl<M: Model> SystemWrapper<M> {
    /// Wrap a model.
    pub fn new(model: M) -> Self {
        debug_assert_eq!(M::Variable::count(), M::State::DIM);
        SystemWrapper { model }
    }

    /// Returns the wrapped model.
    pub fn model(&self) -> &M {
        &self.model
    }

    /// Returns the flat index of a state variable.
    #[inline]
    pub fn index_of(&self, variable: M::Variable) -> usize {
        variable.index()
    }

    /// Returns the names of the state variables, ordered by index.
    pub fn variable_names(&self) -> Vec<&'static str> {
        M::Variable::ALL.iter().map(|variable| variable.name()).collect()
    }
}

impl<M: Model> OdeSystem for SystemWrapper<M> {
    type State = M::State;

    #[inline]
    fn derivative(&self, state: &M::State, input: f64) -> M::State {
        self.model.derivative(state, input)
    }
}
