//! Module implementing the steppable neuron units.
use std::fmt;
use std::marker::PhantomData;

use super::integrator::{Integrator, RungeKutta4};
use super::key::Key;
use super::model::Model;
use super::params::ParameterSet;
use super::state::StateVector;
use super::system::SystemWrapper;
use crate::error::CPGError;

/// A neuron unit binds a model, an integrator and an external input accumulator.
///
/// The accumulator collects any number of additive contributions (tonic drive, one current per incoming synapse) between two steps.
/// It is read once by [`NeuronUnit::step`] and then reset to zero, so contributions never carry over to the next step.
///
/// # Examples
///
/// ```rust
/// use rusty_cpg::core::neuron::NeuronUnit;
/// use rusty_cpg::core::params::ParameterSet;
/// use rusty_cpg::models::hindmarsh_rose::{HindmarshRose, HindmarshRoseParameter as P, HindmarshRoseVariable as V};
///
/// let mut neuron = NeuronUnit::<HindmarshRose>::build(HindmarshRose::default_params()).unwrap();
/// neuron.set(V::X, -0.712841);
/// neuron.set(V::Y, -1.93688);
/// neuron.set(V::Z, 3.16568);
///
/// for _ in 0..1000 {
///     neuron.add_synaptic_input(2.5);
///     neuron.step(0.01);
/// }
/// assert_eq!(neuron.pending_input(), 0.0);
/// assert!(neuron.get(V::X).is_finite());
/// assert_eq!(neuron.params().get(P::S), 4.0);
/// ```
#[derive(Debug, Clone)]
pub struct NeuronUnit<M: Model, I: Integrator = RungeKutta4> {
    system: SystemWrapper<M>,
    state: M::State,
    input: f64,
    integrator: PhantomData<I>,
}

impl<M: Model, I: Integrator> NeuronUnit<M, I> {
    /// Create a neuron unit from a model, with every state variable set to zero.
    /// Callers are expected to set every state variable before the first step.
    pub fn new(model: M) -> Self {
        NeuronUnit {
            system: SystemWrapper::new(model),
            state: M::State::zeros(),
            input: 0.0,
            integrator: PhantomData,
        }
    }

    /// Create a neuron unit from the model parameters.
    pub fn build(params: ParameterSet<M::Parameter>) -> Result<Self, CPGError> {
        Ok(Self::new(M::build(params)?))
    }

    /// Returns the neuron unit with its state replaced.
    pub fn with_state(mut self, state: M::State) -> Self {
        self.state = state;
        self
    }

    /// Returns the value of a state variable.
    #[inline]
    pub fn get(&self, variable: M::Variable) -> f64 {
        self.state.as_slice()[self.system.index_of(variable)]
    }

    /// Set the value of a state variable.
    pub fn set(&mut self, variable: M::Variable, value: f64) {
        let index = self.system.index_of(variable);
        self.state.as_mut_slice()[index] = value;
    }

    /// Returns the state vector.
    pub fn state(&self) -> &M::State {
        &self.state
    }

    /// Replace the whole state vector.
    pub fn set_state(&mut self, state: M::State) {
        self.state = state;
    }

    /// Returns the model of the neuron.
    pub fn model(&self) -> &M {
        self.system.model()
    }

    /// Returns the parameters of the model.
    pub fn params(&self) -> &ParameterSet<M::Parameter> {
        self.system.model().params()
    }

    /// Add a contribution to the external input of the next step.
    #[inline]
    pub fn add_synaptic_input(&mut self, value: f64) {
        self.input += value;
    }

    /// Returns the external input accumulated since the last step.
    pub fn pending_input(&self) -> f64 {
        self.input
    }

    /// Advance the neuron by one step of size `dt`, with the accumulated input held constant, and reset the accumulator.
    /// Must be called once per tick, after every input of the tick has been added.
    #[inline]
    pub fn step(&mut self, dt: f64) {
        let input = std::mem::take(&mut self.input);
        self.state = I::advance(&self.system, &self.state, input, dt);
    }

    /// Same as [`NeuronUnit::step`], then returns an error if a state variable is no longer finite.
    /// The state after the step is identical to the one [`NeuronUnit::step`] produces.
    pub fn try_step(&mut self, dt: f64) -> Result<(), CPGError> {
        self.step(dt);
        match self.first_non_finite() {
            Some((variable, value)) => Err(CPGError::Divergence {
                context: format!("{} neuron after a step of {}", M::NAME, dt),
                variable: variable.name(),
                value,
            }),
            None => Ok(()),
        }
    }

    /// Returns the first state variable that is NaN or infinite, if any.
    pub fn first_non_finite(&self) -> Option<(M::Variable, f64)> {
        M::Variable::ALL
            .iter()
            .map(|&variable| (variable, self.get(variable)))
            .find(|(_, value)| !value.is_finite())
    }
}

/// A type-erased neuron, so that units of different models can live in one circuit.
///
/// Variables are addressed by flat index, resolved once from their names.
pub trait Neuron: fmt::Debug {
    /// Returns the name of the underlying model.
    fn model_name(&self) -> &'static str;

    /// Returns the names of the state variables, ordered by index.
    fn variable_names(&self) -> Vec<&'static str>;

    /// Returns the number of state variables.
    fn num_variables(&self) -> usize;

    /// Returns the index of the state variable with the provided name.
    fn variable_index(&self, name: &str) -> Result<usize, CPGError>;

    /// Returns the value of the state variable at the provided index.
    ///
    /// # Panics
    ///
    /// Panics if the index is not smaller than the number of state variables.
    fn value(&self, index: usize) -> f64;

    /// Set the value of the state variable at the provided index.
    ///
    /// # Panics
    ///
    /// Panics if the index is not smaller than the number of state variables.
    fn set_value(&mut self, index: usize, value: f64);

    /// Add a contribution to the external input of the next step.
    fn add_synaptic_input(&mut self, value: f64);

    /// Returns the external input accumulated since the last step.
    fn pending_input(&self) -> f64;

    /// Advance the neuron by one step and reset its accumulator.
    fn step(&mut self, dt: f64);

    /// Returns the name and value of the first state variable that is NaN or infinite, if any.
    fn first_non_finite(&self) -> Option<(&'static str, f64)>;
}

impl<M: Model + 'static, I: Integrator + 'static> Neuron for NeuronUnit<M, I> {
    fn model_name(&self) -> &'static str {
        M::NAME
    }

    fn variable_names(&self) -> Vec<&'static str> {
        self.system.variable_names()
    }

    fn num_variables(&self) -> usize {
        M::State::DIM
    }

    fn variable_index(&self, name: &str) -> Result<usize, CPGError> {
        M::Variable::from_name(name).map(|variable| variable.index())
    }

    fn value(&self, index: usize) -> f64 {
        self.state.as_slice()[index]
    }

    fn set_value(&mut self, index: usize, value: f64) {
        self.state.as_mut_slice()[index] = value;
    }

    fn add_synaptic_input(&mut self, value: f64) {
        NeuronUnit::add_synaptic_input(self, value);
    }

    fn pending_input(&self) -> f64 {
        self.input
    }

    fn step(&mut self, dt: f64) {
        NeuronUnit::step(self, dt);
    }

    fn first_non_finite(&self) -> Option<(&'static str, f64)> {
        NeuronUnit::first_non_finite(self).map(|(variable, value)| (variable.name(), value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::integrator::ForwardEuler;
    use crate::models::exponential_decay::{
        DecayParameter, DecayVariable, ExponentialDecay,
    };
    use approx::assert_relative_eq;

    fn decay(rate: f64) -> ExponentialDecay {
        ExponentialDecay::build(ParameterSet::new().with(DecayParameter::Rate, rate)).unwrap()
    }

    #[test]
    fn test_neuron_get_set() {
        let mut neuron = NeuronUnit::<ExponentialDecay>::new(decay(1.0));
        assert_eq!(neuron.get(DecayVariable::X), 0.0);
        neuron.set(DecayVariable::X, 3.5);
        assert_eq!(neuron.get(DecayVariable::X), 3.5);
        assert_eq!(neuron.state(), &[3.5]);
    }

    #[test]
    fn test_accumulator_sums_contributions() {
        let mut neuron = NeuronUnit::<ExponentialDecay, ForwardEuler>::new(decay(0.0));
        neuron.add_synaptic_input(1.0);
        neuron.add_synaptic_input(-0.25);
        neuron.add_synaptic_input(0.5);
        assert_eq!(neuron.pending_input(), 1.25);

        neuron.step(0.1);
        assert_eq!(neuron.pending_input(), 0.0);
        assert_relative_eq!(neuron.get(DecayVariable::X), 0.125);
    }

    #[test]
    fn test_accumulator_reset_law() {
        // A unit driven once then left alone must match a unit whose third step has zero input.
        let mut driven = NeuronUnit::<ExponentialDecay>::new(decay(0.5)).with_state([1.0]);
        let mut reference = driven.clone();

        driven.add_synaptic_input(2.0);
        driven.step(0.01);
        driven.add_synaptic_input(-1.0);
        driven.step(0.01);
        driven.step(0.01);

        reference.add_synaptic_input(2.0);
        reference.step(0.01);
        reference.add_synaptic_input(-1.0);
        reference.step(0.01);
        reference.add_synaptic_input(0.0);
        reference.step(0.01);

        assert_eq!(driven.state(), reference.state());

        let mut unreset = NeuronUnit::<ExponentialDecay>::new(decay(0.5)).with_state([1.0]);
        unreset.add_synaptic_input(2.0);
        unreset.step(0.01);
        unreset.add_synaptic_input(-1.0);
        unreset.step(0.01);
        unreset.add_synaptic_input(-1.0);
        unreset.step(0.01);
        assert_ne!(driven.state(), unreset.state());
    }

    #[test]
    fn test_try_step_reports_divergence() {
        let mut neuron = NeuronUnit::<ExponentialDecay>::new(decay(1.0)).with_state([1.0]);
        assert!(neuron.try_step(0.01).is_ok());

        neuron.add_synaptic_input(f64::INFINITY);
        match neuron.try_step(0.01) {
            Err(CPGError::Divergence { variable, .. }) => assert_eq!(variable, "x"),
            other => panic!("Unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_try_step_keeps_nominal_numerics() {
        let mut checked = NeuronUnit::<ExponentialDecay>::new(decay(2.0)).with_state([1.0]);
        let mut unchecked = checked.clone();
        for _ in 0..100 {
            checked.add_synaptic_input(0.3);
            checked.try_step(0.01).unwrap();
            unchecked.add_synaptic_input(0.3);
            unchecked.step(0.01);
        }
        assert_eq!(checked.state(), unchecked.state());
    }

    #[test]
    fn test_type_erased_access() {
        let mut neuron: Box<dyn Neuron> =
            Box::new(NeuronUnit::<ExponentialDecay>::new(decay(1.0)).with_state([2.0]));
        assert_eq!(neuron.model_name(), "exponential decay");
        assert_eq!(neuron.variable_names(), vec!["x"]);
        assert_eq!(neuron.num_variables(), 1);
        let x = neuron.variable_index("x").unwrap();
        assert_eq!(neuron.value(x), 2.0);
        neuron.set_value(x, -1.0);
        assert_eq!(neuron.value(x), -1.0);
        assert!(matches!(
            neuron.variable_index("v"),
            Err(CPGError::UnknownKey(_))
        ));
        assert_eq!(neuron.first_non_finite(), None);
    }
}
