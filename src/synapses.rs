//! Synapses coupling the voltage of a presynaptic neuron to the input of a postsynaptic one.
//!
//! Two kinetics are available and they differ in how their current reaches the postsynaptic neuron:
//! - [`chemical::ChemicalSynapse`] receives both voltages as step arguments and only exposes its current, the caller routes it;
//! - [`gradual::GradualSynapse`] is owned by a [`Circuit`](crate::circuit::Circuit) which reads the presynaptic voltage and injects the current itself.
//!
//! Both integrate their gates with the same fixed-step integrators as the neurons, with the presynaptic voltage held over the step.
pub mod chemical;
pub mod gradual;

/// Anything that computes a coupling current.
pub trait Synapse {
    /// Returns the current computed by the last step, with the sign convention `g x (v_post - E_syn)`.
    fn current(&self) -> f64;
}
