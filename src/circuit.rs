//! Circuits of heterogeneous neurons coupled by gradual-activation synapses.
//!
//! A circuit is an arena: it owns every neuron and every synapse, and connections only hold ids.
//! One tick performs, in order:
//! 1. every active stimulus is added to its target;
//! 2. every synapse reads its presynaptic voltage and injects its current into its postsynaptic neuron;
//! 3. every neuron advances by one step.
//!
//! Synapses and neurons are never interleaved, so every synapse sees the voltages of the end of the previous tick.
use std::fmt;

use crate::core::key::Key;
use crate::core::neuron::Neuron;
use crate::core::params::ParameterSet;
use crate::error::CPGError;
use crate::stimulus::Stimulus;
use crate::synapses::gradual::{GradualParameter, GradualSynapse, GradualVariable};
use crate::synapses::Synapse;
use crate::trace::Observable;

/// The id of a neuron in a circuit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NeuronId(pub(crate) usize);

impl NeuronId {
    pub fn index(&self) -> usize {
        self.0
    }
}

impl fmt::Display for NeuronId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The id of a synapse in a circuit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SynapseId(pub(crate) usize);

impl SynapseId {
    pub fn index(&self) -> usize {
        self.0
    }
}

impl fmt::Display for SynapseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A synapse together with the neurons and variables it couples.
#[derive(Debug, Clone)]
struct Connection {
    pre: NeuronId,
    pre_index: usize,
    post: NeuronId,
    post_index: usize,
    synapse: GradualSynapse,
    scale: f64,
}

/// A fixed set of neurons, synapses and stimuli, stepped in lockstep.
#[derive(Debug, Default)]
pub struct Circuit {
    neurons: Vec<Box<dyn Neuron>>,
    labels: Vec<String>,
    connections: Vec<Connection>,
    stimuli: Vec<Stimulus>,
}

impl Circuit {
    /// Create an empty circuit.
    pub fn new() -> Self {
        Circuit::default()
    }

    /// Add a neuron to the circuit and returns its id.
    pub fn add_neuron<N: Neuron + 'static>(&mut self, label: &str, neuron: N) -> NeuronId {
        let id = NeuronId(self.neurons.len());
        log::debug!(
            "Add neuron {} ({}) with model {}",
            id,
            label,
            neuron.model_name()
        );
        self.neurons.push(Box::new(neuron));
        self.labels.push(label.to_string());
        id
    }

    /// Connect the variable `pre_var` of neuron `pre` to neuron `post` through a gradual-activation synapse.
    /// At every tick, `scale` times the synaptic current, computed with the variable `post_var` of `post`, is added to the input of `post`.
    ///
    /// The function returns an error if a neuron does not belong to the circuit, if a variable name is unknown, or if the synapse parameters are invalid.
    pub fn connect(
        &mut self,
        pre: NeuronId,
        pre_var: &str,
        post: NeuronId,
        post_var: &str,
        params: ParameterSet<GradualParameter>,
        scale: f64,
    ) -> Result<SynapseId, CPGError> {
        let pre_index = self.neuron(pre)?.variable_index(pre_var)?;
        let post_index = self.neuron(post)?.variable_index(post_var)?;
        if !scale.is_finite() {
            return Err(CPGError::InvalidParameters(format!(
                "Synapse scale must be finite, got {}",
                scale
            )));
        }
        let synapse = GradualSynapse::build(params)?;

        let id = SynapseId(self.connections.len());
        log::debug!(
            "Add synapse {}: {}.{} -> {}.{} (gsyn={}, esyn={}, tau_syn={}, scale={})",
            id,
            self.labels[pre.0],
            pre_var,
            self.labels[post.0],
            post_var,
            synapse.params().get(GradualParameter::GSyn),
            synapse.params().get(GradualParameter::ESyn),
            synapse.params().get(GradualParameter::TauSyn),
            scale
        );
        self.connections.push(Connection {
            pre,
            pre_index,
            post,
            post_index,
            synapse,
            scale,
        });
        Ok(id)
    }

    /// Add a stimulus to the circuit.
    /// The function returns an error if the target does not belong to the circuit.
    pub fn add_stimulus(&mut self, stimulus: Stimulus) -> Result<(), CPGError> {
        self.neuron(stimulus.target())?;
        log::debug!(
            "Add stimulus of {} to neuron {} ({})",
            stimulus.amplitude(),
            stimulus.target(),
            self.labels[stimulus.target().0]
        );
        self.stimuli.push(stimulus);
        Ok(())
    }

    pub fn num_neurons(&self) -> usize {
        self.neurons.len()
    }

    pub fn num_synapses(&self) -> usize {
        self.connections.len()
    }

    pub fn num_stimuli(&self) -> usize {
        self.stimuli.len()
    }

    /// Returns a reference to a neuron of the circuit.
    pub fn neuron(&self, id: NeuronId) -> Result<&dyn Neuron, CPGError> {
        self.neurons
            .get(id.0)
            .map(|neuron| neuron.as_ref())
            .ok_or_else(|| CPGError::OutOfBounds(format!("No neuron with id {}", id)))
    }

    /// Returns a mutable reference to a neuron of the circuit, e.g., to set its initial state.
    pub fn neuron_mut(&mut self, id: NeuronId) -> Result<&mut dyn Neuron, CPGError> {
        match self.neurons.get_mut(id.0) {
            Some(neuron) => Ok(neuron.as_mut()),
            None => Err(CPGError::OutOfBounds(format!("No neuron with id {}", id))),
        }
    }

    pub fn label(&self, id: NeuronId) -> Result<&str, CPGError> {
        self.labels
            .get(id.0)
            .map(|label| label.as_str())
            .ok_or_else(|| CPGError::OutOfBounds(format!("No neuron with id {}", id)))
    }

    /// Returns a reference to a synapse of the circuit.
    pub fn synapse(&self, id: SynapseId) -> Result<&GradualSynapse, CPGError> {
        self.connections
            .get(id.0)
            .map(|connection| &connection.synapse)
            .ok_or_else(|| CPGError::OutOfBounds(format!("No synapse with id {}", id)))
    }

    /// Returns a mutable reference to a synapse of the circuit, e.g., to set its initial state.
    pub fn synapse_mut(&mut self, id: SynapseId) -> Result<&mut GradualSynapse, CPGError> {
        self.connections
            .get_mut(id.0)
            .map(|connection| &mut connection.synapse)
            .ok_or_else(|| CPGError::OutOfBounds(format!("No synapse with id {}", id)))
    }

    /// Returns an observable for a state variable of a neuron, labelled `{neuron label}_{variable}`.
    pub fn observe_variable(&self, id: NeuronId, name: &str) -> Result<Observable, CPGError> {
        let index = self.neuron(id)?.variable_index(name)?;
        Ok(Observable::Variable {
            neuron: id,
            index,
            label: format!("{}_{}", self.labels[id.0], name),
        })
    }

    /// Returns an observable for the current of a synapse.
    pub fn observe_current(&self, id: SynapseId, label: &str) -> Result<Observable, CPGError> {
        self.synapse(id)?;
        Ok(Observable::SynapseCurrent {
            synapse: id,
            label: label.to_string(),
        })
    }

    /// Returns an observable for a gate of a synapse, labelled `{label}_{variable}`.
    pub fn observe_synapse_variable(
        &self,
        id: SynapseId,
        name: &str,
        label: &str,
    ) -> Result<Observable, CPGError> {
        self.synapse(id)?;
        let variable = GradualVariable::from_name(name)?;
        Ok(Observable::SynapseVariable {
            synapse: id,
            index: variable.index(),
            label: format!("{}_{}", label, name),
        })
    }

    /// Returns the current value of an observable.
    pub fn read(&self, observable: &Observable) -> Result<f64, CPGError> {
        match observable {
            Observable::Variable { neuron, index, .. } => {
                let neuron_ref = self.neuron(*neuron)?;
                if *index >= neuron_ref.num_variables() {
                    return Err(CPGError::OutOfBounds(format!(
                        "Neuron {} has no variable {}",
                        neuron, index
                    )));
                }
                Ok(neuron_ref.value(*index))
            }
            Observable::SynapseCurrent { synapse, .. } => Ok(self.synapse(*synapse)?.current()),
            Observable::SynapseVariable { synapse, index, .. } => {
                let variable = GradualVariable::ALL.get(*index).ok_or_else(|| {
                    CPGError::OutOfBounds(format!("Synapse {} has no variable {}", synapse, index))
                })?;
                Ok(self.synapse(*synapse)?.get(*variable))
            }
        }
    }

    /// Add every stimulus active at the provided time to the input of its target.
    pub fn apply_stimuli(&mut self, time: f64) {
        for stimulus in self.stimuli.iter() {
            if stimulus.is_active(time) {
                self.neurons[stimulus.target().0].add_synaptic_input(stimulus.amplitude());
            }
        }
    }

    /// Advance every synapse with the current presynaptic voltages and inject the scaled currents.
    pub fn step_synapses(&mut self, dt: f64) {
        for connection in self.connections.iter_mut() {
            let v_pre = self.neurons[connection.pre.0].value(connection.pre_index);
            let v_post = self.neurons[connection.post.0].value(connection.post_index);
            let current = connection.synapse.advance(dt, v_pre, v_post);
            self.neurons[connection.post.0].add_synaptic_input(connection.scale * current);
        }
    }

    /// Advance every neuron by one step.
    pub fn step_neurons(&mut self, dt: f64) {
        for neuron in self.neurons.iter_mut() {
            neuron.step(dt);
        }
    }

    /// Run one tick starting at the provided time: stimuli, then synapses, then neurons.
    pub fn tick(&mut self, time: f64, dt: f64) {
        self.apply_stimuli(time);
        self.step_synapses(dt);
        self.step_neurons(dt);
    }

    /// Same as [`Circuit::tick`], then returns an error if a state variable of a neuron is no longer finite.
    /// Every neuron is stepped before checking, so the state is identical to the one [`Circuit::tick`] produces.
    pub fn try_tick(&mut self, time: f64, dt: f64) -> Result<(), CPGError> {
        self.tick(time, dt);
        for (id, neuron) in self.neurons.iter().enumerate() {
            if let Some((variable, value)) = neuron.first_non_finite() {
                return Err(CPGError::Divergence {
                    context: format!("neuron {} ({}) at t={}", id, self.labels[id], time + dt),
                    variable,
                    value,
                });
            }
        }
        Ok(())
    }
}
