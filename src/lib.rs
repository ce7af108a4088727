//! This crate provides a fixed-step ODE engine for simulating small circuits of conductance-based neurons.
//!
//! # Neuron Models
//!
//! Every model implements [`Model`](core::model::Model): a typed set of state variables and parameters, and a vector field driven by an external input current.
//! The crate ships the [Hindmarsh-Rose](models::hindmarsh_rose), [Hodgkin-Huxley](models::hodgkin_huxley) and [Vavoulis](models::vavoulis) families, the latter including the [cerebral giant cell](models::vavoulis_cgc).
//!
//! ```rust
//! use rusty_cpg::core::neuron::NeuronUnit;
//! use rusty_cpg::models::hindmarsh_rose::{HindmarshRose, INITIAL_STATE};
//!
//! let mut neuron = NeuronUnit::<HindmarshRose>::build(HindmarshRose::default_params())
//!     .unwrap()
//!     .with_state(INITIAL_STATE);
//!
//! for _ in 0..1000 {
//!     neuron.add_synaptic_input(2.5);
//!     neuron.step(0.01);
//! }
//! assert!(neuron.first_non_finite().is_none());
//! ```
//!
//! # Building Circuits
//!
//! A [`Circuit`](circuit::Circuit) owns neurons, graded synapses between them and external stimuli.
//! Each tick applies the stimuli, then computes every synaptic current from the states at the start of the tick, then advances every neuron.
//!
//! ```rust
//! use rusty_cpg::circuit::Circuit;
//! use rusty_cpg::core::model::Model;
//! use rusty_cpg::core::neuron::NeuronUnit;
//! use rusty_cpg::models::vavoulis::{CellType, Vavoulis, V_REST};
//! use rusty_cpg::presets::feeding_synapse;
//! use rusty_cpg::stimulus::Stimulus;
//!
//! let mut circuit = Circuit::new();
//! let cell = Vavoulis::build(Vavoulis::params_for(CellType::N1M)).unwrap();
//! let state = cell.steady_state(V_REST);
//! let n1m = circuit.add_neuron("N1M", NeuronUnit::<Vavoulis>::new(cell).with_state(state));
//! let cell = Vavoulis::build(Vavoulis::params_for(CellType::N2v)).unwrap();
//! let state = cell.steady_state(V_REST);
//! let n2v = circuit.add_neuron("N2v", NeuronUnit::<Vavoulis>::new(cell).with_state(state));
//!
//! circuit.connect(n1m, "v", n2v, "v", feeding_synapse(0.0, 0.077, 200.0), 1.0).unwrap();
//! circuit.connect(n2v, "v", n1m, "v", feeding_synapse(-90.0, 50.0, 50.0), 1.0).unwrap();
//! circuit.add_stimulus(Stimulus::tonic(n1m, -6.0)).unwrap();
//!
//! for k in 0..100 {
//!     circuit.tick(k as f64 * 0.01, 0.01);
//! }
//! assert_eq!(circuit.num_synapses(), 2);
//! ```
//!
//! # Running Simulations
//!
//! The [`Simulator`](simulator::Simulator) drives any [`Simulation`](simulator::Simulation) and writes the chosen observables to a [`TraceWriter`](trace::TraceWriter).
//!
//! ```rust
//! use rusty_cpg::config::SimulationConfig;
//! use rusty_cpg::presets;
//! use rusty_cpg::simulator::Simulator;
//! use rusty_cpg::trace::TraceWriter;
//!
//! let mut scenario = presets::pacemaker().unwrap();
//! let simulator = Simulator::build(SimulationConfig {
//!     duration: 1.0,
//!     ..Default::default()
//! })
//! .unwrap();
//!
//! let mut trace = TraceWriter::new(Vec::new(), &scenario.observables).unwrap();
//! let summary = simulator
//!     .run(scenario.simulation.as_mut(), &scenario.observables, &mut trace)
//!     .unwrap();
//! assert_eq!(summary.ticks, 100);
//! assert_eq!(trace.rows(), 101);
//! ```
pub mod circuit;
pub mod config;
pub mod core;
pub mod error;
pub mod models;
pub mod presets;
pub mod simulator;
pub mod stimulus;
pub mod synapses;
pub mod trace;

/// The default integration step, in ms.
pub const DEFAULT_TIME_STEP: f64 = 0.01;
