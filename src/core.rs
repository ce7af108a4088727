//! Core module defining the building blocks of the engine.
//!
//! - [`key`]: typed names of state variables and parameters
//! - [`params`]: parameter sets, loadable from JSON
//! - [`state`]: fixed-size state vectors
//! - [`model`]: the interface of a dynamical model
//! - [`system`] and [`integrator`]: vector fields and the fixed-step schemes advancing them
//! - [`neuron`]: a model bundled with its state and pending input
//! - [`utils`]: gating functions and time windows
pub mod integrator;
pub mod key;
pub mod model;
pub mod neuron;
pub mod params;
pub mod state;
pub mod system;
pub mod utils;
