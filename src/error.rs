//! Error module for the Rusty CPG library.
use std::error::Error;
use std::fmt;

/// Error types for the library.
#[derive(Debug, PartialEq, Clone)]
pub enum CPGError {
    /// Error for invalid parameters, e.g., a non-positive time step or time constant.
    InvalidParameters(String),
    /// Error for a parameter or variable name that the model does not declare.
    UnknownKey(String),
    /// Error for out of bounds access, e.g., neuron not found in the circuit.
    OutOfBounds(String),
    /// Convergence error from iterative algorithms, e.g., the search for a resting potential.
    ConvergenceError(String),
    /// Error for a state variable that became NaN or infinite during a step.
    Divergence {
        context: String,
        variable: &'static str,
        value: f64,
    },
    /// Error for I/O operations.
    IOError(String),
}

impl fmt::Display for CPGError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            CPGError::InvalidParameters(e) => write!(f, "Invalid parameters: {}", e),
            CPGError::UnknownKey(e) => write!(f, "Unknown key: {}", e),
            CPGError::OutOfBounds(e) => {
                write!(f, "Index out of bounds: {}", e)
            }
            CPGError::ConvergenceError(e) => write!(f, "Convergence error: {}", e),
            CPGError::Divergence {
                context,
                variable,
                value,
            } => write!(f, "Divergence ({}): variable {} is {}", context, variable, value),
            CPGError::IOError(e) => write!(f, "I/O error: {}", e),
        }
    }
}

impl Error for CPGError {}
