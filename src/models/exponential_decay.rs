//! Linear relaxation `dx/dt = -k x + input`, a reference model with a closed-form solution.
use crate::core::model::Model;
use crate::core::params::ParameterSet;
use crate::error::CPGError;
use crate::keys;

keys! {
    /// State variables of the exponential decay.
    pub enum DecayVariable {
        X => "x",
    }
}

keys! {
    /// Parameters of the exponential decay.
    pub enum DecayParameter {
        /// Decay rate `k`.
        Rate => "k",
    }
}

/// The linear model `dx/dt = -k x + input`.
#[derive(Debug, Clone, PartialEq)]
pub struct ExponentialDecay {
    params: ParameterSet<DecayParameter>,
    rate: f64,
}

impl ExponentialDecay {
    /// Returns the exact value at time `t` of the solution starting from `x0` with a constant input.
    pub fn solution(&self, x0: f64, input: f64, t: f64) -> f64 {
        if self.rate == 0.0 {
            return x0 + input * t;
        }
        let x_inf = input / self.rate;
        x_inf + (x0 - x_inf) * (-self.rate * t).exp()
    }
}

impl Model for ExponentialDecay {
    type Variable = DecayVariable;
    type Parameter = DecayParameter;
    type State = [f64; 1];

    const NAME: &'static str = "exponential decay";

    fn build(params: ParameterSet<DecayParameter>) -> Result<Self, CPGError> {
        let rate = params.get(DecayParameter::Rate);
        if !rate.is_finite() {
            return Err(CPGError::InvalidParameters(format!(
                "{}: k must be finite, got {}",
                Self::NAME,
                rate
            )));
        }
        Ok(ExponentialDecay { params, rate })
    }

    fn params(&self) -> &ParameterSet<DecayParameter> {
        &self.params
    }

    #[inline]
    fn derivative(&self, state: &[f64; 1], input: f64) -> [f64; 1] {
        [-self.rate * state[0] + input]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_solution() {
        let model =
            ExponentialDecay::build(ParameterSet::new().with(DecayParameter::Rate, 2.0)).unwrap();
        assert_relative_eq!(model.solution(1.0, 0.0, 0.5), (-1.0_f64).exp());
        assert_relative_eq!(model.solution(0.0, 4.0, 1e3), 2.0);
        assert_eq!(model.derivative(&[1.5], 1.0), [-2.0]);
    }

    #[test]
    fn test_rejects_non_finite_rate() {
        let params = ParameterSet::new().with(DecayParameter::Rate, f64::NAN);
        assert!(matches!(
            ExponentialDecay::build(params),
            Err(CPGError::InvalidParameters(_))
        ));
    }
}
