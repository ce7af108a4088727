//! Fixed-step numerical integrators.
//!
//! Integrators are stateless: a step is a pure function of the system, the state, the external input and the step size.
//! The input is captured once per step and held constant across the stages, so sub-step variations of the input current are not modeled.
//! There is no step-size control and no stability check; choosing a step small enough for the stiffest model is the caller's job.
use itertools::izip;
use std::fmt;

use super::state::StateVector;
use super::system::OdeSystem;

/// A fixed-step integration scheme.
pub trait Integrator: Clone + Copy + Default + fmt::Debug {
    /// The number of derivative evaluations per step.
    const STAGES: usize;
    /// The order of accuracy of the scheme.
    const ORDER: usize;

    /// Returns the state of the system after one step of size `dt` with a constant external input.
    fn advance<S: OdeSystem>(system: &S, state: &S::State, input: f64, dt: f64) -> S::State;
}

/// The classic fourth-order Runge-Kutta scheme.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RungeKutta4;

impl Integrator for RungeKutta4 {
    const STAGES: usize = 4;
    const ORDER: usize = 4;

    #[inline]
    fn advance<S: OdeSystem>(system: &S, state: &S::State, input: f64, dt: f64) -> S::State {
        let k1 = system.derivative(state, input);
        let k2 = system.derivative(&state.axpy(dt / 2.0, &k1), input);
        let k3 = system.derivative(&state.axpy(dt / 2.0, &k2), input);
        let k4 = system.derivative(&state.axpy(dt, &k3), input);

        let mut next = *state;
        for (x, a, b, c, d) in izip!(
            next.as_mut_slice(),
            k1.as_slice(),
            k2.as_slice(),
            k3.as_slice(),
            k4.as_slice()
        ) {
            *x += dt / 6.0 * (a + 2.0 * b + 2.0 * c + d);
        }
        next
    }
}

/// The first-order forward Euler scheme.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ForwardEuler;

impl Integrator for ForwardEuler {
    const STAGES: usize = 1;
    const ORDER: usize = 1;

    #[inline]
    fn advance<S: OdeSystem>(system: &S, state: &S::State, input: f64, dt: f64) -> S::State {
        state.axpy(dt, &system.derivative(state, input))
    }
}
