use rusty_cpg::core::integrator::{ForwardEuler, Integrator, RungeKutta4};
use rusty_cpg::core::neuron::NeuronUnit;
use rusty_cpg::core::params::ParameterSet;
use rusty_cpg::models::exponential_decay::{DecayParameter, DecayVariable, ExponentialDecay};

/// Returns the absolute error at t=1 of the solution of dx/dt = -x starting from 1.
fn global_error<I: Integrator>(dt: f64) -> f64 {
    let mut unit = NeuronUnit::<ExponentialDecay, I>::build(
        ParameterSet::new().with(DecayParameter::Rate, 1.0),
    )
    .unwrap()
    .with_state([1.0]);
    let num_steps = (1.0 / dt).round() as usize;
    for _ in 0..num_steps {
        unit.step(dt);
    }
    (unit.get(DecayVariable::X) - (-1.0_f64).exp()).abs()
}

#[test]
fn test_rk4_is_fourth_order() {
    let steps = [0.1, 0.05, 0.025, 0.0125];
    for pair in steps.windows(2) {
        let ratio = global_error::<RungeKutta4>(pair[0]) / global_error::<RungeKutta4>(pair[1]);
        assert!(
            (14.0..=18.0).contains(&ratio),
            "error ratio {} between dt={} and dt={}",
            ratio,
            pair[0],
            pair[1]
        );
    }
}

#[test]
fn test_euler_is_first_order() {
    let steps = [0.1, 0.05, 0.025, 0.0125];
    for pair in steps.windows(2) {
        let ratio = global_error::<ForwardEuler>(pair[0]) / global_error::<ForwardEuler>(pair[1]);
        assert!((1.8..=2.2).contains(&ratio), "error ratio {}", ratio);
    }
}

#[test]
fn test_rk4_beats_euler() {
    assert!(global_error::<RungeKutta4>(0.01) < 1e-9);
    assert!(global_error::<ForwardEuler>(0.01) > 1e-3);
}
