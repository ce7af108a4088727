//! Ready-made scenarios: single cells with their stimulation protocols and the circuits of the Lymnaea feeding network.
//!
//! Circuit scenarios start every Vavoulis unit at its steady state for -67 mV and every synapse with closed gates.
//! All drives are applied over closed windows, bounds included.
use crate::circuit::{Circuit, NeuronId, SynapseId};
use crate::core::key::Key;
use crate::core::model::Model;
use crate::core::neuron::{Neuron, NeuronUnit};
use crate::core::params::ParameterSet;
use crate::core::utils::TimeInterval;
use crate::error::CPGError;
use crate::models::hindmarsh_rose::{HindmarshRose, HindmarshRoseParameter, INITIAL_STATE};
use crate::models::hodgkin_huxley::{HodgkinHuxley, HodgkinHuxleyParameter, HodgkinHuxleyVariable};
use crate::models::vavoulis::{CellType, Vavoulis, VavoulisParameter, V_REST};
use crate::models::vavoulis_cgc::{CgcParameter, VavoulisCgc};
use crate::simulator::Simulation;
use crate::stimulus::Stimulus;
use crate::synapses::chemical::{ChemicalParameter, ChemicalSynapse, ChemicalVariable};
use crate::synapses::gradual::GradualParameter;
use crate::synapses::Synapse;
use crate::trace::Observable;

/// Start and end of the drive window of the circuit scenarios (ms).
pub const DRIVE_WINDOW: (f64, f64) = (100.0, 9500.0);

/// A simulation together with what to record and for how long.
pub struct Scenario {
    pub name: &'static str,
    pub simulation: Box<dyn Simulation>,
    pub observables: Vec<Observable>,
    /// Default simulated time (ms).
    pub duration: f64,
}

/// Returns observables for every state variable of a neuron.
fn observe_all(circuit: &Circuit, id: NeuronId) -> Result<Vec<Observable>, CPGError> {
    circuit
        .neuron(id)?
        .variable_names()
        .into_iter()
        .map(|name| circuit.observe_variable(id, name))
        .collect()
}

fn vavoulis_unit(params: ParameterSet<VavoulisParameter>) -> Result<NeuronUnit<Vavoulis>, CPGError> {
    let model = Vavoulis::build(params)?;
    let rest = model.steady_state(V_REST);
    Ok(NeuronUnit::new(model).with_state(rest))
}

/// Returns the parameters of a gradual synapse with the activation curve of the feeding network.
pub fn feeding_synapse(esyn: f64, gsyn: f64, tau_syn: f64) -> ParameterSet<GradualParameter> {
    use GradualParameter::*;
    ParameterSet::new()
        .with(ESyn, esyn)
        .with(GSyn, gsyn)
        .with(TauSyn, tau_syn)
        .with(VPre, V_REST)
        .with(VR, -40.0)
        .with(DecSlope, 2.5)
}

/// One Hindmarsh-Rose unit on its bursting attractor, under a tonic drive of 2.5.
pub fn hindmarsh_rose(params: ParameterSet<HindmarshRoseParameter>) -> Result<Scenario, CPGError> {
    let mut circuit = Circuit::new();
    let unit = NeuronUnit::<HindmarshRose>::build(params)?.with_state(INITIAL_STATE);
    let hr = circuit.add_neuron("HR", unit);
    circuit.add_stimulus(Stimulus::tonic(hr, 2.5))?;
    let observables = vec![circuit.observe_variable(hr, "x")?];
    Ok(Scenario {
        name: "hindmarsh-rose",
        simulation: Box::new(circuit),
        observables,
        duration: 2000.0,
    })
}

/// One CGC unit at its steady state for -60 mV, with a pulse of 0.2 over [500, 2500].
pub fn cgc(params: ParameterSet<CgcParameter>) -> Result<Scenario, CPGError> {
    let mut circuit = Circuit::new();
    let model = VavoulisCgc::build(params)?;
    let initial = model.steady_state(-60.0);
    let id = circuit.add_neuron("CGC", NeuronUnit::<VavoulisCgc>::new(model).with_state(initial));
    circuit.add_stimulus(Stimulus::pulse(id, 0.2, TimeInterval::new(500.0, 2500.0)))?;
    let observables = observe_all(&circuit, id)?;
    Ok(Scenario {
        name: "cgc",
        simulation: Box::new(circuit),
        observables,
        duration: 3000.0,
    })
}

/// One Vavoulis unit with a single current step; a negative amplitude depolarizes.
fn single_cell(
    name: &'static str,
    label: &str,
    params: ParameterSet<VavoulisParameter>,
    amplitude: f64,
    window: TimeInterval,
    duration: f64,
) -> Result<Scenario, CPGError> {
    let mut circuit = Circuit::new();
    let id = circuit.add_neuron(label, vavoulis_unit(params)?);
    circuit.add_stimulus(Stimulus::pulse(id, amplitude, window))?;
    let observables = observe_all(&circuit, id)?;
    Ok(Scenario {
        name,
        simulation: Box::new(circuit),
        observables,
        duration,
    })
}

/// An N1M cell depolarized by -10 over [200, 1800].
pub fn n1m(params: ParameterSet<VavoulisParameter>) -> Result<Scenario, CPGError> {
    single_cell("n1m", "N1M", params, -10.0, TimeInterval::new(200.0, 1800.0), 2000.0)
}

/// An N2v cell depolarized by -5 over [300, 2700].
pub fn n2v(params: ParameterSet<VavoulisParameter>) -> Result<Scenario, CPGError> {
    single_cell("n2v", "N2v", params, -5.0, TimeInterval::new(300.0, 2700.0), 3000.0)
}

/// An N3t cell hyperpolarized by 8 over [1000, 1800].
pub fn n3t(params: ParameterSet<VavoulisParameter>) -> Result<Scenario, CPGError> {
    single_cell("n3t", "N3t", params, 8.0, TimeInterval::new(1000.0, 1800.0), 4000.0)
}

/// An SO cell depolarized by -10 over [200, 2800], interrupted by three hyperpolarizing pulses bringing the input to 15.
pub fn so(params: ParameterSet<VavoulisParameter>) -> Result<Scenario, CPGError> {
    let mut circuit = Circuit::new();
    let id = circuit.add_neuron("SO", vavoulis_unit(params)?);
    circuit.add_stimulus(Stimulus::pulse(id, -10.0, TimeInterval::new(200.0, 2800.0)))?;
    circuit.add_stimulus(Stimulus::pulses(
        id,
        25.0,
        vec![
            TimeInterval::new(800.0, 900.0),
            TimeInterval::new(1500.0, 1600.0),
            TimeInterval::new(2200.0, 2300.0),
        ],
    ))?;
    let observables = observe_all(&circuit, id)?;
    Ok(Scenario {
        name: "so",
        simulation: Box::new(circuit),
        observables,
        duration: 3000.0,
    })
}

/// The feeding network under construction, with ids kept for recording.
struct FeedingNetwork {
    circuit: Circuit,
    cells: Vec<(NeuronId, CellType)>,
    synapses: Vec<(SynapseId, String)>,
}

impl FeedingNetwork {
    fn new() -> Self {
        FeedingNetwork {
            circuit: Circuit::new(),
            cells: vec![],
            synapses: vec![],
        }
    }

    fn add_cell(&mut self, label: &str, cell: CellType, drive: f64) -> Result<NeuronId, CPGError> {
        self.add_cell_with(label, Vavoulis::params_for(cell), drive)
    }

    fn add_cell_with(
        &mut self,
        label: &str,
        params: ParameterSet<VavoulisParameter>,
        drive: f64,
    ) -> Result<NeuronId, CPGError> {
        let unit = vavoulis_unit(params)?;
        let cell = unit.model().cell_type();
        let id = self.circuit.add_neuron(label, unit);
        let (start, end) = DRIVE_WINDOW;
        self.circuit
            .add_stimulus(Stimulus::pulse(id, drive, TimeInterval::new(start, end)))?;
        self.cells.push((id, cell));
        Ok(id)
    }

    fn add_synapse(
        &mut self,
        pre: NeuronId,
        post: NeuronId,
        esyn: f64,
        gsyn: f64,
        tau_syn: f64,
    ) -> Result<(), CPGError> {
        let id = self
            .circuit
            .connect(pre, "v", post, "v", feeding_synapse(esyn, gsyn, tau_syn), 1.0)?;
        let label = format!(
            "i_{}_{}",
            self.circuit.label(pre)?,
            self.circuit.label(post)?
        );
        self.synapses.push((id, label));
        Ok(())
    }

    /// Returns the scenario recording the soma and axon voltages, the synaptic currents, then the slow gates.
    fn into_scenario(self, name: &'static str) -> Result<Scenario, CPGError> {
        let circuit = self.circuit;
        let mut observables = vec![];
        for &(id, _) in self.cells.iter() {
            observables.push(circuit.observe_variable(id, "v")?);
            observables.push(circuit.observe_variable(id, "va")?);
        }
        for (id, label) in self.synapses.iter() {
            observables.push(circuit.observe_current(*id, label)?);
        }
        for &(id, cell) in self.cells.iter() {
            let gates: &[&str] = match cell {
                CellType::N2v | CellType::N3t => &["p", "q"],
                CellType::N1M | CellType::SlowOscillator => &["p"],
            };
            for gate in gates {
                observables.push(circuit.observe_variable(id, gate)?);
            }
        }
        Ok(Scenario {
            name,
            simulation: Box::new(circuit),
            observables,
            duration: 10000.0,
        })
    }
}

/// Returns the N2v parameters of the pacemaker, with soma and axon coupled by 8 both ways.
pub fn pacemaker_n2v_params() -> ParameterSet<VavoulisParameter> {
    Vavoulis::params_for(CellType::N2v)
        .with(VavoulisParameter::GEca, 8.0)
        .with(VavoulisParameter::GEcs, 8.0)
}

/// The N1M <-> N2v core pacemaker: slow excitation from N1M to N2v, strong inhibition back.
pub fn pacemaker() -> Result<Scenario, CPGError> {
    let mut network = FeedingNetwork::new();
    let n1m = network.add_cell("N1M", CellType::N1M, -6.0)?;
    let n2v = network.add_cell_with("N2v", pacemaker_n2v_params(), -1.5)?;
    network.add_synapse(n1m, n2v, 0.0, 0.077, 200.0)?;
    network.add_synapse(n2v, n1m, -90.0, 50.0, 50.0)?;
    network.into_scenario("pacemaker")
}

/// The three-phase rhythm: the pacemaker plus N3t, inhibited by N1M and N2v and inhibiting N1M.
pub fn triphasic() -> Result<Scenario, CPGError> {
    let mut network = FeedingNetwork::new();
    let n1m = network.add_cell("N1M", CellType::N1M, -6.0)?;
    let n2v = network.add_cell("N2v", CellType::N2v, -1.0)?;
    let n3t = network.add_cell("N3t", CellType::N3t, -3.0)?;
    network.add_synapse(n1m, n2v, 0.0, 0.077, 200.0)?;
    network.add_synapse(n2v, n1m, -90.0, 50.0, 50.0)?;
    network.add_synapse(n1m, n3t, -90.0, 0.5, 50.0)?;
    network.add_synapse(n3t, n1m, -90.0, 8.0, 50.0)?;
    network.add_synapse(n2v, n3t, -90.0, 2.0, 50.0)?;
    network.into_scenario("triphasic")
}

/// The complete feeding network: the three-phase rhythm plus the SO modulatory interneuron.
pub fn feeding() -> Result<Scenario, CPGError> {
    let mut network = FeedingNetwork::new();
    let n1m = network.add_cell("N1M", CellType::N1M, -6.0)?;
    let n2v = network.add_cell("N2v", CellType::N2v, -2.0)?;
    let n3t = network.add_cell("N3t", CellType::N3t, 0.0)?;
    let so = network.add_cell("SO", CellType::SlowOscillator, -8.5)?;
    network.add_synapse(n1m, n2v, 0.0, 0.077, 200.0)?;
    network.add_synapse(n2v, n1m, -90.0, 50.0, 50.0)?;
    network.add_synapse(n1m, n3t, -90.0, 0.5, 50.0)?;
    network.add_synapse(n3t, n1m, -90.0, 8.0, 50.0)?;
    network.add_synapse(n2v, n3t, -90.0, 2.0, 50.0)?;
    network.add_synapse(n2v, so, -90.0, 8.0, 50.0)?;
    network.add_synapse(so, n1m, 0.0, 4.0, 200.0)?;
    network.add_synapse(so, n2v, 0.0, 1.0, 200.0)?;
    network.into_scenario("feeding")
}

/// Two Hodgkin-Huxley units coupled by a chemical synapse whose current is routed by hand.
///
/// Both units get a tonic drive. The synaptic current is outward positive while a Hodgkin-Huxley unit depolarizes on positive input,
/// so the pair subtracts the current from the input of the second unit where a plain `add_synaptic_input(i)` would turn the inhibitory synapse into an excitatory one.
#[derive(Debug, Clone)]
pub struct HhPair {
    pre: NeuronUnit<HodgkinHuxley>,
    post: NeuronUnit<HodgkinHuxley>,
    synapse: ChemicalSynapse,
    drive: f64,
}

impl HhPair {
    /// Returns the parameters of the inhibitory synapse of the pair.
    pub fn synapse_params() -> ParameterSet<ChemicalParameter> {
        use ChemicalParameter::*;
        ParameterSet::new()
            .with(GFast, 0.015)
            .with(ESyn, -75.0)
            .with(SFast, 0.2)
            .with(VFast, -50.0)
            .with(GSlow, 0.025)
            .with(K1, 1.0)
            .with(K2, 0.03)
            .with(SSlow, 1.0)
    }

    /// Create the pair, the first unit at its steady state for -75 mV and the second one at rest.
    pub fn build(
        params: ParameterSet<HodgkinHuxleyParameter>,
        synapse: ParameterSet<ChemicalParameter>,
        drive: f64,
    ) -> Result<Self, CPGError> {
        let model = HodgkinHuxley::build(params)?;
        let v_rest = model.resting_potential(-100.0, 0.0)?;
        Ok(HhPair {
            pre: NeuronUnit::new(model.clone()).with_state(HodgkinHuxley::steady_state(-75.0)),
            post: NeuronUnit::new(model).with_state(HodgkinHuxley::steady_state(v_rest)),
            synapse: ChemicalSynapse::build(synapse)?,
            drive,
        })
    }

    pub fn pre(&self) -> &NeuronUnit<HodgkinHuxley> {
        &self.pre
    }

    pub fn post(&self) -> &NeuronUnit<HodgkinHuxley> {
        &self.post
    }

    pub fn synapse(&self) -> &ChemicalSynapse {
        &self.synapse
    }

    /// Returns the recorded quantities: both voltages, then the total, fast and slow synaptic currents.
    pub fn observables() -> Vec<Observable> {
        let mut observables = vec![
            Observable::Variable {
                neuron: NeuronId(0),
                index: HodgkinHuxleyVariable::V.index(),
                label: "Vpre".to_string(),
            },
            Observable::Variable {
                neuron: NeuronId(1),
                index: HodgkinHuxleyVariable::V.index(),
                label: "Vpost".to_string(),
            },
        ];
        for variable in [ChemicalVariable::I, ChemicalVariable::IFast, ChemicalVariable::ISlow] {
            observables.push(Observable::SynapseVariable {
                synapse: SynapseId(0),
                index: variable.index(),
                label: variable.name().to_string(),
            });
        }
        observables
    }

    fn unit(&self, id: NeuronId) -> Result<&NeuronUnit<HodgkinHuxley>, CPGError> {
        match id.0 {
            0 => Ok(&self.pre),
            1 => Ok(&self.post),
            _ => Err(CPGError::OutOfBounds(format!("No neuron with id {}", id))),
        }
    }
}

impl Simulation for HhPair {
    fn tick(&mut self, _time: f64, dt: f64) {
        let v_pre = self.pre.get(HodgkinHuxleyVariable::V);
        let v_post = self.post.get(HodgkinHuxleyVariable::V);
        self.synapse.step(dt, v_pre, v_post);

        self.pre.add_synaptic_input(self.drive);
        self.post.add_synaptic_input(self.drive);
        self.post.add_synaptic_input(-self.synapse.current());

        self.pre.step(dt);
        self.post.step(dt);
    }

    fn try_tick(&mut self, time: f64, dt: f64) -> Result<(), CPGError> {
        self.tick(time, dt);
        for (label, unit) in [("pre", &self.pre), ("post", &self.post)] {
            if let Some((variable, value)) = unit.first_non_finite() {
                return Err(CPGError::Divergence {
                    context: format!("{} neuron at t={}", label, time + dt),
                    variable: variable.name(),
                    value,
                });
            }
        }
        Ok(())
    }

    fn observe(&self, observable: &Observable) -> Result<f64, CPGError> {
        match observable {
            Observable::Variable { neuron, index, .. } => {
                let unit = self.unit(*neuron)?;
                if *index >= unit.num_variables() {
                    return Err(CPGError::OutOfBounds(format!(
                        "Neuron {} has no variable {}",
                        neuron, index
                    )));
                }
                Ok(unit.value(*index))
            }
            Observable::SynapseCurrent { synapse, .. } if synapse.0 == 0 => {
                Ok(self.synapse.current())
            }
            Observable::SynapseVariable { synapse, index, .. } if synapse.0 == 0 => {
                let variable = ChemicalVariable::ALL.get(*index).ok_or_else(|| {
                    CPGError::OutOfBounds(format!("Synapse {} has no variable {}", synapse, index))
                })?;
                Ok(self.synapse.get(*variable))
            }
            Observable::SynapseCurrent { synapse, .. }
            | Observable::SynapseVariable { synapse, .. } => Err(CPGError::OutOfBounds(format!(
                "No synapse with id {}",
                synapse
            ))),
        }
    }
}

/// Two Hodgkin-Huxley units with a drive of 0.5 each, the first one inhibiting the second.
pub fn hh_pair(params: ParameterSet<HodgkinHuxleyParameter>) -> Result<Scenario, CPGError> {
    let pair = HhPair::build(params, HhPair::synapse_params(), 0.5)?;
    Ok(Scenario {
        name: "hh-pair",
        simulation: Box::new(pair),
        observables: HhPair::observables(),
        duration: 1000.0,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SimulationConfig;
    use crate::models::vavoulis::VavoulisVariable;
    use crate::simulator::Simulator;
    use crate::trace::TraceWriter;

    fn short_run(mut scenario: Scenario, duration: f64) -> String {
        let simulator = Simulator::build(SimulationConfig {
            duration,
            check_divergence: true,
            record_every: 100,
            ..Default::default()
        })
        .unwrap();
        let mut trace = TraceWriter::new(Vec::new(), &scenario.observables).unwrap();
        simulator
            .run(scenario.simulation.as_mut(), &scenario.observables, &mut trace)
            .unwrap();
        String::from_utf8(trace.into_inner()).unwrap()
    }

    #[test]
    fn test_feeding_header() {
        let scenario = feeding().unwrap();
        assert_eq!(scenario.observables.len(), 22);
        let text = short_run(scenario, 10.0);
        let header = text.lines().next().unwrap();
        assert!(header.starts_with("Time N1M_v N1M_va N2v_v"));
        assert!(header.contains("i_N2v_SO i_SO_N1M i_SO_N2v N1M_p N2v_p N2v_q N3t_p N3t_q SO_p"));
        assert_eq!(text.lines().count(), 1 + 11);
    }

    #[test]
    fn test_single_cell_presets_run() {
        let scenarios = vec![
            hindmarsh_rose(HindmarshRose::default_params()).unwrap(),
            cgc(VavoulisCgc::default_params()).unwrap(),
            n1m(Vavoulis::params_for(CellType::N1M)).unwrap(),
            n2v(Vavoulis::params_for(CellType::N2v)).unwrap(),
            n3t(Vavoulis::params_for(CellType::N3t)).unwrap(),
            so(Vavoulis::params_for(CellType::SlowOscillator)).unwrap(),
            hh_pair(HodgkinHuxley::default_params()).unwrap(),
            pacemaker().unwrap(),
            triphasic().unwrap(),
        ];
        for scenario in scenarios {
            let columns = scenario.observables.len() + 1;
            let text = short_run(scenario, 5.0);
            for line in text.lines().skip(1) {
                assert_eq!(line.split_whitespace().count(), columns);
            }
        }
    }

    #[test]
    fn test_pacemaker_n2v_coupling() {
        let params = pacemaker_n2v_params();
        assert_eq!(params.get(VavoulisParameter::NType), CellType::N2v.code());
        assert_eq!(params.get(VavoulisParameter::GEca), 8.0);
        assert_eq!(params.get(VavoulisParameter::GEcs), 8.0);
    }

    #[test]
    fn test_so_pulses_hyperpolarize() {
        let mut scenario = so(Vavoulis::params_for(CellType::SlowOscillator)).unwrap();
        let v = Observable::Variable {
            neuron: NeuronId(0),
            index: VavoulisVariable::V.index(),
            label: "v".to_string(),
        };
        let dt = 0.01;
        let mut v_min_pulse = f64::INFINITY;
        for k in 0..90_000 {
            let time = k as f64 * dt;
            scenario.simulation.tick(time, dt);
            if time > 850.0 && time < 900.0 {
                v_min_pulse = v_min_pulse.min(scenario.simulation.observe(&v).unwrap());
            }
        }
        // A net input of 15 hyperpolarizes the soma below rest.
        assert!(v_min_pulse < V_REST, "v_min_pulse = {}", v_min_pulse);
    }

    #[test]
    fn test_hh_pair_routes_negated_current() {
        let mut pair =
            HhPair::build(HodgkinHuxley::default_params(), HhPair::synapse_params(), 0.5).unwrap();
        let mut post = pair.post().clone();
        let mut synapse = pair.synapse().clone();

        synapse.step(0.01, -75.0, post.get(HodgkinHuxleyVariable::V));
        post.add_synaptic_input(0.5);
        post.add_synaptic_input(-synapse.current());
        post.step(0.01);

        pair.tick(0.0, 0.01);
        assert_eq!(pair.post().state(), post.state());
    }

    #[test]
    fn test_hh_pair_inhibition_lowers_mean_voltage() {
        let mean_post_voltage = |synapse: ParameterSet<ChemicalParameter>| {
            let mut pair = HhPair::build(HodgkinHuxley::default_params(), synapse, 0.5).unwrap();
            let mut sum = 0.0;
            for k in 0..50_000 {
                pair.tick(k as f64 * 0.01, 0.01);
                sum += pair.post().get(HodgkinHuxleyVariable::V);
            }
            sum / 50_000.0
        };
        let coupled = mean_post_voltage(HhPair::synapse_params());
        let uncoupled = mean_post_voltage(
            HhPair::synapse_params()
                .with(ChemicalParameter::GFast, 0.0)
                .with(ChemicalParameter::GSlow, 0.0),
        );
        assert!(coupled < uncoupled - 1.0, "{} vs {}", coupled, uncoupled);
    }

    #[test]
    fn test_hh_pair_observables() {
        let pair = HhPair::build(HodgkinHuxley::default_params(), HhPair::synapse_params(), 0.5)
            .unwrap();
        let observables = HhPair::observables();
        assert_eq!(pair.observe(&observables[0]).unwrap(), -75.0);
        assert_eq!(pair.observe(&observables[2]).unwrap(), 0.0);
        let foreign = Observable::SynapseCurrent {
            synapse: SynapseId(1),
            label: "i".to_string(),
        };
        assert!(matches!(pair.observe(&foreign), Err(CPGError::OutOfBounds(_))));
    }
}
