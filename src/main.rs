use clap::{Parser, ValueEnum};
use log::LevelFilter;
use log4rs::append::file::FileAppender;
use log4rs::config::{Appender, Config, Root};
use log4rs::encode::pattern::PatternEncoder;
use sha2::{Digest, Sha256};
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use rusty_cpg::config::SimulationConfig;
use rusty_cpg::core::key::Key;
use rusty_cpg::core::params::ParameterSet;
use rusty_cpg::error::CPGError;
use rusty_cpg::models::hindmarsh_rose::HindmarshRose;
use rusty_cpg::models::hodgkin_huxley::HodgkinHuxley;
use rusty_cpg::models::vavoulis::{CellType, Vavoulis};
use rusty_cpg::models::vavoulis_cgc::VavoulisCgc;
use rusty_cpg::presets::{self, Scenario};
use rusty_cpg::simulator::Simulator;
use rusty_cpg::trace::TraceWriter;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Preset {
    HindmarshRose,
    HhPair,
    Cgc,
    N1m,
    N2v,
    N3t,
    So,
    Pacemaker,
    Triphasic,
    Feeding,
}

#[derive(Parser, Debug)]
#[command(version, about = "Simulate small neuron circuits and write their trajectories")]
struct Args {
    /// The scenario to simulate
    #[arg(value_enum)]
    circuit: Preset,
    /// The trace file to write
    output: PathBuf,
    /// The simulated time in ms, defaults to the configuration file or to the scenario
    duration: Option<f64>,
    /// The integration step in ms
    #[arg(long)]
    step: Option<f64>,
    /// A JSON file with the simulation settings
    #[arg(long)]
    config: Option<PathBuf>,
    /// A JSON file overriding model parameters, for the single-model scenarios only
    #[arg(long)]
    params: Option<PathBuf>,
    /// Stop at the first NaN or infinite state variable
    #[arg(long)]
    check_divergence: bool,
    /// The log file, defaults to log/<hash of the arguments>.log
    #[arg(long)]
    log_file: Option<PathBuf>,
    /// The log level
    #[arg(long, default_value = "info")]
    log_level: LevelFilter,
}

fn init_logging(args: &Args) -> Result<(), CPGError> {
    let log_path = match &args.log_file {
        Some(path) => path.clone(),
        None => {
            let mut hasher = Sha256::new();
            hasher.update(format!("{:?}", args));
            PathBuf::from(format!("log/{:x}.log", hasher.finalize()))
        }
    };

    let logfile = FileAppender::builder()
        .encoder(Box::new(PatternEncoder::new("{d} {l} - {m}\n")))
        .build(log_path)
        .map_err(|e| CPGError::IOError(e.to_string()))?;

    let config = Config::builder()
        .appender(Appender::builder().build("logfile", Box::new(logfile)))
        .build(Root::builder().appender("logfile").build(args.log_level))
        .map_err(|e| CPGError::IOError(e.to_string()))?;

    log4rs::init_config(config).map_err(|e| CPGError::IOError(e.to_string()))?;
    Ok(())
}

fn with_overrides<K: Key>(
    params: ParameterSet<K>,
    overrides: Option<&Path>,
) -> Result<ParameterSet<K>, CPGError> {
    match overrides {
        Some(path) => params.merge_from(path),
        None => Ok(params),
    }
}

fn build_scenario(preset: Preset, overrides: Option<&Path>) -> Result<Scenario, CPGError> {
    match preset {
        Preset::HindmarshRose => {
            presets::hindmarsh_rose(with_overrides(HindmarshRose::default_params(), overrides)?)
        }
        Preset::HhPair => presets::hh_pair(with_overrides(HodgkinHuxley::default_params(), overrides)?),
        Preset::Cgc => presets::cgc(with_overrides(VavoulisCgc::default_params(), overrides)?),
        Preset::N1m => presets::n1m(with_overrides(Vavoulis::params_for(CellType::N1M), overrides)?),
        Preset::N2v => presets::n2v(with_overrides(Vavoulis::params_for(CellType::N2v), overrides)?),
        Preset::N3t => presets::n3t(with_overrides(Vavoulis::params_for(CellType::N3t), overrides)?),
        Preset::So => presets::so(with_overrides(
            Vavoulis::params_for(CellType::SlowOscillator),
            overrides,
        )?),
        Preset::Pacemaker | Preset::Triphasic | Preset::Feeding if overrides.is_some() => {
            Err(CPGError::InvalidParameters(format!(
                "Parameter overrides are not supported for the {:?} circuit",
                preset
            )))
        }
        Preset::Pacemaker => presets::pacemaker(),
        Preset::Triphasic => presets::triphasic(),
        Preset::Feeding => presets::feeding(),
    }
}

fn main() -> Result<(), CPGError> {
    let args = Args::parse();
    init_logging(&args)?;
    log::info!("{:?}", args);

    let mut scenario = build_scenario(args.circuit, args.params.as_deref())?;
    log::info!("Scenario {} built", scenario.name);

    let defaults = SimulationConfig {
        duration: scenario.duration,
        ..Default::default()
    };
    let mut config = match &args.config {
        Some(path) => SimulationConfig::load_with_defaults(path, defaults)?,
        None => defaults,
    };
    if let Some(duration) = args.duration {
        config.duration = duration;
    }
    if let Some(step) = args.step {
        config.step = step;
    }
    config.check_divergence |= args.check_divergence;
    let simulator = Simulator::build(config)?;

    let file = File::create(&args.output).map_err(|e| CPGError::IOError(e.to_string()))?;
    let mut trace = TraceWriter::new(BufWriter::new(file), &scenario.observables)?;
    let summary = simulator.run(
        scenario.simulation.as_mut(),
        &scenario.observables,
        &mut trace,
    )?;

    println!(
        "{}: {} ticks simulated up to t={} ms, trace written to {}",
        scenario.name,
        summary.ticks,
        summary.final_time,
        args.output.display()
    );
    Ok(())
}
