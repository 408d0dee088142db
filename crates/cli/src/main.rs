//! Tomasulo simulator CLI.
//!
//! Loads a trace file, runs the engine in the selected recovery mode to
//! completion, and prints the end-of-run statistics record. Optionally
//! writes the per-cycle event log and per-instruction timing report as
//! TSV files.

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::PathBuf;
use std::process;

use clap::Parser;
use tracing::info;

use tomasulo_core::config::{Mode, SimConfig};
use tomasulo_core::trace::TraceFileSource;
use tomasulo_core::Simulator;

#[derive(Parser, Debug)]
#[command(
    name = "tomasulo-sim",
    author,
    version,
    about = "Cycle-level Tomasulo out-of-order processor simulator",
    long_about = "Runs a trace of decoded instructions through a dynamically-scheduled \
superscalar pipeline and reports end-of-run statistics.\n\n\
Trace format: one instruction per line, `op_code dest_reg src_reg0 src_reg1`, \
with -1 meaning \"no register\". Blank lines and lines starting with # are skipped.\n\n\
Examples:\n  \
tomasulo-sim --trace traces/loop.trc\n  \
tomasulo-sim --trace traces/loop.trc --mode rob --exception-period 50\n  \
tomasulo-sim --trace traces/loop.trc --config run.json --log cycles.tsv --timing timing.tsv"
)]
struct Cli {
    /// Trace file to read instructions from.
    #[arg(short, long)]
    trace: PathBuf,

    /// JSON configuration file (overrides the built-in defaults; CLI flags
    /// below override individual fields on top of it).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Number of result (CDB) buses, R.
    #[arg(long)]
    result_buses: Option<usize>,

    /// Function-unit capacities K0,K1,K2 as a comma-separated triple.
    #[arg(long, value_parser = parse_fu_capacity)]
    fu_capacity: Option<[usize; 3]>,

    /// Fetch width, F.
    #[arg(long)]
    fetch_width: Option<usize>,

    /// Exception period, E (0 disables).
    #[arg(long)]
    exception_period: Option<u64>,

    /// Recovery scheme: baseline, rob, or cpr.
    #[arg(long)]
    mode: Option<CliMode>,

    /// First-checkpoint threshold for CPR mode.
    #[arg(long)]
    checkpoint_interval: Option<u64>,

    /// Write the per-cycle event log (CYCLE/OPERATION/INSTRUCTION) here.
    #[arg(long)]
    log: Option<PathBuf>,

    /// Write the per-instruction timing report here.
    #[arg(long)]
    timing: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
enum CliMode {
    Baseline,
    Rob,
    Cpr,
}

impl From<CliMode> for Mode {
    fn from(value: CliMode) -> Self {
        match value {
            CliMode::Baseline => Mode::Baseline,
            CliMode::Rob => Mode::Rob,
            CliMode::Cpr => Mode::Cpr,
        }
    }
}

fn parse_fu_capacity(raw: &str) -> Result<[usize; 3], String> {
    let parts: Vec<&str> = raw.split(',').collect();
    if parts.len() != 3 {
        return Err(format!("expected K0,K1,K2 (got {raw:?})"));
    }
    let mut out = [0usize; 3];
    for (slot, part) in out.iter_mut().zip(parts) {
        *slot = part
            .trim()
            .parse()
            .map_err(|e| format!("malformed capacity {part:?}: {e}"))?;
    }
    Ok(out)
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let config = build_config(&cli);

    let trace_file = File::open(&cli.trace).unwrap_or_else(|e| {
        eprintln!("error opening trace {}: {}", cli.trace.display(), e);
        process::exit(1);
    });
    let trace = TraceFileSource::new(BufReader::new(trace_file));

    info!(
        mode = ?config.mode,
        result_buses = config.result_buses,
        fetch_width = config.fetch_width,
        "starting run"
    );

    let mut sim = Simulator::new(config, Box::new(trace));
    sim.run();

    let stats = sim.stats();
    let rendered = serde_json::to_string_pretty(&stats)
        .unwrap_or_else(|e| panic!("stats record failed to serialize: {e}"));
    println!("{rendered}");

    if let Some(path) = &cli.log {
        write_log(&path.clone(), &sim);
    }
    if let Some(path) = &cli.timing {
        write_timing(&path.clone(), &sim);
    }
}

fn build_config(cli: &Cli) -> SimConfig {
    let mut config = match &cli.config {
        Some(path) => {
            let text = std::fs::read_to_string(path).unwrap_or_else(|e| {
                eprintln!("error reading config {}: {}", path.display(), e);
                process::exit(1);
            });
            serde_json::from_str(&text).unwrap_or_else(|e| {
                eprintln!("error parsing config {}: {}", path.display(), e);
                process::exit(1);
            })
        }
        None => SimConfig::default(),
    };

    if let Some(v) = cli.result_buses {
        config.result_buses = v;
    }
    if let Some(v) = cli.fu_capacity {
        config.fu_capacity = v;
    }
    if let Some(v) = cli.fetch_width {
        config.fetch_width = v;
    }
    if let Some(v) = cli.exception_period {
        config.exception_period = v;
    }
    if let Some(v) = cli.mode {
        config.mode = v.into();
    }
    if let Some(v) = cli.checkpoint_interval {
        config.checkpoint_interval = v;
    }

    config.validate();
    config
}

fn write_log(path: &PathBuf, sim: &Simulator) {
    let file = File::create(path).unwrap_or_else(|e| {
        eprintln!("error creating log file {}: {}", path.display(), e);
        process::exit(1);
    });
    let mut writer = BufWriter::new(file);
    sim.log().write_tsv(&mut writer).unwrap_or_else(|e| {
        eprintln!("error writing log file {}: {}", path.display(), e);
        process::exit(1);
    });
}

fn write_timing(path: &PathBuf, sim: &Simulator) {
    let file = File::create(path).unwrap_or_else(|e| {
        eprintln!("error creating timing file {}: {}", path.display(), e);
        process::exit(1);
    });
    let mut writer = BufWriter::new(file);
    tomasulo_core::sim::timing::write_tsv(&sim.timing_report(), &mut writer).unwrap_or_else(|e| {
        eprintln!("error writing timing file {}: {}", path.display(), e);
        process::exit(1);
    });
}
