//! Analog Bench - virtual test bench from the command line
//!
//! Drives a circuit board from a function generator and writes one period
//! trace of a chosen output to stdout.
//!
//! # Usage
//!
//! ```bash
//! analog-bench --circuit resonant -r 100 -c 100 -l 10 --frequency 5000 > trace.csv
//! analog-bench --waveform square --numeric --format f32le | ffplay -f f32le -ac 1 -ar 48000 -
//! ```

use std::io;

use analog_bench::{
    error::{BenchError, Result},
    signal::{FunctionGenerator, Waveform},
    solver::{PointBudget, SolverConfig, DEFAULT_POINTS, DEFAULT_RELAXATION_PASSES},
    trace::{write_trace, TraceFormat},
    Bench,
};
use clap::{Parser, ValueEnum};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum CircuitKind {
    /// Series R-L-C
    Resonant,
    /// Series R-C
    Rc,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputKind {
    Resistor,
    Capacitor,
}

fn parse_waveform(s: &str) -> std::result::Result<Waveform, String> {
    Waveform::from_str(s).ok_or_else(|| format!("unknown waveform '{s}'"))
}

fn parse_format(s: &str) -> std::result::Result<TraceFormat, String> {
    TraceFormat::from_str(s).ok_or_else(|| format!("unknown trace format '{s}'"))
}

/// Virtual analog test bench
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Circuit board under test
    #[arg(long, value_enum, default_value_t = CircuitKind::Resonant)]
    circuit: CircuitKind,

    /// Resistor in ohms
    #[arg(short = 'r', long, default_value_t = 100.0)]
    resistance: f64,

    /// Capacitor in nanofarads
    #[arg(short = 'c', long, default_value_t = 100.0)]
    capacitance: f64,

    /// Inductor in millihenries (resonant circuit only)
    #[arg(short = 'l', long, default_value_t = 10.0)]
    inductance: f64,

    /// Generator waveform (sine, square, triangle, sawtooth)
    #[arg(short, long, value_parser = parse_waveform, default_value = "sine")]
    waveform: Waveform,

    /// Generator frequency in Hz
    #[arg(short, long, default_value_t = 1000.0)]
    frequency: f64,

    /// Generator peak amplitude in volts
    #[arg(short, long, default_value_t = 1.0)]
    amplitude: f64,

    /// Generator DC offset in volts
    #[arg(long, default_value_t = 0.0)]
    offset: f64,

    /// Force the numeric solver even for sine input
    #[arg(long)]
    numeric: bool,

    /// Relaxation passes for the numeric solver
    #[arg(long, default_value_t = DEFAULT_RELAXATION_PASSES)]
    passes: usize,

    /// Lower bound on integration points per period
    #[arg(long, default_value_t = DEFAULT_POINTS)]
    min_points: usize,

    /// Upper bound on integration points per period
    #[arg(long, default_value_t = DEFAULT_POINTS)]
    max_points: usize,

    /// Output to trace
    #[arg(short, long, value_enum, default_value_t = OutputKind::Resistor)]
    output: OutputKind,

    /// Trace points written
    #[arg(long, default_value_t = 1000)]
    samples: usize,

    /// Periods of the output covered by the trace
    #[arg(long, default_value_t = 1.0)]
    periods: f64,

    /// Trace encoding (csv, f32le)
    #[arg(long, value_parser = parse_format, default_value = "csv")]
    format: TraceFormat,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // stdout carries the trace, so logs go to stderr
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    // Wire the bench
    let mut bench = Bench::new();
    let generator = bench.add_provider("generator");
    let debug = bench.add_switch("debug", args.numeric);
    let model = match args.circuit {
        CircuitKind::Resonant => bench.add_resonant_circuit("rlc", generator)?,
        CircuitKind::Rc => bench.add_rc_circuit("rc", generator)?,
    };

    let budget = if args.min_points == args.max_points {
        PointBudget::fixed(args.min_points)
    } else {
        PointBudget::adaptive(args.min_points, args.max_points)
    };
    let config = SolverConfig::new()
        .with_relaxation_passes(args.passes)
        .with_point_budget(budget);

    // Set the board up
    bench.batch(|b| {
        b.set_resistor(model, args.resistance)?;
        b.set_capacitor(model, args.capacitance)?;
        if args.circuit == CircuitKind::Resonant {
            b.set_inductor(model, args.inductance)?;
        }
        b.set_solver_config(model, config)?;
        b.set_debug_switch(model, debug)
    })?;

    // Switch the generator on
    let drive = FunctionGenerator::new()
        .with_waveform(args.waveform)
        .with_amplitude(args.amplitude)
        .with_frequency(args.frequency)
        .with_offset(args.offset)
        .signal()?;
    bench.set_signal(generator, drive)?;

    let board = bench.model(model)?;
    let output = match args.output {
        OutputKind::Resistor => board.resistor_voltage(),
        OutputKind::Capacitor => board
            .capacitor_voltage()
            .ok_or_else(|| BenchError::unsupported(board.name(), "capacitor voltage output"))?,
    };
    let trace = bench
        .signal(output)?
        .ok_or_else(|| BenchError::degenerate(board.name(), "no output was published"))?;

    let fundamental = trace.fundamental();
    info!(
        output = bench.provider(output)?.name(),
        amplitude = fundamental.amplitude,
        phase = fundamental.phase,
        "output fundamental"
    );

    write_trace(io::stdout().lock(), args.format, &trace, args.samples, args.periods)?;

    Ok(())
}
