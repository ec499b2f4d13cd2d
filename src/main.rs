//! bbp-pi CLI
//!
//! Computes digits of pi with a group of threads or processes.

use bbp_pi::prelude::*;
use clap::{CommandFactory, Parser as ClapParser, ValueEnum};
use std::ffi::OsString;
use std::process;
use std::sync::Arc;
use std::time::Instant;

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
#[cfg_attr(feature = "serde", derive(serde::Serialize), serde(rename_all = "lowercase"))]
enum Mode {
    /// One thread per worker
    Threads,
    /// One OS process per worker
    Processes,
}

#[derive(ClapParser)]
#[command(name = "bbp-pi")]
#[command(about = "Compute digits of pi with the BBP series across a worker group", long_about = None)]
struct Cli {
    /// Number of fractional digits to compute
    #[arg(default_value_t = 100, allow_negative_numbers = true)]
    digits: i64,

    /// Number of workers
    #[arg(short = 'n', long, default_value_t = 1)]
    workers: usize,

    /// How workers are run
    #[arg(long, value_enum, default_value_t = Mode::Threads)]
    mode: Mode,

    /// Print a JSON summary instead of the formatted digits
    #[cfg(feature = "serde")]
    #[arg(long)]
    json: bool,
}

fn main() {
    init_logging();
    let cli = Cli::parse();

    match PipeCommunicator::from_env() {
        Ok(Some(comm)) => process::exit(worker_main(&cli, comm)),
        Ok(None) => {},
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(e.exit_code());
        },
    }

    let config = match ComputeConfig::from_raw_digits(cli.digits) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            eprintln!("{}", Cli::command().render_usage());
            process::exit(e.exit_code());
        },
    };

    if let Err(e) = coordinator_main(&cli, config) {
        eprintln!("Error: {}", e);
        process::exit(e.exit_code());
    }
}

fn init_logging() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Body of a launched worker process. Only the frame goes to stdout.
fn worker_main(cli: &Cli, comm: PipeCommunicator) -> i32 {
    let config = match ComputeConfig::from_raw_digits(cli.digits) {
        Ok(config) => config,
        Err(e) => return e.exit_code(),
    };

    match run_process_worker(comm, config, Arc::new(LoggingEventHandler)) {
        Ok(()) => 0,
        Err(e) => {
            tracing::error!(error = %e, "worker failed");
            e.exit_code()
        },
    }
}

fn coordinator_main(cli: &Cli, config: ComputeConfig) -> ComputeResult<()> {
    WorkerIdentity::coordinator(cli.workers)?;
    let plan = config.plan();
    let events: Arc<dyn EventHandler> = Arc::new(LoggingEventHandler);

    if !json_output(cli) {
        print_header(cli, &plan);
    }

    let started = Instant::now();
    let result = match cli.mode {
        Mode::Threads => run_threaded(config, cli.workers, events)?,
        Mode::Processes => {
            let program = std::env::current_exe().map_err(TransportError::from)?;
            let args: Vec<OsString> = std::env::args_os().skip(1).collect();
            run_processes(config, cli.workers, &program, &args, events)?
        },
    };
    let elapsed = started.elapsed().as_secs_f64();

    if json_output(cli) {
        return print_summary(cli, &result, elapsed);
    }

    println!("result:");
    println!("{}", result.render()?);
    println!();
    println!("elapsed: {:.3} s", elapsed);
    Ok(())
}

fn print_header(cli: &Cli, plan: &PrecisionPlan) {
    println!("=== BBP parallel pi computation ===");
    println!("workers: {}", cli.workers);
    println!("digits: {}", plan.digits);
    println!("terms: {}", plan.term_count);
    println!("working precision: {} bits", plan.working_bits);
    println!();
}

#[cfg(feature = "serde")]
fn json_output(cli: &Cli) -> bool {
    cli.json
}

#[cfg(not(feature = "serde"))]
fn json_output(_cli: &Cli) -> bool {
    false
}

#[cfg(feature = "serde")]
#[derive(serde::Serialize)]
struct RunSummary {
    workers: usize,
    mode: Mode,
    plan: PrecisionPlan,
    digits: String,
    elapsed_seconds: f64,
    finished_at: chrono::DateTime<chrono::Utc>,
}

#[cfg(feature = "serde")]
fn print_summary(cli: &Cli, result: &FinalResult, elapsed: f64) -> ComputeResult<()> {
    let summary = RunSummary {
        workers: result.contributions(),
        mode: cli.mode,
        plan: *result.plan(),
        digits: result.digits()?,
        elapsed_seconds: elapsed,
        finished_at: chrono::Utc::now(),
    };
    let text = serde_json::to_string_pretty(&summary)
        .map_err(|e| TransportError::Io(e.to_string()))?;
    println!("{}", text);
    Ok(())
}

#[cfg(not(feature = "serde"))]
fn print_summary(_cli: &Cli, _result: &FinalResult, _elapsed: f64) -> ComputeResult<()> {
    Ok(())
}
