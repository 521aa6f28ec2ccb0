//! eqgen CLI — randomized equivalence-check fixtures.
//!
//! Provides `eqgen comb` for combinational modules and `eqgen fsm` for
//! clocked state machines. Each writes `uut_<idx>.v` plus the `uut_<idx>.ys`
//! and `uut_<idx>_pp.ys` yosys scripts for every index.

#![warn(missing_docs)]

mod comb;
mod fsm;
mod pipeline;
mod report;

use std::process;

use clap::{Parser, Subcommand, ValueEnum};

/// eqgen — random HDL fixtures for equivalence checking.
#[derive(Parser, Debug)]
#[command(name = "eqgen", version, about = "Random equivalence-check fixture generator")]
pub struct Cli {
    /// Suppress all output except errors.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Enable verbose (debug-level) output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to an `eqgen.toml` configuration file.
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// The subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Generate combinational modules and their scripts.
    Comb(GenerateArgs),
    /// Generate state-machine modules and their scripts.
    Fsm(GenerateArgs),
}

/// Arguments shared by both generator subcommands.
#[derive(Parser, Debug)]
pub struct GenerateArgs {
    /// Seed for the random stream (overrides `generate.seed`).
    #[arg(long)]
    pub seed: Option<u64>,

    /// Number of modules to generate (overrides `generate.count`).
    #[arg(short = 'n', long)]
    pub count: Option<usize>,

    /// Output directory (overrides `generate.output_dir`).
    #[arg(short, long)]
    pub out: Option<String>,

    /// Directory prefix written into `read_verilog` (overrides `generate.source_dir`).
    #[arg(long)]
    pub source_dir: Option<String>,

    /// Format of the run report.
    #[arg(short, long, value_enum, default_value_t = ReportFormat::Text)]
    pub format: ReportFormat,
}

/// Run report output format.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    /// Human-readable terminal output.
    Text,
    /// Machine-readable JSON output.
    Json,
}

/// Global settings derived from CLI flags.
pub struct GlobalArgs {
    /// Whether to suppress non-error output.
    pub quiet: bool,
    /// Whether to print verbose/debug information.
    pub verbose: bool,
    /// Optional path to a configuration file.
    pub config: Option<String>,
}

fn main() {
    let cli = Cli::parse();

    init_logging(cli.quiet, cli.verbose);

    let global = GlobalArgs {
        quiet: cli.quiet,
        verbose: cli.verbose,
        config: cli.config,
    };

    let result = match cli.command {
        Command::Comb(ref args) => comb::run(args, &global),
        Command::Fsm(ref args) => fsm::run(args, &global),
    };

    match result {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("error: {e}");
            process::exit(1);
        }
    }
}

/// Installs the `env_logger` backend. `RUST_LOG` takes precedence over the flags.
fn init_logging(quiet: bool, verbose: bool) {
    let level = if quiet {
        "error"
    } else if verbose {
        "debug"
    } else {
        "warn"
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();
}
