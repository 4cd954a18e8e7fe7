//! RV32IM core model CLI.
//!
//! This binary runs program images on the core model. It performs:
//! 1. **Run:** Load a hex or ELF image, run until `tohost` is written or the cycle
//!    limit is hit, and report PASS/FAIL/TIMEOUT (exit code 0/1/2).
//! 2. **Decode:** Show the control signals the decoder produces for an instruction word.
//!
//! Logging goes through `tracing`; set `RUST_LOG` (e.g. `RUST_LOG=rv32im_core=debug`)
//! to see trap entries, and combine with `--trace` for per-instruction output.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};
use tracing::error;
use tracing_subscriber::EnvFilter;

use rv32im_core::Simulator;
use rv32im_core::common::SimError;
use rv32im_core::config::Config;
use rv32im_core::core::control::decode;
use rv32im_core::sim::{ImageFormat, RunOutcome};

#[derive(Parser, Debug)]
#[command(
    name = "rv32im-sim",
    author,
    version,
    about = "Cycle-accurate RV32IM core model",
    long_about = "Run RV32IM program images on a cycle-accurate multi-cycle core model.\n\nExamples:\n  rv32im-sim run build/rv32ui-p-add.elf --stats\n  rv32im-sim run firmware.hex --config core.json --tohost 0x80001000\n  rv32im-sim decode 0x02c5d533"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run a program image until it reports through `tohost`.
    Run {
        /// Hex (`$readmemh`) or ELF image.
        image: PathBuf,

        /// JSON configuration file.
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Cycle limit (overrides the configuration).
        #[arg(long)]
        max_cycles: Option<u64>,

        /// Image format.
        #[arg(short, long, value_enum, default_value_t = Format::Auto)]
        format: Format,

        /// Address of `tohost` (hex with 0x prefix or decimal).
        #[arg(long, value_parser = parse_addr)]
        tohost: Option<u32>,

        /// Log every retired instruction (needs `RUST_LOG=debug`).
        #[arg(long)]
        trace: bool,

        /// Print statistics at the end of the run.
        #[arg(long)]
        stats: bool,
    },

    /// Decode an instruction word.
    Decode {
        /// Instruction word (hex with 0x prefix or decimal).
        #[arg(value_parser = parse_addr)]
        word: u32,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Format {
    Hex,
    Elf,
    Auto,
}

impl From<Format> for ImageFormat {
    fn from(f: Format) -> Self {
        match f {
            Format::Hex => Self::Hex,
            Format::Elf => Self::Elf,
            Format::Auto => Self::Auto,
        }
    }
}

fn parse_addr(s: &str) -> Result<u32, String> {
    let parsed = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")).map_or_else(
        || s.parse::<u32>(),
        |hex| u32::from_str_radix(&hex.replace('_', ""), 16),
    );
    parsed.map_err(|e| format!("invalid value '{s}': {e}"))
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Run {
            image,
            config,
            max_cycles,
            format,
            tohost,
            trace,
            stats,
        } => match cmd_run(&image, config.as_deref(), max_cycles, format, tohost, trace, stats) {
            Ok(outcome) => ExitCode::from(outcome.exit_code() as u8),
            Err(e) => {
                error!("{e}");
                eprintln!("error: {e}");
                ExitCode::from(2)
            }
        },
        Commands::Decode { word } => {
            let inst = decode(word);
            println!("{word:#010x}");
            println!("{:#?}", inst.fields);
            println!("{:#?}", inst.ctrl);
            ExitCode::SUCCESS
        }
    }
}

/// Loads the image, runs it and prints the verdict.
fn cmd_run(
    image: &Path,
    config_path: Option<&Path>,
    max_cycles: Option<u64>,
    format: Format,
    tohost: Option<u32>,
    trace: bool,
    stats: bool,
) -> Result<RunOutcome, SimError> {
    let mut config = match config_path {
        Some(path) => Config::from_file(path)?,
        None => Config::default(),
    };
    if let Some(cycles) = max_cycles {
        config.general.max_cycles = cycles;
    }
    config.general.trace_instructions |= trace;

    let mut sim = Simulator::new(&config);
    let info = sim.load_image(image, format.into())?;
    if tohost.is_some() {
        sim.set_tohost(tohost);
        sim.clear_tohost();
    }

    println!("[*] Image: {} ({} bytes)", image.display(), info.bytes_loaded);
    if let Some(addr) = sim.tohost() {
        println!("[*] tohost: {addr:#010x}");
    }

    let outcome = sim.run();
    match outcome {
        RunOutcome::Pass => println!("*** TEST PASSED ***"),
        RunOutcome::Fail(test) => println!("*** TEST FAILED *** (test {test})"),
        RunOutcome::Timeout => println!(
            "*** TIMEOUT *** after {} cycles (pc {:#010x})",
            sim.cpu.cycles(),
            sim.cpu.pc
        ),
    }
    if stats {
        sim.cpu.stats.print();
    }
    Ok(outcome)
}
