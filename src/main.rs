use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use bfvm::instruction::Instruction;
use bfvm::jump::JumpStrategy;
use bfvm::{DEFAULT_CAPACITY, Engine, ExecError, Program, RunStats, State, VmConfig};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "bfvm", about = "A bounds-checked Brainfuck interpreter")]
struct Cli {
    /// Program file. Reads the program from stdin when omitted or `-`.
    program: Option<PathBuf>,

    /// File to feed to `,`. Defaults to stdin.
    #[arg(long, conflicts_with = "no_input")]
    input: Option<PathBuf>,

    /// Run with an empty input stream; every `,` stores 0.
    #[arg(long)]
    no_input: bool,

    /// Maximum program size in bytes.
    #[arg(long, default_value_t = DEFAULT_CAPACITY)]
    capacity: usize,

    /// Number of tape cells.
    #[arg(long, default_value_t = DEFAULT_CAPACITY, value_parser = parse_tape_len)]
    tape_len: usize,

    /// Precompute bracket matches instead of rescanning on every jump.
    #[arg(long)]
    jump_table: bool,

    /// Stop with an error after this many steps.
    #[arg(long)]
    step_limit: Option<u64>,

    /// Print a disassembly of the program and exit without running it.
    #[arg(long)]
    listing: bool,

    /// After the run, print the first N tape cells as hex to stderr.
    #[arg(long, value_name = "N")]
    dump_tape: Option<usize>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// Parse a tape length, which must leave room for at least one cell.
fn parse_tape_len(s: &str) -> Result<usize, String> {
    let n = s
        .parse::<usize>()
        .map_err(|e| format!("Invalid tape length: {e}"))?;
    if n == 0 {
        return Err("Tape length must be positive".to_string());
    }
    Ok(n)
}

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn open(path: Option<&PathBuf>) -> io::Result<Box<dyn Read>> {
    match path {
        Some(p) if p.as_os_str() != "-" => Ok(Box::new(BufReader::new(File::open(p)?))),
        _ => Ok(Box::new(io::stdin().lock())),
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = VmConfig {
        program_capacity: cli.capacity,
        tape_len: cli.tape_len,
        jumps: if cli.jump_table {
            JumpStrategy::Table
        } else {
            JumpStrategy::Rescan
        },
    };

    let source = match open(cli.program.as_ref()) {
        Ok(source) => source,
        Err(e) => {
            eprintln!("cannot open program: {e}");
            return ExitCode::FAILURE;
        }
    };
    let program = match Program::load(source, config.program_capacity) {
        Ok(program) => program,
        Err(e) => {
            eprintln!("{e}");
            return ExitCode::FAILURE;
        }
    };

    if cli.listing {
        print!("{}", program.listing());
        return ExitCode::SUCCESS;
    }

    // With the program on stdin and no --input, `,` shares the drained
    // stream and always sees end-of-stream.
    let input: Box<dyn Read> = if cli.no_input {
        Box::new(io::empty())
    } else {
        match open(cli.input.as_ref()) {
            Ok(input) => input,
            Err(e) => {
                eprintln!("cannot open input: {e}");
                return ExitCode::FAILURE;
            }
        }
    };
    let output = BufWriter::new(io::stdout().lock());

    let mut engine = Engine::new(program, input, output, &config);
    let outcome = match cli.step_limit {
        Some(limit) => run_with_limit(&mut engine, limit),
        None => engine.run().map(Some),
    };

    let dump = cli.dump_tape.map(|count| engine.tape().dump(count));
    let ip = engine.ip();
    // Program output goes out before any diagnostics on stderr.
    let flushed = finish_output(engine);

    if let Some(dump) = dump {
        eprint!("{dump}");
    }
    if let Err(e) = flushed {
        eprintln!("cannot flush output: {e}");
        return ExitCode::FAILURE;
    }

    match outcome {
        Ok(Some(stats)) => {
            report(&stats);
            ExitCode::SUCCESS
        }
        Ok(None) => {
            eprintln!("step limit reached at instruction {ip}");
            ExitCode::from(2)
        }
        Err(e) => {
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}

/// Drive the engine one step at a time, giving up after `limit` steps.
///
/// Returns `Ok(None)` when the budget runs out before the program halts.
fn run_with_limit<R: Read, W: Write>(
    engine: &mut Engine<R, W>,
    limit: u64,
) -> Result<Option<RunStats>, ExecError> {
    for _ in 0..limit {
        if engine.step()? == State::Halted {
            return Ok(Some(engine.stats().clone()));
        }
    }
    // Noticing the end of the program executes nothing, so it is free.
    if engine.ip() >= engine.program().len() && engine.step()? == State::Halted {
        return Ok(Some(engine.stats().clone()));
    }
    Ok(None)
}

/// Flush whatever the program wrote and hand back the output stream.
fn finish_output<R: Read, W: Write>(engine: Engine<R, W>) -> io::Result<W> {
    let (_, mut output) = engine.into_io();
    output.flush()?;
    Ok(output)
}

fn report(stats: &RunStats) {
    info!(
        steps = stats.steps,
        read = stats.bytes_read,
        written = stats.bytes_written,
        max_dp = stats.max_dp,
        noops = stats.noops(),
        "run complete"
    );
    if let Some(instr) = stats.hottest() {
        info!(instruction = %(instr.byte() as char), "most executed");
    }
    for instr in Instruction::ALL {
        info!(
            instruction = %(instr.byte() as char),
            count = stats.count(instr),
            "executed"
        );
    }
}
