//! The emulator CLI: loads a binary or hex program, wires it up to a
//! headless `GameConsole`, and drives the stepping loop to completion.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use vm_core::{loader, log, stepping, Cpu, GameConsole};

#[derive(Parser)]
#[command(author, version, about = "Runs a program on the retro-VM", long_about = None)]
struct Cli {
    /// Binary or hex program to load at reset.
    program: PathBuf,

    /// Start the CPU in debug mode (dbg opcodes log their state).
    #[arg(long)]
    debug: bool,

    /// Start the CPU in step mode (one instruction per host advance event).
    #[arg(long)]
    step: bool,

    /// Override the default clock speed, in Hz.
    #[arg(long, value_name = "HZ")]
    clock_speed: Option<u32>,
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(error) => {
            eprintln!("{error}");
            return ExitCode::from(1);
        }
    };

    log::init_log();

    let mut console = GameConsole::new();
    if let Err(error) = loader::load_file(console.memory_mut(), &cli.program) {
        eprintln!("failed to load '{}': {error}", cli.program.display());
        return ExitCode::from(2);
    }

    let mut cpu = Cpu::new();
    cpu.init();
    cpu.debug = cli.debug;
    cpu.step = cli.step;
    if let Some(clock_speed) = cli.clock_speed {
        cpu.clock_speed = clock_speed;
    }

    stepping::run(&mut cpu, &mut console);

    ExitCode::SUCCESS
}
