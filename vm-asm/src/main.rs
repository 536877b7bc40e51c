//! The assembler CLI: reads a source file, runs the two-pass assembler, and
//! writes the resulting bytes as hex to stdout or to `-o <path>`.

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use vm_core::asm::assemble;
use vm_core::loader::BINARY_LOAD_ADDRESS;

#[derive(Parser)]
#[command(author, version, about = "Assembles a source file into program bytes", long_about = None)]
struct Cli {
    /// Assembly source file.
    source: PathBuf,

    /// Write the assembled bytes here instead of stdout.
    #[arg(short, long, value_name = "PATH")]
    output: Option<PathBuf>,
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(error) => {
            eprintln!("{error}");
            return ExitCode::from(1);
        }
    };

    let text = match fs::read_to_string(&cli.source) {
        Ok(text) => text,
        Err(error) => {
            eprintln!("failed to read '{}': {error}", cli.source.display());
            return ExitCode::from(2);
        }
    };

    let bytes = match assemble(&text) {
        Ok(bytes) => bytes,
        Err(errors) => {
            for error in &errors {
                eprintln!("{}", error.render(&text));
            }
            return ExitCode::from(3);
        }
    };

    // Prefixed with the load address so the output is a valid line for
    // `loader::load_hex` — the same format `vm` expects from a `.hex` file.
    let hex: Vec<String> = bytes.iter().map(|byte| format!("{byte:02X}")).collect();
    let rendered = format!("{BINARY_LOAD_ADDRESS:04X}: {}", hex.join(" "));

    match cli.output {
        Some(path) => {
            if let Err(error) = fs::write(&path, rendered) {
                eprintln!("failed to write '{}': {error}", path.display());
                return ExitCode::from(2);
            }
        }
        None => println!("{rendered}"),
    }

    ExitCode::SUCCESS
}
