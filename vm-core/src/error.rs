//! Error types shared across the crate.
//!
//! The teacher never reaches for `thiserror`/`anyhow`; errors here follow the
//! same hand-rolled `Display` style as `asm.rs`'s `ParseError` and `rom.rs`'s
//! `ROMLoadError`.

use std::fmt;
use std::io;

#[derive(Debug)]
pub enum VmError {
    /// A ROM/hex file could not be opened or read.
    Load(String),
    /// The loaded program's bytes don't fit the declared format.
    Format(String),
}

impl fmt::Display for VmError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VmError::Load(message) => write!(f, "failed to load program: {message}"),
            VmError::Format(message) => write!(f, "malformed program file: {message}"),
        }
    }
}

impl std::error::Error for VmError {}

impl From<io::Error> for VmError {
    fn from(error: io::Error) -> Self {
        VmError::Load(error.to_string())
    }
}
