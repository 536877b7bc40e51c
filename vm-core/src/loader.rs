//! Fills a `Memory` from a flat binary file or a line-oriented hex file.
//!
//! Out of the "hard parts" this crate focuses on, but the `vm` CLI needs it,
//! so it lives here rather than as a stub. Ported from the original source's
//! `main.c` hex-parsing loop (`read_hex_value`): each line starts with a
//! 1-4 digit load address, optionally `:`-suffixed, followed by
//! space-separated 1-2 digit byte values.

use std::fs;
use std::path::Path;

use crate::error::VmError;
use crate::memory::Memory;

/// `pc`'s reset value; flat binaries load here (see `Cpu::init`).
pub const BINARY_LOAD_ADDRESS: u16 = 0x0200;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgramFormat {
    Binary,
    Hex,
}

/// Guesses the format from the file's extension: `.hex`/`.txt` are treated
/// as hex, everything else as a flat binary. The loader never sniffs file
/// contents — an explicit `--format` flag on the CLI should be preferred
/// when the extension is ambiguous.
pub fn guess_format(path: &Path) -> ProgramFormat {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("hex") || ext.eq_ignore_ascii_case("txt") => {
            ProgramFormat::Hex
        }
        _ => ProgramFormat::Binary,
    }
}

pub fn load_file(memory: &mut Memory, path: &Path) -> Result<(), VmError> {
    match guess_format(path) {
        ProgramFormat::Binary => load_binary_file(memory, path),
        ProgramFormat::Hex => load_hex_file(memory, path),
    }
}

pub fn load_binary_file(memory: &mut Memory, path: &Path) -> Result<(), VmError> {
    let bytes = fs::read(path)?;
    memory.write_bytes(BINARY_LOAD_ADDRESS, &bytes);
    Ok(())
}

pub fn load_hex_file(memory: &mut Memory, path: &Path) -> Result<(), VmError> {
    let text = fs::read_to_string(path)?;
    load_hex(memory, &text)
}

/// Parses hex-format text directly, independent of file I/O, so the format
/// can be unit-tested without a temp file.
pub fn load_hex(memory: &mut Memory, text: &str) -> Result<(), VmError> {
    for (line_number, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        parse_hex_line(memory, line).map_err(|message| {
            VmError::Format(format!("line {}: {message}", line_number + 1))
        })?;
    }
    Ok(())
}

fn parse_hex_line(memory: &mut Memory, line: &str) -> Result<(), String> {
    let mut tokens = line.split_whitespace();
    let address_token = tokens.next().ok_or("missing load address")?;
    let address_token = address_token.strip_suffix(':').unwrap_or(address_token);
    let mut address =
        u16::from_str_radix(address_token, 16).map_err(|_| format!("bad address '{address_token}'"))?;

    for byte_token in tokens {
        let byte = u8::from_str_radix(byte_token, 16)
            .map_err(|_| format!("bad byte '{byte_token}'"))?;
        memory.write_u8(address, byte);
        address = address.wrapping_add(1);
    }
    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_load_hex_accepts_colon_suffixed_and_bare_addresses() {
        let mut memory = Memory::new();
        load_hex(&mut memory, "0200: AA BB CC\n0300 01 02\n").unwrap();
        assert_eq!(memory.read_u8(0x0200), 0xAA);
        assert_eq!(memory.read_u8(0x0201), 0xBB);
        assert_eq!(memory.read_u8(0x0202), 0xCC);
        assert_eq!(memory.read_u8(0x0300), 0x01);
        assert_eq!(memory.read_u8(0x0301), 0x02);
    }

    #[test]
    fn test_load_hex_lines_are_independent_and_order_agnostic() {
        let mut memory_forward = Memory::new();
        load_hex(&mut memory_forward, "0100 11\n0200 22\n").unwrap();

        let mut memory_reversed = Memory::new();
        load_hex(&mut memory_reversed, "0200 22\n0100 11\n").unwrap();

        assert_eq!(memory_forward.read_u8(0x0100), memory_reversed.read_u8(0x0100));
        assert_eq!(memory_forward.read_u8(0x0200), memory_reversed.read_u8(0x0200));
    }

    #[test]
    fn test_load_hex_skips_blank_lines() {
        let mut memory = Memory::new();
        load_hex(&mut memory, "\n0200 AA\n\n").unwrap();
        assert_eq!(memory.read_u8(0x0200), 0xAA);
    }

    #[test]
    fn test_load_hex_rejects_bad_address() {
        let mut memory = Memory::new();
        assert!(load_hex(&mut memory, "zzzz AA\n").is_err());
    }

    #[test]
    fn test_guess_format_from_extension() {
        assert_eq!(guess_format(Path::new("rom.bin")), ProgramFormat::Binary);
        assert_eq!(guess_format(Path::new("rom.hex")), ProgramFormat::Hex);
        assert_eq!(guess_format(Path::new("rom")), ProgramFormat::Binary);
    }
}
