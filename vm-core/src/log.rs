//! A minimal append-only file logger.
//!
//! The CPU's decoder and the bus's open-bus writes both want to leave a trail
//! without fighting the borrow checker over a `&mut` logger handle threaded
//! through every call site, so this mirrors the file-backed, open-and-append
//! approach rather than pulling in a logging crate/facade.

use std::fs::{self, OpenOptions};
use std::io::Write;

const LOG_FILE: &str = "vm.log";

pub fn init_log() {
    match fs::File::create(LOG_FILE) {
        Ok(_) => {}
        // The file may already exist from a prior run; that's fine.
        Err(_) => {}
    };
}

/// Append a single line to the log file. Failures to log are swallowed:
/// logging must never be the reason the VM crashes.
pub fn log(text: &str) {
    let file = OpenOptions::new().create(true).append(true).open(LOG_FILE);

    if let Ok(mut file) = file {
        let _ = file.write_all(text.as_bytes());
        let _ = file.write_all(b"\n");
    }
}

pub fn log_decode_error(pc: u16, opcode: u8) {
    log(&format!("${pc:04X}: unknown opcode ${opcode:02X}"));
}

pub fn log_open_bus_write(addr: u16, value: u8) {
    log(&format!("${addr:04X}: write ${value:02X} to open bus ignored"));
}
