//! `cmp` (class 0x5) and `and`/`or` (class 0x7): both share the math
//! classes' (register, addressing-mode operand) shape. High nibble >= 8 is
//! reserved for both.

use crate::cpu::addressing::{fetch_byte, read_operand};
use crate::cpu::arithmetic::{and_register, cmp_register, or_register};
use crate::cpu::dispatch::decode_fail;
use crate::cpu::state::Cpu;
use crate::opcodes::SourceMode;
use crate::system::bus::Bus;

fn operand_mode(cpu: &mut Cpu, bus: &mut dyn Bus, opcode: u8) -> Option<SourceMode> {
    let hi = opcode >> 4;
    if hi >= 8 {
        decode_fail(cpu, bus, opcode);
        return None;
    }
    Some(SourceMode::from_bits(hi).expect("hi & 0x3 is always 0..=3"))
}

pub fn dispatch_cmp(cpu: &mut Cpu, bus: &mut dyn Bus, opcode: u8) {
    let Some(mode) = operand_mode(cpu, bus, opcode) else {
        return;
    };
    let reg = fetch_byte(cpu, bus);
    let operand = read_operand(cpu, bus, mode);
    cmp_register(cpu, bus, reg, operand);
}

pub fn dispatch_and_or(cpu: &mut Cpu, bus: &mut dyn Bus, opcode: u8) {
    let hi = opcode >> 4;
    let Some(mode) = operand_mode(cpu, bus, opcode) else {
        return;
    };
    let reg = fetch_byte(cpu, bus);
    let operand = read_operand(cpu, bus, mode);
    if hi < 4 {
        and_register(cpu, bus, reg, operand);
    } else {
        or_register(cpu, bus, reg, operand);
    }
}
