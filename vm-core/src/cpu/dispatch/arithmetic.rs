//! `add`/`adc` (class 0x3) and `sub`/`sbb` (class 0x4) decode: the first
//! operand is a register, the second follows the high nibble's addressing
//! mode, and bit 2 of the high nibble picks the carry-consuming variant.

use crate::cpu::addressing::{fetch_byte, read_operand};
use crate::cpu::arithmetic::{add_to_register, sub_from_register};
use crate::cpu::state::Cpu;
use crate::log;
use crate::opcodes::SourceMode;
use crate::system::bus::Bus;

fn mode_and_carry(cpu: &mut Cpu, bus: &mut dyn Bus, opcode: u8) -> Option<(SourceMode, bool)> {
    let hi = opcode >> 4;
    if hi >= 8 {
        log::log_decode_error(cpu.pc, opcode);
        cpu.running = false;
        let _ = bus;
        return None;
    }
    Some((SourceMode::from_bits(hi).expect("hi & 0x3 is always 0..=3"), hi >= 4))
}

pub fn dispatch_add(cpu: &mut Cpu, bus: &mut dyn Bus, opcode: u8) {
    let Some((mode, with_carry)) = mode_and_carry(cpu, bus, opcode) else {
        return;
    };
    let reg = fetch_byte(cpu, bus);
    let operand = read_operand(cpu, bus, mode);
    add_to_register(cpu, bus, reg, operand, with_carry);
}

pub fn dispatch_sub(cpu: &mut Cpu, bus: &mut dyn Bus, opcode: u8) {
    let Some((mode, with_carry)) = mode_and_carry(cpu, bus, opcode) else {
        return;
    };
    let reg = fetch_byte(cpu, bus);
    let operand = read_operand(cpu, bus, mode);
    sub_from_register(cpu, bus, reg, operand, with_carry);
}
