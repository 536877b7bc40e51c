//! Instruction-stream fetch helpers and the `SourceMode` operand reader
//! shared by the math/logic dispatch modules.

use crate::cpu::state::Cpu;
use crate::opcodes::SourceMode;
use crate::system::bus::Bus;

/// Reads the byte at `pc`, advances `pc` by one. This is the only access
/// path allowed to bypass the bus's write-side dirty-flag bookkeeping,
/// since fetch is not an observable bus transaction.
pub fn fetch_byte(cpu: &mut Cpu, bus: &mut dyn Bus) -> u8 {
    let value = bus.read_byte(cpu.pc);
    cpu.pc = cpu.pc.wrapping_add(1);
    cpu.cycle += 1;
    value
}

pub fn fetch_word(cpu: &mut Cpu, bus: &mut dyn Bus) -> u16 {
    let low = fetch_byte(cpu, bus);
    let high = fetch_byte(cpu, bus);
    u16::from_le_bytes([low, high])
}

/// Reads operand 2 of a math/logic instruction per its addressing mode,
/// fetching whatever the mode needs from the instruction stream first.
pub fn read_operand(cpu: &mut Cpu, bus: &mut dyn Bus, mode: SourceMode) -> u8 {
    match mode {
        SourceMode::Register => {
            let code = fetch_byte(cpu, bus);
            cpu.get_register(bus, code)
        }
        SourceMode::MemoryDirect => {
            let addr = fetch_word(cpu, bus);
            cpu.cycle += 1;
            bus.read_byte(addr)
        }
        SourceMode::Immediate => fetch_byte(cpu, bus),
        SourceMode::MemoryIndirect => {
            let ptr = fetch_word(cpu, bus);
            let addr = bus.read_word(ptr);
            cpu.cycle += 3;
            bus.read_byte(addr)
        }
    }
}

/// Advances past operand 2's encoded bytes without dereferencing memory or
/// reading a register.
pub fn skip_operand(cpu: &mut Cpu, bus: &mut dyn Bus, mode: SourceMode) {
    for _ in 0..mode.operand_len() {
        fetch_byte(cpu, bus);
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::system::game_console::GameConsole;

    #[test]
    fn test_fetch_word_is_little_endian_and_advances_pc_by_two() {
        let mut cpu = Cpu::new();
        cpu.init();
        let mut bus = GameConsole::new();
        bus.memory_mut().write_bytes(cpu.pc, &[0x34, 0x12]);
        let start = cpu.pc;
        assert_eq!(fetch_word(&mut cpu, &mut bus), 0x1234);
        assert_eq!(cpu.pc, start.wrapping_add(2));
    }

    #[test]
    fn test_skip_operand_advances_pc_without_touching_target_memory() {
        let mut cpu = Cpu::new();
        cpu.init();
        let mut bus = GameConsole::new();
        bus.memory_mut().write_bytes(cpu.pc, &[0x00, 0x05]);
        bus.memory_mut().write_u8(0x0500, 0x77);
        let start = cpu.pc;
        skip_operand(&mut cpu, &mut bus, SourceMode::MemoryDirect);
        assert_eq!(cpu.pc, start.wrapping_add(2));
        // The byte at the would-be dereferenced address is untouched.
        assert_eq!(bus.memory().read_u8(0x0500), 0x77);
    }
}
