//! Branch-class instructions (low nibble 0x1): the full opcode byte selects
//! the condition, and the single operand — a 16-bit absolute target — is
//! always consumed from the instruction stream whether or not the branch is
//! taken.

use crate::cpu::addressing::fetch_word;
use crate::cpu::dispatch::decode_fail;
use crate::cpu::state::Cpu;
use crate::opcodes::{branch, status_flag};
use crate::system::bus::Bus;

pub fn dispatch(cpu: &mut Cpu, bus: &mut dyn Bus, opcode: u8) {
    let taken = match opcode {
        branch::BEQ => cpu.flag(status_flag::ZERO),
        branch::BNE => !cpu.flag(status_flag::ZERO),
        branch::BLT => cpu.flag(status_flag::CARRY),
        branch::BLE => cpu.flag(status_flag::CARRY) || cpu.flag(status_flag::ZERO),
        branch::BGT => !cpu.flag(status_flag::CARRY) && !cpu.flag(status_flag::ZERO),
        branch::BGE => !cpu.flag(status_flag::CARRY) || cpu.flag(status_flag::ZERO),
        _ => {
            decode_fail(cpu, bus, opcode);
            return;
        }
    };
    let target = fetch_word(cpu, bus);
    if taken {
        cpu.pc = target;
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::system::game_console::GameConsole;

    #[test]
    fn test_beq_branches_only_when_zero_set() {
        let mut cpu = Cpu::new();
        cpu.init();
        let mut bus = GameConsole::new();
        bus.memory_mut().write_bytes(cpu.pc, &[0x00, 0x03]);
        let after = cpu.pc.wrapping_add(2);
        dispatch(&mut cpu, &mut bus, branch::BEQ);
        assert_eq!(cpu.pc, after);

        cpu.pc = 0x0200;
        bus.memory_mut().write_bytes(cpu.pc, &[0x00, 0x03]);
        cpu.set_flag(status_flag::ZERO, true);
        dispatch(&mut cpu, &mut bus, branch::BEQ);
        assert_eq!(cpu.pc, 0x0300);
    }

    #[test]
    fn test_bge_is_carry_clear_or_zero() {
        let mut cpu = Cpu::new();
        cpu.init();
        let mut bus = GameConsole::new();
        bus.memory_mut().write_bytes(cpu.pc, &[0x00, 0x04]);
        cpu.set_flag(status_flag::CARRY, true);
        cpu.set_flag(status_flag::ZERO, true);
        dispatch(&mut cpu, &mut bus, branch::BGE);
        assert_eq!(cpu.pc, 0x0400);
    }

    #[test]
    fn test_unknown_branch_opcode_halts() {
        let mut cpu = Cpu::new();
        cpu.init();
        let mut bus = GameConsole::new();
        dispatch(&mut cpu, &mut bus, 0x61);
        assert!(!cpu.running);
    }
}
