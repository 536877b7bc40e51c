//! Control-class instructions: the full opcode byte (not just the low
//! nibble) selects the variant, since `dbg`/`end` don't share the low
//! nibble of `nop`/`jmp`/etc.

use crate::cpu::addressing::fetch_word;
use crate::cpu::state::Cpu;
use crate::cpu::{arithmetic, stacks};
use crate::log;
use crate::opcodes::control;
use crate::system::bus::Bus;

pub fn dispatch(cpu: &mut Cpu, bus: &mut dyn Bus, opcode: u8) {
    match opcode {
        control::NOP => {}
        control::JMP => {
            let target = fetch_word(cpu, bus);
            cpu.pc = target;
        }
        control::INC => {
            let reg = crate::cpu::addressing::fetch_byte(cpu, bus);
            arithmetic::add_to_register(cpu, bus, reg, 1, false);
        }
        control::DEC => {
            let reg = crate::cpu::addressing::fetch_byte(cpu, bus);
            arithmetic::sub_from_register(cpu, bus, reg, 1, false);
        }
        control::CLC => {
            cpu.set_flag(crate::opcodes::status_flag::CARRY, false);
        }
        control::SEC => {
            cpu.set_flag(crate::opcodes::status_flag::CARRY, true);
        }
        control::NOT => {
            let reg = crate::cpu::addressing::fetch_byte(cpu, bus);
            arithmetic::not_register(cpu, bus, reg);
        }
        control::JSR => {
            let return_addr = cpu.pc.wrapping_add(2);
            let target = fetch_word(cpu, bus);
            stacks::push_address(cpu, bus, return_addr);
            cpu.pc = target;
        }
        control::RET => {
            cpu.pc = stacks::pop_address(cpu, bus);
        }
        control::DBG => {
            if !cpu.debug {
                log::log(&format!(
                    "${:04X}: dbg pc=${:04X} st=${:02X} x=${:04X} y=${:04X}",
                    cpu.pc.wrapping_sub(1),
                    cpu.pc,
                    cpu.status(),
                    cpu.x(),
                    cpu.y()
                ));
            }
        }
        control::END => {
            cpu.running = false;
        }
        _ => super::decode_fail(cpu, bus, opcode),
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::system::game_console::GameConsole;

    #[test]
    fn test_clc_sec_toggle_carry() {
        let mut cpu = Cpu::new();
        cpu.init();
        let mut bus = GameConsole::new();
        dispatch(&mut cpu, &mut bus, control::SEC);
        assert!(cpu.flag(crate::opcodes::status_flag::CARRY));
        dispatch(&mut cpu, &mut bus, control::CLC);
        assert!(!cpu.flag(crate::opcodes::status_flag::CARRY));
    }

    #[test]
    fn test_end_halts() {
        let mut cpu = Cpu::new();
        cpu.init();
        let mut bus = GameConsole::new();
        dispatch(&mut cpu, &mut bus, control::END);
        assert!(!cpu.running);
    }

    #[test]
    fn test_jsr_then_ret_restores_pc_after_the_call_site() {
        let mut cpu = Cpu::new();
        cpu.init();
        let mut bus = GameConsole::new();
        let call_site = cpu.pc;
        bus.memory_mut().write_bytes(cpu.pc, &[0x10, 0x02]); // target 0x0210
        dispatch(&mut cpu, &mut bus, control::JSR);
        assert_eq!(cpu.pc, 0x0210);
        assert_eq!(cpu.as_ptr(), 0xFD);
        dispatch(&mut cpu, &mut bus, control::RET);
        assert_eq!(cpu.pc, call_site.wrapping_add(2));
        assert_eq!(cpu.as_ptr(), 0xFF);
    }
}
