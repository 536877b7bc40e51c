//! The `Cpu`: register file and flags (`state`), the two dedicated-page
//! stacks (`stacks`), instruction-stream fetch and operand addressing
//! (`addressing`), shared ALU helpers (`arithmetic`), and the opcode-class
//! dispatch table (`dispatch`). `tick` is the one entry point the stepping
//! loop needs: fetch one opcode, dispatch it, report cycles spent.

pub mod addressing;
pub mod arithmetic;
pub mod dispatch;
pub mod stacks;
pub mod state;

pub use state::Cpu;

use crate::system::bus::Bus;

impl Cpu {
    /// Fetches and executes exactly one instruction, matching the source's
    /// `cpu_cycle`. Returns the number of cycles the instruction consumed.
    /// Does nothing (and returns 0) if the CPU is not `running` — callers
    /// that loop on cycle budgets should check `running` themselves to
    /// avoid spinning.
    pub fn tick(&mut self, bus: &mut dyn Bus) -> u32 {
        if !self.running {
            return 0;
        }
        self.cycle = 0;
        let opcode = addressing::fetch_byte(self, bus);
        dispatch::execute(self, bus, opcode);
        self.cycle
    }
}
