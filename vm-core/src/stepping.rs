//! The stepping loop: paces CPU execution against `clock_speed`, drains
//! host events each iteration, and asks the bus to render at most once per
//! iteration. Host-event polling, CPU stepping, and rendering all run on a
//! single thread (see the design doc's concurrency model) — there is
//! nothing here to synchronize.
//!
//! The cycle-budget bookkeeping (`FrameBudget`) is split out from the real
//! time source so it can be driven by hand in tests; `run` wires it up to
//! `std::time::Instant`/`std::thread::sleep` for the CLI.

use std::thread;
use std::time::{Duration, Instant};

use crate::cpu::Cpu;
use crate::system::bus::Bus;

/// Loop target: ~60 Hz, matching the spec's "sleep to cap the loop".
pub const TARGET_FRAME: Duration = Duration::from_nanos(1_000_000_000 / 60);

/// Ceiling on how many cycles can accumulate across a single stall (e.g. the
/// process being suspended, a slow host frame). Without this a long pause
/// would let `cycles_left` grow unbounded and then run thousands of
/// instructions in a single burst once execution resumes.
const MAX_BANKED_CYCLES: f64 = 1_000_000.0;

/// Accumulates elapsed wall-clock time into a cycle budget and spends it
/// running CPU instructions.
#[derive(Debug, Clone, Copy, Default)]
pub struct FrameBudget {
    cycles_left: f64,
}

impl FrameBudget {
    pub fn new() -> FrameBudget {
        FrameBudget { cycles_left: 0.0 }
    }

    /// Converts an elapsed duration into cycles at the CPU's configured
    /// clock speed and adds them to the budget, saturating rather than
    /// letting a long stall bank an unbounded number of cycles.
    pub fn accumulate(&mut self, elapsed: Duration, clock_speed: u32) {
        let cycles = elapsed.as_secs_f64() * clock_speed as f64;
        self.cycles_left = (self.cycles_left + cycles).min(MAX_BANKED_CYCLES);
    }

    /// Runs instructions while the budget holds at least one cycle's worth
    /// and the CPU is still running, subtracting each instruction's actual
    /// cost. When `single_step` is true, runs at most one instruction
    /// regardless of the budget (used when `cpu.step` gates execution on an
    /// explicit host "advance" event) and does not touch the budget.
    pub fn run_cycles(&mut self, cpu: &mut Cpu, bus: &mut dyn Bus, single_step: bool) {
        if single_step {
            if cpu.running {
                cpu.tick(bus);
            }
            return;
        }
        while self.cycles_left >= 1.0 && cpu.running {
            let spent = cpu.tick(bus);
            self.cycles_left -= spent as f64;
        }
    }
}

/// One iteration of the stepping loop: poll events, spend the elapsed time's
/// worth of cycles (gated on a step-advance event when `cpu.step` is set),
/// then render. Returns whether a quit event was observed.
pub fn step_once(
    cpu: &mut Cpu,
    bus: &mut dyn Bus,
    budget: &mut FrameBudget,
    elapsed: Duration,
) -> bool {
    let events = bus.poll_events();
    if cpu.step {
        budget.run_cycles(cpu, bus, events.step_advance);
    } else {
        budget.accumulate(elapsed, cpu.clock_speed);
        budget.run_cycles(cpu, bus, false);
    }
    bus.render_frame();
    events.quit
}

/// Drives the loop to completion (until `cpu.running` goes false or a quit
/// event arrives), sleeping to cap the real loop at `TARGET_FRAME`. This is
/// the entry point the `vm` CLI calls; tests exercise `step_once`/
/// `FrameBudget` directly instead, since they don't want to depend on real
/// wall-clock sleeps.
pub fn run(cpu: &mut Cpu, bus: &mut dyn Bus) {
    let mut budget = FrameBudget::new();
    let mut last = Instant::now();
    while cpu.running {
        let now = Instant::now();
        let elapsed = now.duration_since(last);
        last = now;

        if step_once(cpu, bus, &mut budget, elapsed) {
            break;
        }

        let frame_elapsed = Instant::now().duration_since(now);
        if frame_elapsed < TARGET_FRAME {
            thread::sleep(TARGET_FRAME - frame_elapsed);
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::opcodes::control;
    use crate::system::game_console::GameConsole;

    fn nop_loop(bus: &mut GameConsole, start: u16, count: usize) {
        let nops = vec![control::NOP; count];
        bus.memory_mut().write_bytes(start, &nops);
        bus.memory_mut()
            .write_u8(start.wrapping_add(count as u16), control::END);
    }

    #[test]
    fn test_budget_runs_exactly_the_cycles_it_can_afford() {
        let mut cpu = Cpu::new();
        cpu.init();
        let mut bus = GameConsole::new();
        nop_loop(&mut bus, cpu.pc, 10);

        let mut budget = FrameBudget::new();
        budget.accumulate(Duration::from_secs(1), 3);
        budget.run_cycles(&mut cpu, &mut bus, false);
        // Each nop costs 1 cycle (one fetch); 3 cycles banked -> 3 nops run.
        assert_eq!(cpu.pc, 0x0203);
        assert!(cpu.running);
    }

    #[test]
    fn test_budget_saturates_across_a_long_stall() {
        let mut budget = FrameBudget::new();
        budget.accumulate(Duration::from_secs(1_000_000), 1_000_000_000);
        assert_eq!(budget.cycles_left, MAX_BANKED_CYCLES);
    }

    #[test]
    fn test_step_mode_only_advances_on_explicit_event() {
        let mut cpu = Cpu::new();
        cpu.init();
        cpu.step = true;
        let mut bus = GameConsole::new();
        nop_loop(&mut bus, cpu.pc, 1);

        let mut budget = FrameBudget::new();
        step_once(&mut cpu, &mut bus, &mut budget, Duration::from_millis(16));
        // No step-advance event queued, so pc hasn't moved.
        assert_eq!(cpu.pc, 0x0200);

        bus.request_step_advance();
        step_once(&mut cpu, &mut bus, &mut budget, Duration::from_millis(16));
        assert_eq!(cpu.pc, 0x0201);
    }

    #[test]
    fn test_step_once_reports_quit() {
        let mut cpu = Cpu::new();
        cpu.init();
        let mut bus = GameConsole::new();
        bus.request_quit();
        let mut budget = FrameBudget::new();
        assert!(step_once(&mut cpu, &mut bus, &mut budget, Duration::ZERO));
    }

    #[test]
    fn test_run_halts_on_end_opcode() {
        let mut cpu = Cpu::new();
        cpu.init();
        let mut bus = GameConsole::new();
        bus.memory_mut().write_u8(cpu.pc, control::END);
        run(&mut cpu, &mut bus);
        assert!(!cpu.running);
    }
}
