//! The `Bus` trait: the sole conduit between the CPU and memory/peripherals.
//!
//! The CPU never touches a raw memory array for program effects; every
//! non-fetch access goes through one of these methods. This generalizes the
//! source's per-target `vm_system.c` build variants into a single trait with
//! one implementation per "system" (see `game_console`).

/// Host input collected since the last `poll_events` call. Keeping this as
/// plain data (rather than a callback) keeps the stepping loop free of any
/// dependency on a concrete windowing crate, matching the spec's framing of
/// the host as an external collaborator with a named interface only.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HostEvents {
    pub quit: bool,
    /// Only meaningful when the CPU is in `step` mode: advance one
    /// instruction.
    pub step_advance: bool,
}

pub trait Bus {
    fn read_byte(&mut self, addr: u16) -> u8;

    /// Two `read_byte` calls at `addr` and `addr.wrapping_add(1)`, combined
    /// little-endian. Implementations should not need to override this.
    fn read_word(&mut self, addr: u16) -> u16 {
        let low = self.read_byte(addr);
        let high = self.read_byte(addr.wrapping_add(1));
        u16::from_le_bytes([low, high])
    }

    fn write_byte(&mut self, addr: u16, value: u8);

    /// Called once per stepping-loop iteration, after the frame's cycle
    /// budget has been consumed. Implementations should rebuild any derived
    /// textures from dirty bits here and then clear those bits.
    fn render_frame(&mut self) {}

    /// Called once per stepping-loop iteration, before cycles are run.
    /// The default implementation reports no events, which is enough for a
    /// headless system used only by tests.
    fn poll_events(&mut self) -> HostEvents {
        HostEvents::default()
    }
}
