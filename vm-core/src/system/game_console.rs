//! The game-console `Bus` implementation: RAM, tileset, a single tile-map
//! screen, a controller register, and one hardware sprite.
//!
//! Memory map (§6 of the design doc):
//!
//! | Range | Purpose |
//! |---|---|
//! | `0x0000..=0x0FFF` | RAM |
//! | `0xF000..=0xF7FF` | tileset (2 KiB, 4 bits per pixel) |
//! | `0xF800..=0xFA3F` | tile-map screen 1 (32x18 tile indices) |
//! | `0xFCB0` | controller 1 |
//! | `0xFCB2..=0xFCB4` | sprite-0 tile index / X / Y |
//!
//! Everything else is open bus: reads return a fixed sentinel byte and
//! writes are dropped (and logged), matching the original source's
//! non-game-console system fallback.

use crate::controller::Controller;
use crate::log;
use crate::memory::Memory;
use crate::system::bus::{Bus, HostEvents};

pub const RAM_START: u16 = 0x0000;
pub const RAM_END: u16 = 0x0FFF;

pub const TILESET_START: u16 = 0xF000;
pub const TILESET_END: u16 = 0xF7FF;
pub const TILESET_SIZE: usize = (TILESET_END - TILESET_START + 1) as usize;

pub const TILEMAP_START: u16 = 0xF800;
pub const TILEMAP_END: u16 = 0xFA3F;

pub const CONTROLLER_1: u16 = 0xFCB0;
pub const SPRITE_0_TILE: u16 = 0xFCB2;
pub const SPRITE_0_X: u16 = 0xFCB3;
pub const SPRITE_0_Y: u16 = 0xFCB4;

/// Open-bus reads return this byte, matching the original source's
/// non-game-console system fallback (`vm_system.c`'s `return 0xAA`).
pub const OPEN_BUS_BYTE: u8 = 0xAA;

/// Dirty bits the system sets on write and clears when it consumes them
/// during a render pass.
#[derive(Debug, Clone, Copy, Default)]
pub struct DirtyFlags {
    pub tileset: bool,
    pub tilemap: bool,
    pub sprite: bool,
}

pub struct GameConsole {
    memory: Memory,
    pub controller_1: Controller,
    pub dirty: DirtyFlags,
    quit_requested: bool,
    step_advance_requested: bool,
}

impl GameConsole {
    pub fn new() -> GameConsole {
        GameConsole {
            memory: Memory::new(),
            controller_1: Controller::new(),
            dirty: DirtyFlags::default(),
            quit_requested: false,
            step_advance_requested: false,
        }
    }

    pub fn memory(&self) -> &Memory {
        &self.memory
    }

    pub fn memory_mut(&mut self) -> &mut Memory {
        &mut self.memory
    }

    pub fn request_quit(&mut self) {
        self.quit_requested = true;
    }

    pub fn request_step_advance(&mut self) {
        self.step_advance_requested = true;
    }

    pub fn tileset(&self) -> &[u8] {
        &self.memory.as_slice()[TILESET_START as usize..=TILESET_END as usize]
    }

    fn is_writable(&self, addr: u16) -> bool {
        (RAM_START..=RAM_END).contains(&addr)
            || (TILESET_START..=TILESET_END).contains(&addr)
            || (TILEMAP_START..=TILEMAP_END).contains(&addr)
            || addr == CONTROLLER_1
            || addr == SPRITE_0_TILE
            || addr == SPRITE_0_X
            || addr == SPRITE_0_Y
    }
}

impl Bus for GameConsole {
    fn read_byte(&mut self, addr: u16) -> u8 {
        if addr == CONTROLLER_1 {
            return self.controller_1.byte();
        }
        if self.is_writable(addr) {
            return self.memory.read_u8(addr);
        }
        OPEN_BUS_BYTE
    }

    fn write_byte(&mut self, addr: u16, value: u8) {
        if addr == CONTROLLER_1 {
            // The controller register is host-driven; program writes to it
            // are accepted but have no further effect beyond RAM storage so
            // that a program polling its own last-written value still sees
            // something sane.
            self.memory.write_u8(addr, value);
            return;
        }

        if !self.is_writable(addr) {
            log::log_open_bus_write(addr, value);
            return;
        }

        self.memory.write_u8(addr, value);

        if (TILESET_START..=TILESET_END).contains(&addr) {
            self.dirty.tileset = true;
        } else if (TILEMAP_START..=TILEMAP_END).contains(&addr) {
            self.dirty.tilemap = true;
        } else if addr == SPRITE_0_TILE || addr == SPRITE_0_X || addr == SPRITE_0_Y {
            self.dirty.sprite = true;
        }
    }

    fn render_frame(&mut self) {
        self.dirty = DirtyFlags::default();
    }

    fn poll_events(&mut self) -> HostEvents {
        let events = HostEvents {
            quit: self.quit_requested,
            step_advance: self.step_advance_requested,
        };
        self.quit_requested = false;
        self.step_advance_requested = false;
        events
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_open_bus_read_returns_sentinel() {
        let mut console = GameConsole::new();
        // 0xFB00 falls after the tile-map and before the controller byte.
        assert_eq!(console.read_byte(0xFB00), OPEN_BUS_BYTE);
    }

    #[test]
    fn test_open_bus_write_is_silently_dropped() {
        let mut console = GameConsole::new();
        console.write_byte(0xFB00, 0x42);
        assert_eq!(console.read_byte(0xFB00), OPEN_BUS_BYTE);
    }

    #[test]
    fn test_tileset_write_sets_dirty_bit_until_next_render() {
        let mut console = GameConsole::new();
        console.write_byte(TILESET_START, 0x01);
        assert!(console.dirty.tileset);
        console.render_frame();
        assert!(!console.dirty.tileset);

        // A second frame with no further writes stays clean.
        console.render_frame();
        assert!(!console.dirty.tileset);
    }

    #[test]
    fn test_ram_round_trips() {
        let mut console = GameConsole::new();
        console.write_byte(0x0123, 0x99);
        assert_eq!(console.read_byte(0x0123), 0x99);
    }

    #[test]
    fn test_controller_byte_reflects_controller_state() {
        use crate::controller::Button;
        let mut console = GameConsole::new();
        console.controller_1.set_pressed(Button::A, true);
        console.controller_1.set_pressed(Button::Up, true);
        assert_eq!(console.read_byte(CONTROLLER_1), 0b0001_0001);
    }
}
