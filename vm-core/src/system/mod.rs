//! The bus abstraction and its one shipped implementation.
//!
//! `bus` defines the trait the CPU talks to; `game_console` is the concrete
//! memory-mapped system (RAM, tileset, tile-map, controller, sprite) that the
//! `vm` binary wires up by default. A different "system" (a different
//! console, a test harness) only needs to provide another `Bus` impl.

pub mod bus;
pub mod game_console;

pub use bus::{Bus, HostEvents};
pub use game_console::GameConsole;
