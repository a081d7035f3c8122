//! gearling - a Sega Game Gear emulator
//!
//! This library provides the emulation core: a cycle-stepped Z80, the Sega
//! paging MMU, the Game Gear machine that ties them to the peripherals, and
//! the host-integration pieces that drive the whole thing at 60 Hz.

pub mod debugger;
pub mod frontend;
pub mod gamegear;
pub mod input;
pub mod io;
pub mod memory;
pub mod psg;
pub mod rom;
pub mod vdp;
pub mod z80;

pub use gamegear::{GameGear, PowerSwitch};
pub use input::Buttons;
pub use memory::{IoInterface, MemoryInterface, Mmu};
pub use rom::Rom;
pub use z80::Z80;
