//! Game Gear I/O controller
//!
//! Latches the joypad and the handheld-specific registers the CPU sees
//! through the Z80 port space. Port routing itself lives on the machine's
//! bus; this module owns the register values.
//!
//! ## Port Map
//!
//! | Port      | Read                         | Write            |
//! |:----------|:-----------------------------|:-----------------|
//! | 0x00      | START button, region, timing | -                |
//! | 0x01-0x05 | Gear-to-Gear extension       | Extension        |
//! | 0x06      | -                            | PSG stereo       |
//! | 0x7E/0x7F | VDP V/H counter              | PSG              |
//! | 0xBE/0xBF | VDP data/status              | VDP data/control |
//! | 0xDC/0xDD | Joypad                       | -                |

use crate::input::Buttons;

/// Power-on values of the Gear-to-Gear extension registers 0x01-0x05.
const EXT_DEFAULTS: [u8; 5] = [0x7F, 0xFF, 0x00, 0xFF, 0x00];

/// I/O controller state: the joypad plus the Game Gear extension port.
pub struct Io {
    /// Current joypad state, written by the host loop.
    pub buttons: Buttons,
    ext: [u8; 5],
}

impl Io {
    pub fn new() -> Self {
        Self {
            buttons: Buttons::new(),
            ext: EXT_DEFAULTS,
        }
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Port 0x00: bit 7 = START (active low), bit 6 = overseas region.
    pub fn port_00(&self) -> u8 {
        let start = if self.buttons.start { 0 } else { 0x80 };
        start | 0x40
    }

    /// Extension registers 0x01-0x05. No link cable is attached, so reads
    /// return whatever was last written over the power-on defaults.
    pub fn ext_read(&self, port: u8) -> u8 {
        self.ext[(port - 1) as usize]
    }

    pub fn ext_write(&mut self, port: u8, value: u8) {
        self.ext[(port - 1) as usize] = value;
    }

    /// Port 0xDC: player 1 D-pad and buttons, active low.
    pub fn port_dc(&self) -> u8 {
        let b = &self.buttons;
        let mut value = 0xFF;
        if b.up {
            value &= !0x01;
        }
        if b.down {
            value &= !0x02;
        }
        if b.left {
            value &= !0x04;
        }
        if b.right {
            value &= !0x08;
        }
        if b.one {
            value &= !0x10;
        }
        if b.two {
            value &= !0x20;
        }
        value
    }

    /// Port 0xDD: player 2 lines, unconnected on a Game Gear.
    pub fn port_dd(&self) -> u8 {
        0xFF
    }
}

impl Default for Io {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn joypad_reads_active_low() {
        let mut io = Io::new();
        assert_eq!(io.port_dc(), 0xFF);
        io.buttons.set_button("up", true);
        io.buttons.set_button("1", true);
        assert_eq!(io.port_dc(), 0xFF & !0x01 & !0x10);
        io.buttons.clear();
        assert_eq!(io.port_dc(), 0xFF);
    }

    #[test]
    fn start_button_lives_on_port_00() {
        let mut io = Io::new();
        assert_eq!(io.port_00(), 0xC0);
        io.buttons.set_button("start", true);
        assert_eq!(io.port_00(), 0x40);
    }

    #[test]
    fn extension_registers_hold_their_defaults() {
        let io = Io::new();
        assert_eq!(io.ext_read(1), 0x7F);
        assert_eq!(io.ext_read(2), 0xFF);
        assert_eq!(io.ext_read(3), 0x00);
    }

    #[test]
    fn extension_registers_latch_writes() {
        let mut io = Io::new();
        io.ext_write(3, 0xAB);
        assert_eq!(io.ext_read(3), 0xAB);
    }

    #[test]
    fn second_player_port_floats_high() {
        let io = Io::new();
        assert_eq!(io.port_dd(), 0xFF);
    }
}
