//! The bus the CPU sees: memory accesses go straight to the MMU, port
//! accesses fan out across the VDP, PSG and I/O controller.
//!
//! Port decoding follows the Game Gear's partial address decode: outside
//! the handheld-specific ports 0x00-0x06, only the top two address bits
//! and bit 0 matter.

use crate::io::Io;
use crate::memory::{IoInterface, MemoryInterface, Mmu};
use crate::psg::Psg;
use crate::vdp::Vdp;

/// Borrowed view over the machine's components, built fresh for each CPU
/// step so no component needs a back-reference to the machine.
pub struct GgBus<'a> {
    pub mmu: &'a mut Mmu,
    pub vdp: &'a mut Vdp,
    pub psg: &'a mut Psg,
    pub io: &'a mut Io,
}

impl MemoryInterface for GgBus<'_> {
    fn read_byte(&mut self, addr: u16) -> u8 {
        self.mmu.read_byte(addr)
    }

    fn write_byte(&mut self, addr: u16, value: u8) -> bool {
        self.mmu.write_byte(addr, value)
    }
}

impl IoInterface for GgBus<'_> {
    fn read_port(&mut self, port: u16) -> u8 {
        let port = port as u8;
        match port {
            0x00 => self.io.port_00(),
            0x01..=0x05 => self.io.ext_read(port),
            0x06..=0x3F => 0xFF,
            0x40..=0x7F => {
                if port & 1 == 0 {
                    self.vdp.read_v_counter()
                } else {
                    self.vdp.read_h_counter()
                }
            }
            0x80..=0xBF => {
                if port & 1 == 0 {
                    self.vdp.read_data()
                } else {
                    self.vdp.read_status()
                }
            }
            0xC0..=0xFF => {
                if port & 1 == 0 {
                    self.io.port_dc()
                } else {
                    self.io.port_dd()
                }
            }
        }
    }

    fn write_port(&mut self, port: u16, value: u8) {
        let port = port as u8;
        match port {
            0x00 => {} // START/region register is read-only
            0x01..=0x05 => self.io.ext_write(port, value),
            0x06 => self.psg.write_stereo(value),
            // Memory/io control registers; nothing to do without a BIOS
            0x07..=0x3F => {}
            0x40..=0x7F => self.psg.write(value),
            0x80..=0xBF => {
                if port & 1 == 0 {
                    self.vdp.write_data(value);
                } else {
                    self.vdp.write_control(value);
                }
            }
            0xC0..=0xFF => {}
        }
    }
}
