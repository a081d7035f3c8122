//! ED prefix page: extended loads, 16-bit carry arithmetic, block
//! transfer/compare/I/O, and interrupt control.
//!
//! The unused quadrants of this page (x = 0 and x = 3, plus the holes in
//! x = 2) have no defined behavior; hitting one records an exception and
//! stops the CPU rather than guessing.

use super::{flags, Bus, Z80};

impl Z80 {
    fn adc_hl(&mut self, rhs: u16) {
        let hl = self.hl() as u32;
        let rp = rhs as u32;
        let c = self.get_flag(flags::CARRY) as u32;
        let result = hl + rp + c;

        self.set_flag(flags::CARRY, result > 0xFFFF);
        self.set_flag(flags::ADD_SUB, false);
        self.set_flag(flags::ZERO, result & 0xFFFF == 0);
        self.set_flag(flags::SIGN, result & 0x8000 != 0);
        self.set_flag(flags::HALF_CARRY, (hl & 0x0FFF) + (rp & 0x0FFF) + c > 0x0FFF);
        self.set_flag(flags::PARITY, !(hl ^ rp) & (hl ^ result) & 0x8000 != 0);

        let high = (result >> 8) as u8;
        self.set_flag(flags::X_FLAG, high & 0x08 != 0);
        self.set_flag(flags::Y_FLAG, high & 0x20 != 0);

        self.memptr = (hl as u16).wrapping_add(1);
        self.set_hl(result as u16);
    }

    fn sbc_hl(&mut self, rhs: u16) {
        let hl = self.hl() as u32;
        let rp = rhs as u32;
        let c = self.get_flag(flags::CARRY) as u32;
        let result = hl.wrapping_sub(rp).wrapping_sub(c);

        self.set_flag(flags::CARRY, result > 0xFFFF);
        self.set_flag(flags::ADD_SUB, true);
        self.set_flag(flags::ZERO, result & 0xFFFF == 0);
        self.set_flag(flags::SIGN, result & 0x8000 != 0);
        let half = (hl & 0x0FFF).wrapping_sub(rp & 0x0FFF).wrapping_sub(c);
        self.set_flag(flags::HALF_CARRY, half > 0x0FFF);
        self.set_flag(flags::PARITY, (hl ^ rp) & (hl ^ result) & 0x8000 != 0);

        let high = (result >> 8) as u8;
        self.set_flag(flags::X_FLAG, high & 0x08 != 0);
        self.set_flag(flags::Y_FLAG, high & 0x20 != 0);

        self.memptr = (hl as u16).wrapping_add(1);
        self.set_hl(result as u16);
    }

    pub(super) fn execute_ed_prefix<B: Bus>(&mut self, bus: &mut B, pc_before: u16) -> u32 {
        let opcode = self.fetch_byte(bus);
        let x = (opcode >> 6) & 0x03;
        let y = (opcode >> 3) & 0x07;
        let z = opcode & 0x07;
        let p = (y >> 1) & 0x03;
        let q = y & 0x01;

        match x {
            1 => self.execute_ed_x1(bus, opcode, y, z, p, q, pc_before),
            2 if y >= 4 && z <= 3 => match z {
                0 => self.execute_ldi_ldd(bus, y),
                1 => self.execute_cpi_cpd(bus, y),
                2 => self.execute_ini_ind(bus, y),
                3 => self.execute_outi_outd(bus, y),
                _ => unreachable!(),
            },
            _ => {
                self.set_exception(opcode, pc_before);
                8
            }
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn execute_ed_x1<B: Bus>(
        &mut self,
        bus: &mut B,
        opcode: u8,
        y: u8,
        z: u8,
        p: u8,
        q: u8,
        pc_before: u16,
    ) -> u32 {
        match z {
            0 => {
                // IN r, (C); y = 6 is the undocumented flags-only form
                let port = self.bc();
                let val = bus.read_port(port);
                if y != 6 {
                    self.set_reg(bus, y, val);
                }
                self.set_szxy_flags(val);
                self.set_parity_flag(val);
                self.set_flag(flags::HALF_CARRY, false);
                self.set_flag(flags::ADD_SUB, false);
                self.memptr = port.wrapping_add(1);
                12
            }
            1 => {
                // OUT (C), r; y = 6 is the undocumented OUT (C), 0
                let port = self.bc();
                let val = if y == 6 { 0 } else { self.get_reg(bus, y) };
                bus.write_port(port, val);
                self.memptr = port.wrapping_add(1);
                12
            }
            2 => {
                let rp = self.get_rp(p);
                if q == 0 {
                    self.sbc_hl(rp);
                } else {
                    self.adc_hl(rp);
                }
                15
            }
            3 => {
                let nn = self.fetch_word(bus);
                if q == 0 {
                    // LD (nn), rp
                    bus.write_word(nn, self.get_rp(p));
                } else {
                    // LD rp, (nn)
                    let val = bus.read_word(nn);
                    self.set_rp(p, val);
                }
                self.memptr = nn.wrapping_add(1);
                20
            }
            4 => {
                // NEG (officially ED 44; the other y values are mirrors)
                let a = self.a;
                self.a = 0;
                self.sub_a(a, false, true);
                8
            }
            5 => {
                if q == 0 {
                    // RETN restores IFF1 from IFF2
                    self.iff1 = self.iff2;
                    self.pc = self.pop(bus);
                } else {
                    // RETI
                    self.pc = self.pop(bus);
                }
                self.memptr = self.pc;
                14
            }
            6 => {
                // IM 0/1/2
                self.im = match y & 0x03 {
                    0 | 1 => 0,
                    2 => 1,
                    3 => 2,
                    _ => unreachable!(),
                };
                8
            }
            7 => match y {
                0 => {
                    // LD I, A
                    self.i = self.a;
                    9
                }
                1 => {
                    // LD R, A
                    self.r = self.a;
                    9
                }
                2 => {
                    // LD A, I
                    self.a = self.i;
                    self.set_szxy_flags(self.a);
                    self.set_flag(flags::PARITY, self.iff2);
                    self.set_flag(flags::HALF_CARRY, false);
                    self.set_flag(flags::ADD_SUB, false);
                    9
                }
                3 => {
                    // LD A, R
                    self.a = self.r;
                    self.set_szxy_flags(self.a);
                    self.set_flag(flags::PARITY, self.iff2);
                    self.set_flag(flags::HALF_CARRY, false);
                    self.set_flag(flags::ADD_SUB, false);
                    9
                }
                4 => {
                    // RRD
                    let hl = self.hl();
                    let m = bus.read_byte(hl);
                    bus.write_byte(hl, (self.a << 4) | (m >> 4));
                    self.a = (self.a & 0xF0) | (m & 0x0F);
                    self.set_szxy_flags(self.a);
                    self.set_parity_flag(self.a);
                    self.set_flag(flags::HALF_CARRY, false);
                    self.set_flag(flags::ADD_SUB, false);
                    self.memptr = hl.wrapping_add(1);
                    18
                }
                5 => {
                    // RLD
                    let hl = self.hl();
                    let m = bus.read_byte(hl);
                    bus.write_byte(hl, (m << 4) | (self.a & 0x0F));
                    self.a = (self.a & 0xF0) | (m >> 4);
                    self.set_szxy_flags(self.a);
                    self.set_parity_flag(self.a);
                    self.set_flag(flags::HALF_CARRY, false);
                    self.set_flag(flags::ADD_SUB, false);
                    self.memptr = hl.wrapping_add(1);
                    18
                }
                _ => {
                    self.set_exception(opcode, pc_before);
                    8
                }
            },
            _ => unreachable!(),
        }
    }

    // ========== Block transfer/compare/I/O ==========

    /// LDI (y=4), LDD (y=5), LDIR (y=6), LDDR (y=7).
    fn execute_ldi_ldd<B: Bus>(&mut self, bus: &mut B, y: u8) -> u32 {
        let hl = self.hl();
        let de = self.de();
        let val = bus.read_byte(hl);
        bus.write_byte(de, val);

        let bc = self.bc().wrapping_sub(1);
        self.set_bc(bc);

        let (new_hl, new_de) = if y & 1 == 0 {
            (hl.wrapping_add(1), de.wrapping_add(1))
        } else {
            (hl.wrapping_sub(1), de.wrapping_sub(1))
        };
        self.set_hl(new_hl);
        self.set_de(new_de);

        // X/Y come from val + A (bits 3 and 1)
        let n = val.wrapping_add(self.a);
        self.set_flag(flags::Y_FLAG, n & 0x02 != 0);
        self.set_flag(flags::X_FLAG, n & 0x08 != 0);
        self.set_flag(flags::PARITY, bc != 0);
        self.set_flag(flags::HALF_CARRY, false);
        self.set_flag(flags::ADD_SUB, false);

        if y >= 6 && bc != 0 {
            self.pc = self.pc.wrapping_sub(2);
            self.memptr = self.pc.wrapping_add(1);
            21
        } else {
            16
        }
    }

    /// CPI (y=4), CPD (y=5), CPIR (y=6), CPDR (y=7).
    fn execute_cpi_cpd<B: Bus>(&mut self, bus: &mut B, y: u8) -> u32 {
        let hl = self.hl();
        let val = bus.read_byte(hl);
        let result = self.a.wrapping_sub(val);

        let bc = self.bc().wrapping_sub(1);
        self.set_bc(bc);

        if y & 1 == 0 {
            self.set_hl(hl.wrapping_add(1));
            self.memptr = self.memptr.wrapping_add(1);
        } else {
            self.set_hl(hl.wrapping_sub(1));
            self.memptr = self.memptr.wrapping_sub(1);
        }

        let half = self.a & 0x0F < val & 0x0F;
        self.set_flag(flags::ZERO, result == 0);
        self.set_flag(flags::SIGN, result & 0x80 != 0);
        self.set_flag(flags::HALF_CARRY, half);
        self.set_flag(flags::PARITY, bc != 0);
        self.set_flag(flags::ADD_SUB, true);

        // X/Y come from A - val - H (bits 3 and 1)
        let n = result.wrapping_sub(half as u8);
        self.set_flag(flags::Y_FLAG, n & 0x02 != 0);
        self.set_flag(flags::X_FLAG, n & 0x08 != 0);

        if y >= 6 && bc != 0 && result != 0 {
            self.pc = self.pc.wrapping_sub(2);
            self.memptr = self.pc.wrapping_add(1);
            21
        } else {
            16
        }
    }

    /// INI (y=4), IND (y=5), INIR (y=6), INDR (y=7).
    fn execute_ini_ind<B: Bus>(&mut self, bus: &mut B, y: u8) -> u32 {
        let port = self.bc();
        let hl = self.hl();
        let val = bus.read_port(port);
        bus.write_byte(hl, val);

        self.b = self.b.wrapping_sub(1);
        if y & 1 == 0 {
            self.set_hl(hl.wrapping_add(1));
            self.memptr = port.wrapping_add(1);
        } else {
            self.set_hl(hl.wrapping_sub(1));
            self.memptr = port.wrapping_sub(1);
        }

        self.set_flag(flags::ZERO, self.b == 0);
        self.set_flag(flags::ADD_SUB, true);

        if y >= 6 && self.b != 0 {
            self.pc = self.pc.wrapping_sub(2);
            21
        } else {
            16
        }
    }

    /// OUTI (y=4), OUTD (y=5), OTIR (y=6), OTDR (y=7).
    fn execute_outi_outd<B: Bus>(&mut self, bus: &mut B, y: u8) -> u32 {
        let hl = self.hl();
        let val = bus.read_byte(hl);

        // B decrements before it reaches the port's high byte
        self.b = self.b.wrapping_sub(1);
        let port = self.bc();
        bus.write_port(port, val);

        if y & 1 == 0 {
            self.set_hl(hl.wrapping_add(1));
            self.memptr = port.wrapping_add(1);
        } else {
            self.set_hl(hl.wrapping_sub(1));
            self.memptr = port.wrapping_sub(1);
        }

        self.set_flag(flags::ZERO, self.b == 0);
        self.set_flag(flags::ADD_SUB, true);

        if y >= 6 && self.b != 0 {
            self.pc = self.pc.wrapping_sub(2);
            21
        } else {
            16
        }
    }
}
