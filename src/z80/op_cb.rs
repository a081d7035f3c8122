//! CB prefix page: rotates, shifts and bit operations.

use super::{flags, Bus, Z80};

impl Z80 {
    /// The eight CB rotate/shift forms, selected by the y field. Sets every
    /// flag except that the caller owns the X/Y source for BIT.
    pub(super) fn cb_rotate_shift(&mut self, val: u8, y: u8) -> u8 {
        let old_carry = self.get_flag(flags::CARRY) as u8;
        let (result, carry) = match y {
            0 => (val.rotate_left(1), val & 0x80 != 0),        // RLC
            1 => (val.rotate_right(1), val & 0x01 != 0),       // RRC
            2 => ((val << 1) | old_carry, val & 0x80 != 0),    // RL
            3 => ((val >> 1) | (old_carry << 7), val & 0x01 != 0), // RR
            4 => (val << 1, val & 0x80 != 0),                  // SLA
            5 => ((val >> 1) | (val & 0x80), val & 0x01 != 0), // SRA
            6 => ((val << 1) | 1, val & 0x80 != 0),            // SLL (undocumented)
            7 => (val >> 1, val & 0x01 != 0),                  // SRL
            _ => unreachable!(),
        };
        self.set_flag(flags::CARRY, carry);
        self.set_flag(flags::HALF_CARRY, false);
        self.set_flag(flags::ADD_SUB, false);
        self.set_szxy_flags(result);
        self.set_parity_flag(result);
        result
    }

    pub(super) fn cb_bit(&mut self, val: u8, bit: u8) {
        let tested = val & (1 << bit);
        self.set_flag(flags::ZERO, tested == 0);
        // BIT reports the tested bit through P/V and S as well
        self.set_flag(flags::PARITY, tested == 0);
        self.set_flag(flags::SIGN, bit == 7 && tested != 0);
        self.set_flag(flags::HALF_CARRY, true);
        self.set_flag(flags::ADD_SUB, false);
    }

    pub(super) fn execute_cb_prefix<B: Bus>(&mut self, bus: &mut B) -> u32 {
        let opcode = self.fetch_byte(bus);
        let x = (opcode >> 6) & 0x03;
        let y = (opcode >> 3) & 0x07;
        let z = opcode & 0x07;

        if x == 1 && z == 6 {
            // BIT y, (HL) reads memory but writes nothing back
            self.memptr = self.hl();
            let val = bus.read_byte(self.hl());
            self.cb_bit(val, y);
            // X/Y come from the high byte of WZ, not the operand
            let high = (self.memptr >> 8) as u8;
            self.set_flag(flags::X_FLAG, high & 0x08 != 0);
            self.set_flag(flags::Y_FLAG, high & 0x20 != 0);
            return 12;
        }

        let val = self.get_reg(bus, z);
        match x {
            0 => {
                let result = self.cb_rotate_shift(val, y);
                self.set_reg(bus, z, result);
            }
            1 => {
                // BIT y, r
                self.cb_bit(val, y);
                self.set_flag(flags::X_FLAG, val & 0x08 != 0);
                self.set_flag(flags::Y_FLAG, val & 0x20 != 0);
                return 8;
            }
            2 => {
                // RES y, r
                self.set_reg(bus, z, val & !(1 << y));
            }
            3 => {
                // SET y, r
                self.set_reg(bus, z, val | (1 << y));
            }
            _ => unreachable!(),
        }
        if z == 6 {
            15
        } else {
            8
        }
    }
}
