//! Property tests pitting the ALU against arithmetic oracles.

use proptest::prelude::*;

use super::flags;
use super::test_utils::cpu;

proptest! {
    #[test]
    fn add_matches_wide_arithmetic(a: u8, b: u8) {
        let (mut c, mut bus) = cpu(&[0x80]); // ADD A, B
        c.a = a;
        c.b = b;
        c.step(&mut bus);
        let wide = a as u16 + b as u16;
        prop_assert_eq!(c.a, wide as u8);
        prop_assert_eq!(c.get_flag(flags::CARRY), wide > 0xFF);
        prop_assert_eq!(c.get_flag(flags::ZERO), wide as u8 == 0);
        prop_assert_eq!(c.get_flag(flags::SIGN), wide as u8 >= 0x80);
        prop_assert_eq!(
            c.get_flag(flags::HALF_CARRY),
            (a & 0x0F) + (b & 0x0F) > 0x0F
        );
    }

    #[test]
    fn cp_orders_like_the_integers(a: u8, b: u8) {
        let (mut c, mut bus) = cpu(&[0xB8]); // CP B
        c.a = a;
        c.b = b;
        c.step(&mut bus);
        prop_assert_eq!(c.a, a); // compare never stores
        prop_assert_eq!(c.get_flag(flags::ZERO), a == b);
        prop_assert_eq!(c.get_flag(flags::CARRY), a < b);
    }

    #[test]
    fn sub_is_the_inverse_of_add(a: u8, b: u8) {
        let (mut c, mut bus) = cpu(&[0x80, 0x90]); // ADD A, B; SUB B
        c.a = a;
        c.b = b;
        c.step(&mut bus);
        c.step(&mut bus);
        prop_assert_eq!(c.a, a);
    }

    #[test]
    fn inc_dec_roundtrip(a: u8) {
        let (mut c, mut bus) = cpu(&[0x3C, 0x3D]); // INC A; DEC A
        c.a = a;
        c.step(&mut bus);
        c.step(&mut bus);
        prop_assert_eq!(c.a, a);
    }

    #[test]
    fn logic_parity_matches_popcount(a: u8, b: u8) {
        let (mut c, mut bus) = cpu(&[0xA0]); // AND B
        c.a = a;
        c.b = b;
        c.step(&mut bus);
        let result = a & b;
        prop_assert_eq!(c.a, result);
        prop_assert_eq!(c.get_flag(flags::PARITY), result.count_ones() % 2 == 0);
        prop_assert!(c.get_flag(flags::HALF_CARRY));
        prop_assert!(!c.get_flag(flags::CARRY));
    }

    #[test]
    fn push_pop_is_identity(value: u16) {
        let (mut c, mut bus) = cpu(&[0xC5, 0xD1]); // PUSH BC; POP DE
        c.set_bc(value);
        c.step(&mut bus);
        c.step(&mut bus);
        prop_assert_eq!(c.de(), value);
        prop_assert_eq!(c.sp, 0xFF00);
    }

    #[test]
    fn xor_twice_is_identity(a: u8, b: u8) {
        let (mut c, mut bus) = cpu(&[0xA8, 0xA8]); // XOR B; XOR B
        c.a = a;
        c.b = b;
        c.step(&mut bus);
        c.step(&mut bus);
        prop_assert_eq!(c.a, a);
    }

    #[test]
    fn rotate_left_then_right_is_identity(a: u8) {
        let (mut c, mut bus) = cpu(&[0xCB, 0x07, 0xCB, 0x0F]); // RLC A; RRC A
        c.a = a;
        c.step(&mut bus);
        c.step(&mut bus);
        prop_assert_eq!(c.a, a);
    }
}
