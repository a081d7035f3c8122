//! CB page: rotate/shift and bit manipulation tests.

use super::flags;
use super::test_utils::cpu;

#[test]
fn rlc_rotates_through_bit_7() {
    let (mut c, mut bus) = cpu(&[0xCB, 0x00]); // RLC B
    c.b = 0x81;
    c.step(&mut bus);
    assert_eq!(c.b, 0x03);
    assert!(c.get_flag(flags::CARRY));
}

#[test]
fn rrc_rotates_through_bit_0() {
    let (mut c, mut bus) = cpu(&[0xCB, 0x09]); // RRC C
    c.c = 0x01;
    c.step(&mut bus);
    assert_eq!(c.c, 0x80);
    assert!(c.get_flag(flags::CARRY));
    assert!(c.get_flag(flags::SIGN));
}

#[test]
fn rl_shifts_carry_in() {
    let (mut c, mut bus) = cpu(&[0xCB, 0x12]); // RL D
    c.d = 0x80;
    c.set_flag(flags::CARRY, true);
    c.step(&mut bus);
    assert_eq!(c.d, 0x01);
    assert!(c.get_flag(flags::CARRY));
}

#[test]
fn rr_shifts_carry_in_high() {
    let (mut c, mut bus) = cpu(&[0xCB, 0x1B]); // RR E
    c.e = 0x01;
    c.set_flag(flags::CARRY, false);
    c.step(&mut bus);
    assert_eq!(c.e, 0x00);
    assert!(c.get_flag(flags::CARRY));
    assert!(c.get_flag(flags::ZERO));
}

#[test]
fn sla_clears_bit_0() {
    let (mut c, mut bus) = cpu(&[0xCB, 0x27]); // SLA A
    c.a = 0xC1;
    c.step(&mut bus);
    assert_eq!(c.a, 0x82);
    assert!(c.get_flag(flags::CARRY));
}

#[test]
fn sra_preserves_the_sign_bit() {
    let (mut c, mut bus) = cpu(&[0xCB, 0x2F]); // SRA A
    c.a = 0x81;
    c.step(&mut bus);
    assert_eq!(c.a, 0xC0);
    assert!(c.get_flag(flags::CARRY));
}

#[test]
fn srl_shifts_zero_in() {
    let (mut c, mut bus) = cpu(&[0xCB, 0x3F]); // SRL A
    c.a = 0x81;
    c.step(&mut bus);
    assert_eq!(c.a, 0x40);
    assert!(c.get_flag(flags::CARRY));
    assert!(!c.get_flag(flags::SIGN));
}

#[test]
fn rotate_sets_parity_of_the_result() {
    let (mut c, mut bus) = cpu(&[0xCB, 0x3F]); // SRL A: 0x06 -> 0x03
    c.a = 0x06;
    c.step(&mut bus);
    assert_eq!(c.a, 0x03);
    assert!(c.get_flag(flags::PARITY));
}

#[test]
fn rotate_works_through_hl() {
    let (mut c, mut bus) = cpu(&[0xCB, 0x06]); // RLC (HL)
    c.set_hl(0x4000);
    bus.mem[0x4000] = 0x80;
    c.step(&mut bus);
    assert_eq!(bus.mem[0x4000], 0x01);
    assert!(c.get_flag(flags::CARRY));
}

// ============ BIT / RES / SET ============

#[test]
fn bit_tests_each_position() {
    for bit in 0..8u8 {
        let (mut c, mut bus) = cpu(&[0xCB, 0x40 | (bit << 3) | 0x07]); // BIT bit, A
        c.a = 1 << bit;
        c.step(&mut bus);
        assert!(!c.get_flag(flags::ZERO), "bit {}", bit);
        assert!(c.get_flag(flags::HALF_CARRY));
        assert!(!c.get_flag(flags::ADD_SUB));
    }
}

#[test]
fn bit_zero_when_clear() {
    let (mut c, mut bus) = cpu(&[0xCB, 0x78]); // BIT 7, B
    c.b = 0x7F;
    c.step(&mut bus);
    assert!(c.get_flag(flags::ZERO));
    assert!(!c.get_flag(flags::SIGN));
}

#[test]
fn bit_preserves_carry() {
    let (mut c, mut bus) = cpu(&[0xCB, 0x47]); // BIT 0, A
    c.set_flag(flags::CARRY, true);
    c.a = 1;
    c.step(&mut bus);
    assert!(c.get_flag(flags::CARRY));
}

#[test]
fn bit_copies_operand_bits_into_x_and_y() {
    let (mut c, mut bus) = cpu(&[0xCB, 0x40]); // BIT 0, B
    c.b = 0x28;
    c.step(&mut bus);
    assert!(c.get_flag(flags::Y_FLAG));
    assert!(c.get_flag(flags::X_FLAG));
}

#[test]
fn res_and_set_roundtrip() {
    let (mut c, mut bus) = cpu(&[0xCB, 0xBF, 0xCB, 0xFF]); // RES 7, A; SET 7, A
    c.a = 0xFF;
    c.step(&mut bus);
    assert_eq!(c.a, 0x7F);
    c.step(&mut bus);
    assert_eq!(c.a, 0xFF);
}

#[test]
fn res_set_through_hl() {
    let (mut c, mut bus) = cpu(&[0xCB, 0x86, 0xCB, 0xC6]); // RES 0, (HL); SET 0, (HL)
    c.set_hl(0x5000);
    bus.mem[0x5000] = 0x01;
    c.step(&mut bus);
    assert_eq!(bus.mem[0x5000], 0x00);
    c.step(&mut bus);
    assert_eq!(bus.mem[0x5000], 0x01);
}

#[test]
fn res_set_touch_no_flags() {
    let (mut c, mut bus) = cpu(&[0xCB, 0x87]); // RES 0, A
    c.f = 0xFF;
    c.a = 0xFF;
    c.step(&mut bus);
    assert_eq!(c.f, 0xFF);
}
