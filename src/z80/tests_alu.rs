//! 8-bit and 16-bit arithmetic/logic flag behavior.

use super::flags;
use super::test_utils::{cpu, run};

fn flag_set(c: &super::Z80, flag: u8) -> bool {
    c.get_flag(flag)
}

// ============ ADD / ADC ============

#[test]
fn add_wraps_to_zero_with_carry_and_half() {
    // 0x3A + 0xC6 = 0x100
    let (mut c, mut bus) = cpu(&[0xC6, 0xC6]); // ADD A, 0xC6
    c.a = 0x3A;
    c.step(&mut bus);
    assert_eq!(c.a, 0x00);
    assert!(flag_set(&c, flags::ZERO));
    assert!(flag_set(&c, flags::CARRY));
    assert!(flag_set(&c, flags::HALF_CARRY));
    assert!(!flag_set(&c, flags::ADD_SUB));
    assert!(!flag_set(&c, flags::PARITY));
    assert!(!flag_set(&c, flags::SIGN));
}

#[test]
fn add_sets_overflow_on_signed_wrap() {
    let (mut c, mut bus) = cpu(&[0x80]); // ADD A, B
    c.a = 0x7F;
    c.b = 0x01;
    c.step(&mut bus);
    assert_eq!(c.a, 0x80);
    assert!(flag_set(&c, flags::PARITY));
    assert!(flag_set(&c, flags::SIGN));
    assert!(!flag_set(&c, flags::CARRY));
}

#[test]
fn adc_adds_the_carry_in() {
    let (mut c, mut bus) = cpu(&[0xCE, 0x00]); // ADC A, 0x00
    c.a = 0x10;
    c.set_flag(flags::CARRY, true);
    c.step(&mut bus);
    assert_eq!(c.a, 0x11);
}

#[test]
fn add_copies_result_bits_into_x_and_y() {
    let (mut c, mut bus) = cpu(&[0xC6, 0x28]); // ADD A, 0x28 -> A = 0x28
    c.a = 0;
    c.step(&mut bus);
    assert!(flag_set(&c, flags::Y_FLAG)); // bit 5 of 0x28
    assert!(flag_set(&c, flags::X_FLAG)); // bit 3 of 0x28
}

// ============ SUB / SBC / CP ============

#[test]
fn sub_equal_sets_zero_and_n() {
    let (mut c, mut bus) = cpu(&[0xD6, 0x42]); // SUB 0x42
    c.a = 0x42;
    c.step(&mut bus);
    assert_eq!(c.a, 0x00);
    assert!(flag_set(&c, flags::ZERO));
    assert!(flag_set(&c, flags::ADD_SUB));
    assert!(!flag_set(&c, flags::CARRY));
}

#[test]
fn sub_borrow_sets_carry() {
    let (mut c, mut bus) = cpu(&[0xD6, 0x01]); // SUB 1
    c.a = 0x00;
    c.step(&mut bus);
    assert_eq!(c.a, 0xFF);
    assert!(flag_set(&c, flags::CARRY));
    assert!(flag_set(&c, flags::HALF_CARRY));
    assert!(flag_set(&c, flags::SIGN));
}

#[test]
fn sbc_subtracts_the_borrow() {
    let (mut c, mut bus) = cpu(&[0xDE, 0x0F]); // SBC A, 0x0F
    c.a = 0x20;
    c.set_flag(flags::CARRY, true);
    c.step(&mut bus);
    assert_eq!(c.a, 0x10);
}

#[test]
fn sub_sets_overflow_on_signed_underflow() {
    let (mut c, mut bus) = cpu(&[0x90]); // SUB B
    c.a = 0x80;
    c.b = 0x01;
    c.step(&mut bus);
    assert_eq!(c.a, 0x7F);
    assert!(flag_set(&c, flags::PARITY));
}

#[test]
fn cp_compares_without_storing() {
    let (mut c, mut bus) = cpu(&[0xFE, 0x42]); // CP 0x42
    c.a = 0x42;
    c.step(&mut bus);
    assert_eq!(c.a, 0x42);
    assert!(flag_set(&c, flags::ZERO));
}

#[test]
fn cp_documented_flags() {
    let (mut c, mut bus) = cpu(&[0xFE, 0x10]); // CP 0x10
    c.a = 0x30;
    c.step(&mut bus);
    assert!(!flag_set(&c, flags::ZERO));
    assert!(!flag_set(&c, flags::CARRY));
    assert!(flag_set(&c, flags::ADD_SUB));
}

// ============ AND / OR / XOR ============

#[test]
fn and_sets_half_carry_and_parity() {
    let (mut c, mut bus) = cpu(&[0xE6, 0x0F]); // AND 0x0F
    c.a = 0x3C;
    c.step(&mut bus);
    assert_eq!(c.a, 0x0C);
    assert!(flag_set(&c, flags::HALF_CARRY));
    assert!(flag_set(&c, flags::PARITY)); // 0x0C has two bits set
    assert!(!flag_set(&c, flags::CARRY));
}

#[test]
fn or_clears_half_carry() {
    let (mut c, mut bus) = cpu(&[0xF6, 0x01]); // OR 1
    c.a = 0x00;
    c.step(&mut bus);
    assert_eq!(c.a, 0x01);
    assert!(!flag_set(&c, flags::HALF_CARRY));
    assert!(!flag_set(&c, flags::PARITY)); // one bit set
}

#[test]
fn xor_self_clears_a() {
    let (mut c, mut bus) = cpu(&[0xAF]); // XOR A
    c.a = 0xA5;
    c.step(&mut bus);
    assert_eq!(c.a, 0x00);
    assert!(flag_set(&c, flags::ZERO));
    assert!(flag_set(&c, flags::PARITY));
}

// ============ INC / DEC ============

#[test]
fn inc_preserves_carry() {
    let (mut c, mut bus) = cpu(&[0x3C]); // INC A
    c.a = 0xFF;
    c.set_flag(flags::CARRY, true);
    c.step(&mut bus);
    assert_eq!(c.a, 0x00);
    assert!(flag_set(&c, flags::ZERO));
    assert!(flag_set(&c, flags::HALF_CARRY));
    assert!(flag_set(&c, flags::CARRY));
}

#[test]
fn inc_7f_sets_overflow() {
    let (mut c, mut bus) = cpu(&[0x3C]);
    c.a = 0x7F;
    c.step(&mut bus);
    assert!(flag_set(&c, flags::PARITY));
    assert!(flag_set(&c, flags::SIGN));
}

#[test]
fn dec_80_sets_overflow() {
    let (mut c, mut bus) = cpu(&[0x3D]); // DEC A
    c.a = 0x80;
    c.step(&mut bus);
    assert_eq!(c.a, 0x7F);
    assert!(flag_set(&c, flags::PARITY));
    assert!(flag_set(&c, flags::ADD_SUB));
}

#[test]
fn inc_memory_through_hl() {
    let (mut c, mut bus) = cpu(&[0x34]); // INC (HL)
    c.set_hl(0x4000);
    bus.mem[0x4000] = 0x0F;
    c.step(&mut bus);
    assert_eq!(bus.mem[0x4000], 0x10);
    assert!(flag_set(&c, flags::HALF_CARRY));
}

// ============ 16-bit arithmetic ============

#[test]
fn add_hl_sets_carry_from_bit_15() {
    let (mut c, mut bus) = cpu(&[0x09]); // ADD HL, BC
    c.set_hl(0x8000);
    c.set_bc(0x8000);
    c.step(&mut bus);
    assert_eq!(c.hl(), 0x0000);
    assert!(flag_set(&c, flags::CARRY));
    assert!(!flag_set(&c, flags::ADD_SUB));
}

#[test]
fn add_hl_half_carry_from_bit_11() {
    let (mut c, mut bus) = cpu(&[0x09]);
    c.set_hl(0x0FFF);
    c.set_bc(0x0001);
    c.step(&mut bus);
    assert_eq!(c.hl(), 0x1000);
    assert!(flag_set(&c, flags::HALF_CARRY));
}

#[test]
fn add_hl_preserves_s_z_pv() {
    let (mut c, mut bus) = cpu(&[0x09]);
    c.f = flags::SIGN | flags::ZERO | flags::PARITY;
    c.set_hl(0x1000);
    c.set_bc(0x0001);
    c.step(&mut bus);
    assert!(flag_set(&c, flags::SIGN));
    assert!(flag_set(&c, flags::ZERO));
    assert!(flag_set(&c, flags::PARITY));
}

#[test]
fn inc_dec_rp_touch_no_flags() {
    let (mut c, mut bus) = cpu(&[0x03, 0x0B]); // INC BC; DEC BC
    c.f = 0xFF;
    c.set_bc(0xFFFF);
    c.step(&mut bus);
    assert_eq!(c.bc(), 0x0000);
    c.step(&mut bus);
    assert_eq!(c.bc(), 0xFFFF);
    assert_eq!(c.f, 0xFF);
}

// ============ DAA / CPL / SCF / CCF ============

#[test]
fn daa_adjusts_bcd_addition() {
    // 0x15 + 0x27 = 0x3C; DAA -> 0x42
    let (mut c, mut bus) = cpu(&[0xC6, 0x27, 0x27]); // ADD A, 0x27; DAA
    c.a = 0x15;
    run(&mut c, &mut bus, 2);
    assert_eq!(c.a, 0x42);
    assert!(!flag_set(&c, flags::CARRY));
}

#[test]
fn daa_carries_past_99() {
    // 0x99 + 0x02 = 0x9B; DAA -> 0x01 with carry
    let (mut c, mut bus) = cpu(&[0xC6, 0x02, 0x27]);
    c.a = 0x99;
    run(&mut c, &mut bus, 2);
    assert_eq!(c.a, 0x01);
    assert!(flag_set(&c, flags::CARRY));
}

#[test]
fn daa_adjusts_bcd_subtraction() {
    // 0x42 - 0x15 = 0x2D; DAA -> 0x27
    let (mut c, mut bus) = cpu(&[0xD6, 0x15, 0x27]); // SUB 0x15; DAA
    c.a = 0x42;
    run(&mut c, &mut bus, 2);
    assert_eq!(c.a, 0x27);
}

#[test]
fn cpl_inverts_a() {
    let (mut c, mut bus) = cpu(&[0x2F]);
    c.a = 0b1010_0101;
    c.step(&mut bus);
    assert_eq!(c.a, 0b0101_1010);
    assert!(flag_set(&c, flags::HALF_CARRY));
    assert!(flag_set(&c, flags::ADD_SUB));
}

#[test]
fn scf_then_ccf() {
    let (mut c, mut bus) = cpu(&[0x37, 0x3F]); // SCF; CCF
    c.step(&mut bus);
    assert!(flag_set(&c, flags::CARRY));
    assert!(!flag_set(&c, flags::HALF_CARRY));
    c.step(&mut bus);
    assert!(!flag_set(&c, flags::CARRY));
    assert!(flag_set(&c, flags::HALF_CARRY)); // CCF copies the old carry
}

#[test]
fn neg_negates_a() {
    let (mut c, mut bus) = cpu(&[0xED, 0x44]); // NEG
    c.a = 0x01;
    c.step(&mut bus);
    assert_eq!(c.a, 0xFF);
    assert!(flag_set(&c, flags::CARRY));
    assert!(flag_set(&c, flags::ADD_SUB));
}

#[test]
fn neg_zero_clears_carry() {
    let (mut c, mut bus) = cpu(&[0xED, 0x44]);
    c.a = 0x00;
    c.step(&mut bus);
    assert_eq!(c.a, 0x00);
    assert!(!flag_set(&c, flags::CARRY));
    assert!(flag_set(&c, flags::ZERO));
}

// ============ ADC HL / SBC HL ============

#[test]
fn sbc_hl_with_borrow() {
    let (mut c, mut bus) = cpu(&[0xED, 0x42]); // SBC HL, BC
    c.set_hl(0x1000);
    c.set_bc(0x0FFF);
    c.set_flag(flags::CARRY, true);
    c.step(&mut bus);
    assert_eq!(c.hl(), 0x0000);
    assert!(flag_set(&c, flags::ZERO));
    assert!(flag_set(&c, flags::ADD_SUB));
}

#[test]
fn sbc_hl_underflow_sets_carry_and_sign() {
    let (mut c, mut bus) = cpu(&[0xED, 0x42]);
    c.set_hl(0x0000);
    c.set_bc(0x0001);
    c.step(&mut bus);
    assert_eq!(c.hl(), 0xFFFF);
    assert!(flag_set(&c, flags::CARRY));
    assert!(flag_set(&c, flags::SIGN));
}

#[test]
fn adc_hl_sets_zero_across_16_bits() {
    let (mut c, mut bus) = cpu(&[0xED, 0x4A]); // ADC HL, BC
    c.set_hl(0xFFFF);
    c.set_bc(0x0000);
    c.set_flag(flags::CARRY, true);
    c.step(&mut bus);
    assert_eq!(c.hl(), 0x0000);
    assert!(flag_set(&c, flags::ZERO));
    assert!(flag_set(&c, flags::CARRY));
}

#[test]
fn adc_hl_signed_overflow() {
    let (mut c, mut bus) = cpu(&[0xED, 0x4A]);
    c.set_hl(0x7FFF);
    c.set_bc(0x0001);
    c.step(&mut bus);
    assert_eq!(c.hl(), 0x8000);
    assert!(flag_set(&c, flags::PARITY));
    assert!(flag_set(&c, flags::SIGN));
}
