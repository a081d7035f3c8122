//! Undocumented behavior the Game Gear catalogue relies on.

use super::flags;
use super::test_utils::cpu;

#[test]
fn sll_shifts_one_in() {
    let (mut c, mut bus) = cpu(&[0xCB, 0x37]); // SLL A
    c.a = 0x80;
    c.step(&mut bus);
    assert_eq!(c.a, 0x01);
    assert!(c.get_flag(flags::CARRY));
    assert!(!c.get_flag(flags::ZERO));
}

#[test]
fn ld_a_ixh_reads_the_high_half() {
    let (mut c, mut bus) = cpu(&[0xDD, 0x7C]); // LD A, IXH
    c.ix = 0x1234;
    c.step(&mut bus);
    assert_eq!(c.a, 0x12);
}

#[test]
fn ld_ixl_n_writes_the_low_half() {
    let (mut c, mut bus) = cpu(&[0xDD, 0x2E, 0x99]); // LD IXL, n
    c.ix = 0x1234;
    c.step(&mut bus);
    assert_eq!(c.ix, 0x1299);
}

#[test]
fn inc_iyh_sets_flags_like_inc_r() {
    let (mut c, mut bus) = cpu(&[0xFD, 0x24]); // INC IYH
    c.iy = 0xFF00;
    c.step(&mut bus);
    assert_eq!(c.iy, 0x0000);
    assert!(c.get_flag(flags::ZERO));
    assert!(c.get_flag(flags::HALF_CARRY));
}

#[test]
fn add_a_ixl() {
    let (mut c, mut bus) = cpu(&[0xDD, 0x85]); // ADD A, IXL
    c.a = 0x10;
    c.ix = 0x0005;
    c.step(&mut bus);
    assert_eq!(c.a, 0x15);
}

#[test]
fn ld_b_iyl_copies_between_halves() {
    let (mut c, mut bus) = cpu(&[0xFD, 0x45]); // LD B, IYL
    c.iy = 0xABCD;
    c.step(&mut bus);
    assert_eq!(c.b, 0xCD);
}

#[test]
fn out_c_zero_writes_zero() {
    let (mut c, mut bus) = cpu(&[0xED, 0x71]); // OUT (C), 0
    c.set_bc(0x1234);
    c.step(&mut bus);
    assert_eq!(bus.port_writes, vec![(0x1234, 0x00)]);
}

#[test]
fn in_flags_only_discards_the_value() {
    let (mut c, mut bus) = cpu(&[0xED, 0x70]); // IN (C)
    c.set_bc(0x0010);
    bus.port_in[0x10] = 0xFF;
    let b = c.b;
    let h = c.h;
    c.step(&mut bus);
    assert_eq!(c.b, b);
    assert_eq!(c.h, h);
    assert!(c.get_flag(flags::SIGN));
    assert!(c.get_flag(flags::PARITY));
}

#[test]
fn scf_copies_a_into_x_and_y() {
    let (mut c, mut bus) = cpu(&[0x37]); // SCF
    c.a = 0x28;
    c.f = 0;
    c.step(&mut bus);
    assert!(c.get_flag(flags::Y_FLAG));
    assert!(c.get_flag(flags::X_FLAG));
}

#[test]
fn arithmetic_copies_result_bits_5_and_3() {
    let (mut c, mut bus) = cpu(&[0x87]); // ADD A, A
    c.a = 0x14; // result 0x28
    c.step(&mut bus);
    assert!(c.get_flag(flags::Y_FLAG));
    assert!(c.get_flag(flags::X_FLAG));

    let (mut c, mut bus) = cpu(&[0x87]);
    c.a = 0x41; // result 0x82, bits 5/3 clear
    c.step(&mut bus);
    assert!(!c.get_flag(flags::Y_FLAG));
    assert!(!c.get_flag(flags::X_FLAG));
}

#[test]
fn ldi_x_y_come_from_value_plus_a() {
    let (mut c, mut bus) = cpu(&[0xED, 0xA0]); // LDI
    c.a = 0x00;
    c.set_hl(0x4000);
    c.set_de(0x5000);
    c.set_bc(0x0002);
    bus.mem[0x4000] = 0x0A; // n = 0x0A: bit 3 set, bit 1 set
    c.step(&mut bus);
    assert!(c.get_flag(flags::X_FLAG));
    assert!(c.get_flag(flags::Y_FLAG));
}

#[test]
fn bit_hl_takes_x_y_from_wz() {
    let (mut c, mut bus) = cpu(&[0xCB, 0x66]); // BIT 4, (HL)
    c.set_hl(0x2800); // WZ high byte = 0x28
    bus.mem[0x2800] = 0x10;
    c.step(&mut bus);
    assert!(c.get_flag(flags::Y_FLAG));
    assert!(c.get_flag(flags::X_FLAG));
    assert!(!c.get_flag(flags::ZERO));
}
