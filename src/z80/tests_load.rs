//! 8-bit and 16-bit load, exchange and stack instruction tests.

use super::flags;
use super::test_utils::{cpu, run};

// ============ LD r, n ============

#[test]
fn ld_r_n_loads_each_register() {
    let (mut c, mut bus) = cpu(&[
        0x06, 0x11, // LD B, 0x11
        0x0E, 0x22, // LD C, 0x22
        0x16, 0x33, // LD D, 0x33
        0x1E, 0x44, // LD E, 0x44
        0x26, 0x55, // LD H, 0x55
        0x2E, 0x66, // LD L, 0x66
        0x3E, 0x77, // LD A, 0x77
    ]);
    run(&mut c, &mut bus, 7);
    assert_eq!(c.b, 0x11);
    assert_eq!(c.c, 0x22);
    assert_eq!(c.d, 0x33);
    assert_eq!(c.e, 0x44);
    assert_eq!(c.h, 0x55);
    assert_eq!(c.l, 0x66);
    assert_eq!(c.a, 0x77);
}

#[test]
fn ld_r_n_does_not_touch_flags() {
    let (mut c, mut bus) = cpu(&[0x3E, 0x00]);
    c.f = 0xFF;
    c.step(&mut bus);
    assert_eq!(c.f, 0xFF);
}

// ============ LD r, r' ============

#[test]
fn ld_r_r_copies() {
    let (mut c, mut bus) = cpu(&[0x41]); // LD B, C
    c.c = 0x9A;
    c.step(&mut bus);
    assert_eq!(c.b, 0x9A);
    assert_eq!(c.c, 0x9A);
}

#[test]
fn ld_r_hl_reads_memory() {
    let (mut c, mut bus) = cpu(&[0x7E]); // LD A, (HL)
    c.set_hl(0x1234);
    bus.mem[0x1234] = 0x42;
    c.step(&mut bus);
    assert_eq!(c.a, 0x42);
}

#[test]
fn ld_hl_r_writes_memory() {
    let (mut c, mut bus) = cpu(&[0x77]); // LD (HL), A
    c.a = 0x55;
    c.set_hl(0x2000);
    c.step(&mut bus);
    assert_eq!(bus.mem[0x2000], 0x55);
}

// ============ LD rp, nn / indirect loads ============

#[test]
fn ld_rp_nn_is_little_endian() {
    let (mut c, mut bus) = cpu(&[0x01, 0x34, 0x12, 0x31, 0xF0, 0xDF]); // LD BC; LD SP
    run(&mut c, &mut bus, 2);
    assert_eq!(c.bc(), 0x1234);
    assert_eq!(c.sp, 0xDFF0);
}

#[test]
fn ld_a_bc_and_de_indirect() {
    let (mut c, mut bus) = cpu(&[0x0A, 0x1A]); // LD A,(BC); LD A,(DE)
    c.set_bc(0x3000);
    c.set_de(0x3001);
    bus.mem[0x3000] = 0xAA;
    bus.mem[0x3001] = 0xBB;
    c.step(&mut bus);
    assert_eq!(c.a, 0xAA);
    c.step(&mut bus);
    assert_eq!(c.a, 0xBB);
}

#[test]
fn ld_nn_a_and_back() {
    let (mut c, mut bus) = cpu(&[0x32, 0x00, 0x40, 0x3E, 0x00, 0x3A, 0x00, 0x40]);
    c.a = 0xC3;
    run(&mut c, &mut bus, 3); // LD (0x4000),A; LD A,0; LD A,(0x4000)
    assert_eq!(bus.mem[0x4000], 0xC3);
    assert_eq!(c.a, 0xC3);
}

#[test]
fn ld_nn_hl_and_back() {
    let (mut c, mut bus) = cpu(&[0x22, 0x00, 0x50, 0x21, 0x00, 0x00, 0x2A, 0x00, 0x50]);
    c.set_hl(0xBEEF);
    run(&mut c, &mut bus, 3);
    assert_eq!(bus.mem[0x5000], 0xEF);
    assert_eq!(bus.mem[0x5001], 0xBE);
    assert_eq!(c.hl(), 0xBEEF);
}

// ============ Exchanges ============

#[test]
fn ex_af_swaps_shadow() {
    let (mut c, mut bus) = cpu(&[0x08]);
    c.a = 0x12;
    c.f = 0x34;
    c.a_prime = 0x56;
    c.f_prime = 0x78;
    c.step(&mut bus);
    assert_eq!(c.af(), 0x5678);
    assert_eq!(c.a_prime, 0x12);
    assert_eq!(c.f_prime, 0x34);
}

#[test]
fn exx_swaps_three_pairs() {
    let (mut c, mut bus) = cpu(&[0xD9]);
    c.set_bc(0x1111);
    c.set_de(0x2222);
    c.set_hl(0x3333);
    c.b_prime = 0xAA;
    c.step(&mut bus);
    assert_eq!(c.b, 0xAA);
    assert_eq!(c.bc() & 0xFF, 0x00);
    assert_eq!(c.d_prime, 0x22);
    assert_eq!(c.h_prime, 0x33);
}

#[test]
fn ex_de_hl() {
    let (mut c, mut bus) = cpu(&[0xEB]);
    c.set_de(0x1234);
    c.set_hl(0x5678);
    c.step(&mut bus);
    assert_eq!(c.de(), 0x5678);
    assert_eq!(c.hl(), 0x1234);
}

#[test]
fn ex_sp_hl_swaps_with_stack_top() {
    let (mut c, mut bus) = cpu(&[0xE3]);
    c.sp = 0x8000;
    c.set_hl(0x1234);
    bus.mem[0x8000] = 0x78;
    bus.mem[0x8001] = 0x56;
    c.step(&mut bus);
    assert_eq!(c.hl(), 0x5678);
    assert_eq!(bus.mem[0x8000], 0x34);
    assert_eq!(bus.mem[0x8001], 0x12);
}

// ============ PUSH / POP ============

#[test]
fn push_pop_roundtrip() {
    let (mut c, mut bus) = cpu(&[0xC5, 0xD1]); // PUSH BC; POP DE
    c.set_bc(0xCAFE);
    run(&mut c, &mut bus, 2);
    assert_eq!(c.de(), 0xCAFE);
    assert_eq!(c.sp, 0xFF00);
}

#[test]
fn push_stores_high_byte_first() {
    let (mut c, mut bus) = cpu(&[0xF5]); // PUSH AF
    c.a = 0x12;
    c.f = 0x34;
    c.step(&mut bus);
    assert_eq!(c.sp, 0xFEFE);
    assert_eq!(bus.mem[0xFEFE], 0x34);
    assert_eq!(bus.mem[0xFEFF], 0x12);
}

#[test]
fn pop_af_restores_flags() {
    let (mut c, mut bus) = cpu(&[0xF1]);
    c.sp = 0x9000;
    bus.mem[0x9000] = flags::ZERO | flags::CARRY;
    bus.mem[0x9001] = 0x7E;
    c.step(&mut bus);
    assert_eq!(c.a, 0x7E);
    assert!(c.get_flag(flags::ZERO));
    assert!(c.get_flag(flags::CARRY));
    assert!(!c.get_flag(flags::SIGN));
}

#[test]
fn ld_sp_hl() {
    let (mut c, mut bus) = cpu(&[0xF9]);
    c.set_hl(0xD000);
    c.step(&mut bus);
    assert_eq!(c.sp, 0xD000);
}
