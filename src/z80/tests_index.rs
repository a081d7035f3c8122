//! DD/FD page: IX/IY addressing and displaced bit operations.

use super::flags;
use super::test_utils::{cpu, run};

#[test]
fn ld_ix_nn() {
    let (mut c, mut bus) = cpu(&[0xDD, 0x21, 0x34, 0x12]); // LD IX, 0x1234
    c.step(&mut bus);
    assert_eq!(c.ix, 0x1234);
}

#[test]
fn ld_iy_nn() {
    let (mut c, mut bus) = cpu(&[0xFD, 0x21, 0xCD, 0xAB]); // LD IY, 0xABCD
    c.step(&mut bus);
    assert_eq!(c.iy, 0xABCD);
}

#[test]
fn ld_r_ix_d_reads_displaced() {
    let (mut c, mut bus) = cpu(&[0xDD, 0x7E, 0x05]); // LD A, (IX+5)
    c.ix = 0x4000;
    bus.mem[0x4005] = 0x42;
    c.step(&mut bus);
    assert_eq!(c.a, 0x42);
}

#[test]
fn ld_ix_d_r_writes_displaced_negative() {
    let (mut c, mut bus) = cpu(&[0xDD, 0x77, 0xFE]); // LD (IX-2), A
    c.ix = 0x4000;
    c.a = 0x99;
    c.step(&mut bus);
    assert_eq!(bus.mem[0x3FFE], 0x99);
}

#[test]
fn ld_ix_d_n_immediate_store() {
    let (mut c, mut bus) = cpu(&[0xFD, 0x36, 0x10, 0xAB]); // LD (IY+0x10), 0xAB
    c.iy = 0x5000;
    c.step(&mut bus);
    assert_eq!(bus.mem[0x5010], 0xAB);
}

#[test]
fn add_a_ix_d() {
    let (mut c, mut bus) = cpu(&[0xDD, 0x86, 0x01]); // ADD A, (IX+1)
    c.ix = 0x4000;
    c.a = 0x10;
    bus.mem[0x4001] = 0x22;
    c.step(&mut bus);
    assert_eq!(c.a, 0x32);
}

#[test]
fn inc_dec_ix_d() {
    let (mut c, mut bus) = cpu(&[0xDD, 0x34, 0x00, 0xDD, 0x35, 0x00, 0xDD, 0x35, 0x00]);
    c.ix = 0x4000;
    bus.mem[0x4000] = 0x41;
    run(&mut c, &mut bus, 3); // INC; DEC; DEC
    assert_eq!(bus.mem[0x4000], 0x40);
}

#[test]
fn add_ix_rp_uses_ix_as_accumulator() {
    let (mut c, mut bus) = cpu(&[0xDD, 0x09, 0xDD, 0x29]); // ADD IX, BC; ADD IX, IX
    c.ix = 0x1000;
    c.set_bc(0x0234);
    c.step(&mut bus);
    assert_eq!(c.ix, 0x1234);
    c.step(&mut bus);
    assert_eq!(c.ix, 0x2468);
}

#[test]
fn jp_ix() {
    let (mut c, mut bus) = cpu(&[0xDD, 0xE9]); // JP (IX)
    c.ix = 0x8000;
    c.step(&mut bus);
    assert_eq!(c.pc, 0x8000);
}

#[test]
fn push_pop_ix() {
    let (mut c, mut bus) = cpu(&[0xDD, 0xE5, 0xFD, 0xE1]); // PUSH IX; POP IY
    c.ix = 0xBEEF;
    run(&mut c, &mut bus, 2);
    assert_eq!(c.iy, 0xBEEF);
}

#[test]
fn ex_sp_ix() {
    let (mut c, mut bus) = cpu(&[0xDD, 0xE3]); // EX (SP), IX
    c.sp = 0x9000;
    c.ix = 0x1234;
    bus.mem[0x9000] = 0x78;
    bus.mem[0x9001] = 0x56;
    c.step(&mut bus);
    assert_eq!(c.ix, 0x5678);
    assert_eq!(bus.mem[0x9000], 0x34);
    assert_eq!(bus.mem[0x9001], 0x12);
}

#[test]
fn ld_nn_ix_and_back() {
    let (mut c, mut bus) = cpu(&[0xDD, 0x22, 0x00, 0x60, 0xFD, 0x2A, 0x00, 0x60]);
    c.ix = 0xCAFE;
    run(&mut c, &mut bus, 2); // LD (0x6000), IX; LD IY, (0x6000)
    assert_eq!(c.iy, 0xCAFE);
}

#[test]
fn ld_sp_ix() {
    let (mut c, mut bus) = cpu(&[0xDD, 0xF9]);
    c.ix = 0xD000;
    c.step(&mut bus);
    assert_eq!(c.sp, 0xD000);
}

// ============ DDCB / FDCB ============

#[test]
fn bit_on_displaced_operand() {
    let (mut c, mut bus) = cpu(&[0xDD, 0xCB, 0x03, 0x46]); // BIT 0, (IX+3)
    c.ix = 0x4000;
    bus.mem[0x4003] = 0x01;
    c.step(&mut bus);
    assert!(!c.get_flag(flags::ZERO));
}

#[test]
fn set_on_displaced_operand() {
    let (mut c, mut bus) = cpu(&[0xFD, 0xCB, 0x00, 0xC6]); // SET 0, (IY+0)
    c.iy = 0x5000;
    c.step(&mut bus);
    assert_eq!(bus.mem[0x5000], 0x01);
}

#[test]
fn res_on_displaced_operand() {
    let (mut c, mut bus) = cpu(&[0xDD, 0xCB, 0xFF, 0x86]); // RES 0, (IX-1)
    c.ix = 0x4000;
    bus.mem[0x3FFF] = 0xFF;
    c.step(&mut bus);
    assert_eq!(bus.mem[0x3FFF], 0xFE);
}

#[test]
fn rlc_displaced_copies_result_to_register() {
    // Undocumented: DDCB RLC (IX+d) -> B also receives the result
    let (mut c, mut bus) = cpu(&[0xDD, 0xCB, 0x00, 0x00]); // RLC (IX+0), B
    c.ix = 0x4000;
    bus.mem[0x4000] = 0x80;
    c.step(&mut bus);
    assert_eq!(bus.mem[0x4000], 0x01);
    assert_eq!(c.b, 0x01);
    assert!(c.get_flag(flags::CARRY));
}

// ============ Prefix fall-through ============

#[test]
fn prefix_before_a_plain_instruction_is_inert() {
    let (mut c, mut bus) = cpu(&[0xDD, 0x04]); // DD then INC B
    c.b = 1;
    let t = c.step(&mut bus);
    assert_eq!(c.b, 2);
    assert_eq!(t, 8); // 4 for the prefix + 4 for INC B
    assert_eq!(c.pc, 2);
}

#[test]
fn prefix_chains_accumulate() {
    let (mut c, mut bus) = cpu(&[0xDD, 0xFD, 0x21, 0x34, 0x12]); // DD FD LD IY, nn
    let t = c.step(&mut bus);
    assert_eq!(c.iy, 0x1234);
    assert_eq!(t, 18);
}
