//! Jump, call, return and RST tests.

use super::flags;
use super::test_utils::{cpu, run};

#[test]
fn jp_sets_pc() {
    let (mut c, mut bus) = cpu(&[0xC3, 0x34, 0x12]); // JP 0x1234
    c.step(&mut bus);
    assert_eq!(c.pc, 0x1234);
}

#[test]
fn jp_cc_taken_and_not_taken() {
    let (mut c, mut bus) = cpu(&[0xCA, 0x00, 0x20]); // JP Z, 0x2000
    c.set_flag(flags::ZERO, false);
    c.step(&mut bus);
    assert_eq!(c.pc, 3);

    let (mut c, mut bus) = cpu(&[0xCA, 0x00, 0x20]);
    c.set_flag(flags::ZERO, true);
    c.step(&mut bus);
    assert_eq!(c.pc, 0x2000);
}

#[test]
fn all_eight_conditions_dispatch_on_the_right_flag() {
    // (opcode, flag, taken_when_set)
    let cases = [
        (0xC2u8, flags::ZERO, false),
        (0xCA, flags::ZERO, true),
        (0xD2, flags::CARRY, false),
        (0xDA, flags::CARRY, true),
        (0xE2, flags::PARITY, false),
        (0xEA, flags::PARITY, true),
        (0xF2, flags::SIGN, false),
        (0xFA, flags::SIGN, true),
    ];
    for (opcode, flag, taken_when_set) in cases {
        let (mut c, mut bus) = cpu(&[opcode, 0x00, 0x20]);
        c.set_flag(flag, true);
        c.step(&mut bus);
        assert_eq!(c.pc == 0x2000, taken_when_set, "opcode {:02X}", opcode);
    }
}

#[test]
fn jr_is_relative_to_the_next_instruction() {
    let (mut c, mut bus) = cpu(&[0x18, 0x05]); // JR +5
    c.step(&mut bus);
    assert_eq!(c.pc, 0x0007);
}

#[test]
fn jr_backwards() {
    let mut program = vec![0x00; 0x20];
    program[0x10] = 0x18; // JR -4 -> lands at 0x0E
    program[0x11] = 0xFC;
    let (mut c, mut bus) = cpu(&program);
    c.pc = 0x10;
    c.step(&mut bus);
    assert_eq!(c.pc, 0x000E);
}

#[test]
fn jr_cc_skips_when_false() {
    let (mut c, mut bus) = cpu(&[0x28, 0x05]); // JR Z, +5
    c.set_flag(flags::ZERO, false);
    c.step(&mut bus);
    assert_eq!(c.pc, 2);
}

#[test]
fn djnz_loops_until_b_hits_zero() {
    // 0x0000: DEC A (placeholder loop body); DJNZ -3
    let (mut c, mut bus) = cpu(&[0x3D, 0x10, 0xFD]);
    c.a = 10;
    c.b = 3;
    // body+djnz three times: the final DJNZ falls through
    run(&mut c, &mut bus, 6);
    assert_eq!(c.b, 0);
    assert_eq!(c.a, 7);
    assert_eq!(c.pc, 3);
}

#[test]
fn jp_hl_jumps_through_the_register() {
    let (mut c, mut bus) = cpu(&[0xE9]);
    c.set_hl(0xABCD);
    c.step(&mut bus);
    assert_eq!(c.pc, 0xABCD);
}

#[test]
fn call_pushes_the_return_address() {
    let (mut c, mut bus) = cpu(&[0xCD, 0x00, 0x30]); // CALL 0x3000
    c.step(&mut bus);
    assert_eq!(c.pc, 0x3000);
    assert_eq!(c.sp, 0xFEFE);
    assert_eq!(bus.mem[0xFEFE], 0x03);
    assert_eq!(bus.mem[0xFEFF], 0x00);
}

#[test]
fn call_cc_not_taken_still_consumes_operand() {
    let (mut c, mut bus) = cpu(&[0xC4, 0x00, 0x30]); // CALL NZ
    c.set_flag(flags::ZERO, true);
    c.step(&mut bus);
    assert_eq!(c.pc, 3);
    assert_eq!(c.sp, 0xFF00);
}

#[test]
fn ret_pops_pc() {
    let (mut c, mut bus) = cpu(&[0xC9]);
    c.sp = 0x9000;
    bus.mem[0x9000] = 0x34;
    bus.mem[0x9001] = 0x12;
    c.step(&mut bus);
    assert_eq!(c.pc, 0x1234);
    assert_eq!(c.sp, 0x9002);
}

#[test]
fn call_then_ret_roundtrip() {
    let mut program = vec![0x00; 0x100];
    program[0x00] = 0xCD; // CALL 0x0080
    program[0x01] = 0x80;
    program[0x02] = 0x00;
    program[0x80] = 0xC9; // RET
    let (mut c, mut bus) = cpu(&program);
    run(&mut c, &mut bus, 2);
    assert_eq!(c.pc, 0x0003);
    assert_eq!(c.sp, 0xFF00);
}

#[test]
fn ret_cc_only_pops_when_taken() {
    let (mut c, mut bus) = cpu(&[0xC8]); // RET Z
    c.sp = 0x9000;
    bus.mem[0x9000] = 0x34;
    bus.mem[0x9001] = 0x12;
    c.set_flag(flags::ZERO, false);
    c.step(&mut bus);
    assert_eq!(c.pc, 1);
    assert_eq!(c.sp, 0x9000);
}

#[test]
fn rst_jumps_to_fixed_vectors() {
    for (opcode, target) in [
        (0xC7u8, 0x00u16),
        (0xCF, 0x08),
        (0xD7, 0x10),
        (0xDF, 0x18),
        (0xE7, 0x20),
        (0xEF, 0x28),
        (0xF7, 0x30),
        (0xFF, 0x38),
    ] {
        let (mut c, mut bus) = cpu(&[opcode]);
        c.step(&mut bus);
        assert_eq!(c.pc, target, "opcode {:02X}", opcode);
        assert_eq!(bus.mem[0xFEFE], 0x01); // return address
    }
}
