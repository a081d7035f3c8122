//! T-state accounting spot checks across the opcode pages.

use super::flags;
use super::test_utils::cpu;

/// Step one instruction and return its cost.
fn cost(program: &[u8], setup: impl FnOnce(&mut super::Z80)) -> u32 {
    let (mut c, mut bus) = cpu(program);
    setup(&mut c);
    c.step(&mut bus)
}

#[test]
fn unprefixed_costs() {
    assert_eq!(cost(&[0x00], |_| {}), 4); // NOP
    assert_eq!(cost(&[0x41], |_| {}), 4); // LD B, C
    assert_eq!(cost(&[0x46], |_| {}), 7); // LD B, (HL)
    assert_eq!(cost(&[0x06, 0x00], |_| {}), 7); // LD B, n
    assert_eq!(cost(&[0x36, 0x00], |_| {}), 10); // LD (HL), n
    assert_eq!(cost(&[0x01, 0x00, 0x00], |_| {}), 10); // LD BC, nn
    assert_eq!(cost(&[0x0A], |_| {}), 7); // LD A, (BC)
    assert_eq!(cost(&[0x3A, 0x00, 0x00], |_| {}), 13); // LD A, (nn)
    assert_eq!(cost(&[0x22, 0x00, 0x80], |_| {}), 16); // LD (nn), HL
    assert_eq!(cost(&[0x03], |_| {}), 6); // INC BC
    assert_eq!(cost(&[0x04], |_| {}), 4); // INC B
    assert_eq!(cost(&[0x34], |_| {}), 11); // INC (HL)
    assert_eq!(cost(&[0x09], |_| {}), 11); // ADD HL, BC
    assert_eq!(cost(&[0x80], |_| {}), 4); // ADD A, B
    assert_eq!(cost(&[0x86], |_| {}), 7); // ADD A, (HL)
    assert_eq!(cost(&[0xC6, 0x00], |_| {}), 7); // ADD A, n
    assert_eq!(cost(&[0x76], |_| {}), 4); // HALT
    assert_eq!(cost(&[0x07], |_| {}), 4); // RLCA
    assert_eq!(cost(&[0x27], |_| {}), 4); // DAA
    assert_eq!(cost(&[0x08], |_| {}), 4); // EX AF, AF'
    assert_eq!(cost(&[0xEB], |_| {}), 4); // EX DE, HL
    assert_eq!(cost(&[0xE3], |_| {}), 19); // EX (SP), HL
    assert_eq!(cost(&[0xF9], |_| {}), 6); // LD SP, HL
    assert_eq!(cost(&[0xC5], |_| {}), 11); // PUSH BC
    assert_eq!(cost(&[0xC1], |_| {}), 10); // POP BC
    assert_eq!(cost(&[0xC7], |_| {}), 11); // RST 00
    assert_eq!(cost(&[0xD3, 0x00], |_| {}), 11); // OUT (n), A
    assert_eq!(cost(&[0xDB, 0x00], |_| {}), 11); // IN A, (n)
}

#[test]
fn jump_costs_depend_on_the_branch() {
    assert_eq!(cost(&[0xC3, 0x00, 0x00], |_| {}), 10); // JP
    assert_eq!(cost(&[0x18, 0x00], |_| {}), 12); // JR
    assert_eq!(cost(&[0x28, 0x00], |c| c.set_flag(flags::ZERO, true)), 12); // JR Z taken
    assert_eq!(cost(&[0x28, 0x00], |c| c.set_flag(flags::ZERO, false)), 7); // JR Z skipped
    assert_eq!(cost(&[0xE9], |_| {}), 4); // JP (HL)
    assert_eq!(cost(&[0xCD, 0x00, 0x00], |_| {}), 17); // CALL
    assert_eq!(cost(&[0xC4, 0x00, 0x00], |c| c.set_flag(flags::ZERO, true)), 10); // CALL NZ skipped
    assert_eq!(cost(&[0xC9], |_| {}), 10); // RET
    assert_eq!(cost(&[0xC8], |c| c.set_flag(flags::ZERO, true)), 11); // RET Z taken
    assert_eq!(cost(&[0xC8], |c| c.set_flag(flags::ZERO, false)), 5); // RET Z skipped
    assert_eq!(cost(&[0x10, 0x00], |c| c.b = 2), 13); // DJNZ looping
    assert_eq!(cost(&[0x10, 0x00], |c| c.b = 1), 8); // DJNZ done
}

#[test]
fn cb_costs() {
    assert_eq!(cost(&[0xCB, 0x00], |_| {}), 8); // RLC B
    assert_eq!(cost(&[0xCB, 0x06], |_| {}), 15); // RLC (HL)
    assert_eq!(cost(&[0xCB, 0x40], |_| {}), 8); // BIT 0, B
    assert_eq!(cost(&[0xCB, 0x46], |_| {}), 12); // BIT 0, (HL)
    assert_eq!(cost(&[0xCB, 0x80], |_| {}), 8); // RES 0, B
    assert_eq!(cost(&[0xCB, 0xC6], |_| {}), 15); // SET 0, (HL)
}

#[test]
fn ed_costs() {
    assert_eq!(cost(&[0xED, 0x40], |_| {}), 12); // IN B, (C)
    assert_eq!(cost(&[0xED, 0x41], |_| {}), 12); // OUT (C), B
    assert_eq!(cost(&[0xED, 0x42], |_| {}), 15); // SBC HL, BC
    assert_eq!(cost(&[0xED, 0x43, 0x00, 0x80], |_| {}), 20); // LD (nn), BC
    assert_eq!(cost(&[0xED, 0x44], |_| {}), 8); // NEG
    assert_eq!(cost(&[0xED, 0x45], |_| {}), 14); // RETN
    assert_eq!(cost(&[0xED, 0x46], |_| {}), 8); // IM 0
    assert_eq!(cost(&[0xED, 0x47], |_| {}), 9); // LD I, A
    assert_eq!(cost(&[0xED, 0x67], |_| {}), 18); // RRD
    assert_eq!(cost(&[0xED, 0xA0], |_| {}), 16); // LDI
    assert_eq!(cost(&[0xED, 0xA1], |c| c.set_bc(1)), 16); // CPI, last
    assert_eq!(cost(&[0xED, 0xB0], |c| c.set_bc(2)), 21); // LDIR repeating
}

#[test]
fn index_costs() {
    assert_eq!(cost(&[0xDD, 0x21, 0x00, 0x00], |_| {}), 14); // LD IX, nn
    assert_eq!(cost(&[0xDD, 0x09], |_| {}), 15); // ADD IX, BC
    assert_eq!(cost(&[0xDD, 0x23], |_| {}), 10); // INC IX
    assert_eq!(cost(&[0xDD, 0x24], |_| {}), 8); // INC IXH
    assert_eq!(cost(&[0xDD, 0x34, 0x00], |_| {}), 23); // INC (IX+d)
    assert_eq!(cost(&[0xDD, 0x36, 0x00, 0x00], |_| {}), 19); // LD (IX+d), n
    assert_eq!(cost(&[0xDD, 0x7E, 0x00], |_| {}), 19); // LD A, (IX+d)
    assert_eq!(cost(&[0xDD, 0x86, 0x00], |_| {}), 19); // ADD A, (IX+d)
    assert_eq!(cost(&[0xDD, 0xE1], |_| {}), 14); // POP IX
    assert_eq!(cost(&[0xDD, 0xE5], |_| {}), 15); // PUSH IX
    assert_eq!(cost(&[0xDD, 0xE9], |_| {}), 8); // JP (IX)
    assert_eq!(cost(&[0xDD, 0xCB, 0x00, 0x46], |_| {}), 20); // BIT 0, (IX+d)
    assert_eq!(cost(&[0xDD, 0xCB, 0x00, 0xC6], |_| {}), 23); // SET 0, (IX+d)
}

#[test]
fn the_cycle_counter_accumulates() {
    let (mut c, mut bus) = cpu(&[0x00, 0x06, 0x01, 0x76]); // NOP; LD B,1; HALT
    c.step(&mut bus);
    c.step(&mut bus);
    c.step(&mut bus);
    assert_eq!(c.cycles, 4 + 7 + 4);
    c.step(&mut bus); // halted
    assert_eq!(c.cycles, 19);
}
