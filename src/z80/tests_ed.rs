//! ED page: extended loads, RRD/RLD, port I/O, and the exception path.

use super::flags;
use super::test_utils::cpu;

#[test]
fn ld_nn_rp_stores_register_pairs() {
    let (mut c, mut bus) = cpu(&[0xED, 0x43, 0x00, 0x60]); // LD (0x6000), BC
    c.set_bc(0x1234);
    c.step(&mut bus);
    assert_eq!(bus.mem[0x6000], 0x34);
    assert_eq!(bus.mem[0x6001], 0x12);
}

#[test]
fn ld_sp_from_memory() {
    let (mut c, mut bus) = cpu(&[0xED, 0x7B, 0x00, 0x60]); // LD SP, (0x6000)
    bus.mem[0x6000] = 0xF0;
    bus.mem[0x6001] = 0xDF;
    c.step(&mut bus);
    assert_eq!(c.sp, 0xDFF0);
}

#[test]
fn ld_i_a_and_ld_a_i() {
    let (mut c, mut bus) = cpu(&[0xED, 0x47, 0xED, 0x57]); // LD I, A; LD A, I
    c.a = 0x42;
    c.step(&mut bus);
    assert_eq!(c.i, 0x42);
    c.a = 0;
    c.iff2 = true;
    c.step(&mut bus);
    assert_eq!(c.a, 0x42);
    assert!(c.get_flag(flags::PARITY)); // P/V mirrors IFF2
}

#[test]
fn ld_a_i_with_interrupts_disabled() {
    let (mut c, mut bus) = cpu(&[0xED, 0x57]);
    c.i = 0x80;
    c.iff2 = false;
    c.step(&mut bus);
    assert_eq!(c.a, 0x80);
    assert!(!c.get_flag(flags::PARITY));
    assert!(c.get_flag(flags::SIGN));
}

#[test]
fn ld_r_a_loads_refresh() {
    let (mut c, mut bus) = cpu(&[0xED, 0x4F]); // LD R, A
    c.a = 0xAA;
    c.step(&mut bus);
    assert_eq!(c.r, 0xAA);
}

#[test]
fn rrd_rotates_nibbles_right() {
    let (mut c, mut bus) = cpu(&[0xED, 0x67]); // RRD
    c.a = 0x84;
    c.set_hl(0x5000);
    bus.mem[0x5000] = 0x20;
    c.step(&mut bus);
    assert_eq!(c.a, 0x80);
    assert_eq!(bus.mem[0x5000], 0x42);
}

#[test]
fn rld_rotates_nibbles_left() {
    let (mut c, mut bus) = cpu(&[0xED, 0x6F]); // RLD
    c.a = 0x7A;
    c.set_hl(0x5000);
    bus.mem[0x5000] = 0x31;
    c.step(&mut bus);
    assert_eq!(c.a, 0x73);
    assert_eq!(bus.mem[0x5000], 0x1A);
}

// ============ Port I/O ============

#[test]
fn in_a_n_forms_the_port_from_a() {
    let (mut c, mut bus) = cpu(&[0xDB, 0x7E]); // IN A, (0x7E)
    bus.port_in[0x7E] = 0x99;
    c.a = 0x12;
    c.step(&mut bus);
    assert_eq!(c.a, 0x99);
}

#[test]
fn out_n_a_writes_the_port() {
    let (mut c, mut bus) = cpu(&[0xD3, 0xBE]); // OUT (0xBE), A
    c.a = 0x55;
    c.step(&mut bus);
    assert_eq!(bus.port_writes, vec![(0x55BE, 0x55)]);
}

#[test]
fn in_r_c_sets_flags() {
    let (mut c, mut bus) = cpu(&[0xED, 0x40]); // IN B, (C)
    c.set_bc(0x0010);
    bus.port_in[0x10] = 0x00;
    c.step(&mut bus);
    assert_eq!(c.b, 0x00);
    assert!(c.get_flag(flags::ZERO));
    assert!(c.get_flag(flags::PARITY));
    assert!(!c.get_flag(flags::ADD_SUB));
}

#[test]
fn in_r_c_preserves_carry() {
    let (mut c, mut bus) = cpu(&[0xED, 0x48]); // IN C, (C)
    c.set_bc(0x0010);
    c.set_flag(flags::CARRY, true);
    bus.port_in[0x10] = 0x80;
    c.step(&mut bus);
    assert_eq!(c.c, 0x80);
    assert!(c.get_flag(flags::CARRY));
    assert!(c.get_flag(flags::SIGN));
}

#[test]
fn out_c_r_writes_the_full_bc_port() {
    let (mut c, mut bus) = cpu(&[0xED, 0x51]); // OUT (C), D
    c.set_bc(0xBEBF);
    c.d = 0x42;
    c.step(&mut bus);
    assert_eq!(bus.port_writes, vec![(0xBEBF, 0x42)]);
}

// ============ Exceptions ============

#[test]
fn unused_ed_encoding_raises_an_exception() {
    let (mut c, mut bus) = cpu(&[0xED, 0x00]);
    c.step(&mut bus);
    assert_eq!(
        c.exception(),
        Some("unimplemented opcode 0x00 at PC=0x0000")
    );
}

#[test]
fn exception_reports_the_instruction_address() {
    let (mut c, mut bus) = cpu(&[0x00, 0x00, 0xED, 0xFF]);
    let mut steps = 0;
    while c.exception().is_none() && steps < 10 {
        c.step(&mut bus);
        steps += 1;
    }
    assert_eq!(
        c.exception(),
        Some("unimplemented opcode 0xFF at PC=0x0002")
    );
}

#[test]
fn cpu_declines_to_run_after_an_exception() {
    let (mut c, mut bus) = cpu(&[0xED, 0x00, 0x3E, 0x42]);
    c.step(&mut bus);
    assert!(c.exception().is_some());
    assert_eq!(c.step(&mut bus), 0);
    assert_eq!(c.a, 0xFF); // the LD A never ran
}

#[test]
fn reset_clears_the_exception() {
    let (mut c, mut bus) = cpu(&[0xED, 0x00]);
    c.step(&mut bus);
    assert!(c.exception().is_some());
    c.reset();
    assert!(c.exception().is_none());
}
