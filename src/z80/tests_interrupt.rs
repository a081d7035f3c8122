//! Interrupt control instructions, interrupt acceptance and HALT.

use super::flags;
use super::test_utils::cpu;

// ============ DI / EI ============

#[test]
fn di_clears_both_flip_flops() {
    let (mut c, mut bus) = cpu(&[0xF3]);
    c.iff1 = true;
    c.iff2 = true;
    c.step(&mut bus);
    assert!(!c.iff1);
    assert!(!c.iff2);
}

#[test]
fn ei_sets_both_flip_flops() {
    let (mut c, mut bus) = cpu(&[0xFB]);
    c.step(&mut bus);
    assert!(c.iff1);
    assert!(c.iff2);
}

// ============ IM ============

#[test]
fn im_selects_each_mode() {
    for (sub, mode) in [(0x46u8, 0u8), (0x56, 1), (0x5E, 2)] {
        let (mut c, mut bus) = cpu(&[0xED, sub]);
        c.im = 3; // invalid sentinel, must be overwritten
        c.step(&mut bus);
        assert_eq!(c.im, mode, "ED {:02X}", sub);
    }
}

// ============ RETN / RETI ============

#[test]
fn retn_restores_iff1_from_iff2() {
    let (mut c, mut bus) = cpu(&[0xED, 0x45]);
    c.sp = 0x9000;
    bus.mem[0x9000] = 0x34;
    bus.mem[0x9001] = 0x12;
    c.iff1 = false;
    c.iff2 = true;
    c.step(&mut bus);
    assert_eq!(c.pc, 0x1234);
    assert!(c.iff1);
}

#[test]
fn reti_leaves_the_flip_flops_alone() {
    let (mut c, mut bus) = cpu(&[0xED, 0x4D]);
    c.sp = 0x9000;
    bus.mem[0x9000] = 0x78;
    bus.mem[0x9001] = 0x56;
    c.iff1 = false;
    c.iff2 = true;
    c.step(&mut bus);
    assert_eq!(c.pc, 0x5678);
    assert!(!c.iff1);
    assert!(c.iff2);
}

// ============ Maskable interrupt acceptance ============

#[test]
fn im1_irq_pushes_pc_and_jumps_to_0038() {
    let mut program = vec![0x00; 0x200];
    program[0x100] = 0x00; // NOP at the interrupted address
    let (mut c, mut bus) = cpu(&program);
    c.pc = 0x0100;
    c.sp = 0xDFF0;
    c.iff1 = true;
    c.im = 1;
    c.irq(0xFF);
    let t = c.step(&mut bus);
    assert_eq!(t, 13);
    assert_eq!(c.sp, 0xDFEE);
    assert_eq!(bus.mem[0xDFEE], 0x00);
    assert_eq!(bus.mem[0xDFEF], 0x01);
    assert_eq!(c.pc, 0x0038);
    assert!(!c.iff1);
    assert!(!c.iff2);
}

#[test]
fn irq_is_masked_while_iff1_is_clear() {
    let (mut c, mut bus) = cpu(&[0x00]);
    c.iff1 = false;
    c.im = 1;
    c.irq(0xFF);
    c.step(&mut bus);
    assert_eq!(c.pc, 1); // the NOP ran instead
}

#[test]
fn im2_irq_fetches_the_handler_through_the_vector_table() {
    let (mut c, mut bus) = cpu(&[0x00]);
    c.i = 0x30;
    c.im = 2;
    c.iff1 = true;
    c.sp = 0xDFF0;
    // Vector table entry at 0x30FE -> handler 0x4567
    bus.mem[0x30FE] = 0x67;
    bus.mem[0x30FF] = 0x45;
    c.irq(0xFF); // low bit is forced even
    let t = c.step(&mut bus);
    assert_eq!(t, 19);
    assert_eq!(c.pc, 0x4567);
    assert!(!c.iff1);
}

#[test]
fn accepted_irq_drops_the_line() {
    let (mut c, mut bus) = cpu(&[0x00; 16]);
    c.iff1 = true;
    c.im = 1;
    c.irq(0xFF);
    c.step(&mut bus);
    assert_eq!(c.pc, 0x0038);
    // The line was consumed; the next step executes normally.
    c.iff1 = true;
    c.step(&mut bus);
    assert_eq!(c.pc, 0x0039);
}

// ============ EI shadow ============

#[test]
fn instruction_after_ei_is_not_interruptible() {
    let (mut c, mut bus) = cpu(&[0xFB, 0x3C, 0x00]); // EI; INC A; NOP
    c.a = 0;
    c.im = 1;
    c.step(&mut bus); // EI
    c.irq(0xFF);
    c.step(&mut bus); // INC A runs despite the pending IRQ
    assert_eq!(c.a, 1);
    assert_eq!(c.pc, 2);
    c.step(&mut bus); // now the IRQ lands
    assert_eq!(c.pc, 0x0038);
}

// ============ Non-maskable interrupt ============

#[test]
fn nmi_jumps_to_0066_and_clears_only_iff1() {
    let (mut c, mut bus) = cpu(&[0x00]);
    c.pc = 0x0200;
    c.sp = 0xDFF0;
    c.iff1 = true;
    c.iff2 = true;
    c.nmi();
    let t = c.step(&mut bus);
    assert_eq!(t, 11);
    assert_eq!(c.pc, 0x0066);
    assert!(!c.iff1);
    assert!(c.iff2);
    assert_eq!(bus.mem[0xDFEE], 0x00);
    assert_eq!(bus.mem[0xDFEF], 0x02);
}

#[test]
fn nmi_fires_even_with_interrupts_disabled() {
    let (mut c, mut bus) = cpu(&[0x00]);
    c.iff1 = false;
    c.nmi();
    c.step(&mut bus);
    assert_eq!(c.pc, 0x0066);
}

#[test]
fn nmi_wins_over_a_pending_irq() {
    let (mut c, mut bus) = cpu(&[0x00]);
    c.iff1 = true;
    c.im = 1;
    c.irq(0xFF);
    c.nmi();
    c.step(&mut bus);
    assert_eq!(c.pc, 0x0066);
}

// ============ HALT ============

#[test]
fn halt_spins_at_four_t_states() {
    let (mut c, mut bus) = cpu(&[0x76]);
    c.step(&mut bus);
    assert!(c.halted);
    assert_eq!(c.pc, 1);
    assert_eq!(c.step(&mut bus), 4);
    assert_eq!(c.step(&mut bus), 4);
    assert_eq!(c.pc, 1);
}

#[test]
fn irq_wakes_a_halted_cpu() {
    let (mut c, mut bus) = cpu(&[0x76]);
    c.iff1 = true;
    c.im = 1;
    c.step(&mut bus); // HALT
    c.step(&mut bus); // spinning
    c.irq(0xFF);
    c.step(&mut bus);
    assert!(!c.halted);
    assert_eq!(c.pc, 0x0038);
    // Return address is the instruction after HALT
    assert_eq!(bus.mem[0xFEFE], 0x01);
}

#[test]
fn nmi_wakes_a_halted_cpu() {
    let (mut c, mut bus) = cpu(&[0x76]);
    c.step(&mut bus);
    c.nmi();
    c.step(&mut bus);
    assert!(!c.halted);
    assert_eq!(c.pc, 0x0066);
}

// ============ Refresh register ============

#[test]
fn r_increments_per_fetch_and_keeps_bit_7() {
    let (mut c, mut bus) = cpu(&[0x00, 0x00]);
    c.r = 0x80;
    c.step(&mut bus);
    c.step(&mut bus);
    assert_eq!(c.r, 0x82);
}

#[test]
fn r_wraps_within_seven_bits() {
    let (mut c, mut bus) = cpu(&[0x00]);
    c.r = 0xFF;
    c.step(&mut bus);
    assert_eq!(c.r, 0x80);
}

#[test]
fn flags_survive_interrupt_entry() {
    let (mut c, mut bus) = cpu(&[0x00]);
    c.f = flags::ZERO | flags::CARRY;
    c.iff1 = true;
    c.im = 1;
    c.irq(0xFF);
    c.step(&mut bus);
    assert!(c.get_flag(flags::ZERO));
    assert!(c.get_flag(flags::CARRY));
}
