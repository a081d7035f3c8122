//! Whole-machine scenarios: programs running from paged ROM, interrupt
//! delivery, frame callbacks and shutdown.

use super::*;
use crate::memory::BANK_SIZE;

/// A 64-bank ROM with `program` at the reset vector and every other bank
/// filled with its own index.
fn rom_with_program(program: &[u8]) -> Rom {
    let mut data = vec![0u8; 64 * BANK_SIZE];
    for bank in 1..64 {
        data[bank * BANK_SIZE..(bank + 1) * BANK_SIZE].fill(bank as u8);
    }
    data[..program.len()].copy_from_slice(program);
    Rom::new(data).unwrap()
}

fn machine_with_program(program: &[u8]) -> GameGear {
    let mut gg = GameGear::new();
    gg.load(&rom_with_program(program));
    gg.power(true);
    gg
}

/// Step the CPU exactly `n` instructions.
fn run_steps(gg: &mut GameGear, n: usize) {
    for _ in 0..n {
        let mut bus = GgBus {
            mmu: &mut gg.mmu,
            vdp: &mut gg.vdp,
            psg: &mut gg.psg,
            io: &mut gg.io,
        };
        gg.cpu.step(&mut bus);
    }
}

/// Step the CPU until it halts (or the step limit trips).
fn run_until_halt(gg: &mut GameGear) {
    for _ in 0..10_000 {
        if gg.cpu.halted {
            return;
        }
        let mut bus = GgBus {
            mmu: &mut gg.mmu,
            vdp: &mut gg.vdp,
            psg: &mut gg.psg,
            io: &mut gg.io,
        };
        gg.cpu.step(&mut bus);
    }
    panic!("program never halted");
}

#[test]
fn power_on_resets_the_world() {
    let gg = machine_with_program(&[0x76]);
    assert_eq!(gg.cpu.pc, 0x0000);
    assert_eq!(gg.cpu.sp, 0xDFF0);
    assert_eq!(gg.cpu.a, 0xFF);
    assert_eq!(gg.cpu.im, 1);
    assert!(!gg.cpu.iff1);
    assert_eq!(gg.mmu.read_byte(0xC123), 0xFF); // RAM filled with 0xFF
    assert_eq!(gg.mmu.slot_banks(), [Some(0), Some(1), Some(2)]);
    assert!(gg.get_exception().is_none());
}

#[test]
fn slot_remap_via_a_running_program() {
    // LD A, 3; LD (0xFFFE), A; LD A, (0x4000); HALT
    let mut gg = machine_with_program(&[
        0x3E, 0x03, //
        0x32, 0xFE, 0xFF, //
        0x3A, 0x00, 0x40, //
        0x76,
    ]);
    run_until_halt(&mut gg);
    assert_eq!(gg.cpu.a, 3);
}

#[test]
fn ram_mirror_via_a_running_program() {
    // LD A, 0x42; LD (0xC000), A; LD A, (0xE000); HALT
    let mut gg = machine_with_program(&[
        0x3E, 0x42, //
        0x32, 0x00, 0xC0, //
        0x3A, 0x00, 0xE0, //
        0x76,
    ]);
    run_until_halt(&mut gg);
    assert_eq!(gg.cpu.a, 0x42);
}

#[test]
fn block_move_from_rom_to_ram() {
    // LD HL, 0x8000; LD DE, 0xC000; LD BC, 0x0010; LDIR; HALT
    let program = [
        0x21, 0x00, 0x80, //
        0x11, 0x00, 0xC0, //
        0x01, 0x10, 0x00, //
        0xED, 0xB0, //
        0x76,
    ];
    // Bank 2 sits at 0x8000 and needs ascending bytes
    let mut data = vec![0u8; 64 * BANK_SIZE];
    for i in 0..0x10 {
        data[2 * BANK_SIZE + i] = i as u8;
    }
    data[..program.len()].copy_from_slice(&program);

    let mut gg = GameGear::new();
    gg.load(&Rom::new(data).unwrap());
    gg.power(true);
    run_until_halt(&mut gg);

    for i in 0..0x10u16 {
        assert_eq!(gg.mmu.read_byte(0xC000 + i), i as u8);
    }
    assert_eq!(gg.cpu.bc(), 0);
    assert_eq!(gg.cpu.hl(), 0x8010);
    assert_eq!(gg.cpu.de(), 0xC010);
}

#[test]
fn fetch_across_a_slot_boundary_uses_each_slots_mapping() {
    // JP 0x3FFF lands on an LD A, n whose opcode is the last byte of
    // slot 0 and whose operand is the first byte of slot 1.
    let mut data = vec![0u8; 64 * BANK_SIZE];
    for bank in 1..64 {
        data[bank * BANK_SIZE..(bank + 1) * BANK_SIZE].fill(bank as u8);
    }
    data[0] = 0xC3; // JP 0x3FFF
    data[1] = 0xFF;
    data[2] = 0x3F;
    data[0x3FFF] = 0x3E; // LD A, n

    let mut gg = GameGear::new();
    gg.load(&Rom::new(data).unwrap());
    gg.power(true);

    run_steps(&mut gg, 2); // JP; LD A, (first byte of slot 1)
    assert_eq!(gg.cpu.a, 0x01);
    assert_eq!(gg.cpu.pc, 0x4001);

    // Remap slot 1 and fetch the same instruction again: the operand now
    // comes from the new bank.
    gg.mmu.write_byte(0xFFFE, 5);
    gg.cpu.pc = 0x3FFF;
    run_steps(&mut gg, 1);
    assert_eq!(gg.cpu.a, 0x05);
}

#[test]
fn im1_interrupt_entry_is_exact() {
    let mut gg = machine_with_program(&[0x00; 0x200]);
    gg.cpu.pc = 0x0100;
    gg.cpu.sp = 0xDFF0;
    gg.cpu.iff1 = true;
    gg.cpu.im = 1;
    gg.cpu.irq(0xFF);

    let mut bus = GgBus {
        mmu: &mut gg.mmu,
        vdp: &mut gg.vdp,
        psg: &mut gg.psg,
        io: &mut gg.io,
    };
    gg.cpu.step(&mut bus);

    assert_eq!(gg.cpu.sp, 0xDFEE);
    assert_eq!(gg.mmu.read_byte(0xDFEE), 0x00);
    assert_eq!(gg.mmu.read_byte(0xDFEF), 0x01);
    assert_eq!(gg.cpu.pc, 0x0038);
    assert!(!gg.cpu.iff1);
}

#[test]
fn vblank_interrupt_reaches_the_handler() {
    // Enable the VDP frame interrupt through the control port, unmask the
    // CPU and halt; the handler at 0x38 proves delivery by setting A.
    let mut program = vec![0u8; 0x100];
    let setup = [
        0x3E, 0x60, // LD A, 0x60
        0xD3, 0xBF, // OUT (0xBF), A    ; control low byte
        0x3E, 0x81, // LD A, 0x81
        0xD3, 0xBF, // OUT (0xBF), A    ; register 1 <- 0x60
        0xED, 0x56, // IM 1
        0xFB, // EI
        0x76, // HALT
    ];
    program[..setup.len()].copy_from_slice(&setup);
    program[0x38] = 0x3E; // LD A, 0x99
    program[0x39] = 0x99;
    program[0x3A] = 0x76; // HALT

    let mut gg = machine_with_program(&program);
    assert!(!gg.run_frame());
    assert_eq!(gg.cpu.a, 0x99);
}

#[test]
fn frame_budget_bounds_each_slice() {
    let mut gg = machine_with_program(&[0x76]); // HALT forever
    assert!(!gg.run_frame());
    let after_one = gg.cpu.cycles;
    assert!(after_one >= T_STATES_PER_FRAME);
    // A halted CPU overshoots by at most one instruction
    assert!(after_one < T_STATES_PER_FRAME + 4);
}

#[test]
fn simulate_counts_frames_and_honors_power_off() {
    let mut gg = machine_with_program(&[0x76]);
    gg.attach_callback(|gg| {
        if gg.frame_count() == 2 {
            gg.power_off();
        }
    });
    let start = Instant::now();
    assert!(!gg.simulate());
    assert_eq!(gg.frame_count(), 2);
    assert!(start.elapsed() < Duration::from_secs(2));
    assert!(gg.get_exception().is_none());
}

#[test]
fn power_switch_stops_simulate_from_another_thread() {
    let mut gg = machine_with_program(&[0x00; 16]); // NOP loop via wraparound
    let switch = gg.power_switch();
    assert!(switch.is_on());

    let requester = thread::spawn(move || {
        thread::sleep(Duration::from_millis(10));
        switch.power_off();
    });

    let start = Instant::now();
    assert!(!gg.simulate());
    requester.join().unwrap();
    assert!(start.elapsed() < Duration::from_secs(2));
    assert!(gg.get_exception().is_none());
    assert!(!gg.power_switch().is_on());
}

#[test]
fn cpu_exception_surfaces_through_simulate() {
    let mut gg = machine_with_program(&[0xED, 0x00]);
    assert!(gg.simulate());
    let message = gg.get_exception().unwrap();
    assert!(message.starts_with("unimplemented opcode 0x00"));
}

#[test]
fn exception_buffer_is_bounded() {
    let mut gg = GameGear::new();
    let long = "x".repeat(4 * EXCEPTION_BUFFER_SIZE);
    gg.record_exception(&long);
    assert_eq!(gg.get_exception().unwrap().len(), EXCEPTION_BUFFER_SIZE);
}

#[test]
fn power_cycle_clears_the_exception() {
    let mut gg = machine_with_program(&[0xED, 0x00]);
    assert!(gg.simulate());
    assert!(gg.get_exception().is_some());
    gg.power(true);
    assert!(gg.get_exception().is_none());
}

#[test]
fn display_buffer_receives_each_frame() {
    let mut gg = machine_with_program(&[0x76]);
    let display = create_display_buffer();
    gg.attach_display(Rc::clone(&display));
    gg.attach_callback(|gg| gg.power_off());
    assert!(!gg.simulate());
    // The blanked display renders the backdrop color everywhere
    let pixels = display.borrow();
    assert_eq!(pixels.len(), FRAME_WIDTH * FRAME_HEIGHT);
    assert!(pixels.iter().all(|&p| p == 0xFF00_0000));
}

#[test]
fn detach_unbinds_callback_and_display() {
    let mut gg = machine_with_program(&[0x76]);
    gg.attach_callback(|_| panic!("detached callback ran"));
    gg.attach_display(create_display_buffer());
    gg.detach();
    let switch = gg.power_switch();
    gg.attach_callback(move |_| switch.power_off());
    assert!(!gg.simulate());
}

#[test]
fn simulate_refuses_reentry_from_a_callback() {
    let mut gg = machine_with_program(&[0x76]);
    gg.attach_callback(|gg| {
        assert!(!gg.simulate()); // immediately refused
        gg.power_off();
    });
    assert!(!gg.simulate());
    assert_eq!(gg.frame_count(), 1);
}

#[test]
fn debuggable_state_reflects_the_machine() {
    let gg = machine_with_program(&[0x76]);
    let state = gg.read_state();
    assert_eq!(state["powered"], true);
    assert_eq!(state["cpu"]["sp"], 0xDFF0);
    assert_eq!(state["mmu"]["slots"][2], 2);
}
