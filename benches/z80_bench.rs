//! CPU interpreter throughput.

use criterion::{criterion_group, criterion_main, Criterion};

use gearling::memory::{IoInterface, MemoryInterface};
use gearling::Z80;

struct FlatBus {
    mem: Vec<u8>,
}

impl MemoryInterface for FlatBus {
    fn read_byte(&mut self, addr: u16) -> u8 {
        self.mem[addr as usize]
    }

    fn write_byte(&mut self, addr: u16, value: u8) -> bool {
        self.mem[addr as usize] = value;
        true
    }
}

impl IoInterface for FlatBus {
    fn read_port(&mut self, _port: u16) -> u8 {
        0xFF
    }

    fn write_port(&mut self, _port: u16, _value: u8) {}
}

/// A tight mixed workload: 16-bit loads, ALU, a memory store and a
/// backwards jump.
const PROGRAM: &[u8] = &[
    0x21, 0x00, 0xC0, // LD HL, 0xC000
    0x06, 0x10, // LD B, 0x10
    0x3E, 0x00, // LD A, 0x00
    0xC6, 0x07, // ADD A, 0x07
    0x77, // LD (HL), A
    0x23, // INC HL
    0x10, 0xFA, // DJNZ -6
    0xC3, 0x00, 0x00, // JP 0x0000
];

fn bench_step(c: &mut Criterion) {
    c.bench_function("z80_step_mixed", |b| {
        let mut bus = FlatBus {
            mem: vec![0; 0x10000],
        };
        bus.mem[..PROGRAM.len()].copy_from_slice(PROGRAM);
        let mut cpu = Z80::new();
        cpu.sp = 0xFF00;
        b.iter(|| {
            let mut total = 0u64;
            for _ in 0..1000 {
                total += cpu.step(&mut bus) as u64;
            }
            total
        });
    });
}

criterion_group!(benches, bench_step);
criterion_main!(benches);
