//! System RAM mirror and control-register side effect tests.

use super::{Mmu, BANK_SIZE};

fn mmu_with_full_rom() -> Mmu {
    let mut rom = vec![0u8; 64 * BANK_SIZE];
    for bank in 0..64 {
        rom[bank * BANK_SIZE..(bank + 1) * BANK_SIZE].fill(bank as u8);
    }
    let mut mmu = Mmu::new();
    mmu.load_rom(&rom);
    mmu.power_on();
    mmu
}

#[test]
fn ram_and_mirror_share_storage() {
    let mut mmu = mmu_with_full_rom();
    mmu.write_byte(0xC000, 0x42);
    assert_eq!(mmu.read_byte(0xE000), 0x42);

    mmu.write_byte(0xE123, 0x99);
    assert_eq!(mmu.read_byte(0xC123), 0x99);

    mmu.write_byte(0xDFFF, 0x17);
    assert_eq!(mmu.read_byte(0xFFFF), 0x17);
}

#[test]
fn mirror_holds_for_every_offset() {
    let mut mmu = mmu_with_full_rom();
    for addr in (0xC000u16..0xE000).step_by(0x100) {
        mmu.write_byte(addr, (addr >> 8) as u8);
    }
    for addr in (0xC000u16..0xE000).step_by(0x100) {
        assert_eq!(mmu.read_byte(addr), mmu.read_byte(addr + 0x2000));
    }
}

#[test]
fn paging_write_is_also_a_ram_write() {
    let mut mmu = mmu_with_full_rom();
    // Write 0x7F to 0xFFFF: stored in the mirror, and slot 2 now maps
    // bank 0x3F.
    assert!(mmu.write_byte(0xFFFF, 0x7F));
    assert_eq!(mmu.read_byte(0xDFFF), 0x7F);
    assert_eq!(mmu.read_byte(0x8000), 0x3F);
    assert_eq!(mmu.slot_banks()[2], Some(0x3F));
}

#[test]
fn cartridge_ram_control_is_a_benign_ram_write() {
    let mut mmu = mmu_with_full_rom();
    assert!(mmu.write_byte(0xFFFC, 0x08));
    assert_eq!(mmu.read_byte(0xDFFC), 0x08);
    // No slot changed.
    assert_eq!(mmu.slot_banks(), [Some(0), Some(1), Some(2)]);
}

#[test]
fn remap_takes_effect_for_the_next_access() {
    let mut mmu = mmu_with_full_rom();
    assert_eq!(mmu.read_byte(0x4000), 1);
    mmu.write_byte(0xFFFE, 9);
    assert_eq!(mmu.read_byte(0x4000), 9);
    mmu.write_byte(0xFFFE, 1);
    assert_eq!(mmu.read_byte(0x4000), 1);
}
