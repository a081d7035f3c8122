//! ROM loading, bank mirroring and slot paging tests.

use super::{Mmu, BANK_SIZE};

/// 64 KiB image with every byte of bank `k` set to `k`.
fn banked_rom(banks: usize) -> Vec<u8> {
    let mut rom = vec![0u8; banks * BANK_SIZE];
    for bank in 0..banks {
        rom[bank * BANK_SIZE..(bank + 1) * BANK_SIZE].fill(bank as u8);
    }
    rom
}

fn mmu_with_banks(banks: usize) -> Mmu {
    let mut mmu = Mmu::new();
    mmu.load_rom(&banked_rom(banks));
    mmu.power_on();
    mmu
}

#[test]
fn power_on_maps_first_three_banks() {
    let mmu = mmu_with_banks(4);
    assert_eq!(mmu.read_byte(0x0000), 0);
    assert_eq!(mmu.read_byte(0x0400), 0);
    assert_eq!(mmu.read_byte(0x3FFF), 0);
    assert_eq!(mmu.read_byte(0x4000), 1);
    assert_eq!(mmu.read_byte(0x7FFF), 1);
    assert_eq!(mmu.read_byte(0x8000), 2);
    assert_eq!(mmu.read_byte(0xBFFF), 2);
}

#[test]
fn first_kilobyte_never_pages_out() {
    let mut mmu = mmu_with_banks(4);
    mmu.write_byte(0xFFFD, 3);
    assert_eq!(mmu.read_byte(0x0000), 0);
    assert_eq!(mmu.read_byte(0x03FF), 0);
    assert_eq!(mmu.read_byte(0x0400), 3);
}

#[test]
fn control_registers_remap_each_slot() {
    let mut mmu = mmu_with_banks(4);
    mmu.write_byte(0xFFFD, 3);
    assert_eq!(mmu.read_byte(0x0400), 3);
    mmu.write_byte(0xFFFE, 3);
    assert_eq!(mmu.read_byte(0x4000), 3);
    mmu.write_byte(0xFFFF, 1);
    assert_eq!(mmu.read_byte(0x8000), 1);
}

#[test]
fn bank_select_masks_to_six_bits() {
    let mut mmu = mmu_with_banks(4);
    // 0x43 & 0x3F = 3
    mmu.write_byte(0xFFFE, 0x43);
    assert_eq!(mmu.read_byte(0x4000), 3);
}

#[test]
fn short_rom_mirrors_by_modular_repetition() {
    let mut mmu = mmu_with_banks(2);
    // Bank 5 resolves to image bank 5 mod 2 = 1.
    mmu.write_byte(0xFFFF, 5);
    assert_eq!(mmu.read_byte(0x8000), 1);
    // Bank 63 resolves to image bank 1 as well.
    mmu.write_byte(0xFFFF, 63);
    assert_eq!(mmu.read_byte(0x8000), 1);
    mmu.write_byte(0xFFFF, 62);
    assert_eq!(mmu.read_byte(0x8000), 0);
}

#[test]
fn every_bank_index_resolves_modulo_image_banks() {
    let mut mmu = mmu_with_banks(4);
    for bank in 0..64u8 {
        mmu.write_byte(0xFFFF, bank);
        assert_eq!(mmu.read_byte(0x8000), bank % 4);
    }
}

#[test]
fn unmapped_banks_read_ff_and_refuse_writes() {
    let mut mmu = Mmu::new();
    mmu.power_on();
    assert_eq!(mmu.read_byte(0x0000), 0xFF);
    assert_eq!(mmu.read_byte(0x4000), 0xFF);
    assert_eq!(mmu.read_byte(0xBFFF), 0xFF);
    assert!(!mmu.write_byte(0x0000, 0x42));
    assert!(!mmu.write_byte(0x8000, 0x42));
    assert_eq!(mmu.read_byte(0x0000), 0xFF);
}

#[test]
fn rom_write_is_denied() {
    let mut mmu = mmu_with_banks(4);
    assert!(!mmu.write_byte(0x1234, 0x42));
    assert_eq!(mmu.read_byte(0x1234), 0);
}

#[test]
fn misaligned_image_is_ignored() {
    let mut mmu = Mmu::new();
    mmu.load_rom(&vec![0xAA; BANK_SIZE + 1]);
    mmu.power_on();
    assert_eq!(mmu.read_byte(0x0000), 0xFF);
    assert_eq!(mmu.rom_len(), 0);
}

#[test]
fn empty_image_is_ignored() {
    let mut mmu = Mmu::new();
    mmu.load_rom(&[]);
    mmu.power_on();
    assert_eq!(mmu.read_byte(0x0000), 0xFF);
}

#[test]
fn banks_past_sixty_four_are_ignored() {
    let mut rom = vec![0u8; 65 * BANK_SIZE];
    for bank in 0..65 {
        rom[bank * BANK_SIZE] = bank as u8;
    }
    let mut mmu = Mmu::new();
    mmu.load_rom(&rom);
    mmu.power_on();
    mmu.write_byte(0xFFFF, 63);
    assert_eq!(mmu.read_byte(0x8000), 63);
}

#[test]
fn read_word_is_little_endian_and_wraps() {
    let mut mmu = mmu_with_banks(4);
    mmu.write_byte(0xC000, 0x34);
    mmu.write_byte(0xC001, 0x12);
    assert_eq!(mmu.read_word(0xC000), 0x1234);

    // 0xFFFF wraps to 0x0000, which reads from ROM bank 0.
    mmu.write_byte(0xFFFF, 0x12);
    assert_eq!(mmu.read_word(0xFFFF), 0x0012);
}

#[test]
fn read_dword_is_little_endian() {
    let mut mmu = mmu_with_banks(4);
    for (i, byte) in [0x78, 0x56, 0x34, 0x12].iter().enumerate() {
        mmu.write_byte(0xC000 + i as u16, *byte);
    }
    assert_eq!(mmu.read_dword(0xC000), 0x12345678);
}

#[test]
fn write_word_reports_partial_failure() {
    let mut mmu = mmu_with_banks(4);
    // Low byte lands on ROM, high byte lands in RAM.
    assert!(!mmu.write_word(0xBFFF, 0xBEEF));
    assert_eq!(mmu.read_byte(0xBFFF), 2);
    assert_eq!(mmu.read_byte(0xC000), 0xBE);

    assert!(mmu.write_word(0xC100, 0xCAFE));
    assert_eq!(mmu.read_word(0xC100), 0xCAFE);
}

#[test]
fn slot_banks_reports_current_mapping() {
    let mut mmu = mmu_with_banks(4);
    assert_eq!(mmu.slot_banks(), [Some(0), Some(1), Some(2)]);
    mmu.write_byte(0xFFFF, 3);
    assert_eq!(mmu.slot_banks(), [Some(0), Some(1), Some(3)]);
}
