//! Paging memory management unit.

use log::{debug, log_enabled, warn, Level};

use super::{BANK_SIZE, NUM_BANKS, NUM_SLOTS, SYSTEM_RAM_SIZE};

/// The Game Gear MMU: system RAM, the table of ROM banks, and the three
/// pageable slots.
///
/// Banks and slots are stored as byte offsets into the owned ROM image
/// rather than as references into it; offsets keep the borrow checker out
/// of the per-access hot path and make an unmapped entry a plain `None`.
pub struct Mmu {
    system_ram: [u8; SYSTEM_RAM_SIZE],
    rom: Vec<u8>,
    rom_banks: [Option<usize>; NUM_BANKS],
    map_slots: [Option<usize>; NUM_SLOTS],
}

impl Mmu {
    pub fn new() -> Self {
        Self {
            system_ram: [0; SYSTEM_RAM_SIZE],
            rom: Vec::new(),
            rom_banks: [None; NUM_BANKS],
            map_slots: [None; NUM_SLOTS],
        }
    }

    /// Load a block of cartridge ROM.
    ///
    /// The image length must be a multiple of the 16 KiB bank size, or the
    /// load fails silently (malformed payloads are the loader's problem).
    /// Images shorter than the 64-bank table are mirrored by modular
    /// repetition; anything past 64 banks is ignored. A bank count that is
    /// not a power of two leaves the mirroring non-uniform, which real
    /// mappers handle unpredictably too.
    pub fn load_rom(&mut self, image: &[u8]) {
        if image.is_empty() || image.len() % BANK_SIZE != 0 {
            warn!(
                "refusing ROM image of {} bytes (not a multiple of 16 KiB)",
                image.len()
            );
            return;
        }

        let mut banks = image.len() / BANK_SIZE;
        if banks > NUM_BANKS {
            warn!("ROM image has {} banks; ignoring all past {}", banks, NUM_BANKS);
            banks = NUM_BANKS;
        }
        if !banks.is_power_of_two() {
            warn!("ROM bank count {} is not a power of two; mirroring is uneven", banks);
        }

        self.rom = image.to_vec();
        for bank in 0..banks {
            for mirror in (bank..NUM_BANKS).step_by(banks) {
                self.rom_banks[mirror] = Some(bank * BANK_SIZE);
            }
        }

        if log_enabled!(Level::Debug) {
            self.dump_bank_table();
        }
    }

    /// Power on: map slots 0/1/2 to banks 0/1/2 and fill RAM with 0xFF.
    ///
    /// Must run before memory is accessed. With no ROM loaded the paged
    /// regions read as 0xFF and refuse writes.
    pub fn power_on(&mut self) {
        for slot in 0..NUM_SLOTS {
            self.map_slot(slot, slot);
        }
        self.system_ram.fill(0xFF);
    }

    /// Map a pageable slot to a ROM bank.
    fn map_slot(&mut self, slot: usize, bank: usize) {
        debug!("MMU mapping memory slot {} to bank 0x{:02X}", slot, bank);
        self.map_slots[slot] = self.rom_banks[bank];
    }

    fn bank_byte(&self, base: Option<usize>, offset: u16) -> u8 {
        match base {
            Some(base) => self.rom.get(base + offset as usize).copied().unwrap_or(0xFF),
            None => 0xFF,
        }
    }

    /// Read one byte. Unmapped banks read as 0xFF; no side effects.
    pub fn read_byte(&self, addr: u16) -> u8 {
        if addr < 0x0400 {
            // First kilobyte is unpaged so the interrupt vectors can't move
            self.bank_byte(self.rom_banks[0], addr)
        } else if addr < 0x4000 {
            self.bank_byte(self.map_slots[0], addr)
        } else if addr < 0x8000 {
            self.bank_byte(self.map_slots[1], addr - 0x4000)
        } else if addr < 0xC000 {
            self.bank_byte(self.map_slots[2], addr - 0x8000)
        } else if addr < 0xE000 {
            self.system_ram[(addr - 0xC000) as usize]
        } else {
            self.system_ram[(addr - 0xE000) as usize]
        }
    }

    /// Little-endian 16-bit read; the address wraps modulo 2^16.
    pub fn read_word(&self, addr: u16) -> u16 {
        let low = self.read_byte(addr) as u16;
        let high = self.read_byte(addr.wrapping_add(1)) as u16;
        (high << 8) | low
    }

    /// Little-endian 32-bit read, for diagnostic dumps only.
    pub fn read_dword(&self, addr: u16) -> u32 {
        let low = self.read_word(addr) as u32;
        let high = self.read_word(addr.wrapping_add(2)) as u32;
        (high << 16) | low
    }

    /// Write one byte. Returns false when the target is read-only.
    ///
    /// Stores into the RAM mirror additionally drive the paging control
    /// registers; the remap takes effect for the next memory access.
    pub fn write_byte(&mut self, addr: u16, value: u8) -> bool {
        if addr < 0xC000 {
            false
        } else if addr < 0xE000 {
            self.system_ram[(addr - 0xC000) as usize] = value;
            true
        } else {
            match addr {
                0xFFFC => super::warn_cartridge_ram_control(value),
                0xFFFD => self.map_slot(0, (value & 0x3F) as usize),
                0xFFFE => self.map_slot(1, (value & 0x3F) as usize),
                0xFFFF => self.map_slot(2, (value & 0x3F) as usize),
                _ => {}
            }
            self.system_ram[(addr - 0xE000) as usize] = value;
            true
        }
    }

    /// Little-endian 16-bit write, low byte first. True iff both stores
    /// took effect.
    pub fn write_word(&mut self, addr: u16, value: u16) -> bool {
        let low = self.write_byte(addr, value as u8);
        let high = self.write_byte(addr.wrapping_add(1), (value >> 8) as u8);
        low && high
    }

    pub fn rom_len(&self) -> usize {
        self.rom.len()
    }

    /// Bank number currently mapped into each slot, for diagnostics.
    pub fn slot_banks(&self) -> [Option<usize>; NUM_SLOTS] {
        self.map_slots.map(|slot| slot.map(|offset| offset / BANK_SIZE))
    }

    /// Log the full bank mapping table, eight banks per line.
    pub fn dump_bank_table(&self) {
        debug!("Dumping MMU bank table:");
        for group in 0..NUM_BANKS / 8 {
            let line: Vec<String> = (0..8)
                .map(|elem| {
                    let bank = 8 * group + elem;
                    match self.rom_banks[bank] {
                        Some(offset) => format!("{:02X}={:02X}", bank, offset >> 14),
                        None => format!("{:02X}=--", bank),
                    }
                })
                .collect();
            debug!("- {}", line.join(" "));
        }
    }
}

impl Default for Mmu {
    fn default() -> Self {
        Self::new()
    }
}
