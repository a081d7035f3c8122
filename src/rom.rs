//! Cartridge ROM loading.
//!
//! Reads `.gg`/`.sms`/`.bin` images from plain files or from zip archives,
//! strips the 512-byte header some copier dumps carry, and enforces the
//! size limits of the paging MMU.

use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

use log::{info, warn};

use crate::memory::{BANK_SIZE, NUM_BANKS};

/// Copier-dump header length.
const COPIER_HEADER: usize = 512;

/// Largest image the 64-bank mapping table can address.
const MAX_ROM_SIZE: usize = BANK_SIZE * NUM_BANKS;

/// ROM file extensions recognized inside zip archives.
const ROM_EXTENSIONS: [&str; 3] = [".gg", ".sms", ".bin"];

/// A loaded cartridge image.
pub struct Rom {
    data: Vec<u8>,
}

impl Rom {
    /// Wrap raw bytes, stripping a copier header when one is present.
    pub fn new(mut data: Vec<u8>) -> io::Result<Self> {
        if data.is_empty() {
            return Err(io::Error::new(io::ErrorKind::InvalidData, "empty ROM image"));
        }
        if data.len() % BANK_SIZE == COPIER_HEADER {
            info!("stripping {}-byte copier header", COPIER_HEADER);
            data.drain(..COPIER_HEADER);
        }
        if data.len() % BANK_SIZE != 0 {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!(
                    "ROM size {} is not a multiple of the 16 KiB bank size",
                    data.len()
                ),
            ));
        }
        if data.len() > MAX_ROM_SIZE {
            warn!(
                "ROM size {} exceeds 1 MiB; truncating to {} banks",
                data.len(),
                NUM_BANKS
            );
            data.truncate(MAX_ROM_SIZE);
        }
        if !(data.len() / BANK_SIZE).is_power_of_two() {
            warn!(
                "ROM bank count {} is not a power of two; mirroring will be uneven",
                data.len() / BANK_SIZE
            );
        }
        Ok(Self { data })
    }

    /// Load a ROM from a file. A `.zip` path is searched for the first
    /// entry with a recognized extension.
    pub fn from_file<P: AsRef<Path>>(path: P) -> io::Result<Self> {
        let path = path.as_ref();
        let data = if path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("zip"))
        {
            Self::read_zip(path)?
        } else {
            let mut file = File::open(path)?;
            let mut data = Vec::new();
            file.read_to_end(&mut data)?;
            data
        };
        let rom = Self::new(data)?;
        info!(
            "loaded ROM {} ({} KiB, {} banks)",
            path.display(),
            rom.data.len() / 1024,
            rom.banks()
        );
        Ok(rom)
    }

    fn read_zip(path: &Path) -> io::Result<Vec<u8>> {
        let file = File::open(path)?;
        let mut archive = zip::ZipArchive::new(file)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;

        for i in 0..archive.len() {
            let mut entry = archive
                .by_index(i)
                .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
            let name = entry.name().to_lowercase();
            if ROM_EXTENSIONS.iter().any(|ext| name.ends_with(ext)) {
                let mut data = Vec::new();
                entry.read_to_end(&mut data)?;
                return Ok(data);
            }
        }
        Err(io::Error::new(
            io::ErrorKind::NotFound,
            "no ROM file found in zip archive",
        ))
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn banks(&self) -> usize {
        self.data.len() / BANK_SIZE
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn plain_image_loads_unchanged() {
        let rom = Rom::new(vec![0xAB; BANK_SIZE]).unwrap();
        assert_eq!(rom.data().len(), BANK_SIZE);
        assert_eq!(rom.banks(), 1);
        assert_eq!(rom.data()[0], 0xAB);
    }

    #[test]
    fn copier_header_is_stripped() {
        let mut data = vec![0x55; COPIER_HEADER];
        data.extend_from_slice(&[0xAA; BANK_SIZE]);
        let rom = Rom::new(data).unwrap();
        assert_eq!(rom.data().len(), BANK_SIZE);
        assert_eq!(rom.data()[0], 0xAA);
    }

    #[test]
    fn misaligned_image_is_rejected() {
        assert!(Rom::new(vec![0; BANK_SIZE + 1]).is_err());
        assert!(Rom::new(Vec::new()).is_err());
    }

    #[test]
    fn oversized_image_is_truncated() {
        let rom = Rom::new(vec![0; MAX_ROM_SIZE + BANK_SIZE]).unwrap();
        assert_eq!(rom.banks(), NUM_BANKS);
    }

    #[test]
    fn loads_from_a_plain_file() {
        let path = std::env::temp_dir().join("gearling_rom_plain.gg");
        std::fs::write(&path, vec![0x42u8; BANK_SIZE]).unwrap();
        let rom = Rom::from_file(&path).unwrap();
        assert_eq!(rom.banks(), 1);
        assert_eq!(rom.data()[0], 0x42);
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn loads_from_a_zip_archive() {
        let path = std::env::temp_dir().join("gearling_rom_archive.zip");
        {
            let file = std::fs::File::create(&path).unwrap();
            let mut archive = zip::ZipWriter::new(file);
            let options = zip::write::SimpleFileOptions::default();
            archive.start_file("notes.txt", options).unwrap();
            archive.write_all(b"not a rom").unwrap();
            archive.start_file("game.gg", options).unwrap();
            archive.write_all(&vec![0x99u8; BANK_SIZE]).unwrap();
            archive.finish().unwrap();
        }
        let rom = Rom::from_file(&path).unwrap();
        assert_eq!(rom.banks(), 1);
        assert_eq!(rom.data()[0], 0x99);
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn zip_without_a_rom_is_an_error() {
        let path = std::env::temp_dir().join("gearling_rom_empty.zip");
        {
            let file = std::fs::File::create(&path).unwrap();
            let mut archive = zip::ZipWriter::new(file);
            let options = zip::write::SimpleFileOptions::default();
            archive.start_file("readme.md", options).unwrap();
            archive.write_all(b"nothing here").unwrap();
            archive.finish().unwrap();
        }
        assert!(Rom::from_file(&path).is_err());
        let _ = std::fs::remove_file(&path);
    }
}
