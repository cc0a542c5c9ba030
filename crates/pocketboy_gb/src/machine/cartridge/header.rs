use std::ops::RangeInclusive;

use super::CartridgeError;

const TITLE: RangeInclusive<usize> = 0x134..=0x143;
const KIND: usize = 0x147;
const ROM_SIZE: usize = 0x148;
const RAM_SIZE: usize = 0x149;
const HEADER_CHECKSUM: usize = 0x14D;

/// Shortest image that still carries the cartridge type byte.
pub const MIN_ROM_LEN: usize = KIND + 1;

/// Decoded cartridge header fields.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Header {
    pub title: String,
    /// Bank controller selector at 0x147.
    pub kind: u8,
    pub rom_size: Option<u8>,
    pub ram_size: Option<u8>,
    pub header_checksum: Option<u8>,
}

impl Header {
    pub fn parse(rom: &[u8]) -> Result<Self, CartridgeError> {
        if rom.len() < MIN_ROM_LEN {
            return Err(CartridgeError::TooSmall { len: rom.len() });
        }

        // The title ends at the first NUL or at the end of the field.
        let field = &rom[TITLE];
        let end = field.iter().position(|&b| b == 0).unwrap_or(field.len());
        let title = String::from_utf8_lossy(&field[..end]).into_owned();

        Ok(Self {
            title,
            kind: rom[KIND],
            rom_size: rom.get(ROM_SIZE).copied(),
            ram_size: rom.get(RAM_SIZE).copied(),
            header_checksum: rom.get(HEADER_CHECKSUM).copied(),
        })
    }

    /// Checksum over 0x134..=0x14C, as the boot ROM computes it.
    pub fn compute_checksum(rom: &[u8]) -> Option<u8> {
        let bytes = rom.get(0x134..=0x14C)?;
        Some(
            bytes
                .iter()
                .fold(0u8, |acc, &b| acc.wrapping_sub(b).wrapping_sub(1)),
        )
    }

    /// `None` when the image is too short to hold the checksum byte.
    pub fn checksum_ok(&self, rom: &[u8]) -> Option<bool> {
        let stored = self.header_checksum?;
        Self::compute_checksum(rom).map(|computed| computed == stored)
    }
}
