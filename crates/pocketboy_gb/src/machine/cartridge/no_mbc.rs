use crate::machine::{AddressRange, BusError};

use super::BankController;

/// Flat 32 KiB ROM with no banking.
#[derive(Clone, Debug)]
pub struct NoMbc {
    rom: Vec<u8>,
}

impl NoMbc {
    /// Cartridge type byte of a mapper-less cartridge.
    pub const KIND: u8 = 0x00;
    pub const RANGE: AddressRange = AddressRange::new(0x0000, 0x7FFF);

    pub fn new(rom: Vec<u8>) -> Self {
        Self { rom }
    }
}

impl BankController for NoMbc {
    fn address_ranges(&self) -> Vec<AddressRange> {
        vec![Self::RANGE]
    }

    fn data(&self) -> &[u8] {
        &self.rom
    }

    fn read_byte(&self, address: u16) -> Result<u8, BusError> {
        let offset = Self::RANGE.offset(address).ok_or(BusError::OutOfRange {
            device: "cartridge",
            address,
        })?;
        // Open bus past the end of a short image.
        Ok(self.rom.get(offset).copied().unwrap_or(0xFF))
    }

    fn write_byte(&mut self, address: u16, _value: u8) -> Result<(), BusError> {
        if Self::RANGE.contains(address) {
            Err(BusError::ReadOnly {
                device: "cartridge",
                address,
            })
        } else {
            Err(BusError::OutOfRange {
                device: "cartridge",
                address,
            })
        }
    }
}
