use thiserror::Error;

use super::{AddressRange, BusError, MemoryDevice};

mod header;
mod no_mbc;

pub use header::Header;
pub use no_mbc::NoMbc;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CartridgeError {
    #[error("ROM image is {len} bytes, too small to hold a cartridge header")]
    TooSmall { len: usize },
    #[error("unsupported cartridge type 0x{kind:02X}")]
    Unsupported { kind: u8 },
}

/// Memory bank controller of a cartridge.
///
/// Only the flat, mapper-less layout exists today; banked mappers slot in as
/// further implementations.
pub trait BankController {
    fn address_ranges(&self) -> Vec<AddressRange>;
    /// Full ROM image.
    fn data(&self) -> &[u8];
    fn read_byte(&self, address: u16) -> Result<u8, BusError>;
    fn write_byte(&mut self, address: u16, value: u8) -> Result<(), BusError>;
}

/// A loaded cartridge: parsed header plus the controller serving its bytes.
pub struct Cartridge {
    header: Header,
    controller: Box<dyn BankController>,
}

impl Cartridge {
    /// Parse the header and pick the bank controller named at 0x147.
    pub fn new(rom: Vec<u8>) -> Result<Self, CartridgeError> {
        let header = Header::parse(&rom)?;
        let controller: Box<dyn BankController> = match header.kind {
            NoMbc::KIND => Box::new(NoMbc::new(rom)),
            kind => return Err(CartridgeError::Unsupported { kind }),
        };

        match header.checksum_ok(controller.data()) {
            Some(false) => log::warn!(
                "cartridge '{}': header checksum mismatch (stored 0x{:02X})",
                header.title,
                header.header_checksum.unwrap_or_default(),
            ),
            Some(true) => log::debug!("cartridge '{}': header checksum ok", header.title),
            None => log::debug!("cartridge '{}': image too short for a checksum", header.title),
        }

        Ok(Self { header, controller })
    }

    pub fn title(&self) -> &str {
        &self.header.title
    }

    pub fn header(&self) -> &Header {
        &self.header
    }

    pub fn rom(&self) -> &[u8] {
        self.controller.data()
    }
}

impl std::fmt::Debug for Cartridge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Cartridge")
            .field("header", &self.header)
            .field("len", &self.controller.data().len())
            .finish()
    }
}

impl MemoryDevice for Cartridge {
    fn name(&self) -> &'static str {
        "cartridge"
    }

    fn address_ranges(&self) -> Vec<AddressRange> {
        self.controller.address_ranges()
    }

    fn read_byte(&self, address: u16) -> Result<u8, BusError> {
        self.controller.read_byte(address)
    }

    fn write_byte(&mut self, address: u16, value: u8) -> Result<(), BusError> {
        self.controller.write_byte(address, value)
    }
}
