use super::{AddressRange, BusError, MemoryDevice};

/// Plain read/write memory exposed over one or more ranges.
///
/// Every range indexes the same backing store from its own start, which is
/// how echo RAM mirrors work RAM.
#[derive(Clone, Debug)]
pub struct Ram {
    name: &'static str,
    ranges: Vec<AddressRange>,
    data: Vec<u8>,
}

impl Ram {
    pub const VRAM: AddressRange = AddressRange::new(0x8000, 0x9FFF);
    pub const WRAM: AddressRange = AddressRange::new(0xC000, 0xDFFF);
    pub const ECHO: AddressRange = AddressRange::new(0xE000, 0xFDFF);
    pub const HRAM: AddressRange = AddressRange::new(0xFF80, 0xFFFE);

    /// Backing store is as large as the largest range; all start zeroed.
    pub fn new(name: &'static str, ranges: Vec<AddressRange>) -> Self {
        let size = ranges.iter().map(AddressRange::size).max().unwrap_or(0);
        Self {
            name,
            ranges,
            data: vec![0; size],
        }
    }

    pub fn video() -> Self {
        Self::new("vram", vec![Self::VRAM])
    }

    /// Work RAM plus its echo, which mirrors the first 0x1E00 bytes.
    pub fn work() -> Self {
        Self::new("wram", vec![Self::WRAM, Self::ECHO])
    }

    pub fn high() -> Self {
        Self::new("hram", vec![Self::HRAM])
    }

    fn index(&self, address: u16) -> Result<usize, BusError> {
        self.ranges
            .iter()
            .find_map(|range| range.offset(address))
            .ok_or(BusError::OutOfRange {
                device: self.name,
                address,
            })
    }
}

impl MemoryDevice for Ram {
    fn name(&self) -> &'static str {
        self.name
    }

    fn address_ranges(&self) -> Vec<AddressRange> {
        self.ranges.clone()
    }

    fn read_byte(&self, address: u16) -> Result<u8, BusError> {
        Ok(self.data[self.index(address)?])
    }

    fn write_byte(&mut self, address: u16, value: u8) -> Result<(), BusError> {
        let index = self.index(address)?;
        self.data[index] = value;
        Ok(())
    }
}
