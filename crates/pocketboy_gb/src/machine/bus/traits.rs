use super::{AddressRange, BusError};

/// A block of bytes the bus can route accesses to.
///
/// Addresses passed in are absolute bus addresses; a device works out its
/// own offsets from the ranges it reported and answers
/// [`BusError::OutOfRange`] for anything else.
pub trait MemoryDevice {
    /// Short name used in diagnostics.
    fn name(&self) -> &'static str;

    /// Ranges the device wants mapped.
    fn address_ranges(&self) -> Vec<AddressRange>;

    fn read_byte(&self, address: u16) -> Result<u8, BusError>;

    fn write_byte(&mut self, address: u16, value: u8) -> Result<(), BusError>;

    fn read_word(&self, address: u16) -> Result<u16, BusError> {
        let lo = self.read_byte(address)?;
        let hi = self.read_byte(address.wrapping_add(1))?;
        Ok(u16::from_le_bytes([lo, hi]))
    }

    fn write_word(&mut self, address: u16, value: u16) -> Result<(), BusError> {
        let [lo, hi] = value.to_le_bytes();
        self.write_byte(address, lo)?;
        self.write_byte(address.wrapping_add(1), hi)
    }
}
