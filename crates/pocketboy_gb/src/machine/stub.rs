use super::{AddressRange, BusError, MemoryDevice};

/// Registers of hardware that is not emulated. Reads return a fixed value
/// and writes are dropped, so software that pokes them keeps running.
#[derive(Clone, Debug)]
pub struct InertIo {
    name: &'static str,
    ranges: Vec<AddressRange>,
    value: u8,
}

impl InertIo {
    pub fn new(name: &'static str, ranges: Vec<AddressRange>, value: u8) -> Self {
        Self {
            name,
            ranges,
            value,
        }
    }

    /// Sound registers and wave RAM, $FF10-$FF3F. Reads as zero.
    pub fn sound() -> Self {
        Self::new("sound", vec![AddressRange::new(0xFF10, 0xFF3F)], 0x00)
    }

    /// Joypad, serial and timer ($FF00-$FF0E), the unusable block after OAM
    /// and the I/O tail after the LCD registers. Reads as 0xFF, which is
    /// also "no button pressed" on the joypad port.
    pub fn unused() -> Self {
        Self::new(
            "unused io",
            vec![
                AddressRange::new(0xFEA0, 0xFEFF),
                AddressRange::new(0xFF00, 0xFF0E),
                AddressRange::new(0xFF4C, 0xFF7F),
            ],
            0xFF,
        )
    }

    fn check(&self, address: u16) -> Result<(), BusError> {
        if self.ranges.iter().any(|r| r.contains(address)) {
            Ok(())
        } else {
            Err(BusError::OutOfRange {
                device: self.name,
                address,
            })
        }
    }
}

impl MemoryDevice for InertIo {
    fn name(&self) -> &'static str {
        self.name
    }

    fn address_ranges(&self) -> Vec<AddressRange> {
        self.ranges.clone()
    }

    fn read_byte(&self, address: u16) -> Result<u8, BusError> {
        self.check(address).map(|()| self.value)
    }

    fn write_byte(&mut self, address: u16, value: u8) -> Result<(), BusError> {
        log::trace!("{}: dropped write 0x{:02X} to 0x{:04X}", self.name, value, address);
        self.check(address)
    }
}
