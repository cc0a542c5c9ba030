use bitflags::bitflags;

use crate::machine::{AddressRange, BusError, MemoryDevice};

mod service;

bitflags! {
    /// Interrupt sources, one bit each in IE ($FFFF) and IF ($FF0F).
    ///
    /// Declaration order is the service priority.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct Interrupt: u8 {
        const VBLANK = 1 << 0;
        const LCD_STAT = 1 << 1;
        const TIMER = 1 << 2;
        const SERIAL = 1 << 3;
        const JOYPAD = 1 << 4;
    }
}

impl Interrupt {
    /// Handler address of a single source: `0x40 + 8 * bit`.
    pub fn vector(self) -> u16 {
        0x0040 + 8 * self.bits().trailing_zeros() as u16
    }
}

/// IE and IF, plus the accessors the picture unit uses to post requests.
#[derive(Clone, Debug, Default)]
pub struct InterruptController {
    enable: u8,
    requested: Interrupt,
}

impl InterruptController {
    pub const IF_ADDRESS: u16 = 0xFF0F;
    pub const IE_ADDRESS: u16 = 0xFFFF;

    pub fn new() -> Self {
        Self::default()
    }

    pub fn request(&mut self, interrupt: Interrupt) {
        self.requested |= interrupt;
    }

    pub fn clear(&mut self, interrupt: Interrupt) {
        self.requested.remove(interrupt);
    }

    pub fn enabled(&self) -> Interrupt {
        Interrupt::from_bits_truncate(self.enable)
    }

    pub fn requested(&self) -> Interrupt {
        self.requested
    }

    /// Sources that are both enabled and requested (`IE & IF & 0x1F`).
    pub fn pending(&self) -> Interrupt {
        self.enabled() & self.requested
    }
}

impl MemoryDevice for InterruptController {
    fn name(&self) -> &'static str {
        "interrupts"
    }

    fn address_ranges(&self) -> Vec<AddressRange> {
        vec![
            AddressRange::new(Self::IF_ADDRESS, Self::IF_ADDRESS),
            AddressRange::new(Self::IE_ADDRESS, Self::IE_ADDRESS),
        ]
    }

    fn read_byte(&self, address: u16) -> Result<u8, BusError> {
        match address {
            // The three unused IF bits read back as 1.
            Self::IF_ADDRESS => Ok(0xE0 | self.requested.bits()),
            Self::IE_ADDRESS => Ok(self.enable),
            _ => Err(BusError::OutOfRange {
                device: self.name(),
                address,
            }),
        }
    }

    fn write_byte(&mut self, address: u16, value: u8) -> Result<(), BusError> {
        match address {
            Self::IF_ADDRESS => self.requested = Interrupt::from_bits_truncate(value),
            Self::IE_ADDRESS => self.enable = value,
            _ => {
                return Err(BusError::OutOfRange {
                    device: self.name(),
                    address,
                })
            }
        }
        Ok(())
    }
}
