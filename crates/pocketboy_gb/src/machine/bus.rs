use std::cell::RefCell;
use std::rc::Rc;

use thiserror::Error;

mod range;
mod traits;

pub use range::AddressRange;
pub use traits::MemoryDevice;

/// Shared handle to a device mapped on the bus.
pub type DeviceHandle = Rc<RefCell<dyn MemoryDevice>>;

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum BusError {
    #[error("address range {requested} overlaps already mapped {existing}")]
    Overlap {
        existing: AddressRange,
        requested: AddressRange,
    },
    #[error("no device mapped at 0x{address:04X}")]
    Unmapped { address: u16 },
    #[error("{device}: 0x{address:04X} is outside the device's ranges")]
    OutOfRange { device: &'static str, address: u16 },
    #[error("{device}: write to read-only address 0x{address:04X}")]
    ReadOnly { device: &'static str, address: u16 },
}

struct Binding {
    range: AddressRange,
    device: DeviceHandle,
}

/// The 16-bit address space.
///
/// Holds non-overlapping range bindings and forwards every access to the
/// device that owns the address. Nothing in the machine reads or writes
/// device memory except through here, so every component sees the same
/// bytes.
#[derive(Default)]
pub struct AddressSpace {
    bindings: Vec<Binding>,
}

impl AddressSpace {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `range` to `device`. Fails if any byte of `range` is already
    /// owned.
    pub fn map(&mut self, range: AddressRange, device: DeviceHandle) -> Result<(), BusError> {
        if let Some(existing) = self.bindings.iter().find(|b| b.range.overlaps(&range)) {
            return Err(BusError::Overlap {
                existing: existing.range,
                requested: range,
            });
        }
        log::trace!("bus: {} -> {}", range, device.borrow().name());
        self.bindings.push(Binding { range, device });
        Ok(())
    }

    /// Map every range `device` reports through
    /// [`MemoryDevice::address_ranges`]. Nothing is mapped if any of them
    /// collides.
    pub fn attach<D: MemoryDevice + 'static>(
        &mut self,
        device: &Rc<RefCell<D>>,
    ) -> Result<(), BusError> {
        let ranges = device.borrow().address_ranges();
        for (i, range) in ranges.iter().enumerate() {
            let clash = self
                .bindings
                .iter()
                .map(|b| b.range)
                .chain(ranges[..i].iter().copied())
                .find(|r| r.overlaps(range));
            if let Some(existing) = clash {
                return Err(BusError::Overlap {
                    existing,
                    requested: *range,
                });
            }
        }
        for range in ranges {
            let handle: DeviceHandle = device.clone();
            self.map(range, handle)?;
        }
        Ok(())
    }

    /// Registered ranges, in mapping order.
    pub fn ranges(&self) -> impl Iterator<Item = AddressRange> + '_ {
        self.bindings.iter().map(|b| b.range)
    }

    fn owner(&self, address: u16) -> Result<&DeviceHandle, BusError> {
        self.bindings
            .iter()
            .find(|b| b.range.contains(address))
            .map(|b| &b.device)
            .ok_or(BusError::Unmapped { address })
    }

    pub fn read_byte(&self, address: u16) -> Result<u8, BusError> {
        self.owner(address)?.borrow().read_byte(address)
    }

    pub fn write_byte(&mut self, address: u16, value: u8) -> Result<(), BusError> {
        self.owner(address)?.borrow_mut().write_byte(address, value)
    }

    /// Little-endian word; each byte goes to its own owner, so a word may
    /// straddle two devices.
    pub fn read_word(&self, address: u16) -> Result<u16, BusError> {
        let lo = self.read_byte(address)?;
        let hi = self.read_byte(address.wrapping_add(1))?;
        Ok(u16::from_le_bytes([lo, hi]))
    }

    pub fn write_word(&mut self, address: u16, value: u16) -> Result<(), BusError> {
        let [lo, hi] = value.to_le_bytes();
        self.write_byte(address, lo)?;
        self.write_byte(address.wrapping_add(1), hi)
    }
}

impl std::fmt::Debug for AddressSpace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut map = f.debug_map();
        for binding in &self.bindings {
            map.entry(&binding.range, &binding.device.borrow().name());
        }
        map.finish()
    }
}
