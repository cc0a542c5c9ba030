use std::fmt;

/// Inclusive `[start, end]` span of the 16-bit address space.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct AddressRange {
    start: u16,
    end: u16,
}

impl AddressRange {
    /// `start` must not be above `end`.
    pub const fn new(start: u16, end: u16) -> Self {
        assert!(start <= end, "address range start above end");
        Self { start, end }
    }

    pub const fn start(&self) -> u16 {
        self.start
    }

    pub const fn end(&self) -> u16 {
        self.end
    }

    pub const fn size(&self) -> usize {
        (self.end - self.start) as usize + 1
    }

    pub const fn contains(&self, address: u16) -> bool {
        self.start <= address && address <= self.end
    }

    pub const fn overlaps(&self, other: &AddressRange) -> bool {
        self.start <= other.end && other.start <= self.end
    }

    /// Offset of `address` from the start, if it is inside.
    pub fn offset(&self, address: u16) -> Option<usize> {
        self.contains(address).then(|| (address - self.start) as usize)
    }
}

impl fmt::Display for AddressRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[0x{:04X}, 0x{:04X}]", self.start, self.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overlap_is_interval_intersection() {
        let vram = AddressRange::new(0x8000, 0x9FFF);
        assert!(vram.overlaps(&AddressRange::new(0x9FFF, 0xA000)));
        assert!(vram.overlaps(&AddressRange::new(0x8100, 0x8100)));
        assert!(vram.overlaps(&AddressRange::new(0x0000, 0xFFFF)));
        assert!(!vram.overlaps(&AddressRange::new(0xA000, 0xBFFF)));
        assert!(!vram.overlaps(&AddressRange::new(0x0000, 0x7FFF)));
    }

    #[test]
    fn offsets_and_length() {
        let hram = AddressRange::new(0xFF80, 0xFFFE);
        assert_eq!(hram.size(), 0x7F);
        assert_eq!(hram.offset(0xFF80), Some(0));
        assert_eq!(hram.offset(0xFFFE), Some(0x7E));
        assert_eq!(hram.offset(0xFFFF), None);
        assert_eq!(AddressRange::new(0, 0xFFFF).size(), 0x10000);
    }

    #[test]
    fn display_uses_hex_bounds() {
        assert_eq!(
            AddressRange::new(0x8000, 0x9FFF).to_string(),
            "[0x8000, 0x9FFF]"
        );
    }
}
