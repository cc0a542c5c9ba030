use bitflags::bitflags;

bitflags! {
    /// LCDC ($FF40).
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    pub struct LcdControl: u8 {
        const BG_ENABLE = 1 << 0;
        const OBJ_ENABLE = 1 << 1;
        const OBJ_SIZE = 1 << 2;
        /// Background tile map at $9C00 instead of $9800.
        const BG_TILE_MAP = 1 << 3;
        /// Unsigned tile data at $8000 instead of signed around $9000.
        const TILE_DATA = 1 << 4;
        const WINDOW_ENABLE = 1 << 5;
        const WINDOW_TILE_MAP = 1 << 6;
        const LCD_ENABLE = 1 << 7;
    }
}

bitflags! {
    /// Writable interrupt selects of STAT ($FF41), bits 3..6.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    pub struct StatSelect: u8 {
        const HBLANK = 1 << 3;
        const VBLANK = 1 << 4;
        const OAM_SCAN = 1 << 5;
        const LYC = 1 << 6;
    }
}

pub const LCDC: u16 = 0xFF40;
pub const STAT: u16 = 0xFF41;
pub const SCY: u16 = 0xFF42;
pub const SCX: u16 = 0xFF43;
pub const LY: u16 = 0xFF44;
pub const LYC: u16 = 0xFF45;
pub const DMA: u16 = 0xFF46;
pub const BGP: u16 = 0xFF47;
pub const OBP0: u16 = 0xFF48;
pub const OBP1: u16 = 0xFF49;
pub const WY: u16 = 0xFF4A;
pub const WX: u16 = 0xFF4B;

/// The picture unit's register block, $FF40-$FF4B. STAT's mode and
/// coincidence bits are derived on read, so only its selects are stored.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LcdRegisters {
    pub lcdc: LcdControl,
    pub stat_select: StatSelect,
    pub scy: u8,
    pub scx: u8,
    pub ly: u8,
    pub lyc: u8,
    pub dma: u8,
    pub bgp: u8,
    pub obp0: u8,
    pub obp1: u8,
    pub wy: u8,
    pub wx: u8,
}
