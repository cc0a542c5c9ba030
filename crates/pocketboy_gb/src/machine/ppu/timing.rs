/// Cycles per scanline.
pub const DOTS_PER_LINE: u32 = 456;
/// OAM search occupies the first 80 cycles of a line.
pub const OAM_SCAN_DOTS: u32 = 80;
/// Pixel transfer runs for the next 172.
pub const TRANSFER_END_DOT: u32 = OAM_SCAN_DOTS + 172;

pub const VISIBLE_LINES: u8 = 144;
pub const VBLANK_LINES: u8 = 10;
pub const TOTAL_LINES: u8 = VISIBLE_LINES + VBLANK_LINES;

/// PPU mode as reported in STAT bits 0-1.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum Mode {
    HBlank = 0,
    VBlank = 1,
    OamScan = 2,
    Transfer = 3,
}

impl Mode {
    /// Mode at line `ly`, `dots` cycles into the line.
    pub fn at(ly: u8, dots: u32) -> Mode {
        if ly >= VISIBLE_LINES {
            Mode::VBlank
        } else if dots < OAM_SCAN_DOTS {
            Mode::OamScan
        } else if dots < TRANSFER_END_DOT {
            Mode::Transfer
        } else {
            Mode::HBlank
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mode_boundaries() {
        assert_eq!(Mode::at(0, 0), Mode::OamScan);
        assert_eq!(Mode::at(0, 79), Mode::OamScan);
        assert_eq!(Mode::at(0, 80), Mode::Transfer);
        assert_eq!(Mode::at(0, 251), Mode::Transfer);
        assert_eq!(Mode::at(0, 252), Mode::HBlank);
        assert_eq!(Mode::at(143, 455), Mode::HBlank);
        assert_eq!(Mode::at(144, 0), Mode::VBlank);
        assert_eq!(Mode::at(153, 300), Mode::VBlank);
    }
}
