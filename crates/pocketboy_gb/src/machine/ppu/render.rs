use crate::machine::{AddressSpace, BusError};
use crate::SCREEN_WIDTH;

use super::registers::{LcdControl, LcdRegisters};

/// Render the background for line `regs.ly` into `line` as BGP shades.
///
/// Tile maps and tile data are read through the bus, so the picture unit
/// sees exactly what the CPU last wrote to video RAM.
pub(super) fn background_line(
    regs: &LcdRegisters,
    bus: &AddressSpace,
    line: &mut [u8; SCREEN_WIDTH],
) -> Result<(), BusError> {
    let map_base: u16 = if regs.lcdc.contains(LcdControl::BG_TILE_MAP) {
        0x9C00
    } else {
        0x9800
    };
    let unsigned_tiles = regs.lcdc.contains(LcdControl::TILE_DATA);

    let by = regs.scy.wrapping_add(regs.ly);
    let map_row = map_base + (by / 8) as u16 * 32;
    let fine_y = (by % 8) as u16;

    // Tile row bytes are reused while x stays inside one tile.
    let mut cached: Option<(u16, u8, u8)> = None;

    for (x, pixel) in line.iter_mut().enumerate() {
        let bx = regs.scx.wrapping_add(x as u8);
        let map_addr = map_row + (bx / 8) as u16;

        let (lo, hi) = match cached {
            Some((addr, lo, hi)) if addr == map_addr => (lo, hi),
            _ => {
                let tile_index = bus.read_byte(map_addr)?;
                let tile = tile_address(tile_index, unsigned_tiles);
                let row = tile.wrapping_add(fine_y * 2);
                let lo = bus.read_byte(row)?;
                let hi = bus.read_byte(row.wrapping_add(1))?;
                cached = Some((map_addr, lo, hi));
                (lo, hi)
            }
        };

        let bit = 7 - (bx % 8);
        let color_index = (((hi >> bit) & 1) << 1) | ((lo >> bit) & 1);
        *pixel = (regs.bgp >> (2 * color_index)) & 0x03;
    }

    Ok(())
}

/// First byte of a tile. With unsigned addressing the index counts from
/// $8000; otherwise it is signed and counts from $9000.
fn tile_address(index: u8, unsigned_tiles: bool) -> u16 {
    if unsigned_tiles {
        0x8000 + index as u16 * 16
    } else {
        (0x9000i32 + (index as i8 as i32) * 16) as u16
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signed_tile_addressing() {
        assert_eq!(tile_address(0x00, false), 0x9000);
        assert_eq!(tile_address(0x7F, false), 0x97F0);
        assert_eq!(tile_address(0x80, false), 0x8800);
        assert_eq!(tile_address(0xFF, false), 0x8FF0);
    }

    #[test]
    fn unsigned_tile_addressing() {
        assert_eq!(tile_address(0x00, true), 0x8000);
        assert_eq!(tile_address(0xFF, true), 0x8FF0);
    }
}
