mod sink;

pub use sink::{check_frame, FrameSink};

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const BLACK: Color = Color::new_rgb(0, 0, 0);
    pub const WHITE: Color = Color::new_rgb(255, 255, 255);
    pub const LIGHT_GRAY: Color = Color::new_rgb(0xAA, 0xAA, 0xAA);
    pub const DARK_GRAY: Color = Color::new_rgb(0x55, 0x55, 0x55);

    #[inline]
    pub const fn new_rgb(r: u8, g: u8, b: u8) -> Color {
        Color { r, g, b, a: 0xff }
    }

    /// Four-level grey for a DMG shade, 0 lightest. Only the low two bits
    /// are looked at.
    #[inline]
    pub const fn from_shade(shade: u8) -> Color {
        match shade & 0x03 {
            0 => Color::WHITE,
            1 => Color::LIGHT_GRAY,
            2 => Color::DARK_GRAY,
            _ => Color::BLACK,
        }
    }

    #[inline]
    pub const fn rgb(&self) -> (u8, u8, u8) {
        (self.r, self.g, self.b)
    }

    /// Grey level, for single-channel output.
    pub fn luma(&self) -> u8 {
        let sum = 299 * self.r as u32 + 587 * self.g as u32 + 114 * self.b as u32;
        (sum / 1000) as u8
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shades_map_lightest_to_darkest() {
        assert_eq!(Color::from_shade(0), Color::WHITE);
        assert_eq!(Color::from_shade(1).rgb(), (0xAA, 0xAA, 0xAA));
        assert_eq!(Color::from_shade(2).rgb(), (0x55, 0x55, 0x55));
        assert_eq!(Color::from_shade(3), Color::BLACK);
        assert_eq!(Color::from_shade(7), Color::BLACK);
    }

    #[test]
    fn grey_luma_is_the_channel_value() {
        for shade in 0..4 {
            let color = Color::from_shade(shade);
            assert_eq!(color.luma(), color.r);
        }
    }
}
