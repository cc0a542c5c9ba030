use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};

use pocketboy_common::{check_frame, Color, FrameSink};

/// Writes each presented frame as a binary (P5) PGM image, every pixel
/// blown up to a `scale` x `scale` block.
#[derive(Clone, Debug)]
pub struct PgmWriter {
    path: PathBuf,
    scale: usize,
}

impl PgmWriter {
    pub fn new(path: PathBuf, scale: usize) -> Self {
        Self {
            path,
            scale: scale.max(1),
        }
    }

    /// The complete image file for one frame.
    pub fn encode(shades: &[u8], width: usize, height: usize, scale: usize) -> Vec<u8> {
        let scale = scale.max(1);
        let header = format!("P5\n{} {}\n255\n", width * scale, height * scale);
        let mut out = Vec::with_capacity(header.len() + shades.len() * scale * scale);
        out.extend_from_slice(header.as_bytes());

        for row in shades.chunks(width) {
            let line: Vec<u8> = row
                .iter()
                .flat_map(|&shade| std::iter::repeat(Color::from_shade(shade).luma()).take(scale))
                .collect();
            for _ in 0..scale {
                out.extend_from_slice(&line);
            }
        }
        out
    }
}

impl FrameSink for PgmWriter {
    fn present(&mut self, shades: &[u8], width: usize, height: usize) -> Result<()> {
        check_frame(shades, width, height)?;
        let file = File::create(&self.path)
            .with_context(|| format!("failed to create '{}'", self.path.display()))?;
        let mut out = BufWriter::new(file);
        out.write_all(&Self::encode(shades, width, height, self.scale))?;
        out.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unscaled_image_is_one_byte_per_pixel() {
        let image = PgmWriter::encode(&[0, 1, 2, 3], 2, 2, 1);
        assert_eq!(&image[..11], b"P5\n2 2\n255\n");
        assert_eq!(&image[11..], &[0xFF, 0xAA, 0x55, 0x00]);
    }

    #[test]
    fn scaling_repeats_pixels_and_rows() {
        let image = PgmWriter::encode(&[3, 0], 2, 1, 2);
        let header = b"P5\n4 2\n255\n";
        assert_eq!(&image[..header.len()], header);
        assert_eq!(
            &image[header.len()..],
            &[0x00, 0x00, 0xFF, 0xFF, 0x00, 0x00, 0xFF, 0xFF]
        );
    }

    #[test]
    fn present_rejects_short_frames() {
        let path = std::env::temp_dir().join(format!("pocketboy-{}-short.pgm", std::process::id()));
        let mut writer = PgmWriter::new(path.clone(), 1);
        assert!(writer.present(&[0; 3], 2, 2).is_err());
        assert!(!path.exists());
    }
}
