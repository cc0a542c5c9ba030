use anyhow::{ensure, Result};

/// Consumer of finished frames.
///
/// `shades` is row-major, `width * height` long, one DMG shade (0..=3) per
/// pixel. Implementations decide how to show or store it.
pub trait FrameSink {
    fn present(&mut self, shades: &[u8], width: usize, height: usize) -> Result<()>;
}

/// Checks the buffer length a [`FrameSink`] is handed.
pub fn check_frame(shades: &[u8], width: usize, height: usize) -> Result<()> {
    ensure!(
        shades.len() == width * height,
        "frame of {} pixels does not match {}x{}",
        shades.len(),
        width,
        height
    );
    Ok(())
}
