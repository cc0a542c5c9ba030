use std::sync::{Mutex, PoisonError};

use crossbeam_channel::{bounded, Receiver, Sender};

use crate::{SCREEN_HEIGHT, SCREEN_WIDTH};

/// One shade (0 = lightest .. 3 = darkest) per pixel, row-major.
pub type Screen = [[u8; SCREEN_WIDTH]; SCREEN_HEIGHT];

/// Frame buffer shared between the emulation loop and a display thread.
///
/// The emulator holds the lock only while writing one scanline; a consumer
/// holds it only while copying the grid out with [`Lcd::snapshot`]. The
/// frame-ready signal is a one-slot channel: a signal the consumer has not
/// picked up yet absorbs the next one.
pub struct Lcd {
    screen: Mutex<Screen>,
    ready_tx: Sender<()>,
    ready_rx: Receiver<()>,
}

impl Default for Lcd {
    fn default() -> Self {
        Self::new()
    }
}

impl Lcd {
    pub fn new() -> Self {
        let (ready_tx, ready_rx) = bounded(1);
        Self {
            screen: Mutex::new([[0; SCREEN_WIDTH]; SCREEN_HEIGHT]),
            ready_tx,
            ready_rx,
        }
    }

    pub fn write_line(&self, ly: usize, line: &[u8; SCREEN_WIDTH]) {
        if ly >= SCREEN_HEIGHT {
            return;
        }
        let mut screen = self.screen.lock().unwrap_or_else(PoisonError::into_inner);
        screen[ly] = *line;
    }

    /// Copy of the whole grid.
    pub fn snapshot(&self) -> Screen {
        *self.screen.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Never blocks.
    pub fn signal_frame_ready(&self) {
        let _ = self.ready_tx.try_send(());
    }

    /// Receiving end of the frame-ready signal. Every clone shares the same
    /// single slot.
    pub fn frame_ready(&self) -> Receiver<()> {
        self.ready_rx.clone()
    }
}

impl std::fmt::Debug for Lcd {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Lcd")
            .field("width", &SCREEN_WIDTH)
            .field("height", &SCREEN_HEIGHT)
            .field("frame_pending", &!self.ready_rx.is_empty())
            .finish()
    }
}
