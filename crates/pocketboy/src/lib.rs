use std::fs;
use std::io::{self, BufRead};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use crossbeam_channel::RecvTimeoutError;
use typed_builder::TypedBuilder;

use pocketboy_common::FrameSink;
use pocketboy_gb::machine::DebugClient;
use pocketboy_gb::{
    debug_channel, Emulator, EmulatorOptions, GameBoy, Lcd, SCREEN_HEIGHT, SCREEN_WIDTH,
};

mod pgm;

pub use pgm::PgmWriter;

/// How long the frame consumer waits before re-checking the stop flag.
const FRAME_POLL: Duration = Duration::from_millis(100);

#[derive(Clone, Debug, TypedBuilder)]
pub struct RunConfig {
    pub rom: PathBuf,
    #[builder(default = 1)]
    pub scale: u32,
    /// Step the machine one instruction per line read from stdin.
    #[builder(default)]
    pub debug: bool,
    #[builder(default)]
    pub frames: Option<u64>,
    /// Where to write the last frame as a PGM image.
    #[builder(default)]
    pub dump: Option<PathBuf>,
    #[builder(default = true)]
    pub throttle: bool,
}

/// Load the ROM, run it to completion and write the optional frame dump.
pub fn run(config: RunConfig) -> Result<()> {
    let rom = fs::read(&config.rom)
        .with_context(|| format!("failed to read ROM '{}'", config.rom.display()))?;
    log::info!(
        "loaded {} bytes from '{}' (scale {}, debug {}, throttle {})",
        rom.len(),
        config.rom.display(),
        config.scale,
        config.debug,
        config.throttle,
    );

    let lcd = Arc::new(Lcd::new());
    let machine = GameBoy::with_lcd(rom, Arc::clone(&lcd))?;
    let options = EmulatorOptions {
        throttle: config.throttle,
        max_frames: config.frames,
    };
    let mut emulator = Emulator::new(machine, options);
    let stop = emulator.stop_handle();

    let consumer = {
        let lcd = Arc::clone(&lcd);
        let stop = Arc::clone(&stop);
        thread::Builder::new()
            .name("frames".into())
            .spawn(move || consume_frames(&lcd, &stop, &mut FrameCounter::default()))?
    };

    if config.debug {
        let (client, link) = debug_channel();
        emulator.attach_debugger(link);
        // Not joined: it may be parked on a stdin read when the run ends.
        thread::Builder::new()
            .name("debug-stdin".into())
            .spawn(move || drive_from_stdin(client))?;
        println!("debug mode: press enter to step, 'q' to stop");
    }

    let result = emulator.run();
    stop.store(true, Ordering::Relaxed);
    let presented = consumer
        .join()
        .map_err(|_| anyhow!("frame consumer panicked"))??;
    log::info!("frame consumer saw {presented} frames");

    if let Some(path) = &config.dump {
        let screen = lcd.snapshot().concat();
        PgmWriter::new(path.clone(), config.scale as usize).present(
            &screen,
            SCREEN_WIDTH,
            SCREEN_HEIGHT,
        )?;
        log::info!("last frame written to '{}'", path.display());
    }

    match result {
        Ok(summary) => {
            log::info!(
                "run ended: {:?}, {} frames, {} cycles",
                summary.reason,
                summary.frames,
                summary.cycles
            );
            Ok(())
        }
        Err(err) => Err(anyhow!(err).context("emulation stopped")),
    }
}

/// Display stand-in: counts frames as they are signalled.
#[derive(Debug, Default)]
struct FrameCounter {
    frames: u64,
}

impl FrameSink for FrameCounter {
    fn present(&mut self, shades: &[u8], width: usize, height: usize) -> Result<()> {
        pocketboy_common::check_frame(shades, width, height)?;
        self.frames += 1;
        log::trace!("presented frame {}", self.frames);
        Ok(())
    }
}

/// Copy out every signalled frame and hand it to `sink` until `stop` is
/// raised. Returns the number of frames presented.
fn consume_frames(lcd: &Lcd, stop: &AtomicBool, sink: &mut dyn FrameSink) -> Result<u64> {
    let ready = lcd.frame_ready();
    let mut presented = 0;
    while !stop.load(Ordering::Relaxed) {
        match ready.recv_timeout(FRAME_POLL) {
            Ok(()) => {
                let screen = lcd.snapshot();
                sink.present(&screen.concat(), SCREEN_WIDTH, SCREEN_HEIGHT)?;
                presented += 1;
            }
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => break,
        }
    }
    Ok(presented)
}

/// One step per input line; `q` or end of input stops the machine.
fn drive_from_stdin(client: DebugClient) {
    for line in io::stdin().lock().lines() {
        let Ok(line) = line else { break };
        if line.trim() == "q" {
            break;
        }
        if !client.next() {
            return;
        }
    }
    client.stop();
}
