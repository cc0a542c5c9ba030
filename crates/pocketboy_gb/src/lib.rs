pub mod cpu;
pub mod machine;

pub use cpu::{Cpu, CpuError};
pub use machine::{
    debug_channel, Emulator, EmulatorError, EmulatorOptions, GameBoy, Lcd, RunSummary,
    StopReason,
};

/// Logical screen width in pixels for the Game Boy DMG.
pub const SCREEN_WIDTH: usize = 160;
/// Logical screen height in pixels.
pub const SCREEN_HEIGHT: usize = 144;
/// Master clock, in cycles per second.
pub const CLOCK_HZ: u32 = 4_194_304;
