use thiserror::Error;

use crate::cpu::CpuError;

mod bus;
mod cartridge;
mod debug;
mod emulator;
mod gameboy;
mod lcd;
mod memory;
mod ppu;
mod stub;

pub use bus::{AddressRange, AddressSpace, BusError, DeviceHandle, MemoryDevice};
pub use cartridge::{BankController, Cartridge, CartridgeError, Header, NoMbc};
pub use debug::{debug_channel, DebugClient, DebugLink, DebugRequest, LinkEvent};
pub use emulator::{Emulator, EmulatorOptions, RunSummary, StopReason, Throttle};
pub use gameboy::GameBoy;
pub use lcd::{Lcd, Screen};
pub use memory::Ram;
pub use ppu::{
    LcdControl, LcdRegisters, Mode, Ppu, StatSelect, DOTS_PER_LINE, OAM_SCAN_DOTS, TOTAL_LINES,
    TRANSFER_END_DOT, VBLANK_LINES, VISIBLE_LINES,
};
pub use stub::InertIo;

/// Anything that can end a run.
#[derive(Debug, Error)]
pub enum EmulatorError {
    #[error("cartridge: {0}")]
    Cartridge(#[from] CartridgeError),
    #[error("bus: {0}")]
    Bus(#[from] BusError),
    #[error("cpu: {0}")]
    Cpu(#[from] CpuError),
}

#[cfg(test)]
mod tests;
