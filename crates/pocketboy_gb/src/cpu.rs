use std::cell::RefCell;
use std::rc::Rc;

use thiserror::Error;

use crate::machine::BusError;

mod alu;
mod cb;
mod exec;
mod helpers;
mod init;
mod interrupts;
mod regs;
mod step;
mod table;

pub use alu::sign_extend;
pub use interrupts::{Interrupt, InterruptController};
pub use regs::{Flag, Registers};
pub use table::{Handler, Instruction, INSTRUCTIONS};

/// Failures that stop the processor. None of them are retried.
#[derive(Debug, Error)]
pub enum CpuError {
    #[error("unknown opcode 0x{opcode:02X} at 0x{pc:04X}")]
    UnknownOpcode { opcode: u8, pc: u16 },
    #[error(transparent)]
    Bus(#[from] BusError),
}

/// Sharp LR35902 processor.
///
/// The register file and IME live here; IE/IF live in the
/// [`InterruptController`], which the CPU shares with the picture unit and
/// maps onto the bus in [`Cpu::connect`].
#[derive(Debug)]
pub struct Cpu {
    pub regs: Registers,
    pub ime: bool,
    pub halted: bool,
    /// Set by EI; IME turns on once the following instruction has run.
    ime_enable_pending: bool,
    interrupts: Rc<RefCell<InterruptController>>,
}
