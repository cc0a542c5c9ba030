use crate::machine::AddressSpace;

use super::{Cpu, CpuError, INSTRUCTIONS};

impl Cpu {
    /// Execute one instruction (or one halted slot), then service pending
    /// interrupts. Returns the cycles consumed.
    pub fn step(&mut self, bus: &mut AddressSpace) -> Result<u32, CpuError> {
        let mut cycles = if self.halted {
            // A pending interrupt ends HALT whether or not IME is set.
            if !self.interrupts.borrow().pending().is_empty() {
                self.halted = false;
            }
            4
        } else {
            let enable_ime = self.ime_enable_pending;
            let cycles = self.execute(bus)?;
            // EI takes effect after the instruction that follows it, unless
            // that instruction was DI.
            if enable_ime && self.ime_enable_pending {
                self.ime = true;
                self.ime_enable_pending = false;
            }
            cycles
        };

        cycles += self.service_interrupts(bus)?;
        Ok(cycles)
    }

    fn execute(&mut self, bus: &mut AddressSpace) -> Result<u32, CpuError> {
        let pc = self.regs.pc;
        let opcode = self.fetch8(bus)?;
        let instruction = &INSTRUCTIONS[opcode as usize];
        let handler = instruction
            .handler
            .ok_or(CpuError::UnknownOpcode { opcode, pc })?;

        log::trace!(
            "0x{pc:04X}: {:02X} {:<12} AF=0x{:04X} BC=0x{:04X} DE=0x{:04X} HL=0x{:04X} SP=0x{:04X}",
            opcode,
            instruction.mnemonic,
            self.regs.af(),
            self.regs.bc(),
            self.regs.de(),
            self.regs.hl(),
            self.regs.sp,
        );

        handler(self, bus, opcode)
    }
}
