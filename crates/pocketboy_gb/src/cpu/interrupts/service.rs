use crate::machine::AddressSpace;

use super::super::{Cpu, CpuError};

impl Cpu {
    /// Dispatch every interrupt that is enabled and requested when this is
    /// called, lowest bit first. Each dispatch clears its IF bit, clears
    /// IME, pushes PC and jumps to the vector, for 12 cycles.
    ///
    /// Returns the total cycles spent; zero when IME is clear or nothing is
    /// pending.
    pub(in crate::cpu) fn service_interrupts(
        &mut self,
        bus: &mut AddressSpace,
    ) -> Result<u32, CpuError> {
        if !self.ime {
            return Ok(0);
        }

        let pending = self.interrupts.borrow().pending();
        let mut cycles = 0;
        for interrupt in pending.iter() {
            self.interrupts.borrow_mut().clear(interrupt);
            self.ime = false;
            self.halted = false;

            let pc = self.regs.pc;
            self.push_u16(bus, pc)?;
            self.regs.pc = interrupt.vector();

            log::debug!(
                "interrupt {:?}: vector=0x{:04X} from pc=0x{:04X} sp=0x{:04X}",
                interrupt,
                self.regs.pc,
                pc,
                self.regs.sp,
            );
            cycles += 12;
        }
        Ok(cycles)
    }
}
