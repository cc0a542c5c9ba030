use crate::cpu::{Cpu, CpuError};
use crate::machine::AddressSpace;

impl Cpu {
    pub(in crate::cpu) fn exec_nop(
        &mut self,
        _bus: &mut AddressSpace,
        _opcode: u8,
    ) -> Result<u32, CpuError> {
        Ok(4)
    }

    pub(in crate::cpu) fn exec_halt(
        &mut self,
        _bus: &mut AddressSpace,
        _opcode: u8,
    ) -> Result<u32, CpuError> {
        self.halted = true;
        Ok(4)
    }

    /// STOP is two bytes long; the padding byte is fetched and dropped.
    /// Without a joypad there is nothing to leave STOP mode, so it is
    /// treated as HALT.
    pub(in crate::cpu) fn exec_stop(
        &mut self,
        bus: &mut AddressSpace,
        _opcode: u8,
    ) -> Result<u32, CpuError> {
        let _padding = self.fetch8(bus)?;
        log::warn!(
            "STOP at 0x{:04X}, halting until an interrupt is pending",
            self.regs.pc.wrapping_sub(2)
        );
        self.halted = true;
        Ok(4)
    }

    pub(in crate::cpu) fn exec_di(
        &mut self,
        _bus: &mut AddressSpace,
        _opcode: u8,
    ) -> Result<u32, CpuError> {
        self.ime = false;
        self.ime_enable_pending = false;
        Ok(4)
    }

    pub(in crate::cpu) fn exec_ei(
        &mut self,
        _bus: &mut AddressSpace,
        _opcode: u8,
    ) -> Result<u32, CpuError> {
        // IME becomes 1 after the *next* instruction completes.
        self.ime_enable_pending = true;
        Ok(4)
    }

    pub(in crate::cpu) fn exec_prefix_cb(
        &mut self,
        bus: &mut AddressSpace,
        _opcode: u8,
    ) -> Result<u32, CpuError> {
        self.step_cb(bus)
    }
}
