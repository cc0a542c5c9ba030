use crate::cpu::{Cpu, CpuError};
use crate::machine::AddressSpace;

impl Cpu {
    /// PUSH/POP use the `rp2` encoding, where index 3 is AF instead of SP.
    pub(in crate::cpu) fn exec_push_rr(
        &mut self,
        bus: &mut AddressSpace,
        opcode: u8,
    ) -> Result<u32, CpuError> {
        debug_assert!(matches!(opcode, 0xC5 | 0xD5 | 0xE5 | 0xF5));

        let value = match (opcode >> 4) & 0x03 {
            3 => self.regs.af(),
            rp => self.read_rp(rp),
        };
        self.push_u16(bus, value)?;
        Ok(16)
    }

    pub(in crate::cpu) fn exec_pop_rr(
        &mut self,
        bus: &mut AddressSpace,
        opcode: u8,
    ) -> Result<u32, CpuError> {
        debug_assert!(matches!(opcode, 0xC1 | 0xD1 | 0xE1 | 0xF1));

        let value = self.pop_u16(bus)?;
        match (opcode >> 4) & 0x03 {
            3 => self.regs.set_af(value),
            rp => self.write_rp(rp, value),
        }
        Ok(12)
    }
}
