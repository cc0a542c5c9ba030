use crate::cpu::{Cpu, CpuError};
use crate::machine::AddressSpace;

impl Cpu {
    pub(in crate::cpu) fn exec_inc8(
        &mut self,
        bus: &mut AddressSpace,
        opcode: u8,
    ) -> Result<u32, CpuError> {
        debug_assert!(matches!(
            opcode,
            0x04 | 0x0C | 0x14 | 0x1C | 0x24 | 0x2C | 0x34 | 0x3C
        ));

        let reg = (opcode >> 3) & 0x07;
        let value = self.read_reg8(bus, reg)?;
        let result = self.add8(value, 1, false);
        self.write_reg8(bus, reg, result)?;

        Ok(if reg == 6 { 12 } else { 4 })
    }

    pub(in crate::cpu) fn exec_dec8(
        &mut self,
        bus: &mut AddressSpace,
        opcode: u8,
    ) -> Result<u32, CpuError> {
        debug_assert!(matches!(
            opcode,
            0x05 | 0x0D | 0x15 | 0x1D | 0x25 | 0x2D | 0x35 | 0x3D
        ));

        let reg = (opcode >> 3) & 0x07;
        let value = self.read_reg8(bus, reg)?;
        let result = self.sub8(value, 1, false);
        self.write_reg8(bus, reg, result)?;

        Ok(if reg == 6 { 12 } else { 4 })
    }

    pub(in crate::cpu) fn exec_inc16(
        &mut self,
        _bus: &mut AddressSpace,
        opcode: u8,
    ) -> Result<u32, CpuError> {
        debug_assert!(matches!(opcode, 0x03 | 0x13 | 0x23 | 0x33));

        let rp = opcode >> 4;
        let value = self.read_rp(rp).wrapping_add(1);
        self.write_rp(rp, value);
        Ok(8)
    }

    pub(in crate::cpu) fn exec_dec16(
        &mut self,
        _bus: &mut AddressSpace,
        opcode: u8,
    ) -> Result<u32, CpuError> {
        debug_assert!(matches!(opcode, 0x0B | 0x1B | 0x2B | 0x3B));

        let rp = opcode >> 4;
        let value = self.read_rp(rp).wrapping_sub(1);
        self.write_rp(rp, value);
        Ok(8)
    }
}
