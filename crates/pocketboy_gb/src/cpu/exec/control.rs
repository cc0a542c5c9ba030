use crate::cpu::{Cpu, CpuError};
use crate::machine::AddressSpace;

impl Cpu {
    pub(in crate::cpu) fn exec_jr(
        &mut self,
        bus: &mut AddressSpace,
        _opcode: u8,
    ) -> Result<u32, CpuError> {
        Ok(self.jr(bus, true)?)
    }

    pub(in crate::cpu) fn exec_jr_cc(
        &mut self,
        bus: &mut AddressSpace,
        opcode: u8,
    ) -> Result<u32, CpuError> {
        debug_assert!(matches!(opcode, 0x20 | 0x28 | 0x30 | 0x38));
        let cond = self.condition(opcode >> 3);
        Ok(self.jr(bus, cond)?)
    }

    pub(in crate::cpu) fn exec_jp_a16(
        &mut self,
        bus: &mut AddressSpace,
        _opcode: u8,
    ) -> Result<u32, CpuError> {
        Ok(self.jp_cond(bus, true)?)
    }

    pub(in crate::cpu) fn exec_jp_cc(
        &mut self,
        bus: &mut AddressSpace,
        opcode: u8,
    ) -> Result<u32, CpuError> {
        debug_assert!(matches!(opcode, 0xC2 | 0xCA | 0xD2 | 0xDA));
        let cond = self.condition(opcode >> 3);
        Ok(self.jp_cond(bus, cond)?)
    }

    pub(in crate::cpu) fn exec_jp_hl(
        &mut self,
        _bus: &mut AddressSpace,
        _opcode: u8,
    ) -> Result<u32, CpuError> {
        self.regs.pc = self.regs.hl();
        Ok(4)
    }

    pub(in crate::cpu) fn exec_call_a16(
        &mut self,
        bus: &mut AddressSpace,
        _opcode: u8,
    ) -> Result<u32, CpuError> {
        Ok(self.call_cond(bus, true)?)
    }

    pub(in crate::cpu) fn exec_call_cc(
        &mut self,
        bus: &mut AddressSpace,
        opcode: u8,
    ) -> Result<u32, CpuError> {
        debug_assert!(matches!(opcode, 0xC4 | 0xCC | 0xD4 | 0xDC));
        let cond = self.condition(opcode >> 3);
        Ok(self.call_cond(bus, cond)?)
    }

    pub(in crate::cpu) fn exec_ret(
        &mut self,
        bus: &mut AddressSpace,
        _opcode: u8,
    ) -> Result<u32, CpuError> {
        self.regs.pc = self.pop_u16(bus)?;
        Ok(16)
    }

    pub(in crate::cpu) fn exec_ret_cc(
        &mut self,
        bus: &mut AddressSpace,
        opcode: u8,
    ) -> Result<u32, CpuError> {
        debug_assert!(matches!(opcode, 0xC0 | 0xC8 | 0xD0 | 0xD8));
        let cond = self.condition(opcode >> 3);
        Ok(self.ret_cond(bus, cond)?)
    }

    pub(in crate::cpu) fn exec_reti(
        &mut self,
        bus: &mut AddressSpace,
        _opcode: u8,
    ) -> Result<u32, CpuError> {
        self.regs.pc = self.pop_u16(bus)?;
        self.ime = true;
        self.ime_enable_pending = false;
        Ok(16)
    }

    pub(in crate::cpu) fn exec_rst(
        &mut self,
        bus: &mut AddressSpace,
        opcode: u8,
    ) -> Result<u32, CpuError> {
        debug_assert!(matches!(
            opcode,
            0xC7 | 0xCF | 0xD7 | 0xDF | 0xE7 | 0xEF | 0xF7 | 0xFF
        ));

        let ret = self.regs.pc;
        self.push_u16(bus, ret)?;
        self.regs.pc = (opcode & 0x38) as u16;
        Ok(16)
    }
}
