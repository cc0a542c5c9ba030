use crate::cpu::{Cpu, CpuError};
use crate::machine::AddressSpace;

impl Cpu {
    pub(in crate::cpu) fn exec_ld_rr_d16(
        &mut self,
        bus: &mut AddressSpace,
        opcode: u8,
    ) -> Result<u32, CpuError> {
        debug_assert!(matches!(opcode, 0x01 | 0x11 | 0x21 | 0x31));

        let value = self.fetch16(bus)?;
        self.write_rp(opcode >> 4, value);
        Ok(12)
    }

    pub(in crate::cpu) fn exec_ld_r_d8(
        &mut self,
        bus: &mut AddressSpace,
        opcode: u8,
    ) -> Result<u32, CpuError> {
        debug_assert!(matches!(
            opcode,
            0x06 | 0x0E | 0x16 | 0x1E | 0x26 | 0x2E | 0x36 | 0x3E
        ));

        let reg = (opcode >> 3) & 0x07;
        let value = self.fetch8(bus)?;
        self.write_reg8(bus, reg, value)?;

        Ok(if reg == 6 { 12 } else { 8 })
    }

    /// `LD r,r'` over 0x40..=0x7F. 0x76 is HALT and has its own entry.
    pub(in crate::cpu) fn exec_ld_r_r(
        &mut self,
        bus: &mut AddressSpace,
        opcode: u8,
    ) -> Result<u32, CpuError> {
        debug_assert!((0x40..=0x7F).contains(&opcode) && opcode != 0x76);

        let dst = (opcode >> 3) & 0x07;
        let src = opcode & 0x07;
        let value = self.read_reg8(bus, src)?;
        self.write_reg8(bus, dst, value)?;

        Ok(if dst == 6 || src == 6 { 8 } else { 4 })
    }

    /// Address for `LD (rr),A` / `LD A,(rr)`, applying the HL+/HL- side
    /// effect of the 0x22/0x32 forms.
    fn indirect_address(&mut self, opcode: u8) -> u16 {
        match (opcode >> 4) & 0x03 {
            0 => self.regs.bc(),
            1 => self.regs.de(),
            2 => {
                let hl = self.regs.hl();
                self.regs.set_hl(hl.wrapping_add(1));
                hl
            }
            _ => {
                let hl = self.regs.hl();
                self.regs.set_hl(hl.wrapping_sub(1));
                hl
            }
        }
    }

    pub(in crate::cpu) fn exec_ld_indirect_a(
        &mut self,
        bus: &mut AddressSpace,
        opcode: u8,
    ) -> Result<u32, CpuError> {
        debug_assert!(matches!(opcode, 0x02 | 0x12 | 0x22 | 0x32));

        let addr = self.indirect_address(opcode);
        bus.write_byte(addr, self.regs.a)?;
        Ok(8)
    }

    pub(in crate::cpu) fn exec_ld_a_indirect(
        &mut self,
        bus: &mut AddressSpace,
        opcode: u8,
    ) -> Result<u32, CpuError> {
        debug_assert!(matches!(opcode, 0x0A | 0x1A | 0x2A | 0x3A));

        let addr = self.indirect_address(opcode);
        self.regs.a = bus.read_byte(addr)?;
        Ok(8)
    }

    pub(in crate::cpu) fn exec_ld_a16_sp(
        &mut self,
        bus: &mut AddressSpace,
        _opcode: u8,
    ) -> Result<u32, CpuError> {
        let addr = self.fetch16(bus)?;
        bus.write_word(addr, self.regs.sp)?;
        Ok(20)
    }

    pub(in crate::cpu) fn exec_ldh_a8(
        &mut self,
        bus: &mut AddressSpace,
        opcode: u8,
    ) -> Result<u32, CpuError> {
        debug_assert!(matches!(opcode, 0xE0 | 0xF0));

        let addr = 0xFF00 | self.fetch8(bus)? as u16;
        if opcode == 0xE0 {
            bus.write_byte(addr, self.regs.a)?;
        } else {
            self.regs.a = bus.read_byte(addr)?;
        }
        Ok(12)
    }

    pub(in crate::cpu) fn exec_ldh_c(
        &mut self,
        bus: &mut AddressSpace,
        opcode: u8,
    ) -> Result<u32, CpuError> {
        debug_assert!(matches!(opcode, 0xE2 | 0xF2));

        let addr = 0xFF00 | self.regs.c as u16;
        if opcode == 0xE2 {
            bus.write_byte(addr, self.regs.a)?;
        } else {
            self.regs.a = bus.read_byte(addr)?;
        }
        Ok(8)
    }

    pub(in crate::cpu) fn exec_ld_a16_a(
        &mut self,
        bus: &mut AddressSpace,
        opcode: u8,
    ) -> Result<u32, CpuError> {
        debug_assert!(matches!(opcode, 0xEA | 0xFA));

        let addr = self.fetch16(bus)?;
        if opcode == 0xEA {
            bus.write_byte(addr, self.regs.a)?;
        } else {
            self.regs.a = bus.read_byte(addr)?;
        }
        Ok(16)
    }

    pub(in crate::cpu) fn exec_ld_sp_hl(
        &mut self,
        _bus: &mut AddressSpace,
        _opcode: u8,
    ) -> Result<u32, CpuError> {
        self.regs.sp = self.regs.hl();
        Ok(8)
    }

    pub(in crate::cpu) fn exec_ld_hl_sp_r8(
        &mut self,
        bus: &mut AddressSpace,
        _opcode: u8,
    ) -> Result<u32, CpuError> {
        let imm = self.fetch8(bus)?;
        let value = self.add16_signed(self.regs.sp, imm);
        self.regs.set_hl(value);
        Ok(12)
    }
}
