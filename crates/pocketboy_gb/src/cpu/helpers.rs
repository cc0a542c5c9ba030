use crate::machine::{AddressSpace, BusError};

use super::{sign_extend, Cpu, Flag};

impl Cpu {
    /// Read an 8-bit register or (HL) by its opcode encoding:
    /// 0=B, 1=C, 2=D, 3=E, 4=H, 5=L, 6=(HL), 7=A.
    #[inline]
    pub(super) fn read_reg8(&self, bus: &AddressSpace, index: u8) -> Result<u8, BusError> {
        Ok(match index & 0x07 {
            0 => self.regs.b,
            1 => self.regs.c,
            2 => self.regs.d,
            3 => self.regs.e,
            4 => self.regs.h,
            5 => self.regs.l,
            6 => bus.read_byte(self.regs.hl())?,
            _ => self.regs.a,
        })
    }

    /// Write an 8-bit register or (HL); same encoding as `read_reg8`.
    #[inline]
    pub(super) fn write_reg8(
        &mut self,
        bus: &mut AddressSpace,
        index: u8,
        value: u8,
    ) -> Result<(), BusError> {
        match index & 0x07 {
            0 => self.regs.b = value,
            1 => self.regs.c = value,
            2 => self.regs.d = value,
            3 => self.regs.e = value,
            4 => self.regs.h = value,
            5 => self.regs.l = value,
            6 => bus.write_byte(self.regs.hl(), value)?,
            _ => self.regs.a = value,
        }
        Ok(())
    }

    /// 16-bit register pair by the `rp` encoding: 0=BC, 1=DE, 2=HL, 3=SP.
    #[inline]
    pub(super) fn read_rp(&self, index: u8) -> u16 {
        match index & 0x03 {
            0 => self.regs.bc(),
            1 => self.regs.de(),
            2 => self.regs.hl(),
            _ => self.regs.sp,
        }
    }

    #[inline]
    pub(super) fn write_rp(&mut self, index: u8, value: u16) {
        match index & 0x03 {
            0 => self.regs.set_bc(value),
            1 => self.regs.set_de(value),
            2 => self.regs.set_hl(value),
            _ => self.regs.sp = value,
        }
    }

    /// Branch condition by the `cc` encoding: NZ, Z, NC, C.
    #[inline]
    pub(super) fn condition(&self, cc: u8) -> bool {
        match cc & 0x03 {
            0 => !self.get_flag(Flag::Z),
            1 => self.get_flag(Flag::Z),
            2 => !self.get_flag(Flag::C),
            _ => self.get_flag(Flag::C),
        }
    }

    #[inline]
    pub(super) fn fetch8(&mut self, bus: &AddressSpace) -> Result<u8, BusError> {
        let value = bus.read_byte(self.regs.pc)?;
        self.regs.pc = self.regs.pc.wrapping_add(1);
        Ok(value)
    }

    #[inline]
    pub(super) fn fetch16(&mut self, bus: &AddressSpace) -> Result<u16, BusError> {
        let lo = self.fetch8(bus)?;
        let hi = self.fetch8(bus)?;
        Ok(u16::from_le_bytes([lo, hi]))
    }

    /// SP -= 2, then the word is stored little-endian at SP.
    #[inline]
    pub(super) fn push_u16(&mut self, bus: &mut AddressSpace, value: u16) -> Result<(), BusError> {
        self.regs.sp = self.regs.sp.wrapping_sub(2);
        bus.write_word(self.regs.sp, value)
    }

    #[inline]
    pub(super) fn pop_u16(&mut self, bus: &AddressSpace) -> Result<u16, BusError> {
        let value = bus.read_word(self.regs.sp)?;
        self.regs.sp = self.regs.sp.wrapping_add(2);
        Ok(value)
    }

    /// Relative jump helper used by JR/JR cc. The displacement is relative
    /// to the address following the operand.
    pub(super) fn jr(&mut self, bus: &AddressSpace, cond: bool) -> Result<u32, BusError> {
        let offset = sign_extend(self.fetch8(bus)?);
        if cond {
            self.regs.pc = self.regs.pc.wrapping_add(offset);
            Ok(12)
        } else {
            Ok(8)
        }
    }

    pub(super) fn jp_cond(&mut self, bus: &AddressSpace, cond: bool) -> Result<u32, BusError> {
        let addr = self.fetch16(bus)?;
        if cond {
            self.regs.pc = addr;
            Ok(16)
        } else {
            Ok(12)
        }
    }

    pub(super) fn call_cond(&mut self, bus: &mut AddressSpace, cond: bool) -> Result<u32, BusError> {
        let addr = self.fetch16(bus)?;
        if cond {
            let ret = self.regs.pc;
            self.push_u16(bus, ret)?;
            self.regs.pc = addr;
            Ok(24)
        } else {
            Ok(12)
        }
    }

    pub(super) fn ret_cond(&mut self, bus: &AddressSpace, cond: bool) -> Result<u32, BusError> {
        if cond {
            self.regs.pc = self.pop_u16(bus)?;
            Ok(20)
        } else {
            Ok(8)
        }
    }
}

