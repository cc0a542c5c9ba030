use super::{Cpu, Flag};

/// Replicate bit 7 of `value` into bits 15..8.
#[inline]
pub fn sign_extend(value: u8) -> u16 {
    value as i8 as i16 as u16
}

impl Cpu {
    /// 8-bit addition shared by ADD, INC and the immediate forms.
    ///
    /// Sets Z, clears N and computes H from the low nibbles. C is only
    /// written when `track_carry` is set, which is how INC leaves it alone.
    pub(super) fn add8(&mut self, a: u8, b: u8, track_carry: bool) -> u8 {
        let sum = a as u16 + b as u16;
        let result = sum as u8;

        self.set_flag(Flag::Z, result == 0);
        self.set_flag(Flag::N, false);
        self.set_flag(Flag::H, (a & 0x0F) + (b & 0x0F) > 0x0F);
        if track_carry {
            self.set_flag(Flag::C, sum > 0xFF);
        }
        result
    }

    /// 8-bit subtraction shared by SUB, CP and DEC.
    pub(super) fn sub8(&mut self, a: u8, b: u8, track_carry: bool) -> u8 {
        let result = a.wrapping_sub(b);

        self.set_flag(Flag::Z, result == 0);
        self.set_flag(Flag::N, true);
        self.set_flag(Flag::H, (a & 0x0F) < (b & 0x0F));
        if track_carry {
            self.set_flag(Flag::C, a < b);
        }
        result
    }

    /// ADC: `a + b + C`, all four flags written.
    pub(super) fn adc8(&mut self, a: u8, b: u8) -> u8 {
        let carry_in = self.get_flag(Flag::C) as u8;
        let sum = a as u16 + b as u16 + carry_in as u16;
        let result = sum as u8;

        self.set_flag(Flag::Z, result == 0);
        self.set_flag(Flag::N, false);
        self.set_flag(Flag::H, (a & 0x0F) + (b & 0x0F) + carry_in > 0x0F);
        self.set_flag(Flag::C, sum > 0xFF);
        result
    }

    /// SBC: `a - b - C`, all four flags written.
    pub(super) fn sbc8(&mut self, a: u8, b: u8) -> u8 {
        let carry_in = self.get_flag(Flag::C) as i16;
        let full = a as i16 - b as i16 - carry_in;
        let half = (a & 0x0F) as i16 - (b & 0x0F) as i16 - carry_in;
        let result = full as u8;

        self.set_flag(Flag::Z, result == 0);
        self.set_flag(Flag::N, true);
        self.set_flag(Flag::H, half < 0);
        self.set_flag(Flag::C, full < 0);
        result
    }

    #[inline]
    pub(super) fn and8(&mut self, a: u8, b: u8) -> u8 {
        let result = a & b;
        self.clear_flags();
        self.set_flag(Flag::Z, result == 0);
        self.set_flag(Flag::H, true);
        result
    }

    #[inline]
    pub(super) fn or8(&mut self, a: u8, b: u8) -> u8 {
        let result = a | b;
        self.clear_flags();
        self.set_flag(Flag::Z, result == 0);
        result
    }

    #[inline]
    pub(super) fn xor8(&mut self, a: u8, b: u8) -> u8 {
        let result = a ^ b;
        self.clear_flags();
        self.set_flag(Flag::Z, result == 0);
        result
    }

    /// Decimal adjust A after a BCD addition or subtraction. N is kept.
    pub(super) fn daa(&mut self) {
        let mut a = self.regs.a;
        let mut adjust: u8 = if self.get_flag(Flag::C) { 0x60 } else { 0x00 };
        if self.get_flag(Flag::H) {
            adjust |= 0x06;
        }

        if !self.get_flag(Flag::N) {
            if (a & 0x0F) > 0x09 {
                adjust |= 0x06;
            }
            if a > 0x99 {
                adjust |= 0x60;
            }
            a = a.wrapping_add(adjust);
        } else {
            a = a.wrapping_sub(adjust);
        }

        self.set_flag(Flag::C, adjust >= 0x60);
        self.set_flag(Flag::H, false);
        self.set_flag(Flag::Z, a == 0);
        self.regs.a = a;
    }

    /// `ADD HL,rr`. Z is untouched; H is the carry out of bit 11.
    pub(super) fn add16_hl(&mut self, value: u16) {
        let hl = self.regs.hl();

        self.set_flag(Flag::N, false);
        self.set_flag(Flag::H, (hl & 0x0FFF) + (value & 0x0FFF) > 0x0FFF);
        self.set_flag(Flag::C, hl as u32 + value as u32 > 0xFFFF);

        self.regs.set_hl(hl.wrapping_add(value));
    }

    /// Signed immediate added to a 16-bit base (`ADD SP,r8`, `LD HL,SP+r8`).
    ///
    /// Z and N are cleared; H and C come from the low byte, as an unsigned
    /// 8-bit addition of the raw operand.
    pub(super) fn add16_signed(&mut self, base: u16, imm8: u8) -> u16 {
        let offset = sign_extend(imm8);
        self.set_flag(Flag::Z, false);
        self.set_flag(Flag::N, false);
        self.set_flag(Flag::H, (base & 0x000F) + (offset & 0x000F) > 0x000F);
        self.set_flag(Flag::C, (base & 0x00FF) + (offset & 0x00FF) > 0x00FF);
        base.wrapping_add(offset)
    }

    /// Writes Z from `result`, clears N/H and sets C from `carry`.
    #[inline]
    fn shift_flags(&mut self, result: u8, carry: bool) {
        self.clear_flags();
        self.set_flag(Flag::Z, result == 0);
        self.set_flag(Flag::C, carry);
    }

    pub(super) fn rlc(&mut self, value: u8) -> u8 {
        let result = value.rotate_left(1);
        self.shift_flags(result, value & 0x80 != 0);
        result
    }

    pub(super) fn rrc(&mut self, value: u8) -> u8 {
        let result = value.rotate_right(1);
        self.shift_flags(result, value & 0x01 != 0);
        result
    }

    pub(super) fn rl(&mut self, value: u8) -> u8 {
        let result = (value << 1) | self.get_flag(Flag::C) as u8;
        self.shift_flags(result, value & 0x80 != 0);
        result
    }

    pub(super) fn rr(&mut self, value: u8) -> u8 {
        let carry_in = if self.get_flag(Flag::C) { 0x80 } else { 0 };
        let result = (value >> 1) | carry_in;
        self.shift_flags(result, value & 0x01 != 0);
        result
    }

    pub(super) fn sla(&mut self, value: u8) -> u8 {
        let result = value << 1;
        self.shift_flags(result, value & 0x80 != 0);
        result
    }

    pub(super) fn sra(&mut self, value: u8) -> u8 {
        let result = (value >> 1) | (value & 0x80);
        self.shift_flags(result, value & 0x01 != 0);
        result
    }

    pub(super) fn swap(&mut self, value: u8) -> u8 {
        let result = value.rotate_left(4);
        self.shift_flags(result, false);
        result
    }

    pub(super) fn srl(&mut self, value: u8) -> u8 {
        let result = value >> 1;
        self.shift_flags(result, value & 0x01 != 0);
        result
    }
}
