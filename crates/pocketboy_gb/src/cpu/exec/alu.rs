use crate::cpu::{Cpu, CpuError, Flag};
use crate::machine::AddressSpace;

impl Cpu {
    /// Apply one of the eight accumulator operations, selected by bits 5..3
    /// of the opcode: ADD, ADC, SUB, SBC, AND, XOR, OR, CP.
    fn alu_on_a(&mut self, operation: u8, value: u8) {
        let a = self.regs.a;
        self.regs.a = match operation & 0x07 {
            0 => self.add8(a, value, true),
            1 => self.adc8(a, value),
            2 => self.sub8(a, value, true),
            3 => self.sbc8(a, value),
            4 => self.and8(a, value),
            5 => self.xor8(a, value),
            6 => self.or8(a, value),
            _ => {
                // CP only updates flags.
                self.sub8(a, value, true);
                a
            }
        };
    }

    pub(in crate::cpu) fn exec_alu_reg(
        &mut self,
        bus: &mut AddressSpace,
        opcode: u8,
    ) -> Result<u32, CpuError> {
        debug_assert!((0x80..=0xBF).contains(&opcode));

        let src = opcode & 0x07;
        let value = self.read_reg8(bus, src)?;
        self.alu_on_a(opcode >> 3, value);

        Ok(if src == 6 { 8 } else { 4 })
    }

    pub(in crate::cpu) fn exec_alu_imm(
        &mut self,
        bus: &mut AddressSpace,
        opcode: u8,
    ) -> Result<u32, CpuError> {
        debug_assert!(matches!(
            opcode,
            0xC6 | 0xCE | 0xD6 | 0xDE | 0xE6 | 0xEE | 0xF6 | 0xFE
        ));

        let value = self.fetch8(bus)?;
        self.alu_on_a(opcode >> 3, value);
        Ok(8)
    }

    /// RLCA, RRCA, RLA, RRA. Same as the CB forms except Z is always cleared.
    pub(in crate::cpu) fn exec_rotate_a(
        &mut self,
        _bus: &mut AddressSpace,
        opcode: u8,
    ) -> Result<u32, CpuError> {
        debug_assert!(matches!(opcode, 0x07 | 0x0F | 0x17 | 0x1F));

        let a = self.regs.a;
        self.regs.a = match opcode {
            0x07 => self.rlc(a),
            0x0F => self.rrc(a),
            0x17 => self.rl(a),
            _ => self.rr(a),
        };
        self.set_flag(Flag::Z, false);
        Ok(4)
    }

    pub(in crate::cpu) fn exec_daa(
        &mut self,
        _bus: &mut AddressSpace,
        _opcode: u8,
    ) -> Result<u32, CpuError> {
        self.daa();
        Ok(4)
    }

    pub(in crate::cpu) fn exec_cpl(
        &mut self,
        _bus: &mut AddressSpace,
        _opcode: u8,
    ) -> Result<u32, CpuError> {
        self.regs.a = !self.regs.a;
        self.set_flag(Flag::N, true);
        self.set_flag(Flag::H, true);
        Ok(4)
    }

    pub(in crate::cpu) fn exec_scf(
        &mut self,
        _bus: &mut AddressSpace,
        _opcode: u8,
    ) -> Result<u32, CpuError> {
        self.set_flag(Flag::N, false);
        self.set_flag(Flag::H, false);
        self.set_flag(Flag::C, true);
        Ok(4)
    }

    pub(in crate::cpu) fn exec_ccf(
        &mut self,
        _bus: &mut AddressSpace,
        _opcode: u8,
    ) -> Result<u32, CpuError> {
        let carry = self.get_flag(Flag::C);
        self.set_flag(Flag::N, false);
        self.set_flag(Flag::H, false);
        self.set_flag(Flag::C, !carry);
        Ok(4)
    }

    pub(in crate::cpu) fn exec_add_hl_rr(
        &mut self,
        _bus: &mut AddressSpace,
        opcode: u8,
    ) -> Result<u32, CpuError> {
        debug_assert!(matches!(opcode, 0x09 | 0x19 | 0x29 | 0x39));

        let value = self.read_rp(opcode >> 4);
        self.add16_hl(value);
        Ok(8)
    }

    pub(in crate::cpu) fn exec_add_sp_r8(
        &mut self,
        bus: &mut AddressSpace,
        _opcode: u8,
    ) -> Result<u32, CpuError> {
        let imm = self.fetch8(bus)?;
        self.regs.sp = self.add16_signed(self.regs.sp, imm);
        Ok(16)
    }
}
